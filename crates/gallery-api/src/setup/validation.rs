//! Startup configuration checks
//!
//! `Config::validate` rejects values that cannot work at all; this adds the
//! checks that only matter for a running server and warns about settings
//! that work but are probably unintended.

use anyhow::Result;
use gallery_core::Config;

/// Validate configuration before any service is built.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && !config.hosting.api_base_url.starts_with("https://") {
        return Err(anyhow::anyhow!(
            "HOSTING_API_BASE_URL must use https in production (got {})",
            config.hosting.api_base_url
        ));
    }

    if config.limits.concurrency > config.max_files() {
        tracing::warn!(
            concurrency = config.limits.concurrency,
            max_files = config.max_files(),
            "UPLOAD_CONCURRENCY is higher than MAX_FILES_PER_UPLOAD and has no effect past it"
        );
    }

    if config.hosting.timeout_secs == 0 {
        return Err(anyhow::anyhow!("HOSTING_TIMEOUT_SECS cannot be 0"));
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
