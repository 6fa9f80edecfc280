use crate::{CloudinaryHost, CloudinaryUrlRewrite, HostResult, MediaHost, VariantDeriver};
use gallery_core::Config;
use std::sync::Arc;

/// Create the media host based on configuration
pub fn create_media_host(config: &Config) -> HostResult<Arc<dyn MediaHost>> {
    let host = CloudinaryHost::new(&config.hosting)?;
    tracing::info!(
        cloud_name = %config.hosting.cloud_name,
        api_base_url = %config.hosting.api_base_url,
        "Cloudinary media host configured"
    );
    Ok(Arc::new(host))
}

/// Create the variant deriver matching the configured host
pub fn create_variant_deriver(_config: &Config) -> Arc<dyn VariantDeriver> {
    Arc::new(CloudinaryUrlRewrite::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_create_media_host_from_config() {
        let vars: HashMap<&str, &str> = [
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        let host = create_media_host(&config).unwrap();
        assert_eq!(host.provider(), "cloudinary");
        assert_eq!(create_variant_deriver(&config).eager_specs().len(), 3);
    }
}
