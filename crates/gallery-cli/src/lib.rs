//! Gallery CLI: HTTP client for a running gallery server and the
//! interactive `.env` setup.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GALLERY_URL: &str = "http://localhost:3000";

/// Answer from the server: HTTP status and JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the gallery server.
#[derive(Clone, Debug)]
pub struct GalleryClient {
    client: Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from GALLERY_URL, falling back to localhost:3000.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("GALLERY_URL").unwrap_or_else(|_| DEFAULT_GALLERY_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<ApiReply> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        Self::reply(response).await
    }

    pub async fn delete(&self, external_id: &str) -> Result<ApiReply> {
        let response = self
            .client
            .post(format!("{}/delete", self.base_url))
            .json(&serde_json::json!({ "externalId": external_id }))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        Self::reply(response).await
    }

    async fn reply(response: reqwest::Response) -> Result<ApiReply> {
        let status = response.status().as_u16();
        let text = response.text().await.context("Failed to read response")?;
        let body = serde_json::from_str(&text)
            .with_context(|| format!("Server answered {} with non-JSON body: {}", status, text))?;
        tracing::debug!(status, "Server replied");
        Ok(ApiReply { status, body })
    }
}

/// Values collected by `setup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupAnswers {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub port: u16,
}

impl SetupAnswers {
    pub fn render_env(&self) -> String {
        format!(
            "# Cloudinary Configuration\n\
             CLOUDINARY_CLOUD_NAME={}\n\
             CLOUDINARY_API_KEY={}\n\
             CLOUDINARY_API_SECRET={}\n\
             \n\
             # Server Configuration\n\
             PORT={}\n\
             ENVIRONMENT=development\n",
            self.cloud_name, self.api_key, self.api_secret, self.port
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupResult {
    Written(SetupAnswers),
    Cancelled,
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(line.trim().to_string())
}

fn ask_required<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &str,
) -> Result<String> {
    let answer = ask(input, output, &format!("Enter your Cloudinary {}: ", field))?;
    if answer.is_empty() {
        anyhow::bail!("{} cannot be empty", field);
    }
    Ok(answer)
}

/// Prompt for credentials and write them to `env_path`.
///
/// An existing file is only replaced after an explicit `y`.
pub fn run_setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    env_path: &Path,
) -> Result<SetupResult> {
    writeln!(output, "Media Gallery Setup")?;
    writeln!(output, "===================\n")?;
    writeln!(
        output,
        "Find your Cloud Name, API Key and API Secret on the dashboard at https://cloudinary.com/console\n"
    )?;

    let cloud_name = ask_required(input, output, "Cloud Name")?;
    let api_key = ask_required(input, output, "API Key")?;
    let api_secret = ask_required(input, output, "API Secret")?;
    let port = ask(input, output, "Enter port number (default: 3000): ")?;
    let port = if port.is_empty() {
        3000
    } else {
        port.parse::<u16>()
            .with_context(|| format!("Invalid port number: {}", port))?
    };

    if env_path.exists() {
        let overwrite = ask(input, output, ".env file already exists. Overwrite? (y/N): ")?;
        if !overwrite.eq_ignore_ascii_case("y") {
            writeln!(output, "Setup cancelled.")?;
            return Ok(SetupResult::Cancelled);
        }
    }

    let answers = SetupAnswers {
        cloud_name,
        api_key,
        api_secret,
        port,
    };
    std::fs::write(env_path, answers.render_env())
        .with_context(|| format!("Failed to write {}", env_path.display()))?;

    writeln!(output, "\n.env file created successfully!")?;
    writeln!(output, "\nNext steps:")?;
    writeln!(output, "1. Run: cargo run -p gallery-api")?;
    writeln!(output, "2. Visit: http://localhost:{}", port)?;

    Ok(SetupResult::Written(answers))
}

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Initialize tracing for the CLI (stderr, `warn` unless RUST_LOG says otherwise).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
