//! Cloudinary hosting backend
//!
//! Signed REST calls against the Cloudinary upload API. Every request carries
//! `api_key`, `timestamp` and a `signature` computed over the other signed
//! parameters (sorted, `key=value` joined by `&`, API secret appended).

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use gallery_core::{HostingConfig, MediaKind, SignatureAlgorithm};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::traits::{
    DestroyOutcome, HostError, HostResult, HostedAsset, HostedUpload, MediaHost,
};

pub struct CloudinaryHost {
    http_client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    algorithm: SignatureAlgorithm,
    base_url: String,
}

impl Debug for CloudinaryHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryHost")
            .field("cloud_name", &self.cloud_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
    #[serde(default)]
    eager: Vec<EagerRendition>,
}

#[derive(Debug, Deserialize)]
struct EagerRendition {
    transformation: Option<String>,
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: &HostingConfig) -> HostResult<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(HostError::ConfigError(
                "Cloudinary credentials are not configured".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HostError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            algorithm: config.signature_algorithm,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.cloud_name,
            kind.as_str(),
            action
        )
    }

    /// Sign `params` and return them with `api_key` and `signature` added.
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        let signature = sign(&params, &self.api_secret, self.algorithm);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params
    }

    /// Turn a non-2xx response into `HostError::Api`, preferring the API's own message.
    async fn api_error(response: reqwest::Response) -> HostError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        HostError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// The string that gets hashed: sorted `key=value` pairs joined by `&`.
pub fn signature_payload(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn sign(params: &BTreeMap<&str, String>, secret: &str, algorithm: SignatureAlgorithm) -> String {
    let to_sign = format!("{}{}", signature_payload(params), secret);
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(to_sign.as_bytes())),
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    #[tracing::instrument(skip(self, upload), fields(file_name = %upload.file_name, kind = %upload.kind, size = upload.data.len()))]
    async fn upload(&self, upload: HostedUpload) -> HostResult<HostedAsset> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        if !upload.folder.is_empty() {
            params.insert("folder", upload.folder.clone());
        }
        if !upload.options.eager.is_empty() {
            let eager = upload
                .options
                .eager
                .iter()
                .map(|spec| spec.transformation)
                .collect::<Vec<_>>()
                .join("|");
            params.insert("eager", eager);
        }

        let file_part = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| HostError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let mut form = Form::new().part("file", file_part);
        for (key, value) in self.signed(params) {
            form = form.text(key, value);
        }

        let response = self
            .http_client
            .post(self.endpoint(upload.kind, "upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::api_error(response).await;
            tracing::warn!(error = %err, "Cloudinary upload rejected");
            return Err(err);
        }

        let body: UploadResponse = response.json().await?;

        let canonical_url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| HostError::InvalidResponse("missing secure_url".to_string()))?;
        let external_id = body
            .public_id
            .ok_or_else(|| HostError::InvalidResponse("missing public_id".to_string()))?;

        // Renditions come back in request order; match by directive first.
        let mut eager_urls = HashMap::new();
        for (idx, rendition) in body.eager.into_iter().enumerate() {
            let Some(url) = rendition.secure_url else {
                continue;
            };
            let spec = rendition
                .transformation
                .as_deref()
                .and_then(|t| upload.options.eager.iter().find(|s| s.transformation == t))
                .or_else(|| upload.options.eager.get(idx));
            if let Some(spec) = spec {
                eager_urls.insert(spec.name.to_string(), url);
            }
        }

        tracing::debug!(external_id = %external_id, "Uploaded to Cloudinary");

        Ok(HostedAsset {
            canonical_url,
            external_id,
            eager_urls,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn destroy(&self, external_id: &str, kind: MediaKind) -> HostResult<DestroyOutcome> {
        let mut params = BTreeMap::new();
        params.insert("public_id", external_id.to_string());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());

        let response = self
            .http_client
            .post(self.endpoint(kind, "destroy"))
            .form(&self.signed(params))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        tracing::debug!(result = %body.result, "Cloudinary destroy result");
        Ok(DestroyOutcome::from_result(&body.result))
    }

    fn provider(&self) -> &'static str {
        "cloudinary"
    }
}
