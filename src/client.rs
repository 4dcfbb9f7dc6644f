//! Async client for the Dream Teller HTTP API.
//!
//! ```rust,ignore
//! use dreamteller::client::DreamClient;
//! use dreamteller::model::{DreamRequest, FormatType};
//!
//! let client = DreamClient::new("http://localhost:8001")?;
//! let dream = client
//!     .generate_dream(&DreamRequest {
//!         dream_text: "I was a lighthouse keeper on the moon".into(),
//!         format_type: FormatType::Podcast,
//!         include_audio: true,
//!         session_id: None,
//!     })
//!     .await?;
//! println!("{}", dream.generated_story);
//! ```

use crate::error::ClientError;
use crate::model::{ApiInfo, DreamGeneration, DreamRequest, StatusCheck, StatusCheckCreate};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// The one call the form needs.
#[async_trait::async_trait]
pub trait DreamApi: Send + Sync {
    async fn generate_dream(&self, request: &DreamRequest) -> Result<DreamGeneration, ClientError>;
}

#[derive(Clone, Debug)]
pub struct DreamClient {
    http: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl DreamClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    /// Endpoint whose trailing segments are caller data; each is percent-encoded.
    fn resource(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn api_info(&self) -> Result<ApiInfo, ClientError> {
        let resp = self.http.get(self.endpoint("api/")?).send().await?;
        decode(resp).await
    }

    pub async fn get_dream(&self, id: &str) -> Result<DreamGeneration, ClientError> {
        let url = self.resource(&["api", "dream", id])?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn session_dreams(&self, session_id: &str) -> Result<Vec<DreamGeneration>, ClientError> {
        let url = self.resource(&["api", "dreams", "session", session_id])?;
        decode(self.http.get(url).send().await?).await
    }

    pub async fn create_status(&self, client_name: &str) -> Result<StatusCheck, ClientError> {
        let body = StatusCheckCreate {
            client_name: client_name.to_string(),
        };
        let resp = self
            .http
            .post(self.endpoint("api/status")?)
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn list_status(&self) -> Result<Vec<StatusCheck>, ClientError> {
        decode(self.http.get(self.endpoint("api/status")?).send().await?).await
    }
}

#[async_trait::async_trait]
impl DreamApi for DreamClient {
    async fn generate_dream(&self, request: &DreamRequest) -> Result<DreamGeneration, ClientError> {
        debug!(format = %request.format_type, "Submitting dream");
        let resp = self
            .http
            .post(self.endpoint("api/generate-dream")?)
            .json(request)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if text.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => text,
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}
