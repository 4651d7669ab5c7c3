//! HTTP client for the work log API.
//!
//! Issues `GET {base}/api/artifacts?start_date=..&end_date=..&sources=a,b`.
//! `sources` is omitted when the request covers every source.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{ArtifactTransport, ArtifactsResponse};
use crate::config::Config;
use crate::error::TransportError;
use crate::query::FetchRequest;

const ARTIFACTS_PATH: &str = "api/artifacts";

pub struct HttpArtifactClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpArtifactClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        // Url::join drops the last segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full request URL for a fetch.
    pub fn artifacts_url(&self, request: &FetchRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(ARTIFACTS_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("start_date", &request.start_date);
            query.append_pair("end_date", &request.end_date);
            if !request.sources.is_empty() {
                query.append_pair("sources", &request.sources.join(","));
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ArtifactTransport for HttpArtifactClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<ArtifactsResponse, TransportError> {
        let url = self.artifacts_url(request)?;
        log::debug!("Transport: GET {}", url);

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            log::warn!("Transport: artifacts request failed with {}", status);
            return Err(TransportError::Api { status, message });
        }

        let body = resp.text().await?;
        let artifacts: ArtifactsResponse = serde_json::from_str(&body)?;
        log::debug!("Transport: received {} artifacts", artifacts.total());
        Ok(artifacts)
    }
}
