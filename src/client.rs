//! HTTP access to a Nightscout site.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::FeedError;
use crate::feed::{parse_entries, Entry, OtherInfo};

/// Number of readings requested per poll.
pub const ENTRY_COUNT: u32 = 60;

/// Where the poller gets its data from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<Entry>, FeedError>;
    async fn fetch_properties(&self) -> Result<OtherInfo, FeedError>;
}

pub struct NightscoutClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl NightscoutClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, FeedError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(FeedError::NotConfigured);
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            token: token.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn entries_url(&self) -> Result<Url, FeedError> {
        let count = ENTRY_COUNT.to_string();
        self.endpoint("sgv.json", &[("count", count.as_str())])
    }

    pub fn properties_url(&self) -> Result<Url, FeedError> {
        self.endpoint("pebble", &[])
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FeedError> {
        let raw = format!("{}/{}", self.base_url, path);
        let mut url =
            Url::parse(&raw).map_err(|e| FeedError::InvalidUrl(format!("{} ({})", self.base_url, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(FeedError::InvalidUrl(self.base_url.clone()));
        }

        if !params.is_empty() || self.token.is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(token) = &self.token {
                query.append_pair("token", token);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url, what: &str) -> Result<Value, FeedError> {
        debug!("requesting {} from {}", what, self.base_url);
        // reqwest errors carry the request URL, which may include the token.
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.without_url()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FeedError::Network(e.without_url()))?;
        debug!("received {} bytes of {}", body.len(), what);
        serde_json::from_slice(&body).map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FeedSource for NightscoutClient {
    async fn fetch_entries(&self) -> Result<Vec<Entry>, FeedError> {
        let raw = self.get_json(self.entries_url()?, "entries").await?;
        Ok(parse_entries(&raw))
    }

    async fn fetch_properties(&self) -> Result<OtherInfo, FeedError> {
        let raw = self.get_json(self.properties_url()?, "properties").await?;
        Ok(OtherInfo::from_properties(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str, token: Option<&str>) -> NightscoutClient {
        NightscoutClient::new(base, token, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_entries_url_without_token() {
        let c = client("https://example.herokuapp.com/", None);
        assert_eq!(
            c.entries_url().unwrap().as_str(),
            "https://example.herokuapp.com/sgv.json?count=60"
        );
    }

    #[test]
    fn test_entries_url_with_token() {
        let c = client("https://ns.example.org", Some("reader-abc123"));
        assert_eq!(
            c.entries_url().unwrap().as_str(),
            "https://ns.example.org/sgv.json?count=60&token=reader-abc123"
        );
    }

    #[test]
    fn test_properties_url() {
        assert_eq!(
            client("https://ns.example.org", None).properties_url().unwrap().as_str(),
            "https://ns.example.org/pebble"
        );
        assert_eq!(
            client("https://ns.example.org", Some("t0k"))
                .properties_url()
                .unwrap()
                .as_str(),
            "https://ns.example.org/pebble?token=t0k"
        );
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let c = client("http://localhost:1337", Some("  "));
        assert_eq!(c.properties_url().unwrap().as_str(), "http://localhost:1337/pebble");
    }

    #[test]
    fn test_empty_base_is_not_configured() {
        let err = NightscoutClient::new("  ", None, Duration::from_secs(5)).err();
        assert!(matches!(err, Some(FeedError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_network_error_hides_token() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let c = NightscoutClient::new(
            &format!("http://127.0.0.1:{}", port),
            Some("SECRET-TOKEN-42"),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = c.fetch_entries().await.unwrap_err();
        assert!(matches!(err, FeedError::Network(_)));
        let text = err.to_string();
        assert!(!text.contains("SECRET-TOKEN-42"), "token leaked: {}", text);
        assert!(!text.contains("token="), "query leaked: {}", text);
    }

    #[test]
    fn test_invalid_base_url() {
        let c = client("not a url", None);
        assert!(matches!(c.entries_url(), Err(FeedError::InvalidUrl(_))));
        let c = client("ftp://ns.example.org", None);
        assert!(matches!(c.entries_url(), Err(FeedError::InvalidUrl(_))));
    }
}
