use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("nyc311_stats/", env!("CARGO_PKG_VERSION"));

/// Plain `reqwest` client with a request timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30));
        Self(build_or_default(builder))
    }
}

fn build_or_default(builder: reqwest::ClientBuilder) -> reqwest::Client {
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "HTTP client setup failed, using defaults without timeout");
        reqwest::Client::new()
    })
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_builder_falls_back() {
        let builder = reqwest::Client::builder().user_agent("bad\nagent");
        let _client = build_or_default(builder);
    }
}
