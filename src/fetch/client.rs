use async_trait::async_trait;
use reqwest::{Method, Request, Response};

/// Transport seam for remote data files, so loaders can be exercised
/// without a network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    /// Issues a GET and fails on any non-success status.
    async fn get(&self, url: &str) -> anyhow::Result<Response> {
        let req = Request::new(Method::GET, url.parse()?);
        let resp = self.execute(req).await?;
        Ok(resp.error_for_status()?)
    }
}
