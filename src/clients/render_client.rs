use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::models::{RenderError, StartupError};

const GITHUB_API_URL: &str = "https://api.github.com";

// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request body for the markdown rendering endpoint.
#[derive(Serialize, Debug)]
struct MarkdownRequest<'a> {
    text: &'a str,
    mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

/// Client for the GitHub markdown rendering service.
///
/// Stateless with respect to documents: one render call per change, reading
/// the file fresh every time.
#[derive(Debug)]
pub struct RenderClient {
    client: Client,
    base_url: String,
    context: Option<String>,
    token: Option<String>,
}

impl RenderClient {
    /// `token` raises rate limits and allows private context repositories,
    /// `context` switches rendering to flavored mode in that repository's
    /// namespace, `base_url` points at a GitHub Enterprise API root.
    pub fn new(
        token: Option<String>,
        context: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, StartupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| GITHUB_API_URL.to_string()),
            context,
            token,
        })
    }

    /// Render one document to HTML: read the file, then post it to the
    /// rendering endpoint in plain or flavored mode.
    pub async fn render(&self, path: &Path) -> Result<String, RenderError> {
        let text = tokio::fs::read_to_string(path).await?;
        let body = self.request_body(&text);
        debug!("Rendering {} in '{}' mode", path.display(), body.mode);

        let mut request = self
            .client
            .post(format!("{}/markdown", self.base_url))
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status(status));
        }
        Ok(response.text().await?)
    }

    fn request_body<'a>(&'a self, text: &'a str) -> MarkdownRequest<'a> {
        match self.context.as_deref() {
            Some(context) => MarkdownRequest {
                text,
                mode: "gfm",
                context: Some(context),
            },
            None => MarkdownRequest {
                text,
                mode: "markdown",
                context: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_without_context() {
        let client = RenderClient::new(None, None, None).unwrap();
        let body = client.request_body("# hi");
        assert_eq!(body.mode, "markdown");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "# hi");
        assert!(json.get("context").is_none());
    }

    #[test]
    fn flavored_mode_with_context() {
        let client =
            RenderClient::new(None, Some("octocat/hello-world".to_string()), None).unwrap();
        let body = client.request_body("# hi");
        assert_eq!(body.mode, "gfm");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["context"], "octocat/hello-world");
    }

    #[test]
    fn enterprise_base_url_overrides_default() {
        let client = RenderClient::new(None, None, None).unwrap();
        assert_eq!(client.base_url, GITHUB_API_URL);

        let client = RenderClient::new(
            None,
            None,
            Some("https://github.example.com/api/v3".to_string()),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://github.example.com/api/v3");
    }
}
