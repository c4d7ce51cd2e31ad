//! HTTP utilities for GCP REST API calls

use super::ApiError;
use reqwest::Client;

/// Maximum length of an error body kept in diagnostics
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Truncate an error body and drop non-printable characters so it fits on one
/// diagnostic line.
fn sanitize_for_log(body: &str) -> String {
    let printable: String = body
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let collapsed = printable.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > MAX_ERROR_BODY_LENGTH {
        let head: String = collapsed.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{head}... [truncated, {} bytes total]", body.len())
    } else {
        collapsed
    }
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("gcp-info/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client { source: e })?;

        Ok(Self { client })
    }

    /// GET a URL and return the response body. Non-2xx statuses are errors.
    pub async fn get(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> Result<String, ApiError> {
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Request {
            url: url.to_owned(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body: sanitize_for_log(&body),
            });
        }

        Ok(body)
    }
}
