use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use farm_core::service::ServiceConfig;
use farm_core::{
    AdvisorService, FertilizerRecommendation, FertilizerRequest, GeneratedText, ServiceError,
    TextGenerationRequest, YieldPrediction, YieldRequest,
};

const YIELD_PATH: &str = "predict/yield";
const FERTILIZER_PATH: &str = "predict/fertilizer";
const TEXT_PATH: &str = "generate/gemini_text";

/// [`AdvisorService`] over the advisor backend's JSON API.
///
/// Every operation is a single `POST` of the request body to a path under
/// `base_url`. The underlying `reqwest::Client` is pooled and cheap to share,
/// so one instance serves the whole session.
#[derive(Debug, Clone)]
pub struct HttpAdvisorService {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpAdvisorService {
    /// Build a client for the backend at `base_url`.
    ///
    /// # Errors
    /// [`ServiceError::Configuration`] when `base_url` is not an absolute
    /// `http`/`https` URL or the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(
        &self,
        path: &str,
    ) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::Configuration(format!("invalid endpoint '{path}': {e}")))
    }

    async fn post<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, ServiceError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let error = status_error(status.as_u16(), &bytes);
            warn!(path, status = status.as_u16(), error = %error, "backend returned an error");
            return Err(error);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Decode(format!("unexpected response from /{path}: {e}")))
    }

    fn map_reqwest_error(
        &self,
        err: reqwest::Error,
    ) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Transport(format!("timeout of {}ms exceeded", self.timeout.as_millis()))
        } else if err.is_connect() {
            ServiceError::Transport(format!("Network Error: cannot reach {}", self.base_url))
        } else {
            ServiceError::Transport(format!("Network Error: {err}"))
        }
    }
}

/// Accepts `http`/`https` URLs only and normalises the path to end in `/` so
/// endpoint paths are appended rather than replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ServiceError::Configuration(format!("invalid base URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::Configuration(format!(
            "unsupported URL scheme '{}' in '{raw}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// "Request failed with status code N", followed by the backend's `detail`
/// when the body carries one.
fn status_error(
    status: u16,
    body: &[u8],
) -> ServiceError {
    let mut message = format!("Request failed with status code {status}");
    if let Some(detail) = error_detail(body) {
        message.push_str(": ");
        message.push_str(&detail);
    }
    ServiceError::Status { status, message }
}

fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl AdvisorService for HttpAdvisorService {
    async fn predict_yield(
        &self,
        request: &YieldRequest,
    ) -> Result<YieldPrediction, ServiceError> {
        self.post(YIELD_PATH, request).await
    }

    async fn recommend_fertilizer(
        &self,
        request: &FertilizerRequest,
    ) -> Result<FertilizerRecommendation, ServiceError> {
        self.post(FERTILIZER_PATH, request).await
    }

    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ServiceError> {
        self.post(TEXT_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn service(base: &str) -> HttpAdvisorService {
        HttpAdvisorService::new(base, Duration::from_secs(5)).unwrap()
    }

    // ── base URL handling ────────────────────────────────────────────────

    #[test]
    fn endpoints_resolve_under_base_url() {
        let svc = service("http://localhost:8000");
        assert_eq!(
            svc.endpoint(YIELD_PATH).unwrap().as_str(),
            "http://localhost:8000/predict/yield"
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let svc = service("https://agro.example/api/v1");
        assert_eq!(
            svc.endpoint(TEXT_PATH).unwrap().as_str(),
            "https://agro.example/api/v1/generate/gemini_text"
        );
    }

    #[test]
    fn malformed_base_url_is_a_configuration_error() {
        let err = HttpAdvisorService::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)), "got {err:?}");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = HttpAdvisorService::new("ftp://farm.example", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    // ── status errors ────────────────────────────────────────────────────

    #[test]
    fn status_error_appends_string_detail() {
        let err = status_error(503, br#"{"detail":"Gemini API is not configured"}"#);
        assert_eq!(
            err,
            ServiceError::Status {
                status: 503,
                message: "Request failed with status code 503: Gemini API is not configured"
                    .to_string(),
            }
        );
    }

    #[test]
    fn status_error_without_json_body_uses_status_only() {
        let err = status_error(500, b"Internal Server Error");
        assert_eq!(err.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let detail = error_detail(br#"{"detail":[{"loc":["body","Area"],"msg":"field required"}]}"#);
        assert_eq!(
            detail.as_deref(),
            Some(r#"[{"loc":["body","Area"],"msg":"field required"}]"#)
        );
    }
}
