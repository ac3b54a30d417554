pub mod analyze;
pub mod verdict;

pub use analyze::{AnalysisRequest, AnalysisResponse, ImageContext};
pub use verdict::ModelVerdict;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const GENERIC_BACKEND_FAILURE: &str = "Backend request failed";
const GENERIC_CONNECT_FAILURE: &str = "Failed to connect to backend. Make sure the server is running.";

/// Body the backend sends alongside a non-2xx status.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("validation: {0}")]
    Validation(String),

    #[error("request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serde: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("backend: {message} ({status})")]
    Backend { status: reqwest::StatusCode, message: String },
}

impl Error {
    /// Text shown to the user in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(message) | Error::Backend { message, .. } => message.clone(),
            Error::Transport(_) | Error::Decode(_) | Error::Timeout(_) => GENERIC_CONNECT_FAILURE.to_owned(),
        }
    }
}

#[async_trait::async_trait]
pub trait Analyzer {
    async fn analyze_full(&self, req: &AnalysisRequest) -> Result<AnalysisResponse, Error>;
}

pub struct Client {
    client: reqwest::Client,
    base_url: String,
    request_timeout: std::time::Duration,
}

impl Client {
    pub fn new(base_url: impl AsRef<str>, request_timeout: std::time::Duration) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, reqwest::header::HeaderValue::from_static("application/json"));
        headers.insert(reqwest::header::CONTENT_TYPE, reqwest::header::HeaderValue::from_static("application/json"));
        Ok(Self {
            client: reqwest::ClientBuilder::new().default_headers(headers).build()?,
            base_url: base_url.as_ref().trim_end_matches('/').to_owned(),
            request_timeout,
        })
    }

    /// Posts `req` as JSON and decodes the reply. The whole exchange, body
    /// included, is bounded by the client's request timeout; on expiry the
    /// request is dropped.
    async fn do_request<Req, Resp>(&self, path: &str, req: &Req) -> Result<Resp, Error>
    where
        Req: serde::Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::info!("POST {}", url);

        let (status, body) = tokio::time::timeout(self.request_timeout, async {
            let resp = self.client.post(&url).json(req).send().await.map_err(|e| e.without_url())?;
            let status = resp.status();
            let body = resp.bytes().await.map_err(|e| e.without_url())?;
            Ok::<_, Error>((status, body))
        })
        .await
        .map_err(|_| Error::Timeout(self.request_timeout))??;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_BACKEND_FAILURE.to_owned());
            log::warn!("POST {} failed with {}: {}", url, status, message);
            return Err(Error::Backend { status, message });
        }

        log::info!("POST {} -> {} ({} bytes)", url, status, body.len());
        Ok(serde_json::from_slice::<Resp>(&body)?)
    }

    pub async fn analyze_text(&self, text: &str) -> Result<ModelVerdict, Error> {
        self.do_request("/analyze-text", &verdict::TextRequest { text }).await
    }

    pub async fn analyze_image(&self, image_path: &str) -> Result<ModelVerdict, Error> {
        self.do_request("/analyze-image", &verdict::ImageRequest { image_path }).await
    }
}

#[async_trait::async_trait]
impl Analyzer for Client {
    async fn analyze_full(&self, req: &AnalysisRequest) -> Result<AnalysisResponse, Error> {
        self.do_request("/analyze-full", req).await
    }
}
