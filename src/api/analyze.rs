#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,

    pub headline: String,

    /// File name only. Image content is never uploaded by this flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, image_path: Option<String>) -> Self {
        let text = text.into();
        Self {
            headline: text.clone(),
            text,
            image_path,
        }
    }
}

/// Whatever the backend decided to send back. Every field is optional; a JSON
/// `null` or a value of the wrong type reads as absent.
#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalysisResponse {
    #[serde(deserialize_with = "lenient")]
    pub final_label: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub final_trust_score: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub cache_hit: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub cached: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub image_context: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub similarity_score: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub verification_note: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub response_time_ms: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
    match serde_json::from_value::<T>(value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            log::debug!("ignoring malformed response field: {}", e);
            Ok(None)
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl AnalysisResponse {
    pub fn final_label(&self) -> Option<&str> {
        non_empty(&self.final_label)
    }

    pub fn verification_note(&self) -> Option<&str> {
        non_empty(&self.verification_note)
    }

    pub fn reason(&self) -> Option<&str> {
        non_empty(&self.reason)
    }

    pub fn image_context(&self) -> Option<ImageContext> {
        non_empty(&self.image_context).map(ImageContext::from)
    }

    pub fn image_mismatch(&self) -> bool {
        self.image_context().map_or(false, |c| c.is_mismatch())
    }

    /// Either cache flag set to true.
    pub fn served_from_cache(&self) -> bool {
        self.cached == Some(true) || self.cache_hit == Some(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageContext {
    Consistent,
    Mismatch,
    SuspiciousMismatch,
    Other(String),
}

impl ImageContext {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ImageContext::Mismatch | ImageContext::SuspiciousMismatch)
    }
}

impl From<&str> for ImageContext {
    fn from(s: &str) -> Self {
        match s {
            "Consistent" => ImageContext::Consistent,
            "Mismatch" => ImageContext::Mismatch,
            "Suspicious Mismatch" => ImageContext::SuspiciousMismatch,
            other => ImageContext::Other(other.to_owned()),
        }
    }
}
