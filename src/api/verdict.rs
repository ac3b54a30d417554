#[derive(serde::Serialize, Clone, Debug)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(serde::Serialize, Clone, Debug)]
pub struct ImageRequest<'a> {
    pub image_path: &'a str,
}

/// Result of one of the single-model endpoints.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ModelVerdict {
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}
