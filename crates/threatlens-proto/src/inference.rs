use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One weapon-class identification returned by the inference service.
/// `frame` is set only on video detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
}

/// Response shape of the detection endpoint, for one image or video request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub success: bool,
    #[serde(default)]
    pub detections: Vec<Detection>,
    pub processing_time: Option<f64>,
    pub processed_image_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("inference service reported failure: {0}")]
    Failed(String),
}

impl InferenceResponse {
    /// Unwraps the detection list. A response with `success=false` or an
    /// `error` payload never reaches the summarizer; it surfaces here.
    pub fn into_detections(self) -> Result<Vec<Detection>, ServiceError> {
        if !self.success {
            return Err(ServiceError::Failed(
                self.error
                    .unwrap_or_else(|| "no error message provided".into()),
            ));
        }
        if let Some(msg) = self.error {
            return Err(ServiceError::Failed(msg));
        }
        Ok(self.detections)
    }
}
