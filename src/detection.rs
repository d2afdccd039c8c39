//! Construction detection pipeline
//!
//! Takes an accepted upload through the vision model and turns the model's
//! text answer into the response body. The answer is forwarded verbatim as
//! long as it is valid JSON; no schema is imposed on it.

use crate::ai::VisionService;
use crate::models::DetectionResponse;
use crate::upload::ImageUpload;
use crate::Result;

/// Parse the model's answer as JSON and wrap it under `lots`.
pub fn parse_lots(output: &str) -> Result<DetectionResponse> {
    let lots = serde_json::from_str(output)?;
    Ok(DetectionResponse { lots })
}

/// Encode the upload, query the model once and parse its answer.
pub async fn detect(vision: &dyn VisionService, upload: &ImageUpload) -> Result<DetectionResponse> {
    let data_url = upload.to_data_url();
    let output = vision.detect_constructions(&data_url).await?;
    tracing::debug!("Model output: {}", output);

    parse_lots(&output)
}
