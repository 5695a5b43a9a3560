use tracing::{debug, error};

use crate::contract::{InputItem, PipelineError};

/// Validates a raw content item before it enters the pipeline.
///
/// Fails when the content is empty or whitespace-only. The kind is already
/// typed at this point; an unrecognized wire value never reaches this
/// function (the boundary rejects it during deserialization). Validating an
/// already-valid item is a no-op: the same value is returned unchanged.
pub fn validate(item: InputItem) -> Result<InputItem, PipelineError> {
    if item.content.trim().is_empty() {
        error!(kind = item.kind.as_str(), "Rejected item with empty content");
        return Err(PipelineError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    debug!(
        kind = item.kind.as_str(),
        content_len = item.content.len(),
        "Input item validated"
    );
    Ok(item)
}
