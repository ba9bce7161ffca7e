use serde::{Deserialize, Serialize};

/// Broad classification of a failed directory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Operator input failed a form rule; nothing was sent.
    Validation,
    /// Transport failure or a non-2xx response.
    Network,
    /// Anything else, such as an undecodable response body.
    Unexpected,
}
