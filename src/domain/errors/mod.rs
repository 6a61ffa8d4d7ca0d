// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Fewer than two distinct source videos are represented in the clip pool
    InsufficientSources { found: usize },
    /// Clip pool is smaller than one output needs at the requested target duration
    InsufficientClips { required: usize, available: usize },
    /// Clip does not fit inside its source video
    InvalidClip(String),
    /// Media probing failed
    ProbeFail(String),
    /// File system operation failed
    FsFail(String),
    /// Configuration is invalid or unreadable
    ConfigFail(String),
}

impl DomainError {
    /// Number of clips still missing for an `InsufficientClips` rejection
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            DomainError::InsufficientClips { required, available } => {
                Some(required.saturating_sub(*available))
            }
            _ => None,
        }
    }

    /// True for the rejections raised before a generation run starts
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::InsufficientSources { .. } | DomainError::InsufficientClips { .. }
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InsufficientSources { found } => write!(
                f,
                "Insufficient sources: clips from at least 2 different videos are required, found {}",
                found
            ),
            DomainError::InsufficientClips { required, available } => write!(
                f,
                "Insufficient clips: {} required, {} available ({} more needed)",
                required,
                available,
                required.saturating_sub(*available)
            ),
            DomainError::InvalidClip(msg) => write!(f, "Invalid clip: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Step of the encode pipeline an `EncodeError` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeStage {
    /// Clip rejected before the encoder was called
    Validate,
    /// Sub-range extraction from a source video
    Extract,
    /// Joining the extracted clips into one output
    Concatenate,
    /// Run was cancelled while this output was in flight
    Cancelled,
}

impl fmt::Display for EncodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodeStage::Validate => "validate",
            EncodeStage::Extract => "extract",
            EncodeStage::Concatenate => "concatenate",
            EncodeStage::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Failure of a single output; never aborts the whole run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EncodeError {
    pub stage: EncodeStage,
    pub message: String,
}

impl EncodeError {
    pub fn new(stage: EncodeStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn extract(message: impl Into<String>) -> Self {
        Self::new(EncodeStage::Extract, message)
    }

    pub fn concatenate(message: impl Into<String>) -> Self {
        Self::new(EncodeStage::Concatenate, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(EncodeStage::Validate, message)
    }

    pub fn cancelled() -> Self {
        Self::new(EncodeStage::Cancelled, "generation cancelled")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encode error ({}): {}", self.stage, self.message)
    }
}

impl std::error::Error for EncodeError {}
