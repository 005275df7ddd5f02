use thiserror::Error;

/// Why a story request did not produce text. The widget collapses every variant
/// into the fallback story; the variants exist for logging.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference transport failure: {0}")]
    Transport(String),
    #[error("inference endpoint rejected request with status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("malformed inference response: {0}")]
    Malformed(String),
    #[error("inference response has no generated_text at index 0")]
    MissingGeneratedText,
}

impl InferenceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Rejected { status: 401 | 403, .. } => "unauthorized",
            Self::Rejected { status: 429, .. } => "rate_limited",
            Self::Rejected { status: 503, .. } => "model_unavailable",
            Self::Rejected { .. } => "rejected",
            Self::Malformed(_) => "malformed",
            Self::MissingGeneratedText => "missing_generated_text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rejections_by_status() {
        let kind = |status| {
            InferenceError::Rejected {
                status,
                message: None,
            }
            .kind()
        };
        assert_eq!(kind(401), "unauthorized");
        assert_eq!(kind(403), "unauthorized");
        assert_eq!(kind(429), "rate_limited");
        assert_eq!(kind(503), "model_unavailable");
        assert_eq!(kind(500), "rejected");
    }

    #[test]
    fn rejected_display_includes_message() {
        let err = InferenceError::Rejected {
            status: 429,
            message: Some("Rate limit reached".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "inference endpoint rejected request with status 429: Rate limit reached"
        );
    }
}
