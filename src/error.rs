use thiserror::Error;

/// Failure of a single gateway operation or device interaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{service} responded with HTTP {status}")]
    Network { service: &'static str, status: u16 },
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("response failed validation: {0}")]
    InvalidResponse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl ApiError {
    pub(crate) fn transport(service: &'static str, err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Network {
                service,
                status: status.as_u16(),
            },
            None => ApiError::Transport {
                service,
                message: err.to_string(),
            },
        }
    }

    /// Non-2xx and transport failures both count as network errors.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. } | ApiError::Transport { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_mentions_status() {
        let err = ApiError::Network {
            service: "backend",
            status: 503,
        };
        assert!(err.is_network());
        assert_eq!(err.to_string(), "backend responded with HTTP 503");
    }

    #[test]
    fn parse_is_not_network() {
        let err = ApiError::Parse("expected value".into());
        assert!(!err.is_network());
        assert!(!err.is_cancelled());
    }
}
