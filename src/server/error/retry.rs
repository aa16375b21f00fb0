use super::delivery_date::DeliveryDateError;

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Failed permanently
    Fail,
}

/// Errors that can decide whether the operation that produced them is worth repeating.
pub trait RetryStrategy {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy;
}

impl RetryStrategy for DeliveryDateError {
    fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            // Every failed attempt is retried, 4xx included
            Self::UpstreamTimeout(_)
            | Self::UpstreamStatus { .. }
            | Self::UpstreamRequest(_)
            | Self::UpstreamDecode(_) => ErrorRetryStrategy::Retry,

            // Already the outcome of a retry loop
            Self::RetriesExhausted { .. } => ErrorRetryStrategy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn upstream_attempt_failures_are_retried() {
        let errors = [
            DeliveryDateError::UpstreamTimeout(Duration::from_secs(10)),
            DeliveryDateError::UpstreamStatus {
                status: 503,
                body: "unavailable".to_string(),
            },
            DeliveryDateError::UpstreamDecode("expected value".to_string()),
        ];

        for err in errors {
            assert_eq!(err.to_retry_strategy(), ErrorRetryStrategy::Retry, "{err}");
        }
    }

    #[test]
    fn exhausted_retries_fail() {
        let exhausted = DeliveryDateError::RetriesExhausted {
            attempts: 3,
            source: None,
        };

        assert_eq!(exhausted.to_retry_strategy(), ErrorRetryStrategy::Fail);
    }
}
