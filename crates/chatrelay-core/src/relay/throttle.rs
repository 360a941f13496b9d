//! Rate-limit detection for backend failures.

use chatrelay_types::error::{AgentError, RelayError};

/// Lowercased substrings that mark an error message as a rate-limit signal.
const THROTTLE_SIGNALS: &[&str] = &[
    "throttlingexception",
    "throttling",
    "rate limit",
    "rate-limit",
    "ratelimit",
    "rate exceeded",
    "too many requests",
];

/// Whether a free-form error message carries a rate-limit signal.
pub fn is_throttle_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    THROTTLE_SIGNALS.iter().any(|signal| lowered.contains(signal))
}

/// Whether a relay failure should be reported to the client as throttling.
pub fn is_throttled(err: &RelayError) -> bool {
    match err {
        RelayError::Agent(AgentError::Throttled(_)) => true,
        other => is_throttle_message(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::error::StoreError;

    #[test]
    fn detects_known_signals_case_insensitively() {
        assert!(is_throttle_message("ThrottlingException: Rate exceeded"));
        assert!(is_throttle_message("throttlingException"));
        assert!(is_throttle_message("HTTP 429 Too Many Requests"));
        assert!(is_throttle_message("account rate-limit hit"));
    }

    #[test]
    fn ignores_unrelated_words_containing_rate() {
        assert!(!is_throttle_message("failed to generate response"));
        assert!(!is_throttle_message("accurate answer unavailable"));
        assert!(!is_throttle_message("connection reset"));
    }

    #[test]
    fn throttled_variant_always_counts() {
        let err = RelayError::Agent(AgentError::Throttled(String::new()));
        assert!(is_throttled(&err));
    }

    #[test]
    fn backend_error_with_signal_counts() {
        let err = RelayError::Agent(AgentError::Backend("Rate exceeded for model".into()));
        assert!(is_throttled(&err));
        let plain = RelayError::Agent(AgentError::Backend("validation failed".into()));
        assert!(!is_throttled(&plain));
        let store = RelayError::Store(StoreError::Query("disk full".into()));
        assert!(!is_throttled(&store));
    }
}
