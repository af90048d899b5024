//! Correlation IDs tying together the log lines of one ingestion request.

use std::fmt;
use uuid::Uuid;

/// Correlation ID for one unit of work (an HTTP submission or a retention run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short format (first 8 characters) for logging.
    pub fn short(&self) -> String {
        let mut id = self.0.simple().to_string();
        id.truncate(8);
        id
    }

    /// Span that tags every event logged inside it with this ID.
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!("work", operation, correlation_id = %self.short())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }

    #[test]
    fn test_short_format_is_prefix_of_full_id() {
        let id = CorrelationId::new();
        let short = id.short();
        assert_eq!(short.len(), 8);
        assert!(id.to_string().starts_with(&short));
    }

    #[test]
    fn test_display_format() {
        // 8-4-4-4-12 hex chars with dashes
        assert_eq!(CorrelationId::new().to_string().len(), 36);
    }
}
