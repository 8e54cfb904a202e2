//! Parse-error collection.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors."
//!
//! Parse errors never abort parsing. They are collected into a per-parse
//! [`ParseErrors`] sink with a fixed capacity; once the sink is full, further
//! errors are dropped.

use std::slice;

use log::{debug, warn};

/// A single recoverable parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at {position})")]
pub struct ParseError {
    /// Character offset into the (newline-normalized) input where the
    /// tokenizer stood when the error was reported.
    pub position: usize,
    /// Human-readable description.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    #[must_use]
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Append-only parse-error collector with a capacity cutoff.
///
/// A capacity of zero disables tracking entirely.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
    max_size: usize,
}

impl ParseErrors {
    /// A sink that keeps at most `max_size` errors.
    #[must_use]
    pub fn tracking(max_size: usize) -> Self {
        Self {
            errors: Vec::new(),
            max_size,
        }
    }

    /// A sink that drops every error.
    #[must_use]
    pub const fn no_tracking() -> Self {
        Self {
            errors: Vec::new(),
            max_size: 0,
        }
    }

    /// Whether another error would be kept.
    #[must_use]
    pub fn can_add_error(&self) -> bool {
        self.errors.len() < self.max_size
    }

    /// Record an error, or drop it silently if the sink is full.
    pub fn push(&mut self, error: ParseError) {
        if !self.can_add_error() {
            return;
        }
        debug!(target: "weft::parse", "{error}");
        self.errors.push(error);
        if self.errors.len() == self.max_size {
            warn!(
                target: "weft::parse",
                "parse error limit of {} reached; further errors are dropped",
                self.max_size
            );
        }
    }

    /// Configured capacity.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of errors kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True if no error was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over kept errors in report order.
    pub fn iter(&self) -> slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// Consume the sink, returning the kept errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_errors_past_capacity() {
        let mut errors = ParseErrors::tracking(2);
        errors.push(ParseError::new(0, "first"));
        errors.push(ParseError::new(1, "second"));
        assert!(!errors.can_add_error());
        errors.push(ParseError::new(2, "third"));

        assert_eq!(errors.len(), 2);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_no_tracking_keeps_nothing() {
        let mut errors = ParseErrors::no_tracking();
        assert!(!errors.can_add_error());
        errors.push(ParseError::new(5, "ignored"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_display_includes_position() {
        let error = ParseError::new(12, "Unexpected character 'x'");
        assert_eq!(error.to_string(), "Unexpected character 'x' (at 12)");
    }
}
