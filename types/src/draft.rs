use thiserror::Error;

/// A candidate message that has passed the length window.
///
/// Validation counts characters on the trimmed text, but the original
/// text is preserved and is what goes on the wire. The remote store is
/// authoritative about any further normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft(String);

/// Why a candidate message was refused. Nothing is sent in either case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("message is too short, write at least {} characters", Draft::MIN_CHARS)]
    TooShort { chars: usize },
    #[error("message is too long, keep it under {} characters", Draft::MAX_CHARS)]
    TooLong { chars: usize },
}

impl Draft {
    /// Fewest characters a trimmed message may have.
    pub const MIN_CHARS: usize = 5;
    /// Most characters a trimmed message may have.
    pub const MAX_CHARS: usize = 140;

    pub fn new(message: impl Into<String>) -> Result<Self, DraftError> {
        let message = message.into();
        let chars = message.trim().chars().count();
        if chars < Self::MIN_CHARS {
            return Err(DraftError::TooShort { chars });
        }
        if chars > Self::MAX_CHARS {
            return Err(DraftError::TooLong { chars });
        }
        Ok(Self(message))
    }

    /// Characters left before the ceiling, counted on the raw text the
    /// way a composer counter does. Negative once over.
    #[must_use]
    pub fn remaining(text: &str) -> i64 {
        Self::MAX_CHARS as i64 - text.chars().count() as i64
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Draft {
    type Error = DraftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Draft {
    type Error = DraftError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Draft {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_below_minimum() {
        assert_eq!(Draft::new("hi"), Err(DraftError::TooShort { chars: 2 }));
        assert_eq!(Draft::new("hiya"), Err(DraftError::TooShort { chars: 4 }));
    }

    #[test]
    fn accepts_the_window_edges() {
        assert!(Draft::new("hello").is_ok());
        assert!(Draft::new("x".repeat(140)).is_ok());
    }

    #[test]
    fn rejects_above_maximum() {
        assert_eq!(
            Draft::new("x".repeat(141)),
            Err(DraftError::TooLong { chars: 141 })
        );
    }

    #[test]
    fn counts_trimmed_characters_only() {
        // Four letters padded with whitespace still fall short.
        assert_eq!(
            Draft::new("  hiya   "),
            Err(DraftError::TooShort { chars: 4 })
        );
        // Padding around a valid message does not push it over the top.
        let padded = format!("  {}  ", "x".repeat(140));
        assert!(Draft::new(padded).is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Five multibyte characters clear the minimum even though four
        // of them already exceed it in bytes.
        assert!(Draft::new("ねこかわいい").is_ok());
        assert_eq!(Draft::new("ねこねこ"), Err(DraftError::TooShort { chars: 4 }));
    }

    #[test]
    fn preserves_raw_text() {
        let draft = Draft::new("  spaced out  ").unwrap();
        assert_eq!(draft.as_str(), "  spaced out  ");
        assert_eq!(draft.into_inner(), "  spaced out  ");
    }

    #[test]
    fn remaining_counts_down_from_the_ceiling() {
        assert_eq!(Draft::remaining(""), 140);
        assert_eq!(Draft::remaining("hello"), 135);
        assert_eq!(Draft::remaining(&"x".repeat(141)), -1);
    }

    #[test]
    fn error_text_is_user_facing() {
        let err = Draft::new("hi").unwrap_err();
        assert_eq!(
            err.to_string(),
            "message is too short, write at least 5 characters"
        );
    }
}
