//! Codec error types

use thiserror::Error;

const MALFORMED_TIMESTAMP: &str = "malformed timestamp `";
const MALFORMED_IDENTIFIER: &str = "malformed identifier `";

/// Failure to decode a wire value
///
/// The offending raw text is always kept so it can be echoed back to the
/// client in the error body.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A date/time literal could not be parsed
    #[error("malformed timestamp `{raw}`")]
    MalformedTimestamp {
        /// The text that failed to parse
        raw: String,
    },

    /// An entity key literal could not be parsed
    #[error("malformed identifier `{raw}`")]
    MalformedIdentifier {
        /// The text that failed to parse
        raw: String,
    },

    /// The document itself is not valid JSON or does not match the entity shape
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl CodecError {
    pub(crate) fn timestamp(raw: impl Into<String>) -> Self {
        Self::MalformedTimestamp { raw: raw.into() }
    }

    pub(crate) fn identifier(raw: impl Into<String>) -> Self {
        Self::MalformedIdentifier { raw: raw.into() }
    }

    /// Recover the typed variant from a serde_json error
    ///
    /// Field-level codecs report through `serde::de::Error::custom`, which
    /// only keeps the rendered message, so the variant is read back from it.
    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        if !err.is_data() {
            return Self::Json(err);
        }
        let message = err.to_string();
        if let Some(raw) = quoted_after(&message, MALFORMED_TIMESTAMP) {
            return Self::timestamp(raw);
        }
        if let Some(raw) = quoted_after(&message, MALFORMED_IDENTIFIER) {
            return Self::identifier(raw);
        }
        Self::Json(err)
    }

    /// The raw text that failed to decode, if the error carries one
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::MalformedTimestamp { raw } | Self::MalformedIdentifier { raw } => Some(raw),
            Self::Json(_) => None,
        }
    }
}

fn quoted_after<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(prefix)?;
    let end = rest.rfind('`')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_raw_text() {
        let err = CodecError::timestamp("yesterday");
        assert_eq!(err.to_string(), "malformed timestamp `yesterday`");
        assert_eq!(err.raw(), Some("yesterday"));
    }

    #[test]
    fn test_from_json_recovers_timestamp_variant() {
        let json_err = <serde_json::Error as serde::de::Error>::custom(CodecError::timestamp(
            "2014-13-01T00:00:00Z",
        ));
        match CodecError::from_json(json_err) {
            CodecError::MalformedTimestamp { raw } => assert_eq!(raw, "2014-13-01T00:00:00Z"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_from_json_recovers_identifier_variant() {
        let json_err =
            <serde_json::Error as serde::de::Error>::custom(CodecError::identifier("true"));
        assert!(matches!(
            CodecError::from_json(json_err),
            CodecError::MalformedIdentifier { raw } if raw == "true"
        ));
    }

    #[test]
    fn test_from_json_keeps_syntax_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(CodecError::from_json(json_err), CodecError::Json(_)));
    }
}
