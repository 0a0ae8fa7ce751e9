//! Payload extraction from free-form model replies
//!
//! Models often wrap the requested JSON or HTML in prose or code fences. The
//! payload is taken as everything from the first start delimiter up to and
//! including the last end delimiter.

use crate::error::ExtractionError;

/// Delimiter pair bounding the structured part of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// `{` ... `}` (JSON object)
    Brace,
    /// `[` ... `]` (JSON array)
    Bracket,
    /// `<` ... `>` (markup)
    Angle,
}

impl Delimiters {
    pub fn start(self) -> char {
        match self {
            Delimiters::Brace => '{',
            Delimiters::Bracket => '[',
            Delimiters::Angle => '<',
        }
    }

    pub fn end(self) -> char {
        match self {
            Delimiters::Brace => '}',
            Delimiters::Bracket => ']',
            Delimiters::Angle => '>',
        }
    }
}

/// Slice from the first `start` to the last `end`, inclusive.
///
/// Returns an empty string when either delimiter is missing or the last end
/// precedes the first start.
pub fn slice_between(raw: &str, delimiters: Delimiters) -> &str {
    extract_payload(raw, delimiters).unwrap_or("")
}

/// Like [`slice_between`] but reports why nothing could be extracted
pub fn extract_payload(raw: &str, delimiters: Delimiters) -> Result<&str, ExtractionError> {
    let (start, end) = (delimiters.start(), delimiters.end());

    let first = raw.find(start).ok_or(ExtractionError::MissingStart(start))?;
    let last = raw.rfind(end).ok_or(ExtractionError::MissingEnd(end))?;

    if last < first {
        return Err(ExtractionError::Inverted { start, end });
    }

    // Delimiters are single-byte ASCII so `last + 1` is a char boundary
    Ok(&raw[first..=last])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_surrounding_prose() {
        let raw = "Sure! Here is your world:\n```json\n{\"objects\": [{\"name\": \"tree\"}]}\n```\nEnjoy!";
        assert_eq!(
            extract_payload(raw, Delimiters::Brace).unwrap(),
            "{\"objects\": [{\"name\": \"tree\"}]}"
        );
    }

    #[test]
    fn test_uses_first_start_and_last_end() {
        let raw = "a {\"x\": {\"y\": 1}} b }";
        assert_eq!(slice_between(raw, Delimiters::Brace), "{\"x\": {\"y\": 1}} b }");
    }

    #[test]
    fn test_missing_start_is_degenerate() {
        let raw = "I cannot generate that world.}";
        assert_eq!(
            extract_payload(raw, Delimiters::Brace),
            Err(ExtractionError::MissingStart('{'))
        );

        let sliced = slice_between(raw, Delimiters::Brace);
        assert_eq!(sliced, "");
        assert!(serde_json::from_str::<serde_json::Value>(sliced).is_err());
    }

    #[test]
    fn test_missing_end() {
        assert_eq!(
            extract_payload("[{\"name\": \"eat\"}", Delimiters::Bracket),
            Err(ExtractionError::MissingEnd(']'))
        );
    }

    #[test]
    fn test_inverted_delimiters() {
        assert_eq!(
            extract_payload("> then <", Delimiters::Angle),
            Err(ExtractionError::Inverted { start: '<', end: '>' })
        );
    }

    #[test]
    fn test_markup_and_lists() {
        let raw = "Here you go: <div class=\"p-2\">🌲 Tree</div> Hope you like it";
        assert_eq!(
            slice_between(raw, Delimiters::Angle),
            "<div class=\"p-2\">🌲 Tree</div>"
        );

        let raw = "Interactions:\n[{\"name\": \"chop\"}]\n";
        assert_eq!(slice_between(raw, Delimiters::Bracket), "[{\"name\": \"chop\"}]");
    }
}
