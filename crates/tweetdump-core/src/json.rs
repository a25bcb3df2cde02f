//! Human-readable JSON output shared by the credentials file and the
//! collection output files.

use serde::Serialize;

/// Serializes `value` as UTF-8 JSON with four-space indentation.
///
/// Non-ASCII characters are written literally, not as `\u` escapes.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if `value` cannot be serialized.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_with_four_spaces() {
        let out = to_indented_json(&serde_json::json!({"a": [1]})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn keeps_non_ascii_literal() {
        let out = to_indented_json(&"héllo 🦀").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"héllo 🦀\"");
    }
}
