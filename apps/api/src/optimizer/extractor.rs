//! Text Extractor — pulls structured values out of free-form backend output.
//!
//! Models wrap JSON in markdown fences and surround it with narrative no
//! matter how firmly the prompt says not to. Extraction either yields a fully
//! valid value or an `ExtractionError`; it never returns partial data.

use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("no JSON array found in response")]
    NoArray,

    #[error("malformed JSON array: {0}")]
    Malformed(String),

    #[error("JSON array contains non-string elements")]
    NotStrings,

    #[error("response contained no text")]
    Empty,
}

/// Extracts a JSON array of strings from `raw`.
///
/// Algorithm: strip every code-fence marker (with its language tag), slice
/// from the first `[` to the last `]` inclusive, and parse the slice.
pub fn extract_array(raw: &str) -> Result<Vec<String>, ExtractionError> {
    let unfenced = strip_fences(raw);

    let start = unfenced.find('[').ok_or(ExtractionError::NoArray)?;
    let end = unfenced.rfind(']').ok_or(ExtractionError::NoArray)?;
    if end < start {
        return Err(ExtractionError::NoArray);
    }

    let items: Vec<Value> = serde_json::from_str(&unfenced[start..=end])
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(ExtractionError::NotStrings),
        })
        .collect()
}

/// Extracts a free-text scalar from `raw`: fences removed, whitespace trimmed,
/// and a single pair of wrapping quotes dropped.
pub fn extract_text(raw: &str) -> Result<String, ExtractionError> {
    let unfenced = strip_fences(raw);
    let trimmed = unfenced.trim();
    let unquoted = strip_wrapping_quotes(trimmed).trim();

    if unquoted.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(unquoted.to_string())
}

/// Removes every ``` marker. A language tag is dropped only when it closes
/// the fence line (```json\n); any other text after a marker is kept.
fn strip_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + FENCE.len()..];
        let tag_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        let line_end = &after[tag_len..];
        rest = if line_end.starts_with('\n') || line_end.starts_with("\r\n") {
            line_end
        } else {
            after
        };
    }
    out.push_str(rest);
    out
}

fn strip_wrapping_quotes(text: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| {
            text.strip_prefix(*q)
                .and_then(|inner| inner.strip_suffix(*q))
        })
        .unwrap_or(text)
}
