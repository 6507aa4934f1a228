//! Text edits in byte offsets of the original source

use serde::{Deserialize, Serialize};

use super::error::{PatchError, PatchResult};
use crate::shared::models::TextRange;

/// Replace `source[start..end]` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset,
            end: offset,
            new_text: text.into(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            new_text: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, "")
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    pub fn is_insert(&self) -> bool {
        self.start == self.end
    }
}

/// Sort a batch and check it is applicable in one pass
///
/// Zero-width inserts at the same offset keep their relative order and sort
/// before a replacement starting there. Any other shared byte is a conflict.
pub fn normalize_edits(mut edits: Vec<TextEdit>, source_len: usize) -> PatchResult<Vec<TextEdit>> {
    edits.sort_by_key(|e| (e.start, e.end));
    edits.dedup_by(|b, a| !a.is_insert() && a == b);

    let mut previous: Option<TextRange> = None;
    for edit in &edits {
        let range = edit.range();
        if range.start > range.end || range.end > source_len {
            return Err(PatchError::OutOfBounds { range, len: source_len });
        }
        if let Some(prev) = previous {
            if range.start < prev.end {
                return Err(PatchError::ConflictingEdits {
                    first: prev,
                    second: range,
                });
            }
        }
        previous = Some(range);
    }
    Ok(edits)
}

/// Apply a batch of edits against the text they were computed for
pub fn apply_text_edits(source: &str, edits: &[TextEdit]) -> PatchResult<String> {
    let edits = normalize_edits(edits.to_vec(), source.len())?;

    let mut out = String::with_capacity(source.len() + edits.iter().map(|e| e.new_text.len()).sum::<usize>());
    let mut cursor = 0;
    for edit in &edits {
        let range = edit.range();
        let kept = source
            .get(cursor..edit.start)
            .ok_or(PatchError::OutOfBounds { range, len: source.len() })?;
        out.push_str(kept);
        out.push_str(&edit.new_text);
        cursor = edit.end;
    }
    out.push_str(source.get(cursor..).unwrap_or(""));
    Ok(out)
}
