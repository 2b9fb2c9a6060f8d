//! Fix-it source arithmetic and application
//!
//! Architecture: Domain Services - Pure offset arithmetic relative to a declaration anchor
//! - Replacement ranges always cover the whole original name
//! - The primary pointer is the anchor shifted by a rule-specific offset
//! - Applying fix-its never touches bytes outside the ranges it was given

use crate::domain::source::{SourceLocation, SourceRange};
use crate::domain::violations::{FixIt, NamingError, NamingResult};

/// Anchor-relative inclusive span of `name`: `(0, len - 1)`
pub fn name_extent(name: &str) -> (usize, usize) {
    debug_assert!(!name.is_empty(), "declaration names must not be empty");
    (0, name.len().saturating_sub(1))
}

/// Absolute range covering every byte of `name` written at `anchor`
pub fn locate(anchor: SourceLocation, name: &str) -> SourceRange {
    let (start, end) = name_extent(name);
    SourceRange::new(anchor.with_offset(start), anchor.with_offset(end))
}

/// Where a diagnostic about `name` should point
pub fn primary_location(anchor: SourceLocation, offset_within_name: usize) -> SourceLocation {
    anchor.with_offset(offset_within_name)
}

/// Result of applying a set of fix-its to one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    pub applied: Vec<FixIt>,
    /// Fix-its dropped because they overlapped an applied edit
    pub skipped: Vec<FixIt>,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply fix-its in offset order, skipping any that overlap an earlier one
///
/// Among fix-its starting at the same offset the first one given wins, so a
/// declaration with two violations receives the first rule's correction.
pub fn apply_fixits(source: &str, fixits: &[FixIt]) -> NamingResult<FixOutcome> {
    let mut ordered: Vec<&FixIt> = fixits.iter().collect();
    ordered.sort_by_key(|f| f.range.begin);

    let mut text = String::with_capacity(source.len());
    let mut applied: Vec<FixIt> = Vec::new();
    let mut skipped = Vec::new();
    let mut cursor = 0;

    for fix_it in ordered {
        if applied.last().is_some_and(|prev| prev.range.overlaps(&fix_it.range)) {
            tracing::debug!(
                "Skipping fix-it at {} overlapping an earlier edit (replacement `{}`)",
                fix_it.range.begin,
                fix_it.replacement
            );
            skipped.push(fix_it.clone());
            continue;
        }

        let (start, end) = byte_span(source, &fix_it.range)?;
        text.push_str(&source[cursor..start]);
        text.push_str(&fix_it.replacement);
        cursor = end;
        applied.push(fix_it.clone());
    }

    text.push_str(&source[cursor..]);

    Ok(FixOutcome {
        text,
        applied,
        skipped,
    })
}

/// Exclusive byte span of an inclusive range, widened to a char boundary
fn byte_span(source: &str, range: &SourceRange) -> NamingResult<(usize, usize)> {
    let start = range.begin.offset();
    let mut end = range.end.offset() + 1;

    if end > source.len() || !source.is_char_boundary(start) {
        return Err(NamingError::fix(
            "<buffer>",
            format!(
                "range {}..={} does not fit a {} byte buffer",
                start,
                range.end.offset(),
                source.len()
            ),
        ));
    }

    while !source.is_char_boundary(end) {
        end += 1;
    }

    Ok((start, end))
}
