//! Response shaping
//!
//! Bounds generated text to its first three ". "-separated fragments.

pub const MAX_SENTENCES: usize = 3;

const SEPARATOR: &str = ". ";

/// Keep at most three fragments and always end with a period.
///
/// Text that already ends in "." keeps its own period and gains another
/// when it has three or fewer fragments ("A." becomes "A..").
pub fn shape(raw_text: &str) -> String {
    let kept: Vec<&str> = raw_text.split(SEPARATOR).take(MAX_SENTENCES).collect();
    let mut shaped = kept.join(SEPARATOR);
    shaped.push('.');
    shaped
}
