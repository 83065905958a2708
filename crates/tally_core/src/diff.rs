//! Display vs raw string comparison
//!
//! The display string is the raw value after formatting, so it carries
//! separators and padding the user never typed. [`first_divergence`] finds the
//! first display position that no longer corresponds to typed input; everything
//! from there on is rendered as placeholder text.

/// Find the first character offset in `display` where it stops matching `raw`.
///
/// Before each comparison an ignored substring found at the current offset of
/// either string is stepped over. Only the first matching entry of `ignored`
/// (in list order) is skipped per step. Offsets count `char`s.
///
/// Returns `None` when the strings match up to ignored substrings.
pub fn first_divergence<S: AsRef<str>>(display: &str, raw: &str, ignored: &[S]) -> Option<usize> {
    let display: Vec<char> = display.chars().collect();
    let raw: Vec<char> = raw.chars().collect();
    let ignored: Vec<Vec<char>> = ignored
        .iter()
        .map(|s| s.as_ref().chars().collect::<Vec<_>>())
        .filter(|s| !s.is_empty())
        .collect();

    let mut display_pos = 0;
    let mut raw_pos = 0;

    while display_pos < display.len() {
        display_pos += ignored_prefix_len(&display[display_pos..], &ignored);
        raw_pos += ignored_prefix_len(&raw[raw_pos..], &ignored);

        if display_pos >= display.len() {
            break;
        }

        // Raw ran out first: everything from here on was synthesized.
        if raw_pos >= raw.len() {
            return Some(display_pos);
        }

        if display[display_pos] != raw[raw_pos] {
            return Some(display_pos);
        }

        display_pos += 1;
        raw_pos += 1;
    }

    // Trailing ignored text in raw still counts as matching
    loop {
        let skip = ignored_prefix_len(&raw[raw_pos.min(raw.len())..], &ignored);
        if skip == 0 {
            break;
        }
        raw_pos += skip;
    }

    if raw_pos < raw.len() {
        return Some(display.len());
    }

    None
}

/// Length of the first ignored string that `text` starts with, or 0.
fn ignored_prefix_len(text: &[char], ignored: &[Vec<char>]) -> usize {
    ignored
        .iter()
        .find(|candidate| text.starts_with(candidate))
        .map_or(0, |candidate| candidate.len())
}
