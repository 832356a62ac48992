//! Cursor-position helpers that turn editor text into lookup keys.
//!
//! Columns are character indices into a single line of text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Last dotted word in the text, preceded by whitespace or an open paren/bracket.
static PRIOR_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s(\[]([A-Za-z0-9_.]+)\s*$").expect("prior word pattern is valid")
});

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Get the word typed immediately before the cursor.
///
/// `line_to_cursor` is the current line truncated at the cursor. The word may
/// be a member-access chain such as `request.auth.` so that callers can tell
/// a member completion (trailing `.`) from a directive completion.
///
/// # Example
/// ```
/// use firerules::core::prior_word;
///
/// assert_eq!(prior_word("if request.auth."), Some("request.auth.".to_string()));
/// assert_eq!(prior_word("allow read, write:"), None);
/// ```
pub fn prior_word(line_to_cursor: &str) -> Option<String> {
    PRIOR_WORD
        .captures(line_to_cursor)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Get the text of a word range already identified by the editor.
///
/// Returns `None` when the range is absent, empty or outside the line.
pub fn current_word(line: &str, range: Option<Range<usize>>) -> Option<String> {
    let range = range?;
    if range.is_empty() {
        return None;
    }

    let word: String = line
        .chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect();

    (word.chars().count() == range.end - range.start).then_some(word)
}

/// Find the boundaries of the word at the given column.
///
/// Returns `start..end` where `end` is the index after the last word
/// character, or `None` if the column is not on a word. A column just past
/// the end of a word selects that word, as editors do for a cursor placed
/// after it. Hosts that do not provide their own word ranges feed the
/// result to [`current_word`].
pub fn word_range_at(line: &str, column: usize) -> Option<Range<usize>> {
    let chars: Vec<char> = line.chars().collect();
    let is_word_at = |index: usize| chars.get(index).is_some_and(|&c| is_word_character(c));

    let column = if is_word_at(column) {
        column
    } else if column > 0 && is_word_at(column - 1) {
        column - 1
    } else {
        return None;
    };

    let mut start = column;
    while start > 0 && is_word_character(chars[start - 1]) {
        start -= 1;
    }

    let mut end = column;
    while end < chars.len() && is_word_character(chars[end]) {
        end += 1;
    }

    Some(start..end)
}
