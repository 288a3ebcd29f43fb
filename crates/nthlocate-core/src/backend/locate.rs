/// Reference locate over characters: 1-based position of `pattern` in
/// `text` searching from character `start`, or 0. A start below 1 searches
/// from the beginning; an empty pattern matches at the start position.
#[must_use]
pub fn locate_chars(text: &str, pattern: &str, start: i64) -> i64 {
    let start = start.max(1);
    if pattern.is_empty() {
        return start;
    }
    let Ok(skip) = usize::try_from(start - 1) else {
        return 0;
    };
    let Some((offset, _)) = text.char_indices().nth(skip) else {
        return 0;
    };
    let tail = &text[offset..];
    tail.find(pattern).map_or(0, |byte_pos| {
        let chars_before = tail[..byte_pos].chars().count();
        i64::try_from(chars_before).map_or(0, |chars_before| start + chars_before)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "Finding not the first () but the second () occurrence of ().";

    #[test]
    fn finds_from_the_beginning() {
        assert_eq!(locate_chars(SCENARIO, "()", 1), 23);
        assert_eq!(locate_chars(SCENARIO, "missing", 1), 0);
    }

    #[test]
    fn honors_start_offset() {
        assert_eq!(locate_chars(SCENARIO, "()", 24), 41);
        assert_eq!(locate_chars(SCENARIO, "()", 41), 41);
        assert_eq!(locate_chars(SCENARIO, "()", 42), 58);
        assert_eq!(locate_chars(SCENARIO, "()", 59), 0);
    }

    #[test]
    fn start_below_one_searches_everything() {
        assert_eq!(locate_chars(SCENARIO, "()", 0), 23);
        assert_eq!(locate_chars(SCENARIO, "()", -10), 23);
    }

    #[test]
    fn start_past_end_is_not_found() {
        assert_eq!(locate_chars("abc", "c", 4), 0);
        assert_eq!(locate_chars("abc", "c", i64::MAX), 0);
    }

    #[test]
    fn empty_pattern_matches_at_start() {
        assert_eq!(locate_chars("abc", "", 1), 1);
        assert_eq!(locate_chars("abc", "", 10), 10);
    }

    #[test]
    fn positions_are_counted_in_characters() {
        assert_eq!(locate_chars("äöü()", "()", 1), 4);
        assert_eq!(locate_chars("日本語の日本", "日本", 2), 5);
    }

    #[test]
    fn overlapping_matches_are_found() {
        assert_eq!(locate_chars("aaa", "aa", 1), 1);
        assert_eq!(locate_chars("aaa", "aa", 2), 2);
        assert_eq!(locate_chars("aaa", "aa", 3), 0);
    }
}
