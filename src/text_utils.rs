use unicode_segmentation::UnicodeSegmentation;

/// Length of question previews in the history listing.
pub const PREVIEW_GRAPHEMES: usize = 30;

/// Shorten text to at most `max` grapheme clusters, appending `...` when cut.
///
/// Works on grapheme clusters so Indic scripts with combining marks are
/// never split in the middle of a character.
pub fn preview(text: &str, max: usize) -> String {
    let text = text.trim();
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_untouched() {
        assert_eq!(preview("  total? ", 30), "total?");
    }

    #[test]
    fn long_text_is_cut() {
        assert_eq!(preview("abcdef", 3), "abc...");
    }

    #[test]
    fn combining_marks_stay_together() {
        // "किताब" is 3 grapheme clusters but 5 chars.
        assert_eq!(preview("किताब", 3), "किताब");
        assert_eq!(preview("किताब", 2), "किता...");
    }
}
