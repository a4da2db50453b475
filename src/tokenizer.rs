//! Splits reader text into word and separator spans.
//!
//! Offsets are Unicode scalar counts into the original string, computed
//! cumulatively while walking the text, so they line up exactly with
//! the character offsets speech engines report in boundary events.

/// Punctuation treated as separators, matching what the reader strips
/// when a word is picked from a text.
pub const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '(', ')', '«', '»', '\u{201c}', '\u{201d}',
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    /// Char offset of the span's first character in the source text.
    pub start: usize,
    pub is_word: bool,
}

impl TextSpan {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether a char offset into the source text falls inside this span.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.start + self.char_len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if PUNCTUATION.contains(&c) {
        CharClass::Punct
    } else {
        CharClass::Word
    }
}

/// Splits `text` into spans of words and separator runs. Whitespace
/// runs and punctuation runs come out as separate spans. The
/// concatenation of all span texts reproduces the input exactly.
pub fn tokenize(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut current_class = None;
    let mut span_start = 0usize;
    let mut offset = 0usize;

    for c in text.chars() {
        let class = classify(c);
        match current_class {
            Some(prev) if prev == class => current.push(c),
            Some(prev) => {
                spans.push(TextSpan {
                    text: std::mem::take(&mut current),
                    start: span_start,
                    is_word: prev == CharClass::Word,
                });
                span_start = offset;
                current.push(c);
                current_class = Some(class);
            }
            None => {
                current.push(c);
                current_class = Some(class);
                span_start = offset;
            }
        }
        offset += 1;
    }

    if let Some(class) = current_class {
        spans.push(TextSpan {
            text: current,
            start: span_start,
            is_word: class == CharClass::Word,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(spans: &[TextSpan]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_spans() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_single_word() {
        let spans = tokenize("hund");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "hund");
        assert_eq!(spans[0].start, 0);
        assert!(spans[0].is_word);
    }

    #[test]
    fn test_words_and_separators_alternate() {
        let spans = tokenize("Hej, värld!");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hej", ",", " ", "värld", "!"]);
        let words: Vec<bool> = spans.iter().map(|s| s.is_word).collect();
        assert_eq!(words, vec![true, false, false, true, false]);
    }

    #[test]
    fn test_reassembly_is_exact() {
        let inputs = [
            "",
            "Hej  värld",
            "...!!!",
            "En rad.\nEn annan rad, med «citat».\n\nSista raden",
            "   ledande och efterföljande   ",
        ];
        for input in inputs {
            assert_eq!(reassemble(&tokenize(input)), input);
        }
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let input = "Hej hej, säger jag.\nOch «du»?";
        let spans = tokenize(input);
        let mut expected = 0;
        for span in &spans {
            assert_eq!(span.start, expected);
            expected += span.char_len();
        }
        assert_eq!(expected, input.chars().count());
    }

    #[test]
    fn test_repeated_words_get_distinct_offsets() {
        let spans = tokenize("ja ja ja");
        let starts: Vec<usize> = spans
            .iter()
            .filter(|s| s.is_word)
            .map(|s| s.start)
            .collect();
        assert_eq!(starts, vec![0, 3, 6]);
    }

    #[test]
    fn test_delimiter_only_input_has_no_words() {
        let spans = tokenize(" .,! \n ");
        assert!(!spans.is_empty());
        assert!(spans.iter().all(|s| !s.is_word));
        assert_eq!(reassemble(&spans), " .,! \n ");
    }

    #[test]
    fn test_adjacent_punct_and_space_are_separate_spans() {
        let spans = tokenize("slut.  Ny");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["slut", ".", "  ", "Ny"]);
    }

    #[test]
    fn test_newlines_are_plain_whitespace() {
        let spans = tokenize("rad\nrad");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "\n");
        assert!(!spans[1].is_word);
        assert_eq!(spans[2].start, 4);
    }

    #[test]
    fn test_multibyte_offsets_count_chars_not_bytes() {
        let spans = tokenize("åäö öäå");
        assert_eq!(spans[0].char_len(), 3);
        assert_eq!(spans[2].start, 4);
        assert!(spans[2].contains(4));
        assert!(spans[2].contains(6));
        assert!(!spans[2].contains(7));
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let input = "Samma text, samma resultat.";
        assert_eq!(tokenize(input), tokenize(input));
    }
}
