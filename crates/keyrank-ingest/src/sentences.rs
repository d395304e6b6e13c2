//! Sentence splitting.

/// Characters that end a sentence.
pub const SENTENCE_DELIMITERS: &[char] = &['。', '！', '？', ';', '；', '!', '?'];

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("今天天气很好。我们去公园！好吗？好; 走");
        assert_eq!(sentences, vec!["今天天气很好", "我们去公园", "好吗", "好", "走"]);
    }

    #[test]
    fn test_split_drops_empty_pieces() {
        assert!(split_sentences("。。！  ？").is_empty());
        assert_eq!(split_sentences("没有标点"), vec!["没有标点"]);
    }
}
