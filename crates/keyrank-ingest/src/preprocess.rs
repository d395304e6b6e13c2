//! Preprocessing: document → candidates, sentence context, transitions.

use keyrank_core::{is_disallowed_tag, CandidateSet, CandidateWord, TransitionStatistics};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::nlp::{NlpBackend, TaggedToken};
use crate::sentences::split_sentences;
use crate::stopwords::StopWords;

/// Surface text of the sentences the position feature looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceContext {
    pub title: String,
    pub first: String,
    pub last: String,
}

impl SentenceContext {
    pub fn in_title(&self, word: &str) -> bool {
        self.title.contains(word)
    }

    pub fn in_first_or_last(&self, word: &str) -> bool {
        self.first.contains(word) || self.last.contains(word)
    }
}

/// Everything the preprocess stage produces for one document.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOutput {
    pub candidates: CandidateSet,
    pub sentences: SentenceContext,
    pub transitions: TransitionStatistics,
}

/// Runs segmentation and candidate selection over a document.
pub struct Preprocessor<'a> {
    nlp: &'a dyn NlpBackend,
    stop_words: &'a StopWords,
}

impl<'a> Preprocessor<'a> {
    pub fn new(nlp: &'a dyn NlpBackend, stop_words: &'a StopWords) -> Self {
        Self { nlp, stop_words }
    }

    /// Body sentences in order, then the title as the final sentence.
    pub fn run(&self, doc: &Document) -> PreprocessOutput {
        let mut output = PreprocessOutput::default();

        let body = split_sentences(&doc.body);
        let tagged: Vec<Vec<TaggedToken>> = body
            .iter()
            .copied()
            .chain(std::iter::once(doc.title.trim()))
            .map(|sentence| self.nlp.tag(sentence))
            .collect();

        for tokens in &tagged {
            self.scan(tokens, &mut output);
        }

        // `tagged` always ends with the title.
        let (title, body_tokens) = tagged.split_last().map_or((None, &[][..]), |(t, b)| (Some(t), b));
        output.sentences = SentenceContext {
            title: title.map(|t| surface(t)).unwrap_or_default(),
            first: body_tokens.first().map(|t| surface(t)).unwrap_or_default(),
            last: body_tokens.last().map(|t| surface(t)).unwrap_or_default(),
        };

        debug!(
            "Preprocessed {} sentences: {} candidates, {} transition sources",
            tagged.len(),
            output.candidates.len(),
            output.transitions.outgoing.len()
        );
        output
    }

    fn scan(&self, tokens: &[TaggedToken], output: &mut PreprocessOutput) {
        let mut last_tag = "w";
        let mut last_word = "";

        for token in tokens {
            let word = token.word.as_str();
            let tag = token.tag.as_str();

            if !is_disallowed_tag(last_tag)
                && !is_disallowed_tag(tag)
                && !self.stop_words.contains(word)
                && !self.stop_words.contains(last_word)
            {
                output.transitions.record(last_word, word);
            }
            last_tag = tag;
            last_word = word;

            if self.stop_words.contains(word) {
                continue;
            }
            if let Some(candidate) = CandidateWord::checked(word, tag) {
                output.candidates.insert(candidate);
            }
        }
    }
}

/// Tokens concatenated back into text.
fn surface(tokens: &[TaggedToken]) -> String {
    tokens.iter().map(|t| t.word.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::PretaggedBackend;

    fn run(title: &str, body: &str) -> PreprocessOutput {
        let nlp = PretaggedBackend::new();
        let stop_words = StopWords::builtin();
        Preprocessor::new(&nlp, &stop_words).run(&Document::new(title, body))
    }

    #[test]
    fn test_candidates_in_order_title_last() {
        let out = run("神经/n 网络/n", "深度/a 学习/v 模型/n 。 学习/vn 网络/n");
        let words: Vec<&str> = out.candidates.words().collect();
        assert_eq!(words, vec!["深度", "学习", "模型", "网络", "神经"]);
        assert_eq!(out.candidates.tag_of("学习"), Some("vn"));
    }

    #[test]
    fn test_candidate_filters() {
        let out = run("", "网/n 我们/r 自己/n 快速/d 数据/n 。/w");
        let words: Vec<&str> = out.candidates.words().collect();
        assert_eq!(words, vec!["数据"]);
    }

    #[test]
    fn test_transitions_skip_punctuation_and_stop_words() {
        let out = run("", "神经/n 网络/n ，/w 网络/n 的/u 结构/n");
        assert_eq!(out.transitions.next_count("神经", "网络"), 1);
        // punctuation breaks the chain
        assert_eq!(out.transitions.next_count("网络", "，"), 0);
        assert_eq!(out.transitions.next_count("，", "网络"), 0);
        // stop words break it too
        assert_eq!(out.transitions.next_count("网络", "的"), 0);
        assert_eq!(out.transitions.next_count("的", "结构"), 0);
        assert_eq!(out.transitions.outgoing_total("神经"), 1);
    }

    #[test]
    fn test_transitions_do_not_cross_sentences() {
        let out = run("", "神经/n 。 网络/n");
        assert!(out.transitions.is_empty());
    }

    #[test]
    fn test_sentence_context_is_surface_text() {
        let out = run("神经/n 网络/n", "第一/m 句/q 。 中间/f 。 最后/f 一句/m");
        assert_eq!(out.sentences.title, "神经网络");
        assert_eq!(out.sentences.first, "第一句");
        assert_eq!(out.sentences.last, "最后一句");
        assert!(out.sentences.in_title("网络"));
        assert!(out.sentences.in_first_or_last("一句"));
    }

    #[test]
    fn test_empty_body() {
        let out = run("标题/n", "");
        assert_eq!(out.sentences.first, "");
        assert_eq!(out.sentences.last, "");
        assert_eq!(out.sentences.title, "标题");
        assert!(out.candidates.contains("标题"));
    }
}
