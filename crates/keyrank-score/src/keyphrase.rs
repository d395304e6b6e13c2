//! Key phrases: adjacent keywords in the body text.

use std::collections::HashMap;

use keyrank_ingest::{split_sentences, NlpBackend};

use crate::types::ScoredWord;

/// Join keywords that directly follow another keyword within a sentence.
///
/// A run of adjacent keywords is anchored at its first word: `A B C` yields
/// `AB` and `AC`, each scored `score(anchor) + score(word)`. A phrase seen
/// again takes the latest score but keeps its first-seen position. Best
/// first; ties keep first-seen order.
pub fn extract_keyphrases(keywords: &[ScoredWord], nlp: &dyn NlpBackend, body: &str) -> Vec<ScoredWord> {
    let scores: HashMap<&str, f64> = keywords.iter().map(|k| (k.word.as_str(), k.score)).collect();
    let mut phrases: Vec<ScoredWord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sentence in split_sentences(body) {
        let mut anchor: Option<(String, f64)> = None;
        for token in nlp.tag(sentence) {
            let Some(&score) = scores.get(token.word.as_str()) else {
                anchor = None;
                continue;
            };
            let (phrase, score) = match anchor.as_ref() {
                None => {
                    anchor = Some((token.word, score));
                    continue;
                }
                Some((head, head_score)) => (format!("{}{}", head, token.word), head_score + score),
            };
            match index.get(&phrase) {
                Some(&pos) => phrases[pos].score = score,
                None => {
                    index.insert(phrase.clone(), phrases.len());
                    phrases.push(ScoredWord::new(phrase, score));
                }
            }
        }
    }

    phrases.sort_by(|a, b| b.score.total_cmp(&a.score));
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrank_ingest::PretaggedBackend;

    #[test]
    fn test_adjacent_keywords_form_phrases() {
        let keywords = vec![
            ScoredWord::new("深度", 0.5),
            ScoredWord::new("学习", 0.7),
            ScoredWord::new("模型", 0.4),
        ];
        let body = "深度/a 学习/v 模型/n 。 模型/n 的/u 深度/a";
        let phrases = extract_keyphrases(&keywords, &PretaggedBackend::new(), body);

        let words: Vec<&str> = phrases.iter().map(|p| p.word.as_str()).collect();
        assert_eq!(words, vec!["深度学习", "深度模型"]);
        assert!((phrases[0].score - 1.2).abs() < 1e-12);
        assert!((phrases[1].score - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_run_resets_after_non_keyword() {
        let keywords = vec![
            ScoredWord::new("深度", 0.5),
            ScoredWord::new("学习", 0.7),
            ScoredWord::new("模型", 0.4),
        ];
        let body = "深度/a 的/u 学习/v 模型/n";
        let phrases = extract_keyphrases(&keywords, &PretaggedBackend::new(), body);

        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].word, "学习模型");
        assert!((phrases[0].score - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_phrase_takes_latest_score() {
        let keywords = vec![
            ScoredWord::new("神经", 0.9),
            ScoredWord::new("网络模型", 0.1),
            ScoredWord::new("神经网络", 0.2),
            ScoredWord::new("模型", 0.3),
        ];
        let body = "神经/n 网络模型/n 。 神经网络/n 模型/n";
        let phrases = extract_keyphrases(&keywords, &PretaggedBackend::new(), body);

        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].word, "神经网络模型");
        assert!((phrases[0].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phrases_do_not_cross_sentences() {
        let keywords = vec![ScoredWord::new("网络", 0.5), ScoredWord::new("模型", 0.5)];
        let body = "网络/n 。 模型/n";
        assert!(extract_keyphrases(&keywords, &PretaggedBackend::new(), body).is_empty());
    }
}
