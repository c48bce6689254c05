use std::collections::{HashMap, HashSet};

use hypecycle_common::config::AnalysisConfig;
use hypecycle_common::types::KeywordTrend;

/// Lowercase word tokens. Hyphens inside a word are kept ("scale-up").
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens of every text block of a record, in order.
pub(crate) fn tokenize_all(blocks: &[String]) -> Vec<String> {
    blocks.iter().flat_map(|b| tokenize(b)).collect()
}

/// A set of literal keywords and multi-word phrases matched on token
/// boundaries, so "product" does not match inside "production".
pub(crate) struct Lexicon {
    phrases: Vec<Vec<String>>,
}

impl Lexicon {
    pub(crate) fn new(terms: &[String]) -> Self {
        let phrases = terms
            .iter()
            .map(|t| tokenize(t))
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Total occurrences of all phrases in the token stream.
    pub(crate) fn count_matches(&self, tokens: &[String]) -> usize {
        self.phrases
            .iter()
            .map(|phrase| {
                tokens
                    .windows(phrase.len())
                    .filter(|w| w == &phrase.as_slice())
                    .count()
            })
            .sum()
    }
}

#[derive(Default)]
struct TermCount {
    total: usize,
    recent: usize,
}

/// Keyword results folded into the snapshot.
pub(crate) struct KeywordStats {
    pub top_keywords: Vec<(String, usize)>,
    pub emerging_keywords: Vec<KeywordTrend>,
    pub declining_keywords: Vec<KeywordTrend>,
}

/// Running term frequencies over the whole collection and the recent window.
pub(crate) struct KeywordCounter {
    stop_words: HashSet<String>,
    min_token_length: usize,
    terms: HashMap<String, TermCount>,
    records: usize,
    recent_records: usize,
}

impl KeywordCounter {
    pub(crate) fn new(config: &AnalysisConfig) -> Self {
        Self {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            min_token_length: config.min_token_length,
            terms: HashMap::new(),
            records: 0,
            recent_records: 0,
        }
    }

    fn is_keyword(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_length
            && !token.chars().all(|c| c.is_numeric() || c == '-')
            && !self.stop_words.contains(token)
    }

    /// Count one record's tokens.
    pub(crate) fn observe(&mut self, tokens: &[String], in_recent_window: bool) {
        self.records += 1;
        if in_recent_window {
            self.recent_records += 1;
        }

        for token in tokens {
            if !self.is_keyword(token) {
                continue;
            }
            let count = self.terms.entry(token.clone()).or_default();
            count.total += 1;
            if in_recent_window {
                count.recent += 1;
            }
        }
    }

    pub(crate) fn finish(self, config: &AnalysisConfig) -> KeywordStats {
        let mut top: Vec<(String, usize)> = self
            .terms
            .iter()
            .map(|(term, count)| (term.clone(), count.total))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(config.top_keywords_limit);

        let mut emerging = Vec::new();
        let mut declining = Vec::new();

        if self.records > 0 && self.recent_records > 0 {
            let ratio = config.emerging_keyword_ratio;

            for (term, count) in &self.terms {
                if count.total < config.emerging_keyword_min_count {
                    continue;
                }

                let full_rate = count.total as f64 / self.records as f64;
                let recent_rate = count.recent as f64 / self.recent_records as f64;
                let trend = KeywordTrend {
                    term: term.clone(),
                    total_count: count.total,
                    recent_count: count.recent,
                    lift: recent_rate / full_rate,
                };

                if recent_rate > full_rate * ratio {
                    emerging.push(trend);
                } else if full_rate > recent_rate * ratio {
                    declining.push(trend);
                }
            }
        }

        emerging.sort_by(|a, b| {
            b.lift
                .total_cmp(&a.lift)
                .then_with(|| b.total_count.cmp(&a.total_count))
                .then_with(|| a.term.cmp(&b.term))
        });
        emerging.truncate(config.emerging_keywords_limit);

        declining.sort_by(|a, b| {
            a.lift
                .total_cmp(&b.lift)
                .then_with(|| b.total_count.cmp(&a.total_count))
                .then_with(|| a.term.cmp(&b.term))
        });
        declining.truncate(config.emerging_keywords_limit);

        KeywordStats {
            top_keywords: top,
            emerging_keywords: emerging,
            declining_keywords: declining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_keeps_inner_hyphens() {
        assert_eq!(
            tokenize("Scale-up of CRISPR-based yeast: a -novel- process!"),
            words(&["scale-up", "of", "crispr-based", "yeast", "a", "novel", "process"])
        );
    }

    #[test]
    fn test_lexicon_matches_phrases_on_token_boundaries() {
        let lexicon = Lexicon::new(&words(&["product", "in vitro", "scale-up"]));
        let tokens = tokenize("In vitro production of a product; in vitro scale-up.");
        // "production" must not count as "product"
        assert_eq!(lexicon.count_matches(&tokens), 4);
    }

    #[test]
    fn test_top_keywords_ties_are_lexicographic() {
        let config = AnalysisConfig {
            stop_words: words(&["with"]),
            ..AnalysisConfig::default()
        };
        let mut counter = KeywordCounter::new(&config);
        counter.observe(&tokenize("zeta alpha with beta 2024"), false);
        counter.observe(&tokenize("beta zeta alpha with"), false);
        counter.observe(&tokenize("zeta"), false);

        let stats = counter.finish(&config);
        assert_eq!(
            stats.top_keywords,
            vec![
                ("zeta".to_string(), 3),
                ("alpha".to_string(), 2),
                ("beta".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_emerging_requires_min_count() {
        let config = AnalysisConfig::default();
        let mut counter = KeywordCounter::new(&config);
        for _ in 0..8 {
            counter.observe(&tokenize("background"), false);
        }
        // Two recent occurrences: lift is high but below the minimum count.
        counter.observe(&tokenize("quantum"), true);
        counter.observe(&tokenize("quantum"), true);

        let stats = counter.finish(&config);
        assert!(stats.emerging_keywords.is_empty());
        assert_eq!(stats.declining_keywords.len(), 1);
        assert_eq!(stats.declining_keywords[0].term, "background");
        assert_eq!(stats.declining_keywords[0].recent_count, 0);
    }

    #[test]
    fn test_no_recent_records_means_no_trends() {
        let config = AnalysisConfig::default();
        let mut counter = KeywordCounter::new(&config);
        for _ in 0..5 {
            counter.observe(&tokenize("steady keyword"), false);
        }
        let stats = counter.finish(&config);
        assert!(stats.emerging_keywords.is_empty());
        assert!(stats.declining_keywords.is_empty());
    }
}
