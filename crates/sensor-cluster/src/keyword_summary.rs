//! Per-cluster keyword summaries: top-5 tokens by TF over the cluster
//! divided by IDF over the whole corpus (spec §4.9), reusing the Lexicon's
//! stopword set and tokenizer so cluster keywords and lexicon matching
//! stay on the same token boundaries.

use std::collections::HashMap;

use sensor_core::constants::CLUSTER_KEYWORD_COUNT;
use sensor_lexicon::{tokenize, Lexicon};

/// Document frequency of every non-stopword term across the full corpus,
/// computed once and reused for every cluster's keyword summary.
pub struct CorpusDocumentFrequency {
    doc_freq: HashMap<String, usize>,
    doc_count: usize,
}

impl CorpusDocumentFrequency {
    pub fn compute<'a>(user_texts: impl Iterator<Item = &'a str>, lexicon: &Lexicon) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_count = 0usize;

        for text in user_texts {
            doc_count += 1;
            let mut seen = std::collections::HashSet::new();
            for token in tokenize(text) {
                if lexicon.is_stopword(&token) {
                    continue;
                }
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token).or_insert(0) += 1;
                }
            }
        }

        Self { doc_freq, doc_count }
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.doc_freq.get(term).copied().unwrap_or(1);
        ((self.doc_count.max(1) as f64) / (df as f64)).ln() + 1.0
    }
}

/// Top-`CLUSTER_KEYWORD_COUNT` terms for one cluster's member user texts,
/// ranked by `tf_in_cluster * idf_over_corpus` descending, lexically
/// ascending on ties.
pub fn top_keywords<'a>(
    member_user_texts: impl Iterator<Item = &'a str>,
    corpus_idf: &CorpusDocumentFrequency,
    lexicon: &Lexicon,
) -> Vec<String> {
    let mut tf: HashMap<String, usize> = HashMap::new();
    for text in member_user_texts {
        for token in tokenize(text) {
            if lexicon.is_stopword(&token) {
                continue;
            }
            *tf.entry(token).or_insert(0) += 1;
        }
    }

    let mut scored: Vec<(String, f64)> = tf
        .into_iter()
        .map(|(term, count)| {
            let score = count as f64 * corpus_idf.idf(&term);
            (term, score)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(CLUSTER_KEYWORD_COUNT)
        .map(|(term, _)| term)
        .collect()
}
