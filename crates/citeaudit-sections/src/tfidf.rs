//! Document-local tf-idf model over section bodies

use std::collections::HashMap;

use crate::tokenize::tokenize;

/// Sparse term-weight vector
pub type TermVector = HashMap<String, f64>;

/// Term frequencies normalized by token count
pub fn term_frequencies(tokens: &[String]) -> TermVector {
    let mut tf = TermVector::new();
    for t in tokens {
        *tf.entry(t.clone()).or_insert(0.0) += 1.0;
    }
    let n = tokens.len().max(1) as f64;
    for w in tf.values_mut() {
        *w /= n;
    }
    tf
}

/// Cosine similarity of two sparse vectors; 0 when either is empty
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// tf-idf vectors for the sections of one document
///
/// Inverse document frequency is `ln((N + 1) / (df + 1)) + 1` over this
/// document's sections only. Terms unseen in any section weigh 1.
#[derive(Debug, Clone, Default)]
pub struct SectionModel {
    idf: HashMap<String, f64>,
    vectors: Vec<TermVector>,
}

impl SectionModel {
    /// Fit the model to section bodies
    pub fn fit<S: AsRef<str>>(bodies: &[S]) -> Self {
        let tfs: Vec<TermVector> = bodies
            .iter()
            .map(|b| term_frequencies(&tokenize(b.as_ref())))
            .collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for tf in &tfs {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = tfs.len().max(1) as f64;
        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(term, count)| (term.to_string(), ((n + 1.0) / (count as f64 + 1.0)).ln() + 1.0))
            .collect();

        let vectors = tfs.iter().map(|tf| apply_idf(tf, &idf)).collect();
        Self { idf, vectors }
    }

    /// Weighted vector for arbitrary text
    pub fn vectorize(&self, text: &str) -> TermVector {
        apply_idf(&term_frequencies(&tokenize(text)), &self.idf)
    }

    /// Cosine similarity between a vectorized text and section `i`
    pub fn similarity(&self, vector: &TermVector, i: usize) -> f64 {
        self.vectors
            .get(i)
            .map_or(0.0, |section| cosine_similarity(vector, section))
    }

    /// Inverse document frequency of a term
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(1.0)
    }

    /// Number of fitted sections
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether no sections were fitted
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn apply_idf(tf: &TermVector, idf: &HashMap<String, f64>) -> TermVector {
    tf.iter()
        .map(|(t, w)| (t.clone(), w * idf.get(t).copied().unwrap_or(1.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_frequencies_normalized() {
        let tokens: Vec<String> = ["budget", "budget", "cycle", "audit"].iter().map(|s| s.to_string()).collect();
        let tf = term_frequencies(&tokens);
        assert_eq!(tf["budget"], 0.5);
        assert_eq!(tf["cycle"], 0.25);
    }

    #[test]
    fn test_idf_formula() {
        let model = SectionModel::fit(&["budget cycle", "budget audit", "field visits"]);
        // N = 3, df(budget) = 2
        let expected = (4.0f64 / 3.0).ln() + 1.0;
        assert!((model.idf("budget") - expected).abs() < 1e-12);
        assert!((model.idf("visits") - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert_eq!(model.idf("unseen"), 1.0);
    }

    #[test]
    fn test_cosine_identical_and_disjoint() {
        let model = SectionModel::fit(&["budget cycle audit", "field visits"]);
        let v = model.vectorize("budget cycle audit");
        assert!((model.similarity(&v, 0) - 1.0).abs() < 1e-9);
        assert_eq!(model.similarity(&v, 1), 0.0);
        assert_eq!(model.similarity(&v, 9), 0.0);
    }

    #[test]
    fn test_empty_vectors() {
        assert_eq!(cosine_similarity(&TermVector::new(), &TermVector::new()), 0.0);
        let model = SectionModel::fit::<&str>(&[]);
        assert!(model.is_empty());
    }
}
