//! Per-claim evidence retrieval

use citeaudit_domain::{
    ClaimRecord, EvidenceChunk, EvidenceQuery, EvidenceStrategy, PageMap, PageOffset, PageTextProvider,
};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use tracing::{debug, info};

use crate::chunking::{PageChunker, Window};
use crate::config::RetrievalConfig;
use crate::error::EvidenceError;
use crate::offset::{claim_quotes, pages_with_quotes, stated_page_number};
use crate::similarity::token_set_ratio;

/// Score given to windows on an anchored page
pub const ANCHOR_SCORE: u8 = 100;

/// Windows of one source, ready for repeated retrieval
#[derive(Debug, Clone)]
pub struct SourceWindows {
    pages: PageMap,
    windows: Vec<Window>,
}

impl SourceWindows {
    /// The source's pages
    pub fn pages(&self) -> &PageMap {
        &self.pages
    }

    /// The source's windows in page order
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }
}

/// Candidate windows assembled under the top-k cap
struct Candidates<'a> {
    windows: &'a [Window],
    used: HashSet<usize>,
    chosen: Vec<EvidenceChunk>,
}

impl<'a> Candidates<'a> {
    fn new(windows: &'a [Window]) -> Self {
        Self {
            windows,
            used: HashSet::new(),
            chosen: Vec::new(),
        }
    }

    /// Add up to `max_add` unused windows covering any target page
    fn add_pages(&mut self, targets: &[u32], max_add: usize, origin: EvidenceStrategy) {
        let mut added = 0;
        for (i, window) in self.windows.iter().enumerate() {
            if added >= max_add {
                break;
            }
            if self.used.contains(&i) || !targets.iter().any(|p| window.covers(*p)) {
                continue;
            }
            self.used.insert(i);
            self.chosen.push(chunk(window, ANCHOR_SCORE, origin));
            added += 1;
        }
    }

    /// Fill `slots` with the most similar unused windows
    fn add_fuzzy(&mut self, claim_text: &str, slots: usize) {
        let mut ranked: Vec<(usize, u8)> = self
            .windows
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.used.contains(i))
            .map(|(i, w)| (i, token_set_ratio(claim_text, &w.text)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (i, score) in ranked.into_iter().take(slots) {
            self.used.insert(i);
            self.chosen.push(chunk(&self.windows[i], score, EvidenceStrategy::Fuzzy));
        }
    }
}

fn chunk(window: &Window, score: u8, origin: EvidenceStrategy) -> EvidenceChunk {
    EvidenceChunk {
        page_start: window.page_start,
        page_end: window.page_end,
        text: window.text.clone(),
        score,
        origin,
    }
}

/// Ranks source windows as evidence for claims
///
/// Strategies run in order under a shared `top_k` cap: windows on pages
/// where a quote from the claim appears verbatim, windows on the page the
/// stated page maps to through the source's offset, then the most similar
/// remaining windows.
#[derive(Debug, Clone)]
pub struct EvidenceRetriever {
    config: RetrievalConfig,
    chunker: PageChunker,
}

impl EvidenceRetriever {
    /// Create a retriever, validating the configuration
    pub fn new(config: RetrievalConfig) -> Result<Self, EvidenceError> {
        config.validate().map_err(EvidenceError::Config)?;
        let chunker = PageChunker::from_config(&config);
        Ok(Self { config, chunker })
    }

    /// The retrieval configuration
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Chunk a source's pages
    pub fn prepare(&self, pages: PageMap) -> SourceWindows {
        let windows = self.chunker.chunk(&pages);
        SourceWindows { pages, windows }
    }

    /// Ranked evidence for one claim, best first, at most `top_k` items
    pub fn retrieve(&self, claim: &ClaimRecord, source: &SourceWindows, offset: Option<&PageOffset>) -> Vec<EvidenceChunk> {
        let top_k = self.config.top_k;
        let mut candidates = Candidates::new(&source.windows);

        if claim.is_quote {
            let quote_pages = pages_with_quotes(&source.pages, &claim_quotes(&claim.claim_text));
            if !quote_pages.is_empty() {
                candidates.add_pages(&quote_pages, top_k, EvidenceStrategy::ExactQuote);
            }
        }

        let mapped = offset.and_then(|o| {
            let stated = stated_page_number(&claim.stated_page)?;
            o.to_physical(stated).filter(|p| source.pages.contains_key(p))
        });
        if let Some(page) = mapped {
            let max_add = top_k.saturating_sub(candidates.chosen.len()).max(1);
            candidates.add_pages(&[page], max_add, EvidenceStrategy::OffsetPage);
        }

        if candidates.chosen.len() < top_k {
            let slots = top_k - candidates.chosen.len();
            candidates.add_fuzzy(&claim.claim_text, slots);
        }

        let mut chosen = candidates.chosen;
        chosen.truncate(top_k);
        chosen
    }

    /// Evidence query record for one claim
    ///
    /// A claim without a source or without page text gets empty evidence.
    pub fn query(&self, claim: &ClaimRecord, source: Option<&SourceWindows>, offset: Option<&PageOffset>) -> EvidenceQuery {
        let evidence = source
            .map(|s| self.retrieve(claim, s, offset).iter().map(EvidenceChunk::to_item).collect())
            .unwrap_or_default();
        EvidenceQuery::new(claim, evidence)
    }

    /// Evidence queries for all claims, in claim order
    ///
    /// Page text is fetched and chunked once per source.
    pub fn retrieve_all<P>(
        &self,
        claims: &[ClaimRecord],
        provider: &P,
        offsets: &[PageOffset],
    ) -> Result<Vec<EvidenceQuery>, EvidenceError>
    where
        P: PageTextProvider,
        P::Error: Display,
    {
        let offsets: HashMap<&str, &PageOffset> = offsets
            .iter()
            .map(|o| (o.source_pdf_path.as_str(), o))
            .collect();
        let mut sources: HashMap<String, Option<SourceWindows>> = HashMap::new();
        let mut queries = Vec::with_capacity(claims.len());
        let mut empty = 0;

        for claim in claims {
            let path = claim.source_pdf_path.trim();
            if path.is_empty() {
                debug!("Claim {} has no resolved source", claim.claim_id);
                empty += 1;
                queries.push(EvidenceQuery::new(claim, Vec::new()));
                continue;
            }

            if !sources.contains_key(path) {
                let pages = provider.pages(path).map_err(|e| EvidenceError::Provider {
                    source_path: path.to_string(),
                    message: e.to_string(),
                })?;
                if pages.is_none() {
                    debug!("No page text for {}", path);
                }
                sources.insert(path.to_string(), pages.map(|p| self.prepare(p)));
            }

            let source = sources.get(path).and_then(Option::as_ref);
            if source.is_none() {
                empty += 1;
            }
            queries.push(self.query(claim, source, offsets.get(path).copied()));
        }

        info!(
            "Retrieved evidence for {} claims across {} sources ({} without text)",
            queries.len(),
            sources.len(),
            empty
        );
        Ok(queries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeaudit_domain::{Citation, CitationKind, ClaimFlags, ClaimKey, Span};

    fn claim(text: &str, is_quote: bool, stated: Option<&str>) -> ClaimRecord {
        let citation = Citation {
            citation_text: "(Smith, 2010)".to_string(),
            kind: CitationKind::Parenthetical,
            author: "Smith".to_string(),
            year: "2010".to_string(),
            stated_page: stated.map(str::to_string),
            primary_mentioned_author: None,
            primary_mentioned_year: None,
            span: Span::new(0, 13),
        };
        let flags = ClaimFlags {
            is_quote,
            ..ClaimFlags::default()
        };
        let mut record = ClaimRecord::from_citation(ClaimKey::new("r", "s", "c"), text, flags, &citation);
        record.source_pdf_path = "Smith_2010.pdf".to_string();
        record
    }

    fn pages() -> PageMap {
        [
            (1, "Introduction to public budgeting"),
            (2, "Ministries rarely use evaluation findings in budget decisions"),
            (3, "Evaluation is a political act in every context"),
            (4, "Appendix tables and annex material"),
        ]
        .into_iter()
        .map(|(n, t)| (n, t.to_string()))
        .collect()
    }

    fn retriever(top_k: usize) -> EvidenceRetriever {
        EvidenceRetriever::new(RetrievalConfig {
            chunk_words: 50,
            stride: 25,
            top_k,
            cross_page: false,
        })
        .unwrap()
    }

    fn offset(value: i64) -> PageOffset {
        PageOffset {
            source_pdf_path: "Smith_2010.pdf".to_string(),
            logical_minus_pdf_offset: value,
            n_examples: 1,
        }
    }

    #[test]
    fn test_exact_quote_first() {
        let r = retriever(3);
        let source = r.prepare(pages());
        let result = r.retrieve(&claim("It is “a political act” (Smith, 2010).", true, None), &source, None);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].page_range(), "3");
        assert_eq!(result[0].score, 100);
        assert_eq!(result[0].origin, EvidenceStrategy::ExactQuote);
        assert!(result[1..].iter().all(|c| c.origin == EvidenceStrategy::Fuzzy));
    }

    #[test]
    fn test_offset_page_then_fuzzy_without_duplicates() {
        let r = retriever(4);
        let source = r.prepare(pages());
        let c = claim("Budget decisions ignore evaluation findings.", false, Some("12"));
        let result = r.retrieve(&c, &source, Some(&offset(10)));

        assert_eq!(result[0].page_range(), "2");
        assert_eq!(result[0].origin, EvidenceStrategy::OffsetPage);
        assert_eq!(result.len(), 4);
        let ranges: HashSet<String> = result.iter().map(|c| c.page_range()).collect();
        assert_eq!(ranges.len(), 4);
    }

    #[test]
    fn test_offset_outside_document_is_ignored() {
        let r = retriever(2);
        let source = r.prepare(pages());
        let c = claim("Budget decisions ignore evaluation findings.", false, Some("40"));
        let result = r.retrieve(&c, &source, Some(&offset(10)));
        assert!(result.iter().all(|c| c.origin == EvidenceStrategy::Fuzzy));
        assert_eq!(result[0].page_range(), "2");
        assert!(result[0].score >= result[1].score);
    }

    #[test]
    fn test_quote_offset_and_fuzzy_in_one_list() {
        let r = retriever(4);
        let source = r.prepare(pages());
        let c = claim("Ministries treat budgets as “a political act” (Smith, 2010, p. 12).", true, Some("12"));
        let result = r.retrieve(&c, &source, Some(&offset(10)));

        let origins: Vec<EvidenceStrategy> = result.iter().map(|c| c.origin).collect();
        assert_eq!(
            origins,
            vec![
                EvidenceStrategy::ExactQuote,
                EvidenceStrategy::OffsetPage,
                EvidenceStrategy::Fuzzy,
                EvidenceStrategy::Fuzzy
            ]
        );
        assert_eq!(result[0].page_range(), "3");
        assert_eq!(result[1].page_range(), "2");
        assert!(result.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn test_missing_offset_does_not_shift() {
        let r = retriever(1);
        let source = r.prepare(pages());
        let c = claim("Appendix tables.", false, Some("3"));
        let result = r.retrieve(&c, &source, None);
        assert_eq!(result[0].origin, EvidenceStrategy::Fuzzy);
        assert_eq!(result[0].page_range(), "4");
    }

    #[test]
    fn test_query_without_source_has_no_evidence() {
        let r = retriever(5);
        let c = claim("Anything.", false, None);
        let query = r.query(&c, None, None);
        assert!(query.evidence.is_empty());
        assert_eq!(query.source_pdf_path, "Smith_2010.pdf");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RetrievalConfig {
            top_k: 0,
            ..RetrievalConfig::default()
        };
        assert!(matches!(EvidenceRetriever::new(config), Err(EvidenceError::Config(_))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use citeaudit_domain::{Citation, CitationKind, ClaimFlags, ClaimKey, Span};
    use proptest::prelude::*;

    const VOCAB: [&str; 8] = ["budget", "evaluation", "ministry", "policy", "act", "use", "report", "finding"];

    fn text_from(indices: &[usize]) -> String {
        indices.iter().map(|i| VOCAB[i % VOCAB.len()]).collect::<Vec<_>>().join(" ")
    }

    fn record(text: &str, is_quote: bool, stated: Option<u32>) -> ClaimRecord {
        let citation = Citation {
            citation_text: "(Smith, 2010)".to_string(),
            kind: CitationKind::Parenthetical,
            author: "Smith".to_string(),
            year: "2010".to_string(),
            stated_page: stated.map(|p| p.to_string()),
            primary_mentioned_author: None,
            primary_mentioned_year: None,
            span: Span::new(0, 13),
        };
        let flags = ClaimFlags {
            is_quote,
            ..ClaimFlags::default()
        };
        ClaimRecord::from_citation(ClaimKey::new("r", "s", "c"), text, flags, &citation)
    }

    proptest! {
        /// Property: retrieval returns at most top_k items with non-increasing scores
        #[test]
        fn test_top_k_and_score_order(
            page_words in proptest::collection::vec(proptest::collection::vec(0usize..8, 0..30), 1..6),
            claim_words in proptest::collection::vec(0usize..8, 0..10),
            quoted in proptest::option::of(proptest::collection::vec(0usize..8, 1..3)),
            stated in proptest::option::of(1u32..12),
            shift in proptest::option::of(-3i64..4),
            top_k in 1usize..8,
            chunk_words in 1usize..12,
            stride_seed in 0usize..12,
        ) {
            let config = RetrievalConfig {
                chunk_words,
                stride: 1 + stride_seed % chunk_words,
                top_k,
                cross_page: false,
            };
            let retriever = EvidenceRetriever::new(config).unwrap();
            let pages: PageMap = page_words
                .iter()
                .enumerate()
                .map(|(i, words)| (i as u32 + 1, text_from(words)))
                .collect();
            let source = retriever.prepare(pages);

            let mut text = text_from(&claim_words);
            if let Some(q) = &quoted {
                text = format!("{} \"{}\"", text, text_from(q));
            }
            let claim = record(&text, quoted.is_some(), stated);
            let offset = shift.map(|value| PageOffset {
                source_pdf_path: "s.pdf".to_string(),
                logical_minus_pdf_offset: value,
                n_examples: 1,
            });

            let result = retriever.retrieve(&claim, &source, offset.as_ref());
            prop_assert!(result.len() <= top_k);
            prop_assert_eq!(result.len(), top_k.min(source.windows().len()));
            prop_assert!(result.windows(2).all(|pair| pair[0].score >= pair[1].score));
        }
    }
}
