//! Page offset calibration from verbatim quotes

use citeaudit_citations::{normalize_quotes, quoted_spans};
use citeaudit_domain::{ClaimRecord, PageMap, PageOffset, PageTextProvider};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{debug, info};

use crate::error::EvidenceError;

/// First page number of a stated page locator (`"12"`, `"12-14"`, `"12–14"`)
pub fn stated_page_number(stated_page: &str) -> Option<i64> {
    let first = stated_page.trim().split(['-', '–']).next()?.trim();
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    first.parse().ok()
}

/// Median rounded toward negative infinity
///
/// An even count takes the floor of the mean of the two middle values.
pub fn integer_median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]).div_euclid(2))
    }
}

/// Quote-normalized text with whitespace runs collapsed to one space
pub(crate) fn searchable(text: &str) -> String {
    normalize_quotes(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quoted spans of a claim in searchable form
pub(crate) fn claim_quotes(claim_text: &str) -> Vec<String> {
    quoted_spans(claim_text)
        .iter()
        .map(|q| searchable(q))
        .filter(|q| !q.is_empty())
        .collect()
}

/// Pages containing any quote verbatim, ascending
pub fn pages_with_quotes(pages: &PageMap, quotes: &[String]) -> Vec<u32> {
    if quotes.is_empty() {
        return Vec::new();
    }
    pages
        .iter()
        .filter(|(_, text)| {
            let text = searchable(text);
            quotes.iter().any(|q| text.contains(q.as_str()))
        })
        .map(|(page, _)| *page)
        .collect()
}

/// Whether a claim row can contribute an offset instance
fn qualifies(claim: &ClaimRecord) -> bool {
    claim.is_quote && !claim.source_pdf_path.trim().is_empty() && stated_page_number(&claim.stated_page).is_some()
}

/// Derives per-source page offsets from quotes with stated pages
///
/// For each qualifying claim the first quote found on some page yields one
/// instance `stated_page - found_page`. The per-source offset is the
/// integer median of its instances.
#[derive(Debug, Clone, Default)]
pub struct PageOffsetCalibrator;

impl PageOffsetCalibrator {
    /// Create a new calibrator
    pub fn new() -> Self {
        Self
    }

    /// Offset instance for one claim against one source's pages
    pub fn instance(&self, claim: &ClaimRecord, pages: &PageMap) -> Option<i64> {
        let stated = stated_page_number(&claim.stated_page)?;
        claim_quotes(&claim.claim_text).iter().find_map(|quote| {
            pages
                .iter()
                .find(|(_, text)| searchable(text).contains(quote.as_str()))
                .map(|(page, _)| stated - i64::from(*page))
        })
    }

    /// Offset for one source from the claims citing it
    ///
    /// Returns `None` when no claim yields an instance.
    pub fn calibrate_source<'a, I>(&self, source_pdf_path: &str, claims: I, pages: &PageMap) -> Option<PageOffset>
    where
        I: IntoIterator<Item = &'a ClaimRecord>,
    {
        let instances: Vec<i64> = claims
            .into_iter()
            .filter(|c| qualifies(c))
            .filter_map(|c| self.instance(c, pages))
            .collect();

        let offset = integer_median(&instances)?;
        debug!(
            "Offset {} for {} from {} instances",
            offset,
            source_pdf_path,
            instances.len()
        );
        Some(PageOffset {
            source_pdf_path: source_pdf_path.to_string(),
            logical_minus_pdf_offset: offset,
            n_examples: instances.len(),
        })
    }

    /// Offsets for every source cited by a qualifying claim, in path order
    ///
    /// Sources without page text or without any instance get no row.
    pub fn calibrate<P>(&self, claims: &[ClaimRecord], provider: &P) -> Result<Vec<PageOffset>, EvidenceError>
    where
        P: PageTextProvider,
        P::Error: Display,
    {
        let mut by_source: BTreeMap<&str, Vec<&ClaimRecord>> = BTreeMap::new();
        for claim in claims.iter().filter(|c| qualifies(c)) {
            by_source.entry(claim.source_pdf_path.as_str()).or_default().push(claim);
        }

        let mut offsets = Vec::new();
        for (source, source_claims) in by_source {
            let pages = provider.pages(source).map_err(|e| EvidenceError::Provider {
                source_path: source.to_string(),
                message: e.to_string(),
            })?;
            let Some(pages) = pages else {
                debug!("No page text for {}, skipping calibration", source);
                continue;
            };
            if let Some(offset) = self.calibrate_source(source, source_claims, &pages) {
                offsets.push(offset);
            }
        }

        info!("Calibrated page offsets for {} sources", offsets.len());
        Ok(offsets)
    }
}
