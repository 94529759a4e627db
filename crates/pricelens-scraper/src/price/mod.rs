//! Price disambiguation: choosing one price from many on-page candidates.
//!
//! Both paths share the same outlier guard. When several candidates are
//! plausible, the one nearest the mean of their values wins, which keeps a
//! crossed-out list price or an installment amount from being reported.

pub mod dom;
pub mod raw;

pub use dom::extract_dom_price;
pub use raw::extract_raw_text_price;

/// Candidates scoring at least this close to the best score compete on value.
pub const NEAR_MAX_BAND: u32 = 5;

/// One price found on the page, before selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCandidate {
    pub raw_text: String,
    pub value: f64,
    pub priority: u32,
    pub source_selector: String,
}

/// Picks from DOM candidates by score, then by closeness to the mean.
///
/// Candidates are ranked by priority (stable, so document order breaks
/// ties). Everything within [`NEAR_MAX_BAND`] of the top score forms the
/// near-max set; with more than one member, the member closest to the set's
/// mean value wins, the higher-ranked one on exact ties.
#[must_use]
pub fn select_by_priority(mut candidates: Vec<PriceCandidate>) -> Option<PriceCandidate> {
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    let best = candidates.first()?.priority;
    let near_max: Vec<PriceCandidate> = candidates
        .into_iter()
        .filter(|c| c.priority + NEAR_MAX_BAND >= best)
        .collect();
    closest_to_mean(near_max)
}

/// The candidate whose value is nearest the mean of all values; the earliest
/// wins on exact ties.
#[must_use]
#[allow(clippy::cast_precision_loss)] // candidate counts are tiny
pub fn closest_to_mean(candidates: Vec<PriceCandidate>) -> Option<PriceCandidate> {
    if candidates.len() <= 1 {
        return candidates.into_iter().next();
    }
    let mean = candidates.iter().map(|c| c.value).sum::<f64>() / candidates.len() as f64;

    let mut best: Option<(f64, PriceCandidate)> = None;
    for candidate in candidates {
        let distance = (candidate.value - mean).abs();
        if best.as_ref().map_or(true, |(d, _)| distance < *d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, c)| c)
}
