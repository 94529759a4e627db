//! Typed price events from comparing a stored price with a fresh scrape.
//!
//! There is no transport here; callers publish these however they like.

use chrono::{DateTime, Utc};
use pricelens_core::ExtractionResult;
use serde::{Deserialize, Serialize};

use crate::locale::PriceLocale;
use crate::normalize::parse_price_value;

/// A fall larger than this many currency units counts as a drop.
pub const PRICE_DROP_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    /// `new - old`, rounded to two decimals.
    pub amount: f64,
    /// Change relative to the old price, in percent, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceEventKind {
    ProductAdded {
        product: ExtractionResult,
    },
    PriceChanged {
        old_price: String,
        new_price: String,
        change: PriceChange,
    },
    PriceDropped {
        old_price: String,
        new_price: String,
        change: PriceChange,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEvent {
    pub url: String,
    pub observed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: PriceEventKind,
}

/// Difference between two price strings; `None` when either does not parse
/// or the old price is not positive.
#[must_use]
pub fn calculate_price_change(
    old_price: &str,
    new_price: &str,
    locale: &PriceLocale,
) -> Option<PriceChange> {
    let old = parse_price_value(old_price, locale)?;
    let new = parse_price_value(new_price, locale)?;
    if old <= 0.0 {
        return None;
    }
    let amount = new - old;
    Some(PriceChange {
        amount: round2(amount),
        percentage: round2(amount / old * 100.0),
    })
}

/// Events implied by moving from `previous_price` to `current`.
///
/// No previous price means the product is new. Otherwise a differing price
/// yields `PriceChanged`, plus `PriceDropped` when it fell by more than
/// [`PRICE_DROP_THRESHOLD`]. A failed or priceless scrape yields nothing.
#[must_use]
pub fn diff_prices(
    url: &str,
    previous_price: Option<&str>,
    current: &ExtractionResult,
    locale: &PriceLocale,
    observed_at: DateTime<Utc>,
) -> Vec<PriceEvent> {
    if current.error.is_some() {
        return Vec::new();
    }
    let event = |kind| PriceEvent {
        url: url.to_string(),
        observed_at,
        kind,
    };

    let Some(old_price) = previous_price else {
        return vec![event(PriceEventKind::ProductAdded {
            product: current.clone(),
        })];
    };
    let Some(new_price) = current.price.as_deref() else {
        return Vec::new();
    };
    let Some(change) = calculate_price_change(old_price, new_price, locale) else {
        tracing::debug!(url, old_price, new_price, "price change not computable");
        return Vec::new();
    };
    if change.amount.abs() < f64::EPSILON {
        return Vec::new();
    }

    let mut events = vec![event(PriceEventKind::PriceChanged {
        old_price: old_price.to_string(),
        new_price: new_price.to_string(),
        change,
    })];
    if -change.amount > PRICE_DROP_THRESHOLD {
        events.push(event(PriceEventKind::PriceDropped {
            old_price: old_price.to_string(),
            new_price: new_price.to_string(),
            change,
        }));
    }
    events
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
