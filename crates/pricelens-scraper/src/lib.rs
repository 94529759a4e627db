pub mod document;
pub mod error;
pub mod events;
pub mod extract;
pub mod generic;
pub mod image;
pub mod locale;
pub mod normalize;
pub mod price;
pub mod sites;
pub mod source;

#[cfg(test)]
mod test_support;

pub use document::{Bounds, Document, ElementSnapshot, HtmlDocument, Viewport};
pub use error::{AccessorError, ScraperError};
pub use events::{calculate_price_change, diff_prices, PriceChange, PriceEvent, PriceEventKind};
pub use generic::GenericRule;
pub use locale::PriceLocale;
pub use normalize::{format_price, normalize_price, parse_price_value, NormalizedPrice};
pub use sites::{extract, SiteRegistry, SiteRule};
pub use source::{scrape, scrape_many, scrape_with_timeout, HttpPageSource, PageSource};
