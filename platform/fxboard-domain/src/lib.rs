pub mod quote;
pub mod source;
pub mod symbols;

pub use quote::QuoteRecord;
pub use source::{FeedError, QuoteSource};
