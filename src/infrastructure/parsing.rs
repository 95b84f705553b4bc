//! HTML and JSON parsing infrastructure for BOOTH pages
//!
//! Listing extraction is written against the [`QueryNode`] capability rather than a
//! concrete DOM, so the same logic runs on `scraper` documents and on hand-built
//! fixture trees. Queries are compiled once per extractor, not per lookup.

pub mod config;
pub mod error;
pub mod listing_parser;
pub mod product_detail_mapper;

// Re-export public types
pub use config::{CompiledSelectors, ListingSelectors};
pub use error::{MappingError, MappingResult, ParsingError, ParsingResult};
pub use listing_parser::{ListingExtractor, total_pages_from_count_text};
pub use product_detail_mapper::ProductDetailMapper;

use scraper::{ElementRef, Selector};

/// Minimal read-only DOM query capability used by the extractors
pub trait QueryNode: Sized {
    /// Compiled form of a CSS selector for this tree type
    type Query;

    /// First descendant matching the query
    fn find(&self, query: &Self::Query) -> Option<Self>;

    /// All descendants matching the query, in document order
    fn find_all(&self, query: &Self::Query) -> Vec<Self>;

    /// Attribute value on this node
    fn attribute(&self, name: &str) -> Option<String>;

    /// Concatenated text of this node and its descendants, untrimmed
    fn text_content(&self) -> String;
}

impl<'a> QueryNode for ElementRef<'a> {
    type Query = Selector;

    fn find(&self, query: &Selector) -> Option<Self> {
        self.select(query).next()
    }

    fn find_all(&self, query: &Selector) -> Vec<Self> {
        self.select(query).collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }
}
