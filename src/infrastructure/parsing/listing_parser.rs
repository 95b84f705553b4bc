//! Listing page extractor
//!
//! Turns a BOOTH listing or search result page into a [`ListingPage`]: the
//! product cards in display order plus a page-count estimate derived from the
//! total-count text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::config::{CompiledSelectors, ListingSelectors};
use super::{ParsingError, ParsingResult, QueryNode};
use crate::domain::product::{ListingPage, ProductOverview};
use crate::infrastructure::config::booth::PAGE_SIZE;

static NON_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("static regex is valid"));

/// Extractor for listing and search result pages
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    selectors: ListingSelectors,
    /// Selectors compiled once for scraper documents
    compiled: CompiledSelectors<Selector>,
}

impl ListingExtractor {
    /// Create an extractor with the default BOOTH selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_selectors(ListingSelectors::default())
    }

    /// Create an extractor with custom selectors, rejecting any that do not compile
    pub fn with_selectors(selectors: ListingSelectors) -> ParsingResult<Self> {
        let compiled = selectors.compile(|field, css| {
            Selector::parse(css)
                .map_err(|e| ParsingError::invalid_selector(field, css, &e.to_string()))
        })?;

        Ok(Self {
            selectors,
            compiled,
        })
    }

    pub fn selectors(&self) -> &ListingSelectors {
        &self.selectors
    }

    /// Parse a raw HTML document
    pub fn extract(&self, html: &str) -> ParsingResult<ListingPage> {
        let document = Html::parse_document(html);
        self.extract_from_tree(&document.root_element(), &self.compiled)
    }

    /// Extract a listing page from any queryable tree rooted at the document,
    /// using `queries` compiled for that tree type
    pub fn extract_from_tree<N: QueryNode>(
        &self,
        root: &N,
        queries: &CompiledSelectors<N::Query>,
    ) -> ParsingResult<ListingPage> {
        if let Some(gate) = root.find(&queries.age_gate_title) {
            let title = gate.text_content();
            let title = title.trim();
            if !title.is_empty() {
                warn!("Listing withheld behind age confirmation: {}", title);
                return Err(ParsingError::age_gate(title));
            }
        }

        let items: Vec<ProductOverview> = root
            .find_all(&queries.product_card)
            .iter()
            .map(|card| self.extract_overview(card, queries))
            .collect();

        let total_pages = root
            .find(&queries.total_count)
            .map_or(0, |node| total_pages_from_count_text(&node.text_content()));

        debug!(
            "Extracted {} products, {} total pages",
            items.len(),
            total_pages
        );

        Ok(ListingPage { total_pages, items })
    }

    /// Build one overview record; missing targets become `None`
    fn extract_overview<N: QueryNode>(
        &self,
        card: &N,
        queries: &CompiledSelectors<N::Query>,
    ) -> ProductOverview {
        let s = &self.selectors;

        let overview = ProductOverview {
            id: numeric_attribute(card, &s.id_attribute),
            brand: card.attribute(&s.brand_attribute),
            category_id: numeric_attribute(card, &s.category_attribute),
            name: trimmed_text(card, &queries.title),
            price: numeric_attribute(card, &s.price_attribute),
            image_url: card
                .find(&queries.thumbnail)
                .and_then(|img| img.attribute(&s.thumbnail_attribute)),
            shop_name: trimmed_text(card, &queries.shop_name),
            shop_url: card
                .find(&queries.shop_anchor)
                .and_then(|anchor| anchor.attribute("href")),
            shop_image_url: card
                .find(&queries.shop_avatar)
                .and_then(|avatar| avatar.attribute("src")),
        };

        if overview.id.is_none() {
            debug!("Listing card without a numeric product id");
        }

        overview
    }
}

/// Page count for a total-count text such as `"1,234件"`.
///
/// Everything but ASCII digits is stripped before parsing; blank or digit-free text yields 0.
pub fn total_pages_from_count_text(text: &str) -> u32 {
    let digits = NON_DIGITS.replace_all(text, "");
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<u64>() {
        Ok(count) => u32::try_from(count.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX),
        Err(e) => {
            warn!("Unparsable total count '{}': {}", text.trim(), e);
            0
        }
    }
}

fn numeric_attribute<N: QueryNode>(node: &N, name: &str) -> Option<u64> {
    node.attribute(name)?.trim().parse().ok()
}

fn trimmed_text<N: QueryNode>(node: &N, query: &N::Query) -> Option<String> {
    node.find(query).map(|el| el.text_content().trim().to_string())
}
