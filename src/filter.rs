//! Catalog filtering
//!
//! Computes the visible subset of the catalog for a [`FilterQuery`]. Every
//! given criterion must match; omitted criteria always pass. Results keep
//! catalog order.

use std::str::FromStr;

use tracing::debug;

use crate::{
    campus::Campus, errors::ValidationError, products::Product, users::UserDirectory,
};

/// Inclusive price bounds, written `min-max` where `max` may be the literal
/// `max` for no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: u64,
    max: Option<u64>,
}

impl PriceRange {
    /// Create a range; `max` of `None` is unbounded.
    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Lower bound
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Upper bound, if any
    pub fn max(&self) -> Option<u64> {
        self.max
    }

    /// Check whether `price` lies within the range, bounds included.
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidPriceRange(s.to_string());

        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min = min.trim().parse().map_err(|_err| invalid())?;

        let max = match max.trim() {
            "max" => None,
            bound => Some(bound.parse().map_err(|_err| invalid())?),
        };

        Ok(Self { min, max })
    }
}

/// Filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    text: Option<String>,
    campus: Option<Campus>,
    category: Option<String>,
    price_range: Option<PriceRange>,
}

impl FilterQuery {
    /// A query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match product names or seller names containing `text`, ignoring case.
    /// The text is used as typed, surrounding spaces included; empty text
    /// matches everything.
    #[must_use]
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().to_lowercase();

        self.text = (!text.is_empty()).then_some(text);
        self
    }

    /// Match products from `campus`.
    #[must_use]
    pub fn with_campus(mut self, campus: Campus) -> Self {
        self.campus = Some(campus);
        self
    }

    /// Match products in `category`, compared lower-cased.
    #[must_use]
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        let category = category.as_ref().trim().to_lowercase();

        self.category = (!category.is_empty()).then_some(category);
        self
    }

    /// Match products priced within `range`.
    #[must_use]
    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Check a single product against the query.
    pub fn matches(&self, product: &Product, directory: &UserDirectory) -> bool {
        let text = self.text.as_deref().is_none_or(|text| {
            product.name.to_lowercase().contains(text)
                || directory
                    .display_name(&product.seller)
                    .to_lowercase()
                    .contains(text)
        });

        let campus = self.campus.is_none_or(|campus| product.campus == campus);

        let category = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);

        let price = self
            .price_range
            .is_none_or(|range| range.contains(product.price));

        text && campus && category && price
    }
}

/// Products in `catalog` matching `query`, in catalog order.
pub fn apply<'a>(
    catalog: &'a [Product],
    directory: &UserDirectory,
    query: &FilterQuery,
) -> Vec<&'a Product> {
    let visible: Vec<&Product> = catalog
        .iter()
        .filter(|product| query.matches(product, directory))
        .collect();

    debug!(
        matched = visible.len(),
        total = catalog.len(),
        "filter applied"
    );

    visible
}
