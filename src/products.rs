//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{campus::Campus, errors::ValidationError};

pub mod catalog;

pub use catalog::CatalogRepository;

/// Product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ValidationError::InvalidProductId(s.to_string())),
        }
    }
}

/// Display-only listing badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Discounted listing
    Diskon,
    /// Favourite listing
    Terfavorit,
}

/// A listed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Price in whole rupiah
    pub price: u64,

    /// Seller's campus
    pub campus: Campus,

    /// Lower-cased category
    pub category: String,

    /// Free-form condition, e.g. "Bekas Wajar"
    pub condition: String,

    /// Seller's email identifier; may not resolve to a known user
    pub seller: String,

    /// Opaque image reference
    pub image: String,

    /// Display badges
    #[serde(default)]
    pub badges: SmallVec<[Badge; 2]>,
}

impl Product {
    /// Check whether `identifier` is this product's seller.
    pub fn is_sold_by(&self, identifier: &str) -> bool {
        self.seller == identifier
    }
}

/// Unvalidated fields for a new listing, as typed by the seller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Product name
    pub name: String,

    /// Raw price input
    pub price: String,

    /// Category
    pub category: String,

    /// Condition
    pub condition: String,
}

impl ProductDraft {
    /// Ensure every field is present after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        [
            ("name", &self.name),
            ("price", &self.price),
            ("category", &self.category),
            ("condition", &self.condition),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(ValidationError::MissingField(field)))
    }
}

/// How unparseable price input is handled when posting a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PricePolicy {
    /// Parse leading digits and fall back to a price of 0.
    #[default]
    DefaultToZero,

    /// Reject anything but a plain non-negative integer.
    Reject,
}

impl PricePolicy {
    /// Parse raw price input under this policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPrice`] under [`PricePolicy::Reject`]
    /// when the input is not a plain non-negative integer.
    pub fn parse(self, raw: &str) -> Result<u64, ValidationError> {
        let trimmed = raw.trim();

        match self {
            Self::DefaultToZero => Ok(leading_digits(trimmed).parse().unwrap_or(0)),
            Self::Reject => {
                if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    trimmed
                        .parse()
                        .map_err(|_err| ValidationError::InvalidPrice(raw.to_string()))
                } else {
                    Err(ValidationError::InvalidPrice(raw.to_string()))
                }
            }
        }
    }
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(index, _)| index);

    s.get(..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Jaket Himpunan".to_string(),
            price: "75000".to_string(),
            category: "pakaian".to_string(),
            condition: "Bagus".to_string(),
        }
    }

    #[test]
    fn default_policy_parses_plain_integers() -> TestResult {
        assert_eq!(PricePolicy::DefaultToZero.parse("150000")?, 150_000);
        assert_eq!(PricePolicy::DefaultToZero.parse(" 42 ")?, 42);

        Ok(())
    }

    #[test]
    fn default_policy_keeps_leading_digits() -> TestResult {
        assert_eq!(PricePolicy::DefaultToZero.parse("150000abc")?, 150_000);
        assert_eq!(PricePolicy::DefaultToZero.parse("99.500")?, 99);

        Ok(())
    }

    #[test]
    fn default_policy_falls_back_to_zero() -> TestResult {
        assert_eq!(PricePolicy::DefaultToZero.parse("abc")?, 0);
        assert_eq!(PricePolicy::DefaultToZero.parse("-5000")?, 0);
        assert_eq!(
            PricePolicy::DefaultToZero.parse("99999999999999999999999")?,
            0
        );

        Ok(())
    }

    #[test]
    fn reject_policy_refuses_unparseable_prices() {
        for raw in ["abc", "150000abc", "-5", "1.5", ""] {
            assert_eq!(
                PricePolicy::Reject.parse(raw),
                Err(ValidationError::InvalidPrice(raw.to_string())),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn reject_policy_accepts_plain_integers() -> TestResult {
        assert_eq!(PricePolicy::Reject.parse("250000")?, 250_000);

        Ok(())
    }

    #[test]
    fn draft_validation_names_missing_field() {
        let mut missing_category = draft();
        missing_category.category = "   ".to_string();

        assert_eq!(draft().validate(), Ok(()));
        assert_eq!(
            missing_category.validate(),
            Err(ValidationError::MissingField("category"))
        );
    }

    #[test]
    fn product_id_parses_positive_integers() -> TestResult {
        assert_eq!("4".parse::<ProductId>()?, ProductId::new(4));
        assert!("0".parse::<ProductId>().is_err(), "zero is not an id");
        assert!("batal".parse::<ProductId>().is_err(), "words are not ids");

        Ok(())
    }

    #[test]
    fn product_serializes_with_flat_fields() -> TestResult {
        let product = Product {
            id: ProductId::new(3),
            name: "Dispenser Air Minum Mini".to_string(),
            price: 180_000,
            campus: Campus::Ugm,
            category: "kos".to_string(),
            condition: "Bekas Wajar".to_string(),
            seller: "citra@ugm.ac.id".to_string(),
            image: "dispenser-mini.jpg".to_string(),
            badges: SmallVec::from_slice(&[Badge::Diskon]),
        };

        let json = serde_json::to_value(&product)?;

        assert_eq!(json["id"], 3);
        assert_eq!(json["campus"], "UGM");
        assert_eq!(json["badges"][0], "diskon");

        Ok(())
    }
}
