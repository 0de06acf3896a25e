//! Seed data
//!
//! Demo listings and users used when storage holds no catalog or directory.

use serde::Deserialize;

use crate::{products::Product, users::User};

const SEED_YAML: &str = include_str!("../fixtures/seed.yml");

/// Initial catalog and directory contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Demo listings
    #[serde(default)]
    pub products: Vec<Product>,

    /// Demo users
    #[serde(default)]
    pub users: Vec<User>,
}

impl SeedData {
    /// Parse the bundled demo data.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_norway::Error`] if the bundled YAML is malformed.
    pub fn bundled() -> Result<Self, serde_norway::Error> {
        serde_norway::from_str(SEED_YAML)
    }
}
