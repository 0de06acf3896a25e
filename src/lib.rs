//! Kampus Beken
//!
//! Kampus Beken is the state core of a campus second-hand marketplace: a
//! product catalog, a user directory, a login session with a cart, catalog
//! filtering and checkout, persisted slot by slot to a key-value store.

pub mod campus;
pub mod cart;
pub mod errors;
pub mod filter;
pub mod marketplace;
pub mod money;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod seed;
pub mod session;
pub mod storage;
pub mod users;

#[cfg(test)]
mod test_support;
