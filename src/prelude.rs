//! Kampus Beken prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    campus::Campus,
    cart::{CartLedger, CartLine},
    errors::{ErrorKind, MarketplaceError, ValidationError},
    filter::{FilterQuery, PriceRange},
    marketplace::{Marketplace, MarketplaceConfig},
    money::format_rupiah,
    products::{Badge, CatalogRepository, PricePolicy, Product, ProductDraft, ProductId},
    receipt::Receipt,
    seed::SeedData,
    session::{LoginOutcome, SessionManager, SessionState},
    storage::{FileStore, KeyValueStore, MemoryStore, PersistentStore, Slot, StorageError},
    users::{Channel, LoginRequest, RegisterRequest, UNKNOWN_SELLER, User, UserDirectory},
};
