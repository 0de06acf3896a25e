//! Catalog Repository

use smallvec::SmallVec;
use tracing::{info, warn};

use crate::{
    campus::Campus,
    errors::MarketplaceError,
    products::{PricePolicy, Product, ProductDraft, ProductId},
    storage::{KeyValueStore, PersistentStore, Slot},
};

/// Owns the product collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRepository {
    products: Vec<Product>,
}

impl CatalogRepository {
    /// Create a repository over an existing collection.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from storage, starting from `default` when the slot
    /// is absent or malformed.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketplaceError::StorageUnavailable`] if storage cannot be read.
    pub fn load<S: KeyValueStore>(
        store: &PersistentStore<S>,
        default: Vec<Product>,
    ) -> Result<Self, MarketplaceError> {
        Ok(Self::new(store.load(Slot::Products, default)?))
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by id.
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// The id the next created product will receive: one past the largest
    /// existing id, or 1 for an empty catalog.
    pub fn next_id(&self) -> ProductId {
        self.products
            .iter()
            .map(|product| product.id.get())
            .max()
            .map_or(ProductId::new(1), |max| {
                ProductId::new(max.saturating_add(1))
            })
    }

    /// Validate `draft` and list it for `owner`, persisting the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::ValidationFailed`] if a draft field is
    /// missing (or the price is rejected by `policy`), and
    /// [`MarketplaceError::StorageUnavailable`] if the catalog could not be
    /// saved. The catalog is unchanged on error.
    pub fn create<S: KeyValueStore>(
        &mut self,
        draft: &ProductDraft,
        owner_campus: Campus,
        owner: &str,
        policy: PricePolicy,
        store: &mut PersistentStore<S>,
    ) -> Result<Product, MarketplaceError> {
        draft.validate()?;

        let price = policy.parse(&draft.price)?;
        let name = draft.name.trim().to_string();
        let image = format!(
            "placeholder-{}.jpg",
            name.chars().take(5).collect::<String>()
        );

        let product = Product {
            id: self.next_id(),
            name,
            price,
            campus: owner_campus,
            category: draft.category.trim().to_lowercase(),
            condition: draft.condition.trim().to_string(),
            seller: owner.to_string(),
            image,
            badges: SmallVec::new(),
        };

        let mut next = self.products.clone();
        next.push(product.clone());

        store.save(Slot::Products, &next)?;
        self.products = next;

        info!(id = %product.id, seller = owner, "product listed");

        Ok(product)
    }

    /// Remove the product `id` if `owner` is its seller, persisting the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotFoundOrForbidden`] both when no such
    /// product exists and when `owner` is not its seller, and
    /// [`MarketplaceError::StorageUnavailable`] if the catalog could not be
    /// saved. The catalog is unchanged on error.
    pub fn remove<S: KeyValueStore>(
        &mut self,
        id: ProductId,
        owner: &str,
        store: &mut PersistentStore<S>,
    ) -> Result<Product, MarketplaceError> {
        let Some(position) = self
            .products
            .iter()
            .position(|product| product.id == id && product.is_sold_by(owner))
        else {
            warn!(%id, owner, "delete refused");

            return Err(MarketplaceError::NotFoundOrForbidden);
        };

        let mut next = self.products.clone();
        let removed = next.remove(position);

        store.save(Slot::Products, &next)?;
        self.products = next;

        info!(%id, seller = owner, "product removed");

        Ok(removed)
    }

    /// Products listed by `seller`, in insertion order.
    pub fn list_by_seller(&self, seller: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.is_sold_by(seller))
            .collect()
    }

    /// Number of listed products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        errors::ValidationError,
        storage::{MemoryStore, MockKeyValueStore, StorageError},
        test_support::product,
    };

    use super::*;

    fn draft(name: &str, price: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: price.to_string(),
            category: "  Elektronik ".to_string(),
            condition: "Seperti Baru".to_string(),
        }
    }

    fn catalog_with_ids(ids: &[u64]) -> CatalogRepository {
        CatalogRepository::new(
            ids.iter()
                .map(|id| product(*id, "seller@ui.ac.id", 10_000))
                .collect(),
        )
    }

    #[test]
    fn next_id_of_empty_catalog_is_one() {
        assert_eq!(CatalogRepository::default().next_id(), ProductId::new(1));
    }

    #[test]
    fn next_id_skips_past_gaps() {
        let catalog = catalog_with_ids(&[1, 2, 3, 5]);

        assert_eq!(catalog.next_id(), ProductId::new(6));
    }

    #[test]
    fn next_id_exceeds_every_existing_id() {
        for ids in [&[7][..], &[3, 1, 2][..], &[10, 4, 99, 12][..]] {
            let catalog = catalog_with_ids(ids);
            let next = catalog.next_id();

            assert!(
                catalog.products().iter().all(|p| p.id < next),
                "{next} should exceed {ids:?}"
            );
        }
    }

    #[test]
    fn find_by_id_returns_none_for_unknown_id() {
        let catalog = catalog_with_ids(&[1, 2]);

        assert!(catalog.find_by_id(ProductId::new(2)).is_some());
        assert!(catalog.find_by_id(ProductId::new(9)).is_none());
    }

    #[test]
    fn create_assigns_owner_fields_and_persists() -> TestResult {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = catalog_with_ids(&[1, 2, 3, 5]);

        let created = catalog.create(
            &draft("Mouse Gaming Rexus", "120000"),
            Campus::Itb,
            "budi@itb.ac.id",
            PricePolicy::DefaultToZero,
            &mut store,
        )?;

        assert_eq!(created.id, ProductId::new(6));
        assert_eq!(created.price, 120_000);
        assert_eq!(created.campus, Campus::Itb);
        assert_eq!(created.seller, "budi@itb.ac.id");
        assert_eq!(created.category, "elektronik");
        assert_eq!(created.image, "placeholder-Mouse.jpg");
        assert!(created.badges.is_empty());

        let persisted: Vec<Product> = store.load(Slot::Products, Vec::new())?;

        assert_eq!(persisted.len(), 5);
        assert_eq!(persisted.last(), Some(&created));

        Ok(())
    }

    #[test]
    fn create_with_unparseable_price_stores_zero() -> TestResult {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::default();

        let created = catalog.create(
            &draft("Kalkulator", "abc"),
            Campus::Ui,
            "andi@ui.ac.id",
            PricePolicy::DefaultToZero,
            &mut store,
        )?;

        assert_eq!(created.price, 0);
        assert_eq!(created.id, ProductId::new(1));

        Ok(())
    }

    #[test]
    fn create_under_reject_policy_refuses_bad_price() {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::default();

        let result = catalog.create(
            &draft("Kalkulator", "abc"),
            Campus::Ui,
            "andi@ui.ac.id",
            PricePolicy::Reject,
            &mut store,
        );

        assert!(
            matches!(
                result,
                Err(MarketplaceError::ValidationFailed(
                    ValidationError::InvalidPrice(_)
                ))
            ),
            "expected InvalidPrice, got {result:?}"
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn create_with_missing_field_is_rejected() {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::default();

        let result = catalog.create(
            &draft("", "1000"),
            Campus::Ui,
            "andi@ui.ac.id",
            PricePolicy::DefaultToZero,
            &mut store,
        );

        assert!(
            matches!(
                result,
                Err(MarketplaceError::ValidationFailed(
                    ValidationError::MissingField("name")
                ))
            ),
            "expected MissingField(name), got {result:?}"
        );
        assert!(store.backend().is_empty());
    }

    #[test]
    fn create_leaves_catalog_unchanged_when_save_fails() {
        let mut backend = MockKeyValueStore::new();
        backend.expect_set().returning(|key, _| {
            Err(StorageError::QuotaExceeded {
                slot: key.to_string(),
                quota: 0,
            })
        });

        let mut store = PersistentStore::new(backend);
        let mut catalog = catalog_with_ids(&[1]);

        let result = catalog.create(
            &draft("Lampu Belajar", "50000"),
            Campus::Ugm,
            "citra@ugm.ac.id",
            PricePolicy::DefaultToZero,
            &mut store,
        );

        assert!(
            matches!(result, Err(MarketplaceError::StorageUnavailable(_))),
            "expected StorageUnavailable, got {result:?}"
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn remove_by_owner_deletes_and_persists() -> TestResult {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::new(vec![
            product(1, "andi@ui.ac.id", 45_000),
            product(2, "budi@itb.ac.id", 99_000),
        ]);

        let removed = catalog.remove(ProductId::new(1), "andi@ui.ac.id", &mut store)?;

        assert_eq!(removed.id, ProductId::new(1));
        assert!(catalog.find_by_id(ProductId::new(1)).is_none());

        let persisted: Vec<Product> = store.load(Slot::Products, Vec::new())?;

        assert_eq!(persisted, catalog.products());

        Ok(())
    }

    #[test]
    fn remove_by_non_owner_is_not_found() {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::new(vec![product(1, "andi@ui.ac.id", 45_000)]);
        let before = catalog.clone();

        let result = catalog.remove(ProductId::new(1), "budi@itb.ac.id", &mut store);

        assert!(
            matches!(result, Err(MarketplaceError::NotFoundOrForbidden)),
            "expected NotFoundOrForbidden, got {result:?}"
        );
        assert_eq!(catalog, before);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let mut store = PersistentStore::new(MemoryStore::new());
        let mut catalog = CatalogRepository::new(vec![product(1, "andi@ui.ac.id", 45_000)]);

        let result = catalog.remove(ProductId::new(42), "andi@ui.ac.id", &mut store);

        assert!(
            matches!(result, Err(MarketplaceError::NotFoundOrForbidden)),
            "expected NotFoundOrForbidden, got {result:?}"
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn list_by_seller_filters_in_insertion_order() {
        let catalog = CatalogRepository::new(vec![
            product(4, "dini@ui.ac.id", 250_000),
            product(2, "eko@itb.ac.id", 60_000),
            product(9, "dini@ui.ac.id", 10_000),
        ]);

        let ids: Vec<u64> = catalog
            .list_by_seller("dini@ui.ac.id")
            .iter()
            .map(|p| p.id.get())
            .collect();

        assert_eq!(ids, [4, 9]);
        assert!(catalog.list_by_seller("nobody@ui.ac.id").is_empty());
    }
}
