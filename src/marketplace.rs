//! Marketplace
//!
//! The application-state root. [`Marketplace`] owns the catalog, the user
//! directory, the session and the storage handle, and exposes the
//! operations a presentation layer calls. Every operation returns an
//! outcome; composing user-facing messages is left to the caller.

use tracing::info;

use crate::{
    cart::{CartLedger, CartLine},
    errors::MarketplaceError,
    filter::{self, FilterQuery},
    products::{CatalogRepository, PricePolicy, Product, ProductDraft, ProductId},
    receipt::Receipt,
    seed::SeedData,
    session::{LoginOutcome, SessionManager, SessionState},
    storage::{KeyValueStore, PersistentStore},
    users::{LoginRequest, RegisterRequest, User, UserDirectory},
};

/// Marketplace behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// How unparseable prices are handled when posting
    pub price_policy: PricePolicy,

    /// Start from the bundled demo data when storage is empty
    pub seed_defaults: bool,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            price_policy: PricePolicy::DefaultToZero,
            seed_defaults: true,
        }
    }
}

/// Campus marketplace state and operations.
#[derive(Debug)]
pub struct Marketplace<S> {
    store: PersistentStore<S>,
    catalog: CatalogRepository,
    directory: UserDirectory,
    session: SessionManager,
    config: MarketplaceConfig,
}

impl<S: KeyValueStore> Marketplace<S> {
    /// Load every slot from `backend`, falling back to the bundled demo data
    /// (or empty collections) for absent slots.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::StorageUnavailable`] if storage cannot be
    /// read and [`MarketplaceError::Seed`] if the bundled data is malformed.
    pub fn open(backend: S, config: MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let store = PersistentStore::new(backend);

        let seed = if config.seed_defaults {
            SeedData::bundled()?
        } else {
            SeedData::default()
        };

        let catalog = CatalogRepository::load(&store, seed.products)?;
        let directory = UserDirectory::load(&store, seed.users)?;
        let session = SessionManager::load(&store)?;

        info!(
            products = catalog.len(),
            users = directory.len(),
            logged_in = session.current_user().is_some(),
            "marketplace opened"
        );

        Ok(Self {
            store,
            catalog,
            directory,
            session,
            config,
        })
    }

    /// Every listed product, in listing order.
    pub fn catalog(&self) -> &[Product] {
        self.catalog.products()
    }

    /// A single product.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.catalog.find_by_id(id)
    }

    /// Products matching `query`, in listing order.
    pub fn apply_filter(&self, query: &FilterQuery) -> Vec<&Product> {
        filter::apply(self.catalog.products(), &self.directory, query)
    }

    /// Display name for a seller identifier, falling back to
    /// [`UNKNOWN_SELLER`](crate::users::UNKNOWN_SELLER).
    pub fn seller_name(&self, seller: &str) -> &str {
        self.directory.display_name(seller)
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// The current login state.
    pub fn session_state(&self) -> SessionState<'_> {
        self.session.state()
    }

    /// Log in by email or phone.
    ///
    /// An unknown identifier yields [`LoginOutcome::RegistrationRequired`];
    /// follow up with [`Marketplace::register_if_absent`].
    ///
    /// # Errors
    ///
    /// See [`SessionManager::login`].
    pub fn login(&mut self, request: &LoginRequest) -> Result<LoginOutcome, MarketplaceError> {
        self.session
            .login(&self.directory, request, &mut self.store)
    }

    /// Register a new user, or log in the existing one, and open a session.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::register_if_absent`].
    pub fn register_if_absent(&mut self, request: RegisterRequest) -> Result<User, MarketplaceError> {
        self.session
            .register_if_absent(&mut self.directory, request, &mut self.store)
    }

    /// Log out and empty the cart.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::logout`].
    pub fn logout(&mut self) -> Result<(), MarketplaceError> {
        self.session.logout(&mut self.store)
    }

    /// List a new product for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out; see
    /// [`CatalogRepository::create`] for the rest.
    pub fn post_item(&mut self, draft: &ProductDraft) -> Result<Product, MarketplaceError> {
        let owner = self.session.require_login()?;

        self.catalog.create(
            draft,
            owner.campus,
            owner.identifier(),
            self.config.price_policy,
            &mut self.store,
        )
    }

    /// Products listed by the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out.
    pub fn list_my_items(&self) -> Result<Vec<&Product>, MarketplaceError> {
        let owner = self.session.require_login()?;

        Ok(self.catalog.list_by_seller(owner.identifier()))
    }

    /// Delete one of the logged-in user's listings.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out; see
    /// [`CatalogRepository::remove`] for the rest.
    pub fn delete_item(&mut self, id: ProductId) -> Result<Product, MarketplaceError> {
        let owner = self.session.require_login()?;

        self.catalog.remove(id, owner.identifier(), &mut self.store)
    }

    /// Add one unit of a product to the logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out,
    /// [`MarketplaceError::NotFoundOrForbidden`] for an unknown product, and
    /// see [`SessionManager::add_to_cart`] for the rest.
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<CartLine, MarketplaceError> {
        self.session.require_login()?;

        let product = self
            .catalog
            .find_by_id(id)
            .ok_or(MarketplaceError::NotFoundOrForbidden)?;

        self.session.add_to_cart(product, &mut self.store)
    }

    /// The cart.
    pub fn view_cart(&self) -> &CartLedger {
        self.session.cart()
    }

    /// Settle the cart. Always succeeds for an empty cart, with a total of 0.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::checkout`].
    pub fn checkout(&mut self) -> Result<Receipt, MarketplaceError> {
        self.session.checkout(&mut self.store)
    }

    /// The active configuration.
    pub fn config(&self) -> MarketplaceConfig {
        self.config
    }

    /// Borrow the storage handle.
    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    /// Close the marketplace, returning the storage backend.
    pub fn into_backend(self) -> S {
        self.store.into_backend()
    }
}
