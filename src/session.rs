//! Session
//!
//! Login state and the cart. A session is either logged out or logged in as
//! a snapshot of a directory user; logging out also empties the cart.
//!
//! Gated operations attempted while logged out fail with
//! [`MarketplaceError::LoginRequired`]. They are not replayed after a later
//! login; the caller has to retry them.

use tracing::{info, warn};

use crate::{
    cart::{CartLedger, CartLine},
    errors::MarketplaceError,
    products::Product,
    receipt::Receipt,
    storage::{KeyValueStore, PersistentStore, Slot},
    users::{Channel, LoginRequest, RegisterRequest, User, UserDirectory},
};

/// Observable login state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    /// Nobody is logged in.
    LoggedOut,

    /// A user is logged in.
    LoggedIn(&'a User),
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The identifier matched a user, who is now logged in.
    LoggedIn(User),

    /// No user matched; registration details must be collected and passed
    /// to [`SessionManager::register_if_absent`].
    RegistrationRequired {
        /// Channel the identifier was given on
        channel: Channel,
        /// Normalised identifier
        identifier: String,
    },
}

/// Owns the current user and the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionManager {
    current_user: Option<User>,
    cart: CartLedger,
}

impl SessionManager {
    /// Create a session from existing state.
    pub fn new(current_user: Option<User>, cart: CartLedger) -> Self {
        Self { current_user, cart }
    }

    /// Restore the session and cart from storage.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketplaceError::StorageUnavailable`] if storage cannot be read.
    pub fn load<S: KeyValueStore>(store: &PersistentStore<S>) -> Result<Self, MarketplaceError> {
        let current_user = store.load(Slot::CurrentUser, None)?;
        let lines = store.load(Slot::Cart, Vec::new())?;

        Ok(Self::new(current_user, CartLedger::restore(lines)))
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The current login state.
    pub fn state(&self) -> SessionState<'_> {
        self.current_user
            .as_ref()
            .map_or(SessionState::LoggedOut, SessionState::LoggedIn)
    }

    /// The logged-in user, for gated operations.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out.
    pub fn require_login(&self) -> Result<&User, MarketplaceError> {
        self.current_user
            .as_ref()
            .ok_or(MarketplaceError::LoginRequired)
    }

    /// The cart.
    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    /// Look up `request` in `directory` and log the match in.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::AlreadyLoggedIn`] when a user is already
    /// logged in, and [`MarketplaceError::StorageUnavailable`] if the session
    /// could not be saved.
    pub fn login<S: KeyValueStore>(
        &mut self,
        directory: &UserDirectory,
        request: &LoginRequest,
        store: &mut PersistentStore<S>,
    ) -> Result<LoginOutcome, MarketplaceError> {
        self.ensure_logged_out()?;

        let Some(user) = directory.find_by_identifier(request.identifier()) else {
            info!(
                identifier = request.identifier(),
                "unknown identifier, registration required"
            );

            return Ok(LoginOutcome::RegistrationRequired {
                channel: request.channel(),
                identifier: request.identifier().to_string(),
            });
        };

        self.open(user.clone(), store)?;

        Ok(LoginOutcome::LoggedIn(user.clone()))
    }

    /// Log in the user matching `request.identifier`, registering them in
    /// `directory` first if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::AlreadyLoggedIn`] when a user is already
    /// logged in, [`MarketplaceError::ValidationFailed`] for invalid
    /// registration details (the session stays logged out), and
    /// [`MarketplaceError::StorageUnavailable`] if saving fails.
    ///
    /// A new user is saved to the directory before the session is opened. If
    /// opening the session then fails the user stays registered while the
    /// session stays logged out; retrying logs that user in.
    pub fn register_if_absent<S: KeyValueStore>(
        &mut self,
        directory: &mut UserDirectory,
        request: RegisterRequest,
        store: &mut PersistentStore<S>,
    ) -> Result<User, MarketplaceError> {
        self.ensure_logged_out()?;

        let login = LoginRequest::new(request.channel, &request.identifier)?;

        let user = match directory.find_by_identifier(login.identifier()) {
            Some(existing) => existing.clone(),
            None => directory.register(request, store)?,
        };

        self.open(user.clone(), store)?;

        Ok(user)
    }

    /// Log out and empty the cart. Logging out while logged out is a no-op
    /// that still persists the empty state.
    ///
    /// The cart slot is emptied before the user slot is cleared, so storage
    /// never holds a logged-out session with a non-empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::StorageUnavailable`] if saving fails. When
    /// the cart could not be emptied nothing changes; when only the user slot
    /// could not be cleared the user stays logged in with an empty cart, in
    /// memory and in storage alike.
    pub fn logout<S: KeyValueStore>(
        &mut self,
        store: &mut PersistentStore<S>,
    ) -> Result<(), MarketplaceError> {
        store.save(Slot::Cart, &Vec::<CartLine>::new())?;
        self.cart.clear();

        store.save(Slot::CurrentUser, &Option::<User>::None)?;

        if let Some(user) = self.current_user.take() {
            info!(email = %user.email, "logged out");
        }

        Ok(())
    }

    /// Add one unit of `product` to the logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::LoginRequired`] when logged out,
    /// [`MarketplaceError::SelfPurchase`] for the buyer's own listing, and
    /// [`MarketplaceError::StorageUnavailable`] if the cart could not be
    /// saved. The cart is unchanged on error.
    pub fn add_to_cart<S: KeyValueStore>(
        &mut self,
        product: &Product,
        store: &mut PersistentStore<S>,
    ) -> Result<CartLine, MarketplaceError> {
        let buyer = self.require_login()?;

        let mut next = self.cart.clone();
        let line = next.add(product, buyer).inspect_err(|_err| {
            warn!(id = %product.id, buyer = buyer.identifier(), "self purchase refused");
        })?;

        store.save(Slot::Cart, next.lines())?;
        self.cart = next;

        Ok(line)
    }

    /// Settle the cart and persist it empty.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::StorageUnavailable`] if the empty cart
    /// could not be saved; the cart is unchanged in that case.
    pub fn checkout<S: KeyValueStore>(
        &mut self,
        store: &mut PersistentStore<S>,
    ) -> Result<Receipt, MarketplaceError> {
        store.save(Slot::Cart, &Vec::<CartLine>::new())?;

        let receipt = self.cart.checkout();

        info!(
            total = receipt.total(),
            items = receipt.item_count(),
            "checkout complete"
        );

        Ok(receipt)
    }

    fn ensure_logged_out(&self) -> Result<(), MarketplaceError> {
        match self.state() {
            SessionState::LoggedOut => Ok(()),
            SessionState::LoggedIn(_) => Err(MarketplaceError::AlreadyLoggedIn),
        }
    }

    fn open<S: KeyValueStore>(
        &mut self,
        user: User,
        store: &mut PersistentStore<S>,
    ) -> Result<(), MarketplaceError> {
        store.save(Slot::CurrentUser, &Some(&user))?;

        info!(email = %user.email, "logged in");

        self.current_user = Some(user);

        Ok(())
    }
}
