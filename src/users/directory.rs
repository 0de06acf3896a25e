//! User Directory

use tracing::info;

use crate::{
    errors::MarketplaceError,
    storage::{KeyValueStore, PersistentStore, Slot},
    users::{RegisterRequest, User},
};

/// Display name used for sellers that do not resolve to a known user.
pub const UNKNOWN_SELLER: &str = "Unknown Seller";

/// Owns the registered users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Create a directory over existing users.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Load the directory from storage, starting from `default` when the
    /// slot is absent or malformed.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketplaceError::StorageUnavailable`] if storage cannot be read.
    pub fn load<S: KeyValueStore>(
        store: &PersistentStore<S>,
        default: Vec<User>,
    ) -> Result<Self, MarketplaceError> {
        Ok(Self::new(store.load(Slot::Users, default)?))
    }

    /// All users, in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Find a user whose email equals the lower-cased `identifier`, or whose
    /// phone equals `identifier` exactly.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&User> {
        if identifier.is_empty() {
            return None;
        }

        let email = identifier.to_lowercase();

        self.users
            .iter()
            .find(|user| user.email == email || user.phone == identifier)
    }

    /// The username of the user whose email is `seller`, or
    /// [`UNKNOWN_SELLER`].
    pub fn display_name(&self, seller: &str) -> &str {
        self.users
            .iter()
            .find(|user| user.email == seller)
            .map_or(UNKNOWN_SELLER, |user| user.username.as_str())
    }

    /// Validate and append a new user, persisting the directory.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::ValidationFailed`] for invalid
    /// registration details and [`MarketplaceError::StorageUnavailable`] if
    /// the directory could not be saved. The directory is unchanged on error.
    pub fn register<S: KeyValueStore>(
        &mut self,
        request: RegisterRequest,
        store: &mut PersistentStore<S>,
    ) -> Result<User, MarketplaceError> {
        let user = request.into_user()?;

        let mut next = self.users.clone();
        next.push(user.clone());

        store.save(Slot::Users, &next)?;
        self.users = next;

        info!(email = %user.email, campus = %user.campus, "user registered");

        Ok(user)
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check whether no users are registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
