//! Users

use serde::{Deserialize, Serialize};

use crate::{campus::Campus, errors::ValidationError};

pub mod directory;

pub use directory::{UNKNOWN_SELLER, UserDirectory};

/// Minimum length of a phone identifier.
pub const MIN_PHONE_LEN: usize = 5;

/// Domain of the synthetic email given to users who register by phone.
pub const SYNTHETIC_EMAIL_DOMAIN: &str = "kampus.com";

/// A registered user.
///
/// Users registered by phone carry a synthetic `temp-<phone>@kampus.com`
/// email so that every user has an email-shaped identifier for seller
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Lower-cased email, or a synthetic one for phone registrations
    pub email: String,

    /// Phone number as typed, or empty for email registrations
    pub phone: String,

    /// Home campus
    pub campus: Campus,

    /// Display name
    pub username: String,
}

impl User {
    /// The identifier recorded as `seller` on this user's listings.
    pub fn identifier(&self) -> &str {
        &self.email
    }
}

/// The identity mechanism used to log in or register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Email address
    Email,

    /// Phone number
    Phone,
}

/// A validated login identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    channel: Channel,
    identifier: String,
}

impl LoginRequest {
    /// Validate and normalise a raw identifier for `channel`.
    ///
    /// Emails must contain an `@` and are lower-cased; phone numbers must be
    /// at least [`MIN_PHONE_LEN`] characters and are kept as typed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] or
    /// [`ValidationError::InvalidPhone`] when the identifier is malformed.
    pub fn new(channel: Channel, identifier: &str) -> Result<Self, ValidationError> {
        let trimmed = identifier.trim();

        let identifier = match channel {
            Channel::Email if trimmed.contains('@') => trimmed.to_lowercase(),
            Channel::Email => return Err(ValidationError::InvalidEmail(identifier.to_string())),
            Channel::Phone if trimmed.chars().count() >= MIN_PHONE_LEN => trimmed.to_string(),
            Channel::Phone => return Err(ValidationError::InvalidPhone(identifier.to_string())),
        };

        Ok(Self {
            channel,
            identifier,
        })
    }

    /// Shorthand for an email login.
    ///
    /// # Errors
    ///
    /// See [`LoginRequest::new`].
    pub fn email(identifier: &str) -> Result<Self, ValidationError> {
        Self::new(Channel::Email, identifier)
    }

    /// Shorthand for a phone login.
    ///
    /// # Errors
    ///
    /// See [`LoginRequest::new`].
    pub fn phone(identifier: &str) -> Result<Self, ValidationError> {
        Self::new(Channel::Phone, identifier)
    }

    /// The channel used.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The normalised identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Unvalidated registration details collected after a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Display name
    pub username: String,

    /// Campus code as typed
    pub campus: String,

    /// Identity channel
    pub channel: Channel,

    /// Raw identifier for `channel`
    pub identifier: String,
}

impl RegisterRequest {
    /// Validate the request into the user it would create.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty username, unknown campus,
    /// or malformed identifier.
    pub fn into_user(self) -> Result<User, ValidationError> {
        let username = self.username.trim();

        if username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }

        let campus = self.campus.parse::<Campus>()?;
        let login = LoginRequest::new(self.channel, &self.identifier)?;

        let (email, phone) = match login.channel() {
            Channel::Email => (login.identifier().to_string(), String::new()),
            Channel::Phone => (
                format!("temp-{}@{SYNTHETIC_EMAIL_DOMAIN}", login.identifier()),
                login.identifier().to_string(),
            ),
        };

        Ok(User {
            email,
            phone,
            campus,
            username: username.to_string(),
        })
    }
}
