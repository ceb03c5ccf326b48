//! Session state and login classification.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Display name given to every admin session.
pub const ADMIN_DISPLAY_NAME: &str = "Admin";

/// Phone placeholder given to every admin session.
pub const ADMIN_PLACEHOLDER_PHONE: &str = "0000000000";

/// Shortest phone number (in characters) accepted for customers.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Login validation failures, shown inline on the login form.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or phone is blank.
    #[error("Please enter both Name and Phone number.")]
    MissingIdentity,
    /// Phone is shorter than [`MIN_PHONE_LENGTH`].
    #[error("Please enter a valid 10-digit phone number.")]
    InvalidPhone,
}

/// Who is using the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Guest,
    Customer,
    Admin,
}

impl Role {
    /// Label shown in the dashboard header.
    #[must_use]
    pub const fn header_label(self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Customer => "CUSTOMER",
            Self::Admin => "MANUFACTURER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The current actor and their identity.
///
/// A guest session always has an empty name and phone; the constructors are
/// the only way to build one, so that invariant cannot be broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    role: Role,
    name: String,
    phone: String,
}

impl Session {
    /// An unauthenticated session.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// A customer session carrying exactly the given identity.
    #[must_use]
    pub fn customer(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            role: Role::Customer,
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// The shared admin session.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            name: ADMIN_DISPLAY_NAME.to_owned(),
            phone: ADMIN_PLACEHOLDER_PHONE.to_owned(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.role != Role::Guest
    }
}

/// Submitted login form values.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials<'_> {
    /// Classify the actor behind these credentials.
    ///
    /// In order: the admin secret wins regardless of name and phone; otherwise
    /// name and phone must both be non-blank, and the phone must have at least
    /// [`MIN_PHONE_LENGTH`] characters. An empty admin secret never matches.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when no session should be emitted.
    pub fn classify(&self, admin_secret: &str) -> Result<Session, ValidationError> {
        if !admin_secret.is_empty() && self.password == admin_secret {
            return Ok(Session::admin());
        }

        if self.name.trim().is_empty() || self.phone.trim().is_empty() {
            return Err(ValidationError::MissingIdentity);
        }

        if self.phone.chars().count() < MIN_PHONE_LENGTH {
            return Err(ValidationError::InvalidPhone);
        }

        Ok(Session::customer(self.name, self.phone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "RMP123";

    fn creds<'a>(name: &'a str, phone: &'a str, password: &'a str) -> Credentials<'a> {
        Credentials {
            name,
            phone,
            password,
        }
    }

    #[test]
    fn test_admin_secret_always_wins() {
        let cases = [
            ("", ""),
            ("Ravi", ""),
            ("", "12"),
            ("Ravi", "9876543210"),
            ("   ", "abc"),
        ];
        for (name, phone) in cases {
            let session = creds(name, phone, SECRET).classify(SECRET);
            assert_eq!(session, Ok(Session::admin()), "name={name:?} phone={phone:?}");
        }
    }

    #[test]
    fn test_admin_identity_is_fixed() {
        let session = creds("Someone", "1234567890", SECRET)
            .classify(SECRET)
            .expect("admin");
        assert_eq!(session.role(), Role::Admin);
        assert_eq!(session.name(), ADMIN_DISPLAY_NAME);
        assert_eq!(session.phone(), ADMIN_PLACEHOLDER_PHONE);
    }

    #[test]
    fn test_customer_carries_exact_identity() {
        let session = creds("Ravi Patel", "9876543210", "")
            .classify(SECRET)
            .expect("customer");
        assert_eq!(session.role(), Role::Customer);
        assert_eq!(session.name(), "Ravi Patel");
        assert_eq!(session.phone(), "9876543210");
    }

    #[test]
    fn test_wrong_password_falls_through_to_customer() {
        let session = creds("Ravi", "+91 98765 43210", "rmp123")
            .classify(SECRET)
            .expect("customer");
        assert_eq!(session.role(), Role::Customer);
    }

    #[test]
    fn test_missing_identity() {
        for (name, phone) in [("", "9876543210"), ("Ravi", ""), ("", ""), ("  ", "9876543210")] {
            assert_eq!(
                creds(name, phone, "").classify(SECRET),
                Err(ValidationError::MissingIdentity)
            );
        }
    }

    #[test]
    fn test_short_phone() {
        assert_eq!(
            creds("Ravi", "987654321", "").classify(SECRET),
            Err(ValidationError::InvalidPhone)
        );
        assert!(creds("Ravi", "9876543210", "").classify(SECRET).is_ok());
    }

    #[test]
    fn test_validation_messages_are_not_empty() {
        for err in [ValidationError::MissingIdentity, ValidationError::InvalidPhone] {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_guest_session_is_empty() {
        let session = Session::guest();
        assert_eq!(session.role(), Role::Guest);
        assert!(session.name().is_empty());
        assert!(session.phone().is_empty());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", creds("Ravi", "9876543210", "hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_empty_secret_never_grants_admin() {
        assert_eq!(
            creds("", "", "").classify(""),
            Err(ValidationError::MissingIdentity)
        );
    }

    #[test]
    fn test_role_header_labels() {
        assert_eq!(Role::Admin.header_label(), "MANUFACTURER");
        assert_eq!(Role::Customer.header_label(), "CUSTOMER");
    }
}
