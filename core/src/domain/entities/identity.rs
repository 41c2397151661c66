//! Identity supplied by the user-account subsystem.

use serde::{Deserialize, Serialize};

/// Role carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Courier,
}

impl Role {
    /// The only way a role is derived: couriers get `Courier`, everyone else `User`
    pub fn from_courier_flag(is_courier: bool) -> Self {
        if is_courier {
            Role::Courier
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Courier => "courier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of a user account, as far as token issuance is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque unique identifier of the account
    pub id: String,
    pub email: String,
    pub is_courier: bool,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, is_courier: bool) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            is_courier,
        }
    }

    pub fn role(&self) -> Role {
        Role::from_courier_flag(self.is_courier)
    }
}
