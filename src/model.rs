//! Records exchanged with the remote `/users` resource.

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = u64;

/// A user record as the server knows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// The mutable part of the record, as sent in create/update bodies.
    pub fn payload(&self) -> UserPayload {
        UserPayload {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// First character of the name, uppercased; used as the card avatar.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Request body for `POST /users` and `PUT /users/:id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

/// Create-form state: a user without an id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
}

impl Draft {
    /// Convert into a request body, or `None` when a field is blank after trimming.
    pub fn to_payload(&self) -> Option<UserPayload> {
        if !fields_filled(&self.name, &self.email) {
            return None;
        }
        Some(UserPayload {
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Non-empty-after-trim gate shared by the create and edit forms.
pub fn fields_filled(name: &str, email: &str) -> bool {
    !name.trim().is_empty() && !email.trim().is_empty()
}
