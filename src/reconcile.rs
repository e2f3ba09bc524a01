//! In-memory user list and the confirmed outcomes that mutate it.
//!
//! The list only ever changes in response to a server answer: there is no
//! optimistic insert and nothing to roll back. A failed outcome is logged and
//! leaves the list exactly as it was.
//!
use crate::error::ApiError;
use crate::model::{User, UserId};

/// Result of one remote call, delivered back to the UI thread.
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<User>, ApiError>),
    Created(Result<User, ApiError>),
    /// Carries the locally edited record; it replaces the list entry on success.
    Updated {
        user: User,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: UserId,
        result: Result<(), ApiError>,
    },
}

/// Which kind of change an applied outcome made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Loaded,
    Created,
    Updated,
    Deleted,
    /// The call failed; the list is unchanged.
    Failed,
}

/// Ordered newest-first; ids are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserList {
    users: Vec<User>,
}

impl UserList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `GET /users` response, which arrives oldest-first.
    pub fn from_server(users: Vec<User>) -> Self {
        let mut list = Self::new();
        // Prepending in server order reverses it; a repeated id keeps its later copy.
        for user in users {
            list.insert_front(user);
        }
        list
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    /// Prepend, dropping any stale entry with the same id.
    pub fn insert_front(&mut self, user: User) {
        self.users.retain(|u| u.id != user.id);
        self.users.insert(0, user);
    }

    /// Replace the entry with the same id in place. Returns false if absent.
    pub fn replace(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`. Returns false if absent.
    pub fn remove(&mut self, id: UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() != before
    }

    /// Apply a confirmed outcome. Failures are logged and change nothing.
    pub fn apply(&mut self, outcome: Outcome) -> Applied {
        match outcome {
            Outcome::Loaded(Ok(users)) => {
                tracing::info!(count = users.len(), "loaded users");
                *self = Self::from_server(users);
                Applied::Loaded
            }
            Outcome::Loaded(Err(e)) => {
                tracing::error!(error = %e, "error fetching users");
                Applied::Failed
            }
            Outcome::Created(Ok(user)) => {
                tracing::info!(id = user.id, "user created");
                self.insert_front(user);
                Applied::Created
            }
            Outcome::Created(Err(e)) => {
                tracing::error!(error = %e, "error creating user");
                Applied::Failed
            }
            Outcome::Updated { user, result: Ok(()) } => {
                let id = user.id;
                if !self.replace(user) {
                    tracing::debug!(id, "updated user no longer listed");
                }
                tracing::info!(id, "user updated");
                Applied::Updated
            }
            Outcome::Updated { user, result: Err(e) } => {
                tracing::error!(id = user.id, error = %e, "error updating user");
                Applied::Failed
            }
            Outcome::Deleted { id, result: Ok(()) } => {
                if !self.remove(id) {
                    tracing::debug!(id, "deleted user no longer listed");
                }
                tracing::info!(id, "user deleted");
                Applied::Deleted
            }
            Outcome::Deleted { id, result: Err(e) } => {
                tracing::error!(id, error = %e, "error deleting user");
                Applied::Failed
            }
        }
    }
}
