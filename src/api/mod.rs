//! Access to the remote `/users` resource.
//!
//! [`UserApi`] is the seam between the reconciler and the network. The
//! production implementation is [`HttpUserApi`]; tests plug in an in-memory
//! fake.
//!
pub mod http;

use std::future::Future;

use crate::error::ApiError;
use crate::model::{User, UserId, UserPayload};

pub use http::HttpUserApi;

/// The four calls the UI makes against the user resource.
pub trait UserApi: Send + Sync + 'static {
    /// `GET /users`, in server order.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// `POST /users`; returns the created record carrying its new id.
    fn create_user(
        &self,
        payload: UserPayload,
    ) -> impl Future<Output = Result<User, ApiError>> + Send;

    /// `PUT /users/:id`; the response body is ignored.
    fn update_user(
        &self,
        id: UserId,
        payload: UserPayload,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `DELETE /users/:id`; the response body is ignored.
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<(), ApiError>> + Send;
}
