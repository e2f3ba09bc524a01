use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Client, Method, Request, Uri};
use serde::de::DeserializeOwned;

use super::UserApi;
use crate::error::ApiError;
use crate::model::{User, UserId, UserPayload};

/// [`UserApi`] over plain HTTP with a shared hyper client.
#[derive(Clone)]
pub struct HttpUserApi {
    client: Client<HttpConnector>,
    base_url: String,
}

impl HttpUserApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Join the base URL and an absolute resource path.
    pub fn uri(&self, path: &str) -> Result<Uri, ApiError> {
        let full = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        full.parse::<Uri>()
            .map_err(|e| ApiError::InvalidRequest(format!("{full}: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, ApiError> {
        let uri = self.uri(path)?;
        let builder = Request::builder().method(method.clone()).uri(uri);
        let request = match body {
            Some(bytes) => builder
                .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        tracing::debug!(%method, path, "sending request");
        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await?;
        if !status.is_success() {
            return Err(ApiError::Rejected {
                method,
                path: path.to_string(),
                status,
            });
        }
        Ok(bytes)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let bytes = self.send(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl UserApi for HttpUserApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::GET, "/users", None).await
    }

    async fn create_user(&self, payload: UserPayload) -> Result<User, ApiError> {
        let body = serde_json::to_vec(&payload)?;
        self.send_json(Method::POST, "/users", Some(body)).await
    }

    async fn update_user(&self, id: UserId, payload: UserPayload) -> Result<(), ApiError> {
        let body = serde_json::to_vec(&payload)?;
        self.send(Method::PUT, &format!("/users/{id}"), Some(body))
            .await
            .map(|_| ())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/users/{id}"), None)
            .await
            .map(|_| ())
    }
}
