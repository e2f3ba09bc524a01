use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

/// Failure of a single call against the remote `/users` resource.
///
/// Callers collapse every variant into the same outcome (logged, list left
/// unchanged); the variants exist so the log line says what went wrong.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be built (malformed base URL or path).
    InvalidRequest(String),
    /// Connection refused, DNS failure, broken body stream.
    Transport(hyper::Error),
    /// The server answered with a non-2xx status.
    Rejected {
        method: hyper::Method,
        path: String,
        status: hyper::StatusCode,
    },
    /// The response body was not the JSON we expected.
    Decode(serde_json::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            ApiError::Transport(e) => write!(f, "transport error: {e}"),
            ApiError::Rejected {
                method,
                path,
                status,
            } => write!(f, "{method} {path} rejected with status {status}"),
            ApiError::Decode(e) => write!(f, "could not decode response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            ApiError::InvalidRequest(_) | ApiError::Rejected { .. } => None,
        }
    }
}

impl From<hyper::Error> for ApiError {
    fn from(e: hyper::Error) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source_message() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = res.with_ctx(|| "open export dir".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "open export dir: missing");
    }

    #[test]
    fn rejected_names_method_path_and_status() {
        let err = ApiError::Rejected {
            method: hyper::Method::DELETE,
            path: "/users/7".into(),
            status: hyper::StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "DELETE /users/7 rejected with status 404 Not Found");
    }
}
