//! Typed redirect messages.
//!
//! Every user-visible outcome of an auth workflow travels as a redirect to a
//! page carrying either an `error` or a `success` query parameter; nothing
//! else crosses the handler boundary.

use axum::response::Redirect;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

impl MessageKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

/// Redirect to `path` carrying a typed, displayed message.
pub fn encoded_redirect(kind: MessageKind, path: &str, message: &str) -> Redirect {
    let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("{path}?{}={encoded}", kind.as_str()))
}
