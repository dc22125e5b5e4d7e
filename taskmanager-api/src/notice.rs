/// User-facing notices attached to responses
///
/// Every mutating endpoint answers with a notice for the user and the
/// location the client should show next:
///
/// ```json
/// {
///   "notice": { "kind": "success", "text": "Status created successfully" },
///   "redirect": "/statuses",
///   "data": { "id": "…", "name": "In progress" }
/// }
/// ```
///
/// Error notices travel in [`crate::error::ErrorResponse`] instead.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use taskmanager_shared::auth::authorization::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Body of a successful mutation
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub notice: Notice,
    pub redirect: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> MutationResponse<T> {
    pub fn success(text: impl Into<String>, redirect: Location, data: T) -> Self {
        Self {
            notice: Notice {
                kind: NoticeKind::Success,
                text: text.into(),
            },
            redirect,
            data: Some(data),
        }
    }
}

impl MutationResponse<()> {
    /// Notice without a payload, e.g. after a delete
    pub fn notice(kind: NoticeKind, text: impl Into<String>, redirect: Location) -> Self {
        Self {
            notice: Notice {
                kind,
                text: text.into(),
            },
            redirect,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for MutationResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
