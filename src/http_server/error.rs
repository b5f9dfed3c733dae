use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::{Html, IntoResponse},
};

use crate::services::ServiceError;
use crate::views;

// A generic error report
// Produced via `?` on any service or database error, or via
// `Err(color_eyre::eyre::Report::new(SomeError))`
pub struct Report(color_eyre::Report);

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> From<E> for Report
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Tell axum how to convert `Report` into a response.
impl IntoResponse for Report {
    fn into_response(self) -> Response<Body> {
        let err = self.0;

        if let Some(ServiceError::NotFound { entity, id }) = err.downcast_ref::<ServiceError>() {
            log::debug!("{entity} {id} not found");
            return not_found();
        }

        log::error!("{err:?}");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::errors::server_error(None)),
        )
            .into_response()
    }
}

pub fn not_found() -> Response<Body> {
    (StatusCode::NOT_FOUND, Html(views::errors::not_found())).into_response()
}

/// A database write failed and its transaction was rolled back.
/// Logs the cause and shows `message` on the 500 page.
pub fn write_failed(message: &str, err: impl Into<color_eyre::Report>) -> Response<Body> {
    let err: color_eyre::Report = err.into();
    log::error!("{message}: {err:?}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::errors::server_error(Some(message))),
    )
        .into_response()
}
