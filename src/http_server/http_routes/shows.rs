use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Response,
    response::{Html, IntoResponse},
};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::forms::ShowForm;
use crate::http_server::{
    error::{Report, write_failed},
    flash,
    state::AppState,
};
use crate::services::{ServiceError, show::ShowService};
use crate::views::{forms, pages};

pub async fn list(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response<Body>, Report> {
    let shows = ShowService::new(app_state.db.clone()).list().await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(pages::shows(&shows, &flashes))).into_response())
}

pub async fn create_form(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response<Body>, Report> {
    let choices = ShowService::new(app_state.db.clone()).choices().await?;

    let (jar, flashes) = flash::take(jar);
    let html = forms::new_show(&choices, &ShowForm::default(), &flashes);
    Ok((jar, Html(html)).into_response())
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Response<Body> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return flash::redirect(jar, errors.messages().to_vec(), "/shows/create");
        }
    };

    match ShowService::new(app_state.db.clone()).create(input).await {
        Ok(_) => flash::redirect(jar, ["Show was successfully listed!"], "/"),
        Err(e @ ServiceError::InvalidReference { .. }) => {
            flash::redirect(jar, [format!("{e}.")], "/shows/create")
        }
        Err(e) => write_failed("An error occurred. Show could not be listed.", e),
    }
}
