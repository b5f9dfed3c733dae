use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::Response,
    response::{Html, IntoResponse},
};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::forms::VenueForm;
use crate::http_server::{
    error::{Report, write_failed},
    flash,
    http_routes::SearchForm,
    state::AppState,
};
use crate::services::{ServiceError, venue::VenueService};
use crate::views::{Section, forms, pages};

pub async fn list(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response<Body>, Report> {
    let areas = VenueService::new(app_state.db.clone())
        .list_by_area()
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(pages::venues(&areas, &flashes))).into_response())
}

pub async fn search(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<Response<Body>, Report> {
    let results = VenueService::new(app_state.db.clone())
        .search(&form.search_term)
        .await?;

    let (jar, flashes) = flash::take(jar);
    let html = pages::search_results(
        Section::Venues,
        "/venues",
        &form.search_term,
        &results,
        &flashes,
    );
    Ok((jar, Html(html)).into_response())
}

pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(venue_id): Path<i64>,
) -> Result<Response<Body>, Report> {
    let venue = VenueService::new(app_state.db.clone())
        .detail(venue_id)
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(pages::venue_detail(&venue, &flashes))).into_response())
}

pub async fn create_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(forms::new_venue(&flashes)))
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Response<Body> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return flash::redirect(jar, errors.messages().to_vec(), "/venues/create");
        }
    };

    let name = input.name.clone();
    match VenueService::new(app_state.db.clone()).create(input).await {
        Ok(_) => flash::redirect(
            jar,
            [format!("Venue {name} was successfully listed!")],
            "/",
        ),
        Err(e) => write_failed(
            &format!("An error occurred. Venue {name} could not be listed."),
            e,
        ),
    }
}

pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(venue_id): Path<i64>,
) -> Result<Response<Body>, Report> {
    let (name, form) = VenueService::new(app_state.db.clone())
        .edit_form(venue_id)
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(forms::edit_venue(venue_id, &name, &form, &flashes))).into_response())
}

pub async fn update(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(venue_id): Path<i64>,
    Form(form): Form<VenueForm>,
) -> Response<Body> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return flash::redirect(
                jar,
                errors.messages().to_vec(),
                &format!("/venues/{venue_id}/edit"),
            );
        }
    };

    let name = input.name.clone();
    match VenueService::new(app_state.db.clone())
        .update(venue_id, input)
        .await
    {
        Ok(_) => flash::redirect(
            jar,
            [format!("Venue {name} was successfully updated!")],
            &format!("/venues/{venue_id}"),
        ),
        Err(e @ ServiceError::NotFound { .. }) => Report::from(e).into_response(),
        Err(e) => write_failed(
            &format!("An error occurred. Venue {name} could not be updated."),
            e,
        ),
    }
}

pub async fn delete(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(venue_id): Path<i64>,
) -> Response<Body> {
    match VenueService::new(app_state.db.clone())
        .delete(venue_id)
        .await
    {
        Ok(name) => flash::redirect(
            jar,
            [format!("Venue {name} was successfully deleted.")],
            "/",
        ),
        Err(e @ ServiceError::NotFound { .. }) => Report::from(e).into_response(),
        Err(e) => write_failed(
            &format!("An error occurred. Venue {venue_id} could not be deleted."),
            e,
        ),
    }
}
