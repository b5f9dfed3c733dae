use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::Response,
    response::{Html, IntoResponse},
};
use axum_extra::extract::{Form, cookie::CookieJar};

use crate::forms::ArtistForm;
use crate::http_server::{
    error::{Report, write_failed},
    flash,
    http_routes::SearchForm,
    state::AppState,
};
use crate::services::{ServiceError, artist::ArtistService};
use crate::views::{Section, forms, pages};

pub async fn list(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response<Body>, Report> {
    let artists = ArtistService::new(app_state.db.clone()).list().await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(pages::artists(&artists, &flashes))).into_response())
}

pub async fn search(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<Response<Body>, Report> {
    let results = ArtistService::new(app_state.db.clone())
        .search(&form.search_term)
        .await?;

    let (jar, flashes) = flash::take(jar);
    let html = pages::search_results(
        Section::Artists,
        "/artists",
        &form.search_term,
        &results,
        &flashes,
    );
    Ok((jar, Html(html)).into_response())
}

pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(artist_id): Path<i64>,
) -> Result<Response<Body>, Report> {
    let artist = ArtistService::new(app_state.db.clone())
        .detail(artist_id)
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(pages::artist_detail(&artist, &flashes))).into_response())
}

pub async fn create_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(forms::new_artist(&flashes)))
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Response<Body> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return flash::redirect(jar, errors.messages().to_vec(), "/artists/create");
        }
    };

    let name = input.name.clone();
    match ArtistService::new(app_state.db.clone()).create(input).await {
        Ok(_) => flash::redirect(
            jar,
            [format!("Artist {name} was successfully listed!")],
            "/",
        ),
        Err(e) => write_failed(
            &format!("An error occurred. Artist {name} could not be listed."),
            e,
        ),
    }
}

pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(artist_id): Path<i64>,
) -> Result<Response<Body>, Report> {
    let (name, form) = ArtistService::new(app_state.db.clone())
        .edit_form(artist_id)
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(forms::edit_artist(artist_id, &name, &form, &flashes))).into_response())
}

pub async fn update(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(artist_id): Path<i64>,
    Form(form): Form<ArtistForm>,
) -> Response<Body> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return flash::redirect(
                jar,
                errors.messages().to_vec(),
                &format!("/artists/{artist_id}/edit"),
            );
        }
    };

    let name = input.name.clone();
    match ArtistService::new(app_state.db.clone())
        .update(artist_id, input)
        .await
    {
        Ok(_) => flash::redirect(
            jar,
            [format!("Artist {name} was successfully updated!")],
            &format!("/artists/{artist_id}"),
        ),
        Err(e @ ServiceError::NotFound { .. }) => Report::from(e).into_response(),
        Err(e) => write_failed(
            &format!("An error occurred. Artist {name} could not be updated."),
            e,
        ),
    }
}

pub async fn delete(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(artist_id): Path<i64>,
) -> Response<Body> {
    match ArtistService::new(app_state.db.clone())
        .delete(artist_id)
        .await
    {
        Ok(name) => flash::redirect(
            jar,
            [format!("Artist {name} was successfully deleted.")],
            "/",
        ),
        Err(e @ ServiceError::NotFound { .. }) => Report::from(e).into_response(),
        Err(e) => write_failed(
            &format!("An error occurred. Artist {artist_id} could not be deleted."),
            e,
        ),
    }
}
