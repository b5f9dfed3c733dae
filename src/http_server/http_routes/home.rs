use axum::response::{Html, IntoResponse};
use axum_extra::extract::cookie::CookieJar;

use crate::http_server::{error, flash};
use crate::views::pages;

pub async fn index(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(pages::home(&flashes)))
}

pub async fn not_found() -> impl IntoResponse {
    error::not_found()
}
