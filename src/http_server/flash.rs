//! One-shot messages carried across a redirect in the `flash` cookie.

use axum::{
    body::Body,
    http::Response,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";
const SEPARATOR: char = '\n';

fn read(jar: &CookieJar) -> Vec<String> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };

    match urlencoding::decode(cookie.value()) {
        Ok(decoded) => decoded
            .split(SEPARATOR)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            log::warn!("Dropping undecodable flash cookie: {e}");
            Vec::new()
        }
    }
}

/// Queue messages for the next rendered page
pub fn push<I, S>(jar: CookieJar, messages: I) -> CookieJar
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut all = read(&jar);
    all.extend(messages.into_iter().map(Into::into));

    let value = urlencoding::encode(&all.join(&SEPARATOR.to_string())).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Consume the pending messages, clearing the cookie
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = read(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }

    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

/// Flash `messages` and send the browser to `to`
pub fn redirect<I, S>(jar: CookieJar, messages: I, to: &str) -> Response<Body>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    (push(jar, messages), Redirect::to(to)).into_response()
}
