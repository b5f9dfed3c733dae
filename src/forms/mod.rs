//! Form payloads posted by the create/edit pages and their validation.
//!
//! Each `*Form` is the raw urlencoded body as the browser sends it. `validate`
//! trims and normalises it into the matching `*Input`, collecting every problem
//! as a user-facing message so the handler can flash all of them at once.

pub mod choices;

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::entities;
use crate::formatting::format_phone;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?(\d{3})\)?[-. ]?(\d{3})[-. ]?(\d{4})$").expect("phone pattern is valid")
});

const START_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.join(" "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: String,
    pub seeking_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: String,
    pub seeking_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<VenueInput, ValidationErrors> {
        let mut errors = Vec::new();

        let name = required("Name", &self.name, &mut errors);
        let city = required("City", &self.city, &mut errors);
        let address = required("Address", &self.address, &mut errors);
        let state = validate_state(&self.state, &mut errors);
        let phone = validate_phone(&self.phone, &mut errors);
        let genres = validate_genres(&self.genres, &mut errors);
        let image_link = validate_link("Image link", &self.image_link, &mut errors);
        let facebook_link = validate_facebook_link(&self.facebook_link, &mut errors);
        let website_link = validate_link("Website link", &self.website_link, &mut errors);

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(VenueInput {
            name,
            city,
            state,
            address,
            phone,
            image_link,
            genres,
            facebook_link,
            website_link,
            seeking_talent: is_yes(&self.seeking_talent),
            seeking_description: optional(&self.seeking_description),
        })
    }

    /// Prefill the edit form from a stored venue
    pub fn from_model(venue: &entities::venue::Model, genres: Vec<String>) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: format_phone(&venue.phone),
            image_link: venue.image_link.clone().unwrap_or_default(),
            genres,
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            seeking_talent: yes_no(venue.seeking_talent),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistInput, ValidationErrors> {
        let mut errors = Vec::new();

        let name = required("Name", &self.name, &mut errors);
        let city = required("City", &self.city, &mut errors);
        let state = validate_state(&self.state, &mut errors);
        let phone = validate_phone(&self.phone, &mut errors);
        let genres = validate_genres(&self.genres, &mut errors);
        let image_link = validate_link("Image link", &self.image_link, &mut errors);
        let facebook_link = validate_facebook_link(&self.facebook_link, &mut errors);
        let website_link = validate_link("Website link", &self.website_link, &mut errors);

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(ArtistInput {
            name,
            city,
            state,
            phone,
            image_link,
            genres,
            facebook_link,
            website_link,
            seeking_venue: is_yes(&self.seeking_venue),
            seeking_description: optional(&self.seeking_description),
        })
    }

    pub fn from_model(artist: &entities::artist::Model, genres: Vec<String>) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: format_phone(&artist.phone),
            image_link: artist.image_link.clone().unwrap_or_default(),
            genres,
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            seeking_venue: yes_no(artist.seeking_venue),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl ShowForm {
    pub fn validate(&self) -> Result<ShowInput, ValidationErrors> {
        let mut errors = Vec::new();

        let artist_id = validate_id("Artist ID", &self.artist_id, &mut errors);
        let venue_id = validate_id("Venue ID", &self.venue_id, &mut errors);
        let start_time = parse_start_time(&self.start_time);
        if start_time.is_none() {
            errors.push("Start time must look like 2030-01-31 20:00:00.".to_string());
        }

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => {
                Ok(ShowInput {
                    artist_id,
                    venue_id,
                    start_time,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn required(label: &str, value: &str, errors: &mut Vec<String>) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("{label} is required."));
    }
    value.to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_yes(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "on" | "true"
    )
}

fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

fn validate_state(value: &str, errors: &mut Vec<String>) -> String {
    let state = value.trim().to_ascii_uppercase();
    if !choices::is_state(&state) {
        errors.push("State must be a two-letter US state code.".to_string());
    }
    state
}

/// Accepts `1234567890`, `123-456-7890`, `(123) 456-7890` and `123.456.7890`,
/// returning the bare ten digits.
pub fn normalize_phone(value: &str) -> Option<String> {
    let captures = PHONE_RE.captures(value.trim())?;
    Some(format!("{}{}{}", &captures[1], &captures[2], &captures[3]))
}

fn validate_phone(value: &str, errors: &mut Vec<String>) -> String {
    match normalize_phone(value) {
        Some(digits) => digits,
        None => {
            errors.push("Invalid phone number. Use the format 123-456-7890.".to_string());
            String::new()
        }
    }
}

fn validate_genres(values: &[String], errors: &mut Vec<String>) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in values.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
        if !choices::is_genre(genre) {
            errors.push(format!("Unknown genre: {genre}."));
        } else if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }
    if values.iter().all(|g| g.trim().is_empty()) {
        errors.push("Pick at least one genre.".to_string());
    }
    genres
}

fn http_url(value: &str) -> Option<url::Url> {
    url::Url::parse(value)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

fn validate_link(label: &str, value: &str, errors: &mut Vec<String>) -> Option<String> {
    let value = optional(value)?;
    if http_url(&value).is_none() {
        errors.push(format!("{label} must be a full http(s) URL."));
        return None;
    }
    Some(value)
}

fn validate_facebook_link(value: &str, errors: &mut Vec<String>) -> Option<String> {
    let value = optional(value)?;
    let on_facebook = http_url(&value)
        .and_then(|link| link.host_str().map(str::to_string))
        .is_some_and(|host| host == "facebook.com" || host.ends_with(".facebook.com"));
    if !on_facebook {
        errors.push("Facebook link must point at facebook.com.".to_string());
        return None;
    }
    Some(value)
}

fn validate_id(label: &str, value: &str, errors: &mut Vec<String>) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(format!("{label} must be a positive number."));
            None
        }
    }
}

/// Start times are entered and stored as UTC
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn venue_form() -> VenueForm {
        VenueForm {
            name: "  The Musical Hop ".into(),
            city: "San Francisco".into(),
            state: "ca".into(),
            address: "1015 Folsom Street".into(),
            phone: "123-123-1234".into(),
            image_link: "".into(),
            genres: vec!["Jazz".into(), "Reggae".into(), "Jazz".into()],
            facebook_link: "https://www.facebook.com/TheMusicalHop".into(),
            website_link: "https://www.themusicalhop.com".into(),
            seeking_talent: "Yes".into(),
            seeking_description: "  ".into(),
        }
    }

    #[test]
    fn test_valid_venue_is_normalised() {
        let input = venue_form().validate().unwrap();

        assert_eq!(input.name, "The Musical Hop");
        assert_eq!(input.state, "CA");
        assert_eq!(input.phone, "1231231234");
        assert_eq!(input.genres, vec!["Jazz", "Reggae"]);
        assert_eq!(input.image_link, None);
        assert_eq!(input.seeking_description, None);
        assert!(input.seeking_talent);
    }

    #[test]
    fn test_venue_collects_every_error() {
        let form = VenueForm {
            name: "".into(),
            state: "ZZ".into(),
            phone: "12345".into(),
            genres: vec![],
            facebook_link: "https://twitter.com/hop".into(),
            ..venue_form()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.messages().len(), 5);
        assert!(errors.messages().iter().any(|e| e.contains("phone")));
        assert!(errors.messages().iter().any(|e| e.contains("Facebook")));
    }

    #[test]
    fn test_unknown_genre_rejected() {
        let form = ArtistForm {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "326-123-5000".into(),
            genres: vec!["Polka Fusion".into()],
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.messages(), ["Unknown genre: Polka Fusion."]);
    }

    #[test]
    fn test_artist_seeking_flag() {
        let form = ArtistForm {
            name: "Matt Quevedo".into(),
            city: "New York".into(),
            state: "NY".into(),
            phone: "(300) 400-5000".into(),
            genres: vec!["Jazz".into()],
            seeking_venue: "No".into(),
            ..Default::default()
        };

        let input = form.validate().unwrap();
        assert!(!input.seeking_venue);
        assert_eq!(input.phone, "3004005000");
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(normalize_phone("1234567890").as_deref(), Some("1234567890"));
        assert_eq!(normalize_phone("123.456.7890").as_deref(), Some("1234567890"));
        assert_eq!(normalize_phone(" 123 456 7890 ").as_deref(), Some("1234567890"));
        assert_eq!(normalize_phone("123-456-789"), None);
        assert_eq!(normalize_phone("phone"), None);
    }

    #[test]
    fn test_show_form() {
        let form = ShowForm {
            artist_id: " 4 ".into(),
            venue_id: "1".into(),
            start_time: "2019-05-21 21:30:00".into(),
        };

        let input = form.validate().unwrap();
        assert_eq!(input.artist_id, 4);
        assert_eq!(input.venue_id, 1);
        assert_eq!(
            input.start_time,
            Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_show_form_rejects_bad_values() {
        let form = ShowForm {
            artist_id: "abc".into(),
            venue_id: "0".into(),
            start_time: "tomorrow".into(),
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.messages().len(), 3);
    }

    #[test]
    fn test_start_time_accepts_datetime_local() {
        assert_eq!(
            parse_start_time("2035-04-01T20:00"),
            Some(Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap())
        );
    }
}
