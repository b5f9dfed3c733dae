pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use serde::Deserialize;

/// The navbar search box posts this for both venues and artists
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}
