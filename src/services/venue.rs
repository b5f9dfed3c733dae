use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::forms::{VenueForm, VenueInput};
use crate::formatting::{DateStyle, format_datetime, format_phone};
use crate::services::{
    SearchHit, SearchResults, ServiceError, ServiceResult, apply_text_search, genre,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a city and state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<VenueShow>,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every venue grouped by (state, city), each with its number of upcoming shows
    pub async fn list_by_area(&self) -> ServiceResult<Vec<Area>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::State)
            .order_by_asc(entities::venue::Column::City)
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await?;

        let ids: Vec<i64> = venues.iter().map(|v| v.id).collect();
        let upcoming = upcoming_counts(&self.db.conn, ids).await?;

        let mut areas: Vec<Area> = Vec::new();
        for venue in venues {
            let summary = VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
            };

            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary)
                }
                _ => areas.push(Area {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    pub async fn search(&self, search_term: &str) -> ServiceResult<SearchResults> {
        let query = entities::venue::Entity::find().order_by_asc(entities::venue::Column::Name);
        let venues = apply_text_search(query, entities::venue::Column::Name, search_term)
            .all(&self.db.conn)
            .await?;

        let ids: Vec<i64> = venues.iter().map(|v| v.id).collect();
        let upcoming = upcoming_counts(&self.db.conn, ids).await?;

        let data: Vec<SearchHit> = venues
            .into_iter()
            .map(|venue| SearchHit {
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                id: venue.id,
                name: venue.name,
            })
            .collect();

        Ok(SearchResults {
            count: data.len(),
            data,
        })
    }

    pub async fn detail(&self, venue_id: i64) -> ServiceResult<VenueDetail> {
        let venue = self.find(venue_id).await?;
        let genres = genre_names(&self.db.conn, &venue).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?;

        let now = Utc::now();
        let mut past_shows = Vec::new();
        let mut upcoming_shows = Vec::new();
        for (show, artist) in shows {
            let Some(artist) = artist else {
                log::warn!("Show {} references missing artist {}", show.id, show.artist_id);
                continue;
            };
            let entry = VenueShow {
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: format_datetime(&show.start_time, DateStyle::Medium),
            };
            if show.start_time > now {
                upcoming_shows.push(entry);
            } else {
                past_shows.push(entry);
            }
        }

        Ok(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: format_phone(&venue.phone),
            website_link: venue.website_link,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            past_shows,
            upcoming_shows_count: upcoming_shows.len(),
            upcoming_shows,
        })
    }

    /// The stored venue as an edit form, along with its current name
    pub async fn edit_form(&self, venue_id: i64) -> ServiceResult<(String, VenueForm)> {
        let venue = self.find(venue_id).await?;
        let genres = genre_names(&self.db.conn, &venue).await?;
        let form = VenueForm::from_model(&venue, genres);
        Ok((venue.name, form))
    }

    pub async fn create(&self, input: VenueInput) -> ServiceResult<entities::venue::Model> {
        let txn = self.db.conn.begin().await?;

        let venue = entities::venue::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            phone: Set(input.phone),
            image_link: Set(input.image_link),
            facebook_link: Set(input.facebook_link),
            website_link: Set(input.website_link),
            seeking_talent: Set(input.seeking_talent),
            seeking_description: Set(input.seeking_description),
            ..entities::venue::ActiveModel::new()
        }
        .insert(&txn)
        .await?;

        link_genres(&txn, venue.id, &input.genres).await?;

        txn.commit().await?;

        log::info!("Venue created: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    pub async fn update(
        &self,
        venue_id: i64,
        input: VenueInput,
    ) -> ServiceResult<entities::venue::Model> {
        let txn = self.db.conn.begin().await?;

        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Venue",
                id: venue_id,
            })?;

        let mut active: entities::venue::ActiveModel = venue.into();
        active.name = Set(input.name);
        active.address = Set(input.address);
        active.city = Set(input.city);
        active.state = Set(input.state);
        active.phone = Set(input.phone);
        active.image_link = Set(input.image_link);
        active.facebook_link = Set(input.facebook_link);
        active.website_link = Set(input.website_link);
        active.seeking_talent = Set(input.seeking_talent);
        active.seeking_description = Set(input.seeking_description);
        let venue = active.update(&txn).await?;

        entities::venue_genre::Entity::delete_many()
            .filter(entities::venue_genre::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;
        link_genres(&txn, venue_id, &input.genres).await?;

        txn.commit().await?;

        log::info!("Venue updated: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Delete a venue along with its shows and genre links. Returns the venue's name.
    pub async fn delete(&self, venue_id: i64) -> ServiceResult<String> {
        let venue = self.find(venue_id).await?;
        let name = venue.name.clone();

        venue.delete(&self.db.conn).await?;

        log::info!("Venue deleted: '{}' (ID: {})", name, venue_id);
        Ok(name)
    }

    async fn find(&self, venue_id: i64) -> ServiceResult<entities::venue::Model> {
        entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Venue",
                id: venue_id,
            })
    }
}

async fn genre_names(
    conn: &impl ConnectionTrait,
    venue: &entities::venue::Model,
) -> Result<Vec<String>, DbErr> {
    let genres = venue
        .find_related(entities::genre::Entity)
        .order_by_asc(entities::genre::Column::Name)
        .all(conn)
        .await?;

    Ok(genres.into_iter().map(|g| g.name).collect())
}

async fn link_genres(
    conn: &impl ConnectionTrait,
    venue_id: i64,
    genres: &[String],
) -> Result<(), DbErr> {
    let genre_ids = genre::resolve_names(conn, genres).await?;
    if genre_ids.is_empty() {
        return Ok(());
    }

    let links = genre_ids
        .into_iter()
        .map(|genre_id| entities::venue_genre::ActiveModel {
            venue_id: Set(venue_id),
            genre_id: Set(genre_id),
        });

    entities::venue_genre::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Upcoming show count per venue, for the given venues
async fn upcoming_counts(
    conn: &impl ConnectionTrait,
    venue_ids: Vec<i64>,
) -> Result<HashMap<i64, usize>, DbErr> {
    let mut counts = HashMap::new();
    if venue_ids.is_empty() {
        return Ok(counts);
    }

    let shows = entities::show::Entity::find()
        .filter(entities::show::Column::VenueId.is_in(venue_ids))
        .filter(entities::show::Column::StartTime.gt(Utc::now()))
        .all(conn)
        .await?;

    for show in shows {
        *counts.entry(show.venue_id).or_insert(0) += 1;
    }

    Ok(counts)
}
