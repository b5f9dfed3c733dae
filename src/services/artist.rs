use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::forms::{ArtistForm, ArtistInput};
use crate::formatting::{DateStyle, format_datetime, format_phone};
use crate::services::{
    SearchHit, SearchResults, ServiceError, ServiceResult, apply_text_search, genre,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ArtistShow>,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<ArtistSummary>> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .all(&self.db.conn)
            .await?;

        Ok(artists
            .into_iter()
            .map(|a| ArtistSummary {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    pub async fn search(&self, search_term: &str) -> ServiceResult<SearchResults> {
        let query = entities::artist::Entity::find().order_by_asc(entities::artist::Column::Name);
        let artists = apply_text_search(query, entities::artist::Column::Name, search_term)
            .all(&self.db.conn)
            .await?;

        let ids: Vec<i64> = artists.iter().map(|a| a.id).collect();
        let upcoming = upcoming_counts(&self.db.conn, ids).await?;

        let data: Vec<SearchHit> = artists
            .into_iter()
            .map(|artist| SearchHit {
                num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
                id: artist.id,
                name: artist.name,
            })
            .collect();

        Ok(SearchResults {
            count: data.len(),
            data,
        })
    }

    pub async fn detail(&self, artist_id: i64) -> ServiceResult<ArtistDetail> {
        let artist = self.find(artist_id).await?;
        let genres = genre_names(&self.db.conn, &artist).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await?;

        let now = Utc::now();
        let (upcoming_shows, past_shows): (Vec<_>, Vec<_>) = shows
            .into_iter()
            .filter_map(|(show, venue)| {
                let venue = venue?;
                Some((
                    show.start_time > now,
                    ArtistShow {
                        venue_id: venue.id,
                        venue_name: venue.name,
                        venue_image_link: venue.image_link,
                        start_time: format_datetime(&show.start_time, DateStyle::Medium),
                    },
                ))
            })
            .partition(|(upcoming, _)| *upcoming);

        let upcoming_shows: Vec<ArtistShow> = upcoming_shows.into_iter().map(|(_, s)| s).collect();
        let past_shows: Vec<ArtistShow> = past_shows.into_iter().map(|(_, s)| s).collect();

        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres,
            city: artist.city,
            state: artist.state,
            phone: format_phone(&artist.phone),
            website_link: artist.website_link,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            past_shows,
            upcoming_shows_count: upcoming_shows.len(),
            upcoming_shows,
        })
    }

    pub async fn edit_form(&self, artist_id: i64) -> ServiceResult<(String, ArtistForm)> {
        let artist = self.find(artist_id).await?;
        let genres = genre_names(&self.db.conn, &artist).await?;
        let form = ArtistForm::from_model(&artist, genres);
        Ok((artist.name, form))
    }

    pub async fn create(&self, input: ArtistInput) -> ServiceResult<entities::artist::Model> {
        let txn = self.db.conn.begin().await?;

        let artist = entities::artist::ActiveModel {
            name: Set(input.name),
            city: Set(input.city),
            state: Set(input.state),
            phone: Set(input.phone),
            image_link: Set(input.image_link),
            facebook_link: Set(input.facebook_link),
            website_link: Set(input.website_link),
            seeking_venue: Set(input.seeking_venue),
            seeking_description: Set(input.seeking_description),
            ..entities::artist::ActiveModel::new()
        }
        .insert(&txn)
        .await?;

        link_genres(&txn, artist.id, &input.genres).await?;

        txn.commit().await?;

        log::info!("Artist created: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }

    pub async fn update(
        &self,
        artist_id: i64,
        input: ArtistInput,
    ) -> ServiceResult<entities::artist::Model> {
        let txn = self.db.conn.begin().await?;

        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Artist",
                id: artist_id,
            })?;

        let mut active: entities::artist::ActiveModel = artist.into();
        active.name = Set(input.name);
        active.city = Set(input.city);
        active.state = Set(input.state);
        active.phone = Set(input.phone);
        active.image_link = Set(input.image_link);
        active.facebook_link = Set(input.facebook_link);
        active.website_link = Set(input.website_link);
        active.seeking_venue = Set(input.seeking_venue);
        active.seeking_description = Set(input.seeking_description);
        let artist = active.update(&txn).await?;

        entities::artist_genre::Entity::delete_many()
            .filter(entities::artist_genre::Column::ArtistId.eq(artist_id))
            .exec(&txn)
            .await?;
        link_genres(&txn, artist_id, &input.genres).await?;

        txn.commit().await?;

        log::info!("Artist updated: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }

    pub async fn delete(&self, artist_id: i64) -> ServiceResult<String> {
        let artist = self.find(artist_id).await?;
        let name = artist.name.clone();

        artist.delete(&self.db.conn).await?;

        log::info!("Artist deleted: '{}' (ID: {})", name, artist_id);
        Ok(name)
    }

    async fn find(&self, artist_id: i64) -> ServiceResult<entities::artist::Model> {
        entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Artist",
                id: artist_id,
            })
    }
}

async fn genre_names(
    conn: &impl ConnectionTrait,
    artist: &entities::artist::Model,
) -> Result<Vec<String>, DbErr> {
    let genres = artist
        .find_related(entities::genre::Entity)
        .order_by_asc(entities::genre::Column::Name)
        .all(conn)
        .await?;

    Ok(genres.into_iter().map(|g| g.name).collect())
}

async fn link_genres(
    conn: &impl ConnectionTrait,
    artist_id: i64,
    genres: &[String],
) -> Result<(), DbErr> {
    let genre_ids = genre::resolve_names(conn, genres).await?;
    if genre_ids.is_empty() {
        return Ok(());
    }

    let links = genre_ids
        .into_iter()
        .map(|genre_id| entities::artist_genre::ActiveModel {
            artist_id: Set(artist_id),
            genre_id: Set(genre_id),
        });

    entities::artist_genre::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

async fn upcoming_counts(
    conn: &impl ConnectionTrait,
    artist_ids: Vec<i64>,
) -> Result<HashMap<i64, usize>, DbErr> {
    let mut counts = HashMap::new();
    if artist_ids.is_empty() {
        return Ok(counts);
    }

    let shows = entities::show::Entity::find()
        .filter(entities::show::Column::ArtistId.is_in(artist_ids))
        .filter(entities::show::Column::StartTime.gt(Utc::now()))
        .all(conn)
        .await?;

    for show in shows {
        *counts.entry(show.artist_id).or_insert(0) += 1;
    }

    Ok(counts)
}
