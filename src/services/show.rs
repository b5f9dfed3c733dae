use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::database::Database;
use crate::entities;
use crate::forms::ShowInput;
use crate::formatting::format_listing_time;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    /// `2019-05-21 21:30:00`
    pub start_time: String,
    pub starts_at: DateTime<Utc>,
}

/// Options for the artist and venue selects on the new-show form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowChoices {
    pub artists: Vec<(i64, String)>,
    pub venues: Vec<(i64, String)>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show ordered by start time
    pub async fn list(&self) -> ServiceResult<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?;

        let mut venue_ids: Vec<i64> = shows.iter().map(|(show, _)| show.venue_id).collect();
        venue_ids.sort_unstable();
        venue_ids.dedup();

        let venue_names: HashMap<i64, String> = if venue_ids.is_empty() {
            HashMap::new()
        } else {
            entities::venue::Entity::find()
                .filter(entities::venue::Column::Id.is_in(venue_ids))
                .all(&self.db.conn)
                .await?
                .into_iter()
                .map(|v| (v.id, v.name))
                .collect()
        };

        let listings = shows
            .into_iter()
            .filter_map(|(show, artist)| {
                let artist = artist?;
                let venue_name = venue_names.get(&show.venue_id)?;
                Some(ShowListing {
                    venue_id: show.venue_id,
                    venue_name: venue_name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: format_listing_time(&show.start_time),
                    starts_at: show.start_time,
                })
            })
            .collect();

        Ok(listings)
    }

    pub async fn choices(&self) -> ServiceResult<ShowChoices> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .all(&self.db.conn)
            .await?;
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await?;

        Ok(ShowChoices {
            artists: artists.into_iter().map(|a| (a.id, a.name)).collect(),
            venues: venues.into_iter().map(|v| (v.id, v.name)).collect(),
        })
    }

    /// Book an artist at a venue. Both must already exist.
    pub async fn create(&self, input: ShowInput) -> ServiceResult<entities::show::Model> {
        if entities::venue::Entity::find_by_id(input.venue_id)
            .one(&self.db.conn)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidReference {
                entity: "Venue",
                id: input.venue_id,
            });
        }
        if entities::artist::Entity::find_by_id(input.artist_id)
            .one(&self.db.conn)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidReference {
                entity: "Artist",
                id: input.artist_id,
            });
        }

        let show = entities::show::ActiveModel {
            venue_id: Set(input.venue_id),
            artist_id: Set(input.artist_id),
            start_time: Set(input.start_time),
            ..Default::default()
        }
        .insert(&self.db.conn)
        .await?;

        log::info!(
            "Show created: artist {} at venue {} on {} (ID: {})",
            show.artist_id,
            show.venue_id,
            show.start_time,
            show.id
        );
        Ok(show)
    }
}
