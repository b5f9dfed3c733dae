use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities;

/// Look up each genre by name, creating the ones that don't exist yet.
/// Runs on the caller's connection so it joins an open transaction.
pub async fn resolve_names(
    conn: &impl ConnectionTrait,
    names: &[String],
) -> Result<Vec<i64>, DbErr> {
    let mut ids = Vec::with_capacity(names.len());

    for name in names {
        let existing = entities::genre::Entity::find()
            .filter(entities::genre::Column::Name.eq(name.as_str()))
            .one(conn)
            .await?;

        let id = match existing {
            Some(genre) => genre.id,
            None => {
                log::debug!("Creating genre '{}'", name);
                let genre = entities::genre::ActiveModel {
                    name: Set(name.clone()),
                    ..Default::default()
                };
                genre.insert(conn).await?.id
            }
        };
        ids.push(id);
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use sea_orm::QueryOrder;

    #[tokio::test]
    async fn test_resolve_names_reuses_existing_genres() {
        let db = test_db().await;

        let first = resolve_names(&db.conn, &["Jazz".to_string(), "Folk".to_string()])
            .await
            .unwrap();
        let second = resolve_names(&db.conn, &["Folk".to_string(), "Blues".to_string()])
            .await
            .unwrap();

        assert_eq!(first[1], second[0]);
        assert_ne!(second[1], first[0]);

        let genres = entities::genre::Entity::find()
            .order_by_asc(entities::genre::Column::Name)
            .all(&db.conn)
            .await
            .unwrap();
        let names: Vec<_> = genres.into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Blues", "Folk", "Jazz"]);
    }
}
