use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create shows table
        manager
            .create_table(
                Table::create()
                    .table("shows")
                    .if_not_exists()
                    .col(pk_auto("id"))
                    .col(integer("venue_id"))
                    .col(integer("artist_id"))
                    .col(timestamp("start_time"))
                    .col(timestamp("created_at"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_venue_id")
                            .from("shows", "venue_id")
                            .to("venues", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_artist_id")
                            .from("shows", "artist_id")
                            .to("artists", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_start_time")
                    .table("shows")
                    .col("start_time")
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create venue_genres junction table
        manager
            .create_table(
                Table::create()
                    .table("venue_genres")
                    .if_not_exists()
                    .col(integer("venue_id"))
                    .col(integer("genre_id"))
                    .primary_key(Index::create().col("venue_id").col("genre_id"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_genres_venue_id")
                            .from("venue_genres", "venue_id")
                            .to("venues", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_venue_genres_genre_id")
                            .from("venue_genres", "genre_id")
                            .to("genres", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create artist_genres junction table
        manager
            .create_table(
                Table::create()
                    .table("artist_genres")
                    .if_not_exists()
                    .col(integer("artist_id"))
                    .col(integer("genre_id"))
                    .primary_key(Index::create().col("artist_id").col("genre_id"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_genres_artist_id")
                            .from("artist_genres", "artist_id")
                            .to("artists", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_genres_genre_id")
                            .from("artist_genres", "genre_id")
                            .to("genres", "id")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table("artist_genres").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("venue_genres").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("shows").to_owned())
            .await?;

        Ok(())
    }
}
