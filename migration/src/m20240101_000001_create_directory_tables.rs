use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create venues table
        manager
            .create_table(
                Table::create()
                    .table("venues")
                    .if_not_exists()
                    .col(pk_auto("id"))
                    .col(string("name"))
                    .col(string("address"))
                    .col(string("city"))
                    .col(string("state"))
                    .col(string("phone"))
                    .col(string_null("image_link"))
                    .col(string_null("facebook_link"))
                    .col(string_null("website_link"))
                    .col(boolean("seeking_talent").default(false))
                    .col(string_null("seeking_description"))
                    .col(timestamp("created_at"))
                    .col(timestamp("updated_at"))
                    .to_owned(),
            )
            .await?;

        // Create artists table
        manager
            .create_table(
                Table::create()
                    .table("artists")
                    .if_not_exists()
                    .col(pk_auto("id"))
                    .col(string("name"))
                    .col(string("city"))
                    .col(string("state"))
                    .col(string("phone"))
                    .col(string_null("image_link"))
                    .col(string_null("facebook_link"))
                    .col(string_null("website_link"))
                    .col(boolean("seeking_venue").default(false))
                    .col(string_null("seeking_description"))
                    .col(timestamp("created_at"))
                    .col(timestamp("updated_at"))
                    .to_owned(),
            )
            .await?;

        // Create genres table
        manager
            .create_table(
                Table::create()
                    .table("genres")
                    .if_not_exists()
                    .col(pk_auto("id"))
                    .col(string_uniq("name"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_venues_city_state")
                    .table("venues")
                    .col("state")
                    .col("city")
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table("genres").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("artists").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("venues").to_owned())
            .await?;

        Ok(())
    }
}
