use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(pk_auto(Organization::Id))
                    .col(string(Organization::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ceremony::Table)
                    .if_not_exists()
                    .col(pk_auto(Ceremony::Id))
                    .col(integer(Ceremony::OrganizationId))
                    .col(integer(Ceremony::Year))
                    .col(string_null(Ceremony::EventUrl))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ceremony_organization")
                            .from(Ceremony::Table, Ceremony::OrganizationId)
                            .to(Organization::Table, Organization::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(pk_auto(Category::Id))
                    .col(integer(Category::OrganizationId))
                    .col(string(Category::Name))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_organization")
                            .from(Category::Table, Category::OrganizationId)
                            .to(Organization::Table, Organization::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_organization_name")
                    .table(Category::Table)
                    .col(Category::OrganizationId)
                    .col(Category::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_uniq(Movie::ImdbId))
                    .col(integer_null(Movie::TmdbId))
                    .col(string(Movie::Title))
                    .col(string_null(Movie::OriginalTitle))
                    .col(integer_null(Movie::Year))
                    .col(string_null(Movie::OriginalLanguage))
                    .col(string_null(Movie::PosterPath))
                    .col(big_integer(Movie::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Category::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Ceremony::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Organization::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Ceremony {
    Table,
    Id,
    OrganizationId,
    Year,
    EventUrl,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    OrganizationId,
    Name,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    ImdbId,
    TmdbId,
    Title,
    OriginalTitle,
    Year,
    OriginalLanguage,
    PosterPath,
    CreatedAt,
}
