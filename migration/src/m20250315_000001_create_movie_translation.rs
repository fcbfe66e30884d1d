use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieTranslation::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieTranslation::Id))
                    .col(integer(MovieTranslation::MovieId))
                    .col(string(MovieTranslation::Language))
                    .col(string(MovieTranslation::Title))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_translation_movie")
                            .from(MovieTranslation::Table, MovieTranslation::MovieId)
                            .to(Movie::Table, Movie::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_translation_unique")
                    .table(MovieTranslation::Table)
                    .col(MovieTranslation::MovieId)
                    .col(MovieTranslation::Language)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieTranslation::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MovieTranslation {
    Table,
    Id,
    MovieId,
    Language,
    Title,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
}
