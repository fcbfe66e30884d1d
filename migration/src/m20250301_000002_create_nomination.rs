use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nomination::Table)
                    .if_not_exists()
                    .col(pk_auto(Nomination::Id))
                    .col(integer(Nomination::CeremonyId))
                    .col(integer(Nomination::CategoryId))
                    .col(integer(Nomination::MovieId))
                    .col(boolean(Nomination::IsWinner))
                    .col(string_null(Nomination::Note))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nomination_ceremony")
                            .from(Nomination::Table, Nomination::CeremonyId)
                            .to(Ceremony::Table, Ceremony::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nomination_category")
                            .from(Nomination::Table, Nomination::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nomination_movie")
                            .from(Nomination::Table, Nomination::MovieId)
                            .to(Movie::Table, Movie::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_nomination_unique")
                    .table(Nomination::Table)
                    .col(Nomination::CeremonyId)
                    .col(Nomination::CategoryId)
                    .col(Nomination::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Nomination::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Nomination {
    Table,
    Id,
    CeremonyId,
    CategoryId,
    MovieId,
    IsWinner,
    Note,
}

#[derive(DeriveIden)]
enum Ceremony {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
}
