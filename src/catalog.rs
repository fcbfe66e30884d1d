use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{category, ceremony, movie, movie_translation, nomination},
    models::{NewMovie, NewNomination, NominationView},
};

/// Outcome of [`Catalog::create_or_fetch_movie`].
#[derive(Clone, Debug, PartialEq)]
pub enum MovieInsert {
    Created(movie::Model),
    AlreadyExisted(movie::Model),
}

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_ceremony(&self, id: i32) -> Result<Option<ceremony::Model>, DbErr> {
        ceremony::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_category(&self, id: i32) -> Result<Option<category::Model>, DbErr> {
        category::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_movie_by_imdb_id(&self, imdb_id: &str) -> Result<Option<movie::Model>, DbErr> {
        movie::Entity::find().filter(movie::Column::ImdbId.eq(imdb_id)).one(&self.db).await
    }

    /// Inserts the movie with its translations. When another writer already
    /// holds the IMDb id, the existing row is returned instead.
    pub async fn create_or_fetch_movie(&self, new: NewMovie) -> Result<MovieInsert, DbErr> {
        match self.insert_movie(&new).await {
            Ok(model) => Ok(MovieInsert::Created(model)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(imdb_id = %new.imdb_id, "movie inserted concurrently, fetching existing row");
                self.find_movie_by_imdb_id(&new.imdb_id)
                    .await?
                    .map(MovieInsert::AlreadyExisted)
                    .ok_or(err)
            },
            Err(err) => Err(err),
        }
    }

    async fn insert_movie(&self, new: &NewMovie) -> Result<movie::Model, DbErr> {
        let txn = self.db.begin().await?;

        let model = movie::ActiveModel {
            id: Default::default(),
            imdb_id: Set(new.imdb_id.clone()),
            tmdb_id: Set(new.tmdb_id),
            title: Set(new.title.clone()),
            original_title: Set(new.original_title.clone()),
            year: Set(new.year),
            original_language: Set(new.original_language.clone()),
            poster_path: Set(new.poster_path.clone()),
            created_at: Set(now_sec()),
        };
        let inserted = movie::Entity::insert(model).exec_with_returning(&txn).await?;

        for translation in &new.translations {
            let row = movie_translation::ActiveModel {
                id: Default::default(),
                movie_id: Set(inserted.id),
                language: Set(translation.language.clone()),
                title: Set(translation.title.clone()),
            };
            movie_translation::Entity::insert(row).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(inserted)
    }

    /// Replaces every nomination of the (ceremony, category) pair in one
    /// transaction. Readers see either the old set or the new one.
    pub async fn replace_nominations(
        &self,
        ceremony_id: i32,
        category_id: i32,
        rows: &[NewNomination],
    ) -> Result<usize, DbErr> {
        let txn = self.db.begin().await?;

        let deleted = nomination::Entity::delete_many()
            .filter(nomination::Column::CeremonyId.eq(ceremony_id))
            .filter(nomination::Column::CategoryId.eq(category_id))
            .exec(&txn)
            .await?;

        for row in rows {
            let model = nomination::ActiveModel {
                id: Default::default(),
                ceremony_id: Set(ceremony_id),
                category_id: Set(category_id),
                movie_id: Set(row.movie_id),
                is_winner: Set(row.is_winner),
                note: Set(row.note.clone()),
            };
            nomination::Entity::insert(model).exec(&txn).await?;
        }

        txn.commit().await?;

        debug!(
            ceremony_id = ceremony_id,
            category_id = category_id,
            deleted = deleted.rows_affected,
            inserted = rows.len(),
            "replaced nominations"
        );
        Ok(rows.len())
    }

    pub async fn nominations_for(
        &self,
        ceremony_id: i32,
        category_id: i32,
    ) -> Result<Vec<NominationView>, DbErr> {
        let rows = nomination::Entity::find()
            .filter(nomination::Column::CeremonyId.eq(ceremony_id))
            .filter(nomination::Column::CategoryId.eq(category_id))
            .order_by_asc(nomination::Column::Id)
            .find_also_related(movie::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(n, m)| {
                let m = m?;
                Some(NominationView {
                    movie_id: m.id,
                    imdb_id: m.imdb_id,
                    title: m.title,
                    year: m.year,
                    is_winner: n.is_winner,
                    note: n.note,
                })
            })
            .collect())
    }

    pub async fn movie_translations(
        &self,
        movie_id: i32,
    ) -> Result<Vec<movie_translation::Model>, DbErr> {
        movie_translation::Entity::find()
            .filter(movie_translation::Column::MovieId.eq(movie_id))
            .order_by_asc(movie_translation::Column::Id)
            .all(&self.db)
            .await
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
