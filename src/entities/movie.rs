use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub imdb_id: String,
    pub tmdb_id: Option<i32>,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::nomination::Entity")]
    Nomination,
    #[sea_orm(has_many = "super::movie_translation::Entity")]
    MovieTranslation,
}

impl Related<super::nomination::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nomination.def()
    }
}

impl Related<super::movie_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieTranslation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
