pub mod category;
pub mod ceremony;
pub mod movie;
pub mod movie_translation;
pub mod nomination;
pub mod organization;
