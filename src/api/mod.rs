//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod genres;
pub mod health;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::Redirect,
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use crate::{error::AppError, models::author::AUTHOR_LIST_URL, AppState};

/// Path parameters; a malformed id renders the HTML error page
pub struct Path<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Path(value))
    }
}

/// Url-encoded form body; an unreadable body renders the HTML error page
pub struct Form<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Form(value) = axum::Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Form(value))
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/author/create", get(authors::create_author_form).post(authors::create_author))
        .route("/author/:id", get(authors::get_author))
        .route("/author/:id/delete", get(authors::delete_author_form).post(authors::delete_author))
        .route("/author/:id/update", get(authors::update_author_form).post(authors::update_author))
        // Genres
        .route("/genres", get(genres::list_genres))
        .route("/genre/create", get(genres::create_genre_form).post(genres::create_genre))
        .route("/genre/:id", get(genres::get_genre))
        .route("/genre/:id/delete", get(genres::delete_genre_form).post(genres::delete_genre))
        .route("/genre/:id/update", get(genres::update_genre_form).post(genres::update_genre))
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form).post(book_instances::delete_book_instance),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form).post(book_instances::update_book_instance),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to(AUTHOR_LIST_URL) }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
