//! Genre pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::{Form, Path};
use crate::{
    error::AppResult,
    models::{
        book::Book,
        form::FieldError,
        genre::{DeleteGenreForm, Genre, GenreForm, GENRE_LIST_URL},
    },
    services::DeleteOutcome,
    views::{BookView, ErrorView, GenreView},
    AppState,
};

fn render_form(state: &AppState, title: &str, genre: &GenreForm, errors: &[FieldError]) -> AppResult<Html<String>> {
    state.views.render(
        "genre_form",
        &json!({
            "title": title,
            "genre": genre,
            "errors": ErrorView::list(errors),
        }),
    )
}

fn render_delete(state: &AppState, genre: Option<&Genre>, books: &[Book]) -> AppResult<Html<String>> {
    state.views.render(
        "genre_delete",
        &json!({
            "title": "Delete Genre",
            "genre": genre.map(GenreView::from),
            "genre_books": books.iter().map(BookView::from).collect::<Vec<_>>(),
        }),
    )
}

/// List all genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Html<String>> {
    let genres = state.services.genres.list().await?;
    state.views.render(
        "genre_list",
        &json!({
            "title": "Genre List",
            "genre_list": genres.iter().map(GenreView::from).collect::<Vec<_>>(),
        }),
    )
}

/// Genre detail with its books
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let (genre, books) = state.services.genres.get_with_books(id).await?;
    state.views.render(
        "genre_detail",
        &json!({
            "title": "Genre Detail",
            "genre": GenreView::from(&genre),
            "genre_books": books.iter().map(BookView::from).collect::<Vec<_>>(),
        }),
    )
}

pub async fn create_genre_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, "Create Genre", &GenreForm::default(), &[])
}

/// Create a genre; an existing genre with the same name is reused
pub async fn create_genre(State(state): State<AppState>, Form(form): Form<GenreForm>) -> AppResult<Response> {
    let form = form.sanitize();
    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => return Ok(render_form(&state, "Create Genre", &form, &errors)?.into_response()),
    };

    let creation = state.services.genres.create(&name).await?;
    Ok(Redirect::to(&creation.genre().url()).into_response())
}

/// Delete confirmation; unknown genres go back to the list
pub async fn delete_genre_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let found = state.services.genres.find_with_books(id).await?;
    let Some(genre) = found.entity else {
        return Ok(Redirect::to(GENRE_LIST_URL).into_response());
    };
    Ok(render_delete(&state, Some(&genre), &found.books)?.into_response())
}

/// Delete the genre named in the form body, unless books still use it
pub async fn delete_genre(State(state): State<AppState>, Form(form): Form<DeleteGenreForm>) -> AppResult<Response> {
    match state.services.genres.delete(form.id).await? {
        DeleteOutcome::Deleted => Ok(Redirect::to(GENRE_LIST_URL).into_response()),
        DeleteOutcome::Blocked(found) => {
            Ok(render_delete(&state, found.entity.as_ref(), &found.books)?.into_response())
        }
    }
}

pub async fn update_genre_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let genre = state.services.genres.get_by_id(id).await?;
    render_form(&state, "Update Genre", &GenreForm::from(&genre), &[])
}

pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let form = form.sanitize();
    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => return Ok(render_form(&state, "Update Genre", &form, &errors)?.into_response()),
    };

    let genre = state.services.genres.update(id, &name).await?;
    Ok(Redirect::to(&genre.url()).into_response())
}
