//! Author pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::{Form, Path};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorForm, DeleteAuthorForm, AUTHOR_LIST_URL},
        book::Book,
        form::FieldError,
    },
    services::DeleteOutcome,
    views::{AuthorView, BookView, ErrorView},
    AppState,
};

fn render_form(state: &AppState, title: &str, author: &AuthorForm, errors: &[FieldError]) -> AppResult<Html<String>> {
    state.views.render(
        "author_form",
        &json!({
            "title": title,
            "author": author,
            "errors": ErrorView::list(errors),
        }),
    )
}

fn render_delete(state: &AppState, author: Option<&Author>, books: &[Book]) -> AppResult<Html<String>> {
    state.views.render(
        "author_delete",
        &json!({
            "title": "Delete Author",
            "author": author.map(AuthorView::from),
            "author_books": books.iter().map(BookView::from).collect::<Vec<_>>(),
        }),
    )
}

/// List all authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors = state.services.authors.list().await?;
    state.views.render(
        "author_list",
        &json!({
            "title": "Author List",
            "author_list": authors.iter().map(AuthorView::from).collect::<Vec<_>>(),
        }),
    )
}

/// Author detail with their books
pub async fn get_author(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let (author, books) = state.services.authors.get_with_books(id).await?;
    state.views.render(
        "author_detail",
        &json!({
            "title": "Author Detail",
            "author": AuthorView::from(&author),
            "author_books": books.iter().map(BookView::from).collect::<Vec<_>>(),
        }),
    )
}

/// Empty create form
pub async fn create_author_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_form(&state, "Create Author", &AuthorForm::default(), &[])
}

/// Create an author, or show the form again with errors
pub async fn create_author(State(state): State<AppState>, Form(form): Form<AuthorForm>) -> AppResult<Response> {
    let form = form.sanitize();
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(render_form(&state, "Create Author", &form, &errors)?.into_response()),
    };

    let author = state.services.authors.create(&data).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

/// Delete confirmation; unknown authors go back to the list
pub async fn delete_author_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let found = state.services.authors.find_with_books(id).await?;
    let Some(author) = found.entity else {
        return Ok(Redirect::to(AUTHOR_LIST_URL).into_response());
    };
    Ok(render_delete(&state, Some(&author), &found.books)?.into_response())
}

/// Delete the author named in the form body, unless they still have books
pub async fn delete_author(State(state): State<AppState>, Form(form): Form<DeleteAuthorForm>) -> AppResult<Response> {
    match state.services.authors.delete(form.authorid).await? {
        DeleteOutcome::Deleted => Ok(Redirect::to(AUTHOR_LIST_URL).into_response()),
        DeleteOutcome::Blocked(found) => {
            Ok(render_delete(&state, found.entity.as_ref(), &found.books)?.into_response())
        }
    }
}

/// Update form pre-filled with the stored author
pub async fn update_author_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let author = state.services.authors.get_by_id(id).await?;
    render_form(&state, "Update Author", &AuthorForm::from(&author), &[])
}

/// Update an author, or show the form again with errors
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let form = form.sanitize();
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(render_form(&state, "Update Author", &form, &errors)?.into_response()),
    };

    let author = state.services.authors.update(id, &data).await?;
    Ok(Redirect::to(&author.url()).into_response())
}
