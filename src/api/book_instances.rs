//! Book instance (copy) pages

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
        book_instance::{BookInstanceForm, DeleteBookInstanceForm, BOOK_INSTANCE_LIST_URL},
        form::FieldError,
    },
    views::{BookInstanceView, BookOption, ErrorView, StatusOption},
    AppState,
};

/// The copy form needs the book list to draw its selector
fn render_form(
    state: &AppState,
    title: &str,
    instance: &BookInstanceForm,
    books: &[Book],
    errors: &[FieldError],
) -> AppResult<Html<String>> {
    state.views.render(
        "bookinstance_form",
        &json!({
            "title": title,
            "bookinstance": instance,
            "book_list": BookOption::list(books, instance.selected_book()),
            "status_list": StatusOption::list(&instance.status),
            "errors": ErrorView::list(errors),
        }),
    )
}

/// List all copies with their book titles
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Html<String>> {
    let instances = state.services.book_instances.list().await?;
    state.views.render(
        "bookinstance_list",
        &json!({
            "title": "Book Instance List",
            "bookinstance_list": instances.iter().map(BookInstanceView::from).collect::<Vec<_>>(),
        }),
    )
}

pub async fn get_book_instance(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let instance = state.services.book_instances.get_by_id(id).await?;
    let view = BookInstanceView::from(&instance);
    state.views.render(
        "bookinstance_detail",
        &json!({
            "title": format!("Copy: {}", handlebars::html_escape(&view.book_title)),
            "bookinstance": view,
        }),
    )
}

pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.book_instances.books().await?;
    render_form(&state, "Create BookInstance", &BookInstanceForm::default(), &books, &[])
}

/// Create a copy of a listed book, or show the form again with errors
pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let form = form.sanitize();
    let books = state.services.book_instances.books().await?;
    let data = match form.validate_against(&books) {
        Ok(data) => data,
        Err(errors) => return Ok(render_form(&state, "Create BookInstance", &form, &books, &errors)?.into_response()),
    };

    let instance = state.services.book_instances.create(&data).await?;
    Ok(Redirect::to(&instance.url()).into_response())
}

/// Delete confirmation; unknown copies go back to the list
pub async fn delete_book_instance_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Response> {
    let Some(instance) = state.services.book_instances.find(id).await? else {
        return Ok(Redirect::to(BOOK_INSTANCE_LIST_URL).into_response());
    };
    let html = state.views.render(
        "bookinstance_delete",
        &json!({
            "title": "Delete Book Instance",
            "bookinstance": BookInstanceView::from(&instance),
        }),
    )?;
    Ok(html.into_response())
}

/// Delete the copy named in the form body
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> AppResult<Redirect> {
    state.services.book_instances.delete(form.id).await?;
    Ok(Redirect::to(BOOK_INSTANCE_LIST_URL))
}

pub async fn update_book_instance_form(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Html<String>> {
    let (instance, books) = state.services.book_instances.get_with_books(id).await?;
    render_form(&state, "Update BookInstance", &BookInstanceForm::from(&instance), &books, &[])
}

pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let form = form.sanitize();
    let books = state.services.book_instances.books().await?;
    let data = match form.validate_against(&books) {
        Ok(data) => data,
        Err(errors) => return Ok(render_form(&state, "Update BookInstance", &form, &books, &errors)?.into_response()),
    };

    let instance = state.services.book_instances.update(id, &data).await?;
    Ok(Redirect::to(&instance.url()).into_response())
}
