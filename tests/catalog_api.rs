//! Catalog page tests, driving the router in-process over the memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use local_library::{
    api,
    models::{Book, NewBook},
    repository::{AuthorStore, BookInstanceStore, GenreStore, MemoryCatalog, Repository},
    AppState,
};
use tower::ServiceExt;

fn setup_test_app() -> (Router, Arc<MemoryCatalog>) {
    let catalog = Arc::new(MemoryCatalog::new());
    let state = AppState::new(Repository::in_memory(catalog.clone())).unwrap();
    (api::router(state), catalog)
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn seed_book(catalog: &MemoryCatalog, title: &str, author_id: i32, genre_ids: Vec<i32>) -> Book {
    catalog
        .insert_book(NewBook {
            title: title.into(),
            summary: format!("Summary of {}", title),
            author_id,
            genre_ids,
        })
        .await
}

// =========================================================================
// Authors
// =========================================================================

#[tokio::test]
async fn test_create_author_redirects_to_detail() {
    let (app, catalog) = setup_test_app();

    let response = post_form(&app, "/catalog/author/create", "first_name=Jane&family_name=Austen").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/author/1");

    let author = AuthorStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(author.first_name, "Jane");
    assert_eq!(author.family_name, "Austen");
    assert_eq!(author.date_of_birth, None);
    assert_eq!(author.date_of_death, None);

    let detail = get(&app, "/catalog/author/1").await;
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(body_text(detail).await.contains("Austen, Jane"));
}

#[tokio::test]
async fn test_create_author_trims_input() {
    let (app, catalog) = setup_test_app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=++Jane+&family_name=Austen&date_of_birth=1775-12-16&date_of_death=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let author = AuthorStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(author.first_name, "Jane");
    assert_eq!(author.date_of_birth, chrono::NaiveDate::from_ymd_opt(1775, 12, 16));
}

#[tokio::test]
async fn test_create_author_missing_field_rerenders_form() {
    let (app, catalog) = setup_test_app();

    let response = post_form(&app, "/catalog/author/create", "family_name=Austen").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("First name must be specified."));
    assert!(html.contains("value=\"Austen\""));

    assert!(AuthorStore::list(catalog.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_author_invalid_date() {
    let (app, catalog) = setup_test_app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=16%2F12%2F1775",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid date of birth"));
    assert!(AuthorStore::list(catalog.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_author_with_reduced_precision_dates() {
    let (app, catalog) = setup_test_app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Jane&family_name=Austen&date_of_birth=1775&date_of_death=18170718",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let author = AuthorStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(author.date_of_birth, chrono::NaiveDate::from_ymd_opt(1775, 1, 1));
    assert_eq!(author.date_of_death, chrono::NaiveDate::from_ymd_opt(1817, 7, 18));
}

#[tokio::test]
async fn test_malformed_ids_render_error_page() {
    let (app, _) = setup_test_app();

    let response = get(&app, "/catalog/author/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("<h2>400</h2>"));

    let response = post_form(&app, "/catalog/author/1/delete", "authorid=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("<h2>400</h2>"));
}

#[tokio::test]
async fn test_author_list_sorted_by_family_name() {
    let (app, _) = setup_test_app();
    post_form(&app, "/catalog/author/create", "first_name=Leo&family_name=Tolstoy").await;
    post_form(&app, "/catalog/author/create", "first_name=Jane&family_name=Austen").await;

    let html = body_text(get(&app, "/catalog/authors").await).await;
    let austen = html.find("Austen, Jane").unwrap();
    let tolstoy = html.find("Tolstoy, Leo").unwrap();
    assert!(austen < tolstoy);
}

#[tokio::test]
async fn test_unknown_author_detail_is_404() {
    let (app, _) = setup_test_app();
    let response = get(&app, "/catalog/author/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Author not found"));

    let update = get(&app, "/catalog/author/99/update").await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_author_with_books_is_blocked() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/author/create", "first_name=Jane&family_name=Austen").await;
    seed_book(&catalog, "Emma", 1, vec![]).await;

    let confirm = get(&app, "/catalog/author/1/delete").await;
    assert_eq!(confirm.status(), StatusCode::OK);
    assert!(body_text(confirm).await.contains("Delete the following books"));

    let response = post_form(&app, "/catalog/author/1/delete", "authorid=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Emma"));

    assert_eq!(get(&app, "/catalog/author/1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_author_without_books() {
    let (app, _) = setup_test_app();
    post_form(&app, "/catalog/author/create", "first_name=Jane&family_name=Austen").await;

    let confirm = body_text(get(&app, "/catalog/author/1/delete").await).await;
    assert!(confirm.contains("name=\"authorid\""));

    let response = post_form(&app, "/catalog/author/1/delete", "authorid=1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");

    assert_eq!(get(&app, "/catalog/author/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_form_for_missing_author_redirects() {
    let (app, _) = setup_test_app();
    let response = get(&app, "/catalog/author/5/delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
}

#[tokio::test]
async fn test_update_author() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/author/create", "first_name=Jane&family_name=Austin").await;

    let form = body_text(get(&app, "/catalog/author/1/update").await).await;
    assert!(form.contains("value=\"Austin\""));

    let response = post_form(&app, "/catalog/author/1/update", "first_name=Jane&family_name=Austen").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/author/1");
    let author = AuthorStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(author.family_name, "Austen");

    let invalid = post_form(&app, "/catalog/author/1/update", "first_name=&family_name=Austen").await;
    assert_eq!(invalid.status(), StatusCode::OK);
    assert!(body_text(invalid).await.contains("Update Author"));
    let unchanged = AuthorStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(unchanged.first_name, "Jane");
}

// =========================================================================
// Genres
// =========================================================================

#[tokio::test]
async fn test_create_genre_escapes_name() {
    let (app, catalog) = setup_test_app();

    let response = post_form(&app, "/catalog/genre/create", "name=+Sword+%26+Sorcery+").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genre/1");

    let genre = GenreStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(genre.name, "Sword &amp; Sorcery");
}

#[tokio::test]
async fn test_create_existing_genre_redirects_to_it() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/genre/create", "name=Fiction").await;
    post_form(&app, "/catalog/genre/create", "name=Poetry").await;

    let response = post_form(&app, "/catalog/genre/create", "name=Fiction").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genre/1");
    assert_eq!(GenreStore::list(catalog.as_ref()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_long_genre_name_is_accepted() {
    let (app, catalog) = setup_test_app();
    let name = "Speculative ".repeat(20);

    let response = post_form(&app, "/catalog/genre/create", &format!("name={}", name.trim().replace(' ', "+"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let genre = GenreStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(genre.name, name.trim());
}

#[tokio::test]
async fn test_create_genre_requires_name() {
    let (app, catalog) = setup_test_app();
    let response = post_form(&app, "/catalog/genre/create", "name=+++").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Genre name required"));
    assert!(GenreStore::list(catalog.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_genre_detail_lists_books() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/genre/create", "name=Romance").await;
    seed_book(&catalog, "Persuasion", 1, vec![1]).await;

    let html = body_text(get(&app, "/catalog/genre/1").await).await;
    assert!(html.contains("Genre: Romance"));
    assert!(html.contains("Persuasion"));

    assert_eq!(get(&app, "/catalog/genre/2").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_genre_uses_body_id() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/genre/create", "name=Fiction").await;
    post_form(&app, "/catalog/genre/create", "name=Poetry").await;
    seed_book(&catalog, "Odes", 1, vec![2]).await;

    // genre 2 has a book, so the body id is what matters
    let blocked = post_form(&app, "/catalog/genre/1/delete", "id=2").await;
    assert_eq!(blocked.status(), StatusCode::OK);
    assert!(GenreStore::get(catalog.as_ref(), 2).await.unwrap().is_some());

    let deleted = post_form(&app, "/catalog/genre/2/delete", "id=1").await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), "/catalog/genres");
    assert!(GenreStore::get(catalog.as_ref(), 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_genre() {
    let (app, catalog) = setup_test_app();
    post_form(&app, "/catalog/genre/create", "name=Fantasy").await;

    let response = post_form(&app, "/catalog/genre/1/update", "name=High+Fantasy").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genre/1");
    let genre = GenreStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(genre.name, "High Fantasy");

    assert_eq!(get(&app, "/catalog/genre/7/update").await.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Book instances
// =========================================================================

#[tokio::test]
async fn test_create_book_instance() {
    let (app, catalog) = setup_test_app();
    seed_book(&catalog, "Emma", 1, vec![]).await;

    let form = body_text(get(&app, "/catalog/bookinstance/create").await).await;
    assert!(form.contains("Emma"));

    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        "book=1&imprint=Penguin+Classics&status=Loaned&due_back=2024-05-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstance/1");

    let html = body_text(get(&app, "/catalog/bookinstance/1").await).await;
    assert!(html.contains("<title>Copy: Emma</title>"));
    assert!(html.contains("Loaned"));
    assert!(html.contains("May 1, 2024"));
}

#[tokio::test]
async fn test_invalid_book_instance_keeps_selection() {
    let (app, catalog) = setup_test_app();
    seed_book(&catalog, "Emma", 1, vec![]).await;
    seed_book(&catalog, "Persuasion", 1, vec![]).await;

    let response = post_form(&app, "/catalog/bookinstance/create", "book=2&imprint=&status=Reserved").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Imprint must be specified"));
    assert!(html.contains("<option value=\"2\" selected>Persuasion</option>"));
    assert!(html.contains("<option value=\"Reserved\" selected>Reserved</option>"));

    assert!(BookInstanceStore::list(catalog.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_book_rerenders_form() {
    let (app, catalog) = setup_test_app();
    seed_book(&catalog, "Emma", 1, vec![]).await;

    let response = post_form(&app, "/catalog/bookinstance/create", "book=999&imprint=Folio&status=Available").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Book must be specified"));
    assert!(html.contains("value=\"Folio\""));
    assert!(BookInstanceStore::list(catalog.as_ref()).await.unwrap().is_empty());

    post_form(&app, "/catalog/bookinstance/create", "book=1&imprint=Folio").await;
    let response = post_form(&app, "/catalog/bookinstance/1/update", "book=999&imprint=Folio").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Book must be specified"));
    let instance = BookInstanceStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(instance.book_id, 1);
}

#[tokio::test]
async fn test_book_titles_are_escaped() {
    let (app, catalog) = setup_test_app();
    seed_book(&catalog, "<script>alert(1)</script>", 1, vec![]).await;
    post_form(&app, "/catalog/bookinstance/create", "book=1&imprint=Folio").await;

    let html = body_text(get(&app, "/catalog/bookinstance/1").await).await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));

    let list = body_text(get(&app, "/catalog/bookinstances").await).await;
    assert!(!list.contains("<script>"));
}

#[tokio::test]
async fn test_book_instance_update_and_delete() {
    let (app, catalog) = setup_test_app();
    seed_book(&catalog, "Emma", 1, vec![]).await;
    post_form(&app, "/catalog/bookinstance/create", "book=1&imprint=Folio&status=Available").await;

    let form = body_text(get(&app, "/catalog/bookinstance/1/update").await).await;
    assert!(form.contains("<option value=\"1\" selected>Emma</option>"));

    let response = post_form(&app, "/catalog/bookinstance/1/update", "book=1&imprint=Folio&status=Maintenance").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let instance = BookInstanceStore::get(catalog.as_ref(), 1).await.unwrap().unwrap();
    assert_eq!(instance.status.as_str(), "Maintenance");

    let confirm = get(&app, "/catalog/bookinstance/1/delete").await;
    assert_eq!(confirm.status(), StatusCode::OK);

    let deleted = post_form(&app, "/catalog/bookinstance/1/delete", "id=1").await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), "/catalog/bookinstances");
    assert_eq!(get(&app, "/catalog/bookinstance/1").await.status(), StatusCode::NOT_FOUND);

    let gone = get(&app, "/catalog/bookinstance/1/delete").await;
    assert_eq!(gone.status(), StatusCode::SEE_OTHER);
}

// =========================================================================
// Misc
// =========================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _) = setup_test_app();
    let health = get(&app, "/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(health).await).unwrap();
    assert_eq!(body["status"], "healthy");

    assert_eq!(get(&app, "/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_redirects_to_authors() {
    let (app, _) = setup_test_app();
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
}
