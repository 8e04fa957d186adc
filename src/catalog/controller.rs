use std::collections::HashMap;
use axum::{
    body::{Bytes, HttpBody},
    extract::{Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::Json,
    routing::get,
    BoxError,
    Router,
};
use serde_json::Value;
use tracing::debug;
use crate::books::dto::BookDto;
use crate::books::filter::BookFilter;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::filter_books_cmd::{FilterBooksCommand, FilterBooksCommandRequest, FilterBooksCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};

const ALERT_HEADER: &str = "x-shelf-alert";
const PARAMS_HEADER: &str = "x-shelf-params";
const ALERT_CREATED: &str = "shelf.book.created";
const ALERT_UPDATED: &str = "shelf.book.updated";
const ALERT_DELETED: &str = "shelf.book.deleted";

// Generic over the request body so the same routes serve hyper and Lambda requests.
pub fn app<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Send,
          B::Error: Into<BoxError> {
    Router::new()
        .route("/books", get(find_books).post(add_book).put(update_book))
        .route("/books-filtered", get(find_books_by_example))
        .route("/books/:id", get(find_book_by_id).delete(remove_book))
        .with_state(state)
}

fn alert_headers(alert: &'static str, id: Option<i64>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ALERT_HEADER, HeaderValue::from_static(alert));
    if let Some(id) = id {
        headers.insert(PARAMS_HEADER, HeaderValue::from(id));
    }
    headers
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    body: Bytes) -> Result<(StatusCode, HeaderMap, Json<BookDto>), ServerError> {
    let json: Value = serde_json::from_slice(&body).map_err(json_to_server_error)?;
    debug!(body = %json, "REST request to save book");
    let req: AddBookCommandRequest = serde_json::from_value(json).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog).execute(req).await?;
    let mut headers = alert_headers(ALERT_CREATED, res.book.id);
    if let Some(id) = res.book.id {
        let location = HeaderValue::try_from(format!("/books/{}", id))
            .map_err(|err| ServerError::from(CommandError::Other { message: err.to_string(), reason_code: None }))?;
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(res.book)))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    body: Bytes) -> Result<(HeaderMap, Json<BookDto>), ServerError> {
    let json: Value = serde_json::from_slice(&body).map_err(json_to_server_error)?;
    debug!(body = %json, "REST request to update book");
    let req: UpdateBookCommandRequest = serde_json::from_value(json).map_err(json_to_server_error)?;
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    Ok((alert_headers(ALERT_UPDATED, res.book.id), Json(res.book)))
}

pub(crate) async fn find_books(
    State(state): State<AppState>,
    Query(req): Query<ListBooksCommandRequest>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    debug!(sort = ?req.sort, "REST request to get all books");
    let res = ListBooksCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_books_by_example(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>) -> Result<Json<FilterBooksCommandResponse>, ServerError> {
    debug!(?params, "REST request to get books by example");
    let filter = BookFilter::from_params(&params).map_err(|err| ServerError::from(CommandError::from(err)))?;
    let res = FilterBooksCommand::new(state.catalog).execute(FilterBooksCommandRequest::new(filter)).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    debug!(id, "REST request to get book");
    let res = GetBookCommand::new(state.catalog).execute(GetBookCommandRequest::new(id)).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(id): Path<i64>) -> Result<(StatusCode, HeaderMap), ServerError> {
    debug!(id, "REST request to delete book");
    let res = RemoveBookCommand::new(state.catalog).execute(RemoveBookCommandRequest::new(id)).await?;
    Ok((StatusCode::NO_CONTENT, alert_headers(ALERT_DELETED, Some(res.id))))
}
