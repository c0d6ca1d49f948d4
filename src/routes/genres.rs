use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::TransactionTrait;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Genre, GenreInput, Message, PageQuery, SearchQuery},
    repo::genre,
    validation::{ValidJson, ValidPath, ValidQuery},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Genre>>> {
    let txn = state.db.begin().await?;
    let genres = genre::list(&txn, q.page()).await?;
    txn.commit().await?;
    Ok(Json(genres.into_iter().map(Genre::from).collect()))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<SearchQuery>,
) -> AppResult<Json<Vec<Genre>>> {
    let txn = state.db.begin().await?;
    let genres = genre::search(&txn, &q.q, q.page()).await?;
    txn.commit().await?;
    Ok(Json(genres.into_iter().map(Genre::from).collect()))
}

pub async fn get(State(state): State<Arc<AppState>>, ValidPath(id): ValidPath<i32>) -> AppResult<Json<Genre>> {
    let txn = state.db.begin().await?;
    let found = genre::get(&txn, id).await?.ok_or(AppError::NotFound("Genre"))?;
    txn.commit().await?;
    Ok(Json(found.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<GenreInput>,
) -> AppResult<Json<Genre>> {
    let txn = state.db.begin().await?;
    let created = genre::create(&txn, &input).await?;
    txn.commit().await?;
    Ok(Json(created.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(input): ValidJson<GenreInput>,
) -> AppResult<Json<Genre>> {
    let txn = state.db.begin().await?;
    let updated = genre::update(&txn, id, &input).await?.ok_or(AppError::NotFound("Genre"))?;
    txn.commit().await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<Message>> {
    let txn = state.db.begin().await?;
    if !genre::delete(&txn, id).await? {
        return Err(AppError::NotFound("Genre"));
    }
    txn.commit().await?;
    Ok(Json(Message::deleted("Genre")))
}
