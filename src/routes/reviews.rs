use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::TransactionTrait;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Message, PageQuery, Review, ReviewCreate},
    repo::review,
    validation::{ValidJson, ValidPath, ValidQuery},
};

pub async fn for_movie(
    State(state): State<Arc<AppState>>,
    ValidPath(movie_id): ValidPath<i32>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Review>>> {
    let txn = state.db.begin().await?;
    let reviews = review::list_for_movie(&txn, movie_id, q.page()).await?;
    txn.commit().await?;
    Ok(Json(reviews.into_iter().map(Review::from).collect()))
}

pub async fn get(State(state): State<Arc<AppState>>, ValidPath(id): ValidPath<i32>) -> AppResult<Json<Review>> {
    let txn = state.db.begin().await?;
    let found = review::get(&txn, id).await?.ok_or(AppError::NotFound("Review"))?;
    txn.commit().await?;
    Ok(Json(found.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<ReviewCreate>,
) -> AppResult<Json<Review>> {
    let txn = state.db.begin().await?;
    let created = review::create(&txn, &input).await?;
    txn.commit().await?;
    Ok(Json(created.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<Message>> {
    let txn = state.db.begin().await?;
    if !review::delete(&txn, id).await? {
        return Err(AppError::NotFound("Review"));
    }
    txn.commit().await?;
    Ok(Json(Message::deleted("Review")))
}
