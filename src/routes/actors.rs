use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::TransactionTrait;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Message, PageQuery, Person, PersonInput, PersonWithMovies, SearchQuery},
    repo::actor,
    validation::{ValidJson, ValidPath, ValidQuery},
};

fn people(rows: Vec<crate::entities::actor::Model>) -> Vec<Person> {
    rows.into_iter().map(Person::from).collect()
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let txn = state.db.begin().await?;
    let actors = actor::list(&txn, q.page()).await?;
    txn.commit().await?;
    Ok(Json(people(actors)))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<SearchQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let txn = state.db.begin().await?;
    let actors = actor::search(&txn, &q.q, q.page()).await?;
    txn.commit().await?;
    Ok(Json(people(actors)))
}

pub async fn by_genre(
    State(state): State<Arc<AppState>>,
    ValidPath(genre_id): ValidPath<i32>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let txn = state.db.begin().await?;
    let actors = actor::filter_by_genre(&txn, genre_id, q.page()).await?;
    txn.commit().await?;
    Ok(Json(people(actors)))
}

/// Actor detail including their filmography.
pub async fn get(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<PersonWithMovies>> {
    let txn = state.db.begin().await?;
    let found = actor::get(&txn, id).await?.ok_or(AppError::NotFound("Actor"))?;
    let movies = actor::movies(&txn, id).await?;
    txn.commit().await?;
    Ok(Json(PersonWithMovies::new(found, movies)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<PersonInput>,
) -> AppResult<Json<Person>> {
    let txn = state.db.begin().await?;
    let created = actor::create(&txn, &input).await?;
    txn.commit().await?;
    Ok(Json(created.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(input): ValidJson<PersonInput>,
) -> AppResult<Json<Person>> {
    let txn = state.db.begin().await?;
    let updated = actor::update(&txn, id, &input).await?.ok_or(AppError::NotFound("Actor"))?;
    txn.commit().await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<Message>> {
    let txn = state.db.begin().await?;
    if !actor::delete(&txn, id).await? {
        return Err(AppError::NotFound("Actor"));
    }
    txn.commit().await?;
    Ok(Json(Message::deleted("Actor")))
}
