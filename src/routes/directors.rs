use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::TransactionTrait;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Message, PageQuery, Person, PersonInput, PersonWithMovies, SearchQuery},
    repo::director,
    validation::{ValidJson, ValidPath, ValidQuery},
};

fn people(rows: Vec<crate::entities::director::Model>) -> Vec<Person> {
    rows.into_iter().map(Person::from).collect()
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let txn = state.db.begin().await?;
    let directors = director::list(&txn, q.page()).await?;
    txn.commit().await?;
    Ok(Json(people(directors)))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<SearchQuery>,
) -> AppResult<Json<Vec<Person>>> {
    let txn = state.db.begin().await?;
    let directors = director::search(&txn, &q.q, q.page()).await?;
    txn.commit().await?;
    Ok(Json(people(directors)))
}

/// Director detail including the movies they directed.
pub async fn get(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<PersonWithMovies>> {
    let txn = state.db.begin().await?;
    let found = director::get(&txn, id).await?.ok_or(AppError::NotFound("Director"))?;
    let movies = director::movies(&txn, id).await?;
    txn.commit().await?;
    Ok(Json(PersonWithMovies::new(found, movies)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<PersonInput>,
) -> AppResult<Json<Person>> {
    let txn = state.db.begin().await?;
    let created = director::create(&txn, &input).await?;
    txn.commit().await?;
    Ok(Json(created.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(input): ValidJson<PersonInput>,
) -> AppResult<Json<Person>> {
    let txn = state.db.begin().await?;
    let updated = director::update(&txn, id, &input).await?.ok_or(AppError::NotFound("Director"))?;
    txn.commit().await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<Message>> {
    let txn = state.db.begin().await?;
    if !director::delete(&txn, id).await? {
        return Err(AppError::NotFound("Director"));
    }
    txn.commit().await?;
    Ok(Json(Message::deleted("Director")))
}
