use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::TransactionTrait;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        Message, MovieCreate, MovieDetail, MovieFilterQuery, MovieSimple, MovieUpdate, PageQuery,
        SearchQuery,
    },
    repo::movie::{self, MovieFilter},
    validation::{ValidJson, ValidPath, ValidQuery},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<MovieSimple>>> {
    let txn = state.db.begin().await?;
    let movies = movie::list(&txn, q.page()).await?;
    txn.commit().await?;
    Ok(Json(movies.into_iter().map(MovieSimple::from).collect()))
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<MovieFilterQuery>,
) -> AppResult<Json<Vec<MovieSimple>>> {
    let criteria = MovieFilter {
        genre_id: q.genre_id,
        director_id: q.director_id,
        release_year: q.release_year,
        actor_id: q.actor_id,
    };
    let txn = state.db.begin().await?;
    let movies = movie::filter(&txn, criteria, q.page()).await?;
    txn.commit().await?;
    Ok(Json(movies.into_iter().map(MovieSimple::from).collect()))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    ValidQuery(q): ValidQuery<SearchQuery>,
) -> AppResult<Json<Vec<MovieSimple>>> {
    let txn = state.db.begin().await?;
    let movies = movie::search(&txn, &q.q, q.page()).await?;
    txn.commit().await?;
    Ok(Json(movies.into_iter().map(MovieSimple::from).collect()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<MovieDetail>> {
    let txn = state.db.begin().await?;
    let movie = movie::get(&txn, id).await?.ok_or(AppError::NotFound("Movie"))?;
    txn.commit().await?;
    Ok(Json(movie.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<MovieCreate>,
) -> AppResult<Json<MovieDetail>> {
    let txn = state.db.begin().await?;
    let movie = movie::create(&txn, &input).await?;
    txn.commit().await?;
    tracing::info!(movie_id = movie.movie.id, title = %movie.movie.title, "movie created");
    Ok(Json(movie.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(patch): ValidJson<MovieUpdate>,
) -> AppResult<Json<MovieDetail>> {
    let txn = state.db.begin().await?;
    let movie = movie::update(&txn, id, &patch).await?.ok_or(AppError::NotFound("Movie"))?;
    txn.commit().await?;
    Ok(Json(movie.into()))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<Message>> {
    let txn = state.db.begin().await?;
    if !movie::delete(&txn, id).await? {
        return Err(AppError::NotFound("Movie"));
    }
    txn.commit().await?;
    Ok(Json(Message::deleted("Movie")))
}
