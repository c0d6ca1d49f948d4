use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::Page;
use crate::{
    entities::{movie, review},
    error::{RepoError, RepoResult},
    models::ReviewCreate,
};

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<Option<review::Model>> {
    Ok(review::Entity::find_by_id(id).one(conn).await?)
}

/// Reviews of one movie. A movie without reviews and a missing movie both
/// yield an empty list.
pub async fn list_for_movie<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    page: Page,
) -> RepoResult<Vec<review::Model>> {
    let query = review::Entity::find()
        .filter(review::Column::MovieId.eq(movie_id))
        .order_by_asc(review::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

/// Adds a review to an existing movie. `created_at` defaults to today.
pub async fn create<C: ConnectionTrait>(conn: &C, input: &ReviewCreate) -> RepoResult<review::Model> {
    if movie::Entity::find_by_id(input.movie_id).one(conn).await?.is_none() {
        return Err(RepoError::DanglingReference { entity: "Movie", id: input.movie_id });
    }

    let created_at = input.created_at.unwrap_or_else(|| jiff::Zoned::now().date());
    let model = review::ActiveModel {
        id: Default::default(),
        movie_id: Set(input.movie_id),
        reviewer_name: Set(input.reviewer_name.clone()),
        rating: Set(input.rating),
        comment: Set(input.comment.clone()),
        created_at: Set(Some(created_at.to_string())),
    };
    let review = model.insert(conn).await?;
    debug!(review_id = review.id, movie_id = review.movie_id, "created review");
    Ok(review)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<bool> {
    let res = review::Entity::delete_by_id(id).exec(conn).await?;
    debug!(review_id = id, deleted = res.rows_affected > 0, "delete review");
    Ok(res.rows_affected > 0)
}
