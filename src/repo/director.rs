use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::debug;

use super::{Page, contains_ci, movie::MovieGraph};
use crate::{
    entities::{director, movie},
    error::RepoResult,
    models::PersonInput,
};

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<Option<director::Model>> {
    Ok(director::Entity::find_by_id(id).one(conn).await?)
}

pub async fn list<C: ConnectionTrait>(conn: &C, page: Page) -> RepoResult<Vec<director::Model>> {
    let query = director::Entity::find().order_by_asc(director::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    page: Page,
) -> RepoResult<Vec<director::Model>> {
    let query = director::Entity::find()
        .filter(contains_ci((director::Entity, director::Column::Name), term))
        .order_by_asc(director::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

pub async fn movies<C: ConnectionTrait>(conn: &C, director_id: i32) -> RepoResult<Vec<MovieGraph>> {
    let movies = movie::Entity::find()
        .filter(movie::Column::DirectorId.eq(director_id))
        .order_by_asc(movie::Column::Id)
        .all(conn)
        .await?;
    super::movie::with_listing_relations(conn, movies).await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: &PersonInput,
) -> RepoResult<director::Model> {
    let model = director::ActiveModel {
        id: Default::default(),
        name: Set(input.name.clone()),
        bio: Set(input.bio.clone()),
        birth_date: Set(input.birth_date.map(|d| d.to_string())),
        photo_url: Set(input.photo_url.clone()),
        nationality: Set(input.nationality.clone()),
    };
    let director = model.insert(conn).await?;
    debug!(director_id = director.id, "created director");
    Ok(director)
}

/// Overwrites every attribute; fields missing from `input` become null.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    input: &PersonInput,
) -> RepoResult<Option<director::Model>> {
    if director::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Ok(None);
    }
    let model = director::ActiveModel {
        id: Set(id),
        name: Set(input.name.clone()),
        bio: Set(input.bio.clone()),
        birth_date: Set(input.birth_date.map(|d| d.to_string())),
        photo_url: Set(input.photo_url.clone()),
        nationality: Set(input.nationality.clone()),
    };
    let director = model.update(conn).await?;
    debug!(director_id = id, "updated director");
    Ok(Some(director))
}

/// Deletes the director. Their movies survive with `director_id` cleared.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<bool> {
    movie::Entity::update_many()
        .col_expr(movie::Column::DirectorId, Expr::value(Option::<i32>::None))
        .filter(movie::Column::DirectorId.eq(id))
        .exec(conn)
        .await?;
    let res = director::Entity::delete_by_id(id).exec(conn).await?;
    debug!(director_id = id, deleted = res.rows_affected > 0, "delete director");
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::MovieCreate,
        repo::{movie as movie_repo, testing},
    };

    #[tokio::test]
    async fn create_get_delete() {
        let db = testing::db().await;
        let created = create(
            &db,
            &PersonInput {
                name: "Greta Gerwig".into(),
                birth_date: Some(jiff::civil::date(1983, 8, 4)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(get(&db, created.id).await.unwrap(), Some(created.clone()));

        assert!(delete(&db, created.id).await.unwrap());
        assert!(get(&db, created.id).await.unwrap().is_none());
        assert!(!delete(&db, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_name_substring() {
        let db = testing::db().await;
        for name in ["Steven Spielberg", "Martin Scorsese", "Denis Villeneuve"] {
            create(&db, &PersonInput { name: name.into(), ..Default::default() }).await.unwrap();
        }
        let found = search(&db, "VILLE", Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Denis Villeneuve");
        assert!(search(&db, "nolan", Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_clears_director_on_movies() {
        let db = testing::db().await;
        let nolan =
            create(&db, &PersonInput { name: "Christopher Nolan".into(), ..Default::default() })
                .await
                .unwrap();
        let movie = movie_repo::create(
            &db,
            &MovieCreate {
                title: "Memento".into(),
                release_year: 2000,
                director_id: Some(nolan.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(movies(&db, nolan.id).await.unwrap().len(), 1);

        assert!(delete(&db, nolan.id).await.unwrap());

        let movie = movie_repo::get(&db, movie.movie.id).await.unwrap().unwrap();
        assert_eq!(movie.movie.director_id, None);
        assert!(movie.director.is_none());
    }
}
