use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{Page, contains_ci};
use crate::{
    entities::{genre, movie_genre},
    error::{RepoError, RepoResult},
    models::GenreInput,
};

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<Option<genre::Model>> {
    Ok(genre::Entity::find_by_id(id).one(conn).await?)
}

pub async fn list<C: ConnectionTrait>(conn: &C, page: Page) -> RepoResult<Vec<genre::Model>> {
    let query = genre::Entity::find().order_by_asc(genre::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    page: Page,
) -> RepoResult<Vec<genre::Model>> {
    let query = genre::Entity::find()
        .filter(contains_ci((genre::Entity, genre::Column::Name), term))
        .order_by_asc(genre::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

/// Genre names are unique; a name held by another row is a conflict.
async fn ensure_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<i32>,
) -> RepoResult<()> {
    let mut query = genre::Entity::find().filter(genre::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(genre::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(RepoError::Conflict(format!("genre '{name}' already exists")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(conn: &C, input: &GenreInput) -> RepoResult<genre::Model> {
    ensure_name_free(conn, &input.name, None).await?;
    let model = genre::ActiveModel {
        id: Default::default(),
        name: Set(input.name.clone()),
        description: Set(input.description.clone()),
    };
    let genre = model.insert(conn).await?;
    debug!(genre_id = genre.id, name = %genre.name, "created genre");
    Ok(genre)
}

/// Overwrites name and description; an omitted description becomes null.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    input: &GenreInput,
) -> RepoResult<Option<genre::Model>> {
    if genre::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Ok(None);
    }
    ensure_name_free(conn, &input.name, Some(id)).await?;
    let model = genre::ActiveModel {
        id: Set(id),
        name: Set(input.name.clone()),
        description: Set(input.description.clone()),
    };
    let genre = model.update(conn).await?;
    debug!(genre_id = id, "updated genre");
    Ok(Some(genre))
}

/// Removes the genre and untags its movies.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<bool> {
    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::GenreId.eq(id))
        .exec(conn)
        .await?;
    let res = genre::Entity::delete_by_id(id).exec(conn).await?;
    debug!(genre_id = id, deleted = res.rows_affected > 0, "delete genre");
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::MovieCreate,
        repo::{movie as movie_repo, testing},
    };

    fn input(name: &str) -> GenreInput {
        GenreInput { name: name.into(), description: None }
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let db = testing::db().await;
        create(&db, &input("Action")).await.unwrap();

        let err = create(&db, &input("Action")).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)), "got {err:?}");
        assert_eq!(list(&db, Page::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_taken_name_is_rejected() {
        let db = testing::db().await;
        create(&db, &input("Action")).await.unwrap();
        let drama = create(&db, &input("Drama")).await.unwrap();

        let err = update(&db, drama.id, &input("Action")).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        // Keeping its own name is fine.
        let same = update(
            &db,
            drama.id,
            &GenreInput { name: "Drama".into(), description: Some("Serious films".into()) },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(same.description.as_deref(), Some("Serious films"));
    }

    #[tokio::test]
    async fn update_missing_genre_is_none() {
        let db = testing::db().await;
        assert!(update(&db, 42, &input("Horror")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_untags_movies() {
        let db = testing::db().await;
        let horror = create(&db, &input("Horror")).await.unwrap();
        let movie = movie_repo::create(
            &db,
            &MovieCreate {
                title: "Alien".into(),
                release_year: 1979,
                genre_ids: vec![horror.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(movie.genres.len(), 1);

        assert!(delete(&db, horror.id).await.unwrap());
        assert!(get(&db, horror.id).await.unwrap().is_none());

        let movie = movie_repo::get(&db, movie.movie.id).await.unwrap().unwrap();
        assert!(movie.genres.is_empty());
    }

    #[tokio::test]
    async fn search_genres() {
        let db = testing::db().await;
        create(&db, &input("Science Fiction")).await.unwrap();
        create(&db, &input("Fantasy")).await.unwrap();
        let found = search(&db, "fiction", Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Science Fiction");
    }
}
