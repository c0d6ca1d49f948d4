use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use tracing::debug;

use super::{Page, contains_ci, movie::MovieGraph};
use crate::{
    entities::{actor, movie, movie_actor, movie_genre},
    error::RepoResult,
    models::PersonInput,
};

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<Option<actor::Model>> {
    Ok(actor::Entity::find_by_id(id).one(conn).await?)
}

pub async fn list<C: ConnectionTrait>(conn: &C, page: Page) -> RepoResult<Vec<actor::Model>> {
    let query = actor::Entity::find().order_by_asc(actor::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

pub async fn search<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    page: Page,
) -> RepoResult<Vec<actor::Model>> {
    let query = actor::Entity::find()
        .filter(contains_ci((actor::Entity, actor::Column::Name), term))
        .order_by_asc(actor::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

/// Actors credited on at least one movie tagged with `genre_id`, each listed once.
pub async fn filter_by_genre<C: ConnectionTrait>(
    conn: &C,
    genre_id: i32,
    page: Page,
) -> RepoResult<Vec<actor::Model>> {
    let query = actor::Entity::find()
        .join(JoinType::InnerJoin, actor::Relation::MovieActor.def())
        .join(JoinType::InnerJoin, movie_actor::Relation::Movie.def())
        .join(JoinType::InnerJoin, movie::Relation::MovieGenre.def())
        .filter(movie_genre::Column::GenreId.eq(genre_id))
        .distinct()
        .order_by_asc(actor::Column::Id);
    Ok(page.apply(query).all(conn).await?)
}

/// Filmography in listing shape.
pub async fn movies<C: ConnectionTrait>(conn: &C, actor_id: i32) -> RepoResult<Vec<MovieGraph>> {
    let movies = movie::Entity::find()
        .join(JoinType::InnerJoin, movie::Relation::MovieActor.def())
        .filter(movie_actor::Column::ActorId.eq(actor_id))
        .order_by_asc(movie::Column::Id)
        .all(conn)
        .await?;
    super::movie::with_listing_relations(conn, movies).await
}

pub async fn create<C: ConnectionTrait>(conn: &C, input: &PersonInput) -> RepoResult<actor::Model> {
    let model = actor::ActiveModel {
        id: Default::default(),
        name: Set(input.name.clone()),
        bio: Set(input.bio.clone()),
        birth_date: Set(input.birth_date.map(|d| d.to_string())),
        photo_url: Set(input.photo_url.clone()),
        nationality: Set(input.nationality.clone()),
    };
    let actor = model.insert(conn).await?;
    debug!(actor_id = actor.id, "created actor");
    Ok(actor)
}

/// Overwrites every attribute; fields missing from `input` become null.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    input: &PersonInput,
) -> RepoResult<Option<actor::Model>> {
    if actor::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Ok(None);
    }
    let model = actor::ActiveModel {
        id: Set(id),
        name: Set(input.name.clone()),
        bio: Set(input.bio.clone()),
        birth_date: Set(input.birth_date.map(|d| d.to_string())),
        photo_url: Set(input.photo_url.clone()),
        nationality: Set(input.nationality.clone()),
    };
    let actor = model.update(conn).await?;
    debug!(actor_id = id, "updated actor");
    Ok(Some(actor))
}

/// Removes the actor and its movie credits; the movies themselves stay.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<bool> {
    movie_actor::Entity::delete_many()
        .filter(movie_actor::Column::ActorId.eq(id))
        .exec(conn)
        .await?;
    let res = actor::Entity::delete_by_id(id).exec(conn).await?;
    debug!(actor_id = id, deleted = res.rows_affected > 0, "delete actor");
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use sea_orm::TransactionTrait;

    use super::*;
    use crate::{
        models::{GenreInput, MovieCreate},
        repo::{genre, movie as movie_repo, testing},
    };

    fn person(name: &str) -> PersonInput {
        PersonInput { name: name.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let db = testing::db().await;
        assert!(list(&db, Page::default()).await.unwrap().is_empty());
        assert!(list(&db, Page::new(50, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let db = testing::db().await;
        let input = PersonInput {
            name: "Meryl Streep".into(),
            bio: Some("American actress".into()),
            birth_date: Some(jiff::civil::date(1949, 6, 22)),
            photo_url: Some("https://example.com/streep.jpg".into()),
            nationality: Some("American".into()),
        };
        let created = create(&db, &input).await.unwrap();
        let fetched = get(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Meryl Streep");
        assert_eq!(fetched.birth_date.as_deref(), Some("1949-06-22"));
        assert_eq!(fetched.nationality.as_deref(), Some("American"));
    }

    #[tokio::test]
    async fn list_respects_insertion_order_and_window() {
        let db = testing::db().await;
        for name in ["A", "B", "C", "D"] {
            create(&db, &person(name)).await.unwrap();
        }
        let names: Vec<_> =
            list(&db, Page::new(1, 2)).await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["B", "C"]);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let db = testing::db().await;
        let created = create(
            &db,
            &PersonInput {
                name: "Bale".into(),
                bio: Some("method actor".into()),
                nationality: Some("British".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated = update(&db, created.id, &person("Christian Bale")).await.unwrap().unwrap();
        assert_eq!(updated.name, "Christian Bale");
        assert_eq!(updated.bio, None);
        assert_eq!(updated.nationality, None);

        assert!(update(&db, 999, &person("Nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let db = testing::db().await;
        create(&db, &person("Leonardo DiCaprio")).await.unwrap();
        create(&db, &person("Brad Pitt")).await.unwrap();

        for term in ["leo", "DICAPRIO", "nardo"] {
            let found = search(&db, term, Page::default()).await.unwrap();
            assert_eq!(found.len(), 1, "term {term}");
            assert_eq!(found[0].name, "Leonardo DiCaprio");
        }
        assert!(search(&db, "streep", Page::default()).await.unwrap().is_empty());
        assert!(search(&db, "%", Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_non_ascii_names_in_their_own_case() {
        let db = testing::db().await;
        create(&db, &person("Émile Hirsch")).await.unwrap();

        for term in ["Émile", "ÉMILE HIRSCH", "mile", "HIRSCH"] {
            let found = search(&db, term, Page::default()).await.unwrap();
            assert_eq!(found.len(), 1, "term {term}");
            assert_eq!(found[0].name, "Émile Hirsch");
        }
    }

    #[tokio::test]
    async fn filter_by_genre_lists_each_actor_once() {
        let db = testing::db().await;
        let txn = db.begin().await.unwrap();
        let drama = genre::create(&txn, &GenreInput { name: "Drama".into(), description: None })
            .await
            .unwrap();
        let comedy = genre::create(&txn, &GenreInput { name: "Comedy".into(), description: None })
            .await
            .unwrap();
        let hanks = create(&txn, &person("Tom Hanks")).await.unwrap();
        let robbie = create(&txn, &person("Margot Robbie")).await.unwrap();

        for title in ["Philadelphia", "Cast Away", "Forrest Gump"] {
            movie_repo::create(
                &txn,
                &MovieCreate {
                    title: title.into(),
                    release_year: 1994,
                    genre_ids: vec![drama.id],
                    actor_ids: vec![hanks.id],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        movie_repo::create(
            &txn,
            &MovieCreate {
                title: "Barbie".into(),
                release_year: 2023,
                genre_ids: vec![comedy.id],
                actor_ids: vec![robbie.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        txn.commit().await.unwrap();

        let drama_actors = filter_by_genre(&db, drama.id, Page::default()).await.unwrap();
        assert_eq!(drama_actors.len(), 1);
        assert_eq!(drama_actors[0].id, hanks.id);

        let comedy_actors = filter_by_genre(&db, comedy.id, Page::default()).await.unwrap();
        assert_eq!(comedy_actors.iter().map(|a| a.id).collect::<Vec<_>>(), [robbie.id]);

        assert!(filter_by_genre(&db, 999, Page::default()).await.unwrap().is_empty());
        assert_eq!(movies(&db, hanks.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_keeps_movies_and_drops_credits() {
        let db = testing::db().await;
        let actor = create(&db, &person("Ryan Gosling")).await.unwrap();
        let movie = movie_repo::create(
            &db,
            &MovieCreate {
                title: "Drive".into(),
                release_year: 2011,
                actor_ids: vec![actor.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(delete(&db, actor.id).await.unwrap());
        assert!(get(&db, actor.id).await.unwrap().is_none());
        assert!(!delete(&db, actor.id).await.unwrap());

        let movie = movie_repo::get(&db, movie.movie.id).await.unwrap().unwrap();
        assert!(movie.actors.is_empty());
    }
}
