//! Movies and their edges: director, genres, actors and owned reviews.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, LoaderTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::debug;

use super::{Page, contains_ci, unique_ids};
use crate::{
    entities::{actor, director, genre, movie, movie_actor, movie_genre, review},
    error::{RepoError, RepoResult},
    models::{MovieCreate, MovieUpdate},
};

/// A movie row plus whichever relations the caller asked for.
///
/// Listing queries fill `director` and `genres` only; detail lookups fill
/// all four.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieGraph {
    pub movie: movie::Model,
    pub director: Option<director::Model>,
    pub genres: Vec<genre::Model>,
    pub actors: Vec<actor::Model>,
    pub reviews: Vec<review::Model>,
}

/// Conjunctive movie filter; `None` criteria are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovieFilter {
    pub genre_id: Option<i32>,
    pub director_id: Option<i32>,
    pub release_year: Option<i32>,
    pub actor_id: Option<i32>,
}

pub(crate) async fn with_listing_relations<C: ConnectionTrait>(
    conn: &C,
    movies: Vec<movie::Model>,
) -> RepoResult<Vec<MovieGraph>> {
    if movies.is_empty() {
        return Ok(Vec::new());
    }
    let directors = movies.load_one(director::Entity, conn).await?;
    let genres = movies.load_many_to_many(genre::Entity, movie_genre::Entity, conn).await?;

    Ok(movies
        .into_iter()
        .zip(directors)
        .zip(genres)
        .map(|((movie, director), mut genres)| {
            genres.sort_by_key(|g| g.id);
            MovieGraph { movie, director, genres, actors: Vec::new(), reviews: Vec::new() }
        })
        .collect())
}

async fn with_all_relations<C: ConnectionTrait>(
    conn: &C,
    movie: movie::Model,
) -> RepoResult<MovieGraph> {
    let director = match movie.director_id {
        Some(id) => director::Entity::find_by_id(id).one(conn).await?,
        None => None,
    };
    let genres = genre::Entity::find()
        .join(JoinType::InnerJoin, genre::Relation::MovieGenre.def())
        .filter(movie_genre::Column::MovieId.eq(movie.id))
        .order_by_asc(genre::Column::Id)
        .all(conn)
        .await?;
    let actors = actor::Entity::find()
        .join(JoinType::InnerJoin, actor::Relation::MovieActor.def())
        .filter(movie_actor::Column::MovieId.eq(movie.id))
        .order_by_asc(actor::Column::Id)
        .all(conn)
        .await?;
    let reviews = review::Entity::find()
        .filter(review::Column::MovieId.eq(movie.id))
        .order_by_asc(review::Column::Id)
        .all(conn)
        .await?;

    Ok(MovieGraph { movie, director, genres, actors, reviews })
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<Option<MovieGraph>> {
    match movie::Entity::find_by_id(id).one(conn).await? {
        Some(movie) => Ok(Some(with_all_relations(conn, movie).await?)),
        None => Ok(None),
    }
}

pub async fn list<C: ConnectionTrait>(conn: &C, page: Page) -> RepoResult<Vec<MovieGraph>> {
    let query = movie::Entity::find().order_by_asc(movie::Column::Id);
    let movies = page.apply(query).all(conn).await?;
    with_listing_relations(conn, movies).await
}

/// Movies matching every supplied criterion, each at most once.
pub async fn filter<C: ConnectionTrait>(
    conn: &C,
    criteria: MovieFilter,
    page: Page,
) -> RepoResult<Vec<MovieGraph>> {
    let mut query = movie::Entity::find();

    if let Some(genre_id) = criteria.genre_id {
        query = query
            .join(JoinType::InnerJoin, movie::Relation::MovieGenre.def())
            .filter(movie_genre::Column::GenreId.eq(genre_id));
    }
    if let Some(director_id) = criteria.director_id {
        query = query.filter(movie::Column::DirectorId.eq(director_id));
    }
    if let Some(release_year) = criteria.release_year {
        query = query.filter(movie::Column::ReleaseYear.eq(release_year));
    }
    if let Some(actor_id) = criteria.actor_id {
        query = query
            .join(JoinType::InnerJoin, movie::Relation::MovieActor.def())
            .filter(movie_actor::Column::ActorId.eq(actor_id));
    }

    let query = query.distinct().order_by_asc(movie::Column::Id);
    let movies = page.apply(query).all(conn).await?;
    with_listing_relations(conn, movies).await
}

/// Case-insensitive substring match on title or description.
pub async fn search<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    page: Page,
) -> RepoResult<Vec<MovieGraph>> {
    let query = movie::Entity::find()
        .filter(
            Condition::any()
                .add(contains_ci((movie::Entity, movie::Column::Title), term))
                .add(contains_ci((movie::Entity, movie::Column::Description), term)),
        )
        .order_by_asc(movie::Column::Id);
    let movies = page.apply(query).all(conn).await?;
    with_listing_relations(conn, movies).await
}

async fn ensure_director<C: ConnectionTrait>(conn: &C, director_id: i32) -> RepoResult<()> {
    match director::Entity::find_by_id(director_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(RepoError::DanglingReference { entity: "Director", id: director_id }),
    }
}

/// Sets the movie's genres to exactly the ids in `genre_ids` that exist.
async fn replace_genres<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    genre_ids: &[i32],
) -> RepoResult<()> {
    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;

    let wanted = unique_ids(genre_ids);
    if wanted.is_empty() {
        return Ok(());
    }
    let found: Vec<i32> = genre::Entity::find()
        .select_only()
        .column(genre::Column::Id)
        .filter(genre::Column::Id.is_in(wanted.iter().copied()))
        .into_tuple()
        .all(conn)
        .await?;
    if found.len() < wanted.len() {
        debug!(movie_id, requested = ?genre_ids, attached = ?found, "ignoring unknown genre ids");
    }
    if found.is_empty() {
        return Ok(());
    }

    let rows = found.into_iter().map(|genre_id| movie_genre::ActiveModel {
        movie_id: Set(movie_id),
        genre_id: Set(genre_id),
    });
    movie_genre::Entity::insert_many(rows).exec_without_returning(conn).await?;
    Ok(())
}

/// Sets the movie's cast to exactly the ids in `actor_ids` that exist.
async fn replace_actors<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    actor_ids: &[i32],
) -> RepoResult<()> {
    movie_actor::Entity::delete_many()
        .filter(movie_actor::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;

    let wanted = unique_ids(actor_ids);
    if wanted.is_empty() {
        return Ok(());
    }
    let found: Vec<i32> = actor::Entity::find()
        .select_only()
        .column(actor::Column::Id)
        .filter(actor::Column::Id.is_in(wanted.iter().copied()))
        .into_tuple()
        .all(conn)
        .await?;
    if found.len() < wanted.len() {
        debug!(movie_id, requested = ?actor_ids, attached = ?found, "ignoring unknown actor ids");
    }
    if found.is_empty() {
        return Ok(());
    }

    let rows = found.into_iter().map(|actor_id| movie_actor::ActiveModel {
        movie_id: Set(movie_id),
        actor_id: Set(actor_id),
    });
    movie_actor::Entity::insert_many(rows).exec_without_returning(conn).await?;
    Ok(())
}

/// Inserts a movie and wires its edges.
///
/// `director_id` must exist. Genre and actor ids that do not resolve are
/// dropped. Run inside a transaction so the row and its edges land together.
pub async fn create<C: ConnectionTrait>(conn: &C, input: &MovieCreate) -> RepoResult<MovieGraph> {
    if let Some(director_id) = input.director_id {
        ensure_director(conn, director_id).await?;
    }

    let model = movie::ActiveModel {
        id: Default::default(),
        title: Set(input.title.clone()),
        release_year: Set(input.release_year),
        description: Set(input.description.clone()),
        poster_url: Set(input.poster_url.clone()),
        rating: Set(input.rating.unwrap_or_default()),
        runtime_minutes: Set(input.runtime_minutes),
        director_id: Set(input.director_id),
    };
    let movie = model.insert(conn).await?;

    if !input.genre_ids.is_empty() {
        replace_genres(conn, movie.id, &input.genre_ids).await?;
    }
    if !input.actor_ids.is_empty() {
        replace_actors(conn, movie.id, &input.actor_ids).await?;
    }

    debug!(movie_id = movie.id, title = %movie.title, "created movie");
    with_all_relations(conn, movie).await
}

/// Applies a sparse patch. Edge lists present in the patch replace the
/// current set wholesale, even when empty.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    patch: &MovieUpdate,
) -> RepoResult<Option<MovieGraph>> {
    let Some(existing) = movie::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let mut model: movie::ActiveModel = existing.clone().into();
    if let Some(title) = &patch.title {
        model.title = Set(title.clone());
    }
    if let Some(release_year) = patch.release_year {
        model.release_year = Set(release_year);
    }
    if let Some(description) = &patch.description {
        model.description = Set(description.clone());
    }
    if let Some(poster_url) = &patch.poster_url {
        model.poster_url = Set(poster_url.clone());
    }
    if let Some(rating) = patch.rating {
        model.rating = Set(rating);
    }
    if let Some(runtime_minutes) = patch.runtime_minutes {
        model.runtime_minutes = Set(runtime_minutes);
    }
    if let Some(director_id) = patch.director_id {
        if let Some(director_id) = director_id {
            ensure_director(conn, director_id).await?;
        }
        model.director_id = Set(director_id);
    }

    let movie = if model.is_changed() { model.update(conn).await? } else { existing };

    if let Some(genre_ids) = &patch.genre_ids {
        replace_genres(conn, id, genre_ids).await?;
    }
    if let Some(actor_ids) = &patch.actor_ids {
        replace_actors(conn, id, actor_ids).await?;
    }

    debug!(movie_id = id, "updated movie");
    Ok(Some(with_all_relations(conn, movie).await?))
}

/// Deletes the movie along with its reviews and edge rows.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> RepoResult<bool> {
    review::Entity::delete_many().filter(review::Column::MovieId.eq(id)).exec(conn).await?;
    movie_genre::Entity::delete_many().filter(movie_genre::Column::MovieId.eq(id)).exec(conn).await?;
    movie_actor::Entity::delete_many().filter(movie_actor::Column::MovieId.eq(id)).exec(conn).await?;
    let res = movie::Entity::delete_by_id(id).exec(conn).await?;
    debug!(movie_id = id, deleted = res.rows_affected > 0, "delete movie");
    Ok(res.rows_affected > 0)
}
