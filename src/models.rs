use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    entities::{actor, director, genre, review},
    repo::{Page, movie::MovieGraph},
};

fn default_limit() -> u64 {
    Page::DEFAULT_LIMIT
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn parse_date(raw: Option<&str>) -> Option<Date> {
    raw.and_then(|s| s.parse().ok())
}

// Query strings

#[derive(Clone, Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl SearchQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieFilterQuery {
    pub genre_id: Option<i32>,
    pub director_id: Option<i32>,
    pub release_year: Option<i32>,
    pub actor_id: Option<i32>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl MovieFilterQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

// Request bodies

/// Input for actors and directors, which share the same attributes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PersonInput {
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: Option<Date>,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenreInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewCreate {
    pub movie_id: i32,
    pub reviewer_name: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: Option<Date>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieCreate {
    pub title: String,
    pub release_year: i32,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    /// Omitted or `null` stores 0.0.
    pub rating: Option<f64>,
    pub runtime_minutes: Option<i32>,
    pub director_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub actor_ids: Vec<i32>,
}

/// Sparse movie patch. Outer `None` means "leave unchanged"; for nullable
/// columns `Some(None)` clears the value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub poster_url: Option<Option<String>>,
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub runtime_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub director_id: Option<Option<i32>>,
    pub genre_ids: Option<Vec<i32>>,
    pub actor_ids: Option<Vec<i32>>,
}

// Response bodies

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: Option<Date>,
    pub photo_url: Option<String>,
    pub nationality: Option<String>,
}

impl From<actor::Model> for Person {
    fn from(m: actor::Model) -> Self {
        Self {
            id: m.id,
            birth_date: parse_date(m.birth_date.as_deref()),
            name: m.name,
            bio: m.bio,
            photo_url: m.photo_url,
            nationality: m.nationality,
        }
    }
}

impl From<director::Model> for Person {
    fn from(m: director::Model) -> Self {
        Self {
            id: m.id,
            birth_date: parse_date(m.birth_date.as_deref()),
            name: m.name,
            bio: m.bio,
            photo_url: m.photo_url,
            nationality: m.nationality,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<genre::Model> for Genre {
    fn from(m: genre::Model) -> Self {
        Self { id: m.id, name: m.name, description: m.description }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Review {
    pub id: i32,
    pub movie_id: i32,
    pub reviewer_name: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: Option<Date>,
}

impl From<review::Model> for Review {
    fn from(m: review::Model) -> Self {
        Self {
            id: m.id,
            movie_id: m.movie_id,
            created_at: parse_date(m.created_at.as_deref()),
            reviewer_name: m.reviewer_name,
            rating: m.rating,
            comment: m.comment,
        }
    }
}

/// Listing shape: scalars plus director and genres.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSimple {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub rating: f64,
    pub runtime_minutes: Option<i32>,
    pub director: Option<Person>,
    pub genres: Vec<Genre>,
}

impl From<MovieGraph> for MovieSimple {
    fn from(g: MovieGraph) -> Self {
        let m = g.movie;
        Self {
            id: m.id,
            title: m.title,
            release_year: m.release_year,
            description: m.description,
            poster_url: m.poster_url,
            rating: m.rating,
            runtime_minutes: m.runtime_minutes,
            director: g.director.map(Person::from),
            genres: g.genres.into_iter().map(Genre::from).collect(),
        }
    }
}

/// Detail shape: the listing shape plus actors and reviews.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: MovieSimple,
    pub actors: Vec<Person>,
    pub reviews: Vec<Review>,
}

impl From<MovieGraph> for MovieDetail {
    fn from(mut g: MovieGraph) -> Self {
        let actors = std::mem::take(&mut g.actors).into_iter().map(Person::from).collect();
        let reviews = std::mem::take(&mut g.reviews).into_iter().map(Review::from).collect();
        Self { movie: g.into(), actors, reviews }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonWithMovies {
    #[serde(flatten)]
    pub person: Person,
    pub movies: Vec<MovieSimple>,
}

impl PersonWithMovies {
    pub fn new(person: impl Into<Person>, movies: Vec<MovieGraph>) -> Self {
        Self { person: person.into(), movies: movies.into_iter().map(MovieSimple::from).collect() }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn deleted(entity: &str) -> Self {
        Self { message: format!("{entity} deleted successfully") }
    }
}
