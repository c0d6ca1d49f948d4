//! Sample catalog inserted on first start.

use jiff::civil::{Date, date};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::info;

use crate::{
    entities::genre,
    error::RepoResult,
    models::{GenreInput, MovieCreate, PersonInput, ReviewCreate},
    repo,
};

const GENRES: &[(&str, &str)] = &[
    ("Action", "High-energy films with physical stunts and chases"),
    ("Comedy", "Films designed to make audiences laugh"),
    ("Drama", "Serious, plot-driven films with realistic characters"),
    ("Science Fiction", "Films with futuristic or scientific elements"),
    ("Horror", "Films designed to frighten and invoke fear"),
    ("Romance", "Films centered on romantic relationships"),
    ("Thriller", "Suspenseful films with high tension"),
    ("Animation", "Films created using animation techniques"),
    ("Adventure", "Exciting films with exploration and journeys"),
    ("Fantasy", "Films with magical and supernatural elements"),
];

struct SeedPerson {
    name: &'static str,
    bio: &'static str,
    born: Date,
    nationality: &'static str,
}

impl SeedPerson {
    fn input(&self) -> PersonInput {
        PersonInput {
            name: self.name.into(),
            bio: Some(self.bio.into()),
            birth_date: Some(self.born),
            photo_url: None,
            nationality: Some(self.nationality.into()),
        }
    }
}

const DIRECTORS: &[SeedPerson] = &[
    SeedPerson {
        name: "Christopher Nolan",
        bio: "British-American filmmaker known for complex narratives",
        born: date(1970, 7, 30),
        nationality: "British-American",
    },
    SeedPerson {
        name: "Steven Spielberg",
        bio: "American filmmaker and pioneer of the New Hollywood era",
        born: date(1946, 12, 18),
        nationality: "American",
    },
    SeedPerson {
        name: "Quentin Tarantino",
        bio: "American filmmaker known for stylized violence and dialogue",
        born: date(1963, 3, 27),
        nationality: "American",
    },
    SeedPerson {
        name: "Martin Scorsese",
        bio: "American filmmaker known for crime films",
        born: date(1942, 11, 17),
        nationality: "American",
    },
    SeedPerson {
        name: "Greta Gerwig",
        bio: "American filmmaker and actress",
        born: date(1983, 8, 4),
        nationality: "American",
    },
    SeedPerson {
        name: "Denis Villeneuve",
        bio: "Canadian filmmaker known for sci-fi epics",
        born: date(1967, 10, 3),
        nationality: "Canadian",
    },
];

const ACTORS: &[SeedPerson] = &[
    SeedPerson {
        name: "Leonardo DiCaprio",
        bio: "American actor and film producer",
        born: date(1974, 11, 11),
        nationality: "American",
    },
    SeedPerson {
        name: "Scarlett Johansson",
        bio: "American actress and singer",
        born: date(1984, 11, 22),
        nationality: "American",
    },
    SeedPerson {
        name: "Christian Bale",
        bio: "English actor known for method acting",
        born: date(1974, 1, 30),
        nationality: "British",
    },
    SeedPerson {
        name: "Margot Robbie",
        bio: "Australian actress and producer",
        born: date(1990, 7, 2),
        nationality: "Australian",
    },
    SeedPerson {
        name: "Tom Hanks",
        bio: "American actor and filmmaker",
        born: date(1956, 7, 9),
        nationality: "American",
    },
    SeedPerson {
        name: "Meryl Streep",
        bio: "American actress often described as the best of her generation",
        born: date(1949, 6, 22),
        nationality: "American",
    },
    SeedPerson {
        name: "Robert Downey Jr.",
        bio: "American actor known for Iron Man",
        born: date(1965, 4, 4),
        nationality: "American",
    },
    SeedPerson {
        name: "Ryan Gosling",
        bio: "Canadian actor and musician",
        born: date(1980, 11, 12),
        nationality: "Canadian",
    },
    SeedPerson {
        name: "Emma Stone",
        bio: "American actress",
        born: date(1988, 11, 6),
        nationality: "American",
    },
    SeedPerson {
        name: "Brad Pitt",
        bio: "American actor and film producer",
        born: date(1963, 12, 18),
        nationality: "American",
    },
];

/// Relations are indexes into `GENRES`, `DIRECTORS` and `ACTORS`.
struct SeedMovie {
    title: &'static str,
    year: i32,
    description: &'static str,
    rating: f64,
    runtime: i32,
    director: usize,
    genres: &'static [usize],
    actors: &'static [usize],
}

const MOVIES: &[SeedMovie] = &[
    SeedMovie {
        title: "Inception",
        year: 2010,
        description: "A thief who steals corporate secrets through dream-sharing technology.",
        rating: 8.8,
        runtime: 148,
        director: 0,
        genres: &[0, 3, 6],
        actors: &[0, 7, 8],
    },
    SeedMovie {
        title: "The Dark Knight",
        year: 2008,
        description: "Batman battles the Joker's reign of chaos and terror in Gotham City.",
        rating: 9.0,
        runtime: 152,
        director: 0,
        genres: &[0, 2, 6],
        actors: &[2],
    },
    SeedMovie {
        title: "Pulp Fiction",
        year: 1994,
        description: "Various interconnected stories of crime in Los Angeles.",
        rating: 8.9,
        runtime: 154,
        director: 2,
        genres: &[2, 6],
        actors: &[],
    },
    SeedMovie {
        title: "Barbie",
        year: 2023,
        description: "Barbie and Ken are having the time of their lives in Colorful Barbieland.",
        rating: 7.0,
        runtime: 114,
        director: 4,
        genres: &[1, 8, 9],
        actors: &[3, 7],
    },
    SeedMovie {
        title: "Dune",
        year: 2021,
        description: "A noble family becomes embroiled in a war for the desert planet Arrakis.",
        rating: 8.0,
        runtime: 155,
        director: 5,
        genres: &[3, 8],
        actors: &[],
    },
    SeedMovie {
        title: "Saving Private Ryan",
        year: 1998,
        description: "Following the Normandy Landings, a group searches for a paratrooper.",
        rating: 8.6,
        runtime: 169,
        director: 1,
        genres: &[0, 2],
        actors: &[4],
    },
    SeedMovie {
        title: "The Wolf of Wall Street",
        year: 2013,
        description: "Based on the true story of Jordan Belfort's rise and fall.",
        rating: 8.2,
        runtime: 180,
        director: 3,
        genres: &[1, 2],
        actors: &[0, 3],
    },
];

/// (movie index, reviewer, rating, comment, date)
const REVIEWS: &[(usize, &str, f64, &str, Date)] = &[
    (0, "John Doe", 9.0, "Mind-bending masterpiece! Nolan at his best.", date(2023, 1, 15)),
    (0, "Jane Smith", 8.5, "Complex but rewarding. Multiple viewings recommended.", date(2023, 2, 20)),
    (1, "Movie Critic", 10.0, "Heath Ledger's Joker is legendary!", date(2023, 3, 10)),
    (3, "Pink Fan", 7.5, "Surprisingly deep and entertaining!", date(2023, 8, 1)),
];

/// Inserts the sample catalog unless genres already exist. Returns whether
/// anything was written.
pub async fn seed_if_empty(db: &DatabaseConnection) -> RepoResult<bool> {
    let existing = genre::Entity::find().count(db).await?;
    if existing > 0 {
        info!(genres = existing, "catalog already populated, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;

    let mut genre_ids = Vec::with_capacity(GENRES.len());
    for (name, description) in GENRES {
        let input = GenreInput { name: (*name).into(), description: Some((*description).into()) };
        genre_ids.push(repo::genre::create(&txn, &input).await?.id);
    }

    let mut director_ids = Vec::with_capacity(DIRECTORS.len());
    for person in DIRECTORS {
        director_ids.push(repo::director::create(&txn, &person.input()).await?.id);
    }

    let mut actor_ids = Vec::with_capacity(ACTORS.len());
    for person in ACTORS {
        actor_ids.push(repo::actor::create(&txn, &person.input()).await?.id);
    }

    let mut movie_ids = Vec::with_capacity(MOVIES.len());
    for seed in MOVIES {
        let input = MovieCreate {
            title: seed.title.into(),
            release_year: seed.year,
            description: Some(seed.description.into()),
            poster_url: None,
            rating: Some(seed.rating),
            runtime_minutes: Some(seed.runtime),
            director_id: Some(director_ids[seed.director]),
            genre_ids: seed.genres.iter().map(|&i| genre_ids[i]).collect(),
            actor_ids: seed.actors.iter().map(|&i| actor_ids[i]).collect(),
        };
        movie_ids.push(repo::movie::create(&txn, &input).await?.movie.id);
    }

    for &(movie, reviewer, rating, comment, created_at) in REVIEWS {
        let input = ReviewCreate {
            movie_id: movie_ids[movie],
            reviewer_name: reviewer.into(),
            rating,
            comment: Some(comment.into()),
            created_at: Some(created_at),
        };
        repo::review::create(&txn, &input).await?;
    }

    txn.commit().await?;
    info!(
        genres = genre_ids.len(),
        directors = director_ids.len(),
        actors = actor_ids.len(),
        movies = movie_ids.len(),
        reviews = REVIEWS.len(),
        "seeded sample catalog"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{Page, testing};

    #[tokio::test]
    async fn seeds_once() {
        let db = testing::db().await;
        assert!(seed_if_empty(&db).await.unwrap());
        assert!(!seed_if_empty(&db).await.unwrap());

        assert_eq!(repo::genre::list(&db, Page::default()).await.unwrap().len(), GENRES.len());
        assert_eq!(repo::movie::list(&db, Page::default()).await.unwrap().len(), MOVIES.len());
    }

    #[tokio::test]
    async fn seeded_inception_has_its_relations() {
        let db = testing::db().await;
        seed_if_empty(&db).await.unwrap();

        let found = repo::movie::search(&db, "inception", Page::default()).await.unwrap();
        let inception = repo::movie::get(&db, found[0].movie.id).await.unwrap().unwrap();
        assert_eq!(inception.director.unwrap().name, "Christopher Nolan");
        assert_eq!(
            inception.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            ["Action", "Science Fiction", "Thriller"]
        );
        assert_eq!(inception.actors.len(), 3);
        assert_eq!(inception.reviews.len(), 2);
    }
}
