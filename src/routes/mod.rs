mod actors;
mod directors;
mod genres;
mod movies;
mod reviews;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/filter", get(movies::filter))
        .route("/movies/search", get(movies::search))
        .route("/movies/{id}", get(movies::get).put(movies::update).delete(movies::delete))
        .route("/actors", get(actors::list).post(actors::create))
        .route("/actors/search", get(actors::search))
        .route("/actors/by-genre/{genre_id}", get(actors::by_genre))
        .route("/actors/{id}", get(actors::get).put(actors::update).delete(actors::delete))
        .route("/directors", get(directors::list).post(directors::create))
        .route("/directors/search", get(directors::search))
        .route(
            "/directors/{id}",
            get(directors::get).put(directors::update).delete(directors::delete),
        )
        .route("/genres", get(genres::list).post(genres::create))
        .route("/genres/search", get(genres::search))
        .route("/genres/{id}", get(genres::get).put(genres::update).delete(genres::delete))
        .route("/reviews", axum::routing::post(reviews::create))
        .route("/reviews/movie/{movie_id}", get(reviews::for_movie))
        .route("/reviews/{id}", get(reviews::get).delete(reviews::delete));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Movie Explorer API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "Movie Explorer API" }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::repo::testing;

    async fn test_app() -> Router {
        app(Arc::new(AppState { db: testing::db().await }))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header("content-type", "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> Value {
        let (status, value) = send(app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "POST {uri}: {value}");
        value
    }

    #[tokio::test]
    async fn health_and_index() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Movie Explorer"));
    }

    #[tokio::test]
    async fn movie_lifecycle() {
        let app = test_app().await;
        let nolan = post(&app, "/api/directors", json!({ "name": "Christopher Nolan" })).await;
        let action = post(&app, "/api/genres", json!({ "name": "Action" })).await;
        let leo = post(&app, "/api/actors", json!({ "name": "Leonardo DiCaprio", "birth_date": "1974-11-11" })).await;
        assert_eq!(leo["birth_date"], "1974-11-11");

        let created = post(
            &app,
            "/api/movies",
            json!({
                "title": "Inception",
                "release_year": 2010,
                "rating": 8.8,
                "director_id": nolan["id"],
                "genre_ids": [action["id"]],
                "actor_ids": [leo["id"]],
            }),
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["director"]["name"], "Christopher Nolan");
        assert_eq!(created["genres"][0]["name"], "Action");
        assert_eq!(created["actors"][0]["name"], "Leonardo DiCaprio");
        assert_eq!(created["reviews"], json!([]));

        let unrated = post(
            &app,
            "/api/movies",
            json!({ "title": "Heat", "release_year": 1995, "rating": null }),
        )
        .await;
        assert_eq!(unrated["rating"], 0.0);
        send(&app, Method::DELETE, &format!("/api/movies/{}", unrated["id"]), None).await;

        let (status, listing) = send(&app, Method::GET, "/api/movies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing.as_array().unwrap().len(), 1);
        assert!(listing[0].get("actors").is_none());

        let (status, patched) = send(
            &app,
            Method::PUT,
            &format!("/api/movies/{id}"),
            Some(json!({ "rating": 9.1, "director_id": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["rating"], 9.1);
        assert_eq!(patched["title"], "Inception");
        assert_eq!(patched["director"], Value::Null);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/movies/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Movie deleted successfully");

        let (status, body) = send(&app, Method::GET, &format!("/api/movies/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Movie not found");
    }

    #[tokio::test]
    async fn filter_and_search_routes() {
        let app = test_app().await;
        let drama = post(&app, "/api/genres", json!({ "name": "Drama" })).await;
        post(&app, "/api/movies", json!({ "title": "Inception", "release_year": 2010 })).await;
        post(
            &app,
            "/api/movies",
            json!({ "title": "Pulp Fiction", "release_year": 1994, "genre_ids": [drama["id"]] }),
        )
        .await;

        let uri = format!("/api/movies/filter?genre_id={}", drama["id"]);
        let (status, found) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["title"], "Pulp Fiction");

        let (status, found) = send(&app, Method::GET, "/api/movies/search?q=INCEP", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found[0]["title"], "Inception");

        let (status, found) = send(&app, Method::GET, "/api/genres/search?q=dram", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found[0]["name"], "Drama");
    }

    #[tokio::test]
    async fn actor_detail_lists_movies() {
        let app = test_app().await;
        let bale = post(&app, "/api/actors", json!({ "name": "Christian Bale" })).await;
        post(
            &app,
            "/api/movies",
            json!({ "title": "The Dark Knight", "release_year": 2008, "actor_ids": [bale["id"]] }),
        )
        .await;

        let (status, detail) = send(&app, Method::GET, &format!("/api/actors/{}", bale["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["name"], "Christian Bale");
        assert_eq!(detail["movies"][0]["title"], "The Dark Knight");
    }

    #[tokio::test]
    async fn reviews_are_mounted() {
        let app = test_app().await;
        let movie = post(&app, "/api/movies", json!({ "title": "Barbie", "release_year": 2023 })).await;
        let review = post(
            &app,
            "/api/reviews",
            json!({ "movie_id": movie["id"], "reviewer_name": "Pink Fan", "rating": 7.5 }),
        )
        .await;

        let uri = format!("/api/reviews/movie/{}", movie["id"]);
        let (status, reviews) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reviews[0]["reviewer_name"], "Pink Fan");

        let uri = format!("/api/reviews/{}", review["id"]);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn error_statuses() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/movies",
            Some(json!({ "title": "Ghost", "release_year": 2000, "director_id": 99 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Director 99 not found");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/movies",
            Some(json!({ "title": "Too Good", "release_year": 2000, "rating": 11.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["field"], "rating");

        let (status, _) = send(&app, Method::POST, "/api/movies", Some(json!({ "title": "No Year" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, Method::GET, "/api/movies?limit=0", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(&app, Method::GET, "/api/movies?skip=18446744073709551615", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["field"], "skip");

        let (status, body) = send(&app, Method::GET, "/api/movies/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["field"], "path");

        let (status, _) = send(&app, Method::DELETE, "/api/reviews/x1", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, Method::GET, "/api/movies/search", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        post(&app, "/api/genres", json!({ "name": "Horror" })).await;
        let (status, _) = send(&app, Method::POST, "/api/genres", Some(json!({ "name": "Horror" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, Method::DELETE, "/api/directors/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Director not found");
    }
}
