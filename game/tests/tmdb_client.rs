//! TMDB adapter tests against a local mock server.

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use game::config::FetchConfig;
use game::pool::load_actor_pool;
use game::tmdb::{ActorSource, SourceError, TmdbClient};
use game::ActorId;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(server.uri(), "test-key", "en-US", Duration::from_secs(5)).unwrap()
}

fn popular_person(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Actor {}", id),
        "profile_path": format!("/{}.jpg", id),
        "popularity": 50.0,
        "known_for": [
            { "id": 1, "original_language": "en" },
            { "id": 2, "original_language": "en" },
            { "id": 3, "original_language": "fr" }
        ]
    })
}

async fn mount_person(server: &MockServer, id: u64, birthday: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/person/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": format!("Actor {}", id),
            "birthday": birthday,
            "deathday": null,
            "profile_path": format!("/{}.jpg", id),
            "place_of_birth": "Los Angeles, California, USA",
            "popularity": 42.5
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/person/{}/movie_credits", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "cast": [
                { "id": 100, "title": "Big Film", "release_date": "2010-05-01",
                  "character": "Hero", "popularity": 33.0, "vote_count": 5000 },
                { "id": 101, "title": "Bigger Film", "release_date": "2015-05-01",
                  "character": "Villain", "popularity": 21.0, "vote_count": 900 },
                { "id": 102, "title": "Obscure Film", "release_date": "2018-05-01",
                  "character": "Extra", "popularity": 1.0, "vote_count": 3 }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_popular_page_sends_key_and_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/popular"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 3,
            "results": [popular_person(1), popular_person(2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let people = client(&server).popular_page(3).await.unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].known_for.len(), 3);
}

#[tokio::test]
async fn test_error_status_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/9"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).person_details(9).await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_body_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/9/movie_credits"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).movie_credits(9).await.unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
}

#[tokio::test]
async fn test_pool_from_mock_server() {
    let server = MockServer::start().await;
    let ids: Vec<u64> = (1..=4).collect();

    Mock::given(method("GET"))
        .and(path("/person/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": ids.iter().map(|&id| popular_person(id)).collect::<Vec<_>>()
        })))
        .mount(&server)
        .await;

    for (i, &id) in ids.iter().enumerate() {
        mount_person(&server, id, &format!("{}-03-10", 1970 + i)).await;
    }

    let config = FetchConfig {
        min_valid_actors: 4,
        ..FetchConfig::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    let pool = load_actor_pool(&client(&server), &config, &[1], today, &HashSet::new())
        .await
        .unwrap();

    assert_eq!(pool.len(), 4);
    let first = pool.get(ActorId(1)).unwrap();
    assert_eq!(first.age, 54);
    // obscure film filtered out, newest first
    let titles: Vec<&str> = first.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Bigger Film", "Big Film"]);
}
