//! Integration tests for OpenWeatherProvider using wiremock.
//!
//! Each test mounts a stub of the current-weather endpoint and checks how the
//! provider classifies the response.

use std::time::Duration;

use lynx_core::{
    ApiKey, FetchOptions, LatestOnly, LocationQuery, OpenWeatherProvider, Outcome, WeatherError,
    WeatherProvider, suggest,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.12, "lat": 51.5},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 22.0, "feels_like": 21.0, "humidity": 48},
        "wind": {"speed": 4.1},
        "sys": {"country": "GB"},
        "dt": 1717243200,
        "name": "London",
        "cod": 200
    })
}

fn provider_for(server: &MockServer, key: &str) -> OpenWeatherProvider {
    let opts = FetchOptions::default().with_base_url(server.uri());
    OpenWeatherProvider::new(ApiKey::new(key).unwrap(), opts).unwrap()
}

async fn stub(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_coordinates_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "valid-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, "valid-key");
    let query = LocationQuery::coordinates(51.5, -0.12).unwrap();

    let obs = provider.fetch(&query).await.unwrap();
    assert_eq!(obs.temperature_celsius, 22.0);
    assert_eq!(obs.feels_like_celsius, 21.0);
    assert_eq!(obs.condition, "Clear");
    assert_eq!(obs.description, "clear sky");
    assert_eq!(obs.place_name, "London");
    assert_eq!(obs.country_code, "GB");

    let suggestion = suggest(obs.temperature_celsius, &obs.condition);
    assert_eq!(suggestion.clothing, "T-shirt, shorts, sunglasses");
    assert_eq!(suggestion.activity, "Perfect for a hike or picnic in the sun");
    assert_eq!(obs.suggestion(), suggestion);
}

#[tokio::test]
async fn test_city_name_uses_q_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, "valid-key");
    let obs = provider.fetch(&LocationQuery::city("  London  ").unwrap()).await.unwrap();

    assert_eq!(obs.place_name, "London");
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    stub(
        &server,
        ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })),
    )
    .await;

    let provider = provider_for(&server, "bad-key");
    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();

    assert_eq!(err, WeatherError::Unauthorized);
    assert!(err.is_credential_problem());
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    stub(
        &server,
        ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })),
    )
    .await;

    let provider = provider_for(&server, "valid-key");
    let err = provider.fetch(&LocationQuery::city("Atlantis").unwrap()).await.unwrap_err();

    assert_eq!(err, WeatherError::NotFound);
}

#[tokio::test]
async fn test_server_error_with_message() {
    let server = MockServer::start().await;
    stub(
        &server,
        ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "cod": 429,
            "message": "Your account is temporary blocked due to exceeding of requests limitation"
        })),
    )
    .await;

    let provider = provider_for(&server, "valid-key");
    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::UpstreamError(
            "Your account is temporary blocked due to exceeding of requests limitation".into()
        )
    );
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;
    stub(&server, ResponseTemplate::new(503)).await;

    let provider = provider_for(&server, "valid-key");
    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();

    assert_eq!(err, WeatherError::UpstreamError("unexpected status 503".into()));
}

#[tokio::test]
async fn test_success_missing_fields_is_malformed() {
    let server = MockServer::start().await;
    stub(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "main": {"temp": 22.0}
        })),
    )
    .await;

    let provider = provider_for(&server, "valid-key");
    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();

    assert_eq!(err, WeatherError::UpstreamError("malformed response".into()));
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // Grab a free port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let opts = FetchOptions::default()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(2));
    let provider = OpenWeatherProvider::new(ApiKey::new("valid-key").unwrap(), opts).unwrap();

    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();
    assert_eq!(err, WeatherError::NetworkFailure);
}

/// Serve one connection that promises `Content-Length: 100` but sends only
/// the start of the body before closing.
async fn serve_truncated(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"cod\":"
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_unauthorized_with_truncated_body() {
    let base = serve_truncated("HTTP/1.1 401 Unauthorized").await;
    let opts = FetchOptions::default()
        .with_base_url(base)
        .with_timeout(Duration::from_secs(5));
    let provider = OpenWeatherProvider::new(ApiKey::new("bad-key").unwrap(), opts).unwrap();

    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();
    assert_eq!(err, WeatherError::Unauthorized);
}

#[tokio::test]
async fn test_not_found_with_truncated_body() {
    let base = serve_truncated("HTTP/1.1 404 Not Found").await;
    let opts = FetchOptions::default()
        .with_base_url(base)
        .with_timeout(Duration::from_secs(5));
    let provider = OpenWeatherProvider::new(ApiKey::new("valid-key").unwrap(), opts).unwrap();

    let err = provider.fetch(&LocationQuery::city("Atlantis").unwrap()).await.unwrap_err();
    assert_eq!(err, WeatherError::NotFound);
}

#[tokio::test]
async fn test_success_with_truncated_body_is_network_failure() {
    let base = serve_truncated("HTTP/1.1 200 OK").await;
    let opts = FetchOptions::default()
        .with_base_url(base)
        .with_timeout(Duration::from_secs(5));
    let provider = OpenWeatherProvider::new(ApiKey::new("valid-key").unwrap(), opts).unwrap();

    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();
    assert_eq!(err, WeatherError::NetworkFailure);
}

#[tokio::test]
async fn test_timeout_is_network_failure() {
    let server = MockServer::start().await;
    stub(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(london_body())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let opts = FetchOptions::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));
    let provider = OpenWeatherProvider::new(ApiKey::new("valid-key").unwrap(), opts).unwrap();

    let err = provider.fetch(&LocationQuery::city("London").unwrap()).await.unwrap_err();
    assert_eq!(err, WeatherError::NetworkFailure);
}

#[tokio::test]
async fn test_each_fetch_issues_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider_for(&server, "valid-key");
    let query = LocationQuery::city("London").unwrap();

    let (a, b) = tokio::join!(provider.fetch(&query), provider.fetch(&query));
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Slowtown"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .mount(&server)
        .await;

    let provider = provider_for(&server, "valid-key");
    let gate = LatestOnly::new();

    let slow = LocationQuery::city("Slowtown").unwrap();
    let fast = LocationQuery::city("London").unwrap();

    let (first, second) = tokio::join!(gate.run(provider.fetch(&slow)), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        gate.run(provider.fetch(&fast)).await
    });

    assert_eq!(first, Outcome::Superseded);
    let obs = second.completed().expect("latest request completes").unwrap();
    assert_eq!(obs.place_name, "London");
}
