//! Feed and geolocation clients against a throwaway local HTTP server

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use weather_board::api;
use weather_board::model::Coordinates;
use weather_board::store::WeatherStore;

/// Serve one canned response per connection, forever.
async fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_feed_loads_cities() {
    let url = serve(
        "200 OK",
        r#"{"cities":[{"city":"Quito","temperature":14,"wind":{"direction":"N","speed":1},"weather":{"rainy":true},"coordinates":{"latitude":-0.18,"longitude":-78.47}}]}"#,
    )
    .await;

    let cities = api::load_all_cities(&url).await;
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].city, "Quito");
}

#[tokio::test]
async fn test_feed_server_error_yields_no_cities() {
    let url = serve("500 Internal Server Error", "{}").await;

    assert!(api::fetch_cities(&url).await.is_err());
    let cities = api::load_all_cities(&url).await;
    assert!(cities.is_empty());

    let mut store = WeatherStore::new();
    store.load_all_cities(cities);
    assert!(store.cities_for_general_list().is_empty());
    assert!(store.views().general.rows.is_empty());
}

#[tokio::test]
async fn test_feed_malformed_body_yields_no_cities() {
    let url = serve("200 OK", r#"{"towns":[]}"#).await;
    assert!(api::load_all_cities(&url).await.is_empty());
}

#[tokio::test]
async fn test_locate_parses_loc() {
    let url = serve("200 OK", r#"{"ip":"203.0.113.7","loc":"-33.8688,151.2093"}"#).await;
    assert_eq!(
        api::locate(&url).await,
        Coordinates::new(-33.8688, 151.2093)
    );
}

#[tokio::test]
async fn test_locate_falls_back_to_default_center() {
    let url = serve("200 OK", r#"{"loc":"somewhere"}"#).await;
    assert_eq!(api::locate(&url).await, Coordinates::fallback());

    let url = serve("503 Service Unavailable", "{}").await;
    assert_eq!(api::locate(&url).await, Coordinates::fallback());
}
