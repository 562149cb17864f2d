//! Integration tests for the geolocation client using wiremock

use integration_geoip::{GeoIpClient, GeoIpConfig, GeoIpError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> GeoIpClient {
    let config = GeoIpConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    #[allow(clippy::expect_used)]
    GeoIpClient::new(config).expect("client creation should succeed")
}

fn success_body() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "city": "Berlin",
        "country": "Germany",
        "regionName": "Berlin",
        "lat": 52.52,
        "lon": 13.405,
        "timezone": "Europe/Berlin",
        "query": "203.0.113.7"
    })
}

#[tokio::test]
async fn lookup_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let location = client.lookup().await.expect("location");

    assert_eq!(location.city, "Berlin");
    assert_eq!(location.country, "Germany");
    assert_eq!(location.region, "Berlin");
    assert_eq!(location.timezone, "Europe/Berlin");
    assert!((location.latitude - 52.52).abs() < 1e-9);
    assert!((location.longitude - 13.405).abs() < 1e-9);
}

#[tokio::test]
async fn lookup_fail_status_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup().await;
    let Err(GeoIpError::InvalidResponse(message)) = result else {
        unreachable!("expected InvalidResponse");
    };
    assert!(message.contains("reserved range"));
}

#[tokio::test]
async fn lookup_missing_fields_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "country": "Germany"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup().await;
    let Err(GeoIpError::InvalidResponse(message)) = result else {
        unreachable!("expected InvalidResponse");
    };
    assert!(message.contains("city"));
    assert!(message.contains("lat"));
}

#[tokio::test]
async fn lookup_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup().await;
    assert!(matches!(result, Err(GeoIpError::RateLimited)));
}

#[tokio::test]
async fn lookup_server_error_is_service_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup().await;
    assert!(matches!(result, Err(GeoIpError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn lookup_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.lookup().await;
    assert!(matches!(result, Err(GeoIpError::InvalidResponse(_))));
}
