use hotelbeds_client::booking::{
    CancelBookingInput, FilterHotel, ListAvailableHotelsInput, ListBookingsInput, Mode, Occupancy,
    Stay,
};
use hotelbeds_client::content::{GetHotelDetailsInput, ListHotelsInput, ListInput};
use hotelbeds_client::signing::signature;
use hotelbeds_client::{
    ApiError, BookingApi, ClientConfig, CommaList, ContentApi, Date, ErrorCode, HotelbedsClient,
    KnownCondition, RateLimitConfig, RetryConfig,
};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const AVAILABILITY: &str = r#"{
    "auditData": {"processTime": "62", "timestamp": "2024-04-01 12:47:10.411", "serverId": "srv-1"},
    "hotels": {
        "checkIn": "2024-04-02",
        "checkOut": "2024-04-03",
        "total": 1,
        "hotels": [{
            "code": 6613,
            "name": "Hotel Mallorca",
            "minRate": "97.50",
            "currency": "EUR",
            "rooms": [{
                "code": "DBL.ST",
                "name": "Double standard",
                "rates": [{"rateKey": "rk-1", "net": "110.05", "sellingRate": "123.40", "allotment": 2}]
            }]
        }]
    }
}"#;

fn client_for(server: &MockServer, config: ClientConfig) -> HotelbedsClient {
    HotelbedsClient::new(config.with_base_url(server.uri())).unwrap()
}

fn config() -> ClientConfig {
    ClientConfig::new("test-key", "test-secret").with_timeout(Duration::from_secs(5))
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig::new(
        max_attempts,
        Duration::from_millis(10),
        Duration::from_millis(50),
    )
}

fn search() -> ListAvailableHotelsInput {
    ListAvailableHotelsInput {
        stay: Stay::new(
            Date::from_ymd(2024, 4, 2).unwrap(),
            Date::from_ymd(2024, 4, 3).unwrap(),
        ),
        occupancies: vec![Occupancy {
            rooms: 1,
            adults: 1,
            ..Default::default()
        }],
        hotels: Some(FilterHotel {
            hotel_codes: vec![6619, 6613],
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_availability_decodes_money_and_dates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hotel-api/1.0/hotels"))
        .and(header("api-key", "test-key"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header_exists("x-signature"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AVAILABILITY))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let resp = client.list_available_hotels(&search()).await.unwrap();

    let hotel = &resp.hotels.hotels[0];
    let rate = &hotel.rooms[0].rates[0];
    assert_eq!(rate.selling_rate.to_string(), "123.40");
    assert_eq!(resp.hotels.check_in.to_string(), "2024-04-02");
    assert_eq!(resp.audit.as_ref().unwrap().server_id, "srv-1");

    let stats = client.stats();
    assert_eq!(stats.requests_sent, 1);
    assert_eq!(stats.requests_succeeded, 1);
}

#[tokio::test]
async fn test_request_body_and_signature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hotel-api/1.0/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AVAILABILITY))
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let before = chrono::Utc::now().timestamp();
    client.list_available_hotels(&search()).await.unwrap();
    let after = chrono::Utc::now().timestamp();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let request = &requests[0];

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["stay"]["checkIn"], "2024-04-02");
    assert_eq!(body["hotels"]["hotel"], serde_json::json!([6619, 6613]));

    let sent = request.headers.get("x-signature").unwrap().to_str().unwrap();
    let matches_window =
        (before..=after).any(|ts| signature("test-key", "test-secret", ts) == sent);
    assert!(matches_window, "signature not derived from key, secret and request time");
}

#[tokio::test]
async fn test_rate_limited_short_shape_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/hotels"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(r#"{"error":"Rate limit exceeded for client"}"#),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/hotels"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"from":1,"to":2,"total":2,"hotels":[{"code":6613},{"code":6619}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config().with_retry(fast_retry(3)));
    let resp = client.list_hotels(&ListHotelsInput::default()).await.unwrap();

    assert_eq!(resp.total, 2);
    assert_eq!(resp.hotels[1].code, 6619);
    assert_eq!(client.stats().requests_retried, 1);
}

#[tokio::test]
async fn test_booking_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-api/1.0/bookings/1-999"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"auditData":{"processTime":"3","serverId":"srv-2"},"code":"PRODUCT_ERROR","message":"Booking does not exist"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config().with_retry(fast_retry(3)));
    let err = client.get_booking("1-999").await.unwrap_err();

    assert!(!err.is_retryable());
    assert!(err.is_error_code(ErrorCode::Product));
    assert_eq!(err.condition(), Some(KnownCondition::BookingNotFound));
    match err {
        ApiError::Upstream(envelope) => {
            assert_eq!(envelope.status_code, 404);
            assert_eq!(envelope.audit.unwrap().server_id, "srv-2");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_retries_stop_at_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/types/facilities"))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"error":"Quota exceeded"}"#))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, config().with_retry(fast_retry(2)));
    let err = client
        .list_facilities(&ListInput::page(1, 10))
        .await
        .unwrap_err();

    assert_eq!(err.condition(), Some(KnownCondition::QuotaExceeded));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_shift_days_never_reaches_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AVAILABILITY))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let mut input = search();
    input.stay.shift_days = Some(6);
    let err = client.list_available_hotels(&input).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref fault) if fault.field == "ShiftDays"));
    assert_eq!(client.stats().requests_sent, 0);
}

#[tokio::test]
async fn test_list_hotels_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/hotels"))
        .and(query_param("codes", "6619,6613"))
        .and(query_param("fields", "name,address"))
        .and(query_param("from", "1"))
        .and(query_param("to", "100"))
        .and(query_param("language", "ENG"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"total":0,"hotels":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let input = ListHotelsInput {
        codes: CommaList(vec![6619, 6613]),
        fields: CommaList(vec!["name".to_string(), "address".to_string()]),
        language: "ENG".to_string(),
        from: Some(1),
        to: Some(100),
        ..Default::default()
    };
    client.list_hotels(&input).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let url = &requests[0].url;
    assert!(url.query_pairs().all(|(key, _)| key != "countryCode"));
}

#[tokio::test]
async fn test_hotel_details_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/hotels/6613,6619/details"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"hotels":[{"code":6613},{"code":6619}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let resp = client
        .get_hotel_details(&[6613, 6619], &GetHotelDetailsInput::default())
        .await
        .unwrap();
    assert_eq!(resp.hotels.len(), 2);
    assert_eq!(resp.hotels[0].code, 6613);
}

#[tokio::test]
async fn test_list_and_cancel_bookings_use_their_own_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-api/1.0/bookings"))
        .and(query_param("from", "1"))
        .and(query_param("to", "10"))
        .and(query_param("hotel", "6613"))
        .and(query_param("start", "2024-04-01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"bookings":[{"reference":"1-3087450","status":"CONFIRMED","totalNet":"210.1"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/hotel-api/1.0/bookings/1-3087450"))
        .and(query_param("cancellationFlag", "SIMULATION"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"booking":{"reference":"1-3087450","status":"CANCELLED"}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config());
    let list = client
        .list_bookings(&ListBookingsInput {
            from: Some(1),
            to: Some(10),
            hotels: CommaList(vec![6613]),
            start: Date::from_ymd(2024, 4, 1).unwrap(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.bookings[0].total_net.to_string(), "210.10");

    let cancelled = client
        .cancel_booking("1-3087450", &CancelBookingInput::new(Mode::Simulation))
        .await
        .unwrap();
    assert_eq!(cancelled.booking.unwrap().reference, "1-3087450");
}

#[tokio::test]
async fn test_deadline_covers_slow_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/types/accommodations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"accommodations":[]}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        config().with_timeout(Duration::from_millis(100)),
    );
    let started = Instant::now();
    let err = client
        .list_accommodations(&ListInput::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Timeout(100)));
    assert!(started.elapsed() < Duration::from_millis(450));
    assert_eq!(client.stats().requests_timeout, 1);
}

#[tokio::test]
async fn test_non_json_error_is_undefined_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/locations/destinations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config().with_retry(fast_retry(3)));
    let err = client
        .list_destinations(&ListInput::default())
        .await
        .unwrap_err();

    match err {
        ApiError::Undefined { status_code, body } => {
            assert_eq!(status_code, 500);
            assert_eq!(body, "<html>oops</html>");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_retry_condition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/locations/destinations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/locations/destinations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"destinations":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let retry = fast_retry(2).with_condition(
        |err| matches!(err, ApiError::Undefined { status_code, .. } if *status_code == 503),
    );
    let client = client_for(&server, config().with_retry(retry));
    let resp = client.list_destinations(&ListInput::default()).await.unwrap();
    assert!(resp.destinations.is_empty());
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hotel-api/1.0/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"hotels":{"checkIn":"2024-04-02T00:00:00Z","hotels":[]}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, config().with_retry(fast_retry(3)));
    let err = client.list_available_hotels(&search()).await.unwrap_err();
    assert!(matches!(err, ApiError::DecodeError(_)));
}

#[tokio::test]
async fn test_rate_limiter_spaces_out_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/types/facilities"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"facilities":[]}"#))
        .expect(3)
        .mount(&server)
        .await;

    let limit = RateLimitConfig::new(10, 1, Duration::from_secs(1));
    let client = client_for(&server, config().with_rate_limit(limit));

    let started = Instant::now();
    for _ in 0..3 {
        client.list_facilities(&ListInput::default()).await.unwrap();
    }
    // one token up front, then one every 100ms
    assert!(started.elapsed() >= Duration::from_millis(180));
    assert!(client.stats().requests_throttled >= 1);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel-content-api/1.0/types/accommodations"))
        .and(header("x-request-source", "e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accommodations":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "x-request-source",
        reqwest::header::HeaderValue::from_static("e2e"),
    );
    let client = client_for(&server, config().with_headers(headers));
    client
        .list_accommodations(&ListInput::default())
        .await
        .unwrap();
}
