use serde_json::{Value, json};
use std::borrow::Cow;
use timeline_http::{Auth, HttpClient, HttpError, RequestOpts, StatusCode};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn sends_bearer_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/things.json"))
        .and(header("authorization", "Bearer abc"))
        .and(query_param("screen_name", "jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: Value = client
        .get_json(
            "1.1/things.json",
            RequestOpts {
                auth: Some(Auth::Bearer("abc")),
                query: Some(vec![("screen_name", Cow::Borrowed("jack"))]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got, json!([{"id": 1}]));
}

#[tokio::test]
async fn api_error_is_returned_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"errors": [{"code": 89, "message": "Invalid or expired token."}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("x.json", RequestOpts::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.to_string().contains("Invalid or expired token."));
}

#[tokio::test]
async fn server_errors_and_rate_limits_are_not_retried() {
    for code in [429u16, 503] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(code).insert_header("retry-after", "1"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&server.uri()).unwrap();
        let err = client
            .get_json::<Value>("x.json", RequestOpts::default())
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Api { status, .. } if status.as_u16() == code));
        server.verify().await;
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("x.json", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Decode(_, snippet) if snippet == "not json"));
}
