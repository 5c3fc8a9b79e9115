use chrono::NaiveDate;
use covid_importer::config::{Config, Credentials, Protocol, V2AuthRule};
use covid_importer::writer::writer_for;
use covid_importer::{ErrorKind, Record, V1Writer, V2Writer, Writer};
use httpmock::prelude::*;
use url::Url;

fn records() -> Vec<Record> {
    vec![
        Record {
            country: "US".to_string(),
            province: String::new(),
            count: 10,
            date: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
        },
        Record {
            country: "China".to_string(),
            province: "Hubei".to_string(),
            count: 444,
            date: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
        },
    ]
}

fn v2_config(server: &MockServer, user: &str, rule: V2AuthRule) -> Config {
    Config {
        source: Url::parse("http://127.0.0.1:1/unused.csv").unwrap(),
        target: server.base_url(),
        protocol: Protocol::V2,
        credentials: Credentials::new(user, ""),
        v2_auth: rule,
    }
}

async fn mock_v1_ping(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204)
                .header("X-Influxdb-Build", "OSS")
                .header("X-Influxdb-Version", "1.8.10");
        })
        .await
}

#[tokio::test]
async fn v1_writes_whole_batch_in_one_request() {
    let server = MockServer::start_async().await;
    let ping = mock_v1_ping(&server).await;
    // Registered first so it takes any request carrying credentials.
    let with_user = server
        .mock_async(|when, then| {
            when.method(POST).path("/write").query_param_exists("u");
            then.status(401);
        })
        .await;
    let with_password = server
        .mock_async(|when, then| {
            when.method(POST).path("/write").query_param_exists("p");
            then.status(401);
        })
        .await;
    let write = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/write")
                .query_param("db", "covid")
                .body_contains("cases,country=US count=10i 1579651200")
                .body_contains("province=Hubei");
            then.status(204);
        })
        .await;

    let writer = V1Writer::new(&server.base_url(), &Credentials::new("", ""));
    writer.connect().await.unwrap();
    let written = writer.write_points(&records()).await.unwrap();

    assert_eq!(written, 2);
    ping.assert_async().await;
    write.assert_hits_async(1).await;
    assert_eq!(with_user.hits_async().await, 0);
    assert_eq!(with_password.hits_async().await, 0);
}

#[tokio::test]
async fn record_before_1970_fails_before_any_request() {
    let server = MockServer::start_async().await;
    let write = server
        .mock_async(|when, then| {
            when.method(POST).path("/write");
            then.status(204);
        })
        .await;

    let mut batch = records();
    batch[1].date = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();

    let writer = V1Writer::new(&server.base_url(), &Credentials::new("", ""));
    let err = writer.write_points(&batch).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(write.hits_async().await, 0);
}

#[tokio::test]
async fn v1_sends_credentials_with_username() {
    let server = MockServer::start_async().await;
    mock_v1_ping(&server).await;
    let write = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/write")
                .query_param("u", "admin")
                .query_param("p", "secret");
            then.status(204);
        })
        .await;

    let writer = V1Writer::new(&server.base_url(), &Credentials::new("admin", "secret"));
    writer.connect().await.unwrap();
    writer.write_points(&records()).await.unwrap();

    write.assert_async().await;
}

#[tokio::test]
async fn v1_rejected_batch_is_a_write_error() {
    let server = MockServer::start_async().await;
    mock_v1_ping(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/write");
            then.status(400)
                .header("Content-Type", "application/json")
                .body(r#"{"error":"unable to parse points"}"#);
        })
        .await;

    let writer = V1Writer::new(&server.base_url(), &Credentials::new("", ""));
    writer.connect().await.unwrap();
    let err = writer.write_points(&records()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
}

#[tokio::test]
async fn v1_unreachable_server_is_a_connection_error() {
    let writer = V1Writer::new("http://127.0.0.1:1", &Credentials::new("", ""));
    let err = writer.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn v2_writes_to_fixed_bucket_and_org() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204);
        })
        .await;
    let write = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/write")
                .query_param("org", "covid-org")
                .query_param("bucket", "covid-bucket")
                .query_param("precision", "s")
                .body_contains("covid-19,country=US count=10i 1579651200")
                .body_contains("covid-19,country=China,province=Hubei count=444i");
            then.status(204);
        })
        .await;

    let writer = V2Writer::new(&server.base_url(), None).unwrap();
    writer.connect().await.unwrap();
    let written = writer.write_points(&records()).await.unwrap();

    assert_eq!(written, 2);
    ping.assert_async().await;
    write.assert_hits_async(1).await;
}

#[tokio::test]
async fn v2_signs_in_when_username_is_given() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204);
        })
        .await;
    let signin = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/signin")
                // admin:secret
                .header("authorization", "Basic YWRtaW46c2VjcmV0");
            then.status(204)
                .header("Set-Cookie", "influxdb-oss-session=abc; Path=/");
        })
        .await;

    let writer = writer_for(&Config {
        credentials: Credentials::new("admin", "secret"),
        ..v2_config(&server, "", V2AuthRule::WhenUserSet)
    })
    .unwrap();
    writer.connect().await.unwrap();

    signin.assert_async().await;
}

#[tokio::test]
async fn v2_without_username_skips_sign_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204);
        })
        .await;
    let signin = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v2/signin");
            then.status(204);
        })
        .await;

    let writer = writer_for(&v2_config(&server, "", V2AuthRule::WhenUserSet)).unwrap();
    writer.connect().await.unwrap();

    assert_eq!(signin.hits_async().await, 0);
}

// Older releases attached the (empty) credential pair exactly when no
// username was given, and dropped them when one was.
#[tokio::test]
async fn v2_inverted_rule_signs_in_with_empty_pair() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204);
        })
        .await;
    let signin = server
        .mock_async(|when, then| {
            // ":" encoded
            when.method(POST)
                .path("/api/v2/signin")
                .header("authorization", "Basic Og==");
            then.status(204);
        })
        .await;

    let anonymous = writer_for(&v2_config(&server, "", V2AuthRule::Inverted)).unwrap();
    anonymous.connect().await.unwrap();
    signin.assert_hits_async(1).await;

    let named = writer_for(&v2_config(&server, "admin", V2AuthRule::Inverted)).unwrap();
    named.connect().await.unwrap();
    signin.assert_hits_async(1).await;
}

#[tokio::test]
async fn v2_failed_ping_is_a_connection_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(503);
        })
        .await;

    let writer = V2Writer::new(&server.base_url(), None).unwrap();
    let err = writer.connect().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn v2_rejected_batch_is_a_write_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v2/write");
            then.status(401).body(r#"{"code":"unauthorized"}"#);
        })
        .await;

    let writer = V2Writer::new(&server.base_url(), None).unwrap();
    let err = writer.write_points(&records()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Write);
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn empty_batch_sends_nothing() {
    let server = MockServer::start_async().await;
    let write = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v2/write");
            then.status(204);
        })
        .await;

    let writer = V2Writer::new(&server.base_url(), None).unwrap();
    assert_eq!(writer.write_points(&[]).await.unwrap(), 0);
    assert_eq!(write.hits_async().await, 0);
}
