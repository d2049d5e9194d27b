use std::{sync::Arc, time::Duration};

use join_notify::{
    JoinClient, JoinConfig, NotifierRegistry, NotifyError, NotifyErrorKind, RequestSession,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tokio::net::TcpListener;

const SEND_PUSH_PATH: &str = "/_ah/api/messaging/v1/sendPush";

fn client_for(server: &ServerGuard) -> JoinClient {
    JoinClient::with_url(format!("{}{SEND_PUSH_PATH}", server.url())).unwrap()
}

#[tokio::test]
async fn sends_group_push() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "Download finished".into()),
            Matcher::UrlEncoded("text".into(), "Some.Show.S01E01".into()),
            Matcher::UrlEncoded("apikey".into(), "K".into()),
            Matcher::UrlEncoded("deviceId".into(), "group.all".into()),
            Matcher::UrlEncoded("priority".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let config = JoinConfig::from_value(&json!({"api_key": "K", "priority": 1})).unwrap();
    client_for(&server)
        .notify("Download finished", "Some.Show.S01E01", &config)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn sends_device_list_and_sms() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "T".into()),
            Matcher::UrlEncoded("text".into(), "M".into()),
            Matcher::UrlEncoded("deviceIds".into(), "d1,d2".into()),
            Matcher::UrlEncoded("smsnumber".into(), "+123".into()),
            Matcher::UrlEncoded("smstext".into(), "M".into()),
        ]))
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let config = JoinConfig::devices(["d1", "d2"]).with_sms_number("+123");
    client_for(&server).notify("T", "M", &config).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn empty_error_message_is_success() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::Any)
        .with_body(r#"{"success": true, "errorMessage": ""}"#)
        .create_async()
        .await;

    let result = client_for(&server)
        .notify("T", "M", &JoinConfig::device("d1"))
        .await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn error_message_is_api_rejection() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::Any)
        .with_body(r#"{"success": false, "errorMessage": "No device to send message to"}"#)
        .create_async()
        .await;

    let error = client_for(&server)
        .notify("T", "M", &JoinConfig::device("d1"))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), NotifyErrorKind::ApiRejected);
    assert_eq!(error.to_string(), "No device to send message to");
}

#[tokio::test]
async fn error_status_is_transport_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let error = client_for(&server)
        .notify("T", "M", &JoinConfig::device("d1"))
        .await
        .unwrap_err();
    assert!(matches!(error, NotifyError::Transport(_)));

    // Error statuses are not retried
    mock.assert_async().await;
}

#[tokio::test]
async fn connection_error_is_transport_error() {
    let session = RequestSession::builder().max_retries(1).build().unwrap();
    let client = JoinClient::with_session(Arc::new(session), "http://127.0.0.1:1/sendPush").unwrap();

    let error = client
        .notify("T", "M", &JoinConfig::device("d1"))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), NotifyErrorKind::Transport);
}

#[tokio::test]
async fn unanswered_request_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}{SEND_PUSH_PATH}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });

    let session = RequestSession::builder()
        .timeout(Duration::from_millis(200))
        .max_retries(1)
        .build()
        .unwrap();
    let client = JoinClient::with_session(Arc::new(session), url).unwrap();

    let error = tokio::time::timeout(
        Duration::from_secs(10),
        client.notify("T", "M", &JoinConfig::device("d1")),
    )
    .await
    .expect("notify should give up on its own")
    .unwrap_err();
    assert!(
        matches!(&error, NotifyError::Transport(e) if e.is_timeout()),
        "{error:?}"
    );
}

#[tokio::test]
async fn registry_validates_and_sends() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SEND_PUSH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("deviceId".into(), "d1".into()),
            Matcher::UrlEncoded("url".into(), "https://example.com".into()),
        ]))
        .with_body(r#"{"success": true}"#)
        .expect(1)
        .create_async()
        .await;

    let mut registry = NotifierRegistry::new();
    registry.register(client_for(&server));

    registry
        .notify(
            "join",
            "T",
            "M",
            &json!({"device": "d1", "url": "https://example.com"}),
        )
        .await
        .unwrap();
    let invalid = registry
        .notify("join", "T", "M", &json!({"device": "d1", "group": "all"}))
        .await;
    assert!(invalid.is_err());

    mock.assert_async().await;
}
