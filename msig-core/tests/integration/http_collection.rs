use msig_core::domain::{AggregateSignatureState, RawMessage, SignatureRecord};
use msig_core::foundation::{Address, ErrorCode, SignatureBytes, SigningError, WalletScopedHash};
use msig_core::infrastructure::collection::{ConfirmationSink, HttpCollectionService, SignatureCollectionService};
use msig_core::infrastructure::config::CollectionConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves the scripted responses in order, one connection each, and returns every raw request
/// (head and body) it received.
async fn scripted_server(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status_line, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            requests.push(request);
        }
        requests
    });
    (base_url, handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut buf).await.expect("read");
        if n == 0 {
            return String::from_utf8_lossy(&request).to_string();
        }
        request.extend_from_slice(&buf[..n]);
    };
    let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while request.len() < head_end + content_length {
        let n = socket.read(&mut buf).await.expect("read body");
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&request).to_string()
}

/// Serves exactly one HTTP response and returns the raw request it received.
async fn one_shot_server(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let (base_url, handle) = scripted_server(vec![(status_line, body)]).await;
    let handle = tokio::spawn(async move { handle.await.expect("server").into_iter().next().unwrap_or_default() });
    (base_url, handle)
}

fn request_body(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").expect("request body");
    serde_json::from_str(body).expect("json body")
}

fn owner_record(owner: u8, fill: u8) -> SignatureRecord {
    SignatureRecord { owner: Address::with_last_byte(owner), signature: SignatureBytes::new(vec![fill; 65]), submitted_at: 0 }
}

fn client(base_url: &str, token: Option<&str>) -> HttpCollectionService {
    let config = CollectionConfig {
        base_url: base_url.to_string(),
        api_token: token.map(str::to_string),
        ..CollectionConfig::default()
    };
    HttpCollectionService::new(&config).expect("client")
}

#[tokio::test]
async fn test_http_get_message_when_404_then_none() {
    let (base_url, server) = one_shot_server("404 Not Found", "{\"detail\":\"Not found.\"}".to_string()).await;
    let hash = WalletScopedHash::new([0xaa; 32]);

    let result = client(&base_url, None).get_message(&hash).await.expect("get");
    assert!(result.is_none());

    let request = server.await.expect("server");
    assert!(request.starts_with(&format!("GET /api/v1/messages/{}/ HTTP/1.1", hash)), "{request}");
}

#[tokio::test]
async fn test_http_get_message_when_record_then_parsed_with_bearer_token() {
    let hash = WalletScopedHash::new([0xbb; 32]);
    let body = serde_json::to_string(&AggregateSignatureState::pending(hash, RawMessage::text("hi"), 2)).expect("json");
    let (base_url, server) = one_shot_server("200 OK", body).await;

    let state = client(&base_url, Some("secret-token")).get_message(&hash).await.expect("get").expect("record");
    assert_eq!(state.hash, hash);
    assert_eq!(state.confirmations_required, 2);
    assert!(!state.is_confirmed());

    let request = server.await.expect("server").to_lowercase();
    assert!(request.contains("authorization: bearer secret-token"), "{request}");
}

#[tokio::test]
async fn test_http_get_message_when_server_error_then_retryable_service_error() {
    let (base_url, server) = one_shot_server("502 Bad Gateway", "upstream down".to_string()).await;
    let err = client(&base_url, None).get_message(&WalletScopedHash::new([1; 32])).await.unwrap_err();
    server.await.expect("server");

    assert!(matches!(err, SigningError::ServiceError { status: Some(502), .. }), "{err}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_http_get_message_when_body_malformed_then_invalid_response() {
    let (base_url, server) = one_shot_server("200 OK", "{\"hash\": 42}".to_string()).await;
    let err = client(&base_url, None).get_message(&WalletScopedHash::new([1; 32])).await.unwrap_err();
    server.await.expect("server");
    assert_eq!(err.code(), ErrorCode::InvalidServiceResponse);
}

#[tokio::test]
async fn test_http_submit_when_record_missing_then_proposes_message() {
    let wallet = Address::with_last_byte(0x42);
    let hash = WalletScopedHash::new([0xc1; 32]);
    let record = owner_record(1, 0xaa);
    let (base_url, server) = scripted_server(vec![
        ("404 Not Found", "{\"detail\":\"Not found.\"}".to_string()),
        ("201 Created", String::new()),
    ])
    .await;

    client(&base_url, Some("secret-token"))
        .submit_signature(&wallet, &hash, &RawMessage::text("hi"), record.clone())
        .await
        .expect("proposed");

    let requests = server.await.expect("server");
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with(&format!("GET /api/v1/messages/{}/ ", hash)), "{}", requests[0]);
    assert!(
        requests[1].starts_with(&format!("POST /api/v1/safes/{}/messages/ ", wallet.to_checksum(None))),
        "{}",
        requests[1]
    );
    assert!(requests[1].to_lowercase().contains("authorization: bearer secret-token"));
    let body = request_body(&requests[1]);
    assert_eq!(body["message"], "hi");
    assert_eq!(body["signature"], record.signature.to_string());
}

#[tokio::test]
async fn test_http_submit_when_other_owner_signed_then_adds_confirmation() {
    let hash = WalletScopedHash::new([0xc2; 32]);
    let mut existing = AggregateSignatureState::pending(hash, RawMessage::text("hi"), 2);
    existing.add_confirmation(owner_record(1, 0xaa));
    let record = owner_record(2, 0xbb);
    let (base_url, server) = scripted_server(vec![
        ("200 OK", serde_json::to_string(&existing).expect("json")),
        ("201 Created", String::new()),
    ])
    .await;

    client(&base_url, None)
        .submit_signature(&Address::with_last_byte(0x42), &hash, &RawMessage::text("hi"), record.clone())
        .await
        .expect("confirmed");

    let requests = server.await.expect("server");
    assert_eq!(requests.len(), 2);
    assert!(requests[1].starts_with(&format!("POST /api/v1/messages/{}/signatures/ ", hash)), "{}", requests[1]);
    let body = request_body(&requests[1]);
    assert_eq!(body["signature"], record.signature.to_string());
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_http_submit_when_owner_already_signed_then_no_post() {
    let hash = WalletScopedHash::new([0xc3; 32]);
    let mut existing = AggregateSignatureState::pending(hash, RawMessage::text("hi"), 2);
    existing.add_confirmation(owner_record(1, 0xaa));
    let (base_url, server) = scripted_server(vec![("200 OK", serde_json::to_string(&existing).expect("json"))]).await;

    client(&base_url, None)
        .submit_signature(&Address::with_last_byte(0x42), &hash, &RawMessage::text("hi"), owner_record(1, 0xcc))
        .await
        .expect("skipped");

    let requests = server.await.expect("server");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET "), "{}", requests[0]);
}

#[tokio::test]
async fn test_http_submit_when_post_rejected_then_service_error() {
    let hash = WalletScopedHash::new([0xc4; 32]);
    let (base_url, server) = scripted_server(vec![
        ("404 Not Found", "{}".to_string()),
        ("422 Unprocessable Entity", "{\"signature\":[\"invalid owner\"]}".to_string()),
    ])
    .await;

    let err = client(&base_url, None)
        .submit_signature(&Address::with_last_byte(0x42), &hash, &RawMessage::text("hi"), owner_record(1, 0xaa))
        .await
        .unwrap_err();
    server.await.expect("server");

    assert!(matches!(err, SigningError::ServiceError { status: Some(422), .. }), "{err}");
    assert!(err.to_string().contains("propose_message"), "{err}");
    assert!(!err.is_retryable());
}
