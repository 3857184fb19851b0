//! Talk to a local server that answers canned bodies, and check what goes on the wire

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use college_ready::client::Client;
use college_ready::session::{Session, User};
use college_ready::PlannerError;

/// Serve one connection per body, in order. The handle returns the raw requests that were received.
async fn canned_server(bodies: Vec<&'static str>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for body in bodies {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(), body,
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    });
    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let n = stream.read(&mut buffer).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end].lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + content_length {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

const COLLEGE_NOT_FOUND: &str = r#"{ "message": "College not found" }"#;


#[tokio::test]
async fn test_bearer_token_on_the_wire() {
    let _ = env_logger::builder().is_test(true).try_init();

    let notes = r#"{ "message": "Notes Found For User", "notes": [
        { "title": "Housing form", "content": "Ask about singles", "deadline": "sometime in March" }
    ] }"#;
    let (base_url, server) = canned_server(vec![notes, notes]).await;

    let session = Session::signed_in(User::new("uid-1").with_id_token("tok"));
    let client = Client::new(&base_url, session.clone()).unwrap();
    let received = client.get_notes_for_user("uid-1").await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].has_deadline());
    assert_eq!(received[0].deadline(), None);

    session.sign_out();
    client.get_notes_for_user("uid-1").await.unwrap();

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /get-notes?userId=uid-1 HTTP/1.1\r\n"));
    assert!(requests[0].to_lowercase().contains("\r\nauthorization: bearer tok\r\n"));
    assert!(requests[1].to_lowercase().contains("authorization:") == false);
}

#[tokio::test]
async fn test_search_college() {
    let _ = env_logger::builder().is_test(true).try_init();

    let found = r#"{ "message": "College found", "data": { "name": "Rice University", "aliases": ["Rice"] } }"#;
    let (base_url, server) = canned_server(vec![COLLEGE_NOT_FOUND, found]).await;
    let client = Client::new(&base_url, Session::new()).unwrap();

    assert_eq!(client.search_college("Nowhere College").await.unwrap(), None);
    let info = client.search_college(" Rice University ").await.unwrap().unwrap();
    assert_eq!(info.name, "Rice University");
    assert_eq!(info.aliases, vec!["Rice".to_string()]);

    let requests = server.await.unwrap();
    assert!(requests[1].starts_with("GET /search-college?name=Rice+University HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_search_or_add_college_gives_up() {
    let _ = env_logger::builder().is_test(true).try_init();

    let added = r#"{ "message": "College added" }"#;
    let (base_url, server) = canned_server(vec![COLLEGE_NOT_FOUND, added, COLLEGE_NOT_FOUND]).await;
    let client = Client::new(&base_url, Session::new()).unwrap();

    match client.search_or_add_college("Nowhere College").await {
        Err(PlannerError::Server { message }) => assert_eq!(message, "College not found"),
        other => panic!("Unexpected result {:?}", other),
    }

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].starts_with("GET /search-college"));
    assert!(requests[1].starts_with("POST /add-college"));
    assert!(requests[1].ends_with(r#"{"name":"Nowhere College"}"#));
    assert!(requests[2].starts_with("GET /search-college"));
}

#[tokio::test]
async fn test_body_that_is_not_json() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (base_url, server) = canned_server(vec!["<html>oops</html>"]).await;
    let client = Client::new(&base_url, Session::new()).unwrap();

    // Not a "not found" answer: the caller gets a decoding error
    let result = client.search_college("Rice University").await;
    assert!(matches!(result, Err(PlannerError::Decode(_))), "{:?}", result);
    server.await.unwrap();
}
