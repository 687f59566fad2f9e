//! Canned-response HTTP server for adapter tests.
//!
//! Binds an ephemeral listener, answers every request from a queue of canned
//! replies, and records each request so tests can assert on method, target,
//! headers, and body.

use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::Mutex;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

use super::RestClient;
use crate::config::BackendConfig;

#[derive(Debug, Clone)]
pub(super) struct RecordedRequest {
    pub(super) method: String,
    pub(super) target: String,
    pub(super) headers: Vec<(String, String)>,
    pub(super) body: String,
}

impl RecordedRequest {
    pub(super) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(super) fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

struct Canned {
    replies: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

async fn answer(request: HttpRequest, body: web::Bytes, canned: web::Data<Canned>) -> HttpResponse {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        target: request
            .uri()
            .path_and_query()
            .map(ToString::to_string)
            .unwrap_or_default(),
        headers: request
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    value.to_str().unwrap_or_default().to_owned(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    canned.requests.lock().expect("requests lock").push(recorded);

    let Some((status, reply)) = canned.replies.lock().expect("replies lock").pop_front() else {
        return HttpResponse::InternalServerError().body("no canned reply left");
    };
    let status = StatusCode::from_u16(status).expect("canned status");
    HttpResponse::build(status)
        .content_type("application/json")
        .body(reply)
}

pub(super) struct CannedServer {
    base_url: String,
    canned: web::Data<Canned>,
    handle: ServerHandle,
}

impl CannedServer {
    pub(super) async fn start(replies: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let canned = web::Data::new(Canned {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        });

        let data = canned.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(answer))
        })
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run();
        let handle = server.handle();
        tokio::spawn(server);

        Self {
            base_url: format!("http://{addr}/"),
            canned,
            handle,
        }
    }

    /// Convenience for a single JSON reply.
    pub(super) async fn replying(status: u16, body: serde_json::Value) -> Self {
        Self::start(vec![(status, body.to_string())]).await
    }

    pub(super) fn client(&self, access_token: Option<&str>) -> RestClient {
        let config = BackendConfig::new(&self.base_url, "anon-key").expect("config");
        let config = match access_token {
            Some(token) => config.with_access_token(token),
            None => config,
        };
        RestClient::new(config).expect("client")
    }

    pub(super) fn requests(&self) -> Vec<RecordedRequest> {
        self.canned.requests.lock().expect("requests lock").clone()
    }

    pub(super) fn only_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        // The stop command is sent eagerly; the returned future only awaits completion.
        drop(self.handle.stop(false));
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn replies_are_served_in_order_and_requests_recorded() {
        let server = CannedServer::start(vec![
            (201, "[]".to_owned()),
            (404, json!({"message": "gone"}).to_string()),
        ])
        .await;
        let http = reqwest::Client::new();
        let url = format!("{}rest/v1/things?id=eq.1", server.base_url);

        let first = http.post(&url).body("{\"a\":1}").send().await.expect("first");
        let second = http.get(&url).send().await.expect("second");
        let third = http.get(&url).send().await.expect("third");

        assert_eq!(first.status().as_u16(), 201);
        assert_eq!(second.status().as_u16(), 404);
        assert_eq!(third.status().as_u16(), 500);
        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/rest/v1/things?id=eq.1");
        assert_eq!(requests[0].json(), json!({"a": 1}));
    }
}
