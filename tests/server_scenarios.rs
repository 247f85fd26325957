// End-to-end scenarios against a mocked server. The mock server lives on
// its own tokio runtime while the blocking client is driven from the
// test thread, matching how the binary uses it.

use chrono::DateTime;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tally::api::ApiClient;
use tally::config::ServerSettings;
use tally::error::ApiError;
use tally::ops;

struct TestServer {
    // Field order matters: the server must drop (and verify its
    // expectations) while the runtime is still alive.
    server: MockServer,
    rt: Runtime,
}

impl TestServer {
    fn start() -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        TestServer { server, rt }
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(&ServerSettings {
            url: self.server.uri(),
            username: "susan".into(),
            api_token: "token123".into(),
        })
        .unwrap()
    }

    fn received(&self) -> Vec<wiremock::Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

fn measurement_json(id: i64) -> Value {
    json!({
        "id": id,
        "project": {"id": 1, "name": "Website", "customer": {"id": 2, "name": "Acme"}},
        "activity": {"id": 5, "name": "Design"},
        "begin": "2024-03-01T09:00:00+01:00",
        "end": null
    })
}

#[test]
fn every_call_carries_both_auth_headers() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .and(header("X-AUTH-USER", "susan"))
            .and(header("X-AUTH-TOKEN", "token123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1),
    );

    let projects = ops::projects(&ts.client()).unwrap();
    assert!(projects.is_empty());
}

#[test]
fn message_payload_surfaces_as_server_error_on_get() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 403, "message": "Access denied"})),
            ),
    );

    let err = ops::projects(&ts.client()).unwrap_err();
    match err {
        ApiError::Server { code, message } => {
            assert_eq!(code, Some(403));
            assert_eq!(message, "Access denied");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn message_payload_surfaces_as_server_error_on_patch() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("PATCH"))
            .and(path("/api/timesheets/7/stop"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Timesheet already stopped"})),
            ),
    );

    let err = ops::stop(&ts.client(), 7).unwrap_err();
    assert!(matches!(err, ApiError::Server { code: None, .. }));
}

#[test]
fn non_json_body_is_a_parse_error() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/timesheets/active"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>")),
    );

    let err = ops::active(&ts.client()).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let client = ApiClient::new(&ServerSettings {
        url: "http://127.0.0.1:1".into(),
        username: "susan".into(),
        api_token: "token123".into(),
    })
    .unwrap();

    let err = ops::projects(&client).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn stop_all_with_no_actives_issues_no_stop_calls() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/timesheets/active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([]))),
    );
    ts.mount(
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 0})))
            .expect(0),
    );

    let mut reported = Vec::new();
    let stopped = ops::stop_all(&ts.client(), |m| reported.push(m.id)).unwrap();

    assert!(stopped.is_empty());
    assert!(reported.is_empty());
    let patches: Vec<_> = ts
        .received()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .collect();
    assert!(patches.is_empty());
}

#[test]
fn stop_all_stops_each_active_in_server_order() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/timesheets/active"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([measurement_json(7), measurement_json(9)])),
            ),
    );
    ts.mount(
        Mock::given(method("PATCH"))
            .and(path("/api/timesheets/7/stop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1),
    );
    ts.mount(
        Mock::given(method("PATCH"))
            .and(path("/api/timesheets/9/stop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
            .expect(1),
    );

    let mut reported = Vec::new();
    let stopped = ops::stop_all(&ts.client(), |m| reported.push(m.id)).unwrap();

    assert_eq!(stopped.len(), 2);
    assert_eq!(reported, vec![7, 9]);

    // Ordered reporting matches the order the requests went out.
    let patch_paths: Vec<String> = ts
        .received()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        patch_paths,
        vec!["/api/timesheets/7/stop", "/api/timesheets/9/stop"]
    );
}

#[test]
fn start_by_name_posts_project_activity_and_begin() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Website"}])),
            ),
    );
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/activities"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 5, "name": "Design"}])),
            ),
    );
    ts.mount(
        Mock::given(method("POST"))
            .and(path("/api/timesheets"))
            .and(body_partial_json(json!({"project": 1, "activity": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
            .expect(1),
    );

    let client = ts.client();
    let project_id = ops::find_project_id(&client, "website").unwrap();
    let activity_id = ops::find_activity_id(&client, "DESIGN").unwrap();
    let started = ops::start(&client, project_id, activity_id).unwrap();
    assert_eq!(started, 42);

    // The begin field is a well-formed ISO-8601 timestamp with offset.
    let post = ts
        .received()
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    let begin = body["begin"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(begin).is_ok());
}

#[test]
fn activities_filter_scopes_by_project() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/activities"))
            .and(query_param("project", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 5, "name": "Design"}])),
            )
            .expect(1),
    );

    let list = ops::activities(&ts.client(), Some(1)).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, 5);
}

#[test]
fn name_lookup_miss_is_not_found() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Website"}])),
            ),
    );

    let err = ops::find_project_id(&ts.client(), "Backoffice").unwrap_err();
    match err {
        ApiError::NotFound { kind, name } => {
            assert_eq!(kind, "project");
            assert_eq!(name, "Backoffice");
        }
        other => panic!("expected not-found, got {other:?}"),
    }
}
