use std::time::Duration;

use ats_core::{Job, NewJob};
use ats_engine::{
    persist_reorder, reorder_jobs, EntityStore, HttpReorderApi, LocalCache, ReorderApi,
    ReorderError, ReorderOutcome, ReorderRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jobs(titles: &[&str]) -> Vec<Job> {
    let store = EntityStore::new();
    titles
        .iter()
        .map(|title| store.create_job(NewJob::titled(*title)))
        .collect()
}

#[tokio::test]
async fn patch_carries_camel_case_orders() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/jobs/job-7/reorder"))
        .and(body_json(json!({ "fromOrder": 2, "toOrder": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpReorderApi::new(format!("{}/api", server.uri()));
    api.reorder(
        "job-7",
        ReorderRequest {
            from_order: 2,
            to_order: 5,
        },
    )
    .await
    .expect("reorder ok");
}

#[tokio::test]
async fn success_false_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Job is archived" })),
        )
        .mount(&server)
        .await;

    let api = HttpReorderApi::new(server.uri());
    let err = api
        .reorder(
            "job-1",
            ReorderRequest {
                from_order: 1,
                to_order: 2,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, ReorderError::Rejected("Job is archived".into()));
}

#[tokio::test]
async fn server_error_keeps_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "message": "Failed to reorder job" })),
        )
        .mount(&server)
        .await;

    let api = HttpReorderApi::new(server.uri());
    let err = persist_reorder(&api, "job-1", 1, 3, Duration::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err, "Failed to reorder job (HTTP 500): Failed to reorder job");
}

#[tokio::test]
async fn unparseable_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let api = HttpReorderApi::new(server.uri());
    let err = api
        .reorder(
            "job-1",
            ReorderRequest {
                from_order: 1,
                to_order: 2,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let api = HttpReorderApi::new(uri);
    let err = api
        .reorder(
            "job-1",
            ReorderRequest {
                from_order: 1,
                to_order: 2,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::Transport(_)));
}

#[tokio::test]
async fn controller_rolls_back_on_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/jobs/job-1/reorder"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let original = jobs(&["Alpha", "Beta", "Gamma"]);
    let cache = LocalCache::new(original.clone());
    let api = HttpReorderApi::new(server.uri());

    let outcome = reorder_jobs(&api, &cache, 0, 1, Duration::ZERO).await;

    let ReorderOutcome::RolledBack { jobs, message, .. } = outcome else {
        panic!("expected rollback, got {outcome:?}");
    };
    assert_eq!(jobs, original);
    assert_eq!(cache.get(), original);
    assert_eq!(message, "Failed to reorder job (HTTP 503)");
}
