mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use support::{app, created_id};

#[tokio::test]
async fn root_reports_running() {
    let app = app();
    let (status, body) = app.send(Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"server is running");

    let (status, health) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, doc) = app().get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/myreviews"].is_object());
}

#[tokio::test]
async fn services_list_newest_first() {
    let app = app();
    for (name, date) in [("A", 1), ("B", 3), ("C", 2)] {
        let (status, body) = app.with_body("POST", "/services", &json!({"name": name, "date": date, "price": 100})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["message"].as_str().unwrap().starts_with(&format!("Successfully created the {name} with id ")));
    }

    let (status, body) = app.get("/services").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully got the data");
    let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["B", "C", "A"]);
    // extra fields survive the round trip
    assert_eq!(body["data"][0]["price"], 100);
}

#[tokio::test]
async fn get_service_by_id_or_null() {
    let app = app();
    let (_, created) = app.with_body("POST", "/services", &json!({"name": "Work visa", "date": 5})).await;
    let id = created_id(&created);

    let (_, body) = app.get(&format!("/service/{id}")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["_id"], id.as_str());
    assert_eq!(body["data"]["name"], "Work visa");

    let (status, body) = app.get("/service/0123456789abcdef01234567").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null}));
}

#[tokio::test]
async fn post_review_then_list_for_service() {
    let app = app();
    let (status, body) = app
        .with_body(
            "POST",
            "/post-review",
            &json!({"user_name": "Alice", "email": "a@x.com", "service_id": "S1", "date": 1, "review": "great"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = created_id(&body);
    assert_eq!(body["message"], format!("Successfully created the Alice with id {id}"));

    app.with_body("POST", "/post-review", &json!({"user_name": "Bob", "email": "b@x.com", "service_id": "S1", "date": 9}))
        .await;
    app.with_body("POST", "/post-review", &json!({"user_name": "Carl", "email": "c@x.com", "service_id": "S2", "date": 5}))
        .await;

    let (_, body) = app.get("/review/S1").await;
    let users: Vec<&str> = body["data"].as_array().unwrap().iter().map(|r| r["user_name"].as_str().unwrap()).collect();
    assert_eq!(users, ["Bob", "Alice"]);
}

#[tokio::test]
async fn update_is_idempotent() {
    let app = app();
    let (_, created) = app
        .with_body("POST", "/post-review", &json!({"user_name": "Alice", "email": "a@x.com", "service_id": "S1", "date": 1}))
        .await;
    let id = created_id(&created);
    let patch = json!({"review": "changed", "date": 7});

    for _ in 0..2 {
        let (status, body) = app.with_body("PATCH", &format!("/review-edit/{id}"), &patch).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Successfully updated the review with id {id}"));
    }

    let (_, body) = app.get(&format!("/mreview/{id}")).await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["review"], "changed");
    assert_eq!(list[0]["date"], 7);
    assert_eq!(list[0]["user_name"], "Alice");
}

#[tokio::test]
async fn update_of_unknown_review_fails_softly() {
    let (status, body) = app()
        .with_body("PATCH", "/review-edit/0123456789abcdef01234567", &json!({"review": "x"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "error": "Couldn't update the review"}));
}

#[tokio::test]
async fn delete_then_get_is_empty() {
    let app = app();
    let (_, created) = app
        .with_body("POST", "/post-review", &json!({"user_name": "Alice", "email": "a@x.com", "service_id": "S1", "date": 1}))
        .await;
    let id = created_id(&created);

    let req = Request::builder().method("DELETE").uri(format!("/reviewdelete/{id}")).body(Body::empty()).unwrap();
    let (_, body) = app.json(req).await;
    assert_eq!(body, json!({"success": true, "message": "Successfully deleted"}));

    let (_, body) = app.get(&format!("/mreview/{id}")).await;
    assert_eq!(body, json!({"success": true, "data": []}));

    let req = Request::builder().method("DELETE").uri(format!("/reviewdelete/{id}")).body(Body::empty()).unwrap();
    let (status, body) = app.json(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "error": "not found"}));
}

#[tokio::test]
async fn malformed_id_is_an_envelope_error() {
    let app = app();
    for uri in ["/service/abc", "/mreview/abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("invalid id"));
    }
}

#[tokio::test]
async fn malformed_body_is_an_envelope_error() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/services")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.json(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("malformed request body"));

    let (status, body) = app.with_body("POST", "/services", &json!({"name": "  ", "date": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}
