
use serde_json::{json, Value};
use std::time::Duration;
use test_startup::*;

async fn start(app: &TestApp, token: &str, film_id: &str, body: Value) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/transcode/{}", film_id)))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

/// Polls the execution until it leaves RUNNING.
async fn wait_for_execution(app: &TestApp, token: &str, execution_id: &str) -> Value {
    let mut execution = Value::Null;
    for _ in 0..100 {
        let res = app
            .client
            .get(app.url(&format!("/transcode/executions/{}", execution_id)))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        execution = body["data"].clone();
        if execution["status"] != "RUNNING" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    execution
}

#[actix_rt::test]
async fn transcode_uploads_every_resolution() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;

    let res = start(&app, &admin, "f1", json!({ "resolutions": ["480p", "1080p"] })).await;
    assert_eq!(res.status().as_u16(), 202);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], "RUNNING");
    assert_eq!(body["data"]["resolutions"], json!(["480p", "1080p"]));
    let execution_id = body["data"]["execution_id"].as_str().unwrap().to_string();

    let execution = wait_for_execution(&app, &admin, &execution_id).await;
    assert_eq!(execution["status"], "SUCCEEDED");
    assert_eq!(
        execution["outputs"],
        json!(["f1_480p.mp4", "f1_1080p.mp4"])
    );
    assert!(app.objects.contains("f1_480p.mp4"));
    assert!(app.objects.contains("f1_1080p.mp4"));
}

#[actix_rt::test]
async fn failed_transcode_removes_partial_variants() {
    let app = spawn_app_with(
        test_settings(),
        FakeEncoder {
            fail_width: Some(720),
        },
    )
    .await;
    let admin = app.admin_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;

    let res = start(&app, &admin, "f1", json!({})).await;
    assert_eq!(res.status().as_u16(), 202);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["resolutions"], json!(["360p", "720p"]));
    let execution_id = body["data"]["execution_id"].as_str().unwrap().to_string();

    let execution = wait_for_execution(&app, &admin, &execution_id).await;
    assert_eq!(execution["status"], "FAILED");
    assert!(execution["error"].as_str().unwrap().contains("720"));
    assert!(!app.objects.contains("f1_360p.mp4"));
    assert!(!app.objects.contains("f1_720p.mp4"));
    assert!(app.objects.contains("f1"));
}

#[actix_rt::test]
async fn transcode_rejects_bad_requests() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;

    let res = start(&app, &admin, "f1", json!({ "resolutions": ["720"] })).await;
    assert_eq!(res.status().as_u16(), 400);

    let res = start(&app, &admin, "ghost", json!({})).await;
    assert_eq!(res.status().as_u16(), 404);

    let res = start(&app, &user, "f1", json!({})).await;
    assert_eq!(res.status().as_u16(), 403);

    let res = app
        .client
        .get(app.url("/transcode/executions/not-a-uuid"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[actix_rt::test]
async fn uploads_are_transcoded_automatically_when_enabled() {
    let mut settings = test_settings();
    settings.transcoding.auto_transcode = true;
    let app = spawn_app_with(settings, FakeEncoder::default()).await;
    let admin = app.admin_token().await;

    let res = app
        .create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    assert_eq!(res.status().as_u16(), 200);

    for _ in 0..100 {
        if app.objects.contains("f1_720p.mp4") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(app.objects.contains("f1_360p.mp4"));
    assert!(app.objects.contains("f1_720p.mp4"));
}
