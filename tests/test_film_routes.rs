
use serde_json::{json, Value};
use std::time::Duration;
use test_startup::*;

#[actix_rt::test]
async fn film_routes_require_a_token() {
    let app = spawn_app().await;

    let res = app.client.get(app.url("/films")).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = app
        .client
        .get(app.url("/films"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn users_cannot_edit_the_catalog() {
    let app = spawn_app().await;
    let user = app.user_token().await;

    let res = app
        .create_film(&user, &film_body("f1", "Drama", "Ana Lee", &["John Doe"]))
        .await;
    assert_eq!(res.status().as_u16(), 403);
    assert!(!app.objects.contains("f1"));
}

#[actix_rt::test]
async fn create_and_fetch_a_film() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let res = app
        .create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &["John Doe"]))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Film created successfully");
    assert!(app.objects.contains("f1"));

    let res = app
        .client
        .get(app.url("/films/f1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Film f1");
    assert_eq!(body["data"]["actors"], json!(["John Doe"]));
    assert_eq!(body["data"]["file"], "aGVsbG8gZmlsbQ==");

    let res = app
        .client
        .get(app.url("/films?film_id=f1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["director"], "Ana Lee");

    let res = app
        .client
        .get(app.url("/films/unknown"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[actix_rt::test]
async fn create_film_validates_input_before_writing() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let res = app
        .create_film(&admin, &json!({ "film_id": "f1", "file": "aGVsbG8=" }))
        .await;
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");

    let mut bad_file = film_body("f2", "Drama", "Ana Lee", &[]);
    bad_file["file"] = json!("%%% not base64 %%%");
    let res = app.create_film(&admin, &bad_file).await;
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid base64 file content");

    assert!(app.films.list_ids().is_empty());
    assert!(!app.objects.contains("f2"));
}

#[actix_rt::test]
async fn listing_and_searching_the_catalog() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &["John Doe"]))
        .await;
    app.create_film(&admin, &film_body("f2", "Comedy", "Ana Lee", &["Mia Ray"]))
        .await;
    app.create_film(&admin, &film_body("f3", "Drama", "Bo Kim", &["Mia Ray"]))
        .await;

    let res = app
        .client
        .get(app.url("/films"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let res = app
        .client
        .get(app.url("/films/search?genre=Drama&actors=Mia%20Ray"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    let found = body["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["film_id"], "f3");

    let res = app
        .client
        .get(app.url("/films/search?director=Nobody"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
}

#[actix_rt::test]
async fn update_film_changes_only_given_fields() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &["John Doe"]))
        .await;

    let res = app
        .client
        .put(app.url("/films/f1"))
        .bearer_auth(&admin)
        .json(&json!({ "year": 2010, "genre": "Thriller" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Film updated successfully");
    assert_eq!(body["data"]["year"], 2010);
    assert_eq!(body["data"]["genre"], "Thriller");
    assert_eq!(body["data"]["director"], "Ana Lee");

    let res = app
        .client
        .put(app.url("/films/f1"))
        .bearer_auth(&admin)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    let res = app
        .client
        .put(app.url("/films/missing"))
        .bearer_auth(&admin)
        .json(&json!({ "title": "New" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[actix_rt::test]
async fn delete_film_removes_metadata_and_content() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    app.objects.insert("f1_720p.mp4", b"variant");

    let res = app
        .client
        .delete(app.url("/films/f1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(!app.objects.contains("f1"));
    assert!(!app.objects.contains("f1_720p.mp4"));

    let res = app
        .client
        .delete(app.url("/films/f1"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[actix_rt::test]
async fn upload_url_is_presigned_for_the_content_key() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let res = app
        .client
        .get(app.url("/films/upload-url?film_id=f9&file_name=movie.mp4"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["key"], "f9-movie.mp4");
    assert_eq!(body["data"]["expires_in"], 3600);
    assert!(body["data"]["upload_url"]
        .as_str()
        .unwrap()
        .contains("f9-movie.mp4"));

    let res = app
        .client
        .get(app.url("/films/upload-url?film_id=f9"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_rt::test]
async fn download_returns_content_and_variants() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    app.objects.insert("f1_720p.mp4", b"small");

    let res = app
        .client
        .get(app.url("/films/f1/download"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["key"], "f1");
    assert_eq!(body["data"]["file"], "aGVsbG8gZmlsbQ==");

    let res = app
        .client
        .get(app.url("/films/f1/download?resolution=720p"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["key"], "f1_720p.mp4");

    let res = app
        .client
        .get(app.url("/films/f1/download?resolution=1080p"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Requested file not found");

    let res = app
        .client
        .get(app.url("/films/f1/download?resolution=huge"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_rt::test]
async fn new_films_notify_subscribers_once() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;

    for (kind, value) in [("genre", "Drama"), ("director", "Ana Lee")] {
        let res = app
            .client
            .post(app.url("/subscriptions"))
            .bearer_auth(&user)
            .json(&json!({ "subscription_type": kind, "subscription_value": value }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }

    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    app.create_film(&admin, &film_body("f2", "Comedy", "Bo Kim", &[]))
        .await;

    let sent = app.notifier.wait_for(1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(app.notifier.sent.lock().unwrap().len(), 1);

    assert_eq!(sent[0].1, "New Film Notification");
    assert_eq!(sent[0].2, "New film added: Film f1");
}

#[actix_rt::test]
async fn replacing_a_film_does_not_notify_again() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;

    let res = app
        .client
        .post(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&json!({ "subscription_type": "genre", "subscription_value": "Drama" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let first = app
        .create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    assert_eq!(first.status().as_u16(), 200);
    app.notifier.wait_for(1).await;

    let mut replacement = film_body("f1", "Drama", "Ana Lee", &[]);
    replacement["title"] = json!("Director's Cut");
    let second = app.create_film(&admin, &replacement).await;
    assert_eq!(second.status().as_u16(), 200);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let sent = app.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2, "New film added: Film f1");
    assert_eq!(app.films.list_ids(), vec!["f1".to_string()]);
}
