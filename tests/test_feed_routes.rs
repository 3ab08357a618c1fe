
use serde_json::{json, Value};
use test_startup::*;

async fn post(app: &TestApp, token: &str, path: &str, body: Value) -> reqwest::Response {
    app.client
        .post(app.url(path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn generate(app: &TestApp, token: &str) -> Value {
    let res = app
        .client
        .post(app.url("/feed/generate"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 200);
    res.json().await.expect("Failed to parse the response body")
}

#[actix_rt::test]
async fn feed_ranks_films_by_interest() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    app.create_film(&admin, &film_body("f2", "Comedy", "Bo Kim", &[]))
        .await;
    app.create_film(&admin, &film_body("f3", "Horror", "Cy Ng", &[]))
        .await;

    post(
        &app,
        &user,
        "/subscriptions",
        json!({ "subscription_type": "genre", "subscription_value": "Drama" }),
    )
    .await;
    post(
        &app,
        &user,
        "/reviews",
        json!({ "film_id": "f1", "rating_type": "numeric", "rating": 4 }),
    )
    .await;
    post(
        &app,
        &user,
        "/reviews",
        json!({ "film_id": "f2", "rating_type": "thumbs", "rating": "up" }),
    )
    .await;
    let res = app
        .client
        .get(app.url("/films/f2/download"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let body = generate(&app, &user).await;
    assert_eq!(body["message"], "Feed updated successfully");
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["film_id"], "f1");
    assert_eq!(entries[0]["score"], 13);
    assert_eq!(entries[1]["film_id"], "f2");
    assert_eq!(entries[1]["score"], 8);

    let user_id = entries[0]["user_id"].as_str().unwrap().to_string();
    let res = app
        .client
        .get(app.url(&format!("/feed/{}", user_id)))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let stored: Value = res.json().await.unwrap();
    assert_eq!(stored["data"], body["data"]);
}

#[actix_rt::test]
async fn regenerating_replaces_the_feed() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;
    app.create_film(&admin, &film_body("f2", "Comedy", "Bo Kim", &[]))
        .await;

    post(
        &app,
        &user,
        "/subscriptions",
        json!({ "subscription_type": "director", "subscription_value": "Ana Lee" }),
    )
    .await;
    let body = generate(&app, &user).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    app.client
        .delete(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&json!({ "subscription_type": "director", "subscription_value": "Ana Lee" }))
        .send()
        .await
        .unwrap();
    post(
        &app,
        &user,
        "/subscriptions",
        json!({ "subscription_type": "director", "subscription_value": "Bo Kim" }),
    )
    .await;

    let body = generate(&app, &user).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["film_id"], "f2");
    assert_eq!(entries[0]["score"], 5);

    let user_id = entries[0]["user_id"].as_str().unwrap().to_string();
    let res = app
        .client
        .get(app.url(&format!("/feed/{}", user_id)))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let stored: Value = res.json().await.unwrap();
    assert_eq!(stored["data"].as_array().unwrap().len(), 1);
    assert_eq!(stored["data"][0]["film_id"], "f2");
}

#[actix_rt::test]
async fn feed_of_a_user_without_activity_is_empty() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    app.create_film(&admin, &film_body("f1", "Drama", "Ana Lee", &[]))
        .await;

    let body = generate(&app, &user).await;
    assert_eq!(body["data"], json!([]));
}
