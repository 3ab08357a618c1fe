
use serde_json::{json, Value};
use test_startup::*;

#[actix_rt::test]
async fn subscribe_list_and_unsubscribe() {
    let app = spawn_app().await;
    let user = app.user_token().await;
    let subscription = json!({ "subscription_type": "actor", "subscription_value": "Mia Ray" });

    let res = app
        .client
        .post(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Subscription added successfully");

    let res = app
        .client
        .get(app.url("/subscriptions"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["subscription_type"], "actor");
    assert_eq!(list[0]["subscription_value"], "Mia Ray");

    let res = app
        .client
        .delete(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = app
        .client
        .delete(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&subscription)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Subscription not found");
}

#[actix_rt::test]
async fn subscription_type_is_validated() {
    let app = spawn_app().await;
    let user = app.user_token().await;

    let res = app
        .client
        .post(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&json!({ "subscription_type": "studio", "subscription_value": "A24" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "subscription_type must be one of genre, director or actor"
    );

    let res = app
        .client
        .post(app.url("/subscriptions"))
        .bearer_auth(&user)
        .json(&json!({ "subscription_type": "genre", "subscription_value": " " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_rt::test]
async fn several_values_of_one_type_are_kept() {
    let app = spawn_app().await;
    let user = app.user_token().await;

    for genre in ["Drama", "Comedy"] {
        let res = app
            .client
            .post(app.url("/subscriptions"))
            .bearer_auth(&user)
            .json(&json!({ "subscription_type": "genre", "subscription_value": genre }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }

    let res = app
        .client
        .get(app.url("/subscriptions"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let mut values: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["subscription_value"].as_str().unwrap())
        .collect();
    values.sort();
    assert_eq!(values, vec!["Comedy", "Drama"]);
}
