
use serde_json::{json, Value};
use test_startup::*;

#[actix_rt::test]
async fn register_then_login_returns_tokens() {
    let app = spawn_app().await;

    let res = app.register("jdoe", None).await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.expect("Failed to parse the response body");
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["username"], "jdoe");
    assert_eq!(body["data"]["group"], "User");
    assert_eq!(body["data"]["user_confirmed"], true);

    let res = app.login("jdoe", PASSWORD).await;
    assert_eq!(res.status().as_u16(), 200);
    let body = res
        .json::<Data<Tokens>>()
        .await
        .expect("Failed to parse the response body");
    assert_eq!(body.data.token_type, "Bearer");
    assert_eq!(body.data.expires_in, 3600);
    assert!(!body.data.access_token.is_empty());
    assert!(!body.data.id_token.is_empty());
}

#[actix_rt::test]
async fn register_rejects_duplicates_and_unknown_groups() {
    let app = spawn_app().await;

    assert!(app.register("jdoe", None).await.status().is_success());

    let res = app.register("jdoe", None).await;
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Username or email already exists");

    let res = app.register("other", Some("Moderators")).await;
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Group Moderators does not exist");
}

#[actix_rt::test]
async fn register_validates_the_password() {
    let app = spawn_app().await;

    let res = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": "weak",
            "password": "password",
            "email": "weak@example.com",
            "firstName": "Weak",
            "lastName": "Password",
            "dateOfBirth": "1990-04-21"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.register("jdoe", None).await;

    let res = app.login("jdoe", "Wrong@Password1").await;
    assert_eq!(res.status().as_u16(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Incorrect username or password");

    let res = app.login("nobody", PASSWORD).await;
    assert_eq!(res.status().as_u16(), 401);
}

#[actix_rt::test]
async fn role_lookup_reports_the_group() {
    let app = spawn_app().await;
    app.seed_user("boss", "Admin").await;

    let res = app
        .client
        .get(app.url("/auth/role?username=boss"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["role"], "Admin");

    let res = app
        .client
        .get(app.url("/auth/role?username=ghost"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "User does not exist.");
}

#[actix_rt::test]
async fn only_admins_create_groups() {
    let app = spawn_app().await;
    let user = app.user_token().await;
    let admin = app.admin_token().await;
    let group = json!({ "name": "Critics", "description": "Film critics" });

    let res = app
        .client
        .post(app.url("/auth/groups"))
        .bearer_auth(&user)
        .json(&group)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);

    let res = app
        .client
        .post(app.url("/auth/groups"))
        .bearer_auth(&admin)
        .json(&group)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);

    let res = app
        .client
        .post(app.url("/auth/groups"))
        .bearer_auth(&admin)
        .json(&group)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    let res = app.register("critic", Some("critics")).await;
    assert_eq!(res.status().as_u16(), 403);
    let res = app.register_as("critic", Some("critics"), Some(&admin)).await;
    assert!(res.status().is_success());
}

async fn authorize(app: &TestApp, path: &str, token: &str) -> Value {
    app.client
        .post(app.url(path))
        .json(&json!({
            "authorizationToken": token,
            "methodArn": "arn:aws:execute-api:eu-central-1:123456789012:api/prod/GET/films"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse the response body")
}

#[actix_rt::test]
async fn authorizers_allow_members_and_deny_the_rest() {
    let app = spawn_app().await;
    let user = app.user_token().await;
    let admin = app.admin_token().await;

    let body = authorize(&app, "/authorizer/user", &format!("Bearer {}", user)).await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Allow");
    assert_eq!(
        body["policyDocument"]["Statement"][0]["Resource"],
        "arn:aws:execute-api:eu-central-1:123456789012:api/prod/GET/films"
    );

    let body = authorize(&app, "/authorizer/admin", &format!("Bearer {}", user)).await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");

    let body = authorize(&app, "/authorizer/admin", &format!("Bearer {}", admin)).await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Allow");

    let body = authorize(&app, "/authorizer/user", "Bearer not-a-token").await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
    assert_eq!(body["principalId"], "anonymous");

    let body = authorize(&app, "/authorizer/user", user.as_str()).await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[actix_rt::test]
async fn privileged_groups_need_an_admin_caller() {
    let app = spawn_app().await;
    let user = app.user_token().await;
    let admin = app.admin_token().await;

    let res = app.register("intruder", Some("Admin")).await;
    assert_eq!(res.status().as_u16(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Only administrators can register users into group Admin"
    );

    let res = app.register_as("intruder", Some("Admin"), Some(&user)).await;
    assert_eq!(res.status().as_u16(), 403);
    assert_eq!(app.login("intruder", PASSWORD).await.status().as_u16(), 401);

    let res = app.register_as("deputy", Some("admin"), Some(&admin)).await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["group"], "Admin");
}

#[actix_rt::test]
async fn open_registration_allows_any_group() {
    let mut settings = test_settings();
    settings.auth.open_group_registration = true;
    let app = spawn_app_with(settings, FakeEncoder::default()).await;

    let res = app.register("founder", Some("Admin")).await;
    assert_eq!(res.status().as_u16(), 200);
}

#[actix_rt::test]
async fn id_tokens_are_not_accepted_as_access_tokens() {
    let app = spawn_app().await;
    app.register("jdoe", None).await;
    let tokens = app.tokens_for("jdoe", PASSWORD).await;

    let res = app
        .client
        .get(app.url("/films"))
        .bearer_auth(&tokens.id_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = app
        .client
        .get(app.url("/films"))
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
}
