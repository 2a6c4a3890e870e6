//! HTTP-level integration tests driving the full router through
//! `tower::ServiceExt::oneshot`.

mod common;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog_server::api::build_app;
use catalog_server::core::AppState;
use catalog_server::db::repository::{brand, category, user};
use shared::models::{BrandCreate, CategoryCreate};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// App plus a seeded staff account and a valid access token. The
/// returned `TempDir` backs the media store and must stay alive for
/// the duration of the test.
async fn authed_app() -> (Router, AppState, String, tempfile::TempDir) {
    let (state, dir) = common::test_state().await;
    let staff = common::seed_staff_user(&state.pool, "staff@example.com", "password123").await;
    let token = common::access_token_for(&state, &staff);
    (build_app(state.clone()), state, token, dir)
}

#[tokio::test]
async fn login_returns_token_pair() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({"email": "Staff@Example.com ", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["email"], "staff@example.com");
}

#[tokio::test]
async fn login_rejects_bad_password_without_detail() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({"email": "staff@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0006");
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_rejects_disabled_account() {
    let (app, state, _token, _dir) = authed_app().await;
    let staff = user::find_by_email(&state.pool, "staff@example.com")
        .await
        .unwrap()
        .unwrap();
    user::set_active(&state.pool, staff.id, false).await.unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({"email": "staff@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E2001");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(get_request("/products/brands/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(get_request("/products/brands/", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E3002");
}

#[tokio::test]
async fn register_is_public_and_normalizes_email() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/register",
            None,
            json!({
                "email": " New.User@Example.COM",
                "password": "longenough1",
                "first_name": "New",
                "last_name": "User"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "new.user@example.com");
    assert_eq!(body["user"]["is_staff"], false);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (app, _state, _token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/register",
            None,
            json!({"email": "staff@example.com", "password": "longenough1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn refresh_issues_new_access_token() {
    let (app, _state, _token, _dir) = authed_app().await;

    let login = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({"email": "staff@example.com", "password": "password123"}),
        ))
        .await
        .unwrap();
    let login_body = body_json(login).await;
    let refresh = login_body["refresh"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/token/refresh",
            None,
            json!({"refresh": refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let access = body["access"].as_str().unwrap().to_string();

    // The fresh access token works on a protected route
    let listing = app
        .oneshot(get_request("/products/brands/", Some(&access)))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let (app, _state, token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/token/refresh",
            None,
            json!({"refresh": token}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E3002");
}

#[tokio::test]
async fn brand_create_update_and_toggle() {
    let (app, _state, token, _dir) = authed_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/products/brands/create/",
            Some(&token),
            json!({"name": "Samsung Electronics"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Brand created");
    assert_eq!(body["brand"]["slug"], "samsung-electronics");
    let id = body["brand"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/products/brands/update/{id}"),
            Some(&token),
            json!({"name": "Samsung"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["brand"]["name"], "Samsung");
    // Slug never follows renames
    assert_eq!(body["brand"]["slug"], "samsung-electronics");

    // Already active, so a second activation conflicts
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/products/brands/activate/{id}"),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn brand_create_rejects_blank_name() {
    let (app, _state, token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/products/brands/create/",
            Some(&token),
            json!({"name": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn missing_brand_update_is_not_found() {
    let (app, _state, token, _dir) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/products/brands/update/9999",
            Some(&token),
            json!({"name": "Ghost"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0003");
}

fn multipart_request(uri: &str, token: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "test-boundary-7d93";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn base_product_multipart_create_and_detail_by_slug() {
    let (app, state, token, _dir) = authed_app().await;
    let brand = brand::create(&state.pool, BrandCreate { name: "Asus".into() })
        .await
        .unwrap();
    let cat = category::create(
        &state.pool,
        CategoryCreate {
            name: "Laptops".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/products/base-products/create/",
            &token,
            &[
                ("model_name", "ZenBook 14"),
                ("brand_id", &brand.id.to_string()),
                ("categories", &format!("[{}]", cat.id)),
                ("specs", r#"{"processor": {"model": "Ryzen 7", "cores": 8}}"#),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["base_product"]["slug"], "asus-zenbook-14");
    assert_eq!(body["base_product"]["brand"]["name"], "Asus");

    let response = app
        .oneshot(get_request("/products/base-products/asus-zenbook-14/", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model_name"], "ZenBook 14");
    assert_eq!(body["specs"]["processor"]["cores"], 8);
}

#[tokio::test]
async fn base_product_create_requires_object_specs() {
    let (app, state, token, _dir) = authed_app().await;
    let brand = brand::create(&state.pool, BrandCreate { name: "MSI".into() })
        .await
        .unwrap();
    let cat = category::create(
        &state.pool,
        CategoryCreate {
            name: "Desktops".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let response = app
        .oneshot(multipart_request(
            "/products/base-products/create/",
            &token,
            &[
                ("model_name", "Trident X"),
                ("brand_id", &brand.id.to_string()),
                ("categories", &format!("[{}]", cat.id)),
                ("specs", r#"["not", "an", "object"]"#),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn base_product_list_filters_by_spec_param() {
    let (app, state, token, _dir) = authed_app().await;
    let brand = brand::create(&state.pool, BrandCreate { name: "Acer".into() })
        .await
        .unwrap();
    let cat = category::create(
        &state.pool,
        CategoryCreate {
            name: "Laptops".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    for (model, cpu) in [("Swift 3", "Intel Core i5-1240P"), ("Predator", "Intel Core i9")] {
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/products/base-products/create/",
                &token,
                &[
                    ("model_name", model),
                    ("brand_id", &brand.id.to_string()),
                    ("categories", &format!("[{}]", cat.id)),
                    ("specs", &format!(r#"{{"processor": {{"model": "{cpu}"}}}}"#)),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request(
            "/products/base-products/?spec_processor_model=i5",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["model_name"], "Swift 3");
}
