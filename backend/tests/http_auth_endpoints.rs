//! End-to-end auth flows over the REST surface with in-memory adapters.

mod support;

use actix_web::{App, test, web};
use serde_json::{Value, json};

use backend::inbound::http::health::HealthState;
use backend::server::configure_app;
use support::{TestHarness, harness};

macro_rules! test_app {
    ($harness:expr) => {
        test::init_service(App::new().configure(|cfg| {
            configure_app(
                cfg,
                $harness.state.clone(),
                web::Data::new(HealthState::new()),
            );
        }))
        .await
    };
}

fn register_body(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "firstName": "Ada",
        "lastName": "Lovelace",
        "birthDate": "1990-01-01",
        "countryId": "MX",
        "stateId": "14",
        "municipalityId": "014",
    })
}

async fn profile_with_token<S, B>(app: &S, token: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), 200);
    test::read_body_json(res).await
}

#[actix_web::test]
async fn register_issues_a_bearer_token_that_reaches_the_profile() {
    let h: TestHarness = harness();
    let app = test_app!(h);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "12345678"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 201);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["tokenType"], "Bearer");
    let token = body["data"]["accessToken"]
        .as_str()
        .expect("access token present");
    assert!(!token.is_empty());

    let profile = profile_with_token(&app, token).await;
    assert_eq!(profile["data"]["email"], "a@b.com");
    assert_eq!(profile["data"]["firstName"], "Ada");
}

#[actix_web::test]
async fn login_returns_a_token_for_the_same_user() {
    let h = harness();
    let app = test_app!(h);

    let register = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "12345678"))
        .to_request();
    let res = test::call_service(&app, register).await;
    assert_eq!(res.status(), 201);
    let body: Value = test::read_body_json(res).await;
    let registered_token = body["data"]["accessToken"].as_str().expect("token");
    let registered_profile = profile_with_token(&app, registered_token).await;

    let login = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "a@b.com", "password": "12345678" }))
        .to_request();
    let res = test::call_service(&app, login).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    let login_token = body["data"]["accessToken"].as_str().expect("token");

    let login_profile = profile_with_token(&app, login_token).await;
    assert_eq!(login_profile["data"]["id"], registered_profile["data"]["id"]);
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_both_get_401() {
    let h = harness();
    let app = test_app!(h);

    let register = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "12345678"))
        .to_request();
    assert_eq!(test::call_service(&app, register).await.status(), 201);

    for body in [
        json!({ "email": "a@b.com", "password": "wrong-password" }),
        json!({ "email": "nobody@b.com", "password": "12345678" }),
    ] {
        let login = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, login).await;
        assert_eq!(res.status(), 401);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "invalid credentials");
    }
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let h = harness();
    let app = test_app!(h);

    let first = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "12345678"))
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 201);

    let second = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "another-password"))
        .to_request();
    let res = test::call_service(&app, second).await;
    assert_eq!(res.status(), 400);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn short_passwords_fail_validation_before_any_write() {
    let h = harness();
    let app = test_app!(h);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(register_body("a@b.com", "short"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);

    let login = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "a@b.com", "password": "short" }))
        .to_request();
    assert_eq!(test::call_service(&app, login).await.status(), 401);
}
