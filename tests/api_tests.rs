// tests/api_tests.rs

use std::sync::Arc;

use ecolearn::{
    config::{Config, Latency},
    models::question::default_questions,
    routes,
    services::{dashboard::SampleProvider, remote::SimulatedRemote, session::SessionStore},
    state::AppState,
};
use serde_json::{Value, json};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    spawn_app_with(Latency::none()).await
}

/// Same as `spawn_app`, with simulated remote calls taking `latency`.
async fn spawn_app_with(latency: Latency) -> String {
    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: std::env::temp_dir().join(format!("ecolearn-{}", uuid::Uuid::new_v4())),
        static_dir: "static".into(),
        latency,
        rust_log: "error".to_string(),
    };

    let state = AppState::new(
        config.clone(),
        SessionStore::in_memory(),
        Arc::new(SimulatedRemote::new(config.latency.clone())),
        Arc::new(SampleProvider),
        default_questions(),
    )
    .expect("Failed to build app state");
    state.spawn_session_listener();

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Client that reports redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (u16, Value) {
    let response = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn login_demo(client: &reqwest::Client, address: &str) -> Value {
    let (status, body) = post_json(
        client,
        format!("{}/api/auth/login", address),
        json!({ "email": "demo@ecolearn.com", "password": "demo123", "rememberMe": true }),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    body
}

fn signup_form(email: &str) -> Value {
    json!({
        "fullName": "Jordan Rivers",
        "email": email,
        "password": "Secure#Pass1",
        "confirmPassword": "Secure#Pass1",
        "userType": "student",
        "institution": "Lakeside Academy",
        "agreeTerms": true,
        "emailUpdates": false
    })
}

#[tokio::test]
async fn unknown_path_is_404() {
    let address = spawn_app().await;

    let response = client()
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn demo_login_redirects_to_dashboard() {
    let address = spawn_app().await;
    let client = client();

    let body = login_demo(&client, &address).await;

    assert_eq!(body["message"], "Login successful! Redirecting...");
    assert_eq!(body["redirect"]["to"], "/dashboard");
    assert_eq!(body["redirect"]["afterMs"], 1500);
    assert_eq!(body["user"]["email"], "demo@ecolearn.com");

    let me: Value = client
        .get(&format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["persistence"], "durable");
    assert_eq!(me["user"]["id"], 1);
}

#[tokio::test]
async fn login_without_remember_me_is_tab_scoped() {
    let address = spawn_app().await;
    let client = client();

    let (status, _) = post_json(
        &client,
        format!("{}/api/auth/login", address),
        json!({ "email": "demo@ecolearn.com", "password": "demo123", "rememberMe": false }),
    )
    .await;
    assert_eq!(status, 200);

    let me: Value = client
        .get(&format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["persistence"], "tab");
    assert_eq!(me["user"]["email"], "demo@ecolearn.com");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let address = spawn_app().await;
    let client = client();

    let (status, body) = post_json(
        &client,
        format!("{}/api/auth/login", address),
        json!({ "email": "demo@ecolearn.com", "password": "wrongpass" }),
    )
    .await;

    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().contains("demo@ecolearn.com"));

    let me = client
        .get(&format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status().as_u16(), 401);
}

#[tokio::test]
async fn malformed_login_never_reaches_the_remote() {
    let address = spawn_app().await;

    let (status, body) = post_json(
        &client(),
        format!("{}/api/auth/login", address),
        json!({ "email": "not-an-email", "password": "" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["focus"], "email");
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn signup_password_mismatch_focuses_confirmation() {
    let address = spawn_app().await;
    let mut form = signup_form("jordan@lakeside.edu");
    form["confirmPassword"] = json!("Secure#Pass2");

    let (status, body) = post_json(&client(), format!("{}/api/auth/signup", address), form).await;

    assert_eq!(status, 400);
    assert_eq!(body["focus"], "confirmPassword");
}

#[tokio::test]
async fn signup_stages_account_and_sends_to_login() {
    let address = spawn_app().await;
    let client = client();
    let email = format!("u{}@lakeside.edu", &uuid::Uuid::new_v4().to_string()[..8]);

    let (status, body) =
        post_json(&client, format!("{}/api/auth/signup", address), signup_form(&email)).await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["redirect"]["to"], "/login");
    assert_eq!(body["redirect"]["afterMs"], 2000);

    // Signup does not sign in.
    let me = client
        .get(&format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status().as_u16(), 401);
}

#[tokio::test]
async fn signup_with_existing_email_conflicts() {
    let address = spawn_app().await;

    let (status, body) = post_json(
        &client(),
        format!("{}/api/auth/signup", address),
        signup_form("existing@example.com"),
    )
    .await;

    assert_eq!(status, 409);
    assert_eq!(body["error"], "An account with this email already exists");
}

#[tokio::test]
async fn quick_signup_accepts_six_character_password() {
    let address = spawn_app().await;

    let (status, body) = post_json(
        &client(),
        format!("{}/api/auth/quick-signup", address),
        json!({
            "name": "Priya Nair",
            "email": "priya@example.org",
            "role": "teacher",
            "password": "abc123",
            "confirmPassword": "abc123"
        }),
    )
    .await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["redirect"]["to"], "/dashboard");
    assert_eq!(body["user"]["role"], "teacher");
}

#[tokio::test]
async fn password_strength_meter() {
    let address = spawn_app().await;
    let client = client();

    let (_, strong) = post_json(
        &client,
        format!("{}/api/auth/password-strength", address),
        json!({ "password": "Abcdef1!" }),
    )
    .await;
    assert_eq!(strong["strength"], "strong");
    assert_eq!(strong["width"], 100);

    let (_, hidden) = post_json(
        &client,
        format!("{}/api/auth/password-strength", address),
        json!({ "password": "" }),
    )
    .await;
    assert!(hidden.is_null());
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let address = spawn_app().await;
    let client = client();

    let response = client
        .get(&format!("{}/dashboard", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers()["location"], "/");

    login_demo(&client, &address).await;

    let page = client
        .get(&format!("{}/dashboard", address))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status().as_u16(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains(r#"<span id="userPoints">0</span>"#));
    assert!(html.contains(r#"<section id="overview" class="dashboard-section" style="display: block">"#));
}

#[tokio::test]
async fn login_page_forwards_signed_in_users() {
    let address = spawn_app().await;
    let client = client();

    let before = client.get(&format!("{}/login", address)).send().await.unwrap();
    assert_eq!(before.status().as_u16(), 200);

    login_demo(&client, &address).await;

    for page in ["login", "signup"] {
        let after = client
            .get(&format!("{}/{}", address, page))
            .send()
            .await
            .unwrap();
        assert_eq!(after.status().as_u16(), 303);
        assert_eq!(after.headers()["location"], "/dashboard");
    }
}

#[tokio::test]
async fn logout_clears_the_session() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    let (status, body) = post_json(&client, format!("{}/api/auth/logout", address), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["redirect"]["to"], "/");

    let response = client
        .get(&format!("{}/dashboard", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
}

#[tokio::test]
async fn dashboard_section_switch_and_unknown_section() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    let html = client
        .get(&format!("{}/dashboard/leaderboard?search=high", address))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<section id="leaderboard" class="dashboard-section" style="display: block">"#));
    assert_eq!(html.matches("leaderboard-item").count(), 2);

    let missing = client
        .get(&format!("{}/dashboard/settings", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn perfect_quiz_scores_two() {
    let address = spawn_app().await;
    let client = client();

    for (question, option) in [(0, 2), (1, 1)] {
        let (status, _) = post_json(
            &client,
            format!("{}/api/quiz/select", address),
            json!({ "questionIndex": question, "optionIndex": option }),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, body) = post_json(&client, format!("{}/api/quiz/submit", address), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["score"], 2);
    assert_eq!(body["total"], 2);
    assert_eq!(body["pointsAwarded"], 0);

    let (status, _) = post_json(
        &client,
        format!("{}/api/quiz/select", address),
        json!({ "questionIndex": 0, "optionIndex": 0 }),
    )
    .await;
    assert_eq!(status, 409);

    let (status, fresh) = post_json(&client, format!("{}/api/quiz/restart", address), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(fresh["submitted"], false);
    assert!(fresh["selected"].is_null());
}

#[tokio::test]
async fn quiz_navigation_is_clamped() {
    let address = spawn_app().await;
    let client = client();

    let (_, view) = post_json(&client, format!("{}/api/quiz/previous", address), json!({})).await;
    assert_eq!(view["position"], 0);
    assert_eq!(view["navigation"]["previousDisabled"], true);

    post_json(&client, format!("{}/api/quiz/next", address), json!({})).await;
    let (_, view) = post_json(&client, format!("{}/api/quiz/next", address), json!({})).await;
    assert_eq!(view["position"], 1);
    assert_eq!(view["navigation"]["showSubmit"], true);
    assert_eq!(view["navigation"]["showNext"], false);

    let (status, _) = post_json(
        &client,
        format!("{}/api/quiz/display", address),
        json!({ "index": 7 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn quiz_awards_points_to_signed_in_user() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    post_json(
        &client,
        format!("{}/api/quiz/select", address),
        json!({ "questionIndex": 0, "optionIndex": 2 }),
    )
    .await;
    let (status, body) = post_json(&client, format!("{}/api/quiz/submit", address), json!({})).await;

    assert_eq!(status, 200);
    assert_eq!(body["score"], 1);
    assert_eq!(body["pointsAwarded"], 25);
    assert_eq!(body["user"]["ecoPoints"], 25);
}

#[tokio::test]
async fn first_task_earns_first_steps_once() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    let submission = json!({ "task": "tree", "proof": "sapling.jpg", "notes": "Planted an oak" });

    let (status, body) = post_json(
        &client,
        format!("{}/api/tasks/submit", address),
        submission.clone(),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["message"], "Task submitted successfully! You earned 50 Eco Points!");
    assert_eq!(body["user"]["ecoPoints"], 50);
    assert_eq!(body["user"]["tasksCompleted"], 1);
    let new_badges = body["newBadges"].as_array().unwrap();
    assert_eq!(new_badges.len(), 1);
    assert_eq!(new_badges[0]["id"], "first-steps");

    let (_, again) = post_json(&client, format!("{}/api/tasks/submit", address), submission).await;
    assert_eq!(again["user"]["tasksCompleted"], 2);
    assert!(again.get("newBadges").is_none());

    let stats: Value = client
        .get(&format!("{}/api/dashboard/stats", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["stats"]["badgesEarned"], 1);
    assert_eq!(stats["stats"]["tasksPercent"], 10);
}

#[tokio::test]
async fn task_without_proof_changes_nothing() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    let (status, body) = post_json(
        &client,
        format!("{}/api/tasks/submit", address),
        json!({ "task": "energy", "notes": "Switched off lights" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Please upload proof of your task completion.");

    let me: Value = client
        .get(&format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["user"]["tasksCompleted"], 0);
}

#[tokio::test]
async fn task_submission_requires_login() {
    let address = spawn_app().await;

    let (status, _) = post_json(
        &client(),
        format!("{}/api/tasks/submit", address),
        json!({ "task": "waste", "proof": "bins.png", "notes": "Sorted" }),
    )
    .await;

    assert_eq!(status, 401);
}

#[tokio::test]
async fn badge_category_filter() {
    let address = spawn_app().await;
    let client = client();
    login_demo(&client, &address).await;

    let body: Value = client
        .get(&format!("{}/api/dashboard/badges?category=special", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = body["badges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["eco-warrior", "streak-master"]);

    let bad = client
        .get(&format!("{}/api/dashboard/badges?category=secret", address))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);
}

#[tokio::test]
async fn contact_form_validates_then_sends() {
    let address = spawn_app().await;
    let client = client();

    let (status, body) = post_json(
        &client,
        format!("{}/api/contact", address),
        json!({
            "firstName": "Lee",
            "lastName": "",
            "email": "lee@example.com",
            "subject": "Workshops",
            "message": "Do you run school workshops?"
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["focus"], "lastName");

    let (status, body) = post_json(
        &client,
        format!("{}/api/contact", address),
        json!({
            "firstName": "Lee",
            "lastName": "Park",
            "email": "lee@example.com",
            "subject": "Workshops",
            "message": "Do you run school workshops?"
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Thank you! Your message has been sent successfully.");
}

#[tokio::test]
async fn form_controls_are_idle_between_submissions() {
    let address = spawn_app().await;
    let client = client();

    let body: Value = client
        .get(&format!("{}/api/forms/login", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["disabled"], false);

    let missing = client
        .get(&format!("{}/api/forms/newsletter", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn second_submit_while_sending_conflicts() {
    // Contact calls take 500ms.
    let address = spawn_app_with(Latency::scaled(0.25)).await;
    let client = client();
    let message = json!({
        "firstName": "Lee",
        "lastName": "Park",
        "email": "lee@example.com",
        "subject": "Workshops",
        "message": "Do you run school workshops?"
    });

    let first = tokio::spawn({
        let client = client.clone();
        let url = format!("{}/api/contact", address);
        let message = message.clone();
        async move { post_json(&client, url, message).await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    let busy: Value = client
        .get(&format!("{}/api/forms/contact", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(busy["disabled"], true);
    assert_eq!(busy["label"], "Sending...");

    let (status, body) = post_json(&client, format!("{}/api/contact", address), message).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "A submission is already in progress");

    let (status, _) = first.await.unwrap();
    assert_eq!(status, 200);

    let idle: Value = client
        .get(&format!("{}/api/forms/contact", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(idle["disabled"], false);
}
