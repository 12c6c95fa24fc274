use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

const BASE_URL: &str = "http://127.0.0.1:3000";
static TEST_LOCK: Mutex<()> = Mutex::new(());

fn lock_test() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap()
}

// The suite runs against a live server (native binary or `spin up`). When
// nothing is listening the tests bail out early instead of failing.
async fn server_available(client: &reqwest::Client) -> bool {
    client
        .get(BASE_URL)
        .timeout(Duration::from_secs(1))
        .send()
        .await
        .is_ok()
}

fn unique_identity() -> (String, String) {
    let tag = uuid::Uuid::new_v4();
    (format!("user_{}", tag.simple()), format!("{}@test.local", tag.simple()))
}

async fn signup(
    client: &reqwest::Client,
    user_name: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/signup", BASE_URL))
        .json(&json!({ "userName": user_name, "email": email, "password": password }))
        .send()
        .await
        .expect("signup request failed")
}

async fn signup_token(client: &reqwest::Client) -> (String, String) {
    let (user_name, email) = unique_identity();
    let resp = signup(client, &user_name, &email, "secret1").await;
    assert_eq!(resp.status(), 201);
    let body = resp.json::<serde_json::Value>().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

async fn create_post(client: &reqwest::Client, token: &str, content: &str) -> serde_json::Value {
    let resp = client
        .post(format!("{}/api/posts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "content": content }))
        .send()
        .await
        .expect("create post request failed");
    assert_eq!(resp.status(), 201);
    resp.json::<serde_json::Value>().await.unwrap()["post"].clone()
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (user_name, email) = unique_identity();

    let resp = signup(&client, &user_name, &email, "secret1").await;
    assert_eq!(resp.status(), 201);
    let body = resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["userName"], user_name.as_str());
    assert!(
        body["user"].get("password").is_none(),
        "password must not appear in signup response: {:?}",
        body
    );
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    // Login with the same credentials returns the same user id.
    let login_resp = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login_resp.status(), 200);
    let login_body = login_resp.json::<serde_json::Value>().await.unwrap();
    assert_eq!(login_body["user"]["id"], user_id.as_str());
    assert!(login_body["user"].get("password").is_none());

    // Wrong password is a 401, unknown email a 404.
    let bad_pw = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_pw.status(), 401);

    let unknown = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": "nobody@test.local", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (user_name, email) = unique_identity();
    assert_eq!(signup(&client, &user_name, &email, "secret1").await.status(), 201);

    // Same email, different username.
    let (other_name, _) = unique_identity();
    assert_eq!(signup(&client, &other_name, &email, "secret1").await.status(), 409);

    // Same username, different email.
    let (_, other_email) = unique_identity();
    assert_eq!(signup(&client, &user_name, &other_email, "secret1").await.status(), 409);

    // Missing fields.
    let missing = client
        .post(format!("{}/api/auth/signup", BASE_URL))
        .json(&json!({ "email": "x@test.local" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);
}

#[tokio::test]
async fn test_post_requires_content_or_image() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (token, _) = signup_token(&client).await;

    let empty = client
        .post(format!("{}/api/posts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), 400);

    let image_only = client
        .post(format!("{}/api/posts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "image": "https://example.com/cat.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(image_only.status(), 201);
    let body = image_only.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["post"]["image"], "https://example.com/cat.png");
    assert!(body["post"]["content"].is_null());
}

#[tokio::test]
async fn test_like_toggle_roundtrip() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (token, _) = signup_token(&client).await;
    let post = create_post(&client, &token, "like me").await;
    let post_id = post["id"].as_str().unwrap();
    assert_eq!(post["likesCount"], 0);

    let like_url = format!("{}/api/posts/{}/like", BASE_URL, post_id);

    let first = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    let first_body = first.json::<serde_json::Value>().await.unwrap();
    assert_eq!(first_body["message"], "Post liked");
    assert_eq!(first_body["post"]["likesCount"], 1);

    let second = client
        .put(&like_url)
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 200);
    let second_body = second.json::<serde_json::Value>().await.unwrap();
    assert_eq!(second_body["message"], "Post unliked");
    assert_eq!(second_body["post"]["likesCount"], 0);
}

#[tokio::test]
async fn test_comment_validation_and_append() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (token, _) = signup_token(&client).await;
    let post = create_post(&client, &token, "comment here").await;
    let comment_url = format!("{}/api/posts/{}/comment", BASE_URL, post["id"].as_str().unwrap());

    let blank = client
        .post(&comment_url)
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), 400);

    let ok = client
        .post(&comment_url)
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "text": "  first!  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 201);
    let body = ok.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["comment"]["text"], "first!");
    assert!(body["comment"]["userName"].as_str().is_some());
    assert!(body["comment"]["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_feed_newest_first_with_metadata() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (token, _) = signup_token(&client).await;
    let first = create_post(&client, &token, "first").await;
    let second = create_post(&client, &token, "second").await;
    let third = create_post(&client, &token, "third").await;

    let resp = client
        .get(format!("{}/api/posts/feed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await.unwrap();
    let posts = body["posts"].as_array().unwrap();

    let ours: Vec<&str> = posts
        .iter()
        .filter(|p| {
            [&first, &second, &third]
                .iter()
                .any(|created| created["id"] == p["id"])
        })
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ours,
        vec![
            third["id"].as_str().unwrap(),
            second["id"].as_str().unwrap(),
            first["id"].as_str().unwrap(),
        ]
    );

    for post in posts {
        assert!(post["likesCount"].is_number());
        assert!(post["commentsCount"].is_number());
        assert!(post["likedUsers"].is_array());
        assert!(post["commentedUsers"].is_array());
        assert!(post["user"]["userName"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_user_posts_filtered_by_author() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let (token_a, user_a) = signup_token(&client).await;
    let (token_b, _) = signup_token(&client).await;
    create_post(&client, &token_a, "by a").await;
    create_post(&client, &token_b, "by b").await;

    let resp = client
        .get(format!("{}/api/posts/user/{}", BASE_URL, user_a))
        .header("Authorization", format!("Bearer {}", token_b))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await.unwrap();
    let posts = body["posts"].as_array().unwrap();
    assert!(!posts.is_empty());
    for post in posts {
        assert_eq!(post["user"]["id"], user_a.as_str());
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let _lock = lock_test();
    let client = reqwest::Client::new();
    if !server_available(&client).await {
        eprintln!("skipping: no server at {}", BASE_URL);
        return;
    }

    let no_token = client
        .get(format!("{}/api/posts/feed", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), 401);

    let bad_token = client
        .post(format!("{}/api/posts", BASE_URL))
        .header("Authorization", "Bearer not-a-token")
        .json(&json!({ "content": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_token.status(), 401);

    let unknown_route = client
        .get(format!("{}/api/nope", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_route.status(), 404);
}
