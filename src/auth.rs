use spin_sdk::http::{Request, Response};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::{jwt_secret, token_expiration_days};
use crate::core::db;
use crate::core::errors::ApiError;
use crate::core::helpers::{hash_password, json_response, now_iso, sanitize_text, store, verify_password};
use crate::models::models::{AuthResponse, Claims, LoginRequest, SignupRequest, User, UserView};

/// Sign a session token for the given user. Claims carry id, display name
/// and email so handlers never need a user lookup just to know the caller.
pub fn issue_token(user: &User) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        user_name: user.user_name.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::days(token_expiration_days())).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_claims(token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Bearer-token check used by every protected handler. Expiry and signature
/// are verified by the decode; there is no server-side token state.
pub fn authenticate(req: &Request) -> Option<Claims> {
    let auth_header = req.header("Authorization")?.as_str().unwrap_or_default();
    let token = auth_header.strip_prefix("Bearer ")?;
    decode_claims(token)
}

pub fn signup(req: Request) -> anyhow::Result<Response> {
    let body: SignupRequest = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid request body".to_string()).into()),
    };

    let user_name = sanitize_text(body.user_name.trim());
    let email = body.email.trim().to_string();

    if user_name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Ok(ApiError::BadRequest("All fields are required".to_string()).into());
    }

    let store = store();
    if db::identity_taken(&store, &user_name, &email)? {
        return Ok(ApiError::Conflict(
            "User with given email or username already exists".to_string(),
        )
        .into());
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        user_name,
        email,
        password: hash_password(&body.password)?,
        created_at: now_iso(),
    };
    db::insert_user(&store, &user)?;

    let token = issue_token(&user)?;
    tracing::info!(user_id = %user.id, "user signed up");

    json_response(201, &AuthResponse {
        success: true,
        user: UserView::from(&user),
        token,
    })
}

pub fn login(req: Request) -> anyhow::Result<Response> {
    let body: LoginRequest = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid request body".to_string()).into()),
    };

    if body.email.is_empty() || body.password.is_empty() {
        return Ok(ApiError::BadRequest("All fields are required".to_string()).into());
    }

    let store = store();
    let user = match db::find_user_by_email(&store, body.email.trim())? {
        Some(u) => u,
        None => return Ok(ApiError::NotFound("User not found".to_string()).into()),
    };

    if !verify_password(&body.password, &user.password) {
        return Ok(ApiError::Unauthorized.into());
    }

    let token = issue_token(&user)?;

    json_response(200, &AuthResponse {
        success: true,
        user: UserView::from(&user),
        token,
    })
}
