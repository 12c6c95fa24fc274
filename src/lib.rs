use spin_sdk::http::{Request, Response};

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod posts;

use crate::core::errors::ApiError;

#[cfg(target_arch = "wasm32")]
#[spin_sdk::http_component]
fn handle(req: Request) -> anyhow::Result<impl spin_sdk::http::IntoResponse> {
    Ok(route(req))
}

/// Single route table shared by the Spin component and the native server.
/// Handler errors never escape: anything unexpected becomes a logged 500.
pub fn route(req: Request) -> Response {
    let method = req.method().to_string();
    let path = req.path().to_string();

    let result = match (method.as_str(), path.as_str()) {
        ("POST", "/api/auth/signup") => auth::signup(req),
        ("POST", "/api/auth/login") => auth::login(req),
        ("POST", "/api/posts") => posts::create_post(req),
        ("GET", "/api/posts/feed") => posts::get_feed(req),
        ("GET", p) if p.starts_with("/api/posts/user/") => posts::get_user_posts(req),
        ("PUT", p) if p.starts_with("/api/posts/") && p.ends_with("/like") => {
            posts::like_post(req)
        }
        ("POST", p) if p.starts_with("/api/posts/") && p.ends_with("/comment") => {
            posts::comment_on_post(req)
        }
        ("GET", p) => crate::core::static_server::serve_static(p),
        _ => Ok(ApiError::NotFound("route is not found".to_string()).into()),
    };

    match result {
        Ok(resp) => resp,
        Err(err) => {
            tracing::error!(%method, %path, error = %err, "request failed");
            ApiError::InternalError(err.to_string()).into()
        }
    }
}
