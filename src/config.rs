pub const USERS_LIST_KEY: &str = "users_list";
pub const FEED_KEY: &str = "feed";

pub const MAX_POST_LENGTH: usize = 5000;
pub const MAX_COMMENT_LENGTH: usize = 1000;

pub fn user_key(id: &str) -> String {
    format!("user:{}", id)
}

pub fn post_key(id: &str) -> String {
    format!("post:{}", id)
}

pub fn jwt_secret() -> String {
    std::env::var("RIPPLE_JWT_SECRET").unwrap_or_else(|_| "change_this_secret".to_string())
}

pub fn token_expiration_days() -> i64 {
    std::env::var("RIPPLE_TOKEN_EXPIRATION_DAYS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(7)
}

pub fn listen_addr() -> String {
    std::env::var("RIPPLE_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
