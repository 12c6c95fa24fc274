use serde::{Serialize, Deserialize};

// === Stored documents ===

#[derive(Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Comment {
    pub user_id: String,
    pub text: String,
    pub created_at: String,
}

/// JWT claims carried by the session token.
#[derive(Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

// === Request bodies ===

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

// === Response contracts ===
// One typed shape per endpoint; the stored password never crosses here.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: String,
    pub user_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub user_name: String,
    pub text: String,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub user: PostAuthor,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub likes_count: usize,
    pub comments_count: usize,
    pub liked_users: Vec<String>,
    pub commented_users: Vec<CommentView>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserView,
    pub token: String,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
}

#[derive(Serialize)]
pub struct PostResponse {
    pub message: String,
    pub post: PostView,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub message: String,
    pub comment: CommentView,
}
