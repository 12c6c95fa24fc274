use spin_sdk::http::{Request, Response};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::config::{MAX_COMMENT_LENGTH, MAX_POST_LENGTH};
use crate::core::db;
use crate::core::errors::ApiError;
use crate::core::helpers::{json_response, now_iso, sanitize_text, store, validate_uuid};
use crate::models::models::{
    Comment, CommentRequest, CommentResponse, CommentView, CreatePostRequest, FeedResponse, Post,
    PostAuthor, PostResponse, PostView,
};

/// Extract the post id from `/api/posts/{id}/...` paths.
fn post_id_from_path(path: &str) -> Option<&str> {
    path.strip_prefix("/api/posts/")?.split('/').next()
}

/// Toggle set membership in a post's like list. Returns true when the user
/// is a liker after the call. Duplicates are impossible because removal
/// filters every occurrence.
fn toggle_like(likes: &mut Vec<String>, user_id: &str) -> bool {
    if likes.iter().any(|id| id == user_id) {
        likes.retain(|id| id != user_id);
        false
    } else {
        likes.push(user_id.to_string());
        true
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Join a stored post against the user-name index into the wire shape the
/// client renders: resolved author, liker names, comment author names and
/// the derived counts.
fn resolve_post(post: &Post, names: &HashMap<String, String>) -> PostView {
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_default();
    PostView {
        id: post.id.clone(),
        user: PostAuthor {
            id: post.user_id.clone(),
            user_name: name_of(&post.user_id),
        },
        content: post.content.clone(),
        image: post.image.clone(),
        created_at: post.created_at.clone(),
        likes_count: post.likes.len(),
        comments_count: post.comments.len(),
        liked_users: post.likes.iter().map(|id| name_of(id)).collect(),
        commented_users: post
            .comments
            .iter()
            .map(|c| CommentView {
                user_name: name_of(&c.user_id),
                text: c.text.clone(),
                created_at: c.created_at.clone(),
            })
            .collect(),
    }
}

pub fn create_post(req: Request) -> anyhow::Result<Response> {
    let claims = match authenticate(&req) {
        Some(c) => c,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let body: CreatePostRequest = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid request body".to_string()).into()),
    };

    // Empty strings count as absent, same as a missing field.
    let content = body
        .content
        .map(|c| sanitize_text(c.trim()))
        .filter(|c| !c.is_empty());
    let image = body.image.filter(|i| !i.trim().is_empty());

    if content.is_none() && image.is_none() {
        return Ok(ApiError::BadRequest("Either content or image is required".to_string()).into());
    }
    if content.as_ref().map(|c| c.len() > MAX_POST_LENGTH).unwrap_or(false) {
        return Ok(ApiError::BadRequest("Content too long".to_string()).into());
    }

    let post = Post {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        content,
        image,
        likes: Vec::new(),
        comments: Vec::new(),
        created_at: now_iso(),
    };

    let store = store();
    db::insert_post(&store, &post)?;

    // The author's name comes straight from the token claims; a fresh post
    // has no likes or comments to resolve.
    let mut names = HashMap::new();
    names.insert(claims.sub, claims.user_name);

    json_response(201, &PostResponse {
        message: "Post created successfully".to_string(),
        post: resolve_post(&post, &names),
    })
}

pub fn get_feed(req: Request) -> anyhow::Result<Response> {
    if authenticate(&req).is_none() {
        return Ok(ApiError::Unauthorized.into());
    }

    let store = store();
    let mut posts = db::feed_posts(&store)?;
    sort_newest_first(&mut posts);

    let names = db::user_name_index(&store)?;
    let views: Vec<PostView> = posts.iter().map(|p| resolve_post(p, &names)).collect();

    json_response(200, &FeedResponse { posts: views })
}

pub fn like_post(req: Request) -> anyhow::Result<Response> {
    let claims = match authenticate(&req) {
        Some(c) => c,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let post_id = post_id_from_path(req.path()).unwrap_or_default();
    if post_id.is_empty() || !validate_uuid(post_id) {
        return Ok(ApiError::BadRequest("Post ID required".to_string()).into());
    }

    let store = store();
    let mut post = match db::get_post(&store, post_id)? {
        Some(p) => p,
        None => return Ok(ApiError::NotFound("Post not found".to_string()).into()),
    };

    let liked = toggle_like(&mut post.likes, &claims.sub);
    db::put_post(&store, &post)?;

    let names = db::user_name_index(&store)?;
    let message = if liked { "Post liked" } else { "Post unliked" };

    json_response(200, &PostResponse {
        message: message.to_string(),
        post: resolve_post(&post, &names),
    })
}

pub fn comment_on_post(req: Request) -> anyhow::Result<Response> {
    let claims = match authenticate(&req) {
        Some(c) => c,
        None => return Ok(ApiError::Unauthorized.into()),
    };

    let post_id = post_id_from_path(req.path()).unwrap_or_default();
    if post_id.is_empty() || !validate_uuid(post_id) {
        return Ok(ApiError::BadRequest("Post ID required".to_string()).into());
    }

    let body: CommentRequest = match serde_json::from_slice(req.body()) {
        Ok(v) => v,
        Err(_) => return Ok(ApiError::BadRequest("Invalid request body".to_string()).into()),
    };

    let text = sanitize_text(body.text.trim());
    if text.is_empty() {
        return Ok(ApiError::BadRequest("Comment text is required".to_string()).into());
    }
    if text.len() > MAX_COMMENT_LENGTH {
        return Ok(ApiError::BadRequest("Comment too long".to_string()).into());
    }

    let store = store();
    let mut post = match db::get_post(&store, post_id)? {
        Some(p) => p,
        None => return Ok(ApiError::NotFound("Post not found".to_string()).into()),
    };

    let comment = Comment {
        user_id: claims.sub,
        text,
        created_at: now_iso(),
    };
    post.comments.push(comment.clone());
    db::put_post(&store, &post)?;

    json_response(201, &CommentResponse {
        message: "Comment added successfully".to_string(),
        comment: CommentView {
            user_name: claims.user_name,
            text: comment.text,
            created_at: comment.created_at,
        },
    })
}

pub fn get_user_posts(req: Request) -> anyhow::Result<Response> {
    if authenticate(&req).is_none() {
        return Ok(ApiError::Unauthorized.into());
    }

    let user_id = req
        .path()
        .strip_prefix("/api/posts/user/")
        .unwrap_or_default();
    if user_id.is_empty() || !validate_uuid(user_id) {
        return Ok(ApiError::BadRequest("User ID required".to_string()).into());
    }

    let store = store();
    let mut posts = db::feed_posts(&store)?;
    posts.retain(|p| p.user_id == user_id);
    sort_newest_first(&mut posts);

    let names = db::user_name_index(&store)?;
    let views: Vec<PostView> = posts.iter().map(|p| resolve_post(p, &names)).collect();

    json_response(200, &FeedResponse { posts: views })
}
