use spin_sdk::key_value::Store;
use std::collections::HashMap;

use crate::config::{user_key, post_key, FEED_KEY, USERS_LIST_KEY};
use crate::models::models::{Post, User};

// Collection-level access over the KV document store. Two collections
// (`user:{id}`, `post:{id}`) plus the id-list index keys that stand in for
// queries: `users_list` holds every user id, `feed` holds post ids with the
// newest prepended.

pub fn user_ids(store: &Store) -> anyhow::Result<Vec<String>> {
    Ok(store.get_json(USERS_LIST_KEY)?.unwrap_or_default())
}

pub fn get_user(store: &Store, id: &str) -> anyhow::Result<Option<User>> {
    Ok(store.get_json(&user_key(id))?)
}

pub fn find_user_by_email(store: &Store, email: &str) -> anyhow::Result<Option<User>> {
    for id in user_ids(store)? {
        if let Some(user) = get_user(store, &id)? {
            if user.email == email {
                return Ok(Some(user));
            }
        }
    }
    Ok(None)
}

/// Linear scan for a signup conflict on either unique identity field.
pub fn identity_taken(store: &Store, user_name: &str, email: &str) -> anyhow::Result<bool> {
    for id in user_ids(store)? {
        if let Some(user) = get_user(store, &id)? {
            if user.user_name == user_name || user.email == email {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

pub fn insert_user(store: &Store, user: &User) -> anyhow::Result<()> {
    store.set_json(&user_key(&user.id), user)?;
    let mut ids = user_ids(store)?;
    ids.push(user.id.clone());
    store.set_json(USERS_LIST_KEY, &ids)?;
    Ok(())
}

/// Map of user id to display name for resolving feed metadata in one pass.
pub fn user_name_index(store: &Store) -> anyhow::Result<HashMap<String, String>> {
    let mut index = HashMap::new();
    for id in user_ids(store)? {
        if let Some(user) = get_user(store, &id)? {
            index.insert(user.id, user.user_name);
        }
    }
    Ok(index)
}

pub fn get_post(store: &Store, id: &str) -> anyhow::Result<Option<Post>> {
    Ok(store.get_json(&post_key(id))?)
}

pub fn put_post(store: &Store, post: &Post) -> anyhow::Result<()> {
    store.set_json(&post_key(&post.id), post)?;
    Ok(())
}

/// Persist a new post and prepend it to the feed index.
pub fn insert_post(store: &Store, post: &Post) -> anyhow::Result<()> {
    put_post(store, post)?;
    let mut feed: Vec<String> = store.get_json(FEED_KEY)?.unwrap_or_default();
    feed.insert(0, post.id.clone());
    store.set_json(FEED_KEY, &feed)?;
    Ok(())
}

pub fn feed_posts(store: &Store) -> anyhow::Result<Vec<Post>> {
    let feed: Vec<String> = store.get_json(FEED_KEY)?.unwrap_or_default();
    let mut posts = Vec::with_capacity(feed.len());
    for id in feed.iter() {
        if let Some(post) = get_post(store, id)? {
            posts.push(post);
        }
    }
    Ok(posts)
}
