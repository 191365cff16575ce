// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post listings.
//!
//! Posts reference their author and comment authors by id. Listings resolve
//! those ids with one batched user lookup per request and attach sanitized
//! profiles.

use std::collections::HashMap;

use super::USER_NOT_FOUND;
use crate::error::ServiceError;
use crate::models::{CommentView, PostView, UserProfile};
use crate::state::AppState;
use crate::storage::{PostRepository, StoredPost, StoredUser, UserRepository};

/// Every post, newest first.
pub fn all_posts(state: &AppState) -> Result<Vec<PostView>, ServiceError> {
    let posts = PostRepository::new(&state.db).list_newest(|_| true)?;
    populate(state, posts)
}

/// Posts by the users `user_id` follows, newest first.
pub fn following_posts(state: &AppState, user_id: &str) -> Result<Vec<PostView>, ServiceError> {
    let user = load_user(state, user_id)?;
    let posts = PostRepository::new(&state.db).list_by_owners(&user.following)?;
    populate(state, posts)
}

/// Posts `user_id` has liked, newest first.
pub fn liked_posts(state: &AppState, user_id: &str) -> Result<Vec<PostView>, ServiceError> {
    let user = load_user(state, user_id)?;
    let posts = PostRepository::new(&state.db).list_by_ids(&user.liked_posts)?;
    populate(state, posts)
}

/// Posts authored by `username`, newest first.
pub fn user_posts(state: &AppState, username: &str) -> Result<Vec<PostView>, ServiceError> {
    let user = UserRepository::new(&state.db)
        .find_by_username(username)?
        .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;
    let posts = PostRepository::new(&state.db).list_by_owners(std::slice::from_ref(&user.id))?;
    populate(state, posts)
}

/// Resolve a single post.
pub(crate) fn post_view(state: &AppState, post: StoredPost) -> Result<PostView, ServiceError> {
    let mut views = populate(state, vec![post])?;
    views
        .pop()
        .ok_or_else(|| ServiceError::not_found(super::POST_NOT_FOUND))
}

fn load_user(state: &AppState, user_id: &str) -> Result<StoredUser, ServiceError> {
    UserRepository::new(&state.db)
        .get(user_id)?
        .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
}

/// Attach author and comment-author profiles, keeping the input order.
fn populate(state: &AppState, posts: Vec<StoredPost>) -> Result<Vec<PostView>, ServiceError> {
    let author_ids = posts.iter().flat_map(|post| {
        std::iter::once(post.owner_id.as_str())
            .chain(post.comments.iter().map(|c| c.user_id.as_str()))
    });
    let profiles: HashMap<String, UserProfile> = UserRepository::new(&state.db)
        .get_many(author_ids)?
        .iter()
        .map(|(id, user)| (id.clone(), UserProfile::from(user)))
        .collect();

    let views = posts
        .into_iter()
        .map(|post| PostView {
            user: profiles.get(&post.owner_id).cloned(),
            comments: post
                .comments
                .into_iter()
                .map(|comment| CommentView {
                    user: profiles.get(&comment.user_id).cloned(),
                    id: comment.id,
                    text: comment.text,
                    created_at: comment.created_at,
                })
                .collect(),
            id: post.id,
            text: post.text,
            img: post.img,
            likes: post.likes,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect();
    Ok(views)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::social::{engagement, graph};
    use crate::test_support::{seed_user, test_state};

    fn seed_post(state: &AppState, owner: &StoredUser, text: &str, age_secs: i64) -> StoredPost {
        let mut post = StoredPost::new(owner.id.as_str(), Some(text.to_string()), None);
        post.created_at = Utc::now() - Duration::seconds(age_secs);
        PostRepository::new(&state.db).create(&post).unwrap();
        post
    }

    fn texts(views: &[PostView]) -> Vec<&str> {
        views.iter().filter_map(|v| v.text.as_deref()).collect()
    }

    #[test]
    fn all_posts_newest_first_with_authors() {
        let (state, _dir) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        seed_post(&state, &alice, "old", 60);
        seed_post(&state, &bob, "new", 1);

        let views = all_posts(&state).unwrap();
        assert_eq!(texts(&views), vec!["new", "old"]);
        assert_eq!(views[0].user.as_ref().unwrap().username, "bob");
        assert_eq!(views[1].user.as_ref().unwrap().username, "alice");
    }

    #[test]
    fn empty_feed_is_empty_list() {
        let (state, _dir) = test_state();
        assert!(all_posts(&state).unwrap().is_empty());
    }

    #[test]
    fn following_feed_only_has_followed_authors() {
        let (state, _dir) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        let carol = seed_user(&state, "carol");
        seed_post(&state, &bob, "from bob", 10);
        seed_post(&state, &carol, "from carol", 5);
        graph::toggle_follow(&state, &alice.id, &bob.id).unwrap();

        assert_eq!(texts(&following_posts(&state, &alice.id).unwrap()), vec!["from bob"]);
    }

    #[test]
    fn liked_and_user_posts() {
        let (state, _dir) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        let liked = seed_post(&state, &bob, "liked", 10);
        seed_post(&state, &bob, "other", 5);
        engagement::toggle_like(&state, &alice.id, &liked.id).unwrap();

        assert_eq!(texts(&liked_posts(&state, &alice.id).unwrap()), vec!["liked"]);
        assert_eq!(
            texts(&user_posts(&state, "bob").unwrap()),
            vec!["other", "liked"]
        );
        assert!(user_posts(&state, "alice").unwrap().is_empty());

        assert!(matches!(
            user_posts(&state, "nobody"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            liked_posts(&state, "ghost"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
