// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile lookup and profile updates.

use super::{non_empty, USER_NOT_FOUND};
use crate::auth::flow::{is_valid_email, INVALID_EMAIL, PASSWORD_TOO_SHORT};
use crate::auth::password::{self, is_long_enough};
use crate::error::ServiceError;
use crate::media::media_key_from_url;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::state::AppState;
use crate::storage::{ProfilePatch, StoreError, UserRepository};

/// Public profile of `username`.
pub fn get_profile(state: &AppState, username: &str) -> Result<UserProfile, ServiceError> {
    UserRepository::new(&state.db)
        .find_by_username(username)?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

/// Apply profile changes for `user_id`.
///
/// A password change needs both the current and the new password. New
/// profile or cover images are uploaded before anything is saved; the images
/// they replace are deleted from the media host afterwards, best-effort.
pub async fn update_profile(
    state: &AppState,
    user_id: &str,
    req: UpdateProfileRequest,
) -> Result<UserProfile, ServiceError> {
    let users = UserRepository::new(&state.db);
    let user = users
        .get(user_id)?
        .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

    let password_hash = match (non_empty(req.current_password), non_empty(req.new_password)) {
        (None, None) => None,
        (Some(current), Some(new)) => {
            if !password::verify_password(&current, &user.password_hash).await? {
                return Err(ServiceError::validation("Current password is incorrect!"));
            }
            if !is_long_enough(&new) {
                return Err(ServiceError::validation(PASSWORD_TOO_SHORT));
            }
            Some(password::hash_password(&new).await?)
        }
        _ => {
            return Err(ServiceError::validation(
                "Please provide both current password and new password!",
            ))
        }
    };

    let email = non_empty(req.email);
    if let Some(email) = email.as_deref() {
        if !is_valid_email(email) {
            return Err(ServiceError::validation(INVALID_EMAIL));
        }
    }

    let profile_img = match non_empty(req.profile_img) {
        Some(payload) => Some(state.media.upload(&payload).await?),
        None => None,
    };
    let cover_img = match non_empty(req.cover_img) {
        Some(payload) => match state.media.upload(&payload).await {
            Ok(url) => Some(url),
            Err(e) => {
                let uploaded = profile_img.as_deref().and_then(media_key_from_url);
                destroy_images(state, user_id, uploaded.into_iter().collect()).await;
                return Err(e.into());
            }
        },
        None => None,
    };

    let uploaded_images: Vec<String> = [profile_img.as_deref(), cover_img.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(media_key_from_url)
        .collect();
    let replaced_images: Vec<String> = [
        profile_img.as_ref().map(|_| user.profile_img.as_str()),
        cover_img.as_ref().map(|_| user.cover_img.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter_map(media_key_from_url)
    .collect();

    let patch = ProfilePatch {
        fullname: non_empty(req.fullname),
        username: non_empty(req.username),
        email,
        bio: non_empty(req.bio),
        link: non_empty(req.link),
        profile_img,
        cover_img,
        password_hash,
    };

    let updated = match users.apply_patch(user_id, patch) {
        Ok(user) => user,
        Err(e) => {
            destroy_images(state, user_id, uploaded_images).await;
            return Err(match e {
                StoreError::NotFound(_) => ServiceError::not_found(USER_NOT_FOUND),
                other => other.into(),
            });
        }
    };
    tracing::info!(user_id, "Profile updated");

    destroy_images(state, user_id, replaced_images).await;
    Ok(UserProfile::from(&updated))
}

/// Delete images from the media host, logging failures.
async fn destroy_images(state: &AppState, user_id: &str, keys: Vec<String>) {
    for key in keys {
        if let Err(e) = state.media.destroy(&key).await {
            tracing::warn!(user_id, key = %key, error = %e, "Failed to delete profile image");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::flow::signup;
    use crate::media::testing::RecordingMedia;
    use crate::models::SignupRequest;
    use crate::test_support::{seed_user, test_state, test_state_with_media};

    async fn signed_up(state: &AppState, username: &str) -> UserProfile {
        signup(
            state,
            SignupRequest {
                fullname: "Test User".into(),
                username: username.into(),
                email: format!("{username}@example.com"),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap()
        .profile
    }

    #[test]
    fn unknown_username_is_not_found() {
        let (state, _dir) = test_state();
        seed_user(&state, "alice");
        assert_eq!(get_profile(&state, "alice").unwrap().username, "alice");

        let err = get_profile(&state, "nobody").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn empty_fields_keep_current_values() {
        let (state, _dir) = test_state();
        let alice = seed_user(&state, "alice");

        let updated = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                fullname: Some(String::new()),
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.fullname, alice.fullname);
        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn password_change_rules() {
        let (state, _dir) = test_state();
        let alice = signed_up(&state, "alice").await;

        let only_current = UpdateProfileRequest {
            current_password: Some("secret1".into()),
            ..Default::default()
        };
        let err = update_profile(&state, &alice.id, only_current).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please provide both current password and new password!"
        );

        let wrong_current = UpdateProfileRequest {
            current_password: Some("nope!!".into()),
            new_password: Some("newsecret".into()),
            ..Default::default()
        };
        let err = update_profile(&state, &alice.id, wrong_current).await.unwrap_err();
        assert_eq!(err.to_string(), "Current password is incorrect!");

        let too_short = UpdateProfileRequest {
            current_password: Some("secret1".into()),
            new_password: Some("abc".into()),
            ..Default::default()
        };
        let err = update_profile(&state, &alice.id, too_short).await.unwrap_err();
        assert_eq!(err.to_string(), PASSWORD_TOO_SHORT);

        let ok = UpdateProfileRequest {
            current_password: Some("secret1".into()),
            new_password: Some("newsecret".into()),
            ..Default::default()
        };
        update_profile(&state, &alice.id, ok).await.unwrap();

        let stored = UserRepository::new(&state.db).get(&alice.id).unwrap().unwrap();
        assert!(password::verify_password("newsecret", &stored.password_hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn username_and_email_stay_unique() {
        let (state, _dir) = test_state();
        let alice = seed_user(&state, "alice");
        seed_user(&state, "bob");

        let err = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                username: Some("bob".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Username is already taken!");

        let err = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), INVALID_EMAIL);
    }

    #[tokio::test]
    async fn rejected_update_removes_fresh_uploads() {
        let media = Arc::new(RecordingMedia::default());
        let (state, _dir) = test_state_with_media(media.clone());
        let alice = seed_user(&state, "alice");
        seed_user(&state, "bob");

        let err = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                username: Some("bob".into()),
                profile_img: Some("data:image/png;base64,AAAA".into()),
                cover_img: Some("data:image/png;base64,BBBB".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Username is already taken!");

        assert_eq!(media.uploads.lock().unwrap().len(), 2);
        assert_eq!(
            media.destroyed_keys(),
            vec!["img1".to_string(), "img2".to_string()]
        );
        let stored = UserRepository::new(&state.db).get(&alice.id).unwrap().unwrap();
        assert!(stored.profile_img.is_empty());
        assert!(stored.cover_img.is_empty());
    }

    #[tokio::test]
    async fn new_profile_image_replaces_old_one() {
        let media = Arc::new(RecordingMedia::default());
        let (state, _dir) = test_state_with_media(media.clone());
        let alice = seed_user(&state, "alice");

        let first = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                profile_img: Some("data:image/png;base64,AAAA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(first.profile_img, "https://media.test/image/upload/v1/img1.png");
        assert!(media.destroyed_keys().is_empty());

        let second = update_profile(
            &state,
            &alice.id,
            UpdateProfileRequest {
                profile_img: Some("data:image/png;base64,BBBB".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(second.profile_img, "https://media.test/image/upload/v1/img2.png");
        assert_eq!(media.destroyed_keys(), vec!["img1".to_string()]);
    }
}
