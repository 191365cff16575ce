// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP API.
//!
//! Every application route lives under `/api`. Routes marked as guarded run
//! [`require_auth`] first, which rejects requests without a valid session
//! cookie.
//!
//! Note: `/api/users/me` and `/api/users/suggested` are static routes, so
//! `GET /api/users/{username}` cannot reach users literally named `me` or
//! `suggested`.

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    error::ApiError,
    models::{
        CommentRequest, CommentView, CreatePostRequest, LikesResponse, LoginRequest,
        MessageResponse, NotificationListResponse, NotificationSender, NotificationView,
        PostListResponse, PostResponse, PostView, ProfileListResponse, ProfileResponse,
        SignupRequest, UpdateProfileRequest, UserProfile,
    },
    state::AppState,
    storage::NotificationKind,
};

pub mod auth;
pub mod body;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod users;

pub fn router(state: AppState) -> Router {
    let guarded = |route: MethodRouter<AppState>| {
        route.route_layer(from_fn_with_state(state.clone(), require_auth))
    };

    let api_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", guarded(get(auth::me)))
        .route(
            "/posts",
            get(posts::all_posts).merge(guarded(post(posts::create_post))),
        )
        .route("/posts/following", guarded(get(posts::following_posts)))
        .route("/posts/likes/{id}", guarded(get(posts::liked_posts)))
        .route("/posts/user/{username}", guarded(get(posts::user_posts)))
        .route("/posts/{id}", guarded(delete(posts::delete_post)))
        .route("/posts/{id}/like", guarded(post(posts::like_post)))
        .route("/posts/{id}/comment", guarded(post(posts::comment_on_post)))
        .route("/users/suggested", guarded(get(users::suggested_users)))
        .route("/users/me", guarded(patch(users::update_profile)))
        .route("/users/follow/{id}", guarded(post(users::follow_user)))
        .route("/users/{username}", get(users::get_profile))
        .route(
            "/notifications",
            guarded(
                get(notifications::list_notifications)
                    .delete(notifications::delete_notifications),
            ),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .fallback(route_not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found!")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        posts::all_posts,
        posts::following_posts,
        posts::liked_posts,
        posts::user_posts,
        posts::create_post,
        posts::like_post,
        posts::comment_on_post,
        posts::delete_post,
        users::get_profile,
        users::suggested_users,
        users::follow_user,
        users::update_profile,
        notifications::list_notifications,
        notifications::delete_notifications,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            UserProfile,
            NotificationSender,
            NotificationKind,
            CommentView,
            PostView,
            NotificationView,
            SignupRequest,
            LoginRequest,
            CreatePostRequest,
            CommentRequest,
            UpdateProfileRequest,
            MessageResponse,
            ProfileResponse,
            ProfileListResponse,
            PostResponse,
            PostListResponse,
            LikesResponse,
            NotificationListResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and session"),
        (name = "Posts", description = "Posts, likes and comments"),
        (name = "Users", description = "Profiles and the follow graph"),
        (name = "Notifications", description = "Follow and like notifications"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::{
        body::to_bytes,
        http::{
            header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
            HeaderMap, Method, StatusCode,
        },
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestResponse {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    }

    impl TestResponse {
        /// Session token from the `Set-Cookie` header.
        fn session_token(&self) -> Option<String> {
            let cookie = self.headers.get(SET_COOKIE)?.to_str().ok()?;
            let value = cookie.strip_prefix("token=")?.split(';').next()?;
            (!value.is_empty()).then(|| value.to_string())
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("token={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn signup(app: &Router, username: &str) -> (String, String) {
        let response = send(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "fullname": format!("{username} tester"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "secret1",
            })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let token = response.session_token().unwrap();
        let id = response.body["data"]["_id"].as_str().unwrap().to_string();
        (id, token)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn signup_login_scenario() {
        let (state, _dir) = test_state();
        let app = router(state);
        let credentials = json!({
            "fullname": "Alice",
            "username": "alice",
            "email": "a@b.co",
            "password": "secret1",
        });

        let created = send(&app, Method::POST, "/api/auth/signup", None, Some(credentials.clone())).await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["status"], true);
        assert_eq!(created.body["message"], "Signed up successfully!");
        assert_eq!(created.body["data"]["username"], "alice");
        assert!(created.body["data"].get("password").is_none());
        assert!(created.body["data"].get("password_hash").is_none());
        assert!(created.session_token().is_some());

        let duplicate = send(&app, Method::POST, "/api/auth/signup", None, Some(credentials)).await;
        assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.body["status"], false);
        assert!(duplicate.body["error"]
            .as_str()
            .unwrap()
            .contains("already taken"));

        let wrong = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "alice", "password": "wrong!!"})),
        )
        .await;
        assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong.body["error"], "Invalid username or password!");
        assert!(wrong.session_token().is_none());

        let ok = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "alice", "password": "secret1"})),
        )
        .await;
        assert_eq!(ok.status, StatusCode::OK);
        assert_eq!(ok.body["message"], "Logged in successfully!");
        let token = ok.session_token().unwrap();

        let me = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.body["data"]["username"], "alice");
    }

    #[tokio::test]
    async fn guard_rejections() {
        let (state, _dir) = test_state();
        let app = router(state);

        let missing = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.body["error"], "Unauthenticated user!");

        let forged = send(&app, Method::GET, "/api/auth/me", Some("forged"), None).await;
        assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
        assert_eq!(forged.body["error"], "Unauthorised: Invalid Token!");

        // Reading the feed is public, posting is not
        let feed = send(&app, Method::GET, "/api/posts", None, None).await;
        assert_eq!(feed.status, StatusCode::OK);
        assert_eq!(feed.body["data"], json!([]));

        let create = send(&app, Method::POST, "/api/posts", None, Some(json!({"text": "hi"}))).await;
        assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = send(&app, Method::POST, "/api/auth/logout", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["message"], "Logged out successfully!");
        assert!(response.body["data"].is_null());
        let cookie = response.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn social_flow_end_to_end() {
        let (state, _dir) = test_state();
        let app = router(state);
        let (alice_id, alice) = signup(&app, "alice").await;
        let (bob_id, bob) = signup(&app, "bob").await;

        // Bob follows Alice
        let follow = send(&app, Method::POST, &format!("/api/users/follow/{alice_id}"), Some(&bob), None).await;
        assert_eq!(follow.status, StatusCode::OK);
        assert_eq!(follow.body["message"], "User followed successfully!");

        // Alice posts, Bob sees it in his following feed
        let created = send(&app, Method::POST, "/api/posts", Some(&alice), Some(json!({"text": "hello"}))).await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(created.body["message"], "Post created successfully!");
        let post_id = created.body["data"]["_id"].as_str().unwrap().to_string();

        let feed = send(&app, Method::GET, "/api/posts/following", Some(&bob), None).await;
        assert_eq!(feed.body["data"][0]["_id"], post_id.as_str());
        assert_eq!(feed.body["data"][0]["user"]["username"], "alice");

        // Bob likes and comments
        let like = send(&app, Method::POST, &format!("/api/posts/{post_id}/like"), Some(&bob), None).await;
        assert_eq!(like.body["message"], "Post liked successfully!");
        assert_eq!(like.body["data"], json!([bob_id]));

        let comment = send(
            &app,
            Method::POST,
            &format!("/api/posts/{post_id}/comment"),
            Some(&bob),
            Some(json!({"text": "nice"})),
        )
        .await;
        assert_eq!(comment.body["data"]["comments"][0]["text"], "nice");
        assert_eq!(comment.body["data"]["comments"][0]["user"]["username"], "bob");

        // Alice has a follow and a like notification, newest first
        let inbox = send(&app, Method::GET, "/api/notifications", Some(&alice), None).await;
        assert_eq!(inbox.status, StatusCode::OK);
        let items = inbox.body["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "like");
        assert_eq!(items[1]["type"], "follow");
        assert_eq!(items[0]["from"]["username"], "bob");

        // Bob cannot delete Alice's post
        let denied = send(&app, Method::DELETE, &format!("/api/posts/{post_id}"), Some(&bob), None).await;
        assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
        assert_eq!(denied.body["error"], "You are not authorized to delete this post!");

        let deleted = send(&app, Method::DELETE, &format!("/api/posts/{post_id}"), Some(&alice), None).await;
        assert_eq!(deleted.status, StatusCode::OK);
        assert_eq!(deleted.body["message"], "Post deleted successfully!");

        let liked = send(&app, Method::GET, &format!("/api/posts/likes/{bob_id}"), Some(&bob), None).await;
        assert_eq!(liked.body["data"], json!([]));

        let cleared = send(&app, Method::DELETE, "/api/notifications", Some(&alice), None).await;
        assert_eq!(cleared.body["message"], "Notifications deleted successfully!");
    }

    #[tokio::test]
    async fn profile_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        let (_, alice) = signup(&app, "alice").await;

        let profile = send(&app, Method::GET, "/api/users/alice", None, None).await;
        assert_eq!(profile.status, StatusCode::OK);
        assert_eq!(profile.body["data"]["username"], "alice");

        let missing = send(&app, Method::GET, "/api/users/nobody", None, None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body["error"], "User not found");

        let updated = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&alice),
            Some(json!({"bio": "hi there", "newPassword": "abcdefg"})),
        )
        .await;
        assert_eq!(updated.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            updated.body["error"],
            "Please provide both current password and new password!"
        );

        let updated = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&alice),
            Some(json!({"bio": "hi there"})),
        )
        .await;
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(updated.body["message"], "User profile updated successfully!");
        assert_eq!(updated.body["data"]["bio"], "hi there");
    }

    #[tokio::test]
    async fn unreadable_bodies_get_the_failure_envelope() {
        let (state, _dir) = test_state();
        let app = router(state);

        let empty = send(&app, Method::POST, "/api/auth/signup", None, None).await;
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);
        assert_eq!(empty.body, json!({"status": false, "error": "Fields are mandatory!"}));

        let null_field = send(
            &app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "fullname": "Alice",
                "username": null,
                "email": "a@b.co",
                "password": "secret1",
            })),
        )
        .await;
        assert_eq!(null_field.status, StatusCode::BAD_REQUEST);
        assert_eq!(null_field.body["error"], "Fields are mandatory!");

        let malformed = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/login")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{bad"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(malformed.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));

        let (_, token) = signup(&app, "alice").await;
        let created = send(&app, Method::POST, "/api/posts", Some(&token), Some(json!({"text": "hi"}))).await;
        let post_id = created.body["data"]["_id"].as_str().unwrap().to_string();
        let comment = send(
            &app,
            Method::POST,
            &format!("/api/posts/{post_id}/comment"),
            Some(&token),
            Some(json!({"text": null})),
        )
        .await;
        assert_eq!(comment.status, StatusCode::BAD_REQUEST);
        assert_eq!(comment.body["error"], "Text field is required!");

        let no_post_body = send(&app, Method::POST, "/api/posts", Some(&token), None).await;
        assert_eq!(no_post_body.status, StatusCode::BAD_REQUEST);
        assert_eq!(no_post_body.body["error"], "Post must have text or image!");
    }

    #[tokio::test]
    async fn unknown_routes_get_the_failure_envelope() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = send(&app, Method::GET, "/api/nothing/here", None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, json!({"status": false, "error": "Route not found!"}));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _dir) = test_state();
        let app = router(state);
        let response = send(&app, Method::GET, "/health/live", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.headers.contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_api_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/auth/signup"));
        assert!(doc.paths.paths.contains_key("/api/posts/{id}/like"));
        assert!(doc.paths.paths.contains_key("/api/notifications"));
    }
}
