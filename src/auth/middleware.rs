// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Guarded routes are wrapped with:
//!
//! ```rust,ignore
//! get(handler).route_layer(axum::middleware::from_fn_with_state(
//!     state.clone(),
//!     require_auth,
//! ))
//! ```
//!
//! The resolved [`CurrentUser`] is stored in the request extensions, where the
//! [`super::Auth`] extractor picks it up.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extractor::authenticate, CurrentUser};
use crate::state::AppState;

/// Reject the request unless it carries a valid session cookie.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user: CurrentUser = match authenticate(&state, request.headers()) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Request rejected by access guard");
            return e.into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Auth;
    use crate::test_support::{seed_user, test_state};
    use axum::{
        body::Body,
        http::{header::COOKIE, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn whoami(Auth(user): Auth) -> String {
        user.profile.username
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(whoami).route_layer(from_fn_with_state(state.clone(), require_auth)),
            )
            .with_state(state)
    }

    #[tokio::test]
    async fn guard_rejects_missing_cookie() {
        let (state, _dir) = test_state();
        let response = app(state)
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn guard_passes_identity_to_handler() {
        let (state, _dir) = test_state();
        let user = seed_user(&state, "carol");
        let token = state.tokens.issue(&user.id).unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(COOKIE, format!("token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"carol");
    }
}
