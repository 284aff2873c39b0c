//! Subscription gate.
//!
//! Second guard stage stacked on entitlement-gated routes. It relies on the
//! session guard having resolved a user; without one the request goes to
//! sign-in, with one but no active subscription it goes to the gate's
//! fallback page. The two outcomes stay distinct on purpose.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::state::{MEMBERS_PATH, SIGN_IN_PATH};
use crate::provider::{Provider, SessionUser};

/// Provider table holding subscription rows.
pub(crate) const SUBSCRIPTION_TABLE: &str = "subscriptions";

pub struct SubscriptionGate {
    provider: Arc<dyn Provider>,
    fallback_path: String,
}

impl SubscriptionGate {
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            fallback_path: MEMBERS_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_fallback_path(mut self, path: String) -> Self {
        self.fallback_path = path;
        self
    }
}

pub async fn require_subscription(
    State(gate): State<Arc<SubscriptionGate>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<SessionUser>().cloned() else {
        return Redirect::to(SIGN_IN_PATH).into_response();
    };

    if !is_subscribed(&gate, &user).await {
        debug!("No active subscription for {}", user.id);
        return Redirect::to(&gate.fallback_path).into_response();
    }

    next.run(request).await
}

async fn is_subscribed(gate: &SubscriptionGate, user: &SessionUser) -> bool {
    let user_id = user.id.to_string();
    match gate
        .provider
        .query_one(
            SUBSCRIPTION_TABLE,
            &[("user_id", &user_id), ("status", "active")],
        )
        .await
    {
        Ok(record) => record.is_some(),
        Err(err) => {
            // Fail closed: an unreadable subscription is no subscription.
            error!("Subscription lookup failed: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::test_support::mock_provider;
    use crate::provider::ProviderError;
    use axum::http::header::LOCATION;
    use axum::http::StatusCode;
    use axum::{extract::Extension, middleware, routing::get, Router};
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn user() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "jean@exemple.com".to_string(),
        }
    }

    fn gated_app(gate: SubscriptionGate, session: Option<SessionUser>) -> Router {
        let mut app = Router::new()
            .route("/gated", get(|| async { "contenu" }))
            .layer(middleware::from_fn_with_state(
                Arc::new(gate),
                require_subscription,
            ));
        if let Some(user) = session {
            // Outermost layer, so the gate sees the session extension.
            app = app.layer(Extension(user));
        }
        app
    }

    async fn get_gated(app: Router) -> axum::response::Response {
        app.oneshot(
            axum::http::Request::builder()
                .uri("/gated")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
    }

    fn location(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn missing_session_goes_to_sign_in() {
        let mock = mock_provider();
        let response = get_gated(gated_app(SubscriptionGate::new(mock), None)).await;
        assert_eq!(location(&response), SIGN_IN_PATH);
    }

    #[tokio::test]
    async fn active_subscription_passes_through() {
        let mock = mock_provider();
        *mock.subscription.lock().expect("lock") = Some(json!({ "status": "active" }));
        let response = get_gated(gated_app(SubscriptionGate::new(mock), Some(user()))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_subscription_goes_to_fallback() {
        let mock = mock_provider();
        let response = get_gated(gated_app(SubscriptionGate::new(mock), Some(user()))).await;
        assert_eq!(location(&response), MEMBERS_PATH);
    }

    #[tokio::test]
    async fn lookup_errors_fail_closed() {
        let mock = mock_provider();
        *mock.query_error.lock().expect("lock") =
            Some(ProviderError::fault("connection refused"));
        let response = get_gated(gated_app(SubscriptionGate::new(mock), Some(user()))).await;
        assert_eq!(location(&response), MEMBERS_PATH);
    }

    #[tokio::test]
    async fn custom_fallback_is_honoured() {
        let mock = mock_provider();
        let gate = SubscriptionGate::new(mock).with_fallback_path("/tarifs".to_string());
        let response = get_gated(gated_app(gate, Some(user()))).await;
        assert_eq!(location(&response), "/tarifs");
    }
}
