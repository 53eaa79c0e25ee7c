//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::ApiError;
use crate::extractors::AppState;
use crate::handlers::{auth, users};

/// Create the complete API router. Unknown paths answer
/// `404 {"error": "Not Found"}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_router())
        .fallback(not_found)
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_router())
        .nest("/users", users_router())
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/check", get(auth::check))
        .route("/logout", post(auth::logout))
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(users::list_users)
                .post(users::create_user)
                .put(users::update_user_by_query)
                .delete(users::delete_user_by_query),
        )
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use rbac_core::config::AppConfig;
    use rbac_db::{MemoryUserStore, UserStore};
    use rbac_models::{NewUser, Permission, PermissionSet, Role, User};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        store: Arc<MemoryUserStore>,
    }

    impl TestApp {
        async fn new() -> Self {
            let store = Arc::new(MemoryUserStore::new());
            let mut config = AppConfig::default();
            config.auth.jwt_secret = "test-secret-key-at-least-32-bytes".to_string();
            let state = AppState::new(store.clone(), &config);
            Self { state, store }
        }

        fn app(&self) -> Router {
            router().with_state(self.state.clone())
        }

        async fn add_user(&self, username: &str, role: Role, permissions: &[Permission]) -> User {
            let id = self.store.next_id().await.unwrap();
            let hash = rbac_auth::hash_password("password123").unwrap();
            let new_user = NewUser::new(username, "password123")
                .with_role(role)
                .with_permissions(PermissionSet::from(permissions));
            self.store
                .insert(User::from_new(id, &new_user, hash))
                .await
                .unwrap()
        }

        async fn admin_token(&self) -> String {
            let admin = self.add_user("admin", Role::Admin, &Permission::ALL).await;
            self.state.jwt.create_token(&admin).unwrap()
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let body = match body {
                Some(value) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };
            self.app().oneshot(builder.body(body).unwrap()).await.unwrap()
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_returns_token() {
        let app = TestApp::new().await;
        app.add_user("alice", Role::Staff, &[Permission::CanReadUser]).await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "alice", "password": "password123"})),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("access_token="));
        assert!(cookie.ends_with("HttpOnly; Secure; SameSite=None; Path=/; Max-Age=1800"));

        let body = json_body(response).await;
        assert_eq!(body["token_type"], "bearer");
        assert!(cookie.contains(body["access_token"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_login_failure() {
        let app = TestApp::new().await;
        app.add_user("alice", Role::Staff, &[Permission::CanReadUser]).await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"username": "alice", "password": "nope"})),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Invalid username or password"})
        );
    }

    #[tokio::test]
    async fn test_login_malformed_body() {
        let app = TestApp::new().await;
        let response = app
            .send(Method::POST, "/api/v1/auth/login", None, Some(json!({"username": 5})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_check_with_cookie() {
        let app = TestApp::new().await;
        let user = app
            .add_user("carol", Role::Staff, &[Permission::CanReadUser, Permission::CanUpdateUser])
            .await;
        let token = app.state.jwt.create_token(&user).unwrap();

        let request = Request::builder()
            .uri("/api/v1/auth/check")
            .header(header::COOKIE, format!("access_token={}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "id": user.id,
                "username": "carol",
                "role": "Staff",
                "permissions": ["CanReadUser", "CanUpdateUser"]
            })
        );
    }

    #[tokio::test]
    async fn test_check_without_token() {
        let app = TestApp::new().await;
        let response = app.send(Method::GET, "/api/v1/auth/check", None, None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({"error": "No token provided"}));

        let response = app
            .send(Method::GET, "/api/v1/auth/check", Some("garbage"), None)
            .await;
        assert_eq!(json_body(response).await, json!({"error": "Invalid token"}));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = TestApp::new().await;
        let response = app.send(Method::POST, "/api/v1/auth/logout", None, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::SET_COOKIE).unwrap(),
            "access_token=; HttpOnly; Secure; SameSite=None; Path=/; Max-Age=0"
        );
        assert_eq!(
            json_body(response).await,
            json!({"message": "Logged out successfully"})
        );
    }

    #[tokio::test]
    async fn test_create_admin_without_permissions_gets_read_only() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/users",
                Some(&token),
                Some(json!({"username": "boss", "password": "password123", "role": "Admin"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user_id = json_body(response).await["userId"].as_i64().unwrap();

        let response = app
            .send(Method::GET, &format!("/api/v1/users/{}", user_id), Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let user = json_body(response).await;
        assert_eq!(user["role"], "Admin");
        assert_eq!(user["permissions"], json!(["CanReadUser"]));
    }

    #[tokio::test]
    async fn test_create_and_list_users() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/users",
                Some(&token),
                Some(json!({
                    "username": "newbie",
                    "password": "password123",
                    "name": "New Bie",
                    "email": "newbie@example.com"
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({"message": "User created successfully", "userId": 2})
        );

        let response = app.send(Method::GET, "/api/v1/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let users = json_body(response).await;
        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1]["username"], "newbie");
        assert_eq!(users[1]["role"], "Staff");
        assert_eq!(users[1]["permissions"], json!(["CanReadUser"]));
        assert!(users[1].get("password_hash").is_none());
        assert!(users[1].get("phone").is_none());
    }

    #[tokio::test]
    async fn test_get_single_user_both_ways() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;
        app.add_user("bob", Role::Staff, &[Permission::CanReadUser]).await;

        for uri in ["/api/v1/users?id=2", "/api/v1/users/2"] {
            let response = app.send(Method::GET, uri, Some(&token), None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["username"], "bob");
        }

        let response = app.send(Method::GET, "/api/v1/users/99", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "User not found"}));

        let response = app.send(Method::GET, "/api/v1/users?id=abc", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;
        app.add_user("bob", Role::Staff, &[Permission::CanReadUser]).await;

        let response = app
            .send(
                Method::PUT,
                "/api/v1/users?id=2",
                Some(&token),
                Some(json!({"id": 77, "name": "Robert", "password": "new-password"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "message": "User updated successfully",
                "updatedAttributes": {"name": "Robert", "password": "[FILTERED]"}
            })
        );

        let response = app
            .send(
                Method::PUT,
                "/api/v1/users/2",
                Some(&token),
                Some(json!({"email": "not-an-email"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({"error": "email is not a valid email address"})
        );
    }

    #[tokio::test]
    async fn test_update_without_id() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;
        let response = app
            .send(Method::PUT, "/api/v1/users", Some(&token), Some(json!({"name": "x"})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Missing user id"}));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;
        app.add_user("bob", Role::Staff, &[Permission::CanReadUser]).await;

        let response = app
            .send(Method::DELETE, "/api/v1/users?id=2", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": "User deleted successfully"})
        );

        let response = app.send(Method::DELETE, "/api/v1/users/2", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.send(Method::DELETE, "/api/v1/users/1", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_insufficient_permissions() {
        let app = TestApp::new().await;
        let staff = app.add_user("staff", Role::Staff, &[Permission::CanReadUser]).await;
        let token = app.state.jwt.create_token(&staff).unwrap();

        let response = app
            .send(
                Method::POST,
                "/api/v1/users",
                Some(&token),
                Some(json!({"username": "x1", "password": "password123"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Insufficient permissions"})
        );

        let response = app.send(Method::DELETE, "/api/v1/users/1", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_permission_changes_apply_immediately() {
        let app = TestApp::new().await;
        let mut staff = app.add_user("staff", Role::Staff, &[Permission::CanReadUser]).await;
        let token = app.state.jwt.create_token(&staff).unwrap();

        let response = app.send(Method::GET, "/api/v1/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        staff.permissions = PermissionSet::new();
        app.store.update(&staff).await.unwrap();
        let response = app.send(Method::GET, "/api/v1/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        app.store.delete(staff.id).await.unwrap();
        let response = app.send(Method::GET, "/api/v1/users", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = TestApp::new().await;
        let response = app.send(Method::GET, "/api/v1/nothing", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": "Not Found"}));
    }
}
