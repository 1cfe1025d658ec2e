//! 会话管理：登录 / 注册 / 刷新 / 登出 / 启动时恢复
//!
//! 令牌只在操作成功后写入存储；refresh 失败时清空存储并回到 anonymous。
//! 迟到的 refresh 结果按会话代数丢弃。
//! logout 只清本地状态，不通知服务端，也不会失败。

use std::sync::Arc;

use super::vault::TokenVault;
use crate::api::client::SESSION_ENDED;
use crate::api::{ApiError, ErrorKind};
use crate::services::{AuthService, LoginRequest, RegisterRequest};
use crate::store::{Action, AuthAction, Operation, Store};
use crate::types::{AuthResponse, TokenRefreshResponse};

const LOGIN: Operation<AuthResponse> = Operation {
    name: "auth/login",
    fallback: "Login failed",
    wrap: |a| Action::Auth(AuthAction::Login(a)),
};

const REGISTER: Operation<AuthResponse> = Operation {
    name: "auth/register",
    fallback: "Registration failed",
    wrap: |a| Action::Auth(AuthAction::Register(a)),
};

const REFRESH: Operation<TokenRefreshResponse> = Operation {
    name: "auth/refreshToken",
    fallback: "Token refresh failed",
    wrap: |a| Action::Auth(AuthAction::Refresh(a)),
};

#[derive(Clone)]
pub struct SessionManager {
    store: Store,
    vault: Arc<TokenVault>,
    auth: AuthService,
}

impl SessionManager {
    pub fn new(store: Store, vault: Arc<TokenVault>, auth: AuthService) -> Self {
        Self { store, vault, auth }
    }

    /// 读取持久化令牌并恢复会话；返回是否已认证
    pub fn check_session(&self) -> bool {
        let tokens = self.vault.restore();
        let authenticated = tokens.access_token.is_some();
        tracing::info!(authenticated, "session restored from storage");
        self.store.dispatch(Action::Auth(AuthAction::SessionRestored {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }));
        authenticated
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<AuthResponse, ApiError> {
        LOGIN
            .run(&self.store, async {
                let resp = self.auth.login(&credentials).await?;
                self.vault.persist_pair(&resp.tokens);
                Ok(resp)
            })
            .await
    }

    pub async fn register(&self, data: RegisterRequest) -> Result<AuthResponse, ApiError> {
        REGISTER
            .run(&self.store, async {
                let resp = self.auth.register(&data).await?;
                self.vault.persist_pair(&resp.tokens);
                Ok(resp)
            })
            .await
    }

    /// 用保存的刷新令牌换取新访问令牌
    ///
    /// 刷新期间若已登出或重新登录，结果作废，也不会清掉新的会话。
    pub async fn refresh(&self) -> Result<TokenRefreshResponse, ApiError> {
        let generation = self.vault.generation();
        let result = REFRESH
            .run(&self.store, async {
                let refresh_token = self.vault.tokens().refresh_token.ok_or_else(|| {
                    ApiError::new(ErrorKind::Unauthorized, "No refresh token available")
                })?;
                let resp = self.auth.refresh(&refresh_token).await?;
                if !self.vault.persist_access(generation, &resp.access_token) {
                    return Err(ApiError::new(ErrorKind::Unauthorized, SESSION_ENDED));
                }
                Ok(resp)
            })
            .await;

        if result.is_err() && self.vault.clear_if(generation) {
            self.store.dispatch(Action::Auth(AuthAction::SessionCleared));
        }
        result
    }

    pub fn logout(&self) {
        tracing::info!("logging out");
        self.vault.clear();
        self.store.dispatch(Action::Auth(AuthAction::Logout));
    }

    pub fn clear_error(&self) {
        self.store.dispatch(Action::Auth(AuthAction::ClearError));
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.select(|s| s.auth.is_authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, MockRoute, MockTransport};
    use crate::session::storage::{MemoryTokenStore, StoredTokens, TokenStore};
    use crate::store::SessionPhase;
    use serde_json::json;

    struct Harness {
        store: Store,
        storage: Arc<MemoryTokenStore>,
        transport: Arc<MockTransport>,
        session: SessionManager,
    }

    fn harness(initial: StoredTokens) -> Harness {
        let store = Store::new();
        let storage = Arc::new(MemoryTokenStore::with_tokens(initial));
        let transport = Arc::new(MockTransport::new());
        let vault = Arc::new(TokenVault::new(storage.clone(), store.clone()));
        let client = ApiClient::new(transport.clone()).with_credentials(vault.clone());
        let session = SessionManager::new(store.clone(), vault, AuthService::new(client));
        Harness {
            store,
            storage,
            transport,
            session,
        }
    }

    fn auth_body() -> serde_json::Value {
        json!({
            "data": {
                "id": "u1",
                "email": "dev@example.com",
                "username": "dev",
                "created_at": "2024-05-01T10:00:00"
            },
            "tokens": { "access_token": "a1", "refresh_token": "r1" }
        })
    }

    #[tokio::test]
    async fn test_login_persists_tokens() {
        let h = harness(StoredTokens::default());
        h.transport.push(MockRoute::post("/auth/login").reply(200, auth_body())).await;

        let resp = h.session.login(LoginRequest::new("dev@example.com", "pw")).await.unwrap();
        assert_eq!(resp.data.username, "dev");

        let stored = h.storage.snapshot();
        assert_eq!(stored.access_token.as_deref(), Some("a1"));
        assert_eq!(stored.refresh_token.as_deref(), Some("r1"));
        assert_eq!(h.store.state().auth.phase, SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_failed_login_writes_nothing() {
        let h = harness(StoredTokens::default());
        h.transport
            .push(MockRoute::post("/auth/login").reply(
                401,
                json!({"error": {"message": "Invalid email or password", "code": "INVALID_CREDENTIALS"}}),
            ))
            .await;

        let err = h.session.login(LoginRequest::new("dev@example.com", "bad")).await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("INVALID_CREDENTIALS"));
        assert!(h.storage.snapshot().is_empty());

        let auth = h.store.state().auth;
        assert_eq!(auth.phase, SessionPhase::Anonymous);
        assert_eq!(auth.error.as_deref(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_check_session_restores_from_storage() {
        let h = harness(StoredTokens {
            access_token: Some("a0".into()),
            refresh_token: Some("r0".into()),
        });
        assert!(h.session.check_session());
        assert!(h.session.is_authenticated());
        assert_eq!(h.store.state().auth.refresh_token.as_deref(), Some("r0"));
    }

    #[tokio::test]
    async fn test_refresh_updates_access_only() {
        let h = harness(StoredTokens {
            access_token: Some("a0".into()),
            refresh_token: Some("r0".into()),
        });
        h.session.check_session();
        h.transport
            .push(MockRoute::post("/auth/refresh").reply(200, json!({"access_token": "a2"})))
            .await;

        h.session.refresh().await.unwrap();
        let stored = h.storage.load().unwrap();
        assert_eq!(stored.access_token.as_deref(), Some("a2"));
        assert_eq!(stored.refresh_token.as_deref(), Some("r0"));

        let requests = h.transport.requests().await;
        assert_eq!(requests[0].body, Some(json!({"refresh_token": "r0"})));
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_session() {
        let h = harness(StoredTokens {
            access_token: Some("a0".into()),
            refresh_token: Some("r0".into()),
        });
        h.session.check_session();
        h.transport
            .push(MockRoute::post("/auth/refresh").reply(
                401,
                json!({"error": {"message": "Invalid or expired refresh token"}}),
            ))
            .await;

        assert!(h.session.refresh().await.is_err());
        assert!(h.storage.snapshot().is_empty());
        let auth = h.store.state().auth;
        assert!(!auth.is_authenticated);
        assert_eq!(auth.error.as_deref(), Some("Invalid or expired refresh token"));
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_rejected_locally() {
        let h = harness(StoredTokens::default());
        let err = h.session.refresh().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(h.transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_storage_and_state() {
        let h = harness(StoredTokens::default());
        h.transport.push(MockRoute::post("/auth/login").reply(200, auth_body())).await;
        h.session.login(LoginRequest::new("dev@example.com", "pw")).await.unwrap();

        h.session.logout();
        assert!(h.storage.snapshot().is_empty());
        let auth = h.store.state().auth;
        assert!(!auth.is_authenticated);
        assert!(auth.access_token.is_none() && auth.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_register_persists_tokens() {
        let h = harness(StoredTokens::default());
        h.transport.push(MockRoute::post("/auth/register").reply(201, auth_body())).await;

        let resp = h
            .session
            .register(RegisterRequest {
                email: "dev@example.com".into(),
                password: "pw".into(),
                username: "dev".into(),
                full_name: None,
            })
            .await
            .unwrap();
        assert_eq!(resp.data.id, "u1");

        let requests = h.transport.requests().await;
        assert_eq!(
            requests[0].body,
            Some(json!({"email": "dev@example.com", "password": "pw", "username": "dev"}))
        );
        assert_eq!(h.storage.snapshot().refresh_token.as_deref(), Some("r1"));
        assert!(h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_register_uses_fallback_message() {
        let h = harness(StoredTokens::default());
        h.transport
            .push(MockRoute::post("/auth/register").reply(409, json!({"error": {"message": ""}})))
            .await;

        let data = RegisterRequest {
            email: "dev@example.com".into(),
            password: "pw".into(),
            username: "dev".into(),
            full_name: Some("Dev".into()),
        };
        assert!(h.session.register(data).await.is_err());
        assert!(h.storage.snapshot().is_empty());
        assert_eq!(h.store.state().auth.error.as_deref(), Some("Registration failed"));
    }

    #[tokio::test]
    async fn test_refresh_finishing_after_logout_is_dropped() {
        let h = harness(StoredTokens {
            access_token: Some("a0".into()),
            refresh_token: Some("r0".into()),
        });
        h.session.check_session();
        let (route, gate) = MockRoute::post("/auth/refresh")
            .reply(200, json!({"access_token": "a2"}))
            .gated();
        h.transport.push(route).await;

        let refresh = h.session.refresh();
        let logout = async {
            while h.transport.requests().await.is_empty() {
                tokio::task::yield_now().await;
            }
            h.session.logout();
            gate.release();
        };
        let (result, ()) = tokio::join!(refresh, logout);

        assert!(result.is_err());
        assert!(h.storage.snapshot().is_empty());
        let auth = h.store.state().auth;
        assert!(!auth.is_authenticated);
        assert!(auth.access_token.is_none());
    }

    #[tokio::test]
    async fn test_stale_refresh_failure_keeps_new_login() {
        let h = harness(StoredTokens {
            access_token: Some("a0".into()),
            refresh_token: Some("r0".into()),
        });
        h.session.check_session();
        let (route, gate) = MockRoute::post("/auth/refresh")
            .reply(401, json!({"error": {"message": "Invalid or expired refresh token"}}))
            .gated();
        h.transport.push(route).await;
        h.transport.push(MockRoute::post("/auth/login").reply(200, auth_body())).await;

        let refresh = h.session.refresh();
        let relogin = async {
            while h.transport.requests().await.is_empty() {
                tokio::task::yield_now().await;
            }
            h.session.logout();
            h.session.login(LoginRequest::new("dev@example.com", "pw")).await.unwrap();
            gate.release();
        };
        let (result, ()) = tokio::join!(refresh, relogin);

        assert!(result.is_err());
        assert_eq!(h.storage.snapshot().access_token.as_deref(), Some("a1"));
        let auth = h.store.state().auth;
        assert!(auth.is_authenticated);
        assert_eq!(auth.refresh_token.as_deref(), Some("r1"));
    }
}
