//! 会话状态：anonymous → authenticating → authenticated
//!
//! - login / register 成功进入 authenticated；失败回到发起前的阶段（未登录则仍为 anonymous）
//! - refresh 成功只替换 access_token，user 与 refresh_token 不动；失败只记录错误，
//!   由会话层确认仍是同一会话后派发 SessionCleared 回到 anonymous
//! - logout / SessionExpired 丢弃本地会话
//! - is_authenticated 在每次认证操作结束时由 access_token 是否存在决定

use serde::Serialize;

use super::collection::Status;
use super::thunk::{AsyncAction, Phase};
use crate::types::{AuthResponse, TokenRefreshResponse, User};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub status: Status,
    pub error: Option<String>,
}

/// 过期后展示给用户的提示
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Login(AsyncAction<AuthResponse>),
    Register(AsyncAction<AuthResponse>),
    Refresh(AsyncAction<TokenRefreshResponse>),
    /// 本地登出，总是成功
    Logout,
    /// 启动时从持久化存储恢复
    SessionRestored {
        access_token: Option<String>,
        refresh_token: Option<String>,
    },
    /// 适配器透明刷新得到的新访问令牌
    TokenRotated(String),
    /// 适配器透明刷新失败，会话不可恢复
    SessionExpired,
    /// 显式刷新失败后丢弃本地会话，保留错误信息
    SessionCleared,
    ClearError,
}

impl SessionState {
    fn settle_phase(&mut self) {
        self.is_authenticated = self.access_token.is_some();
        self.phase = if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        };
    }

    fn discard(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.settle_phase();
    }

    fn authenticate(&mut self, action: AsyncAction<AuthResponse>) {
        match action.phase {
            Phase::Pending => {
                self.phase = SessionPhase::Authenticating;
                self.status = Status::Loading;
                self.error = None;
            }
            Phase::Fulfilled(resp) => {
                self.status = Status::Idle;
                self.user = Some(resp.data);
                self.access_token = Some(resp.tokens.access_token);
                self.refresh_token = Some(resp.tokens.refresh_token);
                self.settle_phase();
            }
            Phase::Rejected { message } => {
                self.status = Status::Error;
                self.error = Some(message);
                self.settle_phase();
            }
        }
    }
}

pub fn reduce(state: &mut SessionState, action: AuthAction) {
    match action {
        AuthAction::Login(a) | AuthAction::Register(a) => state.authenticate(a),
        AuthAction::Refresh(a) => match a.phase {
            Phase::Pending => {
                state.status = Status::Loading;
                state.error = None;
            }
            Phase::Fulfilled(resp) => {
                state.status = Status::Idle;
                state.access_token = Some(resp.access_token);
                state.settle_phase();
            }
            Phase::Rejected { message } => {
                state.status = Status::Error;
                state.error = Some(message);
            }
        },
        AuthAction::Logout => {
            state.discard();
            state.status = Status::Idle;
            state.error = None;
        }
        AuthAction::SessionRestored {
            access_token,
            refresh_token,
        } => {
            state.access_token = access_token;
            state.refresh_token = refresh_token;
            state.settle_phase();
        }
        AuthAction::TokenRotated(token) => {
            state.access_token = Some(token);
            state.settle_phase();
        }
        AuthAction::SessionCleared => state.discard(),
        AuthAction::SessionExpired => {
            state.discard();
            state.status = Status::Error;
            state.error = Some(SESSION_EXPIRED.to_string());
        }
        AuthAction::ClearError => state.error = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::thunk::RequestId;
    use crate::types::TokenPair;

    fn auth_response() -> AuthResponse {
        AuthResponse {
            data: User {
                id: "u1".into(),
                email: "dev@example.com".into(),
                username: "dev".into(),
                full_name: None,
                created_at: "2024-05-01T10:00:00".into(),
                updated_at: None,
            },
            tokens: TokenPair {
                access_token: "a1".into(),
                refresh_token: "r1".into(),
            },
        }
    }

    #[test]
    fn test_login_lifecycle() {
        let mut state = SessionState::default();
        let id = RequestId::new();
        reduce(&mut state, AuthAction::Login(AsyncAction::pending(id)));
        assert_eq!(state.phase, SessionPhase::Authenticating);
        assert!(!state.is_authenticated);

        reduce(&mut state, AuthAction::Login(AsyncAction::fulfilled(id, auth_response())));
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert!(state.is_authenticated);
        assert_eq!(state.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn test_failed_login_returns_to_anonymous() {
        let mut state = SessionState::default();
        let id = RequestId::new();
        reduce(&mut state, AuthAction::Login(AsyncAction::pending(id)));
        reduce(&mut state, AuthAction::Login(AsyncAction::rejected(id, "Invalid email or password")));
        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_refresh_only_touches_access_token() {
        let mut state = SessionState::default();
        reduce(&mut state, AuthAction::Login(AsyncAction::fulfilled(RequestId::new(), auth_response())));
        reduce(
            &mut state,
            AuthAction::Refresh(AsyncAction::fulfilled(
                RequestId::new(),
                TokenRefreshResponse { access_token: "a2".into() },
            )),
        );
        assert_eq!(state.access_token.as_deref(), Some("a2"));
        assert_eq!(state.refresh_token.as_deref(), Some("r1"));
        assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    }

    #[test]
    fn test_refresh_failure_and_expiry_discard_session() {
        let mut state = SessionState::default();
        reduce(&mut state, AuthAction::Login(AsyncAction::fulfilled(RequestId::new(), auth_response())));
        reduce(&mut state, AuthAction::Refresh(AsyncAction::rejected(RequestId::new(), "Invalid or expired refresh token")));
        assert!(state.is_authenticated);
        reduce(&mut state, AuthAction::SessionCleared);
        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert!(state.user.is_none() && state.refresh_token.is_none());
        assert_eq!(state.error.as_deref(), Some("Invalid or expired refresh token"));

        reduce(&mut state, AuthAction::Login(AsyncAction::fulfilled(RequestId::new(), auth_response())));
        reduce(&mut state, AuthAction::SessionExpired);
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED));
    }

    #[test]
    fn test_logout_is_unconditional() {
        let mut state = SessionState::default();
        reduce(&mut state, AuthAction::Logout);
        assert_eq!(state, SessionState::default());
    }
}
