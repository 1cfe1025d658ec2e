//! 令牌保管：内存缓存 + 持久存储 + 会话信号
//!
//! 持久存储只在 restore（会话检查）时读取，之后适配器从内存缓存取令牌；
//! 写操作同时落盘。适配器透明刷新的结果与会话过期经此派发到 auth Store。
//!
//! 每次更换或丢弃令牌对都会递增会话代数。刷新结果只有在代数未变时才会写入，
//! 所以登出后才完成的刷新不会把会话带回来。

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use super::storage::{StoredTokens, TokenStore};
use crate::api::CredentialSource;
use crate::store::{Action, AuthAction, Store};
use crate::types::TokenPair;

#[derive(Debug, Default)]
struct Session {
    tokens: StoredTokens,
    generation: u64,
}

pub struct TokenVault {
    storage: Arc<dyn TokenStore>,
    session: RwLock<Session>,
    store: Store,
}

impl TokenVault {
    pub fn new(storage: Arc<dyn TokenStore>, store: Store) -> Self {
        Self {
            storage,
            session: RwLock::new(Session::default()),
            store,
        }
    }

    /// 从持久存储载入缓存；读失败按无会话处理
    pub fn restore(&self) -> StoredTokens {
        let tokens = self.storage.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load stored session ({}), starting anonymous", e);
            StoredTokens::default()
        });
        self.replace(tokens.clone());
        tokens
    }

    pub fn tokens(&self) -> StoredTokens {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .tokens
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.session.read().unwrap_or_else(|e| e.into_inner()).generation
    }

    /// 登录 / 注册成功：换上新的令牌对
    pub fn persist_pair(&self, pair: &TokenPair) {
        let mut session = self.lock();
        session.tokens = StoredTokens::from(pair);
        session.generation += 1;
        if let Err(e) = self.storage.save_pair(pair) {
            tracing::warn!("Failed to persist session tokens: {}", e);
        }
    }

    /// 刷新成功：只替换访问令牌；会话代数已变时丢弃并返回 false
    pub fn persist_access(&self, generation: u64, access_token: &str) -> bool {
        let mut session = self.lock();
        if session.generation != generation {
            tracing::info!("dropping access token from a session that already ended");
            return false;
        }
        session.tokens.access_token = Some(access_token.to_string());
        if let Err(e) = self.storage.save_access(access_token) {
            tracing::warn!("Failed to persist access token: {}", e);
        }
        true
    }

    /// 清空缓存与持久存储；不会失败
    pub fn clear(&self) {
        let mut session = self.lock();
        self.discard(&mut session);
    }

    /// 仅当会话代数未变时清空；返回是否清空
    pub fn clear_if(&self, generation: u64) -> bool {
        let mut session = self.lock();
        if session.generation != generation {
            return false;
        }
        self.discard(&mut session);
        true
    }

    fn discard(&self, session: &mut Session) {
        session.tokens = StoredTokens::default();
        session.generation += 1;
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
    }

    fn replace(&self, tokens: StoredTokens) {
        let mut session = self.lock();
        session.tokens = tokens;
        session.generation += 1;
    }

    fn lock(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialSource for TokenVault {
    fn access_token(&self) -> Option<String> {
        self.tokens().access_token
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens().refresh_token
    }

    fn generation(&self) -> u64 {
        TokenVault::generation(self)
    }

    fn on_token_refreshed(&self, generation: u64, access_token: &str) -> bool {
        if !self.persist_access(generation, access_token) {
            return false;
        }
        self.store
            .dispatch(Action::Auth(AuthAction::TokenRotated(access_token.to_string())));
        true
    }

    fn on_session_expired(&self, generation: u64) {
        if self.clear_if(generation) {
            tracing::info!("session expired, switching to anonymous");
            self.store.dispatch(Action::Auth(AuthAction::SessionExpired));
        }
    }
}
