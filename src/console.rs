//! 控制台组装：按配置构建 传输层 → 适配器 → 服务 → Store / 操作 → 会话
//!
//! 令牌保管同时是适配器的凭据来源，因此先建 Store 与 TokenVault，再建 ApiClient。

use std::sync::Arc;

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::config::AppConfig;
use crate::services::Services;
use crate::session::{FileTokenStore, SessionManager, TokenStore, TokenVault};
use crate::store::{AiActivityThunks, ProjectThunks, RootState, Store};

#[derive(Clone)]
pub struct Console {
    pub store: Store,
    pub services: Services,
    pub projects: ProjectThunks,
    pub ai_activities: AiActivityThunks,
    pub session: SessionManager,
    per_page: u32,
}

impl Console {
    /// reqwest 传输 + 文件令牌存储
    pub fn from_config(cfg: &AppConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(&cfg.api.base_url, cfg.api.timeout_secs));
        let storage = Arc::new(FileTokenStore::new(&cfg.session.token_path));
        tracing::info!(
            base_url = %transport.base_url(),
            token_path = %storage.path().display(),
            "building console"
        );
        Self::assemble(transport, storage, cfg.store.per_page)
    }

    pub fn assemble(transport: Arc<dyn Transport>, storage: Arc<dyn TokenStore>, per_page: u32) -> Self {
        let store = Store::new();
        let vault = Arc::new(TokenVault::new(storage, store.clone()));
        let client = ApiClient::new(transport).with_credentials(vault.clone());
        let services = Services::new(client);

        Self {
            projects: ProjectThunks::new(store.clone(), services.projects.clone()),
            ai_activities: AiActivityThunks::new(store.clone(), services.ai_activities.clone()),
            session: SessionManager::new(store.clone(), vault, services.auth.clone()),
            services,
            store,
            per_page,
        }
    }

    /// 列表默认每页条数
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn state(&self) -> RootState {
        self.store.state()
    }
}
