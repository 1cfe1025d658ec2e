//! 状态树：auth / projects / ai_activities 三个独立 Store 组合成 RootState
//!
//! 通过 watch 通道持有：dispatch 同步执行 reducer 并通知订阅方（UI 据此重新渲染），
//! 同一 Store 的两次 reducer 不会交错；各 Store 之间互不读取。

pub mod ai_activities;
pub mod auth;
pub mod collection;
pub mod projects;
pub mod thunk;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

pub use ai_activities::{AiActivitiesAction, AiActivitiesState, AiActivityThunks};
pub use auth::{AuthAction, SessionPhase, SessionState, SESSION_EXPIRED};
pub use collection::{CollectionState, Status};
pub use projects::{ProjectThunks, ProjectsAction, ProjectsState};
pub use thunk::{AsyncAction, Operation, Phase, RequestId};

/// 组合后的状态树
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RootState {
    pub auth: SessionState,
    pub projects: ProjectsState,
    pub ai_activities: AiActivitiesState,
}

/// 可派发的全部动作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Projects(ProjectsAction),
    AiActivities(AiActivitiesAction),
}

impl RootState {
    /// 根 reducer：按模块分发
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Auth(a) => auth::reduce(&mut self.auth, a),
            Action::Projects(a) => projects::reduce(&mut self.projects, a),
            Action::AiActivities(a) => ai_activities::reduce(&mut self.ai_activities, a),
        }
    }
}

/// 状态容器；Clone 共享同一棵状态树
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<RootState>>,
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RootState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn dispatch(&self, action: Action) {
        self.tx.send_modify(|state| state.reduce(action));
    }

    /// 当前状态快照
    pub fn state(&self) -> RootState {
        self.tx.borrow().clone()
    }

    /// 只读取需要的部分，避免整树克隆
    pub fn select<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
