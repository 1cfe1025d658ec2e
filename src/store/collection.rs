//! 集合状态：每类资源的条目、焦点实体、加载状态、错误与分页
//!
//! 约束：
//! - items 只在列表请求成功时整体替换，不跨页合并
//! - 创建只在服务端确认后插到队首
//! - pagination 始终是最近一次成功列表请求的 meta，total 与 items.len() 可以不同
//! - focused 只由按 ID 获取设置，不从 items 推导
//! - 失败不回滚也不修改 items / pagination

use serde::Serialize;

use super::thunk::{AsyncAction, Phase};
use crate::types::{Paginated, PaginationMeta};

/// 请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub focused: Option<T>,
    pub status: Status,
    pub last_error: Option<String>,
    pub pagination: PaginationMeta,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            focused: None,
            status: Status::Idle,
            last_error: None,
            pagination: PaginationMeta::default(),
        }
    }
}

impl<T> CollectionState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// 按生命周期阶段归约；fulfilled 时先置 idle 再执行具体 reducer
    pub fn apply<P>(&mut self, action: AsyncAction<P>, on_fulfilled: impl FnOnce(&mut Self, P)) {
        match action.phase {
            Phase::Pending => {
                self.status = Status::Loading;
                self.last_error = None;
            }
            Phase::Fulfilled(payload) => {
                self.status = Status::Idle;
                on_fulfilled(self, payload);
            }
            Phase::Rejected { message } => {
                self.status = Status::Error;
                self.last_error = Some(message);
            }
        }
    }

    pub fn replace_page(&mut self, page: Paginated<T>) {
        self.items = page.data;
        self.pagination = page.meta;
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn focus(&mut self, item: T) {
        self.focused = Some(item);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn clear_focused(&mut self) {
        self.focused = None;
    }
}
