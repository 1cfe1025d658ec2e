//! Forge Console - 项目与 AI 活动管理控制台的客户端数据同步层
//!
//! 模块划分：
//! - **api**: HTTP 适配器（传输抽象、Bearer 令牌、401 透明刷新、错误归一化）
//! - **types**: 领域实体与线上响应包
//! - **services**: 资源服务（projects / ai-activities / agents / analytics / pipelines / auth）
//! - **store**: 状态树、异步操作协调、集合 Store
//! - **session**: 令牌持久化与会话管理
//! - **console**: 按配置组装以上各层
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **observability**: 日志初始化

pub mod api;
pub mod config;
pub mod console;
pub mod observability;
pub mod services;
pub mod session;
pub mod store;
pub mod types;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use console::Console;
pub use store::{RootState, Store};
