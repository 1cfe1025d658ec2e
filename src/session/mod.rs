//! 会话层：令牌持久化、适配器凭据回调、认证操作

pub mod manager;
pub mod storage;
pub mod vault;

pub use manager::SessionManager;
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, StoredTokens, TokenStore};
pub use vault::TokenVault;
