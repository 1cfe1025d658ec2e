//! 令牌持久化：两个持久字符串 access_token / refresh_token
//!
//! FileTokenStore 写单个 JSON 文件（unix 下权限 0600），跨进程重启保留；MemoryTokenStore 用于测试。

use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TokenPair;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// 持久化的令牌（任一可缺省）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl From<&TokenPair> for StoredTokens {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: Some(pair.access_token.clone()),
            refresh_token: Some(pair.refresh_token.clone()),
        }
    }
}

/// 持久令牌存储（进程级单例，只有会话层写入）
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<StoredTokens, StorageError>;

    fn save_pair(&self, pair: &TokenPair) -> Result<(), StorageError>;

    /// 只更新访问令牌，刷新令牌保持不变
    fn save_access(&self, access_token: &str) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

/// 文件存储：文件不存在视为空；父目录不存在时自动创建
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(tokens)?;
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path)?;
        // 已存在的文件也收紧为仅属主可读写
        #[cfg(unix)]
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        if !self.path.exists() {
            return Ok(StoredTokens::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(StoredTokens::default());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.write(&StoredTokens::from(pair))
    }

    fn save_access(&self, access_token: &str) -> Result<(), StorageError> {
        // 文件损坏时报错，不用空记录覆盖掉 refresh_token
        let mut tokens = self.load()?;
        tokens.access_token = Some(access_token.to_string());
        self.write(&tokens)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    /// 当前内容（测试断言用）
    pub fn snapshot(&self) -> StoredTokens {
        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut StoredTokens)) {
        let mut guard = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.snapshot())
    }

    fn save_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.update(|t| *t = StoredTokens::from(pair));
        Ok(())
    }

    fn save_access(&self, access_token: &str) -> Result<(), StorageError> {
        self.update(|t| t.access_token = Some(access_token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(|t| *t = StoredTokens::default());
        Ok(())
    }
}
