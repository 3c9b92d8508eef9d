use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CmpError, CmpResult};

/// 哈希树与数据块共用的块大小
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// 每次比较会为两个文件各分配一个块大小的缓冲区
pub const MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// 哈希树来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 在用户态计算块哈希
    #[default]
    Blocks,
    /// 通过 ioctl 向 ext4 请求
    Ext4,
}

/// 比较配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmpConfig {
    pub block_size: usize,
    pub provider: ProviderKind,
}

impl Default for CmpConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            provider: ProviderKind::default(),
        }
    }
}

impl CmpConfig {
    /// 读取 TOML 配置文件；未指定时使用默认配置
    pub fn load(path: Option<&Path>) -> CmpResult<Self> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|e| CmpError::Config(format!("无法读取 {:?}: {}", path, e)))?;
                toml::from_str(&content)
                    .map_err(|e| CmpError::Config(format!("无法解析 {:?}: {}", path, e)))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CmpResult<()> {
        if self.block_size == 0 {
            return Err(CmpError::Config("block_size 必须大于 0".to_string()));
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(CmpError::Config(format!(
                "block_size 不能超过 {} (当前为 {})",
                MAX_BLOCK_SIZE, self.block_size
            )));
        }
        if self.provider == ProviderKind::Ext4 && self.block_size != DEFAULT_BLOCK_SIZE {
            return Err(CmpError::Config(format!(
                "ext4 哈希树的块大小固定为 {}",
                DEFAULT_BLOCK_SIZE
            )));
        }
        Ok(())
    }
}
