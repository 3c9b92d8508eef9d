//! 错误类型

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 比较过程中的致命错误
#[derive(Debug, Error)]
pub enum CmpError {
    #[error("无法打开文件 {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("哈希树获取失败 {path:?}: {source}")]
    Provider {
        path: PathBuf,
        #[source]
        source: ProviderError,
    },

    #[error("无法读取 {path:?} 的第 {block} 块: {source}")]
    Read {
        path: PathBuf,
        block: u64,
        #[source]
        source: io::Error,
    },

    #[error("哈希树结构错误: {0}")]
    MalformedTree(String),

    #[error("配置错误: {0}")]
    Config(String),
}

/// 树节点来源的错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    #[error("ioctl 调用失败: {0}")]
    Ioctl(#[source] io::Error),

    #[error("节点不存在: path={path_code}, depth={depth:?}")]
    OutOfRange { path_code: u64, depth: Option<u32> },

    #[error("非法节点: {0}")]
    Malformed(String),
}

pub type CmpResult<T> = Result<T, CmpError>;
