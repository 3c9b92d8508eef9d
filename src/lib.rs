//! # Merkle Cmp
//!
//! 基于块哈希树 (Merkle 树) 的二进制文件比较库
//!
//! ## 功能
//!
//! - 两个文件各自提供一棵覆盖 4096 字节数据块的哈希树
//! - 先对齐两棵树的深度，再按哈希剪掉相同的子树
//! - 只读取哈希不同的叶子块并逐字节比较，输出格式与 `cmp -l` 相同
//!
//! ## 使用示例
//!
//! ```no_run
//! use merkle_cmp::{CmpConfig, compare_files};
//! use std::path::Path;
//!
//! let report = compare_files(
//!     Path::new("old.bin"),
//!     Path::new("new.bin"),
//!     &CmpConfig::default(),
//! ).unwrap();
//! print!("{report}");
//! ```

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod tree;
pub mod utils;

// 重新导出常用类型
pub use compare::{DiffRecord, DiffReport, compare_files, diff_trees};
pub use config::{CmpConfig, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, ProviderKind};
pub use error::{CmpError, CmpResult, ProviderError};
pub use tree::{NodeHash, NodeKind, TreeNode, TreeProvider, build_tree};
