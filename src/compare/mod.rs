mod bytes;
mod reader;
mod report;
mod walker;

use std::path::Path;

use tracing::info;

use crate::config::{CmpConfig, ProviderKind};
use crate::error::{CmpError, CmpResult};
use crate::tree::{BlockHashProvider, TreeNode, TreeProvider, align_trees, build_tree};

pub use bytes::compare_blocks;
pub use reader::{BlockReader, FileBlockReader, SliceBlockReader};
pub use report::{ColumnWidths, DiffRecord, DiffReport};
pub use walker::DiffWalker;

/// 对齐两棵哈希树并找出所有字节差异
pub fn diff_trees<A: BlockReader, B: BlockReader>(
    tree_a: &TreeNode,
    tree_b: &TreeNode,
    reader_a: &mut A,
    reader_b: &mut B,
    block_size: usize,
) -> CmpResult<Vec<DiffRecord>> {
    let (a, b) = align_trees(tree_a, tree_b)?;
    DiffWalker::new(reader_a, reader_b, block_size).diff(a, b)
}

/// 比较两个文件
pub fn compare_files(path_a: &Path, path_b: &Path, config: &CmpConfig) -> CmpResult<DiffReport> {
    config.validate()?;
    info!(file_a = ?path_a, file_b = ?path_b, block_size = config.block_size, "开始比较");

    // 先打开两个文件，打开失败时不做任何树操作
    let mut reader_a = FileBlockReader::open(path_a, config.block_size)?;
    let mut reader_b = FileBlockReader::open(path_b, config.block_size)?;

    let tree_a = load_tree(path_a, config)?;
    let tree_b = load_tree(path_b, config)?;

    let records = diff_trees(
        &tree_a,
        &tree_b,
        &mut reader_a,
        &mut reader_b,
        config.block_size,
    )?;

    let report = DiffReport::with_lengths(
        records,
        (reader_a.path(), reader_a.len()),
        (reader_b.path(), reader_b.len()),
    );
    info!(
        differences = report.records().len(),
        shorter = ?report.shorter_file(),
        "比较完成"
    );
    Ok(report)
}

fn load_tree(path: &Path, config: &CmpConfig) -> CmpResult<TreeNode> {
    let mut provider = open_provider(path, config)?;
    build_tree(&mut provider).map_err(|source| CmpError::Provider {
        path: path.to_path_buf(),
        source,
    })
}

fn open_provider(path: &Path, config: &CmpConfig) -> CmpResult<Box<dyn TreeProvider>> {
    match config.provider {
        ProviderKind::Blocks => Ok(Box::new(BlockHashProvider::open(path, config.block_size)?)),
        #[cfg(all(target_os = "linux", feature = "ext4"))]
        ProviderKind::Ext4 => Ok(Box::new(crate::tree::Ext4TreeProvider::open(path)?)),
        #[cfg(not(all(target_os = "linux", feature = "ext4")))]
        ProviderKind::Ext4 => Err(CmpError::Config(
            "未启用 ext4 特性，无法使用 ext4 哈希树".to_string(),
        )),
    }
}
