use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{NodeHash, NodeKind, NodeRequest, ProviderNode, TreeProvider};
use crate::error::{CmpError, CmpResult, ProviderError};
use crate::utils::{hash_block, hash_children, open_file, read_full};

/// 在用户态按块计算 SHA256 的节点来源
///
/// 树的形状是"左侧最大": 深度为 `d`、起始块为 `s` 的节点覆盖 `[s, s + 2^d)`，
/// 左子树总是满的，右子树只在对应块存在时才出现。
#[derive(Debug, Clone)]
pub struct BlockHashProvider {
    /// `levels[d][i]` 为深度 `d`、起始块 `i << d` 的节点哈希，最后一层只有根节点
    levels: Vec<Vec<NodeHash>>,
}

impl BlockHashProvider {
    /// 读取文件并计算所有块的哈希
    pub fn open(path: &Path, block_size: usize) -> CmpResult<Self> {
        let mut file = open_file(path)?;
        Self::from_reader(&mut file, block_size).map_err(|source| CmpError::Provider {
            path: path.to_path_buf(),
            source: ProviderError::Io(source),
        })
    }

    pub fn from_reader<R: Read>(reader: &mut R, block_size: usize) -> std::io::Result<Self> {
        let mut leaves = Vec::new();
        let mut buffer = vec![0u8; block_size];
        loop {
            let n = read_full(reader, &mut buffer)?;
            if n == 0 {
                break;
            }
            leaves.push(hash_block(&buffer[..n]));
            if n < block_size {
                break;
            }
        }
        Ok(Self::from_leaves(leaves))
    }

    pub fn from_bytes(data: &[u8], block_size: usize) -> Self {
        Self::from_leaves(data.chunks(block_size).map(hash_block).collect())
    }

    fn from_leaves(mut leaves: Vec<NodeHash>) -> Self {
        // 空文件视为一个零字节的块 0
        if leaves.is_empty() {
            leaves.push(hash_block(&[]));
        }

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = current
                .chunks(2)
                .map(|pair| hash_children(&pair[0], pair.get(1)))
                .collect();
            levels.push(next);
        }

        debug!(
            blocks = levels[0].len(),
            depth = levels.len() - 1,
            "块哈希计算完成"
        );
        Self { levels }
    }

    /// 根节点深度
    pub fn depth(&self) -> u32 {
        (self.levels.len() - 1) as u32
    }

    pub fn block_count(&self) -> usize {
        self.levels[0].len()
    }

    /// 把路径编码还原为节点的起始块号，第 k 位表示第 k 次下降走右边
    fn start_block(&self, path_code: u64, depth: u32) -> Option<u64> {
        let root_depth = self.depth();
        let descents = root_depth.checked_sub(depth)?;
        if descents < u64::BITS && path_code >> descents != 0 {
            return None;
        }
        let start: u64 = (0..descents)
            .filter(|k| path_code >> k & 1 == 1)
            .map(|k| 1u64 << (root_depth - 1 - k))
            .sum();
        Some(start)
    }
}

impl TreeProvider for BlockHashProvider {
    fn get_node(&mut self, request: NodeRequest) -> Result<ProviderNode, ProviderError> {
        let out_of_range = || ProviderError::OutOfRange {
            path_code: request.path_code,
            depth: request.depth,
        };

        let depth = request.depth.unwrap_or_else(|| self.depth());
        let start = self
            .start_block(request.path_code, depth)
            .ok_or_else(out_of_range)?;
        let index = (start >> depth) as usize;
        let hash = *self.levels[depth as usize]
            .get(index)
            .ok_or_else(out_of_range)?;

        let kind = if depth == 0 {
            NodeKind::Leaf { block: start }
        } else if 2 * index + 1 < self.levels[depth as usize - 1].len() {
            NodeKind::InternalTwoChildren
        } else {
            NodeKind::InternalOneChild
        };

        Ok(ProviderNode { hash, kind, depth })
    }
}
