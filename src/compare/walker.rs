use tracing::{debug, trace};

use super::bytes::compare_blocks;
use super::reader::BlockReader;
use super::report::DiffRecord;
use crate::error::CmpResult;
use crate::tree::TreeNode;

/// 对齐后的两棵树的递归比较
///
/// 哈希相同的子树整体跳过；块号相同的叶子读取数据逐字节比较；
/// 其余情况先左后右递归，只比较两侧都存在的子节点。
pub struct DiffWalker<'r, A: BlockReader, B: BlockReader> {
    reader_a: &'r mut A,
    reader_b: &'r mut B,
    block_size: usize,
    records: Vec<DiffRecord>,
    pruned: usize,
    blocks_compared: usize,
}

impl<'r, A: BlockReader, B: BlockReader> DiffWalker<'r, A, B> {
    pub fn new(reader_a: &'r mut A, reader_b: &'r mut B, block_size: usize) -> Self {
        Self {
            reader_a,
            reader_b,
            block_size,
            records: Vec::new(),
            pruned: 0,
            blocks_compared: 0,
        }
    }

    pub fn diff(mut self, a: &TreeNode, b: &TreeNode) -> CmpResult<Vec<DiffRecord>> {
        self.walk(a, b)?;
        debug!(
            pruned = self.pruned,
            blocks_compared = self.blocks_compared,
            differences = self.records.len(),
            "哈希树比较完成"
        );
        Ok(self.records)
    }

    fn walk(&mut self, a: &TreeNode, b: &TreeNode) -> CmpResult<()> {
        if a.hash() == b.hash() {
            self.pruned += 1;
            return Ok(());
        }

        if let (Some(block_a), Some(block_b)) = (a.block(), b.block())
            && block_a == block_b
        {
            return self.compare_leaf(block_a);
        }

        if let (Some(left_a), Some(left_b)) = (a.left(), b.left()) {
            self.walk(left_a, left_b)?;
        }
        if let (Some(right_a), Some(right_b)) = (a.right(), b.right()) {
            self.walk(right_a, right_b)?;
        }
        Ok(())
    }

    fn compare_leaf(&mut self, block: u64) -> CmpResult<()> {
        let data_a = self.reader_a.read_block(block)?;
        let data_b = self.reader_b.read_block(block)?;
        let found = compare_blocks(&data_a, &data_b, block, self.block_size);
        trace!(block, differences = found.len(), "数据块比较");

        self.blocks_compared += 1;
        self.records.extend(found);
        Ok(())
    }
}
