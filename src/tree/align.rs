use tracing::debug;

use super::TreeNode;
use crate::error::{CmpError, CmpResult};

/// 让两棵树的根处于相同深度
///
/// 较深的一棵沿左子节点下降，丢弃的只是较短文件不存在的尾部块。
pub fn align_trees<'a>(
    a: &'a TreeNode,
    b: &'a TreeNode,
) -> CmpResult<(&'a TreeNode, &'a TreeNode)> {
    let aligned_a = descend_left(a, b.depth())?;
    let aligned_b = descend_left(b, a.depth())?;
    debug!(
        from_a = a.depth(),
        from_b = b.depth(),
        depth = aligned_a.depth(),
        "哈希树对齐完成"
    );
    Ok((aligned_a, aligned_b))
}

fn descend_left(mut node: &TreeNode, target: u32) -> CmpResult<&TreeNode> {
    while node.depth() > target {
        node = node.left().ok_or_else(|| {
            CmpError::MalformedTree(format!(
                "深度为 {} 的节点没有左子节点，无法对齐到深度 {}",
                node.depth(),
                target
            ))
        })?;
    }
    Ok(node)
}
