//! 块哈希树 (Merkle 树)
//!
//! 树由 [`TreeProvider`] 逐个节点提供，[`build_tree`] 从根节点开始把整棵树取回内存。

mod align;
mod blocks;
#[cfg(all(target_os = "linux", feature = "ext4"))]
mod ext4;
mod provider;

use std::fmt;

use tracing::debug;

use crate::error::ProviderError;

pub use align::align_trees;
pub use blocks::BlockHashProvider;
#[cfg(all(target_os = "linux", feature = "ext4"))]
pub use ext4::Ext4TreeProvider;
pub use provider::{NodeRequest, ProviderNode, TreeProvider};

/// 子树内容的定长指纹，只做相等比较
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHash([u8; 32]);

impl NodeHash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// 由内核返回的 32 位哈希构造，高字节在前，其余字节为零
    pub fn from_word(word: u32) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&word.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHash({})", &hex::encode(self.0)[..16])
    }
}

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { block: u64 },
    InternalOneChild,
    InternalTwoChildren,
}

/// 哈希树节点，独占其子节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    hash: NodeHash,
    kind: NodeKind,
    depth: u32,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(hash: NodeHash, block: u64) -> Self {
        Self {
            hash,
            kind: NodeKind::Leaf { block },
            depth: 0,
            left: None,
            right: None,
        }
    }

    /// 构造内部节点，类型由是否存在右子节点决定
    pub fn internal(hash: NodeHash, depth: u32, left: TreeNode, right: Option<TreeNode>) -> Self {
        let kind = if right.is_some() {
            NodeKind::InternalTwoChildren
        } else {
            NodeKind::InternalOneChild
        };
        Self {
            hash,
            kind,
            depth,
            left: Some(Box::new(left)),
            right: right.map(Box::new),
        }
    }

    pub fn hash(&self) -> &NodeHash {
        &self.hash
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 叶子节点对应的块号
    pub fn block(&self) -> Option<u64> {
        match self.kind {
            NodeKind::Leaf { block } => Some(block),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    /// 子树中的节点总数
    pub fn node_count(&self) -> usize {
        1 + self.left().map_or(0, TreeNode::node_count)
            + self.right().map_or(0, TreeNode::node_count)
    }
}

/// 从根节点开始逐个请求节点，构造完整的哈希树
pub fn build_tree<P: TreeProvider + ?Sized>(provider: &mut P) -> Result<TreeNode, ProviderError> {
    let root = provider.get_node(NodeRequest::root())?;
    let tree = build_subtree(provider, root, 0, 1)?;
    debug!(
        depth = tree.depth(),
        nodes = tree.node_count(),
        hash = %tree.hash(),
        "哈希树构造完成"
    );
    Ok(tree)
}

fn build_subtree<P: TreeProvider + ?Sized>(
    provider: &mut P,
    node: ProviderNode,
    path_code: u64,
    mult: u64,
) -> Result<TreeNode, ProviderError> {
    let (child_depth, has_right) = match node.kind {
        NodeKind::Leaf { block } => return Ok(TreeNode::leaf(node.hash, block)),
        NodeKind::InternalOneChild => (node.depth.checked_sub(1), false),
        NodeKind::InternalTwoChildren => (node.depth.checked_sub(1), true),
    };
    let child_depth = child_depth
        .ok_or_else(|| ProviderError::Malformed(format!("内部节点深度为 0 (path={path_code})")))?;
    let next_mult = mult
        .checked_mul(2)
        .ok_or_else(|| ProviderError::Malformed(format!("树深度过大 (path={path_code})")))?;

    // 左子节点沿用父节点的路径编码，右子节点在本层对应的位上置 1
    let left = provider.get_node(NodeRequest::new(path_code, child_depth))?;
    let left = build_subtree(provider, left, path_code, next_mult)?;

    let right = if has_right {
        let right_code = path_code + mult;
        let right = provider.get_node(NodeRequest::new(right_code, child_depth))?;
        Some(build_subtree(provider, right, right_code, next_mult)?)
    } else {
        None
    };

    Ok(TreeNode::internal(node.hash, node.depth, left, right))
}
