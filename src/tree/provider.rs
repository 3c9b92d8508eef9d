use super::{NodeHash, NodeKind};
use crate::error::ProviderError;

/// 单个节点请求: 路径编码 + 节点深度，`depth` 为 `None` 时请求根节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRequest {
    pub path_code: u64,
    pub depth: Option<u32>,
}

impl NodeRequest {
    pub fn root() -> Self {
        Self {
            path_code: 0,
            depth: None,
        }
    }

    pub fn new(path_code: u64, depth: u32) -> Self {
        Self {
            path_code,
            depth: Some(depth),
        }
    }
}

/// 节点来源返回的单个节点，不含子节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderNode {
    pub hash: NodeHash,
    pub kind: NodeKind,
    pub depth: u32,
}

/// 哈希树节点来源，每次请求返回一个节点
pub trait TreeProvider {
    fn get_node(&mut self, request: NodeRequest) -> Result<ProviderNode, ProviderError>;
}

impl<P: TreeProvider + ?Sized> TreeProvider for Box<P> {
    fn get_node(&mut self, request: NodeRequest) -> Result<ProviderNode, ProviderError> {
        (**self).get_node(request)
    }
}
