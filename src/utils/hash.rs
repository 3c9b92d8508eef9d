use sha2::{Digest, Sha256};

use crate::tree::NodeHash;

const LEAF_TAG: u8 = 0x00;
const PAIR_TAG: u8 = 0x01;
const SINGLE_TAG: u8 = 0x02;

/// 计算单个数据块的 SHA256 叶子哈希
pub fn hash_block(data: &[u8]) -> NodeHash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_TAG]);
    hasher.update(data);
    NodeHash::new(hasher.finalize().into())
}

/// 由子节点哈希计算内部节点哈希，只有左子节点时使用单独的前缀
pub fn hash_children(left: &NodeHash, right: Option<&NodeHash>) -> NodeHash {
    let mut hasher = Sha256::new();
    match right {
        Some(right) => {
            hasher.update([PAIR_TAG]);
            hasher.update(left.as_bytes());
            hasher.update(right.as_bytes());
        }
        None => {
            hasher.update([SINGLE_TAG]);
            hasher.update(left.as_bytes());
        }
    }
    NodeHash::new(hasher.finalize().into())
}
