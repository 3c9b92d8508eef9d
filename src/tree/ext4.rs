//! 通过 `EXT4_IOC_GETTREE` 向支持 Merkle 树的 ext4 内核请求节点

use std::fs::{File, OpenOptions};
use std::io;
use std::mem::size_of;
use std::os::fd::AsRawFd;
use std::path::Path;
use std::ptr;

use libc::c_int;
use tracing::trace;

use super::{NodeHash, NodeKind, NodeRequest, ProviderNode, TreeProvider};
use crate::error::{CmpError, CmpResult, ProviderError};

/// 内核侧 `struct merkel_tree` 的布局，子节点指针只用于占位
#[repr(C)]
#[allow(dead_code)]
struct RawTreeNode {
    l: *mut RawTreeNode,
    r: *mut RawTreeNode,
    block: c_int,
    hash: c_int,
    depth: c_int,
}

const ROOT_DEPTH: c_int = -1;
const ONE_CHILD: c_int = -1;
const TWO_CHILDREN: c_int = -2;

/// `_IOWR('f', 22, struct merkel_tree)`
const EXT4_IOC_GETTREE: u64 = ioc_read_write(b'f', 22, size_of::<RawTreeNode>());

const fn ioc_read_write(kind: u8, nr: u8, size: usize) -> u64 {
    const IOC_READ_WRITE: u64 = 3;
    (IOC_READ_WRITE << 30) | ((size as u64) << 16) | ((kind as u64) << 8) | nr as u64
}

pub struct Ext4TreeProvider {
    file: File,
}

impl Ext4TreeProvider {
    /// 内核只接受以读写方式打开的文件描述符
    pub fn open(path: &Path) -> CmpResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| CmpError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }
}

/// 把内核返回的节点转换为 [`ProviderNode`]
///
/// `block` 非负时为叶子的块号，-1 和 -2 分别表示有一个和两个子节点的内部节点。
fn decode(raw: &RawTreeNode) -> Result<ProviderNode, ProviderError> {
    let kind = match raw.block {
        b if b >= 0 => NodeKind::Leaf { block: b as u64 },
        ONE_CHILD => NodeKind::InternalOneChild,
        TWO_CHILDREN => NodeKind::InternalTwoChildren,
        other => return Err(ProviderError::Malformed(format!("未知的节点类型 {other}"))),
    };
    let depth = u32::try_from(raw.depth)
        .map_err(|_| ProviderError::Malformed(format!("负的节点深度 {}", raw.depth)))?;

    Ok(ProviderNode {
        hash: NodeHash::from_word(raw.hash as u32),
        kind,
        depth,
    })
}

impl TreeProvider for Ext4TreeProvider {
    fn get_node(&mut self, request: NodeRequest) -> Result<ProviderNode, ProviderError> {
        let out_of_range = || ProviderError::OutOfRange {
            path_code: request.path_code,
            depth: request.depth,
        };
        let block = c_int::try_from(request.path_code).map_err(|_| out_of_range())?;
        let depth = match request.depth {
            Some(depth) => c_int::try_from(depth).map_err(|_| out_of_range())?,
            None => ROOT_DEPTH,
        };

        let mut raw = RawTreeNode {
            l: ptr::null_mut(),
            r: ptr::null_mut(),
            block,
            hash: 0,
            depth,
        };
        // SAFETY: raw 是有效的、可写的 struct merkel_tree，ioctl 返回前不会被移动
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                EXT4_IOC_GETTREE as _,
                &mut raw as *mut RawTreeNode,
            )
        };
        if rc != 0 {
            return Err(ProviderError::Ioctl(io::Error::last_os_error()));
        }
        trace!(block = raw.block, depth = raw.depth, "ioctl 返回节点");

        decode(&raw)
    }
}
