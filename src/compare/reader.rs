use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{CmpError, CmpResult};
use crate::utils::{open_file, read_full};

/// 按块号读取定长数据块，文件末尾的块可能更短或为空
pub trait BlockReader {
    fn read_block(&mut self, index: u64) -> CmpResult<Vec<u8>>;
}

/// 从磁盘文件读取数据块
#[derive(Debug)]
pub struct FileBlockReader {
    path: PathBuf,
    file: File,
    len: u64,
    block_size: usize,
}

impl FileBlockReader {
    pub fn open(path: &Path, block_size: usize) -> CmpResult<Self> {
        let file = open_file(path)?;
        let len = file
            .metadata()
            .map_err(|source| CmpError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            block_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 打开时的文件长度
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl BlockReader for FileBlockReader {
    fn read_block(&mut self, index: u64) -> CmpResult<Vec<u8>> {
        let read_error = |source| CmpError::Read {
            path: self.path.clone(),
            block: index,
            source,
        };
        let offset = index * self.block_size as u64;
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(read_error)?;

        let mut buffer = vec![0u8; self.block_size];
        let n = read_full(&mut self.file, &mut buffer).map_err(read_error)?;
        buffer.truncate(n);
        Ok(buffer)
    }
}

/// 从内存切片读取数据块
#[derive(Debug, Clone, Copy)]
pub struct SliceBlockReader<'a> {
    data: &'a [u8],
    block_size: usize,
}

impl<'a> SliceBlockReader<'a> {
    pub fn new(data: &'a [u8], block_size: usize) -> Self {
        Self { data, block_size }
    }
}

impl BlockReader for SliceBlockReader<'_> {
    fn read_block(&mut self, index: u64) -> CmpResult<Vec<u8>> {
        let start = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.block_size))
            .unwrap_or(usize::MAX)
            .min(self.data.len());
        let end = start.saturating_add(self.block_size).min(self.data.len());
        Ok(self.data[start..end].to_vec())
    }
}
