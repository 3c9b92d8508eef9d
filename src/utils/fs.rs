use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{CmpError, CmpResult};

/// 以只读方式打开文件，失败时带上路径
pub fn open_file(path: &Path) -> CmpResult<File> {
    File::open(path).map_err(|source| CmpError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// 尽量读满缓冲区，返回实际读取的字节数；只有到达文件末尾时才会少于缓冲区长度
pub fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
