use super::report::DiffRecord;

/// 逐字节比较同一块号的两个数据块
///
/// 比较范围是两个缓冲区中较短的有效数据，最多一个块长，因此不会报告超出任一文件长度的位置。
pub fn compare_blocks(a: &[u8], b: &[u8], block_index: u64, block_size: usize) -> Vec<DiffRecord> {
    let base = block_index * block_size as u64;
    a.iter()
        .zip(b)
        .take(block_size)
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(offset, (&byte_a, &byte_b))| DiffRecord {
            position: base + offset as u64 + 1,
            byte_a,
            byte_b,
        })
        .collect()
}
