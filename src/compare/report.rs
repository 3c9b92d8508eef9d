use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 单个字节差异，位置从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRecord {
    pub position: u64,
    pub byte_a: u8,
    pub byte_b: u8,
}

/// 各列的输出宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub position: usize,
    pub byte_a: usize,
    pub byte_b: usize,
}

impl ColumnWidths {
    /// 位置按十进制、字节按八进制计算最大值所需的位数，最少 1 位
    pub fn of(records: &[DiffRecord]) -> Self {
        let max_position = records.iter().map(|r| r.position).max().unwrap_or(0);
        let max_a = records.iter().map(|r| r.byte_a).max().unwrap_or(0);
        let max_b = records.iter().map(|r| r.byte_b).max().unwrap_or(0);
        Self {
            position: digits(max_position, 10),
            byte_a: digits(u64::from(max_a), 8),
            byte_b: digits(u64::from(max_b), 8),
        }
    }
}

fn digits(mut value: u64, radix: u64) -> usize {
    let mut count = 1;
    while value >= radix {
        value /= radix;
        count += 1;
    }
    count
}

/// 比较结果: 按位置升序排列的差异，以及较短的文件 (长度相同时为空)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffReport {
    records: Vec<DiffRecord>,
    shorter: Option<PathBuf>,
}

impl DiffReport {
    pub fn new(records: Vec<DiffRecord>, shorter: Option<PathBuf>) -> Self {
        Self { records, shorter }
    }

    /// 根据两个文件的长度决定较短的一方
    pub fn with_lengths(records: Vec<DiffRecord>, a: (&Path, u64), b: (&Path, u64)) -> Self {
        let shorter = match a.1.cmp(&b.1) {
            std::cmp::Ordering::Less => Some(a.0.to_path_buf()),
            std::cmp::Ordering::Greater => Some(b.0.to_path_buf()),
            std::cmp::Ordering::Equal => None,
        };
        Self::new(records, shorter)
    }

    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    pub fn shorter_file(&self) -> Option<&Path> {
        self.shorter.as_deref()
    }

    /// 内容相同且长度相同
    pub fn is_identical(&self) -> bool {
        self.records.is_empty() && self.shorter.is_none()
    }

    pub fn widths(&self) -> ColumnWidths {
        ColumnWidths::of(&self.records)
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        for record in &self.records {
            writeln!(
                f,
                "{:>pw$} {:>aw$o} {:>bw$o}",
                record.position,
                record.byte_a,
                record.byte_b,
                pw = widths.position,
                aw = widths.byte_a,
                bw = widths.byte_b,
            )?;
        }
        if let Some(shorter) = &self.shorter {
            writeln!(f, "cmp: EOF on {}", shorter.display())?;
        }
        Ok(())
    }
}
