use anyhow::Result;
use merkle_cmp::compare::SliceBlockReader;
use merkle_cmp::tree::BlockHashProvider;
use merkle_cmp::{
    CmpConfig, CmpError, DiffRecord, NodeHash, TreeNode, build_tree, compare_files, diff_trees,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BLOCK: usize = 4096;

fn write_file(root: &Path, relative: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(relative);
    fs::write(&path, contents).unwrap();
    path
}

fn record(position: u64, byte_a: u8, byte_b: u8) -> DiffRecord {
    DiffRecord {
        position,
        byte_a,
        byte_b,
    }
}

fn positions(records: &[DiffRecord]) -> Vec<u64> {
    records.iter().map(|r| r.position).collect()
}

#[test]
fn file_compared_with_itself_is_identical() -> Result<()> {
    let dir = TempDir::new()?;
    let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
    let file = write_file(dir.path(), "self.bin", &data);

    let report = compare_files(&file, &file, &CmpConfig::default())?;

    assert!(report.records().is_empty());
    assert!(report.shorter_file().is_none());
    assert!(report.is_identical());
    assert_eq!(report.to_string(), "");
    Ok(())
}

#[test]
fn zero_filled_files_report_two_differences() -> Result<()> {
    let dir = TempDir::new()?;
    let zeros = vec![0u8; 3 * BLOCK];
    let mut changed = zeros.clone();
    changed[10] = 0x41;
    changed[9000] = 0x42;
    let a = write_file(dir.path(), "a.bin", &zeros);
    let b = write_file(dir.path(), "b.bin", &changed);

    let report = compare_files(&a, &b, &CmpConfig::default())?;

    assert_eq!(
        report.records(),
        &[record(11, 0, 0o101), record(9001, 0, 0o102)]
    );
    assert!(report.shorter_file().is_none());
    assert_eq!(report.to_string(), "  11 0 101\n9001 0 102\n");
    Ok(())
}

#[test]
fn first_byte_of_second_block_is_attributed_to_block_one() -> Result<()> {
    let dir = TempDir::new()?;
    let base = vec![0x55u8; 2 * BLOCK];
    let mut changed = base.clone();
    changed[BLOCK] = 0x56;
    let a = write_file(dir.path(), "a.bin", &base);
    let b = write_file(dir.path(), "b.bin", &changed);

    let report = compare_files(&a, &b, &CmpConfig::default())?;

    assert_eq!(report.records(), &[record(BLOCK as u64 + 1, 0x55, 0x56)]);
    Ok(())
}

#[test]
fn longer_file_with_same_prefix_only_reports_eof() -> Result<()> {
    let dir = TempDir::new()?;
    let long: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();
    let a = write_file(dir.path(), "a.bin", &long);
    let b = write_file(dir.path(), "b.bin", &long[..BLOCK]);

    let report = compare_files(&a, &b, &CmpConfig::default())?;

    assert!(report.records().is_empty());
    assert_eq!(report.shorter_file(), Some(b.as_path()));
    assert_eq!(
        report.to_string(),
        format!("cmp: EOF on {}\n", b.display())
    );

    let swapped = compare_files(&b, &a, &CmpConfig::default())?;
    assert!(swapped.records().is_empty());
    assert_eq!(swapped.shorter_file(), Some(b.as_path()));
    Ok(())
}

#[test]
fn differences_inside_the_common_prefix_are_reported_with_eof() -> Result<()> {
    let dir = TempDir::new()?;
    let long = vec![1u8; 3 * BLOCK + 17];
    let mut short = vec![1u8; BLOCK + 100];
    short[BLOCK + 99] = 2;
    short[5] = 0;
    let a = write_file(dir.path(), "a.bin", &long);
    let b = write_file(dir.path(), "b.bin", &short);

    let report = compare_files(&a, &b, &CmpConfig::default())?;

    assert_eq!(
        report.records(),
        &[record(6, 1, 0), record(BLOCK as u64 + 100, 1, 2)]
    );
    assert_eq!(report.shorter_file(), Some(b.as_path()));
    Ok(())
}

#[test]
fn empty_files() -> Result<()> {
    let dir = TempDir::new()?;
    let empty = write_file(dir.path(), "empty.bin", b"");
    let other = write_file(dir.path(), "other.bin", b"");
    let full = write_file(dir.path(), "full.bin", &[9u8; 10_000]);

    assert!(compare_files(&empty, &other, &CmpConfig::default())?.is_identical());

    let report = compare_files(&full, &empty, &CmpConfig::default())?;
    assert!(report.records().is_empty());
    assert_eq!(report.shorter_file(), Some(empty.as_path()));
    Ok(())
}

#[test]
fn configured_block_size_is_used_for_positions() -> Result<()> {
    let dir = TempDir::new()?;
    let a = write_file(dir.path(), "a.bin", b"0123456789abcdefXYZ");
    let b = write_file(dir.path(), "b.bin", b"0123456789abcdeFXYz");
    let config = CmpConfig {
        block_size: 4,
        ..CmpConfig::default()
    };

    let report = compare_files(&a, &b, &config)?;

    assert_eq!(positions(report.records()), vec![16, 19]);
    assert_eq!(report.to_string(), "16 146 106\n19 132 172\n");
    Ok(())
}

#[test]
fn missing_file_fails_to_open() -> Result<()> {
    let dir = TempDir::new()?;
    let a = write_file(dir.path(), "a.bin", b"data");
    let missing = dir.path().join("missing.bin");

    let err = compare_files(&a, &missing, &CmpConfig::default()).unwrap_err();
    match err {
        CmpError::Open { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn invalid_block_size_is_rejected_before_comparing() -> Result<()> {
    let dir = TempDir::new()?;
    let a = write_file(dir.path(), "lower.txt", b"hello world");
    let b = write_file(dir.path(), "upper.txt", b"HELLO WORLD");

    for block_size in [0, usize::MAX] {
        let config = CmpConfig {
            block_size,
            ..CmpConfig::default()
        };
        let err = compare_files(&a, &b, &config).unwrap_err();
        assert!(matches!(err, CmpError::Config(_)), "{err}");
    }
    Ok(())
}

#[test]
fn equal_hashes_prune_even_when_content_differs() -> Result<()> {
    let shared = NodeHash::from_word(0xABCD);
    let a = TreeNode::internal(
        shared,
        1,
        TreeNode::leaf(NodeHash::from_word(1), 0),
        Some(TreeNode::leaf(NodeHash::from_word(2), 1)),
    );
    let b = TreeNode::internal(shared, 1, TreeNode::leaf(NodeHash::from_word(3), 0), None);
    let data_a = [0u8; 8];
    let data_b = [1u8; 8];

    let records = diff_trees(
        &a,
        &b,
        &mut SliceBlockReader::new(&data_a, 4),
        &mut SliceBlockReader::new(&data_b, 4),
        4,
    )?;

    assert!(records.is_empty());
    Ok(())
}

#[test]
fn equal_subtree_hash_hides_differences_in_that_range_only() -> Result<()> {
    let same_left = NodeHash::from_word(5);
    let a = TreeNode::internal(
        NodeHash::from_word(10),
        1,
        TreeNode::leaf(same_left, 0),
        Some(TreeNode::leaf(NodeHash::from_word(6), 1)),
    );
    let b = TreeNode::internal(
        NodeHash::from_word(11),
        1,
        TreeNode::leaf(same_left, 0),
        Some(TreeNode::leaf(NodeHash::from_word(7), 1)),
    );
    let data_a = [0u8; 8];
    let data_b = [1u8; 8];

    let records = diff_trees(
        &a,
        &b,
        &mut SliceBlockReader::new(&data_a, 4),
        &mut SliceBlockReader::new(&data_b, 4),
        4,
    )?;

    assert_eq!(positions(&records), vec![5, 6, 7, 8]);
    Ok(())
}

#[test]
fn one_sided_right_child_contributes_nothing() -> Result<()> {
    let a = TreeNode::internal(
        NodeHash::from_word(1),
        1,
        TreeNode::leaf(NodeHash::from_word(2), 0),
        Some(TreeNode::leaf(NodeHash::from_word(3), 1)),
    );
    let b = TreeNode::internal(
        NodeHash::from_word(4),
        1,
        TreeNode::leaf(NodeHash::from_word(5), 0),
        None,
    );
    let data_a = *b"abcdefgh";
    let data_b = *b"abXdefgY";

    let records = diff_trees(
        &a,
        &b,
        &mut SliceBlockReader::new(&data_a, 4),
        &mut SliceBlockReader::new(&data_b, 4),
        4,
    )?;

    assert_eq!(records, vec![record(3, b'c', b'X')]);
    Ok(())
}

#[test]
fn leaves_with_different_block_indices_are_not_compared() -> Result<()> {
    let a = TreeNode::leaf(NodeHash::from_word(1), 0);
    let b = TreeNode::leaf(NodeHash::from_word(2), 3);
    let data = *b"abcdefghijklmnop";

    let records = diff_trees(
        &a,
        &b,
        &mut SliceBlockReader::new(&data, 4),
        &mut SliceBlockReader::new(b"zzzzzzzzzzzzzzzz", 4),
        4,
    )?;

    assert!(records.is_empty());
    Ok(())
}

#[test]
fn trees_of_different_depths_are_aligned_before_walking() -> Result<()> {
    // 9 个块对 2 个块
    let a: Vec<u8> = (0..36u8).collect();
    let mut b = a[..8].to_vec();
    b[1] = 100;
    let tree_a = build_tree(&mut BlockHashProvider::from_bytes(&a, 4))?;
    let tree_b = build_tree(&mut BlockHashProvider::from_bytes(&b, 4))?;
    assert_eq!(tree_a.depth(), 4);
    assert_eq!(tree_b.depth(), 1);

    let records = diff_trees(
        &tree_a,
        &tree_b,
        &mut SliceBlockReader::new(&a, 4),
        &mut SliceBlockReader::new(&b, 4),
        4,
    )?;

    assert_eq!(records, vec![record(2, 1, 100)]);
    Ok(())
}
