use merkle_cmp::compare::SliceBlockReader;
use merkle_cmp::tree::BlockHashProvider;
use merkle_cmp::{DiffRecord, build_tree, diff_trees};
use proptest::prelude::*;

const BLOCK: usize = 16;

fn merkle_diff(a: &[u8], b: &[u8]) -> Vec<DiffRecord> {
    let tree_a = build_tree(&mut BlockHashProvider::from_bytes(a, BLOCK)).unwrap();
    let tree_b = build_tree(&mut BlockHashProvider::from_bytes(b, BLOCK)).unwrap();
    diff_trees(
        &tree_a,
        &tree_b,
        &mut SliceBlockReader::new(a, BLOCK),
        &mut SliceBlockReader::new(b, BLOCK),
        BLOCK,
    )
    .unwrap()
}

/// 直接逐字节比较公共前缀
fn naive_diff(a: &[u8], b: &[u8]) -> Vec<DiffRecord> {
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, (&byte_a, &byte_b))| DiffRecord {
            position: i as u64 + 1,
            byte_a,
            byte_b,
        })
        .collect()
}

/// 一个基础文件，以及在其上修改若干字节并截断或追加后的另一个文件
fn file_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (
        prop::collection::vec(0u8..4, 0..300),
        prop::collection::vec((0usize..300, any::<u8>()), 0..8),
        0usize..320,
        prop::collection::vec(any::<u8>(), 0..40),
    )
        .prop_map(|(base, edits, keep, tail)| {
            let mut other = base.clone();
            for (index, value) in edits {
                if let Some(byte) = other.get_mut(index) {
                    *byte = value;
                }
            }
            other.truncate(keep);
            other.extend(tail);
            (base, other)
        })
}

proptest! {
    #[test]
    fn matches_plain_byte_comparison((a, b) in file_pair()) {
        prop_assert_eq!(merkle_diff(&a, &b), naive_diff(&a, &b));
    }

    #[test]
    fn positions_are_symmetric((a, b) in file_pair()) {
        let forward = merkle_diff(&a, &b);
        let backward = merkle_diff(&b, &a);
        prop_assert_eq!(forward.len(), backward.len());
        for (f, r) in forward.iter().zip(&backward) {
            prop_assert_eq!(f.position, r.position);
            prop_assert_eq!((f.byte_a, f.byte_b), (r.byte_b, r.byte_a));
        }
    }

    #[test]
    fn positions_strictly_increase((a, b) in file_pair()) {
        let records = merkle_diff(&a, &b);
        prop_assert!(records.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn identical_inputs_have_no_records(a in prop::collection::vec(any::<u8>(), 0..400)) {
        prop_assert!(merkle_diff(&a, &a).is_empty());
    }
}
