//! List reordering
//!
//! Drag-to-reorder moves one element; the target index is clamped into range.

/// Move the element at `from` to `to` (clamped into `[0, len - 1]`).
///
/// Returns `false` when nothing moved. `from` must be in range; that is
/// checked in debug builds and treated as a no-op otherwise.
pub fn reorder_in_place<T>(items: &mut Vec<T>, from: usize, to: isize) -> bool {
    debug_assert!(
        from < items.len(),
        "reorder: from index {} out of range for {} items",
        from,
        items.len()
    );
    if from >= items.len() {
        return false;
    }

    let last = (items.len() - 1) as isize;
    let clamped = to.clamp(0, last) as usize;
    if clamped == from {
        return false;
    }

    let moved = items.remove(from);
    items.insert(clamped, moved);
    true
}

/// Owned variant of [`reorder_in_place`]
pub fn reorder<T>(mut items: Vec<T>, from: usize, to: isize) -> Vec<T> {
    reorder_in_place(&mut items, from, to);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_forward_and_back() {
        assert_eq!(reorder(vec!['A', 'B', 'C'], 0, 2), vec!['B', 'C', 'A']);
        assert_eq!(reorder(vec!['A', 'B', 'C'], 2, 0), vec!['C', 'A', 'B']);
        assert_eq!(reorder(vec!['A', 'B', 'C', 'D'], 1, 2), vec!['A', 'C', 'B', 'D']);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let list = vec![1, 2, 3, 4];
        for i in 0..list.len() {
            assert_eq!(reorder(list.clone(), i, i as isize), list);
        }
    }

    #[test]
    fn test_reorder_clamps_target() {
        assert_eq!(reorder(vec!['A', 'B', 'C'], 0, 999), vec!['B', 'C', 'A']);
        assert_eq!(reorder(vec!['A', 'B', 'C'], 2, -4), vec!['C', 'A', 'B']);

        let mut list = vec!['A', 'B', 'C'];
        assert!(!reorder_in_place(&mut list, 2, 10));
        assert_eq!(list, vec!['A', 'B', 'C']);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_reorder_out_of_range_fails_fast_in_debug() {
        reorder(vec![1, 2], 5, 0);
    }
}
