use sortscope_common::{Step, Tracked};

/// Build a max-heap in place, then repeatedly move the root behind the heap.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn heap_sort(seq: &mut Tracked<'_>) -> Step<()> {
    let len = seq.len();
    for root in (0..len / 2).rev() {
        sift_down(seq, root, len)?;
    }
    for end in (1..len).rev() {
        seq.swap(0, end)?;
        sift_down(seq, 0, end)?;
    }
    Ok(())
}

fn sift_down(seq: &mut Tracked<'_>, mut root: usize, end: usize) -> Step<()> {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return Ok(());
        }
        if child + 1 < end && seq.less(child, child + 1)? {
            child += 1;
        }
        if !seq.less(root, child)? {
            return Ok(());
        }
        seq.swap(root, child)?;
        root = child;
    }
}
