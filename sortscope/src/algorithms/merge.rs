use sortscope_common::{Element, Step, Tracked};
use std::cmp::Ordering;

/// Top-down merge sort with a scratch buffer per merge.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn merge_sort(seq: &mut Tracked<'_>) -> Step<()> {
    let len = seq.len();
    top_down(seq, 0, len, buffered_merge)
}

/// Same recursion as [`merge_sort`], merging by rotation with no buffer.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn in_place_merge_sort(seq: &mut Tracked<'_>) -> Step<()> {
    let len = seq.len();
    top_down(seq, 0, len, rotation_merge)
}

/// Iterative merge sort: merges runs of width 1, 2, 4, ... left to right.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn bottom_up_merge_sort(seq: &mut Tracked<'_>) -> Step<()> {
    let len = seq.len();
    let mut width = 1;
    while width < len {
        let mut lo = 0;
        while lo < len {
            let mid = (lo + width).min(len);
            let hi = (mid + width).min(len);
            buffered_merge(seq, lo, mid, hi)?;
            lo = hi;
        }
        width *= 2;
    }
    Ok(())
}

type MergeFn = fn(&mut Tracked<'_>, usize, usize, usize) -> Step<()>;

fn top_down(seq: &mut Tracked<'_>, lo: usize, hi: usize, merge: MergeFn) -> Step<()> {
    if hi - lo <= 1 {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    top_down(seq, lo, mid, merge)?;
    top_down(seq, mid, hi, merge)?;
    merge(seq, lo, mid, hi)
}

/// Stable merge of `[lo, mid)` and `[mid, hi)` through a detached buffer.
fn buffered_merge(seq: &mut Tracked<'_>, lo: usize, mid: usize, hi: usize) -> Step<()> {
    if lo == mid || mid == hi {
        return Ok(());
    }

    let mut merged: Vec<Element> = Vec::with_capacity(hi - lo);
    let (mut left, mut right) = (lo, mid);
    while left < mid && right < hi {
        // Ties go left to keep the sort stable
        if seq.compare(left, right)? == Ordering::Greater {
            merged.push(seq.read(right)?);
            right += 1;
        } else {
            merged.push(seq.read(left)?);
            left += 1;
        }
    }
    for k in left..mid {
        merged.push(seq.read(k)?);
    }
    for k in right..hi {
        merged.push(seq.read(k)?);
    }

    for (offset, item) in merged.iter().enumerate() {
        seq.write(lo + offset, item)?;
    }
    Ok(())
}

/// Merge without a buffer: split the longer run in half, binary-search the
/// matching cut in the other run, rotate the middle blocks and recurse.
fn rotation_merge(seq: &mut Tracked<'_>, lo: usize, mid: usize, hi: usize) -> Step<()> {
    let (left_len, right_len) = (mid - lo, hi - mid);
    if left_len == 0 || right_len == 0 {
        return Ok(());
    }
    if left_len + right_len == 2 {
        if seq.less(mid, lo)? {
            seq.swap(lo, mid)?;
        }
        return Ok(());
    }

    let (left_cut, right_cut) = if left_len > right_len {
        let left_cut = lo + left_len / 2;
        let key = seq.read(left_cut)?;
        (left_cut, lower_bound(seq, mid, hi, &key)?)
    } else {
        let right_cut = mid + right_len / 2;
        let key = seq.read(right_cut)?;
        (upper_bound(seq, lo, mid, &key)?, right_cut)
    };

    rotate(seq, left_cut, mid, right_cut)?;
    let new_mid = left_cut + (right_cut - mid);

    rotation_merge(seq, lo, left_cut, new_mid)?;
    rotation_merge(seq, new_mid, right_cut, hi)
}

/// First position in `[lo, hi)` whose element is not less than `key`.
fn lower_bound(seq: &Tracked<'_>, mut lo: usize, mut hi: usize, key: &Element) -> Step<usize> {
    while lo < hi {
        let probe = lo + (hi - lo) / 2;
        if seq.compare_to(probe, key)? == Ordering::Less {
            lo = probe + 1;
        } else {
            hi = probe;
        }
    }
    Ok(lo)
}

/// First position in `[lo, hi)` whose element is greater than `key`.
fn upper_bound(seq: &Tracked<'_>, mut lo: usize, mut hi: usize, key: &Element) -> Step<usize> {
    while lo < hi {
        let probe = lo + (hi - lo) / 2;
        if seq.compare_to(probe, key)? == Ordering::Greater {
            hi = probe;
        } else {
            lo = probe + 1;
        }
    }
    Ok(lo)
}

/// Bring `[mid, hi)` in front of `[lo, mid)` with three reversals.
fn rotate(seq: &mut Tracked<'_>, lo: usize, mid: usize, hi: usize) -> Step<()> {
    if lo == mid || mid == hi {
        return Ok(());
    }
    reverse(seq, lo, mid)?;
    reverse(seq, mid, hi)?;
    reverse(seq, lo, hi)
}

fn reverse(seq: &mut Tracked<'_>, mut lo: usize, mut hi: usize) -> Step<()> {
    while lo + 1 < hi {
        hi -= 1;
        seq.swap(lo, hi)?;
        lo += 1;
    }
    Ok(())
}
