use sortscope_common::{Step, Tracked};
use std::cmp::Ordering;

/// Quicksort with a median-of-three pivot and a three-way partition, so runs
/// of equal keys are settled in one pass.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn quick_sort(seq: &mut Tracked<'_>) -> Step<()> {
    let len = seq.len();
    sort_range(seq, 0, len)
}

fn sort_range(seq: &mut Tracked<'_>, lo: usize, hi: usize) -> Step<()> {
    if hi - lo <= 1 {
        return Ok(());
    }

    let pivot = median_of_three(seq, lo, lo + (hi - lo) / 2, hi - 1)?;
    seq.swap(lo, pivot)?;

    // [lo+1, lt) < pivot, [lt, eq) == pivot, [eq, hi) > pivot
    let mut lt = lo + 1;
    for k in lo + 1..hi {
        if seq.less(k, lo)? {
            seq.swap(lt, k)?;
            lt += 1;
        }
    }
    let mut eq = lt;
    for k in lt..hi {
        if seq.compare(k, lo)? == Ordering::Equal {
            seq.swap(eq, k)?;
            eq += 1;
        }
    }

    // Pivot joins the equal run
    seq.swap(lo, lt - 1)?;

    sort_range(seq, lo, lt - 1)?;
    sort_range(seq, eq, hi)
}

/// Index of the median value among positions `a`, `b`, `c`.
fn median_of_three(seq: &Tracked<'_>, mut a: usize, mut b: usize, c: usize) -> Step<usize> {
    if seq.less(b, a)? {
        std::mem::swap(&mut a, &mut b);
    }
    if seq.less(c, b)? {
        b = if seq.less(c, a)? { a } else { c };
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support;
    use sortscope_common::{Element, NoopHook};

    #[test]
    fn test_sorts() {
        test_support::check(quick_sort);
    }

    #[test]
    fn test_median_of_three() {
        let mut items: Vec<Element> = [7, 3, 5].into_iter().map(Element::new).collect();
        let seq = Tracked::new(&mut items, &NoopHook);
        assert_eq!(median_of_three(&seq, 0, 1, 2).unwrap(), 2);
    }
}
