//! Quadratic and gap-insertion sorts. Slow enough to watch at any delay.

use sortscope_common::{Step, Tracked};
use std::cmp::Ordering;

/// Gap sequence for [`shell_sort`], largest first.
const SHELL_GAPS: [usize; 8] = [929, 505, 209, 109, 41, 19, 5, 1];

/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn shell_sort(seq: &mut Tracked<'_>) -> Step<()> {
    for gap in SHELL_GAPS {
        for i in gap..seq.len() {
            let held = seq.read(i)?;
            let mut j = i;
            while j >= gap && seq.compare_to(j - gap, &held)? == Ordering::Greater {
                let shifted = seq.read(j - gap)?;
                seq.write(j, &shifted)?;
                j -= gap;
            }
            seq.write(j, &held)?;
        }
    }
    Ok(())
}

/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn insertion_sort(seq: &mut Tracked<'_>) -> Step<()> {
    for i in 1..seq.len() {
        let mut j = i;
        while j >= 1 && seq.less(j, j - 1)? {
            seq.swap(j, j - 1)?;
            j -= 1;
        }
    }
    Ok(())
}

/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn selection_sort(seq: &mut Tracked<'_>) -> Step<()> {
    for i in 0..seq.len() {
        let mut min = i;
        for j in i + 1..seq.len() {
            if seq.less(j, min)? {
                min = j;
            }
        }
        seq.swap(min, i)?;
    }
    Ok(())
}

/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn bubble_sort(seq: &mut Tracked<'_>) -> Step<()> {
    while forward_pass(seq)? {}
    Ok(())
}

/// Bubble sort alternating direction on every pass.
///
/// # Errors
/// Forwards [`Cancelled`](sortscope_common::Cancelled).
pub fn cocktail_sort(seq: &mut Tracked<'_>) -> Step<()> {
    while forward_pass(seq)? && backward_pass(seq)? {}
    Ok(())
}

/// One left-to-right bubbling pass. Returns whether anything moved.
fn forward_pass(seq: &mut Tracked<'_>) -> Step<bool> {
    let mut swapped = false;
    for j in 1..seq.len() {
        if seq.less(j, j - 1)? {
            seq.swap(j, j - 1)?;
            swapped = true;
        }
    }
    Ok(swapped)
}

fn backward_pass(seq: &mut Tracked<'_>) -> Step<bool> {
    let mut swapped = false;
    for j in (1..seq.len()).rev() {
        if seq.less(j, j - 1)? {
            seq.swap(j, j - 1)?;
            swapped = true;
        }
    }
    Ok(swapped)
}
