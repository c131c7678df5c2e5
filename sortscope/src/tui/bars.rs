//! Bar view of the sequence being sorted.
//!
//! One bar per element, indexed by [`Handle`]. Snapshots move bar heights and
//! highlight what the algorithm touched since the previous snapshot; the next
//! snapshot un-highlights them again, so an empty snapshot clears the view.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use sortscope_common::{Element, Handle};

use super::theme::{BAR, BAR_MARKED};
use crate::engine::Snapshot;

/// Block characters from one to eight eighths of a cell.
const EIGHTHS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// One terminal column worth of bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub value: i32,
    pub marked: bool,
}

#[derive(Debug, Default)]
pub struct BarsView {
    values: Vec<i32>,
    marked: Vec<bool>,
    /// Indices currently highlighted, so clearing does not scan every bar
    marked_list: Vec<usize>,
}

impl BarsView {
    #[must_use]
    pub fn from_sequence(items: &[Element]) -> Self {
        let mut view = Self::default();
        view.reset(items);
        view
    }

    /// Rebuild every bar from the sequence and drop all highlights.
    pub fn reset(&mut self, items: &[Element]) {
        self.values = items.iter().map(Element::value).collect();
        self.marked = vec![false; items.len()];
        self.marked_list.clear();
    }

    pub fn apply(&mut self, snapshot: &Snapshot) {
        for index in self.marked_list.drain(..) {
            self.marked[index] = false;
        }

        for (handle, value) in snapshot.assigned() {
            if let Some(index) = self.index_of(*handle) {
                self.values[index] = *value;
                self.mark(index);
            }
        }
        for handle in snapshot.touched() {
            if let Some(index) = self.index_of(*handle) {
                self.mark(index);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    #[must_use]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.marked_list.len()
    }

    /// Fit the bars into `width` columns.
    ///
    /// With room to spare each bar gets the same whole number of columns; with
    /// more bars than columns, neighbours share a column showing the tallest
    /// of them, highlighted if any of them is.
    #[must_use]
    pub fn columns(&self, width: u16) -> Vec<Column> {
        let width = usize::from(width);
        let count = self.values.len();
        if count == 0 || width == 0 {
            return Vec::new();
        }

        if count <= width {
            let per_bar = width / count;
            return (0..count)
                .flat_map(|i| {
                    let column = Column { value: self.values[i], marked: self.marked[i] };
                    std::iter::repeat(column).take(per_bar)
                })
                .collect();
        }

        (0..width)
            .map(|x| {
                let (start, end) = (x * count / width, (x + 1) * count / width);
                let end = end.max(start + 1);
                Column {
                    value: self.values[start..end].iter().copied().max().unwrap_or(0),
                    marked: self.marked[start..end].iter().any(|m| *m),
                }
            })
            .collect()
    }

    fn index_of(&self, handle: Handle) -> Option<usize> {
        let index = usize::try_from(handle.0).ok()?;
        (index < self.values.len()).then_some(index)
    }

    fn mark(&mut self, index: usize) {
        if !self.marked[index] {
            self.marked[index] = true;
            self.marked_list.push(index);
        }
    }

    /// Height of `value` in eighths of a cell, for an area `rows` tall.
    /// Values are `0..len`, so `len - 1` fills the area and `0` still shows.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn eighths(&self, value: i32, rows: u16) -> u32 {
        let scale = self.values.len().max(1) as f64;
        let fraction = ((f64::from(value) + 1.0) / scale).clamp(0.0, 1.0);
        (fraction * f64::from(rows) * 8.0).round() as u32
    }
}

impl Widget for &BarsView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (column, x) in self.columns(area.width).into_iter().zip(area.left()..area.right()) {
            let color = if column.marked { BAR_MARKED } else { BAR };
            let mut remaining = self.eighths(column.value, area.height);

            for y in (area.top()..area.bottom()).rev() {
                if remaining == 0 {
                    break;
                }
                let step = remaining.min(8);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(EIGHTHS[step as usize - 1]).set_fg(color);
                }
                remaining -= step;
            }
        }
    }
}
