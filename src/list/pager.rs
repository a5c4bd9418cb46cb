//! Page-number sequences and navigation bounds for list screens.

use std::collections::BTreeSet;
use std::fmt;

use crate::models::pagination::PaginationMeta;

/// Pages shown on each side of the current page.
pub const DEFAULT_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Page numbers to display for `current` out of `total_pages`.
///
/// Always contains page 1 and the last page, plus every page within `radius` of
/// `current`. A gap of one page is filled with that page; longer gaps become a single
/// [`PageItem::Ellipsis`]. `current` is expected to be in range already.
pub fn compute_page_sequence(current: u32, total_pages: u32, radius: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }

    let mut wanted = BTreeSet::from([1, total_pages]);
    let low = current.saturating_sub(radius).max(1);
    let high = current.saturating_add(radius).min(total_pages);
    wanted.extend(low..=high);

    let mut sequence = Vec::with_capacity(wanted.len() + 2);
    let mut last: Option<u32> = None;
    for page in wanted {
        if let Some(prev) = last {
            match page - prev {
                2 => sequence.push(PageItem::Page(prev + 1)),
                gap if gap > 2 => sequence.push(PageItem::Ellipsis),
                _ => {}
            }
        }
        sequence.push(PageItem::Page(page));
        last = Some(page);
    }
    sequence
}

/// Render a sequence as `1 2 [3] 4 … 10`.
pub fn render(sequence: &[PageItem], current: u32) -> String {
    sequence
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == current => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Previous/next/jump bounds for one page position.
///
/// Every method returns `None` when the move is not allowed; callers treat that as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub current: u32,
    pub total_pages: u32,
}

impl PageNav {
    pub fn new(current: u32, total_pages: u32) -> Self {
        Self {
            current,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    pub fn jump(&self, page: u32) -> Option<u32> {
        (page >= 1 && page <= self.total_pages && page != self.current).then_some(page)
    }

    pub fn sequence(&self) -> Vec<PageItem> {
        compute_page_sequence(self.current, self.total_pages, DEFAULT_RADIUS)
    }
}

impl From<&PaginationMeta> for PageNav {
    fn from(meta: &PaginationMeta) -> Self {
        Self::new(meta.current, meta.pages)
    }
}

/// 1-based inclusive bounds of the items on screen ("showing 11 to 20 of 23").
pub fn result_range(meta: &PaginationMeta, item_count: usize) -> Option<(u64, u64)> {
    if item_count == 0 || meta.total == 0 {
        return None;
    }
    let start = u64::from(meta.current.saturating_sub(1)) * u64::from(meta.limit) + 1;
    let end = (start + item_count as u64 - 1).min(meta.total);
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    fn pages(items: &[u32]) -> Vec<PageItem> {
        items.iter().map(|n| Page(*n)).collect()
    }

    #[test]
    fn middle_page_fills_single_gap_and_collapses_long_gap() {
        assert_eq!(
            compute_page_sequence(5, 10, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn near_start() {
        assert_eq!(
            compute_page_sequence(3, 10, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn both_sides_collapsed() {
        assert_eq!(
            compute_page_sequence(10, 20, 2),
            vec![Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn tiny_totals() {
        assert!(compute_page_sequence(1, 0, 2).is_empty());
        assert_eq!(compute_page_sequence(1, 1, 2), pages(&[1]));
        assert_eq!(compute_page_sequence(2, 4, 2), pages(&[1, 2, 3, 4]));
    }

    #[test]
    fn zero_radius() {
        assert_eq!(
            compute_page_sequence(4, 7, 0),
            vec![Page(1), Ellipsis, Page(4), Ellipsis, Page(7)]
        );
        assert_eq!(compute_page_sequence(3, 5, 0), pages(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn nav_bounds_are_no_ops() {
        let first = PageNav::new(1, 3);
        assert!(!first.has_previous());
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), Some(2));

        let last = PageNav::new(3, 3);
        assert_eq!(last.next(), None);
        assert_eq!(last.previous(), Some(2));

        assert_eq!(last.jump(0), None);
        assert_eq!(last.jump(4), None);
        assert_eq!(last.jump(3), None);
        assert_eq!(last.jump(1), Some(1));

        let empty = PageNav::new(1, 0);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }

    #[test]
    fn range_of_last_partial_page() {
        let meta = PaginationMeta {
            current: 3,
            pages: 3,
            total: 23,
            limit: 10,
        };
        assert_eq!(result_range(&meta, 3), Some((21, 23)));
        assert_eq!(result_range(&meta, 0), None);
    }

    #[test]
    fn render_marks_current() {
        assert_eq!(render(&compute_page_sequence(2, 6, 1), 2), "1 [2] 3 … 6");
    }
}
