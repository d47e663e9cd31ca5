//! Abstractions for client-side pagination.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rows shown per page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [Self; 4] = [Self::Ten, Self::Twenty, Self::Fifty, Self::Hundred];

    pub fn as_usize(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported page size `{0}` (expected 10, 20, 50 or 100)")]
pub struct PageSizeError(String);

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_usize() == value)
            .ok_or_else(|| PageSizeError(value.to_string()))
    }
}

impl FromStr for PageSize {
    type Err = PageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| PageSizeError(s.trim().to_owned()))
            .and_then(Self::try_from)
    }
}

/// The slice of `items` on 1-based `page`.
///
/// Page 0 is treated as page 1. A page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let offset = page.max(1).saturating_sub(1).saturating_mul(size);
    let start = offset.min(items.len());
    let end = offset.saturating_add(size).min(items.len());
    &items[start..end]
}

/// `ceil(count / size)`, or 0 when either is 0.
pub fn total_pages(count: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    count.div_ceil(size)
}

/// An entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

// Pages shown on each side of the current one.
const NEIGHBOURS: usize = 2;

/// Page numbers to render for `current` out of `total` pages.
///
/// Up to seven pages are all listed. Beyond that the first and last page are
/// always present, with the current page and two neighbours on each side in
/// between and an ellipsis wherever pages are skipped.
pub fn page_index_list(current: usize, total: usize) -> Vec<PageItem> {
    if total <= 7 {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current > NEIGHBOURS + 2 {
        items.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(NEIGHBOURS).max(2);
    let end = current.saturating_add(NEIGHBOURS).min(total - 1);
    items.extend((start..=end).map(PageItem::Page));

    if current < total - 3 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}

/// Current page and page size of a paginated view.
///
/// `current` is 1-based and kept within `[1, total_pages]` by
/// [`go_to`](Self::go_to); changing the size resets it to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    size: PageSize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            size: PageSize::default(),
        }
    }
}

impl PageState {
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.size.as_usize())
    }

    /// Moves to `page` if it exists for `count` items. Returns whether it moved.
    pub fn go_to(&mut self, page: usize, count: usize) -> bool {
        if page < 1 || page > self.total_pages(count) {
            return false;
        }
        self.current = page;
        true
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.current, self.size.as_usize())
    }
}
