use crate::error::{AppError, AppResult};

/// Which slice of a collection a paginated request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    /// `requested_page <= 0`: the caller asked for every item, unpaginated.
    All { max_page: u64 },
    /// A clamped page; `page` is always within `1..=max(max_page, 1)`.
    Page {
        page: u64,
        max_page: u64,
        page_size: u64,
    },
}

impl PageWindow {
    /// `ceil(total / page_size)`; zero for an empty collection.
    pub fn max_page(&self) -> u64 {
        match *self {
            PageWindow::All { max_page } | PageWindow::Page { max_page, .. } => max_page,
        }
    }

    pub fn effective_page(&self) -> Option<u64> {
        match *self {
            PageWindow::All { .. } => None,
            PageWindow::Page { page, .. } => Some(page),
        }
    }

    /// `(offset, limit)` for the selected page, `None` for the unpaginated
    /// sentinel.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        match *self {
            PageWindow::All { .. } => None,
            PageWindow::Page {
                page, page_size, ..
            } => Some(((page - 1) * page_size, page_size)),
        }
    }

    /// Applies the window to an already materialized collection.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.bounds() {
            None => items,
            Some((offset, limit)) => {
                let start = usize::try_from(offset).unwrap_or(usize::MAX).min(items.len());
                let end = start
                    .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
                    .min(items.len());
                &items[start..end]
            }
        }
    }
}

/// Computes the page window for `total_count` items.
///
/// Pages above the last one clamp to the last page. An empty collection
/// reports `max_page == 0` but still resolves to page 1. Non-positive
/// requests select everything.
pub fn clamp(total_count: u64, page_size: u64, requested_page: i64) -> AppResult<PageWindow> {
    if page_size == 0 {
        return Err(AppError::validation("page size must be positive"));
    }

    let max_page = total_count.div_ceil(page_size);

    if requested_page <= 0 {
        return Ok(PageWindow::All { max_page });
    }

    let page = (requested_page as u64).min(max_page.max(1));

    Ok(PageWindow::Page {
        page,
        max_page,
        page_size,
    })
}
