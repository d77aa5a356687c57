use crate::{ArgumentError, Result};

/// A concrete (offset, count) window over an ordered result set, computed
/// from a total row count and a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page_number: i64,
    page_size: i64,
    first_item_index: i64,
    last_item_index: i64,
    is_empty: bool,
}

impl Page {
    /// Compute the window for 1-based `page_number` over `total_count` rows.
    ///
    /// The window is empty when it starts at or beyond the total; callers
    /// must then skip the items query entirely.
    pub fn compute(total_count: i64, page_number: i64, page_size: i64) -> Result<Self> {
        if page_number < 1 {
            return Err(ArgumentError::new("page_number must be 1 or greater").into());
        }
        if page_size < 0 {
            return Err(ArgumentError::new("page_size cannot be negative").into());
        }
        if total_count < 0 {
            return Err(ArgumentError::new("total_count cannot be negative").into());
        }
        let first_item_index = (page_number - 1).saturating_mul(page_size).max(0);
        let is_empty = first_item_index >= total_count || page_size == 0;
        let last_item_index = total_count.min(first_item_index + page_size) - 1;
        Ok(Self {
            page_number,
            page_size,
            first_item_index,
            last_item_index,
            is_empty,
        })
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 1
    }

    /// Zero-based index of the first row in the window.
    pub fn first_item_index(&self) -> i64 {
        self.first_item_index
    }

    /// Zero-based index of the last row in the window, clipped to the total.
    pub fn last_item_index(&self) -> i64 {
        self.last_item_index
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

/// One page of items together with the total count it was computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: Page,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: Page) -> Self {
        Self {
            items,
            total_count,
            page,
        }
    }

    /// The result of a page request whose window held no rows; produced
    /// without ever running the items query.
    pub fn empty(total_count: i64, page: Page) -> Self {
        Self {
            items: Vec::new(),
            total_count,
            page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn first_page_starts_at_zero() {
        let page = Page::compute(4, 1, 2).unwrap();
        assert!(page.is_first());
        assert!(!page.is_empty());
        assert_eq!(page.first_item_index(), 0);
        assert_eq!(page.last_item_index(), 1);
    }

    #[test]
    fn last_page_is_clipped_to_the_total() {
        let page = Page::compute(5, 3, 2).unwrap();
        assert!(!page.is_empty());
        assert_eq!(page.first_item_index(), 4);
        assert_eq!(page.last_item_index(), 4);
    }

    #[test]
    fn page_beyond_the_total_is_empty() {
        let page = Page::compute(4, 3, 2).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.first_item_index(), 4);
    }

    #[test]
    fn zero_sized_pages_are_empty() {
        let page = Page::compute(4, 1, 0).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn invalid_requests_are_rejected() {
        assert!(Page::compute(4, 0, 2).is_err());
        assert!(Page::compute(4, -1, 2).is_err());
        assert!(Page::compute(4, 1, -2).is_err());
        assert!(Page::compute(-1, 1, 2).is_err());
    }
}
