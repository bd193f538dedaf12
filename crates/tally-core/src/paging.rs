//! # Paging
//!
//! Page math for sale listings.
//!
//! ```text
//! total_items = 23, size = 10
//!
//!   page 1 → items  1..=10
//!   page 2 → items 11..=20
//!   page 3 → items 21..=23
//!   page 4 → empty          total_pages = ceil(23 / 10) = 3
//! ```

use serde::{Deserialize, Serialize};

/// Default page size when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A requested page. Values below 1 are raised to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest { page, size }.normalized()
    }

    /// Clamps page and size to at least 1.
    pub fn normalized(self) -> Self {
        PageRequest {
            page: self.page.max(1),
            size: self.size.max(1),
        }
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> usize {
        let normalized = self.normalized();
        (normalized.page as usize - 1).saturating_mul(normalized.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_items: usize,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slices an already-ordered collection into the requested page.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::paging::{Page, PageRequest};
    ///
    /// let page = Page::paginate((1..=23).collect::<Vec<_>>(), PageRequest::new(3, 10));
    /// assert_eq!(page.data, vec![21, 22, 23]);
    /// assert_eq!(page.total_pages, 3);
    /// ```
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let request = request.normalized();
        let total_items = items.len();
        let total_pages = total_items.div_ceil(request.size as usize);

        let data = items
            .into_iter()
            .skip(request.offset())
            .take(request.size as usize)
            .collect();

        Page {
            data,
            total_items,
            current_page: request.page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    /// Converts the page's items, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total_items: self.total_items,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}
