//! Offset pagination for catalog listings.
//!
//! Browsing a catalog is page-numbered (`page=3&pageSize=20`), so pages are
//! validated against configured [`PageLimits`] and turned into a
//! [`PageWindow`]: the half-open range `[start, end)` of the ordered result
//! sequence that belongs to the page.
//!
//! ```rust,ignore
//! let window = PageArgs { page: 2, page_size: 20 }.validate(&limits)?;
//! let items = &sorted[window.clamp(sorted.len())];
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Limits
// ============================================================================

/// Configured bounds for page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Page size used when the caller does not ask for one.
    pub default_page_size: u32,
    /// Largest page size a caller may ask for.
    pub max_page_size: u32,
}

impl PageLimits {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Result<Self, PageError> {
        if max_page_size == 0 {
            return Err(PageError::PageSizeOutOfRange {
                page_size: max_page_size,
                max: max_page_size,
            });
        }
        if default_page_size == 0 || default_page_size > max_page_size {
            return Err(PageError::PageSizeOutOfRange {
                page_size: default_page_size,
                max: max_page_size,
            });
        }
        Ok(Self {
            default_page_size,
            max_page_size,
        })
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page must be at least 1")]
    PageOutOfRange,

    #[error("pageSize {page_size} is outside 1..={max}")]
    PageSizeOutOfRange { page_size: u32, max: u32 },
}

/// Caller-supplied page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub page: u32,
    pub page_size: u32,
}

impl PageArgs {
    pub fn validate(&self, limits: &PageLimits) -> Result<PageWindow, PageError> {
        if self.page == 0 {
            return Err(PageError::PageOutOfRange);
        }
        if self.page_size == 0 || self.page_size > limits.max_page_size {
            return Err(PageError::PageSizeOutOfRange {
                page_size: self.page_size,
                max: limits.max_page_size,
            });
        }

        // u64 arithmetic: page and page_size are both u32, so this cannot overflow.
        let page_size = u64::from(self.page_size);
        let start = (u64::from(self.page) - 1) * page_size;

        Ok(PageWindow {
            page: self.page,
            page_size: self.page_size,
            start,
            end: start + page_size,
        })
    }
}

// ============================================================================
// Window
// ============================================================================

/// Validated slice of an ordered result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    /// First included position.
    pub start: u64,
    /// First excluded position.
    pub end: u64,
}

impl PageWindow {
    /// Clamps the window to a sequence of `len` items. Pages past the end
    /// produce an empty range.
    pub fn clamp(&self, len: usize) -> Range<usize> {
        let len64 = len as u64;
        let start = self.start.min(len64) as usize;
        let end = self.end.min(len64) as usize;
        start..end
    }

    /// Number of leading items that must be retained to serve this page,
    /// saturated to `usize`.
    pub fn retain_count(&self) -> usize {
        usize::try_from(self.end).unwrap_or(usize::MAX)
    }
}
