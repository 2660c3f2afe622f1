//! Simple offset pagination shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination request, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub const MAX_LIMIT: usize = 100;

    /// Clamp raw query values: page >= 1, 1 <= limit <= MAX_LIMIT.
    pub fn clamped(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(20).clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

/// One page of results plus totals for the front end.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            pages: total.div_ceil(request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_and_limit() {
        let req = PageRequest::clamped(Some(0), Some(10_000));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, PageRequest::MAX_LIMIT);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn computes_page_count() {
        let req = PageRequest::clamped(Some(2), Some(20));
        let page = Page::new(vec![1, 2, 3], 43, req);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);
    }
}
