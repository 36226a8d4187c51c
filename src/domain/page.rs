//! Pagination math over the `count/next/previous/results` envelope.

/// Page position of a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page number.
    pub page_number: u64,
    pub size: u64,
}

impl PageInfo {
    pub fn from_envelope(count: u64, offset: u64, size: u64) -> Self {
        if size == 0 {
            return Self {
                total_elements: count,
                total_pages: 0,
                page_number: 0,
                size,
            };
        }
        Self {
            total_elements: count,
            total_pages: count.div_ceil(size),
            page_number: offset / size,
            size,
        }
    }

    /// Offset of the first element on `page`.
    pub fn offset_for(&self, page: u64) -> u64 {
        page.saturating_mul(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.page_number + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_page_count_up() {
        let page = PageInfo::from_envelope(51, 25, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_number, 1);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.offset_for(2), 50);
    }

    #[test]
    fn last_page_has_no_next() {
        let page = PageInfo::from_envelope(50, 25, 25);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn zero_size_yields_no_pages() {
        let page = PageInfo::from_envelope(10, 0, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page_number, 0);
        assert!(!page.has_next());
    }
}
