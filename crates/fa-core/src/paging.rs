//! Pagination math
//!
//! Pages are 0-based. A result set of zero rows still has one conceptual
//! page: the view renders an empty state, not an error.

/// Number of pages needed for `total` rows at `page_size` rows per page
pub fn total_pages(total: u64, page_size: usize) -> usize {
    debug_assert!(page_size > 0);
    let pages = (total as usize).div_ceil(page_size);
    pages.max(1)
}

/// Clamp a requested page (which may be negative from a "previous" action on
/// page 0) into the valid range for the current total.
pub fn clamp_page(requested: i64, total: u64, page_size: usize) -> usize {
    let last = total_pages(total, page_size) - 1;
    requested.clamp(0, last as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_division() {
        assert_eq!(total_pages(0, 50), 1);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(135_156, 50), 2704);
    }

    #[test]
    fn clamps_both_ends() {
        // 135,156 rows at 50/page -> pages 0..=2703
        assert_eq!(clamp_page(2704, 135_156, 50), 2703);
        assert_eq!(clamp_page(-1, 135_156, 50), 0);
        assert_eq!(clamp_page(100, 135_156, 50), 100);
        // empty result set pins to page 0
        assert_eq!(clamp_page(5, 0, 50), 0);
    }
}
