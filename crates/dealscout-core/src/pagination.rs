//! Fixed-size paging over an already-ordered result collection.
//!
//! Page numbers are 1-based. Navigation bounds are the caller's concern:
//! anything past the end simply yields an empty page.

/// Default number of vehicles shown per results page.
pub const RESULTS_PER_PAGE: usize = 21;

/// Number of pages needed to show `total_items` at `page_size` per page.
#[must_use]
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Returns the `page_number`-th page (1-based) of `items`.
#[must_use]
pub fn page<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
