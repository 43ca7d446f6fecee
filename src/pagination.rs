use serde::Serialize;

/// One page of a top-level collection, with the metadata the boundary
/// renders. Nested content attached to the items is never paginated.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub total_pages: u64,
    pub has_other_pages: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_number: u64, num_pages: u64) -> Self {
        let total_pages = num_pages.max(1);
        Page {
            items,
            page_number,
            // A last page still has pages before it.
            has_other_pages: total_pages > 1,
            total_pages,
        }
    }
}

/// Clamps a 1-based page request onto the valid range. Missing and
/// out-of-range numbers land on the nearest valid page; this policy
/// applies to every listing.
pub fn clamp_page(requested: Option<u64>, num_pages: u64) -> u64 {
    requested.unwrap_or(1).clamp(1, num_pages.max(1))
}

/// Cuts an in-memory collection into fixed-size pages. Used where the
/// ordering is computed app-side and a database LIMIT cannot apply.
pub fn paginate<T>(items: Vec<T>, requested: Option<u64>, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let num_pages = (items.len() as u64).div_ceil(page_size as u64);
    let page_number = clamp_page(requested, num_pages);
    let start = (page_number as usize - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    Page::new(items, page_number, num_pages)
}
