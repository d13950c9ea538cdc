//! Page arithmetic shared by every list

use std::ops::Range;

/// Number of pages for `total` rows. Never less than 1.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Clamp `page` into `[1, total_pages]`
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Move `delta` pages from `page`, staying in range
pub fn step(page: u32, delta: i32, total_pages: u32) -> u32 {
    let target = i64::from(page) + i64::from(delta);
    let target = target.clamp(1, i64::from(total_pages.max(1)));
    u32::try_from(target).unwrap_or(1)
}

/// Index range of `page` within a fully loaded list of `len` rows
pub fn page_bounds(page: u32, page_size: u32, len: usize) -> Range<usize> {
    let size = page_size as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}
