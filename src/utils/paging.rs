//! Splitting long values into fixed-width screen pages

use crate::decoder::error::{ParserError, ParserResult};

/// Number of pages `value` needs at `page_width` characters per page
///
/// An empty value still occupies one page.
pub fn page_count(value: &str, page_width: usize) -> usize {
    let width = page_width.max(1);
    value.chars().count().div_ceil(width).max(1)
}

/// Return page `page_idx` of `value` and the total page count
pub fn page_string(value: &str, page_width: usize, page_idx: usize) -> ParserResult<(String, u8)> {
    let width = page_width.max(1);
    let pages = page_count(value, width);
    if page_idx >= pages {
        return Err(ParserError::DisplayPageOutOfRange);
    }
    let count = u8::try_from(pages).map_err(|_| ParserError::ValueOutOfRange)?;
    let page = value.chars().skip(page_idx * width).take(width).collect();
    Ok((page, count))
}
