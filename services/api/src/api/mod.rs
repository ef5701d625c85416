//! Restaurant HTTP API module.
//!
//! # Purpose
//! Exposes the route handler modules and the paging helper shared by every
//! list endpoint.
//!
//! # Handler contract
//! Each handler resolves the caller, loads what it needs, then checks the
//! authorizer before touching state:
//! - reads check every returned record and fail the whole request on the
//!   first denial;
//! - writes on existing records load the record first, so a missing record is
//!   404 even for callers who could not have seen it;
//! - creates check either the bare resource kind or the submitted payload,
//!   depending on whether the granting rule needs ownership data.
pub mod addresses;
pub mod cart;
pub mod categories;
pub mod dishes;
pub mod error;
pub mod openapi;
pub mod order_items;
pub mod orders;
pub mod reservations;
pub mod reviews;
pub mod roles;
pub mod statuses;
pub mod system;
pub mod tables;
pub mod types;
pub mod users;

use crate::api::types::Page;

pub const MAX_PAGE_SIZE: u32 = 100;

/// Cut one page out of a full result set.
///
/// `page` is 1-based; `limit` falls back to `default_limit` and is clamped to
/// `1..=MAX_PAGE_SIZE`.
pub(crate) fn paginate<T>(
    items: Vec<T>,
    page: Option<u32>,
    limit: Option<u32>,
    default_limit: u32,
) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    let total = items.len();
    let skip = (page as usize - 1).saturating_mul(limit as usize);
    let items = items.into_iter().skip(skip).take(limit as usize).collect();
    Page {
        items,
        page,
        limit,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_defaults_to_first_page() {
        let page = paginate((1..=30).collect(), None, None, 20);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0], 1);
        assert_eq!((page.page, page.limit, page.total), (1, 20, 30));
    }

    #[test]
    fn paginate_skips_earlier_pages() {
        let page = paginate((1..=30).collect(), Some(2), Some(20), 20);
        assert_eq!(page.items, (21..=30).collect::<Vec<_>>());
    }

    #[test]
    fn paginate_clamps_limit_and_page() {
        let page = paginate((1..=300).collect::<Vec<i32>>(), Some(0), Some(1000), 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.items.len(), MAX_PAGE_SIZE as usize);

        let page = paginate((1..=3).collect::<Vec<i32>>(), Some(1), Some(0), 20);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = paginate((1..=3).collect::<Vec<i32>>(), Some(5), Some(2), 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
