use serde::{Deserialize, Serialize};

/// Query parameters accepted by every paginated listing.
///
/// The raw value is kept as a string: absent or non-numeric input falls back
/// to the first page instead of failing the request.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(1)
    }
}

/// The window of an ordered listing that one page covers.
///
/// Pure arithmetic over (total item count, page size, requested page).
/// Out-of-range requests clamp to the nearest valid page; they never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageWindow {
    pub fn new(total_items: i64, per_page: i64, requested: i64) -> Self {
        let per_page = per_page.max(1);
        let total_items = total_items.max(0);
        // An empty listing still renders as one (empty) first page.
        let total_pages = ((total_items + per_page - 1) / per_page).max(1);
        let number = requested.clamp(1, total_pages);
        Self {
            number,
            per_page,
            total_items,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One bounded slice of an ordered listing, plus the navigation metadata
/// the rendering collaborator needs.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn assemble(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            per_page: window.per_page,
            total_items: window.total_items,
            total_pages: window.total_pages,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Number of items the window would actually slice out of a listing
    /// of `window.total_items` elements.
    fn items_on_page(window: PageWindow) -> i64 {
        (window.total_items - window.offset()).clamp(0, window.limit())
    }

    #[test]
    fn page_count_is_ceil_of_total_over_size() {
        for per_page in 1..=7 {
            for total in 0..=50 {
                let window = PageWindow::new(total, per_page, 1);
                let expected = if total == 0 {
                    1
                } else {
                    (total + per_page - 1) / per_page
                };
                assert_eq!(window.total_pages, expected, "total={total} per_page={per_page}");
            }
        }
    }

    #[test]
    fn last_page_holds_the_remainder() {
        for per_page in 1..=7 {
            for total in 1..=50 {
                let window = PageWindow::new(total, per_page, i64::MAX);
                assert_eq!(window.number, window.total_pages);
                let expected = if total % per_page == 0 {
                    per_page
                } else {
                    total % per_page
                };
                assert_eq!(items_on_page(window), expected, "total={total} per_page={per_page}");
            }
        }
    }

    #[test]
    fn beyond_last_clamps_to_last_page() {
        let window = PageWindow::new(13, 10, 99);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset(), 10);
        assert_eq!(items_on_page(window), 3);
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[test]
    fn zero_and_negative_clamp_to_first_page() {
        for requested in [0, -1, -99] {
            let window = PageWindow::new(13, 10, requested);
            assert_eq!(window.number, 1);
            assert_eq!(window.offset(), 0);
            assert!(window.has_next());
            assert!(!window.has_previous());
        }
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let window = PageWindow::new(0, 10, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.number, 1);
        assert_eq!(items_on_page(window), 0);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn absent_and_garbage_query_values_default_to_one() {
        assert_eq!(PageQuery::default().number(), 1);
        for raw in ["", "abc", "2x", "1.5"] {
            let query = PageQuery {
                page: Some(raw.to_string()),
            };
            assert_eq!(query.number(), 1, "raw={raw:?}");
        }
        let query = PageQuery {
            page: Some(" 3 ".to_string()),
        };
        assert_eq!(query.number(), 3);
    }

    #[test]
    fn assembled_page_carries_window_metadata() {
        let window = PageWindow::new(13, 10, 2);
        let page = Page::assemble(vec!["a", "b", "c"], window);
        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 13);
        assert!(!page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.items.len(), 3);
    }
}
