use garde::Validate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// Pagination parameters: a 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Pageable {
    #[garde(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u64,
    #[garde(range(min = 1))]
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pageable {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero when there are no rows.
    pub fn last_page(&self, total: u64) -> u64 {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit)
        }
    }
}

/// Pagination metadata of a [`Page`].
///
/// `total_pages` carries the total number of matching rows, not a page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_pages: u64,
    pub page: u64,
    pub last_page: u64,
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Build a page; `total` must be a fresh count taken with the fetch.
    pub fn new(data: Vec<T>, pageable: &Pageable, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta {
                total_pages: total,
                page: pageable.page,
                last_page: pageable.last_page(total),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(Pageable::new(1, 10).offset(), 0);
        assert_eq!(Pageable::new(3, 25).offset(), 50);
    }

    #[test]
    fn last_page_rounds_up() {
        let pageable = Pageable::new(1, 10);
        assert_eq!(pageable.last_page(0), 0);
        assert_eq!(pageable.last_page(10), 1);
        assert_eq!(pageable.last_page(11), 2);
        assert_eq!(Pageable::new(1, 1).last_page(7), 7);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let pageable: Pageable = serde_json::from_str("{}").unwrap();
        assert_eq!(pageable, Pageable::default());
        let pageable: Pageable = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(pageable, Pageable::new(4, DEFAULT_LIMIT));
    }

    #[test]
    fn zero_page_or_limit_fails_validation() {
        assert!(Pageable::new(0, 10).validate().is_err());
        assert!(Pageable::new(1, 0).validate().is_err());
        assert!(Pageable::new(1, 1).validate().is_ok());
    }

    #[test]
    fn meta_serializes_camel_case() {
        let page = Page::new(vec![1, 2], &Pageable::new(2, 2), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [1, 2],
                "meta": {"totalPages": 5, "page": 2, "lastPage": 3}
            })
        );
    }
}
