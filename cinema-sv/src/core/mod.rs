use serde::{Deserialize, Serialize};

use crate::core::error::Error;

pub mod action;
pub mod actor;
pub mod error;
pub mod filter;
pub mod genre;
pub mod hall;
pub mod movie;
pub mod order;
pub mod session;
pub mod ticket;
pub mod user;
pub mod validate;

pub const DEFAULT_PAGE_SIZE: i64 = 2;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw `page` and `page_size` query values, kept as text so bad input can be
/// answered the same way as a missing page.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PaginationParameters {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PaginationParameters {
    /// Page number, 1-based. Anything but a positive integer is an invalid page.
    pub fn page_number(&self) -> Result<i64, Error> {
        match &self.page {
            None => Ok(1),
            Some(raw) => raw.trim().parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or(Error::InvalidPageError),
        }
    }

    /// Requested page size capped at the maximum, falling back to the default.
    pub fn page_size(&self) -> i64 {
        self.explicit_page_size().unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Rows to skip for the requested page; a page too far out to address is invalid.
    pub fn offset(&self) -> Result<i64, Error> {
        self.page_number()?
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.page_size()))
            .ok_or(Error::InvalidPageError)
    }

    pub fn explicit_page_size(&self) -> Option<i64> {
        self.page_size.as_ref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|s| *s >= 1)
            .map(|s| s.min(MAX_PAGE_SIZE))
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Page<T> {
    pub page_number: i64,
    pub page_size: i64,
    pub count: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page_number.saturating_mul(self.page_size) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, page_size: Option<&str>) -> PaginationParameters {
        PaginationParameters {
            page: page.map(String::from),
            page_size: page_size.map(String::from),
        }
    }

    #[test]
    fn defaults_to_first_page_of_two() {
        let p = params(None, None);
        assert_eq!(p.page_number().unwrap(), 1);
        assert_eq!(p.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.explicit_page_size(), None);
    }

    #[test]
    fn page_size_is_capped() {
        assert_eq!(params(None, Some("50")).page_size(), 50);
        assert_eq!(params(None, Some("1000")).page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn bad_page_size_falls_back_to_default() {
        assert_eq!(params(None, Some("0")).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params(None, Some("-3")).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params(None, Some("lots")).page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn bad_page_is_invalid() {
        assert!(matches!(params(Some("0"), None).page_number(), Err(Error::InvalidPageError)));
        assert!(matches!(params(Some("two"), None).page_number(), Err(Error::InvalidPageError)));
        assert_eq!(params(Some("3"), None).page_number().unwrap(), 3);
    }

    #[test]
    fn offset_skips_earlier_pages() {
        assert_eq!(params(None, None).offset().unwrap(), 0);
        assert_eq!(params(Some("3"), Some("10")).offset().unwrap(), 20);
    }

    #[test]
    fn unaddressable_page_is_invalid() {
        let huge = params(Some("9223372036854775807"), None);
        assert_eq!(huge.page_number().unwrap(), i64::MAX);
        assert!(matches!(huge.offset(), Err(Error::InvalidPageError)));
        assert!(matches!(params(Some("9223372036854775807"), Some("100")).offset(), Err(Error::InvalidPageError)));
    }

    #[test]
    fn huge_page_has_no_next() {
        let page = Page { page_number: i64::MAX, page_size: 2, count: 5, items: Vec::<i32>::new() };
        assert!(!page.has_next());
    }

    #[test]
    fn page_neighbours() {
        let page = Page { page_number: 2, page_size: 2, count: 5, items: vec![3, 4] };
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page { page_number: 3, page_size: 2, count: 5, items: vec![5] };
        assert!(!last.has_next());

        let only = Page { page_number: 1, page_size: 2, count: 2, items: vec![1, 2] };
        assert!(!only.has_next());
        assert!(!only.has_previous());
    }
}
