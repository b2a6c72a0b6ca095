/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `users`: Profiles, own-account operations, subscriptions
/// - `tags`: Tag reference data
/// - `ingredients`: Ingredient reference data with name search
/// - `recipes`: Recipe CRUD with caller-relative filters
/// - `favourites`: Favorite toggle on recipes
/// - `shopping_cart`: Cart membership and the shopping-list PDF export

pub mod auth;
pub mod favourites;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod shopping_cart;
pub mod tags;
pub mod users;

use serde::{Deserialize, Serialize};

/// Common page/limit query parameters for paginated listings
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,

    /// Page size (default: 10, max: 100)
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Effective page size
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Row offset derived from the page number
    pub fn offset(&self) -> i64 {
        let page = self.page.unwrap_or(1).max(1);
        (page - 1) * self.limit()
    }
}

/// Paginated listing envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    /// Total number of matching rows
    pub count: i64,

    /// The requested page
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.limit(), 10);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_offset() {
        let query = PageQuery {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_page_query_clamps_limit() {
        let query = PageQuery {
            page: Some(1),
            limit: Some(100_000),
        };
        assert_eq!(query.limit(), 100);

        let query = PageQuery {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(query.limit(), 1);
        assert_eq!(query.offset(), 0);
    }
}
