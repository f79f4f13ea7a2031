/// Persistence
///
/// Postgres access for the administrator identity and blog content. Content
/// functions take the pool directly; the identity store sits behind the
/// `CredentialStore` trait so the auth core does not depend on Postgres.

pub mod articles;
pub mod says;
pub mod tags;
pub mod users;

pub use users::PgCredentialStore;

use serde::Deserialize;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// `?pageSize=&pageOffset=` as sent by the blog front end.
///
/// `pageOffset` is a 1-based page number, not a row offset.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    #[serde(rename = "pageOffset")]
    pub page_offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        let limit = match query.page_size {
            Some(size) if size > 0 => size.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        let page = match query.page_offset {
            Some(page) if page > 0 => page,
            _ => 1,
        };
        Self {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}
