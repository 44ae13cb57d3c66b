//! This modules defines the common functionality for paging list responses.
//!
//! Paging is opt-in: a list endpoint returns every result as a plain JSON
//! array unless the client asks for a `page` or a `page_size`.

use serde::{Deserialize, Serialize};

use crate::{Error, validation::non_blank};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of results per page when the client only sends `page`.
    pub default_page_size: u64,
    /// The upper bound for a client supplied `page_size`.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// The paging query parameters of a list request.
///
/// Blank parameters are treated as absent, like the list filters.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<String>,
    /// Number of results per page.
    pub page_size: Option<String>,
}

fn parse_count(field: &'static str, value: Option<&String>) -> Result<Option<u64>, Error> {
    non_blank(value.cloned())
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::validation(field, "A valid integer is required."))
        })
        .transpose()
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Number of results per page, never more than [PaginationConfig::max_page_size].
    pub page_size: u64,
}

impl PageRequest {
    /// Build a page request from the query, or `None` when the client did
    /// not ask for paging.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `page` or `page_size` is not a
    /// positive integer.
    pub fn from_query(query: &PageQuery, config: &PaginationConfig) -> Result<Option<Self>, Error> {
        let page = parse_count("page", query.page.as_ref())?;
        let page_size = parse_count("page_size", query.page_size.as_ref())?;

        if page.is_none() && page_size.is_none() {
            return Ok(None);
        }

        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(Error::validation("page", "Invalid page."));
        }

        let page_size = match page_size {
            Some(0) => {
                return Err(Error::validation(
                    "page_size",
                    "Ensure this value is greater than or equal to 1.",
                ));
            }
            Some(page_size) => page_size.min(config.max_page_size),
            None => config.default_page_size,
        };

        Ok(Some(Self { page, page_size }))
    }

    /// The number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The maximum number of rows to return.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Cut this page out of the full result set.
    pub fn slice<T>(&self, results: Vec<T>) -> Page<T> {
        let count = results.len() as u64;
        let results = results
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit()).unwrap_or(usize::MAX))
            .collect();

        Page {
            count,
            page: self.page,
            page_size: self.page_size,
            results,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The total number of results across all pages.
    pub count: u64,
    /// 1-based page number.
    pub page: u64,
    /// Number of results per page.
    pub page_size: u64,
    /// The results on this page, empty past the last page.
    pub results: Vec<T>,
}

/// The body of a list response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// Every result, serialized as a plain array.
    All(Vec<T>),
    /// One page of results, serialized as an object with the total count.
    Page(Page<T>),
}

#[cfg(test)]
mod pagination_tests {
    use serde_json::json;

    use crate::{
        Error,
        pagination::{Listing, PageQuery, PageRequest, PaginationConfig},
    };

    fn query(page: Option<u64>, page_size: Option<u64>) -> PageQuery {
        PageQuery {
            page: page.map(|page| page.to_string()),
            page_size: page_size.map(|page_size| page_size.to_string()),
        }
    }

    fn raw_query(page: &str, page_size: &str) -> PageQuery {
        PageQuery {
            page: Some(page.to_owned()),
            page_size: Some(page_size.to_owned()),
        }
    }

    #[test]
    fn blank_parameters_are_absent() {
        let request = PageRequest::from_query(&raw_query("", " "), &PaginationConfig::default());

        assert_eq!(request, Ok(None));
    }

    #[test]
    fn non_integer_parameters_name_their_field() {
        let config = PaginationConfig::default();

        assert_eq!(
            PageRequest::from_query(&raw_query("two", ""), &config),
            Err(Error::validation("page", "A valid integer is required."))
        );
        assert_eq!(
            PageRequest::from_query(&raw_query("", "-1"), &config),
            Err(Error::validation("page_size", "A valid integer is required."))
        );
    }

    #[test]
    fn no_paging_without_parameters() {
        let request = PageRequest::from_query(&query(None, None), &PaginationConfig::default());

        assert_eq!(request, Ok(None));
    }

    #[test]
    fn page_only_uses_default_size() {
        let request =
            PageRequest::from_query(&query(Some(3), None), &PaginationConfig::default()).unwrap();

        assert_eq!(
            request,
            Some(PageRequest {
                page: 3,
                page_size: 10
            })
        );
    }

    #[test]
    fn page_size_only_starts_at_first_page() {
        let request =
            PageRequest::from_query(&query(None, Some(5)), &PaginationConfig::default()).unwrap();

        assert_eq!(
            request,
            Some(PageRequest {
                page: 1,
                page_size: 5
            })
        );
    }

    #[test]
    fn page_size_is_clamped() {
        let request =
            PageRequest::from_query(&query(Some(1), Some(1000)), &PaginationConfig::default())
                .unwrap()
                .unwrap();

        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn zero_values_are_rejected() {
        let config = PaginationConfig::default();

        assert!(matches!(
            PageRequest::from_query(&query(Some(0), None), &config),
            Err(Error::Validation { field: "page", .. })
        ));
        assert!(matches!(
            PageRequest::from_query(&query(None, Some(0)), &config),
            Err(Error::Validation {
                field: "page_size",
                ..
            })
        ));
    }

    #[test]
    fn slice_returns_requested_page() {
        let request = PageRequest {
            page: 2,
            page_size: 2,
        };

        let page = request.slice(vec![1, 2, 3, 4, 5]);

        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec![3, 4]);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let request = PageRequest {
            page: 9,
            page_size: 2,
        };

        let page = request.slice(vec![1, 2, 3]);

        assert_eq!(page.count, 3);
        assert!(page.results.is_empty());
    }

    #[test]
    fn listing_serializes_as_array_or_object() {
        let all = serde_json::to_value(Listing::All(vec![1, 2])).unwrap();
        let page = serde_json::to_value(Listing::Page(
            PageRequest {
                page: 1,
                page_size: 1,
            }
            .slice(vec![1, 2]),
        ))
        .unwrap();

        assert_eq!(all, json!([1, 2]));
        assert_eq!(
            page,
            json!({"count": 2, "page": 1, "page_size": 1, "results": [1]})
        );
    }
}
