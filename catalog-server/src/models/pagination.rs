//! Offset pagination for product listings

use serde::Deserialize;

use super::ValidationError;

/// Default number of records per listing
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest accepted `limit`
pub const MAX_LIMIT: i64 = 1000;

/// Validated offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: u64,
    limit: u64,
}

impl Page {
    /// Create a page window.
    ///
    /// Out-of-range values are rejected rather than clamped:
    /// - `skip` must be >= 0
    /// - `limit` must be within 1..=1000
    pub fn new(skip: i64, limit: i64) -> Result<Self, ValidationError> {
        if skip < 0 {
            return Err(ValidationError::OutOfRange {
                field: "skip",
                min: 0,
                max: i64::MAX,
            });
        }

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: MAX_LIMIT,
            });
        }

        Ok(Self {
            skip: skip as u64,
            limit: limit as u64,
        })
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        self.skip
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

/// Query parameters for listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<PageParams> for Page {
    type Error = ValidationError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        Self::new(params.skip.unwrap_or(0), params.limit.unwrap_or(DEFAULT_LIMIT))
    }
}
