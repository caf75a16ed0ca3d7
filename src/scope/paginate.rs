//! Page/per-page pagination.

use serde::Serialize;

use super::Scope;
use crate::config::PaginationSettings;
use crate::params::ParamValues;

pub const PAGE_KEY: &str = "page";
pub const PER_PAGE_KEY: &str = "per_page";

/// Largest offset a dialect can render.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    /// Current page, starting at 1.
    pub page: u64,
    pub per_page: u64,
    /// `(page - 1) * per_page`, saturating at `i64::MAX`.
    pub offset: u64,
    /// Total records matching the query.
    pub total_entries_size: u64,
    /// Records returned for this page, at most `per_page`.
    pub current_entries_size: u64,
    pub total_pages: u64,
}

impl Paginator {
    /// Normalize `page` and `per_page`: a page below 1 becomes 1, a missing
    /// size becomes the default and sizes above the maximum are capped.
    pub fn new(page: i64, per_page: i64, settings: &PaginationSettings) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let per_page = u64::try_from(per_page)
            .ok()
            .filter(|p| *p >= 1)
            .unwrap_or(settings.default_per_page)
            .min(settings.max_per_page);

        Self {
            page,
            per_page,
            offset: (page - 1).saturating_mul(per_page).min(MAX_OFFSET),
            total_entries_size: 0,
            current_entries_size: 0,
            total_pages: 0,
        }
    }

    /// Build from `page` / `per_page` parameters. Unparsable values fall back
    /// to the defaults.
    pub fn from_params(params: &dyn ParamValues, settings: &PaginationSettings) -> Self {
        let parse = |key: &str, default: i64| {
            params
                .get_non_blank(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(default)
        };
        let default_per_page = i64::try_from(settings.default_per_page).unwrap_or(i64::MAX);
        Self::new(parse(PAGE_KEY, 1), parse(PER_PAGE_KEY, default_per_page), settings)
    }

    /// Record the totals of an executed listing.
    pub fn with_totals(mut self, total_entries: u64, current_entries: u64) -> Self {
        self.total_entries_size = total_entries;
        self.current_entries_size = current_entries;
        self.total_pages = total_entries.div_ceil(self.per_page.max(1));
        self
    }

    pub fn scope(&self) -> Scope {
        let (limit, offset) = (self.per_page, self.offset);
        Scope::new(move |q| q.offset(offset).limit(limit))
    }
}

pub fn for_paginate(page: i64, per_page: i64, settings: &PaginationSettings) -> Scope {
    Paginator::new(page, per_page, settings).scope()
}

pub fn for_paginate_from_params(params: &dyn ParamValues, settings: &PaginationSettings) -> Scope {
    Paginator::from_params(params, settings).scope()
}
