//! Shared search workflow used by both CLI and TUI front-ends.
//!
//! URL state -> paging -> parameter builder -> API call -> page info
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::data::ApiClient;
use crate::domain::{PageInfo, Paginated, Partner, Partnership};
use crate::error::AppError;
use crate::query::{
    PARTNER_PAGING, PARTNERSHIP_PAGING, PagingKeys, RawQuery, SearchParams, partner_params, partnership_params,
};

/// One fetched page of search results.
#[derive(Debug, Clone)]
pub struct SearchOutput<T> {
    pub params: SearchParams,
    pub results: Paginated<T>,
    pub page: PageInfo,
}

/// Write one-based `page` of size `size` into the paging keys of `query`.
pub fn with_page(mut query: RawQuery, keys: PagingKeys, page: u64, size: u32) -> RawQuery {
    let offset = page.saturating_sub(1).saturating_mul(u64::from(size));
    query.insert(keys.limit, size.to_string());
    query.insert(keys.offset, offset.to_string());
    query
}

pub fn partners_page(query: RawQuery, page: u64, size: u32) -> RawQuery {
    with_page(query, PARTNER_PAGING, page, size)
}

pub fn partnerships_page(query: RawQuery, page: u64, size: u32) -> RawQuery {
    with_page(query, PARTNERSHIP_PAGING, page, size)
}

pub fn search_partners(client: &ApiClient, query: &RawQuery, size: u32) -> Result<SearchOutput<Partner>, AppError> {
    let params = partner_params(query);
    let results = client.search_partners(&params)?;
    info!(count = results.count, "partner search");
    Ok(output(params, results, size))
}

pub fn search_partnerships(
    client: &ApiClient,
    query: &RawQuery,
    size: u32,
) -> Result<SearchOutput<Partnership>, AppError> {
    let params = partnership_params(query);
    let results = client.search_partnerships(&params)?;
    info!(count = results.count, "partnership search");
    Ok(output(params, results, size))
}

fn output<T>(params: SearchParams, results: Paginated<T>, size: u32) -> SearchOutput<T> {
    let page = page_info(&params, results.count, size);
    SearchOutput { params, results, page }
}

/// Page position from the parameters that were actually sent.
pub fn page_info(params: &SearchParams, count: u64, fallback_size: u32) -> PageInfo {
    let size = params
        .limit
        .as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or(u64::from(fallback_size));
    let offset = params.offset.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0);
    PageInfo::from_envelope(count, offset, size)
}
