use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::models::{
    ComponentKind, ComponentList, CpuDetail, FilterSelection, FilterVocabulary, SortKey,
};
use crate::storage::FilterStore;
use crate::utils::http::PageFetcher;

mod detail;
mod filters;
mod listing;

pub use detail::{
    parse_cpu_detail, parse_gpu_power_rating, MEMORY_CAPTION, PCIE_CAPTION, RATED_SPEED_CAPTION,
    TDP_TERM,
};
pub use filters::parse_filter_vocabulary;
pub use listing::{build_query, parse_listing, validate_selection, LEADING_NON_DATA_ROWS};
pub use crate::parsers::socket::socket_name;

/// Extraction front end for the specs database. Every call fetches what it
/// needs and keeps nothing between calls.
pub struct SpecsScraper<F> {
    config: Arc<Config>,
    fetcher: F,
}

impl<F: PageFetcher> SpecsScraper<F> {
    pub fn new(config: Arc<Config>, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn listing_url(&self, kind: ComponentKind) -> Result<String> {
        self.config
            .listing_url(kind)
            .ok_or_else(|| ExtractError::UnsupportedComponent(kind.to_string()))
    }

    /// Checks caller input in order: kind, its configured listing, sort key.
    fn parse_request(&self, kind: &str, sort: &str) -> Result<(ComponentKind, SortKey)> {
        let kind: ComponentKind = kind.parse()?;
        self.listing_url(kind)?;
        let sort: SortKey = sort.parse()?;
        Ok((kind, sort))
    }

    /// Filter fields and their selectable values for `kind`.
    pub async fn discover_filters(&self, kind: ComponentKind) -> Result<FilterVocabulary> {
        let url = self.listing_url(kind)?;
        info!("Discovering {} filters from {}", kind, url);

        let html = self.fetcher.fetch(&url).await?;
        let vocabulary = parse_filter_vocabulary(&html);

        info!("Found {} filter fields for {}", vocabulary.len(), kind);
        Ok(vocabulary)
    }

    /// Listing entry point for unvalidated caller input: `kind` and `sort`
    /// are checked, in that order, before anything is fetched.
    pub async fn list_components(
        &self,
        kind: &str,
        selection: Option<&FilterSelection>,
        sort: &str,
    ) -> Result<ComponentList> {
        let (kind, sort) = self.parse_request(kind, sort)?;
        self.list(kind, selection, sort).await
    }

    /// Like [`list_components`](Self::list_components), but validates
    /// `selection` against the vocabulary in `store` when one is stored for
    /// the kind. An empty or unreadable store falls back to live discovery.
    pub async fn list_components_with_store<S>(
        &self,
        kind: &str,
        selection: Option<&FilterSelection>,
        sort: &str,
        store: &S,
    ) -> Result<ComponentList>
    where
        S: FilterStore + ?Sized,
    {
        let (kind, sort) = self.parse_request(kind, sort)?;

        if selection.is_some() {
            match store.load_vocabulary(kind).await {
                Ok(Some(vocabulary)) => {
                    info!("Validating filters against stored {} vocabulary", kind);
                    return self
                        .list_with_vocabulary(kind, selection, sort, &vocabulary)
                        .await;
                }
                Ok(None) => {}
                Err(e) => warn!("Could not read stored filters: {}", e),
            }
        }

        self.list(kind, selection, sort).await
    }

    /// Lists `kind`, validating `selection` against freshly discovered filters.
    pub async fn list(
        &self,
        kind: ComponentKind,
        selection: Option<&FilterSelection>,
        sort: SortKey,
    ) -> Result<ComponentList> {
        self.listing_url(kind)?;
        match selection {
            Some(selection) => {
                let vocabulary = self.discover_filters(kind).await?;
                self.list_with_vocabulary(kind, Some(selection), sort, &vocabulary)
                    .await
            }
            None => self.fetch_listing(kind, None, sort).await,
        }
    }

    /// Lists `kind`, validating `selection` against a vocabulary the caller
    /// already holds (for instance one loaded from storage).
    pub async fn list_with_vocabulary(
        &self,
        kind: ComponentKind,
        selection: Option<&FilterSelection>,
        sort: SortKey,
        vocabulary: &FilterVocabulary,
    ) -> Result<ComponentList> {
        self.listing_url(kind)?;
        if let Some(selection) = selection {
            validate_selection(selection, vocabulary)?;
        }
        self.fetch_listing(kind, selection, sort).await
    }

    async fn fetch_listing(
        &self,
        kind: ComponentKind,
        selection: Option<&FilterSelection>,
        sort: SortKey,
    ) -> Result<ComponentList> {
        let url = format!("{}{}", self.listing_url(kind)?, build_query(selection, sort));
        info!("Fetching {} listing: {}", kind, url);

        let html = self.fetcher.fetch(&url).await?;
        let records = parse_listing(&html, &self.config.base_url)?;

        info!("Found {} {} records", records.len(), kind);
        Ok(ComponentList { kind, records })
    }

    /// Bus interface and memory support from a CPU detail page.
    pub async fn cpu_detail(&self, link: &str) -> Result<CpuDetail> {
        info!("Fetching CPU details: {}", link);
        let html = self.fetcher.fetch(link).await?;
        parse_cpu_detail(&html)
    }

    /// TDP in watts from a GPU detail page.
    pub async fn gpu_power_rating(&self, link: &str) -> Result<u32> {
        info!("Fetching GPU details: {}", link);
        let html = self.fetcher.fetch(link).await?;
        parse_gpu_power_rating(&html)
    }
}
