//! Pure filter → sort → paginate pipeline.
//!
//! Every derived view (home sections, collection grid, search results) goes
//! through the same transformation, parameterized by one [`QueryConfig`].
//! The pipeline never fails: unknown filter or sort strings degrade to the
//! "all"/default sentinels, and invalid page requests leave the current page
//! unchanged.

use medialist_models::{release_year, CollectionItem, MediaKind, Status};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(MediaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    TitleAsc,
    TitleDesc,
    YearDesc,
    YearAsc,
    RatingDesc,
}

impl FromStr for KindFilter {
    type Err = Infallible;

    // Unknown values degrade to All rather than erroring.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "movie" => KindFilter::Only(MediaKind::Movie),
            "series" => KindFilter::Only(MediaKind::Series),
            "book" => KindFilter::Only(MediaKind::Book),
            "game" => KindFilter::Only(MediaKind::Game),
            _ => KindFilter::All,
        })
    }
}

impl FromStr for StatusFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "completed" => StatusFilter::Only(Status::Completed),
            "in-progress" | "inprogress" => StatusFilter::Only(Status::InProgress),
            "pending" => StatusFilter::Only(Status::Pending),
            "abandoned" => StatusFilter::Only(Status::Abandoned),
            _ => StatusFilter::All,
        })
    }
}

impl FromStr for SortOption {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "title_desc" => SortOption::TitleDesc,
            "year_desc" => SortOption::YearDesc,
            "year_asc" => SortOption::YearAsc,
            "rating_desc" => SortOption::RatingDesc,
            _ => SortOption::TitleAsc,
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub kind: KindFilter,
    pub status: StatusFilter,
    /// Case-insensitive substring match against title or author; empty
    /// matches everything.
    pub search: String,
    pub sort: SortOption,
    /// 1-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            kind: KindFilter::All,
            status: StatusFilter::All,
            search: String::new(),
            sort: SortOption::TitleAsc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The bounded page slice.
    pub items: Vec<CollectionItem>,
    /// The page that was actually served.
    pub page: usize,
    pub total_pages: usize,
    /// Matched count before pagination.
    pub total_matched: usize,
}

fn matches(config: &QueryConfig, item: &CollectionItem) -> bool {
    if let KindFilter::Only(kind) = config.kind {
        if item.content.kind != kind {
            return false;
        }
    }
    if let StatusFilter::Only(status) = config.status {
        if item.status != status {
            return false;
        }
    }
    if !config.search.is_empty() {
        let needle = config.search.to_lowercase();
        let in_title = item.content.title.to_lowercase().contains(&needle);
        let in_author = item
            .content
            .author
            .as_deref()
            .map(|a| a.to_lowercase().contains(&needle))
            .unwrap_or(false);
        if !in_title && !in_author {
            return false;
        }
    }
    true
}

/// Filter stage: conjunction of the independent predicates.
pub fn filter(config: &QueryConfig, items: &[CollectionItem]) -> Vec<CollectionItem> {
    items
        .iter()
        .filter(|item| matches(config, item))
        .cloned()
        .collect()
}

/// Sort stage. `sort_by` is stable, so equal keys keep their input order.
pub fn sort(option: SortOption, items: &mut [CollectionItem]) {
    match option {
        SortOption::TitleAsc => items.sort_by(|a, b| title_key(a).cmp(&title_key(b))),
        SortOption::TitleDesc => items.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
        SortOption::YearDesc => {
            items.sort_by(|a, b| release_year(&b.content).cmp(&release_year(&a.content)))
        }
        SortOption::YearAsc => {
            items.sort_by(|a, b| release_year(&a.content).cmp(&release_year(&b.content)))
        }
        SortOption::RatingDesc => items.sort_by(|a, b| {
            rating_key(b)
                .partial_cmp(&rating_key(a))
                .unwrap_or(Ordering::Equal)
        }),
    }
}

fn title_key(item: &CollectionItem) -> String {
    item.content.title.to_lowercase()
}

// Missing rating sorts as 0, below every real rating.
fn rating_key(item: &CollectionItem) -> f32 {
    item.content.rating.unwrap_or(0.0)
}

/// `ceil(count / page_size)`, with one page for an empty set.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if count == 0 || page_size == 0 {
        1
    } else {
        (count + page_size - 1) / page_size
    }
}

/// Paginate stage: the 1-based `page` slice of `items`.
pub fn paginate(items: &[CollectionItem], page: usize, page_size: usize) -> Vec<CollectionItem> {
    let start = (page.max(1) - 1) * page_size;
    items.iter().skip(start).take(page_size).cloned().collect()
}

/// Run the full pipeline. An out-of-range `config.page` degrades to the
/// nearest valid page instead of erroring; views that must keep their
/// current page on an invalid request go through [`Pager::request`] first.
pub fn run(config: &QueryConfig, items: &[CollectionItem]) -> QueryResult {
    let mut matched = filter(config, items);
    sort(config.sort, &mut matched);

    let total_matched = matched.len();
    let total_pages = total_pages(total_matched, config.page_size);
    let page = config.page.clamp(1, total_pages);

    QueryResult {
        items: paginate(&matched, page, config.page_size),
        page,
        total_pages,
        total_matched,
    }
}

/// Current-page state for a view. Invalid requests are rejected and the
/// current page stays put.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    current: usize,
}

impl Pager {
    pub fn new() -> Self {
        Self { current: 1 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Accept `page` when `1 <= page <= total_pages`, otherwise keep the
    /// current page and report the rejection.
    pub fn request(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages {
            self.current = page;
            true
        } else {
            false
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

/// Home sections: the snapshot grouped by marked status, in the fixed
/// Completed / InProgress / Pending / Abandoned order, empty groups omitted.
pub fn group_by_status(items: &[CollectionItem]) -> Vec<(Status, Vec<CollectionItem>)> {
    Status::MARKED
        .iter()
        .filter_map(|&status| {
            let group: Vec<CollectionItem> = items
                .iter()
                .filter(|item| item.status == status)
                .cloned()
                .collect();
            if group.is_empty() {
                None
            } else {
                Some((status, group))
            }
        })
        .collect()
}
