//! Catalog filters over session snapshots.

use gridportal_types::{
    NewsArticle, NewsCategory, OutageRecord, OutageStatus, TariffCategory, TariffEntry,
};

/// Outage search: substring over area and district, optional status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutageQuery {
    /// Case-insensitive substring; empty or `None` matches everything.
    pub search: Option<String>,
    /// Required status; `None` matches every status.
    pub status: Option<OutageStatus>,
}

impl OutageQuery {
    /// Whether `outage` satisfies the query.
    pub fn matches(&self, outage: &OutageRecord) -> bool {
        let needle = normalized(self.search.as_deref());
        let text_ok = needle.as_deref().is_none_or(|n| {
            contains_folded(&outage.area, n) || contains_folded(&outage.district, n)
        });
        text_ok && self.status.is_none_or(|s| outage.status == s)
    }

    /// Matching outages in their original order.
    pub fn apply(&self, outages: &[OutageRecord]) -> Vec<OutageRecord> {
        outages.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// News search: substring over title and excerpt, optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    /// Case-insensitive substring; empty or `None` matches everything.
    pub search: Option<String>,
    /// Required category; `None` matches every category.
    pub category: Option<NewsCategory>,
}

impl NewsQuery {
    /// Whether `article` satisfies the query.
    pub fn matches(&self, article: &NewsArticle) -> bool {
        let needle = normalized(self.search.as_deref());
        let text_ok = needle.as_deref().is_none_or(|n| {
            contains_folded(&article.title, n) || contains_folded(&article.excerpt, n)
        });
        text_ok && self.category.is_none_or(|c| article.category == c)
    }

    /// Matching articles in their original order.
    pub fn apply(&self, news: &[NewsArticle]) -> Vec<NewsArticle> {
        news.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

/// Tariffs in `category`, or all of them when `category` is `None`.
pub fn filter_tariffs(tariffs: &[TariffEntry], category: Option<TariffCategory>) -> Vec<TariffEntry> {
    tariffs
        .iter()
        .filter(|t| category.is_none_or(|c| t.category == c))
        .cloned()
        .collect()
}

/// Number of outages currently in progress.
pub fn active_outage_count(outages: &[OutageRecord]) -> usize {
    outages
        .iter()
        .filter(|o| o.status == OutageStatus::Ongoing)
        .count()
}

fn normalized(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
