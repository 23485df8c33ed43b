use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::clock::date_of;
use crate::models::{article::Article, reaction::ReactionKind};

/// Which categories a request covers. `All` is the "no category chosen"
/// sentinel and triggers the default recommendation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i32>", into = "Option<i32>")]
pub enum CategoryScope {
    #[default]
    All,
    Id(i32),
}

impl From<Option<i32>> for CategoryScope {
    fn from(value: Option<i32>) -> Self {
        match value {
            Some(id) => CategoryScope::Id(id),
            None => CategoryScope::All,
        }
    }
}

impl From<CategoryScope> for Option<i32> {
    fn from(value: CategoryScope) -> Self {
        match value {
            CategoryScope::All => None,
            CategoryScope::Id(id) => Some(id),
        }
    }
}

/// Request-side knobs for article listing. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleFilter {
    pub search: Option<String>,
    pub today: bool,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: CategoryScope,
    pub sort_by: Option<ReactionKind>,
}

impl ArticleFilter {
    /// Search text, or `None` when absent or blank.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Lowercased copy of the searchable fields of an article.
pub(crate) struct SearchableText {
    title: String,
    description: String,
    content: String,
}

impl SearchableText {
    pub(crate) fn of(article: &Article) -> Self {
        Self {
            title: article.title.to_lowercase(),
            description: article.description.to_lowercase(),
            content: article.content.to_lowercase(),
        }
    }

    /// `needle` must already be lowercase.
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.description.contains(needle) || self.content.contains(needle)
    }
}

pub(crate) fn lowercase_all(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Picks the candidate set: search, then today, then date range, else all.
pub fn select_baseline(articles: &[Article], filter: &ArticleFilter, today: NaiveDate) -> Vec<Article> {
    if let Some(search) = filter.search_text() {
        let needle = search.to_lowercase();
        return articles
            .iter()
            .filter(|a| SearchableText::of(a).contains(&needle))
            .cloned()
            .collect();
    }

    if filter.today {
        return articles
            .iter()
            .filter(|a| date_of(a.published_at) == Some(today))
            .cloned()
            .collect();
    }

    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        return articles
            .iter()
            .filter(|a| date_of(a.published_at).is_some_and(|d| from <= d && d <= to))
            .cloned()
            .collect();
    }

    articles.to_vec()
}

/// Drops hidden articles, articles in hidden categories and articles that
/// mention any hidden keyword. Applied to every candidate set.
pub fn apply_visibility(
    articles: Vec<Article>,
    hidden_category_ids: &HashSet<i32>,
    hidden_keywords: &[String],
) -> Vec<Article> {
    let hidden_keywords = lowercase_all(hidden_keywords);
    articles
        .into_iter()
        .filter(|a| !a.is_hidden)
        .filter(|a| !hidden_category_ids.contains(&a.category_id))
        .filter(|a| {
            if hidden_keywords.is_empty() {
                return true;
            }
            let text = SearchableText::of(a);
            !hidden_keywords.iter().any(|k| text.contains(k))
        })
        .collect()
}

/// Stable sort, most reactions of `kind` first.
pub fn sort_by_reactions(
    articles: &mut [Article],
    reaction_counts: &HashMap<(i32, ReactionKind), usize>,
    kind: ReactionKind,
) {
    articles.sort_by_cached_key(|a| {
        std::cmp::Reverse(reaction_counts.get(&(a.id, kind)).copied().unwrap_or(0))
    });
}
