//! Article selection, filtering and ranking.
//!
//! Everything here works on collections that were already loaded from the
//! database, so it never fails: missing data just means fewer articles.

pub mod filter;
pub mod ranking;

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::models::{article::Article, reaction::ReactionKind};
pub use filter::{ArticleFilter, CategoryScope};
pub use ranking::{CategoryPreference, CategoryRecommendation, UserSignals};

/// Materialized inputs for one user's article listing.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    /// Every known article, in the order ties should keep.
    pub articles: Vec<Article>,
    pub hidden_category_ids: HashSet<i32>,
    pub hidden_keywords: Vec<String>,
    /// (article id, kind) -> number of reactions of that kind
    pub reaction_counts: HashMap<(i32, ReactionKind), usize>,
    pub signals: UserSignals,
    /// The user's enabled notification preferences.
    pub preferences: Vec<CategoryPreference>,
    /// The user's enabled keywords by category, regardless of preferences.
    pub keywords_by_category: HashMap<i32, Vec<String>>,
}

/// Produces the ordered article list for `filter`, relative to `today`.
pub fn recommend(catalog: &Catalog, filter: &ArticleFilter, today: NaiveDate) -> Vec<Article> {
    let baseline = filter::select_baseline(&catalog.articles, filter, today);
    let mut visible = filter::apply_visibility(
        baseline,
        &catalog.hidden_category_ids,
        &catalog.hidden_keywords,
    );

    if let Some(kind) = filter.sort_by {
        filter::sort_by_reactions(&mut visible, &catalog.reaction_counts, kind);
    }

    match filter.category {
        CategoryScope::Id(category_id) => rank_within_category(catalog, visible, category_id),
        CategoryScope::All if filter.search_text().is_some() => visible,
        CategoryScope::All => recommended_feed(catalog, &visible),
    }
}

/// Articles of one category: ones the user saved, read or liked first
/// (keyword-ranked when the user has keywords there), then the rest.
fn rank_within_category(catalog: &Catalog, visible: Vec<Article>, category_id: i32) -> Vec<Article> {
    let (mut signal, rest): (Vec<Article>, Vec<Article>) = visible
        .into_iter()
        .filter(|a| a.category_id == category_id)
        .partition(|a| catalog.signals.contains(a.id));

    if let Some(keywords) = catalog.keywords_by_category.get(&category_id) {
        ranking::rank_by_keywords(&mut signal, keywords);
    }

    signal.extend(rest);
    signal
}

/// Only categories the user has shown interest in, heaviest first.
fn recommended_feed(catalog: &Catalog, visible: &[Article]) -> Vec<Article> {
    let category_of: HashMap<i32, i32> = catalog
        .articles
        .iter()
        .map(|a| (a.id, a.category_id))
        .collect();
    let recommendations =
        ranking::build_category_ranking(&catalog.signals, &category_of, &catalog.preferences);

    let mut consumed: HashSet<i32> = HashSet::new();
    let mut feed = Vec::new();
    for rec in recommendations {
        if !consumed.insert(rec.category_id) {
            continue;
        }
        let mut in_category: Vec<Article> = visible
            .iter()
            .filter(|a| a.category_id == rec.category_id)
            .cloned()
            .collect();
        ranking::rank_by_keywords(&mut in_category, &rec.keywords);
        feed.extend(in_category);
    }

    log::debug!(
        "Recommended {} of {} visible articles across {} categories",
        feed.len(),
        visible.len(),
        consumed.len()
    );
    feed
}

#[cfg(test)]
mod tests {
    use super::*;

    const TECH: i32 = 10;
    const SPORTS: i32 = 20;
    const POLITICS: i32 = 30;

    fn article(id: i32, category_id: i32, title: &str) -> Article {
        Article {
            id,
            title: title.to_string(),
            description: String::new(),
            content: String::new(),
            url: format!("https://news.test/{id}"),
            published_at: 1_709_380_800,
            category_id,
            is_hidden: false,
        }
    }

    fn ids(articles: &[Article]) -> Vec<i32> {
        articles.iter().map(|a| a.id).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog {
            articles: vec![
                article(1, TECH, "AI chips"),
                article(2, TECH, "Rust compiler news"),
                article(3, SPORTS, "Cup final"),
                article(4, POLITICS, "Elections"),
                article(5, TECH, "AI and Rust"),
                article(6, SPORTS, "Transfer window"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let out = recommend(&Catalog::default(), &ArticleFilter::default(), today());
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_interest_means_empty_feed() {
        let out = recommend(&catalog(), &ArticleFilter::default(), today());
        assert!(out.is_empty());
    }

    #[test]
    fn test_search_skips_recommendation_pass() {
        let filter = ArticleFilter {
            search: Some("ai".to_string()),
            ..Default::default()
        };
        // no signals or preferences, yet the search results come back
        assert_eq!(ids(&recommend(&catalog(), &filter, today())), vec![1, 5]);
    }

    #[test]
    fn test_category_scope_puts_signal_articles_first() {
        let mut catalog = catalog();
        catalog.signals.saved = vec![5];
        catalog.signals.read = vec![3];
        let filter = ArticleFilter {
            category: CategoryScope::Id(TECH),
            ..Default::default()
        };
        assert_eq!(ids(&recommend(&catalog, &filter, today())), vec![5, 1, 2]);
    }

    #[test]
    fn test_category_scope_ranks_signals_by_keywords() {
        let mut catalog = catalog();
        catalog.signals.liked = vec![1, 2, 5];
        catalog
            .keywords_by_category
            .insert(TECH, vec!["rust".to_string(), "AI".to_string()]);
        let filter = ArticleFilter {
            category: CategoryScope::Id(TECH),
            ..Default::default()
        };
        assert_eq!(ids(&recommend(&catalog, &filter, today())), vec![5, 1, 2]);
    }

    #[test]
    fn test_category_scope_with_hidden_category_is_empty() {
        let mut catalog = catalog();
        catalog.hidden_category_ids.insert(SPORTS);
        let filter = ArticleFilter {
            category: CategoryScope::Id(SPORTS),
            ..Default::default()
        };
        assert!(recommend(&catalog, &filter, today()).is_empty());
    }

    #[test]
    fn test_default_feed_orders_categories_by_weight() {
        let mut catalog = catalog();
        catalog.signals.liked = vec![3];
        catalog.signals.read = vec![1, 2, 2];
        catalog.preferences = vec![CategoryPreference {
            category_id: POLITICS,
            keywords: vec![],
        }];
        let out = recommend(&catalog, &ArticleFilter::default(), today());
        // tech read 3 times, sports liked once, politics preference weight 1
        assert_eq!(ids(&out), vec![1, 2, 5, 3, 6, 4]);
    }

    #[test]
    fn test_default_feed_keyword_ranks_within_category() {
        let mut catalog = catalog();
        catalog.preferences = vec![CategoryPreference {
            category_id: TECH,
            keywords: vec!["rust".to_string()],
        }];
        let out = recommend(&catalog, &ArticleFilter::default(), today());
        assert_eq!(ids(&out), vec![2, 5, 1]);
    }

    #[test]
    fn test_default_feed_lists_shared_category_once() {
        let mut catalog = catalog();
        catalog.signals.liked = vec![1];
        catalog.signals.saved = vec![2];
        catalog.preferences = vec![CategoryPreference {
            category_id: TECH,
            keywords: vec!["rust".to_string()],
        }];
        let out = recommend(&catalog, &ArticleFilter::default(), today());
        assert_eq!(ids(&out), vec![2, 5, 1]);
    }

    #[test]
    fn test_hidden_keyword_wins_over_interest() {
        let mut catalog = catalog();
        catalog.signals.liked = vec![1];
        catalog.hidden_keywords = vec!["CHIPS".to_string()];
        let out = recommend(&catalog, &ArticleFilter::default(), today());
        assert_eq!(ids(&out), vec![2, 5]);
    }

    #[test]
    fn test_reaction_sort_carries_into_category_scope() {
        let mut catalog = catalog();
        catalog.reaction_counts.insert((2, ReactionKind::Like), 4);
        catalog.reaction_counts.insert((5, ReactionKind::Like), 1);
        let filter = ArticleFilter {
            category: CategoryScope::Id(TECH),
            sort_by: Some(ReactionKind::Like),
            ..Default::default()
        };
        assert_eq!(ids(&recommend(&catalog, &filter, today())), vec![2, 5, 1]);
    }
}
