use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

use super::filter::{lowercase_all, SearchableText};
use crate::models::article::Article;

/// What a user has done with articles. Ids may repeat (one entry per read).
#[derive(Debug, Default, Clone)]
pub struct UserSignals {
    pub liked: Vec<i32>,
    pub saved: Vec<i32>,
    pub read: Vec<i32>,
}

impl UserSignals {
    pub fn contains(&self, article_id: i32) -> bool {
        self.liked.contains(&article_id) || self.saved.contains(&article_id) || self.read.contains(&article_id)
    }
}

/// An enabled notification preference and the user's enabled keywords for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub category_id: i32,
    pub keywords: Vec<String>,
}

/// Ephemeral ranking entry for the default pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecommendation {
    pub category_id: i32,
    pub weight: usize,
    pub keywords: Vec<String>,
}

/// Category with the most hits among `article_ids`, with its count. Ties go
/// to the category seen first.
pub fn most_frequent_category(
    article_ids: &[i32],
    category_of: &HashMap<i32, i32>,
) -> Option<(i32, usize)> {
    let mut order: Vec<i32> = Vec::new();
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for article_id in article_ids {
        let Some(&category_id) = category_of.get(article_id) else {
            continue;
        };
        let count = counts.entry(category_id).or_insert(0);
        if *count == 0 {
            order.push(category_id);
        }
        *count += 1;
    }

    let mut best: Option<(i32, usize)> = None;
    for category_id in order {
        let count = counts[&category_id];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((category_id, count));
        }
    }
    best
}

/// Liked, saved, read (first occurrence of a category wins), then enabled
/// preferences merged in; sorted by weight, heaviest first.
pub fn build_category_ranking(
    signals: &UserSignals,
    category_of: &HashMap<i32, i32>,
    preferences: &[CategoryPreference],
) -> Vec<CategoryRecommendation> {
    let mut ranking: Vec<CategoryRecommendation> = Vec::new();

    let sources = [&signals.liked, &signals.saved, &signals.read];
    for (category_id, weight) in sources
        .into_iter()
        .filter_map(|ids| most_frequent_category(ids, category_of))
    {
        if ranking.iter().any(|r| r.category_id == category_id) {
            continue;
        }
        ranking.push(CategoryRecommendation {
            category_id,
            weight,
            keywords: Vec::new(),
        });
    }

    for pref in preferences {
        match ranking.iter_mut().find(|r| r.category_id == pref.category_id) {
            Some(existing) => existing.keywords.extend(pref.keywords.iter().cloned()),
            None => ranking.push(CategoryRecommendation {
                category_id: pref.category_id,
                weight: 1,
                keywords: pref.keywords.clone(),
            }),
        }
    }

    ranking.sort_by_key(|r| Reverse(r.weight));
    ranking
}

/// Number of distinct keywords found in title, description or content.
pub fn keyword_match_count(article: &Article, keywords: &[String]) -> usize {
    let text = SearchableText::of(article);
    let mut seen: Vec<&str> = Vec::new();
    for keyword in keywords {
        if !seen.contains(&keyword.as_str()) && text.contains(keyword) {
            seen.push(keyword);
        }
    }
    seen.len()
}

/// Stable sort, most keyword matches first. No-op without keywords.
pub fn rank_by_keywords(articles: &mut [Article], keywords: &[String]) {
    let keywords = lowercase_all(keywords);
    if keywords.is_empty() {
        return;
    }
    articles.sort_by_cached_key(|a| Reverse(keyword_match_count(a, &keywords)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i32, title: &str, description: &str) -> Article {
        Article {
            id,
            title: title.to_string(),
            description: description.to_string(),
            content: String::new(),
            url: String::new(),
            published_at: 0,
            category_id: 1,
            is_hidden: false,
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_most_frequent_category() {
        let category_of = HashMap::from([(1, 10), (2, 20), (3, 20), (4, 10)]);
        assert_eq!(most_frequent_category(&[1, 2, 3], &category_of), Some((20, 2)));
        // tie: 10 seen first
        assert_eq!(most_frequent_category(&[1, 2, 3, 4], &category_of), Some((10, 2)));
        assert_eq!(most_frequent_category(&[], &category_of), None);
        // unknown article ids are skipped
        assert_eq!(most_frequent_category(&[99], &category_of), None);
    }

    #[test]
    fn test_duplicate_sources_appear_once() {
        let category_of = HashMap::from([(1, 10), (2, 10), (3, 20)]);
        let signals = UserSignals {
            liked: vec![1],
            saved: vec![2],
            read: vec![3, 3, 3],
        };
        let ranking = build_category_ranking(&signals, &category_of, &[]);
        let cats: Vec<(i32, usize)> = ranking.iter().map(|r| (r.category_id, r.weight)).collect();
        assert_eq!(cats, vec![(20, 3), (10, 1)]);
    }

    #[test]
    fn test_preferences_merge() {
        let category_of = HashMap::from([(1, 10), (2, 10)]);
        let signals = UserSignals {
            liked: vec![1, 2],
            ..Default::default()
        };
        let prefs = vec![
            CategoryPreference {
                category_id: 30,
                keywords: keywords(&["rust"]),
            },
            CategoryPreference {
                category_id: 10,
                keywords: keywords(&["ai"]),
            },
        ];
        let ranking = build_category_ranking(&signals, &category_of, &prefs);
        assert_eq!(
            ranking,
            vec![
                CategoryRecommendation {
                    category_id: 10,
                    weight: 2,
                    keywords: keywords(&["ai"]),
                },
                CategoryRecommendation {
                    category_id: 30,
                    weight: 1,
                    keywords: keywords(&["rust"]),
                },
            ]
        );
    }

    #[test]
    fn test_keyword_match_count_distinct() {
        let a = article(1, "Rust and AI", "more rust");
        assert_eq!(keyword_match_count(&a, &keywords(&["rust", "ai", "go"])), 2);
        assert_eq!(keyword_match_count(&a, &keywords(&["rust", "rust"])), 1);
    }

    #[test]
    fn test_rank_by_keywords_stable() {
        let mut articles = vec![
            article(1, "weather", ""),
            article(2, "AI chips", ""),
            article(3, "AI and Rust", ""),
            article(4, "rust belt", ""),
        ];
        rank_by_keywords(&mut articles, &keywords(&["AI", "Rust"]));
        let ids: Vec<i32> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }
}
