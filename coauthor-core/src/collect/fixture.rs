// Offline source backed by a JSON file of records.
//
// File shape:
//   { "articles": [ { "id": "1", "authors": [ { "fore_name": "Ann", "last_name": "Lee" } ] } ] }
//
// Search matches an author when some entry's "Given Family" normalizes to the
// normalized query. Fetch returns the records for the requested ids, in
// request order.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::CollectError;
use crate::normalize::normalize;
use crate::types::{ArticleId, RawArticle};

use super::source::LiteratureSource;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    articles: Vec<RawArticle>,
    by_id: HashMap<ArticleId, usize>,
}

impl FixtureSource {
    pub fn new(articles: Vec<RawArticle>) -> Self {
        let mut by_id = HashMap::with_capacity(articles.len());
        for (i, article) in articles.iter().enumerate() {
            by_id.entry(article.id.clone()).or_insert(i);
        }
        Self { articles, by_id }
    }

    pub fn from_json(text: &str) -> Result<Self, CollectError> {
        let file: FixtureFile = serde_json::from_str(text)
            .map_err(|e| CollectError::Parse(format!("fixture JSON: {e}")))?;
        Ok(Self::new(file.articles))
    }

    pub fn from_path(path: &Path) -> Result<Self, CollectError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[async_trait::async_trait(?Send)]
impl LiteratureSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn search(&self, author: &str, max_results: u32) -> Result<Vec<ArticleId>, CollectError> {
        let key = normalize(author);
        Ok(self
            .articles
            .iter()
            .filter(|article| {
                article
                    .authors
                    .iter()
                    .filter_map(crate::types::RawAuthor::display_name)
                    .any(|name| normalize(&name) == key)
            })
            .map(|article| article.id.clone())
            .take(max_results as usize)
            .collect())
    }

    async fn fetch(&self, ids: &[ArticleId]) -> Result<Vec<RawArticle>, CollectError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|&i| self.articles[i].clone())
            .collect())
    }
}
