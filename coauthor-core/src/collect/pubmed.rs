// PubMed E-utilities source: `esearch` (JSON) for identifiers, `efetch` (XML)
// for author lists.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::{Client, Request};
use serde::Deserialize;
use tracing::debug;

use crate::config::PubMedSection;
use crate::error::CollectError;
use crate::types::{ArticleId, RawArticle, RawAuthor};

use super::source::LiteratureSource;

const SEARCH_ENDPOINT: &str = "esearch.fcgi";
const FETCH_ENDPOINT: &str = "efetch.fcgi";

/// Client for the NCBI E-utilities `PubMed` database.
#[derive(Debug)]
pub struct PubMedSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    tool: Option<String>,
    email: Option<String>,
}

impl PubMedSource {
    pub fn from_config(config: &PubMedSection) -> Result<Self, CollectError> {
        // reqwest is built without a bundled crypto provider.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("coauthor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollectError::Network(format!("client setup: {e}")))?;

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            api_key: std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.is_empty()),
            tool: config.tool.clone(),
            email: config.email.clone(),
        })
    }

    /// Parameters NCBI asks every caller to send.
    fn identity_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("db", "pubmed".to_string())];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        params
    }

    /// A GET request for `endpoint` carrying the identity and call parameters.
    fn request(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Request, CollectError> {
        self.client
            .get(format!("{}{endpoint}", self.base_url))
            .query(&self.identity_params())
            .query(params)
            .build()
            .map_err(|e| CollectError::Network(format!("build request: {e}")))
    }

    fn search_request(&self, author: &str, max_results: u32) -> Result<Request, CollectError> {
        let params = [
            ("term", format!("{author}[Author]")),
            ("retmax", max_results.to_string()),
            ("retmode", "json".to_string()),
        ];
        self.request(SEARCH_ENDPOINT, &params)
    }

    fn fetch_request(&self, ids: &[ArticleId]) -> Result<Request, CollectError> {
        let joined = ids
            .iter()
            .map(|id| id.0.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let params = [("id", joined), ("retmode", "xml".to_string())];
        self.request(FETCH_ENDPOINT, &params)
    }

    async fn get_text(&self, request: Request) -> Result<String, CollectError> {
        debug!(url = %request.url(), "PubMed API request");

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| CollectError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CollectError::Network(format!("read body: {e}")))?;

        if !status.is_success() {
            return Err(CollectError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait::async_trait(?Send)]
impl LiteratureSource for PubMedSource {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    async fn search(&self, author: &str, max_results: u32) -> Result<Vec<ArticleId>, CollectError> {
        let body = self.get_text(self.search_request(author, max_results)?).await?;
        parse_search_response(&body)
    }

    async fn fetch(&self, ids: &[ArticleId]) -> Result<Vec<RawArticle>, CollectError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_text(self.fetch_request(ids)?).await?;
        parse_fetch_response(&body)
    }
}

// ── esearch ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    esearchresult: Option<SearchResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    #[serde(default, rename = "ERROR")]
    error: Option<String>,
}

/// Identifiers from an `esearch` JSON body. A body without a result section
/// is an empty search; a body carrying an error message is a failure.
pub fn parse_search_response(body: &str) -> Result<Vec<ArticleId>, CollectError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)
        .map_err(|e| CollectError::Parse(format!("esearch JSON: {e}")))?;

    if let Some(message) = envelope.error {
        return Err(CollectError::Rejected(message));
    }
    let Some(result) = envelope.esearchresult else {
        return Ok(Vec::new());
    };
    if let Some(message) = result.error {
        return Err(CollectError::Rejected(message));
    }
    Ok(result.idlist.into_iter().map(ArticleId).collect())
}

// ── efetch ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Field {
    Pmid,
    LastName,
    ForeName,
}

/// Records from an `efetch` XML body.
///
/// Every `Author` element anywhere under a `PubmedArticle` is taken, with its
/// `LastName` and `ForeName` children; either may be absent. The record id is
/// the first `PMID` seen inside the article.
pub fn parse_fetch_response(xml: &str) -> Result<Vec<RawArticle>, CollectError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut article: Option<RawArticle> = None;
    let mut author: Option<RawAuthor> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            CollectError::Parse(format!(
                "efetch XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"PubmedArticle" => article = Some(RawArticle::default()),
                b"Author" if article.is_some() => author = Some(RawAuthor::default()),
                b"LastName" if author.is_some() => field = Some(Field::LastName),
                b"ForeName" if author.is_some() => field = Some(Field::ForeName),
                b"PMID" if article.as_ref().is_some_and(|a| a.id.0.is_empty()) => {
                    field = Some(Field::Pmid);
                }
                _ => {}
            },
            Event::Text(text) => {
                if let Some(target) = field {
                    let value = text
                        .unescape()
                        .map_err(|e| CollectError::Parse(format!("efetch XML text: {e}")))?;
                    match target {
                        Field::Pmid => {
                            if let Some(a) = article.as_mut() {
                                a.id.0.push_str(&value);
                            }
                        }
                        Field::LastName => {
                            if let Some(a) = author.as_mut() {
                                a.last_name.get_or_insert_with(String::new).push_str(&value);
                            }
                        }
                        Field::ForeName => {
                            if let Some(a) = author.as_mut() {
                                a.fore_name.get_or_insert_with(String::new).push_str(&value);
                            }
                        }
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"PMID" | b"LastName" | b"ForeName" => field = None,
                b"Author" => {
                    if let (Some(done), Some(a)) = (author.take(), article.as_mut()) {
                        a.authors.push(done);
                    }
                }
                b"PubmedArticle" => {
                    if let Some(done) = article.take() {
                        articles.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(articles)
}
