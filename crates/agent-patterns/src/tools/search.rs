//! Web search tool over a pluggable backend
//!
//! No real search API is bundled. [`StaticSearchBackend`] serves a fixed
//! corpus, which is enough for tests and offline runs; a networked backend
//! only has to implement [`SearchBackend`].

use agent_core::{Error, Result, RunContext};
use agent_llm::tools::schema;
use agent_tools::{Tool, ToolOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Tool name as the model sees it
pub const SEARCH_TOOL: &str = "web_search";

const BUNDLED_CORPUS: &str = include_str!("../../data/search_corpus.json");

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Something that answers search queries
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Up to `limit` results for `query`, best first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Backend answering from a fixed list of documents
///
/// A document matches when its title or snippet contains any word of the
/// query (case-insensitive); documents matching more words rank first.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchBackend {
    documents: Vec<SearchResult>,
}

impl StaticSearchBackend {
    pub fn new(documents: Vec<SearchResult>) -> Self {
        Self { documents }
    }

    /// Add one document
    pub fn with_document(mut self, document: SearchResult) -> Self {
        self.documents.push(document);
        self
    }

    /// Small offline corpus shipped with the crate
    pub fn bundled() -> Result<Self> {
        let documents = serde_json::from_str(BUNDLED_CORPUS)
            .map_err(|e| Error::Configuration(format!("invalid bundled search corpus: {e}")))?;
        Ok(Self { documents })
    }

    /// Load documents from a JSON array of `{title, url, snippet}` objects
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read search corpus {}: {e}", path.display()))
        })?;
        let documents = serde_json::from_str(&raw).map_err(|e| {
            Error::Configuration(format!("invalid search corpus {}: {e}", path.display()))
        })?;
        Ok(Self { documents })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl SearchBackend for StaticSearchBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| w.len() > 2)
            .collect();

        let mut scored: Vec<(usize, &SearchResult)> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let haystack = format!("{} {}", doc.title, doc.snippet).to_lowercase();
                let score = words.iter().filter(|w| haystack.contains(w.as_str())).count();
                (score > 0).then_some((score, doc))
            })
            .collect();
        // Stable sort keeps corpus order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored.into_iter().take(limit).map(|(_, doc)| doc.clone()).collect())
    }
}

/// Search tool handed to research agents
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            max_results: 5,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, params: Value, _ctx: &RunContext) -> Result<Value> {
        let Some(query) = params.get("query").and_then(Value::as_str) else {
            return Err(Error::tool(SEARCH_TOOL, "missing required argument 'query'"));
        };

        let results = self.backend.search(query, self.max_results).await?;
        debug!(query, hits = results.len(), "Search completed");

        let outcome = if results.is_empty() {
            ToolOutcome::error(format!("No results found for '{query}'"))
        } else {
            ToolOutcome::success(json!({ "results": results }))
        };
        Ok(outcome.into_value())
    }

    fn name(&self) -> &str {
        SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns a list of results with title, url and snippet."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "query": schema::string("The search query") }),
            vec!["query"],
        )
    }
}
