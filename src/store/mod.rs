//! Content stores holding token and component documents
//!
//! A store maps a relative document path (`tokens/colors.json`) to a parsed
//! JSON document. Missing documents are not errors: they come back as `None`
//! and the fetch carries on with whatever exists.

mod directory;
mod github;

pub use directory::DirectoryStore;
pub use github::{GitHubStore, RepoLocator, DEFAULT_BRANCH};

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::component::ComponentDefinition;
use crate::config::SourceConfig;
use crate::tokens::TokenRegistry;

/// Errors that can occur while retrieving documents
#[derive(Debug, Error)]
pub enum FetchError {
    /// The repository locator does not have the expected shape
    #[error("invalid repository URL '{locator}': expected https://github.com/<owner>/<repo>")]
    MalformedLocator { locator: String },

    /// Reading a local document failed
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote request failed
    #[error("request to '{url}' failed: {message}")]
    Http { url: String, message: String },

    /// A document is not valid JSON
    #[error("'{path}' is not valid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// None of the requested component documents exist or parse
    #[error("no components found")]
    NoComponentsFound,
}

impl FetchError {
    pub fn malformed_locator(locator: impl Into<String>) -> Self {
        Self::MalformedLocator {
            locator: locator.into(),
        }
    }

    pub fn http(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Http {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Read-only access to JSON documents
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist
    async fn fetch_document(&self, path: &str) -> Result<Option<Value>, FetchError>;
}

/// Tokens and components retrieved from a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub tokens: TokenRegistry,
    pub components: Vec<ComponentDefinition>,
}

/// Fetch all token namespaces and the named components
///
/// Every document is requested concurrently and all requests complete
/// before anything is assembled. `only` restricts the component list; when
/// empty, `source.components` is used. A document that is missing, fails to
/// retrieve, or does not parse is skipped; if no component remains the fetch
/// fails with [`FetchError::NoComponentsFound`].
pub async fn fetch_library<C: ContentStore + ?Sized>(
    store: &C,
    source: &SourceConfig,
    only: &[String],
) -> Result<Library, FetchError> {
    let names = if only.is_empty() {
        source.components.as_slice()
    } else {
        only
    };

    let token_paths: Vec<String> = source
        .token_namespaces
        .iter()
        .map(|ns| source.token_path(ns))
        .collect();
    let component_paths: Vec<String> = names.iter().map(|n| source.component_path(n)).collect();

    let (token_docs, component_docs) = futures::join!(
        join_all(token_paths.iter().map(|p| store.fetch_document(p))),
        join_all(component_paths.iter().map(|p| store.fetch_document(p))),
    );

    let mut tokens = TokenRegistry::new();
    for ((namespace, path), doc) in source
        .token_namespaces
        .iter()
        .zip(&token_paths)
        .zip(token_docs)
    {
        if let Some(document) = present(path, doc) {
            tokens.insert_namespace(namespace, document);
        }
    }

    let mut components = Vec::new();
    for (path, doc) in component_paths.iter().zip(component_docs) {
        let Some(document) = present(path, doc) else {
            continue;
        };
        match ComponentDefinition::from_value(path, document) {
            Ok(component) => components.push(component),
            Err(err) => warn!(error = %err, "skipping component"),
        }
    }

    if components.is_empty() {
        return Err(FetchError::NoComponentsFound);
    }
    info!(
        components = components.len(),
        namespaces = tokens.namespaces().count(),
        "fetched library"
    );
    Ok(Library { tokens, components })
}

/// The document if it was retrieved; failures count as absent
fn present(path: &str, doc: Result<Option<Value>, FetchError>) -> Option<Value> {
    match doc {
        Ok(Some(document)) => Some(document),
        Ok(None) => {
            debug!(path, "document not found");
            None
        }
        Err(err) => {
            warn!(path, error = %err, "document retrieval failed");
            None
        }
    }
}
