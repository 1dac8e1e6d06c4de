//! Variant Forge - renders design-system components as variant showcases
//!
//! Component documents describe a base node tree, their variant axes and
//! per-variant override fragments. Each variant combination is merged onto
//! the base, its token references are resolved, and the result is built into
//! a [`Scene`]. Showcases of several components are laid out side by side.
//!
//! # Example
//!
//! ```rust,no_run
//! use variant_forge::{render, DirectoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DirectoryStore::new("design-system");
//!     let svg = render(&store, &["button".to_string()]).await.unwrap();
//!     assert!(svg.contains("<svg"));
//! }
//! ```

pub mod command;
pub mod component;
pub mod config;
pub mod error;
pub mod node;
pub mod scene;
pub mod showcase;
pub mod store;
pub mod tokens;

pub use command::{Command, CommandHandler, GitHubProvider, Response, StoreProvider};
pub use component::{ComponentDefinition, DefinitionError};
pub use config::{ConfigError, FontConfig, RenderConfig, ShowcaseConfig, SourceConfig, SvgConfig};
pub use error::BuildError;
pub use scene::{render_svg, MemoryScene, Scene};
pub use showcase::{render_batch, render_component, Showcase};
pub use store::{fetch_library, ContentStore, DirectoryStore, FetchError, GitHubStore, Library};
pub use tokens::TokenRegistry;

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Retrieving documents failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Building nodes failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A component document is not a component definition
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Loading configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fetch components from a store and render them to SVG with default
/// configuration
///
/// `only` restricts the batch to the named components; when empty the
/// configured component list is used.
pub async fn render<C: ContentStore + ?Sized>(
    store: &C,
    only: &[String],
) -> Result<String, RenderError> {
    render_with_config(store, only, &RenderConfig::default()).await
}

/// Fetch components from a store and render them to SVG
pub async fn render_with_config<C: ContentStore + ?Sized>(
    store: &C,
    only: &[String],
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let library = fetch_library(store, &config.source, only).await?;

    let mut scene = MemoryScene::new();
    let placed = render_batch(&mut scene, &library.components, &library.tokens, config).await?;

    let unresolved: usize = placed.iter().map(|s| s.unresolved.len()).sum();
    if unresolved > 0 {
        tracing::warn!(unresolved, "some token references were left unresolved");
    }

    Ok(render_svg(&scene, &config.svg))
}
