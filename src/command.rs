//! Request/response glue for hosts that drive rendering through messages
//!
//! Messages are JSON objects tagged by `type`:
//!
//! ```text
//! { "type": "fetch-components", "repoUrl": "https://github.com/acme/ui", "branch": "main" }
//! { "type": "render-component", "component": {...}, "tokens": {...} }
//! { "type": "render-all", "components": [...], "tokens": {...} }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::component::ComponentDefinition;
use crate::config::RenderConfig;
use crate::scene::{render_svg, MemoryScene, Scene};
use crate::showcase::{render_batch, render_component};
use crate::store::{fetch_library, ContentStore, FetchError, GitHubStore, DEFAULT_BRANCH};
use crate::tokens::TokenRegistry;
use crate::RenderError;

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// A request from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    FetchComponents {
        repo_url: String,
        #[serde(default = "default_branch")]
        branch: String,
    },
    RenderComponent {
        component: Value,
        #[serde(default)]
        tokens: Value,
    },
    RenderAll {
        components: Vec<Value>,
        #[serde(default)]
        tokens: Value,
    },
}

/// A reply to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    ComponentsFetched {
        components: Vec<ComponentDefinition>,
        tokens: Value,
    },
    RenderComplete {
        message: String,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}

/// Opens a content store for a repository
pub trait StoreProvider: Send + Sync {
    fn open(&self, repo_url: &str, branch: &str) -> Result<Box<dyn ContentStore>, FetchError>;
}

/// Opens GitHub repositories
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubProvider;

impl StoreProvider for GitHubProvider {
    fn open(&self, repo_url: &str, branch: &str) -> Result<Box<dyn ContentStore>, FetchError> {
        Ok(Box::new(GitHubStore::open(repo_url, branch)?))
    }
}

/// Maps commands to responses against one scene
pub struct CommandHandler<S: Scene, P: StoreProvider> {
    scene: S,
    config: RenderConfig,
    provider: P,
}

impl<S: Scene, P: StoreProvider> CommandHandler<S, P> {
    pub fn new(scene: S, config: RenderConfig, provider: P) -> Self {
        Self {
            scene,
            config,
            provider,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Handle one command; failures become [`Response::Error`]
    pub async fn handle(&mut self, command: Command) -> Response {
        match self.dispatch(command).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "command failed");
                Response::error(err)
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Response, RenderError> {
        match command {
            Command::FetchComponents { repo_url, branch } => {
                let store = self.provider.open(&repo_url, &branch)?;
                let library = fetch_library(store.as_ref(), &self.config.source, &[]).await?;
                Ok(Response::ComponentsFetched {
                    components: library.components,
                    tokens: library.tokens.to_value(),
                })
            }
            Command::RenderComponent { component, tokens } => {
                let component = ComponentDefinition::from_value("component", component)?;
                let tokens = TokenRegistry::from_value(tokens);
                let showcase =
                    render_component(&mut self.scene, &component, &tokens, &self.config).await?;
                info!(component = %showcase.component, variants = showcase.variant_count, "rendered");
                Ok(Response::RenderComplete {
                    message: format!(
                        "Rendered {} ({} variants)",
                        showcase.component, showcase.variant_count
                    ),
                })
            }
            Command::RenderAll { components, tokens } => {
                let components = components
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| ComponentDefinition::from_value(&format!("components[{}]", i), c))
                    .collect::<Result<Vec<_>, _>>()?;
                let tokens = TokenRegistry::from_value(tokens);
                let placed = render_batch(&mut self.scene, &components, &tokens, &self.config).await?;
                Ok(Response::RenderComplete {
                    message: format!("Rendered {} components", placed.len()),
                })
            }
        }
    }
}

impl<P: StoreProvider> CommandHandler<MemoryScene, P> {
    /// Everything rendered so far as one SVG document
    pub fn export_svg(&self) -> String {
        render_svg(&self.scene, &self.config.svg)
    }
}

/// Answer newline-delimited JSON commands until the reader is exhausted
///
/// Each non-empty line is one [`Command`]; each gets exactly one JSON
/// [`Response`] line. A line that does not decode is answered with an error.
pub async fn serve_lines<S, P, R, W>(
    handler: &mut CommandHandler<S, P>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    S: Scene,
    P: StoreProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => handler.handle(command).await,
            Err(e) => Response::error(format!("invalid command: {}", e)),
        };
        let mut encoded = serde_json::to_string(&response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
