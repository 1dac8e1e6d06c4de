//! Variant Forge CLI
//!
//! Usage:
//!   variant-forge [OPTIONS] [SOURCE]
//!   variant-forge --repo <URL> [--branch <BRANCH>] [OPTIONS]
//!   variant-forge --messages [-o <FILE>] < commands.jsonl
//!
//! Options:
//!   -r, --repo <URL>          GitHub repository holding tokens and components
//!   -b, --branch <BRANCH>     Branch to read from [default: main]
//!   -c, --config <FILE>       Render configuration (TOML format)
//!       --component <NAME>    Render only this component (repeatable)
//!   -o, --output <FILE>       Write the SVG here instead of stdout
//!       --messages            Answer JSON commands read line by line from stdin,
//!                             then export what they rendered
//!   -v, --verbose             Log debug output to stderr

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use variant_forge::command::serve_lines;
use variant_forge::store::DEFAULT_BRANCH;
use variant_forge::{
    render_with_config, CommandHandler, ContentStore, DirectoryStore, GitHubProvider, GitHubStore,
    MemoryScene, RenderConfig,
};

#[derive(Parser)]
#[command(name = "variant-forge")]
#[command(about = "Render design-system components as variant showcases")]
struct Cli {
    /// Local directory holding tokens and components
    #[arg(conflicts_with = "repo")]
    source: Option<PathBuf>,

    /// GitHub repository URL holding tokens and components
    #[arg(short, long)]
    repo: Option<String>,

    /// Branch to read from
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render only the named component; may be repeated
    #[arg(long = "component")]
    components: Vec<String>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Answer JSON commands read line by line from stdin
    #[arg(long)]
    messages: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match RenderConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RenderConfig::default(),
    };

    if cli.messages {
        let mut handler = CommandHandler::new(MemoryScene::new(), config, GitHubProvider);
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        if let Err(e) = serve_lines(&mut handler, stdin, tokio::io::stdout()).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        if !handler.scene().is_empty() {
            write_output(&cli.output, handler.export_svg());
        }
        return;
    }

    let store: Box<dyn ContentStore> = match (&cli.source, &cli.repo) {
        (Some(dir), _) => Box::new(DirectoryStore::new(dir)),
        (None, Some(url)) => match GitHubStore::open(url, &cli.branch) {
            Ok(store) => Box::new(store),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Error: provide a SOURCE directory or --repo <URL>");
            std::process::exit(1);
        }
    };

    let svg = match render_with_config(store.as_ref(), &cli.components, &config).await {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    write_output(&cli.output, svg);
}

fn write_output(output: &Option<PathBuf>, svg: String) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, svg) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{}", svg),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
