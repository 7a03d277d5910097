use clap::{Args, Parser, Subcommand};

use crate::error::ConfigError;
use crate::widget::config::WidgetConfig;

pub const DEFAULT_CONFIG_PATH: &str = "feedback-widget.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "feedback-widget",
    version,
    about = "Inspect page snapshots the way the in-page feedback widget does"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: feedback-widget.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// API key (overrides the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Collection endpoint (overrides the config file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

/// Which element of the snapshot to operate on.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Element with this id attribute
    #[arg(long)]
    pub id: Option<String>,

    /// Element-child index path from <html>, e.g. 1/0/2
    #[arg(long)]
    pub node_path: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the page as sensitive or not, and list its embeds
    Classify {
        /// Page snapshot JSON
        #[arg(long)]
        snapshot: String,
    },

    /// Print the structural address and breadcrumb of an element
    Locate {
        #[arg(long)]
        snapshot: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print the redacted serialization of an element
    Serialize {
        #[arg(long)]
        snapshot: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Child levels to include (default: childDepth from config)
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Build the feedback report JSON, optionally sending it
    Report {
        #[arg(long)]
        snapshot: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Feedback text
        #[arg(long)]
        text: String,

        /// Deliver the report to the configured endpoint
        #[arg(long, default_value_t = false)]
        send: bool,
    },
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load the widget config. A missing default file yields defaults; an
/// explicitly named file must exist and parse.
pub fn load_config(path: Option<&str>) -> Result<WidgetConfig, ConfigError> {
    match path {
        Some(p) => WidgetConfig::load(p),
        None => match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(content) => WidgetConfig::from_yaml(&content, DEFAULT_CONFIG_PATH),
            Err(_) => Ok(WidgetConfig::default()),
        },
    }
}

/// Apply CLI overrides on top of the file config: CLI > config > defaults.
pub fn merge_overrides(mut config: WidgetConfig, cli: &Cli) -> WidgetConfig {
    if let Some(key) = &cli.api_key {
        config.api_key = key.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    config
}
