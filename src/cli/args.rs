//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resource host for the graphics toolbox: serves resources to the module
/// and forwards edits as live-reload notifications
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: toolbox.toml)
    #[arg(short = 'C', long, global = true, default_value = "toolbox.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the resources visible to the module
    #[command(visible_alias = "l")]
    List,

    /// Start the module and forward resource edits until Ctrl+C
    #[command(visible_alias = "w")]
    Watch {
        /// Resource directory (overrides `resources.root`)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,

        /// Resource the editor document maps to (overrides `bridge.document`)
        #[arg(short, long)]
        document: Option<String>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_list(&self) -> bool {
        matches!(self.command, Commands::List)
    }
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch { .. })
    }
}
