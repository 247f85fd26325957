//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Command-line client for a time-tracking server.
///
/// Start without a subcommand for interactive mode. The settings file is
/// generated on first interactive run.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Verbose, longer listings (and debug logging).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show ids of elements when listing.
    #[arg(short, long, global = true)]
    pub id: bool,

    /// Argos/BitBar dropdown output.
    #[arg(short, long, global = true)]
    pub argos: bool,

    /// Argos/BitBar button output.
    #[arg(short = 'b', long, global = true)]
    pub argosbutton: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands. No subcommand enters the interactive menu.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the given project and activity; prompts when names are omitted.
    Start {
        project: Option<String>,
        activity: Option<String>,
    },

    /// Restart a measurement; prompts over recent ones when id is omitted.
    Restart { id: Option<i64> },

    /// Stop one measurement by id, or every active one when omitted.
    Stop { id: Option<i64> },

    /// List active measurements.
    ListActive,

    /// List recent measurements.
    ListRecent,

    /// List all projects.
    ListProjects,

    /// List all activities.
    ListActivities,

    /// Print the configured server url.
    Url,
}
