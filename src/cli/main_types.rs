use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubebuddy-report")]
#[command(about = "Browse, page, sort and export KubeBuddy cluster-health reports")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Disable colored output
    #[arg(long, global = true, env = "KUBEBUDDY_NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sorting and paging shared by table commands
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Page to show (1-based)
    #[arg(long)]
    pub page: Option<usize>,
    /// Items per page; must be one of the configured options
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Column to sort by (0-based index)
    #[arg(long)]
    pub sort: Option<usize>,
    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,
    /// Only show items containing this text
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print report sections as paginated tables
    Show {
        /// Path to the JSON report
        report: PathBuf,
        /// Tab to show (default: first tab)
        #[arg(long)]
        tab: Option<String>,
        /// Only show this section, expanded
        #[arg(long)]
        section: Option<String>,
        /// Expand every section of the tab
        #[arg(long)]
        expand: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the node-card grid
    Nodes {
        /// Path to the JSON report
        report: PathBuf,
        /// Sizing profile to filter on
        #[arg(long)]
        profile: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Interactive full-screen report browser
    Browse {
        /// Path to the JSON report
        report: PathBuf,
    },
    /// Export one section as CSV
    Export {
        /// Path to the JSON report
        report: PathBuf,
        /// Section id
        #[arg(long)]
        section: String,
        /// Target directory
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Column to sort by before exporting (0-based index)
        #[arg(long)]
        sort: Option<usize>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Render every section with all rows into a text file
    Print {
        /// Path to the JSON report
        report: PathBuf,
        /// Output file
        #[arg(long, default_value = "kubebuddy_report.txt")]
        output: PathBuf,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
