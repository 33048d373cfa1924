use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lunch-scraper")]
#[command(about = "Collects tomorrow's lunch menus for every configured time slot")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "lunch-scraper.toml")]
    pub config: String,

    /// Override storage.data_dir from config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    /// Dry run - show what would be collected without calling the catalog
    #[arg(long)]
    pub dry_run: bool,
}
