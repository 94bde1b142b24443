use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pokegrid",
    version,
    about = "Browse the Pokémon catalog page by page",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Catalog API base URL.
    #[arg(long, value_name = "URL", env = "POKEGRID_BASE_URL")]
    pub base_url: Option<String>,

    /// Entries requested per page.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Maximum decoded images kept in memory.
    #[arg(long)]
    pub cache_capacity: Option<usize>,

    /// Maximum concurrent image downloads.
    #[arg(long)]
    pub max_concurrent_downloads: Option<usize>,

    /// Number of pages to scroll through.
    #[arg(short, long, default_value_t = 1)]
    pub pages: usize,

    /// Item id to select after loading; prints its accent color.
    #[arg(short, long, value_name = "ID")]
    pub select: Option<i64>,
}
