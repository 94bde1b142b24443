//! Layered configuration: defaults, then `config.toml`, then CLI flags.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::application::services::{DEFAULT_PAGE_SIZE, PREFETCH_MARGIN};
use crate::domain::entities::{DEFAULT_IMAGE_URL_TEMPLATE, ImageUrlTemplate};
use crate::infrastructure::image::http_transport::DEFAULT_TIMEOUT_SECS;
use crate::infrastructure::image::{DEFAULT_CACHE_SIZE, ImageLoaderConfig};
use crate::infrastructure::pokeapi::POKEAPI_BASE;

use super::args::CliArgs;

pub(super) const APP_NAME: &str = "pokegrid";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";
const LOG_FILE_NAME: &str = "pokegrid.log";

/// Verbosity of the tracing filter when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings read from `config.toml`, then overridden by CLI flags.
///
/// Every table and key is optional; missing values take their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Set from `--log-path`, never persisted.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,
    /// Filter level when `RUST_LOG` is unset.
    pub log_level: LogLevel,
    /// Catalog paging.
    pub catalog: CatalogConfig,
    /// Sprite download and cache.
    pub images: ImagesConfig,
}

/// `[catalog]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Root of the catalog API.
    pub base_url: String,
    /// Entries per page request.
    pub page_size: usize,
    /// Rows from the end of the list at which the next page is requested.
    pub prefetch_margin: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: POKEAPI_BASE.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_margin: PREFETCH_MARGIN,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[images]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Sprite URL with an `{id}` placeholder.
    pub url_template: String,
    /// Decoded images kept in memory.
    pub cache_capacity: usize,
    /// Background downloads allowed at once.
    pub max_concurrent_downloads: usize,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_owned(),
            cache_capacity: DEFAULT_CACHE_SIZE,
            max_concurrent_downloads: ImageLoaderConfig::default().max_concurrent_downloads,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Applies flags given on the command line over file values.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        self.log_path = args.log_path.clone().or_else(|| self.log_path.take());
        self.log_level = args.log_level.unwrap_or(self.log_level);

        if let Some(base_url) = &args.base_url {
            self.catalog.base_url.clone_from(base_url);
        }
        self.catalog.page_size = args.page_size.unwrap_or(self.catalog.page_size);
        self.images.cache_capacity = args.cache_capacity.unwrap_or(self.images.cache_capacity);
        self.images.max_concurrent_downloads = args
            .max_concurrent_downloads
            .unwrap_or(self.images.max_concurrent_downloads);
    }

    /// Parsed sprite template. An invalid one is logged and replaced by the default.
    #[must_use]
    pub fn image_url_template(&self) -> ImageUrlTemplate {
        ImageUrlTemplate::new(self.images.url_template.clone()).unwrap_or_else(|| {
            warn!(
                template = %self.images.url_template,
                "Image URL template lacks the {{id}} placeholder, using default"
            );
            ImageUrlTemplate::default()
        })
    }

    /// `--log-path` if given, otherwise `pokegrid.log` in the platform data directory.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
                .map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
        })
    }
}
