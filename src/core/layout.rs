//! Partition mount point detection
//!
//! Multiboot recoveries bind-mount the real partitions under `/raw` and
//! point `/system`, `/cache` and `/data` at the active ROM. The generated
//! installer must address the real partitions, so `/raw/<name>` is preferred
//! whenever it exists.

use std::path::{Path, PathBuf};

use super::settings::PartitionsConfig;
use crate::config::defaults;

/// Mount points of the real partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionLayout {
    pub system: PathBuf,
    pub cache: PathBuf,
    pub data: PathBuf,
    /// External SD card, `None` if no card is mounted
    pub extsd: Option<PathBuf>,
}

impl PartitionLayout {
    /// Detect the layout of the running system
    ///
    /// Configured values win; otherwise `/raw/<name>` is used when present,
    /// falling back to `/<name>`.
    pub fn detect(config: &PartitionsConfig) -> Self {
        let extsd_candidates: Vec<PathBuf> =
            defaults::EXTSD_CANDIDATES.iter().map(PathBuf::from).collect();

        Self {
            system: config.system.clone().unwrap_or_else(|| raw_or_plain("system")),
            cache: config.cache.clone().unwrap_or_else(|| raw_or_plain("cache")),
            data: config.data.clone().unwrap_or_else(|| raw_or_plain("data")),
            extsd: config.extsd.clone().or_else(|| first_existing(&extsd_candidates)),
        }
    }

    /// Layout with every partition rooted below `root` (`<root>/system`, ...)
    pub fn under(root: &Path) -> Self {
        Self {
            system: root.join("system"),
            cache: root.join("cache"),
            data: root.join("data"),
            extsd: Some(root.join("extsd")),
        }
    }

    /// External SD mount point as text, empty when absent
    pub fn extsd_display(&self) -> String {
        self.extsd
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

fn raw_or_plain(name: &str) -> PathBuf {
    let candidates = [Path::new("/raw").join(name), Path::new("/").join(name)];
    first_existing(&candidates).unwrap_or_else(|| Path::new("/").join(name))
}

/// First candidate that exists on disk
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.exists()).cloned()
}
