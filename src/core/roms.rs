//! Installed ROM discovery
//!
//! ROM ids follow the multiboot naming scheme:
//!
//! | id | system directory |
//! |---|---|
//! | `primary` | `<system>` |
//! | `dual` | `<system>/multiboot/dual/system` |
//! | `multi-slot-N` | `<cache>/multiboot/multi-slot-N/system` |
//! | `data-slot-X` | `<data>/multiboot/data-slot-X/system` |
//! | `extsd-slot-X` | `<extsd>/multiboot/extsd-slot-X/system` |
//!
//! A ROM is installed when its system directory exists. Enumeration order is
//! fixed (builtin slots first, then data and extsd slots sorted by id) so the
//! generated installer menu numbers ROMs the same way on every run.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::layout::PartitionLayout;
use crate::error::RomError;

/// Id of the stock ROM on the real partitions
pub const PRIMARY_ID: &str = "primary";

/// Id of the secondary ROM stored on the system partition
pub const DUAL_ID: &str = "dual";

/// Number of `multi-slot-N` slots on the cache partition
pub const MULTI_SLOT_COUNT: u32 = 3;

const DATA_SLOT_PREFIX: &str = "data-slot-";
const EXTSD_SLOT_PREFIX: &str = "extsd-slot-";

/// Per-ROM user configuration (`config.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RomConfig {
    /// User-assigned display name
    #[serde(default)]
    pub name: Option<String>,
}

impl RomConfig {
    /// Load a ROM config; a missing file yields the default config
    pub fn load_file(path: &Path) -> Result<Self, RomError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read(path).map_err(|e| RomError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        serde_json::from_slice(&data).map_err(|e| RomError::Config {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// An installed ROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHandle {
    id: String,
    name: Option<String>,
    config_path: PathBuf,
    /// Directory holding the ROM's system files
    pub system_path: PathBuf,
    /// Directory holding the ROM's cache
    pub cache_path: PathBuf,
    /// Directory holding the ROM's user data
    pub data_path: PathBuf,
}

impl RomHandle {
    /// Create a handle from its parts
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        config_path: PathBuf,
        system_path: PathBuf,
        cache_path: PathBuf,
        data_path: PathBuf,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            config_path,
            system_path,
            cache_path,
            data_path,
        }
    }

    /// ROM id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the ROM's `config.json`
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Configured name, or the id when no name is set
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Source of installed ROMs
pub trait RomProvider {
    /// All installed ROMs in stable discovery order
    fn installed(&self) -> Result<Vec<RomHandle>, RomError>;

    /// Look up an installed ROM by id
    fn find(&self, id: &str) -> Result<Option<RomHandle>, RomError> {
        Ok(self.installed()?.into_iter().find(|rom| rom.id == id))
    }
}

/// ROMs installed on the device's partitions
#[derive(Debug, Clone)]
pub struct InstalledRoms {
    layout: PartitionLayout,
    config_dir: PathBuf,
}

impl InstalledRoms {
    /// Create a provider over `layout`, reading ROM configs from `config_dir`
    pub fn new(layout: PartitionLayout, config_dir: PathBuf) -> Self {
        Self { layout, config_dir }
    }

    fn handle(&self, slot: Slot) -> RomHandle {
        let config_path = self.config_dir.join(&slot.id).join("config.json");
        let name = match RomConfig::load_file(&config_path) {
            Ok(config) => config.name,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };

        RomHandle::new(slot.id, name, config_path, slot.system, slot.cache, slot.data)
    }

    fn builtin_slots(&self) -> Vec<Slot> {
        let layout = &self.layout;
        let mut slots = vec![
            Slot {
                id: PRIMARY_ID.to_string(),
                system: layout.system.clone(),
                cache: layout.cache.clone(),
                data: layout.data.clone(),
            },
            Slot {
                id: DUAL_ID.to_string(),
                system: layout.system.join("multiboot/dual/system"),
                cache: layout.cache.join("multiboot/dual/cache"),
                data: layout.data.join("multiboot/dual/data"),
            },
        ];

        for n in 1..=MULTI_SLOT_COUNT {
            let id = format!("multi-slot-{n}");
            slots.push(Slot {
                system: layout.cache.join("multiboot").join(&id).join("system"),
                cache: layout.system.join("multiboot").join(&id).join("cache"),
                data: layout.data.join("multiboot").join(&id).join("data"),
                id,
            });
        }

        slots
    }

    fn data_slots(&self) -> Result<Vec<Slot>, RomError> {
        let base = self.layout.data.join("multiboot");

        Ok(slot_ids(&base, DATA_SLOT_PREFIX)?
            .into_iter()
            .map(|id| {
                let dir = base.join(&id);
                Slot {
                    system: dir.join("system"),
                    cache: dir.join("cache"),
                    data: dir.join("data"),
                    id,
                }
            })
            .collect())
    }

    fn extsd_slots(&self) -> Result<Vec<Slot>, RomError> {
        let Some(extsd) = &self.layout.extsd else {
            return Ok(Vec::new());
        };
        let base = extsd.join("multiboot");

        Ok(slot_ids(&base, EXTSD_SLOT_PREFIX)?
            .into_iter()
            .map(|id| {
                let data_dir = self.layout.data.join("multiboot").join(&id);
                Slot {
                    system: base.join(&id).join("system"),
                    cache: data_dir.join("cache"),
                    data: data_dir.join("data"),
                    id,
                }
            })
            .collect())
    }
}

/// Candidate ROM location, before the installed check
struct Slot {
    id: String,
    system: PathBuf,
    cache: PathBuf,
    data: PathBuf,
}

impl RomProvider for InstalledRoms {
    fn installed(&self) -> Result<Vec<RomHandle>, RomError> {
        let mut slots = self.builtin_slots();
        slots.extend(self.data_slots()?);
        slots.extend(self.extsd_slots()?);

        let roms: Vec<RomHandle> = slots
            .into_iter()
            .filter(|slot| slot.system.is_dir())
            .map(|slot| self.handle(slot))
            .collect();

        tracing::debug!(
            "Installed ROMs: {}",
            roms.iter().map(RomHandle::id).collect::<Vec<_>>().join(", ")
        );
        Ok(roms)
    }
}

/// Sorted names of directories in `base` starting with `prefix`
fn slot_ids(base: &Path, prefix: &str) -> Result<Vec<String>, RomError> {
    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RomError::Io {
                path: base.to_path_buf(),
                error: e.to_string(),
            })
        }
    };

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RomError::Io {
            path: base.to_path_buf(),
            error: e.to_string(),
        })?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.len() > prefix.len() && name.starts_with(prefix) {
            ids.push(name);
        }
    }

    ids.sort();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provider(temp: &TempDir) -> InstalledRoms {
        InstalledRoms::new(
            PartitionLayout::under(temp.path()),
            temp.path().join("data/media/0/MultiBoot"),
        )
    }

    fn mkdir(temp: &TempDir, rel: &str) {
        std::fs::create_dir_all(temp.path().join(rel)).unwrap();
    }

    #[test]
    fn test_enumeration_order_is_stable() {
        let temp = TempDir::new().unwrap();
        mkdir(&temp, "system");
        mkdir(&temp, "data/multiboot/data-slot-zeta/system");
        mkdir(&temp, "data/multiboot/data-slot-alpha/system");
        mkdir(&temp, "cache/multiboot/multi-slot-2/system");
        mkdir(&temp, "system/multiboot/dual/system");
        mkdir(&temp, "extsd/multiboot/extsd-slot-sd/system");

        let ids: Vec<String> = provider(&temp)
            .installed()
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();

        assert_eq!(
            ids,
            vec![
                "primary",
                "dual",
                "multi-slot-2",
                "data-slot-alpha",
                "data-slot-zeta",
                "extsd-slot-sd"
            ]
        );
    }

    #[test]
    fn test_slot_without_system_is_not_installed() {
        let temp = TempDir::new().unwrap();
        mkdir(&temp, "system");
        mkdir(&temp, "data/multiboot/data-slot-empty/data");
        mkdir(&temp, "data/multiboot/data-slot-");

        let roms = provider(&temp).installed().unwrap();
        assert_eq!(roms.len(), 1);
        assert_eq!(roms[0].id(), PRIMARY_ID);
    }

    #[test]
    fn test_display_name_from_config() {
        let temp = TempDir::new().unwrap();
        mkdir(&temp, "system");
        mkdir(&temp, "system/multiboot/dual/system");
        mkdir(&temp, "data/media/0/MultiBoot/dual");
        std::fs::write(
            temp.path().join("data/media/0/MultiBoot/dual/config.json"),
            r#"{"name": "LineageOS", "id": "dual", "theme": {}}"#,
        )
        .unwrap();
        mkdir(&temp, "data/media/0/MultiBoot/primary");
        std::fs::write(
            temp.path().join("data/media/0/MultiBoot/primary/config.json"),
            "{ not json",
        )
        .unwrap();

        let roms = provider(&temp).installed().unwrap();
        assert_eq!(roms[0].display_name(), "primary");
        assert_eq!(roms[1].display_name(), "LineageOS");
        assert!(roms[1].config_path().ends_with("MultiBoot/dual/config.json"));
    }

    #[test]
    fn test_find() {
        let temp = TempDir::new().unwrap();
        mkdir(&temp, "system");
        mkdir(&temp, "data/multiboot/data-slot-test/system");

        let roms = provider(&temp);
        let found = roms.find("data-slot-test").unwrap().unwrap();
        assert_eq!(
            found.data_path,
            temp.path().join("data/multiboot/data-slot-test/data")
        );
        assert!(roms.find("dual").unwrap().is_none());
        assert!(roms.find("bogus").unwrap().is_none());
    }
}
