//! Wipe dispatch
//!
//! Resolves a ROM id to an installed ROM and runs exactly one wipe
//! primitive on it. An unknown id fails before any primitive runs.

use std::fmt;

use super::roms::{RomHandle, RomProvider};
use crate::error::WipeError;

/// What to wipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeTarget {
    System,
    Cache,
    Data,
    DalvikCache,
    Multiboot,
}

impl WipeTarget {
    /// All targets, in CLI order
    pub const ALL: [WipeTarget; 5] = [
        Self::System,
        Self::Cache,
        Self::Data,
        Self::DalvikCache,
        Self::Multiboot,
    ];

    /// Name used in action keywords (`wipe-<name>`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Cache => "cache",
            Self::Data => "data",
            Self::DalvikCache => "dalvik-cache",
            Self::Multiboot => "multiboot",
        }
    }
}

impl fmt::Display for WipeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Low-level wipe primitives
pub trait RomWiper {
    fn wipe_system(&self, rom: &RomHandle) -> bool;
    fn wipe_cache(&self, rom: &RomHandle) -> bool;
    fn wipe_data(&self, rom: &RomHandle) -> bool;
    fn wipe_dalvik_cache(&self, rom: &RomHandle) -> bool;
    fn wipe_multiboot(&self, rom: &RomHandle) -> bool;
}

/// Routes wipe requests to a [`RomWiper`]
pub struct WipeDispatcher<'a> {
    roms: &'a dyn RomProvider,
    wiper: &'a dyn RomWiper,
}

impl<'a> WipeDispatcher<'a> {
    /// Create a dispatcher resolving ids through `roms`
    pub fn new(roms: &'a dyn RomProvider, wiper: &'a dyn RomWiper) -> Self {
        Self { roms, wiper }
    }

    /// Wipe `target` of the ROM `rom_id`, returning the primitive's result
    pub fn wipe(&self, target: WipeTarget, rom_id: &str) -> Result<bool, WipeError> {
        let rom = self
            .roms
            .find(rom_id)?
            .ok_or_else(|| WipeError::RomNotFound {
                id: rom_id.to_string(),
            })?;

        tracing::info!("Wiping {} of ROM '{}'", target, rom.id());

        let ok = match target {
            WipeTarget::System => self.wiper.wipe_system(&rom),
            WipeTarget::Cache => self.wiper.wipe_cache(&rom),
            WipeTarget::Data => self.wiper.wipe_data(&rom),
            WipeTarget::DalvikCache => self.wiper.wipe_dalvik_cache(&rom),
            WipeTarget::Multiboot => self.wiper.wipe_multiboot(&rom),
        };

        if !ok {
            tracing::error!("Failed to wipe {} of ROM '{}'", target, rom.id());
        }
        Ok(ok)
    }

    pub fn wipe_system(&self, rom_id: &str) -> Result<bool, WipeError> {
        self.wipe(WipeTarget::System, rom_id)
    }

    pub fn wipe_cache(&self, rom_id: &str) -> Result<bool, WipeError> {
        self.wipe(WipeTarget::Cache, rom_id)
    }

    pub fn wipe_data(&self, rom_id: &str) -> Result<bool, WipeError> {
        self.wipe(WipeTarget::Data, rom_id)
    }

    pub fn wipe_dalvik_cache(&self, rom_id: &str) -> Result<bool, WipeError> {
        self.wipe(WipeTarget::DalvikCache, rom_id)
    }

    pub fn wipe_multiboot(&self, rom_id: &str) -> Result<bool, WipeError> {
        self.wipe(WipeTarget::Multiboot, rom_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RomError;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct FixedRoms(Vec<RomHandle>);

    impl RomProvider for FixedRoms {
        fn installed(&self) -> Result<Vec<RomHandle>, RomError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingWiper {
        result: bool,
        calls: RefCell<Vec<(WipeTarget, String)>>,
    }

    impl RecordingWiper {
        fn record(&self, target: WipeTarget, rom: &RomHandle) -> bool {
            self.calls.borrow_mut().push((target, rom.id().to_string()));
            self.result
        }
    }

    impl RomWiper for RecordingWiper {
        fn wipe_system(&self, rom: &RomHandle) -> bool {
            self.record(WipeTarget::System, rom)
        }
        fn wipe_cache(&self, rom: &RomHandle) -> bool {
            self.record(WipeTarget::Cache, rom)
        }
        fn wipe_data(&self, rom: &RomHandle) -> bool {
            self.record(WipeTarget::Data, rom)
        }
        fn wipe_dalvik_cache(&self, rom: &RomHandle) -> bool {
            self.record(WipeTarget::DalvikCache, rom)
        }
        fn wipe_multiboot(&self, rom: &RomHandle) -> bool {
            self.record(WipeTarget::Multiboot, rom)
        }
    }

    fn rom(id: &str) -> RomHandle {
        let root = PathBuf::from("/data/multiboot").join(id);
        RomHandle::new(
            id,
            None,
            root.join("config.json"),
            root.join("system"),
            root.join("cache"),
            root.join("data"),
        )
    }

    #[test]
    fn test_unknown_rom_never_reaches_wiper() {
        let roms = FixedRoms(vec![rom("primary"), rom("dual")]);
        let wiper = RecordingWiper {
            result: true,
            ..RecordingWiper::default()
        };
        let dispatcher = WipeDispatcher::new(&roms, &wiper);

        for target in WipeTarget::ALL {
            let result = dispatcher.wipe(target, "multi-slot-1");
            assert!(matches!(result, Err(WipeError::RomNotFound { ref id }) if id == "multi-slot-1"));
        }
        assert!(dispatcher.wipe_system("bogus").is_err());
        assert!(wiper.calls.borrow().is_empty());
    }

    #[test]
    fn test_each_target_calls_one_primitive() {
        let roms = FixedRoms(vec![rom("primary"), rom("dual")]);
        let wiper = RecordingWiper {
            result: true,
            ..RecordingWiper::default()
        };
        let dispatcher = WipeDispatcher::new(&roms, &wiper);

        assert!(dispatcher.wipe_system("dual").unwrap());
        assert!(dispatcher.wipe_cache("dual").unwrap());
        assert!(dispatcher.wipe_data("primary").unwrap());
        assert!(dispatcher.wipe_dalvik_cache("dual").unwrap());
        assert!(dispatcher.wipe_multiboot("dual").unwrap());

        assert_eq!(
            *wiper.calls.borrow(),
            vec![
                (WipeTarget::System, "dual".to_string()),
                (WipeTarget::Cache, "dual".to_string()),
                (WipeTarget::Data, "primary".to_string()),
                (WipeTarget::DalvikCache, "dual".to_string()),
                (WipeTarget::Multiboot, "dual".to_string()),
            ]
        );
    }

    #[test]
    fn test_primitive_result_is_returned_unchanged() {
        let roms = FixedRoms(vec![rom("dual")]);
        let wiper = RecordingWiper::default();
        let dispatcher = WipeDispatcher::new(&roms, &wiper);

        assert!(!dispatcher.wipe(WipeTarget::Data, "dual").unwrap());
        assert_eq!(wiper.calls.borrow().len(), 1);
    }

    #[test]
    fn test_target_names() {
        let names: Vec<&str> = WipeTarget::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, ["system", "cache", "data", "dalvik-cache", "multiboot"]);
    }
}
