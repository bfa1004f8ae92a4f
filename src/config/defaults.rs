//! Default configuration values and fixed names

/// Relative path of the templated installer config inside the template tree
pub const AROMA_CONFIG_TEMPLATE: &str = "META-INF/com/google/android/aroma-config.in";

/// Suffix stripped from the templated entry's name
pub const TEMPLATE_SUFFIX: &str = ".in";

/// Number of fixed menu entries preceding the generated ROM entries
pub const ROM_MENU_BASE_OFFSET: usize = 2;

/// Buffer size used when streaming files into the archive
pub const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// Entries at or above this size use zip64 size encoding
pub const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Property holding the product device codename
pub const PROP_PRODUCT_DEVICE: &str = "ro.product.device";

/// Property holding the build product codename
pub const PROP_BUILD_PRODUCT: &str = "ro.build.product";

/// Property files consulted for system properties, in priority order
pub const DEFAULT_PROPERTY_FILES: &[&str] = &["/default.prop", "/system/build.prop"];

/// Multiboot data directory (boot images, checksums)
pub const DEFAULT_MULTIBOOT_DIR: &str = "/data/multiboot";

/// Per-ROM configuration directory on internal storage
pub const DEFAULT_MULTIBOOT_CONFIG_DIR: &str = "/data/media/0/MultiBoot";

/// Checksums file name inside the multiboot data directory
pub const CHECKSUMS_FILE: &str = "checksums.prop";

/// Settings file used when neither `--config` nor `MBUTILS_CONFIG` is given
pub const DEFAULT_SETTINGS_FILE: &str = "/data/multiboot/utilities.toml";

/// Mount point candidates for the external SD card
pub const EXTSD_CANDIDATES: &[&str] = &["/raw/extsd", "/external_sd", "/extsd", "/sdcard1"];
