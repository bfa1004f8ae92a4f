//! AROMA installer config templating
//!
//! `aroma-config.in` is plain text with `@TOKEN@` placeholders. Rendering
//! applies literal, global substitutions in a fixed order:
//!
//! 1. literal tabs are escaped to `\t` (AROMA's parser rejects raw tabs)
//! 2. `@MBTOOL_VERSION@`
//! 3. `@ROM_MENU_ITEMS@`
//! 4. `@ROM_SELECTION_ITEMS@`
//! 5. `@FIRST_INDEX@`, `@LAST_INDEX@`
//! 6. `@SYSTEM_MOUNT_POINT@`, `@CACHE_MOUNT_POINT@`, `@DATA_MOUNT_POINT@`,
//!    `@EXTSD_MOUNT_POINT@`
//!
//! Tabs are escaped before any generated text is inserted so generated text
//! is never escaped. Unknown or unmatched tokens are left untouched. The
//! template is handled as bytes, so non-UTF-8 content passes through.

use std::fmt::Write;

use super::layout::PartitionLayout;
use super::roms::RomHandle;
use crate::config::defaults::ROM_MENU_BASE_OFFSET;

pub const TOKEN_VERSION: &str = "@MBTOOL_VERSION@";
pub const TOKEN_ROM_MENU_ITEMS: &str = "@ROM_MENU_ITEMS@";
pub const TOKEN_ROM_SELECTION_ITEMS: &str = "@ROM_SELECTION_ITEMS@";
pub const TOKEN_FIRST_INDEX: &str = "@FIRST_INDEX@";
pub const TOKEN_LAST_INDEX: &str = "@LAST_INDEX@";
pub const TOKEN_SYSTEM_MOUNT_POINT: &str = "@SYSTEM_MOUNT_POINT@";
pub const TOKEN_CACHE_MOUNT_POINT: &str = "@CACHE_MOUNT_POINT@";
pub const TOKEN_DATA_MOUNT_POINT: &str = "@DATA_MOUNT_POINT@";
pub const TOKEN_EXTSD_MOUNT_POINT: &str = "@EXTSD_MOUNT_POINT@";

/// A ROM as shown in the installer menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRom {
    pub id: String,
    pub name: String,
}

impl From<&RomHandle> for MenuRom {
    fn from(rom: &RomHandle) -> Self {
        Self {
            id: rom.id().to_string(),
            name: rom.display_name().to_string(),
        }
    }
}

/// Values substituted into the template
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// mbutils version string
    pub version: String,
    /// Installed ROMs, in menu order
    pub roms: Vec<MenuRom>,
    /// Real partition mount points
    pub layout: PartitionLayout,
}

impl TemplateContext {
    /// Menu index of the first ROM entry
    pub fn first_index(&self) -> usize {
        ROM_MENU_BASE_OFFSET + 1
    }

    /// Menu index of the last ROM entry (`first_index() - 1` when there are no ROMs)
    pub fn last_index(&self) -> usize {
        ROM_MENU_BASE_OFFSET + self.roms.len()
    }

    /// One menu line per ROM
    pub fn rom_menu_items(&self) -> String {
        self.roms.iter().fold(String::new(), |mut out, rom| {
            let _ = writeln!(out, "\"{}\", \"\", \"@default\",", rom.name);
            out
        })
    }

    /// One selection branch per ROM, keyed on its menu index
    pub fn rom_selection_items(&self) -> String {
        self.roms
            .iter()
            .enumerate()
            .fold(String::new(), |mut out, (i, rom)| {
                let _ = write!(
                    out,
                    "if prop(\"operations.prop\", \"selected\") == \"{index}\" then\n    \
                     setvar(\"romid\", \"{id}\");\n    \
                     setvar(\"romname\", \"{name}\");\n\
                     endif;\n",
                    index = ROM_MENU_BASE_OFFSET + i + 1,
                    id = rom.id,
                    name = rom.name,
                );
                out
            })
    }

    /// Ordered (token, value) substitutions, excluding the tab escape
    pub fn tokens(&self) -> Vec<(&'static str, String)> {
        vec![
            (TOKEN_VERSION, self.version.clone()),
            (TOKEN_ROM_MENU_ITEMS, self.rom_menu_items()),
            (TOKEN_ROM_SELECTION_ITEMS, self.rom_selection_items()),
            (TOKEN_FIRST_INDEX, self.first_index().to_string()),
            (TOKEN_LAST_INDEX, self.last_index().to_string()),
            (
                TOKEN_SYSTEM_MOUNT_POINT,
                self.layout.system.display().to_string(),
            ),
            (
                TOKEN_CACHE_MOUNT_POINT,
                self.layout.cache.display().to_string(),
            ),
            (TOKEN_DATA_MOUNT_POINT, self.layout.data.display().to_string()),
            (TOKEN_EXTSD_MOUNT_POINT, self.layout.extsd_display()),
        ]
    }
}

/// Render a template
///
/// # Arguments
///
/// * `template` - Raw template bytes, not required to be UTF-8
/// * `context` - Version, ROM list and partition layout to substitute
///
/// # Returns
///
/// The template with every token replaced. Bytes outside tokens are kept.
pub fn render(template: &[u8], context: &TemplateContext) -> Vec<u8> {
    let mut data = replace_all(template, b"\t", b"\\t");
    for (token, value) in context.tokens() {
        data = replace_all(&data, token.as_bytes(), value.as_bytes());
    }
    data
}

/// Replace every occurrence of `needle` in `haystack`
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}
