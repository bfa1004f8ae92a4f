//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a hardware codename as found in `ro.product.device`
    pub fn codename() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{1,15}"
    }

    /// Generate a ROM id (`primary`, `dual`, `multi-slot-N`, `data-slot-*`, `extsd-slot-*`)
    pub fn rom_id() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("primary".to_string()),
            Just("dual".to_string()),
            (1u32..=3).prop_map(|n| format!("multi-slot-{n}")),
            "[a-z0-9]{1,10}".prop_map(|s| format!("data-slot-{s}")),
            "[a-z0-9]{1,10}".prop_map(|s| format!("extsd-slot-{s}")),
        ]
    }

    /// Generate a ROM display name; never contains a template token delimiter
    pub fn rom_name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ._-]{0,24}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_codename_generator(name in codename()) {
            prop_assert!(name.len() >= 2);
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }

        #[test]
        fn test_rom_id_generator(id in rom_id()) {
            prop_assert!(
                id == "primary"
                    || id == "dual"
                    || id.starts_with("multi-slot-")
                    || id.starts_with("data-slot-")
                    || id.starts_with("extsd-slot-")
            );
        }

        #[test]
        fn test_rom_name_generator(name in rom_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.contains('@'));
            prop_assert!(!name.contains('\t'));
        }
    }
}
