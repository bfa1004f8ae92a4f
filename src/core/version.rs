//! Version string substituted into generated installer configs

/// Current mbutils version from Cargo.toml
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder vergen emits when git information is unavailable
const VERGEN_PLACEHOLDER: &str = "VERGEN_IDEMPOTENT_OUTPUT";

/// Full version string, e.g. `0.1.0.r1a2b3c4` or `0.1.0.r1a2b3c4-dirty`
///
/// Falls back to the bare package version when the build had no git checkout.
pub fn version() -> String {
    format_version(
        CURRENT_VERSION,
        option_env!("VERGEN_GIT_SHA"),
        option_env!("VERGEN_GIT_DIRTY"),
    )
}

fn format_version(base: &str, sha: Option<&str>, dirty: Option<&str>) -> String {
    match sha {
        Some(sha) if !sha.is_empty() && sha != VERGEN_PLACEHOLDER => {
            let short = sha.get(..8).unwrap_or(sha);
            let suffix = if dirty == Some("true") { "-dirty" } else { "" };
            format!("{base}.r{short}{suffix}")
        }
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_without_git() {
        assert_eq!(format_version("1.2.3", None, None), "1.2.3");
        assert_eq!(
            format_version("1.2.3", Some(VERGEN_PLACEHOLDER), Some("false")),
            "1.2.3"
        );
    }

    #[test]
    fn test_version_with_git() {
        assert_eq!(
            format_version("1.2.3", Some("0123456789abcdef"), Some("false")),
            "1.2.3.r01234567"
        );
        assert_eq!(
            format_version("1.2.3", Some("abc"), Some("true")),
            "1.2.3.rabc-dirty"
        );
    }

    #[test]
    fn test_version_starts_with_package_version() {
        assert!(version().starts_with(CURRENT_VERSION));
    }
}
