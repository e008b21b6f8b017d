//! Version normalization for path construction.
//!
//! Root documents advertise dotted versions ("3.0.1"); fetch paths embed a
//! canonical token with underscores ("V3_0/..."). The truncation policy is
//! configurable because upstream servers disagree on how many components the
//! path segment carries.

/// How many dotted components of the advertised version participate in path
/// construction. Applied once per discovery run, never per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Keep `major.minor` only: "3.0.1" becomes "3_0".
    #[default]
    MajorMinor,
    /// Keep every component: "3.0.1" becomes "3_0_1".
    Full,
}

/// Normalize a raw version token into the canonical form used in fetch paths.
///
/// Callers that were handed an explicit version bypass this entirely; the
/// supplied value is authoritative.
pub fn canonical_version(raw: &str, policy: VersionPolicy) -> String {
    let parts: Vec<&str> = raw.split('.').collect();
    let kept: &[&str] = match policy {
        VersionPolicy::MajorMinor if parts.len() > 2 => &parts[..2],
        _ => &parts,
    };
    kept.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_minor_truncates_patch() {
        assert_eq!(canonical_version("3.0.1", VersionPolicy::MajorMinor), "3_0");
        assert_eq!(canonical_version("3.0", VersionPolicy::MajorMinor), "3_0");
        assert_eq!(canonical_version("4", VersionPolicy::MajorMinor), "4");
    }

    #[test]
    fn full_keeps_every_component() {
        assert_eq!(canonical_version("3.0.1", VersionPolicy::Full), "3_0_1");
        assert_eq!(canonical_version("3.0", VersionPolicy::Full), "3_0");
    }
}
