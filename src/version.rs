//! Module version strings
//!
//! Go module versions are semantic versions with a mandatory `v` prefix.
//! A pseudo-version such as `v0.0.0-20190312203944-abcdef012345` names a raw
//! commit; VCS updates need that commit id rather than the decorated version.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{HackError, Result};

#[allow(clippy::unwrap_used)]
static PSEUDO_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v[0-9]+\.(0\.0-|[0-9]+\.[0-9]+-([^+]*\.)?0\.)[0-9]{14}-[A-Za-z0-9]+(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$",
    )
    .unwrap()
});

/// Parsed pieces of a valid semantic version that callers care about
#[derive(Debug, Default, PartialEq, Eq)]
struct Parsed<'a> {
    build: &'a str,
}

/// Report whether `v` is a valid Go semantic version.
///
/// Accepts `vMAJOR`, `vMAJOR.MINOR` and `vMAJOR.MINOR.PATCH[-pre][+build]`.
pub fn is_valid_semver(v: &str) -> bool {
    parse(v).is_some()
}

/// The `+build` suffix of a valid version, or an empty string.
pub fn build_suffix(v: &str) -> &str {
    parse(v).map_or("", |p| p.build)
}

/// Report whether `v` is a pseudo-version.
pub fn is_pseudo_version(v: &str) -> bool {
    v.matches('-').count() >= 2 && is_valid_semver(v) && PSEUDO_VERSION_RE.is_match(v)
}

/// Extract the revision identifier encoded in a pseudo-version.
pub fn pseudo_version_rev(v: &str) -> Result<String> {
    if !is_pseudo_version(v) {
        return Err(HackError::InvalidPseudoVersion {
            version: v.to_string(),
        });
    }
    let without_build = &v[..v.len() - build_suffix(v).len()];
    let rev = without_build
        .rsplit_once('-')
        .map(|(_, rev)| rev)
        .ok_or_else(|| HackError::InvalidPseudoVersion {
            version: v.to_string(),
        })?;
    Ok(rev.to_string())
}

/// What a VCS working copy must be updated to for a given module version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTarget {
    /// The target is a tag name rather than a revision id
    pub is_tag: bool,

    /// Tag name or revision id
    pub rev: String,
}

impl UpdateTarget {
    pub fn for_version(version: &str) -> Result<Self> {
        if is_pseudo_version(version) {
            return Ok(Self {
                is_tag: false,
                rev: pseudo_version_rev(version)?,
            });
        }
        Ok(Self {
            is_tag: true,
            rev: version.to_string(),
        })
    }
}

fn parse(v: &str) -> Option<Parsed<'_>> {
    let rest = v.strip_prefix('v')?;
    let rest = parse_int(rest)?;
    if rest.is_empty() {
        return Some(Parsed::default());
    }
    let rest = parse_int(rest.strip_prefix('.')?)?;
    if rest.is_empty() {
        return Some(Parsed::default());
    }
    let mut rest = parse_int(rest.strip_prefix('.')?)?;

    let mut parsed = Parsed::default();
    if rest.starts_with('-') {
        let end = rest.find('+').unwrap_or(rest.len());
        let (pre, tail) = rest.split_at(end);
        if !valid_identifiers(&pre[1..], true) {
            return None;
        }
        rest = tail;
    }
    if rest.starts_with('+') {
        if !valid_identifiers(&rest[1..], false) {
            return None;
        }
        parsed.build = rest;
        rest = "";
    }
    rest.is_empty().then_some(parsed)
}

/// Consume a decimal number without leading zeros, returning the remainder.
fn parse_int(v: &str) -> Option<&str> {
    let digits = v.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || (digits > 1 && v.starts_with('0')) {
        return None;
    }
    Some(&v[digits..])
}

fn valid_identifiers(s: &str, reject_leading_zero: bool) -> bool {
    s.split('.').all(|ident| {
        !ident.is_empty()
            && ident
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !(reject_leading_zero && is_bad_num(ident))
    })
}

fn is_bad_num(ident: &str) -> bool {
    ident.len() > 1 && ident.starts_with('0') && ident.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_semver() {
        for v in [
            "v1",
            "v1.2",
            "v1.2.3",
            "v0.0.0",
            "v1.2.3-pre",
            "v1.2.3-pre.1+build.5",
            "v1.2.3+incompatible",
            "v2.0.0-20190312203944-abcdef012345",
        ] {
            assert!(is_valid_semver(v), "{v} should be valid");
        }
    }

    #[test]
    fn test_invalid_semver() {
        for v in [
            "", "1.2.3", "v", "v01.2.3", "v1.02.3", "v1.2.3-", "v1.2.3-01", "v1.2.3+", "v1.2-pre",
            "v1.2.3.4", "v1.2.3-a..b", "v1.2.3-a_b", "latest",
        ] {
            assert!(!is_valid_semver(v), "{v:?} should be invalid");
        }
    }

    #[test]
    fn test_build_suffix() {
        assert_eq!(build_suffix("v1.2.3-pre+meta"), "+meta");
        assert_eq!(build_suffix("v1.2.3"), "");
        assert_eq!(build_suffix("nonsense+x"), "");
    }

    #[test]
    fn test_pseudo_version_basic() {
        let v = "v0.0.0-20190312203944-abcdef012345";
        assert!(is_pseudo_version(v));
        assert_eq!(pseudo_version_rev(v).unwrap(), "abcdef012345");
    }

    #[test]
    fn test_pseudo_version_with_prerelease_base() {
        // vX.Y.Z-pre.0.timestamp-rev
        let v = "v1.2.4-pre.0.20190312203944-abcdef012345";
        assert!(is_pseudo_version(v));
        assert_eq!(pseudo_version_rev(v).unwrap(), "abcdef012345");
    }

    #[test]
    fn test_pseudo_version_with_release_base() {
        // vX.Y.(Z+1)-0.timestamp-rev
        let v = "v1.2.4-0.20190312203944-abcdef012345";
        assert!(is_pseudo_version(v));
        assert_eq!(pseudo_version_rev(v).unwrap(), "abcdef012345");
    }

    #[test]
    fn test_pseudo_version_with_build_suffix() {
        let v = "v2.0.1-0.20190312203944-abcdef012345+incompatible";
        assert!(is_pseudo_version(v));
        assert_eq!(pseudo_version_rev(v).unwrap(), "abcdef012345");
    }

    #[test]
    fn test_not_pseudo_version() {
        for v in [
            "v1.2.3",
            "v1.2.3-pre",
            "v1.2.3-pre-release",
            "v0.0.0-2019031220394-abcdef012345",
            "v1.2.3-20190312203944-abcdef012345",
        ] {
            assert!(!is_pseudo_version(v), "{v} should not be a pseudo-version");
        }
    }

    #[test]
    fn test_pseudo_version_rev_rejects_tags() {
        let err = pseudo_version_rev("v1.2.3").unwrap_err();
        assert!(matches!(err, HackError::InvalidPseudoVersion { .. }));
    }

    #[test]
    fn test_update_target() {
        assert_eq!(
            UpdateTarget::for_version("v1.5.2").unwrap(),
            UpdateTarget {
                is_tag: true,
                rev: "v1.5.2".to_string()
            }
        );
        assert_eq!(
            UpdateTarget::for_version("v0.0.0-20190312203944-abcdef012345").unwrap(),
            UpdateTarget {
                is_tag: false,
                rev: "abcdef012345".to_string()
            }
        );
    }
}
