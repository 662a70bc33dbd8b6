//! Parsing of `name:version-or-alias` artifact references.

use std::fmt;
use std::str::FromStr;

use super::error::{ArtifactError, ArtifactResult};

/// Alias that always resolves to the newest version of an artifact.
pub const LATEST: &str = "latest";

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSelector {
    #[default]
    Latest,
    /// Explicit version number, written `v<N>`
    Version(u32),
    Alias(String),
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str(LATEST),
            VersionSelector::Version(v) => write!(f, "v{}", v),
            VersionSelector::Alias(alias) => f.write_str(alias),
        }
    }
}

/// Parse `v<digits>` into a version number.
pub fn parse_version_tag(tag: &str) -> Option<u32> {
    let digits = tag.strip_prefix('v')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Reference to a stored artifact, e.g. `sample.csv:latest` or `clean_sample:v2`.
///
/// An `entity/project/` prefix is accepted and discarded; a missing selector
/// means `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub selector: VersionSelector,
}

impl ArtifactRef {
    pub fn new(name: impl Into<String>, selector: VersionSelector) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }

    pub fn parse(reference: &str) -> ArtifactResult<Self> {
        let trimmed = reference.trim();
        let unqualified = trimmed.rsplit('/').next().unwrap_or(trimmed);

        let (name, selector) = match unqualified.split_once(':') {
            None => (unqualified, VersionSelector::Latest),
            Some((name, tag)) => {
                let selector = if tag.is_empty() || tag.contains(':') {
                    return Err(ArtifactError::InvalidReference(format!(
                        "'{}' has an invalid version or alias",
                        reference
                    )));
                } else if tag == LATEST {
                    VersionSelector::Latest
                } else if let Some(version) = parse_version_tag(tag) {
                    VersionSelector::Version(version)
                } else {
                    VersionSelector::Alias(tag.to_string())
                };
                (name, selector)
            }
        };

        if name.is_empty() {
            return Err(ArtifactError::InvalidReference(format!(
                "'{}' has an empty artifact name",
                reference
            )));
        }
        Ok(Self::new(name, selector))
    }
}

impl FromStr for ArtifactRef {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            ArtifactRef::parse("sample.csv").unwrap(),
            ArtifactRef::new("sample.csv", VersionSelector::Latest)
        );
        assert_eq!(
            ArtifactRef::parse("sample.csv:latest").unwrap().selector,
            VersionSelector::Latest
        );
        assert_eq!(
            ArtifactRef::parse("clean_sample:v12").unwrap().selector,
            VersionSelector::Version(12)
        );
        assert_eq!(
            ArtifactRef::parse("clean_sample_reference:reference").unwrap().selector,
            VersionSelector::Alias("reference".into())
        );
    }

    #[test]
    fn test_version_like_aliases() {
        assert_eq!(
            ArtifactRef::parse("x:v").unwrap().selector,
            VersionSelector::Alias("v".into())
        );
        assert_eq!(
            ArtifactRef::parse("x:v1a").unwrap().selector,
            VersionSelector::Alias("v1a".into())
        );
    }

    #[test]
    fn test_entity_project_prefix_is_ignored() {
        let parsed = ArtifactRef::parse("someone/nyc_airbnb/clean_sample:v0").unwrap();
        assert_eq!(parsed.name, "clean_sample");
        assert_eq!(parsed.selector, VersionSelector::Version(0));
    }

    #[test]
    fn test_invalid_references() {
        for bad in ["", ":latest", "project/", "name:", "a:b:c"] {
            assert!(
                matches!(ArtifactRef::parse(bad), Err(ArtifactError::InvalidReference(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ArtifactRef::parse("train.csv").unwrap().to_string(), "train.csv:latest");
        assert_eq!(ArtifactRef::parse("a:v3").unwrap().to_string(), "a:v3");
    }
}
