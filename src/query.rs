//! Filters over a list of packages. Every filter keeps the relative order of
//! its input and returns a new list.
use crate::types::{CompareMode, ExplorerError, PackageRecord, VersionSpec};

use regex::Regex;

pub fn filter_by_name(pkgs: &[PackageRecord], name: &str) -> Vec<PackageRecord> {
    pkgs.iter().filter(|pkg| pkg.name == name).cloned().collect()
}

/// Keep packages whose name contains a match of `pattern`
pub fn filter_by_regex(
    pkgs: &[PackageRecord],
    pattern: &str,
) -> Result<Vec<PackageRecord>, ExplorerError> {
    let regex = Regex::new(pattern).map_err(|source| ExplorerError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })?;
    Ok(pkgs
        .iter()
        .filter(|pkg| regex.is_match(&pkg.name))
        .cloned()
        .collect())
}

/// Keep packages whose version satisfies `spec`, e.g. `>=1.0`.
///
/// With [`CompareMode::Lexicographic`] versions are compared as plain strings.
pub fn filter_by_version(
    pkgs: &[PackageRecord],
    spec: &str,
    mode: CompareMode,
) -> Vec<PackageRecord> {
    let spec = VersionSpec::parse(spec);
    pkgs.iter()
        .filter(|pkg| spec.matches(&pkg.version, mode))
        .cloned()
        .collect()
}

/// A combination of filters, applied as name, then regex, then version
#[derive(Debug, Default, Clone)]
pub struct PackageQuery {
    pub name: Option<String>,
    pub regex: Option<String>,
    pub version: Option<String>,
    pub mode: CompareMode,
}

impl PackageQuery {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.regex.is_none() && self.version.is_none()
    }

    pub fn apply(&self, pkgs: &[PackageRecord]) -> Result<Vec<PackageRecord>, ExplorerError> {
        let mut res = pkgs.to_vec();
        if let Some(name) = &self.name {
            res = filter_by_name(&res, name);
        }
        if let Some(pattern) = &self.regex {
            res = filter_by_regex(&res, pattern)?;
        }
        if let Some(spec) = &self.version {
            res = filter_by_version(&res, spec, self.mode);
        }

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            name: name.to_owned(),
            version: version.to_owned(),
            architecture: "amd64".to_owned(),
            ..Default::default()
        }
    }

    fn names(pkgs: &[PackageRecord]) -> Vec<&str> {
        pkgs.iter().map(|p| p.name.as_str()).collect()
    }

    fn versions(pkgs: &[PackageRecord]) -> Vec<&str> {
        pkgs.iter().map(|p| p.version.as_str()).collect()
    }

    fn sample() -> Vec<PackageRecord> {
        vec![
            pkg("libfoo1", "1.0"),
            pkg("foo", "2.1"),
            pkg("Foo", "0.9"),
            pkg("foo-utils", "1.5"),
            pkg("foo", "1.0"),
        ]
    }

    #[test]
    fn test_filter_by_name() {
        let res = filter_by_name(&sample(), "foo");
        assert_eq!(names(&res), vec!["foo", "foo"]);
        assert_eq!(versions(&res), vec!["2.1", "1.0"]);
        assert!(filter_by_name(&sample(), "fo").is_empty());
    }

    #[test]
    fn test_filter_by_regex() {
        let res = filter_by_regex(&sample(), "foo").unwrap();
        assert_eq!(names(&res), vec!["libfoo1", "foo", "foo-utils", "foo"]);
        let res = filter_by_regex(&sample(), "^foo$").unwrap();
        assert_eq!(names(&res), vec!["foo", "foo"]);
        let res = filter_by_regex(&sample(), "(?i)^foo").unwrap();
        assert_eq!(names(&res), vec!["foo", "Foo", "foo-utils", "foo"]);
    }

    #[test]
    fn test_filter_by_empty_regex() {
        let all = sample();
        assert_eq!(filter_by_regex(&all, "").unwrap(), all);
    }

    #[test]
    fn test_invalid_regex() {
        match filter_by_regex(&sample(), "foo(") {
            Err(ExplorerError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "foo("),
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_filter_by_version() {
        let all = sample();
        let t = vec![
            (">=1.0", vec!["1.0", "2.1", "1.5", "1.0"]),
            ("<=1.0", vec!["1.0", "0.9", "1.0"]),
            ("==1.0", vec!["1.0", "1.0"]),
            (">1.0", vec!["2.1", "1.5"]),
            ("<1.0", vec!["0.9"]),
            ("1.5", vec!["1.5"]),
            ("=1.5", vec![]),
        ];

        for (spec, expected) in t {
            let res = filter_by_version(&all, spec, CompareMode::Lexicographic);
            assert_eq!(versions(&res), expected, "filtering with {}", spec);
        }
    }

    #[test]
    fn test_version_operator_precedence() {
        let pkgs = vec![pkg("a", "1.0"), pkg("b", "0.9")];
        let res = filter_by_version(&pkgs, ">=1.0", CompareMode::Lexicographic);
        assert_eq!(versions(&res), vec!["1.0"]);
    }

    #[test]
    fn test_version_lexicographic_boundary() {
        let pkgs = vec![pkg("a", "9"), pkg("b", "10")];
        let res = filter_by_version(&pkgs, ">5", CompareMode::Lexicographic);
        assert_eq!(versions(&res), vec!["9"]);

        let res = filter_by_version(&pkgs, ">5", CompareMode::Dpkg);
        assert_eq!(versions(&res), vec!["9", "10"]);
    }

    #[test]
    fn test_query_composition() {
        let query = PackageQuery {
            regex: Some("^foo".to_owned()),
            version: Some(">=1.0".to_owned()),
            ..Default::default()
        };
        let res = query.apply(&sample()).unwrap();
        assert_eq!(names(&res), vec!["foo", "foo-utils", "foo"]);

        let query = PackageQuery {
            name: Some("foo".to_owned()),
            version: Some("<2".to_owned()),
            ..Default::default()
        };
        assert_eq!(versions(&query.apply(&sample()).unwrap()), vec!["1.0"]);

        let query = PackageQuery::default();
        assert!(query.is_empty());
        assert_eq!(query.apply(&sample()).unwrap(), sample());
    }
}
