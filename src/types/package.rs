use crate::utils::debcontrol::{self, Paragraph};

use serde_json::{Map, Value};
use std::fmt;

/// Metadata of one package, as found in a Packages index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub architecture: String,
    pub maintainer: Option<String>,
    pub installed_size: Option<String>,
    pub depends: Option<String>,
    pub recommends: Option<String>,
    pub suggests: Option<String>,
    pub conflicts: Option<String>,
    pub replaces: Option<String>,
    pub provides: Option<String>,
    pub section: Option<String>,
    pub priority: Option<String>,
    pub homepage: Option<String>,
    pub description: Option<String>,
    pub filename: Option<String>,
    pub size: Option<String>,
    pub md5sum: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
}

impl PackageRecord {
    /// Project a control paragraph onto the fixed set of known fields.
    /// Missing required fields become empty strings, unknown fields are ignored.
    pub fn from_fields(f: &Paragraph) -> Self {
        let opt = |name: &str| f.get(name).cloned();
        PackageRecord {
            name: opt("Package").unwrap_or_default(),
            version: opt("Version").unwrap_or_default(),
            architecture: opt("Architecture").unwrap_or_default(),
            maintainer: opt("Maintainer"),
            installed_size: opt("Installed-Size"),
            depends: opt("Depends"),
            recommends: opt("Recommends"),
            suggests: opt("Suggests"),
            conflicts: opt("Conflicts"),
            replaces: opt("Replaces"),
            provides: opt("Provides"),
            section: opt("Section"),
            priority: opt("Priority"),
            homepage: opt("Homepage"),
            description: opt("Description"),
            filename: opt("Filename"),
            size: opt("Size"),
            md5sum: opt("MD5sum"),
            sha1: opt("SHA1"),
            sha256: opt("SHA256"),
        }
    }

    /// All fields in output order, absent ones as `None`
    pub fn to_map(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("package", Some(self.name.as_str())),
            ("version", Some(self.version.as_str())),
            ("architecture", Some(self.architecture.as_str())),
            ("maintainer", self.maintainer.as_deref()),
            ("installed_size", self.installed_size.as_deref()),
            ("depends", self.depends.as_deref()),
            ("recommends", self.recommends.as_deref()),
            ("suggests", self.suggests.as_deref()),
            ("conflicts", self.conflicts.as_deref()),
            ("replaces", self.replaces.as_deref()),
            ("provides", self.provides.as_deref()),
            ("section", self.section.as_deref()),
            ("priority", self.priority.as_deref()),
            ("homepage", self.homepage.as_deref()),
            ("description", self.description.as_deref()),
            ("filename", self.filename.as_deref()),
            ("size", self.size.as_deref()),
            ("md5sum", self.md5sum.as_deref()),
            ("sha1", self.sha1.as_deref()),
            ("sha256", self.sha256.as_deref()),
        ]
    }

    /// Compact JSON object with the keys of `to_map`, absent fields as `null`
    pub fn to_json(&self) -> String {
        let fields: Map<String, Value> = self
            .to_map()
            .into_iter()
            .map(|(key, value)| {
                let value = value.map_or(Value::Null, |v| Value::String(v.to_owned()));
                (key.to_owned(), value)
            })
            .collect();
        Value::Object(fields).to_string()
    }

    /// First line of the description
    pub fn synopsis(&self) -> Option<&str> {
        self.description.as_deref().and_then(|d| d.lines().next())
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Package: {}", self.name)?;
        writeln!(f, "Version: {}", self.version)?;
        write!(f, "Architecture: {}", self.architecture)?;
        if let Some(description) = &self.description {
            write!(f, "\nDescription: {}", description)?;
        }
        Ok(())
    }
}

/// Parse the content of a Packages file, keeping the order of the file
pub fn parse_package_index(s: &str) -> Vec<PackageRecord> {
    debcontrol::parse_str(s)
        .iter()
        .map(PackageRecord::from_fields)
        .collect()
}
