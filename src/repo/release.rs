use crate::{types::Checksum, utils::debcontrol};

use anyhow::{bail, format_err, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Parsed Release or InRelease file of a suite
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReleaseFile {
    pub origin: Option<String>,
    pub label: Option<String>,
    pub suite: Option<String>,
    pub codename: Option<String>,
    pub architectures: Vec<String>,
    pub components: Vec<String>,
    // relative path -> (size, checksum)
    pub sha256: HashMap<String, (u64, Checksum)>,
}

impl ReleaseFile {
    pub fn parse(s: &str) -> Result<Self> {
        let paragraphs = debcontrol::parse_str(debcontrol::strip_clearsign(s));
        let p = paragraphs
            .into_iter()
            .next()
            .ok_or_else(|| format_err!("Empty Release file"))?;

        let list = |name: &str| -> Vec<String> {
            p.get(name)
                .map(|v| v.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default()
        };

        let sha256 = match p.get("SHA256") {
            Some(field) => parse_checksums(field)?,
            None => HashMap::new(),
        };

        Ok(ReleaseFile {
            origin: p.get("Origin").cloned(),
            label: p.get("Label").cloned(),
            suite: p.get("Suite").cloned(),
            codename: p.get("Codename").cloned(),
            architectures: list("Architectures"),
            components: list("Components"),
            sha256,
        })
    }

    /// Size and checksum of a file relative to the suite directory
    pub fn checksum_for(&self, rel_path: &str) -> Option<&(u64, Checksum)> {
        self.sha256.get(rel_path)
    }
}

fn parse_checksums(field: &str) -> Result<HashMap<String, (u64, Checksum)>> {
    lazy_static! {
        static ref CHKSUM: Regex =
            Regex::new("^(?P<chksum>[0-9a-f]+) +(?P<size>[0-9]+) +(?P<path>.+)$").unwrap();
    }

    let mut res = HashMap::new();
    for line in field.lines() {
        if line.is_empty() {
            continue;
        }
        let captures = match CHKSUM.captures(line) {
            Some(c) => c,
            None => bail!("Malformed checksum line in Release file: {}", line),
        };
        let path = captures["path"].to_owned();
        let size: u64 = captures["size"].parse()?;
        let chksum = Checksum::from_sha256_str(&captures["chksum"])?;
        res.insert(path, (size, chksum));
    }

    Ok(res)
}
