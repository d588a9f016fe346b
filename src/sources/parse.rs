use crate::{
    types::{SourceEntry, SourceOptions},
    utils::debcontrol,
};

use lazy_static::lazy_static;
use regex::Regex;

/// Parse a one-line style declaration, e.g.
/// `deb [arch=amd64 signed-by=/usr/share/keyrings/x.gpg] https://example.com stable main`.
///
/// Returns `None` for blank lines, comments and lines without a component.
pub fn parse_deb_line(line: &str) -> Option<SourceEntry> {
    lazy_static! {
        // Must start a token, so `http://[::1]/` is not taken for options
        static ref OPTIONS_BLOCK: Regex = Regex::new(r"(?:^|\s)\[([^\]]*)\]").unwrap();
    }

    let mut line = line.trim().to_owned();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut options = SourceOptions::default();
    if let Some(captures) = OPTIONS_BLOCK.captures(&line) {
        let block = captures.get(0)?.range();
        let inner = captures.get(1)?.as_str();
        for opt in inner.split_whitespace() {
            apply_option(&mut options, opt);
        }
        line = format!("{} {}", &line[..block.start], &line[block.end..])
            .trim()
            .to_owned();
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    Some(SourceEntry {
        source_type: parts[0].to_owned(),
        url: parts[1].to_owned(),
        suite: parts[2].to_owned(),
        components: parts[3..].iter().map(|c| c.to_string()).collect(),
        options,
    })
}

// Only the options the one-line form can express are recognized
fn apply_option(options: &mut SourceOptions, opt: &str) {
    let (key, value) = match opt.split_once('=') {
        Some(kv) => kv,
        None => return,
    };
    match key {
        "signed-by" => options.signed_by = Some(value.to_owned()),
        "arch" => options.architectures = Some(value.split(',').map(str::to_owned).collect()),
        "trusted" => options.trusted = value.eq_ignore_ascii_case("yes"),
        _ => (),
    }
}

/// Parse deb822 style `.sources` content. Each paragraph expands into one
/// entry per combination of its types, URIs and suites.
pub fn parse_deb822(s: &str) -> Vec<SourceEntry> {
    let mut res = Vec::new();
    for p in debcontrol::parse_str(s) {
        let list = |name: &str| -> Vec<String> {
            p.get(name)
                .map(|v| v.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default()
        };
        let optional_list = |name: &str| p.get(name).map(|_| list(name));

        let enabled = p.get("Enabled").map_or(true, |v| !v.eq_ignore_ascii_case("no"));
        if !enabled {
            continue;
        }

        let types = list("Types");
        let uris = list("URIs");
        let suites = list("Suites");
        let components = list("Components");
        if components.is_empty() {
            continue;
        }

        let options = SourceOptions {
            signed_by: p.get("Signed-By").map(|v| unescape_empty_lines(v)),
            architectures: optional_list("Architectures"),
            languages: optional_list("Languages"),
            targets: optional_list("Targets"),
            trusted: p
                .get("Trusted")
                .map_or(false, |v| v.eq_ignore_ascii_case("yes")),
        };

        for source_type in &types {
            for uri in &uris {
                for suite in &suites {
                    res.push(SourceEntry {
                        source_type: source_type.clone(),
                        url: uri.clone(),
                        suite: suite.clone(),
                        components: components.clone(),
                        options: options.clone(),
                    });
                }
            }
        }
    }

    res
}

// A continuation line holding only `.` stands for an empty line
fn unescape_empty_lines(value: &str) -> String {
    value
        .split('\n')
        .map(|line| if line == "." { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}
