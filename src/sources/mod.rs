mod parse;
pub use parse::{parse_deb822, parse_deb_line};

use crate::types::{SourceEntry, SourceOptions};

use anyhow::Result;

/// Collects repository declarations and renders them as sources configuration
#[derive(Debug, Default)]
pub struct SourcesBuilder {
    entries: Vec<SourceEntry>,
}

impl SourcesBuilder {
    pub fn new() -> Self {
        SourcesBuilder {
            entries: Vec::new(),
        }
    }

    pub fn add_source(
        &mut self,
        source_type: &str,
        url: &str,
        suite: &str,
        components: Vec<String>,
        options: Option<SourceOptions>,
    ) -> Result<()> {
        let entry = SourceEntry::new(source_type, url, suite, components, options)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn add_entry(&mut self, entry: SourceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Render deb822 style `.sources` content, one paragraph per entry
    pub fn build_deb822(&self) -> String {
        let paragraphs: Vec<String> = self.entries.iter().map(deb822_paragraph).collect();
        paragraphs.join("\n\n")
    }

    /// Render traditional one-line style `.list` lines
    pub fn build_one_line(&self) -> Vec<String> {
        self.entries.iter().map(one_line).collect()
    }
}

fn deb822_paragraph(entry: &SourceEntry) -> String {
    let opts = &entry.options;
    let mut lines = vec![
        format!("Types: {}", entry.source_type),
        format!("URIs: {}", entry.url),
        format!("Suites: {}", entry.suite),
        format!("Components: {}", entry.components.join(" ")),
    ];

    if let Some(signed_by) = opts.signed_by() {
        lines.push(deb822_field("Signed-By", signed_by));
    }
    if let Some(archs) = opts.architectures() {
        lines.push(format!("Architectures: {}", archs.join(" ")));
    }
    if let Some(langs) = opts.languages() {
        lines.push(format!("Languages: {}", langs.join(" ")));
    }
    if let Some(targets) = opts.targets() {
        lines.push(format!("Targets: {}", targets.join(" ")));
    }
    if opts.trusted {
        lines.push("Trusted: yes".to_owned());
    }

    lines.join("\n")
}

/// Write a possibly multi-line value: continuation lines are indented and
/// empty ones become ` .`
fn deb822_field(name: &str, value: &str) -> String {
    let mut lines = value.split('\n');
    let mut res = match lines.next() {
        Some(first) if !first.is_empty() => format!("{}: {}", name, first),
        _ => format!("{}:", name),
    };
    for line in lines {
        res.push_str("\n ");
        res.push_str(if line.trim().is_empty() { "." } else { line });
    }
    res
}

// Languages, targets and embedded keys have no one-line form
fn one_line(entry: &SourceEntry) -> String {
    let opts = &entry.options;
    let mut options = Vec::new();
    if let Some(signed_by) = opts.signed_by().filter(|_| !opts.has_embedded_key()) {
        options.push(format!("signed-by={}", signed_by));
    }
    if let Some(archs) = opts.architectures() {
        options.push(format!("arch={}", archs.join(",")));
    }
    if opts.trusted {
        options.push("trusted=yes".to_owned());
    }

    let mut parts = vec![entry.source_type.clone()];
    if !options.is_empty() {
        parts.push(format!("[{}]", options.join(" ")));
    }
    parts.push(entry.url.clone());
    parts.push(entry.suite.clone());
    parts.extend(entry.components.iter().cloned());

    parts.join(" ")
}
