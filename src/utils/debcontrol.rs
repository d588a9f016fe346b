//! Lenient reader for deb822 style control data (Packages, Release, .sources)
use std::collections::HashMap;

/// One stanza: field name -> accumulated value
pub type Paragraph = HashMap<String, String>;

const PGP_SIGNED_HEADER: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
const PGP_SIGNATURE_HEADER: &str = "-----BEGIN PGP SIGNATURE-----";

/// Split control data into paragraphs.
///
/// Blank lines end a paragraph, indented lines continue the current field,
/// and anything else without a colon is dropped.
pub fn parse_str(s: &str) -> Vec<Paragraph> {
    let mut res = Vec::new();
    let mut current = Paragraph::new();
    let mut current_field: Option<String> = None;

    for line in s.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                res.push(std::mem::take(&mut current));
            }
            current_field = None;
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(value) = current_field.as_ref().and_then(|f| current.get_mut(f)) {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_owned();
            current.insert(name.clone(), value.trim().to_owned());
            current_field = Some(name);
        }
    }

    if !current.is_empty() {
        res.push(current);
    }

    res
}

/// Remove the OpenPGP clearsign armor of an InRelease file.
///
/// Input without the armor is returned as is. The signature is not checked.
pub fn strip_clearsign(s: &str) -> &str {
    let s = s.trim_start();
    let body = match s.strip_prefix(PGP_SIGNED_HEADER) {
        Some(body) => body,
        None => return s,
    };
    // Armor headers (Hash: ...) end at the first blank line
    let body = match body.find("\n\n").or_else(|| body.find("\r\n\r\n")) {
        Some(pos) => body[pos..].trim_start_matches(['\r', '\n']),
        None => body,
    };
    match body.find(PGP_SIGNATURE_HEADER) {
        Some(pos) => &body[..pos],
        None => body,
    }
}
