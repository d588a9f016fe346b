use anyhow::{bail, Result};

/// Modifiers of a repository declaration. `None` means not specified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceOptions {
    pub signed_by: Option<String>,
    pub architectures: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub targets: Option<Vec<String>>,
    pub trusted: bool,
}

impl SourceOptions {
    pub fn signed_by(&self) -> Option<&str> {
        self.signed_by.as_deref().filter(|s| !s.is_empty())
    }

    pub fn architectures(&self) -> Option<&[String]> {
        non_empty(&self.architectures)
    }

    pub fn languages(&self) -> Option<&[String]> {
        non_empty(&self.languages)
    }

    pub fn targets(&self) -> Option<&[String]> {
        non_empty(&self.targets)
    }

    /// `Signed-By` carries a whole public key instead of a keyring path
    pub fn has_embedded_key(&self) -> bool {
        self.signed_by().map_or(false, |s| s.contains('\n'))
    }
}

fn non_empty(list: &Option<Vec<String>>) -> Option<&[String]> {
    list.as_deref().filter(|l| !l.is_empty())
}

/// One `deb`/`deb-src` repository declaration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    pub source_type: String,
    pub url: String,
    pub suite: String,
    pub components: Vec<String>,
    pub options: SourceOptions,
}

impl SourceEntry {
    pub fn new(
        source_type: &str,
        url: &str,
        suite: &str,
        components: Vec<String>,
        options: Option<SourceOptions>,
    ) -> Result<Self> {
        if components.is_empty() {
            bail!("Source {} {} needs at least one component", url, suite);
        }

        Ok(SourceEntry {
            source_type: source_type.to_owned(),
            url: url.to_owned(),
            suite: suite.to_owned(),
            components,
            options: options.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_components() {
        assert!(SourceEntry::new("deb", "http://a", "stable", Vec::new(), None).is_err());
        let entry =
            SourceEntry::new("deb", "http://a", "stable", vec!["main".to_owned()], None).unwrap();
        assert_eq!(entry.options, SourceOptions::default());
    }

    #[test]
    fn test_empty_options_count_as_unset() {
        let opts = SourceOptions {
            signed_by: Some(String::new()),
            architectures: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(opts.signed_by(), None);
        assert_eq!(opts.architectures(), None);
        assert!(!opts.has_embedded_key());
        // But they are still distinguishable from absent
        assert_ne!(opts, SourceOptions::default());
    }
}
