use crate::{
    debug, info, msg,
    repo::{Discovery, EntryKind, ReleaseFile},
    sources::SourcesBuilder,
    success,
    types::{
        config::{Config, DiscoverArgs, SourcesFormat},
        SourceOptions,
    },
    warn,
};

use anyhow::{Context, Result};
use console::style;
use futures_util::future::join_all;

pub async fn discover(config: &Config, args: &DiscoverArgs) -> Result<()> {
    let discovery = Discovery::new(&args.url, config)?;
    info!("Exploring {}...", style(&args.url).bold());
    let items = discovery.list_directory(&args.url).await?;
    if items.is_empty() {
        warn!("No items found at {}", &args.url);
        return Ok(());
    }

    let dirs: Vec<&str> = items
        .iter()
        .filter(|item| item.kind == EntryKind::Dir)
        .map(|item| item.name.as_str())
        .collect();
    crate::WRITER.write_chunks(&style("DIRS").dim().to_string(), &dirs)?;

    let dists_dir = match config
        .distribution_dirs
        .iter()
        .find(|d| dirs.contains(&d.as_str()))
    {
        Some(d) => d,
        None => {
            warn!("No distribution directory found at {}", &args.url);
            return Ok(());
        }
    };
    info!("Found distributions directory: {}", style(dists_dir).bold());

    let dists_url = discovery.navigate(&[dists_dir])?;
    let suites: Vec<String> = discovery
        .list_directory(&dists_url)
        .await?
        .into_iter()
        .filter(|item| item.kind == EntryKind::Dir)
        .map(|item| item.name)
        .collect();
    if suites.is_empty() {
        warn!("No suites found in {}", dists_url);
        return Ok(());
    }

    // Read metadata of every suite at once
    let releases = join_all(
        suites
            .iter()
            .map(|suite| read_suite(&discovery, dists_dir, suite)),
    )
    .await;

    let mut found = 0;
    for (suite, release) in suites.iter().zip(releases) {
        let release = match release {
            Ok(Some(release)) => release,
            Ok(None) => {
                debug!("No Release file in suite {}", suite);
                continue;
            }
            Err(e) => {
                warn!("Failed to read metadata of suite {}: {:#}", suite, e);
                continue;
            }
        };
        if release.architectures.is_empty() && release.components.is_empty() {
            continue;
        }
        found += 1;

        success!("Suite {}", style(suite).bold());
        for (name, value) in [
            ("Origin", &release.origin),
            ("Label", &release.label),
            ("Codename", &release.codename),
        ] {
            if let Some(value) = value {
                msg!("", "{}: {}", name, value);
            }
        }
        msg!("", "Architectures: {}", release.architectures.join(", "));
        msg!("", "Components: {}", release.components.join(", "));

        let (components, options) = suite_layout(&release);
        let mut builder = SourcesBuilder::new();
        builder.add_source("deb", &args.url, suite, components, Some(options))?;
        match args.format {
            SourcesFormat::Deb822 => println!("{}\n", builder.build_deb822()),
            SourcesFormat::Oneline => {
                for line in builder.build_one_line() {
                    println!("{}", line);
                }
                println!();
            }
        }
    }

    if found == 0 {
        warn!("No suite with usable metadata found.");
    }

    Ok(())
}

async fn read_suite(
    discovery: &Discovery,
    dists_dir: &str,
    suite: &str,
) -> Result<Option<ReleaseFile>> {
    let suite_url = discovery.navigate(&[dists_dir, suite])?;
    let release_url = match discovery.find_release_file(&suite_url).await? {
        Some(url) => url,
        None => return Ok(None),
    };
    let release = discovery
        .get_release(&release_url)
        .await
        .context(format!("Failed to read {}", release_url))?;
    Ok(Some(release))
}

/// Components and options declared for a suite, pinned to its first real architecture
fn suite_layout(release: &ReleaseFile) -> (Vec<String>, SourceOptions) {
    let arch = release
        .architectures
        .iter()
        .find(|arch| arch.as_str() != "all")
        .cloned();
    let components = if release.components.is_empty() {
        vec!["main".to_owned()]
    } else {
        release.components.clone()
    };

    let options = SourceOptions {
        architectures: arch.map(|a| vec![a]),
        ..Default::default()
    };
    (components, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_layout() {
        let release = ReleaseFile {
            architectures: vec!["all".to_owned(), "amd64".to_owned(), "arm64".to_owned()],
            components: vec!["main".to_owned(), "contrib".to_owned()],
            ..Default::default()
        };
        let (components, options) = suite_layout(&release);
        assert_eq!(options.architectures, Some(vec!["amd64".to_owned()]));

        let mut builder = SourcesBuilder::new();
        builder
            .add_source("deb", "http://a.example/debian", "bookworm", components, Some(options))
            .unwrap();
        assert_eq!(
            builder.build_one_line(),
            vec!["deb [arch=amd64] http://a.example/debian bookworm main contrib"]
        );
    }

    #[test]
    fn test_suite_layout_without_components() {
        let release = ReleaseFile {
            architectures: vec!["all".to_owned()],
            ..Default::default()
        };
        let (components, options) = suite_layout(&release);
        assert_eq!(components, vec!["main"]);
        assert_eq!(options, SourceOptions::default());
    }
}
