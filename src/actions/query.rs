use crate::{
    debug, info,
    query::PackageQuery,
    repo::Discovery,
    sources::parse_deb_line,
    types::{
        config::{Config, OutputFormat, QueryArgs},
        CompareMode, PackageRecord,
    },
    warn,
};

use anyhow::{bail, format_err, Context, Result};
use console::style;

/// Where to look for packages
#[derive(Debug, PartialEq, Eq)]
struct QueryTarget {
    url: String,
    suite: String,
    component: String,
    arch: Option<String>,
}

/// Command line flags win over values taken from a deb line, which win over config defaults
fn resolve_target(config: &Config, args: &QueryArgs) -> Result<QueryTarget> {
    let source = args.source.trim();
    let entry = if source.starts_with("deb ") || source.starts_with("deb-src ") {
        match parse_deb_line(source) {
            Some(entry) => Some(entry),
            None => bail!("Invalid deb line: {}", source),
        }
    } else {
        None
    };

    let (url, suite, component, arch) = match entry {
        Some(entry) => (
            entry.url,
            Some(entry.suite),
            entry.components.into_iter().next(),
            entry
                .options
                .architectures
                .and_then(|archs| archs.into_iter().next()),
        ),
        None => (source.to_owned(), None, None, None),
    };

    Ok(QueryTarget {
        url,
        suite: args
            .suite
            .clone()
            .or(suite)
            .unwrap_or_else(|| config.default_suite.clone()),
        component: args
            .component
            .clone()
            .or(component)
            .unwrap_or_else(|| config.default_component.clone()),
        arch: args.arch.clone().or(arch),
    })
}

fn build_query(args: &QueryArgs) -> PackageQuery {
    PackageQuery {
        name: args.package.clone(),
        regex: args.regex.clone(),
        version: args.version_spec.clone(),
        mode: if args.dpkg_order {
            CompareMode::Dpkg
        } else {
            CompareMode::Lexicographic
        },
    }
}

pub async fn query_packages(config: &Config, args: &QueryArgs) -> Result<()> {
    let target = resolve_target(config, args)?;
    debug!("Query target: {:?}", target);
    let discovery = Discovery::new(&target.url, config)?;
    let suite_url = discovery.navigate(&["dists", target.suite.as_str()])?;

    if args.list_arch {
        info!("Reading metadata of suite {}...", style(&target.suite).bold());
        let (_, release) = discovery
            .fetch_release(&suite_url)
            .await
            .context("Could not find Release file")?;
        match args.output {
            OutputFormat::Json => {
                let res = serde_json::json!({ "architectures": release.architectures });
                println!("{}", serde_json::to_string_pretty(&res)?);
            }
            OutputFormat::Text | OutputFormat::Summary => {
                println!("Available architectures:");
                for arch in &release.architectures {
                    println!("  - {}", arch);
                }
            }
        }
        return Ok(());
    }

    let arch = target
        .arch
        .as_deref()
        .ok_or_else(|| format_err!("--arch is required for package queries"))?;
    // Suite metadata is only needed to verify the index
    let release = match discovery.fetch_release(&suite_url).await {
        Ok((url, release)) => {
            debug!("Using suite metadata from {}", url);
            Some(release)
        }
        Err(e) => {
            warn!("Suite metadata unavailable, the package index will not be verified.");
            debug!("{:#}", e);
            None
        }
    };

    info!(
        "Fetching package index for {}/{} ({})...",
        &target.suite, &target.component, arch
    );
    let pkgs = discovery
        .load_packages(&target.suite, &target.component, arch, release.as_ref())
        .await?;
    debug!("{} packages in index", pkgs.len());

    let query = build_query(args);
    if query.is_empty() {
        debug!("No filter given, printing the whole index");
    }
    let pkgs = query.apply(&pkgs)?;
    if pkgs.is_empty() {
        warn!("No package matches the query.");
    }
    print!("{}", render_packages(&pkgs, args.output));
    Ok(())
}

fn render_packages(pkgs: &[PackageRecord], output: OutputFormat) -> String {
    match output {
        // One compact object per line, still a valid JSON array
        OutputFormat::Json => {
            if pkgs.is_empty() {
                return "[]\n".to_owned();
            }
            let objects: Vec<String> = pkgs.iter().map(PackageRecord::to_json).collect();
            format!("[\n{}\n]\n", objects.join(",\n"))
        }
        OutputFormat::Text => pkgs.iter().map(|pkg| format!("{}\n\n", pkg)).collect(),
        OutputFormat::Summary => pkgs
            .iter()
            .map(|pkg| {
                let line = format!(
                    "{} {} [{}] {}",
                    pkg.name,
                    pkg.version,
                    pkg.architecture,
                    pkg.synopsis().unwrap_or("")
                );
                format!("{}\n", line.trim_end())
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{Opts, SubCmd};
    use clap::Parser;

    fn args(extra: &[&str]) -> QueryArgs {
        let mut argv = vec!["apt-explorer", "query"];
        argv.extend_from_slice(extra);
        match Opts::try_parse_from(argv).unwrap().subcmd {
            SubCmd::Query(q) => q,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_target_from_url() {
        let config = Config::default();
        let target = resolve_target(&config, &args(&["--source", "http://a.example/debian"])).unwrap();
        assert_eq!(
            target,
            QueryTarget {
                url: "http://a.example/debian".to_owned(),
                suite: "stable".to_owned(),
                component: "main".to_owned(),
                arch: None,
            }
        );
    }

    #[test]
    fn test_target_from_deb_line() {
        let config = Config::default();
        let a = args(&[
            "--source",
            "deb [arch=arm64,amd64] http://a.example/ubuntu jammy universe main",
        ]);
        let target = resolve_target(&config, &a).unwrap();
        assert_eq!(target.url, "http://a.example/ubuntu");
        assert_eq!(target.suite, "jammy");
        assert_eq!(target.component, "universe");
        assert_eq!(target.arch.as_deref(), Some("arm64"));

        // Flags take precedence
        let a = args(&[
            "--source",
            "deb http://a.example/ubuntu jammy universe",
            "--suite",
            "noble",
            "--component",
            "main",
            "--arch",
            "riscv64",
        ]);
        let target = resolve_target(&config, &a).unwrap();
        assert_eq!(target.suite, "noble");
        assert_eq!(target.component, "main");
        assert_eq!(target.arch.as_deref(), Some("riscv64"));
    }

    #[test]
    fn test_invalid_deb_line() {
        let config = Config::default();
        assert!(resolve_target(&config, &args(&["--source", "deb http://a.example"])).is_err());
    }

    #[test]
    fn test_build_query() {
        let q = build_query(&args(&["--source", "x", "--regex", "^lib", "--dpkg-order"]));
        assert_eq!(q.regex.as_deref(), Some("^lib"));
        assert_eq!(q.name, None);
        assert_eq!(q.mode, CompareMode::Dpkg);

        let q = build_query(&args(&["--source", "x", "--version-spec", "<2"]));
        assert_eq!(q.mode, CompareMode::Lexicographic);
        assert_eq!(q.version.as_deref(), Some("<2"));
    }

    #[test]
    fn test_empty_query() {
        assert!(build_query(&args(&["--source", "x"])).is_empty());
        assert!(!build_query(&args(&["--source", "x", "--package", "curl"])).is_empty());
    }

    fn sample() -> Vec<PackageRecord> {
        vec![
            PackageRecord {
                name: "curl".to_owned(),
                version: "7.88.1-10".to_owned(),
                architecture: "amd64".to_owned(),
                description: Some("transfer tool\n more text".to_owned()),
                ..Default::default()
            },
            PackageRecord {
                name: "base-files".to_owned(),
                version: "12.4".to_owned(),
                architecture: "all".to_owned(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_render_json() {
        let out = render_packages(&sample(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["package"], "curl");
        assert_eq!(items[1]["description"], serde_json::Value::Null);
        assert_eq!(render_packages(&[], OutputFormat::Json), "[]\n");
    }

    #[test]
    fn test_render_summary() {
        assert_eq!(
            render_packages(&sample(), OutputFormat::Summary),
            "curl 7.88.1-10 [amd64] transfer tool\nbase-files 12.4 [all]\n"
        );
    }
}
