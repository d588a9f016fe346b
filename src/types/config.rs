use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/apt-explorer/config.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Request timeout in seconds
    pub timeout: u64,
    pub user_agent: String,
    pub default_suite: String,
    pub default_component: String,
    /// Directory names that hold suites, tried in order by `discover`
    pub distribution_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: 10,
            user_agent: format!("apt-explorer/{}", env!("CARGO_PKG_VERSION")),
            default_suite: "stable".to_owned(),
            default_component: "main".to_owned(),
            distribution_dirs: vec!["dists".to_owned(), "debian".to_owned(), "ubuntu".to_owned()],
        }
    }
}

impl Config {
    pub fn from_toml(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data)?;
        Ok(config)
    }

    /// Read config from `path`. Without an explicit path, the system-wide
    /// config is used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_owned(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.is_file() {
                    return Ok(Config::default());
                }
                default
            }
        };

        let data = std::fs::read_to_string(&path)
            .context(format!("Failed to read config file {}", path.display()))?;
        Config::from_toml(&data).context(format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Parser)]
#[clap(about, version)]
pub struct Opts {
    #[clap(long, help = "Path to the config file")]
    pub config: Option<PathBuf>,
    #[clap(short, long, help = "Print additional debug information")]
    pub verbose: bool,
    #[clap(subcommand)]
    pub subcmd: SubCmd,
}

#[derive(Parser)]
pub enum SubCmd {
    /// Query a repository for package information
    Query(QueryArgs),
    /// Walk a repository and generate sources configuration for its suites
    Discover(DiscoverArgs),
    /// Convert sources configuration between one-line and deb822 style
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct QueryArgs {
    /// Repository URL or a one-line `deb ...` declaration
    #[clap(long)]
    pub source: String,
    /// Suite to query, defaults to the suite of the deb line or the configured default
    #[clap(long)]
    pub suite: Option<String>,
    /// Component to query
    #[clap(long)]
    pub component: Option<String>,
    /// Architecture to query (e.g. amd64)
    #[clap(long)]
    pub arch: Option<String>,
    /// List available architectures instead of packages
    #[clap(long)]
    pub list_arch: bool,
    /// Exact package name
    #[clap(long)]
    pub package: Option<String>,
    /// Regular expression matched against package names
    #[clap(long)]
    pub regex: Option<String>,
    /// Version specification (e.g. >=1.0)
    #[clap(long)]
    pub version_spec: Option<String>,
    /// Compare versions with dpkg ordering instead of plain string ordering
    #[clap(long)]
    pub dpkg_order: bool,
    #[clap(long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

#[derive(Parser)]
pub struct DiscoverArgs {
    /// Repository URL to explore
    pub url: String,
    #[clap(long, value_enum, default_value = "deb822")]
    pub format: SourcesFormat,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Sources file to read, stdin if omitted
    pub input: Option<PathBuf>,
    /// Format to convert to
    #[clap(long, value_enum, default_value = "deb822")]
    pub to: SourcesFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
    /// One line per package with the first line of its description
    Summary,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourcesFormat {
    Deb822,
    Oneline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, 10);
        assert_eq!(config.default_suite, "stable");
    }

    #[test]
    fn test_config_partial() {
        let config = Config::from_toml("timeout = 30\ndefault_suite = \"bookworm\"\n").unwrap();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.default_suite, "bookworm");
        assert_eq!(config.default_component, "main");
    }

    #[test]
    fn test_config_bad_type() {
        assert!(Config::from_toml("timeout = \"soon\"").is_err());
    }

    #[test]
    fn test_opts() {
        let opts = Opts::try_parse_from(&[
            "apt-explorer",
            "query",
            "--source",
            "deb http://a stable main",
            "--arch",
            "amd64",
            "--version-spec",
            ">=1.0",
            "--output",
            "text",
        ])
        .unwrap();
        match opts.subcmd {
            SubCmd::Query(q) => {
                assert_eq!(q.arch.as_deref(), Some("amd64"));
                assert_eq!(q.version_spec.as_deref(), Some(">=1.0"));
                assert_eq!(q.output, OutputFormat::Text);
                assert!(!q.list_arch);
            }
            _ => panic!("expected query subcommand"),
        }

        let opts = Opts::try_parse_from(&["apt-explorer", "discover", "http://a", "--format", "oneline"])
            .unwrap();
        assert!(matches!(
            opts.subcmd,
            SubCmd::Discover(DiscoverArgs {
                format: SourcesFormat::Oneline,
                ..
            })
        ));
    }
}
