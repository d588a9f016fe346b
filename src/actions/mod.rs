mod convert;
mod discover;
mod query;

use crate::types::config::{Config, Opts, SubCmd};

use anyhow::Result;

pub async fn fullfill_command(config: &Config, opts: &Opts) -> Result<()> {
    match &opts.subcmd {
        SubCmd::Query(args) => query::query_packages(config, args).await,
        SubCmd::Discover(args) => discover::discover(config, args).await,
        SubCmd::Convert(args) => convert::convert(args),
    }
}
