pub mod build;
pub mod paths;
pub mod render;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Arg, Command};
use quire_core::{FsContentStore, Pipeline};

use crate::config::QuireConfig;

/// Arguments shared by every subcommand that reads the content store.
pub fn add_content_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("content")
                .short('s')
                .long("content")
                .value_name("DIR")
                .help("Content directory, one sub-directory per post [default: ./content]"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./quire.toml]"),
        )
}

pub fn pipeline(config: &QuireConfig) -> Result<Pipeline> {
    let content = Path::new(&config.build.content);
    if !content.is_dir() {
        anyhow::bail!("Content directory {} does not exist", content.display());
    }

    let store = Arc::new(FsContentStore::new(content));
    Ok(Pipeline::from_config(store, &config.site)?)
}
