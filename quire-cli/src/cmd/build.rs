use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use quire_core::PageAssembler;
use std::path::Path;
use tracing::info;

use super::{add_content_args, pipeline};
use crate::config::QuireConfig;

pub fn add_build_args(command: Command) -> Command {
    add_content_args(command)
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated pages [default: ./out]"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Template directory overriding the built-in templates [default: ./theme]"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build")).about("Render every post and write the static blog")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = QuireConfig::load(args)?;
    let build_config = &config.build;

    let output_dir = Path::new(&build_config.output);
    let theme_dir = Path::new(&build_config.theme);

    let pages = pipeline(&config)?
        .build_all()
        .context("Failed to render posts")?;

    let assembler = if theme_dir.is_dir() {
        info!(theme = %theme_dir.display(), "using theme templates");
        PageAssembler::with_theme(config.site.site.clone(), theme_dir)?
    } else {
        PageAssembler::new(config.site.site.clone())?
    };
    assembler
        .write_site(output_dir, &pages)
        .with_context(|| format!("Failed to write site to {}", output_dir.display()))?;

    println!(
        "Built {} posts in {}",
        pages.len(),
        output_dir.join("blog").display()
    );

    Ok(())
}
