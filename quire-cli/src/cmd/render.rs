use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::{add_content_args, pipeline};
use crate::config::QuireConfig;

pub fn make_subcommand() -> Command {
    add_content_args(Command::new("render"))
        .about("Render a single post and print its HTML fragment")
        .arg(
            Arg::new("slug")
                .value_name("SLUG")
                .help("Post slug, the directory name without its date prefix")
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the fragment together with its metadata as JSON")
                .action(ArgAction::SetTrue),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = QuireConfig::load(args)?;
    let slug = args
        .get_one::<String>("slug")
        .context("Missing slug argument")?;

    let page = pipeline(&config)?
        .render_slug(slug)
        .with_context(|| format!("Failed to render {slug}"))?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", page.markup);
    }

    Ok(())
}
