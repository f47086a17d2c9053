use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use super::{add_content_args, pipeline};
use crate::config::QuireConfig;

#[derive(Serialize)]
struct PathEntry<'a> {
    params: Params<'a>,
}

#[derive(Serialize)]
struct Params<'a> {
    slug: &'a str,
}

pub fn make_subcommand() -> Command {
    add_content_args(Command::new("paths"))
        .about("List every slug that will be rendered, most recent first")
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the path list as JSON")
                .action(ArgAction::SetTrue),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = QuireConfig::load(args)?;
    let slugs = pipeline(&config)?.enumerate()?;

    if args.get_flag("json") {
        let entries: Vec<PathEntry> = slugs
            .iter()
            .map(|slug| PathEntry {
                params: Params { slug },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for slug in &slugs {
            println!("{slug}");
        }
    }

    Ok(())
}
