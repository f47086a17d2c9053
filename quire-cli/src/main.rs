mod cmd;
mod config;

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render a date-prefixed blog content store to static HTML")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log progress at info level")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::paths::make_subcommand())
        .subcommand(cmd::render::make_subcommand())
}

fn main() {
    let matches = cli().get_matches();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if matches.get_flag("verbose") {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("paths", args)) => cmd::paths::execute(args),
        Some(("render", args)) => cmd::render::execute(args),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
