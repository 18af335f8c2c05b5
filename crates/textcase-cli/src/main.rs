//! `textcase` command line tool

mod commands;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{Edit, Output};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TEXTCASE_LOG";

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Markdown document")
}

fn write_arg() -> Arg {
    Arg::new("write")
        .long("write")
        .short('w')
        .action(ArgAction::SetTrue)
        .help("Write the result back instead of printing it")
}

fn cli() -> Command {
    Command::new("textcase")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve heading addresses in Markdown documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML engine configuration"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless TEXTCASE_LOG is set"),
        )
        .subcommand(
            Command::new("compile")
                .about("Print the structural query an address compiles to")
                .arg(Arg::new("address").required(true).help("Address, e.g. Login/TC-1")),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve an address in a document")
                .arg(file_arg())
                .arg(Arg::new("address").help("Address; the whole document if omitted"))
                .arg(
                    Arg::new("text")
                        .long("text")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json")
                        .help("Print each node's text"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("ensure-head")
                .about("Create missing headings along a path")
                .arg(file_arg())
                .arg(
                    Arg::new("segments")
                        .required(true)
                        .num_args(1..)
                        .help("Heading path, outermost first"),
                )
                .arg(write_arg()),
        )
        .subcommand(
            Command::new("ensure-meta")
                .about("Insert a metadata block if the document has none")
                .arg(file_arg())
                .arg(write_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn file(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("file").context("missing file argument")
}

fn emit(edit: Edit) -> Result<()> {
    match edit {
        Edit::Unchanged => eprintln!("nothing to change"),
        Edit::Written => {}
        Edit::Buffer(buffer) => std::io::stdout()
            .write_all(&buffer)
            .context("failed to write to stdout")?,
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = commands::load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("compile", args)) => {
            let address = args.get_one::<String>("address").context("missing address")?;
            println!("{}", commands::compile(address));
        }
        Some(("resolve", args)) => {
            let output = if args.get_flag("json") {
                Output::Json
            } else if args.get_flag("text") {
                Output::Text
            } else {
                Output::Summary
            };
            let address = args.get_one::<String>("address").map(String::as_str);
            print!("{}", commands::resolve(file(args)?, address, output, &config)?);
        }
        Some(("ensure-head", args)) => {
            let segments: Vec<String> = args
                .get_many::<String>("segments")
                .context("missing heading path")?
                .cloned()
                .collect();
            let edit = commands::ensure_head(file(args)?, &segments, args.get_flag("write"), &config)?;
            emit(edit)?;
        }
        Some(("ensure-meta", args)) => {
            let edit = commands::ensure_meta(file(args)?, args.get_flag("write"), &config)?;
            emit(edit)?;
        }
        _ => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));
    run(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["textcase", "resolve", "doc.md", "A/B", "--json", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "resolve");
        assert!(args.get_flag("json"));
        assert_eq!(args.get_one::<String>("address").map(String::as_str), Some("A/B"));
    }

    #[test]
    fn ensure_head_collects_segments() {
        let matches = cli()
            .try_get_matches_from(["textcase", "ensure-head", "doc.md", "A", "B", "C", "--write"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let segments: Vec<&String> = args.get_many::<String>("segments").unwrap().collect();
        assert_eq!(segments, ["A", "B", "C"]);
        assert!(args.get_flag("write"));
    }

    #[test]
    fn text_and_json_conflict() {
        assert!(cli()
            .try_get_matches_from(["textcase", "resolve", "doc.md", "--text", "--json"])
            .is_err());
    }
}
