use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use isbncite::sources::SourceKind;

pub fn arg_parser() -> Command {
    Command::new("isbncite")
        .about("Look up books by ISBN and format MLA citations")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file [default: config.toml]"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output"),
        )
        .subcommand(Command::new("serve").about("Serve the lookup form and JSON API"))
        .subcommand(
            Command::new("lookup")
                .about("Look up a book and print its citation")
                .arg(Arg::new("isbn").required(true))
                .arg(
                    Arg::new("source")
                        .long("source")
                        .short('s')
                        .value_parser(SourceKind::ALL.map(|kind| kind.as_str()))
                        .help("Use this source instead of the configured one"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the whole record as JSON"),
                ),
        )
        .subcommand(
            Command::new("submit")
                .about("Relay a citation to the form endpoint")
                .arg(Arg::new("citation").required(true))
                .arg(Arg::new("quantity").required(true)),
        )
        .subcommand(Command::new("config").about("Print the default configuration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_consistent() {
        arg_parser().debug_assert();
    }

    #[test]
    fn lookup_with_source() {
        let matches = arg_parser()
            .try_get_matches_from(["isbncite", "lookup", "978-0136019701", "--source", "scrape"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "lookup");
        assert_eq!(sub.get_one::<String>("isbn").unwrap(), "978-0136019701");
        assert_eq!(sub.get_one::<String>("source").unwrap(), "scrape");
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(arg_parser()
            .try_get_matches_from(["isbncite", "lookup", "9780136019701", "--source", "amazon"])
            .is_err());
    }
}
