use std::{env, path::PathBuf};

use anyhow::Result;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod command_parser;

use isbncite::{
    config::Config,
    http,
    lookup::CitationService,
    relay::SubmissionRelay,
    server::{self, TheStateOfAffairs},
    sources::{self, SourceKind},
};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args_parsed = command_parser::arg_parser().get_matches_from(env::args_os());

    // A missing .env file is fine.
    let _ = dotenv();
    init_tracing(args_parsed.get_flag("verbose"));

    let config_path = args_parsed.get_one::<PathBuf>("config");
    let config = Config::read_config(config_path.map(PathBuf::as_path))?;
    let client = http::build_client(&config.http.user_agent)?;

    match args_parsed.subcommand() {
        Some(("serve", _)) => {
            let state = TheStateOfAffairs {
                service: CitationService::new(sources::from_config(&config, &client)?),
                relay:   SubmissionRelay::new(client.clone(), &config.relay),
            };
            server::start(&config.server, state).await?;
        }
        Some(("lookup", matches)) => {
            let source = match matches.get_one::<String>("source") {
                Some(kind) => kind.parse::<SourceKind>()?.build(&config, &client)?,
                None => sources::from_config(&config, &client)?,
            };
            let isbn = matches
                .get_one::<String>("isbn")
                .map(String::as_str)
                .unwrap_or_default();
            let record = CitationService::new(source).cite(isbn).await?;
            if matches.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else if let Some(citation) = record.mla_citation() {
                println!("{citation}");
            }
        }
        Some(("submit", matches)) => {
            let citation = matches
                .get_one::<String>("citation")
                .map(String::as_str)
                .unwrap_or_default();
            let quantity = matches
                .get_one::<String>("quantity")
                .map(String::as_str)
                .unwrap_or_default();
            SubmissionRelay::new(client, &config.relay)
                .submit(citation, quantity)
                .await?;
            println!("Citation submitted.");
        }
        Some(("config", _)) => {
            print!("{}", Config::default_as_string()?);
        }
        Some((name, _)) => unimplemented!("{}", name),
        None => unreachable!("subcommand required"),
    }

    Ok(())
}
