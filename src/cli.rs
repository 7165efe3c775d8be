use crate::client::{Yql, YqlResponse};
use crate::config::ClientConfig;
use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use crate::table::load_table;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the `myql` command tree.
///
/// - `query`: send a YQL statement and print the response
/// - `desc`: describe a table
/// - `show-tables`: list the tables available to the client
/// - `table`: turn a TOML table descriptor into an Open Data Table XML file
pub fn command() -> Command<'static> {
    Command::new("myql")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML client configuration file")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("query")
                .about("Send a YQL statement and print the response")
                .after_help("Example:\n  myql query \"SELECT * FROM geo.countries WHERE place='North America'\" --pretty")
                .arg(
                    Arg::new("statement")
                        .help("YQL statement to send")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Response format: 'json' (j) or 'xml' (x)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("community")
                        .long("community")
                        .help("Load the datatables.org community tables")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("diagnostics")
                        .long("diagnostics")
                        .help("Ask YQL for diagnostics")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("pretty")
                        .short('p')
                        .long("pretty")
                        .help("Indent the response before printing it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("desc")
                .about("Describe a table")
                .arg(
                    Arg::new("table")
                        .help("Table name, e.g. weather.forecast")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(Command::new("show-tables").about("List available tables"))
        .subcommand(
            Command::new("table")
                .about("Write an Open Data Table XML file from a TOML descriptor")
                .arg(
                    Arg::new("descriptor")
                        .help("Path to the TOML table descriptor")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Directory the XML file is written to")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("File name without extension, defaults to the table name")
                        .action(ArgAction::Set),
                ),
        )
}

/// Parses command-line arguments and runs the selected subcommand.
pub async fn cli() -> AppResult<()> {
    let matches = command().get_matches();
    run(&matches).await
}

/// Runs the subcommand found in `matches`; prints help when there is none.
pub async fn run(matches: &ArgMatches) -> AppResult<()> {
    match matches.subcommand() {
        Some(("query", sub)) => {
            let mut config = resolve_config(sub)?;
            if let Some(format) = sub.get_one::<String>("format") {
                config.format = ResponseFormat::from(format.as_str());
            }
            if sub.get_flag("community") {
                config.community = true;
            }
            if sub.get_flag("diagnostics") {
                config.diagnostics = true;
            }
            let statement = sub
                .get_one::<String>("statement")
                .ok_or_else(|| AppError::InvalidInput("Missing YQL statement".into()))?;

            let yql = Yql::new(config)?;
            let response = yql.raw_query(statement, None).await?;
            print_response(&response, sub.get_flag("pretty"))?;
        }
        Some(("desc", sub)) => {
            let table = sub
                .get_one::<String>("table")
                .ok_or_else(|| AppError::InvalidInput("Missing table name".into()))?;
            let yql = Yql::new(resolve_config(sub)?)?;
            let response = yql.desc(table).await?;
            print_response(&response, true)?;
        }
        Some(("show-tables", sub)) => {
            let yql = Yql::new(resolve_config(sub)?)?;
            let response = yql.show_tables(None).await?;
            print_response(&response, true)?;
        }
        Some(("table", sub)) => {
            let descriptor = sub
                .get_one::<PathBuf>("descriptor")
                .ok_or_else(|| AppError::InvalidInput("Missing descriptor path".into()))?;
            let table = load_table(descriptor)?;
            let path = table.save(
                sub.get_one::<String>("name").map(|s| s.as_str()),
                sub.get_one::<PathBuf>("output").map(|p| p.as_path()),
            )?;
            println!("{}", path.display());
        }
        _ => {
            command()
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn resolve_config(matches: &ArgMatches) -> AppResult<ClientConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            info!(path = %path.display(), "Loading client configuration");
            ClientConfig::from_toml_file(path)
        }
        None => Ok(ClientConfig::default()),
    }
}

fn print_response(response: &YqlResponse, pretty: bool) -> AppResult<()> {
    if !response.is_success() {
        warn!(
            status = response.status(),
            error = %response.error_description().unwrap_or_default(),
            "YQL reported an error"
        );
    }
    let body = if pretty {
        response.pretty()?
    } else {
        response.body().to_string()
    };
    println!("{body}");
    Ok(())
}
