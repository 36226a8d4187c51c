//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves settings (flags, environment, `.env`)
//! - runs searches / option lookups against the API
//! - prints reports or hands over to the TUI

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, FilterArgs, OptionKind, OptionsArgs, ParamsArgs, SearchArgs};
use crate::config::Settings;
use crate::data::ApiClient;
use crate::domain::ValueLabel;
use crate::error::AppError;
use crate::logging::{self, Verbosity};
use crate::options::SearchOptions;
use crate::query::{partner_params, partnership_params};

pub mod pipeline;

/// Entry point for the `partners` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    // `partners` with no subcommand opens the browser.
    let command = cli.command.unwrap_or(Command::Tui(FilterArgs::default()));
    let api_url = cli.api_url;
    dispatch(command, || {
        let settings = Settings::load(api_url.as_deref())?;
        debug!(?settings, "settings resolved");
        Ok(settings)
    })
}

/// Run `command`. Settings are only resolved by commands that talk to the API.
fn dispatch(command: Command, settings: impl FnOnce() -> Result<Settings, AppError>) -> Result<(), AppError> {
    match command {
        Command::Partners(args) => handle_partners(&settings()?, &args),
        Command::Partnerships(args) => handle_partnerships(&settings()?, &args),
        Command::Options(args) => handle_options(&settings()?, &args),
        Command::Params(args) => handle_params(&args),
        Command::Tui(args) => crate::tui::run(&settings()?, args.to_raw_query()),
    }
}

fn handle_partners(settings: &Settings, args: &SearchArgs) -> Result<(), AppError> {
    let client = ApiClient::from_settings(settings)?;
    let query = pipeline::partners_page(args.filters.to_raw_query(), args.page, settings.page_size);
    let out = pipeline::search_partners(&client, &query, settings.page_size)?;

    if args.json {
        println!("{}", to_json(&out.results)?);
    } else {
        print!("{}", crate::report::format_partners(&out.results, &out.page));
    }
    Ok(())
}

fn handle_partnerships(settings: &Settings, args: &SearchArgs) -> Result<(), AppError> {
    let client = ApiClient::from_settings(settings)?;
    let query = pipeline::partnerships_page(args.filters.to_raw_query(), args.page, settings.page_size);
    let out = pipeline::search_partnerships(&client, &query, settings.page_size)?;

    if args.json {
        println!("{}", to_json(&out.results)?);
    } else {
        print!("{}", crate::report::format_partnerships(&out.results, &out.page));
    }
    Ok(())
}

fn handle_options(settings: &Settings, args: &OptionsArgs) -> Result<(), AppError> {
    let client = ApiClient::from_settings(settings)?;
    let config = client.fetch_configuration()?;
    let options = SearchOptions::from_config(&config);

    let cities_as_options = |cities: Vec<String>| -> Vec<ValueLabel> {
        cities.into_iter().map(|c| ValueLabel::new(c.clone(), c)).collect()
    };

    let out = match args.kind {
        OptionKind::Continents => crate::report::format_options(&options.continents),
        OptionKind::Countries => {
            crate::report::format_options(&options.countries_for(args.continent.as_deref().unwrap_or_default()))
        }
        OptionKind::Cities => crate::report::format_options(&cities_as_options(
            options.cities_for(args.country.as_deref().unwrap_or_default()),
        )),
        OptionKind::EducationFields => crate::report::format_options(&options.education_fields),
        OptionKind::Partners => crate::report::format_options(&options.partners),
        OptionKind::UclEntities => crate::report::format_options(&options.ucl_entities),
        OptionKind::Fundings => crate::report::format_checkboxes(&options.funding_checkboxes(&[])),
    };
    print!("{out}");
    Ok(())
}

fn handle_params(args: &ParamsArgs) -> Result<(), AppError> {
    let query = args.filters.to_raw_query();
    let partners = partner_params(&query);
    let partnerships = partnership_params(&query);

    if args.json {
        let value = serde_json::json!({
            "partners": partners,
            "partnerships": partnerships,
        });
        println!("{}", to_json(&value)?);
    } else {
        print!("{}", crate::report::format_params("partners", &partners));
        print!("{}", crate::report::format_params("partnerships", &partnerships));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))
}
