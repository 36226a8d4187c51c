//! Command-line parsing for the partnerships directory browser.
//!
//! Argument parsing and command dispatch stay separate from the query and
//! option logic; this module only turns flags into URL-style query state.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::query::RawQuery;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "partners", version, about = "Browse and filter institutional partnerships")]
pub struct Cli {
    /// Base URL of the partnerships API (overrides PARTNERS_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search partners and print one page of results.
    Partners(SearchArgs),
    /// Search partnerships and print one page with mobility types.
    Partnerships(SearchArgs),
    /// Print an option list from the configuration endpoint.
    Options(OptionsArgs),
    /// Print the partner and partnership parameters built from a query (offline).
    Params(ParamsArgs),
    /// Launch the interactive browser (default).
    Tui(FilterArgs),
}

/// Search filters, expressed as flags or as a raw URL query.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// URL query string, e.g. "continent=Europe&funding=Erasmus%2B".
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long)]
    pub continent: Option<String>,

    /// Country ISO code.
    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// Partner id.
    #[arg(long)]
    pub partner: Option<String>,

    /// UCL entity id.
    #[arg(long)]
    pub ucl_entity: Option<String>,

    #[arg(long)]
    pub education_field: Option<String>,

    /// Mobility type (student, staff); repeatable.
    #[arg(long)]
    pub mobility_type: Vec<String>,

    /// Funding type; repeatable.
    #[arg(long)]
    pub funding: Vec<String>,
}

impl FilterArgs {
    /// URL state equivalent to these flags. Flags override keys of `--query`.
    pub fn to_raw_query(&self) -> RawQuery {
        let mut query = self.query.as_deref().map(RawQuery::parse).unwrap_or_default();

        let singles = [
            ("continent", &self.continent),
            ("country", &self.country),
            ("city", &self.city),
            ("partner", &self.partner),
            ("ucl_entity", &self.ucl_entity),
            ("education_field", &self.education_field),
        ];
        for (key, value) in singles {
            if let Some(value) = value {
                query.insert(key, value.as_str());
            }
        }
        for (key, values) in [("mobility_type", &self.mobility_type), ("funding", &self.funding)] {
            if !values.is_empty() {
                query.insert(key, values.clone());
            }
        }
        query
    }
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Print the raw JSON response instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Which option list to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionKind {
    Continents,
    Countries,
    Cities,
    EducationFields,
    Partners,
    UclEntities,
    Fundings,
}

#[derive(Debug, Args, Clone)]
pub struct OptionsArgs {
    #[arg(value_enum)]
    pub kind: OptionKind,

    /// Restrict countries to this continent.
    #[arg(long)]
    pub continent: Option<String>,

    /// Restrict cities to this country ISO code.
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Emit JSON instead of key=value lines.
    #[arg(long)]
    pub json: bool,
}
