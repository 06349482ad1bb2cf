use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use substitution_advisor::advisor::Advisor;
use substitution_advisor::config::{Config, ConfigOverrides, InputPolicy};
use substitution_advisor::output::csv::{
    candidates_to_csv, recommendation_to_csv, roster_to_csv, timeline_to_csv,
};
use substitution_advisor::output::render_json;
use substitution_advisor::output::table::{
    render_candidates_table, render_recommendation_table, render_roster_table,
    render_timeline_table,
};
use substitution_advisor::rating::load_predictor;
use substitution_advisor::roster::loader::load_roster_file;
use substitution_advisor::roster::Roster;
use substitution_advisor::server::{run_server, ApiState};
use substitution_advisor::types::{MatchState, MatchStateInput, TimelineRow};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Clamp,
    Reject,
}

impl From<PolicyArg> for InputPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Clamp => InputPolicy::Clamp,
            PolicyArg::Reject => InputPolicy::Reject,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "substitution-advisor",
    about = "In-match substitution and pressing advice"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    roster: Option<String>,
    #[arg(long = "rating-model")]
    rating_model: Option<String>,
    #[arg(long = "input-policy", value_enum)]
    input_policy: Option<PolicyArg>,
    #[arg(long = "fatigue-seed")]
    fatigue_seed: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct MatchArgs {
    #[arg(short, long, allow_negative_numbers = true)]
    minute: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    wbgt: Option<f64>,
    #[arg(long = "altitude", allow_negative_numbers = true)]
    altitude_m: Option<f64>,
    #[arg(long = "risk-aversion", allow_negative_numbers = true)]
    risk_aversion: Option<f64>,
}

impl From<MatchArgs> for MatchStateInput {
    fn from(value: MatchArgs) -> Self {
        Self {
            minute: value.minute,
            wbgt: value.wbgt,
            altitude_m: value.altitude_m,
            risk_aversion: value.risk_aversion,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Recommend {
        #[command(flatten)]
        state: MatchArgs,
    },
    Candidates {
        #[command(flatten)]
        state: MatchArgs,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    Timeline {
        #[command(flatten)]
        state: MatchArgs,
        #[arg(long)]
        player: Option<String>,
    },
    Roster,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        roster_path: cli.roster.clone(),
        rating_model_path: cli.rating_model.clone(),
        input_policy: cli.input_policy.map(InputPolicy::from),
        fatigue_seed: cli.fatigue_seed.clone(),
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }

    let roster = load_roster(&config)?;
    let predictor = load_predictor(config.resolved_rating_model_path().as_deref());
    let advisor = Advisor::new(config.model.clone(), predictor);

    match &cli.command {
        Commands::Recommend { state } => {
            let state = resolve_state(&config, state)?;
            let advice = advisor.recommend(&state, &roster);
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_recommendation_table(&advice.recommendation))
                }
                OutputFormat::Json => println!("{}", render_json(&advice)?),
                OutputFormat::Csv => {
                    println!("{}", recommendation_to_csv(&advice.recommendation)?)
                }
            }
        }
        Commands::Candidates { state, top } => {
            let state = resolve_state(&config, state)?;
            let candidates = advisor.candidates(&state, &roster, *top);
            match cli.output {
                OutputFormat::Table => println!("{}", render_candidates_table(&candidates)),
                OutputFormat::Json => println!("{}", render_json(&candidates)?),
                OutputFormat::Csv => println!("{}", candidates_to_csv(&candidates)?),
            }
        }
        Commands::Timeline { state, player } => {
            if let Some(player) = player {
                if roster.get(player).is_none() {
                    return Err(anyhow!("unknown player: {player}"));
                }
            }
            let state = resolve_state(&config, state)?;
            let mut rows = advisor.timeline(&state, &roster);
            if let Some(player) = player {
                rows.retain(|row| &row.player_id == player);
            }
            print_timeline(&rows, cli.output)?;
        }
        Commands::Roster => match cli.output {
            OutputFormat::Table => println!("{}", render_roster_table(&roster)),
            OutputFormat::Json => println!("{}", render_json(&roster)?),
            OutputFormat::Csv => print!("{}", roster_to_csv(&roster)?),
        },
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(ApiState::new(config, roster, advisor), addr).await;
        }
        Commands::Config { .. } => unreachable!("config command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &PathBuf) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn load_roster(config: &Config) -> Result<Roster> {
    match config.resolved_roster_path() {
        Some(path) => {
            let roster = load_roster_file(&path)?;
            info!(
                "loaded roster from {}: {} on pitch, {} on bench",
                path.display(),
                roster.pitch().len(),
                roster.bench().len()
            );
            Ok(roster)
        }
        None => Ok(Roster::sample()),
    }
}

fn resolve_state(config: &Config, args: &MatchArgs) -> Result<MatchState> {
    let input = MatchStateInput::from(args.clone());
    Ok(input.resolve(&config.match_defaults, &config.inputs)?)
}

fn print_timeline(rows: &[TimelineRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_timeline_table(rows)),
        OutputFormat::Json => println!("{}", render_json(rows)?),
        OutputFormat::Csv => print!("{}", timeline_to_csv(rows)?),
    }
    Ok(())
}
