use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use crate::bankroll;
use crate::cards::{format_cards, parse_card, parse_cards, Rank};
use crate::config::EngineConfig;
use crate::counting::{analyze, catalog};
use crate::display::{
    bankroll_table, cards_display, requirement_table, count_table, decision_summary, decision_table, print_error,
    print_section, shoe_table, styled_action, systems_table,
};
use crate::engine::DecisionEngine;
use crate::error::EngineResult;
use crate::logging::{init_logging, resolve_level};
use crate::request::{
    validate_counting_system, validate_decks, validate_penetration, BankrollRequest,
    DecisionRequest,
};
use crate::shoe::Shoe;

#[derive(Parser)]
#[command(name = "bjev", version = "1.0.0", about = "Blackjack EV engine: Monte Carlo play decisions, card counting and Kelly bet sizing.")]
struct Cli {
    /// JSON engine configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Best play for a hand by simulated EV
    Decide {
        /// Player cards (e.g., "8,8" or "A 7")
        cards: String,
        /// Dealer upcard (e.g., 10, K, A)
        dealer: String,
        /// Other cards already seen in this shoe
        #[arg(short, long)]
        seen: Option<String>,
        /// Decks in the shoe
        #[arg(short, long)]
        decks: Option<f64>,
        /// Counting system for deriving the true count
        #[arg(long)]
        system: Option<String>,
        /// True count (derived from seen cards when omitted)
        #[arg(short, long = "true-count", allow_hyphen_values = true)]
        true_count: Option<f64>,
        /// Fraction of the shoe already dealt
        #[arg(short, long)]
        penetration: Option<f64>,
        /// Monte Carlo trials per action
        #[arg(short = 'n', long)]
        trials: Option<usize>,
        /// RNG seed for a reproducible result
        #[arg(long)]
        seed: Option<u64>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Running and true count for the cards seen so far
    Count {
        /// Cards seen (e.g., "2 5 K A 9")
        cards: String,
        /// Decks in the shoe
        #[arg(short, long)]
        decks: Option<f64>,
        /// Counting system
        #[arg(long)]
        system: Option<String>,
        /// Fraction of the shoe already dealt (overrides the seen-card estimate)
        #[arg(short, long)]
        penetration: Option<f64>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Remaining shoe composition
    Shoe {
        /// Decks in the shoe
        #[arg(short, long)]
        decks: Option<f64>,
        /// Cards already dealt
        #[arg(short, long)]
        seen: Option<String>,
    },
    /// Kelly bet size, risk of ruin, and growth estimate
    Bankroll {
        /// Current bankroll
        bankroll: f64,
        /// Current true count
        #[arg(short, long = "true-count", default_value = "0", allow_hyphen_values = true)]
        true_count: f64,
        /// Largest share of bankroll for one bet (0-1]
        #[arg(short, long = "risk", default_value = "0.02")]
        risk_tolerance: f64,
        /// Table minimum
        #[arg(long, default_value = "10")]
        min_bet: f64,
        /// Table maximum
        #[arg(long, default_value = "500")]
        max_bet: f64,
        /// Counting system (sets the efficiency used for the edge)
        #[arg(long)]
        system: Option<String>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Bankroll needed to target an income per session
    Plan {
        /// Target income per session
        desired_income: f64,
        /// Sessions played each week (1-7)
        #[arg(short, long = "sessions", default_value = "3")]
        sessions_per_week: u32,
        /// Planning horizon in weeks
        #[arg(short, long, default_value = "12")]
        weeks: u32,
        /// Acceptable risk (0-1]
        #[arg(short, long = "risk", default_value = "0.02")]
        risk_tolerance: f64,
        /// Expected average true count while playing
        #[arg(short = 't', long = "avg-true-count", default_value = "1", allow_hyphen_values = true)]
        avg_true_count: f64,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// List supported counting systems
    Systems,
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn load_config(path: Option<&PathBuf>) -> EngineResult<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p),
        None => Ok(EngineConfig::default()),
    }
}

fn parse_optional_cards(cards: Option<&str>) -> EngineResult<Vec<Rank>> {
    match cards {
        Some(s) => parse_cards(s),
        None => Ok(Vec::new()),
    }
}

fn dispatch(cli: Cli) {
    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };
    init_logging(resolve_level(cli.verbose, &config.log_level));

    let result = match cli.command {
        Commands::Decide {
            cards,
            dealer,
            seen,
            decks,
            system,
            true_count,
            penetration,
            trials,
            seed,
            json,
        } => cmd_decide(
            config,
            DecideArgs {
                cards,
                dealer,
                seen,
                decks,
                system,
                true_count,
                penetration,
                trials,
                seed,
                json,
            },
        ),
        Commands::Count {
            cards,
            decks,
            system,
            penetration,
            json,
        } => cmd_count(&config, cards, decks, system, penetration, json),
        Commands::Shoe { decks, seen } => cmd_shoe(&config, decks, seen),
        Commands::Bankroll {
            bankroll,
            true_count,
            risk_tolerance,
            min_bet,
            max_bet,
            system,
            json,
        } => cmd_bankroll(
            BankrollRequest {
                bankroll,
                true_count,
                risk_tolerance,
                min_bet,
                max_bet,
                counting_system: system.unwrap_or_else(|| config.default_system.clone()),
            },
            json,
        ),
        Commands::Plan {
            desired_income,
            sessions_per_week,
            weeks,
            risk_tolerance,
            avg_true_count,
            json,
        } => cmd_plan(
            desired_income,
            sessions_per_week,
            weeks,
            risk_tolerance,
            avg_true_count,
            json,
        ),
        Commands::Systems => {
            cmd_systems();
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(&e.to_string());
    }
}

struct DecideArgs {
    cards: String,
    dealer: String,
    seen: Option<String>,
    decks: Option<f64>,
    system: Option<String>,
    true_count: Option<f64>,
    penetration: Option<f64>,
    trials: Option<usize>,
    seed: Option<u64>,
    json: bool,
}

fn cmd_decide(mut config: EngineConfig, args: DecideArgs) -> EngineResult<()> {
    if let Some(n) = args.trials {
        config.trials = n.max(1);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut request = DecisionRequest::new(
        parse_cards(&args.cards)?,
        parse_card(&args.dealer)?,
        args.decks.unwrap_or(config.default_decks),
    )
    .with_seen(parse_optional_cards(args.seen.as_deref())?)
    .with_system(args.system.as_deref().unwrap_or(&config.default_system));
    if let Some(tc) = args.true_count {
        request = request.with_true_count(tc);
    }
    if let Some(p) = args.penetration {
        request = request.with_penetration(p);
    }

    let engine = DecisionEngine::new(config);
    let decision = engine.decide(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} vs dealer {}",
        cards_display(&request.cards),
        cards_display(&[request.dealer_card])
    );
    println!(
        "  {}  {}",
        styled_action(decision.action),
        format!("EV {:+.3}", decision.expected_value).bold()
    );
    println!();
    println!("{}", decision_table(&decision));
    println!("{}", decision_summary(&decision));
    print_section("Reasoning", &decision.reasoning);
    println!();
    Ok(())
}

fn cmd_count(
    config: &EngineConfig,
    cards: String,
    decks: Option<f64>,
    system: Option<String>,
    penetration: Option<f64>,
    json: bool,
) -> EngineResult<()> {
    let seen = parse_cards(&cards)?;
    let decks = validate_decks(decks.unwrap_or(config.default_decks))?;
    let system = validate_counting_system(system.as_deref().unwrap_or(&config.default_system))?;
    let penetration = penetration.map(validate_penetration).transpose()?;

    let analysis = analyze(&seen, decks, system, penetration);
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!();
    println!("  {} ({})", format_cards(&seen).bold(), system.name);
    println!("{}", count_table(&analysis));
    println!();
    Ok(())
}

fn cmd_shoe(config: &EngineConfig, decks: Option<f64>, seen: Option<String>) -> EngineResult<()> {
    let decks = validate_decks(decks.unwrap_or(config.default_decks))?;
    let seen = parse_optional_cards(seen.as_deref())?;
    let shoe = Shoe::remaining(decks, &seen)?;
    println!();
    println!("{}", shoe_table(&shoe));
    println!();
    Ok(())
}

fn cmd_bankroll(request: BankrollRequest, json: bool) -> EngineResult<()> {
    let rec = bankroll::size(&request, catalog())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }
    println!();
    println!(
        "  Bankroll {} at true count {}",
        format!("${:.2}", request.bankroll).bold(),
        format!("{:+.1}", rec.true_count).bold()
    );
    println!("{}", bankroll_table(&rec));
    println!();
    Ok(())
}

fn cmd_plan(
    desired_income: f64,
    sessions_per_week: u32,
    weeks: u32,
    risk_tolerance: f64,
    avg_true_count: f64,
    json: bool,
) -> EngineResult<()> {
    let plan = bankroll::required_bankroll(
        desired_income,
        sessions_per_week,
        weeks,
        risk_tolerance,
        avg_true_count,
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    println!();
    println!(
        "  {} per session, {} sessions a week",
        format!("${:.2}", desired_income).bold(),
        sessions_per_week
    );
    println!("{}", requirement_table(&plan));
    println!();
    Ok(())
}

fn cmd_systems() {
    println!();
    println!("{}", systems_table(catalog().systems()));
    println!();
}
