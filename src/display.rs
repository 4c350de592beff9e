use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::bankroll::{BankrollRequirement, BettingRecommendation, RiskLevel};
use crate::cards::{Rank, ALL_RANKS};
use crate::counting::{CountAnalysis, CountingSystem};
use crate::engine::Decision;
use crate::shoe::Shoe;
use crate::simulator::Action;

/// Bar for an EV in [-1, +1]; doubled hands can exceed the range and are clipped.
pub fn ev_bar(ev: f64, width: usize) -> String {
    let scaled = ((ev + 1.0) / 2.0).clamp(0.0, 1.0);
    let filled = (scaled * width as f64) as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let label = format!("{:+.3}", ev);

    if ev > 0.0 {
        format!("{} {}", bar.green(), label)
    } else if ev > -0.2 {
        format!("{} {}", bar.yellow(), label)
    } else {
        format!("{} {}", bar.red(), label)
    }
}

pub fn cards_display(cards: &[Rank]) -> String {
    cards
        .iter()
        .map(|card| {
            let s = card.as_str();
            if card.value() >= 10 {
                s.red().bold().to_string()
            } else {
                s.white().bold().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_action(action: Action) -> String {
    let label = action.as_str().to_uppercase();
    match action {
        Action::Double | Action::Split => label.red().bold().to_string(),
        Action::Hit => label.green().bold().to_string(),
        Action::Stand => label.yellow().bold().to_string(),
    }
}

fn styled_risk(risk: RiskLevel) -> String {
    let label = risk.to_string();
    match risk {
        RiskLevel::Low => label.green().to_string(),
        RiskLevel::Medium => label.yellow().to_string(),
        RiskLevel::High => label.red().bold().to_string(),
    }
}

pub fn decision_table(decision: &Decision) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Action".bold().to_string()),
        Cell::new("EV").set_alignment(CellAlignment::Left),
    ]);

    for (&action, &ev) in &decision.all_expected_values {
        let name = if action == decision.action {
            format!("{} \u{2190}", styled_action(action))
        } else {
            action.as_str().to_string()
        };
        table.add_row(vec![Cell::new(name), Cell::new(ev_bar(ev, 24))]);
    }

    table.to_string()
}

pub fn decision_summary(decision: &Decision) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Metric"), Cell::new("Value")]);
    table.add_row(vec![Cell::new("Hand"), Cell::new(decision.hand.to_string())]);
    table.add_row(vec![
        Cell::new("Dealer"),
        Cell::new(decision.dealer_upcard_value),
    ]);
    table.add_row(vec![
        Cell::new("True Count"),
        Cell::new(format!("{:+.1}", decision.true_count)),
    ]);
    table.add_row(vec![
        Cell::new("Bust on Hit"),
        Cell::new(format!("{:.1}%", decision.bust_probability * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Dealer Bust"),
        Cell::new(format!("{:.1}%", decision.dealer_bust_probability * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Confidence"),
        Cell::new(format!(
            "{:.3} ({})",
            decision.confidence, decision.confidence_level
        )),
    ]);
    table.add_row(vec![Cell::new("Trials"), Cell::new(decision.trials_run)]);
    table.to_string()
}

pub fn bankroll_table(rec: &BettingRecommendation) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);

    table.add_row(vec![
        Cell::new("Recommended Bet".bold().to_string()),
        Cell::new(format!("${:.2}", rec.recommended_bet).bold().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Edge"),
        Cell::new(format!("{:+.2}%", rec.edge * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Kelly Fraction"),
        Cell::new(format!("{:.2}%", rec.kelly_fraction * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Quarter Kelly"),
        Cell::new(format!("{:.2}%", rec.conservative_fraction * 100.0)),
    ]);
    table.add_row(vec![Cell::new("Risk"), Cell::new(styled_risk(rec.risk_level))]);
    table.add_row(vec![
        Cell::new("Risk of Ruin"),
        Cell::new(format!("{:.2}%", rec.risk_of_ruin * 100.0)),
    ]);

    let ev_str = if rec.expected_value >= 0.0 {
        format!("${:.2}", rec.expected_value).green().to_string()
    } else {
        format!("${:.2}", rec.expected_value).red().to_string()
    };
    table.add_row(vec![Cell::new("EV per Hand"), Cell::new(ev_str)]);
    table.add_row(vec![
        Cell::new("Sessions to Double"),
        Cell::new(match rec.sessions_to_double {
            Some(n) => n.to_string(),
            None => "never".dimmed().to_string(),
        }),
    ]);
    table.add_row(vec![
        Cell::new("Bankroll Units"),
        Cell::new(format!("{:.1}", rec.bankroll_units)),
    ]);

    table.to_string()
}

pub fn requirement_table(plan: &BankrollRequirement) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Required Bankroll".bold().to_string()),
        Cell::new(format!("${:.2}", plan.required_bankroll).bold().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Expected Income"),
        Cell::new(format!("${:.2}", plan.expected_income).green().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Risk Tolerance"),
        Cell::new(format!("{:.1}%", plan.risk_tolerance * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Horizon"),
        Cell::new(format!("{} weeks", plan.time_horizon_weeks)),
    ]);
    table.to_string()
}

pub fn count_table(analysis: &CountAnalysis) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Metric"), Cell::new("Value")]);
    table.add_row(vec![Cell::new("System"), Cell::new(analysis.system)]);
    table.add_row(vec![
        Cell::new("Running Count"),
        Cell::new(format!("{:+}", analysis.running_count)),
    ]);
    table.add_row(vec![
        Cell::new("True Count".bold().to_string()),
        Cell::new(format!("{:+.1}", analysis.true_count).bold().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Cards Remaining"),
        Cell::new(analysis.cards_remaining),
    ]);
    table.add_row(vec![
        Cell::new("Penetration"),
        Cell::new(format!("{:.1}%", analysis.penetration * 100.0)),
    ]);
    let dist = analysis.distribution;
    table.add_row(vec![
        Cell::new("High / Neutral / Low"),
        Cell::new(format!(
            "{:.1}% / {:.1}% / {:.1}%",
            dist.high * 100.0,
            dist.neutral * 100.0,
            dist.low * 100.0
        )),
    ]);
    table.to_string()
}

pub fn shoe_table(shoe: &Shoe) -> String {
    let total = shoe.total().max(1) as f64;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Rank"),
        Cell::new("Left").set_alignment(CellAlignment::Right),
        Cell::new("Share").set_alignment(CellAlignment::Right),
    ]);
    for &rank in &ALL_RANKS {
        let n = shoe.count(rank);
        table.add_row(vec![
            Cell::new(rank.as_str()).set_alignment(CellAlignment::Center),
            Cell::new(n).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", n as f64 / total * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold().to_string()),
        Cell::new(shoe.total()).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2} decks", shoe.decks_remaining())).set_alignment(CellAlignment::Right),
    ]);
    table.to_string()
}

pub fn systems_table(systems: &[CountingSystem]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![Cell::new("Key"), Cell::new("Name")];
    for &r in &ALL_RANKS {
        header.push(Cell::new(r.as_str()).set_alignment(CellAlignment::Center));
    }
    header.push(Cell::new("Eff."));
    table.set_header(header);

    for system in systems {
        let mut row = vec![
            Cell::new(system.key.bold().to_string()),
            Cell::new(system.name),
        ];
        for &tag in &system.tags {
            let text = format!("{}", tag);
            let styled = if tag > 0.0 {
                text.green().to_string()
            } else if tag < 0.0 {
                text.red().to_string()
            } else {
                text.dimmed().to_string()
            };
            row.push(Cell::new(styled).set_alignment(CellAlignment::Center));
        }
        row.push(Cell::new(format!("{:.2}", system.efficiency)));
        table.add_row(row);
    }
    table.to_string()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
