use once_cell::sync::Lazy;
use serde::Serialize;

use crate::cards::Rank;
use crate::error::{EngineError, EngineResult};
use crate::shoe::CARDS_PER_DECK;

pub const MIN_TRUE_COUNT: f64 = -20.0;
pub const MAX_TRUE_COUNT: f64 = 20.0;
/// With fewer decks than this remaining the true count is reported as 0.
pub const MIN_DECKS_FOR_TRUE_COUNT: f64 = 0.5;

/// A named card-counting system: one tag per rank plus its betting efficiency.
#[derive(Debug, Clone, Serialize)]
pub struct CountingSystem {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Tags in `ALL_RANKS` order (2 through A).
    pub tags: [f64; 13],
    pub efficiency: f64,
    pub balanced: bool,
}

impl CountingSystem {
    pub fn tag(&self, rank: Rank) -> f64 {
        self.tags[rank.index()]
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.key.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    pub fn running_count(&self, cards: &[Rank]) -> f64 {
        cards.iter().map(|&c| self.tag(c)).sum()
    }
}

/// The fixed catalog of counting systems. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct CountingCatalog {
    systems: Vec<CountingSystem>,
}

impl CountingCatalog {
    pub fn standard() -> CountingCatalog {
        CountingCatalog {
            systems: vec![
                CountingSystem {
                    key: "hiLo",
                    name: "Hi-Lo",
                    aliases: &["hi-lo", "hi_lo"],
                    tags: [1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0, -1.0, -1.0],
                    efficiency: 0.97,
                    balanced: true,
                },
                CountingSystem {
                    key: "hiOptI",
                    name: "Hi-Opt I",
                    aliases: &["hiopt1", "hi-opt-i"],
                    tags: [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, -1.0, -1.0, -1.0, -1.0, 0.0],
                    efficiency: 0.88,
                    balanced: true,
                },
                CountingSystem {
                    key: "hiOptII",
                    name: "Hi-Opt II",
                    aliases: &["hiopt2", "hi-opt-ii"],
                    tags: [1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 0.0, 0.0, -2.0, -2.0, -2.0, -2.0, 0.0],
                    efficiency: 0.99,
                    balanced: true,
                },
                CountingSystem {
                    key: "ko",
                    name: "Knock-Out",
                    aliases: &["knockout", "knock-out"],
                    tags: [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, -1.0, -1.0, -1.0, -1.0, -1.0],
                    efficiency: 0.98,
                    balanced: false,
                },
                CountingSystem {
                    key: "omegaII",
                    name: "Omega II",
                    aliases: &["omega2", "omega-ii"],
                    tags: [1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 0.0, -1.0, -2.0, -2.0, -2.0, -2.0, 0.0],
                    efficiency: 0.92,
                    balanced: true,
                },
                CountingSystem {
                    key: "halves",
                    name: "Wong Halves",
                    aliases: &["wongHalves", "wong-halves"],
                    tags: [0.5, 1.0, 1.0, 1.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.0, -1.0, -1.0, -1.0],
                    efficiency: 0.99,
                    balanced: true,
                },
                CountingSystem {
                    key: "zen",
                    name: "Zen Count",
                    aliases: &["zenCount", "zen-count"],
                    tags: [1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 0.0, 0.0, -2.0, -2.0, -2.0, -2.0, -1.0],
                    efficiency: 0.98,
                    balanced: true,
                },
            ],
        }
    }

    pub fn systems(&self) -> &[CountingSystem] {
        &self.systems
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.key).collect()
    }

    /// Looks a system up by key or alias, case-insensitively.
    pub fn get(&self, name: &str) -> EngineResult<&CountingSystem> {
        self.systems
            .iter()
            .find(|s| s.matches(name))
            .ok_or_else(|| EngineError::InvalidCountingSystem {
                name: name.to_string(),
                valid: self.keys().join(", "),
            })
    }

    pub fn running_count(&self, cards: &[Rank], system: &str) -> EngineResult<f64> {
        Ok(self.get(system)?.running_count(cards))
    }
}

static STANDARD_CATALOG: Lazy<CountingCatalog> = Lazy::new(CountingCatalog::standard);

/// Process-wide standard catalog.
pub fn catalog() -> &'static CountingCatalog {
    &STANDARD_CATALOG
}

pub fn running_count(cards: &[Rank], system: &str) -> EngineResult<f64> {
    catalog().running_count(cards, system)
}

/// Running count per remaining deck, clamped to [-20, 20] and rounded to one
/// decimal. Returns 0 when less than half a deck remains; exactly half a deck
/// still divides.
pub fn true_count(running_count: f64, decks_remaining: f64) -> f64 {
    if !(decks_remaining >= MIN_DECKS_FOR_TRUE_COUNT) {
        return 0.0;
    }
    let tc = (running_count / decks_remaining).clamp(MIN_TRUE_COUNT, MAX_TRUE_COUNT);
    round_to(tc, 1)
}

/// Fraction of the shoe already dealt.
pub fn penetration(cards_seen: usize, decks: f64) -> f64 {
    let total_cards = decks * CARDS_PER_DECK as f64;
    if total_cards <= 0.0 {
        return 0.0;
    }
    (cards_seen as f64 / total_cards).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardDistribution {
    pub high: f64,
    pub neutral: f64,
    pub low: f64,
}

/// Share of high (10-A), neutral (7-9) and low (2-6) cards among `cards`.
pub fn card_distribution(cards: &[Rank]) -> CardDistribution {
    if cards.is_empty() {
        return CardDistribution {
            high: 0.0,
            neutral: 0.0,
            low: 0.0,
        };
    }
    let high = cards.iter().filter(|c| c.value() >= 10).count();
    let neutral = cards.iter().filter(|c| (7..=9).contains(&c.value())).count();
    let low = cards.len() - high - neutral;
    let n = cards.len() as f64;
    CardDistribution {
        high: round_to(high as f64 / n, 3),
        neutral: round_to(neutral as f64 / n, 3),
        low: round_to(low as f64 / n, 3),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountAnalysis {
    pub system: &'static str,
    pub running_count: f64,
    pub true_count: f64,
    pub cards_remaining: u32,
    pub decks_remaining: f64,
    pub penetration: f64,
    pub distribution: CardDistribution,
}

/// Counting summary for a shoe of `decks` decks after `seen` cards.
/// When `penetration` is given it overrides the seen-card estimate of how much
/// of the shoe is gone.
pub fn analyze(
    seen: &[Rank],
    decks: f64,
    system: &CountingSystem,
    penetration_override: Option<f64>,
) -> CountAnalysis {
    let total_cards = (decks * CARDS_PER_DECK as f64).floor();
    let pen = penetration_override.unwrap_or_else(|| penetration(seen.len(), decks));
    let cards_remaining = (total_cards * (1.0 - pen)).max(0.0).round() as u32;
    let decks_remaining = decks * (1.0 - pen);
    let running = system.running_count(seen);

    CountAnalysis {
        system: system.key,
        running_count: running,
        true_count: true_count(running, decks_remaining),
        cards_remaining,
        decks_remaining,
        penetration: pen,
        distribution: card_distribution(seen),
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

