use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::cards::Rank;
use crate::config::EngineConfig;
use crate::counting::{catalog, true_count, CountingCatalog};
use crate::dealer::dealer_bust_probability;
use crate::error::EngineResult;
use crate::hand::{evaluate, is_pair, HandEval};
use crate::request::DecisionRequest;
use crate::shoe::Shoe;
use crate::simulator::{simulate_action, Action, ActionEstimate};

/// EV reported for a hand that is already bust.
pub const BUST_EV: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_margin(margin: f64) -> Self {
        if margin > 0.1 {
            ConfidenceLevel::High
        } else if margin > 0.05 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub expected_value: f64,
    /// Count-adjusted EV for every legal action.
    pub all_expected_values: BTreeMap<Action, f64>,
    pub hand: HandEval,
    pub player_value: u8,
    pub is_soft: bool,
    pub dealer_upcard_value: u8,
    pub bust_probability: f64,
    pub dealer_bust_probability: f64,
    pub true_count: f64,
    /// Gap between the best and second-best EV.
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reasoning: String,
    /// Monte Carlo trials performed to reach this decision.
    pub trials_run: usize,
}

/// Actions available for `cards`: hit and stand always, double on two cards,
/// split on a two-card pair. A 21 or a bust hand can only stand.
pub fn legal_actions(cards: &[Rank]) -> Vec<Action> {
    let hand = evaluate(cards);
    if hand.total >= 21 {
        return vec![Action::Stand];
    }
    let mut actions = vec![Action::Hit, Action::Stand];
    if cards.len() == 2 {
        actions.push(Action::Double);
    }
    if is_pair(cards) {
        actions.push(Action::Split);
    }
    actions
}

/// Highest EV wins; on equal EVs the earlier action in priority order is kept.
/// Returns the chosen action, its EV and the margin over the runner-up.
pub fn select_action(evs: &BTreeMap<Action, f64>) -> Option<(Action, f64, f64)> {
    let mut best: Option<(Action, f64)> = None;
    for (&action, &ev) in evs {
        match best {
            Some((_, best_ev)) if ev <= best_ev => {}
            _ => best = Some((action, ev)),
        }
    }
    let (action, ev) = best?;
    let runner_up = evs
        .iter()
        .filter(|(a, _)| **a != action)
        .map(|(_, v)| *v)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
    let confidence = runner_up.map_or(0.0, |r| (ev - r).abs());
    Some((action, ev, confidence))
}

pub fn upcard_value(upcard: Rank) -> u8 {
    upcard.value()
}

fn reasoning(action: Action, ev: f64, hand: &HandEval, dealer_value: u8, true_count: f64) -> String {
    let hand_type = if hand.is_soft { "soft" } else { "hard" };
    let mut text = format!(
        "With {} {} vs dealer {}, {} has the highest EV of {:.3}. ",
        hand_type,
        hand.total,
        dealer_value,
        action.as_str().to_uppercase(),
        ev
    );

    if true_count > 1.0 {
        text.push_str(&format!(
            "Positive count (+{:.1}) favors aggressive play. ",
            true_count
        ));
    } else if true_count < -1.0 {
        text.push_str(&format!(
            "Negative count ({:.1}) favors conservative play. ",
            true_count
        ));
    }

    text.push_str(match action {
        Action::Hit => "Taking another card maximizes expected return.",
        Action::Stand => "Standing preserves the best expected value given current probabilities.",
        Action::Double => "Doubling down leverages favorable odds with increased bet size.",
        Action::Split => "Splitting creates two hands with better expectation than playing the pair.",
    });
    text
}

/// Computes per-action EVs and picks the best play. Holds no per-request state:
/// every call rebuilds the shoe and count from its request.
pub struct DecisionEngine<'c> {
    config: EngineConfig,
    catalog: &'c CountingCatalog,
}

impl DecisionEngine<'static> {
    /// Engine backed by the process-wide standard catalog.
    pub fn new(config: EngineConfig) -> Self {
        DecisionEngine {
            config,
            catalog: catalog(),
        }
    }
}

impl<'c> DecisionEngine<'c> {
    pub fn with_catalog(config: EngineConfig, catalog: &'c CountingCatalog) -> Self {
        DecisionEngine { config, catalog }
    }

    pub fn catalog(&self) -> &'c CountingCatalog {
        self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decides with the configured seed, or fresh entropy when none is set.
    pub fn decide(&self, request: &DecisionRequest) -> EngineResult<Decision> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.decide_with_rng(request, &mut rng)
    }

    pub fn decide_with_seed(&self, request: &DecisionRequest, seed: u64) -> EngineResult<Decision> {
        self.decide_with_rng(request, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn decide_with_rng<R: Rng + ?Sized>(
        &self,
        request: &DecisionRequest,
        rng: &mut R,
    ) -> EngineResult<Decision> {
        request.validate()?;
        let system = self.catalog.get(&request.counting_system)?;
        let observed = request.observed();
        let shoe = Shoe::remaining(request.decks, &observed)?;

        let tc = match request.true_count {
            Some(tc) => tc,
            None => {
                let decks_remaining = request
                    .penetration
                    .map(|p| request.decks * (1.0 - p))
                    .unwrap_or_else(|| shoe.decks_remaining());
                true_count(system.running_count(&observed), decks_remaining)
            }
        };

        let hand = evaluate(&request.cards);
        let dealer_value = upcard_value(request.dealer_card);

        if hand.is_bust() {
            let mut evs = BTreeMap::new();
            evs.insert(Action::Stand, BUST_EV);
            return Ok(Decision {
                action: Action::Stand,
                expected_value: BUST_EV,
                all_expected_values: evs,
                hand,
                player_value: hand.total,
                is_soft: hand.is_soft,
                dealer_upcard_value: dealer_value,
                bust_probability: 0.0,
                dealer_bust_probability: 0.0,
                true_count: tc,
                confidence: 0.0,
                confidence_level: ConfidenceLevel::Low,
                reasoning: format!(
                    "Hand of {} is already bust; the bet is lost whatever the play.",
                    hand.total
                ),
                trials_run: 0,
            });
        }

        let trials = self.config.capped_trials(self.config.trials);
        let estimates = self.estimate_actions(&request.cards, request.dealer_card, &shoe, trials, rng);

        let mut evs = BTreeMap::new();
        let mut trials_run = 0;
        for est in &estimates {
            let adjusted = est.ev + tc * self.config.count_ev_adjustment;
            tracing::debug!(
                action = %est.action,
                raw_ev = est.ev,
                adjusted_ev = adjusted,
                completed = est.completed_trials,
                "action estimated"
            );
            if est.skipped_trials > 0 {
                tracing::warn!(
                    action = %est.action,
                    skipped = est.skipped_trials,
                    "trials skipped on an exhausted shoe"
                );
            }
            evs.insert(est.action, adjusted);
            trials_run += est.completed_trials + est.skipped_trials;
        }

        let (action, expected_value, confidence) =
            select_action(&evs).unwrap_or((Action::Stand, BUST_EV, 0.0));

        let bust_probability = if evs.contains_key(&Action::Hit) {
            shoe.bust_probability(&request.cards)
        } else {
            0.0
        };

        let aux_trials = self.config.capped_trials(self.config.auxiliary_trials);
        let dealer_bust = dealer_bust_probability(request.dealer_card, &shoe, aux_trials, rng);
        if !shoe.is_empty() {
            trials_run += aux_trials;
        }

        tracing::info!(
            hand = %hand,
            dealer = %request.dealer_card,
            true_count = tc,
            action = %action,
            ev = expected_value,
            "decision made"
        );

        Ok(Decision {
            action,
            expected_value,
            all_expected_values: evs,
            hand,
            player_value: hand.total,
            is_soft: hand.is_soft,
            dealer_upcard_value: dealer_value,
            bust_probability,
            dealer_bust_probability: dealer_bust,
            true_count: tc,
            confidence,
            confidence_level: ConfidenceLevel::from_margin(confidence),
            reasoning: reasoning(action, expected_value, &hand, dealer_value, tc),
            trials_run,
        })
    }

    /// Raw (unadjusted) estimates for every legal action. Each action runs on
    /// its own worker with a private RNG seeded from `rng`, so results depend
    /// only on the seed and not on scheduling.
    pub fn estimate_actions<R: Rng + ?Sized>(
        &self,
        cards: &[Rank],
        upcard: Rank,
        shoe: &Shoe,
        trials: usize,
        rng: &mut R,
    ) -> Vec<ActionEstimate> {
        let jobs: Vec<(Action, u64)> = legal_actions(cards)
            .into_iter()
            .map(|a| (a, rng.gen::<u64>()))
            .collect();

        jobs.par_iter()
            .map(|&(action, seed)| {
                let mut worker_rng = ChaCha8Rng::seed_from_u64(seed);
                simulate_action(cards, action, upcard, shoe, trials, &mut worker_rng)
            })
            .collect()
    }

    /// Rough win likelihood per legal action, `(ev + 1) / 2` clamped to [0, 1],
    /// using the auxiliary trial count and no count adjustment.
    pub fn action_probabilities<R: Rng + ?Sized>(
        &self,
        cards: &[Rank],
        upcard: Rank,
        shoe: &Shoe,
        rng: &mut R,
    ) -> BTreeMap<Action, f64> {
        let trials = self.config.capped_trials(self.config.auxiliary_trials);
        self.estimate_actions(cards, upcard, shoe, trials, rng)
            .into_iter()
            .map(|est| (est.action, ((est.ev + 1.0) / 2.0).clamp(0.0, 1.0)))
            .collect()
    }
}

impl Default for DecisionEngine<'static> {
    fn default() -> Self {
        DecisionEngine::new(EngineConfig::default())
    }
}
