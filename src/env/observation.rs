//! Observations and the spaces that describe them.
//!
//! An `Observation` is a value snapshot: agents never see engine internals.
//! `to_vec` flattens it in alphabetical field order, which is the layout
//! `ObservationSpace::dim` describes and `Agent::act` consumes.

use serde::{Deserialize, Serialize};

use crate::auction::GameState;
use crate::core::PlayerId;

/// Field names in flattening order.
pub const FIELD_NAMES: [&str; 10] = [
    "bids",
    "current_player_prestige",
    "current_round_bid",
    "current_round_starter",
    "is_last_round",
    "next_round_starter",
    "potential_player_prestige",
    "remaining_money",
    "remaining_special_cards",
    "total_prestige",
];

/// What one player sees before acting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Own prestige total.
    pub total_prestige: f32,
    pub remaining_special_cards: f32,
    /// 1 when exactly one special card is still to be drawn.
    pub is_last_round: f32,
    /// Free money plus own escrowed bid.
    pub remaining_money: f32,
    pub current_round_bid: f32,
    /// Escrowed bid per seat.
    pub bids: Vec<f32>,
    pub current_player_prestige: Vec<f32>,
    /// Prestige per seat if that seat won the card on offer.
    pub potential_player_prestige: Vec<f32>,
    /// One-hot of this round's starter.
    pub current_round_starter: Vec<f32>,
    /// One-hot of next round's starter.
    pub next_round_starter: Vec<f32>,
}

impl Observation {
    /// Snapshot `state` from `player`'s seat.
    pub fn from_state(state: &GameState, player: PlayerId) -> Self {
        let round = state.round();
        let players = state.players();
        let seats = || PlayerId::all(state.player_count());
        let one_hot = |target: PlayerId| {
            seats()
                .map(|p| if p == target { 1.0 } else { 0.0 })
                .collect::<Vec<f32>>()
        };

        Self {
            total_prestige: players[player].total_prestige() as f32,
            remaining_special_cards: state.remaining_special_cards() as f32,
            is_last_round: if state.remaining_special_cards() == 1 { 1.0 } else { 0.0 },
            remaining_money: state.available_money(player) as f32,
            current_round_bid: round.cur_bid() as f32,
            bids: seats().map(|p| round.committed(p) as f32).collect(),
            current_player_prestige: players.values().map(|s| s.total_prestige() as f32).collect(),
            potential_player_prestige: round.value_to_agent().values().map(|&v| v as f32).collect(),
            current_round_starter: one_hot(state.round_starter()),
            next_round_starter: one_hot(state.next_round_starter()),
        }
    }

    /// Fields as named slices, in flattening order.
    pub fn fields(&self) -> [(&'static str, &[f32]); 10] {
        [
            ("bids", self.bids.as_slice()),
            ("current_player_prestige", self.current_player_prestige.as_slice()),
            ("current_round_bid", std::slice::from_ref(&self.current_round_bid)),
            ("current_round_starter", self.current_round_starter.as_slice()),
            ("is_last_round", std::slice::from_ref(&self.is_last_round)),
            ("next_round_starter", self.next_round_starter.as_slice()),
            ("potential_player_prestige", self.potential_player_prestige.as_slice()),
            ("remaining_money", std::slice::from_ref(&self.remaining_money)),
            ("remaining_special_cards", std::slice::from_ref(&self.remaining_special_cards)),
            ("total_prestige", std::slice::from_ref(&self.total_prestige)),
        ]
    }

    /// Look up one field by name.
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, values)| values)
    }

    /// Flatten into one vector.
    pub fn to_vec(&self) -> Vec<f32> {
        self.fields()
            .iter()
            .flat_map(|(_, values)| values.iter().copied())
            .collect()
    }
}

/// A box of `shape` values, each within `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: usize,
}

impl BoxSpace {
    pub const fn new(low: f32, high: f32, shape: usize) -> Self {
        Self { low, high, shape }
    }

    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.shape && values.iter().all(|v| (self.low..=self.high).contains(v))
    }
}

/// The action space: one raise intensity in `[0, 1]`.
pub type ActionSpace = BoxSpace;

/// Named boxes, one per observation field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    fields: Vec<(String, BoxSpace)>,
}

impl ObservationSpace {
    /// Space for a table of `player_count` seats and `special_cards` specials.
    pub fn new(player_count: usize, special_cards: usize) -> Self {
        let n = player_count;
        let fields = FIELD_NAMES
            .iter()
            .map(|&name| {
                let space = match name {
                    "bids" | "current_player_prestige" | "potential_player_prestige" => {
                        BoxSpace::new(0.0, 100.0, n)
                    }
                    "current_round_starter" | "next_round_starter" => BoxSpace::new(0.0, 1.0, n),
                    "is_last_round" => BoxSpace::new(0.0, 1.0, 1),
                    "remaining_special_cards" => BoxSpace::new(0.0, special_cards as f32, 1),
                    _ => BoxSpace::new(0.0, 100.0, 1),
                };
                (name.to_string(), space)
            })
            .collect();
        Self { fields }
    }

    /// Length of a flattened observation.
    pub fn dim(&self) -> usize {
        self.fields.iter().map(|(_, space)| space.shape).sum()
    }

    pub fn get(&self, name: &str) -> Option<&BoxSpace> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, space)| space)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoxSpace)> {
        self.fields.iter().map(|(name, space)| (name.as_str(), space))
    }

    /// Whether every field of `observation` lies inside its box.
    pub fn contains(&self, observation: &Observation) -> bool {
        observation
            .fields()
            .iter()
            .all(|(name, values)| self.get(name).is_some_and(|space| space.contains(values)))
    }
}
