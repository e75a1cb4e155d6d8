//! Actions a player can take on their turn.

use serde::{Deserialize, Serialize};

/// A player's move.
///
/// Agents normally emit a raise intensity in `[0, 1]`, which converts into
/// `Pass` (exactly 0) or `Raise`. `Bid` names an absolute amount and is
/// meant for scripted play; it is validated by the same rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Leave the round, taking back any escrowed bid.
    Pass,
    /// Bid `min_bid + intensity * (available - min_bid)`.
    Raise(f32),
    /// Bid an absolute amount.
    Bid(f64),
}

impl Action {
    /// Convert a raise intensity: 0 passes, anything else raises.
    #[must_use]
    pub fn from_intensity(raise_intensity: f32) -> Self {
        if raise_intensity == 0.0 {
            Action::Pass
        } else {
            Action::Raise(raise_intensity)
        }
    }

    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, Action::Pass)
    }
}

impl From<f32> for Action {
    fn from(raise_intensity: f32) -> Self {
        Action::from_intensity(raise_intensity)
    }
}

/// Map a raise intensity onto a bid amount.
///
/// Intensities inside `[0, 1]` land in `[min_bid, available]`; rounding
/// noise is kept inside that interval. Intensities outside it are mapped
/// linearly without correction so the engine can reject them.
#[must_use]
pub fn bid_for_intensity(raise_intensity: f32, min_bid: f64, available: f64) -> f64 {
    let intensity = f64::from(raise_intensity);
    let bid = min_bid + intensity * (available - min_bid);
    if (0.0..=1.0).contains(&intensity) && available >= min_bid {
        bid.max(min_bid).min(available)
    } else {
        bid
    }
}
