//! The auction engine: a turn-based, multi-agent environment.
//!
//! ## Turn cycle
//!
//! 1. The selected player acts (`step`): pass, or bid via a raise intensity.
//! 2. If at most one bidder is left the round resolves. The game ends once
//!    every special card has been drawn and its round resolved; otherwise
//!    the next round opens at the next round starter.
//! 3. Scanning from the seat after the actor, the next player who can
//!    afford `cur_bid + 1` is selected. Players who cannot are auto-passed
//!    on the way. If that exhausts a round it resolves and scanning restarts
//!    at the new round's starter.
//!
//! Rewards are sparse: zero on every step except the one that ends the game.

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use super::action::{bid_for_intensity, Action};
use super::observation::{ActionSpace, BoxSpace, Observation, ObservationSpace};
use crate::auction::{GameState, PlayerState};
use crate::core::{EnvConfig, EnvError, GameRng, PlayerId, PlayerMap};

/// Auxiliary per-player information refreshed on every step.
pub type Info = FxHashMap<String, f64>;

/// High Society as a step/observe/reset environment.
///
/// The engine owns all game state. Callers read it through accessors and
/// [`observe`](Self::observe), which return copies.
///
/// ```
/// use high_society::{Action, EnvConfig, HighSocietyEnv};
///
/// let mut env = HighSocietyEnv::new(EnvConfig::new().with_seed(42)).unwrap();
/// while !env.is_done() {
///     // Everyone passes: every card is discarded until the game ends.
///     env.step(Action::Pass).unwrap();
/// }
/// assert_eq!(env.remaining_special_cards(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct HighSocietyEnv {
    config: EnvConfig,
    rng: GameRng,
    state: GameState,
    agent_selection: PlayerId,
    rewards: PlayerMap<f64>,
    cumulative_rewards: PlayerMap<f64>,
    terminations: PlayerMap<bool>,
    truncations: PlayerMap<bool>,
    infos: PlayerMap<Info>,
    steps: usize,
    observation_space: ObservationSpace,
    action_space: ActionSpace,
}

impl HighSocietyEnv {
    /// Build an engine and deal the first game from `config.seed`.
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        config.validate()?;

        let n = config.player_count;
        let mut rng = GameRng::new(config.seed);
        let state = GameState::deal(&config, &mut rng);

        let mut env = Self {
            observation_space: ObservationSpace::new(n, config.special_cards),
            action_space: BoxSpace::new(0.0, 1.0, 1),
            rng,
            state,
            agent_selection: PlayerId::new(0),
            rewards: PlayerMap::with_value(n, 0.0),
            cumulative_rewards: PlayerMap::with_value(n, 0.0),
            terminations: PlayerMap::with_value(n, false),
            truncations: PlayerMap::with_value(n, false),
            infos: PlayerMap::with_value(n, Info::default()),
            steps: 0,
            config,
        };
        env.start();
        Ok(env)
    }

    /// Standard game for `player_count` seats.
    pub fn with_players(player_count: usize) -> Result<Self, EnvError> {
        Self::new(EnvConfig::new().with_player_count(player_count))
    }

    /// Deal a fresh game.
    ///
    /// `Some(seed)` reseeds the engine's RNG; `None` continues its stream,
    /// so consecutive resets deal different games.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, Info) {
        if let Some(seed) = seed {
            self.rng = GameRng::new(seed);
        }
        self.state = GameState::deal(&self.config, &mut self.rng);
        self.start();

        let player = self.agent_selection;
        (Observation::from_state(&self.state, player), self.infos[player].clone())
    }

    fn start(&mut self) {
        self.rewards.fill(0.0);
        self.cumulative_rewards.fill(0.0);
        self.terminations.fill(false);
        self.truncations.fill(false);
        self.infos.fill(Info::default());
        self.steps = 0;

        let starter = self.state.round_starter();
        self.agent_selection = starter;
        self.select_bidder(starter);
        self.refresh_infos();
    }

    /// Apply the selected player's action.
    ///
    /// Accepts an [`Action`] or a raw raise intensity (`f32`, 0 = pass).
    /// An illegal bid is rejected with nothing changed. Stepping a player
    /// that is already terminated or truncated does nothing.
    pub fn step(&mut self, action: impl Into<Action>) -> Result<(), EnvError> {
        let player = self.agent_selection;
        if self.terminations[player] || self.truncations[player] {
            trace!(%player, "step on finished player ignored");
            return Ok(());
        }

        let action = action.into();
        match action {
            Action::Pass => self.state.pass(player),
            Action::Raise(intensity) => {
                if !intensity.is_finite() {
                    return Err(EnvError::InvalidAction(f64::from(intensity)));
                }
                let bid = bid_for_intensity(
                    intensity,
                    self.state.round().min_bid(),
                    self.state.available_money(player),
                );
                self.state.place_bid(player, bid)?;
            }
            Action::Bid(amount) => self.state.place_bid(player, amount)?,
        }

        self.rewards.fill(0.0);
        self.steps += 1;
        trace!(
            %player,
            ?action,
            cur_bid = self.state.round().cur_bid(),
            bidders_left = self.state.round().bidders_left(),
            "action applied"
        );

        // Selection continues from the seat after the actor, even when the
        // action closed the round and a new one opened.
        let game_over = self.state.round().bidders_left() <= 1 && self.close_round();
        if !game_over {
            self.select_bidder(player.next(self.player_count()));
        }

        self.refresh_infos();
        self.check_truncation();
        Ok(())
    }

    /// Resolve the live round and open the next one.
    ///
    /// Returns `true` when the game ended instead.
    fn close_round(&mut self) -> bool {
        self.state.resolve_round();
        if self.state.is_game_over() || !self.state.open_round() {
            self.score_game();
            return true;
        }
        false
    }

    /// Select the first seat from `start` (table order) that can afford the
    /// minimum bid, auto-passing the seats that cannot.
    fn select_bidder(&mut self, start: PlayerId) {
        let n = self.player_count();
        let mut start = start;

        loop {
            let mut selected = None;
            for seat in start.seats_from(n) {
                if !self.state.round().is_bidding(seat) {
                    continue;
                }
                if self.state.can_afford_min_bid(seat) {
                    selected = Some(seat);
                    break;
                }

                debug!(
                    player = %seat,
                    available = self.state.available_money(seat),
                    min_bid = self.state.round().min_bid(),
                    "auto-pass"
                );
                self.state.pass(seat);
                if self.state.round().bidders_left() <= 1 {
                    break;
                }
            }

            if let Some(seat) = selected {
                self.agent_selection = seat;
                return;
            }

            // Auto-passes exhausted the round.
            if self.close_round() {
                return;
            }
            start = self.state.round_starter();
        }
    }

    /// Elimination rule: everyone tied for least money scores 0, everyone
    /// else scores their prestige.
    fn score_game(&mut self) {
        let min_money = self
            .state
            .players()
            .values()
            .map(PlayerState::total_money)
            .fold(f64::INFINITY, f64::min);

        for (player, state) in self.state.players().iter() {
            let eliminated = state.total_money() == min_money;
            let reward = if eliminated { 0.0 } else { state.total_prestige() };

            self.rewards[player] = reward;
            self.cumulative_rewards[player] += reward;
            self.terminations[player] = true;
            self.infos[player].insert("eliminated".to_string(), if eliminated { 1.0 } else { 0.0 });
        }

        debug!(
            min_money,
            rewards = ?self.rewards.to_vec(),
            rounds = self.state.round().num(),
            "game over"
        );
    }

    fn refresh_infos(&mut self) {
        let round = f64::from(self.state.round().num());
        for (player, state) in self.state.players().iter() {
            let info = &mut self.infos[player];
            info.insert("round".to_string(), round);
            info.insert("money".to_string(), state.total_money());
            info.insert("prestige".to_string(), state.total_prestige());
        }
    }

    fn check_truncation(&mut self) {
        let Some(max_steps) = self.config.max_steps else {
            return;
        };
        if self.steps >= max_steps && !self.all_terminated() {
            warn!(steps = self.steps, "episode truncated");
            self.truncations.fill(true);
        }
    }

    // === Observation ===

    /// Snapshot the game from `player`'s seat.
    pub fn observe(&self, player: PlayerId) -> Result<Observation, EnvError> {
        if player.index() >= self.player_count() {
            return Err(EnvError::UnknownPlayer(player));
        }
        Ok(Observation::from_state(&self.state, player))
    }

    /// Observation space, identical for every seat.
    pub fn observation_space(&self, _player: PlayerId) -> &ObservationSpace {
        &self.observation_space
    }

    /// Action space: one raise intensity in `[0, 1]`.
    pub fn action_space(&self, _player: PlayerId) -> &ActionSpace {
        &self.action_space
    }

    /// Length of a flattened observation.
    pub fn obs_dim(&self) -> usize {
        self.observation_space.dim()
    }

    pub fn action_dim(&self) -> usize {
        self.action_space.shape
    }

    // === Episode bookkeeping ===

    /// Seat whose turn it is.
    pub fn agent_selection(&self) -> PlayerId {
        self.agent_selection
    }

    /// Rewards from the last step.
    pub fn rewards(&self) -> &PlayerMap<f64> {
        &self.rewards
    }

    /// Rewards summed since the last reset.
    pub fn cumulative_rewards(&self) -> &PlayerMap<f64> {
        &self.cumulative_rewards
    }

    pub fn terminations(&self) -> &PlayerMap<bool> {
        &self.terminations
    }

    pub fn truncations(&self) -> &PlayerMap<bool> {
        &self.truncations
    }

    pub fn info(&self, player: PlayerId) -> Option<&Info> {
        self.infos.get(player)
    }

    pub fn all_terminated(&self) -> bool {
        self.terminations.values().all(|&t| t)
    }

    /// Terminated or truncated: further steps do nothing.
    pub fn is_done(&self) -> bool {
        self.all_terminated() || self.truncations.values().any(|&t| t)
    }

    /// Accepted steps since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    // === Read-only game state ===

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn round_number(&self) -> u32 {
        self.state.round().num()
    }

    pub fn current_bid(&self) -> f64 {
        self.state.round().cur_bid()
    }

    pub fn high_bidder(&self) -> PlayerId {
        self.state.round().high_bidder()
    }

    /// Seats still able to act in the live round, ascending.
    pub fn players_to_bid(&self) -> Vec<PlayerId> {
        self.state.round().players_to_bid().iter().copied().collect()
    }

    pub fn round_starter(&self) -> PlayerId {
        self.state.round_starter()
    }

    pub fn remaining_special_cards(&self) -> usize {
        self.state.remaining_special_cards()
    }

    /// Free money of a seat. Panics on an unknown seat.
    pub fn money(&self, player: PlayerId) -> f64 {
        self.state.players()[player].total_money()
    }

    pub fn committed_bid(&self, player: PlayerId) -> f64 {
        self.state.round().committed(player)
    }

    pub fn prestige(&self, player: PlayerId) -> f64 {
        self.state.players()[player].total_prestige()
    }

    pub fn card_count(&self, player: PlayerId) -> usize {
        self.state.players()[player].prestige_cards().len()
    }

    pub fn spent(&self, player: PlayerId) -> f64 {
        self.state.players()[player].spent()
    }
}
