//! Round-level auction behavior driven through the public engine API.
//!
//! These tests script bids with `Action::Bid` and check money, cards and
//! turn order after each round resolves.

use high_society::{Action, EnvConfig, EnvError, HighSocietyEnv, PlayerId};

fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

fn env_with_seed(seed: u64) -> HighSocietyEnv {
    HighSocietyEnv::new(EnvConfig::new().with_seed(seed)).unwrap()
}

/// Bidding war between seats 0 and 1; seat 2 stays out.
#[test]
fn test_bidding_war_won_at_fifteen() {
    let mut env = env_with_seed(42);

    env.step(Action::Bid(5.0)).unwrap();
    assert_eq!(env.agent_selection(), p(1));
    env.step(Action::Bid(10.0)).unwrap();
    assert_eq!(env.agent_selection(), p(2));
    env.step(Action::Pass).unwrap();
    assert_eq!(env.agent_selection(), p(0));

    // Seat 0 raises its own bid: the 5 already escrowed counts towards it.
    env.step(Action::Bid(15.0)).unwrap();
    assert_eq!(env.money(p(0)), 30.0);
    assert_eq!(env.agent_selection(), p(1));
    env.step(Action::Pass).unwrap();

    assert_eq!(env.round_number(), 2);
    assert_eq!(env.card_count(p(0)), 1);
    assert_eq!(env.money(p(0)), 30.0);
    assert_eq!(env.spent(p(0)), 15.0);
    assert_eq!(env.money(p(1)), 45.0);
    assert_eq!(env.money(p(2)), 45.0);
    assert_eq!(env.committed_bid(p(0)), 0.0);
    assert_eq!(env.rewards().to_vec(), vec![0.0; 3]);
}

#[test]
fn test_all_pass_discards_card() {
    let mut env = env_with_seed(42);

    env.step(Action::Pass).unwrap();
    env.step(Action::Pass).unwrap();

    assert_eq!(env.round_number(), 2);
    for player in PlayerId::all(3) {
        assert_eq!(env.money(player), 45.0);
        assert_eq!(env.card_count(player), 0);
        assert_eq!(env.prestige(player), 0.0);
    }
}

#[test]
fn test_single_bidder_pays_bid() {
    let mut env = env_with_seed(42);

    env.step(Action::Bid(20.0)).unwrap();
    env.step(Action::Pass).unwrap();
    env.step(Action::Pass).unwrap();

    assert_eq!(env.card_count(p(0)), 1);
    assert_eq!(env.money(p(0)), 25.0);
    assert_eq!(env.money(p(1)), 45.0);
    assert_eq!(env.money(p(2)), 45.0);
}

#[test]
fn test_round_starter_rotates() {
    let mut env = env_with_seed(1);
    assert_eq!(env.round_starter(), p(0));

    env.step(Action::Pass).unwrap();
    env.step(Action::Pass).unwrap();
    // Seat 1 starts round 2, but the turn goes to the seat after the last
    // actor.
    assert_eq!(env.round_starter(), p(1));
    assert_eq!(env.agent_selection(), p(2));

    env.step(Action::Pass).unwrap();
    env.step(Action::Pass).unwrap();
    assert_eq!(env.round_starter(), p(2));
    assert_eq!(env.agent_selection(), p(1));
}

#[test]
fn test_turn_after_resolution_follows_last_actor() {
    let mut env = HighSocietyEnv::new(EnvConfig::new().with_player_count(4)).unwrap();

    env.step(Action::Bid(5.0)).unwrap();
    env.step(Action::Pass).unwrap();
    env.step(Action::Pass).unwrap();
    assert_eq!(env.agent_selection(), p(3));
    env.step(Action::Pass).unwrap();

    assert_eq!(env.round_number(), 2);
    assert_eq!(env.card_count(p(0)), 1);
    assert_eq!(env.round_starter(), p(1));
    assert_eq!(env.agent_selection(), p(0));
}

#[test]
fn test_passed_player_not_offered_turn_again() {
    let mut env = HighSocietyEnv::new(EnvConfig::new().with_player_count(4)).unwrap();

    env.step(Action::Bid(3.0)).unwrap();
    env.step(Action::Pass).unwrap();
    assert_eq!(env.players_to_bid(), vec![p(0), p(2), p(3)]);

    env.step(Action::Bid(4.0)).unwrap();
    env.step(Action::Bid(5.0)).unwrap();
    // Seat 1 has passed: the turn goes from 3 back to 0.
    assert_eq!(env.agent_selection(), p(0));
}

#[test]
fn test_illegal_bids_rejected_without_mutation() {
    let mut env = env_with_seed(5);
    env.step(Action::Bid(10.0)).unwrap();

    assert_eq!(
        env.step(Action::Bid(10.0)).unwrap_err(),
        EnvError::BidTooLow { min_bid: 11.0, bid: 10.0 }
    );
    assert_eq!(
        env.step(Action::Bid(46.0)).unwrap_err(),
        EnvError::InsufficientFunds { available: 45.0, bid: 46.0 }
    );
    assert!(matches!(env.step(Action::Bid(f64::INFINITY)), Err(EnvError::InvalidAction(_))));

    assert_eq!(env.agent_selection(), p(1));
    assert_eq!(env.current_bid(), 10.0);
    assert_eq!(env.high_bidder(), p(0));
    assert_eq!(env.money(p(1)), 45.0);
    assert_eq!(env.steps(), 1);
}

#[test]
fn test_auto_pass_skips_players_who_cannot_follow() {
    // Three money each: an all-in bid cannot be followed.
    let config = EnvConfig::new().with_money_denominations(vec![1, 2]);
    let mut env = HighSocietyEnv::new(config).unwrap();

    env.step(Action::Bid(3.0)).unwrap();
    // Seats 1 and 2 were auto-passed, seat 0 won round 1.
    assert_eq!(env.round_number(), 2);
    assert_eq!(env.card_count(p(0)), 1);
    assert_eq!(env.money(p(0)), 0.0);
    assert_eq!(env.agent_selection(), p(1));

    env.step(Action::Bid(1.0)).unwrap();
    assert_eq!(env.agent_selection(), p(2));
    env.step(Action::Pass).unwrap();

    // Seat 0 cannot cover 2 and is skipped; seat 1 wins round 2.
    assert_eq!(env.round_number(), 3);
    assert_eq!(env.card_count(p(1)), 1);
    assert_eq!(env.money(p(1)), 2.0);
    assert_eq!(env.money(p(0)), 0.0);
    assert_eq!(env.agent_selection(), p(2));
}

#[test]
fn test_auto_pass_refunds_committed_bid() {
    // Six money each.
    let config = EnvConfig::new().with_player_count(4).with_money_denominations(vec![1, 2, 3]);
    let mut env = HighSocietyEnv::new(config).unwrap();

    // Seat 0 buys round 1 for 4 and keeps 2.
    env.step(Action::Bid(4.0)).unwrap();
    for _ in 0..3 {
        env.step(Action::Pass).unwrap();
    }
    assert_eq!(env.round_number(), 2);
    assert_eq!(env.money(p(0)), 2.0);
    assert_eq!(env.agent_selection(), p(0));

    env.step(Action::Bid(1.0)).unwrap();
    env.step(Action::Bid(2.0)).unwrap();
    env.step(Action::Bid(3.0)).unwrap();
    assert_eq!(env.money(p(0)), 1.0);
    assert_eq!(env.committed_bid(p(0)), 1.0);

    // Seat 3 passes; seat 0 cannot cover 4 and is auto-passed with its
    // escrow returned while seats 1 and 2 keep bidding.
    assert_eq!(env.agent_selection(), p(3));
    env.step(Action::Pass).unwrap();

    assert_eq!(env.round_number(), 2);
    assert_eq!(env.money(p(0)), 2.0);
    assert_eq!(env.committed_bid(p(0)), 0.0);
    assert_eq!(env.players_to_bid(), vec![p(1), p(2)]);
    assert_eq!(env.agent_selection(), p(1));
    assert_eq!(env.current_bid(), 3.0);
    assert_eq!(env.high_bidder(), p(2));
    assert_eq!(env.committed_bid(p(1)), 2.0);
}

#[test]
fn test_broke_table_ends_at_reset() {
    let config = EnvConfig::new().with_money_denominations(Vec::new());
    let env = HighSocietyEnv::new(config).unwrap();

    // Nobody can afford a bid of 1: every round is auto-passed and discarded.
    assert!(env.all_terminated());
    assert_eq!(env.remaining_special_cards(), 0);
    assert_eq!(env.rewards().to_vec(), vec![0.0; 3]);
    for player in PlayerId::all(3) {
        assert_eq!(env.info(player).and_then(|info| info.get("eliminated")), Some(&1.0));
    }
}

#[test]
fn test_step_after_game_over_is_noop() {
    let mut env = env_with_seed(9);
    while !env.is_done() {
        env.step(Action::Pass).unwrap();
    }
    let rewards = env.rewards().clone();
    let steps = env.steps();

    env.step(Action::Bid(1.0)).unwrap();
    env.step(0.5f32).unwrap();
    assert_eq!(env.steps(), steps);
    assert_eq!(env.rewards(), &rewards);
}

#[test]
fn test_observation_tracks_escrow() {
    let mut env = env_with_seed(3);
    env.step(Action::Bid(12.0)).unwrap();

    let seat0 = env.observe(p(0)).unwrap();
    assert_eq!(seat0.remaining_money, 45.0);
    assert_eq!(seat0.current_round_bid, 12.0);
    assert_eq!(seat0.bids, vec![12.0, 0.0, 0.0]);

    let seat1 = env.observe(p(1)).unwrap();
    assert_eq!(seat1.remaining_money, 45.0);
    assert_eq!(seat1.bids, seat0.bids);
}
