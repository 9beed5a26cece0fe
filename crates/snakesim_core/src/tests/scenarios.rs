//! End-to-end simulations on small boards with known behaviour

use crate::board::BoardGraph;
use crate::config::{GameBuilder, TransitionKind};
use crate::simulation::simulate_seeded;
use crate::walk::replay;

/// Expected rolls to cover `distance` fields with a fair die when the last
/// roll is clamped onto the goal
fn expected_rolls(distance: usize, sides: usize) -> f64 {
    let mut expected = vec![0.0; distance + 1];
    for n in 1..=distance {
        let rest: f64 = (1..=sides).map(|k| expected[n.saturating_sub(k)]).sum();
        expected[n] = 1.0 + rest / sides as f64;
    }
    expected[distance]
}

#[test]
fn test_plain_board_never_aborts() {
    let config = GameBuilder::new()
        .grid(1, 10)
        .dice(6)
        .allow_overshoot(true)
        .iterations(20_000)
        .max_steps(1_000)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let results = simulate_seeded(&board, &config, 42).unwrap();

    assert_eq!(results.aborted_runs, 0);
    assert_eq!(results.completed_runs, 20_000);

    // ~3.32 rolls; the naive 10 / 3.5 ignores the clamped final roll
    let expected = expected_rolls(10, 6);
    assert!(
        (results.average_rolls - expected).abs() < 0.1,
        "average {} far from {expected}",
        results.average_rolls
    );
    assert!(results.overshoot_wins > 0);
    assert_eq!(results.shortest_num_rolls(), Some(2));
}

#[test]
fn test_single_ladder_shortest_sequence() {
    let config = GameBuilder::new()
        .grid(1, 10)
        .dice(6)
        .iterations(10_000)
        .max_steps(1_000)
        .ladder(2, 9)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let results = simulate_seeded(&board, &config, 3).unwrap();

    // the ladder leaves the token on 9, so at least one more roll is needed
    let shortest = results.shortest_roll_sequence.as_deref().unwrap();
    assert_eq!(shortest.len(), 2);
    assert_eq!(replay(&board, shortest), Some(board.goal()));

    // the ladder is reachable by 2, or by 1 then 1: 7/36 of runs
    let ladder = &results.transitions[0];
    assert_eq!(ladder.kind, TransitionKind::Ladder);
    let share = ladder.times_used as f64 / results.iterations as f64;
    assert!((share - 7.0 / 36.0).abs() < 0.03, "ladder share {share}");
    assert_eq!(results.usage_share(ladder), 100.0);
}

#[test]
fn test_disallowed_overshoot_never_records_overshoot() {
    let config = GameBuilder::new()
        .grid(1, 3)
        .dice(6)
        .allow_overshoot(false)
        .iterations(2_000)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let results = simulate_seeded(&board, &config, 9).unwrap();

    assert_eq!(results.aborted_runs, 0);
    assert_eq!(results.overshoot_wins, 0);
    let shortest = results.shortest_roll_sequence.as_deref().unwrap();
    assert_eq!(shortest, &[3]);
    assert!(results.average_rolls >= 1.0);
}

#[test]
fn test_everything_aborts() {
    let config = GameBuilder::new()
        .grid(10, 10)
        .iterations(500)
        .max_steps(1)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let results = simulate_seeded(&board, &config, 5).unwrap();

    assert_eq!(results.aborted_runs, 500);
    assert_eq!(results.completed_runs, 0);
    assert_eq!(results.average_rolls, 0.0);
    assert_eq!(results.shortest_roll_sequence, None);
}

#[test]
fn test_snakes_slow_the_game_down() {
    let plain = GameBuilder::new()
        .grid(5, 6)
        .iterations(5_000)
        .build()
        .unwrap();
    let snaky = GameBuilder::from_config(plain.clone())
        .snake(29, 1)
        .snake(27, 2)
        .snake(25, 3)
        .build()
        .unwrap();

    let plain_board = BoardGraph::build(&plain).unwrap();
    let snaky_board = BoardGraph::build(&snaky).unwrap();
    let plain_results = simulate_seeded(&plain_board, &plain, 1).unwrap();
    let snaky_results = simulate_seeded(&snaky_board, &snaky, 1).unwrap();

    assert!(snaky_results.average_rolls > plain_results.average_rolls);
    assert!(snaky_results.total_usage(TransitionKind::Snake) > 0);
    assert_eq!(snaky_results.total_usage(TransitionKind::Ladder), 0);
    assert_eq!(snaky_results.snakes().count(), 3);
}

#[test]
fn test_retry_cap_counts_as_abort() {
    // from field 9 only a 1 fits; a d20 rejects almost everything
    let config = GameBuilder::new()
        .grid(1, 10)
        .dice(20)
        .allow_overshoot(false)
        .max_overshoot_retries(1)
        .iterations(1_000)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let results = simulate_seeded(&board, &config, 8).unwrap();

    assert!(results.aborted_runs > 0);
    assert_eq!(results.completed_runs + results.aborted_runs, 1_000);
}
