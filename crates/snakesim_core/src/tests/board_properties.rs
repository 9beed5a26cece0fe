//! Board graph shape checks over generated configurations

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{BoardGraph, FieldKind};
use crate::config::{GameConfig, Transition, TransitionKind};
use crate::simulation::simulate_seeded;

/// Random valid configuration: transitions are proposed at random and kept
/// only when `check_transition` accepts them
fn random_config(rng: &mut SmallRng) -> GameConfig {
    let mut config = GameConfig {
        rows: rng.random_range(1..=8),
        cols: rng.random_range(1..=8),
        dice_sides: rng.random_range(2..=8),
        allow_overshoot: rng.random(),
        ..Default::default()
    };
    let num_fields = config.num_fields();

    for _ in 0..rng.random_range(0..=12) {
        let start = rng.random_range(1..=num_fields);
        let end = rng.random_range(1..=num_fields);
        let kind = if start > end {
            TransitionKind::Snake
        } else {
            TransitionKind::Ladder
        };
        let transition = Transition::new(start, end);
        if config.check_transition(kind, transition).is_ok() {
            match kind {
                TransitionKind::Snake => config.snakes.push(transition),
                TransitionKind::Ladder => config.ladders.push(transition),
            }
        }
    }

    config
        .validate()
        .expect("generated configuration must be valid");
    config
}

#[test]
fn test_graph_shape_for_random_configs() {
    let mut rng = SmallRng::seed_from_u64(2024);

    for _ in 0..300 {
        let config = random_config(&mut rng);
        let board = BoardGraph::build(&config).unwrap();
        let num_nodes = board.nodes().len();

        assert_eq!(num_nodes, (config.rows * config.cols) as usize);

        for node in board.nodes() {
            let expected = match node.kind() {
                FieldKind::Plain => config.dice_sides as usize,
                FieldKind::Snake(_) | FieldKind::Ladder(_) => 1,
            };
            assert_eq!(node.successors().len(), expected);
            assert!(node.successors().iter().all(|&s| s < num_nodes));
        }
    }
}

#[test]
fn test_transitions_are_directed_and_exclusive() {
    let mut rng = SmallRng::seed_from_u64(77);

    for _ in 0..300 {
        let config = random_config(&mut rng);
        let board = BoardGraph::build(&config).unwrap();
        let transitions = board.transitions();

        for t in transitions {
            match t.kind {
                TransitionKind::Snake => assert!(t.start > t.end),
                TransitionKind::Ladder => assert!(t.start < t.end),
            }
            assert_ne!(t.start, board.goal());

            let node = board.node(t.start).unwrap();
            assert_eq!(node.kind().transition(), Some(t.id));
            assert_eq!(node.successors(), &[t.end as usize - 1]);
        }

        for (i, a) in transitions.iter().enumerate() {
            for b in &transitions[i + 1..] {
                for p in [a.start, a.end] {
                    assert!(
                        p != b.start && p != b.end,
                        "{a:?} and {b:?} share field {p}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_board_reused_across_simulations() {
    let config = crate::config::GameBuilder::new()
        .grid(3, 3)
        .snake(8, 2)
        .iterations(200)
        .build()
        .unwrap();
    let board = BoardGraph::build(&config).unwrap();
    let before = board.nodes().to_vec();

    let first = simulate_seeded(&board, &config, 31).unwrap();
    let second = simulate_seeded(&board, &config, 31).unwrap();

    assert_eq!(board.nodes(), &before[..]);
    assert_eq!(first.completed_runs, second.completed_runs);
    assert_eq!(first.shortest_roll_sequence, second.shortest_roll_sequence);
}
