//! Human-readable rendering of configurations, boards and results

use snakesim_core::board::BoardGraph;
use snakesim_core::model::TransitionUsage;
use snakesim_core::{GameConfig, SimulationResults, Transition, TransitionKind};

use crate::util::format::{format_count, format_duration, format_percentage, format_rolls};

const RULE: &str = "===============================";

fn transition_lines(label: &str, transitions: &[Transition]) -> Vec<String> {
    let mut lines = vec![format!("--- {label}s ({}) ---", transitions.len())];
    if transitions.is_empty() {
        lines.push("(None)".to_string());
    }
    for (i, t) in transitions.iter().enumerate() {
        let line = format!("  {label} {:2}: {:3} -> {:3}", i + 1, t.start, t.end);
        lines.push(line);
    }
    lines
}

/// Summary of the simulation and board settings
pub fn render_config(config: &GameConfig) -> String {
    let retries = config
        .max_overshoot_retries
        .map_or_else(|| "unlimited".to_string(), |n| n.to_string());

    let mut lines = vec![
        RULE.to_string(),
        "Simulation Configuration:".to_string(),
        format!("  Iterations      : {}", format_count(config.iterations)),
        format!("  Max Sim Steps   : {}", config.max_simulation_steps),
        "Board Configuration:".to_string(),
        format!("  Grid Size       : {} x {}", config.rows, config.cols),
        format!("  Dice Sides      : {}", config.dice_sides),
        format!(
            "  Allow Overshoot : {}",
            if config.allow_overshoot { "Yes" } else { "No" }
        ),
    ];
    if !config.allow_overshoot {
        lines.push(format!("  Overshoot Retry : {retries}"));
    }
    lines.push(String::new());
    lines.extend(transition_lines("Snake", &config.snakes));
    lines.push(String::new());
    lines.extend(transition_lines("Ladder", &config.ladders));
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn render_field(board: &BoardGraph, position: u32) -> String {
    let transition = board
        .node(position)
        .and_then(|node| node.kind().transition())
        .and_then(|id| board.transition(id));

    match transition {
        Some(t) => match t.kind {
            TransitionKind::Snake => format!("S -> {:3}", t.end),
            TransitionKind::Ladder => format!("L -> {:3}", t.end),
        },
        None => "N       ".to_string(),
    }
}

/// ASCII grid dump, one line per board row
pub fn render_board(board: &BoardGraph) -> String {
    let cols = board.cols();

    (0..board.rows())
        .map(|row| {
            (1..=cols)
                .map(|col| {
                    let position = row * cols + col;
                    format!("[{position:3}] {} | ", render_field(board, position))
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn usage_lines<'a>(
    results: &SimulationResults,
    label: &str,
    usages: impl Iterator<Item = &'a TransitionUsage>,
) -> Vec<String> {
    let mut lines = vec![format!("{label} usages:")];
    lines.extend(usages.map(|usage| {
        format!(
            "  -) From field {} to {}: {} - {}",
            usage.start,
            usage.end,
            format_count(usage.times_used),
            format_percentage(results.usage_share(usage))
        )
    }));
    if lines.len() == 1 {
        lines.push("  (None)".to_string());
    }
    lines
}

/// Aggregated statistics of a finished simulation
pub fn render_results(results: &SimulationResults) -> String {
    let shortest = match &results.shortest_roll_sequence {
        Some(rolls) => format!("{} rolls ({})", rolls.len(), format_rolls(rolls)),
        None => "no run reached the goal".to_string(),
    };

    let mut lines = vec![
        "========= Sim Results =========".to_string(),
        format!(
            "Elapsed time          : {}",
            format_duration(results.elapsed)
        ),
        format!(
            "Runs                  : {} ({} won, {} aborted)",
            format_count(results.iterations),
            format_count(results.completed_runs),
            format_count(results.aborted_runs)
        ),
        format!("Avg. rolls to win     : {:.2}", results.average_rolls),
        format!(
            "Won through overshoot : {}",
            format_count(results.overshoot_wins)
        ),
        format!("Shortest win          : {shortest}"),
        format!("Seed                  : {}", results.seed),
    ];
    lines.extend(usage_lines(results, "Ladder", results.ladders()));
    lines.extend(usage_lines(results, "Snake", results.snakes()));
    lines.push(RULE.to_string());
    lines.join("\n")
}
