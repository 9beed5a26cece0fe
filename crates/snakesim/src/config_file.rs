//! Config file loading
//!
//! Two formats are accepted:
//!
//! - `*.yaml` / `*.yml`: a YAML mapping with the fields of [`GameConfig`],
//!   transitions given as `{ start, end }` pairs.
//! - anything else: the line format
//!
//! ```text
//! # comment
//! ITERATIONS=10000
//! MAXSIMSTEPS=1000
//! ROWS=10
//! COLS=10
//! DICE=6
//! ALLOW_OVERSHOOT=true
//! SNAKES=2
//! 98:12
//! 62:19
//! LADDERS=1
//! 4:56
//! ```
//!
//! Both go through the same sanitizer: bad iteration or step counts are
//! fatal, bad board dimensions fall back to defaults, and an invalid snake or
//! ladder is dropped. Everything dropped or replaced is logged as a warning.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail, eyre};
use serde::Deserialize;
use snakesim_core::config::{
    DEFAULT_COLS, DEFAULT_DICE_SIDES, DEFAULT_ITERATIONS, DEFAULT_MAX_SIMULATION_STEPS,
    DEFAULT_ROWS,
};
use snakesim_core::{GameConfig, Transition, TransitionKind};
use tracing::{info, warn};

/// Load, sanitize and validate a configuration file
pub fn load_config(path: &Path) -> color_eyre::Result<GameConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;

    let raw = match path.extension().and_then(OsStr::to_str) {
        Some("yaml" | "yml") => RawConfig::from_yaml(&content),
        _ => RawConfig::from_lines(&content),
    }
    .wrap_err_with(|| format!("failed to parse config file {}", path.display()))?;

    let config = raw.sanitize()?;
    config.validate()?;

    info!(
        path = %path.display(),
        rows = config.rows,
        cols = config.cols,
        snakes = config.snakes.len(),
        ladders = config.ladders.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Transition as written in a YAML file
#[derive(Debug, Clone, Copy, Deserialize)]
struct FileTransition {
    start: i64,
    end: i64,
}

/// YAML representation, signed so that negative values can be reported
#[derive(Debug, Deserialize)]
#[serde(default)]
struct FileConfig {
    iterations: i64,
    max_simulation_steps: i64,
    max_overshoot_retries: Option<i64>,
    rows: i64,
    cols: i64,
    dice_sides: i64,
    allow_overshoot: bool,
    snakes: Vec<FileTransition>,
    ladders: Vec<FileTransition>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS as i64,
            max_simulation_steps: i64::from(DEFAULT_MAX_SIMULATION_STEPS),
            max_overshoot_retries: None,
            rows: i64::from(DEFAULT_ROWS),
            cols: i64::from(DEFAULT_COLS),
            dice_sides: i64::from(DEFAULT_DICE_SIDES),
            allow_overshoot: true,
            snakes: Vec::new(),
            ladders: Vec::new(),
        }
    }
}

/// Unchecked values collected from either file format
#[derive(Debug)]
struct RawConfig {
    iterations: i64,
    max_simulation_steps: i64,
    max_overshoot_retries: Option<i64>,
    rows: i64,
    cols: i64,
    dice_sides: i64,
    allow_overshoot: bool,
    /// Transitions in file order
    transitions: Vec<(TransitionKind, i64, i64)>,
    /// Declared `SNAKES=` count; accepted snakes beyond it are dropped
    snake_limit: Option<usize>,
    /// Declared `LADDERS=` count
    ladder_limit: Option<usize>,
}

impl From<FileConfig> for RawConfig {
    fn from(file: FileConfig) -> Self {
        let snakes = file
            .snakes
            .iter()
            .map(|t| (TransitionKind::Snake, t.start, t.end));
        let ladders = file
            .ladders
            .iter()
            .map(|t| (TransitionKind::Ladder, t.start, t.end));
        Self {
            iterations: file.iterations,
            max_simulation_steps: file.max_simulation_steps,
            max_overshoot_retries: file.max_overshoot_retries,
            rows: file.rows,
            cols: file.cols,
            dice_sides: file.dice_sides,
            allow_overshoot: file.allow_overshoot,
            transitions: snakes.chain(ladders).collect(),
            snake_limit: None,
            ladder_limit: None,
        }
    }
}

fn parse_int(line_no: usize, key: &str, value: &str) -> color_eyre::Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| eyre!("line {line_no}: {key} expects an integer, got {value:?}"))
}

impl RawConfig {
    fn from_yaml(content: &str) -> color_eyre::Result<Self> {
        let file: FileConfig = serde_saphyr::from_str(content)?;
        Ok(file.into())
    }

    fn from_lines(content: &str) -> color_eyre::Result<Self> {
        let mut raw = RawConfig::from(FileConfig::default());
        let mut section = None;

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "ITERATIONS" => raw.iterations = parse_int(line_no, key, value)?,
                    "MAXSIMSTEPS" => raw.max_simulation_steps = parse_int(line_no, key, value)?,
                    "MAXRETRIES" => {
                        raw.max_overshoot_retries = Some(parse_int(line_no, key, value)?)
                    }
                    "ROWS" => raw.rows = parse_int(line_no, key, value)?,
                    "COLS" => raw.cols = parse_int(line_no, key, value)?,
                    "DICE" => raw.dice_sides = parse_int(line_no, key, value)?,
                    "ALLOW_OVERSHOOT" => raw.allow_overshoot = value.trim().starts_with("true"),
                    "SNAKES" | "LADDERS" => {
                        let count = parse_int(line_no, key, value)?;
                        let Ok(count) = usize::try_from(count) else {
                            bail!("line {line_no}: number of {key} must not be negative");
                        };
                        if key.trim() == "SNAKES" {
                            raw.snake_limit = Some(count);
                            section = Some(TransitionKind::Snake);
                        } else {
                            raw.ladder_limit = Some(count);
                            section = Some(TransitionKind::Ladder);
                        }
                    }
                    other => warn!(line = line_no, key = other, "Ignoring unknown setting"),
                }
                continue;
            }

            let parsed = line.split_once(':').and_then(|(start, end)| {
                Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
            });
            match (parsed, section) {
                (Some((start, end)), Some(kind)) => raw.transitions.push((kind, start, end)),
                (Some(_), None) => warn!(
                    line = line_no,
                    "Transition outside a SNAKES or LADDERS section, ignoring it"
                ),
                (None, _) => warn!(line = line_no, content = line, "Ignoring unrecognized line"),
            }
        }

        Ok(raw)
    }

    fn sanitize(self) -> color_eyre::Result<GameConfig> {
        let Ok(iterations) = u64::try_from(self.iterations) else {
            bail!(
                "number of iterations must be positive, got {}",
                self.iterations
            );
        };
        if iterations == 0 {
            bail!("number of iterations must be positive, got 0");
        }
        let max_simulation_steps = match u32::try_from(self.max_simulation_steps) {
            Ok(steps) if steps > 0 => steps,
            _ => bail!(
                "maximum number of simulation steps must be between 1 and {}, got {}",
                u32::MAX,
                self.max_simulation_steps
            ),
        };

        let rows = positive_or_default("rows", self.rows, 1, DEFAULT_ROWS);
        let cols = positive_or_default("cols", self.cols, 1, DEFAULT_COLS);
        let dice_sides = positive_or_default("dice sides", self.dice_sides, 2, DEFAULT_DICE_SIDES);
        let max_overshoot_retries = self.max_overshoot_retries.and_then(|retries| {
            let converted = u32::try_from(retries).ok();
            if converted.is_none() {
                warn!(retries, "Overshoot retry cap out of range, ignoring it");
            }
            converted
        });

        let mut config = GameConfig {
            iterations,
            max_simulation_steps,
            max_overshoot_retries,
            rows,
            cols,
            dice_sides,
            allow_overshoot: self.allow_overshoot,
            snakes: Vec::new(),
            ladders: Vec::new(),
        };

        for (kind, start, end) in self.transitions {
            let (Ok(start), Ok(end)) = (u32::try_from(start), u32::try_from(end)) else {
                warn!(%kind, start, end, "Transition reaches outside the board, dropping it");
                continue;
            };
            let transition = Transition::new(start, end);

            let (accepted, limit) = match kind {
                TransitionKind::Snake => (config.snakes.len(), self.snake_limit),
                TransitionKind::Ladder => (config.ladders.len(), self.ladder_limit),
            };
            if limit.is_some_and(|limit| accepted >= limit) {
                warn!(%kind, start, end, "More transitions than declared, dropping it");
                continue;
            }

            if let Err(e) = config.check_transition(kind, transition) {
                warn!("{e}; it will not be included on the board");
                continue;
            }
            match kind {
                TransitionKind::Snake => config.snakes.push(transition),
                TransitionKind::Ladder => config.ladders.push(transition),
            }
        }

        Ok(config)
    }
}

/// Board settings below `min` fall back to their default
fn positive_or_default(name: &str, value: i64, min: u32, default: u32) -> u32 {
    match u32::try_from(value) {
        Ok(v) if v >= min => v,
        _ => {
            warn!(value, default, "Invalid number of {name}, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CLASSIC: &str = "\
# Classic board
ITERATIONS=5000
MAXSIMSTEPS=800
ROWS=10
COLS=10
DICE=6
ALLOW_OVERSHOOT=false

SNAKES=2
98:12   # long one
62:19
LADDERS=1
4:56
";

    fn write(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_line_format() {
        let (_dir, path) = write("classic.txt", CLASSIC);
        let config = load_config(&path).unwrap();

        assert_eq!(config.iterations, 5000);
        assert_eq!(config.max_simulation_steps, 800);
        assert_eq!(config.num_fields(), 100);
        assert!(!config.allow_overshoot);
        assert_eq!(
            config.snakes,
            vec![Transition::new(98, 12), Transition::new(62, 19)]
        );
        assert_eq!(config.ladders, vec![Transition::new(4, 56)]);
        assert_eq!(config.max_overshoot_retries, None);
    }

    #[test]
    fn test_invalid_transitions_are_dropped() {
        let content = "\
ROWS=1
COLS=10
SNAKES=5
3:7
10:2
5:5
8:3
9:3
LADDERS=2
2:8
2:6
4:11
";
        let (_dir, path) = write("messy.txt", content);
        let config = load_config(&path).unwrap();

        // 3:7 wrong direction, 10:2 starts on goal, 5:5 self loop, 9:3 shares field 3
        assert_eq!(config.snakes, vec![Transition::new(8, 3)]);
        // 2:8 shares field 8, 4:11 out of bounds
        assert_eq!(config.ladders, vec![Transition::new(2, 6)]);
    }

    #[test]
    fn test_declared_count_limits_transitions() {
        let content = "ROWS=5\nCOLS=5\nLADDERS=1\n2:10\n3:12\n";
        let (_dir, path) = write("limit.txt", content);
        let config = load_config(&path).unwrap();
        assert_eq!(config.ladders, vec![Transition::new(2, 10)]);
    }

    #[test]
    fn test_bad_dimensions_fall_back_to_defaults() {
        let content = "ROWS=0\nCOLS=-4\nDICE=1\nMAXRETRIES=-1\n";
        let (_dir, path) = write("dims.txt", content);
        let config = load_config(&path).unwrap();
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.dice_sides, DEFAULT_DICE_SIDES);
        assert_eq!(config.max_overshoot_retries, None);
    }

    #[test]
    fn test_fatal_values() {
        for content in [
            "ITERATIONS=0\n",
            "ITERATIONS=-3\n",
            "MAXSIMSTEPS=0\n",
            "SNAKES=-1\n",
            "ROWS=ten\n",
        ] {
            let (_dir, path) = write("bad.txt", content);
            assert!(load_config(&path).is_err(), "{content:?} accepted");
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_yaml_format() {
        let content = "\
iterations: 2000
max_simulation_steps: 300
max_overshoot_retries: 50
rows: 1
cols: 10
dice_sides: 4
allow_overshoot: false
snakes:
  - { start: 8, end: 3 }
ladders:
  - { start: 2, end: 9 }
  - { start: 9, end: 10 }
";
        let (_dir, path) = write("board.yaml", content);
        let config = load_config(&path).unwrap();

        assert_eq!(config.iterations, 2000);
        assert_eq!(config.max_simulation_steps, 300);
        assert_eq!(config.max_overshoot_retries, Some(50));
        assert_eq!(config.dice_sides, 4);
        assert!(!config.allow_overshoot);
        assert_eq!(config.snakes, vec![Transition::new(8, 3)]);
        // 9:10 collides with the first ladder's end
        assert_eq!(config.ladders, vec![Transition::new(2, 9)]);
    }

    #[test]
    fn test_yaml_defaults() {
        let (_dir, path) = write("empty.yml", "rows: 3\n");
        let config = load_config(&path).unwrap();
        assert_eq!(
            config,
            GameConfig {
                rows: 3,
                ..GameConfig::default()
            }
        );
    }
}
