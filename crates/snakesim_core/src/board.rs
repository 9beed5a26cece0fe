//! Board graph construction
//!
//! A board is compiled into an arena of nodes, one per field. Successor
//! references are indices into that arena, so the whole graph is dropped as
//! a unit and can be shared read-only between simulation workers.
//!
//! Positions in the public API are 1-based like on a printed board; node
//! indices are `position - 1`.

use serde::Serialize;
use tracing::debug;

use crate::config::{GameConfig, TransitionKind};
use crate::error::{Result, SimulationError};
use crate::model::TransitionId;

/// What a field does when a token lands on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Plain,
    Snake(TransitionId),
    Ladder(TransitionId),
}

impl FieldKind {
    /// Transition starting on this field, if any
    #[must_use]
    pub fn transition(self) -> Option<TransitionId> {
        match self {
            FieldKind::Plain => None,
            FieldKind::Snake(id) | FieldKind::Ladder(id) => Some(id),
        }
    }
}

/// One field of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: FieldKind,
    successors: Vec<usize>,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Node indices reachable from this field.
    ///
    /// Plain fields have one entry per die face (entry `k - 1` is the field
    /// reached by rolling `k`, clamped to the goal). Snake and ladder fields
    /// have a single entry, the transition's end.
    #[must_use]
    pub fn successors(&self) -> &[usize] {
        &self.successors
    }
}

/// A transition as placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionSpec {
    pub id: TransitionId,
    pub kind: TransitionKind,
    pub start: u32,
    pub end: u32,
}

/// Immutable successor graph of a board
#[derive(Debug, Clone)]
pub struct BoardGraph {
    rows: u32,
    cols: u32,
    dice_sides: u32,
    nodes: Vec<Node>,
    transitions: Vec<TransitionSpec>,
}

impl BoardGraph {
    /// Compile a validated configuration into a board graph.
    ///
    /// Snakes are placed before ladders, each in declaration order; should two
    /// transitions share a start field the one placed last owns it.
    ///
    /// # Panics
    ///
    /// Panics if a transition lies outside the board, which
    /// [`GameConfig::validate`] rules out. Debug builds name the offending
    /// transition.
    pub fn build(config: &GameConfig) -> Result<Self> {
        let num_fields = config.num_fields() as usize;
        let goal_index = num_fields.saturating_sub(1);
        let dice_sides = config.dice_sides as usize;

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(num_fields)
            .map_err(SimulationError::alloc("board nodes", num_fields))?;
        nodes.extend((0..num_fields).map(|_| Node {
            kind: FieldKind::Plain,
            successors: Vec::new(),
        }));

        let num_transitions = config.snakes.len() + config.ladders.len();
        let mut transitions = Vec::new();
        transitions
            .try_reserve_exact(num_transitions)
            .map_err(SimulationError::alloc("transition table", num_transitions))?;

        for (index, (kind, transition)) in config.transitions().enumerate() {
            debug_assert!(
                (1..=num_fields).contains(&(transition.start as usize))
                    && (1..=num_fields).contains(&(transition.end as usize)),
                "{kind} {}:{} lies outside the board",
                transition.start,
                transition.end
            );
            let id = TransitionId(index as u32);
            transitions.push(TransitionSpec {
                id,
                kind,
                start: transition.start,
                end: transition.end,
            });

            let node = &mut nodes[transition.start as usize - 1];
            node.kind = match kind {
                TransitionKind::Snake => FieldKind::Snake(id),
                TransitionKind::Ladder => FieldKind::Ladder(id),
            };
            node.successors.clear();
            node.successors
                .try_reserve_exact(1)
                .map_err(SimulationError::alloc("transition successor", 1))?;
            node.successors.push(transition.end as usize - 1);
        }

        for (index, node) in nodes.iter_mut().enumerate() {
            if node.kind != FieldKind::Plain {
                continue;
            }
            node.successors
                .try_reserve_exact(dice_sides)
                .map_err(SimulationError::alloc("roll successors", dice_sides))?;
            node.successors
                .extend((1..=dice_sides).map(|roll| (index + roll).min(goal_index)));
        }

        debug!(
            rows = config.rows,
            cols = config.cols,
            dice_sides = config.dice_sides,
            transitions = transitions.len(),
            "Built board graph"
        );

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            dice_sides: config.dice_sides,
            nodes,
            transitions,
        })
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[must_use]
    pub fn dice_sides(&self) -> u32 {
        self.dice_sides
    }

    #[must_use]
    pub fn num_fields(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// 1-based position of the goal field
    #[must_use]
    pub fn goal(&self) -> u32 {
        self.num_fields()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at a 1-based position
    #[must_use]
    pub fn node(&self, position: u32) -> Option<&Node> {
        position
            .checked_sub(1)
            .and_then(|index| self.nodes.get(index as usize))
    }

    /// Transition table indexed by [`TransitionId`]
    #[must_use]
    pub fn transitions(&self) -> &[TransitionSpec] {
        &self.transitions
    }

    #[must_use]
    pub fn transition(&self, id: TransitionId) -> Option<&TransitionSpec> {
        self.transitions.get(id.index())
    }

    /// Field reached by rolling `roll` from `position`, clamped to the goal.
    ///
    /// Position `0` is the start, before the first field. Plain fields answer
    /// from their successor list; the start and transition fields (which
    /// carry no roll successors) fall back to plain arithmetic.
    #[must_use]
    pub fn successor(&self, position: u32, roll: u32) -> u32 {
        let from_graph = self.node(position).and_then(|node| match node.kind {
            FieldKind::Plain => node
                .successors
                .get((roll as usize).wrapping_sub(1))
                .map(|&index| index as u32 + 1),
            _ => None,
        });
        from_graph.unwrap_or_else(|| position.saturating_add(roll).min(self.goal()))
    }

    /// Apply the transition starting at `position`, if any.
    ///
    /// Returns the resulting position and the transition taken. At most one
    /// transition is followed.
    #[must_use]
    pub fn destination(&self, position: u32) -> (u32, Option<TransitionId>) {
        match self.node(position) {
            Some(node) => match (node.kind.transition(), node.successors.first()) {
                (Some(id), Some(&end)) => (end as u32 + 1, Some(id)),
                _ => (position, None),
            },
            None => (position, None),
        }
    }
}
