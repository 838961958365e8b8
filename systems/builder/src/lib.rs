#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player intents into tower placement, upgrade and sale commands.

use tower_inferno_core::{CellCoord, Command, Event, GameState, TowerId, TowerKind};

/// Action the player requested on the hovered cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderAction {
    /// Construct a tower of the provided kind.
    Place(TowerKind),
    /// Raise the hovered tower by one level.
    Upgrade,
    /// Sell the hovered tower.
    Sell,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
    /// Action confirmed on this frame, if any.
    pub action: Option<BuilderAction>,
}

impl BuilderInput {
    /// Creates an input requesting `action` on `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, action: BuilderAction) -> Self {
        Self {
            cursor_cell: Some(cell),
            action: Some(action),
        }
    }
}

/// System that translates cursor input into tower commands while a run is active.
#[derive(Debug, Clone)]
pub struct Builder {
    state: GameState,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GameState::Menu,
        }
    }

    /// Consumes world events and adapter-derived input to emit tower commands.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper so the system can identify the hovered tower.
    /// Validation of gold, occupancy and level caps is left to the world.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<TowerId>,
    {
        for event in events {
            if let Event::GameStateChanged { state } = event {
                self.state = *state;
            }
        }

        if self.state != GameState::Playing {
            return;
        }

        let (Some(cell), Some(action)) = (input.cursor_cell, input.action) else {
            return;
        };

        match action {
            BuilderAction::Place(kind) => out.push(Command::PlaceTower { kind, cell }),
            BuilderAction::Upgrade => {
                if let Some(tower) = tower_at(cell) {
                    out.push(Command::UpgradeTower { tower });
                }
            }
            BuilderAction::Sell => {
                if let Some(tower) = tower_at(cell) {
                    out.push(Command::SellTower { tower });
                }
            }
        }
    }
}
