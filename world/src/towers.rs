//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use tower_inferno_core::{CellCoord, TowerId, TowerKind, TowerSnapshot, TowerStats, WorldPoint};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// World-space centre of the occupied cell.
    pub(crate) position: WorldPoint,
    /// Current level, starting at one.
    pub(crate) level: u32,
    /// Stats derived for the current level.
    pub(crate) stats: TowerStats,
    /// Gold spent on placement and upgrades.
    pub(crate) invested: u32,
    since_last_attack: Duration,
}

impl TowerState {
    /// Creates a level-one tower that may attack immediately.
    pub(crate) fn new(id: TowerId, kind: TowerKind, cell: CellCoord, position: WorldPoint) -> Self {
        Self {
            id,
            kind,
            cell,
            position,
            level: 1,
            stats: kind.stats_at(1),
            invested: kind.cost(),
            since_last_attack: Duration::MAX,
        }
    }

    pub(crate) fn can_attack(&self) -> bool {
        self.since_last_attack >= self.stats.cooldown()
    }

    pub(crate) fn attack(&mut self) {
        self.since_last_attack = Duration::ZERO;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.since_last_attack = self.since_last_attack.saturating_add(dt);
    }

    /// Raises the tower one level, returning `false` at the level cap.
    pub(crate) fn upgrade(&mut self) -> bool {
        if self.level >= self.kind.max_level() {
            return false;
        }
        self.level += 1;
        self.stats = self.kind.stats_at(self.level);
        true
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            level: self.level,
            stats: self.stats,
            ready: self.can_attack(),
            invested: self.invested,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    cells: BTreeMap<CellCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            cells: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, tower: TowerState) {
        let _ = self.cells.insert(tower.cell, tower.id);
        let _ = self.entries.insert(tower.id, tower);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let tower = self.entries.remove(&id)?;
        let _ = self.cells.remove(&tower.cell);
        Some(tower)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn at(&self, cell: CellCoord) -> Option<TowerId> {
        self.cells.get(&cell).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }
}
