//! Tower registry and the placement economy.

use path_defence_core::{
    Cell, CellCoord, Event, PlacementError, SaleError, Tower, TowerId, TowerKind,
};
use tracing::{debug, trace};

use crate::GameState;

/// Towers owned by the player, kept in placement order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TowerRegistry {
    entries: Vec<Tower>,
}

impl TowerRegistry {
    pub(crate) fn insert(&mut self, tower: Tower) {
        self.entries.push(tower);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        let position = self.entries.iter().position(|tower| tower.id == id)?;
        Some(self.entries.remove(position))
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.iter().find(|tower| tower.id == id)
    }

    pub(crate) fn at(&self, cell: CellCoord) -> Option<&Tower> {
        self.entries.iter().find(|tower| tower.cell == cell)
    }

    pub(crate) fn as_slice(&self) -> &[Tower] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Tower] {
        &mut self.entries
    }
}

/// Validates a placement without mutating anything.
///
/// Checks run in a fixed order: bounds, then cell classification, then gold.
pub(crate) fn placement_error(
    state: &GameState,
    cell: CellCoord,
    kind: TowerKind,
) -> Option<PlacementError> {
    match state.cells.get(cell) {
        None => Some(PlacementError::OutOfBounds),
        Some(Cell::Path | Cell::Blocked) => Some(PlacementError::NotBuildable),
        Some(Cell::Buildable) if state.gold < kind.cost() => Some(PlacementError::InsufficientGold),
        Some(Cell::Buildable) => None,
    }
}

impl GameState {
    pub(crate) fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out: &mut Vec<Event>) {
        if let Some(reason) = placement_error(self, cell, kind) {
            trace!(?kind, %cell, ?reason, "tower placement rejected");
            out.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        let cost = kind.cost();
        let tower = TowerId::new(self.allocate_id());
        self.gold -= cost;
        self.cells.set(cell, Cell::Blocked);
        self.towers.insert(Tower::new(tower, kind, cell));

        debug!(tower = tower.get(), ?kind, %cell, cost, gold = self.gold, "tower placed");
        out.push(Event::TowerPlaced {
            tower,
            kind,
            cell,
            cost,
        });
    }

    pub(crate) fn sell_tower(&mut self, id: TowerId, out: &mut Vec<Event>) {
        let Some(tower) = self.towers.remove(id) else {
            trace!(tower = id.get(), "tower sale rejected");
            out.push(Event::TowerSaleRejected {
                tower: id,
                reason: SaleError::MissingTower,
            });
            return;
        };

        let refund = tower.kind.refund();
        self.gold = self.gold.saturating_add(refund);
        self.cells.set(tower.cell, Cell::Buildable);

        debug!(tower = id.get(), cell = %tower.cell, refund, gold = self.gold, "tower sold");
        out.push(Event::TowerSold {
            tower: id,
            cell: tower.cell,
            refund,
        });
    }
}
