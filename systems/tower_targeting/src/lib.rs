#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects targets for towers whose cooldown has elapsed.

use path_defence_core::{CellPoint, Enemy, EnemyId, Tower, TowerTarget};

/// Tower targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every ready tower.
    ///
    /// Each ready tower picks the living enemy within range that has reached
    /// the most waypoints. Ties keep the enemy encountered first in `enemies`.
    /// Towers without an eligible enemy produce no entry. The output buffer is
    /// cleared before populating it.
    pub fn handle(&mut self, towers: &[Tower], enemies: &[Enemy], out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() {
            return;
        }

        self.prepare_candidates(enemies);
        if self.candidates.is_empty() {
            return;
        }

        for tower in towers.iter().filter(|tower| tower.is_ready()) {
            let mut best: Option<&Candidate> = None;

            for candidate in &self.candidates {
                if !tower.in_range(candidate.position) {
                    continue;
                }

                let replace = best.map_or(true, |existing| candidate.precedes(existing));
                if replace {
                    best = Some(candidate);
                }
            }

            if let Some(best) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.id,
                });
            }
        }
    }

    fn prepare_candidates(&mut self, enemies: &[Enemy]) {
        self.candidates.clear();
        self.candidates.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.alive)
                .map(|enemy| Candidate {
                    id: enemy.id,
                    position: enemy.position,
                    path_index: enemy.path_index,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EnemyId,
    position: CellPoint,
    path_index: usize,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        self.path_index > other.path_index
    }
}
