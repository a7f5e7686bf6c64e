//! The galaxy map store: sectors keyed by id plus the current position.
//!
//! Mutators follow a single-writer discipline and never fail. Operations
//! that cannot apply (unknown ids, occupied coordinates) are silent no-ops.
//! After every operation no two sectors share a coordinate.
//!
//! Discovery is one-way: `discovered_at` is written once and never cleared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::SectorTemplate;
use crate::hex::{self, HexCoord};
use crate::sector::{NewSector, Sector, SectorId, SectorPatch, Timestamp};

/// Id given to the sector at the home coordinate.
pub const HOME_SECTOR_ID: &str = "home-sector";

/// All sectors of a campaign plus the player's current position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Galaxy {
    pub sectors: BTreeMap<SectorId, Sector>,
    pub current_sector: Option<SectorId>,
    next_id: u64,
}

impl Galaxy {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Sector> {
        self.sectors.get(id)
    }

    pub fn current(&self) -> Option<&Sector> {
        self.current_sector.as_deref().and_then(|id| self.sectors.get(id))
    }

    /// Sector occupying `hex`, if any.
    pub fn sector_at(&self, hex: HexCoord) -> Option<&Sector> {
        self.sectors.values().find(|s| s.hex() == hex)
    }

    pub fn is_occupied(&self, hex: HexCoord) -> bool {
        self.sector_at(hex).is_some()
    }

    /// Coordinates of every discovered sector.
    pub fn discovered_coords(&self) -> Vec<HexCoord> {
        self.sectors
            .values()
            .filter(|s| s.is_discovered())
            .map(Sector::hex)
            .collect()
    }

    /// Undiscovered sectors adjacent to at least one discovered sector.
    pub fn discoverable_sectors(&self) -> Vec<&Sector> {
        let discovered = self.discovered_coords();
        self.sectors
            .values()
            .filter(|s| !s.is_discovered() && hex::is_discoverable(s.hex(), &discovered))
            .collect()
    }

    /// Sectors within `range` steps of `center`.
    pub fn visible_from(&self, center: HexCoord, range: i32) -> Vec<&Sector> {
        self.sectors
            .values()
            .filter(|s| hex::hex_distance(center, s.hex()) <= range)
            .collect()
    }

    // ── Creation ────────────────────────────────────────────────────────

    fn allocate_id(&mut self) -> SectorId {
        loop {
            self.next_id += 1;
            let id = format!("sector-{}", self.next_id);
            if !self.sectors.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert a sector with an explicit id. Rejected if the id exists or the
    /// coordinate is taken.
    pub(crate) fn insert_with_id(
        &mut self,
        id: SectorId,
        new: NewSector,
        now: Timestamp,
    ) -> Option<SectorId> {
        if self.sectors.contains_key(&id) || self.is_occupied(new.hex) {
            return None;
        }
        let sector = Sector {
            id: id.clone(),
            hex_q: new.hex.q,
            hex_r: new.hex.r,
            name: new.name,
            sector_type: new.sector_type,
            discovered_at: new.discovered_at,
            is_dangerous: new.is_dangerous,
            notes: new.notes,
            linked_encounter_ids: Vec::new(),
            linked_mission_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.sectors.insert(id.clone(), sector);
        Some(id)
    }

    /// Create a sector at a free coordinate. Returns `None` (and changes
    /// nothing) if the coordinate is occupied.
    pub fn create_sector(&mut self, new: NewSector, now: Timestamp) -> Option<SectorId> {
        if self.is_occupied(new.hex) {
            log::debug!("create_sector: {} already occupied", new.hex);
            return None;
        }
        let id = self.allocate_id();
        self.insert_with_id(id, new, now)
    }

    /// Create an undiscovered sector from a catalog card at `hex`.
    pub fn add_sector_at(
        &mut self,
        hex: HexCoord,
        template: &SectorTemplate,
        now: Timestamp,
    ) -> Option<SectorId> {
        self.create_sector(
            NewSector {
                hex,
                name: template.name.to_string(),
                sector_type: template.sector_type,
                is_dangerous: template.is_dangerous,
                notes: template.description.to_string(),
                discovered_at: None,
            },
            now,
        )
    }

    // ── Updates ─────────────────────────────────────────────────────────

    /// Apply the present fields of `patch`. A move onto an occupied
    /// coordinate is dropped; the other fields still apply.
    pub fn update_sector(&mut self, id: &str, patch: SectorPatch, now: Timestamp) {
        let blocked = match patch.hex {
            Some(target) => self.sector_at(target).is_some_and(|other| other.id != id),
            None => false,
        };
        let Some(sector) = self.sectors.get_mut(id) else {
            return;
        };
        if let Some(target) = patch.hex {
            if blocked {
                log::debug!("update_sector: {} occupied, keeping {} in place", target, id);
            } else {
                sector.hex_q = target.q;
                sector.hex_r = target.r;
            }
        }
        if let Some(name) = patch.name {
            sector.name = name;
        }
        if let Some(ty) = patch.sector_type {
            sector.sector_type = ty;
        }
        if let Some(danger) = patch.is_dangerous {
            sector.is_dangerous = danger;
        }
        if let Some(notes) = patch.notes {
            sector.notes = notes;
        }
        sector.updated_at = now;
    }

    /// Mark a sector discovered. Returns whether it was newly discovered.
    pub fn discover_sector(&mut self, id: &str, now: Timestamp) -> bool {
        match self.sectors.get_mut(id) {
            Some(sector) => sector.discover(now),
            None => false,
        }
    }

    /// Move the player to `id`.
    ///
    /// Discovers the target and every existing sector on its six neighbor
    /// coordinates. Returns the ids that were newly discovered; calling it
    /// again returns an empty list and touches no timestamps. Unknown ids
    /// are ignored.
    pub fn move_to(&mut self, id: &str, now: Timestamp) -> Vec<SectorId> {
        let Some(target) = self.sectors.get(id).map(Sector::hex) else {
            log::debug!("move_to: no sector {}", id);
            return Vec::new();
        };
        self.current_sector = Some(id.to_string());

        let mut revealed = Vec::new();
        if self.discover_sector(id, now) {
            revealed.push(id.to_string());
        }
        for neighbor in hex::hex_neighbors(target) {
            let Some(nid) = self.sector_at(neighbor).map(|s| s.id.clone()) else {
                continue;
            };
            if self.discover_sector(&nid, now) {
                revealed.push(nid);
            }
        }
        if !revealed.is_empty() {
            log::debug!("move_to {}: revealed {:?}", id, revealed);
        }
        revealed
    }

    /// Exchange the coordinates of two sectors. Ids, discovery and links stay
    /// with their sectors.
    pub fn swap_sector_positions(&mut self, a: &str, b: &str, now: Timestamp) {
        if a == b {
            return;
        }
        let (Some(ha), Some(hb)) = (
            self.sectors.get(a).map(Sector::hex),
            self.sectors.get(b).map(Sector::hex),
        ) else {
            return;
        };
        for (id, hex) in [(a, hb), (b, ha)] {
            if let Some(sector) = self.sectors.get_mut(id) {
                sector.hex_q = hex.q;
                sector.hex_r = hex.r;
                sector.updated_at = now;
            }
        }
    }

    pub fn link_encounter(&mut self, id: &str, encounter_id: &str, now: Timestamp) {
        if let Some(sector) = self.sectors.get_mut(id) {
            if !sector.linked_encounter_ids.iter().any(|e| e == encounter_id) {
                sector.linked_encounter_ids.push(encounter_id.to_string());
                sector.updated_at = now;
            }
        }
    }

    pub fn link_mission(&mut self, id: &str, mission_id: &str, now: Timestamp) {
        if let Some(sector) = self.sectors.get_mut(id) {
            if !sector.linked_mission_ids.iter().any(|m| m == mission_id) {
                sector.linked_mission_ids.push(mission_id.to_string());
                sector.updated_at = now;
            }
        }
    }

    /// Remove a sector, clearing the current position if it pointed there.
    ///
    /// The home sector is not protected here; callers that want to keep it
    /// must check [`HOME_SECTOR_ID`] themselves.
    pub fn delete_sector(&mut self, id: &str) -> Option<Sector> {
        let removed = self.sectors.remove(id);
        if self.current_sector.as_deref() == Some(id) {
            self.current_sector = None;
        }
        removed
    }
}
