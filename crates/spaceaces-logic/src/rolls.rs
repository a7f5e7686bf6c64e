//! Roll history: recorded rolls plus a bounded most-recent-first index.
//!
//! Rolls are immutable once recorded except for their note and session /
//! mission / encounter links. When the history grows past its capacity the
//! oldest roll is evicted, record and all.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ROLL_CAPACITY;
use crate::dice::{DieType, RollMode, RollOutcome};
use crate::sector::Timestamp;

pub type RollId = String;

/// A recorded roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub id: RollId,
    pub die_type: DieType,
    /// Final, modified result.
    pub result: i32,
    /// Both dice for advantage/disadvantage; `None` for a normal roll.
    pub results: Option<Vec<i32>>,
    pub modifiers: Vec<i32>,
    pub mode: RollMode,
    pub note: Option<String>,
    pub timestamp: Timestamp,
    pub session_id: Option<String>,
    pub mission_id: Option<String>,
    pub encounter_id: Option<String>,
}

/// Optional note and links attached when a roll is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollContext {
    pub note: Option<String>,
    pub session_id: Option<String>,
    pub mission_id: Option<String>,
    pub encounter_id: Option<String>,
}

/// Editable fields of a recorded roll. The outer `Option` is "change this
/// field", the inner one the new value (`Some(None)` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollPatch {
    pub note: Option<Option<String>>,
    pub session_id: Option<Option<String>>,
    pub mission_id: Option<Option<String>>,
    pub encounter_id: Option<Option<String>>,
}

/// Recorded rolls, newest first, capped at `capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollLog {
    rolls: HashMap<RollId, Roll>,
    history: VecDeque<RollId>,
    capacity: usize,
    next_id: u64,
}

impl Default for RollLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ROLL_CAPACITY)
    }
}

impl RollLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rolls: HashMap::new(),
            history: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Roll> {
        self.rolls.get(id)
    }

    /// Rolls newest first.
    pub fn recent(&self) -> impl Iterator<Item = &Roll> {
        self.history.iter().filter_map(|id| self.rolls.get(id))
    }

    pub fn latest(&self) -> Option<&Roll> {
        self.recent().next()
    }

    /// Record a roll at the front of the history, evicting the oldest ones
    /// beyond capacity.
    pub fn add_roll(&mut self, outcome: &RollOutcome, context: RollContext, now: Timestamp) -> RollId {
        self.next_id += 1;
        let id = format!("roll-{}", self.next_id);
        let results = (outcome.mode != RollMode::Normal).then(|| outcome.all_rolls.clone());

        let roll = Roll {
            id: id.clone(),
            die_type: outcome.die_type,
            result: outcome.final_result,
            results,
            modifiers: outcome.modifiers.clone(),
            mode: outcome.mode,
            note: context.note,
            timestamp: now,
            session_id: context.session_id,
            mission_id: context.mission_id,
            encounter_id: context.encounter_id,
        };
        self.rolls.insert(id.clone(), roll);
        self.history.push_front(id.clone());
        self.evict_overflow();
        id
    }

    fn evict_overflow(&mut self) {
        while self.history.len() > self.capacity {
            if let Some(old) = self.history.pop_back() {
                self.rolls.remove(&old);
            }
        }
    }

    /// Change the capacity, evicting immediately if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict_overflow();
    }

    /// Edit note and links. Unknown ids are ignored.
    pub fn update_roll(&mut self, id: &str, patch: RollPatch) {
        let Some(roll) = self.rolls.get_mut(id) else {
            return;
        };
        if let Some(note) = patch.note {
            roll.note = note;
        }
        if let Some(session) = patch.session_id {
            roll.session_id = session;
        }
        if let Some(mission) = patch.mission_id {
            roll.mission_id = mission;
        }
        if let Some(encounter) = patch.encounter_id {
            roll.encounter_id = encounter;
        }
    }

    pub fn delete_roll(&mut self, id: &str) -> Option<Roll> {
        self.history.retain(|h| h != id);
        self.rolls.remove(id)
    }

    /// Drop every roll. Ids keep counting up.
    pub fn clear(&mut self) {
        self.rolls.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(mode: RollMode, rolls: Vec<i32>, modifiers: Vec<i32>) -> RollOutcome {
        let base = match mode {
            RollMode::Normal => rolls[0],
            RollMode::Advantage => *rolls.iter().max().unwrap(),
            RollMode::Disadvantage => *rolls.iter().min().unwrap(),
        };
        RollOutcome {
            die_type: DieType::D20,
            mode,
            base_result: base,
            final_result: base + modifiers.iter().sum::<i32>(),
            all_rolls: rolls,
            modifiers,
        }
    }

    #[test]
    fn records_final_result_and_dual_rolls() {
        let mut log = RollLog::default();
        let id = log.add_roll(
            &outcome(RollMode::Advantage, vec![4, 17], vec![2]),
            RollContext {
                note: Some("dogfight".into()),
                ..Default::default()
            },
            500,
        );
        let roll = log.get(&id).unwrap();
        assert_eq!(roll.result, 19);
        assert_eq!(roll.results, Some(vec![4, 17]));
        assert_eq!(roll.note.as_deref(), Some("dogfight"));
        assert_eq!(roll.timestamp, 500);

        let normal = log.add_roll(&outcome(RollMode::Normal, vec![8], vec![]), RollContext::default(), 501);
        assert!(log.get(&normal).unwrap().results.is_none());
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut log = RollLog::with_capacity(3);
        let ids: Vec<_> = (0..5)
            .map(|i| log.add_roll(&outcome(RollMode::Normal, vec![i + 1], vec![]), RollContext::default(), i as u64))
            .collect();
        assert_eq!(log.len(), 3);
        let recent: Vec<_> = log.recent().map(|r| r.id.clone()).collect();
        assert_eq!(recent, vec![ids[4].clone(), ids[3].clone(), ids[2].clone()]);
        assert!(log.get(&ids[0]).is_none());
        assert!(log.get(&ids[1]).is_none());
        assert_eq!(log.latest().unwrap().id, ids[4]);
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        let mut log = RollLog::default();
        for i in 0..150 {
            log.add_roll(&outcome(RollMode::Normal, vec![1], vec![]), RollContext::default(), i);
        }
        assert_eq!(log.len(), 100);
        assert_eq!(log.recent().last().unwrap().timestamp, 50);
    }

    #[test]
    fn update_touches_only_note_and_links() {
        let mut log = RollLog::default();
        let id = log.add_roll(
            &outcome(RollMode::Normal, vec![12], vec![1]),
            RollContext {
                note: Some("old".into()),
                ..Default::default()
            },
            1,
        );
        let before = log.get(&id).unwrap().clone();
        log.update_roll(
            &id,
            RollPatch {
                note: Some(None),
                mission_id: Some(Some("m-7".into())),
                ..Default::default()
            },
        );
        let after = log.get(&id).unwrap();
        assert_eq!(after.note, None);
        assert_eq!(after.mission_id.as_deref(), Some("m-7"));
        assert_eq!(after.result, before.result);
        assert_eq!(after.timestamp, before.timestamp);
        log.update_roll("missing", RollPatch::default());
    }

    #[test]
    fn delete_and_clear() {
        let mut log = RollLog::default();
        let a = log.add_roll(&outcome(RollMode::Normal, vec![3], vec![]), RollContext::default(), 1);
        let b = log.add_roll(&outcome(RollMode::Normal, vec![4], vec![]), RollContext::default(), 2);
        assert!(log.delete_roll(&a).is_some());
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().id, b);
        log.clear();
        assert!(log.is_empty());
        let c = log.add_roll(&outcome(RollMode::Normal, vec![5], vec![]), RollContext::default(), 3);
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn shrinking_capacity_evicts() {
        let mut log = RollLog::with_capacity(10);
        for i in 0..6 {
            log.add_roll(&outcome(RollMode::Normal, vec![1], vec![]), RollContext::default(), i);
        }
        log.set_capacity(2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.capacity(), 2);
    }

    #[test]
    fn serde_roundtrip_keeps_order() {
        let mut log = RollLog::with_capacity(5);
        for i in 0..4 {
            log.add_roll(&outcome(RollMode::Disadvantage, vec![6, 2], vec![i]), RollContext::default(), i as u64);
        }
        let json = serde_json::to_string(&log).unwrap();
        let back: RollLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
        let order: Vec<_> = back.recent().map(|r| r.timestamp).collect();
        assert_eq!(order, vec![3, 2, 1, 0]);
    }
}
