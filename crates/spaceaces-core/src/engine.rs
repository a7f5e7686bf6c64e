//! Campaign engine - main entry point for the app's game state

use std::io::{Read, Write};

use spaceaces_logic::config::{CampaignConfig, ConfigError};
use spaceaces_logic::dice::{
    self, DiceEngine, DieType, RandomSourceKind, RollMode, RollOutcome, RollParamError,
};
use spaceaces_logic::galaxy::{Galaxy, HOME_SECTOR_ID};
use spaceaces_logic::generation::{self, GenerationStats};
use spaceaces_logic::rolls::{RollContext, RollId, RollLog};
use spaceaces_logic::sector::{Sector, SectorId, Timestamp};

use crate::journal::{EntryKind, Journal};
use crate::persistence::{self, SaveData, SaveError, SaveFormat};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

/// One player's campaign: galaxy map, roll history, journal and dice.
pub struct Campaign {
    /// Sector map and current position
    pub galaxy: Galaxy,
    /// Recent rolls, newest first
    pub rolls: RollLog,
    /// Session journal
    pub journal: Journal,
    /// Session new journal entries and rolls are filed under
    pub session_id: Option<String>,

    config: CampaignConfig,
    dice: DiceEngine,
}

impl Campaign {
    /// Create an empty campaign. Dice are seeded from `config.seed` when
    /// set, otherwise drawn from the best available random source.
    pub fn new(config: CampaignConfig) -> Result<Self, ConfigError> {
        let dice = match config.seed {
            Some(seed) => DiceEngine::seeded(seed),
            None => DiceEngine::detect(),
        };
        Self::with_dice(config, dice)
    }

    /// Create an empty campaign around an existing dice engine.
    pub fn with_dice(config: CampaignConfig, dice: DiceEngine) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("Campaign created, dice: {}", dice.describe_source());
        Ok(Self {
            galaxy: Galaxy::new(),
            rolls: RollLog::with_capacity(config.rolls.capacity),
            journal: Journal::new(),
            session_id: None,
            config,
            dice,
        })
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    pub fn randomness_source(&self) -> RandomSourceKind {
        self.dice.randomness_source()
    }

    pub fn describe_randomness(&self) -> &'static str {
        self.dice.describe_source()
    }

    // ── Galaxy ──────────────────────────────────────────────────────────

    /// Replace the map with a freshly generated galaxy.
    pub fn initialize_galaxy(&mut self, now: Timestamp) -> GenerationStats {
        let (galaxy, stats) = generation::generate_galaxy_from(
            spaceaces_logic::catalog::SECTOR_TEMPLATES,
            &self.config.galaxy,
            self.dice.source_mut(),
            now,
        );
        self.galaxy = galaxy;
        stats
    }

    pub fn current_sector(&self) -> Option<&Sector> {
        self.galaxy.current()
    }

    /// Move to a sector, revealing it and its neighbors, and note the trip
    /// in the journal. Unknown ids do nothing.
    pub fn travel_to(&mut self, id: &str, now: Timestamp) -> Vec<SectorId> {
        let Some(name) = self.galaxy.get(id).map(|s| s.name.clone()) else {
            log::debug!("travel_to: unknown sector {}", id);
            return Vec::new();
        };
        let revealed = self.galaxy.move_to(id, now);

        if self.config.journal_travel {
            let summary = if revealed.len() > 1 {
                format!("Travelled to {} ({} sectors revealed)", name, revealed.len())
            } else {
                format!("Travelled to {}", name)
            };
            let mut entities = vec![id.to_string()];
            entities.extend(revealed.iter().filter(|r| r.as_str() != id).cloned());
            self.journal
                .record(EntryKind::Travel, summary, entities, self.session_id.clone(), None, now);
        }
        revealed
    }

    /// Delete a sector. The home sector is kept.
    pub fn delete_sector(&mut self, id: &str) -> Option<Sector> {
        if id == HOME_SECTOR_ID {
            log::warn!("Refusing to delete the home sector");
            return None;
        }
        self.galaxy.delete_sector(id)
    }

    // ── Dice ────────────────────────────────────────────────────────────

    /// Roll, record in the history, and (if enabled) journal the result.
    pub fn roll(
        &mut self,
        die: DieType,
        mode: RollMode,
        modifiers: &[i32],
        mut context: RollContext,
        now: Timestamp,
    ) -> (RollId, RollOutcome) {
        let outcome = self.dice.perform_roll(die, mode, modifiers);
        if context.session_id.is_none() {
            context.session_id = self.session_id.clone();
        }
        let note = context.note.clone();
        let id = self.rolls.add_roll(&outcome, context, now);

        if self.config.journal_rolls {
            self.journal.record(
                EntryKind::Roll,
                outcome.summary(true),
                vec![id.clone()],
                self.session_id.clone(),
                note,
                now,
            );
        }
        (id, outcome)
    }

    /// Validate untyped parameters, then roll. Nothing is rolled or
    /// recorded when validation fails.
    pub fn roll_from_params(
        &mut self,
        die: &str,
        mode: &str,
        modifiers: &serde_json::Value,
        context: RollContext,
        now: Timestamp,
    ) -> Result<(RollId, RollOutcome), RollParamError> {
        let request = dice::validate_roll_params(die, mode, modifiers)?;
        Ok(self.roll(request.die_type, request.mode, &request.modifiers, context, now))
    }

    pub fn success_probability(
        &self,
        target: i32,
        die: DieType,
        mode: RollMode,
        modifiers: &[i32],
    ) -> f64 {
        dice::success_probability(target, die, mode, modifiers)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SaveData {
        SaveData::new(
            self.config.clone(),
            self.galaxy.clone(),
            self.rolls.clone(),
            self.journal.clone(),
            self.session_id.clone(),
        )
    }

    /// Save the complete campaign to a writer
    pub fn save<W: Write>(&self, writer: W, format: SaveFormat) -> Result<(), SaveError> {
        persistence::save_campaign(writer, &self.snapshot(), format)
    }

    /// Replace campaign state from a reader. The dice engine is kept.
    pub fn load<R: Read>(&mut self, reader: R, format: SaveFormat) -> Result<(), SaveError> {
        let data = persistence::load_campaign(reader, format)?;
        self.config = data.config;
        self.galaxy = data.galaxy;
        self.rolls = data.rolls;
        self.rolls.set_capacity(self.config.rolls.capacity);
        self.journal = data.journal;
        self.session_id = data.session_id;
        log::info!(
            "Loaded campaign: {} sectors, {} rolls, {} journal entries",
            self.galaxy.len(),
            self.rolls.len(),
            self.journal.len()
        );
        Ok(())
    }
}
