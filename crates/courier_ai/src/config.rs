//! # NPC Archetype Config
//!
//! Static tuning per NPC archetype, shared read-only by every NPC of that
//! archetype. Loaded from a TOML file with one `[[npc]]` table per archetype:
//!
//! ```toml
//! [[npc]]
//! name = "wolf"
//! base_vision_distance = 25.0
//! ai_state_types = ["attack", "chase", "investigate", "idle"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiResult};

/// Behaviour state kinds, declared in priority order (highest first).
///
/// The derived `Ord` is the priority: sorting ascending puts the state that
/// should win first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStateType {
    /// Strike a target in range once the cooldown expires.
    Attack,
    /// Ranged beam at a target in line of sight.
    Beam,
    /// Close in on a distant target.
    Chase,
    /// Walk to a remembered noise.
    Investigate,
    /// Face a target in range while the cooldown runs.
    CombatIdle,
    /// Stay near the owner (summons only).
    Follow,
    /// Nothing to do.
    Idle,
}

impl std::fmt::Display for AiStateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Attack => "Attack",
            Self::Beam => "Beam",
            Self::Chase => "Chase",
            Self::Investigate => "Investigate",
            Self::CombatIdle => "CombatIdle",
            Self::Follow => "Follow",
            Self::Idle => "Idle",
        };
        f.write_str(name)
    }
}

/// Ranged beam tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Maximum beam distance.
    pub range: f32,
    /// Seconds between beams.
    pub cooldown: f32,
}

/// Per-archetype tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Archetype name.
    pub name: String,
    /// Sight radius.
    pub base_vision_distance: f32,
    /// Field-of-view half-angle, degrees.
    pub max_fov: f32,
    /// Seconds an unseen target is remembered.
    pub alerted_memory: f32,
    /// Quietest perceived volume that alerts, in dB.
    pub noise_floor: f32,
    /// Distance at which a source's volume is measured.
    pub reference_distance: f32,
    /// Combat states engage inside this distance.
    pub engagement_distance: f32,
    /// Strike distance.
    pub attack_range: f32,
    /// Mean seconds between attacks.
    pub attack_cooldown: f32,
    /// Navigation speed.
    pub movement_speed: f32,
    /// Navigation turn rate, degrees per second.
    pub angular_speed: f32,
    /// Navigation stopping distance.
    pub stopping_distance: f32,
    /// Summons follow once farther than this from the owner.
    pub follow_radius: f32,
    /// Physics layers scanned for targets.
    pub layer_mask: u32,
    /// Tag carried by the player entity.
    pub player_tag: String,
    /// Tags that start with threat 1 when first seen.
    pub enemy_types: Vec<String>,
    /// Enabled states, priority ordered after validation.
    pub ai_state_types: Vec<AiStateType>,
    /// Beam tuning, required by the `beam` state.
    pub beam: Option<BeamConfig>,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_vision_distance: 20.0,
            max_fov: 60.0,
            alerted_memory: 10.0,
            noise_floor: 20.0,
            reference_distance: 1.0,
            engagement_distance: 3.0,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            movement_speed: 3.5,
            angular_speed: 120.0,
            stopping_distance: 0.5,
            follow_radius: 5.0,
            layer_mask: u32::MAX,
            player_tag: "Player".to_string(),
            enemy_types: vec!["Player".to_string()],
            ai_state_types: vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle],
            beam: None,
        }
    }
}

impl NpcConfig {
    /// Validates ranges and puts the state list into priority order.
    ///
    /// # Errors
    ///
    /// - `NoStatesConfigured` for an empty state list
    /// - `InvalidConfig` for out-of-range tuning, or `beam` enabled without settings
    pub fn validate(&mut self) -> AiResult<()> {
        if self.ai_state_types.is_empty() {
            return Err(AiError::NoStatesConfigured(self.name.clone()));
        }
        self.ai_state_types.sort_unstable();
        self.ai_state_types.dedup();

        let non_negative = [
            ("base_vision_distance", self.base_vision_distance),
            ("alerted_memory", self.alerted_memory),
            ("engagement_distance", self.engagement_distance),
            ("attack_range", self.attack_range),
            ("attack_cooldown", self.attack_cooldown),
            ("movement_speed", self.movement_speed),
            ("follow_radius", self.follow_radius),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(AiError::InvalidConfig(format!("{}: {field} must be non-negative", self.name)));
            }
        }
        if !(0.0..=180.0).contains(&self.max_fov) {
            return Err(AiError::InvalidConfig(format!("{}: max_fov must be in [0, 180]", self.name)));
        }
        if self.reference_distance.is_nan() || self.reference_distance <= 0.0 {
            return Err(AiError::InvalidConfig(format!("{}: reference_distance must be positive", self.name)));
        }
        if self.ai_state_types.contains(&AiStateType::Beam) && self.beam.is_none() {
            return Err(AiError::InvalidConfig(format!("{}: beam state enabled without [npc.beam]", self.name)));
        }

        if !self.ai_state_types.contains(&AiStateType::Idle) {
            tracing::warn!("Archetype '{}' has no idle fallback state", self.name);
        }
        Ok(())
    }

    /// Whether a state kind is enabled.
    #[must_use]
    pub fn has_state(&self, state: AiStateType) -> bool {
        self.ai_state_types.contains(&state)
    }
}

/// A set of archetypes, as loaded from one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcArchetypes {
    /// Archetypes in file order.
    #[serde(default)]
    pub npc: Vec<NpcConfig>,
}

impl NpcArchetypes {
    /// Parses and validates every archetype.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML, otherwise the first validation error.
    pub fn from_toml_str(content: &str) -> AiResult<Self> {
        let mut archetypes: Self = toml::from_str(content)?;
        for npc in &mut archetypes.npc {
            npc.validate()?;
        }
        Ok(archetypes)
    }

    /// Reads, parses and validates an archetype file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> AiResult<Self> {
        let path = path.as_ref();
        let archetypes = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        tracing::info!("Loaded {} NPC archetypes from {}", archetypes.npc.len(), path.display());
        Ok(archetypes)
    }

    /// Archetype by name.
    ///
    /// # Errors
    ///
    /// `UnknownArchetype` if no archetype has that name.
    pub fn get(&self, name: &str) -> AiResult<&NpcConfig> {
        self.npc
            .iter()
            .find(|npc| npc.name == name)
            .ok_or_else(|| AiError::UnknownArchetype(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut states = vec![
            AiStateType::Idle,
            AiStateType::Follow,
            AiStateType::CombatIdle,
            AiStateType::Investigate,
            AiStateType::Chase,
            AiStateType::Beam,
            AiStateType::Attack,
        ];
        states.sort();
        assert_eq!(states.first(), Some(&AiStateType::Attack));
        assert_eq!(states.last(), Some(&AiStateType::Idle));
        assert!(AiStateType::Beam < AiStateType::Chase);
        assert!(AiStateType::Investigate < AiStateType::CombatIdle);
    }

    #[test]
    fn test_validate_sorts_and_dedups() {
        let mut config = NpcConfig {
            ai_state_types: vec![AiStateType::Idle, AiStateType::Chase, AiStateType::Attack, AiStateType::Chase],
            ..NpcConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.ai_state_types, vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Idle]);
    }

    #[test]
    fn test_empty_states_rejected() {
        let mut config = NpcConfig { name: "statue".into(), ai_state_types: Vec::new(), ..NpcConfig::default() };
        assert!(matches!(config.validate(), Err(AiError::NoStatesConfigured(name)) if name == "statue"));
    }

    #[test]
    fn test_beam_requires_settings() {
        let mut config = NpcConfig { ai_state_types: vec![AiStateType::Beam], ..NpcConfig::default() };
        assert!(matches!(config.validate(), Err(AiError::InvalidConfig(_))));
        config.beam = Some(BeamConfig { range: 15.0, cooldown: 4.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_archetypes_from_toml() {
        let archetypes = NpcArchetypes::from_toml_str(
            r#"
            [[npc]]
            name = "wolf"
            base_vision_distance = 25.0
            ai_state_types = ["idle", "chase", "attack", "investigate"]

            [[npc]]
            name = "warden"
            ai_state_types = ["beam", "idle"]
            beam = { range = 18.0, cooldown = 3.0 }
            "#,
        )
        .unwrap();

        let wolf = archetypes.get("wolf").unwrap();
        assert_eq!(wolf.base_vision_distance, 25.0);
        assert_eq!(wolf.attack_range, NpcConfig::default().attack_range);
        assert_eq!(
            wolf.ai_state_types,
            vec![AiStateType::Attack, AiStateType::Chase, AiStateType::Investigate, AiStateType::Idle]
        );
        assert!(archetypes.get("warden").unwrap().has_state(AiStateType::Beam));
        assert!(matches!(archetypes.get("dragon"), Err(AiError::UnknownArchetype(_))));
    }

    #[test]
    fn test_unknown_state_is_parse_error() {
        let result = NpcArchetypes::from_toml_str("[[npc]]\nai_state_types = [\"dance\"]");
        assert!(matches!(result, Err(AiError::ConfigParse(_))));
    }
}
