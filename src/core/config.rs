//=========================================================================
// Session Configuration
//=========================================================================
//
// Declarative zone layout loaded once at session start.
//
// Architecture:
//   JSON ──serde──> SessionConfig ──validate()──> Ok(warnings) | Err(ConfigError)
//                                                    │
//                                                    └─ Session::new builds systems
//
// Structural problems (duplicate ids, dangling references) are errors and
// refuse to build a session. Missing optional references are warnings:
// the affected step is skipped at runtime and the zone still progresses.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::zones::{BarrierId, Pose, RideKind, ZoneId};

/// Bundled five-zone carnival layout.
pub const CARNIVAL_LAYOUT_JSON: &str = include_str!("../../assets/carnival_layout.json");

//=== Errors ==============================================================

/// Configuration problems that prevent a session from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse zone layout: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zone layout declares no zones")]
    NoZones,
    #[error("zone numbers start at 1, found zone 0")]
    ZeroZoneId,
    #[error("{0} is declared more than once")]
    DuplicateZone(ZoneId),
    #[error("{0} is declared more than once")]
    DuplicateBarrier(BarrierId),
    #[error("initially unlocked {0} is not declared")]
    UnknownInitialZone(ZoneId),
    #[error("briefing cue {cue} unlocks undeclared {zone}")]
    UnknownCueZone { cue: usize, zone: ZoneId },
    #[error("{field} in {owner} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration {
        owner: String,
        field: &'static str,
        value: f32,
    },
}

/// Degradations detected at startup. The session still runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    #[error("{zone} has no rides; ride shutdown is skipped")]
    NoRides { zone: ZoneId },
    #[error("{zone} has no enemy prefab; its encounter is cleared immediately")]
    NoEnemyPrefab { zone: ZoneId },
    #[error("{zone} has no spawn points; its encounter is cleared immediately")]
    NoSpawnPoints { zone: ZoneId },
    #[error("{zone} requests {requested} enemies but has {available} spawn points")]
    SpawnCountClamped {
        zone: ZoneId,
        requested: usize,
        available: usize,
    },
    #[error("{zone} mechanism requires 0 progress; using 1")]
    ZeroThreshold { zone: ZoneId },
    #[error("{zone} has no barrier")]
    NoBarrier { zone: ZoneId },
}

//=== Layout Types ========================================================

fn default_first_zone() -> Option<ZoneId> {
    Some(ZoneId(1))
}

fn default_settle_delay() -> f32 {
    1.0
}

fn default_stagger() -> f32 {
    0.5
}

fn default_dissolve_delay() -> f32 {
    0.5
}

fn default_dissolve() -> f32 {
    1.0
}

fn default_fade() -> f32 {
    1.5
}

fn default_volume() -> f32 {
    0.5
}

fn default_cooldown() -> f32 {
    5.0
}

fn default_crank_threshold() -> f32 {
    30.0
}

/// Complete layout for one play session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_first_zone")]
    pub initially_unlocked: Option<ZoneId>,
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub briefing: Option<BriefingConfig>,
}

/// One zone: mechanism, rides, encounter and the barriers gating it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneConfig {
    pub zone: ZoneId,
    pub mechanism: MechanismConfig,
    #[serde(default)]
    pub rides: Vec<RideConfig>,
    #[serde(default)]
    pub encounter: EncounterConfig,
    #[serde(default)]
    pub barriers: Vec<BarrierConfig>,
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: f32,
}

/// The control object a zone's shutdown is driven by.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MechanismConfig {
    /// Generator lever: one unit per push.
    PushLever {
        required_pushes: u32,
        #[serde(default)]
        debounce_secs: f32,
        #[serde(default)]
        sounds: MechanismSounds,
    },
    /// Hand crank: one unit per full turn while grabbed.
    HandCrank {
        rotations_needed: u32,
        #[serde(default = "default_crank_threshold")]
        rotation_threshold_degrees: f32,
        #[serde(default)]
        sounds: MechanismSounds,
    },
    /// Socketed lever, gear or crank that runs on its own once seated.
    Socket {
        auto_run_secs: f32,
        #[serde(default)]
        sounds: MechanismSounds,
    },
}

impl MechanismConfig {
    /// Units the shutdown sequencer needs before completing.
    pub fn required_units(&self) -> u32 {
        match self {
            Self::PushLever {
                required_pushes, ..
            } => *required_pushes,
            Self::HandCrank {
                rotations_needed, ..
            } => *rotations_needed,
            Self::Socket { .. } => 1,
        }
    }

    pub fn sounds(&self) -> &MechanismSounds {
        match self {
            Self::PushLever { sounds, .. }
            | Self::HandCrank { sounds, .. }
            | Self::Socket { sounds, .. } => sounds,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MechanismSounds {
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub complete: Option<String>,
    /// Played once when the zone's rides are shut down.
    #[serde(default)]
    pub rides_stopped: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RideConfig {
    pub name: String,
    pub kind: RideKind,
    #[serde(default)]
    pub audio: Option<RideAudioConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RideAudioConfig {
    pub source: String,
    pub clip: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_fade")]
    pub fade_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EncounterConfig {
    #[serde(default)]
    pub prefab: Option<String>,
    #[serde(default)]
    pub spawn_points: Vec<Pose>,
    /// Enemies requested; `None` means one per spawn point.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default = "default_stagger")]
    pub stagger_secs: f32,
    #[serde(default)]
    pub spawn_sound: Option<String>,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            prefab: None,
            spawn_points: Vec::new(),
            count: None,
            stagger_secs: default_stagger(),
            spawn_sound: None,
        }
    }
}

impl EncounterConfig {
    /// Enemies that will actually be spawned: bounded by spawn points and
    /// zero without a prefab.
    pub fn effective_count(&self) -> usize {
        if self.prefab.is_none() {
            return 0;
        }
        let requested = self.count.unwrap_or(self.spawn_points.len());
        requested.min(self.spawn_points.len())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BarrierConfig {
    pub id: BarrierId,
    #[serde(default)]
    pub pose: Option<Pose>,
    #[serde(default = "default_dissolve_delay")]
    pub dissolve_delay_secs: f32,
    #[serde(default = "default_dissolve")]
    pub dissolve_secs: f32,
    #[serde(default)]
    pub blocked_sound: Option<String>,
    #[serde(default)]
    pub down_sound: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BriefingConfig {
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: f32,
    pub cues: Vec<BriefingCueConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BriefingCueConfig {
    pub clip: String,
    pub duration_secs: f32,
    #[serde(default)]
    pub unlocks: Option<ZoneId>,
}

//=== Loading & Validation ================================================

impl SessionConfig {
    /// Parses a layout from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The bundled carnival layout.
    pub fn carnival() -> Result<Self, ConfigError> {
        Self::from_json_str(CARNIVAL_LAYOUT_JSON)
    }

    /// Highest declared zone number.
    pub fn zone_count(&self) -> u8 {
        self.zones.iter().map(|z| z.zone.0).max().unwrap_or(0)
    }

    /// Checks the layout. Structural problems are returned as errors;
    /// degradations are logged and returned as warnings.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }

        let mut zones = HashSet::new();
        let mut barriers = HashSet::new();
        let mut warnings = Vec::new();

        for zone in &self.zones {
            if zone.zone.0 == 0 {
                return Err(ConfigError::ZeroZoneId);
            }
            if !zones.insert(zone.zone) {
                return Err(ConfigError::DuplicateZone(zone.zone));
            }
            check_duration(&zone.zone.to_string(), "settle_delay_secs", zone.settle_delay_secs)?;
            check_duration(&zone.zone.to_string(), "stagger_secs", zone.encounter.stagger_secs)?;

            match &zone.mechanism {
                MechanismConfig::PushLever { debounce_secs, .. } => {
                    check_duration(&zone.zone.to_string(), "debounce_secs", *debounce_secs)?
                }
                MechanismConfig::Socket { auto_run_secs, .. } => {
                    check_duration(&zone.zone.to_string(), "auto_run_secs", *auto_run_secs)?
                }
                MechanismConfig::HandCrank { .. } => {}
            }
            if zone.mechanism.required_units() == 0 {
                warnings.push(ConfigWarning::ZeroThreshold { zone: zone.zone });
            }

            for ride in &zone.rides {
                if let Some(audio) = &ride.audio {
                    check_duration(&ride.name, "fade_secs", audio.fade_secs)?;
                }
            }
            if zone.rides.is_empty() {
                warnings.push(ConfigWarning::NoRides { zone: zone.zone });
            }

            let encounter = &zone.encounter;
            if encounter.prefab.is_none() {
                warnings.push(ConfigWarning::NoEnemyPrefab { zone: zone.zone });
            } else if encounter.spawn_points.is_empty() {
                warnings.push(ConfigWarning::NoSpawnPoints { zone: zone.zone });
            } else if let Some(requested) = encounter.count {
                if requested > encounter.spawn_points.len() {
                    warnings.push(ConfigWarning::SpawnCountClamped {
                        zone: zone.zone,
                        requested,
                        available: encounter.spawn_points.len(),
                    });
                }
            }

            if zone.barriers.is_empty() {
                warnings.push(ConfigWarning::NoBarrier { zone: zone.zone });
            }
            for barrier in &zone.barriers {
                if !barriers.insert(barrier.id) {
                    return Err(ConfigError::DuplicateBarrier(barrier.id));
                }
                let owner = barrier.id.to_string();
                check_duration(&owner, "dissolve_delay_secs", barrier.dissolve_delay_secs)?;
                check_duration(&owner, "dissolve_secs", barrier.dissolve_secs)?;
            }
        }

        if let Some(first) = self.initially_unlocked {
            if !zones.contains(&first) {
                return Err(ConfigError::UnknownInitialZone(first));
            }
        }

        if let Some(briefing) = &self.briefing {
            check_duration("briefing", "cooldown_secs", briefing.cooldown_secs)?;
            for (cue, config) in briefing.cues.iter().enumerate() {
                check_duration(&config.clip, "duration_secs", config.duration_secs)?;
                if let Some(zone) = config.unlocks {
                    if !zones.contains(&zone) {
                        return Err(ConfigError::UnknownCueZone { cue, zone });
                    }
                }
            }
        }

        for warning in &warnings {
            warn!("Layout: {}", warning);
        }

        Ok(warnings)
    }
}

fn check_duration(owner: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration {
            owner: owner.to_string(),
            field,
            value,
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(zone_json: &str) -> String {
        format!(r#"{{ "zones": [ {} ] }}"#, zone_json)
    }

    const LEVER_ZONE: &str = r#"{
        "zone": 1,
        "mechanism": { "kind": "push_lever", "required_pushes": 3 },
        "rides": [ { "name": "carousel", "kind": "carousel" } ],
        "encounter": {
            "prefab": "clown",
            "spawn_points": [ { "position": [0.0, 0.0, 0.0] } ]
        },
        "barriers": [ { "id": 10 } ]
    }"#;

    //--- Parsing ----------------------------------------------------------

    #[test]
    fn parses_defaults() {
        let config = SessionConfig::from_json_str(&minimal(LEVER_ZONE)).expect("parse");
        assert_eq!(config.initially_unlocked, Some(ZoneId(1)));
        let zone = &config.zones[0];
        assert_eq!(zone.settle_delay_secs, 1.0);
        assert_eq!(zone.encounter.stagger_secs, 0.5);
        assert_eq!(zone.barriers[0].dissolve_delay_secs, 0.5);
        assert_eq!(zone.barriers[0].dissolve_secs, 1.0);
        assert_eq!(zone.mechanism.required_units(), 3);
        assert!(config.briefing.is_none());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = SessionConfig::from_json_str("{ \"zones\": 7 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bundled_layout_is_valid() {
        let config = SessionConfig::carnival().expect("bundled layout parses");
        assert_eq!(config.zone_count(), 5);
        let warnings = config.validate().expect("bundled layout validates");
        assert_eq!(warnings, vec![ConfigWarning::NoRides { zone: ZoneId(5) }]);
    }

    //--- Structural Errors ------------------------------------------------

    #[test]
    fn empty_layout_is_rejected() {
        let config = SessionConfig::from_json_str(r#"{ "zones": [] }"#).expect("parse");
        assert!(matches!(config.validate(), Err(ConfigError::NoZones)));
    }

    #[test]
    fn duplicate_zone_is_rejected() {
        let json = format!(r#"{{ "zones": [ {0}, {0} ] }}"#, LEVER_ZONE);
        let config = SessionConfig::from_json_str(&json).expect("parse");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateZone(ZoneId(1)))
        ));
    }

    #[test]
    fn zone_zero_is_rejected() {
        let json = minimal(&LEVER_ZONE.replace("\"zone\": 1", "\"zone\": 0"));
        let config = SessionConfig::from_json_str(&json).expect("parse");
        assert!(matches!(config.validate(), Err(ConfigError::ZeroZoneId)));
    }

    #[test]
    fn dangling_initial_zone_is_rejected() {
        let mut config = SessionConfig::from_json_str(&minimal(LEVER_ZONE)).expect("parse");
        config.initially_unlocked = Some(ZoneId(4));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownInitialZone(ZoneId(4)))
        ));
    }

    #[test]
    fn cue_for_unknown_zone_is_rejected() {
        let mut config = SessionConfig::from_json_str(&minimal(LEVER_ZONE)).expect("parse");
        config.briefing = Some(BriefingConfig {
            cooldown_secs: 1.0,
            cues: vec![BriefingCueConfig {
                clip: "briggs_2".into(),
                duration_secs: 2.0,
                unlocks: Some(ZoneId(2)),
            }],
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownCueZone { cue: 0, zone: ZoneId(2) })
        ));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut config = SessionConfig::from_json_str(&minimal(LEVER_ZONE)).expect("parse");
        config.zones[0].settle_delay_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                field: "settle_delay_secs",
                ..
            })
        ));
    }

    //--- Degradations -----------------------------------------------------

    #[test]
    fn missing_references_degrade_to_warnings() {
        let json = minimal(
            r#"{ "zone": 1, "mechanism": { "kind": "push_lever", "required_pushes": 0 } }"#,
        );
        let config = SessionConfig::from_json_str(&json).expect("parse");
        let warnings = config.validate().expect("still valid");
        let zone = ZoneId(1);
        assert!(warnings.contains(&ConfigWarning::ZeroThreshold { zone }));
        assert!(warnings.contains(&ConfigWarning::NoRides { zone }));
        assert!(warnings.contains(&ConfigWarning::NoEnemyPrefab { zone }));
        assert!(warnings.contains(&ConfigWarning::NoBarrier { zone }));
    }

    #[test]
    fn spawn_count_is_bounded_by_points() {
        let mut config = SessionConfig::from_json_str(&minimal(LEVER_ZONE)).expect("parse");
        config.zones[0].encounter.count = Some(4);
        assert_eq!(config.zones[0].encounter.effective_count(), 1);
        let warnings = config.validate().expect("valid");
        assert_eq!(
            warnings,
            vec![ConfigWarning::SpawnCountClamped {
                zone: ZoneId(1),
                requested: 4,
                available: 1,
            }]
        );
    }
}
