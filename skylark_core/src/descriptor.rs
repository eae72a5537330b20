// skylark_core/src/descriptor.rs

use serde::{Deserialize, Serialize};

use crate::errors::SpawnError;

/// Who occupies a spawned vehicle. A marker without a driver entry spawns
/// an empty vehicle; that is the common case, not a degraded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    /// The occupant is granted input control of the vehicle.
    Player,
    /// The occupant may be handed a path-following behavior.
    Ai,
}

impl DriverMode {
    /// Parses the marker's raw `driver` string. Returns `None` for
    /// anything outside the closed set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "player" => Some(Self::Player),
            "ai" => Some(Self::Ai),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Ai => "ai",
        }
    }
}

/// The validated, immutable intent of one vehicle spawn marker.
///
/// Built exactly once from the marker's raw metadata fields; the spawn
/// pipeline reads it for the rest of the spawn point's life and never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnDescriptor {
    entity_type: String,
    driver: Option<DriverMode>,
    behavior_anchor: Option<String>,
    owner_id: Option<String>,
}

impl SpawnDescriptor {
    /// Validates the raw marker fields.
    ///
    /// The type tag is the only required field; everything else defaults
    /// to "empty vehicle" semantics. A `driver` string outside the known
    /// set is rejected here rather than carried along as dead weight.
    pub fn new(
        entity_type: Option<String>,
        driver: Option<String>,
        behavior_anchor: Option<String>,
        owner_id: Option<String>,
    ) -> Result<Self, SpawnError> {
        let entity_type = match entity_type {
            Some(tag) if !tag.is_empty() => tag,
            _ => {
                return Err(SpawnError::MalformedDescriptor(
                    "missing required `type` field".to_string(),
                ))
            }
        };

        let driver = match driver {
            None => None,
            Some(raw) => match DriverMode::parse(&raw) {
                Some(mode) => Some(mode),
                None => {
                    return Err(SpawnError::MalformedDescriptor(format!(
                        "unrecognized `driver` value `{raw}`"
                    )))
                }
            },
        };

        Ok(Self {
            entity_type,
            driver,
            behavior_anchor,
            owner_id,
        })
    }

    /// The vehicle type tag the factory dispatches on.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn driver(&self) -> Option<DriverMode> {
        self.driver
    }

    /// Name of the path node an AI occupant should start following.
    /// Only meaningful when `driver` is `Ai`.
    pub fn behavior_anchor(&self) -> Option<&str> {
        self.behavior_anchor.as_deref()
    }

    /// Network/player identity to attach to the spawned vehicle.
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    /// True when the marker asked for an occupant of any kind, i.e. the
    /// assembly sequence needs a second model load.
    pub fn wants_occupant(&self) -> bool {
        self.driver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_is_required() {
        let err = SpawnDescriptor::new(None, None, None, None).unwrap_err();
        assert!(matches!(err, SpawnError::MalformedDescriptor(_)));
    }

    #[test]
    fn empty_type_tag_is_rejected() {
        let err = SpawnDescriptor::new(Some(String::new()), None, None, None).unwrap_err();
        assert!(matches!(err, SpawnError::MalformedDescriptor(_)));
    }

    #[test]
    fn unknown_driver_string_is_rejected() {
        let err = SpawnDescriptor::new(
            Some("car".to_string()),
            Some("ghost".to_string()),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SpawnError::MalformedDescriptor(_)));
    }

    #[test]
    fn minimal_marker_defaults_to_no_occupant() {
        let descriptor = SpawnDescriptor::new(Some("heli".to_string()), None, None, None).unwrap();
        assert_eq!(descriptor.entity_type(), "heli");
        assert_eq!(descriptor.driver(), None);
        assert_eq!(descriptor.behavior_anchor(), None);
        assert_eq!(descriptor.owner_id(), None);
        assert!(!descriptor.wants_occupant());
    }

    #[test]
    fn full_marker_round_trips() {
        let descriptor = SpawnDescriptor::new(
            Some("car".to_string()),
            Some("ai".to_string()),
            Some("N3".to_string()),
            Some("player-1".to_string()),
        )
        .unwrap();
        assert_eq!(descriptor.driver(), Some(DriverMode::Ai));
        assert_eq!(descriptor.behavior_anchor(), Some("N3"));
        assert_eq!(descriptor.owner_id(), Some("player-1"));
        assert!(descriptor.wants_occupant());
    }

    #[test]
    fn player_driver_parses() {
        let descriptor = SpawnDescriptor::new(
            Some("airplane".to_string()),
            Some("player".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(descriptor.driver(), Some(DriverMode::Player));
    }
}
