//! Fixed configuration presets with a single active selection.

use crate::error::{ArkaError, Result};
use crate::storage::{keys, Storage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Identifiers of the built-in profiles, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    Balanced,
    Performance,
    Gaming,
    PowerSaver,
    Silent,
}

impl ProfileId {
    pub const ALL: [ProfileId; 5] = [
        ProfileId::Balanced,
        ProfileId::Performance,
        ProfileId::Gaming,
        ProfileId::PowerSaver,
        ProfileId::Silent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileId::Balanced => "balanced",
            ProfileId::Performance => "performance",
            ProfileId::Gaming => "gaming",
            ProfileId::PowerSaver => "power_saver",
            ProfileId::Silent => "silent",
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileId {
    type Err = ArkaError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ArkaError::unknown_profile(s))
    }
}

/// A named bundle of settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub settings: BTreeMap<String, String>,
    pub active: bool,
}

fn profile(id: ProfileId, name: &str, icon: &str, description: &str, settings: &[(&str, &str)]) -> Profile {
    Profile {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        settings: settings
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        active: false,
    }
}

lazy_static::lazy_static! {
    static ref BUILTIN_PROFILES: Vec<Profile> = vec![
        profile(
            ProfileId::Balanced,
            "Balanced",
            "⚖️",
            "Default trade-off between speed and power draw",
            &[("power_plan", "balanced"), ("visual_effects", "default"), ("background_apps", "allowed")],
        ),
        profile(
            ProfileId::Performance,
            "Performance",
            "🚀",
            "Maximum clocks, minimal throttling",
            &[("power_plan", "high_performance"), ("visual_effects", "minimal"), ("cpu_boost", "aggressive")],
        ),
        profile(
            ProfileId::Gaming,
            "Gaming",
            "🎮",
            "Prioritises the foreground game and mutes notifications",
            &[("power_plan", "high_performance"), ("notifications", "muted"), ("background_apps", "limited")],
        ),
        profile(
            ProfileId::PowerSaver,
            "Power Saver",
            "🔋",
            "Stretches battery life by capping performance",
            &[("power_plan", "power_saver"), ("cpu_max_state", "70"), ("background_apps", "suspended")],
        ),
        profile(
            ProfileId::Silent,
            "Silent",
            "🤫",
            "Keeps fans quiet at the cost of sustained load",
            &[("power_plan", "balanced"), ("fan_curve", "quiet"), ("cpu_boost", "disabled")],
        ),
    ];
}

/// The registry of built-in profiles.
#[derive(Debug)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
    storage: Storage,
}

impl ProfileRegistry {
    /// Build the registry and restore the previously active profile.
    pub fn load(storage: Storage) -> Self {
        let mut registry = Self {
            profiles: BUILTIN_PROFILES.clone(),
            storage,
        };
        let saved = registry
            .storage
            .get::<String>(keys::ACTIVE_PROFILE)
            .and_then(|id| id.parse::<ProfileId>().ok())
            .unwrap_or(ProfileId::Balanced);
        registry.set_active(saved);
        registry
    }

    /// All profiles in registration order.
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    /// The currently active profile.
    pub fn active(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.active)
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Make `profile_id` the only active profile. Unknown ids change nothing
    /// and return `false`.
    pub fn activate(&mut self, profile_id: &str) -> bool {
        let id = match profile_id.parse::<ProfileId>() {
            Ok(id) => id,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };

        self.set_active(id);
        if !self.storage.set(keys::ACTIVE_PROFILE, id.as_str(), None) {
            warn!("Active profile not persisted");
        }
        debug_assert_eq!(self.profiles.iter().filter(|p| p.active).count(), 1);
        info!("Activated profile {}", id);
        true
    }

    fn set_active(&mut self, id: ProfileId) {
        for profile in &mut self.profiles {
            profile.active = false;
        }
        for profile in &mut self.profiles {
            if profile.id == id {
                profile.active = true;
            }
        }
    }
}
