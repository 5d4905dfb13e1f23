use serde::{Deserialize, Serialize};

use super::bands::{Band, WaveLevel};

/// Built-in profile set. The backend refuses to delete it and so does the client.
pub const DEFAULT_PROFILE_SET_ID: &str = "meditasyon";

pub fn is_protected(profile_set_id: &str) -> bool {
    profile_set_id == DEFAULT_PROFILE_SET_ID
}

/// Identifier for a profile set created from a display name: lower-cased,
/// each run of whitespace collapsed to a single underscore.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// One behavioural profile: a level per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub id: String,
    pub display_name: String,
    pub delta_level: WaveLevel,
    pub theta_level: WaveLevel,
    pub alpha_level: WaveLevel,
    pub beta_level: WaveLevel,
    pub gamma_level: WaveLevel,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProfileDefinition {
    /// Blank profile with every band at the middle level.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            delta_level: WaveLevel::Mid,
            theta_level: WaveLevel::Mid,
            alpha_level: WaveLevel::Mid,
            beta_level: WaveLevel::Mid,
            gamma_level: WaveLevel::Mid,
            notes: None,
        }
    }

    pub fn level(&self, band: Band) -> WaveLevel {
        match band {
            Band::Delta => self.delta_level,
            Band::Theta => self.theta_level,
            Band::Alpha => self.alpha_level,
            Band::Beta => self.beta_level,
            Band::Gamma => self.gamma_level,
        }
    }

    pub fn set_level(&mut self, band: Band, level: WaveLevel) {
        match band {
            Band::Delta => self.delta_level = level,
            Band::Theta => self.theta_level = level,
            Band::Alpha => self.alpha_level = level,
            Band::Beta => self.beta_level = level,
            Band::Gamma => self.gamma_level = level,
        }
    }
}

/// A named, ordered collection of profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub profiles: Vec<ProfileDefinition>,
}

impl ProfileSet {
    /// Empty set whose id is derived from `name`.
    pub fn new_named(name: &str) -> Self {
        let name = name.trim();
        Self {
            id: slugify(name),
            name: name.to_string(),
            description: String::new(),
            profiles: Vec::new(),
        }
    }

    /// Copy of this set under a new id and name.
    pub fn duplicate(&self) -> Self {
        Self {
            id: format!("{}_copy", self.id),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            profiles: self.profiles.clone(),
        }
    }

    pub fn is_protected(&self) -> bool {
        is_protected(&self.id)
    }

    /// Append a blank profile named after its position. Returns its index.
    pub fn add_profile(&mut self) -> usize {
        let index = self.profiles.len();
        self.profiles
            .push(ProfileDefinition::new(format!("PROFILE_{}", index + 1)));
        index
    }

    pub fn remove_profile(&mut self, index: usize) -> Option<ProfileDefinition> {
        (index < self.profiles.len()).then(|| self.profiles.remove(index))
    }

    pub fn profile_mut(&mut self, index: usize) -> Option<&mut ProfileDefinition> {
        self.profiles.get_mut(index)
    }

    pub fn summary(&self) -> ProfileSetSummary {
        ProfileSetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            profile_count: self.profiles.len(),
        }
    }
}

/// List entry returned by `GET /profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub profile_count: usize,
}
