//! Project registry.
//!
//! Handles reading and writing `.kanuka/config.toml`: the project's identity
//! and the users registered with it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::core::layout::Layout;
use crate::core::store::{Store, Visibility};
use crate::core::types::{DisplayName, UserId};
use crate::error::{ConfigError, NotFoundError, Result};

/// Project registry stored in `.kanuka/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project: Meta,
    /// Registered users by id.
    #[serde(default)]
    pub users: BTreeMap<UserId, Member>,
}

/// Immutable project identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub uuid: Uuid,
    pub name: String,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: DisplayName,
    pub registered_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with a random uuid and no users.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project: Meta {
                uuid: Uuid::new_v4(),
                name: name.into(),
            },
            users: BTreeMap::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.project.uuid
    }

    pub fn name(&self) -> &str {
        &self.project.name
    }

    /// Check if a registry exists for `layout`.
    pub fn exists(store: &impl Store, layout: &Layout) -> bool {
        store.exists(&layout.config_path())
    }

    /// Load the registry.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(store: &impl Store, layout: &Layout) -> Result<Self> {
        let path = layout.config_path();
        debug!(path = %path.display(), "loading project");

        if !store.exists(&path) {
            return Err(NotFoundError::NotInitialized(layout.root().display().to_string()).into());
        }

        let bytes = store.read(&path)?;
        let contents = String::from_utf8(bytes).map_err(|_| ConfigError::Encoding)?;
        let project: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            uuid = %project.uuid(),
            users = project.users.len(),
            "project loaded"
        );
        Ok(project)
    }

    /// Save the registry.
    pub fn save(&self, store: &impl Store, layout: &Layout) -> Result<()> {
        debug!("saving project");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        store.write(&layout.config_path(), contents.as_bytes(), Visibility::Public)
    }

    /// Register (or re-register) a user.
    pub fn add_member(&mut self, id: &str, name: &str) {
        self.users.insert(
            id.to_string(),
            Member {
                name: name.to_string(),
                registered_at: Utc::now(),
            },
        );
    }

    /// Forget a user. Returns whether they were registered.
    pub fn remove_member(&mut self, id: &str) -> bool {
        self.users.remove(id).is_some()
    }
}
