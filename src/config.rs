//! Configuration loading and management
//!
//! Handles parsing of `.pm-migrate.toml` configuration files. Mapping tables
//! and heuristic ladders are fixed policy and live in [`crate::mapping`];
//! only the cutoff rule and the user roster are configurable.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = ".pm-migrate.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Date-cutoff policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// User roster and aliases
    #[serde(default)]
    pub users: UsersConfig,

    /// Custom-field scanning limits
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Cutoff rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Tasks created before this date with no assignee and no due date are excluded
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: NaiveDate,

    /// Creation date assumed when a task's created_at cannot be parsed
    #[serde(default = "default_unparseable_created_sentinel")]
    pub unparseable_created_sentinel: NaiveDate,
}

fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default()
}

fn default_unparseable_created_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            cutoff_date: default_cutoff_date(),
            unparseable_created_sentinel: default_unparseable_created_sentinel(),
        }
    }
}

/// Short-name to full-name substitution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAlias {
    pub short: String,
    pub full: String,
}

/// User roster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Fallback user for responsibility when nothing resolves
    #[serde(default = "default_primary_user")]
    pub primary: String,

    /// Users that exist in the target system
    #[serde(default = "default_valid_users")]
    pub valid: Vec<String>,

    /// Ordered alias list; the first alias contained in a name wins
    #[serde(default = "default_user_aliases")]
    pub aliases: Vec<UserAlias>,
}

fn default_primary_user() -> String {
    "Tom Sanpakit".to_string()
}

fn default_valid_users() -> Vec<String> {
    [
        "Austin Koziol",
        "Bethany Aeckersberg",
        "Cait George",
        "Tom Sanpakit",
        "Andrea Pejoska",
        "Anna Halstead",
        "Debbie Hoffman",
        "Elizabeth Wasserman",
        "Kelsey Blomquist-Wright",
        "Lauren Cullnan",
        "Matej Robar",
        "Polina Kroyter",
        "Taryn Himmelright",
        "Tiffney Ma",
        "Tracy Hart",
        "Christine Holz",
        "Corey Halstead",
        "Dani Cervantes",
        "Devon Stank",
        "Elizabeth Wood",
        "Ellie Troughton",
        "Giorgi Goguadze",
        "Jim McGorry",
        "Katya Pankov",
        "Lena Lebid",
        "Lindsey Cartwright",
        "Martina Willis",
        "Matteo Banfo",
        "Mylessia Tkacs",
        "Olivia Mello",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

fn default_user_aliases() -> Vec<UserAlias> {
    [
        ("Matej", "Matej Robar"),
        ("Ellie", "Ellie Troughton"),
        ("Tracy", "Tracy Sanpakit"),
        ("Austin", "Austin Koziol"),
        ("Sophia", "Sophia Sanpakit"),
        ("Giuseppe", "Giuseppe Sanpakit"),
        ("Marie", "Marie Sanpakit"),
        ("Rachel", "Rachel Sanpakit"),
        ("Bethany", "Bethany Aeckersberg"),
        ("Anna", "Anna Halstead"),
        ("Debbie", "Debbie Hoffman"),
        ("Lauren", "Lauren Cullnan"),
        ("Andrea", "Andrea Pejoska"),
        ("Dani", "Dani Cervantes"),
        ("Lena", "Lena Lebid"),
        ("Olivia", "Olivia Mello"),
        ("Giorgi", "Giorgi Goguadze"),
        ("Martina", "Martina Willis"),
        ("Matteo", "Matteo Banfo"),
        ("Mylessia", "Mylessia Tkacs"),
        ("Christine", "Christine Holz"),
        ("Kelsey", "Kelsey Blomquist-Wright"),
        ("Cait", "Cait George"),
        ("Tom", "Tom Sanpakit"),
    ]
    .iter()
    .map(|(short, full)| UserAlias {
        short: short.to_string(),
        full: full.to_string(),
    })
    .collect()
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_user(),
            valid: default_valid_users(),
            aliases: default_user_aliases(),
        }
    }
}

/// Custom-field scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// How many leading tasks a team-member project scans for a company name
    #[serde(default = "default_company_scan_limit")]
    pub company_scan_limit: usize,
}

fn default_company_scan_limit() -> usize {
    10
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_scan_limit: default_company_scan_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a `.pm-migrate.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_else(|err| {
                tracing::warn!("ignoring {}: {err}", config_path.display());
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        self.users.validate()?;
        Ok(())
    }
}

impl PolicyConfig {
    fn validate(&self) -> Result<()> {
        if self.unparseable_created_sentinel >= self.cutoff_date {
            return Err(Error::InvalidConfig(format!(
                "policy.unparseable_created_sentinel ({}) must be before policy.cutoff_date ({})",
                self.unparseable_created_sentinel, self.cutoff_date
            )));
        }
        Ok(())
    }
}

impl UsersConfig {
    fn validate(&self) -> Result<()> {
        let primary = self.primary.trim();
        if primary.is_empty() {
            return Err(Error::InvalidConfig(
                "users.primary cannot be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.valid {
            let trimmed = user.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidConfig(
                    "users.valid cannot include empty entries".to_string(),
                ));
            }
            if !seen.insert(trimmed) {
                return Err(Error::InvalidConfig(format!(
                    "users.valid has duplicate entry '{trimmed}'"
                )));
            }
        }

        if !seen.contains(primary) {
            return Err(Error::InvalidConfig(format!(
                "users.primary '{}' not in users.valid",
                self.primary
            )));
        }

        for alias in &self.aliases {
            if alias.short.trim().is_empty() || alias.full.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "users.aliases entries need both short and full".to_string(),
                ));
            }
        }

        Ok(())
    }
}
