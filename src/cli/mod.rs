//! Command-line interface for pm-migrate
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;

mod inspect;
mod transform;

/// pm-migrate - project management export migration
///
/// Transforms project exports into import documents, deduplicating tasks
/// that appear in more than one project.
#[derive(Parser, Debug)]
#[command(name = "pm-migrate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to ./.pm-migrate.toml when present)
    #[arg(long, global = true, env = "PM_MIGRATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform export files as one deduplicated batch, in the order given
    Transform {
        /// Export files (JSON with project, tasks and milestones)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write `<stem>.transformed.json` documents into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Classify project names as client or team member projects
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Map a category value to an activity type
    Activity {
        /// Category value (omit for the fallback)
        category: Option<String>,
    },

    /// Infer the phase for a task title
    Phase {
        title: String,

        /// Activity type already mapped for the task
        #[arg(long)]
        activity: Option<String>,

        /// Section name from the source project
        #[arg(long)]
        section: Option<String>,
    },

    /// Refine a generic "Misc" tracking label from a task title
    Misc { title: String },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Transform { files, out } => transform::run(transform::TransformOptions {
                files,
                out,
                config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Classify { names } => inspect::run_classify(&names, &config, output),
            Commands::Activity { category } => inspect::run_activity(category.as_deref(), output),
            Commands::Phase {
                title,
                activity,
                section,
            } => inspect::run_phase(&title, activity.as_deref(), section.as_deref(), output),
            Commands::Misc { title } => inspect::run_misc(&title, output),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Ok(Config::load_from_dir(&std::env::current_dir()?)),
        }
    }
}
