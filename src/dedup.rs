//! Cross-project task deduplication.
//!
//! The same source task can be listed under several projects (a client
//! project and one or more team members' personal projects). The tracker
//! remembers, per task id, which project the accepted copy came from and
//! whether that project is a client project:
//!
//! | seen before | current | recorded | decision |
//! |---|---|---|---|
//! | no  | any    | -      | accept  |
//! | yes | team   | client | skip    |
//! | yes | client | team   | replace |
//! | yes | client | client | skip    |
//! | yes | team   | team   | skip    |
//!
//! One tracker spans one migration batch. Projects must be fed through it
//! one at a time; it is plain `&mut` state with no interior locking.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::TargetTask;

#[derive(Debug, Clone, PartialEq)]
pub struct DedupRecord {
    pub project_name: String,
    pub is_client: bool,
    /// The accepted copy, when the caller recorded one.
    pub task: Option<TargetTask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A client project already supplied this task.
    ClientAlreadyAccepted,
    /// A project of the same class got there first.
    FirstSeenWins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Replace { previous_project: String },
    Skip { existing_project: String, reason: SkipReason },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub total: usize,
    pub client_count: usize,
    pub team_count: usize,
    pub per_project: BTreeMap<String, usize>,
    /// Duplicates skipped since the last reset
    pub skipped: usize,
    /// Team-project copies replaced by client copies since the last reset
    pub replaced: usize,
}

#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashMap<String, DedupRecord>,
    skipped: usize,
    replaced: usize,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything. Call once at the start of a batch.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.skipped = 0;
        self.replaced = 0;
    }

    pub fn lookup(&self, task_id: &str) -> Option<&DedupRecord> {
        self.seen.get(task_id)
    }

    /// Unconditional upsert without a task copy.
    pub fn record(&mut self, task_id: &str, project_name: &str, is_client: bool) {
        self.insert(task_id, project_name, is_client, None);
    }

    /// Unconditional upsert keeping the accepted copy.
    pub fn record_task(
        &mut self,
        task_id: &str,
        project_name: &str,
        is_client: bool,
        task: TargetTask,
    ) {
        self.insert(task_id, project_name, is_client, Some(task));
    }

    fn insert(
        &mut self,
        task_id: &str,
        project_name: &str,
        is_client: bool,
        task: Option<TargetTask>,
    ) {
        self.seen.insert(
            task_id.to_string(),
            DedupRecord {
                project_name: project_name.to_string(),
                is_client,
                task,
            },
        );
    }

    /// Apply the decision table for a task arriving from a project of class
    /// `current_is_client`. Does not mutate the tracker.
    pub fn decide(&self, task_id: &str, current_is_client: bool) -> Decision {
        let Some(existing) = self.lookup(task_id) else {
            return Decision::Accept;
        };
        match (current_is_client, existing.is_client) {
            (true, false) => Decision::Replace {
                previous_project: existing.project_name.clone(),
            },
            (false, true) => Decision::Skip {
                existing_project: existing.project_name.clone(),
                reason: SkipReason::ClientAlreadyAccepted,
            },
            (true, true) | (false, false) => Decision::Skip {
                existing_project: existing.project_name.clone(),
                reason: SkipReason::FirstSeenWins,
            },
        }
    }

    pub(crate) fn note_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn note_replaced(&mut self) {
        self.replaced += 1;
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Accepted copies keyed by task id, in id order.
    pub fn accepted(&self) -> BTreeMap<&str, &TargetTask> {
        self.seen
            .iter()
            .filter_map(|(id, record)| record.task.as_ref().map(|task| (id.as_str(), task)))
            .collect()
    }

    /// Counts over the current records, recomputed on every call.
    pub fn stats(&self) -> DedupStats {
        let mut stats = DedupStats {
            total: self.seen.len(),
            skipped: self.skipped,
            replaced: self.replaced,
            ..DedupStats::default()
        };
        for record in self.seen.values() {
            if record.is_client {
                stats.client_count += 1;
            } else {
                stats.team_count += 1;
            }
            *stats
                .per_project
                .entry(record.project_name.clone())
                .or_insert(0) += 1;
        }
        stats
    }
}
