//! Project transformation: one export payload in, one import document out.
//!
//! Each task runs through a single linear pass:
//! title check, dedup decision, cutoff rule, field extraction, mapping,
//! assembly, commit. A task is committed (pushed to the document and
//! recorded in the tracker) only at the very end, so an early exit never
//! leaves a half-accepted task behind.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::classify::is_client_project;
use crate::config::{Config, ExtractionConfig, PolicyConfig};
use crate::dates::{created_or_sentinel, date_only};
use crate::dedup::{Decision, DedupStats, DedupTracker, SkipReason};
use crate::error::{Error, Result};
use crate::fields::{build_description, extract, extract_priority, extract_tags, strip_html};
use crate::mapping::{activity_for, phase_for};
use crate::model::{
    non_blank, Document, IdRef, PersonRef, ProjectPayload, SourceMilestone, SourceProject,
    SourceTask, TargetMilestone, TargetProject, TargetTask, TaskStatus,
};
use crate::users::UserResolver;

pub const COMPANY_FIELDS: [&str; 2] = ["C-Name", "Company Name"];
pub const PM_FIELDS: [&str; 2] = ["PM Name", "PM"];
pub const CATEGORY_FIELDS: [&str; 2] = ["Category", "Activity Type"];
pub const ESTIMATED_TIME_FIELDS: [&str; 1] = ["Estimated time"];
pub const ACTUAL_TIME_FIELDS: [&str; 1] = ["Actual time"];

/// Counters for one `transform` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub tasks_seen: usize,
    pub written: usize,
    pub untitled: usize,
    pub excluded_by_cutoff: usize,
    pub skipped_duplicates: usize,
    pub replaced: usize,
    pub activity_fallbacks: usize,
    pub phase_fallbacks: usize,
}

/// Why a task did not make it into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    Untitled,
    Duplicate { existing_project: String, reason: SkipReason },
    Cutoff { created: NaiveDate },
}

struct ProjectContext<'a> {
    name: &'a str,
    is_client: bool,
}

/// Converts project payloads using a fixed policy and user roster.
#[derive(Debug, Clone)]
pub struct Transformer {
    policy: PolicyConfig,
    extraction: ExtractionConfig,
    users: UserResolver,
}

impl Transformer {
    pub fn new(config: &Config) -> Self {
        Self {
            policy: config.policy.clone(),
            extraction: config.extraction.clone(),
            users: UserResolver::new(&config.users),
        }
    }

    pub fn users(&self) -> &UserResolver {
        &self.users
    }

    pub fn is_client_project(&self, name: &str) -> bool {
        is_client_project(name, self.users.roster())
    }

    /// Transform one project, consulting and updating `tracker`.
    ///
    /// Fails only when the payload has no project name; in that case the
    /// tracker is left untouched.
    pub fn transform(
        &self,
        tracker: &mut DedupTracker,
        payload: &ProjectPayload,
    ) -> Result<(Document, TransformStats)> {
        let name = non_blank(payload.project.name.as_deref()).ok_or(Error::MissingProjectName)?;
        let ctx = ProjectContext {
            name,
            is_client: self.is_client_project(name),
        };
        let kind = if ctx.is_client { "client" } else { "team member" };
        info!(
            project = name,
            kind,
            tasks = payload.tasks.len(),
            "transforming project"
        );

        let project = self.transform_project(&ctx, &payload.project, &payload.tasks);
        let milestones = payload.milestones.iter().map(transform_milestone).collect();
        let mut document = Document {
            project,
            tasks: Vec::new(),
            milestones,
        };

        let mut stats = TransformStats::default();
        let total = payload.tasks.len();
        for (idx, task) in payload.tasks.iter().enumerate() {
            stats.tasks_seen += 1;
            let label = task.title().unwrap_or("<untitled>");
            debug!("[{}/{}] {label}", idx + 1, total);

            let replacing = match self.admit(tracker, &ctx, task) {
                Ok(replacing) => replacing,
                Err(rejection) => {
                    self.note_rejection(tracker, &mut stats, label, rejection);
                    continue;
                }
            };

            let target = self.build_task(&ctx, task, &mut stats);
            if let Some(id) = task.id() {
                tracker.record_task(id, ctx.name, ctx.is_client, target.clone());
            }
            if replacing {
                tracker.note_replaced();
                stats.replaced += 1;
                info!("replaced team-project copy with client-project copy: {label}");
            }
            document.tasks.push(target);
            stats.written += 1;
        }

        info!(
            project = name,
            written = stats.written,
            excluded = stats.excluded_by_cutoff,
            skipped = stats.skipped_duplicates,
            replaced = stats.replaced,
            phase_fallbacks = stats.phase_fallbacks,
            activity_fallbacks = stats.activity_fallbacks,
            "transformation complete"
        );
        Ok((document, stats))
    }

    /// Title, dedup and cutoff checks. `Ok(true)` means the task will
    /// replace a team-project copy.
    fn admit(
        &self,
        tracker: &DedupTracker,
        ctx: &ProjectContext<'_>,
        task: &SourceTask,
    ) -> std::result::Result<bool, Rejection> {
        if task.title().is_none() {
            return Err(Rejection::Untitled);
        }

        let replacing = match task.id().map(|id| tracker.decide(id, ctx.is_client)) {
            None | Some(Decision::Accept) => false,
            Some(Decision::Replace { .. }) => true,
            Some(Decision::Skip {
                existing_project,
                reason,
            }) => {
                return Err(Rejection::Duplicate {
                    existing_project,
                    reason,
                })
            }
        };

        let created = created_or_sentinel(
            task.created_at.as_deref(),
            self.policy.unparseable_created_sentinel,
        );
        if created < self.policy.cutoff_date && task.assignee_name().is_none() && task.due().is_none()
        {
            return Err(Rejection::Cutoff { created });
        }

        Ok(replacing)
    }

    fn note_rejection(
        &self,
        tracker: &mut DedupTracker,
        stats: &mut TransformStats,
        label: &str,
        rejection: Rejection,
    ) {
        match rejection {
            Rejection::Untitled => {
                stats.untitled += 1;
                debug!("skipping task without a title");
            }
            Rejection::Duplicate {
                existing_project,
                reason,
            } => {
                stats.skipped_duplicates += 1;
                tracker.note_skipped();
                debug!(?reason, "skipping duplicate already accepted from '{existing_project}': {label}");
            }
            Rejection::Cutoff { created } => {
                stats.excluded_by_cutoff += 1;
                debug!("excluded by cutoff rule (created {created}, unassigned, undated): {label}");
            }
        }
    }

    fn build_task(
        &self,
        ctx: &ProjectContext<'_>,
        task: &SourceTask,
        stats: &mut TransformStats,
    ) -> TargetTask {
        let title = task.title().unwrap_or_default().to_string();
        let fields = &task.custom_fields;

        let category = extract(fields, &CATEGORY_FIELDS);
        if category.is_none() {
            stats.activity_fallbacks += 1;
        }
        let activity = activity_for(category.as_deref());

        let section = task.section();
        if section.is_none() {
            stats.phase_fallbacks += 1;
        }
        let phase = phase_for(&title, Some(activity), section);

        let pm_name = extract(fields, &PM_FIELDS);
        let responsible = self.users.validate_user(pm_name.as_deref(), true);
        let assigned_to = self.users.resolve(task.assignee_name());
        if assigned_to.is_none() {
            if let Some(raw) = task.assignee_name() {
                debug!("assignee '{raw}' did not resolve; leaving unassigned");
            }
        }

        let completed_at = non_blank(task.completed_at.as_deref());
        let (status, done, completed_date) = match (task.completed, completed_at) {
            (true, Some(at)) => (TaskStatus::Completed, true, date_only(at)),
            _ => (TaskStatus::Planned, false, None),
        };

        let company_name = extract(fields, &COMPANY_FIELDS).unwrap_or_else(|| ctx.name.to_string());
        let attachment_refs: Vec<String> =
            task.attachments.iter().filter_map(|att| att.reference()).collect();

        TargetTask {
            priority: extract_priority(fields, &title),
            title,
            done,
            status,
            activity: activity.to_string(),
            description: build_description(task),
            start_date: task.start().and_then(date_only),
            due_date: task.due().and_then(date_only),
            completed_date,
            phase: Some(phase),
            responsible: Some(responsible).filter(|name| !name.is_empty()),
            assigned_to,
            project_name: Some(ctx.name.to_string()),
            company_name: Some(company_name),
            estimated_time: extract(fields, &ESTIMATED_TIME_FIELDS),
            actual_time: extract(fields, &ACTUAL_TIME_FIELDS),
            tags: extract_tags(task),
            dependencies: collect_ids(&task.dependencies),
            dependents: collect_ids(&task.dependents),
            subtask_count: task.subtask_count(),
            attachment_count: u32::try_from(task.attachments.len()).unwrap_or(u32::MAX),
            attachment_refs,
            is_milestone: task.is_milestone(),
            followers: task
                .followers
                .iter()
                .filter_map(PersonRef::name)
                .map(str::to_string)
                .collect(),
            source_permalink: non_blank(task.permalink_url.as_deref()).map(str::to_string),
            source_id: task.id().map(str::to_string),
        }
    }

    fn transform_project(
        &self,
        ctx: &ProjectContext<'_>,
        project: &SourceProject,
        tasks: &[SourceTask],
    ) -> TargetProject {
        let company_name = if ctx.is_client {
            Some(ctx.name.to_string())
        } else {
            let found = tasks
                .iter()
                .take(self.extraction.company_scan_limit)
                .find_map(|task| extract(&task.custom_fields, &COMPANY_FIELDS));
            if let Some(company) = &found {
                info!("company name from task custom field: {company}");
            }
            found
        };

        let manager_name = self.dominant_manager(tasks);

        let description = non_blank(project.overview.as_deref())
            .or_else(|| non_blank(project.notes.as_deref()))
            .map(strip_html)
            .filter(|text| !text.trim().is_empty());
        let start_date = [&project.start_on, &project.created_at]
            .into_iter()
            .find_map(|raw| raw.as_deref().and_then(date_only));

        TargetProject {
            name: ctx.name.to_string(),
            is_client: ctx.is_client,
            company_name,
            manager_name,
            description,
            start_date,
            deadline: project.deadline().and_then(date_only),
            created_at: non_blank(project.created_at.as_deref()).map(str::to_string),
            modified_at: non_blank(project.modified_at.as_deref()).map(str::to_string),
            archived: project.archived,
        }
    }

    /// Most frequent resolvable PM across all tasks; earliest wins a tie.
    fn dominant_manager(&self, tasks: &[SourceTask]) -> Option<String> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, task) in tasks.iter().enumerate() {
            let Some(name) = self.users.resolve(extract(&task.custom_fields, &PM_FIELDS).as_deref())
            else {
                continue;
            };
            let entry = counts.entry(name).or_insert((0, position));
            entry.0 += 1;
        }
        counts
            .into_iter()
            .max_by(|(_, (left_count, left_pos)), (_, (right_count, right_pos))| {
                left_count
                    .cmp(right_count)
                    .then_with(|| right_pos.cmp(left_pos))
            })
            .map(|(name, _)| name)
    }
}

fn transform_milestone(milestone: &SourceMilestone) -> TargetMilestone {
    TargetMilestone {
        name: non_blank(milestone.name.as_deref())
            .unwrap_or("Unknown")
            .to_string(),
        completed: milestone.completed,
        due_date: non_blank(milestone.due_on.as_deref())
            .or_else(|| non_blank(milestone.due_at.as_deref()))
            .and_then(date_only),
        description: non_blank(milestone.notes.as_deref()).map(strip_html),
    }
}

fn collect_ids(refs: &[IdRef]) -> Vec<String> {
    refs.iter().filter_map(IdRef::id).map(str::to_string).collect()
}

/// A migration batch: one transformer and the tracker shared by every
/// project transformed in it.
#[derive(Debug)]
pub struct Batch {
    transformer: Transformer,
    tracker: DedupTracker,
}

impl Batch {
    pub fn new(config: &Config) -> Self {
        Self {
            transformer: Transformer::new(config),
            tracker: DedupTracker::new(),
        }
    }

    /// Start a new batch. Never call this between projects of one batch.
    pub fn reset(&mut self) {
        self.tracker.reset();
        info!("deduplication tracker reset");
    }

    pub fn transform(&mut self, payload: &ProjectPayload) -> Result<(Document, TransformStats)> {
        self.transformer.transform(&mut self.tracker, payload)
    }

    pub fn deduplication_stats(&self) -> DedupStats {
        self.tracker.stats()
    }

    /// The single accepted copy of every tracked task, in id order.
    pub fn accepted(&self) -> Vec<&TargetTask> {
        self.tracker.accepted().into_values().collect()
    }

    pub fn tracker(&self) -> &DedupTracker {
        &self.tracker
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomField, Membership, NamedRef, PersonRef};

    fn task(id: &str, title: &str) -> SourceTask {
        SourceTask {
            gid: Some(id.to_string()),
            name: Some(title.to_string()),
            created_at: Some("2025-09-01T12:00:00Z".to_string()),
            ..SourceTask::default()
        }
    }

    fn payload(project: &str, tasks: Vec<SourceTask>) -> ProjectPayload {
        ProjectPayload {
            project: SourceProject {
                name: Some(project.to_string()),
                ..SourceProject::default()
            },
            tasks,
            milestones: Vec::new(),
        }
    }

    #[test]
    fn untitled_tasks_are_skipped_without_tracking() {
        let transformer = Transformer::new(&Config::default());
        let mut tracker = DedupTracker::new();
        let (doc, stats) = transformer
            .transform(&mut tracker, &payload("Acme Corp", vec![task("t1", "   ")]))
            .expect("transform");
        assert!(doc.tasks.is_empty());
        assert_eq!(stats.untitled, 1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn missing_project_name_is_fatal_and_leaves_tracker_alone() {
        let transformer = Transformer::new(&Config::default());
        let mut tracker = DedupTracker::new();
        let err = transformer
            .transform(&mut tracker, &payload("  ", vec![task("t1", "Kickoff")]))
            .expect_err("missing name");
        assert!(matches!(err, Error::MissingProjectName));
        assert!(tracker.is_empty());
    }

    #[test]
    fn fields_fan_out_onto_target() {
        let transformer = Transformer::new(&Config::default());
        let mut tracker = DedupTracker::new();
        let mut source = task("t9", "Write homepage copy");
        source.custom_fields = vec![
            CustomField::enumeration("Category", "Website Design"),
            CustomField::text("PM Name", "Lena"),
            CustomField::text("Estimated time", "02:00:00"),
        ];
        source.assignee = Some(PersonRef::named("Austin"));
        source.due_at = Some("2025-10-01T17:00:00.000Z".to_string());
        source.completed = true;
        source.completed_at = Some("2025-09-30T08:00:00Z".to_string());
        source.memberships = vec![Membership {
            project: Some(NamedRef::default()),
            section: Some(NamedRef {
                gid: None,
                name: Some("Website Homepage".to_string()),
            }),
        }];

        let (doc, stats) = transformer
            .transform(&mut tracker, &payload("Acme Corp", vec![source]))
            .expect("transform");
        let out = &doc.tasks[0];
        assert_eq!(out.activity, "Website - New");
        assert_eq!(out.phase.as_deref(), Some("Website Homepage"));
        assert_eq!(out.responsible.as_deref(), Some("Lena Lebid"));
        assert_eq!(out.assigned_to.as_deref(), Some("Austin Koziol"));
        assert_eq!(out.due_date.as_deref(), Some("2025-10-01"));
        assert_eq!(out.completed_date.as_deref(), Some("2025-09-30"));
        assert_eq!(out.status, TaskStatus::Completed);
        assert!(out.done);
        assert_eq!(out.estimated_time.as_deref(), Some("02:00:00"));
        assert_eq!(out.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(stats.activity_fallbacks, 0);
        assert_eq!(stats.phase_fallbacks, 0);
        assert_eq!(doc.project.manager_name.as_deref(), Some("Lena Lebid"));
    }

    #[test]
    fn completed_without_timestamp_stays_planned() {
        let transformer = Transformer::new(&Config::default());
        let mut tracker = DedupTracker::new();
        let mut source = task("t1", "Kickoff");
        source.completed = true;
        let (doc, _) = transformer
            .transform(&mut tracker, &payload("Acme Corp", vec![source]))
            .expect("transform");
        assert_eq!(doc.tasks[0].status, TaskStatus::Planned);
        assert!(!doc.tasks[0].done);
        assert_eq!(doc.tasks[0].completed_date, None);
    }

    #[test]
    fn dominant_manager_breaks_ties_by_first_appearance() {
        let transformer = Transformer::new(&Config::default());
        let with_pm = |id: &str, pm: &str| {
            let mut t = task(id, "Task");
            t.custom_fields = vec![CustomField::text("PM", pm)];
            t
        };
        let tasks = vec![
            with_pm("1", "Debbie Hoffman"),
            with_pm("2", "Lena Lebid"),
            with_pm("3", "Nobody Known"),
            with_pm("4", "Lena"),
            with_pm("5", "Debbie"),
        ];
        assert_eq!(
            transformer.dominant_manager(&tasks).as_deref(),
            Some("Debbie Hoffman")
        );
        assert_eq!(transformer.dominant_manager(&[]), None);
    }

    #[test]
    fn team_project_company_comes_from_task_fields() {
        let transformer = Transformer::new(&Config::default());
        let mut tracker = DedupTracker::new();
        let mut first = task("a", "Plain");
        first.custom_fields = vec![CustomField::text("Notes", "x")];
        let mut second = task("b", "With company");
        second.custom_fields = vec![CustomField::text("C-Name", "Exscape")];
        let (doc, _) = transformer
            .transform(&mut tracker, &payload("Austin's Tasks", vec![first, second]))
            .expect("transform");
        assert!(!doc.project.is_client);
        assert_eq!(doc.project.company_name.as_deref(), Some("Exscape"));
        assert_eq!(doc.tasks[0].company_name.as_deref(), Some("Austin's Tasks"));
        assert_eq!(doc.tasks[1].company_name.as_deref(), Some("Exscape"));
    }
}
