//! Source export records and target import records.
//!
//! Source types deserialize the export producer's JSON as-is and tolerate
//! missing fields everywhere; unknown fields are ignored. Target types are
//! sparse: optional fields that carry no value are omitted on output.

use serde::{Deserialize, Serialize};

/// One project plus its tasks, exactly as the export producer hands it over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPayload {
    #[serde(default)]
    pub project: SourceProject,
    #[serde(default)]
    pub tasks: Vec<SourceTask>,
    #[serde(default)]
    pub milestones: Vec<SourceMilestone>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceProject {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub start_on: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub archived: bool,
}

impl SourceProject {
    /// Project deadline: `due_date`, else `due_on`.
    pub fn deadline(&self) -> Option<&str> {
        non_blank(self.due_date.as_deref()).or_else(|| non_blank(self.due_on.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTask {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub html_notes: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub assignee: Option<PersonRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub start_on: Option<String>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub dependencies: Vec<IdRef>,
    #[serde(default)]
    pub dependents: Vec<IdRef>,
    #[serde(default)]
    pub subtasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub num_subtasks: Option<u32>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(default)]
    pub followers: Vec<PersonRef>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub resource_subtype: Option<String>,
}

impl SourceTask {
    /// Trimmed title, `None` when blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Stable identifier used as the deduplication key, `None` when blank.
    pub fn id(&self) -> Option<&str> {
        non_blank(self.gid.as_deref())
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().and_then(PersonRef::name)
    }

    pub fn due(&self) -> Option<&str> {
        non_blank(self.due_on.as_deref()).or_else(|| non_blank(self.due_at.as_deref()))
    }

    pub fn start(&self) -> Option<&str> {
        non_blank(self.start_on.as_deref()).or_else(|| non_blank(self.start_at.as_deref()))
    }

    /// First membership that names a section.
    pub fn section(&self) -> Option<&str> {
        self.memberships
            .iter()
            .find_map(|membership| membership.section.as_ref().and_then(NamedRef::name))
    }

    pub fn subtask_count(&self) -> u32 {
        if self.subtasks.is_empty() {
            self.num_subtasks.unwrap_or(0)
        } else {
            u32::try_from(self.subtasks.len()).unwrap_or(u32::MAX)
        }
    }

    pub fn is_milestone(&self) -> bool {
        self.resource_subtype.as_deref() == Some("milestone")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMilestone {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Declared type of a custom field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Enum,
    Number,
    Date,
    #[serde(other)]
    Other,
}

/// A custom field entry. At most one of the value slots is expected to be
/// populated; decoding order is text, enum, number, date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_value: Option<EnumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_value: Option<DateValue>,
}

impl CustomField {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(FieldKind::Text),
            text_value: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn enumeration(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(FieldKind::Enum),
            enum_value: Some(EnumValue::Labeled {
                name: Some(label.to_string()),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Labeled {
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Wrapped {
        #[serde(default)]
        date: Option<String>,
    },
    Plain(String),
}

/// Reference to a person: either an object with a `name` or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Object {
        #[serde(default)]
        gid: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

impl PersonRef {
    pub fn named(name: &str) -> Self {
        PersonRef::Object {
            gid: None,
            name: Some(name.to_string()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PersonRef::Object { name, .. } => non_blank(name.as_deref()),
            PersonRef::Plain(name) => non_blank(Some(name.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedRef {
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub project: Option<NamedRef>,
    #[serde(default)]
    pub section: Option<NamedRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Object {
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

/// Reference to another task by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Object {
        #[serde(default)]
        gid: Option<String>,
    },
    Plain(String),
}

impl IdRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            IdRef::Object { gid } => non_blank(gid.as_deref()),
            IdRef::Plain(gid) => non_blank(Some(gid.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub view_url: Option<String>,
}

impl Attachment {
    /// `"name (url)"`, or whichever half is present.
    pub fn reference(&self) -> Option<String> {
        let name = non_blank(self.name.as_deref());
        let url = non_blank(self.download_url.as_deref())
            .or_else(|| non_blank(self.view_url.as_deref()));
        match (name, url) {
            (Some(name), Some(url)) => Some(format!("{name} ({url})")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }
}

/// Activity-feed entry on a task. Only `type == "comment"` entries are
/// carried into descriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Story {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_by: Option<PersonRef>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Story {
    pub fn is_comment(&self) -> bool {
        self.kind.as_deref() == Some("comment")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Planned,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetTask {
    pub title: String,
    pub done: bool,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Always populated; blank categories map to "Other".
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub subtask_count: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub attachment_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_milestone: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_permalink: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetProject {
    pub name: String,
    pub is_client: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetMilestone {
    pub name: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of one project transformation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub project: TargetProject,
    #[serde(default)]
    pub tasks: Vec<TargetTask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<TargetMilestone>,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_loose_export_shapes() {
        let raw = r#"{
            "gid": "t1",
            "name": "  Kickoff  ",
            "assignee": "Jane Doe",
            "memberships": [
                {"project": {"name": "Acme"}},
                {"project": {"name": "Acme"}, "section": {"name": "Onboarding"}},
                {"project": {"name": "Acme"}, "section": {"name": "Later"}}
            ],
            "dependencies": [{"gid": "d1"}, "d2", {"gid": ""}],
            "tags": [{"name": "vip"}, "plain"],
            "custom_fields": [
                {"name": "Budget", "type": "number", "number_value": 12},
                {"name": "Weird", "type": "people"}
            ],
            "unknown_field": {"ignored": true}
        }"#;
        let task: SourceTask = serde_json::from_str(raw).expect("parse task");
        assert_eq!(task.title(), Some("Kickoff"));
        assert_eq!(task.id(), Some("t1"));
        assert_eq!(task.assignee_name(), Some("Jane Doe"));
        assert_eq!(task.section(), Some("Onboarding"));
        let deps: Vec<_> = task.dependencies.iter().filter_map(IdRef::id).collect();
        assert_eq!(deps, vec!["d1", "d2"]);
        assert_eq!(task.custom_fields[1].kind, Some(FieldKind::Other));
    }

    #[test]
    fn project_accepts_both_due_keys() {
        let raw = r#"{
            "project": {"name": "Acme Corp", "due_date": "2025-12-01", "due_on": "2025-11-15"},
            "tasks": [{"gid": "t1", "name": "Kickoff call"}]
        }"#;
        let payload: ProjectPayload = serde_json::from_str(raw).expect("parse payload");
        assert_eq!(payload.project.deadline(), Some("2025-12-01"));
        assert_eq!(payload.tasks.len(), 1);

        let only_due_on = SourceProject {
            due_date: Some("  ".to_string()),
            due_on: Some("2025-11-15".to_string()),
            ..SourceProject::default()
        };
        assert_eq!(only_due_on.deadline(), Some("2025-11-15"));
    }

    #[test]
    fn subtask_count_prefers_list_then_counter() {
        let mut task = SourceTask {
            num_subtasks: Some(4),
            ..SourceTask::default()
        };
        assert_eq!(task.subtask_count(), 4);
        task.subtasks = vec![serde_json::json!({"gid": "s1"})];
        assert_eq!(task.subtask_count(), 1);
    }

    #[test]
    fn attachment_reference_formats() {
        let both = Attachment {
            name: Some("brief.pdf".to_string()),
            download_url: None,
            view_url: Some("https://files/x".to_string()),
        };
        assert_eq!(both.reference().as_deref(), Some("brief.pdf (https://files/x)"));
        let empty = Attachment::default();
        assert_eq!(empty.reference(), None);
    }

    #[test]
    fn sparse_target_omits_empty_fields() {
        let task = TargetTask {
            title: "Build homepage".to_string(),
            done: false,
            status: TaskStatus::Planned,
            priority: Priority::Medium,
            activity: "Other".to_string(),
            description: None,
            start_date: None,
            due_date: None,
            completed_date: None,
            phase: None,
            responsible: None,
            assigned_to: None,
            project_name: None,
            company_name: None,
            estimated_time: None,
            actual_time: None,
            tags: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            subtask_count: 0,
            attachment_count: 0,
            attachment_refs: Vec::new(),
            is_milestone: false,
            followers: Vec::new(),
            source_permalink: None,
            source_id: None,
        };
        let value = serde_json::to_value(&task).expect("serialize");
        let object = value.as_object().expect("object");
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["activity", "done", "priority", "status", "title"]);
        assert_eq!(object["priority"], "Medium");
    }
}
