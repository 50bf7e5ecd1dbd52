//! Field extraction from loosely-typed task records.
//!
//! Custom fields are matched by case-insensitive substring: a candidate name
//! matches any field whose declared name contains it. This is deliberately
//! loose ("PM" also matches "PM Name" and "Shipment Date"), and the mapping
//! tables downstream were tuned against exactly this behaviour.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{CustomField, DateValue, EnumValue, Priority, SourceTask, Story, TagRef};

pub const COMMENTS_HEADER: &str = "--- Comments ---";

const HIGH_PRIORITY_WORDS: [&str; 5] = ["urgent", "asap", "critical", "important", "high priority"];
const LOW_PRIORITY_WORDS: [&str; 4] = ["low priority", "nice to have", "optional", "backlog"];

/// Value of the first field matching `candidate`.
///
/// The first field whose name contains the candidate decides the outcome; an
/// empty value on that field is absent and later fields are not consulted.
pub fn extract_one(fields: &[CustomField], candidate: &str) -> Option<String> {
    let needle = candidate.to_lowercase();
    fields
        .iter()
        .find(|field| field.name.to_lowercase().contains(&needle))
        .and_then(decode_value)
}

/// Try each candidate name in order; the first one that yields a value wins.
pub fn extract(fields: &[CustomField], candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| extract_one(fields, candidate))
}

/// Decode a field's value slot: text, then enum, then number, then date.
fn decode_value(field: &CustomField) -> Option<String> {
    if let Some(text) = &field.text_value {
        let trimmed = text.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    if let Some(value) = &field.enum_value {
        return match value {
            EnumValue::Labeled { name } => name.clone().filter(|name| !name.is_empty()),
            EnumValue::Plain(label) => (!label.is_empty()).then(|| label.clone()),
        };
    }
    if let Some(number) = &field.number_value {
        return Some(number.to_string());
    }
    if let Some(value) = &field.date_value {
        return match value {
            DateValue::Wrapped { date } => date.clone().filter(|date| !date.is_empty()),
            DateValue::Plain(date) => (!date.is_empty()).then(|| date.clone()),
        };
    }
    None
}

pub fn extract_tags(task: &SourceTask) -> Vec<String> {
    task.tags
        .iter()
        .filter_map(|tag| match tag {
            TagRef::Object { name } => name.clone(),
            TagRef::Plain(name) => Some(name.clone()),
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Priority from the "Priority" custom field, else from title keywords.
pub fn extract_priority(fields: &[CustomField], title: &str) -> Priority {
    if let Some(value) = extract(fields, &["Priority"]) {
        let value = value.to_lowercase();
        if value.contains("high") || value.contains("urgent") {
            return Priority::High;
        }
        if value.contains("low") {
            return Priority::Low;
        }
        if value.contains("medium") || value.contains("normal") {
            return Priority::Medium;
        }
    }

    let title = title.to_lowercase();
    if HIGH_PRIORITY_WORDS.iter().any(|word| title.contains(word)) {
        Priority::High
    } else if LOW_PRIORITY_WORDS.iter().any(|word| title.contains(word)) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Remove HTML tags, leaving text content untouched.
pub fn strip_html(raw: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").expect("static tag pattern"));
    tags.replace_all(raw, "").into_owned()
}

/// Comment stories rendered oldest first, one paragraph each.
pub fn format_comments(stories: &[Story]) -> Option<String> {
    let mut comments: Vec<&Story> = stories
        .iter()
        .filter(|story| story.is_comment())
        .filter(|story| story.text.as_deref().is_some_and(|text| !text.is_empty()))
        .collect();
    if comments.is_empty() {
        return None;
    }
    comments.sort_by(|left, right| left.created_at.cmp(&right.created_at));

    let rendered: Vec<String> = comments
        .iter()
        .map(|story| {
            let author = story
                .created_by
                .as_ref()
                .and_then(|person| person.name())
                .unwrap_or("Unknown");
            let at = story.created_at.as_deref().unwrap_or("");
            format!("[{author} - {at}]: {}", story.text.as_deref().unwrap_or(""))
        })
        .collect();
    Some(rendered.join("\n\n"))
}

/// Task description: overview/notes with tags stripped, followed by the
/// comments block when the task has any.
pub fn build_description(task: &SourceTask) -> Option<String> {
    let body = [&task.overview, &task.notes, &task.html_notes]
        .into_iter()
        .find_map(|value| value.as_deref().filter(|text| !text.trim().is_empty()))
        .map(|text| strip_html(text.trim()))
        .filter(|text| !text.trim().is_empty());
    let comments = format_comments(&task.stories);

    match (body, comments) {
        (Some(body), Some(comments)) => Some(format!("{body}\n\n{COMMENTS_HEADER}\n{comments}")),
        (Some(body), None) => Some(body),
        (None, Some(comments)) => Some(format!("{COMMENTS_HEADER}\n{comments}")),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, PersonRef};

    fn number(name: &str, raw: &str) -> CustomField {
        CustomField {
            name: name.to_string(),
            kind: Some(FieldKind::Number),
            number_value: Some(serde_json::from_str(raw).expect("number")),
            ..CustomField::default()
        }
    }

    fn comment(author: &str, at: &str, text: &str) -> Story {
        Story {
            kind: Some("comment".to_string()),
            text: Some(text.to_string()),
            created_by: Some(PersonRef::named(author)),
            created_at: Some(at.to_string()),
        }
    }

    #[test]
    fn substring_match_is_case_insensitive_and_first_wins() {
        let fields = vec![
            CustomField::text("Client PM Name", "Austin"),
            CustomField::text("PM Name", "Lena"),
        ];
        assert_eq!(extract_one(&fields, "pm name").as_deref(), Some("Austin"));
    }

    #[test]
    fn empty_first_match_does_not_fall_through_to_later_fields() {
        let fields = vec![
            CustomField::text("Category", "   "),
            CustomField::text("Category (old)", "SEO"),
        ];
        assert_eq!(extract_one(&fields, "Category"), None);
        assert_eq!(
            extract(&fields, &["Category", "old"]).as_deref(),
            Some("SEO")
        );
    }

    #[test]
    fn decodes_each_value_slot() {
        let date = CustomField {
            name: "Launch Date".to_string(),
            kind: Some(FieldKind::Date),
            date_value: Some(DateValue::Wrapped {
                date: Some("2024-05-01".to_string()),
            }),
            ..CustomField::default()
        };
        let fields = vec![
            CustomField::enumeration("Category", "SEO"),
            number("Estimated time", "2.5"),
            number("Seats", "3"),
            date,
            CustomField {
                name: "Empty enum".to_string(),
                enum_value: Some(EnumValue::Labeled { name: None }),
                ..CustomField::default()
            },
        ];
        assert_eq!(extract_one(&fields, "category").as_deref(), Some("SEO"));
        assert_eq!(extract_one(&fields, "estimated").as_deref(), Some("2.5"));
        assert_eq!(extract_one(&fields, "seats").as_deref(), Some("3"));
        assert_eq!(extract_one(&fields, "launch").as_deref(), Some("2024-05-01"));
        assert_eq!(extract_one(&fields, "empty enum"), None);
        assert_eq!(extract_one(&fields, "missing"), None);
        assert_eq!(extract_one(&[], "anything"), None);
    }

    #[test]
    fn priority_prefers_field_then_title() {
        let fields = vec![CustomField::enumeration("Priority", "Low")];
        assert_eq!(extract_priority(&fields, "URGENT fix"), Priority::Low);
        assert_eq!(extract_priority(&[], "URGENT fix"), Priority::High);
        assert_eq!(extract_priority(&[], "backlog grooming"), Priority::Low);
        assert_eq!(extract_priority(&[], "Write copy"), Priority::Medium);

        let unknown = vec![CustomField::enumeration("Priority", "whenever")];
        assert_eq!(extract_priority(&unknown, "asap"), Priority::High);
    }

    #[test]
    fn comments_are_chronological_and_skip_non_comments() {
        let mut system = comment("Bot", "2024-01-01T00:00:00Z", "moved to Done");
        system.kind = Some("system".to_string());
        let stories = vec![
            comment("Lena", "2024-02-01T09:00:00Z", "second"),
            system,
            comment("Austin", "2024-01-15T09:00:00Z", "first"),
        ];
        let rendered = format_comments(&stories).expect("comments");
        assert_eq!(
            rendered,
            "[Austin - 2024-01-15T09:00:00Z]: first\n\n[Lena - 2024-02-01T09:00:00Z]: second"
        );
        assert_eq!(format_comments(&[]), None);
    }

    #[test]
    fn description_strips_html_and_appends_comments() {
        let task = SourceTask {
            notes: Some("<p>Call the <b>client</b></p>".to_string()),
            stories: vec![comment("Tom", "2024-01-01", "done")],
            ..SourceTask::default()
        };
        assert_eq!(
            build_description(&task).as_deref(),
            Some("Call the client\n\n--- Comments ---\n[Tom - 2024-01-01]: done")
        );

        let bare = SourceTask::default();
        assert_eq!(build_description(&bare), None);
    }
}
