//! Client vs. team-member project classification.
//!
//! Client projects are named after the customer ("Acme Corp"); team-member
//! projects are someone's personal tracking list ("Lena's Tasks").

const TEAM_MEMBER_MARKERS: [&str; 6] = [
    "'s project",
    "'s tasks",
    "'s workspace",
    " personal",
    " individual",
    " my ",
];

/// Classify a project by name against the roster of known users.
///
/// Total and pure: a blank name is a team-member project, anything that is
/// not recognisably personal is a client project.
pub fn is_client_project<S: AsRef<str>>(name: &str, users: &[S]) -> bool {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }

    if TEAM_MEMBER_MARKERS.iter().any(|marker| name.contains(marker)) {
        return false;
    }

    for user in users {
        let user = user.as_ref().trim().to_lowercase();
        if user.is_empty() {
            continue;
        }
        if name == user || name == format!("{user}'s") {
            return false;
        }
        let first_name = user.split_whitespace().next().unwrap_or(user.as_str());
        if name.starts_with(first_name) && (name.contains("'s") || name.contains(" project")) {
            return false;
        }
    }

    true
}
