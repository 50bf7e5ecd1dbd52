use pm_migrate::classify::is_client_project;
use pm_migrate::mapping::{activity_for, improve_misc_tracking, phase_for, CATEGORY_TABLE};

const USERS: [&str; 3] = ["Austin Koziol", "Ellie Troughton", "Tom Sanpakit"];

#[test]
fn every_table_category_maps_to_its_activity() {
    for (category, activity) in CATEGORY_TABLE {
        assert_eq!(activity_for(Some(category)), *activity, "{category}");
    }
}

#[test]
fn category_lookup_falls_back_case_insensitively_then_to_other() {
    assert_eq!(activity_for(Some("social media")), "Social Posting");
    assert_eq!(activity_for(Some("WEBSITE DESIGN")), "Website - New");
    assert_eq!(activity_for(Some("Underwater Basket Weaving")), "Other");
}

#[test]
fn section_wins_over_title_heuristics() {
    assert_eq!(
        phase_for("SEO keyword research", Some("SEO"), Some("Launch Prep")),
        "Launch Prep"
    );
    assert_eq!(phase_for("SEO keyword research", Some("Other"), Some("  ")), "SEO");
}

#[test]
fn phase_ladder_is_first_match() {
    assert_eq!(phase_for("Email homepage mockup", None, None), "Email");
    assert_eq!(phase_for("Homepage mockup", None, None), "Website Design");
    assert_eq!(phase_for("Client follow up", None, None), "Client Status");
    assert_eq!(phase_for("Quarterly planning", Some("Videography"), None), "Videography");
    assert_eq!(phase_for("Quarterly planning", None, None), "Account Management");
}

#[test]
fn misc_tracking_refines_nested_rules() {
    assert_eq!(improve_misc_tracking("Write SEO blog"), "SEO - Blog Writing");
    assert_eq!(improve_misc_tracking("Publish SEO blog"), "SEO - Blogs Publishing");
    assert_eq!(improve_misc_tracking("Boost Facebook ad"), "Facebook Ads - Boosting");
    assert_eq!(improve_misc_tracking("Homepage in Squarespace"), "Design - Homepage in Squarespace");
    assert_eq!(improve_misc_tracking("Design homepage"), "Design - Homepage Mockup");
    assert_eq!(improve_misc_tracking("Video editing"), "Editing - Misc");
    assert_eq!(improve_misc_tracking("Shoot video"), "Editing - Video");
    assert_eq!(improve_misc_tracking("Order coffee"), "Misc");
    assert_eq!(improve_misc_tracking(""), "Misc");
}

#[test]
fn misc_tracking_does_not_change_activity_for_blank_category() {
    assert_eq!(improve_misc_tracking("Client kickoff call"), "Meetings");
    assert_eq!(activity_for(None), "Other");
}

#[test]
fn project_classification() {
    assert!(is_client_project("Acme Corp", &USERS));
    assert!(!is_client_project("Austin's Tasks", &USERS));
    assert!(!is_client_project("Tom Sanpakit", &USERS));
    assert!(!is_client_project("Ellie project board", &USERS));
    assert!(!is_client_project("Team personal backlog", &USERS));
    assert!(!is_client_project("", &USERS));
}
