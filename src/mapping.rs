//! Static category, phase and tracking tables.
//!
//! Heuristics are ordered ladders: rules are evaluated top to bottom and the
//! first match wins. Several rules overlap ("video editing" hits the `edit`
//! rung before the `video` rung), so reordering changes results.

/// Source category to target activity type.
pub const CATEGORY_TABLE: &[(&str, &str)] = &[
    ("Account Management", "Project Management"),
    ("Blogs", "SEO"),
    ("Brand Package", "Branding"),
    ("Brochure", "Brochure"),
    ("Client Management", "Project Management"),
    ("Content & Creative", "Graphic Design Support"),
    ("Contractor/Homeowner Brochure", "Brochure"),
    ("Copywriter", "Website - New"),
    ("CrewRecruiter", "CrewRecruiter"),
    ("Dealer Brochure", "Brochure"),
    ("Design - New Website", "Website - New"),
    ("Email", "Email"),
    ("Facebook Ads", "Facebook Ads"),
    ("Google Ads", "Google Ads"),
    ("Halstead", "Halstead Marketing"),
    ("Internal Operations", "Administrative - Internal"),
    ("Lead Magnet", "Lead Magnet"),
    ("LinkedIn Ads", "Linkedin Ads"),
    ("Marketing Collateral Package", "Branding"),
    ("Meetings", "Project Management"),
    ("Microsoft Ads", "Microsoft Ads"),
    ("Offboarding, Pausing, & Ending Projects", "Project Management"),
    ("OKRs", "Administrative - Internal"),
    ("Onboarding", "Onboarding"),
    ("Onboarding | Access", "Onboarding"),
    ("Onboarding | After Client Kick Off Call", "Onboarding"),
    ("Onboarding | Before Client Kick Off Call", "Onboarding"),
    ("Onboarding | During Client Kick Off Call", "Onboarding"),
    ("Onboarding | Lead Tracking & Review Building", "Onboarding"),
    ("Other", "Other"),
    ("Paid Advertising", "Google Ads"),
    ("PM Status Update", "Project Management"),
    ("SEO", "SEO"),
    ("SEO Services", "SEO"),
    ("Social Media", "Social Posting"),
    ("Social Posting", "Social Posting"),
    ("Special Projects", "Other"),
    ("Videography", "Videography"),
    ("Website - One Week Before Go Live", "Website - New"),
    ("Website Core Pages", "Website - New"),
    ("Website Design", "Website - New"),
    ("Website Development", "Website - New"),
    ("Website Final Approval", "Website - New"),
    ("Website Full Build", "Website - New"),
    ("Website Go Live", "Website - New"),
    ("Website Homepage in Squarespace", "Website - New"),
    ("Website Homepage Mockup", "Website - New"),
    ("Website Strategy", "Website - New"),
    ("Website Updates", "Website - SEO"),
];

pub const FALLBACK_ACTIVITY: &str = "Other";
pub const FALLBACK_PHASE: &str = "Account Management";
pub const FALLBACK_TRACKING: &str = "Misc";

/// Activity type for a source category.
///
/// A blank category is always "Other"; titles, sections and assignees are
/// never consulted here.
pub fn activity_for(category: Option<&str>) -> &'static str {
    let Some(category) = category.map(str::trim).filter(|value| !value.is_empty()) else {
        return FALLBACK_ACTIVITY;
    };

    if let Some((_, activity)) = CATEGORY_TABLE.iter().find(|(source, _)| *source == category) {
        return *activity;
    }

    let lowered = category.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(source, _)| source.to_lowercase() == lowered)
        .map(|(_, activity)| *activity)
        .unwrap_or(FALLBACK_ACTIVITY)
}

/// One rung of the phase ladder: matches when the title contains any of
/// `title` or the activity contains any of `activity`.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRule {
    pub title: &'static [&'static str],
    pub activity: &'static [&'static str],
    pub phase: &'static str,
}

pub const PHASE_LADDER: [PhaseRule; 11] = [
    PhaseRule { title: &["seo"], activity: &["seo"], phase: "SEO" },
    PhaseRule { title: &["email"], activity: &["email"], phase: "Email" },
    PhaseRule { title: &["facebook"], activity: &["facebook"], phase: "Facebook Ads" },
    PhaseRule { title: &["google ad"], activity: &["google ads"], phase: "Google Ads" },
    PhaseRule { title: &["video"], activity: &["videography"], phase: "Videography" },
    PhaseRule { title: &["design", "mockup"], activity: &[], phase: "Website Design" },
    PhaseRule { title: &["homepage"], activity: &["homepage"], phase: "Website Homepage" },
    PhaseRule { title: &["go live", "launch"], activity: &["go live"], phase: "Website Go Live" },
    PhaseRule { title: &["update"], activity: &["updates"], phase: "Website Updates" },
    PhaseRule {
        title: &["account management"],
        activity: &["account management"],
        phase: "Account Management",
    },
    PhaseRule { title: &["status", "follow up"], activity: &[], phase: "Client Status" },
];

/// Project phase for a task. A non-blank section is authoritative and is
/// returned as given; otherwise the phase ladder runs over title and activity.
pub fn phase_for(title: &str, activity: Option<&str>, section: Option<&str>) -> String {
    if let Some(section) = section.filter(|value| !value.trim().is_empty()) {
        return section.to_string();
    }

    let title = title.to_lowercase();
    let activity = activity.unwrap_or("").to_lowercase();
    PHASE_LADDER
        .iter()
        .find(|rule| {
            rule.title.iter().any(|word| title.contains(word))
                || rule.activity.iter().any(|word| activity.contains(word))
        })
        .map(|rule| rule.phase)
        .unwrap_or(FALLBACK_PHASE)
        .to_string()
}

/// Ordered tracking rules with a terminal default.
#[derive(Debug)]
pub struct Ladder {
    pub rules: &'static [Rule],
    pub default: &'static str,
}

/// Matches when the text contains any of `any` and none of `unless`.
#[derive(Debug)]
pub struct Rule {
    pub any: &'static [&'static str],
    pub unless: &'static [&'static str],
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Label(&'static str),
    Refine(&'static Ladder),
}

impl Ladder {
    pub fn evaluate(&self, text: &str) -> &'static str {
        for rule in self.rules {
            let hit = rule.any.iter().any(|word| text.contains(word))
                && !rule.unless.iter().any(|word| text.contains(word));
            if hit {
                return match rule.outcome {
                    Outcome::Label(label) => label,
                    Outcome::Refine(ladder) => ladder.evaluate(text),
                };
            }
        }
        self.default
    }
}

const fn label(any: &'static [&'static str], label: &'static str) -> Rule {
    Rule { any, unless: &[], outcome: Outcome::Label(label) }
}

const fn refine(any: &'static [&'static str], ladder: &'static Ladder) -> Rule {
    Rule { any, unless: &[], outcome: Outcome::Refine(ladder) }
}

static SEO_BLOG: Ladder = Ladder {
    rules: &[label(&["writ"], "SEO - Blog Writing")],
    default: "SEO - Blogs Publishing",
};

static SEO: Ladder = Ladder {
    rules: &[
        label(&["keyword", "research"], "SEO - Keyword Research"),
        label(&["gmb", "google my business"], "SEO - Google My Business (GMB)"),
        refine(&["blog"], &SEO_BLOG),
        label(&["monthly"], "SEO - Monthly"),
    ],
    default: "SEO - General",
};

static SOCIAL: Ladder = Ladder {
    rules: &[label(&["schedul", "post"], "Social Scheduling")],
    default: "Graphic Design - Social",
};

static FACEBOOK_ADS: Ladder = Ladder {
    rules: &[label(&["boost"], "Facebook Ads - Boosting")],
    default: "Facebook Ads - Management",
};

static DESIGN: Ladder = Ladder {
    rules: &[
        label(&["homepage"], "Design - Homepage Mockup"),
        label(&["core page"], "Design - Core Pages"),
        label(&["full", "build"], "Design - Build Out Site"),
    ],
    default: "Design - New Website",
};

static WRITING: Ladder = Ladder {
    rules: &[
        label(&["core page"], "Writing - Core Pages"),
        label(&["homepage"], "Writing - New Site Homepage Copy"),
        label(&["full"], "Writing - New Site Full Copy"),
        label(&["email"], "Writing - Email"),
        label(&["social"], "Writing - Social"),
        label(&["seo", "blog"], "Writing - SEO"),
    ],
    default: "Writing - Misc",
};

static EDITING: Ladder = Ladder {
    rules: &[
        label(&["core page"], "Editing - Core Pages"),
        label(&["homepage"], "Editing - Homepage Client Revisions"),
        label(&["full"], "Editing - Full Site Client Revisions"),
        label(&["blog"], "Editing - Blog Posts"),
    ],
    default: "Editing - Misc",
};

static VIDEO: Ladder = Ladder {
    rules: &[label(&["edit"], "Video Editing - Social Posting")],
    default: "Editing - Video",
};

static COMPILE: Ladder = Ladder {
    rules: &[
        label(&["full site"], "Editing - Full Site Client Revisions"),
        label(&["core page"], "Editing - Core Pages"),
    ],
    default: "Editing - Misc",
};

pub static TRACKING_LADDER: Ladder = Ladder {
    rules: &[
        refine(&["seo", "keyword"], &SEO),
        label(&["meeting", "call", "kickoff"], "Meetings"),
        label(&["email"], "Writing - Email"),
        refine(&["social"], &SOCIAL),
        refine(&["facebook ad", "fb ad"], &FACEBOOK_ADS),
        label(&["google ad", "ppc"], "Google Ads - Management"),
        refine(&["design", "mockup"], &DESIGN),
        label(&["squarespace"], "Design - Homepage in Squarespace"),
        Rule {
            any: &["homepage"],
            unless: &["design"],
            outcome: Outcome::Label("Design - Homepage in Squarespace"),
        },
        label(&["go live", "launch", "domain"], "Design - Domain/Go Live"),
        refine(&["writ", "copy", "content"], &WRITING),
        refine(&["edit"], &EDITING),
        refine(&["video"], &VIDEO),
        label(&["report", "reporting"], "Reporting"),
        label(
            &["status", "follow up", "check in", "update", "confirm"],
            "Writing - Client Communications (Slack, Calls, Meetings)",
        ),
        label(&["brochure"], "Graphic Design - Brochure"),
        label(&["lead magnet"], "Lead Magnet"),
        label(&["training", "onboard"], "Training"),
        label(&["integrat", "setup", "install", "access via"], "Integrations"),
        refine(&["compile"], &COMPILE),
    ],
    default: FALLBACK_TRACKING,
};

/// Fine-grained tracking label inferred from a task title.
///
/// Independent of [`activity_for`]: a blank category still maps to "Other"
/// there, whatever this function would say about the title.
pub fn improve_misc_tracking(title: &str) -> &'static str {
    if title.trim().is_empty() {
        return FALLBACK_TRACKING;
    }
    TRACKING_LADDER.evaluate(&title.to_lowercase())
}
