/// Points awarded per activity kind.
pub const POINTS_PER_DISCUSSION: i64 = 10;
pub const POINTS_PER_COMMENT: i64 = 2;
pub const POINTS_PER_EVENT_ORGANIZED: i64 = 15;
pub const POINTS_PER_CLUB_MEMBERSHIP: i64 = 5;
pub const POINTS_PER_LEVEL: i64 = 100;

/// Thresholds for automatically awarded badges.
pub const DISCUSSION_STARTER_THRESHOLD: i64 = 5;
pub const EVENT_ENTHUSIAST_THRESHOLD: i64 = 10;
pub const TOP_CONTRIBUTOR_POINTS: i64 = 250;

/// Activity a profile has accumulated, pulled from the community tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityCounts {
    pub discussions_started: i64,
    pub comments_written: i64,
    pub events_organized: i64,
    pub clubs_joined: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every badge the portal knows about. `academic_achiever` is assigned out
/// of band and never auto-awarded.
pub const BADGE_CATALOG: [BadgeDef; 4] = [
    BadgeDef {
        id: "discussion_starter",
        name: "Discussion Starter",
        description: "Started 5 discussions in the forums",
    },
    BadgeDef {
        id: "event_enthusiast",
        name: "Event Enthusiast",
        description: "Organized 10 university events",
    },
    BadgeDef {
        id: "top_contributor",
        name: "Top Contributor",
        description: "One of the most active users",
    },
    BadgeDef {
        id: "academic_achiever",
        name: "Academic Achiever",
        description: "Maintained a high GPA for 2 semesters",
    },
];

/// Engagement summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementSummary {
    pub points: i64,
    pub level: i64,
    /// Progress through the current level, 0–99.
    pub progress_percent: i64,
    pub badges: Vec<&'static str>,
}

/// Pure function of the activity counts; no randomness, no I/O.
pub fn summarize(counts: &ActivityCounts) -> EngagementSummary {
    let points = counts.discussions_started * POINTS_PER_DISCUSSION
        + counts.comments_written * POINTS_PER_COMMENT
        + counts.events_organized * POINTS_PER_EVENT_ORGANIZED
        + counts.clubs_joined * POINTS_PER_CLUB_MEMBERSHIP;

    let mut badges = Vec::new();
    if counts.discussions_started >= DISCUSSION_STARTER_THRESHOLD {
        badges.push("discussion_starter");
    }
    if counts.events_organized >= EVENT_ENTHUSIAST_THRESHOLD {
        badges.push("event_enthusiast");
    }
    if points >= TOP_CONTRIBUTOR_POINTS {
        badges.push("top_contributor");
    }

    EngagementSummary {
        points,
        level: points / POINTS_PER_LEVEL + 1,
        progress_percent: points % POINTS_PER_LEVEL,
        badges,
    }
}

pub fn badge_by_id(id: &str) -> Option<&'static BadgeDef> {
    BADGE_CATALOG.iter().find(|b| b.id == id)
}
