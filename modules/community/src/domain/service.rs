use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use auth_flow::Role;

use crate::domain::error::CommunityError;
use crate::domain::gamification::{self, ActivityCounts, EngagementSummary};
use crate::infra::storage::{
    alumni, announcements, career, clubs, comments, discussions, events, is_unique_violation,
    profiles,
};

type Result<T> = std::result::Result<T, CommunityError>;

/// New-entity inputs. DTO conversion happens in the REST layer.
#[derive(Debug, Clone)]
pub struct NewDiscussion {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: chrono::DateTime<Utc>,
    pub end_time: chrono::DateTime<Utc>,
    pub organizer_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewClub {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub president_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewCareerPost {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub post_type: Option<String>,
    pub deadline: Option<chrono::DateTime<Utc>>,
    pub posted_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct AlumniEntry {
    pub graduation_year: Option<i64>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub current_company: Option<String>,
    pub linkedin_url: Option<String>,
    pub bio: Option<String>,
}

/// Service over every community resource. Handlers own the HTTP mapping;
/// this layer owns validation and storage access.
pub struct CommunityService {
    pool: SqlitePool,
}

impl CommunityService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn require(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(CommunityError::validation(format!("{field} cannot be empty")));
        }
        Ok(())
    }

    // ---- profiles ----

    /// Create the companion profile for a new account. Username defaults to
    /// the email's local part.
    pub async fn create_profile(
        &self,
        account_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<profiles::ProfileRow> {
        let username = email.split('@').next().map(str::to_string);
        let row = profiles::ProfileRow {
            id: account_id.to_string(),
            username,
            full_name: None,
            avatar_url: None,
            role: Some(role.as_str().to_string()),
            created_at: Utc::now(),
        };
        match profiles::insert(&self.pool, &row).await {
            Ok(()) => Ok(row),
            Err(e) if is_unique_violation(&e) => {
                // Retry without the username; the id conflict case bubbles up.
                let fallback = profiles::ProfileRow {
                    username: None,
                    ..row.clone()
                };
                profiles::insert(&self.pool, &fallback).await?;
                Ok(fallback)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<profiles::ProfileRow> {
        profiles::find_by_id(&self.pool, &id.to_string())
            .await?
            .ok_or_else(|| CommunityError::not_found("profile", id))
    }

    pub async fn list_profiles(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<profiles::ProfileRow>> {
        Ok(profiles::find_paginated(
            &self.pool,
            limit.unwrap_or(50),
            offset.unwrap_or(0),
        )
        .await?)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        patch: profiles::ProfilePatch,
    ) -> Result<profiles::ProfileRow> {
        if let Some(username) = &patch.username {
            Self::require("username", username)?;
        }
        profiles::update(&self.pool, &id.to_string(), &patch)
            .await?
            .ok_or_else(|| CommunityError::not_found("profile", id))
    }

    // ---- discussions ----

    pub async fn create_discussion(&self, new: NewDiscussion) -> Result<discussions::DiscussionRow> {
        Self::require("title", &new.title)?;
        Self::require("content", &new.content)?;
        Self::require("category", &new.category)?;

        let now = Utc::now();
        let row = discussions::DiscussionRow {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            content: new.content,
            category: new.category,
            tags: serde_json::to_string(&new.tags)
                .map_err(|e| CommunityError::validation(format!("invalid tags: {e}")))?,
            author_id: new.author_id.to_string(),
            votes: 0,
            created_at: now,
            updated_at: now,
        };
        discussions::insert(&self.pool, &row).await?;
        info!(id = %row.id, "discussion created");
        Ok(row)
    }

    pub async fn get_discussion(&self, id: Uuid) -> Result<discussions::DiscussionRow> {
        discussions::find_by_id(&self.pool, &id.to_string())
            .await?
            .ok_or_else(|| CommunityError::not_found("discussion", id))
    }

    pub async fn list_discussions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<discussions::DiscussionRow>> {
        Ok(discussions::find_paginated(
            &self.pool,
            limit.unwrap_or(50),
            offset.unwrap_or(0),
        )
        .await?)
    }

    pub async fn update_discussion(
        &self,
        id: Uuid,
        patch: discussions::DiscussionPatch,
    ) -> Result<discussions::DiscussionRow> {
        if let Some(title) = &patch.title {
            Self::require("title", title)?;
        }
        discussions::update(&self.pool, &id.to_string(), &patch, Utc::now())
            .await?
            .ok_or_else(|| CommunityError::not_found("discussion", id))
    }

    pub async fn delete_discussion(&self, id: Uuid) -> Result<()> {
        comments::delete_by_discussion(&self.pool, &id.to_string()).await?;
        if !discussions::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("discussion", id));
        }
        Ok(())
    }

    pub async fn vote_discussion(&self, id: Uuid, delta: i64) -> Result<discussions::DiscussionRow> {
        if delta != 1 && delta != -1 {
            return Err(CommunityError::validation("vote delta must be +1 or -1"));
        }
        discussions::vote(&self.pool, &id.to_string(), delta)
            .await?
            .ok_or_else(|| CommunityError::not_found("discussion", id))
    }

    // ---- comments ----

    pub async fn list_comments(&self, discussion_id: Uuid) -> Result<Vec<comments::CommentRow>> {
        self.get_discussion(discussion_id).await?;
        Ok(comments::find_by_discussion(&self.pool, &discussion_id.to_string()).await?)
    }

    pub async fn add_comment(
        &self,
        discussion_id: Uuid,
        new: NewComment,
    ) -> Result<comments::CommentRow> {
        Self::require("content", &new.content)?;
        self.get_discussion(discussion_id).await?;

        let row = comments::CommentRow {
            id: Uuid::new_v4().to_string(),
            discussion_id: discussion_id.to_string(),
            author_id: new.author_id.to_string(),
            content: new.content,
            votes: 0,
            created_at: Utc::now(),
        };
        comments::insert(&self.pool, &row).await?;
        Ok(row)
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<()> {
        if !comments::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("comment", id));
        }
        Ok(())
    }

    // ---- announcements ----

    pub async fn create_announcement(
        &self,
        new: NewAnnouncement,
    ) -> Result<announcements::AnnouncementRow> {
        Self::require("title", &new.title)?;
        Self::require("content", &new.content)?;

        let now = Utc::now();
        let row = announcements::AnnouncementRow {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            content: new.content,
            author_id: new.author_id.map(|id| id.to_string()),
            created_at: now,
            updated_at: now,
        };
        announcements::insert(&self.pool, &row).await?;
        Ok(row)
    }

    pub async fn list_announcements(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<announcements::AnnouncementRow>> {
        Ok(announcements::find_paginated(
            &self.pool,
            limit.unwrap_or(50),
            offset.unwrap_or(0),
        )
        .await?)
    }

    pub async fn update_announcement(
        &self,
        id: Uuid,
        patch: announcements::AnnouncementPatch,
    ) -> Result<announcements::AnnouncementRow> {
        if let Some(title) = &patch.title {
            Self::require("title", title)?;
        }
        announcements::update(&self.pool, &id.to_string(), &patch, Utc::now())
            .await?
            .ok_or_else(|| CommunityError::not_found("announcement", id))
    }

    pub async fn delete_announcement(&self, id: Uuid) -> Result<()> {
        if !announcements::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("announcement", id));
        }
        Ok(())
    }

    // ---- events ----

    pub async fn create_event(&self, new: NewEvent) -> Result<events::EventRow> {
        Self::require("title", &new.title)?;
        if new.end_time < new.start_time {
            return Err(CommunityError::validation("end_time precedes start_time"));
        }

        let row = events::EventRow {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            location: new.location,
            start_time: new.start_time,
            end_time: new.end_time,
            organizer_id: new.organizer_id.map(|id| id.to_string()),
            created_at: Utc::now(),
        };
        events::insert(&self.pool, &row).await?;
        Ok(row)
    }

    pub async fn list_upcoming_events(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<events::EventRow>> {
        Ok(events::find_upcoming(
            &self.pool,
            Utc::now(),
            limit.unwrap_or(50),
            offset.unwrap_or(0),
        )
        .await?)
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        patch: events::EventPatch,
    ) -> Result<events::EventRow> {
        let existing = events::find_by_id(&self.pool, &id.to_string())
            .await?
            .ok_or_else(|| CommunityError::not_found("event", id))?;

        let start = patch.start_time.unwrap_or(existing.start_time);
        let end = patch.end_time.unwrap_or(existing.end_time);
        if end < start {
            return Err(CommunityError::validation("end_time precedes start_time"));
        }

        events::update(&self.pool, &id.to_string(), &patch)
            .await?
            .ok_or_else(|| CommunityError::not_found("event", id))
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        if !events::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("event", id));
        }
        Ok(())
    }

    // ---- clubs ----

    pub async fn create_club(&self, new: NewClub) -> Result<clubs::ClubRow> {
        Self::require("name", &new.name)?;

        let row = clubs::ClubRow {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            logo_url: new.logo_url,
            president_id: new.president_id.map(|id| id.to_string()),
            created_at: Utc::now(),
        };
        match clubs::insert(&self.pool, &row).await {
            Ok(()) => Ok(row),
            Err(e) if is_unique_violation(&e) => Err(CommunityError::conflict(format!(
                "A club named '{}' already exists",
                row.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_club(&self, id: Uuid) -> Result<clubs::ClubRow> {
        clubs::find_by_id(&self.pool, &id.to_string())
            .await?
            .ok_or_else(|| CommunityError::not_found("club", id))
    }

    pub async fn list_clubs(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<clubs::ClubRow>> {
        Ok(clubs::find_paginated(&self.pool, limit.unwrap_or(50), offset.unwrap_or(0)).await?)
    }

    pub async fn update_club(&self, id: Uuid, patch: clubs::ClubPatch) -> Result<clubs::ClubRow> {
        if let Some(name) = &patch.name {
            Self::require("name", name)?;
        }
        clubs::update(&self.pool, &id.to_string(), &patch)
            .await?
            .ok_or_else(|| CommunityError::not_found("club", id))
    }

    pub async fn delete_club(&self, id: Uuid) -> Result<()> {
        if !clubs::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("club", id));
        }
        Ok(())
    }

    pub async fn join_club(
        &self,
        club_id: Uuid,
        member_id: Uuid,
        role: Option<String>,
    ) -> Result<clubs::ClubMemberRow> {
        self.get_club(club_id).await?;

        let row = clubs::ClubMemberRow {
            club_id: club_id.to_string(),
            member_id: member_id.to_string(),
            role: role.unwrap_or_else(|| "member".to_string()),
            joined_at: Utc::now(),
        };
        match clubs::add_member(&self.pool, &row).await {
            Ok(()) => Ok(row),
            Err(e) if is_unique_violation(&e) => {
                Err(CommunityError::conflict("Already a member of this club"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn leave_club(&self, club_id: Uuid, member_id: Uuid) -> Result<()> {
        if !clubs::remove_member(&self.pool, &club_id.to_string(), &member_id.to_string()).await? {
            return Err(CommunityError::not_found("club membership", member_id));
        }
        Ok(())
    }

    pub async fn list_club_members(&self, club_id: Uuid) -> Result<Vec<clubs::ClubMemberRow>> {
        self.get_club(club_id).await?;
        Ok(clubs::find_members(&self.pool, &club_id.to_string()).await?)
    }

    // ---- career posts ----

    pub async fn create_career_post(&self, new: NewCareerPost) -> Result<career::CareerPostRow> {
        Self::require("title", &new.title)?;
        Self::require("company", &new.company)?;
        Self::require("description", &new.description)?;

        let row = career::CareerPostRow {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            company: new.company,
            description: new.description,
            requirements: new.requirements,
            location: new.location,
            post_type: new.post_type,
            deadline: new.deadline,
            posted_by: new.posted_by.map(|id| id.to_string()),
            created_at: Utc::now(),
        };
        career::insert(&self.pool, &row).await?;
        Ok(row)
    }

    pub async fn list_career_posts(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<career::CareerPostRow>> {
        Ok(career::find_paginated(&self.pool, limit.unwrap_or(50), offset.unwrap_or(0)).await?)
    }

    pub async fn delete_career_post(&self, id: Uuid) -> Result<()> {
        if !career::delete(&self.pool, &id.to_string()).await? {
            return Err(CommunityError::not_found("career post", id));
        }
        Ok(())
    }

    // ---- alumni directory ----

    pub async fn upsert_alumni_profile(
        &self,
        profile_id: Uuid,
        entry: AlumniEntry,
    ) -> Result<alumni::AlumniProfileRow> {
        // The directory entry belongs to an existing profile
        self.get_profile(profile_id).await?;

        let row = alumni::AlumniProfileRow {
            id: profile_id.to_string(),
            graduation_year: entry.graduation_year,
            degree: entry.degree,
            major: entry.major,
            current_company: entry.current_company,
            linkedin_url: entry.linkedin_url,
            bio: entry.bio,
        };
        alumni::upsert(&self.pool, &row).await?;
        Ok(row)
    }

    pub async fn get_alumni_profile(&self, id: Uuid) -> Result<alumni::AlumniProfileRow> {
        alumni::find_by_id(&self.pool, &id.to_string())
            .await?
            .ok_or_else(|| CommunityError::not_found("alumni profile", id))
    }

    pub async fn list_alumni_profiles(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<alumni::AlumniProfileRow>> {
        Ok(alumni::find_paginated(&self.pool, limit.unwrap_or(50), offset.unwrap_or(0)).await?)
    }

    // ---- gamification ----

    /// Engagement summary for a profile, aggregated from persisted activity.
    pub async fn engagement(&self, profile_id: Uuid) -> Result<EngagementSummary> {
        self.get_profile(profile_id).await?;
        let id = profile_id.to_string();

        let counts = ActivityCounts {
            discussions_started: discussions::count_by_author(&self.pool, &id).await?,
            comments_written: comments::count_by_author(&self.pool, &id).await?,
            events_organized: events::count_by_organizer(&self.pool, &id).await?,
            clubs_joined: clubs::count_memberships(&self.pool, &id).await?,
        };
        Ok(gamification::summarize(&counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::ensure_schema;

    async fn service() -> CommunityService {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        CommunityService::new(pool)
    }

    async fn seeded_profile(svc: &CommunityService) -> Uuid {
        let id = Uuid::new_v4();
        svc.create_profile(id, "user@university.edu", Role::Student)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn profile_created_from_account_gets_local_part_username() {
        let svc = service().await;
        let id = Uuid::new_v4();
        let profile = svc
            .create_profile(id, "casey@university.edu", Role::Student)
            .await
            .unwrap();
        assert_eq!(profile.username.as_deref(), Some("casey"));
        assert_eq!(profile.role.as_deref(), Some("student"));
    }

    #[tokio::test]
    async fn duplicate_username_falls_back_to_none() {
        let svc = service().await;
        svc.create_profile(Uuid::new_v4(), "casey@university.edu", Role::Student)
            .await
            .unwrap();
        let second = svc
            .create_profile(Uuid::new_v4(), "casey@gmail.com", Role::Student)
            .await
            .unwrap();
        assert_eq!(second.username, None);
    }

    #[tokio::test]
    async fn discussion_crud_and_votes() {
        let svc = service().await;
        let author = seeded_profile(&svc).await;

        let created = svc
            .create_discussion(NewDiscussion {
                title: "Finals schedule".into(),
                content: "When are they?".into(),
                category: "academics".into(),
                tags: vec!["exams".into()],
                author_id: author,
            })
            .await
            .unwrap();

        let id = Uuid::parse_str(&created.id).unwrap();
        let voted = svc.vote_discussion(id, 1).await.unwrap();
        assert_eq!(voted.votes, 1);

        let err = svc.vote_discussion(id, 5).await.unwrap_err();
        assert!(matches!(err, CommunityError::Validation { .. }));

        svc.delete_discussion(id).await.unwrap();
        let err = svc.get_discussion(id).await.unwrap_err();
        assert!(matches!(err, CommunityError::NotFound { .. }));
    }

    #[tokio::test]
    async fn comments_require_an_existing_discussion() {
        let svc = service().await;
        let err = svc
            .add_comment(
                Uuid::new_v4(),
                NewComment {
                    author_id: Uuid::new_v4(),
                    content: "hello".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::NotFound { .. }));
    }

    #[tokio::test]
    async fn deleting_a_discussion_drops_its_comments() {
        let svc = service().await;
        let author = seeded_profile(&svc).await;
        let discussion = svc
            .create_discussion(NewDiscussion {
                title: "t".into(),
                content: "c".into(),
                category: "general".into(),
                tags: vec![],
                author_id: author,
            })
            .await
            .unwrap();
        let did = Uuid::parse_str(&discussion.id).unwrap();
        svc.add_comment(
            did,
            NewComment {
                author_id: author,
                content: "first".into(),
            },
        )
        .await
        .unwrap();

        svc.delete_discussion(did).await.unwrap();
        let orphans = comments::find_by_discussion(svc.pool(), &discussion.id)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }

    #[tokio::test]
    async fn event_times_are_validated_on_create_and_update() {
        let svc = service().await;
        let now = Utc::now();

        let err = svc
            .create_event(NewEvent {
                title: "Backwards".into(),
                description: None,
                location: None,
                start_time: now,
                end_time: now - chrono::Duration::hours(1),
                organizer_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::Validation { .. }));

        let event = svc
            .create_event(NewEvent {
                title: "Career Fair".into(),
                description: None,
                location: Some("Gym".into()),
                start_time: now + chrono::Duration::days(1),
                end_time: now + chrono::Duration::days(1) + chrono::Duration::hours(4),
                organizer_id: None,
            })
            .await
            .unwrap();
        let id = Uuid::parse_str(&event.id).unwrap();

        let err = svc
            .update_event(
                id,
                events::EventPatch {
                    end_time: Some(now - chrono::Duration::days(2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::Validation { .. }));
    }

    #[tokio::test]
    async fn club_membership_life_cycle() {
        let svc = service().await;
        let member = seeded_profile(&svc).await;

        let club = svc
            .create_club(NewClub {
                name: "Chess Club".into(),
                description: None,
                logo_url: None,
                president_id: None,
            })
            .await
            .unwrap();
        let club_id = Uuid::parse_str(&club.id).unwrap();

        svc.join_club(club_id, member, None).await.unwrap();
        let err = svc.join_club(club_id, member, None).await.unwrap_err();
        assert!(matches!(err, CommunityError::Conflict { .. }));

        let members = svc.list_club_members(club_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, "member");

        svc.leave_club(club_id, member).await.unwrap();
        let err = svc.leave_club(club_id, member).await.unwrap_err();
        assert!(matches!(err, CommunityError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_club_name_is_a_conflict() {
        let svc = service().await;
        let new = NewClub {
            name: "Debate".into(),
            description: None,
            logo_url: None,
            president_id: None,
        };
        svc.create_club(new.clone()).await.unwrap();
        let err = svc.create_club(new).await.unwrap_err();
        assert!(matches!(err, CommunityError::Conflict { .. }));
    }

    #[tokio::test]
    async fn alumni_entry_requires_a_profile() {
        let svc = service().await;
        let err = svc
            .upsert_alumni_profile(Uuid::new_v4(), AlumniEntry::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::NotFound { .. }));
    }

    #[tokio::test]
    async fn engagement_aggregates_real_activity() {
        let svc = service().await;
        let profile = seeded_profile(&svc).await;

        for i in 0..5 {
            svc.create_discussion(NewDiscussion {
                title: format!("topic {i}"),
                content: "body".into(),
                category: "general".into(),
                tags: vec![],
                author_id: profile,
            })
            .await
            .unwrap();
        }
        let club = svc
            .create_club(NewClub {
                name: "Hiking".into(),
                description: None,
                logo_url: None,
                president_id: None,
            })
            .await
            .unwrap();
        svc.join_club(Uuid::parse_str(&club.id).unwrap(), profile, None)
            .await
            .unwrap();

        let summary = svc.engagement(profile).await.unwrap();
        // 5 discussions * 10 + 1 club * 5
        assert_eq!(summary.points, 55);
        assert_eq!(summary.level, 1);
        assert!(summary.badges.contains(&"discussion_starter"));
    }
}
