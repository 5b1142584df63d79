//! Club records
//!
//! A [`Club`] is created unclaimed and transitions to claimed exactly once.
//! `claimed` never reverts; only the president reference may change later.

use crate::id::{ClubId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive club metadata (not part of the leadership core)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubProfile {
    pub category: Option<String>,
    pub description: Option<String>,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

/// Club record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Club ID
    pub id: ClubId,
    /// Display name
    pub name: String,
    /// Set once the first president claims the club
    pub claimed: bool,
    /// Current president, `Some` iff `claimed`
    pub president: Option<UserId>,
    /// Descriptive metadata
    pub profile: ClubProfile,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Club {
    /// Create an unclaimed club from creation input
    #[must_use]
    pub fn unclaimed(id: ClubId, new: NewClub, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            claimed: false,
            president: None,
            profile: new.profile,
            created_at,
        }
    }

    /// Whether `user` is the current president
    #[inline]
    #[must_use]
    pub fn is_president(&self, user: UserId) -> bool {
        self.president == Some(user)
    }

    /// `claimed` agrees with the president reference
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.claimed == self.president.is_some()
    }
}

/// Input for creating a club
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClub {
    pub name: String,
    #[serde(default)]
    pub profile: ClubProfile,
}

impl NewClub {
    /// New club with only a name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: ClubProfile::default(),
        }
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.profile.category = Some(category.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.profile.description = Some(description.into());
        self
    }

    /// With meeting time
    #[inline]
    #[must_use]
    pub fn with_meeting_time(mut self, meeting_time: impl Into<String>) -> Self {
        self.profile.meeting_time = Some(meeting_time.into());
        self
    }

    /// With location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.profile.location = Some(location.into());
        self
    }

    /// With image URL
    #[inline]
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.profile.image_url = Some(image_url.into());
        self
    }

    /// With tags (normalized later by [`NewClub::normalized`])
    #[inline]
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Trim the name; trim, lower-case and de-duplicate tags keeping first occurrence
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();

        let mut tags: Vec<String> = Vec::with_capacity(self.profile.tags.len());
        for tag in self.profile.tags.drain(..) {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        self.profile.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unclaimed_club_has_no_president() {
        let club = Club::unclaimed(ClubId::new(), NewClub::new("Debate"), Utc::now());
        assert!(!club.claimed);
        assert_eq!(club.president, None);
        assert!(club.is_consistent());
    }

    #[test]
    fn inconsistent_club_detected() {
        let mut club = Club::unclaimed(ClubId::new(), NewClub::new("Debate"), Utc::now());
        club.claimed = true;
        assert!(!club.is_consistent());

        club.claimed = false;
        club.president = Some(UserId::new());
        assert!(!club.is_consistent());
    }

    #[test]
    fn normalized_cleans_tags_and_name() {
        let new = NewClub::new("  Chess Club ")
            .with_tags(["Strategy", " strategy", "", "Board Games "])
            .normalized();

        assert_eq!(new.name, "Chess Club");
        assert_eq!(
            new.profile.tags,
            vec!["strategy".to_string(), "board games".to_string()]
        );
    }

    #[test]
    fn builder_sets_profile() {
        let new = NewClub::new("Robotics")
            .with_category("STEM")
            .with_meeting_time("Tuesdays 3pm")
            .with_location("Room 204");

        assert_eq!(new.profile.category.as_deref(), Some("STEM"));
        assert_eq!(new.profile.meeting_time.as_deref(), Some("Tuesdays 3pm"));
        assert_eq!(new.profile.location.as_deref(), Some("Room 204"));
        assert_eq!(new.profile.description, None);
    }
}
