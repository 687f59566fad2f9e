//! Reader success stories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Validation errors for story submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryValidationError {
    EmptyTitle,
    EmptyBody,
}

impl fmt::Display for StoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("story title must not be blank"),
            Self::EmptyBody => f.write_str("story must not be blank"),
        }
    }
}

impl std::error::Error for StoryValidationError {}

/// Validated story awaiting moderation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub chapter_number: Option<u16>,
}

impl NewStory {
    pub fn new(
        user_id: UserId,
        title: &str,
        body: &str,
        chapter_number: Option<u16>,
    ) -> Result<Self, StoryValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoryValidationError::EmptyTitle);
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(StoryValidationError::EmptyBody);
        }
        Ok(Self {
            user_id,
            title: title.to_owned(),
            body: body.to_owned(),
            chapter_number,
        })
    }
}

/// Stored story. Only approved stories are listed publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessStory {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub chapter_number: Option<u16>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "body", StoryValidationError::EmptyTitle)]
    #[case("Title", "  ", StoryValidationError::EmptyBody)]
    fn blank_parts_are_rejected(
        #[case] title: &str,
        #[case] body: &str,
        #[case] expected: StoryValidationError,
    ) {
        assert_eq!(NewStory::new(UserId::random(), title, body, None), Err(expected));
    }

    #[rstest]
    fn submissions_are_trimmed() {
        let story = NewStory::new(UserId::random(), " Saved 3 hours ", " Body ", Some(2))
            .expect("valid story");
        assert_eq!(story.title, "Saved 3 hours");
        assert_eq!(story.body, "Body");
        assert_eq!(story.chapter_number, Some(2));
    }
}
