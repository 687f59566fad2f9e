//! Row DTOs for the backend tables.
//!
//! Adapters decode into these transport rows first, then map into domain
//! records in one pass. Conversions return `String` errors that the
//! repositories wrap as decode failures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    BookPrompt, Chapter, DimensionScore, DimensionScores, Exercise, ExerciseField,
    ExerciseResponse, Feedback, FeedbackCategory, Goal, GoalStatus, Milestone, NewFeedback,
    NewGoal, NewStory, PromptKind, PromptRating, PromptRef, PromptTemplate, QuickRating,
    RewardAction, RewardEntry, SessionUser, SuccessStory, UserId, normalise_answers,
};

fn user_id(raw: &str) -> Result<UserId, String> {
    UserId::new(raw).map_err(|err| format!("user id {raw:?}: {err}"))
}

fn prompt_ref(id: String, kind: &str) -> Result<PromptRef, String> {
    let kind: PromptKind = kind
        .parse()
        .map_err(|err| format!("prompt type {kind:?}: {err}"))?;
    PromptRef::new(id, kind).map_err(|err| err.to_string())
}

fn score(raw: u8, column: &str) -> Result<DimensionScore, String> {
    DimensionScore::new(raw).map_err(|err| format!("{column}: {err}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct ChapterRow {
    pub(super) number: u16,
    pub(super) title: String,
    pub(super) summary: String,
    #[serde(default)]
    pub(super) key_takeaways: Vec<String>,
    pub(super) reading_minutes: u16,
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Self {
            number: row.number,
            title: row.title,
            summary: row.summary,
            key_takeaways: row.key_takeaways,
            reading_minutes: row.reading_minutes,
        }
    }
}

impl From<&Chapter> for ChapterRow {
    fn from(chapter: &Chapter) -> Self {
        Self {
            number: chapter.number,
            title: chapter.title.clone(),
            summary: chapter.summary.clone(),
            key_takeaways: chapter.key_takeaways.clone(),
            reading_minutes: chapter.reading_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct BookPromptRow {
    pub(super) id: String,
    pub(super) chapter_number: u16,
    pub(super) title: String,
    pub(super) prompt_text: String,
    pub(super) category: String,
    #[serde(default)]
    pub(super) tags: Vec<String>,
}

impl From<BookPromptRow> for BookPrompt {
    fn from(row: BookPromptRow) -> Self {
        Self {
            id: row.id,
            chapter_number: row.chapter_number,
            title: row.title,
            body: row.prompt_text,
            category: row.category,
            tags: row.tags,
        }
    }
}

impl From<&BookPrompt> for BookPromptRow {
    fn from(prompt: &BookPrompt) -> Self {
        Self {
            id: prompt.id.clone(),
            chapter_number: prompt.chapter_number,
            title: prompt.title.clone(),
            prompt_text: prompt.body.clone(),
            category: prompt.category.clone(),
            tags: prompt.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct ExerciseRow {
    pub(super) id: String,
    pub(super) chapter_number: u16,
    pub(super) title: String,
    pub(super) description: String,
    #[serde(default)]
    pub(super) estimated_minutes: Option<u16>,
    #[serde(default)]
    pub(super) fields: Value,
}

impl ExerciseRow {
    /// Field configs that do not decode are skipped with a warning so one bad
    /// row never hides the rest of the exercise.
    pub(super) fn into_domain(self) -> Exercise {
        let raw_fields = match self.fields {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            _ => {
                warn!(exercise_id = %self.id, "exercise fields are not an array; ignoring");
                Vec::new()
            }
        };
        let fields = raw_fields
            .into_iter()
            .filter_map(|raw| match ExerciseField::from_value(raw) {
                Ok(field) => Some(field),
                Err(error) => {
                    warn!(exercise_id = %self.id, error = %error, "skipping unusable field config");
                    None
                }
            })
            .collect();
        Exercise {
            id: self.id,
            chapter_number: self.chapter_number,
            title: self.title,
            description: self.description,
            estimated_minutes: self.estimated_minutes,
            fields,
        }
    }

    pub(super) fn from_domain(exercise: &Exercise) -> Result<Self, String> {
        let fields = serde_json::to_value(&exercise.fields)
            .map_err(|err| format!("exercise {} fields: {err}", exercise.id))?;
        Ok(Self {
            id: exercise.id.clone(),
            chapter_number: exercise.chapter_number,
            title: exercise.title.clone(),
            description: exercise.description.clone(),
            estimated_minutes: exercise.estimated_minutes,
            fields,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct TemplateRow {
    pub(super) id: String,
    pub(super) title: String,
    pub(super) description: String,
    pub(super) category: String,
    pub(super) prompt_text: String,
    #[serde(default)]
    pub(super) tags: Vec<String>,
    #[serde(default)]
    pub(super) difficulty: Option<String>,
}

impl From<TemplateRow> for PromptTemplate {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            body: row.prompt_text,
            tags: row.tags,
            difficulty: row.difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct RatingRow {
    pub(super) user_id: String,
    pub(super) prompt_id: String,
    pub(super) prompt_type: String,
    pub(super) effectiveness: u8,
    pub(super) clarity: u8,
    pub(super) time_value: u8,
    /// Written for reporting; recomputed from the dimensions on read.
    #[serde(default, skip_deserializing)]
    pub(super) overall_score: f64,
    #[serde(default)]
    pub(super) comment: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl RatingRow {
    pub(super) fn from_domain(rating: &PromptRating) -> Self {
        Self {
            user_id: rating.user_id.to_string(),
            prompt_id: rating.prompt.id().to_owned(),
            prompt_type: rating.prompt.kind().as_str().to_owned(),
            effectiveness: rating.scores.effectiveness.get(),
            clarity: rating.scores.clarity.get(),
            time_value: rating.scores.time_value.get(),
            overall_score: rating.overall(),
            comment: rating.comment.clone(),
            created_at: rating.created_at,
            updated_at: rating.updated_at,
        }
    }

    pub(super) fn into_domain(self) -> Result<PromptRating, String> {
        Ok(PromptRating {
            user_id: user_id(&self.user_id)?,
            scores: DimensionScores {
                effectiveness: score(self.effectiveness, "effectiveness")?,
                clarity: score(self.clarity, "clarity")?,
                time_value: score(self.time_value, "time_value")?,
            },
            prompt: prompt_ref(self.prompt_id, &self.prompt_type)?,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Projection used for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(super) struct ScoreRow {
    pub(super) effectiveness: u8,
    pub(super) clarity: u8,
    pub(super) time_value: u8,
}

impl ScoreRow {
    pub(super) fn into_domain(self) -> Result<DimensionScores, String> {
        DimensionScores::new(self.effectiveness, self.clarity, self.time_value)
            .map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct QuickRatingRow {
    pub(super) user_id: String,
    pub(super) prompt_id: String,
    pub(super) prompt_type: String,
    pub(super) rating: u8,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&QuickRating> for QuickRatingRow {
    fn from(rating: &QuickRating) -> Self {
        Self {
            user_id: rating.user_id.to_string(),
            prompt_id: rating.prompt.id().to_owned(),
            prompt_type: rating.prompt.kind().as_str().to_owned(),
            rating: rating.stars.get(),
            updated_at: rating.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(super) struct StarRow {
    pub(super) rating: u8,
}

impl StarRow {
    pub(super) fn into_domain(self) -> Result<DimensionScore, String> {
        score(self.rating, "rating")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct NewFeedbackRow {
    pub(super) user_id: String,
    pub(super) prompt_id: String,
    pub(super) prompt_type: String,
    pub(super) category: String,
    pub(super) feedback_text: String,
}

impl From<&NewFeedback> for NewFeedbackRow {
    fn from(feedback: &NewFeedback) -> Self {
        Self {
            user_id: feedback.user_id.to_string(),
            prompt_id: feedback.prompt.id().to_owned(),
            prompt_type: feedback.prompt.kind().as_str().to_owned(),
            category: feedback.category.as_str().to_owned(),
            feedback_text: feedback.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct FeedbackRow {
    pub(super) id: Uuid,
    pub(super) user_id: String,
    pub(super) prompt_id: String,
    pub(super) prompt_type: String,
    pub(super) category: String,
    pub(super) feedback_text: String,
    #[serde(default)]
    pub(super) helpful_count: u32,
    pub(super) created_at: DateTime<Utc>,
}

impl FeedbackRow {
    pub(super) fn into_domain(self) -> Result<Feedback, String> {
        let category: FeedbackCategory = self
            .category
            .parse()
            .map_err(|err| format!("feedback category {:?}: {err}", self.category))?;
        Ok(Feedback {
            id: self.id,
            user_id: user_id(&self.user_id)?,
            prompt: prompt_ref(self.prompt_id, &self.prompt_type)?,
            category,
            text: self.feedback_text,
            helpful_count: self.helpful_count,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct RewardRow {
    pub(super) user_id: String,
    pub(super) action_type: String,
    pub(super) points: u32,
    #[serde(default)]
    pub(super) badge: Option<String>,
    #[serde(default)]
    pub(super) reference_id: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

impl From<&RewardEntry> for RewardRow {
    fn from(entry: &RewardEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            action_type: entry.action.as_str().to_owned(),
            points: entry.points,
            badge: entry.badge.clone(),
            reference_id: entry.reference_id.clone(),
            created_at: entry.created_at,
        }
    }
}

impl RewardRow {
    pub(super) fn into_domain(self) -> Result<RewardEntry, String> {
        let action: RewardAction = self
            .action_type
            .parse()
            .map_err(|err| format!("action type {:?}: {err}", self.action_type))?;
        Ok(RewardEntry {
            user_id: user_id(&self.user_id)?,
            action,
            points: self.points,
            badge: self.badge,
            reference_id: self.reference_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct NewGoalRow {
    pub(super) user_id: String,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) category: Option<String>,
    pub(super) target_date: Option<NaiveDate>,
    pub(super) status: &'static str,
}

impl From<&NewGoal> for NewGoalRow {
    fn from(goal: &NewGoal) -> Self {
        Self {
            user_id: goal.user_id.to_string(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            category: goal.category.clone(),
            target_date: goal.target_date,
            status: GoalStatus::Active.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct GoalRow {
    pub(super) id: Uuid,
    pub(super) user_id: String,
    pub(super) title: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) category: Option<String>,
    #[serde(default)]
    pub(super) target_date: Option<NaiveDate>,
    pub(super) status: String,
    pub(super) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(super) goal_milestones: Vec<MilestoneRow>,
}

impl GoalRow {
    pub(super) fn into_domain(self) -> Result<Goal, String> {
        let status: GoalStatus = self
            .status
            .parse()
            .map_err(|err| format!("goal status {:?}: {err}", self.status))?;
        let mut milestones: Vec<Milestone> = self
            .goal_milestones
            .into_iter()
            .map(Milestone::from)
            .collect();
        milestones.sort_by_key(|milestone| milestone.position);
        Ok(Goal {
            id: self.id,
            user_id: user_id(&self.user_id)?,
            title: self.title,
            description: self.description,
            category: self.category,
            target_date: self.target_date,
            status,
            milestones,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct MilestoneRow {
    pub(super) id: Uuid,
    pub(super) goal_id: Uuid,
    pub(super) title: String,
    #[serde(default)]
    pub(super) completed: bool,
    #[serde(default)]
    pub(super) position: u32,
}

impl From<MilestoneRow> for Milestone {
    fn from(row: MilestoneRow) -> Self {
        Self {
            id: row.id,
            goal_id: row.goal_id,
            title: row.title,
            completed: row.completed,
            position: row.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct NewMilestoneRow<'a> {
    pub(super) goal_id: Uuid,
    pub(super) title: &'a str,
    pub(super) completed: bool,
    pub(super) position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct ExerciseResponseRow {
    pub(super) user_id: String,
    pub(super) exercise_id: String,
    #[serde(default)]
    pub(super) responses: Value,
    #[serde(default)]
    pub(super) completed: bool,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&ExerciseResponse> for ExerciseResponseRow {
    fn from(response: &ExerciseResponse) -> Self {
        Self {
            user_id: response.user_id.to_string(),
            exercise_id: response.exercise_id.clone(),
            responses: Value::Object(response.answers.clone()),
            completed: response.completed,
            updated_at: response.updated_at,
        }
    }
}

impl ExerciseResponseRow {
    pub(super) fn into_domain(self) -> Result<ExerciseResponse, String> {
        let answers = normalise_answers(&self.exercise_id, self.responses);
        Ok(ExerciseResponse {
            user_id: user_id(&self.user_id)?,
            exercise_id: self.exercise_id,
            answers,
            completed: self.completed,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct NewStoryRow {
    pub(super) user_id: String,
    pub(super) title: String,
    pub(super) story: String,
    pub(super) chapter_number: Option<u16>,
}

impl From<&NewStory> for NewStoryRow {
    fn from(story: &NewStory) -> Self {
        Self {
            user_id: story.user_id.to_string(),
            title: story.title.clone(),
            story: story.body.clone(),
            chapter_number: story.chapter_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct StoryRow {
    pub(super) id: Uuid,
    pub(super) user_id: String,
    pub(super) title: String,
    pub(super) story: String,
    #[serde(default)]
    pub(super) chapter_number: Option<u16>,
    #[serde(default)]
    pub(super) approved: bool,
    pub(super) created_at: DateTime<Utc>,
}

impl StoryRow {
    pub(super) fn into_domain(self) -> Result<SuccessStory, String> {
        Ok(SuccessStory {
            id: self.id,
            user_id: user_id(&self.user_id)?,
            title: self.title,
            body: self.story,
            chapter_number: self.chapter_number,
            approved: self.approved,
            created_at: self.created_at,
        })
    }
}

/// Body of `GET /auth/v1/user`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUserDto {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUserDto {
    pub(super) fn into_domain(self) -> Result<SessionUser, String> {
        Ok(SessionUser {
            id: user_id(&self.id)?,
            email: self.email,
        })
    }
}
