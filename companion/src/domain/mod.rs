//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define the companion's strongly typed records (ratings, rewards,
//! goals, exercises, stories, catalogue content) and the services that apply
//! business rules over the ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) with a user-facing notification.
//! - Tiered / DataSource: two-tier lookup results tagged with their source.
//! - Services: catalogue, rating, feedback, rewards, goal, exercise, story.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod exercises;
pub mod feedback;
pub mod goals;
pub mod lookup;
pub mod ports;
pub mod ratings;
pub mod rewards;
pub mod stories;
pub mod user;

mod catalogue_service;
mod exercise_service;
mod feedback_service;
mod goal_service;
mod rating_service;
mod rewards_service;
mod story_service;

pub use self::catalogue::{
    BookPrompt, Catalogue, Chapter, Exercise, ExerciseField, FieldConfigError, FieldKind,
    PromptTemplate, search_templates,
};
pub use self::catalogue_service::{CatalogueService, SeedReport, seed_remote_catalogue};
pub use self::error::{Error, ErrorCode, ErrorValidationError, Notification, Severity};
pub use self::exercise_service::ExerciseService;
pub use self::exercises::{
    Answers, ExerciseResponse, ResponseValidationError, normalise_answers, validate_response,
};
pub use self::feedback::{
    FEEDBACK_TEXT_MAX, Feedback, FeedbackCategory, FeedbackValidationError, NewFeedback,
    ParseFeedbackCategoryError, sort_feedback,
};
pub use self::feedback_service::FeedbackService;
pub use self::goal_service::{GoalService, MilestoneUpdate};
pub use self::goals::{
    GOAL_TITLE_MAX, Goal, GoalDraft, GoalStatus, GoalValidationError, Milestone, NewGoal,
    ParseGoalStatusError, goal_progress_percent, validate_title,
};
pub use self::lookup::{DataSource, Tiered, with_fallback};
pub use self::rating_service::RatingService;
pub use self::ratings::{
    DimensionScore, DimensionScores, ParsePromptKindError, PromptKind, PromptRating, PromptRef,
    QuickRating, QuickRatingSummary, RATING_COMMENT_MAX, RATING_WEIGHTS, RatingDraft, RatingStats,
    RatingValidationError, RatingWeights,
};
pub use self::rewards::{
    ACHIEVEMENTS, Achievement, LEVEL_TABLE, Level, LevelProgress, LevelTier,
    ParseRewardActionError, RewardAction, RewardEntry, RewardSummary, UserMetrics,
    evaluate_achievements, find_achievement, granted_achievement_ids, level_for_points,
    level_progress, reading_percent, total_points,
};
pub use self::rewards_service::{AwardOutcome, ReadingProgress, RewardsService};
pub use self::stories::{NewStory, StoryValidationError, SuccessStory};
pub use self::story_service::StoryService;
pub use self::user::{SessionUser, UserId, UserValidationError};

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use companion::domain::{Error, ServiceResult};
///
/// fn lookup() -> ServiceResult<u32> {
///     Err(Error::not_found("no such chapter"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ServiceResult<T> = Result<T, Error>;
