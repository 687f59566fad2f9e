//! Domain ports defining the edges of the hexagon.
//!
//! Each trait exposes a typed error so adapters map transport and decode
//! failures into predictable variants. Every port ships a `Fixture*`
//! implementation for wiring that does not exercise it, and a mockall mock
//! under `cfg(test)`.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_session;
mod catalogue_seed_repository;
mod content_repository;
mod exercise_response_repository;
mod feedback_repository;
mod goal_repository;
mod rating_repository;
mod reward_ledger;
mod story_repository;

#[cfg(test)]
pub use auth_session::MockAuthSession;
pub use auth_session::{AuthSession, AuthSessionError, FixtureAuthSession};
#[cfg(test)]
pub use catalogue_seed_repository::MockCatalogueSeedRepository;
pub use catalogue_seed_repository::{
    CatalogueSeedError, CatalogueSeedRepository, FixtureCatalogueSeedRepository,
};
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::{
    ContentRepository, ContentRepositoryError, FixtureContentRepository,
};
#[cfg(test)]
pub use exercise_response_repository::MockExerciseResponseRepository;
pub use exercise_response_repository::{
    ExerciseResponseRepository, ExerciseResponseRepositoryError,
    FixtureExerciseResponseRepository,
};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{
    FeedbackRepository, FeedbackRepositoryError, FixtureFeedbackRepository,
};
#[cfg(test)]
pub use goal_repository::MockGoalRepository;
pub use goal_repository::{FixtureGoalRepository, GoalRepository, GoalRepositoryError};
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::{FixtureRatingRepository, RatingRepository, RatingRepositoryError};
#[cfg(test)]
pub use reward_ledger::MockRewardLedger;
pub use reward_ledger::{FixtureRewardLedger, RewardLedger, RewardLedgerError};
#[cfg(test)]
pub use story_repository::MockStoryRepository;
pub use story_repository::{FixtureStoryRepository, StoryRepository, StoryRepositoryError};
