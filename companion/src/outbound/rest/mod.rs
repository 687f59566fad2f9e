//! Adapters that speak to the hosted PostgREST-style backend.
//!
//! Every repository shares one [`RestClient`], which owns the HTTP client,
//! the base URL, and the credentials. Repositories translate
//! [`RestError`] into their port's error type.

mod auth_session;
mod catalogue_seed_repository;
mod client;
mod content_repository;
mod dto;
mod error_mapping;
mod exercise_response_repository;
mod feedback_repository;
mod goal_repository;
mod query;
mod rating_repository;
mod reward_ledger;
mod story_repository;
#[cfg(test)]
mod test_server;

pub use auth_session::RestAuthSession;
pub use catalogue_seed_repository::RestCatalogueSeedRepository;
pub use client::{RestClient, RestError};
pub use content_repository::RestContentRepository;
pub use dto::AuthUserDto;
pub use exercise_response_repository::RestExerciseResponseRepository;
pub use feedback_repository::RestFeedbackRepository;
pub use goal_repository::RestGoalRepository;
pub use query::{Direction, TableQuery};
pub use rating_repository::RestRatingRepository;
pub use reward_ledger::RestRewardLedger;
pub use story_repository::RestStoryRepository;
