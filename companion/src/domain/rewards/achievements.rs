//! Static achievement definitions and their evaluation.

use std::collections::BTreeSet;
use std::fmt;

use super::UserMetrics;

/// A badge earned when its predicate over [`UserMetrics`] holds.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub badge: &'static str,
    condition: fn(&UserMetrics) -> bool,
}

impl Achievement {
    /// Whether the metrics satisfy this achievement.
    pub fn is_met(&self, metrics: &UserMetrics) -> bool {
        (self.condition)(metrics)
    }
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("badge", &self.badge)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Achievement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Achievement {}

fn first_chapter(metrics: &UserMetrics) -> bool {
    metrics.chapters_completed >= 1
}

fn halfway_through(metrics: &UserMetrics) -> bool {
    metrics.reading_percent >= 50
}

fn finished_book(metrics: &UserMetrics) -> bool {
    metrics.reading_percent >= 100
}

fn first_exercise(metrics: &UserMetrics) -> bool {
    metrics.exercises_completed >= 1
}

fn five_exercises(metrics: &UserMetrics) -> bool {
    metrics.exercises_completed >= 5
}

fn ten_ratings(metrics: &UserMetrics) -> bool {
    metrics.prompts_rated >= 10
}

fn five_feedback(metrics: &UserMetrics) -> bool {
    metrics.feedback_given >= 5
}

fn first_goal(metrics: &UserMetrics) -> bool {
    metrics.goals_created >= 1
}

fn goal_done(metrics: &UserMetrics) -> bool {
    metrics.goals_completed >= 1
}

fn first_story(metrics: &UserMetrics) -> bool {
    metrics.stories_shared >= 1
}

fn three_day_streak(metrics: &UserMetrics) -> bool {
    metrics.streak_days >= 3
}

fn seven_day_streak(metrics: &UserMetrics) -> bool {
    metrics.streak_days >= 7
}

/// Every achievement a user can earn.
pub static ACHIEVEMENTS: [Achievement; 12] = [
    Achievement {
        id: "first_steps",
        name: "First Steps",
        description: "Complete your first chapter",
        badge: "seedling",
        condition: first_chapter,
    },
    Achievement {
        id: "halfway",
        name: "Halfway There",
        description: "Read half of the book",
        badge: "compass",
        condition: halfway_through,
    },
    Achievement {
        id: "bookworm",
        name: "Bookworm",
        description: "Complete every chapter",
        badge: "books",
        condition: finished_book,
    },
    Achievement {
        id: "exercise_starter",
        name: "Hands On",
        description: "Complete your first exercise",
        badge: "pencil",
        condition: first_exercise,
    },
    Achievement {
        id: "exercise_master",
        name: "Practice Makes Progress",
        description: "Complete five exercises",
        badge: "trophy",
        condition: five_exercises,
    },
    Achievement {
        id: "critic",
        name: "Prompt Critic",
        description: "Rate ten prompts",
        badge: "star",
        condition: ten_ratings,
    },
    Achievement {
        id: "helpful_voice",
        name: "Helpful Voice",
        description: "Submit feedback five times",
        badge: "megaphone",
        condition: five_feedback,
    },
    Achievement {
        id: "goal_setter",
        name: "Goal Setter",
        description: "Create your first goal",
        badge: "target",
        condition: first_goal,
    },
    Achievement {
        id: "goal_getter",
        name: "Goal Getter",
        description: "Complete a goal",
        badge: "medal",
        condition: goal_done,
    },
    Achievement {
        id: "storyteller",
        name: "Storyteller",
        description: "Share a success story",
        badge: "scroll",
        condition: first_story,
    },
    Achievement {
        id: "on_a_roll",
        name: "On a Roll",
        description: "Stay active three days in a row",
        badge: "flame",
        condition: three_day_streak,
    },
    Achievement {
        id: "week_warrior",
        name: "Week Warrior",
        description: "Stay active seven days in a row",
        badge: "lightning",
        condition: seven_day_streak,
    },
];

/// Look up an achievement definition by id.
pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|achievement| achievement.id == id)
}

/// Achievements whose predicate holds and whose id is not in `granted`.
///
/// Pure; callers persist the result. No ordering is guaranteed.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use companion::domain::{UserMetrics, evaluate_achievements};
///
/// let metrics = UserMetrics {
///     chapters_completed: 1,
///     ..UserMetrics::default()
/// };
/// let granted = BTreeSet::from(["first_steps".to_owned()]);
/// assert!(evaluate_achievements(&metrics, &granted).is_empty());
/// ```
pub fn evaluate_achievements(
    metrics: &UserMetrics,
    granted: &BTreeSet<String>,
) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|achievement| !granted.contains(achievement.id))
        .filter(|achievement| achievement.is_met(metrics))
        .collect()
}
