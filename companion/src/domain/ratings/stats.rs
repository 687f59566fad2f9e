//! Aggregate statistics over a prompt's ratings.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DimensionScore, DimensionScores, round_to_hundredths};

/// Aggregated view of every rating for one prompt.
///
/// All averages are arithmetic means rounded to two decimals. The
/// distribution maps each star bucket (1–5) to the number of ratings whose
/// overall score rounds to it; empty buckets are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total: u32,
    pub average_overall: f64,
    pub average_effectiveness: f64,
    pub average_clarity: f64,
    pub average_time_value: f64,
    pub distribution: BTreeMap<u8, u32>,
}

impl RatingStats {
    /// Stats for a prompt nobody has rated yet.
    pub fn empty() -> Self {
        Self {
            total: 0,
            average_overall: 0.0,
            average_effectiveness: 0.0,
            average_clarity: 0.0,
            average_time_value: 0.0,
            distribution: BTreeMap::new(),
        }
    }

    /// Aggregate a set of ratings.
    ///
    /// # Examples
    /// ```
    /// use companion::domain::{DimensionScores, RatingStats};
    ///
    /// let ratings = [
    ///     DimensionScores::new(5, 5, 5).expect("valid"),
    ///     DimensionScores::new(1, 1, 1).expect("valid"),
    /// ];
    /// let stats = RatingStats::aggregate(&ratings);
    /// assert_eq!(stats.total, 2);
    /// assert_eq!(stats.average_overall, 3.0);
    /// ```
    pub fn aggregate<'a>(ratings: impl IntoIterator<Item = &'a DimensionScores>) -> Self {
        let mut total = 0_u32;
        let mut sum_overall = 0.0;
        let mut sum_effectiveness = 0.0;
        let mut sum_clarity = 0.0;
        let mut sum_time_value = 0.0;
        let mut distribution = BTreeMap::new();

        for scores in ratings {
            let overall = scores.overall();
            total += 1;
            sum_overall += overall;
            sum_effectiveness += f64::from(scores.effectiveness.get());
            sum_clarity += f64::from(scores.clarity.get());
            sum_time_value += f64::from(scores.time_value.get());
            *distribution.entry(star_bucket(overall)).or_insert(0) += 1;
        }

        if total == 0 {
            return Self::empty();
        }

        let count = f64::from(total);
        Self {
            total,
            average_overall: round_to_hundredths(sum_overall / count),
            average_effectiveness: round_to_hundredths(sum_effectiveness / count),
            average_clarity: round_to_hundredths(sum_clarity / count),
            average_time_value: round_to_hundredths(sum_time_value / count),
            distribution,
        }
    }

    /// Share of ratings in a star bucket as a percentage, 0 when empty.
    pub fn bucket_percentage(&self, stars: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self.distribution.get(&stars).copied().unwrap_or(0);
        round_to_hundredths(f64::from(count) * 100.0 / f64::from(self.total))
    }
}

/// Round an overall score to the nearest whole star within 1–5.
fn star_bucket(overall: f64) -> u8 {
    let rounded = overall
        .round()
        .clamp(f64::from(DimensionScore::MIN), f64::from(DimensionScore::MAX));
    // Clamped to 1..=5 above, so the cast is lossless.
    rounded as u8
}

/// Count and mean of quick ratings for one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRatingSummary {
    pub count: u32,
    pub average: f64,
}

impl QuickRatingSummary {
    /// Summarise a set of star scores; zero scores yield a zero average.
    pub fn from_scores(scores: impl IntoIterator<Item = DimensionScore>) -> Self {
        let (count, sum) = scores
            .into_iter()
            .fold((0_u32, 0_u32), |(count, sum), score| {
                (count + 1, sum + u32::from(score.get()))
            });
        if count == 0 {
            return Self {
                count: 0,
                average: 0.0,
            };
        }
        Self {
            count,
            average: round_to_hundredths(f64::from(sum) / f64::from(count)),
        }
    }
}
