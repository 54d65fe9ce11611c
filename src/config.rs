//! Tunable parameters of the prediction model.

use std::ops::RangeInclusive;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::history::FormWeights;
use crate::rating::DEFAULT_BASELINE;

/// Upper bound on the number of goals per side enumerated in a scoreline grid.
pub const MAX_GOALS_LIMIT: u8 = 100;

/// What to do when a queried team has no rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MissingTeamPolicy {
    /// Proceed with an all-default rating for the team.
    #[default]
    Substitute,

    /// Fail the prediction with [PredictError::MissingTeam](crate::engine::PredictError::MissingTeam).
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Power applied to the offense/defense ratio, in `1.0..=8.0`. `1.0` is the linear model;
    /// larger values increasingly amplify rating gaps.
    pub ratio_exponent: f64,

    /// Flat multiplier on the home side's expected goals at a non-neutral venue.
    pub home_boost: f64,

    /// Flat multiplier on the away side's expected goals at a non-neutral venue.
    pub away_penalty: f64,

    /// Caps the away side's venue factor at the home side's.
    pub floor_away_to_home: bool,

    /// Highest goal count per side in the scoreline grid.
    pub max_goals: u8,

    /// Highest permitted expected goals per side.
    pub lambda_cap: f64,

    /// Expected goals per side before the baseline is calibrated from match history.
    pub default_baseline: f64,

    pub missing_team: MissingTeamPolicy,

    pub head_to_head_points: f64,

    pub city_points: f64,

    pub tournament_points: f64,

    pub non_competitive_tournament: String,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        const VALID_EXPONENT: RangeInclusive<f64> = 1.0..=8.0;
        if !VALID_EXPONENT.contains(&self.ratio_exponent) {
            bail!("ratio exponent must be in the range {VALID_EXPONENT:?}");
        }
        for (name, value) in [
            ("home boost", self.home_boost),
            ("away penalty", self.away_penalty),
            ("lambda cap", self.lambda_cap),
            ("default baseline", self.default_baseline),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be a positive number, got {value}");
            }
        }
        for (name, value) in [
            ("head-to-head points", self.head_to_head_points),
            ("city points", self.city_points),
            ("tournament points", self.tournament_points),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a non-negative number, got {value}");
            }
        }
        if self.max_goals > MAX_GOALS_LIMIT {
            bail!("max goals must not exceed {MAX_GOALS_LIMIT}");
        }
        Ok(())
    }

    pub fn form_weights(&self) -> FormWeights {
        FormWeights {
            head_to_head: self.head_to_head_points,
            city: self.city_points,
            tournament: self.tournament_points,
            non_competitive_tournament: self.non_competitive_tournament.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ratio_exponent: 1.0,
            home_boost: 1.10,
            away_penalty: 1.0,
            floor_away_to_home: false,
            max_goals: 10,
            lambda_cap: 4.0,
            default_baseline: DEFAULT_BASELINE,
            missing_team: MissingTeamPolicy::default(),
            head_to_head_points: 3.0,
            city_points: 1.0,
            tournament_points: 1.0,
            non_competitive_tournament: "Friendly".into(),
        }
    }
}
