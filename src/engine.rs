//! Expected goals estimation and scoreline prediction.
//!
//! Each side's expected goals (λ) starts from the ratio of its offense to the opponent's defense,
//! scaled by the calibrated baseline, then is adjusted for the venue and for prior meetings
//! before being capped. The two rates parameterise independent Poisson distributions whose
//! product forms the scoreline grid.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, MissingTeamPolicy};
use crate::factorial::Lookup;
use crate::history::{self, FormFilter, FormPoints, MatchRecord};
use crate::linear::Matrix;
use crate::probs::SliceExt;
use crate::rating::{RatingStore, TeamRating, DEFAULT_RATING};
use crate::scoregrid::{self, Outcome, ProbableScore, Score, Side};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionQuery {
    pub home: String,
    pub away: String,
    pub neutral: bool,
    pub tournament: Option<String>,
    pub city: Option<String>,
}
impl PredictionQuery {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            neutral: false,
            tournament: None,
            city: None,
        }
    }

    pub fn with_neutral(mut self, neutral: bool) -> Self {
        self.neutral = neutral;
        self
    }

    pub fn with_tournament(mut self, tournament: impl Into<String>) -> Self {
        self.tournament = Some(tournament.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    fn form_filter(&self) -> FormFilter {
        FormFilter {
            tournament: self.tournament.as_deref(),
            city: self.city.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub home_lambda: f64,
    pub away_lambda: f64,
    /// Every scoreline in the grid, most probable first.
    pub scorelines: Vec<ProbableScore>,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub most_likely: Score,
    /// Form points from prior meetings, if the historical adjustment was applied.
    pub form: Option<FormPoints>,
    /// Queried teams that had no rating and were predicted with default ratings.
    pub substituted: Vec<String>,
    #[serde(skip)]
    pub scoregrid: Matrix,
}
impl PredictionResult {
    /// Probability of a given outcome, evaluated over the (unnormalised) scoreline grid.
    pub fn gather(&self, outcome: &Outcome) -> f64 {
        outcome.gather(&self.scoregrid)
    }

    pub fn win(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_win,
            Side::Away => self.away_win,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictError {
    #[error("team not found: {0}")]
    MissingTeam(String),
}

/// Expected goals for either side, computed in stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambdas {
    pub home: f64,
    pub away: f64,
}
impl Lambdas {
    fn scale(&mut self, home: f64, away: f64) {
        self.home *= home;
        self.away *= away;
    }

    fn cap(&mut self, cap: f64) {
        self.home = f64::min(self.home, cap);
        self.away = f64::min(self.away, cap);
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    factorial: Lookup,
}
impl Engine {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn predict(
        &self,
        ratings: &RatingStore,
        history: &[MatchRecord],
        query: &PredictionQuery,
    ) -> Result<PredictionResult, PredictError> {
        let mut substituted = vec![];
        let home = self.resolve(ratings, &query.home, &mut substituted)?;
        let away = self.resolve(ratings, &query.away, &mut substituted)?;
        let baseline = ratings.baseline().unwrap_or(self.config.default_baseline);

        let mut lambdas = Lambdas {
            home: self.base_lambda(&home, &away, baseline),
            away: self.base_lambda(&away, &home, baseline),
        };
        debug!("base lambdas: {lambdas:?}, baseline: {baseline:.3}");

        if !query.neutral {
            let (home_factor, away_factor) = self.venue_factors(&home, &away);
            lambdas.scale(home_factor, away_factor);
            debug!("venue-adjusted lambdas: {lambdas:?}");
        }

        let filter = query.form_filter();
        let form = if history.is_empty() || filter.is_empty() {
            None
        } else {
            let form = history::form_points(
                history,
                &query.home,
                &query.away,
                &filter,
                &self.config.form_weights(),
            );
            lambdas.scale(form.multiplier(Side::Home), form.multiplier(Side::Away));
            debug!("form: {form:?}, form-adjusted lambdas: {lambdas:?}");
            Some(form)
        };

        lambdas.cap(self.config.lambda_cap);
        debug!("capped lambdas: {lambdas:?}");

        let mut scoregrid = Matrix::square(self.config.max_goals);
        scoregrid::from_univariate_poisson(lambdas.home, lambdas.away, &self.factorial, &mut scoregrid);

        let mut outcomes = [
            Outcome::Win(Side::Home).gather(&scoregrid),
            Outcome::Draw.gather(&scoregrid),
            Outcome::Win(Side::Away).gather(&scoregrid),
        ];
        outcomes.normalise(1.0);
        let [home_win, draw, away_win] = outcomes;

        Ok(PredictionResult {
            home_lambda: lambdas.home,
            away_lambda: lambdas.away,
            scorelines: scoregrid::rank(&scoregrid),
            home_win,
            draw,
            away_win,
            most_likely: scoregrid::most_likely(&scoregrid),
            form,
            substituted,
            scoregrid,
        })
    }

    fn resolve(
        &self,
        ratings: &RatingStore,
        team: &str,
        substituted: &mut Vec<String>,
    ) -> Result<TeamRating, PredictError> {
        match ratings.get(team) {
            Some(rating) => Ok(*rating),
            None => match self.config.missing_team {
                MissingTeamPolicy::Substitute => {
                    warn!("no rating for {team}, substituting defaults");
                    substituted.push(team.to_string());
                    Ok(TeamRating::default())
                }
                MissingTeamPolicy::Reject => Err(PredictError::MissingTeam(team.to_string())),
            },
        }
    }

    /// `(offense / opponent defense)^exponent * baseline`. A ratio that is not a positive, finite
    /// number, or a baseline of zero, yields zero expected goals. An overflowing rate is capped.
    fn base_lambda(&self, attacker: &TeamRating, defender: &TeamRating, baseline: f64) -> f64 {
        let ratio = attacker.offense / defender.defense;
        if !ratio.is_finite() || ratio <= 0.0 {
            return 0.0;
        }
        let lambda = ratio.powf(self.config.ratio_exponent) * baseline;
        if lambda.is_nan() || lambda <= 0.0 {
            0.0
        } else if lambda.is_infinite() {
            self.config.lambda_cap
        } else {
            lambda
        }
    }

    fn venue_factors(&self, home: &TeamRating, away: &TeamRating) -> (f64, f64) {
        let home_factor = non_negative(home.home / DEFAULT_RATING);
        let mut away_factor = non_negative(away.away / DEFAULT_RATING);
        if self.config.floor_away_to_home {
            away_factor = f64::min(away_factor, home_factor);
        }
        (
            home_factor * self.config.home_boost,
            away_factor * self.config.away_penalty,
        )
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl TryFrom<Config> for Engine {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        let factorial = Lookup::up_to(config.max_goals);
        Ok(Self { config, factorial })
    }
}
