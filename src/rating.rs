//! Team strength ratings and the global goal baseline they are anchored to.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::csv::header_position;
use crate::history::MatchRecord;

/// Rating assumed for any missing, unparseable or unknown value.
pub const DEFAULT_RATING: f64 = 1500.0;

/// Goals per team per match before any calibration.
pub const DEFAULT_BASELINE: f64 = 1.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub overall: f64,
    pub offense: f64,
    pub defense: f64,
    pub home: f64,
    pub away: f64,
}
impl TeamRating {
    /// Parses the rating columns of a raw row laid out per `columns`. Absent or unparseable
    /// values become [DEFAULT_RATING].
    pub fn parse<F: AsRef<str>>(fields: &[F], columns: &RatingColumns) -> Self {
        let field = |index: usize| parse_rating(fields.get(index).map(AsRef::as_ref));
        Self {
            overall: field(columns.overall),
            offense: field(columns.offense),
            defense: field(columns.defense),
            home: field(columns.home),
            away: field(columns.away),
        }
    }
}

impl Default for TeamRating {
    fn default() -> Self {
        Self {
            overall: DEFAULT_RATING,
            offense: DEFAULT_RATING,
            defense: DEFAULT_RATING,
            home: DEFAULT_RATING,
            away: DEFAULT_RATING,
        }
    }
}

fn parse_rating(field: Option<&str>) -> f64 {
    field
        .and_then(|field| field.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_RATING)
}

/// Positions of the team name and its ratings within a raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingColumns {
    pub team: usize,
    pub overall: usize,
    pub offense: usize,
    pub defense: usize,
    pub home: usize,
    pub away: usize,
}
impl RatingColumns {
    /// Locates each field by its header name, falling back to the default position for any header
    /// that is not present.
    pub fn from_headers<H: AsRef<str>>(headers: &[H]) -> Self {
        let defaults = Self::default();
        let find = |names: &[&str], default: usize| header_position(headers, names).unwrap_or(default);
        Self {
            team: find(&["team_name", "team"], defaults.team),
            overall: find(&["overall_elo"], defaults.overall),
            offense: find(&["offensive_elo"], defaults.offense),
            defense: find(&["defensive_elo"], defaults.defense),
            home: find(&["home_elo"], defaults.home),
            away: find(&["away_elo"], defaults.away),
        }
    }

    fn ratings(&self) -> [usize; 5] {
        [self.overall, self.offense, self.defense, self.home, self.away]
    }
}

impl Default for RatingColumns {
    /// `team_name, overall_elo, offensive_elo, defensive_elo, home_elo, away_elo`
    fn default() -> Self {
        Self {
            team: 0,
            overall: 1,
            offense: 2,
            defense: 3,
            home: 4,
            away: 5,
        }
    }
}

/// The key under which team, city and tournament names are compared.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    rating: TeamRating,
}

/// Outcome of a baseline calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    /// Number of matches with valid scores that took part.
    pub matches: usize,
    /// The calibrated baseline, or `None` if no match took part.
    pub baseline: Option<f64>,
}

/// Ratings keyed by case-insensitive team name, together with the calibrated goal baseline.
///
/// A store is populated once via [RatingStore::load] and replaced wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingStore {
    entries: FxHashMap<String, Entry>,
    baseline: Option<f64>,
}
impl RatingStore {
    /// Builds a store from raw rating rows laid out as `team_name, overall_elo, offensive_elo,
    /// defensive_elo, home_elo, away_elo`.
    pub fn load<R, F>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: AsRef<[F]>,
        F: AsRef<str>,
    {
        Self::load_with(rows, &RatingColumns::default())
    }

    /// Builds a store from raw rating rows laid out per `columns`. Rows without a team name or
    /// without any rating column are skipped. When a team appears more than once, its first row
    /// is kept.
    pub fn load_with<R, F>(rows: impl IntoIterator<Item = R>, columns: &RatingColumns) -> Self
    where
        R: AsRef<[F]>,
        F: AsRef<str>,
    {
        let mut entries = FxHashMap::default();
        let mut skipped = 0;
        for row in rows {
            let fields = row.as_ref();
            let name = fields
                .get(columns.team)
                .map(|name| name.as_ref().trim())
                .unwrap_or_default();
            let has_ratings = columns.ratings().iter().any(|&index| index < fields.len());
            if !has_ratings || name.is_empty() {
                skipped += 1;
                continue;
            }

            let key = name_key(name);
            if entries.contains_key(&key) {
                debug!("ignoring duplicate rating row for {name}");
                continue;
            }
            let rating = TeamRating::parse(fields, columns);
            entries.insert(
                key,
                Entry {
                    name: name.to_string(),
                    rating,
                },
            );
        }
        debug!("loaded {} team ratings, skipped {skipped} rows", entries.len());
        Self {
            entries,
            baseline: None,
        }
    }

    /// Presets the baseline. A negative or non-finite baseline is ignored, leaving the store
    /// uncalibrated.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        if baseline.is_finite() && baseline >= 0.0 {
            self.baseline = Some(baseline);
        } else {
            warn!("ignoring invalid baseline {baseline}");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TeamRating> {
        self.entries.get(&name_key(name)).map(|entry| &entry.rating)
    }

    /// The rating of the named team, or an all-[DEFAULT_RATING] rating if the team is unknown.
    pub fn lookup(&self, name: &str) -> TeamRating {
        self.get(name).copied().unwrap_or_default()
    }

    /// Team names as they were loaded, sorted alphabetically.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams = self
            .entries
            .values()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        teams.sort_unstable();
        teams
    }

    /// The calibrated baseline, if calibration has found at least one valid match.
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Sets the baseline to the mean number of goals scored per team per match across all
    /// matches with valid scores. The baseline is left unchanged if there are none.
    pub fn calibrate_baseline(&mut self, history: &[MatchRecord]) -> Calibration {
        self.calibrate_baseline_since(history, None)
    }

    /// As [RatingStore::calibrate_baseline], restricted to matches played on or after `since`.
    /// Matches without a parseable date are excluded whenever `since` is given.
    pub fn calibrate_baseline_since(
        &mut self,
        history: &[MatchRecord],
        since: Option<NaiveDate>,
    ) -> Calibration {
        let mut total_goals = 0u64;
        let mut matches = 0usize;
        for record in history {
            if let Some(since) = since {
                match record.date() {
                    Some(date) if date >= since => {}
                    _ => continue,
                }
            }
            if let Some((home_score, away_score)) = record.scores() {
                total_goals += home_score as u64 + away_score as u64;
                matches += 1;
            }
        }

        if matches == 0 {
            warn!("no valid matches to calibrate against, baseline unchanged");
            return Calibration {
                matches,
                baseline: None,
            };
        }

        let baseline = total_goals as f64 / (2 * matches) as f64;
        info!("model calibrated over {matches} matches, baseline lambda: {baseline:.3}");
        self.baseline = Some(baseline);
        Calibration {
            matches,
            baseline: Some(baseline),
        }
    }
}
