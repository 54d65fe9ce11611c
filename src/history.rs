//! Historical match results and the head-to-head form derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::csv::header_position;
use crate::rating::name_key;
use crate::scoregrid::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub tournament: String,
    pub city: String,
}
impl MatchRecord {
    /// Extracts a record from raw `fields` using the given column layout. Returns `None` if either
    /// team name is absent. Scores that are not non-negative integers are retained as `None`.
    pub fn parse<F: AsRef<str>>(fields: &[F], columns: &MatchColumns) -> Option<Self> {
        let field = |index: usize| {
            fields
                .get(index)
                .map(|field| field.as_ref().trim())
                .unwrap_or_default()
        };
        let home_team = field(columns.home_team);
        let away_team = field(columns.away_team);
        if home_team.is_empty() || away_team.is_empty() {
            return None;
        }
        Some(Self {
            date: field(columns.date).to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score: field(columns.home_score).parse().ok(),
            away_score: field(columns.away_score).parse().ok(),
            tournament: field(columns.tournament).to_string(),
            city: field(columns.city).to_string(),
        })
    }

    /// Both scores, if both are valid.
    pub fn scores(&self) -> Option<(u16, u16)> {
        Some((self.home_score?, self.away_score?))
    }

    /// The match date, if it is in `YYYY-MM-DD` form.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// The winning team's name, if the match has valid scores and was not drawn.
    pub fn winner(&self) -> Option<&str> {
        let (home_score, away_score) = self.scores()?;
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Some(&self.home_team),
            std::cmp::Ordering::Less => Some(&self.away_team),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Positions of the match fields within a raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchColumns {
    pub date: usize,
    pub home_team: usize,
    pub away_team: usize,
    pub home_score: usize,
    pub away_score: usize,
    pub tournament: usize,
    pub city: usize,
}
impl MatchColumns {
    /// Locates each field by its header name, falling back to the default position for any header
    /// that is not present.
    pub fn from_headers<H: AsRef<str>>(headers: &[H]) -> Self {
        let defaults = Self::default();
        let find = |name: &str, default: usize| header_position(headers, &[name]).unwrap_or(default);
        Self {
            date: find("date", defaults.date),
            home_team: find("home_team", defaults.home_team),
            away_team: find("away_team", defaults.away_team),
            home_score: find("home_score", defaults.home_score),
            away_score: find("away_score", defaults.away_score),
            tournament: find("tournament", defaults.tournament),
            city: find("city", defaults.city),
        }
    }
}

impl Default for MatchColumns {
    /// `date, home_team, away_team, home_score, away_score, tournament, city`
    fn default() -> Self {
        Self {
            date: 0,
            home_team: 1,
            away_team: 2,
            home_score: 3,
            away_score: 4,
            tournament: 5,
            city: 6,
        }
    }
}

/// Parses raw rows into match records, dropping rows without both team names.
pub fn load<R, F>(rows: impl IntoIterator<Item = R>, columns: &MatchColumns) -> Vec<MatchRecord>
where
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut skipped = 0;
    let records = rows
        .into_iter()
        .filter_map(|row| {
            let record = MatchRecord::parse(row.as_ref(), columns);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect::<Vec<_>>();
    debug!("loaded {} match records, skipped {skipped} rows", records.len());
    records
}

/// Points awarded to a team for each kind of prior win over its opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormWeights {
    pub head_to_head: f64,
    pub city: f64,
    pub tournament: f64,
    /// Wins in this tournament never earn tournament points.
    pub non_competitive_tournament: String,
}

/// Narrows the city and tournament form to those of the match being predicted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormFilter<'a> {
    pub tournament: Option<&'a str>,
    pub city: Option<&'a str>,
}
impl FormFilter<'_> {
    pub fn is_empty(&self) -> bool {
        self.tournament.is_none() && self.city.is_none()
    }
}

/// Form points accumulated by either side from their previous meetings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FormPoints {
    pub home: f64,
    pub away: f64,
    /// Previous meetings with valid scores, regardless of venue order.
    pub meetings: usize,
}
impl FormPoints {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// The multiplier applied to a side's expected goals: one percent per point.
    pub fn multiplier(&self, side: Side) -> f64 {
        1.0 + self.get(side) / 100.0
    }
}

/// Scans the previous meetings between `home` and `away` (in either venue order), awarding each
/// winner head-to-head points, plus city and tournament points where the meeting took place in the
/// filtered city or tournament. A team paired with itself has no meetings.
pub fn form_points(
    history: &[MatchRecord],
    home: &str,
    away: &str,
    filter: &FormFilter,
    weights: &FormWeights,
) -> FormPoints {
    let (home_key, away_key) = (name_key(home), name_key(away));
    let city = filter.city.map(name_key);
    let tournament = filter.tournament.map(name_key);
    let non_competitive = name_key(&weights.non_competitive_tournament);

    let mut points = FormPoints::default();
    if home_key == away_key {
        debug!("{home} cannot meet itself, no form points awarded");
        return points;
    }
    for record in history {
        let (record_home, record_away) = (name_key(&record.home_team), name_key(&record.away_team));
        let is_meeting = record_home == home_key && record_away == away_key
            || record_home == away_key && record_away == home_key;
        if !is_meeting || record.scores().is_none() {
            continue;
        }
        points.meetings += 1;

        let Some(winner) = record.winner().map(name_key) else {
            continue;
        };
        let mut awarded = weights.head_to_head;
        if city.as_ref().is_some_and(|city| *city == name_key(&record.city)) {
            awarded += weights.city;
        }
        let record_tournament = name_key(&record.tournament);
        if record_tournament != non_competitive
            && tournament.as_ref().is_some_and(|tournament| *tournament == record_tournament)
        {
            awarded += weights.tournament;
        }

        if winner == home_key {
            points.home += awarded;
        } else {
            points.away += awarded;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    fn weights() -> FormWeights {
        FormWeights {
            head_to_head: 3.0,
            city: 1.0,
            tournament: 1.0,
            non_competitive_tournament: "Friendly".into(),
        }
    }

    fn record(home: &str, away: &str, scores: (&str, &str), tournament: &str, city: &str) -> MatchRecord {
        MatchRecord::parse(
            &["2022-11-20", home, away, scores.0, scores.1, tournament, city],
            &MatchColumns::default(),
        )
        .unwrap()
    }

    #[test]
    fn parse_positional_row() {
        let record = record("England", "Scotland", ("0", "0"), "Friendly", "Glasgow");
        assert_eq!("England", record.home_team);
        assert_eq!("Scotland", record.away_team);
        assert_eq!(Some((0, 0)), record.scores());
        assert_eq!("Glasgow", record.city);
        assert_eq!(NaiveDate::from_ymd_opt(2022, 11, 20), record.date());
        assert_eq!(None, record.winner());
    }

    #[test]
    fn parse_requires_both_teams() {
        let columns = MatchColumns::default();
        assert!(MatchRecord::parse(&["2020-01-01", "Fiji", ""], &columns).is_none());
        assert!(MatchRecord::parse(&["2020-01-01"], &columns).is_none());
        let partial = MatchRecord::parse(&["2020-01-01", "Fiji", "Tonga"], &columns).unwrap();
        assert_eq!(None, partial.scores());
        assert_eq!("", partial.city);
    }

    #[test]
    fn parse_rejects_invalid_scores() {
        let record = record("A", "B", ("2", "two"), "", "");
        assert_eq!(Some(2), record.home_score);
        assert_eq!(None, record.away_score);
        assert_eq!(None, record.scores());
        assert_eq!(None, record.winner());
        assert_eq!(None, self::record("A", "B", ("-1", "0"), "", "").home_score);
    }

    #[test]
    fn columns_from_headers() {
        let headers = ["home_score", "away_score", "Home_Team", "away_team", "city", "date"];
        let columns = MatchColumns::from_headers(&headers);
        assert_eq!(0, columns.home_score);
        assert_eq!(1, columns.away_score);
        assert_eq!(2, columns.home_team);
        assert_eq!(3, columns.away_team);
        assert_eq!(4, columns.city);
        assert_eq!(5, columns.date);
        assert_eq!(MatchColumns::default().tournament, columns.tournament);

        let record = MatchRecord::parse(&["3", "1", "Italy", "Malta", "Rome", "2021-03-01"], &columns).unwrap();
        assert_eq!(Some("Italy"), record.winner());
        assert_eq!("Rome", record.city);
    }

    #[test]
    fn load_skips_unusable_rows() {
        let rows = vec![
            vec!["2020-01-01", "Fiji", "Tonga", "1", "0", "Pacific Games", "Suva"],
            vec!["2020-01-02", "", "Tonga", "1", "0", "Pacific Games", "Suva"],
        ];
        let records = load(rows, &MatchColumns::default());
        assert_eq!(1, records.len());
    }

    #[test]
    fn form_points_head_to_head_only() {
        let history = vec![
            record("Brazil", "Argentina", ("2", "0"), "Copa América", "Rio"),
            record("Argentina", "Brazil", ("1", "0"), "Copa América", "Rio"),
            record("Argentina", "Brazil", ("3", "1"), "Friendly", "Rio"),
            record("Brazil", "Argentina", ("1", "1"), "Friendly", "Rio"),
            record("Brazil", "Chile", ("5", "0"), "Copa América", "Rio"),
        ];
        let points = form_points(&history, "brazil", "ARGENTINA", &FormFilter::default(), &weights());
        assert_eq!(4, points.meetings);
        assert_eq!(3.0, points.home);
        assert_eq!(6.0, points.away);
        assert_float_relative_eq!(1.03, points.multiplier(Side::Home));
        assert_float_relative_eq!(1.06, points.multiplier(Side::Away));
    }

    #[test]
    fn form_points_city_and_tournament() {
        let history = vec![
            record("Brazil", "Argentina", ("2", "0"), "Copa América", "Rio"),
            record("Argentina", "Brazil", ("1", "0"), "Copa América", "Buenos Aires"),
            record("Argentina", "Brazil", ("3", "1"), "Friendly", "Rio"),
        ];
        let filter = FormFilter {
            tournament: Some("copa américa"),
            city: Some("Rio"),
        };
        let points = form_points(&history, "Brazil", "Argentina", &filter, &weights());
        assert_eq!(3, points.meetings);
        assert_eq!(5.0, points.home);
        assert_eq!(4.0 + 4.0, points.away);
    }

    #[test]
    fn form_points_never_for_non_competitive_tournament() {
        let history = vec![record("Japan", "Korea Republic", ("1", "0"), "Friendly", "Tokyo")];
        let filter = FormFilter {
            tournament: Some("Friendly"),
            city: None,
        };
        let points = form_points(&history, "Japan", "Korea Republic", &filter, &weights());
        assert_eq!(3.0, points.home);
        assert_eq!(0.0, points.away);
    }

    #[test]
    fn form_points_skip_invalid_scores() {
        let history = vec![record("Japan", "Korea Republic", ("1", "?"), "", "")];
        let points = form_points(&history, "Japan", "Korea Republic", &FormFilter::default(), &weights());
        assert_eq!(FormPoints::default(), points);
        assert!(FormFilter::default().is_empty());
    }

    #[test]
    fn form_points_for_team_against_itself() {
        let history = vec![
            record("Ghana", "Ghana", ("0", "3"), "AFCON", "Accra"),
            record("Ghana", "Nigeria", ("2", "0"), "AFCON", "Accra"),
        ];
        let filter = FormFilter {
            tournament: Some("AFCON"),
            city: Some("Accra"),
        };
        let points = form_points(&history, "Ghana", "GHANA", &filter, &weights());
        assert_eq!(FormPoints::default(), points);
    }
}
