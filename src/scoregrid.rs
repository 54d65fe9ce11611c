//! Scoreline grids: joint probabilities of final scores, indexed by `(home goals, away goals)`.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::factorial::Factorial;
use crate::linear::Matrix;
use crate::poisson;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbableScore {
    pub score: Score,
    pub probability: f64,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
    GoalsUnder(u8),
    GoalsOver(u8),
    CorrectScore(Score),
}
impl Outcome {
    pub fn gather(&self, scoregrid: &Matrix) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_win(side, scoregrid),
            Outcome::Draw => Self::gather_draw(scoregrid),
            Outcome::GoalsUnder(goals) => Self::gather_goals_under(*goals, scoregrid),
            Outcome::GoalsOver(goals) => Self::gather_goals_over(*goals, scoregrid),
            Outcome::CorrectScore(score) => Self::gather_correct_score(score, scoregrid),
        }
    }

    fn gather_win(side: &Side, scoregrid: &Matrix) -> f64 {
        let mut prob = 0.0;
        match side {
            Side::Home => {
                for row in 1..scoregrid.rows() {
                    for col in 0..usize::min(row, scoregrid.cols()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
            Side::Away => {
                for col in 1..scoregrid.cols() {
                    for row in 0..usize::min(col, scoregrid.rows()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
        }
        prob
    }

    fn gather_draw(scoregrid: &Matrix) -> f64 {
        (0..usize::min(scoregrid.rows(), scoregrid.cols()))
            .map(|index| scoregrid[(index, index)])
            .sum()
    }

    fn gather_goals_over(goals: u8, scoregrid: &Matrix) -> f64 {
        let goals = goals as usize;
        scoregrid
            .cells()
            .filter(|&((row, col), _)| row + col > goals)
            .map(|(_, prob)| prob)
            .sum()
    }

    fn gather_goals_under(goals: u8, scoregrid: &Matrix) -> f64 {
        let goals = goals as usize;
        scoregrid
            .cells()
            .filter(|&((row, col), _)| row + col < goals)
            .map(|(_, prob)| prob)
            .sum()
    }

    fn gather_correct_score(score: &Score, scoregrid: &Matrix) -> f64 {
        let (row, col) = (score.home as usize, score.away as usize);
        if row < scoregrid.rows() && col < scoregrid.cols() {
            scoregrid[(row, col)]
        } else {
            0.0
        }
    }
}

/// Populates a square `scoregrid` from two independent Poisson goal rates. Cells beyond the grid's
/// bounds are truncated, so the grid sums to slightly less than one.
pub fn from_univariate_poisson(
    home_rate: f64,
    away_rate: f64,
    factorial: &impl Factorial,
    scoregrid: &mut Matrix,
) {
    assert_eq!(scoregrid.rows(), scoregrid.cols());
    let dim = scoregrid.rows();
    let mut home_probs = vec![0.0; dim];
    let mut away_probs = vec![0.0; dim];
    poisson::fill_univariate(home_rate, factorial, &mut home_probs);
    poisson::fill_univariate(away_rate, factorial, &mut away_probs);
    for (home_goals, home_prob) in home_probs.iter().enumerate() {
        for (away_goals, away_prob) in away_probs.iter().enumerate() {
            scoregrid[(home_goals, away_goals)] = home_prob * away_prob;
        }
    }
}

/// Lists every cell of the grid in descending order of probability. Equally likely scores keep
/// their ascending `(home, away)` order.
pub fn rank(scoregrid: &Matrix) -> Vec<ProbableScore> {
    let mut ranked = scoregrid
        .cells()
        .map(|((home, away), probability)| ProbableScore {
            score: Score::new(home as u8, away as u8),
            probability,
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    ranked
}

/// The most probable score; the first encountered in `(home, away)` order on ties.
pub fn most_likely(scoregrid: &Matrix) -> Score {
    let mut best = Score::nil_all();
    let mut best_prob = f64::NEG_INFINITY;
    for ((home, away), prob) in scoregrid.cells() {
        if prob > best_prob {
            best_prob = prob;
            best = Score::new(home as u8, away as u8);
        }
    }
    best
}
