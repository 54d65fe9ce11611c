//! Scoreline prediction for international soccer fixtures from Elo-style team ratings.
//! Expected goals are derived from offensive and defensive ratings, adjusted for the venue and
//! for prior meetings, and fed through independent Poisson distributions to price every
//! scoreline along with the match result and goals markets.

pub mod config;
pub mod csv;
pub mod engine;
pub mod factorial;
pub mod file;
pub mod history;
pub mod linear;
pub mod poisson;
pub mod print;
pub mod probs;
pub mod rating;
pub mod scoregrid;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
