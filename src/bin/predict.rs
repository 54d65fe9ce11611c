use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use scorecast::config::Config;
use scorecast::csv::CsvTable;
use scorecast::engine::{Engine, PredictionQuery};
use scorecast::file::ReadJsonFile;
use scorecast::history::{self, MatchColumns, MatchRecord};
use scorecast::print::{tabulate_outcomes, tabulate_scorelines};
use scorecast::rating::{RatingColumns, RatingStore};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file of team ratings
    #[clap(short = 'r', long)]
    ratings: PathBuf,

    /// CSV file of historical match results
    #[clap(short = 'm', long)]
    results: Option<PathBuf>,

    /// home team
    #[clap(long)]
    home: Option<String>,

    /// away team
    #[clap(long)]
    away: Option<String>,

    /// the match is played at a neutral venue
    #[clap(long)]
    neutral: bool,

    /// tournament the match is played in
    #[clap(short = 't', long)]
    tournament: Option<String>,

    /// city the match is played in
    #[clap(short = 'c', long)]
    city: Option<String>,

    /// calibrate the baseline only on results since this date (YYYY-MM-DD)
    #[clap(short = 's', long)]
    since: Option<String>,

    /// JSON file of model parameters
    #[clap(short = 'f', long)]
    config: Option<PathBuf>,

    /// override the offense/defense ratio exponent
    #[clap(short = 'e', long)]
    exponent: Option<f64>,

    /// override the maximum number of goals per side
    #[clap(short = 'g', long)]
    max_goals: Option<u8>,

    /// number of most likely scorelines to print
    #[clap(long, default_value_t = 10)]
    top: usize,

    /// print the prediction as JSON
    #[clap(long)]
    json: bool,

    /// list the rated teams and exit
    #[clap(long)]
    list_teams: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.list_teams && (self.home.is_none() || self.away.is_none()) {
            bail!("both --home and --away must be specified");
        }
        if self.since.is_some() && self.results.is_none() {
            bail!("--since requires --results");
        }
        self.since()?;
        Ok(())
    }

    fn since(&self) -> anyhow::Result<Option<NaiveDate>> {
        match &self.since {
            None => Ok(None),
            Some(since) => match NaiveDate::parse_from_str(since, "%Y-%m-%d") {
                Ok(date) => Ok(Some(date)),
                Err(err) => bail!("invalid --since date '{since}': {err}"),
            },
        }
    }

    fn query(&self) -> anyhow::Result<PredictionQuery> {
        let (Some(home), Some(away)) = (&self.home, &self.away) else {
            bail!("both --home and --away must be specified");
        };
        let mut query = PredictionQuery::new(home, away).with_neutral(self.neutral);
        if let Some(tournament) = &self.tournament {
            query = query.with_tournament(tournament);
        }
        if let Some(city) = &self.city {
            query = query.with_city(city);
        }
        Ok(query)
    }

    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            None => Config::default(),
            Some(path) => Config::read_json_file(path)?,
        };
        if let Some(exponent) = self.exponent {
            config.ratio_exponent = exponent;
        }
        if let Some(max_goals) = self.max_goals {
            config.max_goals = max_goals;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let table = CsvTable::open(&args.ratings)?;
    let columns = RatingColumns::from_headers(&table.headers);
    debug!("rating columns: {columns:?}");
    let mut ratings = RatingStore::load_with(table.rows, &columns);
    info!("loaded {} team ratings", ratings.len());

    if args.list_teams {
        for team in ratings.teams() {
            println!("{team}");
        }
        return Ok(());
    }

    let history = read_history(&args)?;
    if !history.is_empty() {
        let calibration = ratings.calibrate_baseline_since(&history, args.since()?);
        debug!("calibration: {calibration:?}");
    }

    let engine = Engine::try_from(args.config()?)?;
    debug!("config: {:?}", engine.config());

    let query = args.query()?;
    debug!("query: {query:?}");

    let result = engine.predict(&ratings, &history, &query)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} vs {}{}",
        query.home,
        query.away,
        if query.neutral { " (neutral venue)" } else { "" }
    );
    println!("{}", Console::default().render(&tabulate_outcomes(&query, &result)));
    println!(
        "most likely: {}-{}",
        result.most_likely.home, result.most_likely.away
    );
    println!(
        "{}",
        Console::default().render(&tabulate_scorelines(&result, args.top))
    );
    for team in &result.substituted {
        println!("note: no rating for {team}, default ratings used");
    }
    Ok(())
}

fn read_history(args: &Args) -> anyhow::Result<Vec<MatchRecord>> {
    match &args.results {
        None => Ok(vec![]),
        Some(path) => {
            let table = CsvTable::open(path)?;
            let columns = MatchColumns::from_headers(&table.headers);
            let history = history::load(table.rows, &columns);
            info!("loaded {} match records", history.len());
            Ok(history)
        }
    }
}
