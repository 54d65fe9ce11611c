//! Console tables for predictions.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::engine::{PredictionQuery, PredictionResult};

pub fn tabulate_outcomes(query: &PredictionQuery, result: &PredictionResult) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["".into(), "xG".into(), "Win".into(), "Form".into()],
        ));

    let form = |points: Option<f64>| match points {
        Some(points) => format!("{points:.0}"),
        None => "-".into(),
    };
    table.push_row(Row::new(
        Styles::default(),
        vec![
            query.home.clone().into(),
            format!("{:.3}", result.home_lambda).into(),
            format_percent(result.home_win).into(),
            form(result.form.map(|form| form.home)).into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            query.away.clone().into(),
            format!("{:.3}", result.away_lambda).into(),
            format_percent(result.away_win).into(),
            form(result.form.map(|form| form.away)).into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Draw".into(),
            "".into(),
            format_percent(result.draw).into(),
            "".into(),
        ],
    ));
    table
}

pub fn tabulate_scorelines(result: &PredictionResult, top: usize) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Score".into(), "Probability".into()],
        ));
    for probable in result.scorelines.iter().take(top) {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}-{}", probable.score.home, probable.score.away).into(),
                format_percent(probable.probability).into(),
            ],
        ));
    }
    table
}

fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::Engine;
    use crate::rating::RatingStore;
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    fn predict() -> (PredictionQuery, PredictionResult) {
        let store = RatingStore::load([["Uruguay", "1800", "1750", "1650"], ["Bolivia", "1450", "1400", "1500"]]);
        let query = PredictionQuery::new("Uruguay", "Bolivia");
        let result = Engine::try_from(Config::default())
            .unwrap()
            .predict(&store, &[], &query)
            .unwrap();
        (query, result)
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!("50.0%", format_percent(0.5));
        assert_eq!("12.3%", format_percent(0.12345));
    }

    #[test]
    fn outcomes_table() {
        let (query, result) = predict();
        let rendered = Console::default().render(&tabulate_outcomes(&query, &result)).to_string();
        assert!(rendered.contains("Uruguay"));
        assert!(rendered.contains("Bolivia"));
        assert!(rendered.contains("Draw"));
        assert!(rendered.contains(&format_percent(result.home_win)));
    }

    #[test]
    fn scorelines_table_limited_to_top() {
        let (_, result) = predict();
        let rendered = Console::default().render(&tabulate_scorelines(&result, 5)).to_string();
        assert_eq!(5, rendered.lines().filter(|line| line.contains('%')).count());
        let top = &result.scorelines[0].score;
        assert!(rendered.contains(&format!("{}-{}", top.home, top.away)));
    }
}
