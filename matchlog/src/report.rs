//! Rendering of the fixed textual report: a verbatim configuration echo
//! followed by both players' statistics blocks.

use std::io::{self, Write};

use crate::record::{Record, Value};
use crate::summary::{MatchSummary, PlayerAverages, Side, TallyError};

/// Configuration captured from the log for display, untouched by any type
/// conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEcho {
    pub games: String,
    pub player1: Vec<(String, String)>,
    pub player2: Vec<(String, String)>,
}

impl ConfigEcho {
    /// Pull `config.games` and both players' settings out of the record.
    ///
    /// Player settings keep their log order. A player without a config
    /// section echoes as zero lines.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::MissingField`] when the `config` table or its
    /// `games` entry is absent.
    pub fn from_record(root: &Record) -> Result<Self, TallyError> {
        let config = root
            .get("config")
            .and_then(Value::as_table)
            .ok_or_else(|| missing("config"))?;
        let games = config
            .get("games")
            .and_then(Value::as_text)
            .ok_or_else(|| missing("config.games"))?;

        Ok(Self {
            games: games.to_string(),
            player1: player_settings(config, Side::Player1),
            player2: player_settings(config, Side::Player2),
        })
    }
}

fn missing(path: &str) -> TallyError {
    TallyError::MissingField {
        path: path.to_string(),
    }
}

fn player_settings(config: &Record, side: Side) -> Vec<(String, String)> {
    let Some(table) = config.get(side.label()).and_then(Value::as_table) else {
        return Vec::new();
    };
    table
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_text()
                .map(|text| (key.to_string(), text.to_string()))
        })
        .collect()
}

/// Write the full report.
///
/// The layout is fixed and consumed by humans diffing runs against each
/// other, so every blank line and spacing quirk of the established format is
/// kept as-is, including the doubled space after `games =`.
///
/// # Errors
///
/// Only I/O errors from the underlying writer.
pub fn write_report<W: Write>(
    mut out: W,
    config: &ConfigEcho,
    summary: &MatchSummary,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "---- config")?;
    writeln!(out, "games =  {}", config.games)?;
    writeln!(out)?;
    write_player_config(&mut out, Side::Player1, &config.player1)?;
    writeln!(out)?;
    write_player_config(&mut out, Side::Player2, &config.player2)?;
    writeln!(out)?;
    write_player_stats(&mut out, Side::Player1, &summary.player1)?;
    write_player_stats(&mut out, Side::Player2, &summary.player2)?;
    Ok(())
}

fn write_player_config<W: Write>(
    out: &mut W,
    side: Side,
    settings: &[(String, String)],
) -> io::Result<()> {
    for (key, value) in settings {
        writeln!(out, "{} {key} = {value}", side.label())?;
    }
    Ok(())
}

fn write_player_stats<W: Write>(
    out: &mut W,
    side: Side,
    stats: &PlayerAverages,
) -> io::Result<()> {
    writeln!(out, "==== [ {} ]", side.label())?;
    writeln!(out)?;
    writeln!(out, "wins = {}", stats.wins)?;
    writeln!(out, "draws = {}", stats.draws)?;
    writeln!(out, "losses = {}", stats.losses)?;
    writeln!(out, "moves = {}", stats.moves)?;
    writeln!(out, "explored = {}", stats.explored)?;
    writeln!(out, "beta_cuts = {}", stats.beta_cuts)?;
    writeln!(out, "tt_exact = {}", stats.tt_exact)?;
    writeln!(out, "tt_cuts = {}", stats.tt_cuts)?;
    writeln!(out, "max_depth = {}", stats.max_depth)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_log;
    use crate::summary::MatchTotals;
    use std::io::Cursor;

    fn sample_averages() -> PlayerAverages {
        PlayerAverages {
            wins: 1,
            draws: 1,
            losses: 0,
            moves: 9.0,
            explored: 90.0,
            beta_cuts: 3.0,
            tt_exact: 1.5,
            tt_cuts: 0.5,
            max_depth: 4.5,
        }
    }

    #[test]
    fn report_matches_the_established_layout() {
        let config = ConfigEcho {
            games: "2".to_string(),
            player1: vec![("depth".to_string(), "5".to_string())],
            player2: vec![("depth".to_string(), "5".to_string())],
        };
        let summary = MatchSummary {
            total_games: 2,
            player1: sample_averages(),
            player2: PlayerAverages {
                wins: 0,
                draws: 1,
                losses: 1,
                moves: 8.5,
                explored: 87.5,
                beta_cuts: 2.5,
                tt_exact: 1.0,
                tt_cuts: 0.5,
                max_depth: 4.0,
            },
        };

        let mut buffer = Vec::new();
        write_report(&mut buffer, &config, &summary).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "\n\
            ---- config\n\
            games =  2\n\
            \n\
            player1 depth = 5\n\
            \n\
            player2 depth = 5\n\
            \n\
            ==== [ player1 ]\n\
            \n\
            wins = 1\n\
            draws = 1\n\
            losses = 0\n\
            moves = 9\n\
            explored = 90\n\
            beta_cuts = 3\n\
            tt_exact = 1.5\n\
            tt_cuts = 0.5\n\
            max_depth = 4.5\n\
            \n\
            ==== [ player2 ]\n\
            \n\
            wins = 0\n\
            draws = 1\n\
            losses = 1\n\
            moves = 8.5\n\
            explored = 87.5\n\
            beta_cuts = 2.5\n\
            tt_exact = 1\n\
            tt_cuts = 0.5\n\
            max_depth = 4\n\
            \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn config_echo_preserves_key_order() {
        let log = "config.games = 1\n\
                   config.player1.depth = 6\n\
                   config.player1.alpha_beta = true\n\
                   config.player1.transposition_table = false\n";
        let record = parse_log(Cursor::new(log)).unwrap();
        let echo = ConfigEcho::from_record(&record).unwrap();
        let keys: Vec<&str> = echo.player1.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["depth", "alpha_beta", "transposition_table"]);
        assert!(echo.player2.is_empty());
    }

    #[test]
    fn config_echo_requires_games_entry() {
        let record = parse_log(Cursor::new("config.player1.depth = 6\n")).unwrap();
        let err = ConfigEcho::from_record(&record).unwrap_err();
        match err {
            TallyError::MissingField { path } => assert_eq!(path, "config.games"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn config_echo_requires_config_table() {
        let record = parse_log(Cursor::new("game.0.winner = draw\n")).unwrap();
        let err = ConfigEcho::from_record(&record).unwrap_err();
        assert!(matches!(err, TallyError::MissingField { .. }));
    }

    #[test]
    fn missing_player_sections_render_empty_blocks() {
        let config = ConfigEcho {
            games: "0".to_string(),
            player1: Vec::new(),
            player2: Vec::new(),
        };
        let summary = MatchSummary {
            total_games: 1,
            player1: sample_averages(),
            player2: sample_averages(),
        };
        let mut buffer = Vec::new();
        write_report(&mut buffer, &config, &summary).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("\n---- config\ngames =  0\n\n\n\n==== [ player1 ]"));
    }

    #[test]
    fn end_to_end_scenario_report() {
        let log = "config.games = 2\n\
                   config.player1.depth = 5\n\
                   config.player2.depth = 5\n\
                   game.0.winner = player1\n\
                   game.0.player1.moves = 10\n\
                   game.0.player1.explored = 100\n\
                   game.0.player1.beta_cuts = 4\n\
                   game.0.player1.tt_exact = 2\n\
                   game.0.player1.tt_cuts = 1\n\
                   game.0.player1.max_depth = 5\n\
                   game.0.player2.moves = 9\n\
                   game.0.player2.explored = 90\n\
                   game.0.player2.beta_cuts = 3\n\
                   game.0.player2.tt_exact = 1\n\
                   game.0.player2.tt_cuts = 1\n\
                   game.0.player2.max_depth = 4\n\
                   game.1.winner = draw\n\
                   game.1.player1.moves = 8\n\
                   game.1.player1.explored = 80\n\
                   game.1.player1.beta_cuts = 2\n\
                   game.1.player1.tt_exact = 1\n\
                   game.1.player1.tt_cuts = 0\n\
                   game.1.player1.max_depth = 4\n\
                   game.1.player2.moves = 8\n\
                   game.1.player2.explored = 85\n\
                   game.1.player2.beta_cuts = 2\n\
                   game.1.player2.tt_exact = 1\n\
                   game.1.player2.tt_cuts = 0\n\
                   game.1.player2.max_depth = 4\n";
        let record = parse_log(Cursor::new(log)).unwrap();
        let summary = MatchTotals::tally(&record)
            .unwrap()
            .into_averages()
            .unwrap();
        let echo = ConfigEcho::from_record(&record).unwrap();

        let mut buffer = Vec::new();
        write_report(&mut buffer, &echo, &summary).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("games =  2"));
        assert!(text.contains("player1 depth = 5"));
        assert!(text.contains("\nmoves = 9\n"));
        assert!(text.contains("\nmoves = 8.5\n"));
        assert!(text.contains("\nexplored = 87.5\n"));
        assert!(text.contains("==== [ player2 ]"));
    }
}
