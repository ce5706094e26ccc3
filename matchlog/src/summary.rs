//! Single-pass reduction of the reconstructed record into per-player
//! statistics, and the averaging step that finishes them.

use thiserror::Error;

use crate::record::{Record, Value};

/// Counter fields accumulated per player, in report order.
pub const STAT_FIELDS: [&str; 6] = [
    "moves",
    "explored",
    "beta_cuts",
    "tt_exact",
    "tt_cuts",
    "max_depth",
];

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("game {game}: unrecognized winner {winner:?}")]
    UnknownWinner { game: String, winner: String },
    #[error("game {game}: {player}.{field} is not an integer: {value:?}")]
    BadCounter {
        game: String,
        player: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("missing log entry {path}")]
    MissingField { path: String },
    #[error("log contains no games to average over")]
    NoGames,
}

/// One of the two fixed competitors named in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player1 => "player1",
            Self::Player2 => "player2",
        }
    }
}

/// Outcome tallies and summed counters for one player across all games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub moves: i64,
    pub explored: i64,
    pub beta_cuts: i64,
    pub tt_exact: i64,
    pub tt_cuts: i64,
    pub max_depth: i64,
}

impl PlayerTotals {
    fn accumulate(&mut self, game_id: &str, game: &Record, side: Side) -> Result<(), TallyError> {
        let stats = table_field(game, game_id, side.label())?;
        self.moves += counter(stats, game_id, side, "moves")?;
        self.explored += counter(stats, game_id, side, "explored")?;
        self.beta_cuts += counter(stats, game_id, side, "beta_cuts")?;
        self.tt_exact += counter(stats, game_id, side, "tt_exact")?;
        self.tt_cuts += counter(stats, game_id, side, "tt_cuts")?;
        self.max_depth += counter(stats, game_id, side, "max_depth")?;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, total_games: u32) -> PlayerAverages {
        let games = f64::from(total_games);
        PlayerAverages {
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            moves: self.moves as f64 / games,
            explored: self.explored as f64 / games,
            beta_cuts: self.beta_cuts as f64 / games,
            tt_exact: self.tt_exact as f64 / games,
            tt_cuts: self.tt_cuts as f64 / games,
            max_depth: self.max_depth as f64 / games,
        }
    }
}

/// Per-player statistics once the counter sums have been averaged over the
/// game count. Outcome tallies stay integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAverages {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub moves: f64,
    pub explored: f64,
    pub beta_cuts: f64,
    pub tt_exact: f64,
    pub tt_cuts: f64,
    pub max_depth: f64,
}

/// Accumulated, not-yet-averaged totals for the whole log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTotals {
    pub total_games: u32,
    pub player1: PlayerTotals,
    pub player2: PlayerTotals,
}

/// Finished per-player statistics ready for the reporter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSummary {
    pub total_games: u32,
    pub player1: PlayerAverages,
    pub player2: PlayerAverages,
}

impl MatchTotals {
    /// Walk every game entry once, classifying outcomes and summing both
    /// players' counters. Entry order does not affect the result.
    ///
    /// A record without a `game` table tallies zero games; the failure for
    /// that case surfaces in [`MatchTotals::into_averages`].
    ///
    /// # Errors
    ///
    /// Fails on the first unrecognized winner literal, non-integer counter,
    /// or absent field. Nothing partial is returned.
    pub fn tally(root: &Record) -> Result<Self, TallyError> {
        let mut totals = Self::default();
        let Some(games) = root.get("game") else {
            return Ok(totals);
        };
        let games = games.as_table().ok_or_else(|| TallyError::MissingField {
            path: "game".to_string(),
        })?;

        for (game_id, entry) in games.iter() {
            let game = entry.as_table().ok_or_else(|| TallyError::MissingField {
                path: format!("game.{game_id}"),
            })?;
            totals.total_games += 1;

            let winner = text_field(game, game_id, "winner")?;
            match winner {
                "draw" => {
                    totals.player1.draws += 1;
                    totals.player2.draws += 1;
                }
                "player1" => {
                    totals.player1.wins += 1;
                    totals.player2.losses += 1;
                }
                "player2" => {
                    totals.player2.wins += 1;
                    totals.player1.losses += 1;
                }
                other => {
                    return Err(TallyError::UnknownWinner {
                        game: game_id.to_string(),
                        winner: other.to_string(),
                    });
                }
            }

            totals.player1.accumulate(game_id, game, Side::Player1)?;
            totals.player2.accumulate(game_id, game, Side::Player2)?;
        }

        log::debug!("tallied {} games", totals.total_games);
        Ok(totals)
    }

    /// Convert the counter sums into per-game means.
    ///
    /// Consumes the totals: averaging is not idempotent, and taking `self`
    /// by value makes a second application unrepresentable.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::NoGames`] when no games were tallied.
    pub fn into_averages(self) -> Result<MatchSummary, TallyError> {
        if self.total_games == 0 {
            return Err(TallyError::NoGames);
        }
        Ok(MatchSummary {
            total_games: self.total_games,
            player1: self.player1.finish(self.total_games),
            player2: self.player2.finish(self.total_games),
        })
    }
}

fn table_field<'a>(game: &'a Record, game_id: &str, key: &str) -> Result<&'a Record, TallyError> {
    game.get(key)
        .and_then(Value::as_table)
        .ok_or_else(|| TallyError::MissingField {
            path: format!("game.{game_id}.{key}"),
        })
}

fn text_field<'a>(game: &'a Record, game_id: &str, key: &str) -> Result<&'a str, TallyError> {
    game.get(key)
        .and_then(Value::as_text)
        .ok_or_else(|| TallyError::MissingField {
            path: format!("game.{game_id}.{key}"),
        })
}

fn counter(
    stats: &Record,
    game_id: &str,
    side: Side,
    field: &'static str,
) -> Result<i64, TallyError> {
    let text = stats
        .get(field)
        .and_then(Value::as_text)
        .ok_or_else(|| TallyError::MissingField {
            path: format!("game.{game_id}.{}.{field}", side.label()),
        })?;
    text.trim()
        .parse()
        .map_err(|_| TallyError::BadCounter {
            game: game_id.to_string(),
            player: side.label(),
            field,
            value: text.to_string(),
        })
}
