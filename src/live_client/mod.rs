// Live client module - polls the in-game API on port 2999

pub mod game;
pub mod types;

#[cfg(test)]
mod tests;

pub use game::{attach_active_player, reconcile_events, LiveClient};
pub use types::{
  ActivePlayerDetails, GameEvent, GameStats, Item, Player, RuneSummary, Scores, SummonerSpells,
  Team,
};
