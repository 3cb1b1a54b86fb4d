// LCU module - session bootstrap and typed calls against the League client

pub mod champ_select;
pub mod client;
pub mod connection;
pub mod perks;
pub mod transport;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use champ_select::{own_actions, select_committable_action};
pub use client::LcuClient;
pub use connection::{
  parse_command_line, read_lockfile, resolve_local_endpoint, LcuConnection, ProcessInspector,
  SystemProcessInspector,
};
pub use transport::{ApiResponse, HttpTransport, Transport};
pub use types::{
  ChampSelectAction, ChampSelectSession, CurrentSummoner, GameflowPhase, PerkPage, TeamMember,
  PERK_PAGE_SIZE,
};
