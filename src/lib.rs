pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod orchestration;

pub use config::Config;
pub use datasource::{BackendError, GameBackend, HttpGameBackend, MockBackend};
pub use domain::{
    Ball, BallColor, BallSpec, EventId, EventKind, Foul, Game, GameId, GameStatus, GameTime,
    LogEntry, ParticipantId, Player, Rubles, Session, SessionId, Template, TemplateId,
};
pub use error::AppError;
pub use ledger::{EntryPatch, EventLog, LedgerError};
pub use orchestration::Scorekeeper;
