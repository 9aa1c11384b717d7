//! Game cores for the arcade: a minesweeper board engine and a player-versus-computer pong simulation.
//!
//! Both are closed simulations. They take input through plain method calls and expose read-only snapshots for
//! whatever draws them.

pub use error::*;
pub use minefield::*;
pub use types::*;

mod error;
pub mod minefield;
pub mod pong;
pub mod runner;
mod types;
