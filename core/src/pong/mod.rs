pub use ai::*;
pub use consts::*;
pub use sim::*;
pub use state::*;

mod ai;
pub mod consts;
mod sim;
mod state;
