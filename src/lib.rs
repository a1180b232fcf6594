// Library exports for the lookahead snake
// The server binary, the replay tool and the integration tests all link against this

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod evaluation;
pub mod grid;
pub mod neighbors;
pub mod pathfinding;
pub mod replay;
pub mod rules;
pub mod search;
pub mod simulation;
pub mod territory;
pub mod types;
