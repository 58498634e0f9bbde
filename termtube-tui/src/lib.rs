//! Interactive terminal front end: a query box over a paged result list,
//! with the selected record handed to an external player.
mod app;
mod feeders;
pub mod player;
mod styles;
mod tui;
mod view;

pub use app::{Action, App, Mode};
pub use tui::{TuiMsg, TuiOptions, run};
