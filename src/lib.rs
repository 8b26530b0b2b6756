pub mod bot;
pub mod builtin;
pub mod cog;
pub mod command;
pub mod config;
pub mod context;
pub mod executor;
pub mod help;
pub mod registry;

pub use {
    bot::{Error, Outcome, Response, Result, Signal},
    cog::Cog,
    command::{Callable, Command, Param},
    context::{Context, Kwargs},
    executor::{Executor, Handler},
    registry::Registry,
};
