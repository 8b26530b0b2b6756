use crate::{
    bot::{CommandError, Error, Outcome, Response, Result, Signal},
    command::{Callable, Param},
    context::Context,
    help,
    registry::Registry,
};

use std::{fmt::Write, time::Duration};

/// Name of the cog holding the builtin commands.
pub const COG: &str = "core";

/// How long help pages stay visible.
const HELP_EXPIRE: Duration = Duration::from_secs(60);

/// Registers all builtin commands in `registry`.
pub fn init(registry: &Registry) {
    const COMMANDS: &[fn() -> (&'static str, Callable)] =
        &[help, cogs, load, unload, alias, shutdown, restart];

    for f in COMMANDS {
        let (name, callable) = f();
        registry.command(COG, name, callable);
    }

    if let Ok(help) = registry.getcmd("help") {
        help.add_alias("h");
    }
}

fn help() -> (&'static str, Callable) {
    let callable = Callable::from_fn(_help)
        .description("Shows all commands or the help page of a single command.")
        .param(Param::optional("command"));

    ("help", callable)
}

async fn _help(ctx: Context) -> Result {
    let string = match ctx.kwargs.strings("args").first() {
        Some(alias) => help::command(&ctx.registry.getcmd(alias).map_err(usage_error)?),
        None => help::global(&ctx.registry),
    };

    Ok(Outcome::respond(Response::new(string).delete_after(HELP_EXPIRE)))
}

fn cogs() -> (&'static str, Callable) {
    let callable = Callable::from_fn(_cogs).description("Lists all cogs and their state.");

    ("cogs", callable)
}

async fn _cogs(ctx: Context) -> Result {
    let mut string = String::new();
    for cog in ctx.registry.cogs() {
        let state = if cog.is_loaded() { "loaded" } else { "unloaded" };
        let _ = writeln!(string, "- {} ({})", cog.name(), state);
    }

    Ok(Outcome::respond(string))
}

fn load() -> (&'static str, Callable) {
    let callable = Callable::from_fn(_load)
        .description("Loads an unloaded cog.")
        .param(Param::required("cog"));

    ("load", callable)
}

async fn _load(ctx: Context) -> Result {
    let name = first_arg(&ctx, "load <cog>")?;
    let cog = ctx.registry.load_cog(&name).map_err(usage_error)?;

    Ok(Outcome::respond(format!("Loaded cog `{}`.", cog)))
}

fn unload() -> (&'static str, Callable) {
    let callable = Callable::from_fn(_unload)
        .description("Unloads a cog. Its commands can't be used until it is loaded again.")
        .param(Param::required("cog"));

    ("unload", callable)
}

async fn _unload(ctx: Context) -> Result {
    let name = first_arg(&ctx, "unload <cog>")?;
    if name == COG {
        return Err(CommandError::new(format!("cog `{}` can't be unloaded", COG)).into());
    }

    let cog = ctx.registry.unload_cog(&name).map_err(usage_error)?;

    Ok(Outcome::respond(format!("Unloaded cog `{}`.", cog)))
}

fn alias() -> (&'static str, Callable) {
    let callable = Callable::from_fn(_alias)
        .description("Adds an alias to a command.")
        .param(Param::required("command"))
        .param(Param::required("alias"));

    ("alias", callable)
}

async fn _alias(ctx: Context) -> Result {
    let args = ctx.kwargs.strings("args");
    let (command, alias) = match args.as_slice() {
        [command, alias] => (*command, *alias),
        _ => return Err(CommandError::new("Usage: alias <command> <alias>").into()),
    };

    let command = ctx.registry.getcmd(command).map_err(usage_error)?;
    command.add_alias(alias);

    let content = format!("Aliases of `{}`: {}", command, command.aliases().join(" "));
    Ok(Outcome::respond(Response::new(content).reply(true)))
}

fn shutdown() -> (&'static str, Callable) {
    let callable = Callable::from_fn(|_ctx| async move { Ok(Outcome::Signal(Signal::Terminate)) })
        .description("Shuts the bot down.");

    ("shutdown", callable)
}

fn restart() -> (&'static str, Callable) {
    let callable = Callable::from_fn(|_ctx| async move { Ok(Outcome::Signal(Signal::Restart)) })
        .description("Restarts the bot, reloading all cogs.");

    ("restart", callable)
}

/// Turns a failed registry lookup into a usage error so it doesn't unload the
/// builtin cog.
fn usage_error(err: Error) -> Error {
    match err {
        Error::Cog(err) => CommandError::new(err.message).into(),
        err => err,
    }
}

fn first_arg(ctx: &Context, usage: &str) -> Result<String> {
    match ctx.kwargs.strings("args").first() {
        Some(arg) => Ok(arg.to_string()),
        None => Err(CommandError::new(format!("Usage: {}", usage)).into()),
    }
}
