use crate::{
    bot::{CogError, Result},
    cog::Cog,
    command::{Callable, Command, CommandKind},
    config::Dispatch,
    context::Kwargs,
};

use parking_lot::RwLock;

use std::{collections::HashSet, sync::Arc};

#[derive(Debug, Default)]
struct InnerRegistry {
    cogs: RwLock<HashSet<Cog>>,
    commands: RwLock<HashSet<Command>>,
    config: Dispatch,
}

/// Holds all cogs and commands of a bot and dispatches calls to them.
///
/// `Registry` is a cheap handle; clones refer to the same registry.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    inner: Arc<InnerRegistry>,
}

impl Registry {
    /// Creates an empty registry with the default dispatch configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Dispatch) -> Self {
        Self {
            inner: Arc::new(InnerRegistry {
                config,
                ..Default::default()
            }),
        }
    }

    pub fn config(&self) -> &Dispatch {
        &self.inner.config
    }

    /// Returns the cog with the given name, creating it if it doesn't exist.
    pub fn cog(&self, name: &str) -> Cog {
        let mut cogs = self.inner.cogs.write();

        if let Some(cog) = cogs.get(name) {
            return cog.clone();
        }

        log::debug!("[COG] Creating cog `{}`", name);

        let cog = Cog::new(name);
        cogs.insert(cog.clone());
        cog
    }

    pub fn find_cog(&self, name: &str) -> Option<Cog> {
        self.inner.cogs.read().get(name).cloned()
    }

    pub fn getcog(&self, name: &str) -> Result<Cog> {
        self.find_cog(name)
            .ok_or_else(|| CogError::new(format!("cog `{}` not found", name)).into())
    }

    /// Returns all cogs, sorted by name.
    pub fn cogs(&self) -> Vec<Cog> {
        let cogs = self.inner.cogs.read();

        let mut cogs: Vec<Cog> = cogs.iter().cloned().collect();
        cogs.sort_by(|a, b| a.name().cmp(b.name()));
        cogs
    }

    pub fn load_cog(&self, name: &str) -> Result<Cog> {
        let cog = self.getcog(name)?;
        cog.load();

        log::info!("[COG] Loaded cog `{}`", cog);
        Ok(cog)
    }

    pub fn unload_cog(&self, name: &str) -> Result<Cog> {
        let cog = self.getcog(name)?;
        cog.unload();

        log::info!("[COG] Unloaded cog `{}`", cog);
        Ok(cog)
    }

    /// Registers a new callable command in the cog `cog`. The cog is created
    /// if it doesn't exist.
    pub fn command<T>(&self, cog: &str, name: &str, callable: T) -> Command
    where
        T: Into<Callable>,
    {
        self.register(Command::new(
            name,
            cog,
            CommandKind::Callable(callable.into()),
        ))
    }

    /// Registers a command whose handler could not be bound.
    pub fn uncallable(&self, cog: &str, name: &str) -> Command {
        self.register(Command::new(name, cog, CommandKind::Uncallable))
    }

    /// Adds `command` to its cog and to the global command set. If a command
    /// with the same name already exists, the global set keeps the existing
    /// command while the cog keeps the new one.
    fn register(&self, command: Command) -> Command {
        self.cog(command.cog()).add_command(command.clone());

        let mut commands = self.inner.commands.write();
        if !commands.insert(command.clone()) {
            log::warn!(
                "[COG] Command `{}` in cog `{}` is already registered, keeping the existing command",
                command,
                command.cog()
            );
        }

        command
    }

    /// Returns the command with the given alias. A command whose name equals
    /// `alias` takes precedence over aliases of other commands.
    pub fn getcmd(&self, alias: &str) -> Result<Command> {
        let commands = self.inner.commands.read();

        if let Some(command) = commands.get(alias).filter(|c| c.has_alias(alias)) {
            return Ok(command.clone());
        }

        commands
            .iter()
            .find(|c| c.has_alias(alias))
            .cloned()
            .ok_or_else(|| CogError::new(format!("command (or alias) `{}` not found", alias)).into())
    }

    /// Returns all commands, sorted by name.
    pub fn commands(&self) -> Vec<Command> {
        let commands = self.inner.commands.read();

        let mut commands: Vec<Command> = commands.iter().cloned().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Looks up the command with the given alias and calls it.
    pub async fn call(&self, alias: &str, kwargs: Kwargs) -> Result {
        let command = self.getcmd(alias)?;
        command.call(self, kwargs).await
    }
}
