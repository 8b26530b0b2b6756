use crate::{
    bot::{CogError, Outcome, Result},
    cog::Cog,
    context::{Context, Kwargs},
    executor::Executor,
    registry::Registry,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use std::{
    borrow::Borrow,
    collections::HashSet,
    fmt::{self, Debug, Display, Formatter},
    future::Future,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A parameter a handler accepts. Only used to render help and usage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub required: bool,
    pub help: String,
}

impl Param {
    pub fn required<T>(name: T) -> Self
    where
        T: ToString,
    {
        Self {
            name: name.to_string(),
            required: true,
            help: String::new(),
        }
    }

    pub fn optional<T>(name: T) -> Self
    where
        T: ToString,
    {
        Self {
            name: name.to_string(),
            required: false,
            help: String::new(),
        }
    }

    pub fn help<T>(mut self, help: T) -> Self
    where
        T: ToString,
    {
        self.help = help.to_string();
        self
    }
}

/// A bound handler together with its help metadata.
#[derive(Clone, Debug)]
pub struct Callable {
    pub executor: Executor,
    pub description: String,
    pub params: Vec<Param>,
}

impl Callable {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            description: String::new(),
            params: Vec::new(),
        }
    }

    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        Self::new(Executor::from_fn(f))
    }

    pub fn description<T>(mut self, description: T) -> Self
    where
        T: ToString,
    {
        self.description = description.to_string();
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }
}

impl From<Executor> for Callable {
    fn from(executor: Executor) -> Self {
        Self::new(executor)
    }
}

#[derive(Clone, Debug)]
pub enum CommandKind {
    /// A command whose handler could not be bound. Calling it only logs an
    /// error.
    Uncallable,
    Callable(Callable),
}

struct InnerCommand {
    name: String,
    cog: String,
    alias: RwLock<HashSet<String>>,
    kind: CommandKind,
}

/// A named, invocable action owned by a cog.
///
/// `Command` is a cheap handle; clones share the alias set. Two commands are
/// equal if their names are equal. The owning cog is referenced by name and
/// resolved against the [`Registry`] on every call.
#[derive(Clone)]
pub struct Command {
    inner: Arc<InnerCommand>,
}

impl Command {
    /// Creates an unregistered command whose alias set holds only `name`.
    /// Use [`Registry::command`] or [`Registry::uncallable`] to create
    /// commands that can be dispatched.
    pub(crate) fn new<T, U>(name: T, cog: U, kind: CommandKind) -> Self
    where
        T: ToString,
        U: ToString,
    {
        let name = name.to_string();

        let mut alias = HashSet::new();
        alias.insert(name.clone());

        Self {
            inner: Arc::new(InnerCommand {
                name,
                cog: cog.to_string(),
                alias: RwLock::new(alias),
                kind,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the name of the owning cog.
    pub fn cog(&self) -> &str {
        &self.inner.cog
    }

    pub fn kind(&self) -> &CommandKind {
        &self.inner.kind
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.inner.kind, CommandKind::Callable(_))
    }

    /// Returns all aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let alias = self.inner.alias.read();

        let mut aliases: Vec<String> = alias.iter().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.inner.alias.read().contains(alias)
    }

    pub fn add_alias<T>(&self, alias: T)
    where
        T: ToString,
    {
        let alias = alias.to_string();
        let mut aliases = self.inner.alias.write();

        if aliases.contains(&alias) {
            log::warn!(
                "[COG] `{}` is already an alias of command `{}`",
                alias,
                self.name()
            );
        } else {
            aliases.insert(alias);
        }
    }

    pub fn remove_alias(&self, alias: &str) {
        let mut aliases = self.inner.alias.write();

        if !aliases.remove(alias) {
            log::warn!(
                "[COG] `{}` is not an alias of command `{}`",
                alias,
                self.name()
            );
        }
    }

    /// Resets the aliases to only the command name.
    pub fn remove_all_alias(&self) {
        let mut aliases = self.inner.alias.write();

        aliases.clear();
        aliases.insert(self.inner.name.clone());
    }

    /// Returns the help text of the command followed by its aliases. Returns
    /// `None` for uncallable commands.
    pub fn describe(&self) -> Option<String> {
        match &self.inner.kind {
            CommandKind::Uncallable => None,
            CommandKind::Callable(callable) => Some(format!(
                "{}\n    alias: {}",
                callable.description,
                self.aliases().join(" ")
            )),
        }
    }

    /// Returns the parameters the handler declares. Returns `None` for
    /// uncallable commands.
    pub fn params(&self) -> Option<&[Param]> {
        match &self.inner.kind {
            CommandKind::Uncallable => None,
            CommandKind::Callable(callable) => Some(&callable.params),
        }
    }

    /// Invokes the command.
    ///
    /// The owning cog is looked up in `registry`. If it is missing or
    /// unloaded the handler is not called. Unexpected failures of the handler
    /// unload the cog and are reported as a [`CogError`].
    pub async fn call(&self, registry: &Registry, kwargs: Kwargs) -> Result {
        let callable = match &self.inner.kind {
            CommandKind::Uncallable => {
                log::error!(
                    "[COG] Command `{}` in cog `{}` is not callable.",
                    self.name(),
                    self.cog()
                );
                return Ok(Outcome::none());
            }
            CommandKind::Callable(callable) => callable,
        };

        let cog = match registry.find_cog(self.cog()) {
            Some(cog) => cog,
            None => {
                return Err(CogError::new(format!(
                    "Command `{}` in cog `{}` not found, very weird. Please try restarting the bot if this issue persist",
                    self.name(),
                    self.cog()
                ))
                .expire_in(registry.config().unloaded_expire())
                .into());
            }
        };

        if !cog.is_loaded() {
            return Err(CogError::new(format!(
                "Command `{}` in cog `{}` have been unloaded.",
                self.name(),
                self.cog()
            ))
            .expire_in(registry.config().unloaded_expire())
            .into());
        }

        self.with_callback(callable, &cog, Context::new(registry.clone(), kwargs))
            .await
    }

    async fn with_callback(&self, callable: &Callable, cog: &Cog, ctx: Context) -> Result {
        let failure_expire = ctx.registry.config().failure_expire();

        match callable.executor.send(ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_expected() => Err(err),
            Err(err) => {
                cog.unload();

                log::error!(
                    "[COG] Unloaded cog `{}`, command `{}` failed: {}",
                    cog,
                    self.name(),
                    err
                );

                Err(CogError::new(format!("unloaded cog `{}`.", cog))
                    .expire_in(failure_expire)
                    .traceback(err.trace())
                    .into())
            }
        }
    }
}

impl Borrow<str> for Command {
    fn borrow(&self) -> &str {
        &self.inner.name
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.name.hash(state);
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.inner.name)
            .field("cog", &self.inner.cog)
            .field("alias", &self.aliases())
            .field("callable", &self.is_callable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Callable, Command, CommandKind, Param};
    use crate::bot::Outcome;

    fn callable() -> Callable {
        Callable::from_fn(|_ctx| async move { Ok(Outcome::none()) })
    }

    #[test]
    fn test_command_alias() {
        let command = Command::new("play", "music", CommandKind::Uncallable);
        assert_eq!(command.aliases(), vec![String::from("play")]);

        command.add_alias("p");
        command.add_alias("p");
        assert_eq!(command.aliases(), vec![String::from("p"), String::from("play")]);

        command.remove_alias("p");
        assert_eq!(command.aliases(), vec![String::from("play")]);

        // Removing a missing alias only warns.
        command.remove_alias("p");
        assert_eq!(command.aliases(), vec![String::from("play")]);
    }

    #[test]
    fn test_command_remove_all_alias() {
        let command = Command::new("play", "music", CommandKind::Uncallable);
        command.add_alias("p");
        command.add_alias("start");
        command.remove_alias("play");

        command.remove_all_alias();
        assert_eq!(command.aliases(), vec![String::from("play")]);
    }

    #[test]
    fn test_command_describe() {
        let command = Command::new(
            "play",
            "music",
            CommandKind::Callable(callable().description("Plays a song.")),
        );
        command.add_alias("p");

        assert_eq!(
            command.describe().unwrap(),
            "Plays a song.\n    alias: p play"
        );

        let command = Command::new("broken", "music", CommandKind::Uncallable);
        assert_eq!(command.describe(), None);
    }

    #[test]
    fn test_command_params() {
        let command = Command::new(
            "play",
            "music",
            CommandKind::Callable(
                callable()
                    .param(Param::required("song_url"))
                    .param(Param::optional("volume").help("Playback volume")),
            ),
        );

        let params = command.params().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], Param::required("song_url"));
        assert!(!params[1].required);
        assert_eq!(params[1].help, "Playback volume");

        let command = Command::new("broken", "music", CommandKind::Uncallable);
        assert!(command.params().is_none());
    }

    #[test]
    fn test_command_eq() {
        let a = Command::new("play", "music", CommandKind::Uncallable);
        let b = Command::new("play", "radio", CommandKind::Callable(callable()));
        assert_eq!(a, b);
    }
}
