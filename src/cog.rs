use crate::command::Command;

use parking_lot::RwLock;

use std::{
    borrow::Borrow,
    collections::HashSet,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

struct InnerCog {
    name: String,
    commands: RwLock<HashSet<Command>>,
    loaded: AtomicBool,
}

/// A named group of commands that can be loaded and unloaded as a whole.
///
/// `Cog` is a cheap handle; clones refer to the same cog. Two cogs are
/// equal if their names are equal.
#[derive(Clone)]
pub struct Cog {
    inner: Arc<InnerCog>,
}

impl Cog {
    /// Creates a new, loaded `Cog` without any commands.
    pub fn new<T>(name: T) -> Self
    where
        T: ToString,
    {
        Self {
            inner: Arc::new(InnerCog {
                name: name.to_string(),
                commands: RwLock::default(),
                loaded: AtomicBool::new(true),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Adds a command to the cog. A command with the same name is replaced.
    pub fn add_command(&self, command: Command) {
        let mut commands = self.inner.commands.write();
        commands.replace(command);
    }

    /// Removes a command from the cog. Does nothing if the command is not
    /// part of the cog.
    pub fn delete_command(&self, command: &Command) {
        let mut commands = self.inner.commands.write();
        commands.remove(command.name());
    }

    pub fn contains_command(&self, name: &str) -> bool {
        self.inner.commands.read().contains(name)
    }

    /// Returns all commands of the cog, sorted by name.
    pub fn commands(&self) -> Vec<Command> {
        let commands = self.inner.commands.read();

        let mut commands: Vec<Command> = commands.iter().cloned().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    pub fn load(&self) {
        self.inner.loaded.store(true, Ordering::SeqCst);
    }

    pub fn unload(&self) {
        self.inner.loaded.store(false, Ordering::SeqCst);
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::SeqCst)
    }
}

impl Borrow<str> for Cog {
    fn borrow(&self) -> &str {
        &self.inner.name
    }
}

impl PartialEq for Cog {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for Cog {}

impl Hash for Cog {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.name.hash(state);
    }
}

impl Display for Cog {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl Debug for Cog {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Cog")
            .field("name", &self.inner.name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Cog;
    use crate::command::{Command, CommandKind};
    use std::collections::HashSet;

    #[test]
    fn test_cog_load_unload() {
        let cog = Cog::new("music");
        assert!(cog.is_loaded());

        cog.unload();
        assert!(!cog.is_loaded());

        cog.load();
        assert!(cog.is_loaded());

        // Clones share state.
        let handle = cog.clone();
        handle.unload();
        assert!(!cog.is_loaded());
    }

    #[test]
    fn test_cog_commands() {
        let cog = Cog::new("music");
        let play = Command::new("play", "music", CommandKind::Uncallable);
        let skip = Command::new("skip", "music", CommandKind::Uncallable);

        cog.add_command(play.clone());
        cog.add_command(skip.clone());
        cog.add_command(play.clone());

        let names: Vec<String> = cog.commands().iter().map(|c| c.name().to_owned()).collect();
        assert_eq!(names, vec![String::from("play"), String::from("skip")]);

        cog.delete_command(&play);
        assert!(!cog.contains_command("play"));

        // Deleting an absent command is a no-op.
        cog.delete_command(&play);
        assert!(cog.contains_command("skip"));
    }

    #[test]
    fn test_cog_eq() {
        let mut cogs = HashSet::new();
        cogs.insert(Cog::new("music"));
        cogs.insert(Cog::new("music"));
        cogs.insert(Cog::new("admin"));

        assert_eq!(cogs.len(), 2);
        assert!(cogs.contains("music"));
    }
}
