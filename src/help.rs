use crate::{
    command::{Command, Param},
    registry::Registry,
};

use std::fmt::Write;

/// Lists all commands grouped by cog.
pub fn global(registry: &Registry) -> String {
    let mut string = String::new();

    for cog in registry.cogs() {
        let state = if cog.is_loaded() { "" } else { " (unloaded)" };
        let _ = writeln!(string, "**{}**{}", cog.name(), state);

        for command in cog.commands() {
            let _ = writeln!(string, "- {}", command.name());
        }
    }

    string
}

/// Returns the help page of a single command.
pub fn command(command: &Command) -> String {
    let mut string = String::new();
    let _ = writeln!(string, "**Name**: {}", command.name());
    let _ = writeln!(string, "**Cog**: {}", command.cog());

    match command.describe() {
        Some(description) => {
            let _ = writeln!(string, "**Description**: {}", description);
        }
        None => {
            let _ = writeln!(string, "**Description**: not callable");
        }
    }

    if let Some(params) = command.params() {
        let _ = writeln!(string, "**Usage**: {}", usage(command.name(), params));

        for param in params.iter().filter(|p| !p.help.is_empty()) {
            let _ = writeln!(string, "- `{}`: {}", param.name, param.help);
        }
    }

    string
}

/// Renders a usage line. Required parameters are enclosed by `<>`, optional
/// ones by `[]`.
pub fn usage(name: &str, params: &[Param]) -> String {
    let mut string = String::from(name);

    for param in params {
        if param.required {
            let _ = write!(string, " <{}>", param.name);
        } else {
            let _ = write!(string, " [{}]", param.name);
        }
    }

    string
}

#[cfg(test)]
mod tests {
    use super::{command, global, usage};
    use crate::{
        bot::Outcome,
        command::{Callable, Param},
        registry::Registry,
    };

    #[test]
    fn test_usage() {
        let params = vec![Param::required("song_url"), Param::optional("volume")];
        assert_eq!(usage("play", &params), "play <song_url> [volume]");
        assert_eq!(usage("skip", &[]), "skip");
    }

    #[test]
    fn test_help_global() {
        let registry = Registry::new();
        registry.uncallable("music", "skip");
        registry.uncallable("music", "play");
        registry.uncallable("admin", "restart");
        registry.getcog("admin").unwrap().unload();

        assert_eq!(
            global(&registry),
            "**admin** (unloaded)\n- restart\n**music**\n- play\n- skip\n"
        );
    }

    #[test]
    fn test_help_command() {
        let registry = Registry::new();
        let play = registry.command(
            "music",
            "play",
            Callable::from_fn(|_ctx| async move { Ok(Outcome::none()) })
                .description("Plays a song.")
                .param(Param::required("song_url").help("Link to the song")),
        );

        assert_eq!(
            command(&play),
            "**Name**: play\n**Cog**: music\n**Description**: Plays a song.\n    alias: play\n**Usage**: play <song_url>\n- `song_url`: Link to the song\n"
        );
    }
}
