mod logger;

/// Path of the default config.toml file.
const DEFAULT_CONFIG: &str = "./config.toml";

use clap::Parser;
use cogbot::{
    bot::{Error, Outcome, Response, Signal},
    builtin,
    config::Config,
    context::Kwargs,
    registry::Registry,
};
use tokio::io::{self, AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[clap(name = "cogbot", version, about = "Console host for the cogbot command registry")]
struct Args {
    /// Provide a path to the config file
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {}", args.config, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = logger::init(&config) {
        eprintln!("Failed to initialize logger: {}", err);
    }

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        let registry = Registry::with_config(config.dispatch);

        log::info!("[CORE] Loading builtin commands");
        builtin::init(&registry);

        match run(&registry, &config.prefix, &mut lines).await {
            Signal::Restart => log::info!("[CORE] Restarting"),
            Signal::Terminate => break,
        }
    }

    log::info!("[CORE] Shutting down");
}

/// Dispatches prefixed lines from stdin until a command sends a [`Signal`]
/// or stdin is closed.
async fn run<R>(registry: &Registry, prefix: &str, lines: &mut io::Lines<R>) -> Signal
where
    R: io::AsyncBufRead + Unpin,
{
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return Signal::Terminate,
            Err(err) => {
                log::error!("[CORE] Failed to read from stdin: {}", err);
                return Signal::Terminate;
            }
        };

        let input = match line.trim().strip_prefix(prefix) {
            Some(input) => input,
            None => continue,
        };

        let mut words = input.split_whitespace();
        let alias = match words.next() {
            Some(alias) => alias,
            None => continue,
        };

        let kwargs = Kwargs::new().with("args", words.collect::<Vec<&str>>());

        match registry.call(alias, kwargs).await {
            Ok(Outcome::Done(Some(response))) => print_response(&response),
            Ok(Outcome::Done(None)) => (),
            Ok(Outcome::Signal(signal)) => return signal,
            Err(err) => print_error(&err),
        }
    }
}

fn print_response(response: &Response) {
    if response.reply {
        println!("> {}", response.content);
    } else {
        println!("{}", response.content);
    }

    if let Some(duration) = response.delete_after {
        log::debug!("[CORE] Response expires in {}s", duration.as_secs());
    }
}

fn print_error(err: &Error) {
    match err.expire_in() {
        Some(duration) => println!("{} (expires in {}s)", err, duration.as_secs()),
        None => println!("{}", err),
    }

    if let Error::Cog(err) = err {
        if let Some(traceback) = &err.traceback {
            log::debug!("[CORE] {}", traceback);
        }
    }
}
