//! Scorebook command-line front end
//!
//! Reads one command per line from stdin and prints the box score after
//! every change. Pass a TOML config path as the only argument, or configure
//! through `SCOREBOOK_*` environment variables. Logs go to stderr, as JSON
//! lines when `SCOREBOOK_LOG_FORMAT=json`.

use anyhow::Context;
use scorebook_core::{
    clock::{format_clock, ClockPhase, IntermissionClock},
    command::{Command, Outcome, HELP},
    report, Config, Scorebook,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::MakeWriter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let json = std::env::var("SCOREBOOK_LOG_FORMAT").is_ok_and(|v| v == "json");
    tracing::subscriber::set_global_default(build_subscriber(json, std::io::stderr))?;

    tracing::info!("Starting scorebook");

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path).with_context(|| format!("loading config {}", path))?,
        None => Config::from_env().context("reading SCOREBOOK_* environment")?,
    };

    let mut clock = IntermissionClock::from_config(&config.clock);
    let mut book = Scorebook::open(config).context("opening scorebook")?;
    println!("{}", report::box_score(book.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = Command::parse(&line).and_then(|cmd| cmd.apply(&mut book));
        match outcome {
            Ok(Outcome::Changed(message)) => {
                println!("{}\n", message);
                println!("{}", report::box_score(book.state()));
            }
            Ok(Outcome::Unchanged(message)) => println!("{}", message),
            Ok(Outcome::Passthrough(Command::Quit)) => break,
            Ok(Outcome::Passthrough(command)) => handle_view(command, &book, &mut clock),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    clock.cancel();
    tracing::info!("Shutting down scorebook");
    Ok(())
}

/// Log subscriber: human-readable, or JSON lines when `json` is set
fn build_subscriber<W>(json: bool, writer: W) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    if json {
        Box::new(builder.json().with_target(false).finish())
    } else {
        Box::new(builder.finish())
    }
}

fn handle_view(command: Command, book: &Scorebook, clock: &mut IntermissionClock) {
    match command {
        Command::BoxScore => println!("{}", report::box_score(book.state())),
        Command::Metrics => match book.metrics().render() {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("error: {}", e),
        },
        Command::Clock(seconds) => {
            let mut events = clock.start(seconds);
            println!("Countdown {}", format_clock(seconds));
            tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    match event.phase {
                        ClockPhase::Expired => println!("Time's up!"),
                        _ => println!("{} ({:?})", format_clock(event.remaining), event.phase),
                    }
                }
            });
        }
        _ => println!("{}", HELP),
    }
}
