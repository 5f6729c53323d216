mod render;
mod runner;
mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "keybed-sim", about = "Keybed scan engine simulator")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scripted switch timeline through the engine
    Play {
        /// Path to the script file
        script: PathBuf,
        /// Also write the raw MIDI byte stream to a file
        #[arg(long)]
        raw: Option<PathBuf>,
        /// Stop at this virtual time instead of after the last event
        #[arg(long)]
        until_ms: Option<u64>,
    },
    /// Print the key map and the function-mode command table
    Keys,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Play {
            script,
            raw,
            until_ms,
        } => {
            let script = script::Script::load(&script)?;
            info!(
                events = script.events.len(),
                channel_select = script.setup.channel_select,
                tick_ms = script.setup.tick_ms,
                "replaying script"
            );

            let report = runner::run(&script, until_ms)?;

            println!("Emitted MIDI");
            println!("══════════════════════════════");
            if report.messages.is_empty() {
                println!("  (silence)");
            }
            for emitted in &report.messages {
                println!(
                    "  {:>7} ms  {:<9} {}",
                    emitted.at_ms,
                    render::hex(&emitted.bytes),
                    render::describe(&emitted.bytes)
                );
            }
            println!();
            println!(
                "  {} messages over {} ticks ({} ms); channel {}, shift {:+}",
                report.messages.len(),
                report.ticks,
                report.elapsed_ms,
                report.final_channel + 1,
                report.final_shift
            );
            if report.hanging_notes > 0 {
                println!("  {} note(s) still sounding at end of script", report.hanging_notes);
            }

            if let Some(path) = raw {
                let stream = report.raw_stream();
                std::fs::write(&path, &stream)?;
                info!(path = %path.display(), bytes = stream.len(), "raw stream written");
            }
        }
        Commands::Keys => render::print_key_map(),
    }

    Ok(())
}
