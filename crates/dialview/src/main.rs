use clap::{Parser, Subcommand};
use dialview::config;
use dialview::gui::app::AppModel;
use dialview::sys::runtime;
use dialview::sys::server::{SOCKET_PATH, Verb};
use relm4::prelude::*;
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "dialview", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Snap the running dial to a cell
    Scroll { index: usize },
    /// Append a cell to the running dial
    Add { label: String },
    /// Spin the running dial; positive is counter-clockwise
    Spin {
        #[arg(allow_negative_numbers = true)]
        velocity: f64,
    },
    /// Write the default config file if there is none and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scroll { index }) => send_command(Verb::Scroll, &index.to_string()),
        Some(Commands::Add { label }) => {
            if label.trim().is_empty() || label.contains('\n') {
                anyhow::bail!("Cell label must be a single non-empty line");
            }
            send_command(Verb::Add, &label)
        }
        Some(Commands::Spin { velocity }) => send_command(Verb::Spin, &velocity.to_string()),
        Some(Commands::InitConfig) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        None => {
            run_gui();
            Ok(())
        }
    }
}

fn run_gui() {
    let config = config::load_or_default();
    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.dial");
    app.run::<AppModel>((config, rx));
}

fn send_command(verb: Verb, arg: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to dialview at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{} {}", verb, arg)?;
    Ok(())
}
