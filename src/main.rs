use anyhow::Result;
use distgit_review::{FEDORA_DISTGIT_URL, Pagure, config, parse_args, run};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn execute() -> Result<()> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    // The token must be resolved before any network activity.
    let token = config::resolve_token()?;
    let forge = Pagure::new(token, FEDORA_DISTGIT_URL)?;

    let mut stdout = std::io::stdout();
    run(command, &forge, &mut stdout).await
}

#[tokio::main]
async fn main() {
    init_tracing();

    let outcome = tokio::select! {
        result = execute() => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupt detected. Exiting...");
            std::process::exit(2);
        }
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
