//! `setgen` binary entry point.

use clap::Parser;

use setgen::{Cli, Setgen, SetgenError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let builder = cli.configure(Setgen::builder());
    let action = cli.into_action();

    if let Err(err) = builder.handle_and_print(&action) {
        eprintln!("error: {err}");
        if let SetgenError::UnknownKeys(keys) = &err {
            for key in keys {
                eprintln!("  {key}");
            }
        }
        std::process::exit(1);
    }
}
