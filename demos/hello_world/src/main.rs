//! Hello World demo entry-point: declare the command tree, then run it.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use hello_world::cli;
use hello_world::error::Result;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    run().map_err(color_eyre::eyre::Report::from)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run() -> Result<()> {
    let mut app = cli::build(Rc::new(RefCell::new(io::stdout())))?;
    app.run()?;
    Ok(())
}
