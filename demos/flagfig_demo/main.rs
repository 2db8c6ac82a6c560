//! A small server launcher configured through flagfig.
//!
//! ```text
//! cargo run --example flagfig_demo -- --port=9000 --verbose
//! cargo run --example flagfig_demo -- --help
//! cargo run --example flagfig_demo -- --write-config=./demo.conf
//! RUST_LOG=flagfig=debug cargo run --example flagfig_demo
//! ```

use std::process::ExitCode;

use flagfig::{Binder, Flagfig, FlagfigError, Options};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default)]
struct ServerOptions {
    host: String,
    port: i64,
    verbose: bool,
    data_dir: String,
    db_url: String,
    pool_size: i64,
}

impl Options for ServerOptions {
    fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
        b.field("host", &mut self.host, ",127.0.0.1,address to bind")
            .field("port", &mut self.port, ",8080,port to listen on")
            .field("verbose", &mut self.verbose, ",false,chatty output")
            .field("data_dir", &mut self.data_dir, "data_dir,$HOME,where state is kept")
            .field("db_url", &mut self.db_url, r"database.url,sqlite://demo.db?mode=rwc\,shared,connection string")
            .field("pool_size", &mut self.pool_size, "database.pool,4,connections kept open");
    }
}

/// Demo-only actions, kept apart from the server record.
#[derive(Debug, Default)]
struct Actions {
    write_config: String,
    print_template: bool,
}

impl Options for Actions {
    fn bind<'a>(&'a mut self, b: &mut Binder<'a, '_>) {
        b.field("write_config", &mut self.write_config, "write-config,-,write current values to this path")
            .field("print_template", &mut self.print_template, "print-template,false,print a config template and exit");
    }
}

fn run(opts: &mut ServerOptions, actions: &mut Actions) -> Result<bool, FlagfigError> {
    let mut cfg = Flagfig::new("flagfig_demo", &["demo.toml"]);
    cfg.add_search_path(".");
    cfg.add_search_path("~/.config/flagfig_demo");
    cfg.add_existing_search_path("/etc/flagfig_demo");
    cfg.add_options(opts)?;
    cfg.add_options(actions)?;

    cfg.load()?;

    for (name, value) in cfg.values() {
        tracing::debug!("{name} = {value}");
    }
    if !cfg.args().is_empty() {
        tracing::info!("extra arguments: {:?}", cfg.args());
    }

    if cfg.lookup("print-template").is_some_and(|f| f.value == "true") {
        print!("{}", cfg.template());
        return Ok(false);
    }
    if let Some(target) = cfg.lookup("write-config").map(|f| f.value)
        && target != "-"
    {
        let written = cfg.write_config(&target)?;
        println!("wrote {}", written.display());
        return Ok(false);
    }
    Ok(true)
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flagfig=info,flagfig_demo=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut opts = ServerOptions::default();
    let mut actions = Actions::default();
    match run(&mut opts, &mut actions) {
        Ok(true) => {}
        Ok(false) => return ExitCode::SUCCESS,
        Err(FlagfigError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    println!(
        "serving {}:{} (data in {}, db {} x{}, verbose: {})",
        opts.host, opts.port, opts.data_dir, opts.db_url, opts.pool_size, opts.verbose
    );
    ExitCode::SUCCESS
}
