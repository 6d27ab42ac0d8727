use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};

use cdefects::cli::{self, Cli};
use cdefects::config::Config;
use cdefects::io;
use cdefects::physics;
use cdefects::utils::{logger, report};

fn main() -> ExitCode {
    let cli = cli::parse();
    if let Err(e) = logger::init(logger::level_for(cli.quiet, cli.verbose)) {
        eprintln!("cdefects: could not install logger: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            for cause in e.chain().skip(1) {
                log::error!("  caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (stored, msg) = Config::load();
    log::debug!("{}", msg);

    let config = cli.apply(stored);
    config.validate().context("Invalid matching settings")?;

    if cli.save_config {
        log::info!("{}", config.save());
    }

    let reference = io::load_structure(&config.perfect_path).with_context(|| {
        format!("Failed to read perfect structure {}", config.perfect_path.display())
    })?;
    let probe = io::load_structure(&config.defect_path).with_context(|| {
        format!("Failed to read defect structure {}", config.defect_path.display())
    })?;

    let found = physics::analyze(&reference, &probe, &config.matching);

    let label = report::structure_label(&config.defect_path);
    let reference_name = config.perfect_path.display().to_string();
    let text = report::render_text(&found, &label, &reference_name);
    print!("{}", text);

    if config.save_report {
        let path = report::save_text(&config.output_dir, &label, &text)
            .with_context(|| format!("Failed to save report under {}", config.output_dir.display()))?;
        println!("\nDefect information was saved in {}.", path.display());
    }

    if let Some(json_path) = &cli.json {
        let json = report::render_json(&found, &label, &reference_name, &config.matching)
            .context("Failed to serialise report")?;
        fs::write(json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        log::info!("JSON report written to {}", json_path.display());
    }

    log::info!("{}: {}", label, report::summary_line(&found));
    Ok(())
}
