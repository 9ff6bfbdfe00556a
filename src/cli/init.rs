//! todo init command implementation
//!
//! Creates the data directory and writes a default config file when none
//! exists yet.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::Context;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(Serialize)]
struct InitReport {
    data_dir: PathBuf,
    config_path: PathBuf,
    config_created: bool,
}

pub fn run(ctx: &Context) -> Result<()> {
    let config_path = ctx.config_path.clone().ok_or_else(|| {
        Error::InvalidArgument(
            "no platform config directory; pass --config <path>".to_string(),
        )
    })?;

    std::fs::create_dir_all(&ctx.data_dir)?;

    let config_created = if config_path.exists() {
        false
    } else {
        let mut config = Config::default();
        config.storage.dir = Some(ctx.data_dir.clone());
        config.save(&config_path)?;
        true
    };

    let header = if config_created {
        "todo init: initialized"
    } else {
        "todo init: already initialized"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", ctx.data_dir.display().to_string());
    human.push_summary("config", config_path.display().to_string());
    if config_created {
        human.push_detail(format!("created {}", config_path.display()));
    }
    human.push_next_step("todo add <name> <description>");

    let report = InitReport {
        data_dir: ctx.data_dir.clone(),
        config_path,
        config_created,
    };

    emit_success(
        OutputOptions {
            json: ctx.json,
            quiet: ctx.quiet,
        },
        "init",
        &report,
        Some(&human),
    )
}
