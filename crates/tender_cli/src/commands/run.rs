//! Run command implementation.

use crate::output::{self, OpReport};
use crate::script::{execute, parse_script};
use log::info;
use std::path::Path;
use std::sync::Arc;
use tender_core::{init_logging, EventLog, RegistryConfig, TenderRegistry};

pub fn run(
    script: String,
    config: String,
    json: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegistryConfig::load(&config)?;
    if let Some(dir) = config.log.dir.as_deref() {
        init_logging(&config.log.level, dir)?;
    }

    let text = std::fs::read_to_string(&script)
        .map_err(|e| format!("Failed to read script `{}`: {}", script, e))?;
    let ops = parse_script(&text)?;
    let base_dir = Path::new(&script)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let registry = TenderRegistry::from_config(&config);
    let events = Arc::new(EventLog::new());
    registry.subscribe(events.clone());
    info!(
        "event=script_run module=cli status=start ops={} owner={}",
        ops.len(),
        config.owner
    );

    let mut failed = 0_usize;
    for (line, op) in &ops {
        let result = execute(&registry, op, &base_dir);
        let emitted = events.drain();
        let report = OpReport {
            line: *line,
            op: op.name(),
            result: &result,
            events: &emitted,
        };
        if json {
            println!("{}", output::format_json(&report));
        } else {
            println!("{}", output::format_text(&report));
        }

        if let Err(err) = &result {
            failed += 1;
            if strict {
                return Err(format!("line {}: {} failed: {}", line, op.name(), err).into());
            }
        }
    }

    info!(
        "event=script_run module=cli status=ok ops={} failed={} tenders={}",
        ops.len(),
        failed,
        registry.tender_count()
    );
    if !json {
        println!(
            "{} operation(s), {} failed, {} tender(s) registered",
            ops.len(),
            failed,
            registry.tender_count()
        );
    }
    Ok(())
}
