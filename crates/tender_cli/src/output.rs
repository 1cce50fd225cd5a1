//! Output formatting utilities.

use crate::script::OpError;
use serde_json::{json, Value};
use tender_core::RegistryEvent;

/// Result of one replayed script line.
pub struct OpReport<'a> {
    pub line: usize,
    pub op: &'static str,
    pub result: &'a Result<Value, OpError>,
    pub events: &'a [RegistryEvent],
}

/// Formats a report as one JSON line.
pub fn format_json(report: &OpReport<'_>) -> String {
    let value = match report.result {
        Ok(result) => json!({
            "line": report.line,
            "op": report.op,
            "status": "ok",
            "result": result,
            "events": report.events,
        }),
        Err(err) => json!({
            "line": report.line,
            "op": report.op,
            "status": "error",
            "error_code": err.code(),
            "error": err.to_string(),
        }),
    };
    serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a report as human-readable text, one line per op plus events.
pub fn format_text(report: &OpReport<'_>) -> String {
    let mut out = match report.result {
        Ok(result) => format!(
            "{:>4}  {:<18} ok     {}",
            report.line,
            report.op,
            compact(result)
        ),
        Err(err) => format!(
            "{:>4}  {:<18} error  {}: {}",
            report.line,
            report.op,
            err.code(),
            err
        ),
    };
    for event in report.events {
        out.push_str(&format!("\n      -> {}", describe_event(event)));
    }
    out
}

fn describe_event(event: &RegistryEvent) -> String {
    match event {
        RegistryEvent::TenderCreated { id, code } => format!("TenderCreated(id={id}, code={code})"),
        RegistryEvent::ProposalSubmitted {
            tender_id,
            proposer,
        } => format!("ProposalSubmitted(tender_id={tender_id}, proposer={proposer})"),
        RegistryEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        } => format!("OwnershipTransferred(previous={previous_owner}, new={new_owner})"),
    }
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "?".to_string())
}
