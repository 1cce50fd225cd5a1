//! Operation scripts: one JSON object per line, replayed in order.
//!
//! ```text
//! {"op":"create_tender","caller":"0xA","code":"VNT-2025-001","description":"Equipment","document_hash":"0xhash1"}
//! {"op":"submit_proposal","caller":"0xC","tender_id":1,"proposal_hash":"0xabc"}
//! {"op":"get_proposals","tender_id":1}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tender_core::{Identity, RegistryError, TenderId, TenderListQuery, TenderRegistry};

/// One registry call, as written in a script line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    CreateTender {
        caller: String,
        code: String,
        description: String,
        document_hash: String,
    },
    SubmitProposal {
        caller: String,
        tender_id: u64,
        proposal_hash: String,
    },
    /// Hashes the file at `path` (relative to the script) and submits it.
    SubmitDocument {
        caller: String,
        tender_id: u64,
        path: String,
    },
    GetTender {
        tender_id: u64,
    },
    GetProposals {
        tender_id: u64,
    },
    ListTenders {
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        offset: u32,
    },
    CurrentOwner,
    TransferOwnership {
        caller: String,
        new_owner: String,
    },
}

impl ScriptOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTender { .. } => "create_tender",
            Self::SubmitProposal { .. } => "submit_proposal",
            Self::SubmitDocument { .. } => "submit_document",
            Self::GetTender { .. } => "get_tender",
            Self::GetProposals { .. } => "get_proposals",
            Self::ListTenders { .. } => "list_tenders",
            Self::CurrentOwner => "current_owner",
            Self::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

/// Malformed script line.
#[derive(Debug)]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "script line {}: {}", self.line, self.message)
    }
}

impl Error for ScriptError {}

/// Parses every operation up front so a typo aborts before any replay.
pub fn parse_script(text: &str) -> Result<Vec<(usize, ScriptOp)>, ScriptError> {
    let mut ops = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let op = serde_json::from_str::<ScriptOp>(line).map_err(|e| ScriptError {
            line: index + 1,
            message: e.to_string(),
        })?;
        ops.push((index + 1, op));
    }
    Ok(ops)
}

/// Failure of a single replayed operation.
#[derive(Debug)]
pub enum OpError {
    Registry(RegistryError),
    Document { path: String, message: String },
}

impl OpError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Registry(RegistryError::AccessDenied { .. }) => "access_denied",
            Self::Registry(RegistryError::TenderNotFound(_)) => "tender_not_found",
            Self::Document { .. } => "document_unreadable",
        }
    }
}

impl Display for OpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Document { path, message } => {
                write!(f, "failed to read document `{path}`: {message}")
            }
        }
    }
}

impl Error for OpError {}

impl From<RegistryError> for OpError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Applies `op` to `registry`. `base_dir` resolves relative document paths.
pub fn execute(
    registry: &TenderRegistry,
    op: &ScriptOp,
    base_dir: &Path,
) -> Result<Value, OpError> {
    match op {
        ScriptOp::CreateTender {
            caller,
            code,
            description,
            document_hash,
        } => {
            let id = registry.create_tender(
                &Identity::new(caller.as_str()),
                code.as_str(),
                description.as_str(),
                document_hash.as_str(),
            )?;
            Ok(json!({ "id": id }))
        }
        ScriptOp::SubmitProposal {
            caller,
            tender_id,
            proposal_hash,
        } => {
            let tender_id = TenderId::new(*tender_id);
            registry.submit_proposal(
                &Identity::new(caller.as_str()),
                tender_id,
                proposal_hash.as_str(),
            )?;
            Ok(json!({ "tender_id": tender_id }))
        }
        ScriptOp::SubmitDocument {
            caller,
            tender_id,
            path,
        } => {
            let bytes = std::fs::read(base_dir.join(path)).map_err(|e| OpError::Document {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let tender_id = TenderId::new(*tender_id);
            let proposal_hash = registry.submit_proposal_document(
                &Identity::new(caller.as_str()),
                tender_id,
                &bytes,
            )?;
            Ok(json!({ "tender_id": tender_id, "proposal_hash": proposal_hash }))
        }
        ScriptOp::GetTender { tender_id } => {
            let tender = registry.get_tender(TenderId::new(*tender_id))?;
            Ok(json!(tender))
        }
        ScriptOp::GetProposals { tender_id } => {
            let proposals = registry.get_proposals(TenderId::new(*tender_id))?;
            Ok(json!(proposals))
        }
        ScriptOp::ListTenders { limit, offset } => {
            let tenders = registry.list_tenders(&TenderListQuery {
                limit: *limit,
                offset: *offset,
            });
            Ok(json!({ "total": registry.tender_count(), "tenders": tenders }))
        }
        ScriptOp::CurrentOwner => Ok(json!({ "owner": registry.current_owner() })),
        ScriptOp::TransferOwnership { caller, new_owner } => {
            registry.transfer_ownership(
                &Identity::new(caller.as_str()),
                Identity::new(new_owner.as_str()),
            )?;
            Ok(json!({ "owner": registry.current_owner() }))
        }
    }
}
