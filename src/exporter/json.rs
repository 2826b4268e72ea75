// file: src/exporter/json.rs
// description: json export of ranked lookups and unanswered reports

use crate::error::Result;
use crate::models::RankedResult;
use crate::pipeline::LookupOutcome;
use crate::search::FetchFailure;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

/// Any payload stamped with the time it was exported.
#[derive(Debug, Serialize)]
pub struct Exported<T: Serialize> {
    pub exported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Serialize)]
pub struct ExportedLookup<'a> {
    pub run_id: Uuid,
    pub from_cache: bool,
    pub result: &'a RankedResult,
    #[serde(skip_serializing_if = "no_failures")]
    pub skipped: &'a [FetchFailure],
}

impl<'a> From<&'a LookupOutcome> for ExportedLookup<'a> {
    fn from(outcome: &'a LookupOutcome) -> Self {
        Self {
            run_id: outcome.run_id,
            from_cache: outcome.from_cache,
            result: &outcome.result,
            skipped: &outcome.failures,
        }
    }
}

fn no_failures(failures: &&[FetchFailure]) -> bool {
    failures.is_empty()
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn to_string<T: Serialize>(&self, payload: T) -> Result<String> {
        let exported = Exported {
            exported_at: Utc::now(),
            payload,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&exported)?
        } else {
            serde_json::to_string(&exported)?
        };
        Ok(json)
    }

    pub fn write<T: Serialize, W: Write>(&self, payload: T, writer: &mut W) -> Result<()> {
        let json = self.to_string(payload)?;
        writeln!(writer, "{}", json)?;
        Ok(())
    }

    pub fn export_file<T: Serialize>(&self, payload: T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = self.to_string(payload)?;
        fs::write(path, json)?;
        info!("Exported JSON to {:?}", path);
        Ok(())
    }
}
