//! Report export: renders a ledger snapshot as CSV. Every discovered
//! business appears exactly once; unresolved or unscored businesses get
//! "N/A" instead of being omitted.

use std::io::Write;
use std::path::Path;

use tracing::info;
use vetrina_common::{BusinessRecord, VetrinaError};

pub fn write_csv(snapshot: &[BusinessRecord], path: impl AsRef<Path>) -> Result<(), VetrinaError> {
    let path = path.as_ref();
    let mut out = String::from("name,site,score\n");

    for record in snapshot {
        let site = record.site.as_deref().unwrap_or("N/A");
        let score = record
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(&record.name),
            csv_field(site),
            score
        ));
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| VetrinaError::Ledger(format!("create temp file: {e}")))?;
    tmp.write_all(out.as_bytes())
        .map_err(|e| VetrinaError::Ledger(format!("write report: {e}")))?;
    tmp.persist(path)
        .map_err(|e| VetrinaError::Ledger(format!("persist {}: {e}", path.display())))?;

    info!(path = %path.display(), rows = snapshot.len(), "Report written");
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
