use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use stopsig_experiment::ParticipantRecord;
use stopsig_export::record_to_csv;

/// Converts every stored record under `results/` (or the directory given as
/// the first argument) into a CSV with the same basename.
fn main() -> Result<()> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "results".into());
    let dir = Path::new(&dir);

    let entries = fs::read_dir(dir)
        .with_context(|| format!("cannot read results directory {}", dir.display()))?;

    let mut converted = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let record: ParticipantRecord = serde_json::from_str(&data)
            .with_context(|| format!("malformed record in {}", path.display()))?;

        let csv_path = path.with_extension("csv");
        fs::write(&csv_path, record_to_csv(&record))
            .with_context(|| format!("cannot write {}", csv_path.display()))?;
        println!(
            "CSV written to {} (practice trials filtered out)",
            csv_path.display()
        );
        converted += 1;
    }

    if converted == 0 {
        println!("no stored records found in {}", dir.display());
    }
    Ok(())
}
