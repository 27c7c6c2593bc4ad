use serde_json::Value;
use std::io;

use super::{format_scalar, model_rows, result_fields};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV write error: {}", e);
    }
}

/// Comparison output writes the model table first, then every other result
/// field as `field,value` rows so the run can be replayed.
fn write_csv<W: io::Write>(envelope: &Value, out: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);
    let result = result_fields(envelope);

    let rows = model_rows(&result);
    if let Some(first) = rows.first() {
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        wtr.write_record(&headers)?;
        for row in &rows {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| row.get(*h).map(|v| format_scalar(v, "")).unwrap_or_default()),
            )?;
        }
    }

    wtr.write_record(["field", "value"])?;
    for (key, val) in result.iter().filter(|(key, _)| key.as_str() != "models") {
        wtr.write_record([key.as_str(), &format_scalar(val, "")])?;
    }
    wtr.flush()?;
    Ok(())
}
