use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, model_rows, result_fields};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render_table(value));
}

fn render_table(envelope: &Value) -> String {
    let result = result_fields(envelope);
    let mut out = String::new();

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result.iter().filter(|(key, _)| key.as_str() != "models") {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    out.push_str(&format!("{}\n", Table::from(builder)));

    // Comparison output gets a second table, one row per model
    let rows = model_rows(&result);
    if let Some(first) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);
        for row in &rows {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| row.get(h).map(format_value).unwrap_or_default()),
            );
        }
        out.push_str(&format!("\n{}\n", Table::from(builder)));
    }

    let warnings: Vec<&str> = envelope
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    if let Some(meth) = envelope.get("methodology").and_then(Value::as_str) {
        out.push_str(&format!("\nMethodology: {meth}\n"));
    }
    out
}

/// Arrays (the confidence interval) are joined inline.
fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => format_scalar(value, "null"),
    }
}
