pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of a `ComputationOutput` envelope.
fn result_fields(envelope: &Value) -> Map<String, Value> {
    envelope
        .get("result")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Per-model rows of a comparison result, empty for single-model output.
fn model_rows(result: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    result
        .get("models")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn format_scalar(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn monte_carlo_envelope() -> Value {
        json!({
            "result": {
                "price": 10.43,
                "standard_error": 0.07,
                "confidence_interval_95": [10.29, 10.57],
                "num_paths": 10000,
                "seed": 42
            },
            "methodology": "Monte Carlo Simulation",
            "assumptions": {},
            "warnings": ["Only 500 paths simulated; estimate is noisy"],
            "metadata": {"version": "0.1.0", "computation_time_us": 10, "precision": "ieee754_f64"}
        })
    }

    pub fn comparison_envelope() -> Value {
        json!({
            "result": {
                "black_scholes": 10.45,
                "binomial_european": 10.44,
                "binomial_american": 10.44,
                "monte_carlo": 10.47,
                "monte_carlo_standard_error": 0.14,
                "early_exercise_premium": 0.0,
                "models": [
                    {"model": "Black-Scholes", "price": 10.45, "difference_from_black_scholes": 0.0},
                    {"model": "Monte Carlo (European)", "price": 10.47, "difference_from_black_scholes": 0.02}
                ],
                "seed": 7
            },
            "methodology": "Model comparison against Black-Scholes",
            "assumptions": {},
            "warnings": [],
            "metadata": {"version": "0.1.0", "computation_time_us": 10, "precision": "ieee754_f64"}
        })
    }
}
