use serde_json::Value;

use super::{format_scalar, result_fields};

/// Headline field of each command's result, in priority order.
const HEADLINE_KEYS: [&str; 3] = ["price", "annualized_volatility", "black_scholes"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

fn render_minimal(envelope: &Value) -> String {
    let result = result_fields(envelope);
    let Some((key, val)) = HEADLINE_KEYS
        .iter()
        .find_map(|key| result.get(*key).map(|val| (*key, val)))
    else {
        return String::new();
    };
    // Simulated prices carry their sampling error
    match result.get("standard_error") {
        Some(se) if key == "price" => {
            format!("{} ± {}", format_scalar(val, "null"), format_scalar(se, "null"))
        }
        _ => format_scalar(val, "null"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_simulated_price_with_error() {
        assert_eq!(render_minimal(&fixtures::monte_carlo_envelope()), "10.43 ± 0.07");
    }

    #[test]
    fn test_comparison_headline_is_black_scholes() {
        assert_eq!(render_minimal(&fixtures::comparison_envelope()), "10.45");
    }

    #[test]
    fn test_volatility_headline() {
        let envelope = json!({"result": {"daily_volatility": 0.01, "annualized_volatility": 0.1587}});
        assert_eq!(render_minimal(&envelope), "0.1587");
    }
}
