//! Static exchange rate table

use agent_llm::tools::schema;
use agent_tools::{FunctionTool, ToolOutcome};
use serde::Deserialize;
use serde_json::json;

/// Tool name as the model sees it
pub const EXCHANGE_RATE_TOOL: &str = "get_exchange_rate";

/// Rates from a base currency to its supported targets, lowercase ISO 4217 codes
const RATE_TABLE: [(&str, &[(&str, f64)]); 1] = [(
    "usd",
    &[("eur", 0.93), ("jpy", 157.50), ("inr", 83.58)],
)];

#[derive(Debug, Deserialize)]
struct RateArgs {
    base_currency: String,
    target_currency: String,
}

/// Exchange rate between two currencies
///
/// Codes are matched case-insensitively; the error message echoes them as given.
pub fn exchange_rate(base_currency: &str, target_currency: &str) -> ToolOutcome {
    let base = base_currency.to_lowercase();
    let target = target_currency.to_lowercase();

    let rate = RATE_TABLE
        .iter()
        .find(|(code, _)| *code == base)
        .and_then(|(_, targets)| targets.iter().find(|(code, _)| *code == target))
        .map(|(_, rate)| *rate);

    match rate {
        Some(rate) => ToolOutcome::success(json!({ "rate": rate })),
        None => ToolOutcome::error(format!(
            "Unsupported currency pair {base_currency}/{target_currency}"
        )),
    }
}

/// The rate lookup as a function tool
pub fn exchange_rate_tool() -> FunctionTool {
    FunctionTool::typed(
        EXCHANGE_RATE_TOOL,
        "Looks up and returns the exchange rate between two currencies. \
         Returns {\"status\": \"success\", \"rate\": 0.93} on success or \
         {\"status\": \"error\", \"error_message\": \"Unsupported currency pair\"}.",
        schema::object(
            json!({
                "base_currency": schema::string(
                    "ISO 4217 code of the currency you are converting from (e.g. \"USD\")"
                ),
                "target_currency": schema::string(
                    "ISO 4217 code of the currency you are converting to (e.g. \"EUR\")"
                ),
            }),
            vec!["base_currency", "target_currency"],
        ),
        |args: RateArgs| exchange_rate(&args.base_currency, &args.target_currency),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_pairs() {
        assert_eq!(
            exchange_rate("USD", "EUR").into_value(),
            json!({"status": "success", "rate": 0.93})
        );
        assert_eq!(exchange_rate("usd", "jpy").get("rate"), Some(&json!(157.5)));
        assert_eq!(exchange_rate("Usd", "Inr").get("rate"), Some(&json!(83.58)));
    }

    #[test]
    fn test_unsupported_pairs() {
        assert_eq!(
            exchange_rate("USD", "GBP").into_value(),
            json!({"status": "error", "error_message": "Unsupported currency pair USD/GBP"})
        );
        assert_eq!(
            exchange_rate("EUR", "USD").error_message(),
            Some("Unsupported currency pair EUR/USD")
        );
    }
}
