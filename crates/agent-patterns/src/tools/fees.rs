//! Payment method fee lookup

use agent_llm::tools::schema;
use agent_tools::{FunctionTool, ToolOutcome};
use serde::Deserialize;
use serde_json::json;

/// Tool name as the model sees it
pub const FEE_TOOL: &str = "get_fee_for_payment_method";

/// Internal fee structure, keyed by lowercase payment method
const FEE_TABLE: [(&str, f64); 3] = [
    ("platinum credit card", 0.02),
    ("gold debit card", 0.035),
    ("bank transfer", 0.01),
];

#[derive(Debug, Deserialize)]
struct FeeArgs {
    method: String,
}

/// Transaction fee for a payment method, matched case-insensitively
///
/// ```
/// use agent_patterns::tools::fee_for_payment_method;
/// use serde_json::json;
///
/// assert_eq!(
///     fee_for_payment_method("Platinum Credit Card").into_value(),
///     json!({"status": "success", "fee_percentage": 0.02})
/// );
/// ```
pub fn fee_for_payment_method(method: &str) -> ToolOutcome {
    let method = method.to_lowercase();
    match FEE_TABLE.iter().find(|(name, _)| *name == method) {
        Some((_, fee)) => ToolOutcome::success(json!({ "fee_percentage": fee })),
        None => ToolOutcome::error("Payment method not found"),
    }
}

/// The fee lookup as a function tool
pub fn fee_tool() -> FunctionTool {
    FunctionTool::typed(
        FEE_TOOL,
        "Looks up the transaction fee percentage for a given payment method. \
         Returns {\"status\": \"success\", \"fee_percentage\": 0.02} on success or \
         {\"status\": \"error\", \"error_message\": \"Payment method not found\"}.",
        schema::object(
            json!({
                "method": schema::string(
                    "The name of the payment method, e.g. \"platinum credit card\" or \"bank transfer\""
                )
            }),
            vec!["method"],
        ),
        |args: FeeArgs| fee_for_payment_method(&args.method),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::RunContext;
    use agent_tools::Tool;

    #[test]
    fn test_known_methods() {
        assert_eq!(
            fee_for_payment_method("platinum credit card").into_value(),
            json!({"status": "success", "fee_percentage": 0.02})
        );
        assert_eq!(
            fee_for_payment_method("gold debit card").into_value(),
            json!({"status": "success", "fee_percentage": 0.035})
        );
        assert_eq!(
            fee_for_payment_method("Bank Transfer").into_value(),
            json!({"status": "success", "fee_percentage": 0.01})
        );
    }

    #[test]
    fn test_unknown_method() {
        assert_eq!(
            fee_for_payment_method("paypal").into_value(),
            json!({"status": "error", "error_message": "Payment method not found"})
        );
    }

    #[tokio::test]
    async fn test_tool_wrapper() {
        let tool = fee_tool();
        let result = tool
            .execute(json!({"method": "gold debit card"}), &RunContext::default())
            .await
            .unwrap();

        assert_eq!(result, json!({"status": "success", "fee_percentage": 0.035}));
        assert_eq!(tool.name(), FEE_TOOL);
        assert_eq!(tool.input_schema()["required"], json!(["method"]));
    }
}
