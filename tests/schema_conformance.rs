//! Rendered tool schemas agree with the runtime argument validation.

use serde_json::{json, Value};
use std::sync::Arc;
use tool_dispatch::tools::{builtin_registry, RateProvider};
use tool_dispatch::ToolError;

struct FixedRate;

#[async_trait::async_trait]
impl RateProvider for FixedRate {
    async fn rate(&self, _from: &str, _to: &str) -> Result<f64, ToolError> {
        Ok(1.0)
    }
}

fn samples(tool: &str) -> Vec<Value> {
    match tool {
        "convert_currency" => vec![
            json!({"from": "USD", "to": "EUR", "amount": 100}),
            json!({"from": "USD", "to": "EUR", "amount": 12.5}),
            json!({"from": "USD", "to": "EUR"}),
            json!({"from": 1, "to": "EUR", "amount": 1}),
            json!({"from": "USD", "to": "EUR", "amount": "100"}),
            json!({}),
        ],
        _ => vec![
            json!({"a": 7, "b": 50}),
            json!({"a": 7.5, "b": -2}),
            json!({"a": 7}),
            json!({"a": "7", "b": 50}),
            json!({"a": null, "b": 1}),
            json!([7, 50]),
        ],
    }
}

#[test]
fn test_bound_schemas_match_validation() {
    let registry = builtin_registry(Arc::new(FixedRate)).unwrap();
    assert_eq!(registry.names(), vec!["convert_currency", "multiply", "remainder"]);

    for definition in registry.definitions() {
        let spec = definition.spec();
        let validator = jsonschema::validator_for(&spec.parameters)
            .unwrap_or_else(|e| panic!("{} schema is not valid JSON Schema: {}", spec.name, e));

        for sample in samples(definition.name()) {
            let runtime_ok = definition.schema().validate(&sample).is_ok();
            assert_eq!(
                validator.is_valid(&sample),
                runtime_ok,
                "{} disagrees on {}",
                spec.name,
                sample
            );
        }
    }
}
