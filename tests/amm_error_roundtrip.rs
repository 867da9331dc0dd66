use std::collections::HashSet;

use serde_json::Value;

use swap_engine_core::amm::error::AmmError;
use swap_engine_core::amm::error_catalog::AmmErrorCode;

fn parse(err: &AmmError) -> Value {
    serde_json::from_str(&err.to_log_json()).expect("log json válido")
}

#[test]
fn json_shape_per_code() {
    for code in AmmErrorCode::all() {
        let v = parse(&AmmError::new(*code));
        assert_eq!(v["code"].as_str(), Some(code.code()));
        assert_eq!(v["title"].as_str(), Some(code.title()));
        assert!(v["message"].is_string());
        assert!(v["context"].is_object());
    }
}

#[test]
fn context_values_survive_escaping() {
    let err = AmmError::new(AmmErrorCode::InvalidRate)
        .with_context("value", "\"1.5\"\\")
        .with_context("rate", "tax_rate");
    let v = parse(&err);
    assert_eq!(v["context"]["value"], "\"1.5\"\\");
    assert_eq!(v["message"], "taxa \"1.5\"\\ inválida");
}

#[test]
fn context_keys_are_ordered() {
    let err = AmmError::new(AmmErrorCode::MaxSpreadExceeded)
        .with_context("spread", "0.4")
        .with_context("max_spread", "0.01");
    let json = err.to_log_json();
    let max = json.find("\"max_spread\"").unwrap();
    let spread = json.find("\"spread\"").unwrap();
    assert!(max < spread);
}

#[test]
fn all_codes_seen() {
    let seen: HashSet<String> = AmmErrorCode::all()
        .iter()
        .filter_map(|c| parse(&AmmError::new(*c))["code"].as_str().map(String::from))
        .collect();
    assert_eq!(seen.len(), AmmErrorCode::all().len());
}
