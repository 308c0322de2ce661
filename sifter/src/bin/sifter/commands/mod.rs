pub mod normalize;
pub mod plan;
pub mod scopes;

use anyhow::{Result, bail};
use serde_json::Value;

/// Interpret a filter-spec argument.
///
/// Anything that parses as JSON is taken as JSON; otherwise the raw text is a single scope
/// name, so `sifter normalize active` works without quoting.
pub fn parse_spec_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse a `key=value` option; the value follows the same JSON-or-string rule.
pub fn parse_option(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid option '{raw}': expected key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid option '{raw}': key cannot be empty");
    }
    Ok((key.to_string(), parse_spec_arg(value)))
}

/// Render arguments the way they were written, e.g. `"Doe", 3`
pub fn format_args_list(args: &[Value]) -> String {
    args.iter().map(Value::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_arg_prefers_json() {
        assert_eq!(parse_spec_arg(r#"["a", {"b": [1]}]"#), json!(["a", { "b": [1] }]));
        assert_eq!(parse_spec_arg("42"), json!(42));
        assert_eq!(parse_spec_arg("active"), json!("active"));
    }

    #[test]
    fn option_splits_on_first_equals() {
        assert_eq!(parse_option("limit=10").unwrap(), ("limit".to_string(), json!(10)));
        assert_eq!(
            parse_option("conditions=a=b").unwrap(),
            ("conditions".to_string(), json!("a=b"))
        );
        assert!(parse_option("limit").is_err());
        assert!(parse_option("=5").is_err());
    }

    #[test]
    fn formats_arguments() {
        assert_eq!(format_args_list(&[json!("Doe"), json!(3)]), "\"Doe\", 3");
        assert_eq!(format_args_list(&[]), "");
    }
}
