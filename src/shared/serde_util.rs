//! Custom serde helpers for backend wire formats.

/// Deserializes a Postgres `numeric` into `Decimal`.
///
/// PostgREST sends `numeric` columns as JSON numbers, while RPC results and
/// some views send them as strings. Both are accepted; `NaN`/`Infinity`
/// strings are rejected.
pub mod decimal_flexible {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    pub fn parse(text: &str) -> Result<Decimal, String> {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| format!("Invalid numeric '{}': {}", text, e))
    }

    fn parse_value(value: &serde_json::Value) -> Result<Decimal, String> {
        match value {
            serde_json::Value::String(s) => parse(s),
            serde_json::Value::Number(n) => parse(&n.to_string()),
            other => Err(format!("Expected a numeric, got {}", other)),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_value(&value).map_err(serde::de::Error::custom)
    }

    /// Row-level variant: a value that is not a finite numeric (`"NaN"`,
    /// `null`, garbage) becomes `None` instead of failing the whole batch,
    /// leaving the rejection to row validation.
    pub mod lenient {
        use super::parse_value;
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = serde_json::Value::deserialize(deserializer)?;
            match parse_value(&value) {
                Ok(decimal) => Ok(Some(decimal)),
                Err(e) => {
                    tracing::debug!(error = %e, "unparseable numeric");
                    Ok(None)
                }
            }
        }
    }
}
