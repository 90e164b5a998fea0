use serde_json::{Map, Value};

// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 9] = [
    "monthly_payment",
    "best_bank_id",
    "maturity_amount",
    "triggered",
    "sentiment",
    "var_pct",
    "status",
    "rsi",
    "version",
];

/// Print just the headline value of the output.
///
/// Lists (alert evaluations, bank listings) print one line per entry,
/// prefixed with the entry's id when it has one.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => println!("{}", headline(map)),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(map) => match label(map) {
                        Some(id) => println!("{}: {}", id, headline(map)),
                        None => println!("{}", headline(map)),
                    },
                    other => println!("{}", format_minimal(other)),
                }
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

fn headline(map: &Map<String, Value>) -> String {
    for key in &PRIORITY_KEYS {
        if let Some(val) = map.get(*key) {
            if !val.is_null() {
                return format_minimal(val);
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn label(map: &Map<String, Value>) -> Option<&str> {
    ["bank_id", "id", "period", "year"]
        .iter()
        .find_map(|k| map.get(*k))
        .and_then(Value::as_str)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
