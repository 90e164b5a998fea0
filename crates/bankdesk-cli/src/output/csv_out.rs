use serde_json::{Map, Value};
use std::io;

// Lists that carry the rows of a result when one is present.
const ROW_KEYS: [&str; 4] = ["offers", "cards", "schedule_preview", "rows"];

/// Write output as CSV to stdout.
///
/// A result that carries a list of records is written as that list, one
/// row per record; anything else becomes two-column field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match row_list(result) {
                Some(rows) => write_records(&mut wtr, rows),
                None => write_pairs(&mut wtr, result),
            },
            Some(Value::Array(rows)) => write_records(&mut wtr, rows),
            _ => write_pairs(&mut wtr, map),
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn row_list(result: &Map<String, Value>) -> Option<&Vec<Value>> {
    ROW_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
        _ => None,
    })
}

fn write_pairs(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join("; "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
