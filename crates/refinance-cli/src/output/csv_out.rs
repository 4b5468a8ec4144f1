use serde_json::Value;
use std::io;

use super::format_scalar;

/// Write output as two-column CSV (`field,value`) to stdout. Nested values
/// are flattened to dotted paths, e.g. `comparison.2.after`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let _ = write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    wtr.write_record(["field", "value"])?;
    let mut rows = Vec::new();
    flatten("", body, &mut rows);
    for (field, val) in rows {
        wtr.write_record([field.as_str(), val.as_str()])?;
    }
    Ok(())
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(key), val, rows);
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&join(&i.to_string()), val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), format_scalar(value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_csv(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_flattens_nested_result() {
        let value = json!({
            "result": {
                "headline": {"total_savings": "178"},
                "comparison": [{"item": "total_interest", "delta": "238"}],
                "break_even_months": null
            }
        });
        let text = to_csv(&value);
        assert!(text.starts_with("field,value\n"));
        assert!(text.contains("headline.total_savings,178\n"));
        assert!(text.contains("comparison.0.item,total_interest\n"));
        assert!(text.contains("comparison.0.delta,238\n"));
        assert!(text.contains("break_even_months,\n"));
    }
}
