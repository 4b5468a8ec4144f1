use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render(value));
}

fn render(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                render_result(&mut out, result);
                render_envelope_notes(&mut out, map);
            } else {
                render_object(&mut out, map);
            }
        }
        Value::Array(arr) => render_array(&mut out, arr),
        _ => out.push_str(&format!("{}\n", value)),
    }
    out
}

/// Scalars go in one Field/Value table; nested objects and arrays of
/// objects (comparison rows, breakdown segments) get their own titled table.
fn render_result(out: &mut String, result: &Value) {
    let Value::Object(map) = result else {
        out.push_str(&format!("{}\n", format_cell(result)));
        return;
    };

    let scalars: Map<String, Value> = map
        .iter()
        .filter(|(_, v)| !is_nested(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !scalars.is_empty() {
        render_object(out, &scalars);
    }

    for (key, val) in map.iter().filter(|(_, v)| is_nested(v)) {
        out.push_str(&format!("\n{}:\n", key));
        match val {
            Value::Object(inner) => render_object(out, inner),
            Value::Array(arr) => render_array(out, arr),
            _ => {}
        }
    }
}

fn render_envelope_notes(out: &mut String, envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings {
                if let Value::String(s) = w {
                    out.push_str(&format!("  - {}\n", s));
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\nMethodology: {}\n", meth));
    }
}

fn render_object(out: &mut String, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    out.push_str(&format!("{}\n", Table::from(builder)));
}

fn render_array(out: &mut String, arr: &[Value]) {
    if arr.is_empty() {
        out.push_str("(empty)\n");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        out.push_str(&format!("{}\n", Table::from(builder)));
    } else {
        for item in arr {
            out.push_str(&format!("{}\n", format_cell(item)));
        }
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => arr.iter().any(Value::is_object),
        _ => false,
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_cell).collect();
            items.join(", ")
        }
        _ => format_scalar(value),
    }
}
