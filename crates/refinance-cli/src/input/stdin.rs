use serde_json::Value;
use std::io::{self, Read};

/// Form values piped on stdin as JSON. `None` when stdin is a terminal or
/// the pipe is empty, so callers can fall back to flags and defaults.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let parsed = parse_piped(&buffer)?;
    if parsed.is_some() {
        tracing::info!(bytes = buffer.len(), "read input from stdin");
    }
    Ok(parsed)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, serde_json::Error> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pipe_is_none() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_pipe() {
        let value = parse_piped("{\"remaining_years\": 20}\n").unwrap().unwrap();
        assert_eq!(value["remaining_years"], 20);
    }

    #[test]
    fn test_malformed_pipe_is_error() {
        assert!(parse_piped("remaining_years=20").is_err());
    }
}
