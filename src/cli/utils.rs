use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// One line per row in text mode, a JSON array otherwise
pub fn output_rows<T: Serialize>(
    output_format: OutputFormat,
    rows: &[T],
    empty_message: &str,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "data": rows }))?);
        }
        OutputFormat::Text if rows.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for row in rows {
                println!("{}", line(row));
            }
        }
    }
    Ok(())
}

/// Parses `ID=NAME`, as used for publishers and tags on the command line
pub fn parse_bgg_pair(value: &str) -> Result<(i64, String), String> {
    let (id, name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=NAME, got {:?}", value))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a numeric id", id))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in {:?}", value));
    }
    Ok((id, name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgg_pairs() {
        assert_eq!(parse_bgg_pair("37=KOSMOS"), Ok((37, "KOSMOS".to_string())));
        assert_eq!(parse_bgg_pair(" 1021 = Economic "), Ok((1021, "Economic".to_string())));
        assert!(parse_bgg_pair("KOSMOS").is_err());
        assert!(parse_bgg_pair("x=KOSMOS").is_err());
        assert!(parse_bgg_pair("37=").is_err());
    }
}
