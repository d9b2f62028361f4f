//! Classify command implementation

use crate::cli::ClassifyArgs;
use crate::monitor::explain;

/// Handle `healthwatch classify`
pub fn handle_classify(args: &ClassifyArgs) -> Result<String, Box<dyn std::error::Error>> {
    let classification = explain(&args.code, &args.message);

    if args.json {
        return Ok(serde_json::to_string_pretty(&classification)?);
    }

    let rule = classification
        .category
        .map(|category| category.to_string())
        .unwrap_or_else(|| "none".to_string());

    Ok(format!(
        "Status: {} {}\nRule: {}",
        classification.status.glyph(),
        classification.status,
        rule
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(code: &str, message: &str, json: bool) -> ClassifyArgs {
        ClassifyArgs {
            code: code.to_string(),
            message: message.to_string(),
            json,
        }
    }

    #[test]
    fn test_classify_text_output() {
        let output = handle_classify(&args("ThrottlingException", "Rate exceeded", false)).unwrap();
        assert!(output.contains("degraded"));
        assert!(output.contains("Rule: transient"));
    }

    #[test]
    fn test_classify_unmatched() {
        let output = handle_classify(&args("Weird", "something odd", false)).unwrap();
        assert!(output.contains("unknown"));
        assert!(output.contains("Rule: none"));
    }

    #[test]
    fn test_classify_json_output() {
        let output = handle_classify(&args("", "access denied for user", true)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "operational");
        assert_eq!(parsed["category"], "access_rejected");
    }

    #[test]
    fn test_classify_json_unmatched_category_is_null() {
        let output = handle_classify(&args("", "", true)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "unknown");
        assert!(parsed["category"].is_null());
    }
}
