//! JSON output formatting for studyfocus.

use serde::Serialize;
use serde_json::json;

use crate::detect::AssetStatus;
use crate::error::FocusError;

/// Format model asset checks as JSON
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_assets_json(assets: &[AssetStatus]) -> Result<String, FocusError> {
    let output = json!({
        "complete": assets.iter().all(|a| a.present),
        "count": assets.len(),
        "items": assets
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value as pretty JSON
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FocusError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_assets_json() {
        let assets = vec![
            AssetStatus {
                model: "tiny face detector",
                path: PathBuf::from("models/a.json"),
                present: true,
            },
            AssetStatus {
                model: "face recognition",
                path: PathBuf::from("models/b.json"),
                present: false,
            },
        ];

        let result = format_assets_json(&assets).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(parsed["complete"], false);
        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["items"][0]["model"], "tiny face detector");
    }

    #[test]
    fn test_to_json_generic() {
        let result = to_json(&json!({"state": "focused"})).unwrap();
        assert!(result.contains("\"state\": \"focused\""));
    }
}
