//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::storm::response::Geometry;
use crate::storm::StormResponse;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn push_positions(output: &mut String, positions: &[[f64; 2]]) {
    for (i, [lon, lat]) in positions.iter().enumerate() {
        let label = if i == 0 {
            "t+0".to_string()
        } else {
            format!("#{}", i)
        };
        output.push_str(&format!("  {:>4}: ({:.3}, {:.3})\n", label, lat, lon));
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, response: &StormResponse) -> Result<String> {
        let mut output = String::new();

        match response {
            StormResponse::NoStorm(no_storm) => {
                output.push_str(&format!("{}\n", no_storm.message));
            }
            StormResponse::Detected(detected) => {
                output.push_str("Storm detected\n");
                output.push_str(&format!(
                    "Center: ({:.3}, {:.3})\n",
                    detected.center[0], detected.center[1]
                ));
                output.push_str(&format!("Warning: {}\n", detected.warning.label()));
                output.push_str(&format!(
                    "Landfall (VN): {}\n\n",
                    if detected.landfall_vn { "yes" } else { "no" }
                ));

                output.push_str("Track:\n");
                if let Geometry::LineString { coordinates } = &detected.track {
                    push_positions(&mut output, coordinates);
                }
            }
            StormResponse::Fallback(collection) => {
                output.push_str("No coherent storm cluster; showing placeholder track\n\n");
                output.push_str("Track:\n");
                if let Some(positions) = response.track_positions() {
                    push_positions(&mut output, positions);
                }
                let named = collection
                    .features
                    .iter()
                    .filter_map(|f| f.properties.as_ref()?.get("name")?.as_str());
                for name in named {
                    output.push_str(&format!("  ({})\n", name));
                }
            }
            StormResponse::Error(payload) => {
                output.push_str(&format!("Error: {}\n", payload.error));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;
    use crate::storm::response::{demonstration_track, NO_DATA_MESSAGE};

    #[test]
    fn test_text_detected() {
        let output = TextFormatter.format(&fixtures::detected()).unwrap();

        assert!(output.contains("Storm detected"));
        assert!(output.contains("Center: (15.000, 111.000)"));
        assert!(output.contains("Warning: Typhoon"));
        assert!(output.contains("Landfall (VN): yes"));
        assert!(output.contains(" t+0: (15.000, 111.000)"));
        assert!(output.contains("  #3: (17.000, 108.000)"));
    }

    #[test]
    fn test_text_no_storm() {
        let output = TextFormatter
            .format(&StormResponse::no_storm(NO_DATA_MESSAGE))
            .unwrap();
        assert_eq!(output, "No storm data available\n");
    }

    #[test]
    fn test_text_fallback() {
        let output = TextFormatter
            .format(&StormResponse::Fallback(demonstration_track()))
            .unwrap();
        assert!(output.contains("placeholder"));
        assert!(output.contains("(12.000, 118.000)"));
        assert!(output.contains("Storm center (t+0)"));
    }

    #[test]
    fn test_text_error() {
        let output = TextFormatter.format(&StormResponse::error("boom")).unwrap();
        assert_eq!(output, "Error: boom\n");
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
