//! GPX output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::storm::StormResponse;
use chrono::{SecondsFormat, Utc};

/// GPX formatter - outputs the storm center as a waypoint and the track as a GPX track
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX track file"
    }

    fn format(&self, response: &StormResponse) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="storm-track">"#);
        gpx.push('\n');

        // Metadata
        let description = match response {
            StormResponse::NoStorm(no_storm) => no_storm.message.clone(),
            StormResponse::Detected(detected) => detected.warning.label().to_string(),
            StormResponse::Fallback(_) => "Placeholder track".to_string(),
            StormResponse::Error(payload) => payload.error.clone(),
        };
        gpx.push_str("  <metadata>\n");
        gpx.push_str("    <name>storm-track</name>\n");
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&description)));
        gpx.push_str(&format!(
            "    <time>{}</time>\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        gpx.push_str("  </metadata>\n");

        // Center waypoint
        if let StormResponse::Detected(detected) = response {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                detected.center[0], detected.center[1]
            ));
            gpx.push('\n');
            gpx.push_str("    <name>Storm center</name>\n");
            gpx.push_str(&format!(
                "    <desc>{}, landfall: {}</desc>\n",
                detected.warning.label(),
                detected.landfall_vn
            ));
            gpx.push_str("  </wpt>\n");
        }

        // Track
        if let Some(positions) = response.track_positions() {
            gpx.push_str("  <trk>\n");
            gpx.push_str("    <name>Projected track</name>\n");
            gpx.push_str("    <trkseg>\n");
            for [lon, lat] in positions {
                gpx.push_str(&format!(r#"      <trkpt lat="{}" lon="{}"/>"#, lat, lon));
                gpx.push('\n');
            }
            gpx.push_str("    </trkseg>\n");
            gpx.push_str("  </trk>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;
    use crate::storm::response::NO_STORM_MESSAGE;

    #[test]
    fn test_gpx_format() {
        let output = GpxFormatter.format(&fixtures::detected()).unwrap();

        assert!(output.contains(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<gpx version="1.1""#));
        assert!(output.contains(r#"<wpt lat="15" lon="111">"#));
        assert!(output.contains("<name>Storm center</name>"));
        assert_eq!(output.matches("<trkpt").count(), 4);
        assert!(output.contains(r#"<trkpt lat="17" lon="108"/>"#));
        assert!(output.contains("</gpx>"));
    }

    #[test]
    fn test_gpx_no_storm_has_no_track() {
        let output = GpxFormatter
            .format(&StormResponse::no_storm(NO_STORM_MESSAGE))
            .unwrap();
        assert!(!output.contains("<trk>"));
        assert!(!output.contains("<wpt"));
        assert!(output.contains("<desc>No storm detected</desc>"));
    }

    #[test]
    fn test_gpx_escapes_messages() {
        let output = GpxFormatter
            .format(&StormResponse::error("a < b & c"))
            .unwrap();
        assert!(output.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_gpx_formatter_info() {
        assert_eq!(GpxFormatter.name(), "gpx");
        assert!(!GpxFormatter.description().is_empty());
    }
}
