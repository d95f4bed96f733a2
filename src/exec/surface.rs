//! Rendering surface handed to sandboxed code.
//!
//! Each execution attempt receives one fresh, exclusively-owned surface.
//! Code mutates it through the `container` handle (and the plotting handles
//! that draw onto it); after evaluation the host reads the snapshot back.
//! Surfaces are never shared or reused, so plots cannot bleed between
//! blocks, and mutations made before a failure are preserved as-is.

use serde::{Deserialize, Serialize};

/// One visual artifact recorded on a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Artifact {
    /// A plot drawn through the `Plotly` handle.
    Plot {
        /// Trace data passed to the plot call.
        traces: serde_json::Value,
        /// Optional layout object.
        #[serde(default)]
        layout: Option<serde_json::Value>,
    },

    /// A chart constructed through the `Chart` handle.
    Chart {
        /// Full chart configuration object.
        #[serde(default)]
        config: Option<serde_json::Value>,
    },

    /// Free-form text appended through the `container` handle.
    Text {
        /// The appended text.
        content: String,
    },
}

impl Artifact {
    /// Returns a short human-readable label for text rendering.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Plot { traces, .. } => {
                let count = traces.as_array().map_or(1, Vec::len);
                format!("plot: {count} trace(s)")
            }
            Self::Chart { config } => {
                let kind = config
                    .as_ref()
                    .and_then(|c| c.get("type"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("chart");
                format!("chart: {kind}")
            }
            Self::Text { content } => content.clone(),
        }
    }
}

/// Snapshot of a rendering surface after one execution attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSurface {
    /// Raw markup assigned to the surface by the code.
    #[serde(default)]
    pub html: String,

    /// Ordered artifacts recorded during execution.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl RenderSurface {
    /// Returns true when the code left no visual output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_surface() {
        assert!(RenderSurface::default().is_empty());
    }

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "html": "<b>4</b>",
            "artifacts": [
                {"kind": "plot", "traces": [{"x": [1], "y": [2]}], "layout": null},
                {"kind": "chart", "config": {"type": "bar"}},
                {"kind": "text", "content": "done"}
            ]
        }"#;
        let surface: RenderSurface = serde_json::from_str(json).unwrap();

        assert_eq!(surface.html, "<b>4</b>");
        assert_eq!(surface.artifacts.len(), 3);
        assert!(matches!(surface.artifacts[0], Artifact::Plot { .. }));
        assert!(matches!(surface.artifacts[1], Artifact::Chart { .. }));
        assert!(matches!(
            surface.artifacts[2],
            Artifact::Text { ref content } if content == "done"
        ));
    }

    #[test]
    fn test_artifact_labels() {
        let plot = Artifact::Plot {
            traces: json!([{}, {}]),
            layout: None,
        };
        assert_eq!(plot.label(), "plot: 2 trace(s)");

        let chart = Artifact::Chart {
            config: Some(json!({"type": "bar"})),
        };
        assert_eq!(chart.label(), "chart: bar");

        let text = Artifact::Text {
            content: "hi".to_string(),
        };
        assert_eq!(text.label(), "hi");
    }
}
