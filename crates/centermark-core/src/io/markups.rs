//! Slicer markups (`.mrk.json`) writing.
//!
//! A saved file holds a single fiducial list in RAS coordinates, loadable
//! by any markups-aware viewer.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::marker::{Fiducial, MarkerSink, MarkerStyle};

const MARKUPS_SCHEMA: &str = "https://raw.githubusercontent.com/slicer/slicer/master/Modules/Loadable/Markups/Resources/Schema/markups-schema-v1.0.3.json#";

#[derive(Serialize)]
struct MarkupsDocument<'a> {
    #[serde(rename = "@schema")]
    schema: &'static str,
    markups: Vec<Markup<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Markup<'a> {
    #[serde(rename = "type")]
    markup_type: &'static str,
    coordinate_system: &'static str,
    control_points: Vec<ControlPoint<'a>>,
    display: DisplayProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlPoint<'a> {
    id: String,
    label: &'a str,
    position: [f64; 3],
    selected: bool,
    locked: bool,
    visibility: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayProperties {
    glyph_scale: f64,
    text_scale: f64,
    color: [f64; 3],
    selected_color: [f64; 3],
}

/// Marker sink that collects fiducials and writes them as a markups file.
///
/// Placements share one display style; the style of the last placement wins.
#[derive(Clone, Debug, Default)]
pub struct MarkupsFile {
    fiducials: Vec<Fiducial>,
    style: MarkerStyle,
}

impl MarkupsFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fiducials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiducials.is_empty()
    }

    /// Write the collected fiducials as pretty-printed markups JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = MarkupsDocument {
            schema: MARKUPS_SCHEMA,
            markups: vec![Markup {
                markup_type: "Fiducial",
                coordinate_system: "RAS",
                control_points: self
                    .fiducials
                    .iter()
                    .enumerate()
                    .map(|(i, fiducial)| ControlPoint {
                        id: (i + 1).to_string(),
                        label: &fiducial.label,
                        position: [
                            fiducial.position.x,
                            fiducial.position.y,
                            fiducial.position.z,
                        ],
                        selected: true,
                        locked: false,
                        visibility: true,
                    })
                    .collect(),
                display: DisplayProperties {
                    glyph_scale: self.style.glyph_scale,
                    text_scale: self.style.text_scale,
                    color: self.style.color,
                    selected_color: self.style.selected_color,
                },
            }],
        };

        let json = serde_json::to_string_pretty(&document)?;
        fs::write(path, json)?;
        info!(
            path = %path.display(),
            fiducials = self.fiducials.len(),
            "Saved markups file"
        );
        Ok(())
    }
}

impl MarkerSink for MarkupsFile {
    fn place_fiducial(&mut self, fiducial: &Fiducial, style: &MarkerStyle) -> Result<()> {
        self.style = *style;
        self.fiducials.push(fiducial.clone());
        Ok(())
    }
}
