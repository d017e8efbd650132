use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GLYPH_SCALE, DEFAULT_MARKER_COLOR, DEFAULT_TEXT_SCALE};
use crate::error::Result;

/// A labeled world-space point for the host to annotate.
#[derive(Clone, Debug, PartialEq)]
pub struct Fiducial {
    pub position: Point3<f64>,
    pub label: String,
}

/// Display parameters for a placed fiducial.
///
/// Scales follow the markups convention (percent of view size); colors are
/// RGB in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub glyph_scale: f64,
    pub text_scale: f64,
    pub color: [f64; 3],
    pub selected_color: [f64; 3],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            glyph_scale: DEFAULT_GLYPH_SCALE,
            text_scale: DEFAULT_TEXT_SCALE,
            color: DEFAULT_MARKER_COLOR,
            selected_color: DEFAULT_MARKER_COLOR,
        }
    }
}

/// Marker-placement capability of the host application.
///
/// The pipeline emits one fiducial per run; rendering it is the host's
/// business.
pub trait MarkerSink {
    fn place_fiducial(&mut self, fiducial: &Fiducial, style: &MarkerStyle) -> Result<()>;
}

/// Sink that discards markers, for callers that only want the report.
pub struct NullMarkerSink;

impl MarkerSink for NullMarkerSink {
    fn place_fiducial(&mut self, _fiducial: &Fiducial, _style: &MarkerStyle) -> Result<()> {
        Ok(())
    }
}
