//! Terminal map renderer.
//!
//! Prints layer changes and camera moves as text, one line each, so a
//! navigation flow can be followed without a map surface.

use std::io::Write;

use wayfinder::render::{
    Camera, Layer, LayerChanges, LayerGeometry, LayerStyle, MapRenderer, RenderPlan,
};

/// Output format for render plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Text,
    Json,
}

/// [`MapRenderer`] writing to any `Write` sink.
pub struct TextMapRenderer<W: Write> {
    out: W,
    format: PlanFormat,
}

impl<W: Write> TextMapRenderer<W> {
    pub fn new(out: W, format: PlanFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, plan: &RenderPlan, changes: &LayerChanges) -> std::io::Result<()> {
        for id in &changes.remove {
            writeln!(self.out, "  - {}", id)?;
        }
        for layer in &changes.upsert {
            writeln!(self.out, "  + {}", describe_layer(layer))?;
        }
        match plan.camera {
            Camera::FitBounds { bounds, padding } => writeln!(
                self.out,
                "  camera: fit {:.5},{:.5} .. {:.5},{:.5} (padding {}px)",
                bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon, padding
            ),
            Camera::Center { center, zoom } => {
                writeln!(self.out, "  camera: center {} zoom {}", center, zoom)
            }
        }
    }

    fn write_json(&mut self, plan: &RenderPlan) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, plan)?;
        writeln!(self.out)
    }
}

impl<W: Write> MapRenderer for TextMapRenderer<W> {
    fn apply(&mut self, plan: &RenderPlan, changes: &LayerChanges) {
        let result = match self.format {
            PlanFormat::Text => self.write_text(plan, changes),
            PlanFormat::Json => self.write_json(plan),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to print render plan");
        }
    }
}

fn describe_layer(layer: &Layer) -> String {
    let color = match layer.style {
        LayerStyle::Marker(style) => style.color,
        LayerStyle::Line(style) => style.color,
    };
    match &layer.geometry {
        LayerGeometry::Point(point) => format!("{} at {} ({})", layer.id, point, color),
        LayerGeometry::Line(points) => {
            format!("{} with {} points ({})", layer.id, points.len(), color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder::geo::Coordinate;
    use wayfinder::navigation::{Destination, NavigationState};
    use wayfinder::position::Location;
    use wayfinder::render::LayerTracker;

    fn state() -> NavigationState {
        NavigationState {
            location: Some(Location::live(20.6597, -103.3496, None)),
            destination: Some(Destination::new(
                "poi.1",
                "Parking",
                Coordinate::new(20.689791, -103.417812),
            )),
            route: None,
            test_mode_active: false,
            show_destination_pin: true,
        }
    }

    #[test]
    fn test_text_output_lists_changes() {
        let plan = RenderPlan::from_state(&state());
        let mut tracker = LayerTracker::new();
        let changes = tracker.diff(&plan);

        let mut renderer = TextMapRenderer::new(Vec::new(), PlanFormat::Text);
        renderer.apply(&plan, &changes);
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains("+ origin-circle at 20.659700,-103.349600"));
        assert!(output.contains("+ destination-circle"));
        assert!(output.contains("camera: fit"));
    }

    #[test]
    fn test_removed_layers_printed() {
        let mut tracker = LayerTracker::new();
        tracker.diff(&RenderPlan::from_state(&state()));
        let empty = RenderPlan::from_state(&NavigationState::default());
        let changes = tracker.diff(&empty);

        let mut renderer = TextMapRenderer::new(Vec::new(), PlanFormat::Text);
        renderer.apply(&empty, &changes);
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains("- origin-circle"));
        assert!(output.contains("camera: center"));
    }

    #[test]
    fn test_json_output_is_valid() {
        let plan = RenderPlan::from_state(&state());
        let mut renderer = TextMapRenderer::new(Vec::new(), PlanFormat::Json);
        renderer.apply(&plan, &LayerChanges::default());

        let value: serde_json::Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        assert_eq!(value["camera"]["mode"], "fit_bounds");
        assert_eq!(value["layers"].as_array().unwrap().len(), 2);
    }
}
