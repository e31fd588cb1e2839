//! Per-layer depth-weighted translations.

use parallax_hal::{Layer, Scene};
use parallax_types::{AxisPair, Translation};
use tracing::{trace, warn};

/// Depth factor for a layer's raw `layer` attribute: `attribute / 100`, or
/// `0` when the attribute is missing or not a finite number.
pub fn depth_factor(attribute: Option<f64>) -> f64 {
    match attribute {
        Some(depth) if depth.is_finite() => depth / 100.0,
        _ => 0.0,
    }
}

/// Offset of a layer with depth factor `depth` for the given velocity.
pub fn layer_offset(velocity: AxisPair<f64>, depth: f64, invert: AxisPair<bool>) -> Translation {
    let sign = invert.map(|inverted| if inverted { -1.0 } else { 1.0 });
    Translation::new(velocity.x * depth * sign.x, velocity.y * depth * sign.y)
}

/// Ordered layer list with the depth factor of each layer, read once per
/// [`refresh`][Self::refresh].
#[derive(Default)]
pub struct LayerCompositor {
    layers: Vec<Box<dyn Layer>>,
    depths: Vec<f64>,
}

impl LayerCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the layer list from `scene` and return the number of layers.
    pub fn refresh(&mut self, scene: &dyn Scene) -> usize {
        self.layers = scene.layers();
        if self.layers.is_empty() {
            warn!("scene does not have any layers");
        }
        self.depths = self
            .layers
            .iter()
            .map(|layer| depth_factor(layer.depth_attribute()))
            .collect();
        self.layers.len()
    }

    /// Translations that [`apply`][Self::apply] would write, in layer order.
    pub fn offsets(&self, velocity: AxisPair<f64>, invert: AxisPair<bool>) -> Vec<Translation> {
        self.depths
            .iter()
            .map(|&depth| layer_offset(velocity, depth, invert))
            .collect()
    }

    /// Write the translation of every layer.
    pub fn apply(&mut self, velocity: AxisPair<f64>, invert: AxisPair<bool>) {
        let offsets = self.offsets(velocity, invert);
        for (layer, offset) in self.layers.iter_mut().zip(offsets) {
            layer.set_translation(offset);
        }
        trace!(layers = self.layers.len(), "layer translations applied");
    }

    /// Drop every layer reference.
    pub fn release(&mut self) {
        self.layers.clear();
        self.depths.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
