//! Scene container and layer traits.

use parallax_types::Translation;

/// One element of the scene that moves with the parallax effect.
pub trait Layer {
    /// The raw `layer` depth attribute, if the element carries one.
    ///
    /// The engine divides it by 100 to obtain the depth factor; `None`,
    /// zero and non-numbers all produce a depth factor of `0`.
    fn depth_attribute(&self) -> Option<f64>;

    /// Move the layer to `translation` (in container units).
    fn set_translation(&mut self, translation: Translation);
}

/// The container that owns the layers.
pub trait Scene {
    /// Current container width.
    fn width(&self) -> f64;

    /// Current container height.
    fn height(&self) -> f64;

    /// The container's layers, in document order.
    ///
    /// Called only when the engine refreshes its layer list; the returned
    /// handles must keep addressing the same elements afterwards.
    fn layers(&self) -> Vec<Box<dyn Layer>>;
}
