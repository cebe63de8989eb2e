//! Drawing interface
//!
//! The loop hands the registry to a renderer once per due tick: static
//! objects (walls, bricks) before the sub-steps run, moving objects after
//! the tick's state has settled.

use crate::sim::ObjectManager;

pub trait Renderer {
    /// Walls and bricks
    fn draw_static(&mut self, objects: &ObjectManager);
    /// Paddle, balls and falling power-ups
    fn draw_dynamic(&mut self, objects: &ObjectManager);
}

/// Renderer that draws nothing (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_static(&mut self, _objects: &ObjectManager) {}
    fn draw_dynamic(&mut self, _objects: &ObjectManager) {}
}
