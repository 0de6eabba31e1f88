// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

pub trait Renderer {
    /// Renders through the renderer's camera. The scene is borrowed mutably
    /// only to lend that camera's film out for the duration of the render.
    fn render(&self, scene: &mut Scene) -> Bitmap;
}
