// Copyright @yucwang 2026

use crate::core::bxdf::BxDF;
use crate::core::config::RenderOptions;
use crate::core::material::Material;
use crate::core::scene::Scene;
use crate::core::shape::Shape;
use crate::core::texture::Texture;
use crate::materials::blinn_microfacet::BlinnMicrofacetBxDF;
use crate::materials::diffuse_transmission::DiffuseTransmissionBxDF;
use crate::materials::lambertian_diffuse::LambertBxDF;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::transform::Transform;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::disc::Disc;
use crate::shapes::square_plane::SquarePlane;
use crate::textures::image::{ImageTexture, TextureError};
use std::sync::Arc;

fn wall(translate: Vector3f, rotate: Vector3f) -> Arc<dyn Shape> {
    Arc::new(SquarePlane::new(Transform::from_trs(translate, rotate, Vector3f::new(2.0, 2.0, 1.0))))
}

fn diffuse(color: RGBSpectrum) -> Arc<Material> {
    let lobes: Vec<Arc<dyn BxDF>> = vec![Arc::new(LambertBxDF::default())];
    Arc::new(Material::new(color, lobes))
}

/// The built-in scene at the size the command line asks for, with the
/// optional back wall image loaded from disk.
pub fn from_options(options: &RenderOptions) -> Result<Scene, TextureError> {
    let texture: Option<Arc<dyn Texture>> = match &options.texture {
        Some(path) => {
            let image: Arc<dyn Texture> = Arc::new(ImageTexture::open(path, true)?);
            Some(image)
        }
        None => None,
    };
    Ok(build_with_texture(options.width, options.height, texture))
}

/// Box spanning [-1, 1]³, open towards +z, lit by a disc under the ceiling.
/// Camera 0 looks in through the open side at `width` x `height`.
pub fn build(width: usize, height: usize) -> Scene {
    build_with_texture(width, height, None)
}

pub fn build_with_texture(width: usize,
                          height: usize,
                          back_wall_texture: Option<Arc<dyn Texture>>) -> Scene {
    let mut scene = Scene::new();

    let white = diffuse(RGBSpectrum::splat(0.75));
    let red = diffuse(RGBSpectrum::new(0.63, 0.065, 0.05));
    let green = diffuse(RGBSpectrum::new(0.14, 0.45, 0.09));

    scene.add_object("floor", wall(Vector3f::new(0.0, -1.0, 0.0), Vector3f::new(-90.0, 0.0, 0.0)), white.clone());
    scene.add_object("ceiling", wall(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(90.0, 0.0, 0.0)), white.clone());
    let back = match back_wall_texture {
        Some(texture) => {
            let lobes: Vec<Arc<dyn BxDF>> = vec![Arc::new(LambertBxDF::default())];
            Arc::new(Material::new(RGBSpectrum::splat(0.75), lobes).with_texture(texture))
        }
        None => white,
    };
    scene.add_object("back", wall(Vector3f::new(0.0, 0.0, -1.0), Vector3f::zeros()), back);
    scene.add_object("left", wall(Vector3f::new(-1.0, 0.0, 0.0), Vector3f::new(0.0, 90.0, 0.0)), red);
    scene.add_object("right", wall(Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, -90.0, 0.0)), green);

    let glossy_lobes: Vec<Arc<dyn BxDF>> = vec![
        Arc::new(LambertBxDF::new(RGBSpectrum::splat(0.4))),
        Arc::new(BlinnMicrofacetBxDF::new(40.0, RGBSpectrum::splat(0.9))),
    ];
    let glossy = Arc::new(Material::new(RGBSpectrum::new(0.8, 0.7, 0.5), glossy_lobes).with_name("glossy"));
    let panel = SquarePlane::new(Transform::from_trs(Vector3f::new(0.4, -0.55, -0.3),
                                                     Vector3f::new(-60.0, 20.0, 0.0),
                                                     Vector3f::new(0.6, 0.6, 1.0)));
    scene.add_object("glossy_panel", Arc::new(panel), glossy);

    let frosted_lobes: Vec<Arc<dyn BxDF>> = vec![
        Arc::new(LambertBxDF::new(RGBSpectrum::splat(0.3))),
        Arc::new(DiffuseTransmissionBxDF::new(RGBSpectrum::splat(0.7))),
    ];
    let frosted = Arc::new(Material::new(RGBSpectrum::splat(0.9), frosted_lobes).with_name("frosted"));
    let screen = SquarePlane::new(Transform::from_trs(Vector3f::new(-0.45, -0.35, 0.1),
                                                      Vector3f::new(0.0, 30.0, 0.0),
                                                      Vector3f::new(0.7, 1.2, 1.0)));
    scene.add_object("frosted_screen", Arc::new(screen), frosted);

    let intensity: Float = 12.0;
    let light = Disc::new(Transform::from_trs(Vector3f::new(0.0, 0.99, 0.0),
                                              Vector3f::new(90.0, 0.0, 0.0),
                                              Vector3f::new(0.8, 0.8, 1.0)));
    scene.add_object("ceiling_light", Arc::new(light),
                     Arc::new(Material::light(RGBSpectrum::new(1.0, 0.85, 0.6), intensity).with_name("lamp")));

    scene.add_sensor(Box::new(PerspectiveCamera::look_at(Vector3f::new(0.0, 0.0, 3.5),
                                                         Vector3f::zeros(),
                                                         Vector3f::new(0.0, 1.0, 0.0),
                                                         40.0,
                                                         width,
                                                         height)));
    scene.build_bvh();
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::IntersectionEngine;
    use crate::math::ray::Ray3f;
    use image::{Rgb, Rgb32FImage};

    #[test]
    fn test_cornell_box_contents() {
        let scene = build(8, 8);
        assert_eq!(scene.len(), 8);
        assert_eq!(scene.lights().len(), 1);
        assert!(scene.camera(0).is_some());
        assert!(scene.objects().iter().any(|o| o.material().is_transmissive()));
    }

    #[test]
    fn test_walls_face_inwards() {
        let scene = build(8, 8);
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let isx = scene.intersect(&ray);
        assert!(isx.is_hit());
        assert!((isx.normal() - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-4);

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.5), Vector3f::new(1.0, 0.0, 0.0), None, None);
        let isx = scene.intersect(&ray);
        assert_eq!(isx.object().map(|o| o.name().to_string()), Some(String::from("right")));
        assert!((isx.normal() - Vector3f::new(-1.0, 0.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_back_wall_texture_reaches_hits() {
        let mut img = Rgb32FImage::new(2, 2);
        for (_, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([0.25, 0.5, 1.0]);
        }
        let texture: Arc<dyn Texture> = Arc::new(ImageTexture::from_rgb_image(&img));
        let scene = build_with_texture(8, 8, Some(texture));

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let isx = scene.intersect(&ray);
        assert_eq!(isx.object().map(|o| o.name().to_string()), Some(String::from("back")));
        let color = isx.texture_color();
        assert!((color[0] - 0.25).abs() < 1e-5);
        assert!((color[1] - 0.5).abs() < 1e-5);
        assert!((color[2] - 1.0).abs() < 1e-5);

        let plain = build(8, 8);
        assert_eq!(plain.intersect(&ray).texture_color(), RGBSpectrum::white());
    }

    #[test]
    fn test_from_options_reports_missing_texture() {
        let mut options = RenderOptions::default();
        options.width = 4;
        options.height = 4;
        assert_eq!(from_options(&options).map(|s| s.len()).ok(), Some(8));

        options.texture = Some(String::from("no/such/texture.png"));
        assert!(matches!(from_options(&options), Err(TextureError::Io(_))));
    }
}
