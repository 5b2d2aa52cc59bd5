//! The render loop: primary visibility, shadow tests and per-light shading
//! for every pixel of the output image.

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use crate::geometry::{reflect, Ray, Vec3};
use crate::ppm::{PixelBuffer, MAX_COLOR};
use crate::scene::{Camera, Primitive, Scene};
use crate::shading;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene contains no camera object")]
    MissingCamera,
}

/// How per-light contributions fold into a pixel's working color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMixing {
    /// Sum the contributions of all unshadowed lights.
    Accumulate,
    /// Each unshadowed light replaces the working color, so the last
    /// unshadowed light in scene order decides the pixel. Occluded lights
    /// leave the color untouched in both modes.
    Overwrite,
}

/// Render `scene` into a `width` x `height` pixel buffer.
///
/// The view plane spans the camera's world-unit extent, centered on the
/// origin one unit down the z axis; all primary rays start at the origin.
/// Pixels are independent, so they are computed in parallel and collected
/// in row-major order.
pub fn render(
    scene: &Scene,
    width: u32,
    height: u32,
    mixing: LightMixing,
) -> Result<PixelBuffer, RenderError> {
    let camera = scene.camera().ok_or(RenderError::MissingCamera)?;
    debug!(
        "rendering {} primitives ({} lights) through a {}x{} view plane",
        scene.primitives.len(),
        scene.light_count(),
        camera.width,
        camera.height
    );

    let pixel_width = camera.width / f64::from(width);
    let pixel_height = camera.height / f64::from(height);

    let pixels: Vec<[u8; 3]> = (0..width as usize * height as usize)
        .into_par_iter()
        .map(|index| {
            let row = (index / width as usize) as u32;
            let column = (index % width as usize) as u32;
            shade_pixel(scene, camera, row, column, pixel_width, pixel_height, mixing)
        })
        .collect();

    Ok(PixelBuffer::from_pixels(width, height, pixels))
}

/// Compute the final 8-bit color of one pixel.
fn shade_pixel(
    scene: &Scene,
    camera: &Camera,
    row: u32,
    column: u32,
    pixel_width: f64,
    pixel_height: f64,
    mixing: LightMixing,
) -> [u8; 3] {
    // Pixel center on the view plane; y is flipped so row 0 is the top.
    let px = -camera.width / 2.0 + pixel_width * (f64::from(column) + 0.5);
    let py = -(-camera.height / 2.0 + pixel_height * (f64::from(row) + 0.5));
    let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(px, py, 1.0).normalize());

    // Primary visibility: linear scan for the strictly closest positive hit.
    // Ties keep the earlier primitive.
    let mut best_distance = f64::INFINITY;
    let mut closest: Option<(usize, &Primitive)> = None;
    for (index, primitive) in scene.primitives.iter().enumerate() {
        if let Some(distance) = primitive.intersect(&ray) {
            if distance > 0.0 && distance < best_distance {
                best_distance = distance;
                closest = Some((index, primitive));
            }
        }
    }

    // Nothing hit: the background stays black.
    let Some((closest_index, hit)) = closest else {
        return [0, 0, 0];
    };

    let hit_point = ray.at(best_distance);
    let (normal, diffuse_color, specular_color) = match hit {
        Primitive::Sphere(sphere) => (
            (hit_point - sphere.position).normalize(),
            sphere.diffuse_color,
            sphere.specular_color,
        ),
        Primitive::Plane(plane) => {
            (plane.normal.normalize(), plane.diffuse_color, plane.specular_color)
        }
        // Cameras and lights never report an intersection.
        Primitive::Camera(_) | Primitive::Light(_) => return [0, 0, 0],
    };

    let mut color = Vec3::zeros();
    for light in scene.lights() {
        let shadow_ray = Ray::from_to(hit_point, &light.position);
        let light_distance = (light.position - hit_point).norm();

        // Shadow test: rescan every primitive except the one we are shading
        // (self-shadowing is suppressed by index, not by offsetting the
        // origin). Any hit between the surface and the light occludes it.
        let occluded = scene
            .primitives
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != closest_index)
            .filter_map(|(_, primitive)| primitive.intersect(&shadow_ray))
            .any(|distance| distance > 0.0 && distance <= light_distance);
        if occluded {
            continue;
        }

        let reflected = reflect(&shadow_ray.direction, &normal);
        let diffuse = shading::diffuse(&normal, &shadow_ray.direction, &light.color, &diffuse_color);
        let specular = shading::specular(
            &normal,
            &shadow_ray.direction,
            &reflected,
            &ray.direction,
            &light.color,
            &specular_color,
        );
        let angular = shading::angular_attenuation(light, &shadow_ray.direction);
        let radial = shading::radial_attenuation(light, light_distance);

        let contribution = angular * radial * (diffuse + specular);
        match mixing {
            LightMixing::Accumulate => color += contribution,
            LightMixing::Overwrite => color = contribution,
        }
    }

    quantize(&color)
}

/// Clamp each channel to `[0, 1]`, scale to the 8-bit ceiling and truncate.
fn quantize(color: &Vec3) -> [u8; 3] {
    let scale = f64::from(MAX_COLOR);
    [
        (color.x.clamp(0.0, 1.0) * scale) as u8,
        (color.y.clamp(0.0, 1.0) * scale) as u8,
        (color.z.clamp(0.0, 1.0) * scale) as u8,
    ]
}
