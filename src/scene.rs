//! Typed scene model and JSON scene ingestion.
//!
//! A scene file is a JSON array of objects discriminated by a `"type"` tag,
//! one of `camera`, `sphere`, `plane` or `light`. Vector and color fields are
//! 3-element arrays; every numeric field defaults to zero when absent. The
//! attenuation coefficients use hyphenated keys (`radial-a0`, `angular-a0`).

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Vec3;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("object {index}: {field} channel {value} is outside [0, 1]")]
    ColorOutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// The view into the scene. Width and height are the view-plane extent in
/// world units, not pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f64,
    pub color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
}

/// A point light or spotlight.
///
/// A zero `direction` together with `theta == 0` marks a point light;
/// anything else is a spotlight with cone half-angle `theta` in degrees and
/// angular falloff exponent `angular_a0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub direction: Vec3,
    pub theta: f64,
    pub radial_a0: f64,
    pub radial_a1: f64,
    pub radial_a2: f64,
    pub angular_a0: f64,
}

impl Light {
    pub fn is_point(&self) -> bool {
        self.theta == 0.0 && self.direction == Vec3::zeros()
    }
}

impl Default for Light {
    fn default() -> Light {
        Light {
            position: Vec3::zeros(),
            color: Vec3::zeros(),
            direction: Vec3::zeros(),
            theta: 0.0,
            radial_a0: 0.0,
            radial_a1: 0.0,
            radial_a2: 0.0,
            angular_a0: 0.0,
        }
    }
}

/// One scene object; a sum type so no variant can carry another variant's
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Camera(Camera),
    Sphere(Sphere),
    Plane(Plane),
    Light(Light),
}

/// An ordered, immutable collection of primitives. Order is the scene file
/// order and decides tie-breaks: the first camera and the first of two
/// equally distant surfaces win.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(primitives: Vec<Primitive>) -> Scene {
        Scene { primitives }
    }

    /// The first camera in the scene, if any.
    pub fn camera(&self) -> Option<&Camera> {
        self.primitives.iter().find_map(|primitive| match primitive {
            Primitive::Camera(camera) => Some(camera),
            _ => None,
        })
    }

    /// All lights, in scene order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Light(light) => Some(light),
            _ => None,
        })
    }

    pub fn light_count(&self) -> usize {
        self.lights().count()
    }

    /// Load and validate a scene from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
        let contents = fs::read_to_string(path)?;
        Scene::from_json(&contents)
    }

    /// Parse and validate a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Scene, SceneError> {
        let raw: Vec<RawObject> = serde_json::from_str(json)?;
        let primitives = raw
            .into_iter()
            .enumerate()
            .map(|(index, object)| object.into_primitive(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scene::new(primitives))
    }
}

/// Wire-format mirror of [`Primitive`], with the original field names and
/// zero defaults for absent fields.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawObject {
    Camera {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        height: f64,
    },
    Sphere {
        #[serde(default)]
        position: [f64; 3],
        #[serde(default)]
        radius: f64,
        #[serde(default)]
        color: [f64; 3],
        #[serde(default)]
        diffuse_color: [f64; 3],
        #[serde(default)]
        specular_color: [f64; 3],
    },
    Plane {
        #[serde(default)]
        position: [f64; 3],
        #[serde(default)]
        normal: [f64; 3],
        #[serde(default)]
        color: [f64; 3],
        #[serde(default)]
        diffuse_color: [f64; 3],
        #[serde(default)]
        specular_color: [f64; 3],
    },
    Light {
        #[serde(default)]
        position: [f64; 3],
        #[serde(default)]
        color: [f64; 3],
        #[serde(default)]
        direction: [f64; 3],
        #[serde(default)]
        theta: f64,
        #[serde(default, rename = "radial-a0")]
        radial_a0: f64,
        #[serde(default, rename = "radial-a1")]
        radial_a1: f64,
        #[serde(default, rename = "radial-a2")]
        radial_a2: f64,
        #[serde(default, rename = "angular-a0")]
        angular_a0: f64,
    },
}

fn check_color(index: usize, field: &'static str, color: [f64; 3]) -> Result<Vec3, SceneError> {
    for &channel in &color {
        if !(0.0..=1.0).contains(&channel) {
            return Err(SceneError::ColorOutOfRange {
                index,
                field,
                value: channel,
            });
        }
    }
    Ok(Vec3::from(color))
}

impl RawObject {
    fn into_primitive(self, index: usize) -> Result<Primitive, SceneError> {
        match self {
            RawObject::Camera { width, height } => {
                Ok(Primitive::Camera(Camera { width, height }))
            }
            RawObject::Sphere {
                position,
                radius,
                color,
                diffuse_color,
                specular_color,
            } => Ok(Primitive::Sphere(Sphere {
                position: Vec3::from(position),
                radius,
                color: check_color(index, "color", color)?,
                diffuse_color: check_color(index, "diffuse_color", diffuse_color)?,
                specular_color: check_color(index, "specular_color", specular_color)?,
            })),
            RawObject::Plane {
                position,
                normal,
                color,
                diffuse_color,
                specular_color,
            } => Ok(Primitive::Plane(Plane {
                position: Vec3::from(position),
                normal: Vec3::from(normal),
                color: check_color(index, "color", color)?,
                diffuse_color: check_color(index, "diffuse_color", diffuse_color)?,
                specular_color: check_color(index, "specular_color", specular_color)?,
            })),
            RawObject::Light {
                position,
                color,
                direction,
                theta,
                radial_a0,
                radial_a1,
                radial_a2,
                angular_a0,
            } => Ok(Primitive::Light(Light {
                position: Vec3::from(position),
                color: check_color(index, "color", color)?,
                direction: Vec3::from(direction),
                theta,
                radial_a0,
                radial_a1,
                radial_a2,
                angular_a0,
            })),
        }
    }
}
