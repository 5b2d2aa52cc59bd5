//! Rays and the closed-form ray/primitive intersection tests.

use nalgebra::Vector3;

use crate::scene::{Plane, Primitive, Sphere};

/// All geometry and color math runs on double-precision 3-vectors.
pub type Vec3 = Vector3<f64>;

/// Reflect `incident` about `normal`.
///
/// `normal` must be a unit vector; `incident` keeps its length.
pub fn reflect(incident: &Vec3, normal: &Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// A ray parametrized as `origin + t * direction`.
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` pointing at `target`, with normalized direction.
    pub fn from_to(origin: Vec3, target: &Vec3) -> Ray {
        Ray {
            origin,
            direction: (target - origin).normalize(),
        }
    }

    pub fn origin_direction(origin: Vec3, normalized_direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: normalized_direction,
        }
    }

    /// The point at distance `t` along the ray.
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Sphere {
    /// Distance to the nearest sphere surface in front of the ray origin,
    /// or `None` on a miss.
    ///
    /// Substituting the ray into `|P - center|^2 = r^2` gives the quadratic
    /// `a t^2 + b t + c = 0`. The smaller non-negative root is returned if it
    /// exists, else the larger one; a ray starting inside the sphere thus
    /// reports the exit point.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let center_to_origin = ray.origin - self.position;
        let a = ray.direction.norm_squared();
        let b = 2.0 * ray.direction.dot(&center_to_origin);
        let c = center_to_origin.norm_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t0 = (-b - root) / (2.0 * a);
        let t1 = (-b + root) / (2.0 * a);
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }
}

impl Plane {
    /// Distance to the plane in front of the ray origin, or `None` on a miss.
    ///
    /// A ray parallel to the plane makes the denominator zero; the resulting
    /// non-finite `t` is rejected along with negative distances.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        // The scene loader does not guarantee a unit normal.
        let normal = self.normal.normalize();
        let t = normal.dot(&(self.position - ray.origin)) / normal.dot(&ray.direction);
        if t.is_finite() && t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

impl Primitive {
    /// Intersection test dispatched by primitive kind.
    ///
    /// Cameras and lights have no surface and never intersect.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray),
            Primitive::Plane(plane) => plane.intersect(ray),
            Primitive::Camera(_) | Primitive::Light(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sphere_at(z: f64) -> Sphere {
        Sphere {
            position: Vec3::new(0.0, 0.0, z),
            radius: 1.0,
            color: Vec3::zeros(),
            diffuse_color: Vec3::zeros(),
            specular_color: Vec3::zeros(),
        }
    }

    /// A ray aimed straight at the center hits at distance-to-center minus
    /// the radius.
    #[test]
    fn sphere_head_on_hit() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::from_to(Vec3::zeros(), &sphere.position);
        let t = sphere.intersect(&ray).unwrap();
        assert_relative_eq!(t, 9.0, epsilon = 1e-9);
    }

    /// Perpendicular offset larger than the radius misses.
    #[test]
    fn sphere_offset_miss() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::origin_direction(Vec3::new(1.5, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    /// A ray starting inside the sphere reports the exit distance.
    #[test]
    fn sphere_interior_origin_returns_exit() {
        let sphere = unit_sphere_at(0.0);
        let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let t = sphere.intersect(&ray).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-9);
    }

    /// Both roots behind the origin is a miss.
    #[test]
    fn sphere_behind_origin_miss() {
        let sphere = unit_sphere_at(-10.0);
        let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    fn floor_plane() -> Plane {
        Plane {
            position: Vec3::new(0.0, -1.0, 0.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            color: Vec3::zeros(),
            diffuse_color: Vec3::zeros(),
            specular_color: Vec3::zeros(),
        }
    }

    #[test]
    fn plane_hit_distance() {
        let plane = floor_plane();
        let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0));
        let t = plane.intersect(&ray).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-9);
    }

    /// A ray parallel to the plane never intersects it.
    #[test]
    fn plane_parallel_ray_misses() {
        let plane = floor_plane();
        let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(plane.intersect(&ray).is_none());
    }

    /// A non-unit plane normal gives the same distance as the normalized one.
    #[test]
    fn plane_normal_is_normalized_defensively() {
        let mut plane = floor_plane();
        plane.normal = Vec3::new(0.0, 7.0, 0.0);
        let ray = Ray::origin_direction(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0));
        let t = plane.intersect(&ray).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reflect_mirrors_about_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(0.0, 1.0, 0.0);
        let reflected = reflect(&incident, &normal);
        assert_relative_eq!(reflected.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(reflected.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(reflected.z, 0.0, epsilon = 1e-12);
    }
}
