//! Local illumination: Lambertian diffuse, Phong-style specular and the
//! spotlight/distance attenuation factors.

use crate::geometry::Vec3;
use crate::scene::Light;

/// Fixed Phong shininess exponent.
const SHININESS: i32 = 25;

/// Lambertian term: `(N.L) * diffuse_color * light_color`, component-wise.
///
/// Back-facing light (`N.L <= 0`) contributes nothing.
pub fn diffuse(normal: &Vec3, light_dir: &Vec3, light_color: &Vec3, diffuse_color: &Vec3) -> Vec3 {
    let scalar = normal.dot(light_dir);
    if scalar > 0.0 {
        scalar * diffuse_color.component_mul(light_color)
    } else {
        Vec3::zeros()
    }
}

/// Phong-style specular highlight against the view direction.
///
/// `view` is the primary ray direction and `reflected` the light direction
/// mirrored about the normal. The highlight only exists when the surface
/// faces the light and the reflection lines up with the view, i.e. both
/// `N.L` and `R.V` are positive.
pub fn specular(
    normal: &Vec3,
    light_dir: &Vec3,
    reflected: &Vec3,
    view: &Vec3,
    light_color: &Vec3,
    specular_color: &Vec3,
) -> Vec3 {
    let facing = normal.dot(light_dir);
    let alignment = view.dot(reflected);
    if facing > 0.0 && alignment > 0.0 {
        alignment.powi(SHININESS) * specular_color.component_mul(light_color)
    } else {
        Vec3::zeros()
    }
}

/// Spotlight cone falloff for the point sampled by `shadow_dir` (the unit
/// direction from the surface point toward the light).
///
/// Point lights have no cone and always return 1.0. For spotlights the
/// sample lies inside the cone when the light direction and the negated
/// shadow direction agree to within `cos(theta)`; the falloff is then that
/// agreement raised to the light's angular exponent, and zero outside.
pub fn angular_attenuation(light: &Light, shadow_dir: &Vec3) -> f64 {
    if light.is_point() {
        return 1.0;
    }
    let scalar = light.direction.dot(&-shadow_dir);
    if scalar >= light.theta.to_radians().cos() {
        scalar.powf(light.angular_a0)
    } else {
        0.0
    }
}

/// Inverse-quadratic distance falloff `1 / (a0 + a1*d + a2*d^2)`.
///
/// A non-finite distance means no falloff applies and yields 1.0.
pub fn radial_attenuation(light: &Light, distance: f64) -> f64 {
    if distance.is_finite() {
        1.0 / (light.radial_a0 + light.radial_a1 * distance + light.radial_a2 * distance * distance)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn white_light() -> Light {
        Light {
            color: Vec3::new(1.0, 1.0, 1.0),
            ..Light::default()
        }
    }

    #[test]
    fn diffuse_scales_with_incidence_angle() {
        let normal = Vec3::new(0.0, 0.0, -1.0);
        let light_dir = Vec3::new(0.0, 0.0, -1.0);
        let out = diffuse(
            &normal,
            &light_dir,
            &Vec3::new(1.0, 1.0, 1.0),
            &Vec3::new(0.5, 0.0, 0.0),
        );
        assert_relative_eq!(out.x, 0.5, epsilon = 1e-12);
        assert_eq!(out.y, 0.0);
    }

    /// A surface facing away from the light receives no diffuse term.
    #[test]
    fn diffuse_is_zero_for_back_facing_light() {
        let normal = Vec3::new(0.0, 0.0, -1.0);
        let light_dir = Vec3::new(0.0, 0.0, 1.0);
        let out = diffuse(
            &normal,
            &light_dir,
            &Vec3::new(1.0, 1.0, 1.0),
            &Vec3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(out, Vec3::zeros());
    }

    #[test]
    fn specular_requires_both_positive_dot_products() {
        let normal = Vec3::new(0.0, 0.0, -1.0);
        let light_dir = Vec3::new(0.0, 0.0, -1.0);
        let reflected = Vec3::new(0.0, 0.0, -1.0);
        let white = Vec3::new(1.0, 1.0, 1.0);

        // Reflection lines up with the view: full highlight.
        let view = Vec3::new(0.0, 0.0, -1.0);
        let out = specular(&normal, &light_dir, &reflected, &view, &white, &white);
        assert_relative_eq!(out.x, 1.0, epsilon = 1e-12);

        // View on the wrong side: nothing.
        let view = Vec3::new(0.0, 0.0, 1.0);
        let out = specular(&normal, &light_dir, &reflected, &view, &white, &white);
        assert_eq!(out, Vec3::zeros());

        // Back-facing light: nothing, regardless of the reflection.
        let out = specular(
            &normal,
            &Vec3::new(0.0, 0.0, 1.0),
            &reflected,
            &Vec3::new(0.0, 0.0, -1.0),
            &white,
            &white,
        );
        assert_eq!(out, Vec3::zeros());
    }

    #[test]
    fn point_light_has_no_cone() {
        let light = white_light();
        assert!(light.is_point());
        assert_eq!(angular_attenuation(&light, &Vec3::new(0.3, -0.5, 0.8)), 1.0);
    }

    #[test]
    fn spotlight_cone_inside_and_outside() {
        let light = Light {
            direction: Vec3::new(0.0, 0.0, 1.0),
            theta: 45.0,
            angular_a0: 2.0,
            ..white_light()
        };
        // Sample point straight ahead of the spotlight: shadow direction
        // points back at the light.
        let shadow_dir = Vec3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(angular_attenuation(&light, &shadow_dir), 1.0, epsilon = 1e-12);

        // Sample point behind the spotlight: outside the cone.
        let shadow_dir = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(angular_attenuation(&light, &shadow_dir), 0.0);
    }

    #[test]
    fn spotlight_falloff_uses_angular_exponent() {
        let light = Light {
            direction: Vec3::new(0.0, 0.0, 1.0),
            theta: 60.0,
            angular_a0: 2.0,
            ..white_light()
        };
        // 45 degrees off-axis, inside the 60 degree cone.
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let shadow_dir = Vec3::new(half, 0.0, -half);
        let expected = half * half;
        assert_relative_eq!(angular_attenuation(&light, &shadow_dir), expected, epsilon = 1e-12);
    }

    /// `a0 = 1` with no linear or quadratic coefficient is constant 1.0.
    #[test]
    fn radial_attenuation_degenerates_to_one() {
        let light = Light {
            radial_a0: 1.0,
            ..white_light()
        };
        assert_eq!(radial_attenuation(&light, 0.5), 1.0);
        assert_eq!(radial_attenuation(&light, 1000.0), 1.0);
    }

    #[test]
    fn radial_attenuation_infinite_distance_is_one() {
        let light = Light {
            radial_a0: 1.0,
            radial_a1: 2.0,
            radial_a2: 3.0,
            ..white_light()
        };
        assert_eq!(radial_attenuation(&light, f64::INFINITY), 1.0);
    }

    #[test]
    fn radial_attenuation_quadratic_falloff() {
        let light = Light {
            radial_a0: 1.0,
            radial_a1: 0.0,
            radial_a2: 1.0,
            ..white_light()
        };
        assert_relative_eq!(radial_attenuation(&light, 3.0), 0.1, epsilon = 1e-12);
    }
}
