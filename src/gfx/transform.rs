//! Model matrix composition
//!
//! Every object in the tableau is placed by the same fixed pipeline:
//! scale, then rotate about X, Y, Z in that order, then translate. The
//! matrices multiply as `translate * rz * ry * rx * scale` so that, applied
//! to column vectors, the scale acts first on the unit mesh and the
//! translation last. The order is load-bearing; rotation composition is not
//! commutative and the scene data assumes exactly this convention.

use cgmath::{Deg, Matrix4, Vector3};

use super::uniforms::{UniformKey, UniformStage};

/// Composes a model matrix from per-axis scale, XYZ rotation in degrees,
/// and a world-space position. Negative scale components mirror geometry.
pub fn compose_model_matrix(
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    let scale = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    let rotation_x = Matrix4::from_angle_x(Deg(rotation_degrees.x));
    let rotation_y = Matrix4::from_angle_y(Deg(rotation_degrees.y));
    let rotation_z = Matrix4::from_angle_z(Deg(rotation_degrees.z));
    let translation = Matrix4::from_translation(position);

    translation * rotation_z * rotation_y * rotation_x * scale
}

/// Composes the model matrix and stages it under the `model` uniform.
pub fn stage_model_matrix(
    stage: &mut UniformStage,
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    position: Vector3<f32>,
) {
    let model = compose_model_matrix(scale, rotation_degrees, position);
    stage.set_mat4(UniformKey::Model, model);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{vec3, vec4, InnerSpace, Vector4};

    fn assert_vec4_near(actual: Vector4<f32>, expected: Vector4<f32>) {
        let delta = (actual - expected).magnitude();
        assert!(
            delta < 1e-5,
            "expected {:?}, got {:?} (delta {})",
            expected,
            actual,
            delta
        );
    }

    #[test]
    fn test_origin_maps_to_position() {
        let model = compose_model_matrix(
            vec3(2.0, -3.0, 0.5),
            vec3(31.0, 117.0, -42.0),
            vec3(1.5, -2.0, 8.0),
        );
        let origin = model * vec4(0.0, 0.0, 0.0, 1.0);
        assert_vec4_near(origin, vec4(1.5, -2.0, 8.0, 1.0));
    }

    #[test]
    fn test_scale_applies_before_rotation() {
        // Scale X by 2, then rotate 90 degrees about Z: the X axis lands on +Y
        // with length 2. Were the rotation applied first the length would be 1.
        let model = compose_model_matrix(
            vec3(2.0, 1.0, 1.0),
            vec3(0.0, 0.0, 90.0),
            vec3(0.0, 0.0, 0.0),
        );
        let x_axis = model * vec4(1.0, 0.0, 0.0, 1.0);
        assert_vec4_near(x_axis, vec4(0.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        // +Z rotated 90 about X gives -Y; rotating that 90 about Y leaves -Y;
        // rotating -Y by 90 about Z gives +X. Any other order of the same three
        // rotations sends +Z somewhere else.
        let model = compose_model_matrix(
            vec3(1.0, 1.0, 1.0),
            vec3(90.0, 90.0, 90.0),
            vec3(0.0, 0.0, 0.0),
        );
        let z_axis = model * vec4(0.0, 0.0, 1.0, 1.0);
        assert_vec4_near(z_axis, vec4(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_negative_scale_mirrors() {
        let model = compose_model_matrix(
            vec3(1.0, -1.0, 1.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 5.0, 0.0),
        );
        let tip = model * vec4(0.0, 1.0, 0.0, 1.0);
        assert_vec4_near(tip, vec4(0.0, 4.0, 0.0, 1.0));
    }

    #[test]
    fn test_staged_matrix_matches_composed() {
        let mut stage = UniformStage::new();
        stage_model_matrix(
            &mut stage,
            vec3(0.1, 1.7, 0.1),
            vec3(0.0, 90.0, 0.0),
            vec3(1.4, 0.65, -1.0),
        );
        let staged = stage.mat4(UniformKey::Model);
        let expected: [[f32; 4]; 4] = compose_model_matrix(
            vec3(0.1, 1.7, 0.1),
            vec3(0.0, 90.0, 0.0),
            vec3(1.4, 0.65, -1.0),
        )
        .into();
        assert_eq!(staged, expected);
    }
}
