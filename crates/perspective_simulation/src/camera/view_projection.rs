//! View-projection eye камеры для shader'ов
//!
//! Shader читает матрицу в row-vector convention: `clip = mul(float4(p, 1), PV)`,
//! т.е. `PV = view × axis_remap × projection`. В glam (column vectors) это
//! `(P · R · V)ᵀ`, поэтому row i из `PV` = column i из `P · R · V`.

use bevy::prelude::*;

use super::components::EyeProjection;
use crate::parameters::ShaderParameterSink;

/// Имена vector-параметров, по одному на row
pub const PV_ROW_NAMES: [&str; 4] = ["PVRow0", "PVRow1", "PVRow2", "PVRow3"];

/// Camera space Bevy (right +X, up +Y, forward −Z) → shader view space
/// (right X, up Y, forward Z)
pub const AXIS_REMAP: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Поза eye на текущем tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    pub position: Vec3,
    pub rotation: Quat,
    pub projection: EyeProjection,
}

impl EyeView {
    pub fn from_global(global: &GlobalTransform, projection: EyeProjection) -> Self {
        let (_scale, rotation, position) = global.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            projection,
        }
    }
}

/// Perspective (left-handed, depth [0, 1]) из параметров eye
pub fn projection_matrix(projection: &EyeProjection) -> Mat4 {
    Mat4::perspective_lh(
        projection.fov_y_degrees.to_radians(),
        projection.aspect_ratio,
        projection.near,
        projection.far,
    )
}

/// View = inverse(world transform eye)
pub fn view_matrix(position: Vec3, rotation: Quat) -> Mat4 {
    Mat4::from_rotation_translation(rotation, position).inverse()
}

/// Combined matrix, column-vector form: `clip = matrix * vec4(p, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    pub matrix: Mat4,
}

impl ViewProjection {
    pub fn from_eye(eye: &EyeView) -> Self {
        let projection = projection_matrix(&eye.projection);
        let view = view_matrix(eye.position, eye.rotation);
        Self {
            matrix: projection * AXIS_REMAP * view,
        }
    }

    /// Rows в shader (row-vector) convention, порядок PVRow0..PVRow3
    pub fn rows(&self) -> [Vec4; 4] {
        [
            self.matrix.x_axis,
            self.matrix.y_axis,
            self.matrix.z_axis,
            self.matrix.w_axis,
        ]
    }
}

/// Записать 4 rows в sink (без dirty tracking, каждый вызов пишет всё)
pub fn publish_rows(sink: &mut dyn ShaderParameterSink, view_projection: &ViewProjection) {
    for (name, row) in PV_ROW_NAMES.iter().zip(view_projection.rows()) {
        sink.set_vector(name, row);
    }
}

/// Проекция world точки через опубликованные rows (как это делает shader)
///
/// Возвращает NDC (x, y в [-1, 1] внутри кадра, z = depth). `None` если точка
/// за eye (w ≤ 0).
pub fn project_to_screen(point: Vec3, rows: &[Vec4; 4]) -> Option<Vec3> {
    let clip = rows[0] * point.x + rows[1] * point.y + rows[2] * point.z + rows[3];
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::aim::orientation_towards;
    use crate::parameters::ParameterCollection;

    fn eye_at_origin_facing_x() -> EyeView {
        EyeView {
            position: Vec3::ZERO,
            rotation: orientation_towards(Vec3::X).expect("valid direction"),
            projection: EyeProjection {
                fov_y_degrees: 90.0,
                aspect_ratio: 1.0,
                near: 0.1,
                far: 100.0,
            },
        }
    }

    #[test]
    fn test_rows_match_independent_composition() {
        let eye = EyeView {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_euler(EulerRot::YXZ, 0.3, -0.2, 0.0),
            projection: EyeProjection::default(),
        };

        // Независимо: row-vector матрицы каждого шага и произведение слева направо
        let view_rows = Mat4::from_rotation_translation(eye.rotation, eye.position)
            .inverse()
            .transpose();
        let remap_rows = AXIS_REMAP.transpose();
        let projection_rows = Mat4::perspective_lh(
            eye.projection.fov_y_degrees.to_radians(),
            eye.projection.aspect_ratio,
            eye.projection.near,
            eye.projection.far,
        )
        .transpose();
        let pv = view_rows * remap_rows * projection_rows;

        let rows = ViewProjection::from_eye(&eye).rows();
        for (i, row) in rows.iter().enumerate() {
            assert!(row.abs_diff_eq(pv.row(i), 1e-5), "row {} = {:?}, expected {:?}", i, row, pv.row(i));
        }
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let rows = ViewProjection::from_eye(&eye_at_origin_facing_x()).rows();

        let ndc = project_to_screen(Vec3::new(10.0, 0.0, 0.0), &rows).expect("in front of eye");
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth = {}", ndc.z);
    }

    #[test]
    fn test_point_up_projects_to_top() {
        let rows = ViewProjection::from_eye(&eye_at_origin_facing_x()).rows();

        // fov 90° → на расстоянии 10 верх кадра на высоте 10
        let ndc = project_to_screen(Vec3::new(10.0, 5.0, 0.0), &rows).expect("in front of eye");
        assert!((ndc.y - 0.5).abs() < 1e-4, "ndc.y = {}", ndc.y);
    }

    #[test]
    fn test_point_behind_is_rejected() {
        let rows = ViewProjection::from_eye(&eye_at_origin_facing_x()).rows();
        assert!(project_to_screen(Vec3::new(-10.0, 0.0, 0.0), &rows).is_none());
    }

    #[test]
    fn test_publish_writes_all_rows_in_order() {
        let view_projection = ViewProjection::from_eye(&eye_at_origin_facing_x());
        let mut collection = ParameterCollection::line_of_sight();

        publish_rows(&mut collection, &view_projection);

        for (name, row) in PV_ROW_NAMES.iter().zip(view_projection.rows()) {
            assert_eq!(collection.vector(name), Some(row));
        }
    }
}
