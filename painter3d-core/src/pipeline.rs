/// Frame driver: owns the mesh, matrices and animation state
use std::path::Path;

use log::{debug, info, trace};
use nalgebra::Vector3;

use crate::config::PipelineConfig;
use crate::depth::sort_back_to_front;
use crate::error::{MeshError, PipelineError};
use crate::geometry::{Mesh, Triangle};
use crate::loader::load_mesh;
use crate::matrix::Mat4;
use crate::projection::{DrawTriangle, Viewport};
use crate::shading::{diffuse, face_normal, is_visible};
use crate::transform::Animation;

/// Loaded pipeline state.
///
/// Call [`update`](Self::update) then [`draw`](Self::draw) once per frame.
/// `draw` never mutates anything, so the same frame can be drawn repeatedly.
#[derive(Debug, Clone)]
pub struct Pipeline {
    mesh: Mesh,
    config: PipelineConfig,
    light: Vector3<f32>,
    viewport: Viewport,
    projection: Mat4,
    animation: Animation,
}

impl Pipeline {
    /// Validate the inputs and build the projection.
    ///
    /// The animation starts at angle zero with zeroed rotation matrices, so
    /// nothing is visible until the first `update`.
    pub fn load(mesh: Mesh, config: PipelineConfig, viewport: Viewport) -> Result<Self, PipelineError> {
        config.validate()?;
        viewport.validate()?;
        if mesh.is_empty() {
            return Err(MeshError::Empty.into());
        }

        let projection = build_projection(&config, &viewport)?;
        info!(
            "pipeline loaded: {} triangles, {}x{} viewport",
            mesh.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            light: config.light(),
            animation: Animation::new(config.rotation_rate),
            mesh,
            config,
            viewport,
            projection,
        })
    }

    /// Load a mesh file (`.obj` or `.stl`) and build a pipeline around it.
    pub fn from_path(
        path: impl AsRef<Path>,
        config: PipelineConfig,
        viewport: Viewport,
    ) -> Result<Self, PipelineError> {
        let mesh = load_mesh(path)?;
        Self::load(mesh, config, viewport)
    }

    /// Advance the animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.animation.advance(dt);
        trace!("angle {:.4} rad", self.animation.angle());
    }

    /// Change the screen size and rebuild the projection for the new aspect ratio.
    ///
    /// An empty viewport is rejected and the previous state is kept.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), PipelineError> {
        viewport.validate()?;
        if viewport == self.viewport {
            return Ok(());
        }

        self.projection = build_projection(&self.config, &viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    /// Visible triangles of the current frame, ordered back to front.
    pub fn draw(&self) -> Vec<DrawTriangle> {
        let mut visible: Vec<DrawTriangle> = self
            .mesh
            .triangles
            .iter()
            .filter_map(|tri| self.process(tri))
            .collect();

        sort_back_to_front(&mut visible);
        trace!("{} of {} triangles visible", visible.len(), self.mesh.len());
        visible
    }

    fn process(&self, triangle: &Triangle) -> Option<DrawTriangle> {
        let world = self.animation.to_world(&triangle.points, &self.config.translation);

        let normal = face_normal(&world)?;
        if !is_visible(&normal, &world[0], &self.config.camera_position) {
            return None;
        }

        let projected = DrawTriangle {
            points: world.map(|p| self.viewport.project(&self.projection, &p)),
            color: diffuse(&self.light, &normal),
        };

        projected.is_finite().then_some(projected)
    }

    pub fn angle(&self) -> f32 {
        self.animation.angle()
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn rotation_z(&self) -> &Mat4 {
        self.animation.rotation_z()
    }

    pub fn rotation_x(&self) -> &Mat4 {
        self.animation.rotation_x()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

fn build_projection(config: &PipelineConfig, viewport: &Viewport) -> Result<Mat4, PipelineError> {
    let projection = Mat4::perspective(viewport.aspect_ratio(), config.fov_degrees, config.near, config.far)?;
    debug!(
        "projection built: aspect {:.4}, fov {} deg, near {}, far {}",
        viewport.aspect_ratio(),
        config.fov_degrees,
        config.near,
        config.far
    );
    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::is_back_to_front;
    use crate::geometry::Color;
    use nalgebra::Point3;

    fn single(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3]) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(p0.into(), p1.into(), p2.into()));
        mesh
    }

    fn loaded(mesh: Mesh) -> Pipeline {
        Pipeline::load(mesh, PipelineConfig::default(), Viewport::new(1000, 800)).unwrap()
    }

    #[test]
    fn test_load_rejects_empty_mesh() {
        let err = Pipeline::load(Mesh::new(), PipelineConfig::default(), Viewport::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Mesh(MeshError::Empty)));
    }

    #[test]
    fn test_load_rejects_equal_planes() {
        let config = PipelineConfig {
            near: 1.0,
            far: 1.0,
            ..Default::default()
        };
        let err = Pipeline::load(Mesh::cube(1.0), config, Viewport::default()).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateFrustum { .. }));
    }

    #[test]
    fn test_load_rejects_empty_viewport() {
        let result = Pipeline::load(Mesh::cube(1.0), PipelineConfig::default(), Viewport::new(0, 600));
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_state() {
        let pipeline = loaded(Mesh::cube(2.0));
        assert_eq!(pipeline.angle(), 0.0);
        assert_eq!(*pipeline.rotation_z(), Mat4::zeros());
        assert_eq!(*pipeline.rotation_x(), Mat4::zeros());
        assert_eq!(
            *pipeline.projection(),
            Mat4::perspective(0.8, 90.0, 0.1, 1000.0).unwrap()
        );
        // Zeroed rotations collapse every triangle, so nothing is drawn yet.
        assert!(pipeline.draw().is_empty());
    }

    #[test]
    fn test_update_matches_fresh_rotation() {
        let mut pipeline = loaded(Mesh::cube(2.0));
        pipeline.update(1.0);

        assert!((pipeline.angle() - 1.0).abs() < 1e-6);
        assert_eq!(*pipeline.rotation_z(), Mat4::rotation_z(1.0));
        assert_eq!(*pipeline.rotation_x(), Mat4::rotation_x(1.0));
    }

    #[test]
    fn test_front_facing_triangle_scene() {
        // Clockwise as seen from the camera, so the normal faces it.
        let mut pipeline = loaded(single([0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]));
        pipeline.update(0.0);

        let list = pipeline.draw();
        assert_eq!(list.len(), 1);
        let tri = list[0];

        // normal (0, 0, -1) against light (0, 0, -1) gives full intensity
        assert_eq!(tri.color, Color::WHITE);

        let fov_rad = 1.0 / (45.0f32).to_radians().tan();
        let q = 1000.0 / 999.9;
        let depth = q - 0.1 * q / 9.0;

        let expected = [
            Point3::new(500.0, 400.0, depth),
            Point3::new(500.0, (fov_rad / 9.0 + 1.0) * 400.0, depth),
            Point3::new((0.8 * fov_rad / 9.0 + 1.0) * 500.0, 400.0, depth),
        ];
        for (got, want) in tri.points.iter().zip(expected.iter()) {
            assert!((got - want).norm() < 1e-3, "{got:?} != {want:?}");
        }
    }

    #[test]
    fn test_back_facing_triangle_is_culled() {
        // Counter-clockwise from the camera: normal (0, 0, 1) points away.
        let mut pipeline = loaded(single([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]));
        pipeline.update(0.0);
        assert!(pipeline.draw().is_empty());
    }

    #[test]
    fn test_degenerate_and_overflowing_triangles_are_dropped() {
        let mut mesh = single([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        mesh.add_triangle(Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 3.0e38, 0.0),
            Point3::new(3.0e38, 0.0, 0.0),
        ));

        let mut pipeline = loaded(mesh);
        pipeline.update(0.3);
        assert!(pipeline.draw().is_empty());
    }

    #[test]
    fn test_draw_is_exactly_the_visible_subset() {
        let mut pipeline = loaded(Mesh::cube(2.0));
        let config = pipeline.config().clone();
        let light = config.light();

        for _ in 0..20 {
            pipeline.update(0.37);
            let list = pipeline.draw();

            let rot_z = Mat4::rotation_z(pipeline.angle());
            let rot_x = Mat4::rotation_x(pipeline.angle());
            let mut expected = Vec::new();
            for tri in &pipeline.mesh().triangles {
                let world = tri
                    .points
                    .map(|p| rot_x.transform_point(&rot_z.transform_point(&p)) + config.translation);
                let normal = (world[1] - world[0]).cross(&(world[2] - world[0])).normalize();
                if normal.dot(&(world[0] - config.camera_position)) < 0.0 {
                    expected.push(DrawTriangle {
                        points: world.map(|p| pipeline.viewport().project(pipeline.projection(), &p)),
                        color: Color::grey(light.dot(&normal)),
                    });
                }
            }

            assert_eq!(list.len(), expected.len());
            for tri in &expected {
                assert!(list.contains(tri));
            }
            // A convex closed mesh shows at most three faces.
            assert!((1..=6).contains(&list.len()));
            assert!(is_back_to_front(&list));
        }
    }

    #[test]
    fn test_draw_is_read_only() {
        let mut pipeline = loaded(Mesh::cube(2.0));
        pipeline.update(0.8);

        let first = pipeline.draw();
        let second = pipeline.draw();
        assert_eq!(first, second);
        assert!((pipeline.angle() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_resize_rebuilds_projection() {
        let mut pipeline = loaded(Mesh::cube(2.0));
        pipeline.resize(Viewport::new(400, 400)).unwrap();

        assert_eq!(pipeline.viewport(), Viewport::new(400, 400));
        assert_eq!(
            *pipeline.projection(),
            Mat4::perspective(1.0, 90.0, 0.1, 1000.0).unwrap()
        );
    }

    #[test]
    fn test_resize_rejects_empty_viewport() {
        let mut pipeline = loaded(Mesh::cube(2.0));
        let before = *pipeline.projection();

        assert!(pipeline.resize(Viewport::new(0, 0)).is_err());
        assert_eq!(pipeline.viewport(), Viewport::new(1000, 800));
        assert_eq!(*pipeline.projection(), before);
    }

    #[test]
    fn test_from_path_loads_obj() {
        let path = std::env::temp_dir().join(format!("painter3d-{}-pipeline.obj", std::process::id()));
        std::fs::write(&path, "v 0 0 1\nv 0 1 1\nv 1 0 1\nf 1 2 3\n").unwrap();

        let result = Pipeline::from_path(&path, PipelineConfig::default(), Viewport::new(1000, 800));
        std::fs::remove_file(&path).unwrap();

        let mut pipeline = result.unwrap();
        assert_eq!(pipeline.mesh().len(), 1);
        pipeline.update(0.0);
        assert_eq!(pipeline.draw().len(), 1);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Pipeline::from_path(
            "/definitely/not/here/model.obj",
            PipelineConfig::default(),
            Viewport::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Mesh(MeshError::Io(_))));
    }
}
