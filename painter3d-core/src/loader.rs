/// Mesh file loading with format detection by extension
use std::fs;
use std::path::Path;

use log::info;

use crate::error::MeshError;
use crate::geometry::Mesh;
use crate::{obj, stl};

/// Read and parse a `.obj` or `.stl` file.
///
/// A file that parses but yields no triangles is an error.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let mesh = match extension.as_deref() {
        Some("obj") => obj::parse_obj(&fs::read_to_string(path)?)?,
        Some("stl") => stl::parse_stl(&fs::read(path)?)?,
        _ => return Err(MeshError::UnsupportedFormat(path.display().to_string())),
    };

    if mesh.is_empty() {
        return Err(MeshError::Empty);
    }

    info!("loaded {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("painter3d-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_obj() {
        let path = scratch_file("tri.obj", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_mesh(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let path = scratch_file("TRI.OBJ", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let result = load_mesh(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = load_mesh("/definitely/not/here/model.obj").unwrap_err();
        assert!(matches!(err, MeshError::Io(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_mesh("model.fbx").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_file_without_faces_is_empty_error() {
        let path = scratch_file("points.obj", b"v 0 0 0\nv 1 0 0\n");
        let result = load_mesh(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(MeshError::Empty)));
    }
}
