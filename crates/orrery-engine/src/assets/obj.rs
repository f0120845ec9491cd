use std::path::Path;

use anyhow::{Context, Result};

use super::mesh::{MeshData, Vertex};

/// Loads a Wavefront OBJ into a single [`MeshData`].
///
/// All models in the file are merged; materials are ignored (the demo binds
/// its own textures). Missing normals fall back to +Y, missing UVs to the
/// origin — good enough for the flat-shaded props this demo ships.
pub fn load_obj(path: &Path) -> Result<MeshData> {
    let mut options = tobj::GPU_LOAD_OPTIONS;
    options.single_index = true;

    let (models, _materials) = tobj::load_obj(path, &options)
        .with_context(|| format!("failed to load OBJ {}", path.display()))?;

    let mut data = MeshData::default();

    for model in models {
        let mesh = model.mesh;
        let base = data.vertices.len() as u32;
        let count = mesh.positions.len() / 3;

        for i in 0..count {
            let normal = if mesh.normals.len() >= (i + 1) * 3 {
                [mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2]]
            } else {
                [0.0, 1.0, 0.0]
            };
            let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                // OBJ UVs are bottom-up; textures are uploaded top-down.
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            data.vertices.push(Vertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal,
                uv,
            });
        }

        data.indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    anyhow::ensure!(!data.indices.is_empty(), "OBJ {} contains no geometry", path.display());
    log::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        data.vertices.len(),
        data.indices.len() / 3
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "orrery-obj-test-{}-{}.obj",
            std::process::id(),
            contents.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_a_single_triangle() {
        let path = write_temp_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vn 0 0 1\nvn 0 0 1\nvn 0 0 1\n\
             vt 0 0\nvt 1 0\nvt 0 1\n\
             f 1/1/1 2/2/2 3/3/3\n",
        );
        let data = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.indices.len(), 3);
        assert_eq!(data.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(data.vertices[0].normal, [0.0, 0.0, 1.0]);
        // V flipped on load.
        assert_eq!(data.vertices[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_obj(Path::new("/nonexistent/ship.obj"));
        assert!(err.is_err());
    }
}
