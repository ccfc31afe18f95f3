//! Wavefront OBJ/MTL import via `tobj`.

use std::path::Path;

use glam::{Vec2, Vec3};

use super::scene::{SceneGraph, SceneMaterial, SceneMesh, SceneNode, TextureKind};
use crate::error::MeshviewError;

/// Import options: triangulated faces, one index per vertex, no point or
/// line primitives.
fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
    }
}

/// Import an OBJ file (and its MTL library) into a [`SceneGraph`].
///
/// Each OBJ object or group becomes one child of the root node holding one
/// mesh. V coordinates are flipped to a top-left texture origin. A missing or
/// unreadable MTL file is logged and the model loads without materials.
///
/// # Errors
///
/// Returns [`MeshviewError::ModelLoad`] if the OBJ file can't be read or
/// parsed.
pub fn import(path: impl AsRef<Path>) -> Result<SceneGraph, MeshviewError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &load_options())
        .map_err(|e| {
            MeshviewError::ModelLoad(format!("{}: {e}", path.display()))
        })?;
    let scene = scene_from_obj(&models, materials, path);
    log::info!(
        "Imported {}: {} meshes, {} materials",
        path.display(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}

fn scene_from_obj(
    models: &[tobj::Model],
    materials: Result<Vec<tobj::Material>, tobj::LoadError>,
    source: &Path,
) -> SceneGraph {
    let materials = materials.unwrap_or_else(|e| {
        log::warn!(
            "{}: material library not loaded ({e}); continuing without \
             materials",
            source.display()
        );
        Vec::new()
    });

    let meshes: Vec<SceneMesh> = models.iter().map(convert_mesh).collect();
    let children = models
        .iter()
        .enumerate()
        .map(|(i, model)| SceneNode::with_meshes(model.name.clone(), vec![i]))
        .collect();

    SceneGraph {
        root: SceneNode {
            name: source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mesh_indices: Vec::new(),
            children,
        },
        meshes,
        materials: materials.iter().map(convert_material).collect(),
    }
}

fn convert_mesh(model: &tobj::Model) -> SceneMesh {
    let mesh = &model.mesh;
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| Vec3::new(n[0], n[1], n[2]))
        .collect();
    let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], 1.0 - t[1]))
            .collect()
    });
    let faces = mesh.indices.chunks_exact(3).map(<[u32]>::to_vec).collect();

    SceneMesh {
        name: model.name.clone(),
        positions,
        normals,
        tex_coords,
        faces,
        material_index: mesh.material_id,
    }
}

fn convert_material(material: &tobj::Material) -> SceneMaterial {
    let textures = [
        (TextureKind::Diffuse, &material.diffuse_texture),
        (TextureKind::Specular, &material.specular_texture),
        (TextureKind::Normal, &material.normal_texture),
    ]
    .into_iter()
    .filter_map(|(kind, texture)| {
        texture
            .as_deref()
            .and_then(texture_file)
            .map(|file| (kind, file.to_owned()))
    })
    .collect();

    SceneMaterial {
        name: material.name.clone(),
        textures,
        shininess: material.shininess,
    }
}

/// MTL map statements may carry options (`-bm 0.5 normal.png`); the file
/// name is the last token.
fn texture_file(statement: &str) -> Option<&str> {
    statement.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    const CUBE_OBJ: &str = "\
mtllib cube.mtl
o Top
v -1 1 -1
v 1 1 -1
v 1 1 1
v -1 1 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
usemtl crate
f 1/1/1 3/3/1 2/2/1
f 1/1/1 4/4/1 3/3/1
o Side
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 5 6 7 8
";

    const CUBE_MTL: &str = "\
newmtl crate
Ns 32
map_Kd container.png
map_Ks container_specular.png
map_Bump -bm 1.0 container_normal.png
";

    fn parse(obj: &str, mtl: Option<&str>) -> SceneGraph {
        let mut reader = BufReader::new(Cursor::new(obj.as_bytes()));
        let (models, materials) =
            tobj::load_obj_buf(&mut reader, &load_options(), |_| match mtl {
                Some(mtl) => tobj::load_mtl_buf(&mut BufReader::new(
                    Cursor::new(mtl.as_bytes()),
                )),
                None => Err(tobj::LoadError::OpenFileFailed),
            })
            .unwrap();
        scene_from_obj(&models, materials, Path::new("models/cube.obj"))
    }

    #[test]
    fn objects_become_root_children() {
        let scene = parse(CUBE_OBJ, Some(CUBE_MTL));
        assert_eq!(scene.root.name, "cube");
        let names: Vec<_> =
            scene.root.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Top", "Side"]);
        assert_eq!(scene.root.children[1].mesh_indices, [1]);
    }

    #[test]
    fn quads_are_triangulated_and_v_flipped() {
        let scene = parse(CUBE_OBJ, Some(CUBE_MTL));
        let top = &scene.meshes[0];
        assert!(top.faces.iter().all(|f| f.len() == 3));
        let uvs = top.tex_coords.as_ref().unwrap();
        assert!(uvs.iter().any(|uv| *uv == Vec2::new(0.0, 1.0)));
        assert!(uvs.iter().all(|uv| (0.0..=1.0).contains(&uv.y)));

        let side = &scene.meshes[1];
        assert_eq!(side.faces.len(), 2);
        assert!(side.tex_coords.is_none());
        assert!(side.normals.is_empty());
    }

    #[test]
    fn material_maps_are_tagged_by_kind() {
        let scene = parse(CUBE_OBJ, Some(CUBE_MTL));
        assert_eq!(scene.meshes[0].material_index, Some(0));
        let material = &scene.materials[0];
        assert_eq!(material.shininess, Some(32.0));
        assert_eq!(
            material.textures,
            [
                (TextureKind::Diffuse, "container.png".to_owned()),
                (TextureKind::Specular, "container_specular.png".to_owned()),
                (TextureKind::Normal, "container_normal.png".to_owned()),
            ]
        );
    }

    #[test]
    fn missing_material_library_is_not_fatal() {
        let scene = parse(CUBE_OBJ, None);
        assert!(scene.materials.is_empty());
        assert_eq!(scene.meshes.len(), 2);
    }

    #[test]
    fn missing_file_is_model_load_error() {
        let result = import("does/not/exist.obj");
        assert!(matches!(result, Err(MeshviewError::ModelLoad(_))));
    }
}
