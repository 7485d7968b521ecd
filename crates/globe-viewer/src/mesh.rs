//! Mesh conversion utilities for rendering the scene model in Bevy.
//!
//! The shell becomes a line list and particle layers become point lists.
//! Everything is drawn with unlit materials, so no normals are generated.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use globe_scene::Shell;

/// Site accent colour (`#7dd3fc`).
pub const ACCENT: Color = Color::srgb(0.490, 0.827, 0.988);
/// Lighter accent used for shell nodes (`#c7f0ff`).
pub const ACCENT_LIGHT: Color = Color::srgb(0.780, 0.941, 1.0);
/// Core sphere colour (`#0a1628`).
pub const CORE: Color = Color::srgb(0.039, 0.086, 0.157);
/// Page background (`#0a0e17`).
pub const BACKGROUND: Color = Color::srgb(0.039, 0.055, 0.090);

/// Convert the shell's edges to a line-list mesh.
pub fn shell_lines(shell: &Shell) -> Mesh {
    let positions: Vec<[f32; 3]> = shell.line_list().into_iter().map(|v| v.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Convert a set of points to a point-list mesh.
pub fn point_cloud(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Unlit, alpha-blended material in `color` at `opacity`.
pub fn glow_material(color: Color, opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(opacity),
        unlit: true,
        alpha_mode: if opacity < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use globe_scene::{EdgeMode, ShellParams, shell::build_shell};

    use super::*;

    #[test]
    fn test_shell_lines_two_vertices_per_edge() {
        let shell = build_shell(ShellParams {
            subdivision: 1,
            radius: 1.5,
            edges: EdgeMode::Mesh,
        })
        .unwrap();
        let mesh = shell_lines(&shell);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineList);
        assert_eq!(mesh.count_vertices(), shell.edge_count() * 2);
    }

    #[test]
    fn test_point_cloud() {
        let mesh = point_cloud(&[Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(mesh.count_vertices(), 3);
    }

    #[test]
    fn test_glow_material_blends_when_translucent() {
        assert!(matches!(glow_material(ACCENT, 0.3).alpha_mode, AlphaMode::Blend));
        assert!(matches!(glow_material(CORE, 1.0).alpha_mode, AlphaMode::Opaque));
    }
}
