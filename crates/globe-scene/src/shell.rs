//! Wireframe shell generation.
//!
//! Builds the globe's "network shell": a geodesic polyhedron obtained by
//! subdividing each face of an icosahedron into a triangular grid and pushing
//! every grid point onto the sphere. Vertices shared between faces are merged,
//! so the output is indexed and the edge list contains every edge exactly once.
//!
//! For a subdivision level `L` the edge frequency is `f = L + 1`, giving
//! `10f² + 2` vertices, `30f²` edges and `20f²` faces.

use std::collections::{BTreeSet, HashMap};

use glam::Vec3;

use crate::error::{SceneError, SceneResult, ensure_positive};

/// Highest accepted subdivision level.
///
/// Level 16 already yields 8,670 edges; beyond that the wireframe is visually
/// indistinguishable from a solid and only costs draw time.
pub const MAX_SUBDIVISION: i32 = 16;

/// How wireframe edges are derived from the polyhedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeMode {
    /// Every triangle edge of the subdivided mesh.
    Mesh,
    /// Every vertex pair closer than the given chord length.
    Proximity(f32),
}

/// Parameters that fully determine a shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    /// Subdivision level (0 = plain icosahedron).
    pub subdivision: i32,
    /// Sphere radius the vertices are projected onto.
    pub radius: f32,
    /// Edge derivation.
    pub edges: EdgeMode,
}

/// Immutable shell buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    /// Parameters this shell was built from.
    pub params: ShellParams,
    /// Unique vertex positions, reused as node anchor points.
    pub nodes: Vec<Vec3>,
    /// Deduplicated edges as pairs of node indices, lowest index first.
    pub edge_indices: Vec<[u32; 2]>,
}

impl Shell {
    /// Iterate edges as point pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edge_indices
            .iter()
            .map(|[a, b]| (self.nodes[*a as usize], self.nodes[*b as usize]))
    }

    /// Flattened `[a0, b0, a1, b1, ...]` positions for line-list rendering.
    pub fn line_list(&self) -> Vec<Vec3> {
        self.edges().flat_map(|(a, b)| [a, b]).collect()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_indices.len()
    }
}

/// Build a shell.
///
/// # Errors
///
/// Returns [`SceneError::InvalidConfiguration`] for a negative or excessive
/// subdivision level, a non-positive radius, or a non-positive proximity
/// threshold.
pub fn build_shell(params: ShellParams) -> SceneResult<Shell> {
    if params.subdivision < 0 {
        return Err(SceneError::invalid(
            "orb.subdivision",
            format!("expected a level >= 0, got {}", params.subdivision),
        ));
    }
    if params.subdivision > MAX_SUBDIVISION {
        return Err(SceneError::invalid(
            "orb.subdivision",
            format!(
                "level {} exceeds the maximum of {MAX_SUBDIVISION}",
                params.subdivision
            ),
        ));
    }
    ensure_positive("orb.shell_radius", params.radius)?;
    if let EdgeMode::Proximity(max_len) = params.edges {
        ensure_positive("orb.edges", max_len)?;
    }

    #[allow(clippy::cast_sign_loss)]
    let frequency = params.subdivision as usize + 1;
    let (nodes, triangles) = subdivide(frequency, params.radius);

    let edge_indices = match params.edges {
        EdgeMode::Mesh => mesh_edges(&triangles),
        EdgeMode::Proximity(max_len) => proximity_edges(&nodes, max_len),
    };

    tracing::debug!(
        subdivision = params.subdivision,
        nodes = nodes.len(),
        edges = edge_indices.len(),
        "built shell"
    );

    Ok(Shell {
        params,
        nodes,
        edge_indices,
    })
}

/// Memoizes the most recently built shell.
///
/// Rebuilding only happens when the parameters change, so calling
/// [`ShellCache::get`] from a frame loop is cheap.
#[derive(Debug, Default)]
pub struct ShellCache {
    current: Option<std::sync::Arc<Shell>>,
    builds: usize,
}

impl ShellCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shell for `params`, building it if the parameters changed.
    pub fn get(&mut self, params: ShellParams) -> SceneResult<std::sync::Arc<Shell>> {
        if let Some(shell) = &self.current
            && shell.params == params
        {
            return Ok(shell.clone());
        }
        let shell = std::sync::Arc::new(build_shell(params)?);
        self.builds += 1;
        self.current = Some(shell.clone());
        Ok(shell)
    }

    /// Number of times a shell has actually been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

/// Icosahedron vertices (unnormalized) and faces.
fn icosahedron() -> ([Vec3; 12], [[usize; 3]; 20]) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let vertices = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (vertices, faces)
}

/// Grid point identified by its integer barycentric weights over icosahedron
/// corners. Points on shared edges get the same key from both faces.
type GridKey = [(usize, usize); 3];

/// Assigns one index per distinct grid point.
struct VertexWelder<'a> {
    corners: &'a [Vec3; 12],
    frequency: usize,
    radius: f32,
    lookup: HashMap<GridKey, u32>,
    positions: Vec<Vec3>,
}

impl<'a> VertexWelder<'a> {
    fn new(corners: &'a [Vec3; 12], frequency: usize, radius: f32) -> Self {
        Self {
            corners,
            frequency,
            radius,
            lookup: HashMap::new(),
            positions: Vec::new(),
        }
    }

    /// Insert the point with the given `(corner, weight)` terms.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn insert(&mut self, terms: [(usize, usize); 3]) -> u32 {
        let mut key: GridKey = terms.map(|(corner, weight)| {
            if weight == 0 {
                (usize::MAX, 0)
            } else {
                (corner, weight)
            }
        });
        key.sort_unstable();

        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        // Sum in canonical order so both faces produce identical floats.
        let sum = key
            .iter()
            .filter(|(_, weight)| *weight > 0)
            .fold(Vec3::ZERO, |acc, &(corner, weight)| {
                acc + self.corners[corner] * weight as f32
            });
        let position = (sum / self.frequency as f32).normalize() * self.radius;

        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.lookup.insert(key, index);
        index
    }
}

/// Subdivide every icosahedron face into a `frequency`-segment triangular
/// grid and project the grid onto the sphere.
fn subdivide(frequency: usize, radius: f32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let (corners, faces) = icosahedron();
    let mut welder = VertexWelder::new(&corners, frequency, radius);
    let mut triangles = Vec::with_capacity(20 * frequency * frequency);

    for [ia, ib, ic] in faces {
        // Row i runs parallel to the a-b edge, i steps towards c; it has
        // `frequency - i + 1` points with weights (a: len - j, b: j, c: i).
        let grid: Vec<Vec<u32>> = (0..=frequency)
            .map(|i| {
                let row_len = frequency - i;
                (0..=row_len)
                    .map(|j| welder.insert([(ia, row_len - j), (ib, j), (ic, i)]))
                    .collect()
            })
            .collect();

        for i in 0..frequency {
            let row_len = frequency - i;
            for j in 0..row_len {
                triangles.push([grid[i][j], grid[i][j + 1], grid[i + 1][j]]);
                if j + 1 < row_len {
                    triangles.push([grid[i][j + 1], grid[i + 1][j + 1], grid[i + 1][j]]);
                }
            }
        }
    }

    (welder.positions, triangles)
}

fn mesh_edges(triangles: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut edges = BTreeSet::new();
    for &[a, b, c] in triangles {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            edges.insert([p.min(q), p.max(q)]);
        }
    }
    edges.into_iter().collect()
}

#[allow(clippy::cast_possible_truncation)]
fn proximity_edges(nodes: &[Vec3], max_len: f32) -> Vec<[u32; 2]> {
    let max_len_sq = max_len * max_len;
    let mut edges = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            if a.distance_squared(*b) < max_len_sq {
                edges.push([i as u32, j as u32]);
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_params(subdivision: i32) -> ShellParams {
        ShellParams {
            subdivision,
            radius: 1.5,
            edges: EdgeMode::Mesh,
        }
    }

    #[test]
    fn test_level_zero_is_icosahedron() {
        let shell = build_shell(mesh_params(0)).unwrap();
        assert_eq!(shell.nodes.len(), 12);
        assert_eq!(shell.edge_count(), 30);
    }

    #[test]
    fn test_counts_follow_frequency() {
        for level in 0..=5 {
            let f = (level + 1) as usize;
            let shell = build_shell(mesh_params(level)).unwrap();
            assert_eq!(shell.nodes.len(), 10 * f * f + 2, "nodes at level {level}");
            assert_eq!(shell.edge_count(), 30 * f * f, "edges at level {level}");
        }
    }

    #[test]
    fn test_deterministic() {
        for level in 2..=5 {
            let first = build_shell(mesh_params(level)).unwrap();
            let second = build_shell(mesh_params(level)).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_nodes_on_sphere() {
        let shell = build_shell(mesh_params(4)).unwrap();
        for node in &shell.nodes {
            assert!((node.length() - 1.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_edges_unique_and_ordered() {
        let shell = build_shell(mesh_params(3)).unwrap();
        let unique: BTreeSet<_> = shell.edge_indices.iter().copied().collect();
        assert_eq!(unique.len(), shell.edge_count());
        assert!(shell.edge_indices.iter().all(|[a, b]| a < b));
        assert_eq!(shell.line_list().len(), shell.edge_count() * 2);
    }

    #[test]
    fn test_proximity_edges_respect_threshold() {
        let shell = build_shell(ShellParams {
            subdivision: 2,
            radius: 1.2,
            edges: EdgeMode::Proximity(0.5),
        })
        .unwrap();
        assert!(shell.edge_count() > 0);
        for (a, b) in shell.edges() {
            assert!(a.distance(b) < 0.5);
        }
    }

    #[test]
    fn test_rejects_bad_params() {
        assert!(matches!(
            build_shell(mesh_params(-1)),
            Err(SceneError::InvalidConfiguration { field: "orb.subdivision", .. })
        ));
        assert!(build_shell(mesh_params(MAX_SUBDIVISION + 1)).is_err());
        assert!(
            build_shell(ShellParams {
                radius: f32::NAN,
                ..mesh_params(1)
            })
            .is_err()
        );
        assert!(
            build_shell(ShellParams {
                edges: EdgeMode::Proximity(0.0),
                ..mesh_params(1)
            })
            .is_err()
        );
    }

    #[test]
    fn test_cache_rebuilds_only_on_change() {
        let mut cache = ShellCache::new();
        let a = cache.get(mesh_params(2)).unwrap();
        let b = cache.get(mesh_params(2)).unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(cache.builds(), 1);

        cache.get(mesh_params(3)).unwrap();
        assert_eq!(cache.builds(), 2);
    }
}
