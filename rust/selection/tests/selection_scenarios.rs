// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end selection scenarios driven through pointer events.

use meshsel_geometry::{BvhMesh, BvhOptions, Mesh, Point3, Vector3};
use meshsel_selection::{
    Camera, ClassifierPolicy, DrawRange, RegionMode, SelectionConfig, SelectionEngine, Viewport,
};

/// Unit quad spanning [-1, 1] in the z = 0 plane
fn quad() -> BvhMesh {
    let mesh = Mesh::new(
        vec![-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0],
        vec![0, 1, 2, 0, 2, 3],
    )
    .unwrap();
    BvhMesh::new(mesh)
}

/// n x n grid of unit quads centred on the origin, two triangles each
fn grid(n: usize) -> Mesh {
    let half = n as f32 / 2.0;
    let mut positions = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            positions.extend_from_slice(&[x as f32 - half, y as f32 - half, 0.0]);
        }
    }
    let row = n as u32 + 1;
    let mut indices = Vec::new();
    for y in 0..n as u32 {
        for x in 0..n as u32 {
            let i = y * row + x;
            indices.extend_from_slice(&[i, i + 1, i + row + 1, i, i + row + 1, i + row]);
        }
    }
    Mesh::new(positions, indices).unwrap()
}

fn fine_bvh(mesh: Mesh) -> BvhMesh {
    BvhMesh::with_options(
        mesh,
        &BvhOptions {
            max_leaf_triangles: 2,
            max_depth: 40,
        },
    )
}

fn head_on(half: f64) -> Camera {
    Camera::orthographic(-half, half, -half, half, 0.1, 100.0).look_at(
        Point3::new(0.0, 0.0, 10.0),
        Point3::origin(),
        Vector3::y(),
    )
}

fn oblique() -> Camera {
    Camera::perspective(std::f64::consts::FRAC_PI_3, 1.0, 0.1, 100.0).look_at(
        Point3::new(1.5, -2.0, 9.0),
        Point3::origin(),
        Vector3::y(),
    )
}

fn config(region_mode: RegionMode, policy: ClassifierPolicy) -> SelectionConfig {
    SelectionConfig {
        region_mode,
        policy,
        ..Default::default()
    }
}

/// Box drag across the whole 100 x 100 viewport
fn drag_full_box(engine: &mut SelectionEngine, camera: &Camera, target: &BvhMesh) {
    engine.pointer_down(0.0, 0.0);
    engine.pointer_move(100.0, 100.0, camera, target).unwrap();
    engine.pointer_up(camera, target).unwrap();
}

/// Concave lasso in client pixels, clear of grid lines and vertices
const LASSO: [(f64, f64); 5] = [
    (23.5, 70.5),
    (73.5, 81.5),
    (80.5, 31.5),
    (52.5, 44.0),
    (31.0, 21.0),
];

fn drag_lasso(engine: &mut SelectionEngine, camera: &Camera, target: &BvhMesh) {
    let (x, y) = LASSO[0];
    engine.pointer_down(x, y);
    for &(x, y) in &LASSO[1..] {
        engine.pointer_move(x, y, camera, target).unwrap();
    }
    // back to the start so the first point is recorded too
    engine.pointer_move(x, y, camera, target).unwrap();
    engine.pointer_up(camera, target).unwrap();
}

fn sorted(selection: &[u32]) -> Vec<u32> {
    let mut selection = selection.to_vec();
    selection.sort_unstable();
    selection
}

#[test]
fn test_box_select_delete_undo_quad() {
    let mut target = quad();
    let original = target.mesh.indices.clone();
    let camera = head_on(2.0);
    let mut engine = SelectionEngine::new(
        config(RegionMode::Box, ClassifierPolicy::Intersection),
        Viewport::new(100.0, 100.0),
        &target.mesh,
    );

    drag_full_box(&mut engine, &camera, &target);
    assert_eq!(sorted(engine.selection()), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(engine.selected_triangle_count(), 2);
    assert_eq!(engine.highlight().draw_range(), DrawRange::Count(6));
    let mut drawn = engine.highlight().drawn_indices().to_vec();
    drawn.sort_unstable();
    assert_eq!(drawn, vec![0, 0, 1, 2, 2, 3]);

    let gizmo = engine.gizmo().wire_box().unwrap();
    assert!(gizmo.visible);
    assert_eq!(gizmo.size, Vector3::new(2.0, 2.0, 0.0));
    assert_eq!(gizmo.center, Point3::origin());
    assert!(!engine.region().is_visible());

    assert!(engine.delete_selected(&mut target));
    assert_eq!(target.mesh.indices, vec![0; 6]);
    assert!(engine.selection().is_empty());
    assert_eq!(engine.highlight().draw_count(), 0);
    assert!(!engine.gizmo().is_visible());

    // the gizmo is hidden, so a second delete does nothing
    assert!(!engine.delete_selected(&mut target));
    assert_eq!(engine.history().len(), 1);

    assert!(engine.undo(&mut target));
    assert_eq!(target.mesh.indices, original);
    assert!(!engine.undo(&mut target));
}

#[test]
fn test_click_without_drag_clears_selection() {
    let target = quad();
    let camera = head_on(2.0);
    let mut engine = SelectionEngine::new(
        config(RegionMode::Box, ClassifierPolicy::Intersection),
        Viewport::new(100.0, 100.0),
        &target.mesh,
    );

    drag_full_box(&mut engine, &camera, &target);
    assert_eq!(engine.selected_triangle_count(), 2);

    engine.pointer_down(50.0, 50.0);
    engine.pointer_up(&camera, &target).unwrap();
    assert!(engine.region().is_empty());
    assert!(engine.selection().is_empty());
    assert_eq!(engine.highlight().draw_range(), DrawRange::Count(0));
    assert!(!engine.gizmo().is_visible());
}

#[test]
fn test_bounds_tree_matches_exhaustive_scan() {
    let target = fine_bvh(grid(8));
    let total = target.mesh.triangle_count();
    assert!(target.bvh().depth() > 3);

    for camera in [head_on(5.0), oblique()] {
        for policy in [ClassifierPolicy::Centroid, ClassifierPolicy::Intersection] {
            let mut results = Vec::new();
            for use_bounds_tree in [true, false] {
                let config = SelectionConfig {
                    use_bounds_tree,
                    ..config(RegionMode::Lasso, policy)
                };
                let mut engine =
                    SelectionEngine::new(config, Viewport::new(100.0, 100.0), &target.mesh);
                drag_lasso(&mut engine, &camera, &target);
                results.push(sorted(engine.selection()));
            }

            assert!(!results[0].is_empty(), "{policy:?} selected nothing");
            assert!(results[0].len() < total * 3, "{policy:?} selected everything");
            assert_eq!(results[0], results[1], "{policy:?} differs with culling");
        }
    }
}

#[test]
fn test_intersection_selects_superset_of_centroid() {
    let target = fine_bvh(grid(8));
    let camera = oblique();
    let mut selections = Vec::new();
    for policy in [ClassifierPolicy::Centroid, ClassifierPolicy::Intersection] {
        let mut engine = SelectionEngine::new(
            config(RegionMode::Lasso, policy),
            Viewport::new(100.0, 100.0),
            &target.mesh,
        );
        drag_lasso(&mut engine, &camera, &target);
        selections.push(sorted(engine.selection()));
    }
    let (centroid, intersection) = (&selections[0], &selections[1]);
    assert!(centroid.iter().all(|p| intersection.contains(p)));
    assert!(intersection.len() > centroid.len());
}

#[test]
fn test_select_model_highlights_whole_mesh() {
    let target = fine_bvh(grid(4));
    let camera = head_on(4.0);
    let config = SelectionConfig {
        select_model: true,
        ..config(RegionMode::Box, ClassifierPolicy::Intersection)
    };
    let mut engine = SelectionEngine::new(config, Viewport::new(100.0, 100.0), &target.mesh);

    drag_full_box(&mut engine, &camera, &target);
    // traversal stops at the first hit
    assert_eq!(engine.selected_triangle_count(), 1);
    assert_eq!(engine.highlight().draw_range(), DrawRange::All);
    assert_eq!(engine.highlight().drawn_indices(), target.mesh.indices.as_slice());
}

#[test]
fn test_centroid_visible_skips_occluded_triangles() {
    // back quad at z = 0, larger front quad at z = 1 covering it
    let mesh = Mesh::new(
        vec![
            -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0, //
            -2.0, -2.0, 1.0, 2.0, -2.0, 1.0, 2.0, 2.0, 1.0, -2.0, 2.0, 1.0,
        ],
        vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7],
    )
    .unwrap();
    let target = BvhMesh::new(mesh);
    let camera = head_on(4.0);

    let mut engine = SelectionEngine::new(
        config(RegionMode::Box, ClassifierPolicy::CentroidVisible),
        Viewport::new(100.0, 100.0),
        &target.mesh,
    );
    drag_full_box(&mut engine, &camera, &target);
    assert_eq!(sorted(engine.selection()), vec![6, 7, 8, 9, 10, 11]);

    let mut engine = SelectionEngine::new(
        config(RegionMode::Box, ClassifierPolicy::Centroid),
        Viewport::new(100.0, 100.0),
        &target.mesh,
    );
    drag_full_box(&mut engine, &camera, &target);
    assert_eq!(engine.selected_triangle_count(), 4);
}

#[test]
fn test_live_update_follows_pointer() {
    let target = quad();
    let camera = head_on(2.0);
    let config = SelectionConfig {
        live_update: true,
        ..config(RegionMode::Lasso, ClassifierPolicy::Intersection)
    };
    let mut engine = SelectionEngine::new(config, Viewport::new(100.0, 100.0), &target.mesh);

    engine.pointer_down(10.0, 10.0);
    assert!(engine.pointer_move(90.0, 10.0, &camera, &target).unwrap());
    assert!(engine.pointer_move(90.0, 90.0, &camera, &target).unwrap());
    // two points enclose nothing
    assert!(engine.selection().is_empty());

    // lower-right triangle region: only the quad's first triangle reaches into it
    assert!(engine.pointer_move(20.0, 90.0, &camera, &target).unwrap());
    assert_eq!(engine.region().points().len(), 3);
    assert!(engine.region().is_visible());
    assert_eq!(sorted(engine.selection()), vec![0, 1, 2]);
    assert_eq!(engine.highlight().draw_count(), 3);

    // below the pixel step: no change, no traversal
    let version = engine.highlight().version();
    assert!(!engine.pointer_move(21.0, 91.0, &camera, &target).unwrap());
    assert_eq!(engine.highlight().version(), version);

    engine.pointer_up(&camera, &target).unwrap();
    assert!(!engine.region().is_visible());
    assert_eq!(sorted(engine.selection()), vec![0, 1, 2]);
}

#[test]
fn test_repeated_delete_undo_cycles() {
    let mut target = fine_bvh(grid(6));
    let camera = head_on(4.0);
    let mut engine = SelectionEngine::new(
        config(RegionMode::Box, ClassifierPolicy::Centroid),
        Viewport::new(100.0, 100.0),
        &target.mesh,
    );

    let boxes = [
        ((10.0, 10.0), (60.0, 60.0)),
        ((40.0, 40.0), (90.0, 90.0)),
        ((25.0, 5.0), (75.0, 95.0)),
    ];
    let mut snapshots = Vec::new();
    for ((x0, y0), (x1, y1)) in boxes {
        engine.pointer_down(x0, y0);
        engine.pointer_move(x1, y1, &camera, &target).unwrap();
        engine.pointer_up(&camera, &target).unwrap();
        assert!(engine.selected_triangle_count() > 0);

        snapshots.push(target.mesh.indices.clone());
        let selected = engine.selection().to_vec();
        assert!(engine.delete_selected(&mut target));
        assert!(selected.iter().all(|&p| target.mesh.indices[p as usize] == 0));
    }

    while let Some(snapshot) = snapshots.pop() {
        assert!(engine.undo(&mut target));
        assert_eq!(target.mesh.indices, snapshot);
    }
    assert!(!engine.undo(&mut target));
}

#[test]
fn test_deleted_triangles_not_reselected() {
    let camera = head_on(4.0);
    let mut counts = Vec::new();
    for use_bounds_tree in [true, false] {
        let mut target = fine_bvh(grid(6));
        let config = SelectionConfig {
            use_bounds_tree,
            ..config(RegionMode::Box, ClassifierPolicy::Centroid)
        };
        let mut engine = SelectionEngine::new(config, Viewport::new(100.0, 100.0), &target.mesh);

        // upper-right quadrant, away from vertex 0 in the lower-left corner
        let select = |engine: &mut SelectionEngine, target: &BvhMesh| {
            engine.pointer_down(50.0, 0.0);
            engine.pointer_move(100.0, 50.0, &camera, target).unwrap();
            engine.pointer_up(&camera, target).unwrap();
            engine.selected_triangle_count()
        };

        let first = select(&mut engine, &target);
        assert!(engine.delete_selected(&mut target));
        let again = select(&mut engine, &target);
        assert!(!engine.gizmo().is_visible());
        counts.push((first, again));
    }
    assert_eq!(counts, vec![(18, 0), (18, 0)]);
}

#[test]
fn test_config_from_json_drives_engine() {
    let target = quad();
    let camera = head_on(2.0);
    let config =
        SelectionConfig::from_json(r#"{ "region_mode": "box", "policy": "centroid" }"#).unwrap();
    let mut engine = SelectionEngine::new(config, Viewport::new(100.0, 100.0), &target.mesh);
    drag_full_box(&mut engine, &camera, &target);
    assert_eq!(engine.selected_triangle_count(), 2);
}
