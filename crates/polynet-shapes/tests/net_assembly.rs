//! End-to-end pyramid net generation.

use polynet_core::{BoundingBox, Point};
use polynet_path::PathData;
use polynet_shapes::{
    pyramid_net, AscendantEdgeTabsSpec, FaceDecoration, PolyhedronSpec, PyramidNetSpec,
    ShapeError,
};
use proptest::prelude::*;
use std::f64::consts::TAU;

fn count(path: &PathData, code: char) -> usize {
    path.commands().iter().filter(|c| c.code() == code).count()
}

fn spec_with(base_ratio: f64, face_count: usize) -> PyramidNetSpec {
    PyramidNetSpec {
        polyhedron: PolyhedronSpec {
            unique_face_edge_lengths: vec![1.0, base_ratio],
            face_edge_indices: [0, 1, 0],
            face_count,
            ..Default::default()
        },
        border_inset_ratio: 0.05,
        ..Default::default()
    }
}

#[test]
fn test_default_net_has_every_feature() {
    let spec = PyramidNetSpec::default();
    let net = pyramid_net(&spec).unwrap();
    let tabs = spec.ascendant_edge_tabs.tabs_count;

    assert_eq!(net.face_count, 4);
    assert_eq!(net.copies_needed, 2);
    assert_eq!(net.cut.commands()[0].to(), Some(Point::ORIGIN));
    // Two bezier sides per male tab; nothing else in the net uses cubics.
    assert_eq!(count(&net.cut, 'C'), 2 * tabs);
    // One hole per base edge and one per female tab.
    assert_eq!(count(&net.cut, 'Z'), net.face_count + tabs);
    assert!(!net.score.is_empty());
}

#[test]
fn test_tab_count_follows_spec() {
    let spec = PyramidNetSpec {
        ascendant_edge_tabs: AscendantEdgeTabsSpec {
            tabs_count: 5,
            ..Default::default()
        },
        ..Default::default()
    };
    let net = pyramid_net(&spec).unwrap();
    assert_eq!(count(&net.cut, 'C'), 10);
    assert_eq!(count(&net.cut, 'Z'), 4 + 5);
}

#[test]
fn test_too_many_faces_is_reported() {
    let spec = PyramidNetSpec {
        polyhedron: PolyhedronSpec {
            face_count: 7,
            ..Default::default()
        },
        ..Default::default()
    };
    match pyramid_net(&spec) {
        Err(ShapeError::TooManyFaces {
            face_count,
            apex_angle,
        }) => {
            assert_eq!(face_count, 7);
            assert!((apex_angle - TAU / 6.0).abs() < 1e-9);
        }
        other => panic!("expected TooManyFaces, got {:?}", other),
    }
}

#[test]
fn test_full_turn_still_builds_with_clamped_flap() {
    let spec = PyramidNetSpec {
        polyhedron: PolyhedronSpec {
            face_count: 6,
            ..Default::default()
        },
        ..Default::default()
    };
    let net = pyramid_net(&spec).unwrap();
    assert_eq!(count(&net.cut, 'Z'), 6 + 3);
}

#[test]
fn test_invalid_border_inset_ratio() {
    let spec = PyramidNetSpec {
        border_inset_ratio: 0.7,
        ..Default::default()
    };
    assert!(matches!(
        pyramid_net(&spec),
        Err(ShapeError::InvalidParameters(_))
    ));
}

#[test]
fn test_border_inset_stays_inside_face_bounds() {
    let net = pyramid_net(&spec_with(0.8, 4)).unwrap();
    let bounds = BoundingBox::from_points(&net.face_boundary).unwrap();
    for p in &net.face_boundary {
        let inset = net.border_inset.apply(*p);
        assert!(inset.x > bounds.min.x && inset.x < bounds.max.x);
        assert!(inset.y > bounds.min.y && inset.y < bounds.max.y);
    }
}

#[test]
fn test_svg_document_strokes_and_decoration() {
    let net = pyramid_net(&PyramidNetSpec::default()).unwrap();
    let plain = net.to_svg_document();
    assert!(plain.starts_with("<svg"));
    assert!(plain.contains("viewBox="));
    assert!(plain.contains(r##"stroke="#FF0000""##));
    assert!(plain.contains(r##"stroke="#0000FF""##));
    assert_eq!(plain.matches("transform=").count(), 0);

    let decoration = FaceDecoration::Path {
        d: "M 10,10 L 20,20".parse().unwrap(),
    };
    let decorated = net.to_svg_document_with_decoration(Some(&decoration));
    assert_eq!(decorated.matches("transform=").count(), net.face_count);
}

proptest! {
    #[test]
    fn prop_net_builds_unless_faces_overflow(
        base_ratio in 0.2f64..1.4,
        face_count in 3usize..9,
    ) {
        let spec = spec_with(base_ratio, face_count);
        let apex_angle = spec.polyhedron.apex_angle().unwrap();
        let result = pyramid_net(&spec);

        if face_count as f64 * apex_angle > TAU + 1e-6 {
            let overflowed = matches!(result, Err(ShapeError::TooManyFaces { .. }));
            prop_assert!(overflowed);
        } else if face_count as f64 * apex_angle < TAU - 1e-6 {
            let net = result.unwrap();
            let tabs = spec.ascendant_edge_tabs.tabs_count;
            prop_assert_eq!(count(&net.cut, 'C'), 2 * tabs);
            prop_assert_eq!(count(&net.cut, 'Z'), face_count + tabs);

            // Male tabs protrude below the first ascendant edge.
            let bounds = net.cut.bounding_box().unwrap();
            prop_assert!(bounds.min.y < 0.0);
            prop_assert!(bounds.max.x >= 150.0 - 1e-6);
        }
    }
}
