//! Serialization and transform properties of `PathData`.

use polynet_core::{AffineMatrix, Point, TransformObject};
use polynet_path::{parse_path, Command, PathData};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1000i32..1000).prop_map(f64::from),
        -1000.0f64..1000.0,
    ]
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

#[derive(Debug, Clone)]
enum Step {
    Move(Point),
    Line(Point),
    Cubic(Point, Point, Point),
    Quadratic(Point, Point),
    SmoothCubic(Point, Point),
    SmoothQuadratic(Point),
    Close,
}

/// Steps that draw without starting or closing a sub-path.
fn drawing_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        point().prop_map(Step::Line),
        (point(), point(), point()).prop_map(|(a, b, c)| Step::Cubic(a, b, c)),
        (point(), point()).prop_map(|(a, b)| Step::Quadratic(a, b)),
        (point(), point()).prop_map(|(a, b)| Step::SmoothCubic(a, b)),
        point().prop_map(Step::SmoothQuadratic),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        5 => drawing_step(),
        1 => point().prop_map(Step::Move),
        1 => Just(Step::Close),
    ]
}

/// One sub-path: start point, drawing steps, and whether it is closed.
fn subpath() -> impl Strategy<Value = (Point, Vec<Step>, bool)> {
    (point(), prop::collection::vec(drawing_step(), 0..8), any::<bool>())
}

/// Build a valid path, skipping steps the builder would reject.
fn build(start: Point, steps: &[Step]) -> PathData {
    steps.iter().fold(PathData::new().move_to(start), |path, step| {
        let next = match *step {
            Step::Move(p) => Ok(path.clone().move_to(p)),
            Step::Line(p) => path.clone().line_to(p),
            Step::Cubic(a, b, c) => path.clone().cubic_bezier(a, b, c),
            Step::Quadratic(a, b) => path.clone().quadratic_bezier(a, b),
            Step::SmoothCubic(a, b) => path.clone().smooth_cubic_bezier(a, b),
            Step::SmoothQuadratic(p) => path.clone().smooth_quadratic_bezier(p),
            Step::Close => path.clone().close(),
        };
        next.unwrap_or(path)
    })
}

fn build_subpaths(subpaths: &[(Point, Vec<Step>, bool)]) -> PathData {
    subpaths.iter().fold(PathData::new(), |path, (start, steps, closed)| {
        let path = path.concat_path(&build(*start, steps)).unwrap();
        if *closed {
            path.close().unwrap()
        } else {
            path
        }
    })
}

/// `(start, end, closed)` of every sub-path, in drawing order.
fn subpath_ends(path: &PathData) -> Vec<(Point, Point, bool)> {
    let mut ends: Vec<(Point, Point, bool)> = Vec::new();
    for command in path.commands() {
        if let Command::Move { to } = command {
            ends.push((*to, *to, false));
            continue;
        }
        let Some(last) = ends.last_mut() else {
            continue;
        };
        match command.to() {
            Some(to) => last.1 = to,
            None => {
                last.1 = last.0;
                last.2 = true;
            }
        }
    }
    ends
}

fn points_close(a: &[Point], b: &[Point], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.approx_eq(q, tolerance))
}

#[test]
fn test_parse_of_serialized_path_is_identical() {
    let path = PathData::new()
        .move_to(Point::new(0.5, -1.25))
        .cubic_bezier(
            Point::new(1.0 / 3.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
        )
        .and_then(|p| p.smooth_cubic_bezier(Point::new(7.0, 8.0), Point::new(9.0, 10.0)))
        .and_then(PathData::close)
        .unwrap();
    assert_eq!(parse_path(&path.get_d()).unwrap(), path);
    assert_eq!(path.to_string().parse::<PathData>().unwrap(), path);
}

#[test]
fn test_reverse_closed_then_open_subpaths() {
    let path = parse_path("M 0,0 L 4,0 L 4,4 Z M 10,10 Q 12,12 14,10").unwrap();
    let reversed = path.reverse_path();
    assert_eq!(
        reversed.get_d(),
        "M 14,10 Q 12,12 10,10 M 0,0 L 4,4 L 4,0 L 0,0 Z"
    );
}

proptest! {
    #[test]
    fn prop_parse_inverts_get_d(start in point(), steps in prop::collection::vec(step(), 0..24)) {
        let path = build(start, &steps);
        let parsed = parse_path(&path.get_d()).unwrap();
        prop_assert_eq!(parsed, path);
    }

    #[test]
    fn prop_transforms_compose(
        start in point(),
        steps in prop::collection::vec(step(), 0..16),
        rotate in -180.0f64..180.0,
        scale in 0.1f64..4.0,
        tx in -100.0f64..100.0,
        ty in -100.0f64..100.0,
    ) {
        let path = build(start, &steps);
        let a = TransformObject { rotate, scale, ..Default::default() }.to_matrix();
        let b = AffineMatrix::translation(tx, ty);

        let stepwise = path.transform_by_matrix(&a).transform_by_matrix(&b);
        let composed = path.transform_by_matrix(&b.multiply(&a));
        let tolerance = 1e-6 * 4000.0;
        prop_assert!(points_close(
            &stepwise.get_destination_points(),
            &composed.get_destination_points(),
            tolerance
        ));
    }

    #[test]
    fn prop_reverse_keeps_endpoints(start in point(), steps in prop::collection::vec(drawing_step(), 1..16)) {
        let path = build(start, &steps);

        let reversed = path.reverse_path();
        prop_assert_eq!(reversed.get_current_segment_start(), path.get_last_position());
        prop_assert_eq!(reversed.get_last_position(), Some(start));
        prop_assert_eq!(reversed.reverse_path(), path.expand_smooth_commands());
    }

    #[test]
    fn prop_reverse_swaps_subpath_ends(subpaths in prop::collection::vec(subpath(), 1..5)) {
        let path = build_subpaths(&subpaths);
        let reversed = path.reverse_path();

        let original = subpath_ends(&path);
        let mut flipped = subpath_ends(&reversed);
        flipped.reverse();
        prop_assert_eq!(original.len(), subpaths.len());
        prop_assert_eq!(flipped.len(), original.len());
        for ((start, end, closed), (rev_start, rev_end, rev_closed)) in original.iter().zip(&flipped) {
            prop_assert_eq!(closed, rev_closed);
            if *closed {
                prop_assert_eq!(rev_start, start);
                prop_assert_eq!(rev_end, start);
            } else {
                prop_assert_eq!(rev_start, end);
                prop_assert_eq!(rev_end, start);
            }
        }

        // A closed sub-path gains an explicit closing edge on the first
        // reversal and is stable from then on.
        prop_assert_eq!(reversed.reverse_path().reverse_path(), reversed);
    }
}
