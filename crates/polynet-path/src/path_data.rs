//! Immutable path builder.
//!
//! Every builder call consumes the path and returns a new one, so a
//! `PathData` value never changes once another part of the program holds it.
//! Commands are validated as they are appended: a path must start with a
//! move, and smooth beziers may only follow a bezier of the same order.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Event, Path};
use polynet_core::{AffineMatrix, BoundingBox, Point, TransformObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::arc::{arc_to_cubics, ArcParams};
use crate::command::Command;
use crate::error::{PathError, PathResult};

/// Flattening tolerance used for lyon-based measurements.
const FLATTEN_TOLERANCE: f32 = 0.01;

/// Ordered sequence of drawing commands forming one or more sub-paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    commands: Vec<Command>,
}

/// Running pen state while walking a command list.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    current: Point,
    subpath_start: Point,
    cubic_ctrl: Option<Point>,
    quad_ctrl: Option<Point>,
}

impl Cursor {
    /// Advance past `command` and return it with smooth controls made explicit.
    fn step(&mut self, command: &Command) -> Command {
        let explicit = match *command {
            Command::SmoothCubicBezier { ctrl2, to } => Command::CubicBezier {
                ctrl1: self
                    .cubic_ctrl
                    .map_or(self.current, |c| c.reflect_about(&self.current)),
                ctrl2,
                to,
            },
            Command::SmoothQuadraticBezier { to } => Command::QuadraticBezier {
                ctrl1: self
                    .quad_ctrl
                    .map_or(self.current, |c| c.reflect_about(&self.current)),
                to,
            },
            other => other,
        };

        self.cubic_ctrl = None;
        self.quad_ctrl = None;
        match explicit {
            Command::Move { to } => {
                self.current = to;
                self.subpath_start = to;
            }
            Command::CubicBezier { ctrl2, to, .. } => {
                self.cubic_ctrl = Some(ctrl2);
                self.current = to;
            }
            Command::QuadraticBezier { ctrl1, to } => {
                self.quad_ctrl = Some(ctrl1);
                self.current = to;
            }
            Command::Close => self.current = self.subpath_start,
            other => {
                if let Some(to) = other.to() {
                    self.current = to;
                }
            }
        }
        explicit
    }
}

/// A drawable piece between two points, used for reversal.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Line { from: Point, to: Point },
    Cubic { from: Point, ctrl1: Point, ctrl2: Point, to: Point },
    Quadratic { from: Point, ctrl: Point, to: Point },
}

impl Segment {
    fn reversed_command(&self) -> Command {
        match *self {
            Segment::Line { from, .. } => Command::Line { to: from },
            Segment::Cubic {
                from, ctrl1, ctrl2, ..
            } => Command::CubicBezier {
                ctrl1: ctrl2,
                ctrl2: ctrl1,
                to: from,
            },
            Segment::Quadratic { from, ctrl, .. } => Command::QuadraticBezier { ctrl1: ctrl, to: from },
        }
    }
}

#[derive(Debug, Clone)]
struct SubPath {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
}

impl SubPath {
    fn end(&self) -> Point {
        match self.segments.last() {
            Some(Segment::Line { to, .. })
            | Some(Segment::Cubic { to, .. })
            | Some(Segment::Quadratic { to, .. }) => *to,
            None => self.start,
        }
    }
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from a raw command list, validating each command.
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> PathResult<Self> {
        Self::new().concat_commands(commands)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn check(&self, command: &Command) -> PathResult<()> {
        let Some(previous) = self.commands.last() else {
            return match command {
                Command::Move { .. } => Ok(()),
                other => Err(PathError::EmptyPath {
                    command: other.code(),
                }),
            };
        };

        let compatible = match command {
            Command::SmoothCubicBezier { .. } => previous.is_cubic(),
            Command::SmoothQuadraticBezier { .. } => previous.is_quadratic(),
            _ => true,
        };
        if compatible {
            Ok(())
        } else {
            Err(PathError::IncompatibleSmoothBezier {
                command: command.code(),
                previous: previous.code(),
            })
        }
    }

    /// Append one command after validating it against the current state.
    pub fn push(mut self, command: Command) -> PathResult<Self> {
        self.check(&command)?;
        self.commands.push(command);
        Ok(self)
    }

    pub fn move_to(mut self, to: Point) -> Self {
        self.commands.push(Command::Move { to });
        self
    }

    pub fn line_to(self, to: Point) -> PathResult<Self> {
        self.push(Command::Line { to })
    }

    pub fn close(self) -> PathResult<Self> {
        self.push(Command::Close)
    }

    pub fn cubic_bezier(self, ctrl1: Point, ctrl2: Point, to: Point) -> PathResult<Self> {
        self.push(Command::CubicBezier { ctrl1, ctrl2, to })
    }

    pub fn smooth_cubic_bezier(self, ctrl2: Point, to: Point) -> PathResult<Self> {
        self.push(Command::SmoothCubicBezier { ctrl2, to })
    }

    pub fn quadratic_bezier(self, ctrl1: Point, to: Point) -> PathResult<Self> {
        self.push(Command::QuadraticBezier { ctrl1, to })
    }

    pub fn smooth_quadratic_bezier(self, to: Point) -> PathResult<Self> {
        self.push(Command::SmoothQuadraticBezier { to })
    }

    /// Append an elliptical arc, stored as the equivalent cubic beziers.
    pub fn elliptical_arc(
        self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        to: Point,
    ) -> PathResult<Self> {
        let from = self
            .get_last_position()
            .ok_or(PathError::EmptyPath { command: 'A' })?;
        let arc = ArcParams {
            rx,
            ry,
            x_axis_rotation,
            large_arc_flag,
            sweep_flag,
        };
        arc_to_cubics(from, to, arc)
            .into_iter()
            .try_fold(self, |path, [ctrl1, ctrl2, end]| {
                path.cubic_bezier(ctrl1, ctrl2, end)
            })
    }

    pub fn concat_commands(
        self,
        commands: impl IntoIterator<Item = Command>,
    ) -> PathResult<Self> {
        commands.into_iter().try_fold(self, PathData::push)
    }

    pub fn concat_path(self, other: &PathData) -> PathResult<Self> {
        self.concat_commands(other.commands.iter().copied())
    }

    /// Pen position after the last command. A trailing close returns to the
    /// start of its sub-path.
    pub fn get_last_position(&self) -> Option<Point> {
        match self.commands.last()? {
            Command::Close => self.get_current_segment_start(),
            command => command.to(),
        }
    }

    /// Point of the most recent move.
    pub fn get_current_segment_start(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|command| match command {
            Command::Move { to } => Some(*to),
            _ => None,
        })
    }

    /// Terminal point of every command except close.
    pub fn get_destination_points(&self) -> Vec<Point> {
        self.commands.iter().filter_map(Command::to).collect()
    }

    /// Path-data string, e.g. `M 0,0 L 10,0 C 1,2 3,4 5,6 Z`.
    pub fn get_d(&self) -> String {
        self.commands
            .iter()
            .map(Command::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Same geometry with every smooth bezier written out with explicit controls.
    pub fn expand_smooth_commands(&self) -> PathData {
        let mut cursor = Cursor::default();
        PathData {
            commands: self.commands.iter().map(|c| cursor.step(c)).collect(),
        }
    }

    /// Explicit commands paired with their start point, arcs lowered to cubics.
    fn lowered(&self) -> Vec<(Point, Command)> {
        let mut cursor = Cursor::default();
        let mut out = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            let from = cursor.current;
            match cursor.step(command) {
                Command::EllipticalArc {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc_flag,
                    sweep_flag,
                    to,
                } => {
                    let arc = ArcParams {
                        rx,
                        ry,
                        x_axis_rotation,
                        large_arc_flag,
                        sweep_flag,
                    };
                    let mut start = from;
                    for [ctrl1, ctrl2, end] in arc_to_cubics(from, to, arc) {
                        out.push((start, Command::CubicBezier { ctrl1, ctrl2, to: end }));
                        start = end;
                    }
                }
                explicit => out.push((from, explicit)),
            }
        }
        out
    }

    fn subpaths(&self) -> Vec<SubPath> {
        let mut subpaths: Vec<SubPath> = Vec::new();
        let mut last_start = Point::ORIGIN;

        for (from, command) in self.lowered() {
            if let Command::Move { to } = command {
                last_start = to;
                subpaths.push(SubPath {
                    start: to,
                    segments: Vec::new(),
                    closed: false,
                });
                continue;
            }

            // Drawing after a close continues from the closed sub-path's start.
            if subpaths.last().map_or(true, |s| s.closed) {
                subpaths.push(SubPath {
                    start: last_start,
                    segments: Vec::new(),
                    closed: false,
                });
            }
            let Some(current) = subpaths.last_mut() else {
                continue;
            };

            match command {
                Command::Line { to } => current.segments.push(Segment::Line { from, to }),
                Command::CubicBezier { ctrl1, ctrl2, to } => current.segments.push(Segment::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                }),
                Command::QuadraticBezier { ctrl1, to } => current.segments.push(Segment::Quadratic {
                    from,
                    ctrl: ctrl1,
                    to,
                }),
                Command::Close => current.closed = true,
                _ => {}
            }
        }
        subpaths
    }

    /// The same geometry traced backwards: sub-paths in reverse order, each
    /// with reversed segments and swapped bezier controls. A closed sub-path
    /// keeps its start point and runs the closing edge first.
    pub fn reverse_path(&self) -> PathData {
        let mut commands = Vec::with_capacity(self.commands.len() + 2);
        for subpath in self.subpaths().iter().rev() {
            let end = subpath.end();
            if subpath.closed {
                commands.push(Command::Move { to: subpath.start });
                if end != subpath.start {
                    commands.push(Command::Line { to: end });
                }
            } else {
                commands.push(Command::Move { to: end });
            }
            commands.extend(subpath.segments.iter().rev().map(Segment::reversed_command));
            if subpath.closed {
                commands.push(Command::Close);
            }
        }
        PathData { commands }
    }

    /// Apply `matrix` to every point. Arcs are converted to cubics first since
    /// a skewed or non-uniformly scaled arc is no longer expressible by its radii.
    pub fn transform_by_matrix(&self, matrix: &AffineMatrix) -> PathData {
        let mut cursor = Cursor::default();
        let mut commands = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            let from = cursor.current;
            cursor.step(command);
            match *command {
                Command::EllipticalArc {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc_flag,
                    sweep_flag,
                    to,
                } => {
                    let arc = ArcParams {
                        rx,
                        ry,
                        x_axis_rotation,
                        large_arc_flag,
                        sweep_flag,
                    };
                    commands.extend(arc_to_cubics(from, to, arc).into_iter().map(
                        |[ctrl1, ctrl2, end]| Command::CubicBezier {
                            ctrl1: matrix.apply(ctrl1),
                            ctrl2: matrix.apply(ctrl2),
                            to: matrix.apply(end),
                        },
                    ));
                }
                _ => commands.push(command.map_points(|p| matrix.apply(p))),
            }
        }
        PathData { commands }
    }

    pub fn transform_by_object(&self, transform: &TransformObject) -> PathData {
        self.transform_by_matrix(&transform.to_matrix())
    }

    pub fn translate(&self, delta: Point) -> PathData {
        self.transform_by_matrix(&AffineMatrix::translation(delta.x, delta.y))
    }

    /// Convert to a lyon path (single precision) for flattening and measurement.
    pub fn to_lyon_path(&self) -> Path {
        let mut builder = Path::builder();
        let mut open = false;
        let to_lyon = |p: Point| point(p.x as f32, p.y as f32);

        for (from, command) in self.lowered() {
            if let Command::Move { to } = command {
                if open {
                    builder.end(false);
                }
                builder.begin(to_lyon(to));
                open = true;
                continue;
            }
            if matches!(command, Command::Close) {
                if open {
                    builder.end(true);
                    open = false;
                }
                continue;
            }
            if !open {
                builder.begin(to_lyon(from));
                open = true;
            }
            match command {
                Command::Line { to } => {
                    builder.line_to(to_lyon(to));
                }
                Command::CubicBezier { ctrl1, ctrl2, to } => {
                    builder.cubic_bezier_to(to_lyon(ctrl1), to_lyon(ctrl2), to_lyon(to));
                }
                Command::QuadraticBezier { ctrl1, to } => {
                    builder.quadratic_bezier_to(to_lyon(ctrl1), to_lyon(to));
                }
                _ => {}
            }
        }
        if open {
            builder.end(false);
        }
        builder.build()
    }

    /// Bounds of the flattened geometry, or `None` for an empty path.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = Vec::new();
        for event in self.to_lyon_path().iter().flattened(FLATTEN_TOLERANCE) {
            match event {
                Event::Begin { at } => points.push(Point::new(at.x as f64, at.y as f64)),
                Event::Line { to, .. } => points.push(Point::new(to.x as f64, to.y as f64)),
                _ => {}
            }
        }
        BoundingBox::from_points(&points)
    }

    /// Total drawn length of the flattened geometry, including closing edges.
    pub fn approximate_length(&self) -> f64 {
        self.to_lyon_path()
            .iter()
            .flattened(FLATTEN_TOLERANCE)
            .map(|event| match event {
                Event::Line { from, to } => (to - from).length() as f64,
                Event::End {
                    last,
                    first,
                    close: true,
                } => (first - last).length() as f64,
                _ => 0.0,
            })
            .sum()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_d())
    }
}

impl FromStr for PathData {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_path(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn triangle() -> PathData {
        PathData::new()
            .move_to(p(0.0, 0.0))
            .line_to(p(10.0, 0.0))
            .and_then(|path| path.line_to(p(10.0, 10.0)))
            .and_then(PathData::close)
            .unwrap()
    }

    #[test]
    fn test_builder_accumulates_in_order() {
        let path = triangle();
        let codes: Vec<char> = path.commands().iter().map(Command::code).collect();
        assert_eq!(codes, vec!['M', 'L', 'L', 'Z']);
        assert_eq!(path.get_d(), "M 0,0 L 10,0 L 10,10 Z");
    }

    #[test]
    fn test_builder_returns_new_values() {
        let base = PathData::new().move_to(p(0.0, 0.0));
        let extended = base.clone().line_to(p(1.0, 1.0)).unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_close_on_empty_path_fails() {
        assert_eq!(
            PathData::new().close(),
            Err(PathError::EmptyPath { command: 'Z' })
        );
        assert_eq!(
            PathData::new().line_to(p(1.0, 1.0)),
            Err(PathError::EmptyPath { command: 'L' })
        );
    }

    #[test]
    fn test_smooth_bezier_requires_matching_predecessor() {
        let start = PathData::new().move_to(p(0.0, 0.0));
        assert_eq!(
            start.clone().smooth_cubic_bezier(p(1.0, 1.0), p(2.0, 0.0)),
            Err(PathError::IncompatibleSmoothBezier {
                command: 'S',
                previous: 'M',
            })
        );

        let quad = start.quadratic_bezier(p(1.0, 1.0), p(2.0, 0.0)).unwrap();
        assert!(quad.clone().smooth_quadratic_bezier(p(4.0, 0.0)).is_ok());
        assert_eq!(
            quad.smooth_cubic_bezier(p(3.0, 1.0), p(4.0, 0.0)),
            Err(PathError::IncompatibleSmoothBezier {
                command: 'S',
                previous: 'Q',
            })
        );
    }

    #[test]
    fn test_elliptical_arc_stored_as_cubics() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .elliptical_arc(5.0, 5.0, 0.0, false, true, p(10.0, 0.0))
            .unwrap();
        assert!(path.commands()[1..].iter().all(|c| c.code() == 'C'));
        assert_eq!(path.get_last_position(), Some(p(10.0, 0.0)));

        assert_eq!(
            PathData::new().elliptical_arc(5.0, 5.0, 0.0, false, true, p(10.0, 0.0)),
            Err(PathError::EmptyPath { command: 'A' })
        );
    }

    #[test]
    fn test_concat_validates_each_command() {
        let tail = vec![
            Command::Line { to: p(1.0, 0.0) },
            Command::SmoothQuadraticBezier { to: p(2.0, 0.0) },
        ];
        let result = PathData::new().move_to(p(0.0, 0.0)).concat_commands(tail);
        assert_eq!(
            result,
            Err(PathError::IncompatibleSmoothBezier {
                command: 'T',
                previous: 'L',
            })
        );

        let joined = triangle().concat_path(&triangle()).unwrap();
        assert_eq!(joined.len(), 8);
    }

    #[test]
    fn test_positions_after_close() {
        let path = triangle().line_to(p(0.0, 5.0)).unwrap();
        assert_eq!(path.get_current_segment_start(), Some(p(0.0, 0.0)));
        assert_eq!(triangle().get_last_position(), Some(p(0.0, 0.0)));
        assert_eq!(path.get_last_position(), Some(p(0.0, 5.0)));
        assert_eq!(PathData::new().get_last_position(), None);
    }

    #[test]
    fn test_destination_points_skip_close() {
        assert_eq!(
            triangle().get_destination_points(),
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]
        );
    }

    #[test]
    fn test_reverse_open_polyline() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .line_to(p(10.0, 0.0))
            .and_then(|path| path.line_to(p(10.0, 10.0)))
            .unwrap();
        assert_eq!(path.reverse_path().get_d(), "M 10,10 L 10,0 L 0,0");
    }

    #[test]
    fn test_reverse_swaps_bezier_controls() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .cubic_bezier(p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0))
            .unwrap();
        assert_eq!(path.reverse_path().get_d(), "M 3,3 C 2,2 1,1 0,0");
        assert_eq!(path.reverse_path().reverse_path(), path);
    }

    #[test]
    fn test_reverse_expands_smooth_commands() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .cubic_bezier(p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0))
            .and_then(|path| path.smooth_cubic_bezier(p(2.0, -1.0), p(2.0, 0.0)))
            .unwrap();
        assert_eq!(
            path.reverse_path().get_d(),
            "M 2,0 C 2,-1 1,-1 1,0 C 1,1 0,1 0,0"
        );
    }

    #[test]
    fn test_reverse_closed_keeps_start() {
        assert_eq!(
            triangle().reverse_path().get_d(),
            "M 0,0 L 10,10 L 10,0 L 0,0 Z"
        );
    }

    #[test]
    fn test_reverse_orders_subpaths_backwards() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .line_to(p(1.0, 0.0))
            .unwrap()
            .move_to(p(5.0, 5.0))
            .line_to(p(6.0, 5.0))
            .unwrap();
        assert_eq!(path.reverse_path().get_d(), "M 6,5 L 5,5 M 1,0 L 0,0");
    }

    #[test]
    fn test_transform_by_matrix_moves_controls() {
        let path = PathData::new()
            .move_to(p(0.0, 0.0))
            .quadratic_bezier(p(1.0, 1.0), p(2.0, 0.0))
            .unwrap();
        let moved = path.transform_by_matrix(&AffineMatrix::translation(10.0, 5.0));
        assert_eq!(moved.get_d(), "M 10,5 Q 11,6 12,5");
    }

    #[test]
    fn test_transform_lowers_raw_arcs() {
        let path = PathData::from_commands(vec![
            Command::Move { to: p(0.0, 0.0) },
            Command::EllipticalArc {
                rx: 5.0,
                ry: 5.0,
                x_axis_rotation: 0.0,
                large_arc_flag: false,
                sweep_flag: true,
                to: p(10.0, 0.0),
            },
        ])
        .unwrap();
        let scaled = path.transform_by_matrix(&AffineMatrix::scaling(2.0, 1.0));
        assert!(scaled.commands()[1..].iter().all(|c| c.code() == 'C'));
        assert_eq!(scaled.get_last_position(), Some(p(20.0, 0.0)));
    }

    #[test]
    fn test_transform_by_object_rotates_about_origin() {
        let transform = TransformObject {
            origin: p(5.0, 0.0),
            rotate: 180.0,
            ..Default::default()
        };
        let rotated = PathData::new()
            .move_to(p(0.0, 0.0))
            .line_to(p(10.0, 0.0))
            .unwrap()
            .transform_by_object(&transform);
        let points = rotated.get_destination_points();
        assert!(points[0].approx_eq(&p(10.0, 0.0), 1e-9));
        assert!(points[1].approx_eq(&p(0.0, 0.0), 1e-9));
    }

    #[test]
    fn test_bounding_box_and_length() {
        let bounds = triangle().bounding_box().unwrap();
        assert!((bounds.width() - 10.0).abs() < 1e-4);
        assert!((bounds.height() - 10.0).abs() < 1e-4);
        let expected = 20.0 + 200f64.sqrt();
        assert!((triangle().approximate_length() - expected).abs() < 1e-3);
        assert!(PathData::new().bounding_box().is_none());
    }
}
