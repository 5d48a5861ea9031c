//! Drawing commands.

use polynet_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One path-data drawing operation. Coordinates are always absolute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Command {
    #[serde(rename = "M")]
    Move { to: Point },
    #[serde(rename = "L")]
    Line { to: Point },
    #[serde(rename = "C")]
    CubicBezier { ctrl1: Point, ctrl2: Point, to: Point },
    #[serde(rename = "S")]
    SmoothCubicBezier { ctrl2: Point, to: Point },
    #[serde(rename = "Q")]
    QuadraticBezier { ctrl1: Point, to: Point },
    #[serde(rename = "T")]
    SmoothQuadraticBezier { to: Point },
    /// Kept verbatim only in raw command lists;
    /// [`crate::PathData::elliptical_arc`] stores cubics instead.
    #[serde(rename = "A")]
    EllipticalArc {
        rx: f64,
        ry: f64,
        /// Degrees.
        x_axis_rotation: f64,
        large_arc_flag: bool,
        sweep_flag: bool,
        to: Point,
    },
    #[serde(rename = "Z")]
    Close,
}

impl Command {
    /// Path-data letter for this command.
    pub fn code(&self) -> char {
        match self {
            Command::Move { .. } => 'M',
            Command::Line { .. } => 'L',
            Command::CubicBezier { .. } => 'C',
            Command::SmoothCubicBezier { .. } => 'S',
            Command::QuadraticBezier { .. } => 'Q',
            Command::SmoothQuadraticBezier { .. } => 'T',
            Command::EllipticalArc { .. } => 'A',
            Command::Close => 'Z',
        }
    }

    /// Terminal point; `Close` has none.
    pub fn to(&self) -> Option<Point> {
        match *self {
            Command::Move { to }
            | Command::Line { to }
            | Command::CubicBezier { to, .. }
            | Command::SmoothCubicBezier { to, .. }
            | Command::QuadraticBezier { to, .. }
            | Command::SmoothQuadraticBezier { to }
            | Command::EllipticalArc { to, .. } => Some(to),
            Command::Close => None,
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(
            self,
            Command::CubicBezier { .. } | Command::SmoothCubicBezier { .. }
        )
    }

    pub fn is_quadratic(&self) -> bool {
        matches!(
            self,
            Command::QuadraticBezier { .. } | Command::SmoothQuadraticBezier { .. }
        )
    }

    /// Apply `f` to every point of the command. Arc radii are left alone.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Command {
        match *self {
            Command::Move { to } => Command::Move { to: f(to) },
            Command::Line { to } => Command::Line { to: f(to) },
            Command::CubicBezier { ctrl1, ctrl2, to } => Command::CubicBezier {
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
            Command::SmoothCubicBezier { ctrl2, to } => Command::SmoothCubicBezier {
                ctrl2: f(ctrl2),
                to: f(to),
            },
            Command::QuadraticBezier { ctrl1, to } => Command::QuadraticBezier {
                ctrl1: f(ctrl1),
                to: f(to),
            },
            Command::SmoothQuadraticBezier { to } => {
                Command::SmoothQuadraticBezier { to: f(to) }
            }
            Command::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc_flag,
                sweep_flag,
                to,
            } => Command::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc_flag,
                sweep_flag,
                to: f(to),
            },
            Command::Close => Command::Close,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { to } => write!(f, "M {}", to),
            Command::Line { to } => write!(f, "L {}", to),
            Command::CubicBezier { ctrl1, ctrl2, to } => {
                write!(f, "C {} {} {}", ctrl1, ctrl2, to)
            }
            Command::SmoothCubicBezier { ctrl2, to } => write!(f, "S {} {}", ctrl2, to),
            Command::QuadraticBezier { ctrl1, to } => write!(f, "Q {} {}", ctrl1, to),
            Command::SmoothQuadraticBezier { to } => write!(f, "T {}", to),
            Command::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc_flag,
                sweep_flag,
                to,
            } => write!(
                f,
                "A {} {} {} {} {} {}",
                rx,
                ry,
                x_axis_rotation,
                u8::from(*large_arc_flag),
                u8::from(*sweep_flag),
                to
            ),
            Command::Close => write!(f, "Z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let c = Command::CubicBezier {
            ctrl1: Point::new(1.0, 2.0),
            ctrl2: Point::new(3.0, 4.0),
            to: Point::new(5.0, 6.0),
        };
        assert_eq!(c.to_string(), "C 1,2 3,4 5,6");
        assert_eq!(Command::Close.to_string(), "Z");

        let arc = Command::EllipticalArc {
            rx: 5.0,
            ry: 3.0,
            x_axis_rotation: 0.0,
            large_arc_flag: true,
            sweep_flag: false,
            to: Point::new(10.0, 0.0),
        };
        assert_eq!(arc.to_string(), "A 5 3 0 1 0 10,0");
    }

    #[test]
    fn test_close_has_no_destination() {
        assert_eq!(Command::Close.to(), None);
        assert_eq!(
            Command::SmoothQuadraticBezier {
                to: Point::new(1.0, 1.0)
            }
            .to(),
            Some(Point::new(1.0, 1.0))
        );
    }

    #[test]
    fn test_map_points_translates_controls() {
        let q = Command::QuadraticBezier {
            ctrl1: Point::new(1.0, 1.0),
            to: Point::new(2.0, 0.0),
        };
        let moved = q.map_points(|p| p + Point::new(10.0, 0.0));
        assert_eq!(
            moved,
            Command::QuadraticBezier {
                ctrl1: Point::new(11.0, 1.0),
                to: Point::new(12.0, 0.0),
            }
        );
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Command::Line {
            to: Point::new(1.0, 2.0),
        })
        .unwrap();
        assert_eq!(json, r#"{"code":"L","to":{"x":1.0,"y":2.0}}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code(), 'L');
    }
}
