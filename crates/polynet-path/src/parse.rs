//! Path-data string parsing.
//!
//! Relative commands are made absolute, `H`/`V` become lines and arcs become
//! cubics, so the result only holds the command set `PathData` builds with.
//! A smooth bezier with no matching predecessor is stored as its explicit
//! form, using the current point as the reflected control.

use polynet_core::Point;
use tracing::debug;

use crate::command::Command;
use crate::error::{PathError, PathResult};
use crate::path_data::PathData;

fn is_command_letter(ch: char) -> bool {
    matches!(
        ch.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
    )
}

/// Split path data into command letters and number strings.
///
/// Whitespace and commas separate tokens. A sign starts a new number unless
/// it follows an exponent marker, and a second decimal point starts a new
/// number (`0.5.5` is two numbers).
fn tokenize(data: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in data.chars() {
        match ch {
            c if is_command_letter(c) => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            ' ' | ',' | '\n' | '\r' | '\t' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '-' | '+' => {
                if !current.is_empty() && !matches!(current.chars().last(), Some('e' | 'E')) {
                    tokens.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
            '.' => {
                if current.contains('.') && !current.contains(['e', 'E']) {
                    tokens.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn error(&self, reason: impl Into<String>) -> PathError {
        PathError::Parse {
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn at_number(&self) -> bool {
        self.tokens
            .get(self.pos)
            .and_then(|t| t.chars().next())
            .is_some_and(|c| !is_command_letter(c))
    }

    fn number(&mut self) -> PathResult<f64> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| self.error("expected number, found end of data"))?;
        let value: f64 = token
            .parse()
            .map_err(|_| self.error(format!("expected number, found '{}'", token)))?;
        if !value.is_finite() {
            return Err(self.error(format!("non-finite number '{}'", token)));
        }
        self.pos += 1;
        Ok(value)
    }

    fn flag(&mut self) -> PathResult<bool> {
        let flag = match self.tokens.get(self.pos).map(String::as_str) {
            Some("0") => false,
            Some("1") => true,
            Some(other) => return Err(self.error(format!("expected arc flag, found '{}'", other))),
            None => return Err(self.error("expected arc flag, found end of data")),
        };
        self.pos += 1;
        Ok(flag)
    }

    fn point(&mut self, relative: bool, base: Point) -> PathResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if relative {
            Point::new(base.x + x, base.y + y)
        } else {
            Point::new(x, y)
        })
    }
}

/// Parse path data into a validated [`PathData`].
pub fn parse_path(data: &str) -> PathResult<PathData> {
    let mut parser = Parser {
        tokens: tokenize(data),
        pos: 0,
    };
    let mut path = PathData::new();

    while parser.pos < parser.tokens.len() {
        let letter = parser.tokens[parser.pos]
            .chars()
            .next()
            .filter(|c| is_command_letter(*c))
            .ok_or_else(|| parser.error("expected command"))?;
        parser.pos += 1;

        let relative = letter.is_ascii_lowercase();
        let mut code = letter.to_ascii_uppercase();

        if code == 'Z' {
            path = path.close()?;
            continue;
        }

        // One parameter set per pass; further sets repeat the command.
        loop {
            let current = path.get_last_position().unwrap_or(Point::ORIGIN);
            path = match code {
                'M' => {
                    let to = parser.point(relative, current)?;
                    // Extra pairs after a move are implicit lines.
                    code = 'L';
                    path.move_to(to)
                }
                'L' => path.line_to(parser.point(relative, current)?)?,
                'H' => {
                    let x = parser.number()?;
                    let x = if relative { current.x + x } else { x };
                    path.line_to(Point::new(x, current.y))?
                }
                'V' => {
                    let y = parser.number()?;
                    let y = if relative { current.y + y } else { y };
                    path.line_to(Point::new(current.x, y))?
                }
                'C' => {
                    let ctrl1 = parser.point(relative, current)?;
                    let ctrl2 = parser.point(relative, current)?;
                    let to = parser.point(relative, current)?;
                    path.cubic_bezier(ctrl1, ctrl2, to)?
                }
                'S' => {
                    let ctrl2 = parser.point(relative, current)?;
                    let to = parser.point(relative, current)?;
                    if path.commands().last().is_some_and(Command::is_cubic) {
                        path.smooth_cubic_bezier(ctrl2, to)?
                    } else {
                        path.cubic_bezier(current, ctrl2, to)?
                    }
                }
                'Q' => {
                    let ctrl1 = parser.point(relative, current)?;
                    let to = parser.point(relative, current)?;
                    path.quadratic_bezier(ctrl1, to)?
                }
                'T' => {
                    let to = parser.point(relative, current)?;
                    if path.commands().last().is_some_and(Command::is_quadratic) {
                        path.smooth_quadratic_bezier(to)?
                    } else {
                        path.quadratic_bezier(current, to)?
                    }
                }
                'A' => {
                    let rx = parser.number()?;
                    let ry = parser.number()?;
                    let rotation = parser.number()?;
                    let large_arc = parser.flag()?;
                    let sweep = parser.flag()?;
                    let to = parser.point(relative, current)?;
                    path.elliptical_arc(rx, ry, rotation, large_arc, sweep, to)?
                }
                other => return Err(parser.error(format!("unsupported command '{}'", other))),
            };

            if !parser.at_number() {
                break;
            }
        }
    }

    debug!("Parsed {} path commands", path.len());
    Ok(path)
}
