// ============================================================================
// CANVAS OPS — textual gesture descriptions for headless runs
// ============================================================================
//
// Grammar (one op per `--op` argument):
//   fill:X,Y:#rrggbb
//   line:X0,Y0:X1,Y1:#rrggbb[:WIDTH]
//   brush:X,Y/X,Y/...:#rrggbb[:WIDTH]
//   erase:X,Y/X,Y/...[:WIDTH]
//   clear

use std::fmt;
use std::str::FromStr;

use crate::canvas::{Color, parse_hex_color};

/// Pixel coordinate as written on the command line.
pub type PixelPoint = (u32, u32);

#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Fill {
        at: PixelPoint,
        color: Color,
    },
    Line {
        from: PixelPoint,
        to: PixelPoint,
        color: Color,
        width: Option<u32>,
    },
    Brush {
        path: Vec<PixelPoint>,
        color: Color,
        width: Option<u32>,
    },
    Erase {
        path: Vec<PixelPoint>,
        width: Option<u32>,
    },
    Clear,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpParseError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for OpParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid op '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for OpParseError {}

impl FromStr for CanvasOp {
    type Err = OpParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| OpParseError {
            input: s.to_string(),
            reason,
        };
        let parts: Vec<&str> = s.trim().split(':').collect();
        let name = parts[0].to_ascii_lowercase();

        match (name.as_str(), parts.len()) {
            ("clear", 1) => Ok(CanvasOp::Clear),
            ("fill", 3) => Ok(CanvasOp::Fill {
                at: parse_point(parts[1]).map_err(fail)?,
                color: parse_color(parts[2]).map_err(fail)?,
            }),
            ("line", 4 | 5) => Ok(CanvasOp::Line {
                from: parse_point(parts[1]).map_err(fail)?,
                to: parse_point(parts[2]).map_err(fail)?,
                color: parse_color(parts[3]).map_err(fail)?,
                width: parse_width(parts.get(4).copied()).map_err(fail)?,
            }),
            ("brush", 3 | 4) => Ok(CanvasOp::Brush {
                path: parse_path(parts[1]).map_err(fail)?,
                color: parse_color(parts[2]).map_err(fail)?,
                width: parse_width(parts.get(3).copied()).map_err(fail)?,
            }),
            ("erase", 2 | 3) => Ok(CanvasOp::Erase {
                path: parse_path(parts[1]).map_err(fail)?,
                width: parse_width(parts.get(2).copied()).map_err(fail)?,
            }),
            ("clear" | "fill" | "line" | "brush" | "erase", n) => {
                Err(fail(format!("wrong number of fields ({})", n)))
            }
            _ => Err(fail(format!("unknown op '{}'", parts[0]))),
        }
    }
}

fn parse_point(s: &str) -> Result<PixelPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse::<u32>().map_err(|_| format!("bad x coordinate '{}'", x))?;
    let y = y.trim().parse::<u32>().map_err(|_| format!("bad y coordinate '{}'", y))?;
    Ok((x, y))
}

fn parse_path(s: &str) -> Result<Vec<PixelPoint>, String> {
    s.split('/')
        .filter(|p| !p.trim().is_empty())
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()
        .and_then(|path| {
            if path.is_empty() {
                Err("path needs at least one point".to_string())
            } else {
                Ok(path)
            }
        })
}

fn parse_color(s: &str) -> Result<Color, String> {
    parse_hex_color(s).ok_or_else(|| format!("bad color '{}' (expected #rrggbb)", s))
}

fn parse_width(s: Option<&str>) -> Result<Option<u32>, String> {
    match s {
        None => Ok(None),
        Some(w) => match w.trim().parse::<u32>() {
            Ok(0) | Err(_) => Err(format!("bad width '{}'", w)),
            Ok(v) => Ok(Some(v)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn parses_each_op() {
        assert_eq!(
            "fill:3,4:#ff0000".parse::<CanvasOp>().unwrap(),
            CanvasOp::Fill {
                at: (3, 4),
                color: Rgb([255, 0, 0])
            }
        );
        assert_eq!(
            "line:0,0:9,9:#00ff00:3".parse::<CanvasOp>().unwrap(),
            CanvasOp::Line {
                from: (0, 0),
                to: (9, 9),
                color: Rgb([0, 255, 0]),
                width: Some(3)
            }
        );
        assert_eq!(
            "brush:1,1/2,2/3,1:#000000".parse::<CanvasOp>().unwrap(),
            CanvasOp::Brush {
                path: vec![(1, 1), (2, 2), (3, 1)],
                color: Rgb([0, 0, 0]),
                width: None
            }
        );
        assert_eq!(
            "erase:5,5:10".parse::<CanvasOp>().unwrap(),
            CanvasOp::Erase {
                path: vec![(5, 5)],
                width: Some(10)
            }
        );
        assert_eq!("CLEAR".parse::<CanvasOp>().unwrap(), CanvasOp::Clear);
    }

    #[test]
    fn rejects_malformed_ops() {
        for bad in [
            "",
            "spray:1,1:#000000",
            "fill:1,1",
            "fill:1;1:#000000",
            "fill:-1,1:#000000",
            "fill:1,1:red",
            "line:0,0:1,1:#000000:0",
            "brush::#000000",
            "clear:now",
        ] {
            assert!(bad.parse::<CanvasOp>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn error_names_the_input() {
        let err = "fill:1,1:nope".parse::<CanvasOp>().unwrap_err();
        assert_eq!(err.input, "fill:1,1:nope");
        assert!(err.to_string().contains("bad color"));
    }
}
