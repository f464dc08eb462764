//! Serialized structure formats.
//!
//! Two encodings are accepted:
//!
//! - JSON documents: `{"world_dim": 20, "bricks": [{"h": 1, "w": 2, "x": 0, "y": 0, "z": 0}]}`
//! - The line-oriented text form emitted by the generation model, one brick
//!   per line: `1x2 (0,0,0)`.

use crate::brick::{Brick, Structure};
use crate::error::{Error, Result};

impl Structure {
    /// Parses the line-oriented text form.
    ///
    /// Blank lines are skipped. Every other line must read `{h}x{w} ({x},{y},{z})`.
    pub fn from_txt(text: &str, world_dim: i32) -> Result<Structure> {
        let mut bricks = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let brick = parse_brick_line(line).ok_or_else(|| {
                Error::Parse(format!("line {}: malformed brick '{}'", line_no + 1, line))
            })?;
            bricks.push(brick);
        }
        Structure::new(bricks, world_dim)
    }

    /// Renders the line-oriented text form.
    pub fn to_txt(&self) -> String {
        let mut out = String::new();
        for b in self.bricks() {
            out.push_str(&format!("{}x{} ({},{},{})\n", b.h, b.w, b.x, b.y, b.z));
        }
        out
    }

    /// Parses a JSON document.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Structure> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a structure from an already-parsed JSON value.
    #[cfg(feature = "serde")]
    pub fn from_json_value(value: serde_json::Value) -> Result<Structure> {
        if !value.is_object() {
            return Err(Error::Parse("structure document must be a JSON object".into()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Renders a JSON document.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn parse_brick_line(line: &str) -> Option<Brick> {
    let (dims, coords) = line.split_once(' ')?;
    let (h, w) = dims.split_once('x')?;
    let coords = coords.trim().strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = coords.split(',').map(|p| p.trim().parse::<i32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Brick::new(h.parse().ok()?, w.parse().ok()?, x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::DEFAULT_WORLD_DIM;

    #[test]
    fn test_from_txt() {
        let s = Structure::from_txt("2x4 (0,0,0)\n\n1x2 (1, 2, 1)\n", DEFAULT_WORLD_DIM).unwrap();
        assert_eq!(s.bricks(), &[Brick::new(2, 4, 0, 0, 0), Brick::new(1, 2, 1, 2, 1)]);
        assert_eq!(s.to_txt(), "2x4 (0,0,0)\n1x2 (1,2,1)\n");
    }

    #[test]
    fn test_from_txt_rejects_garbage() {
        for bad in ["2x4", "2x4 (0,0)", "2y4 (0,0,0)", "2x4 (0,0,0,0)", "ax4 (0,0,0)"] {
            assert!(
                matches!(Structure::from_txt(bad, 20), Err(Error::Parse(_))),
                "accepted {:?}",
                bad
            );
        }
        assert!(matches!(
            Structure::from_txt("2x4 (19,0,0)", 20),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_document() {
        let s = Structure::from_json(
            r#"{"world_dim": 8, "bricks": [{"h":1,"w":1,"x":0,"y":0,"z":0},{"h":2,"w":1,"x":0,"y":0,"z":1}]}"#,
        )
        .unwrap();
        assert_eq!(s.world_dim(), 8);
        assert_eq!(s.len(), 2);

        let back = Structure::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);

        assert!(matches!(Structure::from_json("not json"), Err(Error::Parse(_))));
        assert!(Structure::from_json_value(serde_json::json!([1, 2, 3])).is_err());
    }
}
