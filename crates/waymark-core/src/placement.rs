#![forbid(unsafe_code)]

//! Placement tokens: which side of the reference the floating element sits on.
//!
//! A [`Placement`] is a primary [`Side`] plus an optional [`Alignment`], written
//! the way authors write them in step definitions: `"top"`, `"bottom-start"`,
//! `"left-end"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

/// Primary side of the reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// The side facing this one (top/bottom, left/right).
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Axis the floating element is pushed along to sit on this side.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    /// Whether the side is at the origin end of its axis.
    pub const fn is_origin(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// CSS property name for this side.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// All sides in CSS order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment along the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Start,
    End,
}

impl Alignment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Where to place the floating element relative to its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Placement {
    side: Side,
    alignment: Option<Alignment>,
}

impl Placement {
    pub const TOP: Placement = Placement::new(Side::Top);
    pub const RIGHT: Placement = Placement::new(Side::Right);
    pub const BOTTOM: Placement = Placement::new(Side::Bottom);
    pub const LEFT: Placement = Placement::new(Side::Left);

    /// Centered on `side`.
    pub const fn new(side: Side) -> Self {
        Self {
            side,
            alignment: None,
        }
    }

    /// Aligned to the start or end of `side`.
    pub const fn aligned(side: Side, alignment: Alignment) -> Self {
        Self {
            side,
            alignment: Some(alignment),
        }
    }

    #[inline]
    pub const fn side(self) -> Side {
        self.side
    }

    #[inline]
    pub const fn alignment(self) -> Option<Alignment> {
        self.alignment
    }

    /// Axis the side pushes along.
    #[inline]
    pub const fn side_axis(self) -> Axis {
        self.side.axis()
    }

    /// Axis the alignment slides along (perpendicular to the side axis).
    #[inline]
    pub const fn alignment_axis(self) -> Axis {
        self.side.axis().opposite()
    }

    /// Same alignment, opposite side.
    pub const fn flipped(self) -> Self {
        Self {
            side: self.side.opposite(),
            alignment: self.alignment,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Some(alignment) => write!(f, "{}-{}", self.side, alignment.as_str()),
            None => write!(f, "{}", self.side),
        }
    }
}

/// Error returned when a placement token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementParseError {
    token: String,
}

impl PlacementParseError {
    /// The rejected token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for PlacementParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid placement `{}`", self.token)
    }
}

impl std::error::Error for PlacementParseError {}

impl FromStr for Placement {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PlacementParseError {
            token: s.to_owned(),
        };
        let trimmed = s.trim();
        let (side, alignment) = match trimmed.split_once('-') {
            Some((side, alignment)) => (side, Some(alignment)),
            None => (trimmed, None),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return Err(err()),
        };
        let alignment = match alignment {
            None => None,
            Some("start") => Some(Alignment::Start),
            Some("end") => Some(Alignment::End),
            Some(_) => return Err(err()),
        };
        Ok(Self { side, alignment })
    }
}

impl TryFrom<String> for Placement {
    type Error = PlacementParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Placement> for String {
    fn from(value: Placement) -> Self {
        value.to_string()
    }
}

impl From<Side> for Placement {
    fn from(side: Side) -> Self {
        Self::new(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_sides() {
        assert_eq!("top".parse::<Placement>().unwrap(), Placement::TOP);
        assert_eq!("left".parse::<Placement>().unwrap(), Placement::LEFT);
    }

    #[test]
    fn parse_aligned() {
        let p: Placement = "bottom-end".parse().unwrap();
        assert_eq!(p.side(), Side::Bottom);
        assert_eq!(p.alignment(), Some(Alignment::End));
        assert_eq!(p.to_string(), "bottom-end");
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("auto".parse::<Placement>().is_err());
        assert!("top-middle".parse::<Placement>().is_err());
        assert!("".parse::<Placement>().is_err());
    }

    #[test]
    fn axes() {
        assert_eq!(Placement::TOP.side_axis(), Axis::Y);
        assert_eq!(Placement::TOP.alignment_axis(), Axis::X);
        assert_eq!(Placement::RIGHT.side_axis(), Axis::X);
    }

    #[test]
    fn flipped_keeps_alignment() {
        let p = Placement::aligned(Side::Top, Alignment::Start);
        assert_eq!(p.flipped(), Placement::aligned(Side::Bottom, Alignment::Start));
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Placement::aligned(Side::Left, Alignment::Start)).unwrap();
        assert_eq!(json, "\"left-start\"");
        let back: Placement = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(back, Placement::RIGHT);
        assert!(serde_json::from_str::<Placement>("\"sideways\"").is_err());
    }
}
