//! Coordinates, anchors and placements in TikZ diagram space.
//!
//! Blocks are drawn in a right-handed 3-D space where the x-axis runs along
//! the network (left to right), y is the block height and z its depth:
//!
//! ```text
//!        +Y
//!         │
//!         │
//!         └──────► +X
//!        ╱
//!       ╱
//!     +Z
//! ```
//!
//! - [`Point3`] - An absolute coordinate, rendered as `(x,y,z)`
//! - [`Side`] - The named anchor points every block style defines
//! - [`Anchor`] - A side of a named block, rendered as `(name-side)`
//! - [`Placement`] - Where a block's local origin is put

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// A 3-D coordinate in TikZ space.
///
/// Components are written with the shortest representation that round-trips,
/// so `Point3::new(1.0, 0.0, 0.0)` renders as `(1,0,0)`.
///
/// # Examples
///
/// ```
/// # use plotnn_core::geometry::Point3;
/// let p: Point3 = "(1.5, 0, -2)".parse().unwrap();
/// assert_eq!(p.x(), 1.5);
/// assert_eq!(p.to_string(), "(1.5,0,-2)");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Point3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Point3 {
    /// The origin `(0,0,0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the z-coordinate of the point
    pub fn z(self) -> f32 {
        self.z
    }

    /// Checks if all coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

impl FromStr for Point3 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = strip_parens(s.trim())
            .ok_or_else(|| format!("invalid coordinate `{s}`, expected `(x,y,z)`"))?;

        let components = inner
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("invalid coordinate `{s}`: {err}"))?;

        match components.as_slice() {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(format!(
                "invalid coordinate `{s}`, expected three components but found {}",
                components.len()
            )),
        }
    }
}

impl TryFrom<String> for Point3 {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Named anchor points defined by the block styles.
///
/// `Box` and `RightBandedBox` define all of them; `Ball` defines the four
/// compass points and `anchor`. `Top` is the coordinate introduced by a
/// [`Skip`](crate::element::Skip) connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    East,
    West,
    North,
    South,
    NorthEast,
    SouthEast,
    NorthWest,
    SouthWest,
    Anchor,
    Top,
}

impl Side {
    /// Returns the suffix used in TikZ coordinate names
    pub fn as_str(self) -> &'static str {
        match self {
            Self::East => "east",
            Self::West => "west",
            Self::North => "north",
            Self::South => "south",
            Self::NorthEast => "northeast",
            Self::SouthEast => "southeast",
            Self::NorthWest => "northwest",
            Self::SouthWest => "southwest",
            Self::Anchor => "anchor",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "northeast" => Ok(Self::NorthEast),
            "southeast" => Ok(Self::SouthEast),
            "northwest" => Ok(Self::NorthWest),
            "southwest" => Ok(Self::SouthWest),
            "anchor" => Ok(Self::Anchor),
            "top" => Ok(Self::Top),
            _ => Err(format!(
                "invalid anchor side `{s}`, valid values: east, west, north, south, \
                 northeast, southeast, northwest, southwest, anchor, top"
            )),
        }
    }
}

/// A side of a named block, rendered as `(name-side)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor {
    block: String,
    side: Side,
}

impl Anchor {
    /// Creates an anchor on `side` of the block called `block`
    pub fn new(block: impl Into<String>, side: Side) -> Self {
        Self {
            block: block.into(),
            side,
        }
    }

    /// Shorthand for the `east` anchor, where the next block usually starts
    pub fn east(block: impl Into<String>) -> Self {
        Self::new(block, Side::East)
    }

    /// Shorthand for the `west` anchor, where incoming connections end
    pub fn west(block: impl Into<String>) -> Self {
        Self::new(block, Side::West)
    }

    /// Returns the name of the referenced block
    pub fn block(&self) -> &str {
        &self.block
    }

    /// Returns the referenced side
    pub fn side(&self) -> Side {
        self.side
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}-{})", self.block, self.side)
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = strip_parens(trimmed).unwrap_or(trimmed);

        let (block, side) = inner
            .rsplit_once('-')
            .ok_or_else(|| format!("invalid anchor `{s}`, expected `name-side`"))?;

        if block.is_empty() {
            return Err(format!("invalid anchor `{s}`, block name is empty"));
        }

        Ok(Self::new(block, side.parse()?))
    }
}

/// Where a block's local origin is placed.
///
/// The default is the absolute origin, so blocks without an explicit
/// placement stack on top of each other unless they carry an offset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Placement {
    /// An absolute coordinate
    At(Point3),
    /// An anchor of another block
    Anchor(Anchor),
    /// The east anchor of the block rendered just before this one
    Previous,
}

impl Placement {
    /// Places the block at the east anchor of `block`
    pub fn after(block: impl Into<String>) -> Self {
        Self::Anchor(Anchor::east(block))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::At(Point3::ORIGIN)
    }
}

impl From<Point3> for Placement {
    fn from(point: Point3) -> Self {
        Self::At(point)
    }
}

impl From<Anchor> for Placement {
    fn from(anchor: Anchor) -> Self {
        Self::Anchor(anchor)
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "previous" {
            return Ok(Self::Previous);
        }

        // Block names never hold commas, coordinates always do.
        let inner = strip_parens(trimmed);
        let is_coordinate = inner.is_some_and(|body| body.contains(','));

        if is_coordinate {
            trimmed.parse().map(Self::At)
        } else {
            trimmed.parse().map(Self::Anchor)
        }
    }
}

impl TryFrom<String> for Placement {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn strip_parens(s: &str) -> Option<&str> {
    s.strip_prefix('(')?.strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_display_uses_short_numbers() {
        assert_eq!(Point3::new(1.0, 0.0, 0.0).to_string(), "(1,0,0)");
        assert_eq!(Point3::new(-3.0, 0.5, 1.25).to_string(), "(-3,0.5,1.25)");
    }

    #[test]
    fn test_point_parse_with_spaces() {
        let p: Point3 = " ( 1.2 , 0, -4 ) ".parse().unwrap();
        assert_approx_eq!(f32, p.x(), 1.2);
        assert_approx_eq!(f32, p.y(), 0.0);
        assert_approx_eq!(f32, p.z(), -4.0);
    }

    #[test]
    fn test_point_parse_rejects_wrong_arity() {
        let err = "(1,2)".parse::<Point3>().unwrap_err();
        assert!(err.contains("three components"), "unexpected error: {err}");
        assert!("1,2,3".parse::<Point3>().is_err());
        assert!("(a,b,c)".parse::<Point3>().is_err());
    }

    #[test]
    fn test_anchor_parse_with_and_without_parens() {
        let a: Anchor = "(conv1-east)".parse().unwrap();
        assert_eq!(a.block(), "conv1");
        assert_eq!(a.side(), Side::East);

        let b: Anchor = "ccr_res_c_up1-southeast".parse().unwrap();
        assert_eq!(b.block(), "ccr_res_c_up1");
        assert_eq!(b.side(), Side::SouthEast);
    }

    #[test]
    fn test_anchor_keeps_dashes_in_block_name() {
        let a: Anchor = "block-a-north".parse().unwrap();
        assert_eq!(a.block(), "block-a");
        assert_eq!(a.to_string(), "(block-a-north)");
    }

    #[test]
    fn test_anchor_parse_errors() {
        assert!("conv1".parse::<Anchor>().is_err());
        assert!("-east".parse::<Anchor>().is_err());
        assert!("conv1-up".parse::<Anchor>().is_err());
    }

    #[test]
    fn test_placement_parse() {
        assert_eq!(
            "(1,0,0)".parse::<Placement>().unwrap(),
            Placement::At(Point3::new(1.0, 0.0, 0.0))
        );
        assert_eq!(
            "(-3,0,0)".parse::<Placement>().unwrap(),
            Placement::At(Point3::new(-3.0, 0.0, 0.0))
        );
        assert_eq!(
            "(pool1-east)".parse::<Placement>().unwrap(),
            Placement::after("pool1")
        );
        assert_eq!(
            "previous".parse::<Placement>().unwrap(),
            Placement::Previous
        );
    }

    #[test]
    fn test_placement_accepts_names_starting_with_digits() {
        assert_eq!(
            "(1x1conv-east)".parse::<Placement>().unwrap(),
            Placement::after("1x1conv")
        );
        assert_eq!(
            "3x3_conv-north".parse::<Placement>().unwrap(),
            Placement::Anchor(Anchor::new("3x3_conv", Side::North))
        );
        let err = "(1,2)".parse::<Placement>().unwrap_err();
        assert!(err.contains("three components"));
    }

    #[test]
    fn test_placement_default_is_origin() {
        assert_eq!(Placement::default(), Placement::At(Point3::ORIGIN));
        assert!(Point3::ORIGIN.is_zero());
    }

    proptest! {
        #[test]
        fn test_anchor_display_parses_back(
            block in "[a-z][a-z0-9_]{0,12}",
            side in prop::sample::select(vec![
                Side::East, Side::West, Side::North, Side::South,
                Side::NorthEast, Side::SouthEast, Side::Anchor, Side::Top,
            ]),
        ) {
            let anchor = Anchor::new(block, side);
            let parsed: Anchor = anchor.to_string().parse().unwrap();
            prop_assert_eq!(parsed, anchor);
        }
    }
}
