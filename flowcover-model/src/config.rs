//! Configuration enums shared by the layout and motion code.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Determines whether tiles are arranged horizontally or vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwipeAxis {
    #[default]
    Horizontal,
    Vertical,
}

impl SwipeAxis {
    /// Project a 2D vector onto this axis.
    #[inline]
    pub fn project(self, v: glam::Vec2) -> f32 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Unit vector along this axis.
    #[inline]
    pub fn unit(self) -> glam::Vec2 {
        match self {
            Self::Horizontal => glam::Vec2::X,
            Self::Vertical => glam::Vec2::Y,
        }
    }
}

/// Determines which way off-center tiles turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Facing {
    /// Off-center tiles turn to face the focus point.
    #[default]
    Inward,
    /// Off-center tiles turn away from the focus point.
    Outward,
    /// Tiles are never rotated.
    Forward,
}

impl Facing {
    /// Multiplier applied to `sign(d) * angle`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Inward => 1.0,
            Self::Outward => -1.0,
            Self::Forward => 0.0,
        }
    }

    pub const ALL: [Self; 3] = [Self::Inward, Self::Outward, Self::Forward];
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inward => write!(f, "Inward"),
            Self::Outward => write!(f, "Outward"),
            Self::Forward => write!(f, "Forward"),
        }
    }
}

/// Behaviour when a drag pushes past the first or last tile.
///
/// At rest the offset is always clamped; this only affects drags.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverscrollMode {
    /// The offset never leaves `[0, count - 1]`.
    Clamp,
    /// Excess past an end is scaled by `resistance` (0, 1].
    Elastic { resistance: f32 },
}

impl Default for OverscrollMode {
    fn default() -> Self {
        Self::Elastic {
            resistance: DEFAULT_ELASTIC_RESISTANCE,
        }
    }
}

impl OverscrollMode {
    /// Resistance applied past an end; `None` means hard clamp.
    pub fn resistance(self) -> Option<f32> {
        match self {
            Self::Clamp => None,
            Self::Elastic { resistance } => Some(resistance),
        }
    }
}

/// Resistance used by the default [`OverscrollMode`].
pub const DEFAULT_ELASTIC_RESISTANCE: f32 = 0.35;

/// Which sides of every tile get a mirrored reflection.
///
/// A per-widget style bitmask; the bit values match the classic
/// bottom/left/top/right layout so combined presets stay stable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Reflection(u8);

impl Reflection {
    pub const NONE: Self = Self(0);
    pub const BOTTOM: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const TOP: Self = Self(4);
    pub const RIGHT: Self = Self(8);
    pub const HORIZONTAL_SIDES: Self = Self(2 | 8);
    pub const VERTICAL_SIDES: Self = Self(1 | 4);
    pub const ALL: Self = Self(15);

    /// Build from raw bits, rejecting unknown bits.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Set or clear `side` depending on `on`.
    pub fn set(&mut self, side: Self, on: bool) {
        if on {
            self.insert(side);
        } else {
            self.remove(side);
        }
    }
}

impl BitOr for Reflection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Reflection {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Reflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Reflection(NONE)");
        }
        let names = [
            (Self::BOTTOM, "BOTTOM"),
            (Self::LEFT, "LEFT"),
            (Self::TOP, "TOP"),
            (Self::RIGHT, "RIGHT"),
        ];
        let mut first = true;
        write!(f, "Reflection(")?;
        for (side, name) in names {
            if self.contains(side) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_presets_match_sides() {
        assert_eq!(Reflection::LEFT | Reflection::RIGHT, Reflection::HORIZONTAL_SIDES);
        assert_eq!(Reflection::TOP | Reflection::BOTTOM, Reflection::VERTICAL_SIDES);
        assert_eq!(
            Reflection::HORIZONTAL_SIDES | Reflection::VERTICAL_SIDES,
            Reflection::ALL
        );
        assert_eq!(Reflection::ALL.bits(), 15);
    }

    #[test]
    fn reflection_rejects_unknown_bits() {
        assert!(Reflection::from_bits(16).is_none());
        assert_eq!(Reflection::from_bits(5), Some(Reflection::VERTICAL_SIDES));
    }

    #[test]
    fn reflection_set_toggles() {
        let mut r = Reflection::NONE;
        r.set(Reflection::TOP, true);
        r.set(Reflection::LEFT, true);
        r.set(Reflection::TOP, false);
        assert_eq!(r, Reflection::LEFT);
        assert_eq!(format!("{r:?}"), "Reflection(LEFT)");
    }

    #[test]
    fn axis_projection() {
        let v = glam::Vec2::new(3.0, -2.0);
        assert_eq!(SwipeAxis::Horizontal.project(v), 3.0);
        assert_eq!(SwipeAxis::Vertical.project(v), -2.0);
    }

    #[test]
    fn overscroll_resistance() {
        assert_eq!(OverscrollMode::Clamp.resistance(), None);
        assert_eq!(
            OverscrollMode::Elastic { resistance: 0.5 }.resistance(),
            Some(0.5)
        );
        assert_eq!(
            OverscrollMode::default().resistance(),
            Some(DEFAULT_ELASTIC_RESISTANCE)
        );
    }
}
