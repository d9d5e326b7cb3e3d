//! Meteor catalog: size categories, colours and their stats
//!
//! Kinds are named `<colour>_<size>_<variant>` ("brown_big_1", "grey_tiny_2"),
//! which is also the sprite name and the form remote peers send.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Meteor size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteorSize {
    /// Slow, tough, worth the most
    Big,
    /// Medium
    Medium,
    /// Small
    Small,
    /// Fast and fragile
    Tiny,
}

/// Meteor colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteorColor {
    /// Brown
    Brown,
    /// Grey
    Grey,
}

/// Per-size tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorStats {
    /// Hits needed to destroy
    pub hp: u32,
    /// Score for destroying it
    pub points: u32,
    /// Square hitbox side
    pub hitbox: f32,
    /// Horizontal speed range (pixels per second)
    pub speed_x: (f32, f32),
    /// Vertical speed range (pixels per second)
    pub speed_y: (f32, f32),
    /// Spin range (degrees per second)
    pub spin: (f32, f32),
}

impl MeteorSize {
    /// All sizes, biggest first
    pub const ALL: [MeteorSize; 4] = [Self::Big, Self::Medium, Self::Small, Self::Tiny];

    /// Tuning for this size
    pub fn stats(self) -> MeteorStats {
        match self {
            Self::Big => MeteorStats {
                hp: 3,
                points: 30,
                hitbox: 54.0,
                speed_x: (-30.0, 30.0),
                speed_y: (30.0, 80.0),
                spin: (-60.0, 60.0),
            },
            Self::Medium => MeteorStats {
                hp: 2,
                points: 20,
                hitbox: 26.0,
                speed_x: (-40.0, 40.0),
                speed_y: (40.0, 100.0),
                spin: (-120.0, 120.0),
            },
            Self::Small => MeteorStats {
                hp: 1,
                points: 10,
                hitbox: 12.0,
                speed_x: (-50.0, 50.0),
                speed_y: (60.0, 140.0),
                spin: (-180.0, 180.0),
            },
            Self::Tiny => MeteorStats {
                hp: 1,
                points: 5,
                hitbox: 6.0,
                speed_x: (-60.0, 60.0),
                speed_y: (70.0, 170.0),
                spin: (-240.0, 240.0),
            },
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Medium => "medium",
            Self::Small => "small",
            Self::Tiny => "tiny",
        }
    }
}

impl MeteorColor {
    /// All colours
    pub const ALL: [MeteorColor; 2] = [Self::Brown, Self::Grey];

    fn name(self) -> &'static str {
        match self {
            Self::Brown => "brown",
            Self::Grey => "grey",
        }
    }
}

/// Concrete meteor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeteorKind {
    /// Size category
    pub size: MeteorSize,
    /// Colour
    pub color: MeteorColor,
    /// Sprite variant (1 or 2)
    pub variant: u8,
}

impl MeteorKind {
    /// Variants per size/colour combination
    pub const VARIANTS: u8 = 2;

    /// Build a kind; the variant is clamped into range
    pub fn new(size: MeteorSize, color: MeteorColor, variant: u8) -> Self {
        Self {
            size,
            color,
            variant: variant.clamp(1, Self::VARIANTS),
        }
    }

    /// Tuning for this kind
    pub fn stats(&self) -> MeteorStats {
        self.size.stats()
    }

    /// Sprite name
    pub fn sprite(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MeteorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.color.name(), self.size.name(), self.variant)
    }
}

/// Malformed meteor kind name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown meteor kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for MeteorKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownKind(name.to_string());
        let mut parts = name.split('_');
        let (Some(color), Some(size), Some(variant), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unknown());
        };

        let color = MeteorColor::ALL
            .into_iter()
            .find(|candidate| candidate.name() == color)
            .ok_or_else(unknown)?;
        let size = MeteorSize::ALL
            .into_iter()
            .find(|candidate| candidate.name() == size)
            .ok_or_else(unknown)?;
        let variant: u8 = variant.parse().map_err(|_| unknown())?;
        if !(1..=Self::VARIANTS).contains(&variant) {
            return Err(unknown());
        }
        Ok(Self { size, color, variant })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        let kind: MeteorKind = "grey_small_2".parse().unwrap();
        assert_eq!(kind, MeteorKind::new(MeteorSize::Small, MeteorColor::Grey, 2));
        assert_eq!(kind.sprite(), "grey_small_2");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for name in ["", "brown_big", "brown_big_3", "green_big_1", "brown_huge_1", "brown_big_1_x"] {
            assert_eq!(name.parse::<MeteorKind>(), Err(UnknownKind(name.to_string())), "{name}");
        }
    }

    #[test]
    fn test_bigger_meteors_are_tougher() {
        let hp: Vec<u32> = MeteorSize::ALL.iter().map(|size| size.stats().hp).collect();
        assert_eq!(hp, vec![3, 2, 1, 1]);
        let points: Vec<u32> = MeteorSize::ALL.iter().map(|size| size.stats().points).collect();
        assert_eq!(points, vec![30, 20, 10, 5]);
    }
}
