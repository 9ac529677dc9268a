// Fielding positions for position players.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFENSIVE_PEAK_PREMIUM, DEFENSIVE_PEAK_STANDARD};

/// Primary fielding position of a position player.
///
/// `Outfield` and `Infield` cover sources that only report a generic
/// position group, and `TwoWay` covers two-way players. All three use the
/// fallback aging parameters unless config names them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    Outfield,
    Infield,
    TwoWay,
}

/// Positions with a dedicated entry in the default aging table.
pub const CONFIGURED_POSITIONS: &[Position] = &[
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::DesignatedHitter,
];

impl Position {
    /// Parse a position abbreviation or an MLB numeric position code.
    ///
    /// - "C"/"2", "1B"/"3", "2B"/"4", "3B"/"5", "SS"/"6", "LF"/"7",
    ///   "CF"/"8", "RF"/"9", "DH"/"10"
    /// - "OF"/"O" -> Outfield, "IF" -> Infield, "TWP"/"Y" -> TwoWay
    ///
    /// Pitchers ("P"/"1") are not position players and yield `None`.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "2" => Some(Position::Catcher),
            "1B" | "3" => Some(Position::FirstBase),
            "2B" | "4" => Some(Position::SecondBase),
            "3B" | "5" => Some(Position::ThirdBase),
            "SS" | "6" => Some(Position::ShortStop),
            "LF" | "7" => Some(Position::LeftField),
            "CF" | "8" => Some(Position::CenterField),
            "RF" | "9" => Some(Position::RightField),
            "DH" | "10" => Some(Position::DesignatedHitter),
            "OF" | "O" => Some(Position::Outfield),
            "IF" => Some(Position::Infield),
            "TWP" | "Y" => Some(Position::TwoWay),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::Outfield => "OF",
            Position::Infield => "IF",
            Position::TwoWay => "TWP",
        }
    }

    /// Catchers and middle infielders age out of their defensive prime earlier.
    pub fn is_premium_defender(&self) -> bool {
        matches!(
            self,
            Position::Catcher | Position::SecondBase | Position::ShortStop
        )
    }

    /// Age at which defensive value starts to decay.
    pub fn defensive_peak(&self) -> u32 {
        if self.is_premium_defender() {
            DEFENSIVE_PEAK_PREMIUM
        } else {
            DEFENSIVE_PEAK_STANDARD
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
