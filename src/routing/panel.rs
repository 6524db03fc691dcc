use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::location::Location;

/// Physical media of a panel's ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InterfaceType {
    /// Copper (RJ45)
    #[serde(rename = "RJ")]
    Rj,
    /// Multi-mode fiber
    #[serde(rename = "MM")]
    Mm,
    /// Single-mode fiber
    #[serde(rename = "SM")]
    Sm,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Rj => "RJ",
            InterfaceType::Mm => "MM",
            InterfaceType::Sm => "SM",
        }
    }

    /// Parse a catalog interface field such as `RJ`, `MM-LC` or `SM-LC`.
    /// Only the token before the first dash is significant.
    pub fn from_catalog(raw: &str) -> Option<Self> {
        raw.split('-').next().and_then(|token| token.parse().ok())
    }
}

impl FromStr for InterfaceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RJ" => Ok(InterfaceType::Rj),
            "MM" => Ok(InterfaceType::Mm),
            "SM" => Ok(InterfaceType::Sm),
            _ => Err(()),
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security segregation tag. Panels without one are `None` wherever
/// a classification is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "BLACK")]
    Black,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Red => "RED",
            Classification::Black => "BLACK",
        }
    }

    /// Lowercase form used by the catalog table
    pub fn catalog_value(&self) -> &'static str {
        match self {
            Classification::Red => "red",
            Classification::Black => "black",
        }
    }

    /// Parse a classification field. `red+black` and anything unknown
    /// mean "unclassified".
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        if lowered.contains("red+black") {
            return None;
        }
        match lowered.as_str() {
            "red" => Some(Classification::Red),
            "black" => Some(Classification::Black),
            _ => None,
        }
    }

    /// Display helper for optional classifications
    pub fn label(classification: Option<Classification>) -> &'static str {
        classification.map(|c| c.as_str()).unwrap_or("UNCLASSIFIED")
    }

    /// Two panels may share a cable when their tags match or either is untagged
    pub fn compatible(a: Option<Classification>, b: Option<Classification>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directional port group of a patch panel: the ports in `location`
/// whose cable run ends at `destination`.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: String,
    pub room: String,
    pub location: Location,
    pub interface_type: InterfaceType,
    pub status: bool,
    pub free_ports: u32,
    pub classification: Option<Classification>,
    pub destination: String,
}

impl Panel {
    pub fn is_available(&self) -> bool {
        self.free_ports > 0 && self.status
    }

    /// Available and holding at least `min_free_ports` free ports
    pub fn has_capacity(&self, min_free_ports: u32) -> bool {
        self.is_available() && self.free_ports >= min_free_ports
    }

    pub fn rack(&self) -> &str {
        self.location.rack_identifier()
    }

    pub fn spine(&self) -> &str {
        self.location.spine_and_cabinet().0
    }
}
