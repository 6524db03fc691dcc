use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Rack identifiers look like `A01-C02`: a spine token, a dash, then a
/// single letter followed by the cabinet number.
fn rack_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([^-\s]+)-[A-Za-z](\d+)$").ok())
        .as_ref()
}

/// Split a rack identifier into spine and cabinet number.
/// Returns `("", 0)` when the string is not a `<spine>-C<cabinet>` identifier.
pub fn spine_and_cabinet(rack: &str) -> (&str, u32) {
    let Some(caps) = rack_pattern().and_then(|re| re.captures(rack.trim())) else {
        return ("", 0);
    };
    let spine = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    match caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) {
        Some(cabinet) => (spine, cabinet),
        None => ("", 0),
    }
}

/// True when the string parses as a rack identifier
pub fn is_rack_identifier(rack: &str) -> bool {
    !spine_and_cabinet(rack).0.is_empty()
}

/// Spine token of a rack, or `None` when the rack does not parse
pub fn spine_of(rack: &str) -> Option<&str> {
    match spine_and_cabinet(rack) {
        ("", _) => None,
        (spine, _) => Some(spine),
    }
}

/// Cabinet distance between two racks on the same spine.
/// `None` if either rack fails to parse or the spines differ.
pub fn same_spine_distance(a: &str, b: &str) -> Option<u32> {
    let (spine_a, cab_a) = spine_and_cabinet(a);
    let (spine_b, cab_b) = spine_and_cabinet(b);
    if spine_a.is_empty() || spine_a != spine_b {
        return None;
    }
    Some(cab_a.abs_diff(cab_b))
}

/// Physical mount point of a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub rack: String,
    pub u_position: String,
}

impl Location {
    pub fn new(rack: impl Into<String>, u_position: impl Into<String>) -> Self {
        Self {
            rack: rack.into(),
            u_position: u_position.into(),
        }
    }

    /// The rack this location sits in, without the U position
    pub fn rack_identifier(&self) -> &str {
        &self.rack
    }

    pub fn spine_and_cabinet(&self) -> (&str, u32) {
        spine_and_cabinet(&self.rack)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.rack, self.u_position)
    }
}
