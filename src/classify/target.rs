//! Detected target value type.

use std::fmt;

use crate::decode::RingCode;
use crate::geometry::Ellipse;

/// Kind of a detected target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Coded target with a synchronization and a data ring.
    Rad,
    /// Uncoded dot inside a square frame.
    Circle,
}

impl TargetKind {
    /// Short label used in text and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rad => "RAD",
            Self::Circle => "circle",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected target and the ellipse it was derived from.
///
/// Coded targets always carry a code; uncoded ones never do.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    kind: TargetKind,
    code: Option<RingCode>,
    ellipse: Ellipse,
}

impl Target {
    /// Coded target decoded from `ellipse`.
    pub fn rad(ellipse: Ellipse, code: RingCode) -> Self {
        Self {
            kind: TargetKind::Rad,
            code: Some(code),
            ellipse,
        }
    }

    /// Uncoded target.
    pub fn circle(ellipse: Ellipse) -> Self {
        Self {
            kind: TargetKind::Circle,
            code: None,
            ellipse,
        }
    }

    /// Coded or uncoded.
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Data ring code; `None` for uncoded targets.
    pub fn code(&self) -> Option<RingCode> {
        self.code
    }

    /// Code as text, `"none"` for uncoded targets.
    pub fn code_str(&self) -> String {
        self.code
            .map_or_else(|| "none".to_owned(), |code| code.to_string())
    }

    /// Centre of the source ellipse.
    pub fn center(&self) -> [f64; 2] {
        self.ellipse.center()
    }

    /// Fitted ellipse the target was derived from.
    pub fn ellipse(&self) -> &Ellipse {
        &self.ellipse
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y] = self.center();
        write!(f, "Target({x}, {y}, '{}', '{}')", self.kind, self.code_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Target;
    use crate::geometry::Ellipse;

    #[test]
    fn display_matches_report_format() {
        let ellipse = Ellipse::new(100.0, 100.0, 60.0, 60.0, 0.0);
        let rad = Target::rad(ellipse, "101010101010".parse().unwrap());
        assert_eq!(rad.to_string(), "Target(100, 100, 'RAD', '101010101010')");
        let dot = Target::circle(Ellipse::new(300.0, 300.0, 16.0, 16.0, 0.0));
        assert_eq!(dot.to_string(), "Target(300, 300, 'circle', 'none')");
    }
}
