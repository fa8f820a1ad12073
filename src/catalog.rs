//! Static indicator catalog and Sustainable Development Goal metadata.
//!
//! The dashboard tracks a fixed set of World Bank indicators, each tagged with
//! the SDG (1–17) it relates to. The tag only drives labelling and colour.

use serde::Serialize;

/// A tracked indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Indicator {
    /// World Bank indicator id, e.g. `"EN.ATM.CO2E.PC"`.
    pub code: &'static str,
    pub name: &'static str,
    /// Sustainable Development Goal number (1–17).
    pub sdg: u8,
}

const INDICATORS: &[Indicator] = &[
    Indicator {
        code: "EN.ATM.CO2E.PC",
        name: "CO2 emissions (metric tons per capita)",
        sdg: 13,
    },
    Indicator {
        code: "EG.USE.ELEC.KH.PC",
        name: "Electric power consumption (kWh per capita)",
        sdg: 7,
    },
    Indicator {
        code: "ER.H2O.FWTL.ZS",
        name: "Renewable freshwater resources per capita",
        sdg: 6,
    },
    Indicator {
        code: "AG.LND.FRST.ZS",
        name: "Forest area (% of land area)",
        sdg: 15,
    },
    Indicator {
        code: "SH.STA.BASS.ZS",
        name: "People using at least basic sanitation services",
        sdg: 6,
    },
    Indicator {
        code: "EN.POP.SLUM.UR.ZS",
        name: "Urban population living in slums",
        sdg: 11,
    },
];

/// All tracked indicators, in display order.
pub fn list_indicators() -> &'static [Indicator] {
    INDICATORS
}

/// Look up a tracked indicator by code (case-insensitive).
pub fn find_indicator(code: &str) -> Option<&'static Indicator> {
    let code = code.trim();
    INDICATORS.iter().find(|i| i.code.eq_ignore_ascii_case(code))
}

/// Opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colour for goals outside 1–17.
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x88, 0x88, 0x88);

/// Goal number, short title and official colour.
const GOALS: [(u8, &str, Rgb); 17] = [
    (1, "No Poverty", Rgb::new(0xE5, 0x24, 0x3B)),
    (2, "Zero Hunger", Rgb::new(0xDD, 0xA6, 0x3A)),
    (3, "Good Health and Well-being", Rgb::new(0x4C, 0x9F, 0x38)),
    (4, "Quality Education", Rgb::new(0xC5, 0x19, 0x2D)),
    (5, "Gender Equality", Rgb::new(0xFF, 0x3A, 0x21)),
    (6, "Clean Water and Sanitation", Rgb::new(0x26, 0xBD, 0xE2)),
    (7, "Affordable and Clean Energy", Rgb::new(0xFC, 0xC3, 0x0B)),
    (8, "Decent Work and Economic Growth", Rgb::new(0xA2, 0x19, 0x42)),
    (9, "Industry, Innovation and Infrastructure", Rgb::new(0xFD, 0x69, 0x25)),
    (10, "Reduced Inequalities", Rgb::new(0xDD, 0x13, 0x67)),
    (11, "Sustainable Cities and Communities", Rgb::new(0xFD, 0x9D, 0x24)),
    (12, "Responsible Consumption and Production", Rgb::new(0xBF, 0x8B, 0x2E)),
    (13, "Climate Action", Rgb::new(0x3F, 0x7E, 0x44)),
    (14, "Life Below Water", Rgb::new(0x0A, 0x97, 0xD9)),
    (15, "Life on Land", Rgb::new(0x56, 0xC0, 0x2B)),
    (16, "Peace, Justice and Strong Institutions", Rgb::new(0x00, 0x68, 0x9D)),
    (17, "Partnerships for the Goals", Rgb::new(0x19, 0x48, 0x6A)),
];

/// Title of a goal, e.g. `sdg_goal(13) == Some("Climate Action")`.
pub fn sdg_goal(goal: u8) -> Option<&'static str> {
    GOALS.iter().find(|(n, _, _)| *n == goal).map(|(_, t, _)| *t)
}

/// Official colour of a goal, grey for anything unknown.
pub fn sdg_color(goal: u8) -> Rgb {
    GOALS
        .iter()
        .find(|(n, _, _)| *n == goal)
        .map(|(_, _, c)| *c)
        .unwrap_or(FALLBACK_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_are_numbered_in_order() {
        for (i, (n, _, _)) in GOALS.iter().enumerate() {
            assert_eq!(*n as usize, i + 1);
        }
    }

    #[test]
    fn every_indicator_has_a_known_goal() {
        for ind in list_indicators() {
            assert!(sdg_goal(ind.sdg).is_some(), "{} has unknown goal", ind.code);
        }
    }
}
