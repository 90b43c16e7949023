use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not match any variant of a closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(TestStatus {
    Normal => "Normal",
    High => "High",
    Low => "Low",
});

str_enum!(RiskTier {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

str_enum!(HealthHeadline {
    Excellent => "excellent",
    Good => "good",
    NeedsAttention => "needs_attention",
    RequiresAction => "requires_action",
});

str_enum!(InsightKind {
    Positive => "positive",
    Warning => "warning",
    Critical => "critical",
});

str_enum!(Urgency {
    Routine => "routine",
    Urgent => "urgent",
    Emergency => "emergency",
});

str_enum!(SpecialistPriority {
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

impl TestStatus {
    /// Range classification: below `min` is Low, above `max` is High,
    /// anything inside the closed interval is Normal.
    pub fn classify(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            Self::Low
        } else if value > max {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Icon shown on per-test detail cards.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Normal => "✅",
            Self::High => "⚠️",
            Self::Low => "⬇️",
        }
    }

    /// Marker colour for charts and the range comparison widget.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Normal => "#2ecc71",
            Self::High => "#e74c3c",
            Self::Low => "#3498db",
        }
    }
}

impl HealthHeadline {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Excellent => "🎉 Excellent Health!",
            Self::Good => "👍 Good Health",
            Self::NeedsAttention => "⚠️ Needs Attention",
            Self::RequiresAction => "🚨 Requires Action",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => {
                "Most of your test results are within normal ranges. Keep up the great work!"
            }
            Self::Good => "Majority of your tests are normal, but some areas need attention.",
            Self::NeedsAttention => {
                "Several test results are outside normal ranges. Consult your doctor."
            }
            Self::RequiresAction => {
                "Many tests are abnormal. Please consult your healthcare provider immediately."
            }
        }
    }
}

impl Urgency {
    /// Short follow-up guidance.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Emergency => "seek immediate care",
            Self::Urgent => "schedule within 24–48 hours",
            Self::Routine => "schedule within 1–2 weeks",
        }
    }

    /// Banner heading for the recommendations panel.
    pub fn banner_title(&self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY - Seek Immediate Care",
            Self::Urgent => "Urgent - Schedule Within 24-48 Hours",
            Self::Routine => "Routine - Schedule Within 1-2 Weeks",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Emergency => "🚨",
            Self::Urgent => "⚠️",
            Self::Routine => "📅",
        }
    }

    /// Next steps used when the recommendation source supplies none.
    pub fn default_next_steps(&self) -> Vec<String> {
        let steps: &[&str] = match self {
            Self::Emergency => &[
                "🚨 SEEK EMERGENCY MEDICAL CARE IMMEDIATELY",
                "Call emergency services or go to nearest ER",
                "Do not wait for an appointment",
                "Bring all test results with you",
            ],
            Self::Urgent => &[
                "⚠️ Schedule appointment within 24-48 hours",
                "Contact your primary care physician immediately",
                "Explain your test results",
                "Request urgent specialist referral if needed",
            ],
            Self::Routine => &[
                "📅 Schedule appointment within 1-2 weeks",
                "Discuss results with your doctor",
                "Get specialist referral if recommended",
                "Follow up on any abnormal findings",
            ],
        };
        steps.iter().map(|s| s.to_string()).collect()
    }
}

impl SpecialistPriority {
    /// Sort key: lower ranks are shown first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Priority from the number of abnormal tests attributed to a specialist.
    pub fn from_reason_count(count: u32) -> Self {
        match count {
            c if c >= 3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        for (variant, s) in [
            (TestStatus::Normal, "Normal"),
            (TestStatus::High, "High"),
            (TestStatus::Low, "Low"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(TestStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn urgency_round_trip() {
        for (variant, s) in [
            (Urgency::Routine, "routine"),
            (Urgency::Urgent, "urgent"),
            (Urgency::Emergency, "emergency"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Urgency::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = TestStatus::from_str("Critical").unwrap_err();
        assert_eq!(err.field, "TestStatus");
        assert_eq!(err.value, "Critical");
        assert!(Urgency::from_str("EMERGENCY").is_err());
        assert!(SpecialistPriority::from_str("").is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Urgency::Emergency).unwrap();
        assert_eq!(json, "\"emergency\"");
        let status: TestStatus = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(status, TestStatus::High);
    }

    #[test]
    fn classify_uses_closed_interval() {
        assert_eq!(TestStatus::classify(70.0, 70.0, 100.0), TestStatus::Normal);
        assert_eq!(TestStatus::classify(100.0, 70.0, 100.0), TestStatus::Normal);
        assert_eq!(TestStatus::classify(69.9, 70.0, 100.0), TestStatus::Low);
        assert_eq!(TestStatus::classify(100.1, 70.0, 100.0), TestStatus::High);
    }

    #[test]
    fn status_icons() {
        assert_eq!(TestStatus::Normal.icon(), "✅");
        assert_eq!(TestStatus::High.icon(), "⚠️");
        assert_eq!(TestStatus::Low.icon(), "⬇️");
    }

    #[test]
    fn status_colors_distinct() {
        assert_eq!(TestStatus::Normal.color(), "#2ecc71");
        assert_eq!(TestStatus::High.color(), "#e74c3c");
        assert_eq!(TestStatus::Low.color(), "#3498db");
    }

    #[test]
    fn priority_from_reason_count() {
        assert_eq!(SpecialistPriority::from_reason_count(1), SpecialistPriority::Low);
        assert_eq!(SpecialistPriority::from_reason_count(2), SpecialistPriority::Medium);
        assert_eq!(SpecialistPriority::from_reason_count(3), SpecialistPriority::High);
        assert_eq!(SpecialistPriority::from_reason_count(7), SpecialistPriority::High);
    }

    #[test]
    fn every_urgency_has_four_default_steps() {
        for urgency in [Urgency::Routine, Urgency::Urgent, Urgency::Emergency] {
            assert_eq!(urgency.default_next_steps().len(), 4);
        }
    }
}
