use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Depression band of an EPDS-style total score.
///
/// Serialized with the Indonesian labels shown to respondents and staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DepressionCategory {
    #[serde(rename = "Sangat Ringan")]
    VeryMild,
    #[serde(rename = "Ringan-Sedang")]
    MildModerate,
    #[serde(rename = "Sedang-Berat")]
    ModerateSevere,
    #[serde(rename = "Berat")]
    Severe,
    #[serde(rename = "Tidak Diketahui")]
    Unknown,
}

impl DepressionCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryMild => "Sangat Ringan",
            Self::MildModerate => "Ringan-Sedang",
            Self::ModerateSevere => "Sedang-Berat",
            Self::Severe => "Berat",
            Self::Unknown => "Tidak Diketahui",
        }
    }

    /// Whether staff should be alerted about this result.
    pub fn is_high_risk(self) -> bool {
        matches!(self, Self::ModerateSevere | Self::Severe)
    }
}

/// Anxiety band of the anxiety item subset score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AnxietyCategory {
    #[serde(rename = "Tidak ada gejala atau Ringan")]
    NoneOrMild,
    #[serde(rename = "Ringan hingga Sedang")]
    MildToModerate,
    #[serde(rename = "Berat")]
    Severe,
    #[serde(rename = "Tidak Diketahui")]
    Unknown,
}

impl AnxietyCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoneOrMild => "Tidak ada gejala atau Ringan",
            Self::MildToModerate => "Ringan hingga Sedang",
            Self::Severe => "Berat",
            Self::Unknown => "Tidak Diketahui",
        }
    }

    pub fn is_high_risk(self) -> bool {
        self == Self::Severe
    }
}

impl std::fmt::Display for DepressionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for AnxietyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
