use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

///
/// Normalization applied to the observed matrix the expected values were computed
/// from. The expected-value calculation never inspects it; it is carried through
/// to the result so consumers can match expected vectors to matrices.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizationType {
    #[default]
    None,
    Vc,
    VcSqrt,
    Kr,
    Scale,
    InterVc,
    InterKr,
    GwVc,
    GwKr,
}

impl NormalizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationType::None => "NONE",
            NormalizationType::Vc => "VC",
            NormalizationType::VcSqrt => "VC_SQRT",
            NormalizationType::Kr => "KR",
            NormalizationType::Scale => "SCALE",
            NormalizationType::InterVc => "INTER_VC",
            NormalizationType::InterKr => "INTER_KR",
            NormalizationType::GwVc => "GW_VC",
            NormalizationType::GwKr => "GW_KR",
        }
    }
}

impl FromStr for NormalizationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(NormalizationType::None),
            "VC" => Ok(NormalizationType::Vc),
            "VC_SQRT" => Ok(NormalizationType::VcSqrt),
            "KR" => Ok(NormalizationType::Kr),
            "SCALE" => Ok(NormalizationType::Scale),
            "INTER_VC" => Ok(NormalizationType::InterVc),
            "INTER_KR" => Ok(NormalizationType::InterKr),
            "GW_VC" => Ok(NormalizationType::GwVc),
            "GW_KR" => Ok(NormalizationType::GwKr),
            _ => Err(CoreError::UnknownNormalizationType(s.to_string())),
        }
    }
}

impl Display for NormalizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
