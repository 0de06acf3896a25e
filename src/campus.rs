//! Campuses

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A supported campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Campus {
    /// Universitas Indonesia
    Ui,
    /// Institut Teknologi Bandung
    Itb,
    /// Universitas Gadjah Mada
    Ugm,
    /// Universitas Padjadjaran
    Unpad,
    /// Universitas Diponegoro
    Undip,
}

impl Campus {
    /// Every supported campus, in display order.
    pub const ALL: [Campus; 5] = [Self::Ui, Self::Itb, Self::Ugm, Self::Unpad, Self::Undip];

    /// The campus code, e.g. `"ITB"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Ui => "UI",
            Self::Itb => "ITB",
            Self::Ugm => "UGM",
            Self::Unpad => "UNPAD",
            Self::Undip => "UNDIP",
        }
    }
}

impl Display for Campus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.code())
    }
}

/// Parses a campus code case-insensitively.
impl FromStr for Campus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();

        Self::ALL
            .into_iter()
            .find(|campus| campus.code() == code)
            .ok_or_else(|| ValidationError::InvalidCampus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_codes_case_insensitively() -> TestResult {
        assert_eq!("ui".parse::<Campus>()?, Campus::Ui);
        assert_eq!(" Unpad ".parse::<Campus>()?, Campus::Unpad);
        assert_eq!("UNDIP".parse::<Campus>()?, Campus::Undip);

        Ok(())
    }

    #[test]
    fn rejects_unknown_campus() {
        let result = "UNAIR".parse::<Campus>();

        assert_eq!(
            result,
            Err(ValidationError::InvalidCampus("UNAIR".to_string()))
        );
    }

    #[test]
    fn serializes_as_upper_case_code() -> TestResult {
        assert_eq!(serde_json::to_string(&Campus::Itb)?, r#""ITB""#);
        assert_eq!(serde_json::from_str::<Campus>(r#""UGM""#)?, Campus::Ugm);

        Ok(())
    }

    #[test]
    fn display_matches_code() {
        let codes: Vec<String> = Campus::ALL.iter().map(ToString::to_string).collect();

        assert_eq!(codes, ["UI", "ITB", "UGM", "UNPAD", "UNDIP"]);
    }
}
