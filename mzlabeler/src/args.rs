use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use mzlabel::LabelType;

pub(crate) fn non_negative_float_f64(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|e| e.to_string())?;
    if value < 0.0 {
        Err(format!("`{s}` is less than zero"))
    } else {
        Ok(value)
    }
}

pub(crate) fn positive_float_f64(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|e| e.to_string())?;
    if value <= 0.0 {
        Err(format!("`{s}` is not greater than zero"))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgLabelType {
    #[default]
    /// 13C labeling, one labelable carbon per 14 Da
    Carbon13,
    /// 2H labeling, one labelable hydrogen per 7 Da
    Deuterium,
    /// 15N labeling
    Nitrogen15,
}

impl From<ArgLabelType> for LabelType {
    fn from(value: ArgLabelType) -> Self {
        match value {
            ArgLabelType::Carbon13 => LabelType::Carbon13,
            ArgLabelType::Deuterium => LabelType::Deuterium,
            ArgLabelType::Nitrogen15 => LabelType::Nitrogen15,
        }
    }
}

impl Display for ArgLabelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
