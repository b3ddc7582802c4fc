//! Fixed option catalogs shared by the dashboard forms
//!
//! Every catalog serializes to the lowercase value the backend expects and
//! carries a display label for the UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value not present in a catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {catalog} option: '{value}'")]
pub struct UnknownOption {
    /// Catalog name
    pub catalog: &'static str,
    /// Rejected input
    pub value: String,
}

impl UnknownOption {
    fn new(catalog: &'static str, value: &str) -> Self {
        Self {
            catalog,
            value: value.to_string(),
        }
    }
}

/// Crops the detection model and field registry know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Tomato,
    Potato,
    Wheat,
    Rice,
    Corn,
    Cotton,
}

impl CropKind {
    /// All crops, in display order
    pub const ALL: [CropKind; 6] = [
        CropKind::Tomato,
        CropKind::Potato,
        CropKind::Wheat,
        CropKind::Rice,
        CropKind::Corn,
        CropKind::Cotton,
    ];

    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CropKind::Tomato => "tomato",
            CropKind::Potato => "potato",
            CropKind::Wheat => "wheat",
            CropKind::Rice => "rice",
            CropKind::Corn => "corn",
            CropKind::Cotton => "cotton",
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CropKind::Tomato => "Tomato",
            CropKind::Potato => "Potato",
            CropKind::Wheat => "Wheat",
            CropKind::Rice => "Rice",
            CropKind::Corn => "Corn",
            CropKind::Cotton => "Cotton",
        }
    }
}

impl FromStr for CropKind {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownOption::new("crop", s))
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soil classification of a farm or field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Loamy,
    Clay,
    Sandy,
    Silt,
    Peaty,
    Chalky,
}

impl SoilType {
    /// All soil types, in display order
    pub const ALL: [SoilType; 6] = [
        SoilType::Loamy,
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Silt,
        SoilType::Peaty,
        SoilType::Chalky,
    ];

    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Loamy => "loamy",
            SoilType::Clay => "clay",
            SoilType::Sandy => "sandy",
            SoilType::Silt => "silt",
            SoilType::Peaty => "peaty",
            SoilType::Chalky => "chalky",
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::Peaty => "Peaty",
            SoilType::Chalky => "Chalky",
        }
    }
}

impl FromStr for SoilType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownOption::new("soil type", s))
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a farm or field is watered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationType {
    Drip,
    Sprinkler,
    Surface,
    Manual,
    Rainfed,
}

impl IrrigationType {
    /// All irrigation types, in display order
    pub const ALL: [IrrigationType; 5] = [
        IrrigationType::Drip,
        IrrigationType::Sprinkler,
        IrrigationType::Surface,
        IrrigationType::Manual,
        IrrigationType::Rainfed,
    ];

    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationType::Drip => "drip",
            IrrigationType::Sprinkler => "sprinkler",
            IrrigationType::Surface => "surface",
            IrrigationType::Manual => "manual",
            IrrigationType::Rainfed => "rainfed",
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            IrrigationType::Drip => "Drip Irrigation",
            IrrigationType::Sprinkler => "Sprinkler",
            IrrigationType::Surface => "Surface Irrigation",
            IrrigationType::Manual => "Manual Irrigation",
            IrrigationType::Rainfed => "Rainfed",
        }
    }
}

impl FromStr for IrrigationType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownOption::new("irrigation type", s))
    }
}

impl fmt::Display for IrrigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
