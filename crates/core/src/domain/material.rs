use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Areal density used when the material label is not recognised. Equal to plain PVC.
pub const DEFAULT_DENSITY_KG_M2: Decimal = Decimal::from_parts(40, 0, 0, false, 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Pvc,
    PvcRinforzato,
    Alluminio,
    AlluminioCoibentato,
    AlluminioEstruso,
    Acciaio,
    AcciaioBlindato,
}

impl Material {
    pub const ALL: [Material; 7] = [
        Material::Pvc,
        Material::PvcRinforzato,
        Material::Alluminio,
        Material::AlluminioCoibentato,
        Material::AlluminioEstruso,
        Material::Acciaio,
        Material::AcciaioBlindato,
    ];

    /// Case-insensitive lookup on the normalised label.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = normalize_label(raw);
        Self::ALL.into_iter().find(|material| material.label() == normalized)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pvc => "pvc",
            Self::PvcRinforzato => "pvc rinforzato",
            Self::Alluminio => "alluminio",
            Self::AlluminioCoibentato => "alluminio coibentato",
            Self::AlluminioEstruso => "alluminio estruso",
            Self::Acciaio => "acciaio",
            Self::AcciaioBlindato => "acciaio blindato",
        }
    }

    /// kg/m²
    pub fn density(self) -> Decimal {
        match self {
            Self::Pvc => Decimal::new(40, 1),
            Self::PvcRinforzato => Decimal::new(50, 1),
            Self::Alluminio => Decimal::new(45, 1),
            Self::AlluminioCoibentato => Decimal::new(55, 1),
            Self::AlluminioEstruso => Decimal::new(70, 1),
            Self::Acciaio => Decimal::new(70, 1),
            Self::AcciaioBlindato => Decimal::new(85, 1),
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|material| material.label()).collect()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn density_for_label(raw: &str) -> Decimal {
    Material::from_label(raw).map(Material::density).unwrap_or(DEFAULT_DENSITY_KG_M2)
}

pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
