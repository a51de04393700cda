use std::fmt;

/// Voxel encodings recognized in a NIfTI-1 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    Int64,
    UInt64,
}

impl Datatype {
    /// Map a NIfTI-1 `datatype` header code.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            2 => Some(Datatype::UInt8),
            4 => Some(Datatype::Int16),
            8 => Some(Datatype::Int32),
            16 => Some(Datatype::Float32),
            64 => Some(Datatype::Float64),
            256 => Some(Datatype::Int8),
            512 => Some(Datatype::UInt16),
            768 => Some(Datatype::UInt32),
            1024 => Some(Datatype::Int64),
            1280 => Some(Datatype::UInt64),
            _ => None,
        }
    }

    pub fn code(self) -> i16 {
        match self {
            Datatype::UInt8 => 2,
            Datatype::Int16 => 4,
            Datatype::Int32 => 8,
            Datatype::Float32 => 16,
            Datatype::Float64 => 64,
            Datatype::Int8 => 256,
            Datatype::UInt16 => 512,
            Datatype::UInt32 => 768,
            Datatype::Int64 => 1024,
            Datatype::UInt64 => 1280,
        }
    }

    /// Size of one voxel in the NIfTI data block.
    pub fn byte_width(self) -> usize {
        match self {
            Datatype::Int8 | Datatype::UInt8 => 1,
            Datatype::Int16 | Datatype::UInt16 => 2,
            Datatype::Int32 | Datatype::UInt32 | Datatype::Float32 => 4,
            Datatype::Int64 | Datatype::UInt64 | Datatype::Float64 => 8,
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Datatype::UInt8 | Datatype::UInt16 | Datatype::UInt32 | Datatype::UInt64
        )
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::Int8 => "INT8",
            Datatype::UInt8 => "UINT8",
            Datatype::Int16 => "INT16",
            Datatype::UInt16 => "UINT16",
            Datatype::Int32 => "INT32",
            Datatype::UInt32 => "UINT32",
            Datatype::Float32 => "FLOAT32",
            Datatype::Float64 => "FLOAT64",
            Datatype::Int64 => "INT64",
            Datatype::UInt64 => "UINT64",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotometricInterpretation {
    Monochrome1,
    #[default]
    Monochrome2,
}

impl PhotometricInterpretation {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotometricInterpretation::Monochrome1 => "MONOCHROME1",
            PhotometricInterpretation::Monochrome2 => "MONOCHROME2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CtImageType {
    #[default]
    Axial,
    Localizer,
}

impl CtImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            CtImageType::Axial => "AXIAL",
            CtImageType::Localizer => "LOCALIZER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MrImageType {
    DensityMap,
    DiffusionMap,
    ImageAddition,
    ModulusSubtract,
    Mpr,
    #[default]
    Other,
    PhaseMap,
    PhaseSubtract,
    ProjectionImage,
    T1Map,
    T2Map,
    VelocityMap,
}

impl MrImageType {
    /// Defined term as it goes into Image Type, with spaces between words.
    pub fn as_str(self) -> &'static str {
        match self {
            MrImageType::DensityMap => "DENSITY MAP",
            MrImageType::DiffusionMap => "DIFFUSION MAP",
            MrImageType::ImageAddition => "IMAGE ADDITION",
            MrImageType::ModulusSubtract => "MODULUS SUBTRACT",
            MrImageType::Mpr => "MPR",
            MrImageType::Other => "OTHER",
            MrImageType::PhaseMap => "PHASE MAP",
            MrImageType::PhaseSubtract => "PHASE SUBTRACT",
            MrImageType::ProjectionImage => "PROJECTION IMAGE",
            MrImageType::T1Map => "T1 MAP",
            MrImageType::T2Map => "T2 MAP",
            MrImageType::VelocityMap => "VELOCITY MAP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanningSequence {
    /// Spin echo
    SE,
    /// Inversion recovery
    IR,
    /// Gradient recalled
    GR,
    /// Echo planar
    EP,
    /// Research mode
    #[default]
    RM,
}

impl ScanningSequence {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanningSequence::SE => "SE",
            ScanningSequence::IR => "IR",
            ScanningSequence::GR => "GR",
            ScanningSequence::EP => "EP",
            ScanningSequence::RM => "RM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceVariant {
    /// Segmented k-space
    SK,
    /// Magnetization transfer contrast
    MTC,
    /// Steady state
    SS,
    /// Time reversed steady state
    TRSS,
    /// Spoiled
    SP,
    /// MAG prepared
    MP,
    /// Oversampling phase
    OSP,
    #[default]
    NONE,
}

impl SequenceVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceVariant::SK => "SK",
            SequenceVariant::MTC => "MTC",
            SequenceVariant::SS => "SS",
            SequenceVariant::TRSS => "TRSS",
            SequenceVariant::SP => "SP",
            SequenceVariant::MP => "MP",
            SequenceVariant::OSP => "OSP",
            SequenceVariant::NONE => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPart {
    Abdomen,
    Chest,
    ChestAbdomen,
    WholeBody,
}

impl BodyPart {
    /// Resolve a short anatomy code (`Ab`, `Th`, `ThAb`, `Wb`). Anything
    /// else, `undefined` included, yields `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Ab" => Some(BodyPart::Abdomen),
            "Th" => Some(BodyPart::Chest),
            "ThAb" => Some(BodyPart::ChestAbdomen),
            "Wb" => Some(BodyPart::WholeBody),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BodyPart::Abdomen => "ABDOMEN",
            BodyPart::Chest => "CHEST",
            BodyPart::ChestAbdomen => "CHESTABDOMEN",
            BodyPart::WholeBody => "WHOLEBODY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_codes_map_both_ways() {
        for code in [2, 4, 8, 16, 64, 256, 512, 768, 1024, 1280] {
            let datatype = Datatype::from_code(code).expect("known code");
            assert_eq!(datatype.code(), code);
        }
        // complex64 and rgb24 are not voxel intensities
        assert_eq!(Datatype::from_code(32), None);
        assert_eq!(Datatype::from_code(128), None);
    }

    #[test]
    fn body_part_codes() {
        assert_eq!(BodyPart::from_code("Th"), Some(BodyPart::Chest));
        assert_eq!(BodyPart::from_code("ThAb").map(BodyPart::as_str), Some("CHESTABDOMEN"));
        assert_eq!(BodyPart::from_code("Wb"), Some(BodyPart::WholeBody));
        assert_eq!(BodyPart::from_code("WHOLEBODY"), None);
        assert_eq!(BodyPart::from_code("CHEST"), None);
        assert_eq!(BodyPart::from_code("undefined"), None);
        assert_eq!(BodyPart::from_code("th"), None);
    }

    #[test]
    fn mr_image_type_uses_spaces() {
        assert_eq!(MrImageType::T1Map.as_str(), "T1 MAP");
        assert_eq!(MrImageType::ProjectionImage.as_str(), "PROJECTION IMAGE");
        assert_eq!(MrImageType::default().as_str(), "OTHER");
    }
}
