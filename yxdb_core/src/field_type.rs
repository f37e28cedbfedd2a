//! The closed field-type registry: a bidirectional map between [`FieldType`]
//! and its canonical string spelling.

/// Every column type the YXDB metadata format can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    FixedDecimal,
    Float,
    Double,
    String,
    WString,
    VString,
    VWString,
    Date,
    Time,
    DateTime,
    Blob,
    SpatialObj,
    /// Absorbs any type string not in the canonical list. Reverse lookup
    /// (decode) only; this variant can't be written back out as a single
    /// canonical string, because the original spelling wasn't captured.
    Unknown,
}

impl FieldType {
    /// Canonical string spelling, as written to metadata XML.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Bool => "Bool",
            FieldType::Byte => "Byte",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::FixedDecimal => "FixedDecimal",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::String => "String",
            FieldType::WString => "WString",
            FieldType::VString => "V_String",
            FieldType::VWString => "V_WString",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::Blob => "Blob",
            FieldType::SpatialObj => "SpatialObj",
            FieldType::Unknown => "Unknown",
        }
    }

    /// Parse a metadata type string. Unrecognized spellings map to
    /// [`FieldType::Unknown`] rather than failing.
    pub fn from_str(s: &str) -> Self {
        match s {
            "Bool" => FieldType::Bool,
            "Byte" => FieldType::Byte,
            "Int16" => FieldType::Int16,
            "Int32" => FieldType::Int32,
            "Int64" => FieldType::Int64,
            "FixedDecimal" => FieldType::FixedDecimal,
            "Float" => FieldType::Float,
            "Double" => FieldType::Double,
            "String" => FieldType::String,
            "WString" => FieldType::WString,
            "V_String" => FieldType::VString,
            "V_WString" => FieldType::VWString,
            "Date" => FieldType::Date,
            "Time" => FieldType::Time,
            "DateTime" => FieldType::DateTime,
            "Blob" => FieldType::Blob,
            "SpatialObj" => FieldType::SpatialObj,
            other => {
                tracing::debug!(type_str = other, "unrecognized field type, mapping to Unknown");
                FieldType::Unknown
            }
        }
    }
}
