use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Attribute files read from a battery directory, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    CycleCount,
    Manufacturer,
    ModelName,
    SerialNumber,
    Technology,
    VoltageNow,
    VoltageMaxDesign,
    ChargeFull,
    ChargeFullDesign,
    Capacity,
    Status,
    Health,
    Present,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::CycleCount,
        Attribute::Manufacturer,
        Attribute::ModelName,
        Attribute::SerialNumber,
        Attribute::Technology,
        Attribute::VoltageNow,
        Attribute::VoltageMaxDesign,
        Attribute::ChargeFull,
        Attribute::ChargeFullDesign,
        Attribute::Capacity,
        Attribute::Status,
        Attribute::Health,
        Attribute::Present,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Attribute::CycleCount => "cycle_count",
            Attribute::Manufacturer => "manufacturer",
            Attribute::ModelName => "model_name",
            Attribute::SerialNumber => "serial_number",
            Attribute::Technology => "technology",
            Attribute::VoltageNow => "voltage_now",
            Attribute::VoltageMaxDesign => "voltage_max_design",
            Attribute::ChargeFull => "charge_full",
            Attribute::ChargeFullDesign => "charge_full_design",
            Attribute::Capacity => "capacity",
            Attribute::Status => "status",
            Attribute::Health => "health",
            Attribute::Present => "present",
        }
    }

    pub fn label(self) -> String {
        title_case(self.file_name())
    }
}

/// Result of reading one attribute file.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Value(String),
    /// The file exists but could not be read; holds the cause.
    Error(String),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(value) => f.write_str(value),
            Reading::Error(cause) => write!(f, "Error reading: {}", cause),
        }
    }
}

/// How the `cycle_count` attribute of one battery turned out.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleCountReading {
    Parsed(i64),
    Unparsable(String),
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryInfo {
    attributes: BTreeMap<Attribute, Reading>,
}

impl BatteryInfo {
    pub fn insert(&mut self, attribute: Attribute, reading: Reading) {
        self.attributes.insert(attribute, reading);
    }

    pub fn get(&self, attribute: Attribute) -> Option<&Reading> {
        self.attributes.get(&attribute)
    }

    /// The value of `attribute`, if it was read successfully.
    pub fn value(&self, attribute: Attribute) -> Option<&str> {
        match self.attributes.get(&attribute)? {
            Reading::Value(value) => Some(value),
            Reading::Error(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &Reading)> {
        self.attributes.iter().map(|(attribute, reading)| (*attribute, reading))
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn cycle_count(&self) -> CycleCountReading {
        match self.get(Attribute::CycleCount) {
            None => CycleCountReading::Missing,
            Some(Reading::Value(raw)) => match raw.parse::<i64>() {
                Ok(count) => CycleCountReading::Parsed(count),
                Err(_) => CycleCountReading::Unparsable(raw.clone()),
            },
            Some(reading @ Reading::Error(_)) => CycleCountReading::Unparsable(reading.to_string()),
        }
    }
}

/// A directory whose `type` attribute reads "Battery".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryPath(PathBuf);

impl BatteryPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for BatteryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DmiField {
    SysVendor,
    ProductName,
    ProductVersion,
}

impl DmiField {
    pub const ALL: [DmiField; 3] = [
        DmiField::SysVendor,
        DmiField::ProductName,
        DmiField::ProductVersion,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DmiField::SysVendor => "sys_vendor",
            DmiField::ProductName => "product_name",
            DmiField::ProductVersion => "product_version",
        }
    }

    pub fn label(self) -> String {
        title_case(self.file_name())
    }
}

pub type SystemInfo = BTreeMap<DmiField, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wear {
    Excellent,
    Good,
    Moderate,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    ThinkPad { optimized: bool },
    Other,
}

/// `voltage_max_design` -> `Voltage Max Design`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
