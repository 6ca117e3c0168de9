use crate::config::Config;
use crate::discovery;
use crate::fallback::{CommandRunner, FallbackProber};
use crate::sysfs::{read_trimmed, Sysfs};
use crate::types::{Attribute, BatteryInfo, BatteryPath, CycleCountReading, Reading};

impl BatteryInfo {
    /// Reads every known attribute under `battery_path`.
    ///
    /// Absent files are left out; files that exist but cannot be read are
    /// kept with the error as their value.
    pub fn read_from_sysfs(battery_path: &BatteryPath) -> Self {
        let mut info = BatteryInfo::default();

        for attribute in Attribute::ALL {
            let path = battery_path.as_path().join(attribute.file_name());
            if !path.exists() {
                continue;
            }
            let reading = match read_trimmed(&path) {
                Ok(value) => Reading::Value(value),
                Err(e) => {
                    tracing::debug!("Failed to read {:?}: {}", path, e);
                    Reading::Error(e.to_string())
                }
            };
            info.insert(attribute, reading);
        }

        info
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathAttempt {
    pub path: BatteryPath,
    pub cycle_count: CycleCountReading,
}

/// Everything one run learned, in the order it was learned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    pub attempts: Vec<PathAttempt>,
    /// Attributes of the battery that produced `cycle_count`, or of the
    /// last battery tried when none did.
    pub info: Option<BatteryInfo>,
    pub cycle_count: Option<i64>,
    /// Free text from `acpi`/`upower`; only set when sysfs gave no count.
    pub fallback: Option<String>,
}

impl Scan {
    pub fn found_battery(&self) -> bool {
        !self.attempts.is_empty()
    }
}

pub struct BatteryReader<R> {
    sysfs: Sysfs,
    prober: Option<FallbackProber<R>>,
}

impl<R: CommandRunner> BatteryReader<R> {
    pub fn new(config: &Config, runner: R) -> Self {
        let prober = config
            .fallback
            .enabled
            .then(|| FallbackProber::new(runner, &config.fallback));
        Self {
            sysfs: Sysfs::new(&config.root),
            prober,
        }
    }

    /// Walks discovered batteries until one reports a parsable cycle count,
    /// then falls back to external tools if none did.
    pub fn scan(&self) -> Scan {
        let mut scan = Scan::default();

        for path in discovery::discover(&self.sysfs) {
            let info = BatteryInfo::read_from_sysfs(&path);
            let cycle_count = info.cycle_count();

            match &cycle_count {
                CycleCountReading::Parsed(count) => {
                    tracing::debug!("{} reports {} cycles", path, count);
                    scan.cycle_count = Some(*count);
                }
                CycleCountReading::Unparsable(raw) => {
                    tracing::warn!("Could not parse cycle count {:?} from {}", raw, path);
                }
                CycleCountReading::Missing => {
                    tracing::debug!("{} has no cycle_count attribute", path);
                }
            }

            scan.info = Some(info);
            scan.attempts.push(PathAttempt { path, cycle_count });
            if scan.cycle_count.is_some() {
                return scan;
            }
        }

        scan.fallback = self.prober.as_ref().and_then(FallbackProber::probe);
        scan
    }
}
