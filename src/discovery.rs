use std::fs;
use std::path::{Path, PathBuf};

use crate::sysfs::{read_trimmed, Sysfs};
use crate::types::BatteryPath;

/// Generic power-supply class entries.
pub const POWER_SUPPLY_PATTERN: &str = "/sys/class/power_supply/BAT*";
/// ThinkPad `tp_smapi` batteries; the match is a file inside the battery directory.
pub const SMAPI_PATTERN: &str = "/sys/devices/platform/smapi/BAT*/cycle_count";
/// ACPI control-method batteries below the PCI root bridge.
pub const ACPI_PATTERN: &str =
    "/sys/devices/LNXSYSTM:*/LNXSYBUS:*/PNP0A08:*/device:*/PNP0C0A:*/power_supply/BAT*";

/// All candidate locations, power-supply class first, then smapi, then ACPI.
pub fn candidates(sysfs: &Sysfs) -> Vec<PathBuf> {
    let mut paths = sysfs.glob(POWER_SUPPLY_PATTERN);
    paths.extend(
        sysfs
            .glob(SMAPI_PATTERN)
            .into_iter()
            .filter_map(|file| file.parent().map(Path::to_path_buf)),
    );
    paths.extend(sysfs.glob(ACPI_PATTERN));
    paths
}

/// Whether `path` is a directory whose `type` attribute reads "Battery".
pub fn is_battery(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    match read_trimmed(&path.join("type")) {
        Ok(kind) => kind == "Battery",
        Err(e) => {
            tracing::debug!("Ignoring {:?}: {}", path, e);
            false
        }
    }
}

/// Validated battery directories in discovery order.
///
/// Never fails: missing trees and permission errors simply produce fewer
/// results. A directory reachable through several layouts is listed once.
pub fn discover(sysfs: &Sysfs) -> Vec<BatteryPath> {
    let mut seen: Vec<PathBuf> = Vec::new();
    let mut batteries = Vec::new();

    for path in candidates(sysfs) {
        if !is_battery(&path) {
            continue;
        }
        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if seen.contains(&canonical) {
            tracing::debug!("{:?} already discovered via another path", path);
            continue;
        }
        seen.push(canonical);
        batteries.push(BatteryPath::new(path));
    }

    tracing::debug!("Discovered {} battery path(s)", batteries.len());
    batteries
}
