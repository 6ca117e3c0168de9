use crate::sysfs::{read_trimmed, Sysfs};
use crate::types::{Compatibility, DmiField, SystemInfo};

pub const DMI_DIR: &str = "/sys/class/dmi/id";

/// Best-effort read of vendor, product name and product version.
/// Unreadable fields are left out.
pub fn read_system_info(sysfs: &Sysfs) -> SystemInfo {
    let dir = sysfs.resolve(DMI_DIR);
    DmiField::ALL
        .into_iter()
        .filter_map(|field| {
            let path = dir.join(field.file_name());
            if !path.exists() {
                return None;
            }
            match read_trimmed(&path) {
                Ok(value) => Some((field, value)),
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", path, e);
                    None
                }
            }
        })
        .collect()
}

/// `None` when no identification could be read at all.
pub fn compatibility(info: &SystemInfo) -> Option<Compatibility> {
    if info.is_empty() {
        return None;
    }

    let vendor = info
        .get(&DmiField::SysVendor)
        .map(|v| v.to_lowercase())
        .unwrap_or_default();
    let product = info
        .get(&DmiField::ProductName)
        .map(|p| p.to_lowercase())
        .unwrap_or_default();

    if vendor.contains("lenovo") && product.contains("thinkpad") {
        Some(Compatibility::ThinkPad {
            optimized: product.contains("14s gen 3"),
        })
    } else {
        Some(Compatibility::Other)
    }
}
