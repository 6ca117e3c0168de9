use std::io::{self, Write};

use crate::battery::Scan;
use crate::config::WearThresholds;
use crate::types::{
    Attribute, BatteryInfo, Compatibility, CycleCountReading, SystemInfo, Wear,
};

const TITLE: &str = "BatteryCycleCount - ThinkPad Battery Monitor";

/// `charge_full / charge_full_design` as a percentage, when both are integers
/// and the design capacity is non-zero.
pub fn health_percentage(info: &BatteryInfo) -> Option<f64> {
    let full: i64 = info.value(Attribute::ChargeFull)?.parse().ok()?;
    let design: i64 = info.value(Attribute::ChargeFullDesign)?.parse().ok()?;
    if design == 0 {
        return None;
    }
    Some(full as f64 / design as f64 * 100.0)
}

pub fn classify(cycle_count: i64, thresholds: &WearThresholds) -> Wear {
    if cycle_count < thresholds.excellent {
        Wear::Excellent
    } else if cycle_count < thresholds.good {
        Wear::Good
    } else if cycle_count < thresholds.moderate {
        Wear::Moderate
    } else {
        Wear::Replace
    }
}

impl Wear {
    pub fn message(self) -> &'static str {
        match self {
            Wear::Excellent => "✓ Battery is in excellent condition",
            Wear::Good => "✓ Battery is in good condition",
            Wear::Moderate => "⚠ Battery is showing moderate wear",
            Wear::Replace => "⚠ Battery may need replacement soon",
        }
    }
}

pub struct Reporter<W> {
    out: W,
    thresholds: WearThresholds,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, thresholds: WearThresholds) -> Self {
        Self { out, thresholds }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", TITLE)?;
        writeln!(self.out, "{}", "=".repeat(45))
    }

    pub fn system(&mut self, info: &SystemInfo) -> io::Result<()> {
        let Some(verdict) = crate::dmi::compatibility(info) else {
            return Ok(());
        };

        writeln!(self.out, "\n=== System Information ===")?;
        for (field, value) in info {
            writeln!(self.out, "{}: {}", field.label(), value)?;
        }

        match verdict {
            Compatibility::ThinkPad { optimized } => {
                writeln!(self.out, "✓ ThinkPad system detected")?;
                if optimized {
                    writeln!(
                        self.out,
                        "✓ ThinkPad 14s Gen 3 detected - this tool is optimized for your system"
                    )?;
                }
            }
            Compatibility::Other => {
                writeln!(self.out, "⚠ This tool is optimized for ThinkPad laptops")?;
            }
        }
        Ok(())
    }

    /// Replays what the scan did, path by path.
    pub fn scan(&mut self, scan: &Scan) -> io::Result<()> {
        if !scan.found_battery() {
            writeln!(self.out, "No battery found in the system.")?;
        }

        for attempt in &scan.attempts {
            writeln!(self.out, "Reading battery information from: {}", attempt.path)?;
            match &attempt.cycle_count {
                CycleCountReading::Parsed(count) => {
                    writeln!(self.out, "Battery cycle count: {}", count)?
                }
                CycleCountReading::Unparsable(raw) => {
                    writeln!(self.out, "Could not parse cycle count: {}", raw)?
                }
                CycleCountReading::Missing => {
                    writeln!(self.out, "Cycle count not available in this battery path.")?
                }
            }
        }

        if scan.found_battery() && scan.cycle_count.is_none() {
            writeln!(self.out, "Trying fallback methods...")?;
        }
        if let Some(fallback) = &scan.fallback {
            writeln!(self.out, "Fallback information: {}", fallback)?;
        }
        Ok(())
    }

    pub fn details(&mut self, info: Option<&BatteryInfo>) -> io::Result<()> {
        let Some(info) = info.filter(|info| !info.is_empty()) else {
            return writeln!(self.out, "No battery information available.");
        };

        writeln!(self.out, "\n=== Detailed Battery Information ===")?;
        for (attribute, reading) in info.iter() {
            writeln!(self.out, "{}: {}", attribute.label(), reading)?;
        }
        if let Some(health) = health_percentage(info) {
            writeln!(self.out, "Battery Health: {:.1}%", health)?;
        }
        Ok(())
    }

    pub fn summary(&mut self, cycle_count: Option<i64>) -> io::Result<()> {
        match cycle_count {
            Some(count) => {
                writeln!(self.out, "\n🔋 Battery Cycle Count: {}", count)?;
                writeln!(self.out, "{}", classify(count, &self.thresholds).message())
            }
            None => {
                writeln!(self.out, "❌ Could not determine battery cycle count")?;
                writeln!(self.out, "\nTroubleshooting tips:")?;
                writeln!(self.out, "1. Make sure you're running this on a laptop with a battery")?;
                writeln!(self.out, "2. Try running with sudo if you get permission errors")?;
                writeln!(self.out, "3. Check if 'acpi' or 'upower' packages are installed")?;
                writeln!(self.out, "4. For ThinkPad laptops, consider installing 'tp-smapi-dkms'")
            }
        }
    }

    /// Single-line form for status bars.
    pub fn short(&mut self, cycle_count: Option<i64>) -> io::Result<()> {
        match cycle_count {
            Some(count) => writeln!(self.out, "Bat:{}", count),
            None => writeln!(self.out, "Bat:N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::PathAttempt;
    use crate::types::{BatteryPath, DmiField, Reading};

    fn render(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new(), WearThresholds::default());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn info(pairs: &[(Attribute, &str)]) -> BatteryInfo {
        let mut info = BatteryInfo::default();
        for (attribute, value) in pairs {
            info.insert(*attribute, Reading::Value(value.to_string()));
        }
        info
    }

    #[test]
    fn health_from_charge_ratio() {
        let info = info(&[
            (Attribute::ChargeFull, "4500000"),
            (Attribute::ChargeFullDesign, "4730000"),
        ]);
        let health = health_percentage(&info).unwrap();
        assert_eq!(format!("{:.1}", health), "95.1");
    }

    #[test]
    fn health_needs_integers_and_non_zero_design() {
        assert_eq!(health_percentage(&info(&[(Attribute::ChargeFull, "4500000")])), None);
        assert_eq!(
            health_percentage(&info(&[
                (Attribute::ChargeFull, "4500000"),
                (Attribute::ChargeFullDesign, "0"),
            ])),
            None
        );
        assert_eq!(
            health_percentage(&info(&[
                (Attribute::ChargeFull, "n/a"),
                (Attribute::ChargeFullDesign, "4730000"),
            ])),
            None
        );
    }

    #[test]
    fn wear_brackets_are_exclusive_above() {
        let t = WearThresholds::default();
        assert_eq!(classify(-1, &t), Wear::Excellent);
        assert_eq!(classify(0, &t), Wear::Excellent);
        assert_eq!(classify(127, &t), Wear::Excellent);
        assert_eq!(classify(299, &t), Wear::Excellent);
        assert_eq!(classify(300, &t), Wear::Good);
        assert_eq!(classify(499, &t), Wear::Good);
        assert_eq!(classify(500, &t), Wear::Moderate);
        assert_eq!(classify(999, &t), Wear::Moderate);
        assert_eq!(classify(1000, &t), Wear::Replace);
    }

    #[test]
    fn summary_with_count() {
        let text = render(|r| r.summary(Some(127)));
        assert!(text.contains("Battery Cycle Count: 127"));
        assert!(text.contains("excellent condition"));
    }

    #[test]
    fn summary_without_count_gives_tips() {
        let text = render(|r| r.summary(None));
        assert!(text.contains("Could not determine battery cycle count"));
        assert!(text.contains("tp-smapi-dkms"));
    }

    #[test]
    fn details_list_attributes_and_health() {
        let info = info(&[
            (Attribute::CycleCount, "127"),
            (Attribute::ModelName, "02DL020"),
            (Attribute::ChargeFull, "4500000"),
            (Attribute::ChargeFullDesign, "4730000"),
        ]);
        let text = render(|r| r.details(Some(&info)));
        assert!(text.contains("Cycle Count: 127\n"));
        assert!(text.contains("Model Name: 02DL020\n"));
        assert!(text.contains("Charge Full Design: 4730000\n"));
        assert!(text.contains("Battery Health: 95.1%\n"));
    }

    #[test]
    fn details_without_info() {
        let text = render(|r| r.details(None));
        assert_eq!(text, "No battery information available.\n");
    }

    #[test]
    fn scan_without_battery_mentions_it() {
        let scan = Scan {
            fallback: Some("Battery 0: Full, 100%".into()),
            ..Scan::default()
        };
        let text = render(|r| r.scan(&scan));
        assert!(text.starts_with("No battery found in the system.\n"));
        assert!(text.contains("Fallback information: Battery 0: Full, 100%"));
        assert!(!text.contains("Trying fallback methods"));
    }

    #[test]
    fn scan_replays_each_attempt() {
        let scan = Scan {
            attempts: vec![
                PathAttempt {
                    path: BatteryPath::new("/sys/class/power_supply/BAT0"),
                    cycle_count: CycleCountReading::Unparsable("unknown".into()),
                },
                PathAttempt {
                    path: BatteryPath::new("/sys/class/power_supply/BAT1"),
                    cycle_count: CycleCountReading::Missing,
                },
            ],
            ..Scan::default()
        };
        let text = render(|r| r.scan(&scan));
        assert_eq!(
            text,
            "Reading battery information from: /sys/class/power_supply/BAT0\n\
             Could not parse cycle count: unknown\n\
             Reading battery information from: /sys/class/power_supply/BAT1\n\
             Cycle count not available in this battery path.\n\
             Trying fallback methods...\n"
        );
    }

    #[test]
    fn system_section_for_thinkpad() {
        let info = SystemInfo::from([
            (DmiField::SysVendor, "LENOVO".to_string()),
            (DmiField::ProductName, "ThinkPad 14s Gen 3".to_string()),
        ]);
        let text = render(|r| r.system(&info));
        assert!(text.contains("Sys Vendor: LENOVO\n"));
        assert!(text.contains("✓ ThinkPad system detected"));
        assert!(text.contains("optimized for your system"));
    }

    #[test]
    fn system_section_skipped_without_dmi() {
        assert_eq!(render(|r| r.system(&SystemInfo::new())), "");
    }

    #[test]
    fn short_form() {
        assert_eq!(render(|r| r.short(Some(42))), "Bat:42\n");
        assert_eq!(render(|r| r.short(None)), "Bat:N/A\n");
    }
}
