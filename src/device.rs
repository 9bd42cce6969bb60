//! Device and environment probing.
//!
//! All probes are best-effort: anything that cannot be determined is
//! reported as [`UNKNOWN`] instead of failing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder for facts that could not be probed.
pub const UNKNOWN: &str = "unknown";

/// Static descriptive facts about the host device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub device_name: String,
    pub device_model: String,
    pub os_version: String,
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self {
            device_name: UNKNOWN.to_string(),
            device_model: UNKNOWN.to_string(),
            os_version: UNKNOWN.to_string(),
        }
    }
}

/// Read-only source of device and environment facts.
pub trait DeviceProbe: Send + Sync {
    /// Device name, model and operating system.
    fn device_metrics(&self) -> DeviceMetrics;

    /// IANA timezone name (e.g. `Europe/Helsinki`).
    fn timezone(&self) -> String;

    /// Preferred UI language (e.g. `en-US`).
    fn language(&self) -> String {
        UNKNOWN.to_string()
    }
}

/// Probe backed by the running operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl SystemProbe {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceProbe for SystemProbe {
    fn device_metrics(&self) -> DeviceMetrics {
        let device_name = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let os_version = match (sysinfo::System::name(), sysinfo::System::os_version()) {
            (Some(name), Some(version)) => format!("{name} {version}"),
            (Some(name), None) => name,
            _ => std::env::consts::OS.to_string(),
        };

        DeviceMetrics {
            device_name,
            device_model: std::env::consts::ARCH.to_string(),
            os_version,
        }
    }

    fn timezone(&self) -> String {
        // TZ overrides the system zone, as it does for chrono's Local
        std::env::var("TZ")
            .ok()
            .and_then(|tz| timezone_from_tz_var(&tz))
            .or_else(|| {
                iana_time_zone::get_timezone()
                    .ok()
                    .and_then(|tz| valid_timezone(&tz))
            })
            .unwrap_or_else(|| chrono_tz::Tz::UTC.to_string())
    }

    fn language(&self) -> String {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| normalize_locale(&value))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Return the canonical zone name if `name` is a known IANA timezone.
pub fn valid_timezone(name: &str) -> Option<String> {
    // POSIX allows a leading ':' in TZ
    let name = name.trim().trim_start_matches(':');
    chrono_tz::Tz::from_str(name).ok().map(|tz| tz.name().to_string())
}

/// Zone name from a `TZ` value: a bare name (`Asia/Tokyo`) or a zoneinfo
/// file path (`:/usr/share/zoneinfo/Asia/Tokyo`).
pub fn timezone_from_tz_var(value: &str) -> Option<String> {
    let value = value.trim().trim_start_matches(':');
    match value.rfind("zoneinfo/") {
        Some(idx) => valid_timezone(&value[idx + "zoneinfo/".len()..]),
        None => valid_timezone(value),
    }
}

/// Turn a POSIX locale such as `en_US.UTF-8` into a language tag `en-US`.
fn normalize_locale(value: &str) -> Option<String> {
    let base = value.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// Current local UTC offset formatted as `+HH:MM` / `-HH:MM`.
pub fn utc_offset() -> String {
    let seconds = chrono::Local::now().offset().local_minus_utc();
    format_offset(seconds)
}

fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}
