//! Nature Remo Metrics Exposition
//!
//! Renders a [`Snapshot`] into the Prometheus text format served on `/metrics`.
//!
//! # Metric Families
//!
//! - `natureremo_temperature` - Temperature reading per device
//! - `natureremo_humidity` - Humidity reading per device
//! - `natureremo_illumination` - Illumination reading per device
//! - `natureremo_movement` - Movement reading per device
//! - `natureremo_appliance` - One `natureremo_appliance_<epc>` line per appliance property
//!
//! Every line carries the labels `name`, `firmware_version`, `mac_address` and
//! `serial_number`. Family headers are always written, even for an empty snapshot.
//!
//! The property code is appended to the metric name verbatim. Codes are
//! upstream-defined and are not sanitized.

use crate::error::{ExporterError, Result};
use crate::nature::{Device, NewestEvents, SensorValue};
use crate::store::Snapshot;
use std::fmt::Write;
use std::num::IntErrorKind;
use tracing::trace;

struct SensorFamily {
    name: &'static str,
    help: &'static str,
    reading: fn(&NewestEvents) -> &SensorValue,
}

const SENSOR_FAMILIES: [SensorFamily; 4] = [
    SensorFamily {
        name: "natureremo_temperature",
        help: "Temperature",
        reading: |e| &e.temperature,
    },
    SensorFamily {
        name: "natureremo_humidity",
        help: "Humidity",
        reading: |e| &e.humidity,
    },
    SensorFamily {
        name: "natureremo_illumination",
        help: "Illumination",
        reading: |e| &e.illumination,
    },
    SensorFamily {
        name: "natureremo_movement",
        help: "Movement",
        reading: |e| &e.movement,
    },
];

const APPLIANCE_FAMILY: &str = "natureremo_appliance";

/// Render the snapshot as Prometheus text exposition
///
/// Pure function of its input: the same snapshot always yields the same bytes.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for family in &SENSOR_FAMILIES {
        write_header(&mut out, family.name, family.help);
        for device in snapshot.devices() {
            write_sensor_line(&mut out, family, device);
        }
    }

    write_header(&mut out, APPLIANCE_FAMILY, "Appliance");
    for appliance in snapshot.appliances() {
        for property in &appliance.properties {
            let _ = writeln!(
                out,
                "{}_{}{{{}}} {}",
                APPLIANCE_FAMILY,
                property.code,
                labels(
                    &appliance.name,
                    &appliance.device.firmware_version,
                    &appliance.device.mac_address,
                    &appliance.device.serial_number,
                ),
                parse_property_value(&property.value),
            );
        }
    }

    out
}

/// Decode a base-16 property value
pub fn decode_property_value(raw: &str) -> Result<i64> {
    Ok(i64::from_str_radix(raw, 16)?)
}

/// Like [`decode_property_value`], but never fails
///
/// Out-of-range values saturate at `i64::MAX` / `i64::MIN`; anything else that
/// does not decode renders as 0 so a single odd property never breaks a scrape.
pub fn parse_property_value(raw: &str) -> i64 {
    match decode_property_value(raw) {
        Ok(value) => value,
        Err(ExporterError::PropertyParse(e)) if *e.kind() == IntErrorKind::PosOverflow => {
            trace!("Saturating property value {:?}: {}", raw, e);
            i64::MAX
        }
        Err(ExporterError::PropertyParse(e)) if *e.kind() == IntErrorKind::NegOverflow => {
            trace!("Saturating property value {:?}: {}", raw, e);
            i64::MIN
        }
        Err(e) => {
            trace!("Rendering property value {:?} as 0: {}", raw, e);
            0
        }
    }
}

fn write_header(out: &mut String, name: &str, help: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} gauge", name);
}

fn write_sensor_line(out: &mut String, family: &SensorFamily, device: &Device) {
    let _ = writeln!(
        out,
        "{}{{{}}} {}",
        family.name,
        labels(
            &device.name,
            &device.firmware_version,
            &device.mac_address,
            &device.serial_number,
        ),
        format_value((family.reading)(&device.newest_events).value),
    );
}

fn labels(name: &str, firmware_version: &str, mac_address: &str, serial_number: &str) -> String {
    format!(
        "name=\"{}\",firmware_version=\"{}\",mac_address=\"{}\",serial_number=\"{}\"",
        escape_label_value(name),
        escape_label_value(firmware_version),
        escape_label_value(mac_address),
        escape_label_value(serial_number),
    )
}

/// Escape a label value for the text format (`\`, `"` and newline only)
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Six-decimal fixed notation, with the text format's spelling of NaN and infinities
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        format!("{:.6}", value)
    }
}
