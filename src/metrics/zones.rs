//! Power and heart rate zone calculations.
//!
//! Both tables use five contiguous zones derived from a single threshold
//! value: FTP for power (Coggan breakpoints) and LTHR for heart rate
//! (Friel breakpoints). Zone 5 is open-ended.

use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, ComplianceResult};

/// Lower bounds of zones 2-5 as a fraction of FTP.
const POWER_ZONE_STARTS: [f64; 4] = [0.55, 0.76, 0.91, 1.06];
/// Upper bounds of zones 2-4 as a fraction of FTP.
const POWER_ZONE_ENDS: [f64; 3] = [0.75, 0.90, 1.05];

/// Lower bounds of zones 2-5 as a fraction of LTHR.
const HR_ZONE_STARTS: [f64; 4] = [0.81, 0.90, 0.94, 1.00];
/// Upper bounds of zones 2-4 as a fraction of LTHR.
const HR_ZONE_ENDS: [f64; 3] = [0.89, 0.93, 0.99];

/// A single zone range in watts or bpm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRange {
    /// Zone number (1-5)
    pub zone: u8,
    /// Inclusive lower bound
    pub min: u32,
    /// Inclusive upper bound (`None` = no upper limit)
    pub max: Option<u32>,
}

/// Five-zone power table derived from FTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZones {
    /// Zone 1: Active Recovery (< 55% FTP)
    #[serde(rename = "z1")]
    pub z1_recovery: ZoneRange,
    /// Zone 2: Endurance (55-75% FTP)
    #[serde(rename = "z2")]
    pub z2_endurance: ZoneRange,
    /// Zone 3: Tempo (76-90% FTP)
    #[serde(rename = "z3")]
    pub z3_tempo: ZoneRange,
    /// Zone 4: Threshold (91-105% FTP)
    #[serde(rename = "z4")]
    pub z4_threshold: ZoneRange,
    /// Zone 5: VO2max and above (> 105% FTP)
    #[serde(rename = "z5")]
    pub z5_vo2max: ZoneRange,
}

impl PowerZones {
    /// Calculate power zones from FTP.
    ///
    /// Fails with `InvalidConfiguration` unless `ftp` is a positive, finite number.
    pub fn from_ftp(ftp: f64) -> ComplianceResult<Self> {
        if !(ftp.is_finite() && ftp > 0.0) {
            return Err(ComplianceError::invalid_ftp(ftp));
        }

        let [z1, z2, z3, z4, z5] = build_ranges(ftp, POWER_ZONE_STARTS, POWER_ZONE_ENDS);
        Ok(Self {
            z1_recovery: z1,
            z2_endurance: z2,
            z3_tempo: z3,
            z4_threshold: z4,
            z5_vo2max: z5,
        })
    }

    /// Get the zone (1-5) for a power value.
    pub fn zone_for(&self, power: f64) -> u8 {
        zone_for(&self.all(), power)
    }

    /// Get the zone range for a given zone number (1-5).
    pub fn range(&self, zone: u8) -> Option<&ZoneRange> {
        match zone {
            1 => Some(&self.z1_recovery),
            2 => Some(&self.z2_endurance),
            3 => Some(&self.z3_tempo),
            4 => Some(&self.z4_threshold),
            5 => Some(&self.z5_vo2max),
            _ => None,
        }
    }

    /// Get all zones in ascending order.
    pub fn all(&self) -> [&ZoneRange; 5] {
        [
            &self.z1_recovery,
            &self.z2_endurance,
            &self.z3_tempo,
            &self.z4_threshold,
            &self.z5_vo2max,
        ]
    }
}

/// Five-zone heart rate table derived from lactate threshold heart rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HRZones {
    /// Zone 1: Recovery (< 81% LTHR)
    #[serde(rename = "z1")]
    pub z1_recovery: ZoneRange,
    /// Zone 2: Aerobic (81-89% LTHR)
    #[serde(rename = "z2")]
    pub z2_aerobic: ZoneRange,
    /// Zone 3: Tempo (90-93% LTHR)
    #[serde(rename = "z3")]
    pub z3_tempo: ZoneRange,
    /// Zone 4: Threshold (94-99% LTHR)
    #[serde(rename = "z4")]
    pub z4_threshold: ZoneRange,
    /// Zone 5: Above threshold (>= 100% LTHR)
    #[serde(rename = "z5")]
    pub z5_maximum: ZoneRange,
}

impl HRZones {
    /// Calculate heart rate zones from LTHR.
    pub fn from_lthr(lthr: f64) -> ComplianceResult<Self> {
        if !(lthr.is_finite() && lthr > 0.0) {
            return Err(ComplianceError::InvalidConfiguration(format!(
                "LTHR must be greater than 0, got {}",
                lthr
            )));
        }

        let [z1, z2, z3, z4, z5] = build_ranges(lthr, HR_ZONE_STARTS, HR_ZONE_ENDS);
        Ok(Self {
            z1_recovery: z1,
            z2_aerobic: z2,
            z3_tempo: z3,
            z4_threshold: z4,
            z5_maximum: z5,
        })
    }

    /// Get the zone (1-5) for a heart rate value.
    pub fn zone_for(&self, hr: f64) -> u8 {
        zone_for(&self.all(), hr)
    }

    /// Get the zone range for a given zone number (1-5).
    pub fn range(&self, zone: u8) -> Option<&ZoneRange> {
        match zone {
            1 => Some(&self.z1_recovery),
            2 => Some(&self.z2_aerobic),
            3 => Some(&self.z3_tempo),
            4 => Some(&self.z4_threshold),
            5 => Some(&self.z5_maximum),
            _ => None,
        }
    }

    /// Get all zones in ascending order.
    pub fn all(&self) -> [&ZoneRange; 5] {
        [
            &self.z1_recovery,
            &self.z2_aerobic,
            &self.z3_tempo,
            &self.z4_threshold,
            &self.z5_maximum,
        ]
    }
}

/// Classify a declared target range (percent of threshold) into a zone.
///
/// The midpoint is what counts: an 88-93% "sweet spot" target averages
/// 90.5% and is therefore treated as threshold work (zone 4).
pub fn target_zone(low_pct: f64, high_pct: f64) -> u8 {
    let avg = (low_pct + high_pct) / 2.0;
    match avg {
        a if a < 55.0 => 1,
        a if a <= 75.0 => 2,
        a if a <= 90.0 => 3,
        a if a <= 105.0 => 4,
        _ => 5,
    }
}

/// First zone whose upper bound is at or above `value`, else zone 5.
fn zone_for(zones: &[&ZoneRange; 5], value: f64) -> u8 {
    zones
        .iter()
        .find(|range| range.max.map_or(true, |max| value <= max as f64))
        .map(|range| range.zone)
        .unwrap_or(5)
}

/// Build five monotone ranges from threshold fractions.
///
/// Each min is pushed above the previous max and each max is kept at or
/// above its own min, so rounding ties never produce overlapping zones.
fn build_ranges(threshold: f64, starts: [f64; 4], ends: [f64; 3]) -> [ZoneRange; 5] {
    let at = |fraction: f64| (threshold * fraction).round() as u32;

    let raw: [(u32, Option<u32>); 5] = [
        (0, Some(at(starts[0]).saturating_sub(1))),
        (at(starts[0]), Some(at(ends[0]))),
        (at(starts[1]), Some(at(ends[1]))),
        (at(starts[2]), Some(at(ends[2]))),
        (at(starts[3]), None),
    ];

    let mut prev_max: Option<u32> = None;
    let mut ranges = [ZoneRange {
        zone: 0,
        min: 0,
        max: None,
    }; 5];

    for (idx, (raw_min, raw_max)) in raw.into_iter().enumerate() {
        let min = match prev_max {
            Some(prev) => raw_min.max(prev + 1),
            None => raw_min,
        };
        let max = raw_max.map(|m| m.max(min));
        ranges[idx] = ZoneRange {
            zone: idx as u8 + 1,
            min,
            max,
        };
        prev_max = max;
    }

    ranges
}
