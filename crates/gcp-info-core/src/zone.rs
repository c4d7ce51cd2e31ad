//! Zone and region name handling.
//!
//! Compute Engine zones are named `<region>-<suffix>` (`us-central1-a`), so a
//! region is recovered by dropping the last hyphen-separated segment.

/// Return the bare zone name from either a zone name or a zone resource URL.
///
/// The Compute API reports an instance's zone as
/// `https://www.googleapis.com/compute/v1/projects/<p>/zones/<zone>`, while
/// `gcloud --format value(zone)` already prints the bare name.
pub fn zone_name(zone: &str) -> &str {
    let trimmed = zone.trim().trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, name)) => name,
        None => trimmed,
    }
}

/// Derive the region a zone belongs to.
///
/// Returns `None` when the zone has no `-<suffix>` segment to strip, or when
/// either side of the last hyphen is empty.
pub fn region_from_zone(zone: &str) -> Option<String> {
    let name = zone_name(zone);
    let (region, suffix) = name.rsplit_once('-')?;
    if region.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(region.to_owned())
}
