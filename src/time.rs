use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::constants::{MJD_TIDE_EPOCH, MJD};

/// Transformation from dates in the format YYYY-MM-ddTHH:mm:ss to days relative
/// to the ocean tide epoch (1992-01-01T00:00:00)
///
/// Argument
/// --------
/// * `date`: a slice of dates in the format YYYY-MM-ddTHH:mm:ss
///
/// Return
/// ------
/// * a vector of float representing the input dates in tide epoch days
pub fn date_to_tide_days(date: &[&str]) -> Vec<f64> {
    date.iter()
        .map(|x| Epoch::from_str(x).unwrap().to_mjd_utc_days() - MJD_TIDE_EPOCH)
        .collect::<Vec<f64>>()
}

/// Transformation from modified julian date (MJD) to days relative to the
/// ocean tide epoch
///
/// Argument
/// --------
/// * `mjd`: a slice of MJD
///
/// Return
/// ------
/// * a vector of tide epoch days
pub fn mjd_to_tide_days(mjd: &[MJD]) -> Vec<f64> {
    mjd.iter().map(|x| x - MJD_TIDE_EPOCH).collect()
}

/// Transformation from days relative to the ocean tide epoch to modified
/// julian date (MJD)
///
/// Argument
/// --------
/// * `t`: a slice of tide epoch days
///
/// Return
/// ------
/// * a vector of MJD
pub fn tide_days_to_mjd(t: &[f64]) -> Vec<MJD> {
    t.iter().map(|x| x + MJD_TIDE_EPOCH).collect()
}

/// Compute the TT−UTC offset in days for each input date (UTC time scale).
///
/// GOT and FES style predictions evaluate the astronomical arguments in a
/// dynamical time scale, so the caller must supply the offset between the
/// tide model time axis (UTC-based) and Terrestrial Time. This helper
/// builds that offset from the leap second table, neglecting the small
/// UT1−UTC term (below 0.9 s by construction).
///
/// Argument
/// --------
/// * `mjd`: a slice of MJD in the UTC time scale
///
/// Return
/// ------
/// * a vector of TT−UTC offsets in days
pub fn tt_minus_utc_days(mjd: &[MJD]) -> Vec<f64> {
    mjd.iter()
        .map(|x| {
            let epoch = Epoch::from_mjd_in_time_scale(*x, TimeScale::UTC);
            epoch.to_mjd_tt_days() - x
        })
        .collect()
}
