//! # Equilibrium arguments
//!
//! Assembles, per time sample and constituent, the three time-varying terms
//! of the harmonic development: the equilibrium argument `G` (degrees), the
//! nodal amplitude factor `f` and the nodal phase correction `u` (degrees).
//!
//! `G` is the dot product of the catalog's coefficient row with the argument
//! vector `(t₁, s, h, p, N, pₛ, 90°)`, where `t₁` is the Greenwich solar
//! hour angle and the longitudes come from [`crate::astro`] using the method
//! paired with the correction convention. An optional per-sample `deltat`
//! (TT−UT1, days) shifts the astronomical time argument; the caller's own
//! time axis is never touched.

use nalgebra::DMatrix;

use crate::astro::mean_longitudes_vec;
use crate::constants::{TideDays, DEGH, MJD_TIDE_EPOCH};
use crate::constituents::get;
use crate::maree_errors::MareeError;
use crate::nodal::{nodal_factors, Convention, NodalPolicy};

/// The time-varying terms of the harmonic development, shaped
/// time × constituents.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicArguments {
    /// Nodal amplitude factor
    pub f: DMatrix<f64>,
    /// Nodal phase correction, degrees
    pub u: DMatrix<f64>,
    /// Equilibrium argument, degrees (unwrapped)
    pub g: DMatrix<f64>,
}

/// Resolve the astronomical time axis: tide epoch days plus the optional
/// TT−UT1 offset, as Modified Julian Dates.
fn ephemeris_mjd(t: &[TideDays], deltat: Option<&[f64]>) -> Result<Vec<f64>, MareeError> {
    if let Some(dt) = deltat {
        if dt.len() != t.len() {
            return Err(MareeError::ShapeMismatch(format!(
                "deltat has {} samples for {} times",
                dt.len(),
                t.len()
            )));
        }
    }
    t.iter()
        .enumerate()
        .map(|(i, &ti)| {
            if !ti.is_finite() {
                return Err(MareeError::InvalidTime(ti));
            }
            let dt = deltat.map_or(0.0, |d| d[i]);
            if !dt.is_finite() {
                return Err(MareeError::InvalidTime(dt));
            }
            Ok(ti + MJD_TIDE_EPOCH + dt)
        })
        .collect()
}

/// Equilibrium arguments and nodal corrections for a set of constituents.
///
/// Arguments
/// ---------
/// * `t`: days relative to the ocean tide epoch (1992-01-01T00:00:00)
/// * `constituents`: constituent names, any catalog spelling
/// * `deltat`: optional per-sample TT−UT1 offset in days (mandatory in
///   practice for GOT/FES-family predictions, zero for the OTIS family)
/// * `convention`: correction convention, selects the longitude method and
///   the nodal formula set
/// * `policy`: handling of constituents without a nodal formula
///
/// Return
/// ------
/// * [`HarmonicArguments`] with `f`, `u` and `g` shaped time × constituents
pub fn arguments(
    t: &[TideDays],
    constituents: &[&str],
    deltat: Option<&[f64]>,
    convention: Convention,
    policy: NodalPolicy,
) -> Result<HarmonicArguments, MareeError> {
    let mjd = ephemeris_mjd(t, deltat)?;
    let longitudes = mean_longitudes_vec(&mjd, convention.longitude_method())?;

    let nt = mjd.len();
    let nc = constituents.len();
    let mut g = DMatrix::zeros(nt, nc);
    for (k, name) in constituents.iter().enumerate() {
        let entry = get(name)?;
        // Doodson's 180° phase for s1 under GOT/FES conventions
        let phase_adjust = if entry.name == "s1" {
            (convention.s1_phase() - entry.coefficients[6]) * 90.0
        } else {
            0.0
        };
        for (i, lon) in longitudes.iter().enumerate() {
            let hour = 24.0 * mjd[i].rem_euclid(1.0);
            let fargs = [DEGH * hour, lon.s, lon.h, lon.p, lon.n, lon.pp, 90.0];
            g[(i, k)] = entry.argument(&fargs) + phase_adjust;
        }
    }

    let (f, u) = nodal_factors(&longitudes, constituents, convention, policy)?;
    Ok(HarmonicArguments { f, u, g })
}

/// Equilibrium arguments alone, without the nodal modulation.
pub fn equilibrium_arguments(
    t: &[TideDays],
    constituents: &[&str],
    deltat: Option<&[f64]>,
    convention: Convention,
) -> Result<DMatrix<f64>, MareeError> {
    Ok(arguments(t, constituents, deltat, convention, NodalPolicy::DefaultToUnity)?.g)
}
