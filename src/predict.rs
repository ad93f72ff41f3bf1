//! # Harmonic predictor
//!
//! Sums spatially interpolated complex harmonic constants against the
//! time-varying equilibrium arguments and nodal corrections to produce tidal
//! height (or current component) series:
//!
//! ```text
//! h(t) = Σₖ fₖ(t)·[ Xₖ·cos(Gₖ(t)+uₖ(t)) − Yₖ·sin(Gₖ(t)+uₖ(t)) ]
//! ```
//!
//! Phase is a **lag**: the harmonic constant is `amp·exp(−i·phase·π/180)`,
//! so a positive phase delays the tide. Angles are stored in degrees and
//! converted to radians only at the trigonometric boundary.
//!
//! Four evaluation shapes mirror the usual sampling geometries:
//!
//! - [`time_series`]: one spatial point, many times (tide gauge),
//! - [`map`]: one time, many points (imagery, model grids),
//! - [`drift`]: paired times and points (altimetry, drifting buoys),
//! - [`grid`]: many points × many times in a single call.
//!
//! Masked input is encoded as NaN amplitude and propagates to NaN output at
//! the affected points; it is never silently zeroed.

use itertools::izip;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::arguments::arguments;
use crate::constants::{Degree, Radian, TideDays, GAMMA_2, MJD_TIDE_EPOCH, RADEG};
use crate::maree_errors::MareeError;
use crate::nodal::{Convention, NodalPolicy};

/// Options shared by the prediction entry points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PredictOptions {
    /// Correction convention (longitude method, nodal formulas, s1 phase)
    pub convention: Convention,
    /// Handling of constituents without a nodal formula
    pub policy: NodalPolicy,
}

/// One constituent's contribution at one epoch.
#[inline]
fn oscillation(hc: Complex64, f: f64, g: Degree, u: Degree) -> f64 {
    let theta: Radian = (g + u) * RADEG;
    f * (hc.re * theta.cos() - hc.im * theta.sin())
}

/// Predict a tidal time series at a single point.
///
/// Arguments
/// ---------
/// * `t`: days relative to the ocean tide epoch, one per output sample
/// * `hc`: complex harmonic constant per constituent at the point
/// * `constituents`: constituent names, ordered like `hc`
/// * `deltat`: optional per-sample TT−UT1 offset in days
/// * `opts`: correction convention and nodal policy
///
/// Return
/// ------
/// * predicted heights, one per time sample
pub fn time_series(
    t: &[TideDays],
    hc: &[Complex64],
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
) -> Result<DVector<f64>, MareeError> {
    if hc.len() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "{} harmonic constants for {} constituents",
            hc.len(),
            constituents.len()
        )));
    }
    let args = arguments(t, constituents, deltat, opts.convention, opts.policy)?;
    let mut ht = DVector::zeros(t.len());
    for i in 0..t.len() {
        for (k, &z) in hc.iter().enumerate() {
            ht[i] += oscillation(z, args.f[(i, k)], args.g[(i, k)], args.u[(i, k)]);
        }
    }
    Ok(ht)
}

/// Predict tidal heights over many points at a single time.
///
/// `hc` is shaped points × constituents; the result has one entry per point.
pub fn map(
    t: TideDays,
    hc: &DMatrix<Complex64>,
    constituents: &[&str],
    deltat: Option<f64>,
    opts: &PredictOptions,
) -> Result<DVector<f64>, MareeError> {
    if hc.ncols() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "{} harmonic constant columns for {} constituents",
            hc.ncols(),
            constituents.len()
        )));
    }
    let dt = deltat.map(|d| vec![d]);
    let args = arguments(
        &[t],
        constituents,
        dt.as_deref(),
        opts.convention,
        opts.policy,
    )?;
    let mut ht = DVector::zeros(hc.nrows());
    for j in 0..hc.nrows() {
        for k in 0..constituents.len() {
            ht[j] += oscillation(hc[(j, k)], args.f[(0, k)], args.g[(0, k)], args.u[(0, k)]);
        }
    }
    Ok(ht)
}

/// Predict tidal heights over many points and many times at once.
///
/// `hc` is shaped points × constituents; the result is points × times. The
/// arguments are evaluated once per time sample and reused across points,
/// so no per-point scalar calls are involved.
pub fn grid(
    t: &[TideDays],
    hc: &DMatrix<Complex64>,
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
) -> Result<DMatrix<f64>, MareeError> {
    if hc.ncols() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "{} harmonic constant columns for {} constituents",
            hc.ncols(),
            constituents.len()
        )));
    }
    let args = arguments(t, constituents, deltat, opts.convention, opts.policy)?;
    let mut ht = DMatrix::zeros(hc.nrows(), t.len());
    for i in 0..t.len() {
        for j in 0..hc.nrows() {
            for k in 0..constituents.len() {
                ht[(j, i)] +=
                    oscillation(hc[(j, k)], args.f[(i, k)], args.g[(i, k)], args.u[(i, k)]);
            }
        }
    }
    Ok(ht)
}

/// Predict tidal heights along a drift track: sample `i` pairs time `t[i]`
/// with the harmonic constants in row `i` of `hc`.
pub fn drift(
    t: &[TideDays],
    hc: &DMatrix<Complex64>,
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
) -> Result<DVector<f64>, MareeError> {
    if hc.nrows() != t.len() || hc.ncols() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "harmonic constants are {}×{} for {} times and {} constituents",
            hc.nrows(),
            hc.ncols(),
            t.len(),
            constituents.len()
        )));
    }
    let args = arguments(t, constituents, deltat, opts.convention, opts.policy)?;
    let mut ht = DVector::zeros(t.len());
    for i in 0..t.len() {
        for k in 0..constituents.len() {
            ht[i] += oscillation(hc[(i, k)], args.f[(i, k)], args.g[(i, k)], args.u[(i, k)]);
        }
    }
    Ok(ht)
}

/// Long-period equilibrium ocean tide at paired times and latitudes.
///
/// Sums the spectral lines above one millimeter from the
/// Cartwright-Tayler-Edden tables (the nodal line is included, the constant
/// permanent-tide term is not), scales by the degree-2 body response
/// `γ₂·√(5/4π)` and the unnormalized `P₂₀(sin φ)`, and returns meters.
///
/// Arguments
/// ---------
/// * `t`: days relative to the ocean tide epoch, one per sample
/// * `lat`: latitudes in degrees, one per sample
///
/// Return
/// ------
/// * long-period equilibrium tide in meters, one per sample
pub fn equilibrium_tide(t: &[TideDays], lat: &[Degree]) -> Result<DVector<f64>, MareeError> {
    if t.len() != lat.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "{} times for {} latitudes",
            t.len(),
            lat.len()
        )));
    }
    let mut lpet = DVector::zeros(t.len());
    for (out, &ti, &phi) in izip!(lpet.iter_mut(), t, lat) {
        *out = equilibrium_tide_scalar(ti, phi)?;
    }
    Ok(lpet)
}

/// Long-period equilibrium tide over a latitude set at a single time.
pub fn equilibrium_tide_map(
    t: TideDays,
    lat: &[Degree],
) -> Result<DVector<f64>, MareeError> {
    let mut lpet = DVector::zeros(lat.len());
    for (i, &phi) in lat.iter().enumerate() {
        lpet[i] = equilibrium_tide_scalar(t, phi)?;
    }
    Ok(lpet)
}

fn equilibrium_tide_scalar(t: TideDays, lat: Degree) -> Result<f64, MareeError> {
    use crate::astro::{mean_longitudes, LongitudeMethod};
    let lon = mean_longitudes(t + MJD_TIDE_EPOCH, LongitudeMethod::Cartwright)?;
    let s = lon.s * RADEG;
    let h = lon.h * RADEG;
    let p = lon.p * RADEG;
    // Doodson's node variable increases with time
    let np = -lon.n * RADEG;

    // spectral line sum in centimeters
    let mut zlp = 2.79 * np.cos() - 0.49 * (h - 283.0 * RADEG).cos() - 3.10 * (2.0 * h).cos();
    zlp -= 0.67 * (s - 2.0 * h + p).cos() + (3.52 - 0.46 * np.cos()) * (s - p).cos();
    let ph = 2.0 * s;
    zlp -= 6.66 * ph.cos()
        + 2.76 * (ph + np).cos()
        + 0.26 * (ph + 2.0 * np).cos()
        + 0.58 * (ph - 2.0 * h).cos()
        + 0.29 * (ph - 2.0 * p).cos();
    let ph = 3.0 * s;
    zlp -= 1.27 * (ph - p).cos()
        + 0.53 * (ph - p + np).cos()
        + 0.24 * (ph - 2.0 * h + p).cos();

    // body response times the unnormalized spherical harmonic √(5/4π)·P₂₀
    let sinphi = (lat * RADEG).sin();
    let scale = GAMMA_2 * (5.0 / (4.0 * std::f64::consts::PI)).sqrt();
    Ok(1e-2 * scale * zlp * (1.5 * sinphi * sinphi - 0.5))
}
