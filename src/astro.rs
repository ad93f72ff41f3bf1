//! # Astronomical mean longitudes
//!
//! Computes the basic astronomical mean longitudes of the moon (`s`), sun (`h`),
//! lunar perigee (`p`), ascending lunar node (`n`) and solar perigee (`pp`),
//! which together with the Greenwich hour angle form the fundamental arguments
//! of the tide generating potential.
//!
//! Note `n` is the node longitude itself (decreasing with time), not the
//! negated `N'` used in Doodson's development.
//!
//! Two sets of polynomial coefficients are supported:
//!
//! - [`LongitudeMethod::Cartwright`]: linear series fitted for 1990--2010,
//!   used by OTIS/ATLAS-family model conventions,
//! - [`LongitudeMethod::Astro5`]: Meeus' *Astronomical Algorithms* polynomial
//!   coefficients as implemented in ASTRO5, used by GOT/FES-family conventions.
//!
//! The two methods agree to well under a tenth of a degree over the fit
//! interval; downstream comparisons must tolerate this difference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{wrap_degrees, Degree, CIRCLE, MJD, T2000};
use crate::maree_errors::MareeError;

/// Selects the polynomial coefficient set used for the mean longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LongitudeMethod {
    /// Linear series for 1990--2010 derived by David Cartwright
    #[default]
    Cartwright,
    /// Meeus coefficients as implemented in ASTRO5
    Astro5,
}

impl FromStr for LongitudeMethod {
    type Err = MareeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CARTWRIGHT" => Ok(LongitudeMethod::Cartwright),
            "ASTRO5" => Ok(LongitudeMethod::Astro5),
            _ => Err(MareeError::UnknownLongitudeMethod(s.to_string())),
        }
    }
}

impl fmt::Display for LongitudeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LongitudeMethod::Cartwright => write!(f, "Cartwright"),
            LongitudeMethod::Astro5 => write!(f, "ASTRO5"),
        }
    }
}

/// The five fundamental mean longitudes at a single epoch, in degrees.
///
/// `s`, `h`, `p` and `n` are reduced to [0, 360); the solar perigee `pp`
/// is left unreduced, matching its use as a slowly varying correction term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanLongitudes {
    /// Mean longitude of the moon
    pub s: Degree,
    /// Mean longitude of the sun
    pub h: Degree,
    /// Mean longitude of the lunar perigee
    pub p: Degree,
    /// Mean longitude of the ascending lunar node
    pub n: Degree,
    /// Longitude of the solar perigee
    pub pp: Degree,
}

/// Calculate the sum of a polynomial function of time.
///
/// Argument
/// --------
/// * `coefficients`: leading coefficients of polynomials of increasing order
/// * `t`: delta time in the units of the longitude series
///
/// Return
/// ------
/// * the polynomial sum Σ cᵢ·tⁱ
pub fn polynomial_sum(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * t.powi(i as i32))
        .sum()
}

/// Compute the five fundamental mean longitudes at a given epoch.
///
/// Arguments
/// ---------
/// * `mjd`: Modified Julian Date of the input epoch (dynamical time scale;
///   callers holding UTC-based dates add their TT−UT offset first)
/// * `method`: polynomial coefficient set to use
///
/// Return
/// ------
/// * the [`MeanLongitudes`] at `mjd`, angles in degrees reduced to [0, 360)
///
/// Errors
/// ------
/// * [`MareeError::InvalidTime`] if `mjd` is NaN or infinite
pub fn mean_longitudes(mjd: MJD, method: LongitudeMethod) -> Result<MeanLongitudes, MareeError> {
    if !mjd.is_finite() {
        return Err(MareeError::InvalidTime(mjd));
    }
    let (s, h, p, n, pp) = match method {
        LongitudeMethod::Cartwright => {
            // days relative to 2000-01-01T12:00:00, shifted from Universal
            // Time to Dynamic Time at that epoch
            let t = mjd - 51544.4993;
            (
                218.3164 + 13.17639648 * t,
                280.4661 + 0.98564736 * t,
                83.3535 + 0.11140353 * t,
                125.0445 - 0.05295377 * t,
                282.8,
            )
        }
        LongitudeMethod::Astro5 => {
            // centuries relative to 2000-01-01T12:00:00
            let t = (mjd - T2000) / 36525.0;
            let lunar_longitude = [218.3164477, 481267.88123421, -1.5786e-3, 1.855835e-6, -1.53388e-8];
            let lunar_elongation = [297.8501921, 445267.1114034, -1.8819e-3, 1.83195e-6, -8.8445e-9];
            let lunar_perigee = [83.3532465, 4069.0137287, -1.032e-2, -1.249172e-5];
            let lunar_node = [125.04452, -1934.136261, 2.0708e-3, 2.22222e-6];
            let s = polynomial_sum(&lunar_longitude, t);
            // mean longitude of sun = lunar longitude - lunar elongation
            let h = s - polynomial_sum(&lunar_elongation, t);
            let p = polynomial_sum(&lunar_perigee, t);
            let n = polynomial_sum(&lunar_node, t);
            // solar perigee (Simon et al., 1994)
            let pp = 282.94 + 1.7192 * t;
            (s, h, p, n, pp)
        }
    };
    Ok(MeanLongitudes {
        s: wrap_degrees(s),
        h: wrap_degrees(h),
        p: wrap_degrees(p),
        n: wrap_degrees(n),
        pp,
    })
}

/// Vectorized form of [`mean_longitudes`], evaluated per time sample.
pub fn mean_longitudes_vec(
    mjd: &[MJD],
    method: LongitudeMethod,
) -> Result<Vec<MeanLongitudes>, MareeError> {
    mjd.iter().map(|&t| mean_longitudes(t, method)).collect()
}

/// Rates of change of the mean longitudes in degrees per day, obtained by
/// central differencing of the longitude series around `mjd`.
///
/// Used by the frequency derivation in the constituent catalog; the series
/// are low order polynomials so a one day step loses no precision.
pub fn mean_longitude_rates(
    mjd: MJD,
    method: LongitudeMethod,
) -> Result<(f64, f64, f64, f64, f64), MareeError> {
    let before = mean_longitudes(mjd - 0.5, method)?;
    let after = mean_longitudes(mjd + 0.5, method)?;
    let rate = |a: Degree, b: Degree| {
        let mut d = b - a;
        // the node regresses, every other argument advances slowly
        if d > CIRCLE / 2.0 {
            d -= CIRCLE;
        } else if d < -CIRCLE / 2.0 {
            d += CIRCLE;
        }
        d
    };
    Ok((
        rate(before.s, after.s),
        rate(before.h, after.h),
        rate(before.p, after.p),
        rate(before.n, after.n),
        after.pp - before.pp,
    ))
}

#[cfg(test)]
mod astro_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cartwright_at_j2000() {
        let lon = mean_longitudes(T2000, LongitudeMethod::Cartwright).unwrap();
        assert_relative_eq!(lon.s, 218.325623477536, max_relative = 1e-12);
        assert_relative_eq!(lon.h, 280.466789953152, max_relative = 1e-12);
        assert_relative_eq!(lon.p, 83.353577982471, max_relative = 1e-12);
        assert_relative_eq!(lon.n, 125.044462932364, max_relative = 1e-12);
        assert_eq!(lon.pp, 282.8);
    }

    #[test]
    fn test_astro5_at_j2000() {
        let lon = mean_longitudes(T2000, LongitudeMethod::Astro5).unwrap();
        assert_relative_eq!(lon.s, 218.3164477, max_relative = 1e-12);
        assert_relative_eq!(lon.h, 218.3164477 - 297.8501921 + 360.0, max_relative = 1e-12);
        assert_relative_eq!(lon.p, 83.3532465, max_relative = 1e-12);
        assert_relative_eq!(lon.n, 125.04452, max_relative = 1e-12);
        assert_relative_eq!(lon.pp, 282.94, max_relative = 1e-12);
    }

    #[test]
    fn test_methods_agree() {
        // both coefficient sets describe the same angles; they drift apart
        // by well under a tenth of a degree over the Cartwright fit interval
        for mjd in [47892.0, 51544.5, 55197.0] {
            let a = mean_longitudes(mjd, LongitudeMethod::Cartwright).unwrap();
            let b = mean_longitudes(mjd, LongitudeMethod::Astro5).unwrap();
            for (x, y) in [(a.s, b.s), (a.h, b.h), (a.p, b.p), (a.n, b.n)] {
                let mut d = (x - y).abs();
                if d > 180.0 {
                    d = 360.0 - d;
                }
                assert!(d < 0.05, "angles diverge at mjd {mjd}: {x} vs {y}");
            }
        }
    }

    #[test]
    fn test_angles_in_range() {
        for mjd in (40000..70000).step_by(1111) {
            for method in [LongitudeMethod::Cartwright, LongitudeMethod::Astro5] {
                let lon = mean_longitudes(mjd as f64 + 0.375, method).unwrap();
                for angle in [lon.s, lon.h, lon.p, lon.n] {
                    assert!((0.0..360.0).contains(&angle));
                }
            }
        }
    }

    #[test]
    fn test_non_finite_time() {
        let err = mean_longitudes(f64::NAN, LongitudeMethod::Cartwright).unwrap_err();
        assert!(matches!(err, MareeError::InvalidTime(_)));
        assert!(mean_longitudes(f64::INFINITY, LongitudeMethod::Astro5).is_err());
    }

    #[test]
    fn test_rates() {
        // lunar and solar tropical rates, degrees per day
        let (ds, dh, dp, dn, _) = mean_longitude_rates(T2000, LongitudeMethod::Cartwright).unwrap();
        assert_relative_eq!(ds, 13.17639648, max_relative = 1e-9);
        assert_relative_eq!(dh, 0.98564736, max_relative = 1e-9);
        assert_relative_eq!(dp, 0.11140353, max_relative = 1e-9);
        assert_relative_eq!(dn, -0.05295377, max_relative = 1e-9);

        let (ds, dh, _, _, _) = mean_longitude_rates(T2000, LongitudeMethod::Astro5).unwrap();
        assert_relative_eq!(ds, 481267.88123421 / 36525.0, max_relative = 1e-6);
        assert_relative_eq!(dh, (481267.88123421 - 445267.1114034) / 36525.0, max_relative = 1e-6);
    }

    #[test]
    fn test_polynomial_sum() {
        assert_eq!(polynomial_sum(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(polynomial_sum(&[5.0], 100.0), 5.0);
    }
}
