//! # Constituent catalog
//!
//! Static table of tidal constituents and their development over the six
//! fundamental astronomical arguments, loaded once at process start and
//! never mutated.
//!
//! Each catalog row carries the multipliers of the argument vector
//! `(t₁, s, h, p, N, pₛ, 90°)` where `t₁` is the Greenwich solar hour angle
//! in degrees, `s`/`h`/`p`/`N`/`pₛ` are the mean longitudes from
//! [`crate::astro`], and the last slot counts quarter-circle phase offsets.
//! The equilibrium argument of a constituent is the dot product of its row
//! with that vector; its angular frequency is the same dot product taken
//! over the argument rates.
//!
//! ## Public API
//!
//! - [`parse_name`] normalizes a model constituent label (case, padding,
//!   historical aliases) to its catalog name
//! - [`coefficients`] returns the argument row for a named constituent
//! - [`frequency`] derives the angular frequency in rad/s
//! - [`Constituent`] and [`Species`] describe a single catalog entry

pub mod doodson;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::astro::{mean_longitude_rates, LongitudeMethod};
use crate::constants::{Degree, MJD_TIDE_EPOCH, RADEG, SECONDS_PER_DAY};
use crate::maree_errors::MareeError;

/// Tidal species, derived from the hour-angle multiplier of the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    /// Zero cycles per day (mm, mf, ssa, ...)
    LongPeriod,
    /// One cycle per day (k1, o1, ...)
    Diurnal,
    /// Two cycles per day (m2, s2, ...)
    Semidiurnal,
    /// Overtide and compound bands above two cycles per day
    ShortPeriod,
}

/// A single immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constituent {
    /// Symbolic identifier, lowercase
    pub name: &'static str,
    /// Multipliers of `(t₁, s, h, p, N, pₛ, 90°)`
    pub coefficients: [f64; 7],
}

impl Constituent {
    /// Species class from the hour-angle multiplier.
    pub fn species(&self) -> Species {
        match self.coefficients[0] as i64 {
            0 => Species::LongPeriod,
            1 => Species::Diurnal,
            2 => Species::Semidiurnal,
            _ => Species::ShortPeriod,
        }
    }

    /// Equilibrium argument in degrees for a given argument vector.
    pub fn argument(&self, fargs: &[Degree; 7]) -> Degree {
        self.coefficients
            .iter()
            .zip(fargs.iter())
            .map(|(c, a)| c * a)
            .sum()
    }
}

/// Catalog of tidal constituents over `(t₁, s, h, p, N, pₛ, 90°)`.
///
/// Row order follows the historical equilibrium-argument development: the
/// long-period band, the diurnal band, the semi-diurnal band, then the
/// overtide and compound bands. `mt`/`mtm` and `mns2`/`eps2` are alias
/// pairs sharing one development; `s1` is stored with its 90° phase and
/// adjusted to Doodson's 180° convention by the argument table when a
/// GOT/FES-family convention is selected.
pub static CATALOG: &[Constituent] = &[
    // long-period band
    Constituent { name: "sa", coefficients: [0., 0., 1., 0., 0., -1., 0.] },
    Constituent { name: "ssa", coefficients: [0., 0., 2., 0., 0., 0., 0.] },
    Constituent { name: "mm", coefficients: [0., 1., 0., -1., 0., 0., 0.] },
    Constituent { name: "msf", coefficients: [0., 2., -2., 0., 0., 0., 0.] },
    Constituent { name: "mf", coefficients: [0., 2., 0., 0., 0., 0., 0.] },
    Constituent { name: "mt", coefficients: [0., 3., 0., -1., 0., 0., 0.] },
    // diurnal band
    Constituent { name: "alpha1", coefficients: [1., -5., 3., 1., 0., 0., -1.] },
    Constituent { name: "2q1", coefficients: [1., -4., 1., 2., 0., 0., -1.] },
    Constituent { name: "sigma1", coefficients: [1., -4., 3., 0., 0., 0., -1.] },
    Constituent { name: "q1", coefficients: [1., -3., 1., 1., 0., 0., -1.] },
    Constituent { name: "rho1", coefficients: [1., -3., 3., -1., 0., 0., -1.] },
    Constituent { name: "o1", coefficients: [1., -2., 1., 0., 0., 0., -1.] },
    Constituent { name: "tau1", coefficients: [1., -2., 3., 0., 0., 0., 1.] },
    Constituent { name: "m1", coefficients: [1., -1., 1., 0., 0., 0., 1.] },
    Constituent { name: "chi1", coefficients: [1., -1., 3., -1., 0., 0., 1.] },
    Constituent { name: "pi1", coefficients: [1., 0., -2., 0., 0., 1., -1.] },
    Constituent { name: "p1", coefficients: [1., 0., -1., 0., 0., 0., -1.] },
    Constituent { name: "s1", coefficients: [1., 0., 0., 0., 0., 0., 1.] },
    Constituent { name: "k1", coefficients: [1., 0., 1., 0., 0., 0., 1.] },
    Constituent { name: "psi1", coefficients: [1., 0., 2., 0., 0., -1., 1.] },
    Constituent { name: "phi1", coefficients: [1., 0., 3., 0., 0., 0., 1.] },
    Constituent { name: "theta1", coefficients: [1., 1., -1., 1., 0., 0., 1.] },
    Constituent { name: "j1", coefficients: [1., 1., 1., -1., 0., 0., 1.] },
    Constituent { name: "oo1", coefficients: [1., 2., 1., 0., 0., 0., 1.] },
    // semi-diurnal band
    Constituent { name: "2n2", coefficients: [2., -4., 2., 2., 0., 0., 0.] },
    Constituent { name: "mu2", coefficients: [2., -4., 4., 0., 0., 0., 0.] },
    Constituent { name: "n2", coefficients: [2., -3., 2., 1., 0., 0., 0.] },
    Constituent { name: "nu2", coefficients: [2., -3., 4., -1., 0., 0., 0.] },
    Constituent { name: "m2a", coefficients: [2., -2., 1., 0., 0., 1., 0.] },
    Constituent { name: "m2", coefficients: [2., -2., 2., 0., 0., 0., 0.] },
    Constituent { name: "m2b", coefficients: [2., -2., 3., 0., 0., -1., 0.] },
    Constituent { name: "lambda2", coefficients: [2., -1., 0., 1., 0., 0., 2.] },
    Constituent { name: "l2", coefficients: [2., -1., 2., -1., 0., 0., 2.] },
    Constituent { name: "t2", coefficients: [2., 0., -1., 0., 0., 1., 0.] },
    Constituent { name: "s2", coefficients: [2., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "r2", coefficients: [2., 0., 1., 0., 0., -1., 2.] },
    Constituent { name: "k2", coefficients: [2., 0., 2., 0., 0., 0., 0.] },
    Constituent { name: "eta2", coefficients: [2., 1., 2., 0., 0., -1., 0.] },
    Constituent { name: "mns2", coefficients: [2., -5., 4., 1., 0., 0., 0.] },
    Constituent { name: "2sm2", coefficients: [2., 2., -2., 0., 0., 0., 0.] },
    // overtide and compound bands
    Constituent { name: "m3", coefficients: [3., -3., 3., 0., 0., 0., 0.] },
    Constituent { name: "mk3", coefficients: [3., -2., 3., 0., 0., 0., 1.] },
    Constituent { name: "s3", coefficients: [3., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "mn4", coefficients: [4., -5., 4., 1., 0., 0., 0.] },
    Constituent { name: "m4", coefficients: [4., -4., 4., 0., 0., 0., 0.] },
    Constituent { name: "ms4", coefficients: [4., -2., 2., 0., 0., 0., 0.] },
    Constituent { name: "mk4", coefficients: [4., -2., 4., 0., 0., 0., 0.] },
    Constituent { name: "s4", coefficients: [4., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "s5", coefficients: [5., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "m6", coefficients: [6., -6., 6., 0., 0., 0., 0.] },
    Constituent { name: "s6", coefficients: [6., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "s7", coefficients: [7., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "s8", coefficients: [8., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "m8", coefficients: [8., -8., 8., 0., 0., 0., 0.] },
    Constituent { name: "mks2", coefficients: [2., -2., 4., 0., 0., 0., 0.] },
    Constituent { name: "msqm", coefficients: [0., 4., -2., 0., 0., 0., 0.] },
    Constituent { name: "mtm", coefficients: [0., 3., 0., -1., 0., 0., 0.] },
    Constituent { name: "n4", coefficients: [4., -6., 4., 2., 0., 0., 0.] },
    Constituent { name: "eps2", coefficients: [2., -5., 4., 1., 0., 0., 0.] },
    // mean sea level and the lunar node line
    Constituent { name: "z0", coefficients: [0., 0., 0., 0., 0., 0., 0.] },
    Constituent { name: "node", coefficients: [0., 0., 0., 0., -1., 0., 2.] },
];

/// Historical alias spellings found in model files.
static ALIASES: &[(&str, &str)] = &[
    ("2n", "2n2"),
    ("alp1", "alpha1"),
    ("e2", "eps2"),
    ("ep2", "eps2"),
    ("la2", "lambda2"),
    ("lam2", "lambda2"),
    ("lm2", "lambda2"),
    ("msq", "msqm"),
    ("omega0", "node"),
    ("om0", "node"),
    ("rho", "rho1"),
    ("sig1", "sigma1"),
    ("the", "theta1"),
    ("the1", "theta1"),
];

static CATALOG_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name, i))
        .collect()
});

/// Normalize a constituent label to its catalog name.
///
/// Model files spell constituents with varying case, whitespace padding,
/// surrounding punctuation and a number of historical short forms; this
/// reduces them all to the lowercase catalog spelling.
///
/// Argument
/// --------
/// * `name`: the raw constituent label
///
/// Return
/// ------
/// * the catalog name
///
/// Errors
/// ------
/// * [`MareeError::UnknownConstituent`] if the label matches no catalog
///   entry or alias
pub fn parse_name(name: &str) -> Result<&'static str, MareeError> {
    let trimmed = name
        .trim_matches(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .to_ascii_lowercase();
    let resolved = ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, target)| *target)
        .unwrap_or(trimmed.as_str());
    CATALOG_INDEX
        .get_key_value(resolved)
        .map(|(k, _)| *k)
        .ok_or_else(|| MareeError::UnknownConstituent(name.to_string()))
}

/// Look up a constituent by (normalized) name.
pub fn get(name: &str) -> Result<&'static Constituent, MareeError> {
    let canonical = parse_name(name)?;
    Ok(&CATALOG[CATALOG_INDEX[canonical]])
}

/// The argument-table row of a named constituent.
pub fn coefficients(name: &str) -> Result<[f64; 7], MareeError> {
    Ok(get(name)?.coefficients)
}

/// Angular frequency of a constituent in radians per second.
///
/// The frequency is the Doodson-weighted sum of the rates of change of the
/// fundamental arguments, with the hour angle advancing 360° per day. The
/// rates are evaluated at the ocean tide epoch with the longitude method
/// associated to the caller's correction convention.
pub fn frequency(name: &str, method: LongitudeMethod) -> Result<f64, MareeError> {
    let c = get(name)?;
    let (ds, dh, dp, dn, dpp) = mean_longitude_rates(MJD_TIDE_EPOCH, method)?;
    let rates = [360.0, ds, dh, dp, dn, dpp, 0.0];
    let deg_per_day: f64 = c
        .coefficients
        .iter()
        .zip(rates.iter())
        .map(|(c, r)| c * r)
        .sum();
    Ok(deg_per_day * RADEG / SECONDS_PER_DAY)
}
