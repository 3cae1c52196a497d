//! Significant-figure rendering of uncertain values.
//!
//! The number of decimals is chosen from the magnitude of the uncertainty: the
//! uncertainty keeps one significant digit, or two when that digit would be a `1`.
//! The value is rounded to the same decimal position. Values whose magnitude is
//! outside `10^-3 ..= 10^3` are printed as `(V ± U)e<exp>`.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::Uncertain;
use std::fmt;

const PLUS_MINUS: char = '\u{b1}';

/// Formatting policy for uncertain values.
///
/// The default reproduces the standard rendering used by `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Largest absolute decimal exponent of the value still printed in fixed point
    pub scientific_threshold: i32,
    /// Keep a second significant digit when the rounded uncertainty starts with `1`
    pub extra_digit_for_leading_one: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            scientific_threshold: 3,
            extra_digit_for_leading_one: true,
        }
    }
}

impl FormatOptions {
    /// Renders `value ± uncertainty` under these options.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::format::FormatOptions;
    ///
    /// let options = FormatOptions::default();
    /// assert_eq!(options.format(321.856, 0.0324), "321.86 ± 0.03");
    /// assert_eq!(options.format(3.21856e10, 3.24e8), "(3.22 ± 0.03)e10");
    /// ```
    #[must_use]
    pub fn format(&self, value: f64, uncertainty: f64) -> String {
        let vpow = decimal_exponent(value).unwrap_or(0);
        if vpow.abs() <= self.scientific_threshold {
            let (value, uncertainty) = self.format_decimal(value, uncertainty);
            format!("{value} {PLUS_MINUS} {uncertainty}")
        } else {
            let (value, uncertainty) =
                self.format_decimal(scale(value, vpow), scale(uncertainty, vpow));
            format!("({value} {PLUS_MINUS} {uncertainty})e{vpow}")
        }
    }

    fn format_decimal(&self, value: f64, uncertainty: f64) -> (String, String) {
        let Some(mut dpow) = decimal_exponent(uncertainty) else {
            tracing::trace!(value, uncertainty, "uncertainty has no exponent, printing unrounded");
            return (value.to_string(), uncertainty.to_string());
        };
        if self.extra_digit_for_leading_one
            && leading_digit(round_to(uncertainty.abs(), -dpow)) == Some('1')
        {
            dpow -= 1;
        }
        let precision = (-dpow).max(0) as usize;
        (
            format!("{:.precision$}", round_to(value, -dpow)),
            format!("{:.precision$}", round_to(uncertainty, -dpow)),
        )
    }
}

/// Renders `value ± uncertainty` with the default [`FormatOptions`].
///
/// # Example
/// ```rust
/// use errprop_rs::format_uncertainty;
///
/// assert_eq!(format_uncertainty(3559.8838983606497, 21.815841616631992), "3560 ± 20");
/// assert_eq!(format_uncertainty(-32.1856, 1.134), "-32.2 ± 1.1");
/// ```
#[must_use]
pub fn format_uncertainty(value: f64, uncertainty: f64) -> String {
    FormatOptions::default().format(value, uncertainty)
}

impl fmt::Display for Uncertain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_uncertainty(self.value(), self.uncertainty()))
    }
}

impl Uncertain {
    /// Renders the value under custom [`FormatOptions`]
    #[must_use]
    pub fn format_with(&self, options: &FormatOptions) -> String {
        options.format(self.value(), self.uncertainty())
    }
}

/// Exponent of `x` in six-digit scientific notation, `None` for zero and non-finite input.
fn decimal_exponent(x: f64) -> Option<i32> {
    if x == 0.0 || !x.is_finite() {
        return None;
    }
    let scientific = format!("{x:.6e}");
    let (_, exponent) = scientific.split_once('e')?;
    exponent.parse().ok()
}

fn leading_digit(x: f64) -> Option<char> {
    format!("{x:.6e}").chars().next()
}

/// Rounds to `digits` decimal places; negative `digits` round to tens, hundreds, ...
fn round_to(x: f64, digits: i32) -> f64 {
    if digits >= 0 {
        let digits = digits as usize;
        format!("{x:.digits$}").parse().unwrap_or(x)
    } else {
        let factor = 10_f64.powi(-digits);
        (x / factor).round_ties_even() * factor
    }
}

/// `x · 10^-exponent`; the factor must be the correctly rounded power of ten, since a
/// value one ulp off can round to a different digit.
fn scale(x: f64, exponent: i32) -> f64 {
    x * power_of_ten(-exponent)
}

fn power_of_ten(exponent: i32) -> f64 {
    format!("1e{exponent}")
        .parse()
        .unwrap_or_else(|_| 10_f64.powi(exponent))
}
