//! Fixed-rate currency conversion.
//!
//! The rate is injected configuration, never fetched. Conversion is
//! applied at exactly one point (report assembly); nothing else in the
//! pipeline touches display currency.

use serde::{Deserialize, Serialize};

/// The currency monetary figures are presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCurrency {
    /// The statement's native currency; conversion is the identity.
    Base,
    /// The secondary currency, at `rate` base units per secondary unit.
    Secondary,
}

/// Linear converter from base-currency figures to the display currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConverter {
    pub display: DisplayCurrency,
    /// Base units per one secondary unit, e.g. 280.0.
    pub rate: f64,
}

impl CurrencyConverter {
    pub fn new(display: DisplayCurrency, rate: f64) -> Self {
        Self { display, rate }
    }

    /// Convert a base-currency amount into the display currency.
    pub fn convert(&self, amount_in_base: f64) -> f64 {
        match self.display {
            DisplayCurrency::Base => amount_in_base,
            DisplayCurrency::Secondary => amount_in_base / self.rate,
        }
    }

    /// Invert a display-currency amount back to base.
    pub fn to_base(&self, amount_in_display: f64) -> f64 {
        match self.display {
            DisplayCurrency::Base => amount_in_display,
            DisplayCurrency::Secondary => amount_in_display * self.rate,
        }
    }
}
