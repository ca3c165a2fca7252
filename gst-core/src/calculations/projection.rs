//! Toy price projection.
//!
//! A price is extrapolated forward by fitting a straight line through four
//! synthetic yearly observations that grow at a category-specific annual
//! rate, then reading the line at the requested horizon. It is a stylized
//! illustration, not a forecast.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_half_up;

/// Years used as training observations.
const TRAINING_YEARS: [u32; 4] = [1, 2, 3, 4];

/// Errors that can occur while projecting a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The current price must be positive.
    #[error("price must be greater than zero, got {0}")]
    InvalidPrice(Decimal),

    /// The horizon must be at least one year.
    #[error("projection horizon must be at least one year")]
    InvalidHorizon,

    /// The training data did not determine a line.
    #[error("cannot fit a line through the training data")]
    DegenerateFit,
}

/// Product category, which decides the assumed annual price growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceCategory {
    Electronics,
    Essentials,
    Luxury,
}

impl PriceCategory {
    pub fn all() -> &'static [PriceCategory] {
        &[
            PriceCategory::Electronics,
            PriceCategory::Essentials,
            PriceCategory::Luxury,
        ]
    }

    /// Assumed yearly growth as a fraction.
    pub fn annual_inflation(&self) -> Decimal {
        match self {
            Self::Electronics => dec!(0.08),
            Self::Essentials => dec!(0.04),
            Self::Luxury => dec!(0.12),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Essentials => "essentials",
            Self::Luxury => "luxury",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electronics" => Some(Self::Electronics),
            "essentials" => Some(Self::Essentials),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

/// Where the GST rate on a category is expected to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstOutlook {
    Stable,
    LikelyDecrease,
    LikelyIncrease,
}

impl GstOutlook {
    pub fn for_category(
        category: PriceCategory,
        years: u32,
    ) -> Self {
        match category {
            PriceCategory::Luxury => Self::LikelyIncrease,
            PriceCategory::Electronics if years > 2 => Self::LikelyDecrease,
            _ => Self::Stable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::LikelyDecrease => "Likely Decrease",
            Self::LikelyIncrease => "Likely Increase",
        }
    }
}

/// `y = slope * x + intercept`, fitted by ordinary least squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearModel {
    pub slope: Decimal,
    pub intercept: Decimal,
}

impl LinearModel {
    /// Fits a line through `points`.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::DegenerateFit`] when fewer than two distinct `x`
    /// values are given.
    pub fn fit(points: &[(Decimal, Decimal)]) -> Result<Self, ProjectionError> {
        if points.len() < 2 {
            return Err(ProjectionError::DegenerateFit);
        }

        let n = Decimal::from(points.len());
        let mean_x = points.iter().map(|(x, _)| *x).sum::<Decimal>() / n;
        let mean_y = points.iter().map(|(_, y)| *y).sum::<Decimal>() / n;

        let (covariance, variance) = points.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(cov, var), (x, y)| {
                let dx = *x - mean_x;
                (cov + dx * (*y - mean_y), var + dx * dx)
            },
        );

        if variance.is_zero() {
            return Err(ProjectionError::DegenerateFit);
        }

        let slope = covariance / variance;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(
        &self,
        x: Decimal,
    ) -> Decimal {
        self.slope * x + self.intercept
    }
}

/// Result of [`PriceProjector::project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceProjection {
    pub current_price: Decimal,
    pub projected_price: Decimal,
    /// Growth over the horizon, in percent, rounded to two places.
    pub inflation_percent: Decimal,
    pub outlook: GstOutlook,
}

/// Projects prices forward in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceProjector;

impl PriceProjector {
    pub fn new() -> Self {
        Self
    }

    /// Projects `price` forward by `years`.
    ///
    /// # Errors
    ///
    /// * [`ProjectionError::InvalidPrice`] if `price <= 0`
    /// * [`ProjectionError::InvalidHorizon`] if `years == 0`
    pub fn project(
        &self,
        price: Decimal,
        category: PriceCategory,
        years: u32,
    ) -> Result<PriceProjection, ProjectionError> {
        if price <= Decimal::ZERO {
            return Err(ProjectionError::InvalidPrice(price));
        }
        if years == 0 {
            return Err(ProjectionError::InvalidHorizon);
        }

        let model = LinearModel::fit(&self.training_points(price, category))?;
        let projected_price = model.predict(Decimal::from(years));
        let inflation_percent =
            round_half_up((projected_price - price) / price * Decimal::ONE_HUNDRED);

        debug!(
            %price,
            category = category.as_str(),
            years,
            %projected_price,
            "projected price"
        );

        Ok(PriceProjection {
            current_price: price,
            projected_price,
            inflation_percent,
            outlook: GstOutlook::for_category(category, years),
        })
    }

    /// `(year, price * (1 + rate * year))` for each training year.
    fn training_points(
        &self,
        price: Decimal,
        category: PriceCategory,
    ) -> Vec<(Decimal, Decimal)> {
        let rate = category.annual_inflation();
        TRAINING_YEARS
            .iter()
            .map(|year| {
                let x = Decimal::from(*year);
                (x, price * (Decimal::ONE + rate * x))
            })
            .collect()
    }
}
