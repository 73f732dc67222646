// src/checkout/basket.rs - Basket-size policy per shopping behavior
use std::fmt;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

pub const MIN_BASKET_SIZE: u32 = 1;
pub const MAX_BASKET_SIZE: u32 = 20;

const SIZES: usize = (MAX_BASKET_SIZE - MIN_BASKET_SIZE + 1) as usize;

/// Shopping behavior driving basket sizes.
///
/// - `normal`: mostly small and medium baskets, few large
/// - `seasonal`: more large baskets
/// - anything else: uniform over 1..=20
///
/// The label supplied by the caller is kept so it can be echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BasketBehavior {
    #[default]
    Normal,
    Seasonal,
    Uniform(String),
}

impl From<&str> for BasketBehavior {
    fn from(label: &str) -> Self {
        match label {
            "normal" => BasketBehavior::Normal,
            "seasonal" => BasketBehavior::Seasonal,
            other => BasketBehavior::Uniform(other.to_string()),
        }
    }
}

impl From<String> for BasketBehavior {
    fn from(label: String) -> Self {
        BasketBehavior::from(label.as_str())
    }
}

impl From<BasketBehavior> for String {
    fn from(behavior: BasketBehavior) -> Self {
        behavior.label().to_string()
    }
}

impl fmt::Display for BasketBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl BasketBehavior {
    pub fn label(&self) -> &str {
        match self {
            BasketBehavior::Normal => "normal",
            BasketBehavior::Seasonal => "seasonal",
            BasketBehavior::Uniform(label) => label,
        }
    }

    /// Relative weight of each basket size, index 0 being size 1.
    ///
    /// Sizes split into small (1-5), medium (6-10) and large (11-20).
    pub fn weights(&self) -> [u32; SIZES] {
        let (small, medium, large) = match self {
            BasketBehavior::Normal => (5, 4, 1),
            BasketBehavior::Seasonal => (2, 4, 4),
            BasketBehavior::Uniform(_) => (1, 1, 1),
        };
        let mut weights = [large; SIZES];
        weights[..5].fill(small);
        weights[5..10].fill(medium);
        weights
    }
}

/// Weighted sampler over basket sizes for one behavior
#[derive(Debug, Clone)]
pub struct BasketSampler {
    behavior: BasketBehavior,
    index: WeightedIndex<u32>,
}

impl BasketSampler {
    pub fn new(behavior: BasketBehavior) -> Result<Self, SimError> {
        let index = WeightedIndex::new(behavior.weights())
            .map_err(|e| SimError::Distribution(e.to_string()))?;
        Ok(Self { behavior, index })
    }

    pub fn behavior(&self) -> &BasketBehavior {
        &self.behavior
    }

    /// Draw a basket size in `MIN_BASKET_SIZE..=MAX_BASKET_SIZE`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        MIN_BASKET_SIZE + self.index.sample(rng) as u32
    }
}
