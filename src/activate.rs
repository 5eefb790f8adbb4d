use rand::Rng;
use serde::{Deserialize, Serialize};

pub fn identity(x: f64) -> f64 {
    x
}

pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

pub fn relu(x: f64) -> f64 {
    if x < 0. {
        0.
    } else {
        x
    }
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Which function a node squashes its weighted sum through. Kept as a tag rather than a
/// callable so that crossover and mutation can compare and swap it as plain data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    Identity,
    Sigmoid,
    Relu,
    Tanh,
}

impl Activation {
    pub const ALL: [Self; 4] = [Self::Identity, Self::Sigmoid, Self::Relu, Self::Tanh];

    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => identity(x),
            Self::Sigmoid => sigmoid(x),
            Self::Relu => relu(x),
            Self::Tanh => tanh(x),
        }
    }

    /// Uniform pick, for freshly created hidden nodes
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}
