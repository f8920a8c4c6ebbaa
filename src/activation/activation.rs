use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetworkError;

/// Inputs beyond this magnitude saturate the sigmoid to exactly 0 or 1.
const SIGMOID_LIMIT: f64 = 45.0;

/// Serialized by variant name; deserialized from any name `FromStr`
/// accepts or from a numeric code (see `TryFrom<i64>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ActivationRepr")]
pub enum ActivationFunction {
    Identity,
    /// `max(0, x)` forward, but a constant derivative of `1` for every `x`.
    /// Trained networks depend on this exact gradient, so it is kept as is.
    LeakyReLU,
    Sigmoid,
    /// Constant `1`.  Only injected bias neurons carry this variant.
    Bias,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        (self.resolve().function)(x)
    }

    pub fn derivative(&self, x: f64) -> f64 {
        (self.resolve().derivative)(x)
    }

    /// Looks the variant up once; neurons keep the returned pointers so the
    /// forward and backward passes never branch on the enum.
    pub fn resolve(self) -> Activation {
        let (function, derivative): (fn(f64) -> f64, fn(f64) -> f64) = match self {
            ActivationFunction::Identity => (identity, one),
            ActivationFunction::LeakyReLU => (leaky_relu, one),
            ActivationFunction::Sigmoid => (sigmoid, sigmoid_derivative),
            ActivationFunction::Bias => (one, one),
        };
        Activation { kind: self, function, derivative }
    }

    /// Numeric code of the variant, as used by older configuration files.
    pub fn code(self) -> i64 {
        match self {
            ActivationFunction::Identity => 0,
            ActivationFunction::LeakyReLU => 1,
            ActivationFunction::Sigmoid => 2,
            ActivationFunction::Bias => 100,
        }
    }
}

impl TryFrom<i64> for ActivationFunction {
    type Error = NetworkError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ActivationFunction::Identity),
            1 => Ok(ActivationFunction::LeakyReLU),
            2 => Ok(ActivationFunction::Sigmoid),
            100 => Ok(ActivationFunction::Bias),
            other => Err(NetworkError::InvalidActivationVariant(other.to_string())),
        }
    }
}

impl FromStr for ActivationFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "base" | "linear" => Ok(ActivationFunction::Identity),
            "leakyrelu" | "leaky_relu" => Ok(ActivationFunction::LeakyReLU),
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "bias" => Ok(ActivationFunction::Bias),
            _ => Err(NetworkError::InvalidActivationVariant(s.to_string())),
        }
    }
}

/// An activation as written in a configuration file: `"sigmoid"` or `2`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ActivationRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<ActivationRepr> for ActivationFunction {
    type Error = NetworkError;

    fn try_from(repr: ActivationRepr) -> Result<Self, Self::Error> {
        match repr {
            ActivationRepr::Code(code) => ActivationFunction::try_from(code),
            ActivationRepr::Name(name) => name.parse(),
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationFunction::Identity => "identity",
            ActivationFunction::LeakyReLU => "leaky_relu",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Bias => "bias",
        };
        f.write_str(name)
    }
}

/// A resolved activation: the variant plus its function and derivative.
#[derive(Clone, Copy)]
pub struct Activation {
    pub kind: ActivationFunction,
    pub function: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Activation").field(&self.kind).finish()
    }
}

fn identity(x: f64) -> f64 {
    x
}

fn one(_: f64) -> f64 {
    1.0
}

fn leaky_relu(x: f64) -> f64 {
    x.max(0.0)
}

fn sigmoid(x: f64) -> f64 {
    if x < -SIGMOID_LIMIT {
        0.0
    } else if x > SIGMOID_LIMIT {
        1.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

fn sigmoid_derivative(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_saturates_exactly() {
        let sig = ActivationFunction::Sigmoid;
        assert_eq!(sig.function(50.0), 1.0);
        assert_eq!(sig.function(-50.0), 0.0);
        assert_eq!(sig.function(0.0), 0.5);
        assert_eq!(sig.derivative(50.0), 0.0);
        assert_eq!(sig.derivative(0.0), 0.25);
    }

    #[test]
    fn sigmoid_inside_limits() {
        let sig = ActivationFunction::Sigmoid;
        assert_relative_eq!(sig.function(2.0), 1.0 / (1.0 + (-2.0f64).exp()));
        let fx = sig.function(-1.5);
        assert_relative_eq!(sig.derivative(-1.5), fx * (1.0 - fx));
    }

    #[test]
    fn leaky_relu_derivative_is_constant_one() {
        let relu = ActivationFunction::LeakyReLU;
        assert_eq!(relu.function(-3.0), 0.0);
        assert_eq!(relu.function(2.5), 2.5);
        for x in [-100.0, -1.0, -1e-9, 0.0, 1e-9, 7.0] {
            assert_eq!(relu.derivative(x), 1.0);
        }
    }

    #[test]
    fn identity_and_bias() {
        assert_eq!(ActivationFunction::Identity.function(-4.25), -4.25);
        assert_eq!(ActivationFunction::Identity.derivative(9.0), 1.0);
        assert_eq!(ActivationFunction::Bias.function(-123.0), 1.0);
        assert_eq!(ActivationFunction::Bias.derivative(0.3), 1.0);
    }

    #[test]
    fn codes_round_trip_and_reject_unknown() {
        for af in [
            ActivationFunction::Identity,
            ActivationFunction::LeakyReLU,
            ActivationFunction::Sigmoid,
            ActivationFunction::Bias,
        ] {
            assert_eq!(ActivationFunction::try_from(af.code()).unwrap(), af);
        }
        assert!(matches!(
            ActivationFunction::try_from(3_i64),
            Err(NetworkError::InvalidActivationVariant(_))
        ));
    }

    #[test]
    fn deserializes_names_codes_and_display_form() {
        let parsed: Vec<ActivationFunction> =
            serde_json::from_str(r#"["base", 1, "Sigmoid", "leaky_relu", 0, "IDENTITY"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ActivationFunction::Identity,
                ActivationFunction::LeakyReLU,
                ActivationFunction::Sigmoid,
                ActivationFunction::LeakyReLU,
                ActivationFunction::Identity,
                ActivationFunction::Identity,
            ]
        );
        for af in [ActivationFunction::LeakyReLU, ActivationFunction::Bias] {
            let shown = serde_json::to_string(&af.to_string()).unwrap();
            assert_eq!(serde_json::from_str::<ActivationFunction>(&shown).unwrap(), af);
            let written = serde_json::to_string(&af).unwrap();
            assert_eq!(serde_json::from_str::<ActivationFunction>(&written).unwrap(), af);
        }
        assert!(serde_json::from_str::<ActivationFunction>(r#""tanh""#).is_err());
        assert!(serde_json::from_str::<ActivationFunction>("7").is_err());
    }

    #[test]
    fn parses_names() {
        assert_eq!("Base".parse::<ActivationFunction>().unwrap(), ActivationFunction::Identity);
        assert_eq!("LeakyReLU".parse::<ActivationFunction>().unwrap(), ActivationFunction::LeakyReLU);
        assert!(matches!(
            "tanh".parse::<ActivationFunction>(),
            Err(NetworkError::InvalidActivationVariant(_))
        ));
    }
}
