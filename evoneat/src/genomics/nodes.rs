use crate::NodeId;

use serde::{Deserialize, Serialize};

use std::f32::consts::PI;
use std::fmt;

/// An ActivationType represents the scalar function
/// applied to a node's weighted input sum in the
/// node's network equivalent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationType {
    // x
    Identity,
    // 1 / (1 + exp(-x))
    #[default]
    Sigmoid,
    // tanh(x)
    Tanh,
    // max(0, x)
    ReLU,
    // sin(πx)
    Sine,
    // exp(-x²)
    Gaussian,
}

impl ActivationType {
    /// Every available activation type.
    pub const ALL: [ActivationType; 6] = [
        ActivationType::Identity,
        ActivationType::Sigmoid,
        ActivationType::Tanh,
        ActivationType::ReLU,
        ActivationType::Sine,
        ActivationType::Gaussian,
    ];

    /// Applies the activation function to `x`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Identity.apply(-3.5), -3.5);
    /// assert_eq!(ActivationType::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(ActivationType::ReLU.apply(-1.0), 0.0);
    /// assert_eq!(ActivationType::Gaussian.apply(0.0), 1.0);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        match self {
            ActivationType::Identity => x,
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationType::Tanh => x.tanh(),
            ActivationType::ReLU => x.max(0.0),
            ActivationType::Sine => (PI * x).sin(),
            ActivationType::Gaussian => (-x * x).exp(),
        }
    }
}

/// A NodeRole indicates the function of
/// the node's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Receives one value of the input vector.
    Input,
    /// Always emits 1.0.
    Bias,
    /// Produces one value of the output vector.
    Output,
    /// Added by node mutations.
    Hidden,
}

impl NodeRole {
    /// Returns `true` for roles whose signal is set from
    /// outside the network (inputs and bias).
    pub fn is_sensor(self) -> bool {
        matches!(self, NodeRole::Input | NodeRole::Bias)
    }
}

/// Node genes are the structural elements of genomes
/// between which connection genes are created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NodeGene {
    id: NodeId,
    role: NodeRole,
    activation: ActivationType,
}

impl NodeGene {
    /// Generate a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{ActivationType, NodeGene, NodeRole};
    ///
    /// let node = NodeGene::new(5, NodeRole::Hidden, ActivationType::Tanh);
    ///
    /// assert_eq!(node.id(), 5);
    /// assert_eq!(node.role(), NodeRole::Hidden);
    /// assert_eq!(node.activation(), ActivationType::Tanh);
    /// ```
    pub fn new(id: NodeId, role: NodeRole, activation: ActivationType) -> NodeGene {
        NodeGene {
            id,
            role,
            activation,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn activation(&self) -> ActivationType {
        self.activation
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}, {:?}]", self.id, self.role, self.activation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_plain_logistic() {
        let s = ActivationType::Sigmoid;
        assert!((s.apply(2.0) - 1.0 / (1.0 + (-2.0f32).exp())).abs() < 1e-6);
        assert!((s.apply(2.0) + s.apply(-2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sine_and_tanh() {
        assert!(ActivationType::Sine.apply(0.5) > 0.99);
        assert!(ActivationType::Sine.apply(1.0).abs() < 1e-6);
        assert_eq!(ActivationType::Tanh.apply(0.0), 0.0);
    }

    #[test]
    fn default_activation_is_sigmoid() {
        assert_eq!(ActivationType::default(), ActivationType::Sigmoid);
    }

    #[test]
    fn sensor_roles() {
        assert!(NodeRole::Input.is_sensor());
        assert!(NodeRole::Bias.is_sensor());
        assert!(!NodeRole::Output.is_sensor());
        assert!(!NodeRole::Hidden.is_sensor());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&NodeRole::Bias).unwrap();
        assert_eq!(json, "\"bias\"");
        let activation: ActivationType = serde_json::from_str("\"relu\"").unwrap();
        assert_eq!(activation, ActivationType::ReLU);
    }
}
