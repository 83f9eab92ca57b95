use serde::{Deserialize, Serialize};

/// Order in which the components of a [`PackInput`](crate::entities::PackInput) are placed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackOrderStrategy {
    /// Components with the most pads first, ties broken by footprint area
    #[default]
    LargestToSmallest,
    /// Components in the order they are listed
    FirstToLast,
}

/// How the position of a component sharing networks with already placed components is chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackPlacementStrategy {
    /// Searches the outline of the placed components for the point closest to the connected pads
    ShortestConnectionAlongOutline,
    /// Also optimizes each outline segment for the minimal sum of connection lengths
    #[default]
    MinimumSumDistanceToNetwork,
    /// Also optimizes each outline segment for the minimal sum of squared connection lengths
    MinimumSumSquaredDistanceToNetwork,
    /// Minimizes the sum of squared connection lengths, then pulls the closest connection as short as possible
    MinimumClosestSumSquaredDistance,
}

/// Whether distances are summed as-is or squared
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceMode {
    Linear,
    Squared,
}

impl DistanceMode {
    pub fn apply(self, d: f64) -> f64 {
        match self {
            DistanceMode::Linear => d,
            DistanceMode::Squared => d * d,
        }
    }
}

/// Optimizer to run on every outline segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizerKind {
    MultiOffset(DistanceMode),
    TwoPhase,
}

impl PackPlacementStrategy {
    /// Distance mode used to compare candidate placements
    pub fn distance_mode(self) -> DistanceMode {
        match self {
            PackPlacementStrategy::ShortestConnectionAlongOutline
            | PackPlacementStrategy::MinimumSumDistanceToNetwork => DistanceMode::Linear,
            PackPlacementStrategy::MinimumSumSquaredDistanceToNetwork
            | PackPlacementStrategy::MinimumClosestSumSquaredDistance => DistanceMode::Squared,
        }
    }

    /// Optimizer run per outline segment, `None` if the strategy only searches along the outline
    pub fn optimizer(self) -> Option<OptimizerKind> {
        match self {
            PackPlacementStrategy::ShortestConnectionAlongOutline => None,
            PackPlacementStrategy::MinimumSumDistanceToNetwork => {
                Some(OptimizerKind::MultiOffset(DistanceMode::Linear))
            }
            PackPlacementStrategy::MinimumSumSquaredDistanceToNetwork => {
                Some(OptimizerKind::MultiOffset(DistanceMode::Squared))
            }
            PackPlacementStrategy::MinimumClosestSumSquaredDistance => {
                Some(OptimizerKind::TwoPhase)
            }
        }
    }
}

/// Preferred direction for components that share no network with any placed component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectedPackDirection {
    Left,
    Right,
    /// Towards +y
    Up,
    /// Towards -y
    Down,
    /// Closest to the centroid of the placed components' centers
    #[default]
    NearestToCenter,
}
