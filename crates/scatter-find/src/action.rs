//! Interaction descriptors handed to the execution stage.

use scatter_core::constants::REALLY_SMALL;
use scatter_core::kinematics::{FourVector, ThreeVector};
use scatter_core::particle::{ParticleData, ParticleId};
use scatter_core::registry::TypeRegistry;
use serde::{Deserialize, Serialize};

use crate::config::CollisionCriterion;
use crate::model::CollisionBranch;

/// Number of participants of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Two incoming particles.
    TwoBody,
    /// Three or more incoming particles.
    MultiBody,
}

/// Accepted candidate interaction.
///
/// Participants are borrowed from the caller's particle list, so an action
/// must be consumed before that list changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Action<'p> {
    incoming: Vec<&'p ParticleData>,
    time_until_collision: f64,
    criterion: CollisionCriterion,
    channels: Vec<CollisionBranch>,
    total_cross_section: f64,
    isotropic: bool,
    string_formation_time: f64,
}

impl<'p> Action<'p> {
    pub(crate) fn new(
        incoming: Vec<&'p ParticleData>,
        time_until_collision: f64,
        criterion: CollisionCriterion,
        isotropic: bool,
        string_formation_time: f64,
    ) -> Self {
        Self {
            incoming,
            time_until_collision,
            criterion,
            channels: Vec::new(),
            total_cross_section: 0.0,
            isotropic,
            string_formation_time,
        }
    }

    /// Attaches outgoing channels; the total cross section is their summed weight.
    pub fn add_channels(&mut self, channels: Vec<CollisionBranch>) {
        for channel in channels {
            self.total_cross_section += channel.weight;
            self.channels.push(channel);
        }
    }

    /// Participants in evaluation order.
    pub fn incoming(&self) -> &[&'p ParticleData] {
        &self.incoming
    }

    /// Two-body or multi-body.
    pub fn kind(&self) -> ActionKind {
        if self.incoming.len() == 2 {
            ActionKind::TwoBody
        } else {
            ActionKind::MultiBody
        }
    }

    /// Time in fm/c from the start of the step until the interaction.
    pub fn time_until_collision(&self) -> f64 {
        self.time_until_collision
    }

    /// Criterion that accepted the action.
    pub fn criterion(&self) -> CollisionCriterion {
        self.criterion
    }

    /// Attached channels.
    pub fn channels(&self) -> &[CollisionBranch] {
        &self.channels
    }

    /// Sum of the channel weights, in mb for two-body actions.
    pub fn total_cross_section(&self) -> f64 {
        self.total_cross_section
    }

    /// Whether the final state is sampled isotropically.
    pub fn is_isotropic(&self) -> bool {
        self.isotropic
    }

    /// Formation time for string fragments, in fm/c.
    pub fn string_formation_time(&self) -> f64 {
        self.string_formation_time
    }

    fn total_momentum(&self) -> FourVector {
        self.incoming
            .iter()
            .fold(FourVector::default(), |sum, p| sum + p.momentum)
    }

    /// Invariant mass of all participants.
    pub fn sqrt_s(&self) -> f64 {
        self.total_momentum().abs()
    }

    /// Velocity of the participants' centre-of-momentum frame.
    pub fn beta_cm(&self) -> ThreeVector {
        self.total_momentum().velocity()
    }

    /// Relative velocity of the first two participants.
    pub fn relative_velocity(&self) -> f64 {
        relative_velocity(&self.incoming[0].momentum, &self.incoming[1].momentum)
    }

    /// Squared transverse distance of the first two participants, evaluated
    /// in their centre-of-momentum frame.
    pub fn transverse_distance_sqr(&self) -> f64 {
        transverse_distance_sqr(self.incoming[0], self.incoming[1])
    }

    /// Squared transverse distance from the covariant closest-approach condition.
    pub fn cov_transverse_distance_sqr(&self) -> f64 {
        covariant_closest_approach(
            &self.incoming[0].position,
            &self.incoming[0].momentum,
            &self.incoming[1].position,
            &self.incoming[1].momentum,
        )
        .map_or(f64::INFINITY, |approach| approach.distance_sqr)
    }

    /// Serializable view of the action.
    pub fn summary(&self, registry: &TypeRegistry) -> ActionSummary {
        ActionSummary {
            incoming: self.incoming.iter().map(|p| p.id).collect(),
            kind: self.kind(),
            criterion: self.criterion,
            time_until_collision: self.time_until_collision,
            sqrt_s: self.sqrt_s(),
            total_cross_section: self.total_cross_section,
            channels: self
                .channels
                .iter()
                .map(|channel| ChannelSummary {
                    description: channel.description(registry),
                    weight: channel.weight,
                })
                .collect(),
        }
    }
}

/// Channel entry of an [`ActionSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Channel label.
    pub description: String,
    /// Channel weight.
    pub weight: f64,
}

/// Owned, serializable description of an accepted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSummary {
    /// Participant ids.
    pub incoming: Vec<ParticleId>,
    /// Two-body or multi-body.
    pub kind: ActionKind,
    /// Criterion that accepted the action.
    pub criterion: CollisionCriterion,
    /// Time until the interaction in fm/c.
    pub time_until_collision: f64,
    /// Invariant mass of the participants in GeV.
    pub sqrt_s: f64,
    /// Summed channel weight.
    pub total_cross_section: f64,
    /// Attached channels.
    pub channels: Vec<ChannelSummary>,
}

/// Relative velocity `sqrt((pa·pb)² - ma²mb²) / (Ea Eb)`.
pub fn relative_velocity(pa: &FourVector, pb: &FourVector) -> f64 {
    let pab = pa.dot(pb);
    let radicand = pab * pab - pa.sqr() * pb.sqr();
    radicand.max(0.0).sqrt() / (pa.x0 * pb.x0)
}

/// Squared transverse distance of two particles in their centre-of-momentum frame.
pub fn transverse_distance_sqr(a: &ParticleData, b: &ParticleData) -> f64 {
    let beta = (a.momentum + b.momentum).velocity();
    let delta_x =
        a.position.lorentz_boost(beta).threevec() - b.position.lorentz_boost(beta).threevec();
    let delta_p =
        a.momentum.lorentz_boost(beta).threevec() - b.momentum.lorentz_boost(beta).threevec();
    let x_sqr = delta_x.sqr();
    let p_sqr = delta_p.sqr();
    if p_sqr < REALLY_SMALL {
        return x_sqr;
    }
    let projection = delta_x.dot(&delta_p);
    x_sqr - projection * projection / p_sqr
}

/// Result of the covariant closest-approach condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    /// Affine parameter along the first trajectory.
    pub lambda_a: f64,
    /// Affine parameter along the second trajectory.
    pub lambda_b: f64,
    /// Mean coordinate time of the two closest-approach points.
    pub time: f64,
    /// Squared (space-like) separation at closest approach.
    pub distance_sqr: f64,
}

/// Solves for the points on both straight world lines whose separation is
/// orthogonal to both four-momenta.
///
/// Returns `None` when the momenta are (numerically) parallel.
pub fn covariant_closest_approach(
    xa: &FourVector,
    pa: &FourVector,
    xb: &FourVector,
    pb: &FourVector,
) -> Option<ClosestApproach> {
    let delta_x = *xa - *xb;
    let pab = pa.dot(pb);
    let pa_sqr = pa.sqr();
    let pb_sqr = pb.sqr();
    let determinant = pab * pab - pa_sqr * pb_sqr;
    if determinant.abs() < REALLY_SMALL * REALLY_SMALL {
        return None;
    }
    let pa_dx = pa.dot(&delta_x);
    let pb_dx = pb.dot(&delta_x);
    let lambda_a = (pb_sqr * pa_dx - pab * pb_dx) / determinant;
    let lambda_b = (pab * pa_dx - pa_sqr * pb_dx) / determinant;
    let separation = delta_x + *pa * lambda_a - *pb * lambda_b;
    Some(ClosestApproach {
        lambda_a,
        lambda_b,
        time: 0.5 * (lambda_a * pa.x0 + lambda_b * pb.x0),
        distance_sqr: -separation.sqr(),
    })
}
