use std::f64::consts::FRAC_1_PI;
use std::sync::Arc;

use scatter_core::constants::{FM2_MB, MAXIMUM_CROSS_SECTION, REALLY_SMALL};
use scatter_core::errors::{ErrorInfo, ScatterError};
use scatter_core::history::{has_interacted, NucleusLayout};
use scatter_core::kinematics::FourVector;
use scatter_core::particle::ParticleData;
use scatter_core::registry::TypeRegistry;
use scatter_core::rng::{RandomSource, RngHandle};

use crate::action::{covariant_closest_approach, Action};
use crate::config::{CollisionCriterion, RunConfig};
use crate::model::{ChannelModel, ChannelSettings, CollisionBranch};

/// Per-step inputs shared by every candidate evaluated in one timestep.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Timestep length in fm/c.
    pub dt: f64,
    /// Frozen beam momenta of the initial nucleons, indexed by particle id.
    pub beam_momentum: &'a [FourVector],
    /// Interaction-history flags, indexed by particle id.
    pub nucleon_has_interacted: &'a [bool],
}

impl<'a> StepContext<'a> {
    /// Context without beam momenta or history.
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            beam_momentum: &[],
            nucleon_has_interacted: &[],
        }
    }

    /// Sets the frozen beam momenta.
    pub fn with_beam_momentum(mut self, beam_momentum: &'a [FourVector]) -> Self {
        self.beam_momentum = beam_momentum;
        self
    }

    /// Sets the interaction-history flags.
    pub fn with_history(mut self, nucleon_has_interacted: &'a [bool]) -> Self {
        self.nucleon_has_interacted = nucleon_has_interacted;
        self
    }

    /// Momentum used for timing: the beam momentum for untouched initial
    /// nucleons, the particle's own momentum otherwise.
    fn timing_momentum(&self, particle: &ParticleData) -> FourVector {
        let index = particle.id.index();
        match self.beam_momentum.get(index) {
            Some(beam) if !has_interacted(self.nucleon_has_interacted, particle.id) => *beam,
            _ => particle.momentum,
        }
    }
}

/// Finds scatterings between particles of one timestep.
///
/// Holds only read-only state; all randomness is supplied per call.
#[derive(Clone)]
pub struct ScatterActionsFinder {
    config: RunConfig,
    settings: ChannelSettings,
    registry: Arc<TypeRegistry>,
    model: Arc<dyn ChannelModel>,
    layout: NucleusLayout,
    constant_elastic_isotropic: bool,
}

impl std::fmt::Debug for ScatterActionsFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScatterActionsFinder")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("constant_elastic_isotropic", &self.constant_elastic_isotropic)
            .finish_non_exhaustive()
    }
}

impl ScatterActionsFinder {
    /// Creates a finder after validating the configuration.
    pub fn new(
        config: RunConfig,
        registry: Arc<TypeRegistry>,
        model: Arc<dyn ChannelModel>,
        layout: NucleusLayout,
    ) -> Result<Self, ScatterError> {
        config.validate()?;
        let term = &config.collision_term;
        let constant_elastic_isotropic = registry.len() == 1
            && !term.two_to_one
            && term.isotropic
            && term.elastic_cross_section > 0.0;
        if constant_elastic_isotropic {
            log::info!(
                "Constant elastic isotropic cross-section mode: {} mb",
                term.elastic_cross_section
            );
        }
        let settings = ChannelSettings::from(term);
        Ok(Self {
            config,
            settings,
            registry,
            model,
            layout,
            constant_elastic_isotropic,
        })
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Active criterion.
    pub fn criterion(&self) -> CollisionCriterion {
        self.config.collision_term.collision_criterion
    }

    /// Type registry shared with the channel model.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Channel model consulted for every accepted candidate.
    pub fn model(&self) -> &dyn ChannelModel {
        self.model.as_ref()
    }

    /// Channel settings derived from the collision-term configuration.
    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }

    /// Initial-nucleus layout used by the spectator rule.
    pub fn layout(&self) -> NucleusLayout {
        self.layout
    }

    /// Whether the run uses a single species with a constant isotropic elastic
    /// cross section.
    pub fn is_constant_elastic_isotropic(&self) -> bool {
        self.constant_elastic_isotropic
    }

    /// Largest squared transverse distance (fm²) at which any channel can be
    /// accepted.
    pub fn max_transverse_distance_sqr(&self, testparticles: u32) -> f64 {
        let max_cross_section = if self.constant_elastic_isotropic {
            self.config.collision_term.elastic_cross_section
        } else {
            MAXIMUM_CROSS_SECTION
        };
        max_cross_section / f64::from(testparticles) * FM2_MB * FRAC_1_PI
    }

    /// Seeded random source for one cell of the step.
    pub fn cell_rng(&self, cell: u64) -> RngHandle {
        RngHandle::substream(self.config.seed, cell)
    }

    /// Time until the pair collides, or a negative value when it never does.
    ///
    /// Untouched initial nucleons move with their frozen beam momentum.
    /// Stochastic timing is drawn in the evaluator instead.
    pub fn collision_time(&self, a: &ParticleData, b: &ParticleData, ctx: &StepContext<'_>) -> f64 {
        let momentum_a = ctx.timing_momentum(a);
        let momentum_b = ctx.timing_momentum(b);
        match self.criterion() {
            CollisionCriterion::Covariant => covariant_closest_approach(
                &a.position,
                &momentum_a,
                &b.position,
                &momentum_b,
            )
            .map_or(-1.0, |approach| approach.time),
            CollisionCriterion::Geometric | CollisionCriterion::Stochastic => {
                let delta_v = momentum_a.velocity() - momentum_b.velocity();
                let delta_v_sqr = delta_v.sqr();
                if delta_v_sqr < REALLY_SMALL {
                    return -1.0;
                }
                let delta_r = a.position.threevec() - b.position.threevec();
                -delta_r.dot(&delta_v) / delta_v_sqr
            }
        }
    }

    /// Evaluates a pair of particles and returns the action if it collides in
    /// this step.
    pub fn check_collision_two_part<'p, R>(
        &self,
        a: &'p ParticleData,
        b: &'p ParticleData,
        cell_vol: f64,
        ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> Result<Option<Action<'p>>, ScatterError>
    where
        R: RandomSource + ?Sized,
    {
        if self
            .layout
            .is_spectator_pair(a, b, ctx.nucleon_has_interacted)
        {
            return Ok(None);
        }

        let criterion = self.criterion();
        if criterion == CollisionCriterion::Stochastic && cell_vol < REALLY_SMALL {
            return Ok(None);
        }

        let time_until_collision = match criterion {
            CollisionCriterion::Stochastic => ctx.dt * rng.uniform(0.0, 1.0),
            _ => self.collision_time(a, b, ctx),
        };
        if time_until_collision < 0.0 || time_until_collision >= ctx.dt {
            return Ok(None);
        }

        let term = &self.config.collision_term;
        let mut action = Action::new(
            vec![a, b],
            time_until_collision,
            criterion,
            term.isotropic,
            term.string_parameters.formation_time,
        );

        let testparticles = self.config.testparticles;
        let distance_sqr = match criterion {
            CollisionCriterion::Geometric => action.transverse_distance_sqr(),
            CollisionCriterion::Covariant => action.cov_transverse_distance_sqr(),
            CollisionCriterion::Stochastic => 0.0,
        };
        if criterion != CollisionCriterion::Stochastic
            && distance_sqr >= self.max_transverse_distance_sqr(testparticles)
        {
            return Ok(None);
        }

        action.add_channels(
            self.model
                .collision_channels(&self.registry, a, b, &self.settings),
        );

        let xs = action.total_cross_section() * FM2_MB / f64::from(testparticles)
            * a.xsec_scaling_factor(time_until_collision)
            * b.xsec_scaling_factor(time_until_collision);

        if criterion == CollisionCriterion::Stochastic {
            let v_rel = action.relative_velocity();
            let probability = xs * v_rel * ctx.dt / cell_vol;
            log::debug!(
                "stochastic criterion: prob = {probability}, xs = {xs}, v_rel = {v_rel}, dt = {}, cell_vol = {cell_vol}, testparticles = {testparticles}",
                ctx.dt
            );
            if probability > 1.0 {
                return Err(ScatterError::Probability(
                    ErrorInfo::new(
                        "probability-overflow",
                        "two-particle collision probability exceeds 1",
                    )
                    .with_context("criterion", criterion.as_str())
                    .with_context("probability", probability)
                    .with_context("cross_section_fm2", xs)
                    .with_context("v_rel", v_rel)
                    .with_context("dt", ctx.dt)
                    .with_context("cell_vol", cell_vol)
                    .with_context("testparticles", testparticles)
                    .with_hint("decrease the timestep or increase the cell volume"),
                ));
            }
            if rng.uniform(0.0, 1.0) > probability {
                return Ok(None);
            }
        } else {
            if a.id_process > 0 && a.id_process == b.id_process {
                log::debug!(
                    "skipping collided particles {} and {} (process {})",
                    a.id.as_raw(),
                    b.id.as_raw(),
                    a.id_process
                );
                return Ok(None);
            }
            if distance_sqr >= xs * FRAC_1_PI {
                return Ok(None);
            }
            log::debug!(
                "particles {} and {}: distance squared {distance_sqr} fm², time until collision {time_until_collision} fm/c",
                a.id.as_raw(),
                b.id.as_raw()
            );
        }

        Ok(Some(action))
    }

    /// Evaluates a group of three particles under the stochastic criterion.
    pub fn check_collision_multi_part<'p, R>(
        &self,
        incoming: &[&'p ParticleData],
        cell_vol: f64,
        ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> Result<Option<Action<'p>>, ScatterError>
    where
        R: RandomSource + ?Sized,
    {
        if cell_vol < REALLY_SMALL {
            return Ok(None);
        }
        if self.config.testparticles != 1 {
            return Err(ScatterError::Config(
                ErrorInfo::new(
                    "multi-particle-testparticles",
                    "multi-particle reactions require exactly one test particle",
                )
                .with_context("testparticles", self.config.testparticles),
            ));
        }
        if incoming.len() != 3 {
            return Ok(None);
        }

        let time_until_collision = ctx.dt * rng.uniform(0.0, 1.0);

        let branches = self.model.multi_particle_channels(&self.registry, incoming);
        if branches.is_empty() {
            return Ok(None);
        }
        let channels: Vec<CollisionBranch> = branches
            .into_iter()
            .map(|branch| {
                let probability = self.model.multi_particle_probability(
                    &self.registry,
                    incoming,
                    &branch,
                    ctx.dt,
                    cell_vol,
                );
                CollisionBranch::new(branch.products, branch.process, probability)
            })
            .collect();

        let term = &self.config.collision_term;
        let mut action = Action::new(
            incoming.to_vec(),
            time_until_collision,
            self.criterion(),
            term.isotropic,
            term.string_parameters.formation_time,
        );
        action.add_channels(channels);

        let probability = action.total_cross_section();
        if probability > 1.0 {
            return Err(ScatterError::Probability(
                ErrorInfo::new(
                    "probability-overflow",
                    "multi-particle collision probability exceeds 1",
                )
                .with_context("criterion", self.criterion().as_str())
                .with_context("probability", probability)
                .with_context("dt", ctx.dt)
                .with_context("cell_vol", cell_vol)
                .with_hint("decrease the timestep or increase the cell volume"),
            ));
        }
        if rng.uniform(0.0, 1.0) > probability {
            return Ok(None);
        }
        Ok(Some(action))
    }

    /// Searches all pairs (and, under the stochastic criterion, all triples)
    /// of one cell.
    pub fn find_actions_in_cell<'p, R>(
        &self,
        search_list: &'p [ParticleData],
        cell_vol: f64,
        ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> Result<Vec<Action<'p>>, ScatterError>
    where
        R: RandomSource + ?Sized,
    {
        let mut actions = Vec::new();
        for p1 in search_list {
            for p2 in search_list {
                if p1.id >= p2.id {
                    continue;
                }
                if let Some(action) = self.check_collision_two_part(p1, p2, cell_vol, ctx, rng)? {
                    actions.push(action);
                }
                if self.criterion() != CollisionCriterion::Stochastic {
                    continue;
                }
                for p3 in search_list {
                    if p2.id >= p3.id {
                        continue;
                    }
                    if let Some(action) =
                        self.check_collision_multi_part(&[p1, p2, p3], cell_vol, ctx, rng)?
                    {
                        actions.push(action);
                    }
                }
            }
        }
        Ok(actions)
    }

    /// Searches pairs between a cell and its neighbouring cells.
    ///
    /// Always empty under the stochastic criterion, which only acts within cells.
    pub fn find_actions_with_neighbors<'p, R>(
        &self,
        search_list: &'p [ParticleData],
        neighbors_list: &'p [ParticleData],
        ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> Result<Vec<Action<'p>>, ScatterError>
    where
        R: RandomSource + ?Sized,
    {
        let mut actions = Vec::new();
        if self.criterion() == CollisionCriterion::Stochastic {
            return Ok(actions);
        }
        for p1 in search_list {
            for p2 in neighbors_list {
                debug_assert_ne!(p1.id, p2.id);
                if let Some(action) = self.check_collision_two_part(p1, p2, 0.0, ctx, rng)? {
                    actions.push(action);
                }
            }
        }
        Ok(actions)
    }

    /// Searches pairs between a cell and the particles outside the grid.
    ///
    /// Surrounding particles that also appear in the search list are skipped.
    pub fn find_actions_with_surrounding_particles<'p, R>(
        &self,
        search_list: &'p [ParticleData],
        surrounding_list: &'p [ParticleData],
        ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> Result<Vec<Action<'p>>, ScatterError>
    where
        R: RandomSource + ?Sized,
    {
        let mut actions = Vec::new();
        if self.criterion() == CollisionCriterion::Stochastic {
            return Ok(actions);
        }
        for p2 in surrounding_list {
            if search_list.iter().any(|p| p.id == p2.id) {
                continue;
            }
            for p1 in search_list {
                if let Some(action) = self.check_collision_two_part(p1, p2, 0.0, ctx, rng)? {
                    actions.push(action);
                }
            }
        }
        Ok(actions)
    }
}
