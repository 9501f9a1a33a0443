#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scatter_core::history::NucleusLayout;
use scatter_core::kinematics::FourVector;
use scatter_core::particle::{ParticleData, ParticleId};
use scatter_core::registry::TypeRegistry;
use scatter_core::rng::RandomSource;
use scatter_find::{
    ChannelModel, ChannelSettings, CollisionBranch, CollisionCriterion, ProcessKind, RunConfig,
    ScatterActionsFinder, TabulatedModel,
};

pub const REGISTRY: &str = r#"
particles:
  - name: p
    iso: N
    mass: 0.938
    charge: 1
    baryon_number: 1
  - name: n
    iso: N
    mass: 0.938
    baryon_number: 1
  - name: "p̅"
    iso: "N̅"
    mass: 0.938
    charge: -1
    baryon_number: -1
  - name: "π+"
    iso: "π"
    mass: 0.138
    charge: 1
  - name: "π-"
    iso: "π"
    mass: 0.138
    charge: -1
  - name: "π0"
    iso: "π"
    mass: 0.138
  - name: "Δ++"
    iso: "Δ"
    mass: 1.232
    width: 0.117
    charge: 2
    baryon_number: 1
    decays:
      - weight: 1.0
        products: [p, "π+"]
  - name: "ω"
    mass: 0.782
    width: 0.0085
    decays:
      - weight: 0.9
        products: ["π+", "π-", "π0"]
      - weight: 0.1
        products: ["π+", "π-"]
"#;

pub const MODEL: &str = r#"
reactions:
  - incoming: [p, n]
    products: [p, n]
    process: elastic
    cross_section: !constant 40.0
  - incoming: [p, p]
    products: [p, p]
    process: elastic
    cross_section: !constant 40.0
  - incoming: [p, "π+"]
    products: ["Δ++"]
    process: two_to_one
    cross_section: !breit_wigner { peak: 200.0, mass: 1.232, width: 0.117 }
  - incoming: [p, "p̅"]
    products: [p, "p̅"]
    process: elastic
    cross_section: !constant 30.0
  - incoming: [p, "p̅"]
    process: string_soft
    cross_section: !constant 50.0
  - incoming: [p, "p̅"]
    products: ["π+", "π-"]
    process: two_to_two
    family: NNbar
    cross_section: !constant 5.0
aqm_elastic: 20.0
multi_particle_rate: 0.1
"#;

/// Scripted source returning the same fraction of the requested interval.
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.0
    }
}

/// Channel model with one constant elastic channel that counts its lookups.
pub struct CountingModel {
    weight: f64,
    calls: AtomicUsize,
}

impl CountingModel {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChannelModel for CountingModel {
    fn collision_channels(
        &self,
        _registry: &TypeRegistry,
        a: &ParticleData,
        b: &ParticleData,
        _settings: &ChannelSettings,
    ) -> Vec<CollisionBranch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![CollisionBranch::new(
            vec![a.type_id, b.type_id],
            ProcessKind::Elastic,
            self.weight,
        )]
    }

    fn multi_particle_channels(
        &self,
        _registry: &TypeRegistry,
        _incoming: &[&ParticleData],
    ) -> Vec<CollisionBranch> {
        Vec::new()
    }

    fn multi_particle_probability(
        &self,
        _registry: &TypeRegistry,
        _incoming: &[&ParticleData],
        _branch: &CollisionBranch,
        _dt: f64,
        _cell_vol: f64,
    ) -> f64 {
        0.0
    }
}

/// Finder over the shared registry whose channels come from `model`.
pub fn counting_finder(
    criterion: CollisionCriterion,
    model: Arc<CountingModel>,
) -> ScatterActionsFinder {
    ScatterActionsFinder::new(config(criterion), registry(), model, NucleusLayout::default())
        .unwrap()
}

pub fn registry() -> Arc<TypeRegistry> {
    Arc::new(TypeRegistry::from_yaml_str(REGISTRY).unwrap())
}

pub fn model(registry: &TypeRegistry) -> TabulatedModel {
    TabulatedModel::from_yaml_str(MODEL, registry).unwrap()
}

pub fn config(criterion: CollisionCriterion) -> RunConfig {
    let mut config = RunConfig::default();
    config.collision_term.collision_criterion = criterion;
    config
}

pub fn finder_with(config: RunConfig, layout: NucleusLayout) -> ScatterActionsFinder {
    let registry = registry();
    let model = model(&registry);
    ScatterActionsFinder::new(config, registry, Arc::new(model), layout).unwrap()
}

pub fn finder(criterion: CollisionCriterion) -> ScatterActionsFinder {
    finder_with(config(criterion), NucleusLayout::default())
}

pub fn particle(
    registry: &TypeRegistry,
    id: u32,
    name: &str,
    position: [f64; 3],
    momentum: [f64; 3],
) -> ParticleData {
    let type_id = registry.find(name).unwrap();
    let mass = registry.get(type_id).mass;
    let mut particle = ParticleData::new(ParticleId::from_raw(id), type_id, mass);
    particle.set_4momentum(mass, momentum[0], momentum[1], momentum[2]);
    particle.set_position(FourVector::new(0.0, position[0], position[1], position[2]));
    particle
}

/// Proton and neutron approaching head-on along x with impact parameter 0.5 fm.
pub fn head_on_pair(registry: &TypeRegistry) -> (ParticleData, ParticleData) {
    (
        particle(registry, 0, "p", [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
        particle(registry, 1, "n", [1.0, 0.5, 0.0], [-1.0, 0.0, 0.0]),
    )
}

/// Expected closest-approach time of [`head_on_pair`] in fm/c.
pub fn head_on_time() -> f64 {
    (0.938f64 * 0.938 + 1.0).sqrt()
}
