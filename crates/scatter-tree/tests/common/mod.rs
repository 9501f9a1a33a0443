#![allow(dead_code)]

use scatter_core::particle::{ParticleData, ParticleId};
use scatter_core::registry::{TypeId, TypeRegistry};
use scatter_find::TabulatedModel;

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
  - name: "Δ0"
    iso: "Δ"
    mass: 1.232
    width: 0.117
    baryon_number: 1
    decays:
      - weight: 1.0
        products: [p, "π-"]
      - weight: 2.0
        products: [n, "π0"]
  - name: "ρ0"
    iso: "ρ"
    mass: 0.776
    width: 0.149
    decays:
      - weight: 1.0
        products: ["π+", "π-"]
  - name: X
    mass: 1.0
    width: 0.2
    decays:
      - weight: 1.0
        products: ["Δ++", "Δ++"]
"#;

pub const MODEL: &str = r#"
reactions:
  - incoming: [p, n]
    products: [p, n]
    process: elastic
    cross_section: !constant 40.0
  - incoming: [p, n]
    products: [p, "Δ0"]
    process: two_to_two
    family: NN_to_NR
    cross_section: !constant 10.0
  - incoming: [p, "π+"]
    products: ["Δ++"]
    process: two_to_one
    cross_section: !breit_wigner { peak: 200.0, mass: 1.232, width: 0.117 }
  - incoming: ["π+", "π-"]
    products: ["ρ0"]
    process: two_to_one
    cross_section: !breit_wigner { peak: 50.0, mass: 0.776, width: 0.149 }
  - incoming: ["π+", "π-"]
    products: [X]
    process: two_to_one
    cross_section: !constant 10.0
"#;

pub fn registry() -> TypeRegistry {
    TypeRegistry::from_yaml_str(REGISTRY).unwrap()
}

pub fn model(registry: &TypeRegistry) -> TabulatedModel {
    TabulatedModel::from_yaml_str(MODEL, registry).unwrap()
}

pub fn id(registry: &TypeRegistry, name: &str) -> TypeId {
    registry.find(name).unwrap()
}

/// Pair of particles at rest mass colliding with centre-of-mass momentum `pcm` along x.
pub fn colliding_pair(
    registry: &TypeRegistry,
    a: &str,
    b: &str,
    pcm: f64,
) -> (ParticleData, ParticleData) {
    let (a, b) = (id(registry, a), id(registry, b));
    let (mass_a, mass_b) = (registry.get(a).mass, registry.get(b).mass);
    let mut first = ParticleData::new(ParticleId::from_raw(0), a, mass_a);
    let mut second = ParticleData::new(ParticleId::from_raw(1), b, mass_b);
    first.set_4momentum(mass_a, pcm, 0.0, 0.0);
    second.set_4momentum(mass_b, -pcm, 0.0, 0.0);
    (first, second)
}
