mod common;

use common::{model, particle, registry};
use scatter_core::particle::ParticleData;
use scatter_core::registry::TypeRegistry;
use scatter_core::ScatterError;
use scatter_find::{
    ChannelModel, ChannelSettings, CollisionBranch, IncludedReaction, NNbarTreatment, ProcessKind,
    RunConfig, TabulatedModel,
};

/// Back-to-back pair with centre-of-mass momentum `pcm` along x.
fn pair(registry: &TypeRegistry, a: &str, b: &str, pcm: f64) -> (ParticleData, ParticleData) {
    (
        particle(registry, 0, a, [0.0; 3], [pcm, 0.0, 0.0]),
        particle(registry, 1, b, [0.0; 3], [-pcm, 0.0, 0.0]),
    )
}

fn channels(
    model: &TabulatedModel,
    registry: &TypeRegistry,
    pair: &(ParticleData, ParticleData),
    settings: &ChannelSettings,
) -> Vec<CollisionBranch> {
    model.collision_channels(registry, &pair.0, &pair.1, settings)
}

fn processes(channels: &[CollisionBranch]) -> Vec<ProcessKind> {
    channels.iter().map(|branch| branch.process).collect()
}

#[test]
fn resonance_formation_peaks_at_the_pole() {
    let registry = registry();
    let model = model(&registry);
    let settings = ChannelSettings::default();
    // p_cm ≈ 0.227 GeV puts the p π+ invariant mass at 1.232 GeV.
    let on_pole = pair(&registry, "p", "π+", 0.2273);
    let found = channels(&model, &registry, &on_pole, &settings);
    let formation: Vec<_> = found
        .iter()
        .filter(|branch| branch.process == ProcessKind::TwoToOne)
        .collect();
    assert_eq!(formation.len(), 1);
    assert_eq!(formation[0].products, vec![registry.find("Δ++").unwrap()]);
    assert!(formation[0].weight > 190.0 && formation[0].weight <= 200.0);

    let far = pair(&registry, "p", "π+", 1.5);
    let off_peak = channels(&model, &registry, &far, &settings);
    let weight: f64 = off_peak
        .iter()
        .filter(|branch| branch.process == ProcessKind::TwoToOne)
        .map(|branch| branch.weight)
        .sum();
    assert!(weight < 5.0);
}

#[test]
fn two_to_one_switch_removes_resonance_formation() {
    let registry = registry();
    let model = model(&registry);
    let mut settings = ChannelSettings::default();
    settings.two_to_one = false;
    let on_pole = pair(&registry, "p", "π+", 0.2273);
    let found = channels(&model, &registry, &on_pole, &settings);
    assert!(!processes(&found).contains(&ProcessKind::TwoToOne));
}

#[test]
fn elastic_override_replaces_tabulated_value() {
    let registry = registry();
    let model = model(&registry);
    let mut settings = ChannelSettings::default();
    settings.elastic_parameter = 12.5;
    let nucleons = pair(&registry, "p", "n", 1.0);
    let found = channels(&model, &registry, &nucleons, &settings);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].weight, 12.5);

    // Pairs without an elastic entry receive the override as well.
    let pions = pair(&registry, "π+", "π0", 0.5);
    let found = channels(&model, &registry, &pions, &settings);
    assert_eq!(processes(&found), vec![ProcessKind::Elastic]);
    assert_eq!(found[0].weight, 12.5);
}

#[test]
fn zero_elastic_override_switches_elastic_off() {
    let registry = registry();
    let model = model(&registry);
    let mut settings = ChannelSettings::default();
    settings.elastic_parameter = 0.0;

    let nucleons = pair(&registry, "p", "n", 1.0);
    assert!(channels(&model, &registry, &nucleons, &settings).is_empty());

    // Untabulated pairs get no fallback elastic either.
    let pions = pair(&registry, "π+", "π0", 0.5);
    assert!(channels(&model, &registry, &pions, &settings).is_empty());

    let annihilating = pair(&registry, "p", "p̅", 1.0);
    let found = channels(&model, &registry, &annihilating, &settings);
    assert!(!processes(&found).contains(&ProcessKind::Elastic));
    assert!(processes(&found).contains(&ProcessKind::StringSoft));
}

#[test]
fn elastic_nucleon_pairs_respect_the_cutoff() {
    let registry = registry();
    let model = model(&registry);
    let settings = ChannelSettings::default();
    // √s ≈ 1.90 GeV lies below the default 1.98 GeV cutoff.
    let slow = pair(&registry, "p", "n", 0.3);
    assert!(channels(&model, &registry, &slow, &settings).is_empty());

    let mut relaxed = settings.clone();
    relaxed.elastic_nn_cutoff_sqrts = 1.88;
    assert_eq!(channels(&model, &registry, &slow, &relaxed).len(), 1);
}

#[test]
fn excluding_elastic_drops_elastic_channels() {
    let registry = registry();
    let model = model(&registry);
    let mut settings = ChannelSettings::default();
    settings.included_2to2.remove(&IncludedReaction::Elastic);
    let nucleons = pair(&registry, "p", "n", 1.0);
    assert!(channels(&model, &registry, &nucleons, &settings).is_empty());
}

#[test]
fn additive_quark_model_covers_untabulated_pairs() {
    let registry = registry();
    let model = model(&registry);
    let settings = ChannelSettings::default();
    let pions = pair(&registry, "π+", "π0", 0.5);
    let found = channels(&model, &registry, &pions, &settings);
    assert_eq!(found.len(), 1);
    assert!((found[0].weight - 20.0 * 4.0 / 9.0).abs() < 1e-12);

    let meson_baryon = pair(&registry, "n", "π0", 0.5);
    let found = channels(&model, &registry, &meson_baryon, &settings);
    assert!((found[0].weight - 20.0 * 2.0 / 3.0).abs() < 1e-12);

    let mut without_aqm = settings.clone();
    without_aqm.use_aqm = false;
    assert!(channels(&model, &registry, &pions, &without_aqm).is_empty());
}

#[test]
fn nnbar_treatment_selects_annihilation_channels() {
    let registry = registry();
    let model = model(&registry);
    let annihilation = pair(&registry, "p", "p̅", 1.0);

    let strings = ChannelSettings::default();
    let found = processes(&channels(&model, &registry, &annihilation, &strings));
    assert_eq!(found, vec![ProcessKind::Elastic, ProcessKind::StringSoft]);

    let mut resonances = ChannelSettings::default();
    resonances.nnbar_treatment = NNbarTreatment::Resonances;
    let found = processes(&channels(&model, &registry, &annihilation, &resonances));
    assert_eq!(found, vec![ProcessKind::Elastic, ProcessKind::TwoToTwo]);

    let mut none = ChannelSettings::default();
    none.nnbar_treatment = NNbarTreatment::NoAnnihilation;
    let found = processes(&channels(&model, &registry, &annihilation, &none));
    assert_eq!(found, vec![ProcessKind::Elastic]);

    let mut no_strings = ChannelSettings::default();
    no_strings.strings = false;
    let found = processes(&channels(&model, &registry, &annihilation, &no_strings));
    assert_eq!(found, vec![ProcessKind::Elastic]);
}

#[test]
fn string_channels_describe_themselves() {
    let registry = registry();
    let branch = CollisionBranch::new(Vec::new(), ProcessKind::StringSoft, 1.0);
    assert_eq!(branch.description(&registry), "string (soft)");
    let hard = CollisionBranch::new(Vec::new(), ProcessKind::StringHard, 1.0);
    assert_eq!(hard.description(&registry), "string (hard)");
}

#[test]
fn settings_follow_the_run_configuration() {
    let yaml = r#"
collision_term:
  elastic_cross_section: 30.0
  two_to_one: false
  included_2to2: [Elastic, NN_to_NR]
  nnbar_treatment: "no annihilation"
"#;
    let config = RunConfig::from_yaml_str(yaml).unwrap();
    let settings = ChannelSettings::from(&config.collision_term);
    assert_eq!(settings.elastic_parameter, 30.0);
    assert!(!settings.two_to_one);
    assert_eq!(settings.included_2to2.len(), 2);
    assert_eq!(settings.nnbar_treatment, NNbarTreatment::NoAnnihilation);
    assert!(settings.strings);
}

#[test]
fn malformed_tables_are_rejected() {
    let registry = registry();
    let unknown = "reactions:\n  - incoming: [p, X]\n    products: [p, X]\n    process: elastic\n    cross_section: !constant 1.0\n";
    let err = TabulatedModel::from_yaml_str(unknown, &registry).unwrap_err();
    assert!(matches!(err, ScatterError::Registry(_)));

    let mismatched = "reactions:\n  - incoming: [p, n]\n    products: [p, p]\n    process: elastic\n    cross_section: !constant 1.0\n";
    let err = TabulatedModel::from_yaml_str(mismatched, &registry).unwrap_err();
    assert_eq!(err.info().code, "reaction-elastic");

    let single = "reactions:\n  - incoming: [p]\n    products: [p]\n    process: elastic\n    cross_section: !constant 1.0\n";
    let err = TabulatedModel::from_yaml_str(single, &registry).unwrap_err();
    assert_eq!(err.info().code, "reaction-arity");

    let err = TabulatedModel::from_yaml_str("reactions: 3", &registry).unwrap_err();
    assert!(matches!(err, ScatterError::Serde(_)));
}
