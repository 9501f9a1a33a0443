use scatter_core::registry::TypeRegistry;
use scatter_core::ScatterError;

const TABLE: &str = r#"
particles:
  - { name: p, iso: N, mass: 0.938, charge: 1, baryon_number: 1 }
  - { name: n, iso: N, mass: 0.940, baryon_number: 1 }
  - { name: π+, iso: π, mass: 0.138, charge: 1 }
  - { name: π0, iso: π, mass: 0.135 }
  - name: Δ++
    iso: Δ
    mass: 1.232
    width: 0.117
    charge: 2
    baryon_number: 1
    decays:
      - { weight: 2.0, products: [p, π+] }
      - { weight: 2.0, products: [p, π+, π0] }
"#;

#[test]
fn loads_types_and_normalizes_branches() {
    let registry = TypeRegistry::from_yaml_str(TABLE).expect("valid registry");
    assert_eq!(registry.len(), 5);

    let delta = registry.get(registry.find("Δ++").unwrap());
    assert!(!delta.is_stable());
    assert_eq!(delta.decay_modes.len(), 2);
    let total: f64 = delta.decay_modes.iter().map(|branch| branch.weight).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(registry.joined_names(&delta.decay_modes[0].products), "pπ+");

    let proton = registry.get(registry.find("p").unwrap());
    assert!(proton.is_stable());
    assert!(proton.is_baryon());
    assert_eq!(proton.valence_quarks(), 3);
}

#[test]
fn groups_iso_multiplets_in_registration_order() {
    let registry = TypeRegistry::from_yaml_str(TABLE).unwrap();
    let names: Vec<_> = registry
        .iso_multiplets()
        .into_iter()
        .map(|(name, states)| (name, states.len()))
        .collect();
    assert_eq!(
        names,
        vec![("N".to_string(), 2), ("π".to_string(), 2), ("Δ".to_string(), 1)]
    );
}

#[test]
fn iso_name_defaults_to_type_name() {
    let registry =
        TypeRegistry::from_yaml_str("particles:\n  - { name: K+, mass: 0.494 }\n").unwrap();
    assert_eq!(registry.get(registry.find("K+").unwrap()).iso_name, "K+");
}

#[test]
fn rejects_unknown_products() {
    let yaml = "particles:\n  - name: ρ0\n    mass: 0.776\n    width: 0.149\n    decays: [{ weight: 1.0, products: [π+, π-] }]\n";
    let err = TypeRegistry::from_yaml_str(yaml).unwrap_err();
    match err {
        ScatterError::Registry(info) => {
            assert_eq!(info.code, "unknown-product");
            assert_eq!(info.context["product"], "π+");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn rejects_duplicates_and_bad_masses() {
    let duplicate = "particles:\n  - { name: p, mass: 0.938 }\n  - { name: p, mass: 0.938 }\n";
    assert_eq!(
        TypeRegistry::from_yaml_str(duplicate).unwrap_err().info().code,
        "duplicate-type"
    );
    let negative = "particles:\n  - { name: p, mass: -1.0 }\n";
    assert_eq!(
        TypeRegistry::from_yaml_str(negative).unwrap_err().info().code,
        "invalid-mass"
    );
}

#[test]
fn malformed_yaml_is_a_serde_error() {
    let err = TypeRegistry::from_yaml_str("particles: [").unwrap_err();
    assert!(matches!(err, ScatterError::Serde(_)));
}

#[test]
fn unknown_lookup_reports_the_name() {
    let registry = TypeRegistry::from_yaml_str(TABLE).unwrap();
    let err = registry.find("Ω-").unwrap_err();
    assert_eq!(err.info().context["type"], "Ω-");
}

#[test]
fn rejects_decay_cycles() {
    let pair = r#"
particles:
  - { name: R, mass: 1.0, width: 0.1, decays: [{ weight: 1.0, products: [S] }] }
  - { name: S, mass: 1.0, width: 0.1, decays: [{ weight: 1.0, products: [R] }] }
"#;
    match TypeRegistry::from_yaml_str(pair).unwrap_err() {
        ScatterError::Registry(info) => {
            assert_eq!(info.code, "decay-cycle");
            assert_eq!(info.context["type"], "R");
        }
        other => panic!("unexpected error {other:?}"),
    }

    let own = "particles:\n  - { name: R, mass: 1.0, width: 0.1, decays: [{ weight: 1.0, products: [R] }] }\n";
    assert_eq!(
        TypeRegistry::from_yaml_str(own).unwrap_err().info().code,
        "decay-cycle"
    );
}

#[test]
fn shared_decay_products_are_not_cycles() {
    let chain = r#"
particles:
  - { name: p, mass: 0.938 }
  - { name: π+, mass: 0.138 }
  - { name: Δ++, mass: 1.232, width: 0.117, decays: [{ weight: 1.0, products: [p, π+] }] }
  - { name: X, mass: 2.5, width: 0.2, decays: [{ weight: 1.0, products: [Δ++, Δ++] }] }
"#;
    let registry = TypeRegistry::from_yaml_str(chain).expect("acyclic decays");
    assert_eq!(registry.len(), 4);
}
