use std::fs;
use std::path::{Path, PathBuf};

use scatter_sim::commands::cross_sections::{self, CrossSectionsArgs};
use scatter_sim::commands::find::{self, FindArgs, FindReport};
use scatter_sim::commands::reactions::{self, ReactionsArgs};
use tempfile::tempdir;

const REGISTRY: &str = r#"
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
"#;

const MODEL: &str = r#"
reactions:
  - incoming: [p, n]
    products: [p, n]
    process: elastic
    cross_section: !constant 40.0
"#;

const EVENT: &str = r#"{
  "dt": 2.0,
  "particles": [
    { "id": 0, "type": "p", "momentum": [1.0, 0.0, 0.0], "position": [0.0, -1.0, 0.0, 0.0] },
    { "id": 1, "type": "n", "momentum": [-1.0, 0.0, 0.0], "position": [0.0, 1.0, 0.5, 0.0] }
  ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input");
    path
}

fn find_args(dir: &Path, config: Option<PathBuf>, out: PathBuf) -> FindArgs {
    FindArgs {
        registry: write(dir, "registry.yaml", REGISTRY),
        model: write(dir, "model.yaml", MODEL),
        config,
        event: write(dir, "event.json", EVENT),
        cell: 0,
        out: Some(out),
    }
}

#[test]
fn find_writes_accepted_actions() {
    let temp = tempdir().expect("tmp dir");
    let out = temp.path().join("out").join("actions.json");
    find::run(&find_args(temp.path(), None, out.clone())).expect("find");

    let report: FindReport =
        serde_json::from_str(&fs::read_to_string(out).expect("read output")).expect("json");
    assert_eq!(report.actions.len(), 1);
    let action = &report.actions[0];
    assert_eq!(
        action.incoming.iter().map(|id| id.as_raw()).collect::<Vec<_>>(),
        vec![0, 1]
    );
    let expected = (0.938f64 * 0.938 + 1.0).sqrt();
    assert!((action.time_until_collision - expected).abs() < 1e-9);
    assert!((action.total_cross_section - 40.0).abs() < 1e-12);
}

#[test]
fn spectator_pair_is_not_reported() {
    let temp = tempdir().expect("tmp dir");
    let mut args = find_args(temp.path(), None, temp.path().join("actions.json"));
    let event = EVENT.replacen(
        "\"dt\": 2.0,",
        "\"dt\": 2.0, \"layout\": { \"n_total\": 2, \"n_projectile\": 0 },",
        1,
    );
    args.event = write(temp.path(), "event.json", &event);

    let report = find::report(&args).expect("find");
    assert!(report.actions.is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let temp = tempdir().expect("tmp dir");
    let config = write(temp.path(), "config.yaml", "testparticles: 0\n");
    let args = find_args(temp.path(), Some(config), temp.path().join("actions.json"));
    let err = find::report(&args).expect_err("zero test particles");
    assert!(err.to_string().contains("test-particle"));
}

#[test]
fn cross_sections_table_is_written() {
    let temp = tempdir().expect("tmp dir");
    let out = temp.path().join("pn.txt");
    let args = CrossSectionsArgs {
        registry: write(temp.path(), "registry.yaml", REGISTRY),
        model: write(temp.path(), "model.yaml", MODEL),
        config: None,
        a: "p".to_owned(),
        b: "n".to_owned(),
        final_state: false,
        plab: vec![3.0, 5.0, 3.0],
        mass_a: None,
        mass_b: None,
        json: false,
        out: Some(out.clone()),
    };
    cross_sections::run(&args).expect("cross sections");

    let text = fs::read_to_string(out).expect("read output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "# Dumping partial pn cross-sections in mb, energies in GeV"
    );
    assert!(lines[1].starts_with("   sqrt_s"));
    assert!(lines[1].ends_with("              pn"));
    assert_eq!(lines.len(), 4);

    let table = cross_sections::table(&args).expect("table");
    assert_eq!(table.sqrts.len(), 2);
}

#[test]
fn unknown_particle_type_fails() {
    let temp = tempdir().expect("tmp dir");
    let args = CrossSectionsArgs {
        registry: write(temp.path(), "registry.yaml", REGISTRY),
        model: write(temp.path(), "model.yaml", MODEL),
        config: None,
        a: "p".to_owned(),
        b: "Λ".to_owned(),
        final_state: false,
        plab: Vec::new(),
        mass_a: None,
        mass_b: None,
        json: true,
        out: None,
    };
    assert!(cross_sections::table(&args).is_err());
}

#[test]
fn reactions_listing_is_written() {
    let temp = tempdir().expect("tmp dir");
    let out = temp.path().join("reactions.txt");
    let args = ReactionsArgs {
        registry: write(temp.path(), "registry.yaml", REGISTRY),
        model: write(temp.path(), "model.yaml", MODEL),
        config: None,
        out: Some(out.clone()),
    };
    reactions::run(&args).expect("reactions");
    assert_eq!(
        fs::read_to_string(out).expect("read output"),
        "1 iso-particle types.\nThey can make 0 pairs.\nNN → NN (el)\n"
    );
}
