#![allow(clippy::unwrap_used)]

use radial_build::error::{LayoutError, ResolutionError};
use radial_build::layout::{LayoutConfig, LayoutDescription, LayoutEngine};
use radial_build::material::{Material, MaterialStore};
use radial_build::math::Point3;
use radial_build::model::{Color, Layer, RadialBuild};
use radial_build::operations::{PlasmaShape, ToroidalModel};
use radial_build::RadialBuildError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn materials() -> MaterialStore {
    MaterialStore::from_json_str(
        r#"{
            "RAFM": { "density": 7.8, "comp": { "Fe56": 0.9, "Cr52": 0.1 } },
            "PbLi": { "density": 9.806, "comp": { "Pb208": 0.83, "Li6": 0.17 } }
        }"#,
    )
    .unwrap()
}

fn sol_fw_gap() -> RadialBuild {
    RadialBuild::new(vec![
        Layer::new("sol")
            .with_thickness(5.0)
            .with_constituent("Void", 1.0),
        Layer::new("fw")
            .with_thickness(4.0)
            .with_constituent("RAFM", 1.0)
            .with_material("RAFM"),
        Layer::new("gap").with_thickness(0.0),
    ])
    .unwrap()
}

#[test]
fn geometry_and_layout_of_the_same_build() {
    init_tracing();
    let build = sol_fw_gap();

    let bundle = ToroidalModel::new(&build, PlasmaShape::new(800.0, 200.0, 100.0))
        .execute(&materials())
        .unwrap();
    let names: Vec<_> = bundle.cell_names().collect();
    assert_eq!(names, ["plasma_cell", "sol", "fw", "vac_cell"]);

    let mut engine = LayoutEngine::new(LayoutConfig::default())
        .unwrap()
        .with_seed(5);
    let layout = engine.layout(&build).unwrap();
    let rects: Vec<_> = layout.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(rects, ["sol", "fw", "gap"]);
    assert!(layout.total_width >= 9.0);
}

#[test]
fn every_layer_point_finds_its_cell() {
    let build = sol_fw_gap();
    let bundle = ToroidalModel::new(&build, PlasmaShape::new(800.0, 200.0, 100.0))
        .execute(&materials())
        .unwrap();
    let outboard = |r: f64| Point3::new(800.0 + r, 0.0, 0.0);
    assert_eq!(bundle.find_cell(&outboard(50.0)).unwrap(), bundle.plasma_cell());
    assert_eq!(bundle.find_cell(&outboard(102.0)).unwrap(), bundle.cell("sol"));
    assert_eq!(bundle.find_cell(&outboard(107.0)).unwrap(), bundle.cell("fw"));
    assert_eq!(bundle.find_cell(&outboard(120.0)).unwrap(), bundle.vacuum_cell());
}

#[test]
fn scores_produce_one_tally() {
    let build = RadialBuild::new(vec![
        Layer::new("fw").with_thickness(4.0).with_material("RAFM"),
        Layer::new("breeder")
            .with_thickness(40.0)
            .with_material("PbLi")
            .with_scores(["heating"]),
    ])
    .unwrap();
    let bundle = ToroidalModel::new(&build, PlasmaShape::new(800.0, 200.0, 100.0))
        .execute(&materials())
        .unwrap();
    assert_eq!(bundle.tallies.len(), 1);
    let tally = &bundle.tallies[0];
    assert_eq!(tally.scores, ["heating"]);
    assert_eq!(Some(tally.cell), bundle.cell("breeder"));
}

#[test]
fn unknown_material_aborts_the_build() {
    let build = RadialBuild::new(vec![Layer::new("fw")
        .with_thickness(4.0)
        .with_material("Unobtainium")])
    .unwrap();
    let err = ToroidalModel::new(&build, PlasmaShape::new(800.0, 200.0, 100.0))
        .execute(&materials())
        .unwrap_err();
    assert!(matches!(
        err,
        RadialBuildError::Resolution(ResolutionError::MaterialNotFound { ref name }) if name == "Unobtainium"
    ));
}

#[test]
fn resolved_material_keeps_its_name() {
    let mut store = materials();
    store.insert(Material::new("Tungsten").with_density(19.3));
    let id = store.resolve("Tungsten").unwrap();
    assert_eq!(store.get(id).unwrap().name, "Tungsten");
}

#[test]
fn palette_exhaustion_is_an_error() {
    let config = LayoutConfig {
        colors: Some(vec![Color::rgb(10, 20, 30), Color::rgb(40, 50, 60)]),
        ..LayoutConfig::default()
    };
    let build = RadialBuild::new(vec![Layer::new("a"), Layer::new("b"), Layer::new("c")]).unwrap();
    let err = LayoutEngine::new(config)
        .unwrap()
        .with_seed(1)
        .layout(&build)
        .unwrap_err();
    assert!(matches!(
        err,
        RadialBuildError::Layout(LayoutError::PaletteExhausted {
            requested: 3,
            available: 2
        })
    ));
}

#[test]
fn written_description_reloads_to_the_same_colors() {
    let dir = tempfile::tempdir().unwrap();
    let build = sol_fw_gap();
    let mut engine = LayoutEngine::new(LayoutConfig::default())
        .unwrap()
        .with_seed(9);
    let written = engine.plot_to_dir(&build, dir.path(), true).unwrap();

    let description = LayoutDescription::from_file(&written[1]).unwrap();
    let (config, reloaded) = description.into_parts();
    assert_eq!(config, LayoutConfig::default());
    assert_eq!(reloaded.len(), build.len());
    assert!(reloaded.iter().all(|l| l.color().is_some()));

    let mut again = LayoutEngine::new(config).unwrap();
    let first = engine.layout(&reloaded).unwrap();
    let second = again.layout(&reloaded).unwrap();
    assert_eq!(first, second);
}
