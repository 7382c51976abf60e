//! Shared fixtures for engine integration tests.
//!
//! Builds engines over a temporary configuration directory and provides the
//! manifests most scenarios start from.

pub mod manifests;

use stratum_config::{ConfigEngine, InitializationReport, Manifest, UserFileLayout};
use test_helpers::TempConfigDir;

/// Engine reading and writing user files in `dir`.
pub fn engine_in(dir: &TempConfigDir) -> ConfigEngine {
    ConfigEngine::with_layout(UserFileLayout::new(dir.path().to_owned()))
}

/// Registers `manifests`, finalizes, marks every plugin present and
/// processes all systems, returning the engine with its report.
///
/// `enabled` lists the plugins switched on before processing.
pub fn boot(
    dir: &TempConfigDir,
    manifests: &[(&str, Manifest)],
    enabled: &[&str],
) -> (ConfigEngine, InitializationReport) {
    let mut engine = engine_in(dir);
    for (name, manifest) in manifests {
        engine.register_plugin_manifest(*name, manifest.clone());
    }
    let mut report = InitializationReport::new();
    engine.finalize(&mut report);
    let plugins: Vec<&str> = manifests
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| *name != stratum_config::FRAMEWORK)
        .collect();
    engine.reconcile_plugin_states(&plugins, &mut report);
    for name in enabled {
        engine.set_component_enabled(name, true, &mut report);
    }
    engine.process_all_system_configurations(&mut report);
    (engine, report)
}

/// Re-runs the startup sequence of `engine` against the files on disk.
pub fn reprocess(engine: &mut ConfigEngine) -> InitializationReport {
    let mut report = InitializationReport::new();
    engine.process_all_system_configurations(&mut report);
    report
}
