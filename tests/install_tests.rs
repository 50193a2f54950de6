//! Installation engine tests against an offline catalog mirror


use mcsmp::{Category, Error, InstallOutcome, Installer, LoaderTable, ProgressCallback};
use std::sync::{Arc, Mutex};
use test_utils::{MockVersion, TestCatalog, TestInstallation};

#[test]
fn test_install_then_already_current() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod").version(
        "P-sodium",
        MockVersion::new("v1", &["fabric"], 1).with_file("sodium-1.0.jar", b"sodium 1.0"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();

    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());
    let outcome = installer.install(&mut ledger, "Sodium", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert_eq!(install.read("mods/sodium-1.0.jar"), b"sodium 1.0");
    assert_eq!(
        ledger.filename(Category::Mod, None, "sodium"),
        Some("sodium-1.0.jar")
    );

    // A second run must not touch the catalog's artifacts
    mirror.remove_artifacts("v1");
    let outcome = installer.install(&mut ledger, "sodium", None).unwrap();
    assert_eq!(outcome, InstallOutcome::AlreadyCurrent);
    assert_eq!(install.read("mods/sodium-1.0.jar"), b"sodium 1.0");
}

#[test]
fn test_update_replaces_old_file_and_keeps_disabled_state() {
    let mirror = TestCatalog::new();
    mirror.project("P-lith", "lithium", "mod").version(
        "P-lith",
        MockVersion::new("v1", &["fabric"], 1).with_file("lithium-1.jar", b"one"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    installer.install(&mut ledger, "lithium", None).unwrap();
    mcsmp::set_package_enabled(&ledger, "lithium", None, false).unwrap();
    assert!(install.has_file("mods/lithium-1.jar.disabled"));

    mirror.version(
        "P-lith",
        MockVersion::new("v2", &["fabric"], 9).with_file("lithium-2.jar", b"two"),
    );
    let report = installer.update(&mut ledger, None).unwrap();

    assert_eq!(report.installed, vec!["lithium"]);
    assert!(report.errors.is_empty());
    assert_eq!(install.read("mods/lithium-2.jar.disabled"), b"two");
    assert!(!install.has_file("mods/lithium-2.jar"));
    assert!(!install.has_file("mods/lithium-1.jar"));
    assert!(!install.has_file("mods/lithium-1.jar.disabled"));
    assert_eq!(
        ledger.filename(Category::Mod, None, "lithium"),
        Some("lithium-2.jar")
    );
}

#[test]
fn test_corrupted_file_is_downloaded_again() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod").version(
        "P-sodium",
        MockVersion::new("v1", &["fabric"], 1).with_file("sodium.jar", b"good bytes"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    installer.install(&mut ledger, "sodium", None).unwrap();
    std::fs::write(install.file("mods/sodium.jar"), b"truncated").unwrap();

    let outcome = installer.install(&mut ledger, "sodium", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert_eq!(install.read("mods/sodium.jar"), b"good bytes");
}

#[test]
fn test_failed_download_finishes_progress() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod").version(
        "P-sodium",
        MockVersion::new("v1", &["fabric"], 1).with_file("sodium.jar", b"s"),
    );
    mirror.remove_artifacts("v1");
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();

    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = calls.clone();
    let progress: ProgressCallback = Arc::new(move |_msg, current, total| {
        recorder.lock().unwrap().push((current, total));
    });
    let mut installer =
        Installer::new(&catalog, &mut cache, LoaderTable::default()).with_progress(progress);

    let outcome = installer.install(&mut ledger, "sodium", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Error);
    assert!(!install.has_file("mods/sodium.jar"));

    let calls = calls.lock().unwrap();
    assert_eq!(calls.first(), Some(&(0, 100)));
    assert_eq!(calls.last(), Some(&(100, 100)));
}

#[test]
fn test_missing_requirements_are_errors() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod");
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    ledger.loader = None;
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let err = installer.install(&mut ledger, "sodium", None).unwrap_err();
    assert!(matches!(err, Error::MissingLoader(_)));

    ledger.game_version = None;
    let err = installer.install(&mut ledger, "sodium", None).unwrap_err();
    assert!(matches!(err, Error::MissingGameVersion(_)));
}

#[test]
fn test_unknown_project_is_an_error_outcome() {
    let mirror = TestCatalog::new();
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "nope", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Error);
    assert!(!ledger.has_global("nope"));
}

#[test]
fn test_no_matching_version_is_skipped() {
    let mirror = TestCatalog::new();
    mirror.project("P-forgeonly", "forgeonly", "mod").version(
        "P-forgeonly",
        MockVersion::new("v1", &["forge"], 1).with_file("f.jar", b"f"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "forgeonly", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Skipped);
    assert!(!install.has_file("mods/f.jar"));
}

#[test]
fn test_quilt_accepts_fabric_builds() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod").version(
        "P-sodium",
        MockVersion::new("v1", &["fabric"], 1).with_file("sodium-fabric.jar", b"fabric"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "quilt", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "sodium", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(install.has_file("mods/sodium-fabric.jar"));
}

#[test]
fn test_installed_dependency_is_not_reinstalled() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-api", "fabric-api", "mod")
        .version(
            "P-api",
            MockVersion::new("api1", &["fabric"], 1).with_file("api.jar", b"api"),
        )
        .project("P-app", "appleskin", "mod")
        .version(
            "P-app",
            MockVersion::new("app1", &["fabric"], 1)
                .with_file("appleskin.jar", b"apple")
                .requires("P-api"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    ledger.record(Category::Mod, None, "fabric-api", "api-old.jar");
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "appleskin", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert_eq!(
        ledger.filename(Category::Mod, None, "fabric-api"),
        Some("api-old.jar")
    );
    assert!(!install.has_file("mods/api.jar"));
}

#[test]
fn test_missing_dependency_is_installed() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-api", "fabric-api", "mod")
        .version(
            "P-api",
            MockVersion::new("api1", &["fabric"], 1).with_file("api.jar", b"api"),
        )
        .project("P-app", "appleskin", "mod")
        .project("P-opt", "modmenu", "mod")
        .version(
            "P-app",
            MockVersion::new("app1", &["fabric"], 1)
                .with_file("appleskin.jar", b"apple")
                .requires("P-api")
                .optional("P-opt"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    installer.install(&mut ledger, "appleskin", None).unwrap();
    assert!(install.has_file("mods/api.jar"));
    assert!(ledger.has_global("fabric-api"));
    assert!(!ledger.has_global("modmenu"));
}

#[test]
fn test_embedded_version_dependency_is_installed() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-lib", "libby", "mod")
        .version(
            "P-lib",
            MockVersion::new("lib1", &["fabric"], 1).with_file("libby.jar", b"lib"),
        )
        .project("P-app", "appleskin", "mod")
        .version(
            "P-app",
            MockVersion::new("app1", &["fabric"], 2)
                .with_file("appleskin.jar", b"apple")
                .embeds_version("lib1"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    {
        let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());
        let outcome = installer.install(&mut ledger, "appleskin", None).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
    }

    assert!(ledger.has_global("libby"));
    assert!(install.has_file("mods/libby.jar"));
    assert_eq!(cache.slug_by_version_id("lib1").as_deref(), Some("libby"));
    assert_eq!(cache.slug_by_project_id("P-lib").as_deref(), Some("libby"));
}

#[test]
fn test_dependency_cycle_terminates() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-a", "alpha", "mod")
        .version(
            "P-a",
            MockVersion::new("a1", &["fabric"], 1)
                .with_file("alpha.jar", b"a")
                .requires("P-b"),
        )
        .project("P-b", "beta", "mod")
        .version(
            "P-b",
            MockVersion::new("b1", &["fabric"], 1)
                .with_file("beta.jar", b"b")
                .requires("P-a"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "alpha", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(ledger.has_global("alpha"));
    assert!(ledger.has_global("beta"));
}

#[test]
fn test_quilt_substitutes_fabric_api() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-api", "fabric-api", "mod")
        .project("P-qsl", "qsl", "mod")
        .version(
            "P-qsl",
            MockVersion::new("qsl1", &["quilt"], 1).with_file("qsl.jar", b"qsl"),
        )
        .project("P-app", "appleskin", "mod")
        .version(
            "P-app",
            MockVersion::new("app1", &["fabric"], 1)
                .with_file("appleskin.jar", b"apple")
                .requires("P-api"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "quilt", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    installer.install(&mut ledger, "appleskin", None).unwrap();
    assert!(ledger.has_global("qsl"));
    assert!(!ledger.has_global("fabric-api"));
    assert!(install.has_file("mods/qsl.jar"));
}

#[test]
fn test_update_collects_failures() {
    let mirror = TestCatalog::new();
    mirror
        .project("P-a", "alpha", "mod")
        .version(
            "P-a",
            MockVersion::new("a1", &["fabric"], 1).with_file("alpha.jar", b"a"),
        )
        .project("P-b", "beta", "mod")
        .version(
            "P-b",
            MockVersion::new("b1", &["fabric"], 1).with_file("beta.jar", b"b"),
        );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    ledger.record(Category::Mod, None, "alpha", "alpha-old.jar");
    ledger.record(Category::Mod, None, "beta", "beta-old.jar");
    ledger.record(Category::Mod, None, "ghost", "ghost.jar");
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let report = installer.update(&mut ledger, None).unwrap();
    assert_eq!(report.errors, vec!["ghost"]);
    assert_eq!(report.installed, vec!["alpha", "beta"]);
    assert!(install.has_file("mods/alpha.jar"));
    assert!(install.has_file("mods/beta.jar"));

    // Installed packages were committed as the update went
    let saved = mcsmp::Ledger::load("test", &install.root).unwrap();
    assert_eq!(saved.filename(Category::Mod, None, "beta"), Some("beta.jar"));
}

#[test]
fn test_update_skips_category_with_unmet_requirements() {
    let mirror = TestCatalog::new();
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    ledger.record(Category::Shader, None, "complementary", "comp.zip");
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let report = installer.update(&mut ledger, None).unwrap();
    assert_eq!(report.skipped, vec!["complementary"]);
    assert!(report.errors.is_empty());
}

#[test]
fn test_loaderless_shader_goes_to_resourcepacks() {
    let mirror = TestCatalog::new();
    mirror.project("P-shade", "faithful-shaders", "shader").version(
        "P-shade",
        MockVersion::new("s1", &["vanilla"], 1).with_file("shade.zip", b"core shaders"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", Some("iris"));
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "faithful-shaders", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(install.has_file("resourcepacks/shade.zip"));
    assert!(!install.has_file("shaderpacks/shade.zip"));
    assert_eq!(
        ledger.filename(Category::Shader, None, "faithful-shaders"),
        Some("shade.zip")
    );

    let outcome = installer.install(&mut ledger, "faithful-shaders", None).unwrap();
    assert_eq!(outcome, InstallOutcome::AlreadyCurrent);

    mcsmp::set_package_enabled(&ledger, "faithful-shaders", None, false).unwrap();
    assert!(install.has_file("resourcepacks/shade.zip.disabled"));
}

#[test]
fn test_resource_pack_install() {
    let mirror = TestCatalog::new();
    mirror.project("P-rp", "faithful", "resourcepack").version(
        "P-rp",
        MockVersion::new("r1", &["minecraft"], 1).with_file("faithful.zip", b"pixels"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    ledger.loader = None;
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "faithful", None).unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(install.has_file("resourcepacks/faithful.zip"));
}

#[test]
fn test_datapack_world_install_with_companion() {
    let mirror = TestCatalog::new();
    mirror.project("P-dp", "terralith", "mod").version(
        "P-dp",
        MockVersion::new("d1", &["datapack"], 1)
            .with_file("terralith-dp.zip", b"datapack")
            .with_file("terralith-rp.zip", b"resources"),
    );
    let install = TestInstallation::new();
    install.create_world("survival");
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer
        .install(&mut ledger, "terralith", Some("survival"))
        .unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(install.has_file("saves/survival/datapacks/terralith-dp.zip"));
    assert!(install.has_file("resourcepacks/terralith-rp.zip"));
    assert_eq!(
        ledger.find("terralith", Some("survival")),
        Some(Category::Datapack)
    );
    assert!(!ledger.has_global("terralith"));
    assert!(ledger.packages(Category::ResourcePack, None).unwrap().is_empty());
}

#[test]
fn test_datapack_needs_existing_world() {
    let mirror = TestCatalog::new();
    mirror.project("P-dp", "terralith", "mod");
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let err = installer
        .install(&mut ledger, "terralith", Some("missing"))
        .unwrap_err();
    assert!(matches!(err, Error::WorldNotFound { .. }));
}

#[test]
fn test_shader_cannot_go_into_world() {
    let mirror = TestCatalog::new();
    mirror.project("P-shade", "bsl", "shader");
    let install = TestInstallation::new();
    install.create_world("w");
    let mut ledger = install.ledger("1.20.1", "fabric", Some("iris"));
    let catalog = mirror.catalog();
    let mut cache = install.cache();
    let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());

    let outcome = installer.install(&mut ledger, "bsl", Some("w")).unwrap();
    assert_eq!(outcome, InstallOutcome::Skipped);
}

#[test]
fn test_lookups_are_cached() {
    let mirror = TestCatalog::new();
    mirror.project("P-sodium", "sodium", "mod").version(
        "P-sodium",
        MockVersion::new("v1", &["fabric"], 1).with_file("sodium.jar", b"s"),
    );
    let install = TestInstallation::new();
    let mut ledger = install.ledger("1.20.1", "fabric", None);
    let catalog = mirror.catalog();
    {
        let mut cache = install.cache();
        let mut installer = Installer::new(&catalog, &mut cache, LoaderTable::default());
        installer.install(&mut ledger, "sodium", None).unwrap();
    }

    let mut cache = install.cache();
    let metadata = cache.metadata_by_slug("sodium").unwrap();
    assert_eq!(metadata.id, "P-sodium");
    assert_eq!(metadata.category, Category::Mod);
    assert_eq!(cache.slug_by_project_id("P-sodium").as_deref(), Some("sodium"));
}
