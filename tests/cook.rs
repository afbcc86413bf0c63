// tests/cook.rs

//! Integration tests for cooking recipes through the Kitchen.
//!
//! Build steps go through a recording runner, so these tests exercise the
//! stage sequencing, argument construction and filesystem finalization
//! without a compiler toolchain.

mod common;

use common::{fixed_root, missing_tool, RecordingRunner, Workspace};
use kettle::recipe::load_recipe;
use kettle::{CookRequest, CookState, Error, Kitchen, KitchenConfig, Stage, Variant};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn nginx() -> kettle::LoadedRecipe {
    load_recipe("nginx", &[]).unwrap()
}

fn kitchen(runner: Arc<RecordingRunner>) -> Kitchen {
    let config = KitchenConfig {
        jobs: 2,
        ..KitchenConfig::default()
    };
    Kitchen::new(config)
        .with_runner(runner)
        .with_resolver(Arc::new(missing_tool))
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_cook_nginx_runs_stages_in_order() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root).with_args(args(&["--with-debug"]));

    let mut cook = kitchen.prepare(&loaded, &request).unwrap();
    assert_eq!(cook.state(), &CookState::Pending);
    ws.stage_install(&cook.layout().prefix);

    let report = cook.run().unwrap();
    assert_eq!(cook.state(), &CookState::Succeeded);

    assert_eq!(runner.programs(), vec!["patch", "./configure", "make", "make"]);
    let calls = runner.calls.borrow();
    assert!(calls.iter().all(|c| c.cwd == ws.source));
    assert_eq!(calls[2].args, Vec::<String>::new());
    assert_eq!(calls[3].args, vec!["install"]);

    // configure receives exactly the planned arguments
    assert_eq!(calls[1].args, report.plan.arguments.as_slice());
    assert_eq!(report.plan.arguments.as_slice().last().unwrap(), "--with-debug");
    assert_eq!(report.patches_applied, 1);
}

#[test]
fn test_cook_nginx_finalizes_install() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner);
    let request = CookRequest::new(&ws.source, &ws.root);

    let prefix = ws.root.join("Cellar/nginx/1.2.8");
    ws.stage_install(&prefix);

    let report = kitchen.cook(&loaded, &request).unwrap();

    // man page
    let man = prefix.join("share/man/man8/nginx.8");
    assert_eq!(report.finalize.man_pages, vec![man.clone()]);
    assert!(man.is_file());

    // runtime dir
    assert!(ws.root.join("var/run/nginx").is_dir());

    // docroot moved to the shared location and linked back
    let shared = ws.root.join("var/www");
    assert_eq!(report.finalize.docroot, Some(shared.clone()));
    assert!(shared.join("index.html").is_file());
    assert_eq!(
        fs::read_link(prefix.join("html")).unwrap(),
        PathBuf::from("../../../var/www")
    );

    // no earlier install used sbin
    assert_eq!(report.finalize.legacy_link, None);

    // descriptor written into the prefix
    let plist = prefix.join("homebrew.mxcl.nginx.plist");
    assert_eq!(report.descriptor_path, Some(plist.clone()));
    let xml = fs::read_to_string(&plist).unwrap();
    assert!(xml.contains("<string>homebrew.mxcl.nginx</string>"));
    assert!(xml.contains(&format!(
        "<string>{}</string>",
        ws.root.join("opt/nginx/bin/nginx").display()
    )));
    assert!(xml.contains("<string>daemon off;</string>"));

    let caveats = report.caveats.unwrap();
    assert!(caveats.contains(&shared.display().to_string()));
    assert!(caveats.contains("8080"));

    // pcre is not linked under <root>/opt, which only warns
    assert_eq!(report.plan.warnings.len(), 1);
    assert!(report.plan.warnings[0].contains("pcre"));
}

#[test]
fn test_configure_failure_stops_cook() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::failing("./configure", 2));
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root);

    let mut cook = kitchen.prepare(&loaded, &request).unwrap();
    let err = cook.run().unwrap_err();

    assert!(matches!(err, Error::ProcessError { ref program, .. } if program == "./configure"));
    match cook.state() {
        CookState::Failed { stage, reason } => {
            assert_eq!(*stage, Stage::RunConfigure);
            assert!(reason.contains("exited with status 2"));
        }
        other => panic!("unexpected state: {other:?}"),
    }

    // build, install and finalize never ran
    assert_eq!(runner.programs(), vec!["patch", "./configure"]);
    assert!(!ws.root.join("Cellar/nginx/1.2.8/share/man/man8/nginx.8").exists());
    assert!(!ws.root.join("var/www").exists());
}

#[test]
fn test_missing_passenger_fails_before_running_anything() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root).with_args(args(&["--with-passenger"]));

    let mut cook = kitchen.prepare(&loaded, &request).unwrap();
    let err = cook.run().unwrap_err();

    match err {
        Error::DependencyUnavailable { option, hint } => {
            assert_eq!(option, "with-passenger");
            assert!(hint.contains("passenger-config"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        cook.state(),
        CookState::Failed {
            stage: Stage::BuildArguments,
            ..
        }
    ));
    assert!(runner.programs().is_empty());
}

#[test]
fn test_passenger_module_from_resolver() {
    let ws = Workspace::new();
    let passenger_root = ws.temp.path().join("passenger");
    fs::create_dir_all(passenger_root.join("ext/nginx")).unwrap();

    let loaded = nginx();
    let kitchen = Kitchen::new(KitchenConfig::default())
        .with_runner(Arc::new(RecordingRunner::new()))
        .with_resolver(Arc::new(fixed_root(passenger_root.clone())));
    let request = CookRequest::new(&ws.source, &ws.root).with_args(args(&["--with-passenger"]));

    let plan = kitchen.plan(&loaded, &request).unwrap();
    assert_eq!(
        plan.arguments.as_slice().last().unwrap(),
        &format!("--add-module={}", passenger_root.join("ext/nginx").display())
    );
}

#[test]
fn test_malformed_module_fails_in_resolve_stage() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root).with_args(args(&["--with-module="]));

    let mut cook = kitchen.prepare(&loaded, &request).unwrap();
    let err = cook.run().unwrap_err();
    assert!(matches!(err, Error::MalformedOption(_)));
    assert!(matches!(
        cook.state(),
        CookState::Failed {
            stage: Stage::ResolveModules,
            ..
        }
    ));
    assert!(runner.programs().is_empty());
}

#[test]
fn test_plan_merges_modules_and_runs_nothing() {
    let ws = Workspace::new();
    let echo = ws.module_dir("echo");
    let headers = ws.module_dir("headers");

    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root).with_args(vec![
        format!("--with-module={}", echo.display()),
        "--with-webdav".to_string(),
        format!("--with-module={}", headers.display()),
        format!("--with-module={}", echo.display()),
        "--verbose".to_string(),
    ]);

    let plan = kitchen.plan(&loaded, &request).unwrap();
    let tail: Vec<String> = plan.arguments.iter().skip(17).cloned().collect();
    assert_eq!(
        tail,
        vec![
            format!("--add-module={}", echo.display()),
            format!("--add-module={}", headers.display()),
            "--with-http_dav_module".to_string(),
        ]
    );
    assert!(runner.programs().is_empty());
    assert!(!ws.root.join("Cellar").exists());
}

#[test]
fn test_head_variant_uses_auto_configure() {
    let ws = Workspace::new();
    let loaded = nginx();
    let runner = Arc::new(RecordingRunner::new());
    let kitchen = kitchen(runner.clone());
    let request = CookRequest::new(&ws.source, &ws.root)
        .with_variant(Variant::Head)
        .with_args(args(&["--with-spdy"]));

    let report = kitchen.cook(&loaded, &request).unwrap();

    assert_eq!(report.plan.layout.version, "HEAD");
    assert!(runner.call("./auto/configure").is_some());
    assert!(runner.call("./configure").is_none());
    // spdy is only offered for devel
    assert!(!report.plan.arguments.contains("--with-http_spdy_module"));
}

#[test]
fn test_devel_variant_enables_spdy() {
    let ws = Workspace::new();
    let loaded = nginx();
    let kitchen = kitchen(Arc::new(RecordingRunner::new()));
    let request = CookRequest::new(&ws.source, &ws.root)
        .with_variant(Variant::Devel)
        .with_args(args(&["--with-spdy"]));

    let plan = kitchen.plan(&loaded, &request).unwrap();
    assert_eq!(plan.layout.version, "1.3.16");
    assert!(plan.arguments.contains("--with-http_spdy_module"));
    assert!(plan.enabled_options.contains("with-spdy"));
}

#[test]
fn test_second_cook_converges() {
    let ws = Workspace::new();
    let loaded = nginx();
    let kitchen = kitchen(Arc::new(RecordingRunner::new()));
    let request = CookRequest::new(&ws.source, &ws.root);
    let prefix = ws.root.join("Cellar/nginx/1.2.8");

    ws.stage_install(&prefix);
    kitchen.cook(&loaded, &request).unwrap();

    // Operator edits the shared docroot; a reinstall ships a fresh copy
    fs::write(ws.root.join("var/www/index.html"), "mine").unwrap();
    fs::remove_file(prefix.join("html")).unwrap();
    ws.stage_install(&prefix);
    kitchen.cook(&loaded, &request).unwrap();

    assert_eq!(fs::read_to_string(ws.root.join("var/www/index.html")).unwrap(), "mine");
    assert_eq!(
        fs::read_link(prefix.join("html")).unwrap(),
        PathBuf::from("../../../var/www")
    );
    assert_eq!(fs::read_dir(ws.root.join("var/www")).unwrap().count(), 1);

    // Third run without a fresh copy changes nothing
    kitchen.cook(&loaded, &request).unwrap();
    assert_eq!(fs::read_to_string(prefix.join("html/index.html")).unwrap(), "mine");
}

#[test]
fn test_legacy_link_after_upgrade() {
    let ws = Workspace::new();
    let loaded = nginx();
    let kitchen = kitchen(Arc::new(RecordingRunner::new()));

    // An older install used sbin
    fs::create_dir_all(ws.root.join("Cellar/nginx/1.0.0/sbin")).unwrap();

    let request = CookRequest::new(&ws.source, &ws.root);
    let report = kitchen.cook(&loaded, &request).unwrap();

    let link = ws.root.join("Cellar/nginx/1.2.8/sbin/nginx");
    assert_eq!(report.finalize.legacy_link, Some(link.clone()));
    assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("../bin/nginx"));
}

#[test]
fn test_missing_source_dir() {
    let ws = Workspace::new();
    let loaded = nginx();
    let kitchen = kitchen(Arc::new(RecordingRunner::new()));
    let request = CookRequest::new(ws.temp.path().join("absent"), &ws.root);

    let err = kitchen.cook(&loaded, &request).unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

#[test]
fn test_descriptor_not_written_when_disabled() {
    let ws = Workspace::new();
    let loaded = nginx();
    let config = KitchenConfig {
        write_descriptor: false,
        ..KitchenConfig::default()
    };
    let kitchen = Kitchen::new(config)
        .with_runner(Arc::new(RecordingRunner::new()))
        .with_resolver(Arc::new(missing_tool));
    let request = CookRequest::new(&ws.source, &ws.root);

    let report = kitchen.cook(&loaded, &request).unwrap();
    assert!(report.descriptor.is_some());
    assert_eq!(report.descriptor_path, None);
    assert!(!ws.root.join("Cellar/nginx/1.2.8/homebrew.mxcl.nginx.plist").exists());
}
