use std::fs;

use ad_bench::fixture::{create_mixed_project, create_scaled_project};
use ad_writer::{describe, run, Config};
use tempfile::TempDir;

#[test]
fn e2e_annotate_mixed_project() {
    let tmp = TempDir::new().unwrap();
    create_mixed_project(tmp.path());

    let report = run(tmp.path(), &Config::default()).unwrap();
    assert_eq!(report.total_files_scanned, 2, "node_modules must be pruned");
    assert_eq!(report.files_failed, 0, "No files should fail: {:?}", report.failed_details);
    assert_eq!(report.files_changed, 2);
    assert_eq!(report.functions_already_documented, 1);
    assert_eq!(report.functions_documented, 13);
    assert_eq!(report.fallbacks, 0);

    let ts = fs::read_to_string(tmp.path().join("src/service.ts")).unwrap();
    assert!(ts.contains("[cacheSize=100]"), "{ts}");
    assert!(ts.contains("- Also declared as a class property"), "{ts}");
    assert!(ts.contains("@returns {Promise<User | null>}"), "{ts}");
    assert!(ts.contains("@returns {Array<User>}"), "{ts}");
    assert!(ts.contains("...plugins - Rest parameter"), "{ts}");
    assert!(ts.contains("Function createService with parameters 'db', '...plugins'"), "{ts}");

    let js = fs::read_to_string(tmp.path().join("src/api/handlers.js")).unwrap();
    assert_eq!(js.matches("Already documented.").count(), 1);
    assert!(js.contains("sort.field - Default value: `'id'`"), "{js}");
    assert!(js.contains("Function retry with parameters 'fn', 'attempts', '...args'"), "{js}");
    assert!(js.contains("    /**\n     * Function list with parameters 'req', 'res'"), "{js}");

    let vendored = fs::read_to_string(tmp.path().join("node_modules/left-pad/index.js")).unwrap();
    assert!(!vendored.contains("/**"));
}

#[test]
fn e2e_second_run_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    create_mixed_project(tmp.path());

    run(tmp.path(), &Config::default()).unwrap();
    let ts_first = fs::read_to_string(tmp.path().join("src/service.ts")).unwrap();
    let js_first = fs::read_to_string(tmp.path().join("src/api/handlers.js")).unwrap();

    let report = run(tmp.path(), &Config::default()).unwrap();
    assert_eq!(report.files_changed, 0);
    assert_eq!(report.functions_documented, 0);
    assert_eq!(report.functions_already_documented, 14);

    assert_eq!(fs::read_to_string(tmp.path().join("src/service.ts")).unwrap(), ts_first);
    assert_eq!(fs::read_to_string(tmp.path().join("src/api/handlers.js")).unwrap(), js_first);
}

#[test]
fn e2e_describe_matches_sources() {
    let tmp = TempDir::new().unwrap();
    create_mixed_project(tmp.path());

    let files = describe(tmp.path(), &Config::default()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(names, ["src/api/handlers.js", "src/service.ts"]);

    let ts = &files[1];
    let find = ts
        .functions
        .iter()
        .find(|f| f.name.as_deref() == Some("find"))
        .unwrap();
    assert_eq!(find.params[0].type_name, "number");
    assert_eq!(find.returns.as_deref(), Some("Promise<User | null>"));
}

#[test]
fn e2e_scaled_dry_run() {
    let tmp = TempDir::new().unwrap();
    create_scaled_project(tmp.path(), 20);

    let config = Config {
        dry_run: true,
        ..Config::default()
    };
    let report = run(tmp.path(), &config).unwrap();
    assert_eq!(report.total_files_scanned, 40);
    assert_eq!(report.previews.len(), 40);
    assert_eq!(report.functions_documented, 20 * 13);
}
