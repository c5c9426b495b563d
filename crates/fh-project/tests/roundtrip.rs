use fh_project::schema::*;
use fh_project::{ProjectError, load_json, load_yaml, project_dir, save_json, save_yaml};
use std::path::Path;

fn lysozyme() -> DatasetDef {
    DatasetDef {
        id: "lys".to_string(),
        name: "Lysozyme".to_string(),
        model: ModelDef {
            n1: 10.0,
            n2: 1.0,
            rho: 1350.0,
        },
        initial_guess: [0.01, 0.6],
        temp_range_c: [-5.0, 25.0],
        temp_step_c: 0.5,
        threshold: 1e-5,
        data: vec!["data/lys_a.txt".to_string(), "data/lys_b.txt".to_string()],
        outpath: "results".to_string(),
        solver: Some(SolverDef {
            method: SolverMethodDef::Newton,
            max_iterations: Some(80),
            abs_tol: None,
        }),
        guess_strategy: GuessStrategyDef::Continuation,
        weighted_fit: true,
    }
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = Project {
        version: 1,
        name: "Empty Project".to_string(),
        datasets: vec![],
    };

    let path = std::env::temp_dir().join("fh_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_dataset() {
    let project = Project {
        version: 1,
        name: "Lysozyme".to_string(),
        datasets: vec![lysozyme()],
    };

    let path = std::env::temp_dir().join("fh_project_roundtrip_dataset.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_dataset() {
    let project = Project {
        version: 1,
        name: "Lysozyme".to_string(),
        datasets: vec![lysozyme()],
    };

    let path = std::env::temp_dir().join("fh_project_roundtrip_dataset.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn invalid_project_is_not_saved() {
    let mut dataset = lysozyme();
    dataset.initial_guess = [0.6, 0.6];
    let project = Project {
        version: 1,
        name: "Broken".to_string(),
        datasets: vec![dataset],
    };

    let path = std::env::temp_dir().join("fh_project_invalid.yaml");
    let _ = std::fs::remove_file(&path);
    let err = save_yaml(&path, &project).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn missing_file_is_io_error() {
    let err = load_yaml(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(matches!(err, ProjectError::Io(_)));
}

#[test]
fn project_dir_of_bare_file_is_cwd() {
    assert_eq!(project_dir(Path::new("fit.yml")), Path::new("."));
    assert_eq!(project_dir(Path::new("/a/b/fit.yml")), Path::new("/a/b"));
}
