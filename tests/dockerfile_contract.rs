use std::fs;
use std::path::{Path, PathBuf};
use tarucca_processor::utils::validation::Validate;
use tarucca_processor::TomlConfig;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn dockerfile() -> String {
    fs::read_to_string(repo_root().join("Dockerfile")).expect("read Dockerfile")
}

/// Instructions of the final stage only.
fn runtime_stage(content: &str) -> Vec<String> {
    let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
    let start = lines
        .iter()
        .rposition(|l| l.starts_with("FROM "))
        .expect("at least one FROM");
    lines[start..].to_vec()
}

fn extract_copy_sources(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with("COPY ") || trimmed.contains("--from=") {
        return None;
    }
    let rest = trimmed.trim_start_matches("COPY ").trim();
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    Some(
        tokens[..tokens.len() - 1]
            .iter()
            .map(|s| s.trim_matches('"').to_string())
            .collect(),
    )
}

#[test]
fn copy_sources_exist_in_build_context() {
    let root = repo_root();
    let mut missing = Vec::new();

    for (idx, line) in dockerfile().lines().enumerate() {
        let Some(srcs) = extract_copy_sources(line) else {
            continue;
        };
        for src in srcs {
            if src == "." || src.starts_with('/') {
                continue;
            }
            if !root.join(Path::new(&src)).exists() {
                missing.push(format!("Dockerfile:{} -> {}", idx + 1, src));
            }
        }
    }

    assert!(
        missing.is_empty(),
        "Dockerfile COPY sources must exist:\n{}",
        missing.join("\n")
    );
}

#[test]
fn runtime_stage_layout() {
    let stage = runtime_stage(&dockerfile());

    assert!(stage.iter().any(|l| l == "WORKDIR /app"));
    assert!(stage.iter().any(|l| l == "COPY src/ /app/src/"));
    assert!(stage.iter().any(|l| l == "COPY data/ /app/data/"));
    assert!(stage.iter().any(|l| l == "ENV PYTHONUNBUFFERED=1"));
}

#[test]
fn default_command_runs_processor_without_arguments() {
    let stage = runtime_stage(&dockerfile());
    let cmd = stage
        .iter()
        .find(|l| l.starts_with("CMD "))
        .expect("runtime stage defines CMD");

    assert_eq!(cmd, r#"CMD ["tarucca-processor"]"#);
    assert!(!stage.iter().any(|l| l.starts_with("ENTRYPOINT ")));
}

#[test]
fn manifest_and_lockfile_are_copied_before_sources() {
    let content = dockerfile();
    let manifest = content
        .find("COPY Cargo.toml Cargo.lock ./")
        .expect("manifest and lockfile copy");
    let sources = content.find("COPY src/").expect("source copy");
    assert!(manifest < sources);
}

#[test]
fn builds_are_locked() {
    let content = dockerfile();
    let builds: Vec<&str> = content
        .lines()
        .filter(|l| l.contains("cargo build"))
        .collect();

    assert!(!builds.is_empty());
    for line in builds {
        assert!(line.contains("--locked"), "unlocked build: {}", line.trim());
    }
}

#[test]
fn builder_and_runtime_share_debian_release() {
    let froms: Vec<String> = dockerfile()
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("FROM "))
        .map(str::to_string)
        .collect();

    assert_eq!(froms.len(), 2);
    assert_eq!(froms[0], "FROM rust:1-slim-bookworm AS builder");
    assert_eq!(froms[1], "FROM debian:bookworm-slim");
}

#[test]
fn example_config_parses() {
    let config = TomlConfig::from_file(repo_root().join("config/processor.example.toml"))
        .expect("parse example config");
    assert!(config.validate().is_ok());
}
