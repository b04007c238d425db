//! Policy-source adapters: discover and read CSL files, build the
//! candidate model used by the policy validator.
//!
//! This crate is allowed to do filesystem IO. A missing policy directory
//! and a directory with zero matching files are hard errors (a load with
//! nothing to load must fail); an unreadable individual file becomes a
//! finding so the rest of the set still validates in the same pass.

#![forbid(unsafe_code)]

mod discover;

use anyhow::Context;
use camino::Utf8Path;
use cslguard_domain::compile::{compile_file, CandidateModel, FileModel};
use cslguard_syntax::extract_blocks;
use cslguard_types::SourcePath;

pub use discover::discover_sources;

/// Build the in-memory candidate model for all policy sources under
/// `policy_dir` with the given extension (no leading dot).
pub fn build_candidate(policy_dir: &Utf8Path, extension: &str) -> anyhow::Result<CandidateModel> {
    let sources = discover_sources(policy_dir, extension).context("discover policy sources")?;

    let mut files = Vec::new();
    for abs in &sources {
        let rel = abs.strip_prefix(policy_dir).unwrap_or(abs);
        let path = SourcePath::from(rel);
        match std::fs::read_to_string(abs) {
            Ok(text) => files.push(compile_file(&path, &extract_blocks(&text))),
            Err(err) => files.push(FileModel::unreadable(path, &err.to_string())),
        }
    }

    Ok(CandidateModel { files })
}
