//! Bounded expansion of the reference graph.
//!
//! Starting from the root, each file's references are resolved, classified
//! as direct or indirect, and the files declaring them are emitted and
//! expanded in turn. The walk is bounded by `max_depth` and
//! `max_related_files`; the processed set guarantees each file is visited
//! at most once, which also makes cycles harmless.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::classifier::local_references;
use super::extract::ContentExtractor;
use super::filter::should_skip;
use super::host::{Host, SymbolResolver};
use super::types::{FileOrigin, RelatedFile, SearchScope, SourceFile, Symbol};
use crate::config::CollectorConfig;

/// Mutable bookkeeping shared by every level of one collection run.
#[derive(Debug, Default)]
pub struct TraversalState {
    /// Names referenced by the root file.
    pub direct_references: HashSet<String>,
    /// Names first seen below the root that are not direct.
    pub indirect_references: HashSet<String>,
    /// Paths already emitted or rejected, root included.
    pub processed: HashSet<PathBuf>,
    /// Binary files emitted so far.
    pub decompiled_count: usize,
    pub result: Vec<RelatedFile>,
    /// Deepest level `expand` was entered at.
    pub deepest: usize,
}

impl TraversalState {
    pub fn new(root: &SourceFile, direct_references: HashSet<String>) -> Self {
        Self {
            direct_references,
            processed: HashSet::from([root.path.clone()]),
            ..Self::default()
        }
    }
}

/// A file waiting to be emitted.
#[derive(Debug)]
struct Candidate {
    file: SourceFile,
    implementation: bool,
}

pub struct Traversal<'a, R: SymbolResolver> {
    host: Host<'a, R>,
    config: &'a CollectorConfig,
    extractor: ContentExtractor<'a, R>,
}

impl<'a, R: SymbolResolver> Traversal<'a, R> {
    pub fn new(host: Host<'a, R>, config: &'a CollectorConfig) -> Self {
        Self {
            host,
            config,
            extractor: ContentExtractor::new(host, config),
        }
    }

    /// Expand `file` at `depth`, appending related files to `state.result`.
    pub fn expand(&self, file: &SourceFile, depth: usize, state: &mut TraversalState) {
        state.deepest = state.deepest.max(depth);

        if depth > self.config.max_depth || state.result.len() >= self.config.max_related_files {
            return;
        }

        let candidates = if depth < self.config.max_depth {
            self.schedule(file, depth, state)
        } else {
            IndexMap::new()
        };

        for candidate in candidates.into_values() {
            if state.result.len() >= self.config.max_related_files {
                debug!(limit = self.config.max_related_files, "related file limit reached");
                break;
            }
            let path = candidate.file.path.clone();
            if !state.processed.insert(path.clone()) {
                continue;
            }
            if !self.admits(&candidate.file, state.decompiled_count) {
                debug!(
                    file = %path.display(),
                    origin = %candidate.file.origin,
                    "file not admitted"
                );
                continue;
            }

            let is_decompiled = candidate.file.is_binary();
            if is_decompiled {
                state.decompiled_count += 1;
            }

            let content = match self.extractor.extract(&candidate.file) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping related file");
                    continue;
                }
            };

            debug!(file = %path.display(), depth, "related file added");
            state.result.push(RelatedFile {
                path: path.to_string_lossy().to_string(),
                content,
                is_decompiled,
                is_implementation: candidate.implementation,
            });

            self.expand(&candidate.file, depth + 1, state);
        }
    }

    /// Resolve `file`'s references and pick the files to emit next.
    fn schedule(
        &self,
        file: &SourceFile,
        depth: usize,
        state: &mut TraversalState,
    ) -> IndexMap<PathBuf, Candidate> {
        let mut candidates: IndexMap<PathBuf, Candidate> = IndexMap::new();

        let nodes = match self.host.resolver.reference_nodes(file) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "cannot scan references");
                return candidates;
            }
        };

        for symbol in local_references(self.host.resolver, &nodes, self.config) {
            let name = &symbol.qualified_name;
            if depth > 0 && !state.direct_references.contains(name) {
                state.indirect_references.insert(name.clone());
            }

            // Indirect names are only followed near the root, and only while
            // the indirect set stays within the file budget.
            let admissible = state.direct_references.contains(name)
                || (depth <= 1
                    && state.indirect_references.len() <= self.config.max_related_files);
            if !admissible {
                continue;
            }

            if let Some(target) = &symbol.file {
                push_candidate(&mut candidates, target, false, &state.processed);
            }

            if self.config.include_implementations
                && self.host.resolver.is_interface_type(&symbol)
            {
                for implementor in self.implementors(&symbol) {
                    if let Some(target) = &implementor.file {
                        push_candidate(&mut candidates, target, true, &state.processed);
                    }
                }
            }
        }

        candidates
    }

    fn implementors(&self, symbol: &Symbol) -> Vec<Symbol> {
        let scope = if self.config.include_dependencies {
            SearchScope::ProjectAndDependencies
        } else {
            SearchScope::Project
        };
        self.host
            .implementations
            .find_implementors(symbol, scope)
            .into_iter()
            .filter(|s| !should_skip(&s.qualified_name, self.config))
            .collect()
    }

    /// Project files are always admitted; dependencies only when enabled,
    /// and binaries only while the decompiled budget lasts.
    fn admits(&self, file: &SourceFile, decompiled_count: usize) -> bool {
        match file.origin {
            FileOrigin::Project => true,
            FileOrigin::Library => self.config.include_dependencies,
            FileOrigin::Binary => {
                self.config.include_dependencies
                    && self.config.include_decompiled
                    && decompiled_count < self.config.max_decompiled_files
            }
        }
    }
}

fn push_candidate(
    candidates: &mut IndexMap<PathBuf, Candidate>,
    file: &SourceFile,
    implementation: bool,
    processed: &HashSet<PathBuf>,
) {
    if processed.contains(&file.path) {
        return;
    }
    candidates
        .entry(file.path.clone())
        .and_modify(|c| c.implementation &= implementation)
        .or_insert_with(|| Candidate {
            file: file.clone(),
            implementation,
        });
}
