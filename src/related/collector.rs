//! Entry point for related-file collection.

use tracing::{debug, warn};

use super::classifier::collect_direct_references;
use super::host::{Host, SymbolResolver};
use super::traversal::{Traversal, TraversalState};
use super::types::{RelatedFile, SourceFile};
use crate::config::CollectorConfig;

/// Collects the files related to a root file.
///
/// All traversal state lives in one call; nothing is cached between calls.
pub struct RelatedFilesCollector<'h, R: SymbolResolver> {
    host: Host<'h, R>,
}

impl<'h, R: SymbolResolver> RelatedFilesCollector<'h, R> {
    pub fn new(host: Host<'h, R>) -> Self {
        Self { host }
    }

    /// Related files of `root`, in emission order, at most
    /// `config.max_related_files` of them. Never includes `root` itself.
    /// Failures degrade to fewer (or no) files.
    pub fn collect(&self, root: &SourceFile, config: &CollectorConfig) -> Vec<RelatedFile> {
        self.run(root, config)
            .map(|state| state.result)
            .unwrap_or_default()
    }

    /// Full traversal state of a run, `None` when nothing was collected
    /// because collection is disabled or the root cannot be scanned.
    pub fn run(&self, root: &SourceFile, config: &CollectorConfig) -> Option<TraversalState> {
        if !config.include_related_files {
            return None;
        }

        let direct = match collect_direct_references(self.host.resolver, root, config) {
            Ok(direct) => direct,
            Err(e) => {
                warn!(file = %root.path.display(), error = %e, "cannot scan root file");
                return None;
            }
        };
        debug!(
            file = %root.path.display(),
            direct = direct.len(),
            "collecting related files"
        );

        let mut state = TraversalState::new(root, direct);
        Traversal::new(self.host, config).expand(root, 0, &mut state);

        debug!(
            related = state.result.len(),
            indirect = state.indirect_references.len(),
            "related file collection finished"
        );
        Some(state)
    }
}
