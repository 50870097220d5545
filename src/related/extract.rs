//! Content extraction for related files.
//!
//! Produces either the full text of a file or a pruned view made of the
//! package header, the import section and each top-level declaration
//! (optionally preceded by its doc comment). Pruning only ever copies slices
//! of the original text.

use tracing::warn;

use super::host::{Host, SymbolResolver};
use super::types::{FileOutline, SourceFile};
use crate::config::CollectorConfig;
use crate::error::Result;

/// Prefix of the placeholder emitted when a binary cannot be decompiled.
pub const DECOMPILE_ERROR_PREFIX: &str = "// Error decompiling file: ";

pub struct ContentExtractor<'a, R: SymbolResolver> {
    host: Host<'a, R>,
    config: &'a CollectorConfig,
}

impl<'a, R: SymbolResolver> ContentExtractor<'a, R> {
    pub fn new(host: Host<'a, R>, config: &'a CollectorConfig) -> Self {
        Self { host, config }
    }

    /// Text to emit for `file`. Read failures propagate; decompilation
    /// failures become a placeholder comment.
    pub fn extract(&self, file: &SourceFile) -> Result<String> {
        let content = if file.is_binary() {
            self.decompile(file)
        } else {
            let text = self.host.reader.read(file)?;
            if self.config.smart_pruning {
                match self.host.resolver.outline(file, &text) {
                    Some(outline) => prune(&text, &outline, self.config),
                    None => text,
                }
            } else {
                text
            }
        };

        if self.config.trim_whitespace {
            Ok(normalize_whitespace(&content))
        } else {
            Ok(content)
        }
    }

    fn decompile(&self, file: &SourceFile) -> String {
        match self.host.decompiler.decompile(file) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "decompilation failed");
                format!("{DECOMPILE_ERROR_PREFIX}{e}")
            }
        }
    }
}

/// Reduce `text` to its header and declarations according to `outline`.
///
/// Spans that do not fall inside `text` are skipped.
pub fn prune(text: &str, outline: &FileOutline, config: &CollectorConfig) -> String {
    let mut out = String::new();

    if let Some(package) = outline.package.and_then(|span| span.slice(text)) {
        out.push_str(package);
        out.push_str("\n\n");
    }

    if !config.exclude_imports_in_related_files {
        if let Some(imports) = outline.imports.and_then(|span| span.slice(text)) {
            out.push_str(imports);
            out.push_str("\n\n");
        }
    }

    for declaration in &outline.declarations {
        if config.include_javadoc {
            if let Some(doc) = declaration.doc.and_then(|span| span.slice(text)) {
                out.push_str(doc);
                out.push('\n');
            }
        }
        if let Some(body) = declaration.span.slice(text) {
            out.push_str(body);
            out.push('\n');
        }
    }

    out
}

/// Collapse runs of blank lines into one, strip trailing whitespace from
/// every line and drop blank lines at the end. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::related::testing::FakeHost;
    use crate::related::types::{Declaration, FileOrigin, Span};

    const SOURCE: &str = concat!(
        "package com.acme;\n\n",
        "import com.acme.a.A;\nimport com.acme.b.B;\n\n",
        "/** Doc. */\npublic class Foo {\n    int x;\n}\n",
    );

    fn outline() -> FileOutline {
        let span_of = |needle: &str| {
            let start = SOURCE.find(needle).unwrap();
            Span::new(start, start + needle.len())
        };
        FileOutline {
            package: Some(span_of("package com.acme;")),
            imports: Some(span_of("import com.acme.a.A;\nimport com.acme.b.B;")),
            declarations: vec![Declaration {
                doc: Some(span_of("/** Doc. */")),
                span: span_of("public class Foo {\n    int x;\n}"),
            }],
        }
    }

    #[test]
    fn test_prune_keeps_header_and_declarations() {
        let pruned = prune(SOURCE, &outline(), &CollectorConfig::default());
        assert_eq!(
            pruned,
            SOURCE,
            "nothing to drop from a file of declarations"
        );
    }

    #[test]
    fn test_prune_respects_import_and_doc_switches() {
        let config = CollectorConfig {
            include_javadoc: false,
            exclude_imports_in_related_files: true,
            ..CollectorConfig::default()
        };
        let pruned = prune(SOURCE, &outline(), &config);
        assert_eq!(pruned, "package com.acme;\n\npublic class Foo {\n    int x;\n}\n");
    }

    #[test]
    fn test_prune_never_invents_content() {
        let pruned = prune(SOURCE, &outline(), &CollectorConfig::default());
        for piece in pruned.split('\n').filter(|l| !l.is_empty()) {
            assert!(SOURCE.contains(piece), "{piece:?} not in source");
        }
    }

    #[test]
    fn test_prune_skips_out_of_range_spans() {
        let mut bad = outline();
        bad.declarations.push(Declaration {
            doc: None,
            span: Span::new(10, 10_000),
        });
        let pruned = prune(SOURCE, &bad, &CollectorConfig::default());
        assert_eq!(pruned, prune(SOURCE, &outline(), &CollectorConfig::default()));
    }

    #[test]
    fn test_normalize_whitespace() {
        let input = "a  \n\n\n\tb\t\n   \n\nc\n\n\n";
        assert_eq!(normalize_whitespace(input), "a\n\n\tb\n\nc");
    }

    #[test]
    fn test_normalize_whitespace_is_idempotent() {
        let inputs = [
            "",
            "\n\n\n",
            "  leading\n\n\n  kept  \r\n\r\n\r\nend \n",
            "x\n \n \n y",
            "no newline",
        ];
        for input in inputs {
            let once = normalize_whitespace(input);
            assert_eq!(normalize_whitespace(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_extract_full_text_without_pruning() {
        let host = FakeHost::new().class("com.acme.Foo", "Foo.java").text(
            "Foo.java",
            "class Foo {}   \n\n\n\n",
        );
        let config = CollectorConfig {
            smart_pruning: false,
            ..CollectorConfig::default()
        };
        let extractor = ContentExtractor::new(host.host(), &config);
        let content = extractor.extract(&host.source("Foo.java")).unwrap();
        assert_eq!(content, "class Foo {}");

        let raw = CollectorConfig {
            trim_whitespace: false,
            ..config
        };
        let extractor = ContentExtractor::new(host.host(), &raw);
        let content = extractor.extract(&host.source("Foo.java")).unwrap();
        assert_eq!(content, "class Foo {}   \n\n\n\n");
    }

    #[test]
    fn test_extract_falls_back_to_full_text_without_outline() {
        let host = FakeHost::new()
            .class("com.acme.Foo", "Foo.java")
            .text("Foo.java", "class Foo {}");
        let config = CollectorConfig::default();
        let extractor = ContentExtractor::new(host.host(), &config);
        assert_eq!(extractor.extract(&host.source("Foo.java")).unwrap(), "class Foo {}");
    }

    #[test]
    fn test_extract_uses_outline_when_pruning() {
        let host = FakeHost::new()
            .class("com.acme.Foo", "Foo.java")
            .text("Foo.java", SOURCE)
            .outline("Foo.java", outline());
        let config = CollectorConfig {
            include_javadoc: false,
            ..CollectorConfig::default()
        };
        let extractor = ContentExtractor::new(host.host(), &config);
        let content = extractor.extract(&host.source("Foo.java")).unwrap();
        assert!(!content.contains("/** Doc. */"));
        assert!(content.contains("public class Foo"));
    }

    #[test]
    fn test_extract_binary_decompiles() {
        let host = FakeHost::new()
            .class_in("org.lib.Thing", "/deps/Thing.class", FileOrigin::Binary)
            .decompiles_to("/deps/Thing.class", Ok("public class Thing {}"));
        let config = CollectorConfig::default();
        let extractor = ContentExtractor::new(host.host(), &config);
        let content = extractor.extract(&host.source("/deps/Thing.class")).unwrap();
        assert_eq!(content, "public class Thing {}");
    }

    #[test]
    fn test_extract_binary_failure_becomes_placeholder() {
        let host = FakeHost::new()
            .class_in("org.lib.Thing", "/deps/Thing.class", FileOrigin::Binary)
            .decompiles_to("/deps/Thing.class", Err("bad magic"));
        let config = CollectorConfig::default();
        let extractor = ContentExtractor::new(host.host(), &config);
        let content = extractor.extract(&host.source("/deps/Thing.class")).unwrap();
        assert_eq!(content, format!("{DECOMPILE_ERROR_PREFIX}bad magic"));
    }

    #[test]
    fn test_extract_read_failure_propagates() {
        let host = FakeHost::new()
            .class("com.acme.Foo", "Foo.java")
            .unreadable("Foo.java");
        let config = CollectorConfig::default();
        let extractor = ContentExtractor::new(host.host(), &config);
        assert!(extractor.extract(&host.source("Foo.java")).is_err());
    }
}
