//! Prompt assembly: placeholder substitution and related-file formatting.

use std::path::{Path, PathBuf};

use crate::config::PromptTemplates;
use crate::parser::{extract_file, read_source};
use crate::related::RelatedFile;

pub const CLASS_NAME: &str = "CLASS_NAME";
pub const CLASS_CONTENT: &str = "CLASS_CONTENT";
pub const RELATED_FILES_CONTENT: &str = "RELATED_FILES_CONTENT";
pub const RELATED_FILES_SECTION: &str = "RELATED_FILES_SECTION";
pub const QUESTION: &str = "QUESTION";
pub const CHANGE_REQUEST: &str = "CHANGE_REQUEST";
pub const ORIGINAL_CLASS: &str = "ORIGINAL_CLASS";
pub const DIFF: &str = "DIFF";
pub const TEST_FILE: &str = "TEST_FILE";

/// Substitute `{NAME}` placeholders in one pass. Unknown placeholders and
/// braces in substituted values are left alone.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// The related-files block appended to prompts; empty without files.
pub fn related_files_content(related: &[RelatedFile]) -> String {
    if related.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nRelated files for context:");
    for file in related {
        out.push_str("\n\n// File: ");
        out.push_str(&file.path);
        out.push('\n');
        out.push_str(&file.content);
    }
    out
}

/// The list entry announcing related files in the modified-file prompt.
pub fn related_files_section(related: &[RelatedFile]) -> String {
    if related.is_empty() {
        String::new()
    } else {
        format!("4. {} related files for additional context", related.len())
    }
}

pub fn explain_prompt(
    templates: &PromptTemplates,
    class_name: &str,
    class_content: &str,
    related: &[RelatedFile],
) -> String {
    let related = related_files_content(related);
    render(
        &templates.explain_code,
        &[
            (CLASS_NAME, class_name),
            (CLASS_CONTENT, class_content),
            (RELATED_FILES_CONTENT, &related),
        ],
    )
}

pub fn ask_prompt(
    templates: &PromptTemplates,
    class_name: &str,
    class_content: &str,
    question: &str,
    related: &[RelatedFile],
) -> String {
    let related = related_files_content(related);
    render(
        &templates.ask_question,
        &[
            (CLASS_NAME, class_name),
            (CLASS_CONTENT, class_content),
            (QUESTION, question),
            (RELATED_FILES_CONTENT, &related),
        ],
    )
}

pub fn change_prompt(
    templates: &PromptTemplates,
    class_name: &str,
    class_content: &str,
    change_request: &str,
    related: &[RelatedFile],
) -> String {
    let related = related_files_content(related);
    render(
        &templates.make_change,
        &[
            (CLASS_NAME, class_name),
            (CLASS_CONTENT, class_content),
            (CHANGE_REQUEST, change_request),
            (RELATED_FILES_CONTENT, &related),
        ],
    )
}

pub fn new_file_tests_prompt(
    templates: &PromptTemplates,
    class_name: &str,
    class_content: &str,
    related: &[RelatedFile],
) -> String {
    let related = related_files_content(related);
    render(
        &templates.new_file_tests,
        &[
            (CLASS_NAME, class_name),
            (CLASS_CONTENT, class_content),
            (RELATED_FILES_CONTENT, &related),
        ],
    )
}

pub fn modified_file_tests_prompt(
    templates: &PromptTemplates,
    original_class: &str,
    diff: &str,
    test_file: &str,
    related: &[RelatedFile],
) -> String {
    let section = related_files_section(related);
    let related = related_files_content(related);
    render(
        &templates.modified_file_tests,
        &[
            (ORIGINAL_CLASS, original_class),
            (DIFF, diff),
            (TEST_FILE, test_file),
            (RELATED_FILES_SECTION, &section),
            (RELATED_FILES_CONTENT, &related),
        ],
    )
}

/// Raw "file plus context" text: the file under a `// File:` header, then
/// every related file under its own header.
pub fn copy_with_context(path: &str, content: &str, related: &[RelatedFile]) -> String {
    let mut out = format!("// File: {path}\n{content}\n\n");
    if !related.is_empty() {
        out.push_str("// Related files:\n\n");
        for file in related {
            out.push_str(&format!("// File: {}\n{}\n\n", file.path, file.content));
        }
    }
    out
}

/// Name of the first type declared in `source`, or the file stem.
pub fn class_name(path: &Path, source: &str) -> String {
    extract_file(path, source)
        .ok()
        .and_then(|file| file.types.into_iter().next())
        .map(|ty| ty.name)
        .unwrap_or_else(|| file_stem(path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Locate the test class for `file`: `<Name>Test.java` or `Test<Name>.java`
/// next to it, then in the conventional test source roots of
/// `project_root` under the file's package directory.
pub fn find_test_file(project_root: &Path, file: &Path, package: Option<&str>) -> Option<PathBuf> {
    let stem = file_stem(file);
    let candidates = [format!("{stem}Test.java"), format!("Test{stem}.java")];

    let mut dirs: Vec<PathBuf> = file.parent().map(Path::to_path_buf).into_iter().collect();
    let package_dir = package.unwrap_or_default().replace('.', "/");
    for test_root in ["src/test/java", "test/java", "test"] {
        dirs.push(project_root.join(test_root).join(&package_dir));
    }

    dirs.iter()
        .flat_map(|dir| candidates.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Read `file` and find its test class using its declared package.
pub fn find_test_file_for(project_root: &Path, file: &Path) -> Option<PathBuf> {
    let source = read_source(file).ok()?;
    let package = extract_file(file, &source).ok().and_then(|f| f.package);
    find_test_file(project_root, file, package.as_deref())
}
