//! Configuration for related-file collection and prompt templates.
//!
//! Loaded from `<project>/.promptforge/config.toml`. Every field is optional;
//! anything missing falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

/// Directory (relative to the project root) holding PromptForge state.
pub const CONFIG_DIR: &str = ".promptforge";
/// File name of the config inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Namespace prefixes skipped by default when `skip_java_packages` is on.
pub const DEFAULT_EXCLUDED_PACKAGES: &[&str] = &[
    "java.lang",
    "java.util",
    "java.io",
    "java.net",
    "java.math",
    "java.time",
    "java.text",
    "java.sql",
    "java.awt",
    "java.applet",
    "java.beans",
    "java.nio",
    "java.rmi",
    "java.security",
    "javax.swing",
    "javax.servlet",
    "javax.ejb",
    "javax.persistence",
    "javax.xml",
    "org.w3c",
    "org.xml",
    "com.sun",
    "sun.",
    "kotlin.",
    "org.jetbrains",
    "org.springframework",
    "org.apache",
    "com.google",
    "com.fasterxml",
];

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub related_files: CollectorConfig,
    pub templates: PromptTemplates,
    pub workspace: WorkspaceConfig,
}

/// Options governing related-file collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub include_related_files: bool,
    pub max_related_files: usize,
    pub max_depth: usize,
    pub include_implementations: bool,
    pub include_javadoc: bool,
    pub smart_pruning: bool,
    pub include_dependencies: bool,
    pub include_decompiled: bool,
    pub max_decompiled_files: usize,
    pub skip_java_packages: bool,
    /// Ordered list of qualified-name prefixes; empty entries are ignored.
    pub excluded_packages: Vec<String>,
    pub trim_whitespace: bool,
    pub exclude_imports_in_related_files: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            include_related_files: true,
            max_related_files: 5,
            max_depth: 1,
            include_implementations: true,
            include_javadoc: true,
            smart_pruning: true,
            include_dependencies: false,
            include_decompiled: false,
            max_decompiled_files: 3,
            skip_java_packages: true,
            excluded_packages: DEFAULT_EXCLUDED_PACKAGES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            trim_whitespace: true,
            exclude_imports_in_related_files: false,
        }
    }
}

/// Where dependency sources and compiled classes live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directories indexed as dependencies. Relative paths are resolved
    /// against the project root.
    pub library_roots: Vec<PathBuf>,
}

impl WorkspaceConfig {
    pub fn resolved_library_roots(&self, project_root: &Path) -> Vec<PathBuf> {
        self.library_roots
            .iter()
            .map(|root| {
                if root.is_absolute() {
                    root.clone()
                } else {
                    project_root.join(root)
                }
            })
            .collect()
    }
}

/// User-editable prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub new_file_tests: String,
    pub modified_file_tests: String,
    pub explain_code: String,
    pub ask_question: String,
    pub make_change: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            new_file_tests: DEFAULT_NEW_FILE_PROMPT.to_string(),
            modified_file_tests: DEFAULT_MODIFIED_FILE_PROMPT.to_string(),
            explain_code: DEFAULT_EXPLAIN_CODE_PROMPT.to_string(),
            ask_question: DEFAULT_ASK_QUESTION_PROMPT.to_string(),
            make_change: DEFAULT_MAKE_CHANGE_PROMPT.to_string(),
        }
    }
}

impl ForgeConfig {
    /// Default config path for a project root.
    pub fn default_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the config at `path`, falling back to defaults when the file is
    /// missing, unreadable or malformed.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                return Self::default();
            }
        };

        match Self::from_toml_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }
}

pub const DEFAULT_EXPLAIN_CODE_PROMPT: &str = r#"I'm looking at a Java class called {CLASS_NAME} and would like you to help me understand it.

Please analyze the code and:
1. Explain the purpose and functionality of the class
2. Describe key methods and their roles
3. Identify any design patterns or notable coding practices
4. Explain any complex or non-obvious parts

Here's the class:
{CLASS_CONTENT}
{RELATED_FILES_CONTENT}

Please provide a comprehensive explanation that would help me understand this code better.
"#;

pub const DEFAULT_ASK_QUESTION_PROMPT: &str = r#"I have a question about this Java class called {CLASS_NAME}:

{QUESTION}

Here's the class:
{CLASS_CONTENT}
{RELATED_FILES_CONTENT}

Please provide a detailed answer to my question based on the code.
"#;

pub const DEFAULT_MAKE_CHANGE_PROMPT: &str = r#"I need to make the following change to this Java class called {CLASS_NAME}:

{CHANGE_REQUEST}

Here's the current code:
{CLASS_CONTENT}
{RELATED_FILES_CONTENT}

Please provide:
1. The modified code with the requested changes
2. An explanation of what you changed and why
3. Any potential issues or considerations I should be aware of
"#;

pub const DEFAULT_NEW_FILE_PROMPT: &str = r#"Your task is to write a complete JUnit 5 test class for {CLASS_NAME}.

IMPORTANT: Your response should ONLY contain the Java code for the test class, nothing else.

## Testing Guidelines

Follow these rules strictly:

1. Start with the package declaration (if applicable).
2. Include all necessary import statements, including JUnit 5 and Mockito.
3. Write the full test class declaration with appropriate annotations.
4. Create mock objects for all dependencies using @Mock annotation.
5. Implement a @BeforeEach method to initialize mocks and set up common test scenarios.
6. Include multiple test methods to cover various scenarios, including:
   - Happy path tests
   - Edge cases
   - Error handling scenarios
7. Use appropriate JUnit 5 annotations like @Test, @DisplayName, etc.
8. Implement thorough mocking, including:
   - Stubbing method calls with when().thenReturn()
   - Mocking void methods with doNothing().when() if necessary
   - Mocking exceptions with when().thenThrow()
9. Use Mockito's verify() to ensure methods are called with correct parameters and frequency.
10. Include tests for all public methods of the class under test.
11. Pay special attention to null checks and conditional logic in the original class.
12. Use assertThrows() to test exception scenarios correctly.
13. Add comments to clearly separate Arrange, Act, and Assert sections in each test method.
14. Aim for at least 90% line coverage of the main class.
15. End the file properly with closing braces.
16. DO NOT assume any methods or fields of classes that are not explicitly provided in the context.

Here's the class to test:

{CLASS_CONTENT}

{RELATED_FILES_CONTENT}

DO NOT include any explanations, comments, or anything other than the Java code itself. Begin the Java file content immediately, starting with the package or import statements.
"#;

pub const DEFAULT_MODIFIED_FILE_PROMPT: &str = r#"I'll provide you with:

1. An original Java class
2. A diff showing changes to that class
3. The current test file
{RELATED_FILES_SECTION}

Your task is to write ONLY the new or modified JUnit 5 test methods needed to cover the changes.

IMPORTANT: Your response should ONLY contain the Java code for the test methods, nothing else.

## Testing Guidelines

1. Only generate test methods - no class declarations, imports, or setup code
2. Cover all new/modified code in the diff
3. Include tests for:
   - Happy path scenarios
   - Edge cases
   - Error handling
4. Use appropriate JUnit 5 annotations (@Test, @DisplayName, etc.)
5. Implement thorough mocking as needed
6. Use Mockito's verify() to ensure methods are called correctly
7. Follow AAA pattern (Arrange, Act, Assert) with comments
8. Match the style of the existing test file
9. DO NOT modify existing test methods unless necessary

Here's the original class:

{ORIGINAL_CLASS}

Here's the diff showing changes:

{DIFF}

Here's the current test file:

{TEST_FILE}

{RELATED_FILES_CONTENT}

Generate only the test methods needed to cover the changes.
"#;
