//! Generating and writing declarations for compiled modules.

use crate::config::PluginConfig;
use crate::declaration::render_declaration;
use crate::error::GenerateError;
use crate::evaluate::{ModuleEvaluator, ViteModuleEvaluator};
use crate::exports::ExportEntry;
use crate::synthesize::synthesize;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use source_map::{resolve, LineMapping, Strictness};
use std::fs;

/// Suffix of the files this generator handles.
const CSS_MODULE_SUFFIX: &str = ".module.css";

/// Returns true if `id` names a CSS module.
pub fn is_css_module(id: &Utf8Path) -> bool {
    id.as_str().ends_with(CSS_MODULE_SUFFIX)
}

/// A rendered declaration, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Where the declaration belongs.
    pub path: Utf8PathBuf,
    /// The stylesheet's line table; empty without source maps.
    pub mappings: Vec<LineMapping>,
    /// The correlated entries, in export order.
    pub entries: Vec<ExportEntry>,
    /// The declaration text.
    pub text: String,
}

/// What happened to one transform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a CSS module; passed through untouched.
    Skipped,
    /// The declaration was written.
    Written {
        /// The declaration path.
        path: Utf8PathBuf,
        /// Number of keys declared.
        keys: usize,
    },
    /// An identical declaration already existed.
    Unchanged {
        /// The declaration path.
        path: Utf8PathBuf,
        /// Number of keys declared.
        keys: usize,
    },
}

/// Generates declaration files for one project.
///
/// A generator holds no per-file state, so one instance can serve many files
/// concurrently.
#[derive(Debug, Clone)]
pub struct DtsGenerator<E = ViteModuleEvaluator> {
    root: Utf8PathBuf,
    config: PluginConfig,
    source_maps: bool,
    evaluator: E,
}

impl DtsGenerator<ViteModuleEvaluator> {
    /// Creates a generator that evaluates Vite dev-server output.
    pub fn new(root: impl Into<Utf8PathBuf>, config: PluginConfig) -> Self {
        Self::with_evaluator(root, config, ViteModuleEvaluator)
    }
}

impl<E: ModuleEvaluator> DtsGenerator<E> {
    /// Creates a generator with a custom module evaluator.
    pub fn with_evaluator(root: impl Into<Utf8PathBuf>, config: PluginConfig, evaluator: E) -> Self {
        Self {
            root: root.into(),
            config,
            source_maps: true,
            evaluator,
        }
    }

    /// Enables or disables source map resolution.
    ///
    /// Without source maps no key gets a line or a doc comment.
    pub fn source_maps(mut self, enabled: bool) -> Self {
        self.source_maps = enabled;
        self
    }

    /// Returns the absolute output directory.
    pub fn output_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.config.dts_output_dir)
    }

    /// Creates the output directory.
    pub fn prepare(&self) -> Result<(), GenerateError> {
        let dir = self.output_dir();
        fs::create_dir_all(&dir).map_err(|source| GenerateError::Write { path: dir, source })
    }

    /// Returns where the declaration of module `id` is written.
    ///
    /// Modules outside the root keep their path components under the output
    /// directory, so they never escape it.
    pub fn declaration_path(&self, id: &Utf8Path) -> Utf8PathBuf {
        let relative: Utf8PathBuf = match id.strip_prefix(&self.root) {
            Ok(relative) => relative.to_owned(),
            Err(_) => id
                .components()
                .filter_map(|component| match component {
                    Utf8Component::Normal(part) => Some(part),
                    _ => None,
                })
                .collect(),
        };
        self.output_dir().join(format!("{relative}.d.ts"))
    }

    /// Builds the declaration of module `id` from its compiled text.
    pub fn generate(&self, id: &Utf8Path, code: &str) -> Result<Declaration, GenerateError> {
        let module = self
            .evaluator
            .evaluate(code)
            .map_err(|source| GenerateError::Evaluate {
                id: id.to_owned(),
                source,
            })?;

        let mappings = match (&module.stylesheet, self.source_maps) {
            (Some(stylesheet), true) => match resolve(stylesheet, Strictness::Strict) {
                Ok(mappings) => mappings,
                Err(e) if e.is_missing() => {
                    tracing::warn!(%id, "inline source map is not found");
                    Vec::new()
                }
                Err(source) => {
                    return Err(GenerateError::SourceMap {
                        id: id.to_owned(),
                        source,
                    })
                }
            },
            (None, true) => {
                tracing::warn!(%id, "compiled module has no stylesheet");
                Vec::new()
            }
            (_, false) => Vec::new(),
        };

        let original_source = if self.source_maps {
            Some(fs::read_to_string(id).map_err(|source| GenerateError::Read {
                path: id.to_owned(),
                source,
            })?)
        } else {
            None
        };

        let entries = synthesize(&module.exports, &mappings, original_source.as_deref());
        let text = render_declaration(&entries, id);

        Ok(Declaration {
            path: self.declaration_path(id),
            mappings,
            entries,
            text,
        })
    }

    /// Handles one transform request: CSS modules get a declaration written,
    /// anything else is skipped.
    pub fn transform(&self, id: &Utf8Path, code: &str) -> Result<Outcome, GenerateError> {
        if !is_css_module(id) {
            return Ok(Outcome::Skipped);
        }

        let declaration = self.generate(id, code)?;
        self.write(&declaration)
    }

    /// Writes a declaration, creating parent directories.
    ///
    /// A file whose content already matches is left untouched.
    pub fn write(&self, declaration: &Declaration) -> Result<Outcome, GenerateError> {
        let keys = declaration.entries.len();
        let path = declaration.path.clone();

        if fs::read_to_string(&path).is_ok_and(|existing| existing == declaration.text) {
            tracing::debug!(%path, "declaration unchanged");
            return Ok(Outcome::Unchanged { path, keys });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
                path: parent.to_owned(),
                source,
            })?;
        }
        fs::write(&path, &declaration.text).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(%path, keys, "wrote declaration");
        Ok(Outcome::Written { path, keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::EvaluatedModule;
    use crate::error::EvaluateError;

    fn fixed_exports(_: &str) -> Result<EvaluatedModule, EvaluateError> {
        Ok(EvaluatedModule {
            exports: [("a", "_a_1")].into_iter().collect(),
            stylesheet: Some("._a_1 {}".to_string()),
        })
    }

    #[test]
    fn test_is_css_module() {
        assert!(is_css_module(Utf8Path::new("/app/a.module.css")));
        assert!(!is_css_module(Utf8Path::new("/app/a.css")));
        assert!(!is_css_module(Utf8Path::new("/app/a.module.scss")));
        assert!(!is_css_module(Utf8Path::new("/app/a.module.css?inline")));
    }

    #[test]
    fn test_declaration_path_inside_root() {
        let generator = DtsGenerator::new("/app", PluginConfig::default());
        assert_eq!(
            generator.declaration_path(Utf8Path::new("/app/src/ui/a.module.css")),
            Utf8PathBuf::from("/app/css-module-types/src/ui/a.module.css.d.ts")
        );
    }

    #[test]
    fn test_declaration_path_outside_root() {
        let generator = DtsGenerator::new(
            "/app",
            PluginConfig {
                dts_output_dir: "types".to_string(),
            },
        );
        assert_eq!(
            generator.declaration_path(Utf8Path::new("/shared/a.module.css")),
            Utf8PathBuf::from("/app/types/shared/a.module.css.d.ts")
        );
    }

    #[test]
    fn test_non_module_is_skipped() {
        let generator = DtsGenerator::with_evaluator("/app", PluginConfig::default(), fixed_exports);
        let outcome = generator
            .transform(Utf8Path::new("/app/a.css"), "ignored")
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[test]
    fn test_generate_without_source_maps() {
        let generator = DtsGenerator::with_evaluator("/app", PluginConfig::default(), fixed_exports)
            .source_maps(false);
        // The original file does not exist; it is never read without source maps.
        let declaration = generator
            .generate(Utf8Path::new("/app/missing.module.css"), "ignored")
            .unwrap();
        assert_eq!(declaration.entries.len(), 1);
        assert_eq!(declaration.entries[0].matched_line, None);
    }

    #[test]
    fn test_stylesheet_without_map_declares_unmapped_keys() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let id = root.join("a.module.css");
        fs::write(&id, "/** doc */\n.a {}").unwrap();

        let generator = DtsGenerator::with_evaluator(&root, PluginConfig::default(), fixed_exports);
        let declaration = generator.generate(&id, "ignored").unwrap();
        assert!(declaration.mappings.is_empty());
        assert_eq!(declaration.entries[0].matched_line, None);
        assert_eq!(declaration.entries[0].comment, None);
    }

    #[test]
    fn test_missing_original_file_fails() {
        let generator = DtsGenerator::with_evaluator("/app", PluginConfig::default(), fixed_exports);
        let err = generator
            .generate(Utf8Path::new("/app/missing.module.css"), "ignored")
            .unwrap_err();
        assert!(matches!(err, GenerateError::Read { .. }));
    }
}
