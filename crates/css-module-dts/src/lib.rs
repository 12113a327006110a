//! TypeScript declaration stubs for CSS modules.
//!
//! Given the compiled form of a `*.module.css` file, this crate produces a
//! `.d.ts` file listing every exported class name. Each key carries a link to
//! the line that authored it, recovered through the stylesheet's inline source
//! map, plus the `/** ... */` comment written right above that line.
//!
//! The pipeline is:
//! - [`ModuleEvaluator`] turns compiled module text into an [`ExportTable`]
//!   and the raw stylesheet
//! - [`source_map::resolve`] maps every stylesheet line to its original line
//! - [`synthesize`] correlates keys with lines and doc comments
//! - [`render_declaration`] prints the declaration text
//!
//! [`DtsGenerator`] runs all of it for one file and writes the result.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use css_module_dts::{render_declaration, synthesize, ExportTable};
//!
//! let exports: ExportTable = [("button", "_button_a1b2_1")].into_iter().collect();
//! let entries = synthesize(&exports, &[], None);
//! let dts = render_declaration(&entries, Utf8Path::new("/app/src/button.module.css"));
//!
//! assert!(dts.contains(r#"readonly "button": "_button_a1b2_1";"#));
//! ```

mod comments;
mod config;
mod declaration;
mod error;
mod evaluate;
mod exports;
mod generator;
mod synthesize;

pub use comments::{CssDocComment, DocComments};
pub use config::{PluginConfig, CONFIG_FILE, DEFAULT_DTS_OUTPUT_DIR};
pub use declaration::render_declaration;
pub use error::{EvaluateError, GenerateError};
pub use evaluate::{EvaluatedModule, ModuleEvaluator, ViteModuleEvaluator};
pub use exports::{ExportEntry, ExportTable};
pub use generator::{is_css_module, Declaration, DtsGenerator, Outcome};
pub use synthesize::synthesize;
