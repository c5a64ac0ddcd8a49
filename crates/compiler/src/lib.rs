//! DyeScript Compiler
//!
//! Interprets DyeScript statements into a [`Store`] of variables, styles,
//! animations and fonts, then renders that store as CSS.

pub mod builder;
pub mod case;
pub mod error;
pub mod interpreter;
pub mod runtime;
pub mod scope;
pub mod store;
pub mod validator;

pub use builder::{dominant_value, CssBuilder, MinCssBuilder, StylesheetBuilder};
pub use case::{to_camel_case, to_kebab_case};
pub use error::{DyeError, DyeResult};
pub use interpreter::{Interpreter, StatementKind};
pub use runtime::{Diagnostic, Logger, Runtime, Severity};
pub use scope::{Collection, Scope, ScopeManager};
pub use store::{FontFace, ScopeWrapper, Store};
pub use validator::VariableNameValidator;

/// Insertion-ordered map; rules and bindings render in first-write order
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

/// How the compiled CSS is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// Minified only if the source enables DyeGest mode
    #[default]
    Auto,
    Pretty,
    Minified,
}

/// Options for [`compile`]
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name used in diagnostics
    pub file_name: String,
    /// Start in strict mode
    pub strict: bool,
    pub output: OutputStyle,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            file_name: "<input>".to_string(),
            strict: false,
            output: OutputStyle::Auto,
        }
    }
}

/// Result of compiling one source
#[derive(Debug)]
pub struct Compilation {
    pub css: String,
    pub store: Store,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether `css` came from the minified builder
    pub minified: bool,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

/// Lex, interpret and render a DyeScript source
///
/// Lexing errors are returned; statement errors are collected as diagnostics.
pub fn compile(source: &str, options: &CompileOptions) -> DyeResult<Compilation> {
    let statements = dyescript_parser::parse(source)?;

    let mut runtime = Runtime::new(options.file_name.clone());
    if options.strict {
        runtime.enable_strict_mode();
    }

    let store = Interpreter::new(Store::new(), &mut runtime).process(&statements);

    let minified = match options.output {
        OutputStyle::Auto => runtime.is_dyegest(),
        OutputStyle::Pretty => false,
        OutputStyle::Minified => true,
    };
    let css = if minified {
        MinCssBuilder::new().build(&store)
    } else {
        CssBuilder::new().build(&store)
    };

    log::info!(
        "Compiled {} statements from {} into {} bytes of CSS",
        statements.len(),
        options.file_name,
        css.len()
    );

    Ok(Compilation {
        css,
        store,
        diagnostics: runtime.logger.take_diagnostics(),
        minified,
    })
}
