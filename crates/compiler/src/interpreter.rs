//! DyeScript interpreter
//!
//! Evaluates statements one at a time against a [`Store`]. A statement
//! that fails is reported with its source location and dropped; the
//! next one is interpreted as if nothing happened.

use dyescript_parser::{ParsedSource, SourceLocation};

use crate::case::to_camel_case;
use crate::error::{DyeError, DyeResult};
use crate::runtime::Runtime;
use crate::scope::IMPLICIT_TYPE;
use crate::store::{FontFace, Store};
use crate::validator::VariableNameValidator;

/// Component tag used for every diagnostic the interpreter reports
pub const COMPONENT: &str = "DyeInterpreter";

/// What a statement does, decided by its first token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `@` / `var`
    Variable,
    /// `!@` / `default`
    DefaultVariable,
    /// `#` / `scope`
    Scope,
    /// `$` / `style`
    Style,
    /// `.$` / `class`
    Class,
    /// `@@` / `import`
    Import,
    /// `<=` / `expose`
    Expose,
    /// `=>` / `export`
    Export,
    /// `!type`
    Type,
    /// `!dyegest`
    DyeGest,
    /// `!version`
    Version,
    /// `~` / `animation`
    Animation,
    /// `~~` / `motion`
    Motion,
    /// `%` / `font`
    Font,
}

impl StatementKind {
    /// Map a leading token (symbol or keyword) to a statement kind
    pub fn from_token(token: &str) -> Option<Self> {
        let kind = match token {
            "@" | "var" => Self::Variable,
            "!@" | "default" => Self::DefaultVariable,
            "#" | "scope" => Self::Scope,
            "$" | "style" => Self::Style,
            ".$" | "class" => Self::Class,
            "@@" | "import" => Self::Import,
            "<=" | "expose" => Self::Expose,
            "=>" | "export" => Self::Export,
            "!type" => Self::Type,
            "!dyegest" => Self::DyeGest,
            "!version" => Self::Version,
            "~" | "animation" => Self::Animation,
            "~~" | "motion" => Self::Motion,
            "%" | "font" => Self::Font,
            _ => return None,
        };
        Some(kind)
    }

    /// Keyword form, used in messages
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Variable => "var",
            Self::DefaultVariable => "default",
            Self::Scope => "scope",
            Self::Style => "style",
            Self::Class => "class",
            Self::Import => "import",
            Self::Expose => "expose",
            Self::Export => "export",
            Self::Type => "!type",
            Self::DyeGest => "!dyegest",
            Self::Version => "!version",
            Self::Animation => "animation",
            Self::Motion => "motion",
            Self::Font => "font",
        }
    }
}

/// `&name` or `&collection/name` -> the referenced path
pub fn variable_reference(token: &str) -> Option<&str> {
    let path = token.strip_prefix('&')?;
    let mut chars = path.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '/') {
        Some(path)
    } else {
        None
    }
}

/// `$name` -> the queried class name
pub fn class_query(token: &str) -> Option<&str> {
    let name = token.strip_prefix('$')?;
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Some(name)
    } else {
        None
    }
}

/// Split `[names, value, names, value, ...]` into pairs
fn pairs<'t>(statement: StatementKind, tokens: &'t [String]) -> DyeResult<Vec<(&'t str, &'t str)>> {
    let chunks = tokens.chunks_exact(2);
    if let [name] = chunks.remainder() {
        return Err(DyeError::missing_value(statement.keyword(), name.as_str()));
    }
    Ok(chunks.map(|pair| (pair[0].as_str(), pair[1].as_str())).collect())
}

fn operand(statement: StatementKind, tokens: &[String], at: usize) -> DyeResult<&str> {
    tokens
        .get(at)
        .map(String::as_str)
        .ok_or(DyeError::MissingOperand { statement: statement.keyword() })
}

/// Interprets statements into a store
pub struct Interpreter<'rt> {
    store: Store,
    runtime: &'rt mut Runtime,
    validator: VariableNameValidator,
}

impl<'rt> Interpreter<'rt> {
    pub fn new(store: Store, runtime: &'rt mut Runtime) -> Self {
        Self {
            store,
            runtime,
            validator: VariableNameValidator::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Replace a variable reference with its value
    ///
    /// Unresolved references pass through as written.
    pub fn evaluate(&self, token: &str) -> String {
        let resolved = variable_reference(token)
            .and_then(|path| self.store.scope_manager().get_path(path));
        match resolved {
            Some(value) => value.to_string(),
            None => token.to_string(),
        }
    }

    /// Evaluate every token of a statement
    ///
    /// In strict mode each unresolved reference is reported as a warning.
    fn evaluate_tokens(&mut self, statement: &ParsedSource) -> Vec<String> {
        let mut tokens = Vec::with_capacity(statement.content.len());
        for token in &statement.content {
            let unresolved = variable_reference(token)
                .filter(|path| self.store.scope_manager().get_path(path).is_none());
            if let Some(path) = unresolved {
                log::debug!("Unresolved variable '&{}' kept as written", path);
                if self.runtime.is_strict() {
                    let warning = DyeError::UnresolvedVariable { name: path.to_string() };
                    self.runtime.report_warning(&warning.to_string(), COMPONENT, statement.index);
                }
            }
            tokens.push(self.evaluate(token));
        }
        tokens
    }

    /// Interpret one statement, reporting (not propagating) any failure
    ///
    /// Returns whether the statement took effect.
    pub fn interpret(&mut self, statement: &ParsedSource) -> bool {
        match self.interpret_statement(statement) {
            Ok(()) => true,
            Err(e) => {
                self.runtime.report_error(&e.to_string(), COMPONENT, statement.index);
                false
            }
        }
    }

    /// Interpret every statement in order and hand back the store
    pub fn process(mut self, statements: &[ParsedSource]) -> Store {
        for statement in statements {
            self.interpret(statement);
        }
        self.store
    }

    fn interpret_statement(&mut self, statement: &ParsedSource) -> DyeResult<()> {
        let tokens = self.evaluate_tokens(statement);

        let Some((query, queue)) = tokens.split_first() else {
            return Ok(());
        };

        if let Some(class_name) = class_query(query) {
            self.apply_class(class_name, queue, statement.index);
            return Ok(());
        }

        let Some(kind) = StatementKind::from_token(query) else {
            self.runtime.report_warning(
                &format!("Unknown statement '{}' ignored", query),
                COMPONENT,
                statement.index,
            );
            return Ok(());
        };

        log::debug!("{} statement at {}", kind.keyword(), statement.index);

        match kind {
            StatementKind::Variable => self.define_variables(queue),
            StatementKind::DefaultVariable => self.define_default_variables(queue),
            StatementKind::Scope => self.define_scope(queue),
            StatementKind::Style | StatementKind::Class => self.define_style(kind, queue),
            StatementKind::Import | StatementKind::Expose | StatementKind::Export => {
                Err(DyeError::not_supported(kind.keyword()))
            }
            StatementKind::Type => {
                self.set_type(queue);
                Ok(())
            }
            StatementKind::DyeGest => {
                self.runtime.enable_strict_mode();
                self.runtime.enable_dyegest_mode();
                Ok(())
            }
            StatementKind::Version => {
                self.check_support(queue, statement.index);
                Ok(())
            }
            StatementKind::Animation | StatementKind::Motion => self.define_animation(kind, queue),
            StatementKind::Font => self.define_font(queue),
        }
    }

    fn apply_class(&mut self, class_name: &str, targets: &[String], location: SourceLocation) {
        for target in targets {
            let applied = match class_query(target) {
                Some(target_class) => self.store.scope().extend_class(target_class, class_name),
                None => self.store.scope().apply_class(target, class_name),
            };
            if !applied {
                self.runtime.report_warning(
                    &format!("Unknown class '{}' not applied to '{}'", class_name, target),
                    COMPONENT,
                    location,
                );
            }
        }
    }

    fn define_variables(&mut self, queue: &[String]) -> DyeResult<()> {
        let bindings = pairs(StatementKind::Variable, queue)?;
        if let Some((name, _)) = bindings.iter().find(|(name, _)| !self.validator.is_valid(name)) {
            return Err(DyeError::InvalidVariableName { name: name.to_string() });
        }

        let mut scope = self.store.scope();
        for (name, value) in bindings {
            scope.set(name, value);
        }
        Ok(())
    }

    fn define_default_variables(&mut self, queue: &[String]) -> DyeResult<()> {
        let bindings = pairs(StatementKind::DefaultVariable, queue)?;
        let mut scope = self.store.scope();
        for (name, value) in bindings {
            scope.set_default(name, value);
        }
        Ok(())
    }

    fn define_scope(&mut self, queue: &[String]) -> DyeResult<()> {
        let name = operand(StatementKind::Scope, queue, 0)?;
        let mut scope = self.store.scope();
        scope.update(name);
        scope.load_collections(&queue[1..]);
        Ok(())
    }

    fn define_style(&mut self, kind: StatementKind, queue: &[String]) -> DyeResult<()> {
        let selectors: Vec<&str> = operand(kind, queue, 0)?.split(',').collect();
        for (properties, value) in pairs(kind, &queue[1..])? {
            for property in properties.split(',') {
                self.store.add_style(&selectors, &to_camel_case(property), value);
            }
        }
        Ok(())
    }

    fn define_animation(&mut self, kind: StatementKind, queue: &[String]) -> DyeResult<()> {
        let name = operand(kind, queue, 0)?;
        let labels = operand(kind, queue, 1)?;
        for (properties, value) in pairs(kind, &queue[2..])? {
            for label in labels.split(',') {
                for property in properties.split(',') {
                    let property = to_camel_case(property);
                    if kind == StatementKind::Motion {
                        self.store.add_motion(name, label, &property, value);
                    } else {
                        self.store.add_keyframe(name, label, &property, value);
                    }
                }
            }
        }
        Ok(())
    }

    fn define_font(&mut self, queue: &[String]) -> DyeResult<()> {
        let family = operand(StatementKind::Font, queue, 0)?;
        let source = queue
            .get(1)
            .ok_or_else(|| DyeError::missing_value(StatementKind::Font.keyword(), family))?;

        let mut font = FontFace::new(source.as_str());
        for (descriptor, value) in pairs(StatementKind::Font, &queue[2..])? {
            font = font.with_descriptor(&to_camel_case(descriptor), value);
        }
        self.store.add_font(family, font);
        Ok(())
    }

    fn set_type(&mut self, queue: &[String]) {
        let kind = queue.first().map(String::as_str).unwrap_or(IMPLICIT_TYPE);
        self.store.scope().set_type(kind);
    }

    fn check_support(&mut self, queue: &[String], location: SourceLocation) {
        let version = queue.first().map(String::as_str).unwrap_or("an unknown version");
        if version != Runtime::VERSION {
            self.runtime.report_warning(
                &format!(
                    "This file was digested by DyeScript {}; it may not work as expected. \
                     Try digesting the source file with DyeScript {}",
                    version,
                    Runtime::VERSION
                ),
                COMPONENT,
                location,
            );
        }
    }
}
