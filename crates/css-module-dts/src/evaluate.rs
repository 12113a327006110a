//! Static evaluation of compiled CSS modules.

use crate::error::EvaluateError;
use crate::exports::ExportTable;
use std::collections::HashMap;
use swc_common::{FileName, SourceMap as SwcSourceMap};
use swc_ecma_ast::{
    Decl, EsVersion, ExportDecl, ExportDefaultExpr, Expr, KeyValueProp, Lit, Module, ModuleDecl,
    ModuleItem, ObjectLit, Pat, Prop, PropName, PropOrSpread, Stmt, VarDecl,
};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax};

/// The binding Vite's dev server stores the compiled stylesheet in.
const STYLESHEET_BINDING: &str = "__vite__css";

/// What a compiled CSS module exports at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluatedModule {
    /// The default export: class name to hashed selector.
    pub exports: ExportTable,
    /// The compiled stylesheet, including its inline source map comment.
    pub stylesheet: Option<String>,
}

/// Produces the runtime exports of a compiled module.
///
/// Closures of the form `Fn(&str) -> Result<EvaluatedModule, EvaluateError>`
/// implement this trait, which lets hosts plug in their own module loader.
pub trait ModuleEvaluator: Send + Sync {
    /// Evaluates compiled module text.
    fn evaluate(&self, code: &str) -> Result<EvaluatedModule, EvaluateError>;
}

impl<F> ModuleEvaluator for F
where
    F: Fn(&str) -> Result<EvaluatedModule, EvaluateError> + Send + Sync,
{
    fn evaluate(&self, code: &str) -> Result<EvaluatedModule, EvaluateError> {
        self(code)
    }
}

/// Evaluates Vite dev-server CSS module output without executing it.
///
/// Vite compiles `a.module.css` into a module that stores the stylesheet in a
/// `__vite__css` constant and default-exports an object literal of class
/// names. Values may be string literals or references to top-level string
/// constants. Keys whose value is anything else are kept as unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViteModuleEvaluator;

impl ModuleEvaluator for ViteModuleEvaluator {
    fn evaluate(&self, code: &str) -> Result<EvaluatedModule, EvaluateError> {
        let module = parse_module(code)?;
        let bindings = collect_string_bindings(&module);

        let mut exports = ExportTable::new();
        match find_default_export(&module) {
            Some(object) => collect_exports(object, &bindings, &mut exports),
            None => tracing::debug!("compiled module has no default export object"),
        }

        Ok(EvaluatedModule {
            exports,
            stylesheet: bindings.get(STYLESHEET_BINDING).cloned(),
        })
    }
}

fn parse_module(code: &str) -> Result<Module, EvaluateError> {
    let cm: SwcSourceMap = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("compiled.module.css.js".to_string()).into(),
        code.to_string(),
    );

    parse_file_as_module(
        &fm,
        Syntax::Es(EsSyntax {
            jsx: false,
            ..Default::default()
        }),
        EsVersion::Es2022,
        None,
        &mut Vec::new(),
    )
    .map_err(|e| EvaluateError::Parse(format!("{:?}", e)))
}

/// Collects top-level `const name = "..."` bindings, exported or not.
fn collect_string_bindings(module: &Module) -> HashMap<String, String> {
    let mut bindings = HashMap::new();

    for item in &module.body {
        let var = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var),
                ..
            })) => var,
            _ => continue,
        };
        collect_var_strings(var, &mut bindings);
    }

    bindings
}

fn collect_var_strings(var: &VarDecl, bindings: &mut HashMap<String, String>) {
    for decl in &var.decls {
        let Pat::Ident(ident) = &decl.name else {
            continue;
        };
        if let Some(value) = decl.init.as_deref().and_then(string_literal) {
            bindings.insert(ident.id.sym.to_string(), value.to_string());
        }
    }
}

fn find_default_export(module: &Module) -> Option<&ObjectLit> {
    module.body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr { expr, .. })) => {
            match unparen(expr) {
                Expr::Object(object) => Some(object),
                _ => None,
            }
        }
        _ => None,
    })
}

/// Adds the default export's properties to `exports`, in source order.
fn collect_exports(
    object: &ObjectLit,
    bindings: &HashMap<String, String>,
    exports: &mut ExportTable,
) {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };

        let (key, value) = match prop.as_ref() {
            Prop::KeyValue(KeyValueProp { key, value }) => {
                let Some(key) = prop_name_str(key) else {
                    continue;
                };
                (key, resolve_value(value, bindings))
            }
            Prop::Shorthand(ident) => {
                let name = ident.sym.as_str();
                (name, bindings.get(name).map(String::as_str))
            }
            _ => continue,
        };

        match value {
            Some(value) => exports.insert(key, value),
            None => exports.insert_unresolved(key),
        }
    }
}

fn resolve_value<'a>(value: &'a Expr, bindings: &'a HashMap<String, String>) -> Option<&'a str> {
    match unparen(value) {
        Expr::Ident(ident) => bindings.get(ident.sym.as_str()).map(String::as_str),
        expr => string_literal(expr),
    }
}

fn string_literal(expr: &Expr) -> Option<&str> {
    match unparen(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

fn prop_name_str(key: &PropName) -> Option<&str> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str()),
        PropName::Str(s) => s.value.as_str(),
        _ => None,
    }
}

fn unparen(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &*paren.expr;
    }
    expr
}
