use dashmap::DashMap;
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{fs, path::Path};

use crate::{
    constants::REQUIRE_IDENT,
    error::GraphError,
    types::{FilePath, SpecKind, Specifier},
};

/// Pulls dependency specifiers out of JS/TS source text.
///
/// Results for files read through [`SpecifierExtractor::imports_for`] are
/// memoised for the lifetime of the extractor, so one extractor can be shared
/// by builds of the same run on several threads. A later run needs a new one
/// to see edits.
#[derive(Debug, Default)]
pub struct SpecifierExtractor {
    dynamic_imports: bool,
    cache: DashMap<FilePath, Vec<Specifier>>,
}

impl SpecifierExtractor {
    pub fn new(dynamic_imports: bool) -> Self {
        Self { dynamic_imports, cache: DashMap::new() }
    }

    /// Reads `file` and extracts its specifiers, reusing an earlier result.
    pub fn imports_for(&self, file: &FilePath) -> Result<Vec<Specifier>, GraphError> {
        if let Some(v) = self.cache.get(file) {
            trace!("Cache hit for imports: {}", file);
            return Ok(v.clone());
        }
        trace!("Parsing file for imports: {}", file);
        let src = fs::read_to_string(file)
            .map_err(|source| GraphError::Read { path: file.as_path().to_path_buf(), source })?;

        let specs = self.extract(file.as_path(), &src)?;
        self.cache.insert(file.clone(), specs.clone());
        Ok(specs)
    }

    /// Extracts specifiers from `src` in source order. `path` picks the
    /// dialect and names the file in errors; it is not read.
    pub fn extract(&self, path: &Path, src: &str) -> Result<Vec<Specifier>, GraphError> {
        let st = source_type_for(path);
        let allocator = Allocator::default();
        let ParserReturn { program, errors, panicked, .. } =
            OxcParser::new(&allocator, src, st).parse();

        if panicked || !errors.is_empty() {
            let message = errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "parser aborted".to_string());
            debug!("Parse failed for {}: {}", path.display(), message);
            return Err(GraphError::Parse { path: path.to_path_buf(), message });
        }

        let mut collector =
            ImportCollector { specs: Vec::new(), dynamic_imports: self.dynamic_imports };
        collector.visit_program(&program);

        debug!("Found {} import specifiers in {}", collector.specs.len(), path.display());
        Ok(collector.specs)
    }

    /// Number of files parsed so far.
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }
}

struct ImportCollector {
    specs: Vec<Specifier>,
    dynamic_imports: bool,
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        // import type { Foo } from 'bar'
        if decl.import_kind.is_type() {
            trace!("Skipping type-only import of '{}'", decl.source.value);
            return;
        }

        // import { type Foo } from 'bar' is erased too, unless something else is imported
        let has_runtime_import = match &decl.specifiers {
            Some(specifiers) => {
                specifiers.is_empty()
                    || specifiers.iter().any(|spec| match spec {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => !s.import_kind.is_type(),
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => true,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => true,
                    })
            }
            // import 'side-effect'
            None => true,
        };

        if has_runtime_import {
            trace!("Found static import: '{}'", decl.source.value);
            self.specs
                .push(Specifier { request: decl.source.value.to_string(), kind: SpecKind::Static });
        }
        walk::walk_import_declaration(self, decl);
    }

    fn visit_call_expression(&mut self, ce: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &ce.callee
            && callee.name.as_str() == REQUIRE_IDENT
            && ce.arguments.len() == 1
        {
            match ce.arguments[0].as_expression() {
                Some(Expression::StringLiteral(sl)) => {
                    trace!("Found require() call: '{}'", sl.value);
                    self.specs
                        .push(Specifier { request: sl.value.to_string(), kind: SpecKind::Require });
                }
                _ => trace!("Skipping require() with a non-literal argument"),
            }
        }
        // Arguments may hold further require() calls
        walk::walk_call_expression(self, ce);
    }

    fn visit_import_expression(&mut self, ie: &ImportExpression<'a>) {
        if self.dynamic_imports
            && let Expression::StringLiteral(sl) = &ie.source
        {
            trace!("Found dynamic import(): '{}'", sl.value);
            self.specs.push(Specifier { request: sl.value.to_string(), kind: SpecKind::Dynamic });
        }
        walk::walk_import_expression(self, ie);
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")))
        // .cjs/.cts cannot contain import declarations
        .with_module(!matches!(ext, Some("cjs") | Some("cts")))
}
