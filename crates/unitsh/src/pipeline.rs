//! ordered processing stages
//!
//! Stage order matters: references are resolved against the raw tree, before paths and names exist.
use crate::document::Document;
use crate::CompileError;

/// A pass over the whole document
pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, document: &mut Document) -> Result<(), CompileError>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    pub fn run(&self, document: &mut Document) -> Result<(), CompileError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "running stage");
            stage.run(document)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(vec![
            Box::new(NormalizeOptions),
            Box::new(ResolveReferences),
            Box::new(AssignPaths),
            Box::new(AssignNames),
        ])
    }
}

pub struct NormalizeOptions;

impl Stage for NormalizeOptions {
    fn name(&self) -> &'static str {
        "normalize-options"
    }

    fn run(&self, document: &mut Document) -> Result<(), CompileError> {
        crate::options::normalize(&mut document.options).map(|_| ())
    }
}

pub struct ResolveReferences;

impl Stage for ResolveReferences {
    fn name(&self) -> &'static str {
        "resolve-references"
    }

    fn run(&self, document: &mut Document) -> Result<(), CompileError> {
        crate::resolve::resolve_references(&mut document.units)
    }
}

pub struct AssignPaths;

impl Stage for AssignPaths {
    fn name(&self) -> &'static str {
        "assign-paths"
    }

    fn run(&self, document: &mut Document) -> Result<(), CompileError> {
        crate::paths::assign_paths(&mut document.units);
        Ok(())
    }
}

pub struct AssignNames;

impl Stage for AssignNames {
    fn name(&self) -> &'static str {
        "assign-names"
    }

    fn run(&self, document: &mut Document) -> Result<(), CompileError> {
        let separator = crate::options::separator(&document.options)?;
        crate::names::assign_names(&mut document.units, separator);
        Ok(())
    }
}
