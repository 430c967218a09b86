//! Node schema validation against the global scope.
//!
//! A node schema declares typed input and output ports. Port types are
//! Navi expressions; output types may refer to input types through the
//! names `Input0`, `Input1`, .. (one per input id). Validation evaluates
//! every port type and reports schemas whose types do not evaluate,
//! without stopping at the first one.

use std::fmt;

use navi_eval::{evaluate, evaluate_with, Bindings, EvalError, Scope};
use navi_parse::{parse_expression, ParseError};
use navi_types::TypeValue;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// One input or output of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortSchema {
    pub id: u32,
    pub label: String,
    /// Type expression source, e.g. `Image { channels: 3 }`.
    pub ty: String,
}

impl PortSchema {
    pub fn new(id: u32, label: impl Into<String>, ty: impl Into<String>) -> Self {
        PortSchema {
            id,
            label: label.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSchema {
    /// Opaque key, e.g. `chainner:image:resize`.
    pub schema_id: String,
    pub name: String,
    pub inputs: Vec<PortSchema>,
    pub outputs: Vec<PortSchema>,
}

/// Schemas by id, in registration order.
#[derive(Clone, Debug, Default)]
pub struct SchemaCatalog {
    schemas: Vec<NodeSchema>,
    index: FxHashMap<String, usize>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        SchemaCatalog::default()
    }

    pub fn insert(&mut self, schema: NodeSchema) -> Result<(), SchemaError> {
        if self.index.contains_key(&schema.schema_id) {
            return Err(SchemaError::DuplicateSchema(schema.schema_id));
        }
        self.index.insert(schema.schema_id.clone(), self.schemas.len());
        self.schemas.push(schema);
        Ok(())
    }

    pub fn get(&self, schema_id: &str) -> Option<&NodeSchema> {
        self.index.get(schema_id).map(|&i| &self.schemas[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Which side of a node a port is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortKind {
    Input,
    Output,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::Input => f.write_str("input"),
            PortKind::Output => f.write_str("output"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{kind} {id} (`{label}`) has a malformed type: {error}")]
    Parse {
        kind: PortKind,
        id: u32,
        label: String,
        error: ParseError,
    },
    #[error("{kind} {id} (`{label}`) has an invalid type: {error}")]
    Eval {
        kind: PortKind,
        id: u32,
        label: String,
        error: EvalError,
    },
    #[error("schema `{0}` is already registered")]
    DuplicateSchema(String),
}

/// A schema that failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDiagnostic {
    pub schema_id: String,
    pub name: String,
    pub error: SchemaError,
}

impl fmt::Display for SchemaDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "this node's type definition is invalid: `{}` ({}): {}",
            self.name, self.schema_id, self.error
        )
    }
}

/// Evaluated port types of a valid schema, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeTypes {
    pub inputs: Vec<(u32, TypeValue)>,
    pub outputs: Vec<(u32, TypeValue)>,
}

/// The name under which input `id` is visible to output types.
pub fn input_binding_name(id: u32) -> String {
    format!("Input{id}")
}

/// Evaluate all port types of `schema`.
pub fn validate_schema(schema: &NodeSchema, scope: &Scope) -> Result<NodeTypes, SchemaError> {
    let interner = scope.interner();

    let mut inputs = Vec::with_capacity(schema.inputs.len());
    for port in &schema.inputs {
        let expr = parse_port(port, PortKind::Input, scope)?;
        let value = evaluate(&expr, scope).map_err(|error| eval_error(port, PortKind::Input, error))?;
        inputs.push((port.id, value));
    }

    let mut bindings = Bindings::new();
    for (id, value) in &inputs {
        bindings.bind(interner.intern(&input_binding_name(*id)), value.clone());
    }

    let mut outputs = Vec::with_capacity(schema.outputs.len());
    for port in &schema.outputs {
        let expr = parse_port(port, PortKind::Output, scope)?;
        let value = evaluate_with(&expr, scope, &bindings)
            .map_err(|error| eval_error(port, PortKind::Output, error))?;
        outputs.push((port.id, value));
    }

    Ok(NodeTypes { inputs, outputs })
}

fn parse_port(port: &PortSchema, kind: PortKind, scope: &Scope) -> Result<navi_ir::Expr, SchemaError> {
    parse_expression(&port.ty, scope.interner()).map_err(|error| SchemaError::Parse {
        kind,
        id: port.id,
        label: port.label.clone(),
        error,
    })
}

fn eval_error(port: &PortSchema, kind: PortKind, error: EvalError) -> SchemaError {
    SchemaError::Eval {
        kind,
        id: port.id,
        label: port.label.clone(),
        error,
    }
}

/// Validate every schema in parallel; one diagnostic per invalid schema,
/// in catalog order.
#[tracing::instrument(level = "debug", skip_all, fields(schemas = catalog.len()))]
pub fn validate_catalog(catalog: &SchemaCatalog, scope: &Scope) -> Vec<SchemaDiagnostic> {
    catalog
        .schemas
        .par_iter()
        .filter_map(|schema| {
            let error = validate_schema(schema, scope).err()?;
            tracing::debug!(schema = %schema.schema_id, %error, "invalid node schema");
            Some(SchemaDiagnostic {
                schema_id: schema.schema_id.clone(),
                name: schema.name.clone(),
                error,
            })
        })
        .collect()
}

/// Whether an output of type `output` may feed an input of type `input`.
pub fn can_connect(output: &TypeValue, input: &TypeValue) -> bool {
    !output.is_never() && output.is_subset_of(input)
}
