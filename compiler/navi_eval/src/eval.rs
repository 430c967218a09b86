//! The expression evaluator.
//!
//! Evaluation is a pure function of the expression, the scope and the
//! transient bindings. The only state is the bookkeeping in [`Evaluator`]:
//! the current depth, the definitions being resolved, and the values of
//! definitions already resolved by this evaluator.
//!
//! A definition is identified by its name together with the scope that
//! declares it, so a child scope may shadow a name its parent's own
//! definitions still depend on.

use navi_ir::{Expr, FieldInit, Literal, MatchArm, Name, ParamDecl};
use navi_types::{intersect, union_all, NumberSet, ScopeId, StringSet, TypeValue};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::scope::Definition;
use crate::stack::ensure_sufficient_stack;
use crate::{Bindings, EvalError, EvalResult, Scope};

/// Evaluator limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of nested definition resolutions and calls.
    pub max_depth: usize,
}

impl EvalConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        EvalConfig { max_depth }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Evaluate `expr` against `scope` with the default limits.
pub fn evaluate(expr: &Expr, scope: &Scope) -> EvalResult<TypeValue> {
    Evaluator::new(scope).evaluate(expr)
}

/// Evaluate `expr` with `bindings` shadowing the scope.
pub fn evaluate_with(expr: &Expr, scope: &Scope, bindings: &Bindings<'_>) -> EvalResult<TypeValue> {
    Evaluator::new(scope).evaluate_with(expr, bindings)
}

/// Per-call evaluation state.
pub struct Evaluator<'s> {
    scope: &'s Scope,
    config: EvalConfig,
    depth: usize,
    /// Definitions currently being resolved, innermost last.
    resolving: Vec<DefinitionKey>,
    /// Values of named definitions resolved so far.
    resolved: FxHashMap<DefinitionKey, TypeValue>,
}

/// A definition: the declaring scope and the name.
type DefinitionKey = (ScopeId, Name);

impl<'s> Evaluator<'s> {
    pub fn new(scope: &'s Scope) -> Self {
        Self::with_config(scope, EvalConfig::default())
    }

    pub fn with_config(scope: &'s Scope, config: EvalConfig) -> Self {
        Evaluator {
            scope,
            config,
            depth: 0,
            resolving: Vec::new(),
            resolved: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<TypeValue> {
        self.evaluate_with(expr, &Bindings::new())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate_with(&mut self, expr: &Expr, bindings: &Bindings<'_>) -> EvalResult<TypeValue> {
        let scope = self.scope;
        self.eval(expr, scope, bindings)
    }

    fn eval(&mut self, expr: &Expr, scope: &Scope, bindings: &Bindings<'_>) -> EvalResult<TypeValue> {
        ensure_sufficient_stack(|| self.eval_inner(expr, scope, bindings))
    }

    fn eval_inner(
        &mut self,
        expr: &Expr,
        scope: &Scope,
        bindings: &Bindings<'_>,
    ) -> EvalResult<TypeValue> {
        match expr {
            Expr::Literal(literal) => Ok(eval_literal(literal)),
            Expr::Named(name) => self.eval_named(*name, scope, bindings),
            Expr::Call { callee, args } => self.eval_call(*callee, args, scope, bindings),
            Expr::Field { base, field } => {
                let base = self.eval(base, scope, bindings)?;
                project_field(&base, *field, scope)
            }
            Expr::StructInstance { name, fields } => {
                self.eval_struct_instance(*name, fields, scope, bindings)
            }
            Expr::Union(items) => {
                let values = self.eval_all(items, scope, bindings)?;
                Ok(union_all(values))
            }
            Expr::Intersection(items) => {
                let mut result = TypeValue::Any;
                for item in items {
                    let value = self.eval(item, scope, bindings)?;
                    result = intersect(&result, &value);
                }
                Ok(result)
            }
            Expr::Match { scrutinee, arms } => self.eval_match(scrutinee, arms, scope, bindings),
        }
    }

    fn eval_all(
        &mut self,
        exprs: &[Expr],
        scope: &Scope,
        bindings: &Bindings<'_>,
    ) -> EvalResult<SmallVec<[TypeValue; 4]>> {
        exprs
            .iter()
            .map(|expr| self.eval(expr, scope, bindings))
            .collect()
    }

    fn eval_named(&mut self, name: Name, scope: &Scope, bindings: &Bindings<'_>) -> EvalResult<TypeValue> {
        if let Some(value) = bindings.get(name) {
            return Ok(value.clone());
        }
        let (owner, definition) = scope.resolve(name).ok_or_else(|| undefined(scope, name))?;
        if let Definition::Parameter { .. } = definition {
            return Err(EvalError::UnboundParameter {
                name: scope.interner().lookup(name).to_owned(),
            });
        }

        let key = (owner.id(), name);
        if let Some(value) = self.resolved.get(&key) {
            return Ok(value.clone());
        }
        let value = self.resolving_definition(name, owner, |this| match definition {
            Definition::Variable { value, .. } => this.eval(value, owner, &Bindings::new()),
            Definition::Struct { fields, .. } => {
                let fields = this.eval_params(fields, owner)?;
                Ok(TypeValue::structure(name, fields))
            }
            Definition::BuiltinFunction { params, .. } | Definition::Function { params, .. } => {
                let params = this.eval_params(params, owner)?;
                Ok(TypeValue::function(name, owner.id(), params))
            }
            Definition::Parameter { .. } => Err(EvalError::UnboundParameter {
                name: owner.interner().lookup(name).to_owned(),
            }),
        })?;
        self.resolved.insert(key, value.clone());
        Ok(value)
    }

    /// Run `f` one level deeper with `name`, as declared in `owner`, marked
    /// as being resolved.
    fn resolving_definition<T>(
        &mut self,
        name: Name,
        owner: &Scope,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let key = (owner.id(), name);
        if self.resolving.contains(&key) {
            return Err(EvalError::CyclicReference {
                name: owner.interner().lookup(name).to_owned(),
            });
        }
        self.resolving.push(key);
        let result = self.deeper(f);
        self.resolving.pop();
        result
    }

    /// The scope that declared a function value: the evaluated scope or one
    /// of its ancestors, since evaluation only ever moves outwards.
    fn declaring_scope(&self, id: ScopeId) -> Option<&'s Scope> {
        self.scope.ancestors().find(|scope| scope.id() == id)
    }

    fn deeper<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(EvalError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Evaluate declared parameter or field types in their defining scope.
    fn eval_params(&mut self, params: &[ParamDecl], owner: &Scope) -> EvalResult<Vec<(Name, TypeValue)>> {
        params
            .iter()
            .map(|param| Ok((param.name, self.eval(&param.ty, owner, &Bindings::new())?)))
            .collect()
    }

    fn eval_call(
        &mut self,
        callee: Name,
        args: &[Expr],
        scope: &Scope,
        bindings: &Bindings<'_>,
    ) -> EvalResult<TypeValue> {
        let (target, owner, definition) = match bindings.get(callee) {
            // A bound function value calls the definition it was made from.
            Some(TypeValue::Function(function)) => {
                let target = function.name();
                let (owner, definition) = self
                    .declaring_scope(function.scope())
                    .and_then(|owner| Some((owner, owner.own(target)?)))
                    .ok_or_else(|| undefined(scope, target))?;
                (target, owner, definition)
            }
            Some(_) => {
                return Err(EvalError::NotCallable {
                    name: scope.interner().lookup(callee).to_owned(),
                })
            }
            None => {
                let (owner, definition) =
                    scope.resolve(callee).ok_or_else(|| undefined(scope, callee))?;
                (callee, owner, definition)
            }
        };
        let Some(params) = definition.params() else {
            return Err(EvalError::NotCallable {
                name: scope.interner().lookup(callee).to_owned(),
            });
        };

        if args.len() != params.len() {
            return Err(EvalError::ArityMismatch {
                function: scope.interner().lookup(target).to_owned(),
                expected: params.len(),
                found: args.len(),
            });
        }

        let args = self.eval_all(args, scope, bindings)?;
        let declared = self.eval_params(params, owner)?;

        let mut narrowed: SmallVec<[TypeValue; 4]> = SmallVec::with_capacity(args.len());
        let mut any_never = false;
        for (arg, (param, expected)) in args.iter().zip(&declared) {
            let value = intersect(arg, expected);
            if value.is_never() {
                if !arg.is_never() {
                    let interner = owner.interner();
                    return Err(EvalError::TypeMismatch {
                        context: format!(
                            "argument `{}` of `{}`",
                            interner.lookup(*param),
                            interner.lookup(target)
                        ),
                        expected: expected.display(interner).to_string(),
                        found: arg.display(interner).to_string(),
                    });
                }
                any_never = true;
            }
            narrowed.push(value);
        }
        if any_never {
            return Ok(TypeValue::Never);
        }

        trace!(function = owner.interner().lookup(target), "call");
        match definition {
            Definition::BuiltinFunction { rule, .. } => self.deeper(|_| Ok(rule.apply(&narrowed))),
            Definition::Function { body, .. } => {
                let mut frame = Bindings::new();
                for ((param, _), value) in declared.into_iter().zip(narrowed) {
                    frame.bind(param, value);
                }
                self.deeper(|this| this.eval(body, owner, &frame))
            }
            Definition::Parameter { .. } | Definition::Variable { .. } | Definition::Struct { .. } => {
                Err(EvalError::NotCallable {
                    name: scope.interner().lookup(callee).to_owned(),
                })
            }
        }
    }

    fn eval_struct_instance(
        &mut self,
        name: Name,
        inits: &[FieldInit],
        scope: &Scope,
        bindings: &Bindings<'_>,
    ) -> EvalResult<TypeValue> {
        let (owner, definition) = scope.resolve(name).ok_or_else(|| undefined(scope, name))?;
        let Definition::Struct { fields, .. } = definition else {
            return Err(EvalError::NotAStruct {
                ty: scope.interner().lookup(name).to_owned(),
            });
        };
        let mut values =
            self.resolving_definition(name, owner, |this| this.eval_params(fields, owner))?;

        let interner = scope.interner();
        for init in inits {
            let Some(slot) = values.iter_mut().find(|(field, _)| *field == init.name) else {
                return Err(EvalError::UnknownField {
                    ty: interner.lookup(name).to_owned(),
                    field: interner.lookup(init.name).to_owned(),
                });
            };
            let value = self.eval(&init.value, scope, bindings)?;
            let narrowed = intersect(&slot.1, &value);
            if narrowed.is_never() && !value.is_never() {
                return Err(EvalError::TypeMismatch {
                    context: format!(
                        "field `{}` of `{}`",
                        interner.lookup(init.name),
                        interner.lookup(name)
                    ),
                    expected: slot.1.display(interner).to_string(),
                    found: value.display(interner).to_string(),
                });
            }
            slot.1 = narrowed;
        }
        Ok(TypeValue::structure(name, values))
    }

    fn eval_match(
        &mut self,
        scrutinee: &Expr,
        arms: &[MatchArm],
        scope: &Scope,
        bindings: &Bindings<'_>,
    ) -> EvalResult<TypeValue> {
        let scrutinee = self.eval(scrutinee, scope, bindings)?;
        let mut results: SmallVec<[TypeValue; 4]> = SmallVec::new();

        for arm in arms {
            let pattern = self.eval(&arm.pattern, scope, bindings)?;
            let overlap = intersect(&scrutinee, &pattern);
            if overlap.is_never() {
                continue;
            }
            let covers = overlap == scrutinee;
            let body = match arm.binding {
                Some(binding) => {
                    let frame = bindings.child().with(binding, overlap);
                    self.eval(&arm.body, scope, &frame)?
                }
                None => self.eval(&arm.body, scope, bindings)?,
            };
            results.push(body);
            if covers {
                break;
            }
        }
        Ok(union_all(results))
    }
}

fn eval_literal(literal: &Literal) -> TypeValue {
    match literal {
        Literal::Any => TypeValue::Any,
        Literal::Never => TypeValue::Never,
        Literal::Number => TypeValue::any_number(),
        Literal::Int => TypeValue::int(),
        Literal::String => TypeValue::any_string(),
        Literal::Num(value) => TypeValue::number_literal(*value),
        Literal::Str(value) => TypeValue::String(StringSet::literal(value)),
        Literal::Interval { min, max } => TypeValue::number(NumberSet::interval(*min, *max)),
        Literal::IntInterval { min, max } => {
            TypeValue::number(NumberSet::int_interval(*min, *max))
        }
    }
}

/// `base.field`, projected member-wise over unions.
fn project_field(base: &TypeValue, field: Name, scope: &Scope) -> EvalResult<TypeValue> {
    match base {
        TypeValue::Any => Ok(TypeValue::Any),
        TypeValue::Never => Ok(TypeValue::Never),
        TypeValue::Struct(value) => value.field(field).cloned().ok_or_else(|| {
            let interner = scope.interner();
            EvalError::UnknownField {
                ty: interner.lookup(value.name()).to_owned(),
                field: interner.lookup(field).to_owned(),
            }
        }),
        TypeValue::Union(items) => {
            let projected = items
                .iter()
                .map(|item| project_field(item, field, scope))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(union_all(projected))
        }
        TypeValue::Number(_) | TypeValue::String(_) | TypeValue::Function(_) => {
            Err(EvalError::NotAStruct {
                ty: base.display(scope.interner()).to_string(),
            })
        }
    }
}

fn undefined(scope: &Scope, name: Name) -> EvalError {
    EvalError::UndefinedName {
        name: scope.interner().lookup(name).to_owned(),
    }
}

#[cfg(test)]
mod tests;
