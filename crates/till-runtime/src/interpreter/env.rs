//! Scope arena
//!
//! Scopes live in one `Vec` and refer to their parent by index. A scope is
//! pushed when a call or block starts and released, together with every scope
//! pushed after it, when that call or block exits. Function values keep the
//! `ScopeId` of the scope they were declared in; the checker guarantees that
//! a function is only called while that scope is still live.

use crate::types::Type;
use crate::value::Value;
use std::collections::HashMap;

/// Handle to a scope in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A named slot
#[derive(Debug, Clone)]
pub struct Binding {
    /// Declared type; `None` for functions
    pub ty: Option<Type>,
    pub value: Value,
}

#[derive(Debug)]
struct Scope {
    vars: HashMap<String, Binding>,
    parent: Option<ScopeId>,
}

/// Arena of lexical scopes
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment holding only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                vars: HashMap::new(),
                parent: None,
            }],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocate a scope whose lookups fall back to `parent`
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            vars: HashMap::new(),
            parent: Some(parent),
        });
        tracing::trace!(scope = id.0, parent = parent.0, "push scope");
        id
    }

    /// Release `id` and every scope allocated after it
    ///
    /// The global scope is never released.
    pub fn release(&mut self, id: ScopeId) {
        let keep = id.0.max(1);
        self.scopes.truncate(keep);
        tracing::trace!(scope = id.0, live = self.scopes.len(), "release scope");
    }

    /// Number of live scopes, including the global one
    pub fn live_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a name in `scope`; returns false if it is already bound there
    pub fn declare(&mut self, scope: ScopeId, name: &str, binding: Binding) -> bool {
        match self.scopes.get_mut(scope.0) {
            Some(s) if !s.vars.contains_key(name) => {
                s.vars.insert(name.to_string(), binding);
                true
            }
            _ => false,
        }
    }

    /// Find the nearest binding of `name`, walking parent links from `scope`
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let owner = self.resolve(scope, name)?;
        self.scopes[owner.0].vars.get(name)
    }

    /// Mutable access to the nearest binding of `name`
    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Binding> {
        let owner = self.resolve(scope, name)?;
        self.scopes[owner.0].vars.get_mut(name)
    }

    /// Scope that holds the nearest binding of `name`
    fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id.0)?;
            if s.vars.contains_key(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }
}
