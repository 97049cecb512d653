use lasso::{Spur, ThreadedRodeo};
use parking_lot::RwLock;

/// Interned name: a predicate name, a record name, a variable name or the
/// text of a constant. Equal strings always produce equal ids.
pub type SymId = Spur;

/// Identity of a variable.
///
/// Every occurrence of a variable within one record shares the same id, and
/// ids handed out by one store never repeat, so two records that both use a
/// variable called `x` still get distinct variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

/// Thread-safe symbol store.
///
/// Guarantees:
/// - Same string always produces same SymId
/// - Different strings always produce different SymIds
/// - Each call to `fresh_var` produces a new VarId that remembers its name
pub struct SymbolStore {
    rodeo: ThreadedRodeo,
    /// Display name of each variable, indexed by VarId.
    var_names: RwLock<Vec<SymId>>,
}

impl SymbolStore {
    /// Create a new empty symbol store.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
            var_names: RwLock::new(Vec::new()),
        }
    }

    /// Intern a symbol string, returning its unique SymId.
    pub fn intern(&self, name: &str) -> SymId {
        self.rodeo.get_or_intern(name)
    }

    /// Resolve a SymId back to its string representation.
    /// Returns None if the SymId was not created by this store.
    pub fn resolve(&self, id: SymId) -> Option<&str> {
        self.rodeo.try_resolve(&id)
    }

    /// Check if a symbol string has already been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.rodeo.contains(name)
    }

    /// Get the SymId for a symbol if it exists, without interning.
    pub fn get(&self, name: &str) -> Option<SymId> {
        self.rodeo.get(name)
    }

    /// Allocate a new variable displayed as `name`.
    pub fn fresh_var(&self, name: &str) -> VarId {
        let sym = self.intern(name);
        let mut names = self.var_names.write();
        let id = VarId(names.len() as u32);
        names.push(sym);
        id
    }

    /// Display name of a variable allocated by this store.
    pub fn var_name(&self, var: VarId) -> Option<&str> {
        let sym = {
            let names = self.var_names.read();
            *names.get(var.0 as usize)?
        };
        self.resolve(sym)
    }

    /// Number of variables allocated so far.
    pub fn var_count(&self) -> usize {
        self.var_names.read().len()
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/symbol.rs"]
mod tests;
