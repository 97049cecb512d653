use crate::predicate::{Element, Predicate};
use crate::symbol::{SymId, VarId};
use smallvec::SmallVec;

/// The alignment of query elements onto view elements.
///
/// Split into two ordered tables:
/// - the variable table, where the bound value is a view variable;
/// - the constant table, where the bound value is a constant.
///
/// Keys are query-side elements (usually variables, but a query constant
/// aligned with a view variable lands in the variable table). An element may
/// be bound more than once; lookups return the earliest binding.
/// Constant-to-constant positions are not recorded since `can_be_mapped`
/// already required them to be equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Binding {
    variables: SmallVec<[(Element, VarId); 4]>,
    constants: SmallVec<[(Element, SymId); 4]>,
}

impl Binding {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Align each query predicate positionally with its view predicate.
    ///
    /// Pairs are expected to have passed `can_be_mapped`.
    pub fn align<'a>(pairs: impl IntoIterator<Item = (&'a Predicate, &'a Predicate)>) -> Self {
        let mut binding = Binding::new();
        for (query_pred, view_pred) in pairs {
            debug_assert_eq!(query_pred.arity(), view_pred.arity());
            for (&key, &value) in query_pred.elements().iter().zip(view_pred.elements()) {
                binding.record(key, value);
            }
        }
        binding
    }

    fn record(&mut self, key: Element, value: Element) {
        match (key, value) {
            (Element::Const(_), Element::Const(_)) => {}
            (_, Element::Var(v)) => {
                if !self.variables.contains(&(key, v)) {
                    self.variables.push((key, v));
                }
            }
            (_, Element::Const(c)) => {
                if !self.constants.contains(&(key, c)) {
                    self.constants.push((key, c));
                }
            }
        }
    }

    /// Variable table: (query element, view variable) in insertion order.
    pub fn variables(&self) -> &[(Element, VarId)] {
        &self.variables
    }

    /// Constant table: (query element, constant) in insertion order.
    pub fn constants(&self) -> &[(Element, SymId)] {
        &self.constants
    }

    /// Check if an element is bound in either table.
    pub fn is_bound(&self, elem: Element) -> bool {
        self.variables.iter().any(|(k, _)| *k == elem)
            || self.constants.iter().any(|(k, _)| *k == elem)
    }

    /// First view variable bound to `elem`, if any.
    pub fn first_variable(&self, elem: Element) -> Option<VarId> {
        self.variables
            .iter()
            .find(|(k, _)| *k == elem)
            .map(|(_, v)| *v)
    }

    /// First constant bound to `elem`, if any.
    pub fn first_constant(&self, elem: Element) -> Option<SymId> {
        self.constants
            .iter()
            .find(|(k, _)| *k == elem)
            .map(|(_, c)| *c)
    }

    /// First value bound to `elem`, looking at the variable table first.
    pub fn first_value(&self, elem: Element) -> Option<Element> {
        self.first_variable(elem)
            .map(Element::Var)
            .or_else(|| self.first_constant(elem).map(Element::Const))
    }

    /// The first query element bound to view variable `var`.
    pub fn preimage(&self, var: VarId) -> Option<Element> {
        self.variables
            .iter()
            .find(|(_, v)| *v == var)
            .map(|(k, _)| *k)
    }

    /// Number of recorded pairs across both tables.
    pub fn len(&self) -> usize {
        self.variables.len() + self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.constants.is_empty()
    }

    /// True if `self` and `other` bind some common query element to two
    /// different constants.
    pub fn conflicts_with(&self, other: &Binding) -> bool {
        self.constants.iter().any(|(key, _)| {
            match (self.first_constant(*key), other.first_constant(*key)) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/binding.rs"]
mod tests;
