use crate::symbol::{SymId, SymbolStore, VarId};
use smallvec::SmallVec;

/// An argument of a predicate: a variable or a constant.
///
/// Elements of different kinds are never equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Var(VarId),
    Const(SymId),
}

impl Element {
    pub fn is_var(self) -> bool {
        matches!(self, Element::Var(_))
    }

    pub fn is_const(self) -> bool {
        matches!(self, Element::Const(_))
    }

    pub fn as_var(self) -> Option<VarId> {
        match self {
            Element::Var(v) => Some(v),
            Element::Const(_) => None,
        }
    }

    pub fn as_const(self) -> Option<SymId> {
        match self {
            Element::Var(_) => None,
            Element::Const(c) => Some(c),
        }
    }
}

/// A relational atom: a name applied to an ordered sequence of elements.
///
/// The element sequence is fixed at construction. The variable and constant
/// subsequences are derived from it on demand, so they always follow the
/// order of the full sequence.
///
/// `Predicate` intentionally has no `PartialEq`: two structurally identical
/// atoms in a query are still different subgoals. Identity is carried by
/// `SubgoalId` / view predicate positions.
#[derive(Debug, Clone)]
pub struct Predicate {
    name: SymId,
    elements: SmallVec<[Element; 4]>,
}

impl Predicate {
    pub fn new(name: SymId, elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            name,
            elements: elements.into_iter().collect(),
        }
    }

    pub fn name(&self) -> SymId {
        self.name
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The ith element. Panics if out of range.
    pub fn element(&self, i: usize) -> Element {
        self.elements[i]
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    /// Variables in argument order (repeats included).
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.elements.iter().filter_map(|e| e.as_var())
    }

    /// Constants in argument order (repeats included).
    pub fn constants(&self) -> impl Iterator<Item = SymId> + '_ {
        self.elements.iter().filter_map(|e| e.as_const())
    }

    pub fn contains(&self, elem: Element) -> bool {
        self.elements.contains(&elem)
    }

    pub fn mentions(&self, var: VarId) -> bool {
        self.contains(Element::Var(var))
    }

    /// Cheap structural pre-filter for mapping `self` (a query subgoal) onto
    /// `target` (a view predicate).
    ///
    /// Requires equal names, equal arity, and equal constants wherever both
    /// sides hold a constant. Positions with a variable on either side are
    /// left for binding construction to resolve.
    pub fn can_be_mapped(&self, target: &Predicate) -> bool {
        self.name == target.name
            && self.arity() == target.arity()
            && self
                .elements
                .iter()
                .zip(target.elements.iter())
                .all(|pair| match pair {
                    (Element::Const(a), Element::Const(b)) => a == b,
                    _ => true,
                })
    }
}

/// Render one element. Variables print their name, constants their text.
pub fn format_element(elem: Element, symbols: &SymbolStore) -> Result<String, String> {
    match elem {
        Element::Var(v) => symbols
            .var_name(v)
            .map(str::to_string)
            .ok_or_else(|| format!("Unknown variable id {:?}", v)),
        Element::Const(c) => symbols
            .resolve(c)
            .map(str::to_string)
            .ok_or_else(|| format!("Unknown constant id {:?}", c)),
    }
}

/// Render a comma separated argument list (without parentheses).
pub(crate) fn format_elements(
    elements: &[Element],
    symbols: &SymbolStore,
) -> Result<String, String> {
    let mut out = String::new();
    for (i, elem) in elements.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_element(*elem, symbols)?);
    }
    Ok(out)
}

pub fn format_predicate(pred: &Predicate, symbols: &SymbolStore) -> Result<String, String> {
    let name = symbols
        .resolve(pred.name)
        .ok_or_else(|| format!("Unknown symbol for predicate id {:?}", pred.name))?;
    Ok(format!("{}({})", name, format_elements(&pred.elements, symbols)?))
}

#[cfg(test)]
#[path = "tests/predicate.rs"]
mod tests;
