//! Queries and views.
//!
//! A query and a view share one representation: a name, a head (the answer
//! projection), an ordered list of subgoals and a preference rank. Only views
//! use the rank.

use crate::predicate::{format_elements, format_predicate, Element, Predicate};
use crate::symbol::{SymId, SymbolStore, VarId};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Position of a subgoal within its query. This is the subgoal's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubgoalId(u32);

impl SubgoalId {
    pub fn new(index: usize) -> Self {
        SubgoalId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position of a view within the view list supplied to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u32);

impl ViewId {
    pub fn new(index: usize) -> Self {
        ViewId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Preference rank of a view. Higher is preferred.
///
/// Ordered numerically with `f64::total_cmp`, so `10.0 > 9.5` regardless of
/// how the numbers were written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rank(f64);

impl Rank {
    pub fn new(value: f64) -> Self {
        Rank(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Rank {
    fn from(value: f64) -> Self {
        Rank(value)
    }
}

/// A named conjunctive query. Used both for the query being answered and for
/// the views.
#[derive(Debug, Clone)]
pub struct Record {
    name: SymId,
    head: SmallVec<[Element; 4]>,
    subgoals: Vec<Predicate>,
    rank: Rank,
}

pub type Query = Record;
pub type View = Record;

impl Record {
    pub fn new(
        name: SymId,
        head: impl IntoIterator<Item = Element>,
        subgoals: Vec<Predicate>,
    ) -> Self {
        Self {
            name,
            head: head.into_iter().collect(),
            subgoals,
            rank: Rank::default(),
        }
    }

    pub fn with_rank(mut self, rank: impl Into<Rank>) -> Self {
        self.rank = rank.into();
        self
    }

    pub fn set_rank(&mut self, rank: impl Into<Rank>) {
        self.rank = rank.into();
    }

    pub fn name(&self) -> SymId {
        self.name
    }

    pub fn head(&self) -> &[Element] {
        &self.head
    }

    pub fn subgoals(&self) -> &[Predicate] {
        &self.subgoals
    }

    /// The subgoal with the given id. Panics if the id belongs to another query.
    pub fn subgoal(&self, id: SubgoalId) -> &Predicate {
        &self.subgoals[id.index()]
    }

    pub fn subgoal_ids(&self) -> impl Iterator<Item = SubgoalId> {
        (0..self.subgoals.len()).map(SubgoalId::new)
    }

    pub fn number_of_subgoals(&self) -> usize {
        self.subgoals.len()
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Whether the variable is part of the head. For a query this is the
    /// distinguished-variable test; for a view it says the view exports it.
    pub fn exports(&self, var: VarId) -> bool {
        self.head.contains(&Element::Var(var))
    }

    /// Subgoals that mention `var`, in query order.
    pub fn subgoals_mentioning(&self, var: VarId) -> impl Iterator<Item = SubgoalId> + '_ {
        self.subgoals
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.mentions(var))
            .map(|(i, _)| SubgoalId::new(i))
    }

    /// Whether some subgoal uses this predicate name.
    pub fn has_predicate_named(&self, name: SymId) -> bool {
        self.subgoals.iter().any(|p| p.name() == name)
    }
}

/// Assembles a record, turning variable names into `VarId`s scoped to the
/// record being built.
pub struct RecordBuilder<'s> {
    symbols: &'s SymbolStore,
    name: SymId,
    vars: HashMap<String, VarId>,
    head: SmallVec<[Element; 4]>,
    subgoals: Vec<Predicate>,
    rank: Rank,
}

impl<'s> RecordBuilder<'s> {
    pub fn new(symbols: &'s SymbolStore, name: &str) -> Self {
        Self {
            symbols,
            name: symbols.intern(name),
            vars: HashMap::new(),
            head: SmallVec::new(),
            subgoals: Vec::new(),
            rank: Rank::default(),
        }
    }

    /// The element for variable `name`, allocating it on first use.
    pub fn var(&mut self, name: &str) -> Element {
        if let Some(&id) = self.vars.get(name) {
            return Element::Var(id);
        }
        let id = self.symbols.fresh_var(name);
        self.vars.insert(name.to_string(), id);
        Element::Var(id)
    }

    pub fn constant(&self, value: &str) -> Element {
        Element::Const(self.symbols.intern(value))
    }

    pub fn push_head(&mut self, elem: Element) -> &mut Self {
        self.head.push(elem);
        self
    }

    pub fn push_subgoal(&mut self, name: &str, elements: Vec<Element>) -> &mut Self {
        let name = self.symbols.intern(name);
        self.subgoals.push(Predicate::new(name, elements));
        self
    }

    pub fn rank(&mut self, rank: impl Into<Rank>) -> &mut Self {
        self.rank = rank.into();
        self
    }

    pub fn build(self) -> Record {
        Record {
            name: self.name,
            head: self.head,
            subgoals: self.subgoals,
            rank: self.rank,
        }
    }
}

/// Render a record as `Name(head) :- p(..), q(..)`.
pub fn format_record(record: &Record, symbols: &SymbolStore) -> Result<String, String> {
    let name = symbols
        .resolve(record.name)
        .ok_or_else(|| format!("Unknown symbol for record id {:?}", record.name))?;
    let mut out = format!("{}({}) :- ", name, format_elements(&record.head, symbols)?);
    for (i, subgoal) in record.subgoals.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_predicate(subgoal, symbols)?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "tests/record.rs"]
mod tests;
