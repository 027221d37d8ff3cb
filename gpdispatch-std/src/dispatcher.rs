//! # Kind-pair dispatcher
//!
//! A [`Dispatcher`] maps `(A, B)` kind pairs to implementations and, given the
//! runtime kinds of two arguments, selects the most specific registered one.
//!
//! # Specificity
//!
//! For arguments of kinds `a` and `b`, every pair `(mro(a)[i], mro(b)[j])` with
//! a registration is a candidate at distance `i + j`. The candidate with the
//! smallest distance wins. On a tie the candidate met first when scanning `i`
//! ascending, then `j` ascending, wins; that is, the one that is more specific
//! in the first argument.
//!
//! This is a pairwise search over the two MROs, not a merged resolution order:
//! two candidates at the same distance that specialize different arguments are
//! both plausible. [`Resolved::is_ambiguous`] reports those cases.
//!
//! # Distance table
//!
//! Kinds are a closed set, so the winner for every `(a, b)` pair is kept in a
//! table that is updated on each registration. Resolution is a lookup and
//! never mutates the dispatcher. Registration takes `&mut self`: build the
//! dispatcher first, then share it for concurrent resolution.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut dispatcher = Dispatcher::<FeatureKind, KernelKind, fn() -> &'static str>::new("conditional")?;
//! dispatcher.register(FeatureKind::InducingFeature, KernelKind::Kernel).to(|| "generic")?;
//! dispatcher.register(FeatureKind::InducingPoints, KernelKind::Mok).to(|| "multioutput")?;
//!
//! let resolved = dispatcher.resolve(FeatureKind::InducingPoints, KernelKind::SharedIndependentMok)?;
//! assert_eq!((resolved.value())(), "multioutput");
//! ```

use gpdispatch_core::{DispatchError, Hierarchy, Kind, Kinded};
use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
    fmt,
};

/// Rank of a candidate registration for a pair of argument kinds.
///
/// Ordered by total distance, then by position in the first argument's MRO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    /// `position_a + position_b`.
    pub distance: usize,
    /// Position of the registered first kind in the argument's MRO.
    pub position_a: usize,
    /// Position of the registered second kind in the argument's MRO.
    pub position_b: usize,
}

impl Specificity {
    /// Specificity of a candidate found at the given MRO positions.
    pub const fn new(position_a: usize, position_b: usize) -> Self {
        Self {
            distance: position_a + position_b,
            position_a,
            position_b,
        }
    }

    /// Whether the candidate is an exact match for both arguments.
    pub const fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

/// Winning registration for one argument pair.
#[derive(Debug, Clone, Copy)]
struct Winner {
    entry: usize,
    specificity: Specificity,
    tied: bool,
}

struct Registered<A, B, F> {
    key: (A, B),
    value: F,
}

/// The outcome of a successful resolution.
#[derive(Debug)]
pub struct Resolved<'d, A, B, F> {
    key: (A, B),
    specificity: Specificity,
    ambiguous: bool,
    value: &'d F,
}

impl<'d, A: Kind, B: Kind, F> Resolved<'d, A, B, F> {
    /// The registered key pair that was selected.
    pub fn key(&self) -> (A, B) {
        self.key
    }

    /// How far the selected key is from the argument kinds.
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Whether another registration ties on total distance.
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// The selected implementation.
    pub fn value(&self) -> &'d F {
        self.value
    }
}

impl<A: Kind, B: Kind, F> Clone for Resolved<'_, A, B, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Kind, B: Kind, F> Copy for Resolved<'_, A, B, F> {}

/// A named registry of implementations keyed by argument kind pairs.
pub struct Dispatcher<A: Kind, B: Kind, F> {
    name: String,
    hierarchy_a: Hierarchy<A>,
    hierarchy_b: Hierarchy<B>,
    entries: Vec<Registered<A, B, F>>,
    index: HashMap<(A, B), usize>,
    table: HashMap<(A, B), Winner>,
}

impl<A: Kind, B: Kind, F> Dispatcher<A, B, F> {
    /// Create an empty dispatcher.
    ///
    /// Fails if either kind hierarchy cannot be linearized.
    pub fn new(name: impl Into<String>) -> Result<Self, DispatchError> {
        Ok(Self {
            name: name.into(),
            hierarchy_a: Hierarchy::build()?,
            hierarchy_b: Hierarchy::build()?,
            entries: Vec::new(),
            index: HashMap::new(),
            table: HashMap::new(),
        })
    }

    /// The dispatcher's name, used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a registration for the key `(a, b)`.
    ///
    /// Nothing is recorded until [`Registration::to`] is called.
    pub fn register(&mut self, a: A, b: B) -> Registration<'_, A, B, F> {
        Registration {
            dispatcher: self,
            key: (a, b),
        }
    }

    /// Record `value` under the key `(a, b)`.
    ///
    /// Returns an error if the exact key is already registered.
    pub fn insert(&mut self, a: A, b: B, value: F) -> Result<&F, DispatchError> {
        if self.index.contains_key(&(a, b)) {
            return Err(DispatchError::AlreadyRegistered {
                dispatcher: self.name.clone(),
                a: a.name(),
                b: b.name(),
            });
        }

        let entry = self.entries.len();
        self.entries.push(Registered { key: (a, b), value });
        self.index.insert((a, b), entry);
        let _affected = self.update_table(entry);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            dispatcher = %self.name,
            a = a.name(),
            b = b.name(),
            affected = _affected,
            "registered implementation"
        );

        Ok(&self.entries[entry].value)
    }

    /// Fold a new registration into the distance table.
    ///
    /// Returns the number of argument pairs it now serves.
    fn update_table(&mut self, entry: usize) -> usize {
        let (key_a, key_b) = self.entries[entry].key;
        let mut affected = 0;

        for &a in A::ALL {
            let Some(position_a) = self.hierarchy_a.position(a, key_a) else {
                continue;
            };
            for &b in B::ALL {
                let Some(position_b) = self.hierarchy_b.position(b, key_b) else {
                    continue;
                };
                let specificity = Specificity::new(position_a, position_b);

                match self.table.entry((a, b)) {
                    Entry::Vacant(slot) => {
                        slot.insert(Winner {
                            entry,
                            specificity,
                            tied: false,
                        });
                        affected += 1;
                    }
                    Entry::Occupied(mut slot) => {
                        let winner = slot.get_mut();
                        match specificity.distance.cmp(&winner.specificity.distance) {
                            Ordering::Less => {
                                *winner = Winner {
                                    entry,
                                    specificity,
                                    tied: false,
                                };
                                affected += 1;
                            }
                            Ordering::Equal => {
                                winner.tied = true;
                                if specificity < winner.specificity {
                                    winner.entry = entry;
                                    winner.specificity = specificity;
                                    affected += 1;
                                }
                            }
                            Ordering::Greater => {}
                        }
                    }
                }
            }
        }

        affected
    }

    /// Select the most specific implementation for arguments of kinds `a` and `b`.
    ///
    /// Returns [`DispatchError::Unresolved`] when no registered pair is
    /// reachable from the two kinds.
    pub fn resolve(&self, a: A, b: B) -> Result<Resolved<'_, A, B, F>, DispatchError> {
        let Some(winner) = self.table.get(&(a, b)) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                dispatcher = %self.name,
                a = a.name(),
                b = b.name(),
                "no implementation found"
            );
            return Err(DispatchError::Unresolved {
                dispatcher: self.name.clone(),
                a: a.name(),
                b: b.name(),
            });
        };

        let registered = &self.entries[winner.entry];

        #[cfg(feature = "tracing")]
        {
            tracing::trace!(
                dispatcher = %self.name,
                a = a.name(),
                b = b.name(),
                selected_a = registered.key.0.name(),
                selected_b = registered.key.1.name(),
                distance = winner.specificity.distance,
                "resolved implementation"
            );
            if winner.tied {
                tracing::debug!(
                    dispatcher = %self.name,
                    a = a.name(),
                    b = b.name(),
                    distance = winner.specificity.distance,
                    "several implementations tie on distance, keeping the one most specific in the first argument"
                );
            }
        }

        Ok(Resolved {
            key: registered.key,
            specificity: winner.specificity,
            ambiguous: winner.tied,
            value: &registered.value,
        })
    }

    /// Resolve using the runtime kinds of two values.
    pub fn resolve_for<X, Y>(&self, x: &X, y: &Y) -> Result<Resolved<'_, A, B, F>, DispatchError>
    where
        X: Kinded<Kind = A> + ?Sized,
        Y: Kinded<Kind = B> + ?Sized,
    {
        self.resolve(x.kind(), y.kind())
    }

    /// Resolve on the kinds of `x` and `y` and call the selected implementation.
    pub fn call<X, Y, R>(&self, x: &X, y: &Y) -> Result<R, DispatchError>
    where
        X: Kinded<Kind = A>,
        Y: Kinded<Kind = B>,
        F: Fn(&X, &Y) -> R,
    {
        let resolved = self.resolve_for(x, y)?;
        Ok((resolved.value())(x, y))
    }

    /// Every registration reachable from `a` and `b`, best first.
    ///
    /// This walks the full MRO cross product and does not use the distance
    /// table.
    pub fn candidates(&self, a: A, b: B) -> Vec<Resolved<'_, A, B, F>> {
        let mut found = Vec::new();
        for (position_a, ancestor_a) in self.hierarchy_a.mro(a).iter().enumerate() {
            for (position_b, ancestor_b) in self.hierarchy_b.mro(b).iter().enumerate() {
                if let Some(&entry) = self.index.get(&(*ancestor_a, *ancestor_b)) {
                    let registered = &self.entries[entry];
                    found.push(Resolved {
                        key: registered.key,
                        specificity: Specificity::new(position_a, position_b),
                        ambiguous: false,
                        value: &registered.value,
                    });
                }
            }
        }

        found.sort_by_key(|candidate| candidate.specificity);
        let distances: Vec<usize> = found.iter().map(|c| c.specificity.distance).collect();
        for candidate in &mut found {
            let distance = candidate.specificity.distance;
            candidate.ambiguous = distances.iter().filter(|d| **d == distance).count() > 1;
        }
        found
    }

    /// Whether the exact key `(a, b)` is registered.
    pub fn contains(&self, a: A, b: B) -> bool {
        self.index.contains_key(&(a, b))
    }

    /// The implementation registered under the exact key `(a, b)`.
    pub fn get(&self, a: A, b: B) -> Option<&F> {
        self.index.get(&(a, b)).map(|&entry| &self.entries[entry].value)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = (A, B)> + '_ {
        self.entries.iter().map(|registered| registered.key)
    }

    /// Registered keys and implementations, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = ((A, B), &F)> + '_ {
        self.entries
            .iter()
            .map(|registered| (registered.key, &registered.value))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The MRO table of the first argument's hierarchy.
    pub fn hierarchy_a(&self) -> &Hierarchy<A> {
        &self.hierarchy_a
    }

    /// The MRO table of the second argument's hierarchy.
    pub fn hierarchy_b(&self) -> &Hierarchy<B> {
        &self.hierarchy_b
    }
}

impl<A: Kind, B: Kind, F> fmt::Display for Dispatcher<A, B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<A: Kind, B: Kind, F> fmt::Debug for Dispatcher<A, B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A pending registration, returned by [`Dispatcher::register`].
#[must_use = "nothing is registered until `to` is called"]
pub struct Registration<'d, A: Kind, B: Kind, F> {
    dispatcher: &'d mut Dispatcher<A, B, F>,
    key: (A, B),
}

impl<'d, A: Kind, B: Kind, F> Registration<'d, A, B, F> {
    /// The key this registration will be recorded under.
    pub fn key(&self) -> (A, B) {
        self.key
    }

    /// Record `value` and return a reference to the stored implementation.
    pub fn to(self, value: F) -> Result<&'d F, DispatchError> {
        let Registration {
            dispatcher,
            key: (a, b),
        } = self;
        dispatcher.insert(a, b, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpdispatch_macros::Kind;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Kind)]
    #[kind(crate = "::gpdispatch_core")]
    enum Node {
        #[kind(root)]
        Any,
        Base,
        #[kind(extends(Base))]
        Derived,
        #[kind(extends(Derived))]
        Leaf,
        Other,
    }

    type Table = Dispatcher<Node, Node, &'static str>;

    fn dispatcher() -> Table {
        Dispatcher::new("test").unwrap()
    }

    #[test]
    fn test_exact_match() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Base, "base").unwrap();

        let resolved = d.resolve(Node::Base, Node::Base).unwrap();
        assert_eq!(*resolved.value(), "base");
        assert!(resolved.specificity().is_exact());
        assert!(!resolved.is_ambiguous());
    }

    #[test]
    fn test_more_specific_wins() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Base, "base").unwrap();
        d.insert(Node::Derived, Node::Base, "derived").unwrap();

        assert_eq!(*d.resolve(Node::Derived, Node::Base).unwrap().value(), "derived");
        assert_eq!(*d.resolve(Node::Leaf, Node::Base).unwrap().value(), "derived");
        assert_eq!(*d.resolve(Node::Base, Node::Derived).unwrap().value(), "base");
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let mut d = dispatcher();
        d.insert(Node::Derived, Node::Base, "derived").unwrap();
        d.insert(Node::Base, Node::Base, "base").unwrap();

        assert_eq!(*d.resolve(Node::Leaf, Node::Leaf).unwrap().value(), "derived");
    }

    #[test]
    fn test_tie_prefers_first_argument() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Derived, "second").unwrap();
        d.insert(Node::Derived, Node::Base, "first").unwrap();

        let resolved = d.resolve(Node::Derived, Node::Derived).unwrap();
        assert_eq!(*resolved.value(), "first");
        assert_eq!(resolved.specificity().distance, 1);
        assert!(resolved.is_ambiguous());
    }

    #[test]
    fn test_strictly_better_clears_tie() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Derived, "second").unwrap();
        d.insert(Node::Derived, Node::Base, "first").unwrap();
        d.insert(Node::Derived, Node::Derived, "exact").unwrap();

        let resolved = d.resolve(Node::Derived, Node::Derived).unwrap();
        assert_eq!(*resolved.value(), "exact");
        assert!(!resolved.is_ambiguous());
    }

    #[test]
    fn test_root_catches_everything() {
        let mut d = dispatcher();
        d.insert(Node::Any, Node::Any, "fallback").unwrap();

        let resolved = d.resolve(Node::Leaf, Node::Other).unwrap();
        assert_eq!(*resolved.value(), "fallback");
        // Leaf -> Derived -> Base -> Any, Other -> Any
        assert_eq!(resolved.specificity(), Specificity::new(3, 1));
    }

    #[test]
    fn test_unresolved_is_an_error() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Base, "base").unwrap();

        let err = d.resolve(Node::Other, Node::Base).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Unresolved {
                dispatcher: "test".to_string(),
                a: "Other",
                b: "Base",
            }
        );
    }

    #[test]
    fn test_duplicate_rejected_and_first_kept() {
        let mut d = dispatcher();
        d.register(Node::Base, Node::Other).to("one").unwrap();

        let err = d.register(Node::Base, Node::Other).to("two").unwrap_err();
        assert!(matches!(err, DispatchError::AlreadyRegistered { .. }));
        assert_eq!(d.len(), 1);
        assert_eq!(d.get(Node::Base, Node::Other), Some(&"one"));
    }

    #[test]
    fn test_table_agrees_with_scan() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Derived, "bd").unwrap();
        d.insert(Node::Derived, Node::Base, "db").unwrap();
        d.insert(Node::Any, Node::Leaf, "al").unwrap();
        d.insert(Node::Other, Node::Any, "oa").unwrap();

        for &a in Node::ALL {
            for &b in Node::ALL {
                let scanned = d.candidates(a, b).first().map(|c| (c.key(), c.specificity()));
                let looked_up = d.resolve(a, b).ok().map(|r| (r.key(), r.specificity()));
                assert_eq!(scanned, looked_up, "mismatch for ({a:?}, {b:?})");
            }
        }
    }

    #[test]
    fn test_inspection() {
        let mut d = dispatcher();
        d.insert(Node::Base, Node::Base, "a").unwrap();
        d.insert(Node::Other, Node::Base, "b").unwrap();

        assert_eq!(d.to_string(), "test");
        assert!(d.contains(Node::Other, Node::Base));
        assert!(!d.contains(Node::Base, Node::Other));
        assert_eq!(
            d.keys().collect::<Vec<_>>(),
            vec![(Node::Base, Node::Base), (Node::Other, Node::Base)]
        );
    }
}
