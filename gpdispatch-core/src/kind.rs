//! # Kind hierarchies
//!
//! A [`Kind`] is one variant of a closed set of argument kinds, usually a unit
//! enum. Each kind lists its direct bases; a kind without bases derives from
//! the hierarchy's single [`Kind::ROOT`]. The ancestor chain of a kind, most
//! specific first, is its method resolution order (MRO), computed here with C3
//! linearization.
//!
//! Values that take part in dispatch implement [`Kinded`] to report their
//! runtime kind.

use crate::error::HierarchyError;
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// One member of a closed kind hierarchy.
///
/// Usually derived with `#[derive(Kind)]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a dispatch kind",
    label = "missing `Kind` implementation",
    note = "Derive `Kind` on a unit enum and mark its root variant with `#[kind(root)]`."
)]
pub trait Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The most general kind. Every MRO ends here.
    const ROOT: Self;

    /// Every kind in the hierarchy.
    const ALL: &'static [Self];

    /// Direct bases, in declaration order.
    ///
    /// An empty slice means the kind derives from [`Kind::ROOT`] only.
    fn bases(self) -> &'static [Self];

    /// Display name, used in errors and logs.
    fn name(self) -> &'static str;

    /// Compute the method resolution order of this kind.
    fn mro(self) -> Result<Vec<Self>, HierarchyError> {
        linearize(self)
    }
}

/// A value that knows its kind at runtime.
pub trait Kinded {
    /// The hierarchy this value belongs to.
    type Kind: Kind;

    /// The most specific kind of this value.
    fn kind(&self) -> Self::Kind;
}

impl<T: Kinded + ?Sized> Kinded for &T {
    type Kind = T::Kind;

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}

/// Bases with the implicit root filled in.
fn direct_bases<K: Kind>(kind: K) -> Vec<K> {
    let bases = kind.bases();
    if bases.is_empty() && kind != K::ROOT {
        vec![K::ROOT]
    } else {
        bases.to_vec()
    }
}

/// C3 linearization of `kind`.
///
/// The result starts with `kind` itself. For a well-formed hierarchy it ends
/// with [`Kind::ROOT`].
pub fn linearize<K: Kind>(kind: K) -> Result<Vec<K>, HierarchyError> {
    let mut visiting = Vec::new();
    linearize_inner(kind, &mut visiting)
}

fn linearize_inner<K: Kind>(kind: K, visiting: &mut Vec<K>) -> Result<Vec<K>, HierarchyError> {
    if visiting.contains(&kind) {
        return Err(HierarchyError::Cycle { kind: kind.name() });
    }
    visiting.push(kind);

    let bases = direct_bases(kind);
    let mut sequences = Vec::with_capacity(bases.len() + 1);
    for base in &bases {
        sequences.push(linearize_inner(*base, visiting)?);
    }
    sequences.push(bases);
    visiting.pop();

    let mut mro = vec![kind];
    merge(kind, &sequences, &mut mro)?;
    Ok(mro)
}

fn merge<K: Kind>(kind: K, sequences: &[Vec<K>], out: &mut Vec<K>) -> Result<(), HierarchyError> {
    let mut heads = vec![0usize; sequences.len()];
    loop {
        let mut pending = sequences
            .iter()
            .zip(&heads)
            .filter_map(|(seq, &head)| seq.get(head).copied())
            .peekable();
        if pending.peek().is_none() {
            return Ok(());
        }

        // A good head appears in no tail.
        let next = pending.find(|candidate| {
            !sequences.iter().zip(&heads).any(|(seq, &head)| {
                seq.get(head + 1..)
                    .is_some_and(|tail| tail.contains(candidate))
            })
        });
        let Some(next) = next else {
            return Err(HierarchyError::Inconsistent { kind: kind.name() });
        };

        out.push(next);
        for (seq, head) in sequences.iter().zip(heads.iter_mut()) {
            if seq.get(*head) == Some(&next) {
                *head += 1;
            }
        }
    }
}

/// Precomputed method resolution orders for every kind of a hierarchy.
#[derive(Debug, Clone)]
pub struct Hierarchy<K: Kind> {
    mros: HashMap<K, Vec<K>>,
}

impl<K: Kind> Hierarchy<K> {
    /// Linearize every kind in [`Kind::ALL`].
    pub fn build() -> Result<Self, HierarchyError> {
        let mut mros = HashMap::with_capacity(K::ALL.len());
        for &kind in K::ALL {
            mros.insert(kind, linearize(kind)?);
        }
        Ok(Self { mros })
    }

    /// The MRO of `kind`, most specific first.
    ///
    /// Kinds missing from [`Kind::ALL`] have an empty MRO.
    pub fn mro(&self, kind: K) -> &[K] {
        self.mros.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Position of `ancestor` in the MRO of `kind`.
    pub fn position(&self, kind: K, ancestor: K) -> Option<usize> {
        self.mro(kind).iter().position(|k| *k == ancestor)
    }

    /// Whether `kind` is `ancestor` or derives from it.
    pub fn is_subkind(&self, kind: K, ancestor: K) -> bool {
        self.position(kind, ancestor).is_some()
    }

    /// Number of kinds in the hierarchy.
    pub fn len(&self) -> usize {
        self.mros.len()
    }

    /// Whether the hierarchy has no kinds.
    pub fn is_empty(&self) -> bool {
        self.mros.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // object <- A, B; C(A, B); D(B, A)
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Shape {
        Object,
        A,
        B,
        C,
        D,
        Bad,
    }

    impl Kind for Shape {
        const ROOT: Self = Shape::Object;
        const ALL: &'static [Self] = &[Shape::Object, Shape::A, Shape::B, Shape::C, Shape::D];

        fn bases(self) -> &'static [Self] {
            match self {
                Shape::Object | Shape::A | Shape::B => &[],
                Shape::C => &[Shape::A, Shape::B],
                Shape::D => &[Shape::B, Shape::A],
                Shape::Bad => &[Shape::C, Shape::D],
            }
        }

        fn name(self) -> &'static str {
            match self {
                Shape::Object => "Object",
                Shape::A => "A",
                Shape::B => "B",
                Shape::C => "C",
                Shape::D => "D",
                Shape::Bad => "Bad",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Loop {
        Root,
        X,
        Y,
    }

    impl Kind for Loop {
        const ROOT: Self = Loop::Root;
        const ALL: &'static [Self] = &[Loop::Root, Loop::X, Loop::Y];

        fn bases(self) -> &'static [Self] {
            match self {
                Loop::Root => &[],
                Loop::X => &[Loop::Y],
                Loop::Y => &[Loop::X],
            }
        }

        fn name(self) -> &'static str {
            match self {
                Loop::Root => "Root",
                Loop::X => "X",
                Loop::Y => "Y",
            }
        }
    }

    #[test]
    fn test_root_mro_is_itself() {
        assert_eq!(Shape::Object.mro().unwrap(), vec![Shape::Object]);
    }

    #[test]
    fn test_implicit_root_base() {
        assert_eq!(Shape::A.mro().unwrap(), vec![Shape::A, Shape::Object]);
    }

    #[test]
    fn test_c3_keeps_base_order() {
        assert_eq!(
            Shape::C.mro().unwrap(),
            vec![Shape::C, Shape::A, Shape::B, Shape::Object]
        );
        assert_eq!(
            Shape::D.mro().unwrap(),
            vec![Shape::D, Shape::B, Shape::A, Shape::Object]
        );
    }

    #[test]
    fn test_inconsistent_bases_rejected() {
        assert_eq!(
            Shape::Bad.mro(),
            Err(HierarchyError::Inconsistent { kind: "Bad" })
        );
    }

    #[test]
    fn test_cycle_rejected() {
        assert!(matches!(Loop::X.mro(), Err(HierarchyError::Cycle { .. })));
        assert!(Hierarchy::<Loop>::build().is_err());
    }

    #[test]
    fn test_hierarchy_positions() {
        let hierarchy = Hierarchy::<Shape>::build().unwrap();
        assert_eq!(hierarchy.len(), 5);
        assert_eq!(hierarchy.position(Shape::C, Shape::B), Some(2));
        assert!(hierarchy.is_subkind(Shape::C, Shape::Object));
        assert!(!hierarchy.is_subkind(Shape::A, Shape::B));
        // `Bad` is not listed in ALL.
        assert!(hierarchy.mro(Shape::Bad).is_empty());
    }
}
