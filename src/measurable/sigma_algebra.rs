// Copyright 2025 Cowboy AI, LLC.

//! Sigma-algebras over finite sample spaces
//!
//! Over a finite sample space every sigma-algebra is generated by a unique
//! partition of the space into atoms: a set is measurable exactly when it is
//! a union of atoms. The algebra is stored as that partition, which makes
//! the closure properties (empty set, whole space, complement, union) hold
//! by construction and turns every measurability question into a lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

use super::event::Event;
use super::topology::Topology;
use crate::errors::{MeasureError, MeasureResult};

/// Atom count above which measurable sets are not enumerated.
pub const MAX_ENUMERABLE_ATOMS: usize = 24;

/// How an algebra was obtained. Descriptive only; equality ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgebraKind {
    /// Every subset is measurable
    Discrete,
    /// Only the empty set and the whole space are measurable
    Trivial,
    /// Smallest algebra containing a family of sets
    Generated,
    /// Generated by the open sets of a topology
    Borel,
    /// Preimage algebra of a function
    Comap,
    /// Smallest algebra containing two algebras
    Join,
}

impl fmt::Display for AlgebraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgebraKind::Discrete => "discrete",
            AlgebraKind::Trivial => "trivial",
            AlgebraKind::Generated => "generated",
            AlgebraKind::Borel => "borel",
            AlgebraKind::Comap => "comap",
            AlgebraKind::Join => "join",
        };
        f.write_str(name)
    }
}

/// A sigma-algebra over a finite sample space, stored as its atoms.
#[derive(Debug, Clone)]
pub struct SigmaAlgebra<T> {
    space: Event<T>,
    atoms: Vec<Event<T>>,
    index: BTreeMap<T, usize>,
    kind: AlgebraKind,
}

impl<T: Ord + Clone> SigmaAlgebra<T> {
    fn from_partition(space: Event<T>, mut atoms: Vec<Event<T>>, kind: AlgebraKind) -> Self {
        atoms.retain(|atom| !atom.is_empty());
        atoms.sort();
        let mut index = BTreeMap::new();
        for (i, atom) in atoms.iter().enumerate() {
            for outcome in atom.iter() {
                index.insert(outcome.clone(), i);
            }
        }
        Self {
            space,
            atoms,
            index,
            kind,
        }
    }

    fn refine(atoms: Vec<Event<T>>, generator: &Event<T>) -> Vec<Event<T>> {
        let mut refined = Vec::with_capacity(atoms.len() * 2);
        for atom in atoms {
            let inside = atom.intersection(generator);
            let outside = atom.difference(generator);
            if !inside.is_empty() {
                refined.push(inside);
            }
            if !outside.is_empty() {
                refined.push(outside);
            }
        }
        refined
    }

    /// Every subset of `space` is measurable.
    pub fn discrete(space: Event<T>) -> Self {
        let atoms = space.iter().cloned().map(Event::singleton).collect();
        Self::from_partition(space, atoms, AlgebraKind::Discrete)
    }

    /// Only the empty set and `space` are measurable.
    pub fn trivial(space: Event<T>) -> Self {
        let atoms = vec![space.clone()];
        Self::from_partition(space, atoms, AlgebraKind::Trivial)
    }

    /// Smallest algebra on `space` containing every set of `family`.
    ///
    /// Generators must be subsets of `space`.
    pub fn generated_by(
        space: Event<T>,
        family: impl IntoIterator<Item = Event<T>>,
    ) -> MeasureResult<Self>
    where
        T: fmt::Debug,
    {
        let mut atoms = vec![space.clone()];
        for generator in family {
            if !generator.is_subset(&space) {
                return Err(MeasureError::not_measurable(
                    generator.to_string(),
                    "generator is not a subset of the sample space",
                ));
            }
            atoms = Self::refine(atoms, &generator);
        }
        Ok(Self::from_partition(space, atoms, AlgebraKind::Generated))
    }

    /// Borel algebra of a finite topology: generated by its open sets.
    pub fn borel(topology: &Topology<T>) -> Self {
        let mut atoms = vec![topology.space().clone()];
        for open in topology.open_sets() {
            atoms = Self::refine(atoms, open);
        }
        Self::from_partition(topology.space().clone(), atoms, AlgebraKind::Borel)
    }

    /// Preimage algebra `σ(f) = { f⁻¹(B) : B measurable in target }`.
    ///
    /// Fails when `f` sends an outcome outside the target space.
    pub fn comap<S, F>(space: &Event<T>, f: F, target: &SigmaAlgebra<S>) -> MeasureResult<Self>
    where
        S: Ord + Clone + fmt::Debug,
        T: fmt::Debug,
        F: Fn(&T) -> S,
    {
        let mut buckets: BTreeMap<usize, Vec<T>> = BTreeMap::new();
        for outcome in space.iter() {
            let image = f(outcome);
            let atom = target.atom_index(&image).ok_or_else(|| {
                MeasureError::not_measurable(
                    format!("{outcome:?}"),
                    format!("image {image:?} lies outside the target space"),
                )
            })?;
            buckets.entry(atom).or_default().push(outcome.clone());
        }
        let atoms = buckets.into_values().map(Event::of).collect();
        Ok(Self::from_partition(space.clone(), atoms, AlgebraKind::Comap))
    }

    /// Smallest algebra containing both `self` and `other`.
    pub fn join(&self, other: &Self) -> MeasureResult<Self>
    where
        T: fmt::Debug,
    {
        if self.space != other.space {
            return Err(MeasureError::InvalidSubalgebra(format!(
                "cannot join algebras over {} and {}",
                self.space, other.space
            )));
        }
        let mut atoms = self.atoms.clone();
        for atom in &other.atoms {
            atoms = Self::refine(atoms, atom);
        }
        Ok(Self::from_partition(self.space.clone(), atoms, AlgebraKind::Join))
    }

    /// Whether `event` is a union of atoms.
    pub fn is_measurable(&self, event: &Event<T>) -> bool {
        let mut hits: BTreeMap<usize, usize> = BTreeMap::new();
        for outcome in event.iter() {
            match self.index.get(outcome) {
                Some(&atom) => *hits.entry(atom).or_insert(0) += 1,
                None => return false,
            }
        }
        hits.into_iter()
            .all(|(atom, count)| self.atoms[atom].len() == count)
    }

    /// Fail with `NotMeasurable` unless `event` is measurable.
    pub fn ensure_measurable(&self, event: &Event<T>) -> MeasureResult<()>
    where
        T: fmt::Debug,
    {
        if self.is_measurable(event) {
            Ok(())
        } else {
            trace!(algebra = %self, event = %event, "rejected non-measurable event");
            Err(MeasureError::not_measurable(
                event.to_string(),
                format!("not a union of atoms of the {} algebra", self.kind),
            ))
        }
    }

    /// Whether every set measurable here is measurable in `other`.
    pub fn is_sub_algebra_of(&self, other: &Self) -> bool {
        self.space == other.space && self.atoms.iter().all(|atom| other.is_measurable(atom))
    }

    /// Fail with `InvalidSubalgebra` unless `self ⊆ ambient`.
    pub fn ensure_sub_algebra_of(&self, ambient: &Self) -> MeasureResult<()>
    where
        T: fmt::Debug,
    {
        if self.is_sub_algebra_of(ambient) {
            Ok(())
        } else {
            Err(MeasureError::InvalidSubalgebra(format!(
                "{self} is not contained in {ambient}"
            )))
        }
    }

    /// Union of the atoms at the given positions.
    pub fn union_of_atoms(&self, positions: impl IntoIterator<Item = usize>) -> Event<T> {
        Event::union_all(positions.into_iter().filter_map(|i| self.atoms.get(i)))
    }

    /// Every measurable set, or `None` above `MAX_ENUMERABLE_ATOMS` atoms.
    pub fn measurable_sets(&self) -> Option<impl Iterator<Item = Event<T>> + '_> {
        let count = self.atoms.len();
        if count > MAX_ENUMERABLE_ATOMS {
            return None;
        }
        Some((0..(1u64 << count)).map(move |mask| {
            self.union_of_atoms((0..count).filter(move |bit| mask & (1 << bit) != 0))
        }))
    }

    /// The sample space.
    pub fn space(&self) -> &Event<T> {
        &self.space
    }

    /// The atoms, sorted.
    pub fn atoms(&self) -> &[Event<T>] {
        &self.atoms
    }

    /// Number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Position of the atom holding `outcome`.
    pub fn atom_index(&self, outcome: &T) -> Option<usize> {
        self.index.get(outcome).copied()
    }

    /// The atom holding `outcome`.
    pub fn atom_of(&self, outcome: &T) -> Option<&Event<T>> {
        self.atom_index(outcome).map(|i| &self.atoms[i])
    }

    /// Whether `outcome` belongs to the sample space.
    pub fn contains_outcome(&self, outcome: &T) -> bool {
        self.index.contains_key(outcome)
    }

    /// How the algebra was obtained.
    pub fn kind(&self) -> AlgebraKind {
        self.kind
    }

    /// Every singleton is measurable.
    pub fn is_discrete(&self) -> bool {
        self.atoms.iter().all(|atom| atom.len() == 1)
    }

    /// Only the empty set and the whole space are measurable.
    pub fn is_trivial(&self) -> bool {
        self.atoms.len() <= 1
    }
}

impl<T: PartialEq> PartialEq for SigmaAlgebra<T> {
    fn eq(&self, other: &Self) -> bool {
        self.space == other.space && self.atoms == other.atoms
    }
}

impl<T: Eq> Eq for SigmaAlgebra<T> {}

impl<T> fmt::Display for SigmaAlgebra<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} σ-algebra ({} atoms)",
            self.kind,
            self.atoms.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn die() -> Event<u8> {
        Event::of(1..=6)
    }

    #[test]
    fn test_discrete_and_trivial() {
        let discrete = SigmaAlgebra::discrete(die());
        assert!(discrete.is_discrete());
        assert!(discrete.is_measurable(&Event::of([2, 5])));
        assert!(!discrete.is_measurable(&Event::of([7])));

        let trivial = SigmaAlgebra::trivial(die());
        assert!(trivial.is_trivial());
        assert!(trivial.is_measurable(&Event::empty()));
        assert!(trivial.is_measurable(&die()));
        assert!(!trivial.is_measurable(&Event::singleton(1)));
        assert!(trivial.is_sub_algebra_of(&discrete));
        assert!(!discrete.is_sub_algebra_of(&trivial));
    }

    #[test]
    fn test_generated_by_refines() {
        let evens = Event::of([2, 4, 6]);
        let low = Event::of([1, 2, 3]);
        let algebra = SigmaAlgebra::generated_by(die(), [evens.clone(), low]).unwrap();

        assert_eq!(algebra.atom_count(), 4);
        assert!(algebra.is_measurable(&evens));
        assert!(algebra.is_measurable(&Event::singleton(2)));
        assert!(algebra.is_measurable(&Event::of([4, 6])));
        assert!(!algebra.is_measurable(&Event::singleton(4)));
        assert_eq!(algebra.kind(), AlgebraKind::Generated);
    }

    #[test]
    fn test_generated_by_rejects_foreign_generator() {
        let err = SigmaAlgebra::generated_by(die(), [Event::of([0, 1])]).unwrap_err();
        assert!(err.is_measurability_error());
    }

    #[test]
    fn test_comap_of_parity() {
        let target = SigmaAlgebra::discrete(Event::of([0u8, 1]));
        let parity = SigmaAlgebra::comap(&die(), |x| x % 2, &target).unwrap();
        assert_eq!(parity.atom_count(), 2);
        assert!(parity.is_measurable(&Event::of([1, 3, 5])));
        assert!(!parity.is_measurable(&Event::of([1, 2])));

        let narrow = SigmaAlgebra::discrete(Event::of([0u8]));
        assert!(SigmaAlgebra::comap(&die(), |x| x % 2, &narrow).is_err());
    }

    #[test]
    fn test_join_and_equality_ignores_kind() {
        let evens = SigmaAlgebra::generated_by(die(), [Event::of([2, 4, 6])]).unwrap();
        let low = SigmaAlgebra::generated_by(die(), [Event::of([1, 2, 3])]).unwrap();
        let joined = evens.join(&low).unwrap();
        assert!(evens.is_sub_algebra_of(&joined));
        assert!(low.is_sub_algebra_of(&joined));

        let same = SigmaAlgebra::generated_by(die(), [Event::of([1, 3, 5])]).unwrap();
        assert_eq!(evens, same);

        let other = SigmaAlgebra::trivial(Event::of([1u8, 2]));
        assert!(matches!(
            evens.join(&other),
            Err(MeasureError::InvalidSubalgebra(_))
        ));
    }

    #[test]
    fn test_measurable_sets_enumeration() {
        let algebra = SigmaAlgebra::generated_by(die(), [Event::of([1, 2])]).unwrap();
        let sets: Vec<_> = algebra.measurable_sets().unwrap().collect();
        assert_eq!(sets.len(), 4);
        assert!(sets.contains(&Event::empty()));
        assert!(sets.contains(&die()));
        assert!(sets.iter().all(|s| algebra.is_measurable(s)));
    }

    #[test]
    fn test_display_identifier() {
        assert_eq!(
            SigmaAlgebra::discrete(die()).to_string(),
            "discrete σ-algebra (6 atoms)"
        );
    }
}
