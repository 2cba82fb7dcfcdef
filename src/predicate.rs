// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! The selection syntax tree.
//!
//! A [`Predicate`] is an immutable node; composite nodes hold their children behind [`Arc`]s
//! so parsed subtrees can be shared freely between selections and threads.  Every node can
//! render itself to a canonical string.  Two nodes with the same canonical string select the
//! same atoms, which is what lets the evaluation context use canonical strings as cache keys.

use std::fmt;
use std::hash::Hash;
use std::slice;
use std::sync::Arc;

use common::BoundingBox;
use molecule::{Atom, AtomIndex, ComponentFlags, Molecule, SecondaryStructure};
use periodic_table::Element;
use rustc_hash::FxHashSet;

use crate::context::EvaluationContext;

pub type PredicateRef = Arc<Predicate>;

/// Temperature factors compare equal within this tolerance.
const BFACTOR_TOLERANCE: f32 = 1e-6;

const BACKBONE_NAMES: [&str; 4] = ["N", "CA", "C", "O"];

/// The discriminant of a [`Predicate`], for tree introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    And,
    Or,
    Not,
    Xor,
    Name,
    Resn,
    Resi,
    Chain,
    Elem,
    Index,
    Id,
    Alt,
    BFactor,
    Fragment,
    Protein,
    Ligand,
    Water,
    Solvent,
    Organic,
    Backbone,
    Sidechain,
    Metal,
    Heavy,
    Hydrogen,
    PolarHydrogen,
    NonpolarHydrogen,
    Helix,
    Sheet,
    Turn,
    Loop,
    Around,
    XAround,
    Box,
    XBox,
    Beyond,
    ByRes,
    ByChain,
    True,
    False,
}

/// A numeric test: equality, a one-sided comparison, or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison<T> {
    Eq(T),
    Lt(T),
    Le(T),
    Gt(T),
    Ge(T),
    Range(T, T),
}

impl<T: PartialOrd + Copy> Comparison<T> {
    pub fn test(&self, value: T) -> bool {
        match *self {
            Comparison::Eq(v) => value == v,
            Comparison::Lt(v) => value < v,
            Comparison::Le(v) => value <= v,
            Comparison::Gt(v) => value > v,
            Comparison::Ge(v) => value >= v,
            Comparison::Range(start, end) => start <= value && value <= end,
        }
    }
}

impl<T> Comparison<T> {
    fn render(&self, keyword: &str, value: impl Fn(&T) -> String) -> String {
        match self {
            Comparison::Eq(v) => format!("{keyword} {}", value(v)),
            Comparison::Lt(v) => format!("{keyword} < {}", value(v)),
            Comparison::Le(v) => format!("{keyword} <= {}", value(v)),
            Comparison::Gt(v) => format!("{keyword} > {}", value(v)),
            Comparison::Ge(v) => format!("{keyword} >= {}", value(v)),
            Comparison::Range(start, end) => format!("{keyword} {}-{}", value(start), value(end)),
        }
    }
}

/// A `name`/`resn` pattern.  Patterns containing `*` or `?` are shell globs; anything else is
/// compared exactly.  Names are trimmed before matching.
#[derive(Debug, Clone)]
pub struct NamePattern {
    text: String,
    glob: Option<glob::Pattern>,
}

impl NamePattern {
    pub fn new(text: impl Into<String>) -> Result<Self, glob::PatternError> {
        let text = text.into();
        let glob = if text.contains(['*', '?']) {
            Some(glob::Pattern::new(&text)?)
        } else {
            None
        };
        Ok(Self { text, glob })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_glob(&self) -> bool {
        self.glob.is_some()
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        match &self.glob {
            Some(pattern) => pattern.matches(name),
            None => name == self.text,
        }
    }

    /// The pattern as it must be written to parse back, quoted when it holds characters a bare
    /// pattern cannot.
    fn canonical(&self) -> String {
        let bare = !self.text.is_empty() && self.text.chars().all(is_pattern_char);
        if bare {
            self.text.clone()
        } else {
            format!("\"{}\"", self.text)
        }
    }
}

/// Characters allowed in an unquoted `name`/`resn` pattern.
pub(crate) fn is_pattern_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '*' | '?' | '_' | '-' | '\'')
}

/// Payload of the distance kinds: a cutoff (radius, or padding for the box kinds) and the
/// reference selection it is measured from.
#[derive(Debug, Clone)]
pub struct Distance {
    distance: f32,
    reference: PredicateRef,
    cache_key: String,
}

impl Distance {
    fn new(family: &str, distance: f32, reference: PredicateRef) -> Self {
        let cache_key = format!(
            "{family}_{}_{}",
            format_float(distance),
            reference.to_canonical()
        );
        Self {
            distance,
            reference,
            cache_key,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn reference(&self) -> &PredicateRef {
        &self.reference
    }

    /// Shared by every kind in the same family (around/xaround/beyond, box/xbox).
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

/// Payload of `byres`/`bychain`.
#[derive(Debug, Clone)]
pub struct Expansion {
    child: PredicateRef,
    cache_key: String,
}

impl Expansion {
    fn new(family: &str, child: PredicateRef) -> Self {
        let cache_key = format!("{family}_{}", child.to_canonical());
        Self { child, cache_key }
    }

    pub fn child(&self) -> &PredicateRef {
        &self.child
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    True,
    False,
    And(Vec<PredicateRef>),
    Or(Vec<PredicateRef>),
    Xor(Vec<PredicateRef>),
    Not(PredicateRef),
    Name(NamePattern),
    Resn(NamePattern),
    Resi(Comparison<i64>),
    Index(Comparison<i64>),
    Id(Comparison<i64>),
    Fragment(Comparison<i64>),
    BFactor(Comparison<f32>),
    Chain(char),
    Alt(char),
    Elem(Element),
    Protein,
    Ligand,
    Water,
    Solvent,
    Organic,
    Backbone,
    Sidechain,
    Metal,
    Heavy,
    Hydrogen,
    PolarHydrogen,
    NonpolarHydrogen,
    Helix,
    Sheet,
    Turn,
    Loop,
    Around(Distance),
    XAround(Distance),
    Beyond(Distance),
    Box(Distance),
    XBox(Distance),
    ByRes(Expansion),
    ByChain(Expansion),
}

impl Predicate {
    pub fn all() -> PredicateRef {
        Arc::new(Predicate::True)
    }

    pub fn none() -> PredicateRef {
        Arc::new(Predicate::False)
    }

    pub fn and(children: Vec<PredicateRef>) -> PredicateRef {
        Arc::new(Predicate::And(children))
    }

    pub fn or(children: Vec<PredicateRef>) -> PredicateRef {
        Arc::new(Predicate::Or(children))
    }

    pub fn xor(children: Vec<PredicateRef>) -> PredicateRef {
        Arc::new(Predicate::Xor(children))
    }

    pub fn not(child: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::Not(child))
    }

    pub fn name(pattern: &str) -> Result<PredicateRef, glob::PatternError> {
        Ok(Arc::new(Predicate::Name(NamePattern::new(pattern)?)))
    }

    pub fn resn(pattern: &str) -> Result<PredicateRef, glob::PatternError> {
        Ok(Arc::new(Predicate::Resn(NamePattern::new(pattern)?)))
    }

    pub fn chain(chain: char) -> PredicateRef {
        Arc::new(Predicate::Chain(chain))
    }

    pub fn resi(test: Comparison<i64>) -> PredicateRef {
        Arc::new(Predicate::Resi(test))
    }

    pub fn elem(element: Element) -> PredicateRef {
        Arc::new(Predicate::Elem(element))
    }

    pub fn around(radius: f32, reference: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::Around(Distance::new("around", radius, reference)))
    }

    pub fn xaround(radius: f32, reference: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::XAround(Distance::new("around", radius, reference)))
    }

    pub fn beyond(radius: f32, reference: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::Beyond(Distance::new("around", radius, reference)))
    }

    /// Atoms inside the bounding box of `reference`, grown by `padding` on every side.
    pub fn boxed(padding: f32, reference: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::Box(Distance::new("box", padding, reference)))
    }

    /// [`boxed`](Self::boxed) without the reference atoms themselves.
    pub fn xboxed(padding: f32, reference: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::XBox(Distance::new("box", padding, reference)))
    }

    pub fn byres(child: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::ByRes(Expansion::new("byres", child)))
    }

    pub fn bychain(child: PredicateRef) -> PredicateRef {
        Arc::new(Predicate::ByChain(Expansion::new("bychain", child)))
    }

    pub fn kind(&self) -> PredicateKind {
        match self {
            Predicate::True => PredicateKind::True,
            Predicate::False => PredicateKind::False,
            Predicate::And(_) => PredicateKind::And,
            Predicate::Or(_) => PredicateKind::Or,
            Predicate::Xor(_) => PredicateKind::Xor,
            Predicate::Not(_) => PredicateKind::Not,
            Predicate::Name(_) => PredicateKind::Name,
            Predicate::Resn(_) => PredicateKind::Resn,
            Predicate::Resi(_) => PredicateKind::Resi,
            Predicate::Index(_) => PredicateKind::Index,
            Predicate::Id(_) => PredicateKind::Id,
            Predicate::Fragment(_) => PredicateKind::Fragment,
            Predicate::BFactor(_) => PredicateKind::BFactor,
            Predicate::Chain(_) => PredicateKind::Chain,
            Predicate::Alt(_) => PredicateKind::Alt,
            Predicate::Elem(_) => PredicateKind::Elem,
            Predicate::Protein => PredicateKind::Protein,
            Predicate::Ligand => PredicateKind::Ligand,
            Predicate::Water => PredicateKind::Water,
            Predicate::Solvent => PredicateKind::Solvent,
            Predicate::Organic => PredicateKind::Organic,
            Predicate::Backbone => PredicateKind::Backbone,
            Predicate::Sidechain => PredicateKind::Sidechain,
            Predicate::Metal => PredicateKind::Metal,
            Predicate::Heavy => PredicateKind::Heavy,
            Predicate::Hydrogen => PredicateKind::Hydrogen,
            Predicate::PolarHydrogen => PredicateKind::PolarHydrogen,
            Predicate::NonpolarHydrogen => PredicateKind::NonpolarHydrogen,
            Predicate::Helix => PredicateKind::Helix,
            Predicate::Sheet => PredicateKind::Sheet,
            Predicate::Turn => PredicateKind::Turn,
            Predicate::Loop => PredicateKind::Loop,
            Predicate::Around(_) => PredicateKind::Around,
            Predicate::XAround(_) => PredicateKind::XAround,
            Predicate::Beyond(_) => PredicateKind::Beyond,
            Predicate::Box(_) => PredicateKind::Box,
            Predicate::XBox(_) => PredicateKind::XBox,
            Predicate::ByRes(_) => PredicateKind::ByRes,
            Predicate::ByChain(_) => PredicateKind::ByChain,
        }
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[PredicateRef] {
        match self {
            Predicate::And(children) | Predicate::Or(children) | Predicate::Xor(children) => {
                children
            }
            Predicate::Not(child) => slice::from_ref(child),
            Predicate::Around(d)
            | Predicate::XAround(d)
            | Predicate::Beyond(d)
            | Predicate::Box(d)
            | Predicate::XBox(d) => slice::from_ref(&d.reference),
            Predicate::ByRes(e) | Predicate::ByChain(e) => slice::from_ref(&e.child),
            _ => &[],
        }
    }

    /// True if this node or any descendant is of `kind`.
    pub fn contains(&self, kind: PredicateKind) -> bool {
        self.kind() == kind || self.children().iter().any(|child| child.contains(kind))
    }

    pub fn to_canonical(&self) -> String {
        match self {
            Predicate::True => "all".to_string(),
            Predicate::False => "none".to_string(),
            Predicate::And(children) => join_canonical(children, "and", "all"),
            Predicate::Or(children) => join_canonical(children, "or", "none"),
            Predicate::Xor(children) => join_canonical(children, "xor", "none"),
            Predicate::Not(child) => format!("not {}", child.to_canonical()),
            Predicate::Name(pattern) => format!("name {}", pattern.canonical()),
            Predicate::Resn(pattern) => format!("resn {}", pattern.canonical()),
            Predicate::Resi(test) => test.render("resi", i64::to_string),
            Predicate::Index(test) => test.render("index", i64::to_string),
            Predicate::Id(test) => test.render("id", i64::to_string),
            Predicate::Fragment(test) => test.render("fragment", i64::to_string),
            Predicate::BFactor(test) => test.render("bfactor", |v| format_float(*v)),
            Predicate::Chain(chain) => format!("chain {chain}"),
            Predicate::Alt(alt) => format!("alt {alt}"),
            Predicate::Elem(element) => format!("elem {}", element.symbol()),
            Predicate::Protein => "protein".to_string(),
            Predicate::Ligand => "ligand".to_string(),
            Predicate::Water => "water".to_string(),
            Predicate::Solvent => "solvent".to_string(),
            Predicate::Organic => "organic".to_string(),
            Predicate::Backbone => "backbone".to_string(),
            Predicate::Sidechain => "sidechain".to_string(),
            Predicate::Metal => "metal".to_string(),
            Predicate::Heavy => "heavy".to_string(),
            Predicate::Hydrogen => "hydrogen".to_string(),
            Predicate::PolarHydrogen => "polar_hydrogen".to_string(),
            Predicate::NonpolarHydrogen => "nonpolar_hydrogen".to_string(),
            Predicate::Helix => "helix".to_string(),
            Predicate::Sheet => "sheet".to_string(),
            Predicate::Turn => "turn".to_string(),
            Predicate::Loop => "loop".to_string(),
            Predicate::Around(d) => render_distance("around", d),
            Predicate::XAround(d) => render_distance("xaround", d),
            Predicate::Beyond(d) => render_distance("beyond", d),
            Predicate::Box(d) => render_distance("box", d),
            Predicate::XBox(d) => render_distance("xbox", d),
            Predicate::ByRes(e) => format!("byres {}", e.child.to_canonical()),
            Predicate::ByChain(e) => format!("bychain {}", e.child.to_canonical()),
        }
    }

    /// Tests one atom.  Never fails: atoms outside the molecule, or lacking the attribute a leaf
    /// looks at, simply do not match (except for `beyond`, under which they count as far away).
    pub fn evaluate(&self, ctx: &mut EvaluationContext<'_>, atom: AtomIndex) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::And(children) => children.iter().all(|child| child.evaluate(ctx, atom)),
            Predicate::Or(children) => children.iter().any(|child| child.evaluate(ctx, atom)),
            Predicate::Xor(children) => {
                // No short circuit: every operand is evaluated.
                let mut matched = 0;
                for child in children {
                    if child.evaluate(ctx, atom) {
                        matched += 1;
                    }
                }
                matched == 1
            }
            Predicate::Not(child) => !child.evaluate(ctx, atom),
            Predicate::Around(d) => near_reference(ctx, d, atom).unwrap_or(false),
            Predicate::XAround(d) => {
                near_reference(ctx, d, atom).unwrap_or(false) && !d.reference.evaluate(ctx, atom)
            }
            Predicate::Beyond(d) => !near_reference(ctx, d, atom).unwrap_or(false),
            Predicate::Box(d) => inside_reference_box(ctx, d, atom),
            Predicate::XBox(d) => {
                inside_reference_box(ctx, d, atom) && !d.reference.evaluate(ctx, atom)
            }
            Predicate::ByRes(e) => {
                if !ctx.has_residue_cache(&e.cache_key) {
                    let members = expand(ctx, &e.child, |a| a.residue.key());
                    ctx.set_residue_atoms(e.cache_key.clone(), members);
                }
                ctx.residue_atoms(&e.cache_key)
                    .is_some_and(|members| members.contains(&atom))
            }
            Predicate::ByChain(e) => {
                if !ctx.has_chain_cache(&e.cache_key) {
                    let members = expand(ctx, &e.child, |a| a.residue.chain);
                    ctx.set_chain_atoms(e.cache_key.clone(), members);
                }
                ctx.chain_atoms(&e.cache_key)
                    .is_some_and(|members| members.contains(&atom))
            }
            leaf => leaf.evaluate_leaf(ctx.molecule(), atom),
        }
    }

    /// Leaves only depend on the molecule, never on the context caches.
    fn evaluate_leaf(&self, molecule: &Molecule, index: AtomIndex) -> bool {
        let Some(atom) = molecule.atom(index) else {
            return false;
        };
        let is_protein = || molecule.has_component(index, ComponentFlags::PROTEIN);
        let ss = atom.residue.secondary_structure;

        match self {
            Predicate::Name(pattern) => pattern.matches(&atom.name),
            Predicate::Resn(pattern) => pattern.matches(&atom.residue.name),
            Predicate::Resi(test) => test.test(i64::from(atom.residue.number)),
            Predicate::Index(test) => i64::try_from(index).is_ok_and(|i| test.test(i)),
            Predicate::Id(test) => test.test(i64::from(atom.serial)),
            Predicate::Fragment(test) => molecule
                .fragment(index)
                .and_then(|f| i64::try_from(f).ok())
                .is_some_and(|f| test.test(f)),
            Predicate::BFactor(Comparison::Eq(value)) => {
                (atom.b_factor - value).abs() <= BFACTOR_TOLERANCE
            }
            Predicate::BFactor(test) => test.test(atom.b_factor),
            Predicate::Chain(chain) => atom.residue.chain == *chain,
            Predicate::Alt(alt) => atom.alt_loc == *alt,
            Predicate::Elem(element) => atom.element == Some(*element),
            Predicate::Protein => is_protein(),
            Predicate::Ligand => molecule.has_component(index, ComponentFlags::LIGAND),
            Predicate::Water => molecule.has_component(index, ComponentFlags::WATER),
            Predicate::Solvent => molecule.has_component(
                index,
                ComponentFlags::WATER | ComponentFlags::SOLVENT,
            ),
            Predicate::Organic => {
                !molecule.has_component(index, ComponentFlags::PROTEIN | ComponentFlags::NUCLEIC)
                    && (atom.element == Some(Element::Carbon)
                        || bonded_to(molecule, index, |z| z == Element::Carbon as u8))
            }
            Predicate::Backbone => is_protein() && is_backbone_name(&atom.name),
            Predicate::Sidechain => {
                is_protein() && !is_backbone_name(&atom.name) && atom.name.trim() != "OXT"
            }
            Predicate::Metal => atom.element.is_some_and(Element::is_metal),
            Predicate::Heavy => atom.atomic_number() > 1,
            Predicate::Hydrogen => atom.atomic_number() == 1,
            Predicate::PolarHydrogen => {
                atom.atomic_number() == 1 && bonded_to(molecule, index, is_polar)
            }
            Predicate::NonpolarHydrogen => {
                atom.atomic_number() == 1 && !bonded_to(molecule, index, is_polar)
            }
            Predicate::Helix => ss == Some(SecondaryStructure::Helix),
            Predicate::Sheet => ss == Some(SecondaryStructure::Sheet),
            Predicate::Turn => ss == Some(SecondaryStructure::Turn),
            Predicate::Loop => ss.is_none(),
            // Composite kinds are handled by `evaluate`.
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

fn join_canonical(children: &[PredicateRef], operator: &str, identity: &str) -> String {
    match children {
        [] => identity.to_string(),
        [only] => only.to_canonical(),
        _ => {
            let mut parts: Vec<String> = children.iter().map(|c| c.to_canonical()).collect();
            parts.sort();
            format!("({})", parts.join(&format!(" {operator} ")))
        }
    }
}

fn render_distance(keyword: &str, d: &Distance) -> String {
    format!(
        "{keyword} {} {}",
        format_float(d.distance),
        d.reference.to_canonical()
    )
}

/// Shortest text that parses back to the same `f32`.  Never an exponent, and `-0` prints as `0`.
pub(crate) fn format_float(value: f32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

fn is_backbone_name(name: &str) -> bool {
    BACKBONE_NAMES.contains(&name.trim())
}

fn is_polar(atomic_number: u8) -> bool {
    matches!(atomic_number, 7 | 8 | 16)
}

fn bonded_to(molecule: &Molecule, index: AtomIndex, test: impl Fn(u8) -> bool) -> bool {
    molecule
        .neighbors(index)
        .filter_map(|n| molecule.atom(n))
        .any(|neighbor| test(neighbor.atomic_number()))
}

/// Looks up (computing on first use) the shared around/xaround/beyond mask.  `None` when the
/// atom lies outside the mask.
fn near_reference(ctx: &mut EvaluationContext<'_>, d: &Distance, atom: AtomIndex) -> Option<bool> {
    if !ctx.has_around_cache(&d.cache_key) {
        let mask = distance_mask(ctx, d);
        ctx.set_around_cache(d.cache_key.clone(), mask);
    }
    ctx.around_cache(&d.cache_key)
        .and_then(|mask| mask.get(atom).copied())
}

/// Marks every atom within the cutoff of any atom matching the reference.
fn distance_mask(ctx: &mut EvaluationContext<'_>, d: &Distance) -> Vec<bool> {
    let molecule = ctx.molecule();
    let count = molecule.atom_count();
    let references: Vec<AtomIndex> = (0..count)
        .filter(|&i| d.reference.evaluate(ctx, i))
        .collect();

    let mut mask = vec![false; count];
    let index = ctx.spatial_index();
    for reference in references {
        for near in index.find_within_radius_of_atom(molecule, reference, d.distance) {
            if let Some(bit) = mask.get_mut(near) {
                *bit = true;
            }
        }
    }
    mask
}

fn inside_reference_box(ctx: &mut EvaluationContext<'_>, d: &Distance, atom: AtomIndex) -> bool {
    if !ctx.has_box_cache(&d.cache_key) {
        let molecule = ctx.molecule();
        let mut bounds = BoundingBox::empty();
        for (index, candidate) in molecule.atoms() {
            if d.reference.evaluate(ctx, index) {
                bounds.enclose_point(candidate.position);
            }
        }
        ctx.set_box_cache(d.cache_key.clone(), bounds.padded(d.distance));
    }
    let Some(position) = ctx.molecule().atom(atom).map(|a| a.position) else {
        return false;
    };
    ctx.box_cache(&d.cache_key)
        .is_some_and(|bounds| bounds.contains(position))
}

/// All atoms sharing a key (residue or chain) with some atom matching `child`.
fn expand<K: Eq + Hash>(
    ctx: &mut EvaluationContext<'_>,
    child: &Predicate,
    key_of: impl Fn(&Atom) -> K,
) -> FxHashSet<AtomIndex> {
    let molecule = ctx.molecule();
    let mut keys = FxHashSet::default();
    for (index, atom) in molecule.atoms() {
        if child.evaluate(ctx, index) {
            keys.insert(key_of(atom));
        }
    }
    molecule
        .atoms()
        .filter(|(_, atom)| keys.contains(&key_of(atom)))
        .map(|(index, _)| index)
        .collect()
}


// End of File
