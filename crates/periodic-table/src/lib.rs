// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Chemical elements, their symbols, and the handful of element classes the selection language
//! needs (metals).  Elements are stored by atomic number so comparisons against a parsed `elem`
//! keyword are a single byte compare.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Element {
    Hydrogen = 1,
    Helium,
    Lithium,
    Beryllium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Neon,
    Sodium,
    Magnesium,
    Aluminium,
    Silicon,
    Phosphorus,
    Sulfur,
    Chlorine,
    Argon,
    Potassium,
    Calcium,
    Scandium,
    Titanium,
    Vanadium,
    Chromium,
    Manganese,
    Iron,
    Cobalt,
    Nickel,
    Copper,
    Zinc,
    Gallium,
    Germanium,
    Arsenic,
    Selenium,
    Bromine,
    Krypton,
    Rubidium,
    Strontium,
    Yttrium,
    Zirconium,
    Niobium,
    Molybdenum,
    Technetium,
    Ruthenium,
    Rhodium,
    Palladium,
    Silver,
    Cadmium,
    Indium,
    Tin,
    Antimony,
    Tellurium,
    Iodine,
    Xenon,
    Cesium,
    Barium,
    Lanthanum,
    Cerium,
    Praseodymium,
    Neodymium,
    Promethium,
    Samarium,
    Europium,
    Gadolinium,
    Terbium,
    Dysprosium,
    Holmium,
    Erbium,
    Thulium,
    Ytterbium,
    Lutetium,
    Hafnium,
    Tantalum,
    Tungsten,
    Rhenium,
    Osmium,
    Iridium,
    Platinum,
    Gold,
    Mercury,
    Thallium,
    Lead,
    Bismuth,
    Polonium,
    Astatine,
    Radon,
    Francium,
    Radium,
    Actinium,
    Thorium,
    Protactinium,
    Uranium,
    Neptunium,
    Plutonium,
    Americium,
    Curium,
    Berkelium,
    Californium,
    Einsteinium,
    Fermium,
    Mendelevium,
    Nobelium,
    Lawrencium,
    Rutherfordium,
    Dubnium,
    Seaborgium,
    Bohrium,
    Hassium,
    Meitnerium,
    Darmstadtium,
    Roentgenium,
    Copernicium,
    Nihonium,
    Flerovium,
    Moscovium,
    Livermorium,
    Tennessine,
    Oganesson,
}

const_assert_eq!(Element::MAX as usize, SYMBOLS.len());
const_assert_eq!(mem::size_of::<Element>(), 1);

/// Element symbols indexed by `atomic_number - 1`.
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

lazy_static! {
    /// Upper-cased symbol to element, for case-insensitive lookup.
    static ref ELEMENTS_BY_SYMBOL: HashMap<String, Element> = SYMBOLS
        .iter()
        .enumerate()
        .filter_map(|(i, symbol)| {
            Element::from_atomic_number(i as u8 + 1).map(|e| (symbol.to_ascii_uppercase(), e))
        })
        .collect();
}

impl Element {
    pub const MIN: Self = Element::Hydrogen;
    pub const MAX: Self = Element::Oganesson;

    pub fn from_atomic_number(n: u8) -> Option<Self> {
        if n >= Self::MIN as u8 && n <= Self::MAX as u8 {
            // SAFETY: `Element` is `repr(u8)` with contiguous discriminants MIN..=MAX.
            Some(unsafe { mem::transmute::<u8, Element>(n) })
        } else {
            None
        }
    }

    /// Looks up an element by its symbol, ignoring case and surrounding whitespace, so `"FE"`,
    /// `"fe"` and `" Fe"` all resolve to iron.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        ELEMENTS_BY_SYMBOL
            .get(&symbol.trim().to_ascii_uppercase())
            .copied()
    }

    #[inline]
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    /// The Titlecase symbol, e.g. `"Fe"`.
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize - 1]
    }

    /// Metals as understood by the `metal` selection keyword: Li, Na through Al, K through Zn,
    /// Rb through Cd, and Cs through Hg.
    pub fn is_metal(self) -> bool {
        matches!(self as u8, 3 | 11..=13 | 19..=30 | 37..=48 | 55..=80)
    }

    pub fn is_hydrogen(self) -> bool {
        self == Element::Hydrogen
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<Element> for u8 {
    fn from(element: Element) -> u8 {
        element as u8
    }
}

impl TryFrom<u8> for Element {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Element::from_atomic_number(n).ok_or_else(|| format!("no element with atomic number {n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_through_atomic_numbers() {
        for n in Element::MIN as u8..=Element::MAX as u8 {
            let element = Element::from_atomic_number(n).unwrap();
            assert_eq!(element.atomic_number(), n);
            assert_eq!(Element::from_symbol(element.symbol()), Some(element));
        }
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        assert_eq!(Element::from_symbol("FE"), Some(Element::Iron));
        assert_eq!(Element::from_symbol("fe"), Some(Element::Iron));
        assert_eq!(Element::from_symbol(" Cl "), Some(Element::Chlorine));
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Element::from_symbol(""), None);
    }

    #[test]
    fn out_of_range_atomic_numbers_are_rejected() {
        assert_eq!(Element::from_atomic_number(0), None);
        assert_eq!(Element::from_atomic_number(119), None);
        assert!(Element::try_from(200u8).is_err());
    }

    #[test]
    fn metal_ranges() {
        assert!(Element::Lithium.is_metal());
        assert!(Element::Zinc.is_metal());
        assert!(Element::Mercury.is_metal());
        assert!(!Element::Carbon.is_metal());
        assert!(!Element::Thallium.is_metal());
        assert!(!Element::Hydrogen.is_metal());
        assert!(!Element::Beryllium.is_metal());
    }
}

// End of File
