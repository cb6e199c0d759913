/// Periodic table used by the molar mass calculator.
///
/// The table is a plain `static` array; symbol lookups go through a hash index
/// that is built once on first use and is read-only afterwards, so lookups can be
/// shared between threads without any locking.
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// element record: symbol, name, atomic number and standard atomic weight (g/mol)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_number: u8,
    pub atomic_weight: f64,
}

/// total number of elements in the table
pub const NUMBER_OF_ELEMENTS: usize = 118;

// Standard atomic weights; for elements without stable isotopes the mass number
// of the longest-lived isotope is used.
static ELEMENTS: [Element; NUMBER_OF_ELEMENTS] = [
    Element {
        symbol: "H",
        name: "Hydrogen",
        atomic_number: 1,
        atomic_weight: 1.008,
    },
    Element {
        symbol: "He",
        name: "Helium",
        atomic_number: 2,
        atomic_weight: 4.0026,
    },
    Element {
        symbol: "Li",
        name: "Lithium",
        atomic_number: 3,
        atomic_weight: 6.94,
    },
    Element {
        symbol: "Be",
        name: "Beryllium",
        atomic_number: 4,
        atomic_weight: 9.0122,
    },
    Element {
        symbol: "B",
        name: "Boron",
        atomic_number: 5,
        atomic_weight: 10.81,
    },
    Element {
        symbol: "C",
        name: "Carbon",
        atomic_number: 6,
        atomic_weight: 12.011,
    },
    Element {
        symbol: "N",
        name: "Nitrogen",
        atomic_number: 7,
        atomic_weight: 14.007,
    },
    Element {
        symbol: "O",
        name: "Oxygen",
        atomic_number: 8,
        atomic_weight: 15.999,
    },
    Element {
        symbol: "F",
        name: "Fluorine",
        atomic_number: 9,
        atomic_weight: 18.998,
    },
    Element {
        symbol: "Ne",
        name: "Neon",
        atomic_number: 10,
        atomic_weight: 20.18,
    },
    Element {
        symbol: "Na",
        name: "Sodium",
        atomic_number: 11,
        atomic_weight: 22.99,
    },
    Element {
        symbol: "Mg",
        name: "Magnesium",
        atomic_number: 12,
        atomic_weight: 24.305,
    },
    Element {
        symbol: "Al",
        name: "Aluminium",
        atomic_number: 13,
        atomic_weight: 26.982,
    },
    Element {
        symbol: "Si",
        name: "Silicon",
        atomic_number: 14,
        atomic_weight: 28.085,
    },
    Element {
        symbol: "P",
        name: "Phosphorus",
        atomic_number: 15,
        atomic_weight: 30.974,
    },
    Element {
        symbol: "S",
        name: "Sulfur",
        atomic_number: 16,
        atomic_weight: 32.06,
    },
    Element {
        symbol: "Cl",
        name: "Chlorine",
        atomic_number: 17,
        atomic_weight: 35.45,
    },
    Element {
        symbol: "Ar",
        name: "Argon",
        atomic_number: 18,
        atomic_weight: 39.948,
    },
    Element {
        symbol: "K",
        name: "Potassium",
        atomic_number: 19,
        atomic_weight: 39.098,
    },
    Element {
        symbol: "Ca",
        name: "Calcium",
        atomic_number: 20,
        atomic_weight: 40.078,
    },
    Element {
        symbol: "Sc",
        name: "Scandium",
        atomic_number: 21,
        atomic_weight: 44.956,
    },
    Element {
        symbol: "Ti",
        name: "Titanium",
        atomic_number: 22,
        atomic_weight: 47.867,
    },
    Element {
        symbol: "V",
        name: "Vanadium",
        atomic_number: 23,
        atomic_weight: 50.942,
    },
    Element {
        symbol: "Cr",
        name: "Chromium",
        atomic_number: 24,
        atomic_weight: 51.996,
    },
    Element {
        symbol: "Mn",
        name: "Manganese",
        atomic_number: 25,
        atomic_weight: 54.938,
    },
    Element {
        symbol: "Fe",
        name: "Iron",
        atomic_number: 26,
        atomic_weight: 55.845,
    },
    Element {
        symbol: "Co",
        name: "Cobalt",
        atomic_number: 27,
        atomic_weight: 58.933,
    },
    Element {
        symbol: "Ni",
        name: "Nickel",
        atomic_number: 28,
        atomic_weight: 58.693,
    },
    Element {
        symbol: "Cu",
        name: "Copper",
        atomic_number: 29,
        atomic_weight: 63.546,
    },
    Element {
        symbol: "Zn",
        name: "Zinc",
        atomic_number: 30,
        atomic_weight: 65.38,
    },
    Element {
        symbol: "Ga",
        name: "Gallium",
        atomic_number: 31,
        atomic_weight: 69.723,
    },
    Element {
        symbol: "Ge",
        name: "Germanium",
        atomic_number: 32,
        atomic_weight: 72.63,
    },
    Element {
        symbol: "As",
        name: "Arsenic",
        atomic_number: 33,
        atomic_weight: 74.922,
    },
    Element {
        symbol: "Se",
        name: "Selenium",
        atomic_number: 34,
        atomic_weight: 78.971,
    },
    Element {
        symbol: "Br",
        name: "Bromine",
        atomic_number: 35,
        atomic_weight: 79.904,
    },
    Element {
        symbol: "Kr",
        name: "Krypton",
        atomic_number: 36,
        atomic_weight: 83.798,
    },
    Element {
        symbol: "Rb",
        name: "Rubidium",
        atomic_number: 37,
        atomic_weight: 85.468,
    },
    Element {
        symbol: "Sr",
        name: "Strontium",
        atomic_number: 38,
        atomic_weight: 87.62,
    },
    Element {
        symbol: "Y",
        name: "Yttrium",
        atomic_number: 39,
        atomic_weight: 88.906,
    },
    Element {
        symbol: "Zr",
        name: "Zirconium",
        atomic_number: 40,
        atomic_weight: 91.224,
    },
    Element {
        symbol: "Nb",
        name: "Niobium",
        atomic_number: 41,
        atomic_weight: 92.906,
    },
    Element {
        symbol: "Mo",
        name: "Molybdenum",
        atomic_number: 42,
        atomic_weight: 95.95,
    },
    Element {
        symbol: "Tc",
        name: "Technetium",
        atomic_number: 43,
        atomic_weight: 98.0,
    },
    Element {
        symbol: "Ru",
        name: "Ruthenium",
        atomic_number: 44,
        atomic_weight: 101.07,
    },
    Element {
        symbol: "Rh",
        name: "Rhodium",
        atomic_number: 45,
        atomic_weight: 102.91,
    },
    Element {
        symbol: "Pd",
        name: "Palladium",
        atomic_number: 46,
        atomic_weight: 106.42,
    },
    Element {
        symbol: "Ag",
        name: "Silver",
        atomic_number: 47,
        atomic_weight: 107.87,
    },
    Element {
        symbol: "Cd",
        name: "Cadmium",
        atomic_number: 48,
        atomic_weight: 112.41,
    },
    Element {
        symbol: "In",
        name: "Indium",
        atomic_number: 49,
        atomic_weight: 114.82,
    },
    Element {
        symbol: "Sn",
        name: "Tin",
        atomic_number: 50,
        atomic_weight: 118.71,
    },
    Element {
        symbol: "Sb",
        name: "Antimony",
        atomic_number: 51,
        atomic_weight: 121.76,
    },
    Element {
        symbol: "Te",
        name: "Tellurium",
        atomic_number: 52,
        atomic_weight: 127.6,
    },
    Element {
        symbol: "I",
        name: "Iodine",
        atomic_number: 53,
        atomic_weight: 126.9,
    },
    Element {
        symbol: "Xe",
        name: "Xenon",
        atomic_number: 54,
        atomic_weight: 131.29,
    },
    Element {
        symbol: "Cs",
        name: "Caesium",
        atomic_number: 55,
        atomic_weight: 132.91,
    },
    Element {
        symbol: "Ba",
        name: "Barium",
        atomic_number: 56,
        atomic_weight: 137.33,
    },
    Element {
        symbol: "La",
        name: "Lanthanum",
        atomic_number: 57,
        atomic_weight: 138.91,
    },
    Element {
        symbol: "Ce",
        name: "Cerium",
        atomic_number: 58,
        atomic_weight: 140.12,
    },
    Element {
        symbol: "Pr",
        name: "Praseodymium",
        atomic_number: 59,
        atomic_weight: 140.91,
    },
    Element {
        symbol: "Nd",
        name: "Neodymium",
        atomic_number: 60,
        atomic_weight: 144.24,
    },
    Element {
        symbol: "Pm",
        name: "Promethium",
        atomic_number: 61,
        atomic_weight: 145.0,
    },
    Element {
        symbol: "Sm",
        name: "Samarium",
        atomic_number: 62,
        atomic_weight: 150.36,
    },
    Element {
        symbol: "Eu",
        name: "Europium",
        atomic_number: 63,
        atomic_weight: 151.96,
    },
    Element {
        symbol: "Gd",
        name: "Gadolinium",
        atomic_number: 64,
        atomic_weight: 157.25,
    },
    Element {
        symbol: "Tb",
        name: "Terbium",
        atomic_number: 65,
        atomic_weight: 158.93,
    },
    Element {
        symbol: "Dy",
        name: "Dysprosium",
        atomic_number: 66,
        atomic_weight: 162.5,
    },
    Element {
        symbol: "Ho",
        name: "Holmium",
        atomic_number: 67,
        atomic_weight: 164.93,
    },
    Element {
        symbol: "Er",
        name: "Erbium",
        atomic_number: 68,
        atomic_weight: 167.26,
    },
    Element {
        symbol: "Tm",
        name: "Thulium",
        atomic_number: 69,
        atomic_weight: 168.93,
    },
    Element {
        symbol: "Yb",
        name: "Ytterbium",
        atomic_number: 70,
        atomic_weight: 173.05,
    },
    Element {
        symbol: "Lu",
        name: "Lutetium",
        atomic_number: 71,
        atomic_weight: 174.97,
    },
    Element {
        symbol: "Hf",
        name: "Hafnium",
        atomic_number: 72,
        atomic_weight: 178.49,
    },
    Element {
        symbol: "Ta",
        name: "Tantalum",
        atomic_number: 73,
        atomic_weight: 180.95,
    },
    Element {
        symbol: "W",
        name: "Tungsten",
        atomic_number: 74,
        atomic_weight: 183.84,
    },
    Element {
        symbol: "Re",
        name: "Rhenium",
        atomic_number: 75,
        atomic_weight: 186.21,
    },
    Element {
        symbol: "Os",
        name: "Osmium",
        atomic_number: 76,
        atomic_weight: 190.23,
    },
    Element {
        symbol: "Ir",
        name: "Iridium",
        atomic_number: 77,
        atomic_weight: 192.22,
    },
    Element {
        symbol: "Pt",
        name: "Platinum",
        atomic_number: 78,
        atomic_weight: 195.08,
    },
    Element {
        symbol: "Au",
        name: "Gold",
        atomic_number: 79,
        atomic_weight: 196.97,
    },
    Element {
        symbol: "Hg",
        name: "Mercury",
        atomic_number: 80,
        atomic_weight: 200.59,
    },
    Element {
        symbol: "Tl",
        name: "Thallium",
        atomic_number: 81,
        atomic_weight: 204.38,
    },
    Element {
        symbol: "Pb",
        name: "Lead",
        atomic_number: 82,
        atomic_weight: 207.2,
    },
    Element {
        symbol: "Bi",
        name: "Bismuth",
        atomic_number: 83,
        atomic_weight: 208.98,
    },
    Element {
        symbol: "Po",
        name: "Polonium",
        atomic_number: 84,
        atomic_weight: 209.0,
    },
    Element {
        symbol: "At",
        name: "Astatine",
        atomic_number: 85,
        atomic_weight: 210.0,
    },
    Element {
        symbol: "Rn",
        name: "Radon",
        atomic_number: 86,
        atomic_weight: 222.0,
    },
    Element {
        symbol: "Fr",
        name: "Francium",
        atomic_number: 87,
        atomic_weight: 223.0,
    },
    Element {
        symbol: "Ra",
        name: "Radium",
        atomic_number: 88,
        atomic_weight: 226.0,
    },
    Element {
        symbol: "Ac",
        name: "Actinium",
        atomic_number: 89,
        atomic_weight: 227.0,
    },
    Element {
        symbol: "Th",
        name: "Thorium",
        atomic_number: 90,
        atomic_weight: 232.04,
    },
    Element {
        symbol: "Pa",
        name: "Protactinium",
        atomic_number: 91,
        atomic_weight: 231.04,
    },
    Element {
        symbol: "U",
        name: "Uranium",
        atomic_number: 92,
        atomic_weight: 238.03,
    },
    Element {
        symbol: "Np",
        name: "Neptunium",
        atomic_number: 93,
        atomic_weight: 237.0,
    },
    Element {
        symbol: "Pu",
        name: "Plutonium",
        atomic_number: 94,
        atomic_weight: 244.0,
    },
    Element {
        symbol: "Am",
        name: "Americium",
        atomic_number: 95,
        atomic_weight: 243.0,
    },
    Element {
        symbol: "Cm",
        name: "Curium",
        atomic_number: 96,
        atomic_weight: 247.0,
    },
    Element {
        symbol: "Bk",
        name: "Berkelium",
        atomic_number: 97,
        atomic_weight: 247.0,
    },
    Element {
        symbol: "Cf",
        name: "Californium",
        atomic_number: 98,
        atomic_weight: 251.0,
    },
    Element {
        symbol: "Es",
        name: "Einsteinium",
        atomic_number: 99,
        atomic_weight: 252.0,
    },
    Element {
        symbol: "Fm",
        name: "Fermium",
        atomic_number: 100,
        atomic_weight: 257.0,
    },
    Element {
        symbol: "Md",
        name: "Mendelevium",
        atomic_number: 101,
        atomic_weight: 258.0,
    },
    Element {
        symbol: "No",
        name: "Nobelium",
        atomic_number: 102,
        atomic_weight: 259.0,
    },
    Element {
        symbol: "Lr",
        name: "Lawrencium",
        atomic_number: 103,
        atomic_weight: 266.0,
    },
    Element {
        symbol: "Rf",
        name: "Rutherfordium",
        atomic_number: 104,
        atomic_weight: 267.0,
    },
    Element {
        symbol: "Db",
        name: "Dubnium",
        atomic_number: 105,
        atomic_weight: 268.0,
    },
    Element {
        symbol: "Sg",
        name: "Seaborgium",
        atomic_number: 106,
        atomic_weight: 269.0,
    },
    Element {
        symbol: "Bh",
        name: "Bohrium",
        atomic_number: 107,
        atomic_weight: 270.0,
    },
    Element {
        symbol: "Hs",
        name: "Hassium",
        atomic_number: 108,
        atomic_weight: 277.0,
    },
    Element {
        symbol: "Mt",
        name: "Meitnerium",
        atomic_number: 109,
        atomic_weight: 278.0,
    },
    Element {
        symbol: "Ds",
        name: "Darmstadtium",
        atomic_number: 110,
        atomic_weight: 281.0,
    },
    Element {
        symbol: "Rg",
        name: "Roentgenium",
        atomic_number: 111,
        atomic_weight: 282.0,
    },
    Element {
        symbol: "Cn",
        name: "Copernicium",
        atomic_number: 112,
        atomic_weight: 285.0,
    },
    Element {
        symbol: "Nh",
        name: "Nihonium",
        atomic_number: 113,
        atomic_weight: 286.0,
    },
    Element {
        symbol: "Fl",
        name: "Flerovium",
        atomic_number: 114,
        atomic_weight: 289.0,
    },
    Element {
        symbol: "Mc",
        name: "Moscovium",
        atomic_number: 115,
        atomic_weight: 290.0,
    },
    Element {
        symbol: "Lv",
        name: "Livermorium",
        atomic_number: 116,
        atomic_weight: 293.0,
    },
    Element {
        symbol: "Ts",
        name: "Tennessine",
        atomic_number: 117,
        atomic_weight: 294.0,
    },
    Element {
        symbol: "Og",
        name: "Oganesson",
        atomic_number: 118,
        atomic_weight: 294.0,
    },
];

static SYMBOL_INDEX: LazyLock<HashMap<&'static str, &'static Element>> = LazyLock::new(|| {
    debug!("building element index for {} elements", ELEMENTS.len());
    ELEMENTS
        .iter()
        .map(|element| (element.symbol, element))
        .collect()
});

/// Look up an element by its case-sensitive symbol ("C", "Fe"). A miss is `None`.
pub fn lookup(symbol: &str) -> Option<&'static Element> {
    SYMBOL_INDEX.get(symbol).copied()
}

/// Look up an element by its atomic number (1..=118).
pub fn lookup_by_number(atomic_number: u8) -> Option<&'static Element> {
    if atomic_number == 0 {
        return None;
    }
    ELEMENTS.get(atomic_number as usize - 1)
}

/// true if the symbol is a known element
pub fn is_element(symbol: &str) -> bool {
    SYMBOL_INDEX.contains_key(symbol)
}

/// All elements ordered by atomic number
pub fn all_elements() -> &'static [Element] {
    &ELEMENTS
}
