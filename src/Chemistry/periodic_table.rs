//! Element data: symbol, name, atomic number and standard atomic weight.
//!
//! The table is either the built-in one (118 elements, IUPAC standard atomic weights,
//! mass number of the longest-lived isotope for elements without a standard weight)
//! or loaded from a PeriodicTableJSON file:
//! ```json
//! {"elements": [{"name": "Hydrogen", "symbol": "H", "number": 1, "atomic_mass": 1.008}]}
//! ```
//! The keys `Element`, `AtomicNumber` and `AtomicMass` are accepted as well.
//! Optional `melt` / `boil` (kelvin, also `MeltingPoint` / `BoilingPoint`) and `shells`
//! feed [`PeriodicTable::phase_at`] and [`PeriodicTable::shells`]. The built-in table
//! carries them for the light elements and a few common heavy ones.
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeriodicTableError {
    #[error("Failed to read periodic table file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid periodic table data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Periodic table contains no elements")]
    Empty,
    #[error("Element symbol '{0}' not found")]
    UnknownElement(String),
    #[error("No melting or boiling point data available for {0}")]
    NoPhaseData(String),
    #[error("No shell data for element '{0}'")]
    NoShellData(String),
    #[error("Temperature {0} K is below absolute zero")]
    BelowAbsoluteZero(f64),
    #[error("Mass number {mass_number} is less than atomic number {atomic_number} of {symbol}")]
    MassNumberTooSmall {
        symbol: String,
        mass_number: u32,
        atomic_number: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementData {
    #[serde(default, alias = "AtomicNumber")]
    pub number: u32,
    #[serde(alias = "Symbol")]
    pub symbol: String,
    #[serde(default, alias = "Element")]
    pub name: String,
    /// g/mol
    #[serde(alias = "AtomicMass")]
    pub atomic_mass: f64,
    /// melting point, K
    #[serde(default, alias = "MeltingPoint")]
    pub melt: Option<f64>,
    /// boiling point, K
    #[serde(default, alias = "BoilingPoint")]
    pub boil: Option<f64>,
    /// electrons per shell, innermost first
    #[serde(default)]
    pub shells: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Solid,
    Liquid,
    Gas,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Solid => "Solid",
            Phase::Liquid => "Liquid",
            Phase::Gas => "Gas",
        };
        f.write_str(name)
    }
}

/// State of an element at a given temperature, judged from its melting and boiling points
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePrediction {
    pub symbol: String,
    pub melt: f64,
    pub boil: f64,
    pub temperature: f64,
    pub phase: Phase,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PeriodicTableFile {
    Wrapped { elements: Vec<ElementData> },
    Bare(Vec<ElementData>),
}

/// Nucleon composition of an isotope
#[derive(Debug, Clone, PartialEq)]
pub struct Isotope {
    pub symbol: String,
    pub name: String,
    pub mass_number: u32,
    pub protons: u32,
    pub neutrons: u32,
}

impl Isotope {
    /// isotopic notation like "14C"
    pub fn notation(&self) -> String {
        format!("{}{}", self.mass_number, self.symbol)
    }
}

// (atomic number, symbol, name, atomic mass)
#[rustfmt::skip]
const ELEMENTS: &[(u32, &str, &str, f64)] = &[
    (1, "H", "Hydrogen", 1.008), (2, "He", "Helium", 4.0026), (3, "Li", "Lithium", 6.94),
    (4, "Be", "Beryllium", 9.0122), (5, "B", "Boron", 10.81), (6, "C", "Carbon", 12.011),
    (7, "N", "Nitrogen", 14.007), (8, "O", "Oxygen", 15.999), (9, "F", "Fluorine", 18.998),
    (10, "Ne", "Neon", 20.180), (11, "Na", "Sodium", 22.990), (12, "Mg", "Magnesium", 24.305),
    (13, "Al", "Aluminium", 26.982), (14, "Si", "Silicon", 28.085), (15, "P", "Phosphorus", 30.974),
    (16, "S", "Sulfur", 32.06), (17, "Cl", "Chlorine", 35.45), (18, "Ar", "Argon", 39.95),
    (19, "K", "Potassium", 39.098), (20, "Ca", "Calcium", 40.078), (21, "Sc", "Scandium", 44.956),
    (22, "Ti", "Titanium", 47.867), (23, "V", "Vanadium", 50.942), (24, "Cr", "Chromium", 51.996),
    (25, "Mn", "Manganese", 54.938), (26, "Fe", "Iron", 55.845), (27, "Co", "Cobalt", 58.933),
    (28, "Ni", "Nickel", 58.693), (29, "Cu", "Copper", 63.546), (30, "Zn", "Zinc", 65.38),
    (31, "Ga", "Gallium", 69.723), (32, "Ge", "Germanium", 72.630), (33, "As", "Arsenic", 74.922),
    (34, "Se", "Selenium", 78.971), (35, "Br", "Bromine", 79.904), (36, "Kr", "Krypton", 83.798),
    (37, "Rb", "Rubidium", 85.468), (38, "Sr", "Strontium", 87.62), (39, "Y", "Yttrium", 88.906),
    (40, "Zr", "Zirconium", 91.224), (41, "Nb", "Niobium", 92.906), (42, "Mo", "Molybdenum", 95.95),
    (43, "Tc", "Technetium", 98.0), (44, "Ru", "Ruthenium", 101.07), (45, "Rh", "Rhodium", 102.91),
    (46, "Pd", "Palladium", 106.42), (47, "Ag", "Silver", 107.87), (48, "Cd", "Cadmium", 112.41),
    (49, "In", "Indium", 114.82), (50, "Sn", "Tin", 118.71), (51, "Sb", "Antimony", 121.76),
    (52, "Te", "Tellurium", 127.60), (53, "I", "Iodine", 126.90), (54, "Xe", "Xenon", 131.29),
    (55, "Cs", "Caesium", 132.91), (56, "Ba", "Barium", 137.33), (57, "La", "Lanthanum", 138.91),
    (58, "Ce", "Cerium", 140.12), (59, "Pr", "Praseodymium", 140.91), (60, "Nd", "Neodymium", 144.24),
    (61, "Pm", "Promethium", 145.0), (62, "Sm", "Samarium", 150.36), (63, "Eu", "Europium", 151.96),
    (64, "Gd", "Gadolinium", 157.25), (65, "Tb", "Terbium", 158.93), (66, "Dy", "Dysprosium", 162.50),
    (67, "Ho", "Holmium", 164.93), (68, "Er", "Erbium", 167.26), (69, "Tm", "Thulium", 168.93),
    (70, "Yb", "Ytterbium", 173.05), (71, "Lu", "Lutetium", 174.97), (72, "Hf", "Hafnium", 178.49),
    (73, "Ta", "Tantalum", 180.95), (74, "W", "Tungsten", 183.84), (75, "Re", "Rhenium", 186.21),
    (76, "Os", "Osmium", 190.23), (77, "Ir", "Iridium", 192.22), (78, "Pt", "Platinum", 195.08),
    (79, "Au", "Gold", 196.97), (80, "Hg", "Mercury", 200.59), (81, "Tl", "Thallium", 204.38),
    (82, "Pb", "Lead", 207.2), (83, "Bi", "Bismuth", 208.98), (84, "Po", "Polonium", 209.0),
    (85, "At", "Astatine", 210.0), (86, "Rn", "Radon", 222.0), (87, "Fr", "Francium", 223.0),
    (88, "Ra", "Radium", 226.0), (89, "Ac", "Actinium", 227.0), (90, "Th", "Thorium", 232.04),
    (91, "Pa", "Protactinium", 231.04), (92, "U", "Uranium", 238.03), (93, "Np", "Neptunium", 237.0),
    (94, "Pu", "Plutonium", 244.0), (95, "Am", "Americium", 243.0), (96, "Cm", "Curium", 247.0),
    (97, "Bk", "Berkelium", 247.0), (98, "Cf", "Californium", 251.0), (99, "Es", "Einsteinium", 252.0),
    (100, "Fm", "Fermium", 257.0), (101, "Md", "Mendelevium", 258.0), (102, "No", "Nobelium", 259.0),
    (103, "Lr", "Lawrencium", 266.0), (104, "Rf", "Rutherfordium", 267.0), (105, "Db", "Dubnium", 268.0),
    (106, "Sg", "Seaborgium", 269.0), (107, "Bh", "Bohrium", 270.0), (108, "Hs", "Hassium", 277.0),
    (109, "Mt", "Meitnerium", 278.0), (110, "Ds", "Darmstadtium", 281.0), (111, "Rg", "Roentgenium", 282.0),
    (112, "Cn", "Copernicium", 285.0), (113, "Nh", "Nihonium", 286.0), (114, "Fl", "Flerovium", 289.0),
    (115, "Mc", "Moscovium", 290.0), (116, "Lv", "Livermorium", 293.0), (117, "Ts", "Tennessine", 294.0),
    (118, "Og", "Oganesson", 294.0),
];

// (symbol, melting point K, boiling point K, electrons per shell)
// carbon and arsenic sublime at 1 atm
#[rustfmt::skip]
const PHYSICAL_DATA: &[(&str, Option<f64>, Option<f64>, &[u32])] = &[
    ("H", Some(13.99), Some(20.271), &[1]), ("He", Some(0.95), Some(4.222), &[2]),
    ("Li", Some(453.65), Some(1603.0), &[2, 1]), ("Be", Some(1560.0), Some(2742.0), &[2, 2]),
    ("B", Some(2349.0), Some(4200.0), &[2, 3]), ("C", None, None, &[2, 4]),
    ("N", Some(63.15), Some(77.355), &[2, 5]), ("O", Some(54.36), Some(90.188), &[2, 6]),
    ("F", Some(53.48), Some(85.03), &[2, 7]), ("Ne", Some(24.56), Some(27.104), &[2, 8]),
    ("Na", Some(370.944), Some(1156.09), &[2, 8, 1]), ("Mg", Some(923.0), Some(1363.0), &[2, 8, 2]),
    ("Al", Some(933.47), Some(2743.0), &[2, 8, 3]), ("Si", Some(1687.0), Some(3538.0), &[2, 8, 4]),
    ("P", Some(317.3), Some(553.7), &[2, 8, 5]), ("S", Some(388.36), Some(717.8), &[2, 8, 6]),
    ("Cl", Some(171.6), Some(239.11), &[2, 8, 7]), ("Ar", Some(83.81), Some(87.302), &[2, 8, 8]),
    ("K", Some(336.7), Some(1032.0), &[2, 8, 8, 1]), ("Ca", Some(1115.0), Some(1757.0), &[2, 8, 8, 2]),
    ("Sc", Some(1814.0), Some(3109.0), &[2, 8, 9, 2]), ("Ti", Some(1941.0), Some(3560.0), &[2, 8, 10, 2]),
    ("V", Some(2183.0), Some(3680.0), &[2, 8, 11, 2]), ("Cr", Some(2180.0), Some(2944.0), &[2, 8, 13, 1]),
    ("Mn", Some(1519.0), Some(2334.0), &[2, 8, 13, 2]), ("Fe", Some(1811.0), Some(3134.0), &[2, 8, 14, 2]),
    ("Co", Some(1768.0), Some(3200.0), &[2, 8, 15, 2]), ("Ni", Some(1728.0), Some(3003.0), &[2, 8, 16, 2]),
    ("Cu", Some(1357.77), Some(2835.0), &[2, 8, 18, 1]), ("Zn", Some(692.68), Some(1180.0), &[2, 8, 18, 2]),
    ("Ga", Some(302.9146), Some(2673.0), &[2, 8, 18, 3]), ("Ge", Some(1211.4), Some(3106.0), &[2, 8, 18, 4]),
    ("As", None, None, &[2, 8, 18, 5]), ("Se", Some(494.0), Some(958.0), &[2, 8, 18, 6]),
    ("Br", Some(265.8), Some(332.0), &[2, 8, 18, 7]), ("Kr", Some(115.78), Some(119.93), &[2, 8, 18, 8]),
    ("Ag", Some(1234.93), Some(2435.0), &[2, 8, 18, 18, 1]), ("Sn", Some(505.08), Some(2875.0), &[2, 8, 18, 18, 4]),
    ("I", Some(386.85), Some(457.4), &[2, 8, 18, 18, 7]), ("Xe", Some(161.4), Some(165.051), &[2, 8, 18, 18, 8]),
    ("Cs", Some(301.7), Some(944.0), &[2, 8, 18, 18, 8, 1]), ("W", Some(3695.0), Some(6203.0), &[2, 8, 18, 32, 12, 2]),
    ("Pt", Some(2041.4), Some(4098.0), &[2, 8, 18, 32, 17, 1]), ("Au", Some(1337.33), Some(3243.0), &[2, 8, 18, 32, 18, 1]),
    ("Hg", Some(234.321), Some(629.88), &[2, 8, 18, 32, 18, 2]), ("Pb", Some(600.61), Some(2022.0), &[2, 8, 18, 32, 18, 4]),
    ("Rn", Some(202.0), Some(211.3), &[2, 8, 18, 32, 18, 8]), ("U", Some(1405.3), Some(4404.0), &[2, 8, 18, 32, 21, 9, 2]),
];

/// Capitalises user input the way symbols are written: "fe" -> "Fe", "CL" -> "Cl"
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct PeriodicTable {
    by_symbol: HashMap<String, ElementData>,
}

impl PeriodicTable {
    pub fn builtin() -> Self {
        let by_symbol = ELEMENTS
            .iter()
            .map(|&(number, symbol, name, atomic_mass)| {
                (
                    symbol.to_string(),
                    ElementData {
                        number,
                        symbol: symbol.to_string(),
                        name: name.to_string(),
                        atomic_mass,
                        ..Default::default()
                    },
                )
            })
            .collect::<HashMap<_, _>>();
        let mut table = PeriodicTable { by_symbol };
        for &(symbol, melt, boil, shells) in PHYSICAL_DATA {
            if let Some(element) = table.by_symbol.get_mut(symbol) {
                element.melt = melt;
                element.boil = boil;
                element.shells = shells.to_vec();
            }
        }
        table
    }

    pub fn from_elements(elements: Vec<ElementData>) -> Result<Self, PeriodicTableError> {
        if elements.is_empty() {
            return Err(PeriodicTableError::Empty);
        }
        let mut by_symbol = HashMap::new();
        for element in elements {
            if let Some(previous) = by_symbol.insert(element.symbol.clone(), element) {
                warn!("Duplicate entry for element '{}' replaced", previous.symbol);
            }
        }
        Ok(PeriodicTable { by_symbol })
    }

    pub fn from_json_str(content: &str) -> Result<Self, PeriodicTableError> {
        let elements = match serde_json::from_str::<PeriodicTableFile>(content)? {
            PeriodicTableFile::Wrapped { elements } => elements,
            PeriodicTableFile::Bare(elements) => elements,
        };
        Self::from_elements(elements)
    }

    /// Loads a PeriodicTableJSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PeriodicTableError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;
        info!(
            "Loaded {} elements from periodic table file '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, symbol: &str) -> Option<&ElementData> {
        self.by_symbol.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Elements ordered by atomic number
    pub fn elements(&self) -> Vec<&ElementData> {
        let mut elements: Vec<&ElementData> = self.by_symbol.values().collect();
        elements.sort_by(|a, b| a.number.cmp(&b.number).then(a.symbol.cmp(&b.symbol)));
        elements
    }

    /// symbol -> atomic mass, the lookup consumed by mass accumulation
    pub fn mass_table(&self) -> HashMap<String, f64> {
        self.by_symbol
            .iter()
            .map(|(symbol, element)| (symbol.clone(), element.atomic_mass))
            .collect()
    }

    /// Protons and neutrons of the isotope `mass_number` of an element.
    /// The symbol is capitalised first, so "c" and "C" are the same element.
    pub fn isotope(&self, symbol: &str, mass_number: u32) -> Result<Isotope, PeriodicTableError> {
        let symbol = normalize_symbol(symbol);
        let element = self
            .get(&symbol)
            .ok_or_else(|| PeriodicTableError::UnknownElement(symbol.clone()))?;
        let protons = element.number;
        let neutrons = mass_number.checked_sub(protons).ok_or_else(|| {
            PeriodicTableError::MassNumberTooSmall {
                symbol: symbol.clone(),
                mass_number,
                atomic_number: protons,
            }
        })?;
        Ok(Isotope {
            symbol: element.symbol.clone(),
            name: element.name.clone(),
            mass_number,
            protons,
            neutrons,
        })
    }
}

impl PeriodicTable {
    /// Solid below the melting point, liquid up to the boiling point, gas from there on.
    /// `temperature` is in kelvin.
    pub fn phase_at(
        &self,
        symbol: &str,
        temperature: f64,
    ) -> Result<PhasePrediction, PeriodicTableError> {
        if temperature < 0.0 {
            return Err(PeriodicTableError::BelowAbsoluteZero(temperature));
        }
        let symbol = normalize_symbol(symbol);
        let element = self
            .get(&symbol)
            .ok_or_else(|| PeriodicTableError::UnknownElement(symbol.clone()))?;
        let (Some(melt), Some(boil)) = (element.melt, element.boil) else {
            return Err(PeriodicTableError::NoPhaseData(symbol));
        };
        let phase = if temperature < melt {
            Phase::Solid
        } else if temperature < boil {
            Phase::Liquid
        } else {
            Phase::Gas
        };
        Ok(PhasePrediction {
            symbol,
            melt,
            boil,
            temperature,
            phase,
        })
    }

    /// Electron shell occupation, innermost shell first
    pub fn shells(&self, symbol: &str) -> Result<&[u32], PeriodicTableError> {
        let symbol = normalize_symbol(symbol);
        let element = self
            .get(&symbol)
            .ok_or_else(|| PeriodicTableError::UnknownElement(symbol.clone()))?;
        if element.shells.is_empty() {
            return Err(PeriodicTableError::NoShellData(symbol));
        }
        Ok(&element.shells)
    }
}

impl Default for PeriodicTable {
    fn default() -> Self {
        Self::builtin()
    }
}
