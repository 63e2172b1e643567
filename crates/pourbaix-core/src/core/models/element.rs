use phf::{Map, phf_map};
use std::cmp::Ordering;

/// Static properties of a chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    /// Atomic number.
    pub z: u8,
    /// Pauling electronegativity, if tabulated.
    pub electronegativity: Option<f64>,
}

const fn el(z: u8, x: f64) -> ElementData {
    ElementData {
        z,
        electronegativity: Some(x),
    }
}

const fn el_nox(z: u8) -> ElementData {
    ElementData {
        z,
        electronegativity: None,
    }
}

static PERIODIC_TABLE: Map<&'static str, ElementData> = phf_map! {
    "H" => el(1, 2.20), "He" => el_nox(2),
    "Li" => el(3, 0.98), "Be" => el(4, 1.57), "B" => el(5, 2.04), "C" => el(6, 2.55),
    "N" => el(7, 3.04), "O" => el(8, 3.44), "F" => el(9, 3.98), "Ne" => el_nox(10),
    "Na" => el(11, 0.93), "Mg" => el(12, 1.31), "Al" => el(13, 1.61), "Si" => el(14, 1.90),
    "P" => el(15, 2.19), "S" => el(16, 2.58), "Cl" => el(17, 3.16), "Ar" => el_nox(18),
    "K" => el(19, 0.82), "Ca" => el(20, 1.00), "Sc" => el(21, 1.36), "Ti" => el(22, 1.54),
    "V" => el(23, 1.63), "Cr" => el(24, 1.66), "Mn" => el(25, 1.55), "Fe" => el(26, 1.83),
    "Co" => el(27, 1.88), "Ni" => el(28, 1.91), "Cu" => el(29, 1.90), "Zn" => el(30, 1.65),
    "Ga" => el(31, 1.81), "Ge" => el(32, 2.01), "As" => el(33, 2.18), "Se" => el(34, 2.55),
    "Br" => el(35, 2.96), "Kr" => el(36, 3.00),
    "Rb" => el(37, 0.82), "Sr" => el(38, 0.95), "Y" => el(39, 1.22), "Zr" => el(40, 1.33),
    "Nb" => el(41, 1.6), "Mo" => el(42, 2.16), "Tc" => el(43, 1.9), "Ru" => el(44, 2.2),
    "Rh" => el(45, 2.28), "Pd" => el(46, 2.20), "Ag" => el(47, 1.93), "Cd" => el(48, 1.69),
    "In" => el(49, 1.78), "Sn" => el(50, 1.96), "Sb" => el(51, 2.05), "Te" => el(52, 2.1),
    "I" => el(53, 2.66), "Xe" => el(54, 2.60),
    "Cs" => el(55, 0.79), "Ba" => el(56, 0.89), "La" => el(57, 1.10), "Ce" => el(58, 1.12),
    "Pr" => el(59, 1.13), "Nd" => el(60, 1.14), "Pm" => el(61, 1.13), "Sm" => el(62, 1.17),
    "Eu" => el(63, 1.2), "Gd" => el(64, 1.2), "Tb" => el(65, 1.1), "Dy" => el(66, 1.22),
    "Ho" => el(67, 1.23), "Er" => el(68, 1.24), "Tm" => el(69, 1.25), "Yb" => el(70, 1.1),
    "Lu" => el(71, 1.27), "Hf" => el(72, 1.3), "Ta" => el(73, 1.5), "W" => el(74, 2.36),
    "Re" => el(75, 1.9), "Os" => el(76, 2.2), "Ir" => el(77, 2.20), "Pt" => el(78, 2.28),
    "Au" => el(79, 2.54), "Hg" => el(80, 2.00), "Tl" => el(81, 1.62), "Pb" => el(82, 2.33),
    "Bi" => el(83, 2.02), "Po" => el(84, 2.0), "At" => el(85, 2.2), "Rn" => el_nox(86),
    "Fr" => el(87, 0.7), "Ra" => el(88, 0.9), "Ac" => el(89, 1.1), "Th" => el(90, 1.3),
    "Pa" => el(91, 1.5), "U" => el(92, 1.38), "Np" => el(93, 1.36), "Pu" => el(94, 1.28),
    "Am" => el(95, 1.3), "Cm" => el(96, 1.3), "Bk" => el(97, 1.3), "Cf" => el(98, 1.3),
    "Es" => el(99, 1.3), "Fm" => el(100, 1.3), "Md" => el(101, 1.3), "No" => el(102, 1.3),
    "Lr" => el(103, 1.3),
};

pub fn lookup(symbol: &str) -> Option<&'static ElementData> {
    PERIODIC_TABLE.get(symbol)
}

pub fn is_element(symbol: &str) -> bool {
    PERIODIC_TABLE.contains_key(symbol)
}

/// Ordering used when writing formulas: ascending electronegativity, then
/// atomic number. Elements without a tabulated electronegativity go last.
pub fn formula_order(a: &str, b: &str) -> Ordering {
    let key = |s: &str| {
        lookup(s)
            .map(|d| (d.electronegativity.unwrap_or(f64::INFINITY), d.z))
            .unwrap_or((f64::INFINITY, u8::MAX))
    };
    let (xa, za) = key(a);
    let (xb, zb) = key(b);
    xa.partial_cmp(&xb)
        .unwrap_or(Ordering::Equal)
        .then(za.cmp(&zb))
        .then_with(|| a.cmp(b))
}
