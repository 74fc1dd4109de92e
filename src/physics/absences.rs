// src/physics/absences.rs
//
// Systematic-absence filter: which (hkl) survive the integral reflection
// conditions of a given space group. General-position absences come from
// the lattice centering translations, so one centering tag per group is the
// whole rule; the table below covers all 230 groups in their standard
// settings (ITA; monoclinic unique axis b, rhombohedral groups on
// hexagonal axes, obverse).

use crate::error::{Result, SimError};

/// Lattice centering of a space group's standard setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    /// Primitive: every reflection allowed.
    P,
    /// A-face centred: k + l even.
    A,
    /// C-face centred: h + k even.
    C,
    /// Body centred: h + k + l even.
    I,
    /// All-face centred: h, k, l all even or all odd.
    F,
    /// Rhombohedral (hexagonal axes, obverse): −h + k + l ≡ 0 (mod 3).
    R,
}

impl Centering {
    pub fn allows(self, h: i32, k: i32, l: i32) -> bool {
        match self {
            Centering::P => true,
            Centering::A => (k + l).rem_euclid(2) == 0,
            Centering::C => (h + k).rem_euclid(2) == 0,
            Centering::I => (h + k + l).rem_euclid(2) == 0,
            Centering::F => {
                let (hp, kp, lp) = (h.rem_euclid(2), k.rem_euclid(2), l.rem_euclid(2));
                hp == kp && kp == lp
            }
            Centering::R => (-h + k + l).rem_euclid(3) == 0,
        }
    }
}

use Centering::{A, C, F, I, P, R};

/// Centering by space-group number, indexed by number − 1.
#[rustfmt::skip]
const CENTERING_BY_GROUP: [Centering; 230] = [
    // 1-2: triclinic
    P, P,
    // 3-15: monoclinic (C2, Cm, Cc, C2/m, C2/c centred)
    P, P, C, P, P, C, C, P, P, C, P, P, C,
    // 16-24: orthorhombic 222
    P, P, P, P, C, C, F, I, I,
    // 25-46: orthorhombic mm2
    P, P, P, P, P, P, P, P, P, P,
    C, C, C, A, A, A, A, F, F, I, I, I,
    // 47-74: orthorhombic mmm
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P,
    C, C, C, C, C, C, F, F, I, I, I, I,
    // 75-88: tetragonal 4 and 4/m
    P, P, P, P, I, I, P, I, P, P, P, P, I, I,
    // 89-98: tetragonal 422
    P, P, P, P, P, P, P, P, I, I,
    // 99-110: tetragonal 4mm
    P, P, P, P, P, P, P, P, I, I, I, I,
    // 111-122: tetragonal -42m / -4m2
    P, P, P, P, P, P, P, P, I, I, I, I,
    // 123-142: tetragonal 4/mmm
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P,
    I, I, I, I,
    // 143-167: trigonal (R groups on hexagonal axes)
    P, P, P, R, P, R,
    P, P, P, P, P, P, R,
    P, P, P, P, R, R,
    P, P, P, P, R, R,
    // 168-194: hexagonal
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P,
    P, P, P, P, P, P, P, P, P, P, P,
    // 195-206: cubic 23 and m-3
    P, F, I, P, I,
    P, P, F, F, I, P, I,
    // 207-220: cubic 432 and -43m
    P, P, F, F, I, P, P, I,
    P, F, I, P, F, I,
    // 221-230: cubic m-3m
    P, P, P, P, F, F, F, F, I, I,
];

/// Look up the extinction rule for a space group, or fail for an id outside
/// 1..=230.
pub fn rule_for(space_group: u16) -> Result<Centering> {
    if !(1..=230).contains(&space_group) {
        return Err(SimError::UnknownSpaceGroup(space_group));
    }
    Ok(CENTERING_BY_GROUP[(space_group - 1) as usize])
}

/// Reflection-condition filter: true when (hkl) is not systematically
/// absent in the given space group. Pure function of its arguments.
pub fn allowed(h: i32, k: i32, l: i32, space_group: u16) -> Result<bool> {
    Ok(rule_for(space_group)?.allows(h, k, l))
}
