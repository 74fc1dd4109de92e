// src/model/elements.rs

/// Approximate atomic scattering factor for an element symbol.
///
/// Uses the atomic number Z, which is adequate for the relative ring
/// intensities this simulation reports (the angular falloff cancels to
/// first order once intensities are rescaled to the strongest peak).
pub fn scattering_factor(element: &str) -> f64 {
    match element {
        // --- Period 1 ---
        "H" => 1.0,
        "He" => 2.0,
        // --- Period 2 ---
        "Li" => 3.0, "Be" => 4.0, "B" => 5.0, "C" => 6.0, "N" => 7.0,
        "O" => 8.0, "F" => 9.0, "Ne" => 10.0,
        // --- Period 3 ---
        "Na" => 11.0, "Mg" => 12.0, "Al" => 13.0, "Si" => 14.0, "P" => 15.0,
        "S" => 16.0, "Cl" => 17.0, "Ar" => 18.0,
        // --- Period 4 ---
        "K" => 19.0, "Ca" => 20.0, "Sc" => 21.0, "Ti" => 22.0, "V" => 23.0,
        "Cr" => 24.0, "Mn" => 25.0, "Fe" => 26.0, "Co" => 27.0, "Ni" => 28.0,
        "Cu" => 29.0, "Zn" => 30.0, "Ga" => 31.0, "Ge" => 32.0, "As" => 33.0,
        "Se" => 34.0, "Br" => 35.0, "Kr" => 36.0,
        // --- Period 5 (selected) ---
        "Rb" => 37.0, "Sr" => 38.0, "Y" => 39.0, "Zr" => 40.0, "Nb" => 41.0,
        "Mo" => 42.0, "Ag" => 47.0, "Cd" => 48.0, "In" => 49.0, "Sn" => 50.0,
        "Sb" => 51.0, "Te" => 52.0, "I" => 53.0, "Xe" => 54.0,
        // --- Period 6 (selected) ---
        "Cs" => 55.0, "Ba" => 56.0, "La" => 57.0, "W" => 74.0, "Pt" => 78.0,
        "Au" => 79.0, "Pb" => 82.0, "Bi" => 83.0,
        // Carbon-like fallback for anything unlisted
        _ => 6.0,
    }
}
