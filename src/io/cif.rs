// src/io/cif.rs

use crate::error::{Result, SimError};
use crate::model::{Atom, Structure, UnitCell};
use crate::utils::linalg;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a CIF file into a Structure with Cartesian atom positions.
///
/// Reads the six cell parameters, the symmetry-operation loop and the
/// atom-site loop, expands the asymmetric unit through the listed
/// operations, and converts fractional to Cartesian coordinates.
pub fn parse(path: &Path) -> Result<Structure> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| SimError::StructureRead {
        path: display.clone(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let mut a = 0.0;
    let mut b = 0.0;
    let mut c = 0.0;
    let mut alpha = 90.0;
    let mut beta = 90.0;
    let mut gamma = 90.0;

    let mut symmetry_ops: Vec<String> = Vec::new();
    let mut base_atoms: Vec<(String, [f64; 3])> = Vec::new();
    let mut tables_number: Option<i32> = None;

    let mut in_loop = false;
    let mut loop_headers: Vec<String> = Vec::new();

    for line_res in reader.lines() {
        let line = line_res.map_err(|e| SimError::StructureRead {
            path: display.clone(),
            source: e,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // 1. Cell parameters and header tags
        if trimmed.starts_with("_cell_length_a") {
            a = tag_value(trimmed);
        } else if trimmed.starts_with("_cell_length_b") {
            b = tag_value(trimmed);
        } else if trimmed.starts_with("_cell_length_c") {
            c = tag_value(trimmed);
        } else if trimmed.starts_with("_cell_angle_alpha") {
            alpha = tag_value(trimmed);
        } else if trimmed.starts_with("_cell_angle_beta") {
            beta = tag_value(trimmed);
        } else if trimmed.starts_with("_cell_angle_gamma") {
            gamma = tag_value(trimmed);
        } else if trimmed.starts_with("_symmetry_Int_Tables_number") {
            tables_number = Some(tag_value(trimmed) as i32);
        }

        // 2. Loop handling
        if trimmed.starts_with("loop_") {
            in_loop = true;
            loop_headers.clear();
            continue;
        }
        if in_loop && trimmed.starts_with('_') {
            loop_headers.push(trimmed.to_string());
            continue;
        }
        if in_loop {
            if trimmed.starts_with("data_") || trimmed.starts_with("loop_") {
                in_loop = false;
                continue;
            }

            let is_atom_loop = loop_headers
                .iter()
                .any(|h| h.contains("_atom_site_fract_x"));
            let is_sym_loop = loop_headers
                .iter()
                .any(|h| h.contains("_symmetry_equiv_pos_as_xyz"));

            if is_sym_loop {
                if let Some(op) = extract_symmetry_op(trimmed) {
                    symmetry_ops.push(op);
                }
            } else if is_atom_loop {
                if let Some(atom) = parse_atom_row(trimmed, &loop_headers) {
                    base_atoms.push(atom);
                }
            }
        }
    }

    if a <= 0.0 || b <= 0.0 || c <= 0.0 {
        return Err(SimError::StructureParse {
            path: display,
            reason: "missing or non-positive cell lengths".to_string(),
        });
    }
    if base_atoms.is_empty() {
        return Err(SimError::StructureParse {
            path: display,
            reason: "no atom sites found".to_string(),
        });
    }
    if symmetry_ops.is_empty() {
        symmetry_ops.push("x,y,z".to_string());
    }
    if let Some(n) = tables_number {
        log::debug!("CIF declares space group #{}", n);
    }

    // 3. Expand the asymmetric unit
    let epsilon = 0.001;
    let mut frac_atoms: Vec<(String, [f64; 3])> = Vec::new();

    for (element, pos) in &base_atoms {
        for op in &symmetry_ops {
            let new_pos = apply_symmetry(*pos, op);
            let wrapped = [
                new_pos[0].rem_euclid(1.0),
                new_pos[1].rem_euclid(1.0),
                new_pos[2].rem_euclid(1.0),
            ];

            // Duplicate check, direct and wrap-around distance
            let is_duplicate = frac_atoms.iter().any(|(_, existing)| {
                (0..3).all(|i| {
                    let d = (existing[i] - wrapped[i]).abs();
                    d < epsilon || (1.0 - d) < epsilon
                })
            });

            if !is_duplicate {
                frac_atoms.push((element.clone(), wrapped));
            }
        }
    }

    // 4. Lattice construction and Cartesian conversion
    let cell = UnitCell {
        a,
        b,
        c,
        alpha,
        beta,
        gamma,
    };
    let lattice = linalg::lattice_from_parameters(&cell);

    let atoms: Vec<Atom> = frac_atoms
        .into_iter()
        .map(|(element, frac)| Atom {
            element,
            position: linalg::frac_to_cart(frac, lattice),
        })
        .collect();

    let mut structure = Structure {
        lattice,
        atoms,
        formula: String::new(),
    };
    structure.formula = structure.formula_from_atoms();

    Ok(structure)
}

/// Pull the symmetry string out of a loop row, tolerating optional leading
/// indices and quotes ("1 'x, y, z'" and plain "x,y,z" both work).
fn extract_symmetry_op(row: &str) -> Option<String> {
    let full = row.replace('\'', "").replace('"', "");

    if let Some(op_start) = full.find(|ch: char| ch.is_alphabetic() && "xyz".contains(ch)) {
        if let Some(idx) = full[..op_start].rfind(|ch: char| ch.is_numeric()) {
            return Some(full[idx + 1..].trim().to_string());
        }
        return Some(full.trim().to_string());
    }
    if full.contains(',') {
        let op = full.trim_start_matches(|ch: char| ch.is_numeric() || ch.is_whitespace());
        return Some(op.to_string());
    }
    None
}

fn parse_atom_row(row: &str, headers: &[String]) -> Option<(String, [f64; 3])> {
    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let mut label = "X".to_string();
    let mut frac = [0.0; 3];

    for (i, header) in headers.iter().enumerate() {
        if i >= parts.len() {
            break;
        }
        let val = parts[i];
        if header.contains("_atom_site_label") || header.contains("_atom_site_type_symbol") {
            label = val.chars().filter(|ch| ch.is_alphabetic()).collect();
        } else if header.contains("_atom_site_fract_x") {
            frac[0] = numeric_value(val);
        } else if header.contains("_atom_site_fract_y") {
            frac[1] = numeric_value(val);
        } else if header.contains("_atom_site_fract_z") {
            frac[2] = numeric_value(val);
        }
    }

    Some((label, frac))
}

fn apply_symmetry(p: [f64; 3], op: &str) -> [f64; 3] {
    let parts: Vec<&str> = op.split(',').collect();
    if parts.len() != 3 {
        return p;
    }
    [
        evaluate_expr(parts[0], p),
        evaluate_expr(parts[1], p),
        evaluate_expr(parts[2], p),
    ]
}

// Tokenizer over +/- separated terms; each term is ±x/±y/±z or a fraction
fn evaluate_expr(expr: &str, p: [f64; 3]) -> f64 {
    let s = expr.replace(' ', "").to_lowercase();
    let mut val = 0.0;
    let mut term = String::new();

    for ch in s.chars() {
        if (ch == '+' || ch == '-') && !term.is_empty() {
            val += evaluate_term(&term, p);
            term.clear();
        }
        term.push(ch);
    }
    if !term.is_empty() {
        val += evaluate_term(&term, p);
    }

    val
}

fn evaluate_term(term: &str, p: [f64; 3]) -> f64 {
    let mut t = term.to_string();

    let mut sign = 1.0;
    if t.starts_with('-') {
        sign = -1.0;
        t.remove(0);
    } else if t.starts_with('+') {
        t.remove(0);
    }

    if t.contains('x') {
        return sign * p[0];
    } else if t.contains('y') {
        return sign * p[1];
    } else if t.contains('z') {
        return sign * p[2];
    }

    if let Some(idx) = t.find('/') {
        let num: f64 = t[..idx].parse().unwrap_or(0.0);
        let den: f64 = t[idx + 1..].parse().unwrap_or(1.0);
        sign * (num / den)
    } else {
        sign * t.parse::<f64>().unwrap_or(0.0)
    }
}

/// Value after a CIF tag name.
fn tag_value(line: &str) -> f64 {
    match line.find(char::is_whitespace) {
        Some(idx) => numeric_value(line[idx..].trim()),
        None => 0.0,
    }
}

/// CIF numbers may carry a trailing uncertainty like "4.1500(3)".
fn numeric_value(s: &str) -> f64 {
    let clean: String = s.chars().take_while(|ch| *ch != '(').collect();
    clean.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSCL_CIF: &str = "\
data_CsCl
_symmetry_space_group_name_H-M 'P m -3 m'
_symmetry_Int_Tables_number 221
_cell_length_a    4.1200(5)
_cell_length_b    4.1200
_cell_length_c    4.1200
_cell_angle_alpha 90.0
_cell_angle_beta  90.0
_cell_angle_gamma 90.0
loop_
 _symmetry_equiv_pos_as_xyz
 'x, y, z'
loop_
 _atom_site_label
 _atom_site_fract_x
 _atom_site_fract_y
 _atom_site_fract_z
 Cs1 0.0 0.0 0.0
 Cl1 0.5 0.5 0.5
";

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_cell_atoms_and_uncertainty_suffix() {
        let path = write_temp("ringsim_cscl_test.cif", CSCL_CIF);
        let structure = parse(&path).unwrap();

        assert_eq!(structure.atoms.len(), 2);
        let (a, b, c, alpha, _, _) = structure.cell_parameters();
        assert!((a - 4.12).abs() < 1e-9);
        assert!((b - 4.12).abs() < 1e-9);
        assert!((c - 4.12).abs() < 1e-9);
        assert!((alpha - 90.0).abs() < 1e-9);

        // Second atom at the body center, in Cartesian Å
        let cl = &structure.atoms[1];
        assert_eq!(cl.element, "Cl");
        for coord in cl.position {
            assert!((coord - 2.06).abs() < 1e-9);
        }
        assert_eq!(structure.formula, "Cs1 Cl1");
    }

    #[test]
    fn symmetry_ops_expand_the_asymmetric_unit() {
        let cif = "\
data_test
_cell_length_a    4.0
_cell_length_b    4.0
_cell_length_c    4.0
_cell_angle_alpha 90.0
_cell_angle_beta  90.0
_cell_angle_gamma 90.0
loop_
 _symmetry_equiv_pos_as_xyz
 'x, y, z'
 '-x, -y, z+1/2'
loop_
 _atom_site_label
 _atom_site_fract_x
 _atom_site_fract_y
 _atom_site_fract_z
 C1 0.25 0.25 0.0
";
        let path = write_temp("ringsim_symm_test.cif", cif);
        let structure = parse(&path).unwrap();

        // One site, two operations, no overlap
        assert_eq!(structure.atoms.len(), 2);
        let second = &structure.atoms[1];
        assert!((second.position[0] - 3.0).abs() < 1e-9); // -0.25 wraps to 0.75
        assert!((second.position[1] - 3.0).abs() < 1e-9);
        assert!((second.position[2] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_atoms_is_a_parse_error() {
        let path = write_temp(
            "ringsim_empty_test.cif",
            "data_x\n_cell_length_a 4.0\n_cell_length_b 4.0\n_cell_length_c 4.0\n",
        );
        assert!(matches!(
            parse(&path),
            Err(SimError::StructureParse { .. })
        ));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let path = std::path::Path::new("/nonexistent/ringsim.cif");
        assert!(matches!(parse(path), Err(SimError::StructureRead { .. })));
    }
}
