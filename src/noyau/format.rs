// src/noyau/format.rs
//
// Affichage des nombres pour la démarche et les résultats.
// - décimales significatives bornées, zéros de fin retirés (4, pas 4.0000000000)
// - notation scientifique pour les très grands / très petits
// - matrices [a,b;c,d], complexes 3+4i

use num_complex::Complex64;

use super::matrice::Matrix;

/// Seuil au-delà duquel on passe en notation scientifique.
const GRAND: f64 = 1e15;

/// Nombre -> texte avec au plus `digits` décimales.
pub fn nombre(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    let a = x.abs();
    let minuscule = 10f64.powi(-(digits.max(1) as i32));
    if a >= GRAND || a < minuscule {
        let s = format!("{:.*e}", digits, x);
        return match s.split_once('e') {
            Some((mantisse, exposant)) => format!("{}e{exposant}", sans_zeros(mantisse)),
            None => s,
        };
    }

    let s = sans_zeros(&format!("{:.*}", digits, x));
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// "2.5000" -> "2.5" ; "4.000" -> "4"
fn sans_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Matrice -> "[a,b;c,d]" (précision bornée, pour la démarche).
pub fn matrice(m: &Matrix, digits: usize) -> String {
    let lignes: Vec<String> = m
        .lignes()
        .iter()
        .map(|ligne| {
            ligne
                .iter()
                .map(|x| nombre(*x, digits))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    format!("[{}]", lignes.join(";"))
}

/// Complexe -> "3+4i", "3-4i", "2i", "5".
pub fn complexe(z: Complex64, digits: usize) -> String {
    let re = nombre(z.re, digits);
    let im = nombre(z.im.abs(), digits);

    if z.im == 0.0 || (im == "0" && !z.im.is_nan()) {
        return re;
    }
    let signe = if z.im < 0.0 { "-" } else { "+" };
    if z.re == 0.0 {
        let signe = if z.im < 0.0 { "-" } else { "" };
        return format!("{signe}{im}i");
    }
    format!("{re}{signe}{im}i")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entiers_sans_decimales() {
        assert_eq!(nombre(4.0, 10), "4");
        assert_eq!(nombre(-2.0, 10), "-2");
        assert_eq!(nombre(0.0, 10), "0");
        assert_eq!(nombre(-0.0, 10), "0");
    }

    #[test]
    fn decimales_tronquees() {
        assert_eq!(nombre(0.1 + 0.2, 10), "0.3");
        assert_eq!(nombre(1.0 / 3.0, 4), "0.3333");
        assert_eq!(nombre(2.5, 10), "2.5");
    }

    #[test]
    fn scientifique() {
        assert_eq!(nombre(1.5e20, 10), "1.5e20");
        assert_eq!(nombre(2.0e-12, 10), "2e-12");
    }

    #[test]
    fn non_finis() {
        assert_eq!(nombre(f64::NAN, 10), "NaN");
        assert_eq!(nombre(f64::INFINITY, 10), "inf");
        assert_eq!(nombre(f64::NEG_INFINITY, 10), "-inf");
    }

    #[test]
    fn complexes() {
        assert_eq!(complexe(Complex64::new(3.0, 4.0), 10), "3+4i");
        assert_eq!(complexe(Complex64::new(3.0, -4.0), 10), "3-4i");
        assert_eq!(complexe(Complex64::new(0.0, 2.0), 10), "2i");
        assert_eq!(complexe(Complex64::new(5.0, 0.0), 10), "5");
    }

    #[test]
    fn matrices() {
        let m: Matrix = "[1,2.5;3,4]".parse().unwrap();
        assert_eq!(matrice(&m, 10), "[1,2.5;3,4]");
    }
}
