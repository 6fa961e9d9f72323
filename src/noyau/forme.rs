// src/noyau/forme.rs
//
// Classification d’une expression, calculée une seule fois avant l’aiguillage.
// Ordre (premier qui correspond) : matrice, complexe, équation, scalaire.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forme {
    Scalaire,
    Matrice,
    Complexe,
    Equation,
}

impl Forme {
    pub fn classer(expr: &str) -> Forme {
        if expr.contains('[') {
            Forme::Matrice
        } else if contient_unite_imaginaire(expr) {
            Forme::Complexe
        } else if expr.contains('=') {
            Forme::Equation
        } else {
            Forme::Scalaire
        }
    }
}

/// Un 'i' isolé (pas dans un mot : "sin", "pi", "k2i" ne comptent pas).
fn contient_unite_imaginaire(expr: &str) -> bool {
    let chars: Vec<char> = expr.chars().collect();
    let mot = |c: char| c.is_ascii_alphanumeric() || c == '_';

    chars.iter().enumerate().any(|(k, c)| {
        if *c != 'i' || chars.get(k + 1).is_some_and(|n| mot(*n)) {
            return false;
        }
        // début du bloc alphanumérique qui se termine par ce 'i'
        let debut = chars[..k]
            .iter()
            .rposition(|p| !mot(*p))
            .map_or(0, |p| p + 1);
        // "4i", "2.5i" : nombre + i ; "xi", "k2i" : identifiant
        debut == k || chars[debut].is_ascii_digit()
    })
}
