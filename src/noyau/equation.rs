// src/noyau/equation.rs
//
// Équations linéaires à une inconnue : a·x + b = c
// ------------------------------------------------
// 1) un seul '='
// 2) inconnue = première lettre hors noms de fonctions
// 3) garde structurelle : Lineaire | NonSupportee (rien au-delà de ax + b = c)
// 4) a·x = c - b ; a = 0 => infinité / aucune solution
//
// Le membre droit est une expression numérique évaluée par le pipeline scalaire.

use std::fmt;

use log::debug;
use num_rational::Ratio;

use super::config::Config;
use super::erreur::{EvalError, Resultat};
use super::eval::evaluer_scalaire;
use super::format::nombre;
use super::variables::Variables;

/// Noms ignorés lors de la recherche de l’inconnue.
const FONCTIONS_IGNOREES: [&str; 6] = ["sin", "cos", "tan", "log", "ln", "sqrt"];

/// Dénominateur max pour l’affichage fractionnaire d’une solution.
const DENOMINATEUR_MAX: i64 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Solution {
    Unique { variable: char, valeur: f64 },
    Infinite,
    Aucune,
}

impl Solution {
    pub fn texte(&self, digits: usize) -> String {
        match self {
            Solution::Unique { variable, valeur } => {
                format!("{variable} = {}", nombre(*valeur, digits))
            }
            Solution::Infinite => "infinite solutions".to_string(),
            Solution::Aucune => "no solution".to_string(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.texte(Config::default().digits))
    }
}

/// Membre gauche reconnu : coefficient·x + constante.
#[derive(Clone, Debug, PartialEq)]
enum FormeGauche {
    Lineaire { coefficient: f64, constante: f64 },
    NonSupportee,
}

/// Résout "2x + 3 = 7" -> (x = 2, démarche).
pub fn resoudre(expr: &str, cfg: &Config) -> Resultat<(Solution, Vec<String>)> {
    let s = expr.trim();
    if s.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    // 1) un seul '='
    let parties: Vec<&str> = s.split('=').collect();
    let [gauche, droite] = parties.as_slice() else {
        return Err(EvalError::InvalidEquation);
    };
    if droite.trim().is_empty() {
        return Err(EvalError::InvalidEquation);
    }

    // 2) inconnue
    let x = inconnue(s).ok_or(EvalError::NoVariableFound)?;
    debug!("équation {s:?} : inconnue {x}");

    let d = cfg.digits;
    let mut etapes = vec![
        format!("équation : {s}"),
        format!("inconnue : {x}"),
    ];

    // 3) garde structurelle
    let (a, b) = match analyser_gauche(gauche, x) {
        FormeGauche::Lineaire {
            coefficient,
            constante,
        } => (coefficient, constante),
        FormeGauche::NonSupportee => return Err(EvalError::EquationTooComplex),
    };
    let c = membre_droit(droite, cfg)?;

    etapes.push(format!(
        "forme a·{x} + b = c : a = {}, b = {}, c = {}",
        nombre(a, d),
        nombre(b, d),
        nombre(c, d)
    ));

    // 4) isoler le terme en x
    let k = c - b;
    let transfert = if b < 0.0 {
        format!("{} + {}", nombre(c, d), nombre(-b, d))
    } else {
        format!("{} - {}", nombre(c, d), nombre(b, d))
    };
    etapes.push(format!("{}{x} = {transfert} = {}", nombre(a, d), nombre(k, d)));

    if a == 0.0 {
        return if k == 0.0 {
            etapes.push(format!("0 = 0 : toute valeur de {x} convient"));
            Ok((Solution::Infinite, etapes))
        } else {
            etapes.push(format!("0 = {} : impossible", nombre(k, d)));
            Ok((Solution::Aucune, etapes))
        };
    }

    let v = k / a;
    etapes.push(format!(
        "{x} = {} / {} = {}",
        nombre(k, d),
        nombre(a, d),
        nombre(v, d)
    ));
    if let Some(r) = fraction_approchee(v) {
        etapes.push(format!("{x} ≈ {r}"));
    }

    Ok((
        Solution::Unique {
            variable: x,
            valeur: v,
        },
        etapes,
    ))
}

/// Première lettre qui n’appartient pas à un nom de fonction reconnu.
fn inconnue(s: &str) -> Option<char> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_alphabetic() {
            i += 1;
        }
        let mot: String = chars[start..i].iter().collect();
        if !FONCTIONS_IGNOREES.contains(&mot.to_lowercase().as_str()) {
            return Some(chars[start]);
        }
    }
    None
}

/// Membre gauche = somme de termes "[±]nombre" et d’un seul "[±][nombre][*]x".
fn analyser_gauche(gauche: &str, x: char) -> FormeGauche {
    let chars: Vec<char> = gauche.chars().filter(|c| !c.is_whitespace()).collect();
    let mut i = 0;
    let mut termes_x = 0;
    let mut coefficient = 0.0;
    let mut constante = 0.0;

    while i < chars.len() {
        // signe : obligatoire entre deux termes
        let signe = match chars[i] {
            '+' => {
                i += 1;
                1.0
            }
            '-' => {
                i += 1;
                -1.0
            }
            _ if i == 0 => 1.0,
            _ => return FormeGauche::NonSupportee,
        };

        let debut = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        let nombre_txt: String = chars[debut..i].iter().collect();
        let valeur = if nombre_txt.is_empty() {
            None
        } else {
            match nombre_txt.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => return FormeGauche::NonSupportee,
            }
        };

        // "2*x" accepté comme "2x"
        if valeur.is_some() && chars.get(i) == Some(&'*') && chars.get(i + 1) == Some(&x) {
            i += 1;
        }

        if chars.get(i) == Some(&x) {
            i += 1;
            // "xy", "x2" : pas une inconnue seule
            if chars
                .get(i)
                .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_')
            {
                return FormeGauche::NonSupportee;
            }
            termes_x += 1;
            coefficient = signe * valeur.unwrap_or(1.0);
        } else {
            match valeur {
                Some(v) => constante += signe * v,
                None => return FormeGauche::NonSupportee,
            }
        }
    }

    if termes_x != 1 {
        return FormeGauche::NonSupportee;
    }
    FormeGauche::Lineaire {
        coefficient,
        constante,
    }
}

/// Membre droit : expression purement numérique.
fn membre_droit(droite: &str, cfg: &Config) -> Resultat<f64> {
    match evaluer_scalaire(droite, &Variables::new(), cfg) {
        Ok((v, _)) => Ok(v),
        Err(EvalError::UnknownVariable(_)) => Err(EvalError::EquationTooComplex),
        Err(e) => Err(e),
    }
}

/// Fraction continue tronquée : p/q avec q ≤ DENOMINATEUR_MAX, sinon None.
fn fraction_approchee(v: f64) -> Option<Ratio<i64>> {
    if !v.is_finite() || v.fract() == 0.0 {
        return None;
    }

    let (mut h0, mut h1) = (0i64, 1i64);
    let (mut k0, mut k1) = (1i64, 0i64);
    let mut r = v;

    for _ in 0..32 {
        let a = r.floor();
        if a.abs() > 1e12 {
            return None;
        }
        let a = a as i64;
        let h2 = a.checked_mul(h1)?.checked_add(h0)?;
        let k2 = a.checked_mul(k1)?.checked_add(k0)?;
        if k2 > DENOMINATEUR_MAX {
            return None;
        }
        (h0, h1, k0, k1) = (h1, h2, k1, k2);

        if (h1 as f64 / k1 as f64 - v).abs() < 1e-9 {
            return Some(Ratio::new(h1, k1));
        }
        let reste = r - a as f64;
        if reste == 0.0 {
            break;
        }
        r = 1.0 / reste;
    }
    None
}
