//! Noyau — point d’entrée unique
//!
//! Forme::classer -> un des quatre chemins :
//! - Matrice  : evaluate_matrix_expr
//! - Complexe : evaluate_complex_expr
//! - Equation : resoudre
//! - Scalaire : tokenize -> variables -> RPN -> pile
//!
//! Aucun état entre deux appels : même entrée + mêmes liaisons => même sortie.

use log::debug;
use num_complex::Complex64;

use super::complexe::evaluate_complex_expr;
use super::config::Config;
use super::equation::{resoudre, Solution};
use super::erreur::{EvalError, Resultat};
use super::eval::evaluer_scalaire;
use super::format;
use super::forme::Forme;
use super::matrice::{evaluate_matrix_expr, Matrix, MatrixOutcome};
use super::variables::Variables;

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Scalaire(f64),
    Matrice(Matrix),
    Complexe(Complex64),
    Solution(Solution),
}

impl Valeur {
    /// Vue scalaire quand elle existe (partie réelle pour un complexe).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Valeur::Scalaire(x) => Some(*x),
            Valeur::Complexe(z) => Some(z.re),
            Valeur::Solution(Solution::Unique { valeur, .. }) => Some(*valeur),
            Valeur::Matrice(_) | Valeur::Solution(_) => None,
        }
    }

    pub fn texte(&self, digits: usize) -> String {
        match self {
            Valeur::Scalaire(x) => format::nombre(*x, digits),
            Valeur::Matrice(m) => format::matrice(m, digits),
            Valeur::Complexe(z) => format::complexe(*z, digits),
            Valeur::Solution(s) => s.texte(digits),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub valeur: Valeur,
    pub etapes: Vec<String>,
}

/// Évalue n’importe quelle expression ; les liaisons ne servent qu’au chemin scalaire.
pub fn evaluate(expr: &str, vars: &Variables, cfg: &Config) -> Resultat<Evaluation> {
    let s = expr.trim();
    if s.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    let forme = Forme::classer(s);
    debug!("evaluate {s:?} -> {forme:?}");

    let (valeur, etapes) = match forme {
        Forme::Matrice => {
            let (r, etapes) = evaluate_matrix_expr(s, cfg)?;
            let v = match r {
                MatrixOutcome::Scalar(x) => Valeur::Scalaire(x),
                MatrixOutcome::Matrix(m) => Valeur::Matrice(m),
            };
            (v, etapes)
        }
        Forme::Complexe => {
            let (z, etapes) = evaluate_complex_expr(s, cfg)?;
            (Valeur::Complexe(z), etapes)
        }
        Forme::Equation => {
            let (sol, etapes) = resoudre(s, cfg)?;
            (Valeur::Solution(sol), etapes)
        }
        Forme::Scalaire => {
            let (x, etapes) = evaluer_scalaire(s, vars, cfg)?;
            (Valeur::Scalaire(x), etapes)
        }
    };

    Ok(Evaluation { valeur, etapes })
}

/// Résout une équation linéaire : ("x = 2", démarche).
pub fn solve_equation(expr: &str, cfg: &Config) -> Resultat<(String, Vec<String>)> {
    let (sol, etapes) = resoudre(expr, cfg)?;
    Ok((sol.texte(cfg.digits), etapes))
}
