//! Noyau d’évaluation
//!
//! Organisation interne :
//! - erreur.rs    : EvalError + Resultat
//! - config.rs    : options (lecture stricte/permissive, angles, digits, rang max)
//! - jetons.rs    : tokenisation
//! - rpn.rs       : shunting-yard (infixe -> postfixe)
//! - fonctions.rs : fonctions scientifiques + combinatoire exacte
//! - variables.rs : liaisons nom -> valeur fournies par l’appelant
//! - eval.rs      : pile postfixe + pipeline scalaire
//! - format.rs    : affichage des nombres, matrices, complexes
//! - matrice.rs   : Matrix + moteur matriciel
//! - complexe.rs  : moteur complexe (a+bi)
//! - equation.rs  : équations linéaires ax + b = c
//! - forme.rs     : classification avant aiguillage
//! - graphe.rs    : échantillonnage d’une fonction de x
//! - moteur.rs    : evaluate / solve_equation

pub mod complexe;
pub mod config;
pub mod equation;
pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod forme;
pub mod graphe;
pub mod jetons;
pub mod matrice;
pub mod moteur;
pub mod rpn;
pub mod variables;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use config::{Angles, Config, Lecture};
pub use equation::Solution;
pub use erreur::{EvalError, Resultat};
pub use graphe::{generate_points, Points};
pub use matrice::Matrix;
pub use moteur::{evaluate, solve_equation, Evaluation, Valeur};
pub use variables::Variables;
