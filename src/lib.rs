//! Moteur de calculatrice : expressions scalaires, matrices, complexes,
//! équations linéaires ; chaque résultat est accompagné de sa démarche.

pub mod noyau;

pub use noyau::{
    evaluate, generate_points, solve_equation, Angles, Config, EvalError, Evaluation, Lecture,
    Matrix, Points, Resultat, Solution, Valeur, Variables,
};
