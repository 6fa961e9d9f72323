//! Tests scientifiques (campagne) : propriétés du moteur de bout en bout.
//!
//! - précédence et regroupement (la RPN respecte la grammaire)
//! - idempotence : pas d’état caché entre deux appels
//! - aller-retour texte <-> Matrix
//! - budget temps global, tailles bornées

use std::time::{Duration, Instant};

use super::config::{Angles, Config, Lecture};
use super::erreur::EvalError;
use super::matrice::Matrix;
use super::moteur::{evaluate, solve_equation, Valeur};
use super::variables::Variables;

fn scalaire(expr: &str) -> f64 {
    scalaire_cfg(expr, &Config::default())
}

fn scalaire_cfg(expr: &str, cfg: &Config) -> f64 {
    let ev = evaluate(expr, &Variables::new(), cfg)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
    ev.valeur
        .as_f64()
        .unwrap_or_else(|| panic!("expr={expr:?} : pas de vue scalaire"))
}

fn erreur(expr: &str) -> EvalError {
    match evaluate(expr, &Variables::new(), &Config::default()) {
        Ok(ev) => panic!("expr={expr:?} : attendu une erreur, obtenu {:?}", ev.valeur),
        Err(e) => e,
    }
}

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + b.abs())
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = scalaire(expr);
    assert!(proche(v, attendu), "expr={expr:?} : {v} != {attendu}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précédence / regroupement ------------------------ */

#[test]
fn sci_precedence_sans_parentheses() {
    assert_proche("2 + 3 * 4", 14.0);
    assert_proche("2 * 3 + 4", 10.0);
    assert_proche("20 / 4 / 5", 1.0);
    assert_proche("2 + 3 * 4 ^ 2", 50.0);
    assert_proche("1 - 2 - 3", -4.0);
    // ^ dépilé de gauche à droite : (2^3)^2
    assert_proche("2 ^ 3 ^ 2", 64.0);
}

#[test]
fn sci_parentheses_changent_le_resultat() {
    let avec = scalaire("(2 + 3) * 4");
    let sans = scalaire("2 + 3 * 4");
    assert_eq!(avec, 20.0);
    assert_ne!(avec, sans);

    assert_proche("2 ^ (3 ^ 2)", 512.0);
    assert_proche("((((1 + 1))))", 2.0);
}

#[test]
fn sci_division_par_zero() {
    assert_eq!(erreur("10 / 0"), EvalError::DivisionByZero);
    assert_eq!(erreur("1 / (3 - 3)"), EvalError::DivisionByZero);
}

/* ------------------------ Fonctions ------------------------ */

#[test]
fn sci_fonctions_usuelles() {
    assert_proche("sin(0)", 0.0);
    assert_proche("sqrt(16)", 4.0);
    assert_proche("log(1000)", 3.0);
    assert_proche("ln(e)", 1.0);
    assert_proche("cbrt(27)", 3.0);
    assert_proche("factorial(5)", 120.0);
    assert_proche("combination(10, 3)", 120.0);
    assert_proche("gamma(5)", 24.0);
    assert_proche("beta(2, 3)", 1.0 / 12.0);
    assert_proche("erf(0)", 0.0);

    let ev = evaluate("sqrt(16)", &Variables::new(), &Config::default()).unwrap();
    assert!(ev.etapes.iter().any(|l| l == "sqrt(16) = 4"));
}

#[test]
fn sci_identites_trig() {
    for x in [0.1, 0.5, 1.0, 2.0, -3.0] {
        let s = scalaire(&format!("sin({x}) ^ 2 + cos({x}) ^ 2"));
        assert!(proche(s, 1.0), "x={x}");
        let t = scalaire(&format!("tan({x}) - sin({x}) / cos({x})"));
        assert!(t.abs() < 1e-12, "x={x}");
    }
}

#[test]
fn sci_degres() {
    let cfg = Config::default().avec_angles(Angles::Degres);
    assert!(proche(scalaire_cfg("sin(30)", &cfg), 0.5));
    assert!(proche(scalaire_cfg("acos(0)", &cfg), 90.0));
}

#[test]
fn sci_domaine_combinatoire() {
    assert_eq!(erreur("factorial(-1)"), EvalError::InvalidArgument);
    assert_eq!(erreur("factorial(2.5)"), EvalError::InvalidArgument);
    assert_eq!(erreur("permutation(2.5, 1)"), EvalError::InvalidArgument);
    assert_proche("permutation(2, 5)", 0.0);
    assert!(scalaire("factorial(171)").is_infinite());
}

/* ------------------------ Lecture stricte / permissive ------------------------ */

#[test]
fn sci_caracteres_inconnus() {
    assert_eq!(erreur("2 # 3"), EvalError::InvalidCharacter('#'));
    let cfg = Config::default().avec_lecture(Lecture::Permissive);
    assert_eq!(scalaire_cfg("2 + #3", &cfg), 5.0);
}

/* ------------------------ Matrices / complexes / équations ------------------------ */

#[test]
fn sci_matrices() {
    let ev = evaluate("[1,2;3,4] × [5,6;7,8]", &Variables::new(), &Config::default()).unwrap();
    let attendu = Matrix::new(vec![vec![19.0, 22.0], vec![43.0, 50.0]]).unwrap();
    assert_eq!(ev.valeur, Valeur::Matrice(attendu));

    assert_proche("det([1,2;3,4])", -2.0);
    assert_eq!(
        erreur("[1,2;3,4] + [1,2,3;4,5,6]"),
        EvalError::MatrixDimensionMismatch
    );
    assert_eq!(erreur("inv([1,2;2,4])"), EvalError::SingularMatrix);
}

#[test]
fn sci_complexes() {
    let ev = evaluate("3+4i * 1+0i", &Variables::new(), &Config::default()).unwrap();
    assert_eq!(ev.valeur.texte(10), "3+4i");
    assert_eq!(erreur("(1+1i) / (0+0i)"), EvalError::DivisionByZero);
    assert_proche("3+4i", 5.0);
}

#[test]
fn sci_equations() {
    let cfg = Config::default();
    assert_eq!(solve_equation("2x + 3 = 7", &cfg).unwrap().0, "x = 2");
    assert_eq!(
        solve_equation("0x + 3 = 3", &cfg).unwrap().0,
        "infinite solutions"
    );
    assert_eq!(solve_equation("0x + 3 = 5", &cfg).unwrap().0, "no solution");
}

/* ------------------------ Idempotence ------------------------ */

#[test]
fn sci_idempotence() {
    let start = Instant::now();
    let max = Duration::from_secs(2);

    let mut vars = Variables::new();
    vars.define("a", 1.5).unwrap();
    let cfg = Config::default();

    for expr in [
        "a * 2 + sqrt(a)",
        "(-8) ^ 0.5",
        "[1,2;3,4] - [4,3;2,1]",
        "det([2,0,1;1,3,2;1,1,2])",
        "conj(3-4i)",
        "3x - 1 = 2",
        "10 / 0",
        "2 + ",
    ] {
        let a = evaluate(expr, &vars, &cfg);
        let b = evaluate(expr, &vars, &cfg);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                // texte plutôt que valeur : NaN != NaN
                assert_eq!(a.valeur.texte(15), b.valeur.texte(15), "expr={expr:?}");
                assert_eq!(a.etapes, b.etapes, "expr={expr:?}");
            }
            (Err(a), Err(b)) => assert_eq!(a, b, "expr={expr:?}"),
            (a, b) => panic!("expr={expr:?} : {a:?} vs {b:?}"),
        }
        budget(start, max);
    }
}

/* ------------------------ Aller-retour matrices ------------------------ */

#[test]
fn sci_aller_retour_matrices() {
    let start = Instant::now();
    let max = Duration::from_secs(2);

    for texte in [
        "[1,2;3,4]",
        "[-1.5,0.25,3;4,-5,6e-3]",
        "[7]",
        "[0.1,0.2,0.3]",
        "[1e10;-2e-7;3.5]",
    ] {
        let m: Matrix = texte.parse().unwrap();
        let m2: Matrix = m.to_string().parse().unwrap();
        assert_eq!(m.rows(), m2.rows());
        assert_eq!(m.cols(), m2.cols());
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                let (a, b) = (m.get(i, j).unwrap(), m2.get(i, j).unwrap());
                assert!(proche(b, a), "{texte} [{i},{j}] : {a} != {b}");
            }
        }
        budget(start, max);
    }
}

#[test]
fn sci_inverse_fois_matrice_identite() {
    let m: Matrix = "[4,7,2;3,6,1;2,5,3]".parse().unwrap();
    let p = m.mul(&m.inverse().unwrap()).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            let attendu = if i == j { 1.0 } else { 0.0 };
            let v = p.get(i, j).unwrap();
            assert!((v - attendu).abs() < 1e-9, "[{i},{j}] = {v}");
        }
    }
}
