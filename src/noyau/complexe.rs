// src/noyau/complexe.rs
//
// Nombres complexes : littéraux a+bi + arithmétique
// --------------------------------------------------
// - Littéraux recollés sur les jetons : [-] Num (+|-) Complexe(0,b)   => a ± bi
//                                       [-] Complexe(0,b)             => ±bi
//                                       [-] Num                       => a
// - Opération cherchée dans ce qui reste (les signes internes aux littéraux
//   ne comptent pas) : + , - , * (ou ×) , / , puis conj, arg ; sinon abs
// - Toujours un Complex64 en sortie (abs/arg => (valeur, 0))

use log::debug;
use num_complex::Complex64;

use super::config::Config;
use super::erreur::{EvalError, Resultat};
use super::format;
use super::jetons::{tokenize, Op, Tok};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpComplexe {
    Somme,
    Difference,
    Produit,
    Quotient,
    Conjugue,
    Argument,
    Module,
}

impl OpComplexe {
    fn binaire(self) -> bool {
        matches!(
            self,
            OpComplexe::Somme | OpComplexe::Difference | OpComplexe::Produit | OpComplexe::Quotient
        )
    }
}

/// Sépare les littéraux complexes du reste des jetons.
fn litteraux(jetons: &[Tok]) -> Resultat<(Vec<Complex64>, Vec<&Tok>)> {
    let mut nombres = Vec::new();
    let mut reste = Vec::new();
    let mut i = 0;

    while i < jetons.len() {
        // signe en tête de littéral : début, ou après opérateur / '(' / ','
        let signe_possible = i == 0
            || matches!(
                jetons[i - 1],
                Tok::Op(_) | Tok::LPar | Tok::Virgule | Tok::Fonction(_)
            );
        let (neg, j) = match jetons[i] {
            Tok::Op(Op::Moins) if signe_possible => (true, i + 1),
            _ => (false, i),
        };
        let s = if neg { -1.0 } else { 1.0 };

        match (jetons.get(j), jetons.get(j + 1), jetons.get(j + 2)) {
            (
                Some(Tok::Num(a)),
                Some(Tok::Op(op @ (Op::Plus | Op::Moins))),
                Some(Tok::Complexe(_, b)),
            ) => {
                let b = if *op == Op::Moins { -b } else { *b };
                nombres.push(Complex64::new(s * a, b));
                i = j + 3;
            }
            (Some(Tok::Complexe(_, b)), _, _) => {
                nombres.push(Complex64::new(0.0, s * b));
                i = j + 1;
            }
            (Some(Tok::Num(a)), _, _) => {
                nombres.push(Complex64::new(s * a, 0.0));
                i = j + 1;
            }
            _ => {
                reste.push(&jetons[i]);
                i += 1;
            }
        }
    }

    // le reste ne peut contenir qu’opérateurs, parenthèses et mots-clés
    if let Some(intrus) = reste
        .iter()
        .find(|t| !matches!(t, Tok::Op(_) | Tok::LPar | Tok::RPar | Tok::Fonction(_)))
    {
        debug!("jeton inattendu en complexe: {intrus}");
        return Err(EvalError::InvalidExpression);
    }

    Ok((nombres, reste))
}

fn choisir(reste: &[&Tok]) -> Resultat<OpComplexe> {
    let a_op = |ops: &[Op]| reste.iter().any(|t| matches!(t, Tok::Op(o) if ops.contains(o)));
    let a_fonction = |nom: &str| reste.iter().any(|t| matches!(t, Tok::Fonction(n) if n == nom));

    if let Some(Tok::Fonction(n)) = reste
        .iter()
        .find(|t| matches!(t, Tok::Fonction(n) if !matches!(n.as_str(), "conj" | "arg" | "abs")))
    {
        return Err(EvalError::UnsupportedFunction(n.clone()));
    }

    let op = if a_op(&[Op::Plus]) {
        OpComplexe::Somme
    } else if a_op(&[Op::Moins]) {
        OpComplexe::Difference
    } else if a_op(&[Op::Fois, Op::FoisMatrice]) {
        OpComplexe::Produit
    } else if a_op(&[Op::Divise]) {
        OpComplexe::Quotient
    } else if a_fonction("conj") {
        OpComplexe::Conjugue
    } else if a_fonction("arg") {
        OpComplexe::Argument
    } else if let Some(Tok::Op(o)) = reste.iter().find(|t| matches!(t, Tok::Op(_))) {
        return Err(EvalError::UnsupportedOperation(o.symbole().to_string()));
    } else {
        OpComplexe::Module
    };
    Ok(op)
}

/// Évalue une expression complexe : "3+4i * 1+0i", "(1+2i)/(0+0i)", "conj(3-4i)"...
pub fn evaluate_complex_expr(expr: &str, cfg: &Config) -> Resultat<(Complex64, Vec<String>)> {
    let jetons = tokenize(expr, cfg)?;
    let (nombres, reste) = litteraux(&jetons)?;
    let op = choisir(&reste)?;
    debug!("complexes: {} ; opération: {op:?}", nombres.len());

    let attendu = if op.binaire() { 2 } else { 1 };
    if nombres.len() != attendu {
        return Err(EvalError::InvalidExpression);
    }

    let d = cfg.digits;
    let f = |z: Complex64| format::complexe(z, d);
    let n = |x: f64| format::nombre(x, d);
    let mut etapes = Vec::new();

    let z = nombres[0];
    let r = match op {
        OpComplexe::Somme | OpComplexe::Difference => {
            let w = nombres[1];
            let (r, s) = if op == OpComplexe::Somme {
                (z + w, "+")
            } else {
                (z - w, "-")
            };
            etapes.push(format!(
                "({}) {s} ({}) = ({} {s} {}) + ({} {s} {})i = {}",
                f(z),
                f(w),
                n(z.re),
                n(w.re),
                n(z.im),
                n(w.im),
                f(r)
            ));
            r
        }

        OpComplexe::Produit => {
            let w = nombres[1];
            let r = z * w;
            etapes.push(format!(
                "({}) × ({}) = ({}·{} - {}·{}) + ({}·{} + {}·{})i = {}",
                f(z),
                f(w),
                n(z.re),
                n(w.re),
                n(z.im),
                n(w.im),
                n(z.re),
                n(w.im),
                n(z.im),
                n(w.re),
                f(r)
            ));
            r
        }

        OpComplexe::Quotient => {
            let w = nombres[1];
            if w.re == 0.0 && w.im == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let den = w.norm_sqr();
            etapes.push(format!(
                "|{}|² = {}² + {}² = {}",
                f(w),
                n(w.re),
                n(w.im),
                n(den)
            ));
            let num = z * w.conj();
            etapes.push(format!(
                "({}) × conj({}) = {}",
                f(z),
                f(w),
                f(num)
            ));
            let r = num / den;
            etapes.push(format!("({}) / {} = {}", f(num), n(den), f(r)));
            r
        }

        OpComplexe::Conjugue => {
            let r = z.conj();
            etapes.push(format!("conj({}) = {}", f(z), f(r)));
            r
        }

        OpComplexe::Argument => {
            let a = cfg.angles.depuis_radians(z.arg());
            etapes.push(format!(
                "arg({}) = atan2({}, {}) = {}",
                f(z),
                n(z.im),
                n(z.re),
                n(a)
            ));
            Complex64::new(a, 0.0)
        }

        OpComplexe::Module => {
            let m = z.norm();
            etapes.push(format!(
                "|{}| = √({}² + {}²) = {}",
                f(z),
                n(z.re),
                n(z.im),
                n(m)
            ));
            Complex64::new(m, 0.0)
        }
    };

    Ok((r, etapes))
}
