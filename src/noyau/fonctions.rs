// src/noyau/fonctions.rs
//
// Fonctions scientifiques (sur f64)
// ---------------------------------
// - Table nom -> arité (unaire sauf permutation/combination/beta)
// - Combinatoire exacte en BigUint, convertie en f64 à la fin
// - gamma (Lanczos), erf/erfc (série + fraction continue)
//
// Hors domaine réel (ln(-1), sqrt(-2)...) : NaN tel que calculé, pas d’erreur.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use super::config::Config;
use super::erreur::{EvalError, Resultat};

/// Mots-clés réservés aux moteurs matrice/complexe (arité 1, sans sens scalaire).
const MOTS_CLES: [&str; 6] = ["det", "inv", "transpose", "trans", "conj", "arg"];

/// Au-delà, n! dépasse f64::MAX.
const FACTORIELLE_MAX: u64 = 170;

/// Arité d’une fonction connue (None si inconnue).
pub fn arite(nom: &str) -> Option<usize> {
    match nom {
        "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "sinh" | "cosh" | "tanh" | "asinh"
        | "acosh" | "atanh" | "log" | "log2" | "log10" | "ln" | "sqrt" | "cbrt" | "exp"
        | "abs" | "factorial" | "gamma" | "erf" | "erfc" => Some(1),
        "permutation" | "combination" | "beta" => Some(2),
        _ if MOTS_CLES.contains(&nom) => Some(1),
        _ => None,
    }
}

/// Applique la fonction `nom` à ses arguments (dans l’ordre d’écriture).
pub fn appliquer(nom: &str, args: &[f64], cfg: &Config) -> Resultat<f64> {
    let angles = cfg.angles;

    let v = match (nom, args) {
        ("sin", [x]) => angles.vers_radians(*x).sin(),
        ("cos", [x]) => angles.vers_radians(*x).cos(),
        ("tan", [x]) => angles.vers_radians(*x).tan(),
        ("asin", [x]) => angles.depuis_radians(x.asin()),
        ("acos", [x]) => angles.depuis_radians(x.acos()),
        ("atan", [x]) => angles.depuis_radians(x.atan()),
        ("sinh", [x]) => x.sinh(),
        ("cosh", [x]) => x.cosh(),
        ("tanh", [x]) => x.tanh(),
        ("asinh", [x]) => x.asinh(),
        ("acosh", [x]) => x.acosh(),
        ("atanh", [x]) => x.atanh(),
        ("log" | "log10", [x]) => x.log10(),
        ("log2", [x]) => x.log2(),
        ("ln", [x]) => x.ln(),
        ("sqrt", [x]) => x.sqrt(),
        ("cbrt", [x]) => x.cbrt(),
        ("exp", [x]) => x.exp(),
        ("abs", [x]) => x.abs(),
        ("factorial", [n]) => factorielle(entier_naturel(*n)?),
        ("permutation", [n, r]) => permutation(entier_naturel(*n)?, entier_naturel(*r)?),
        ("combination", [n, r]) => combinaison(entier_naturel(*n)?, entier_naturel(*r)?),
        ("gamma", [x]) => gamma(*x),
        ("erf", [x]) => erf(*x),
        ("erfc", [x]) => erfc(*x),
        ("beta", [a, b]) => gamma(*a) * gamma(*b) / gamma(a + b),
        _ if arite(nom).is_some_and(|n| n != args.len()) => {
            return Err(EvalError::InvalidExpression)
        }
        _ => return Err(EvalError::UnsupportedFunction(nom.to_string())),
    };

    Ok(v)
}

/* ------------------------ Combinatoire exacte ------------------------ */

/// Domaine : entier ≥ 0 (jamais de troncature).
fn entier_naturel(x: f64) -> Resultat<u64> {
    if !x.is_finite() || x < 0.0 || x.fract() != 0.0 || x > u64::MAX as f64 {
        return Err(EvalError::InvalidArgument);
    }
    Ok(x as u64)
}

/// BigUint -> f64 (inf si trop grand).
fn big_to_f64(n: &BigUint) -> f64 {
    if n.bits() > 1024 {
        return f64::INFINITY;
    }
    n.to_f64().unwrap_or(f64::INFINITY)
}

fn factorielle(n: u64) -> f64 {
    if n > FACTORIELLE_MAX {
        return f64::INFINITY;
    }
    let p = (2..=n).fold(BigUint::one(), |acc, k| acc * k);
    big_to_f64(&p)
}

/// nPr = n·(n-1)···(n-r+1) ; 0 si r > n.
fn permutation(n: u64, r: u64) -> f64 {
    if r > n {
        return 0.0;
    }
    let mut p = BigUint::one();
    for k in 0..r {
        p *= n - k;
        if p.bits() > 1024 {
            return f64::INFINITY;
        }
    }
    big_to_f64(&p)
}

/// nCr, par produits successifs exacts (chaque quotient intermédiaire est entier).
fn combinaison(n: u64, r: u64) -> f64 {
    if r > n {
        return 0.0;
    }
    let r = r.min(n - r);
    let mut c = BigUint::one();
    for k in 0..r {
        c = c * (n - k) / (k + 1);
        // croissante jusqu’à r ≤ n/2 : inutile d’aller plus loin
        if c.bits() > 1024 {
            return f64::INFINITY;
        }
    }
    big_to_f64(&c)
}

/* ------------------------ Fonctions spéciales ------------------------ */

/// Gamma via l’approximation de Lanczos (g = 7, 9 coefficients).
pub fn gamma(x: f64) -> f64 {
    use std::f64::consts::PI;

    // pôles : 0, -1, -2, ...
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::NAN;
    }
    if x < 0.5 {
        // réflexion : Γ(1-x)·Γ(x) = π / sin(πx)
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    const G: f64 = 7.0;
    const C: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    let x = x - 1.0;
    let somme = C
        .iter()
        .enumerate()
        .skip(1)
        .fold(C[0], |acc, (i, c)| acc + c / (x + i as f64));
    let t = x + G + 0.5;
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * somme
}

pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    let signe = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    if x > 4.0 {
        return signe * (1.0 - erfc_fraction_continue(x));
    }

    // série de Taylor : (2/√π) Σ (-1)^n x^(2n+1) / (n!(2n+1))
    let mut terme = x;
    let mut somme = x;
    for n in 1..100 {
        terme *= -x * x / n as f64;
        let contribution = terme / (2 * n + 1) as f64;
        somme += contribution;
        if contribution.abs() < 1e-17 * somme.abs() {
            break;
        }
    }
    signe * somme * 2.0 / std::f64::consts::PI.sqrt()
}

pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    if x > 4.0 {
        return erfc_fraction_continue(x);
    }
    1.0 - erf(x)
}

/// erfc(x) = exp(-x²)/√π · 1/(x + (1/2)/(x + 1/(x + (3/2)/(x + ...))))
/// Évaluée par la méthode de Lentz modifiée ; x grand uniquement.
fn erfc_fraction_continue(x: f64) -> f64 {
    const MINUSCULE: f64 = 1e-300;

    let mut f = x;
    let mut c = x;
    let mut d = 0.0;

    for n in 1..300 {
        let a = n as f64 * 0.5;
        d = x + a * d;
        if d.abs() < MINUSCULE {
            d = MINUSCULE;
        }
        c = x + a / c;
        if c.abs() < MINUSCULE {
            c = MINUSCULE;
        }
        d = 1.0 / d;
        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() < 1e-16 {
            break;
        }
    }

    (-x * x).exp() / (std::f64::consts::PI.sqrt() * f)
}
