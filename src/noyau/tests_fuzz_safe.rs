//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler `evaluate` sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : jamais de panique ; un échec est toujours un EvalError
//!   avec un message non vide

use std::time::{Duration, Instant};

use super::config::{Config, Lecture};
use super::erreur::Resultat;
use super::moteur::{evaluate, Evaluation};
use super::variables::Variables;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        3 => format!("{}e{}", rng.pick(9) + 1, rng.pick(5)),
        4 => rng.choose(&["pi", "e", "phi", "gamma", "π"]).to_string(),
        _ => format!("{}", rng.pick(1000)),
    }
}

fn gen_scalaire(rng: &mut Rng, profondeur: u32) -> String {
    if profondeur == 0 {
        return gen_nombre(rng);
    }
    match rng.pick(7) {
        0 | 1 => {
            let op = rng.choose(&["+", "-", "*", "/", "^", "×", "÷"]);
            format!(
                "{} {op} {}",
                gen_scalaire(rng, profondeur - 1),
                gen_scalaire(rng, profondeur - 1)
            )
        }
        2 => format!("({})", gen_scalaire(rng, profondeur - 1)),
        3 => format!("-{}", gen_scalaire(rng, profondeur - 1)),
        4 => {
            let f = rng.choose(&[
                "sin", "cos", "tan", "asin", "acosh", "ln", "log2", "sqrt", "cbrt", "exp",
                "abs", "factorial", "gamma", "erf", "erfc",
            ]);
            format!("{f}({})", gen_scalaire(rng, profondeur - 1))
        }
        5 => {
            let f = rng.choose(&["permutation", "combination", "beta"]);
            format!(
                "{f}({}, {})",
                gen_scalaire(rng, profondeur - 1),
                gen_scalaire(rng, profondeur - 1)
            )
        }
        _ => rng.choose(&["a", "b", "inconnue"]).to_string(),
    }
}

fn gen_matrice(rng: &mut Rng) -> String {
    let lignes = rng.pick(3) + 1;
    let cols = rng.pick(3) + 1;
    let mut out = String::from("[");
    for i in 0..lignes {
        if i > 0 {
            out.push(';');
        }
        // parfois une ligne trop courte (matrice irrégulière)
        let n = if rng.pick(8) == 0 { cols + 1 } else { cols };
        for j in 0..n {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&format!("{}", rng.pick(19) as i32 - 9));
        }
    }
    out.push(']');
    out
}

fn gen_complexe(rng: &mut Rng) -> String {
    let a = rng.pick(9) as i32 - 4;
    let b = rng.pick(9);
    let s = if rng.coin() { "+" } else { "-" };
    format!("{a}{s}{b}i")
}

/// Mutation bornée : insère un caractère parasite ou coupe la chaîne.
fn muter(rng: &mut Rng, s: String) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return s;
    }
    let k = rng.pick(chars.len() as u32) as usize;
    match rng.pick(4) {
        0 => {
            let parasite = rng.choose(&["#", "(", ")", ",", "=", "[", "]", "$", "i", "é"]);
            let mut out: String = chars[..k].iter().collect();
            out.push_str(parasite);
            out.extend(&chars[k..]);
            out
        }
        1 => chars[..k].iter().collect(),
        _ => s,
    }
}

fn gen_expression(rng: &mut Rng) -> String {
    let s = match rng.pick(6) {
        0 => {
            let op = rng.choose(&["×", "*", "+", "-"]);
            format!("{} {op} {}", gen_matrice(rng), gen_matrice(rng))
        }
        1 => {
            let f = rng.choose(&["det", "inv", "transpose", "trans"]);
            format!("{f}({})", gen_matrice(rng))
        }
        2 => {
            let op = rng.choose(&["+", "-", "*", "/", "^"]);
            format!("({}) {op} ({})", gen_complexe(rng), gen_complexe(rng))
        }
        3 => format!(
            "{}x {} {} = {}",
            rng.pick(5),
            rng.choose(&["+", "-"]),
            rng.pick(10),
            gen_scalaire(rng, 1)
        ),
        _ => gen_scalaire(rng, 3),
    };
    muter(rng, s)
}

/* ------------------------ Invariants ------------------------ */

fn verifier(expr: &str, r: &Resultat<Evaluation>) {
    match r {
        Ok(ev) => {
            assert!(
                ev.etapes.iter().all(|l| !l.is_empty()),
                "étape vide pour expr={expr:?}"
            );
        }
        Err(e) => {
            assert!(!e.to_string().is_empty(), "message vide pour expr={expr:?}");
        }
    }
}

/* ------------------------ Campagnes ------------------------ */

#[test]
fn fuzz_safe_jamais_de_panique() {
    let start = Instant::now();
    let max = Duration::from_secs(5);

    let mut vars = Variables::new();
    vars.define("a", 2.0).unwrap();
    vars.define("b", -0.5).unwrap();

    let strict = Config::default();
    let permissif = Config::default().avec_lecture(Lecture::Permissive);

    let mut rng = Rng::new(0xC0FFEE);
    for _ in 0..2_000 {
        let expr = gen_expression(&mut rng);
        for cfg in [&strict, &permissif] {
            let r = evaluate(&expr, &vars, cfg);
            verifier(&expr, &r);
        }
        budget(start, max);
    }
}

#[test]
fn fuzz_safe_deterministe() {
    let start = Instant::now();
    let max = Duration::from_secs(3);

    let vars = Variables::new();
    let cfg = Config::default();

    // même seed => mêmes expressions => mêmes sorties
    let mut r1 = Rng::new(42);
    let mut r2 = Rng::new(42);
    for _ in 0..500 {
        let e1 = gen_expression(&mut r1);
        let e2 = gen_expression(&mut r2);
        assert_eq!(e1, e2);

        let a = evaluate(&e1, &vars, &cfg);
        let b = evaluate(&e2, &vars, &cfg);
        match (&a, &b) {
            (Ok(x), Ok(y)) => {
                assert_eq!(x.valeur.texte(15), y.valeur.texte(15), "expr={e1:?}");
                assert_eq!(x.etapes, y.etapes, "expr={e1:?}");
            }
            (Err(x), Err(y)) => assert_eq!(x, y, "expr={e1:?}"),
            _ => panic!("résultats divergents pour expr={e1:?}"),
        }
        budget(start, max);
    }
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    let start = Instant::now();
    let max = Duration::from_secs(2);
    let cfg = Config::default();

    // profondeur élevée mais bornée : la RPN est itérative
    for n in [10usize, 100, 1_000] {
        let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        let ev = evaluate(&expr, &Variables::new(), &cfg).unwrap();
        assert_eq!(ev.valeur.as_f64(), Some(1.0));

        let expr = format!("{}1", "-".repeat(n));
        let ev = evaluate(&expr, &Variables::new(), &cfg).unwrap();
        let attendu = if n % 2 == 0 { 1.0 } else { -1.0 };
        assert_eq!(ev.valeur.as_f64(), Some(attendu));

        let expr = format!("({}1{}", "(".repeat(n), ")".repeat(n));
        assert!(evaluate(&expr, &Variables::new(), &cfg).is_err());
        budget(start, max);
    }
}
