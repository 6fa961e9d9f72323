// src/noyau/jetons.rs

use std::fmt;

use log::debug;

use super::config::{Config, Lecture};
use super::erreur::{EvalError, Resultat};
use super::fonctions;
use super::matrice::Matrix;

/* ------------------------ Opérateurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    // × : produit matriciel (ne s’associe jamais avec * scalaire)
    FoisMatrice,
    // moins unaire (préfixe), produit par le shunting-yard, jamais par tokenize
    Neg,
}

impl Op {
    pub fn depuis_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Plus),
            '-' | '−' => Some(Op::Moins),
            '*' => Some(Op::Fois),
            '/' | '÷' => Some(Op::Divise),
            '^' => Some(Op::Puissance),
            '×' => Some(Op::FoisMatrice),
            _ => None,
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Moins => "-",
            Op::Fois => "*",
            Op::Divise => "/",
            Op::Puissance => "^",
            Op::FoisMatrice => "×",
            Op::Neg => "neg",
        }
    }

    /// Précédence (fonction pure du symbole).
    pub fn precedence(self) -> u8 {
        match self {
            Op::Plus | Op::Moins => 1,
            Op::Fois | Op::Divise => 2,
            Op::Puissance | Op::Neg => 3,
            Op::FoisMatrice => 4,
        }
    }
}

/* ------------------------ Jetons ------------------------ */

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Nom non reconnu comme fonction : variable utilisateur (casse conservée)
    Var(String),

    Op(Op),

    // Nom de fonction, normalisé en minuscules
    Fonction(String),

    LPar,
    RPar,
    Virgule,

    Matrice(Matrix),

    // Imaginaire pur "4i" ; le moteur complexe recolle a + bi
    Complexe(f64, f64),
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Num(x) => write!(f, "{x}"),
            Tok::Var(nom) | Tok::Fonction(nom) => write!(f, "{nom}"),
            Tok::Op(op) => write!(f, "{}", op.symbole()),
            Tok::LPar => write!(f, "("),
            Tok::RPar => write!(f, ")"),
            Tok::Virgule => write!(f, ","),
            Tok::Matrice(m) => write!(f, "{m}"),
            Tok::Complexe(re, im) => {
                if *re == 0.0 {
                    write!(f, "{im}i")
                } else {
                    write!(f, "({re}{im:+}i)")
                }
            }
        }
    }
}

/* ------------------------ Constantes ------------------------ */

/// Euler–Mascheroni.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Constantes mathématiques (insensibles à la casse).
pub fn constante(nom: &str) -> Option<f64> {
    match nom.to_lowercase().as_str() {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        "phi" => Some(1.618_033_988_749_895),
        "gamma" => Some(EULER_GAMMA),
        _ => None,
    }
}

/* ------------------------ Tokenize ------------------------ */

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux, exposant optionnel (ex: 12, 0.5, .5, 1.5e-3)
/// - opérateurs + - * / ^ ×
/// - parenthèses ( ) et virgule (séparateur d’arguments)
/// - π / pi, e, phi, gamma (constantes ; "gamma(" reste la fonction)
/// - √ (équivaut à fonction("sqrt"))
/// - identifiants [a-zA-Z][a-zA-Z0-9_]* : fonction si connue, sinon variable
/// - littéraux matrice [a,b;c,d] et imaginaires "4i"
///
/// Le signe n’est jamais collé au nombre : le moins unaire est l’affaire du shunting-yard.
pub fn tokenize(s: &str, cfg: &Config) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Nombre (partie entière, décimale, exposant)
        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit())
        {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            i = fin_exposant(&chars, i);

            let txt: String = chars[start..i].iter().collect();
            let x: f64 = txt.parse().map_err(|_| EvalError::InvalidExpression)?;

            // imaginaire pur : "4i" (i seul, pas début d’un mot)
            if i < chars.len() && chars[i] == 'i' && !suite_identifiant(&chars, i + 1) {
                out.push(Tok::Complexe(0.0, x));
                i += 1;
            } else {
                out.push(Tok::Num(x));
            }
            continue;
        }

        if let Some(op) = Op::depuis_char(c) {
            out.push(Tok::Op(op));
            i += 1;
            continue;
        }

        match c {
            '(' => {
                out.push(Tok::LPar);
                i += 1;
                continue;
            }
            ')' => {
                out.push(Tok::RPar);
                i += 1;
                continue;
            }
            ',' => {
                out.push(Tok::Virgule);
                i += 1;
                continue;
            }
            'π' => {
                out.push(Tok::Num(std::f64::consts::PI));
                i += 1;
                continue;
            }
            '√' => {
                out.push(Tok::Fonction("sqrt".to_string()));
                i += 1;
                continue;
            }
            '[' => {
                let fin = chars[i..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map(|p| i + p)
                    .ok_or(EvalError::InvalidExpression)?;
                let litteral: String = chars[i..=fin].iter().collect();
                out.push(Tok::Matrice(litteral.parse::<Matrix>()?));
                i = fin + 1;
                continue;
            }
            _ => {}
        }

        // Identifiants ASCII : [a-zA-Z][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() {
            let start = i;
            i += 1;
            while suite_identifiant(&chars, i) {
                i += 1;
            }
            let mot: String = chars[start..i].iter().collect();
            let w = mot.to_lowercase();

            // "gamma(" : fonction ; "gamma" seul : constante
            let appel = prochain_non_blanc(&chars, i) == Some('(');

            if fonctions::arite(&w).is_some() && (appel || constante(&w).is_none()) {
                out.push(Tok::Fonction(w));
            } else if let Some(v) = constante(&w) {
                out.push(Tok::Num(v));
            } else if w == "i" {
                out.push(Tok::Complexe(0.0, 1.0));
            } else {
                out.push(Tok::Var(mot));
            }
            continue;
        }

        match cfg.lecture {
            Lecture::Stricte => return Err(EvalError::InvalidCharacter(c)),
            Lecture::Permissive => {
                debug!("caractère ignoré: {c:?}");
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Avance après un exposant "e[+-]?chiffres" s’il est complet, sinon ne bouge pas.
fn fin_exposant(chars: &[char], i: usize) -> usize {
    if i >= chars.len() || !matches!(chars[i], 'e' | 'E') {
        return i;
    }
    let mut j = i + 1;
    if j < chars.len() && matches!(chars[j], '+' | '-') {
        j += 1;
    }
    if j >= chars.len() || !chars[j].is_ascii_digit() {
        return i;
    }
    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
    }
    j
}

fn suite_identifiant(chars: &[char], i: usize) -> bool {
    i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
}

fn prochain_non_blanc(chars: &[char], i: usize) -> Option<char> {
    chars[i..].iter().copied().find(|ch| !ch.is_whitespace())
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
