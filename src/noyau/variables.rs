// src/noyau/variables.rs
//
// Liaisons nom -> valeur, fournies par l’appelant (le noyau n’en possède aucune).
// - Noms sensibles à la casse
// - Interdits : constantes (pi, e, phi, gamma, toute casse), fonctions connues, "i"

use std::collections::HashMap;

use super::erreur::{EvalError, Resultat};
use super::fonctions;
use super::jetons::{constante, Tok};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variables {
    valeurs: HashMap<String, f64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Définit (ou remplace) une variable.
    pub fn define(&mut self, nom: &str, valeur: f64) -> Resultat<()> {
        if !nom_valide(nom) {
            return Err(EvalError::InvalidArgument);
        }
        self.valeurs.insert(nom.to_string(), valeur);
        Ok(())
    }

    pub fn get(&self, nom: &str) -> Option<f64> {
        self.valeurs.get(nom).copied()
    }

    pub fn remove(&mut self, nom: &str) -> Option<f64> {
        self.valeurs.remove(nom)
    }

    pub fn len(&self) -> usize {
        self.valeurs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valeurs.is_empty()
    }

    /// Remplace chaque Var liée par sa valeur ; Var non liée => UnknownVariable.
    /// "foo(" est un appel de fonction inconnue, pas une variable.
    pub fn substituer(&self, tokens: Vec<Tok>) -> Resultat<Vec<Tok>> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut it = tokens.into_iter().peekable();

        while let Some(t) = it.next() {
            match t {
                Tok::Var(nom) if matches!(it.peek(), Some(Tok::LPar)) => {
                    return Err(EvalError::UnsupportedFunction(nom));
                }
                Tok::Var(nom) => match self.get(&nom) {
                    Some(v) => out.push(Tok::Num(v)),
                    None => return Err(EvalError::UnknownVariable(nom)),
                },
                autre => out.push(autre),
            }
        }
        Ok(out)
    }
}

/// [a-zA-Z][a-zA-Z0-9_]*, sans collision avec constantes / fonctions.
fn nom_valide(nom: &str) -> bool {
    let mut chars = nom.chars();
    let premier_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let reste_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let w = nom.to_lowercase();

    premier_ok
        && reste_ok
        && constante(&w).is_none()
        && fonctions::arite(&w).is_none()
        && w != "i"
}
