// src/noyau/graphe.rs
//
// Échantillonnage d’une fonction de x sur [bas, haut]
// ---------------------------------------------------
// - count points régulièrement espacés, bornes incluses
// - count = 1 : un seul point en `bas` ; count = 0 : rien
// - point en erreur ou non fini : omis (courbe traçable, pas d’échec global)
// - itérateur paresseux ; cloner avant d’itérer pour recommencer

use log::trace;

use super::config::Config;
use super::moteur::evaluate;
use super::variables::Variables;

#[derive(Clone, Debug)]
pub struct Points {
    fonction: String,
    bas: f64,
    pas: f64,
    count: usize,
    k: usize,
    vars: Variables,
    cfg: Config,
}

impl Points {
    fn abscisse(&self, k: usize) -> f64 {
        self.bas + self.pas * k as f64
    }
}

impl Iterator for Points {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        while self.k < self.count {
            let x = self.abscisse(self.k);
            self.k += 1;

            if self.vars.define("x", x).is_err() {
                return None;
            }
            match evaluate(&self.fonction, &self.vars, &self.cfg) {
                Ok(ev) => match ev.valeur.as_f64() {
                    Some(y) if y.is_finite() => return Some((x, y)),
                    _ => trace!("x = {x} : {} omis", ev.valeur.texte(self.cfg.digits)),
                },
                Err(e) => trace!("x = {x} : {e}"),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count - self.k))
    }
}

/// Points (x, f(x)) ; `x` est lié par-dessus les liaisons de l’appelant.
pub fn generate_points(
    fonction: &str,
    bas: f64,
    haut: f64,
    count: usize,
    vars: &Variables,
    cfg: &Config,
) -> Points {
    let pas = if count > 1 {
        (haut - bas) / (count - 1) as f64
    } else {
        0.0
    };

    Points {
        fonction: fonction.to_string(),
        bas,
        pas,
        count,
        k: 0,
        vars: vars.clone(),
        cfg: cfg.clone(),
    }
}
