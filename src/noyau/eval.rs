//! Noyau — évaluation scalaire (pipeline réel)
//!
//! tokenize -> variables -> RPN -> pile f64 (+ démarche)
//!
//! Remarque : chaque opération appliquée laisse une ligne de démarche,
//! dans l’ordre chronologique ("2 + 3 = 5", "sqrt(16) = 4").

use log::{debug, trace};

use super::config::Config;
use super::erreur::{EvalError, Resultat};
use super::fonctions;
use super::format::nombre;
use super::jetons::{format_tokens, tokenize, Op, Tok};
use super::rpn::to_postfix;
use super::variables::Variables;

/// Exécute une RPN sur une pile de f64.
///
/// Retour : (valeur, démarche). La pile doit finir avec exactement une valeur.
pub fn eval_postfix(rpn: &[Tok], cfg: &Config) -> Resultat<(f64, Vec<String>)> {
    let mut st: Vec<f64> = Vec::new();
    let mut etapes: Vec<String> = Vec::new();
    let d = cfg.digits;

    for tok in rpn {
        match tok {
            Tok::Num(x) => st.push(*x),

            Tok::Op(Op::Neg) => {
                let a = st.pop().ok_or(EvalError::InvalidExpression)?;
                let r = -a;
                noter(&mut etapes, format!("-({}) = {}", nombre(a, d), nombre(r, d)));
                st.push(r);
            }

            Tok::Op(op) => {
                let b = st.pop().ok_or(EvalError::InvalidExpression)?;
                let a = st.pop().ok_or(EvalError::InvalidExpression)?;

                let r = match op {
                    Op::Plus => a + b,
                    Op::Moins => a - b,
                    Op::Fois | Op::FoisMatrice => a * b,
                    Op::Divise => {
                        if b == 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        a / b
                    }
                    Op::Puissance => a.powf(b),
                    Op::Neg => unreachable!("traité plus haut"),
                };

                noter(
                    &mut etapes,
                    format!(
                        "{} {} {} = {}",
                        nombre(a, d),
                        op.symbole(),
                        nombre(b, d),
                        nombre(r, d)
                    ),
                );
                st.push(r);
            }

            Tok::Fonction(name) => {
                let n = fonctions::arite(name)
                    .ok_or_else(|| EvalError::UnsupportedFunction(name.clone()))?;
                if st.len() < n {
                    return Err(EvalError::InvalidExpression);
                }
                let args = st.split_off(st.len() - n);
                let r = fonctions::appliquer(name, &args, cfg)?;

                let args_txt: Vec<String> = args.iter().map(|x| nombre(*x, d)).collect();
                noter(
                    &mut etapes,
                    format!("{name}({}) = {}", args_txt.join(", "), nombre(r, d)),
                );
                st.push(r);
            }

            // variable non substituée : l’appelant n’a pas fourni de liaison
            Tok::Var(name) => return Err(EvalError::UnknownVariable(name.clone())),

            Tok::Matrice(m) => {
                return Err(EvalError::UnsupportedOperation(m.to_string()));
            }
            Tok::Complexe(_, _) => {
                return Err(EvalError::UnsupportedOperation(tok.to_string()));
            }

            Tok::LPar | Tok::RPar | Tok::Virgule => return Err(EvalError::InvalidExpression),
        }
    }

    if st.len() != 1 {
        return Err(EvalError::InvalidExpression);
    }
    let v = st.pop().ok_or(EvalError::InvalidExpression)?;
    Ok((v, etapes))
}

/// Pipeline scalaire complet : texte -> (valeur, démarche).
pub fn evaluer_scalaire(
    expr: &str,
    vars: &Variables,
    cfg: &Config,
) -> Resultat<(f64, Vec<String>)> {
    let s = expr.trim();
    if s.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    // 1) Jetons
    let jetons = tokenize(s, cfg)?;
    debug!("jetons: {}", format_tokens(&jetons));

    // 2) Variables (liaisons de l’appelant)
    let jetons = vars.substituer(jetons)?;

    // 3) RPN
    let rpn = to_postfix(&jetons)?;
    debug!("rpn: {}", format_tokens(&rpn));

    // 4) Pile
    eval_postfix(&rpn, cfg)
}

fn noter(etapes: &mut Vec<String>, ligne: String) {
    trace!("étape: {ligne}");
    etapes.push(ligne);
}
