// src/noyau/rpn.rs
//
// Shunting-yard -> RPN (postfix)
//
// Règles:
// - Num / Var / littéraux : sortie directe
// - Fonction(name) : empilée, sortie après la parenthèse fermante de son argument
// - Var suivie de '(' : appel d’une fonction inconnue => UnsupportedFunction
// - Moins unaire (pas de valeur avant) : Op::Neg préfixe, empilé sans dépiler
//   Plus unaire : ignoré
// - Binaire : dépile tant que précédence(sommet) >= précédence(entrant)
//   (gauche-à-droite pour tous, y compris ^ : 2^3^2 = (2^3)^2)
// - Virgule : dépile jusqu’à '(' ; le nombre d’arguments est vérifié à ')'

use super::erreur::{EvalError, Resultat};
use super::fonctions;
use super::jetons::{Op, Tok};

/// Un groupe ouvert par '(' : appel de fonction ou simple parenthésage.
struct Groupe {
    fonction: Option<String>,
    virgules: usize,
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Fonction("sqrt"), LPar, Num(16), RPar, Op(Plus), Num(1)]
///   rpn:    [Num(16), Fonction("sqrt"), Num(1), Op(Plus)]
pub fn to_postfix(tokens: &[Tok]) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Tok> = Vec::new();
    let mut groupes: Vec<Groupe> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;

    let mut it = tokens.iter().peekable();
    while let Some(tok) = it.next() {
        match tok {
            Tok::Num(_) | Tok::Matrice(_) | Tok::Complexe(_, _) => {
                out.push(tok.clone());
                prev_was_value = true;
            }

            Tok::Var(name) => {
                if matches!(it.peek(), Some(Tok::LPar)) {
                    return Err(EvalError::UnsupportedFunction(name.clone()));
                }
                out.push(tok.clone());
                prev_was_value = true;
            }

            Tok::Fonction(_) => {
                // l’argument doit être parenthésé : "sin 30" refusé
                if !matches!(it.peek(), Some(Tok::LPar)) {
                    return Err(EvalError::InvalidExpression);
                }
                ops.push(tok.clone());
                prev_was_value = false;
            }

            Tok::LPar => {
                let fonction = match ops.last() {
                    Some(Tok::Fonction(name)) => Some(name.clone()),
                    _ => None,
                };
                groupes.push(Groupe {
                    fonction,
                    virgules: 0,
                });
                ops.push(Tok::LPar);
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(EvalError::InvalidExpression);
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out)
                    .ok_or(EvalError::InvalidExpression)?;
                let groupe = groupes.last_mut().ok_or(EvalError::InvalidExpression)?;
                groupe.virgules += 1;
                prev_was_value = false;
            }

            Tok::RPar => {
                depile_jusqu_a_parenthese(&mut ops, &mut out)
                    .ok_or(EvalError::UnmatchedParentheses)?;
                // dépile aussi la '(' elle-même
                ops.pop();
                let groupe = groupes.pop().ok_or(EvalError::UnmatchedParentheses)?;

                // "()" ou "f(1,)" : argument manquant
                if !prev_was_value {
                    return Err(EvalError::InvalidExpression);
                }

                match groupe.fonction {
                    Some(name) => {
                        let attendu = fonctions::arite(&name)
                            .ok_or_else(|| EvalError::UnsupportedFunction(name.clone()))?;
                        if groupe.virgules + 1 != attendu {
                            return Err(EvalError::InvalidExpression);
                        }
                        // la fonction est juste sous la '(' : on la sort aussi
                        if let Some(f @ Tok::Fonction(_)) = ops.pop() {
                            out.push(f);
                        }
                    }
                    None if groupe.virgules > 0 => return Err(EvalError::InvalidExpression),
                    None => {}
                }

                prev_was_value = true;
            }

            Tok::Op(op @ (Op::Plus | Op::Moins)) if !prev_was_value => {
                // moins unaire : préfixe, ne dépile rien
                if *op == Op::Moins {
                    ops.push(Tok::Op(Op::Neg));
                }
                prev_was_value = false;
            }

            Tok::Op(op) => {
                while let Some(Tok::Op(top)) = ops.last() {
                    if top.precedence() >= op.precedence() {
                        out.push(Tok::Op(*top));
                        ops.pop();
                    } else {
                        break;
                    }
                }
                ops.push(Tok::Op(*op));
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(EvalError::UnmatchedParentheses);
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile vers la sortie jusqu’à '(' (laissée sur la pile).
/// None si aucune '(' n’est ouverte.
fn depile_jusqu_a_parenthese(ops: &mut Vec<Tok>, out: &mut Vec<Tok>) -> Option<()> {
    loop {
        match ops.last()? {
            Tok::LPar => return Some(()),
            _ => {
                let top = ops.pop()?;
                out.push(top);
            }
        }
    }
}
