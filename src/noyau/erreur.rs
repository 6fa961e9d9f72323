// src/noyau/erreur.rs
//
// Taxonomie des erreurs du noyau.
// Chaque échec remonte tel quel à l’appelant (pas de reprise interne) :
// c’est l’appelant qui décide de l’affichage (ex: préfixe "Error:").

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("entrée vide")]
    EmptyInput,
    #[error("expression invalide")]
    InvalidExpression,
    #[error("caractère inattendu: '{0}'")]
    InvalidCharacter(char),
    #[error("parenthèses non appariées")]
    UnmatchedParentheses,
    #[error("division par zéro")]
    DivisionByZero,
    #[error("opération non supportée: {0}")]
    UnsupportedOperation(String),
    #[error("fonction non supportée: {0}")]
    UnsupportedFunction(String),
    #[error("variable inconnue: {0}")]
    UnknownVariable(String),
    #[error("argument invalide")]
    InvalidArgument,
    #[error("dimensions de matrices incompatibles")]
    MatrixDimensionMismatch,
    #[error("matrice singulière")]
    SingularMatrix,
    #[error("aucune variable trouvée")]
    NoVariableFound,
    #[error("équation invalide")]
    InvalidEquation,
    #[error("équation trop complexe (forme attendue: ax + b = c)")]
    EquationTooComplex,
}

/// Résultat du noyau.
pub type Resultat<T> = Result<T, EvalError>;
