// src/noyau/matrice.rs
//
// Matrices : littéraux [a,b;c,d] + opérations algébriques
// -------------------------------------------------------
// - Lignes séparées par ';', entrées par ','
// - Rectangulaire vérifiée à la construction (avant toute opération)
// - Opération choisie HORS crochets : mot-clé (inv, transpose, det) sinon × / * puis + puis -,
//   sinon det par défaut
// - det : développement par cofacteurs sur la 1re ligne (coût exponentiel => rang borné)

use std::fmt;
use std::str::FromStr;

use log::debug;

use super::config::Config;
use super::erreur::{EvalError, Resultat};
use super::format;
use super::jetons::{tokenize, Op, Tok};

/// Pivot considéré nul pour l’inversion.
const EPS_PIVOT: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    lignes: Vec<Vec<f64>>,
}

impl Matrix {
    /// Construit une matrice non vide et rectangulaire.
    pub fn new(lignes: Vec<Vec<f64>>) -> Resultat<Self> {
        let cols = lignes.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(EvalError::InvalidExpression);
        }
        if lignes.iter().any(|l| l.len() != cols) {
            return Err(EvalError::MatrixDimensionMismatch);
        }
        Ok(Self { lignes })
    }

    pub fn rows(&self) -> usize {
        self.lignes.len()
    }

    pub fn cols(&self) -> usize {
        self.lignes[0].len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.lignes.get(i).and_then(|l| l.get(j)).copied()
    }

    pub fn lignes(&self) -> &[Vec<f64>] {
        &self.lignes
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    fn meme_forme(&self, autre: &Matrix) -> Resultat<()> {
        if self.rows() != autre.rows() || self.cols() != autre.cols() {
            return Err(EvalError::MatrixDimensionMismatch);
        }
        Ok(())
    }

    fn terme_a_terme(&self, autre: &Matrix, f: impl Fn(f64, f64) -> f64) -> Resultat<Matrix> {
        self.meme_forme(autre)?;
        let lignes = self
            .lignes
            .iter()
            .zip(&autre.lignes)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect())
            .collect();
        Ok(Matrix { lignes })
    }

    pub fn add(&self, autre: &Matrix) -> Resultat<Matrix> {
        self.terme_a_terme(autre, |x, y| x + y)
    }

    pub fn sub(&self, autre: &Matrix) -> Resultat<Matrix> {
        self.terme_a_terme(autre, |x, y| x - y)
    }

    /// Produit ligne-par-colonne : (n×m)·(m×p) -> n×p.
    pub fn mul(&self, autre: &Matrix) -> Resultat<Matrix> {
        if self.cols() != autre.rows() {
            return Err(EvalError::MatrixDimensionMismatch);
        }
        let lignes = (0..self.rows())
            .map(|i| {
                (0..autre.cols())
                    .map(|j| {
                        (0..self.cols())
                            .map(|k| self.lignes[i][k] * autre.lignes[k][j])
                            .sum()
                    })
                    .collect()
            })
            .collect();
        Ok(Matrix { lignes })
    }

    pub fn transpose(&self) -> Matrix {
        let lignes = (0..self.cols())
            .map(|j| (0..self.rows()).map(|i| self.lignes[i][j]).collect())
            .collect();
        Matrix { lignes }
    }

    /// Mineur : retire la ligne `i` et la colonne `j`.
    fn mineur(&self, i: usize, j: usize) -> Matrix {
        let lignes = self
            .lignes
            .iter()
            .enumerate()
            .filter(|(r, _)| *r != i)
            .map(|(_, l)| {
                l.iter()
                    .enumerate()
                    .filter(|(c, _)| *c != j)
                    .map(|(_, x)| *x)
                    .collect()
            })
            .collect();
        Matrix { lignes }
    }

    /// Déterminant par cofacteurs (1re ligne, signe + en colonne 0).
    pub fn determinant(&self) -> Resultat<f64> {
        if !self.is_square() {
            return Err(EvalError::MatrixDimensionMismatch);
        }
        Ok(self.det_cofacteurs())
    }

    fn det_cofacteurs(&self) -> f64 {
        let l = &self.lignes;
        match self.rows() {
            1 => l[0][0],
            2 => l[0][0] * l[1][1] - l[0][1] * l[1][0],
            n => (0..n)
                .map(|j| {
                    let signe = if j % 2 == 0 { 1.0 } else { -1.0 };
                    signe * l[0][j] * self.mineur(0, j).det_cofacteurs()
                })
                .sum(),
        }
    }

    /// Inverse par Gauss–Jordan, pivot partiel.
    pub fn inverse(&self) -> Resultat<Matrix> {
        if !self.is_square() {
            return Err(EvalError::MatrixDimensionMismatch);
        }
        let n = self.rows();

        // [A | I]
        let mut a: Vec<Vec<f64>> = self
            .lignes
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let mut ligne = l.clone();
                ligne.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
                ligne
            })
            .collect();

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
                .unwrap_or(col);
            if a[pivot][col].abs() < EPS_PIVOT {
                return Err(EvalError::SingularMatrix);
            }
            a.swap(col, pivot);

            let p = a[col][col];
            for x in a[col].iter_mut() {
                *x /= p;
            }
            let ligne_pivot = a[col].clone();
            for (r, ligne) in a.iter_mut().enumerate() {
                if r == col {
                    continue;
                }
                let facteur = ligne[col];
                if facteur != 0.0 {
                    for (x, y) in ligne.iter_mut().zip(&ligne_pivot) {
                        *x -= facteur * y;
                    }
                }
            }
        }

        let lignes = a.into_iter().map(|l| l[n..].to_vec()).collect();
        Ok(Matrix { lignes })
    }
}

impl Matrix {
    /// Tous les littéraux "[...]" d’un texte, dans l’ordre d’apparition.
    pub fn parse_all(texte: &str, cfg: &Config) -> Resultat<Vec<Matrix>> {
        Ok(tokenize(texte, cfg)?
            .into_iter()
            .filter_map(|t| match t {
                Tok::Matrice(m) => Some(m),
                _ => None,
            })
            .collect())
    }
}

/// Forme littérale, relisible par `parse` (f64 affichés sans perte).
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, ligne) in self.lignes.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            for (j, x) in ligne.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{x}")?;
            }
        }
        write!(f, "]")
    }
}

/// Littéral "[a,b;c,d]" (crochets optionnels).
impl FromStr for Matrix {
    type Err = EvalError;

    fn from_str(s: &str) -> Resultat<Self> {
        let s = s.trim();
        let interieur = s
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .unwrap_or(s);
        if interieur.trim().is_empty() {
            return Err(EvalError::InvalidExpression);
        }

        let lignes = interieur
            .split(';')
            .map(|ligne| {
                ligne
                    .split(',')
                    .map(|x| {
                        // "nan", "inf", "1e400" : pas des entrées numériques
                        x.trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite())
                            .ok_or(EvalError::InvalidExpression)
                    })
                    .collect::<Resultat<Vec<f64>>>()
            })
            .collect::<Resultat<Vec<_>>>()?;

        Matrix::new(lignes)
    }
}

/* ------------------------ Moteur ------------------------ */

/// Résultat d’une expression matricielle : 1×1 / det => scalaire, sinon matrice entière.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixOutcome {
    Scalar(f64),
    Matrix(Matrix),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpMatrice {
    Produit,
    Somme,
    Difference,
    Determinant,
    Inverse,
    Transposee,
}

impl OpMatrice {
    /// Mot-clé d’abord, puis ×, +, - (dans cet ordre de priorité), sinon det.
    fn choisir(jetons: &[Tok]) -> OpMatrice {
        let a_fonction = |noms: &[&str]| {
            jetons
                .iter()
                .any(|t| matches!(t, Tok::Fonction(n) if noms.contains(&n.as_str())))
        };
        let a_op = |ops: &[Op]| jetons.iter().any(|t| matches!(t, Tok::Op(o) if ops.contains(o)));

        if a_fonction(&["inv"]) {
            OpMatrice::Inverse
        } else if a_fonction(&["transpose", "trans"]) {
            OpMatrice::Transposee
        } else if a_fonction(&["det"]) {
            OpMatrice::Determinant
        } else if a_op(&[Op::FoisMatrice, Op::Fois]) {
            OpMatrice::Produit
        } else if a_op(&[Op::Plus]) {
            OpMatrice::Somme
        } else if a_op(&[Op::Moins]) {
            OpMatrice::Difference
        } else {
            OpMatrice::Determinant
        }
    }

    fn binaire(self) -> bool {
        matches!(
            self,
            OpMatrice::Produit | OpMatrice::Somme | OpMatrice::Difference
        )
    }
}

/// Évalue une expression matricielle : "[1,2;3,4] × [5,6;7,8]", "det([1,2;3,4])"...
pub fn evaluate_matrix_expr(expr: &str, cfg: &Config) -> Resultat<(MatrixOutcome, Vec<String>)> {
    let jetons = tokenize(expr, cfg)?;
    let litteraux = Matrix::parse_all(expr, cfg)?;
    let matrices: Vec<&Matrix> = litteraux.iter().collect();

    let op = OpMatrice::choisir(&jetons);
    debug!("matrices: {} ; opération: {op:?}", matrices.len());

    let d = cfg.digits;
    let mut etapes = Vec::new();

    let attendu = if op.binaire() { 2 } else { 1 };
    if matrices.len() != attendu {
        return Err(EvalError::InvalidExpression);
    }

    let resultat = match op {
        OpMatrice::Somme | OpMatrice::Difference | OpMatrice::Produit => {
            let (a, b) = (matrices[0], matrices[1]);
            let (r, symbole) = match op {
                OpMatrice::Somme => (a.add(b)?, "+"),
                OpMatrice::Difference => (a.sub(b)?, "-"),
                _ => (a.mul(b)?, "×"),
            };
            etapes.push(format!(
                "A = {} ({}×{}), B = {} ({}×{})",
                format::matrice(a, d),
                a.rows(),
                a.cols(),
                format::matrice(b, d),
                b.rows(),
                b.cols()
            ));
            if op == OpMatrice::Produit {
                detail_produit(a, b, d, &mut etapes);
            }
            etapes.push(format!("A {symbole} B = {}", format::matrice(&r, d)));
            r
        }

        OpMatrice::Determinant => {
            let m = matrices[0];
            rang_autorise(m, cfg)?;
            let det = m.determinant()?;
            detail_determinant(m, det, d, &mut etapes);
            return Ok((MatrixOutcome::Scalar(det), etapes));
        }

        OpMatrice::Inverse => {
            let m = matrices[0];
            rang_autorise(m, cfg)?;
            let inv = m.inverse()?;
            etapes.push(format!(
                "Gauss–Jordan sur [A | I], A = {}",
                format::matrice(m, d)
            ));
            etapes.push(format!("inv(A) = {}", format::matrice(&inv, d)));
            inv
        }

        OpMatrice::Transposee => {
            let t = matrices[0].transpose();
            etapes.push(format!(
                "transpose({}) = {}",
                format::matrice(matrices[0], d),
                format::matrice(&t, d)
            ));
            t
        }
    };

    if resultat.rows() == 1 && resultat.cols() == 1 {
        return Ok((MatrixOutcome::Scalar(resultat.lignes[0][0]), etapes));
    }
    Ok((MatrixOutcome::Matrix(resultat), etapes))
}

/// Garde-fou : cofacteurs / Gauss–Jordan au-delà de rang_max refusés.
fn rang_autorise(m: &Matrix, cfg: &Config) -> Resultat<()> {
    if m.rows() > cfg.rang_max {
        return Err(EvalError::InvalidArgument);
    }
    Ok(())
}

/// Une ligne par coefficient : c11 = 1×5 + 2×7 = 19
fn detail_produit(a: &Matrix, b: &Matrix, d: usize, etapes: &mut Vec<String>) {
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let termes: Vec<String> = (0..a.cols())
                .map(|k| {
                    format!(
                        "{}×{}",
                        format::nombre(a.lignes[i][k], d),
                        format::nombre(b.lignes[k][j], d)
                    )
                })
                .collect();
            let v: f64 = (0..a.cols())
                .map(|k| a.lignes[i][k] * b.lignes[k][j])
                .sum();
            etapes.push(format!(
                "c{}{} = {} = {}",
                i + 1,
                j + 1,
                termes.join(" + "),
                format::nombre(v, d)
            ));
        }
    }
}

fn detail_determinant(m: &Matrix, det: f64, d: usize, etapes: &mut Vec<String>) {
    let l = &m.lignes;
    let n = |x: f64| format::nombre(x, d);

    match m.rows() {
        1 => etapes.push(format!("det({}) = {}", format::matrice(m, d), n(det))),
        2 => etapes.push(format!(
            "det({}) = {}×{} - {}×{} = {}",
            format::matrice(m, d),
            n(l[0][0]),
            n(l[1][1]),
            n(l[0][1]),
            n(l[1][0]),
            n(det)
        )),
        taille => {
            etapes.push(format!(
                "développement par cofacteurs sur la ligne 1 de {}",
                format::matrice(m, d)
            ));
            for j in 0..taille {
                let signe = if j % 2 == 0 { "+" } else { "-" };
                let mineur = m.mineur(0, j);
                let det_mineur = mineur.det_cofacteurs();
                etapes.push(format!(
                    "{signe}{} × det({}) = {signe}{} × {}",
                    n(l[0][j]),
                    format::matrice(&mineur, d),
                    n(l[0][j]),
                    n(det_mineur)
                ));
            }
            etapes.push(format!("det = {}", n(det)));
        }
    }
}
