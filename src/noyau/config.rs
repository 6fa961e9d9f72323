//! src/noyau/config.rs
//!
//! Options d’évaluation (sans état caché).
//!
//! Contrats :
//! - Aucune valeur globale : la config est passée par référence à chaque appel.
//! - Défense en profondeur : bornes sur digits et sur le rang des matrices.

/// Précision d’affichage par défaut (décimales significatives).
const DIGITS_DEFAUT: usize = 10;

/// Garde-fou : au-delà, f64 n’a plus rien à dire.
const DIGITS_MAX: usize = 15;

/// Rang max pour det/inv (cofacteurs = coût exponentiel).
const RANG_MAX_DEFAUT: usize = 8;

/// Traitement des caractères non reconnus par le tokenizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lecture {
    /// Caractère inconnu => erreur `InvalidCharacter`.
    #[default]
    Stricte,
    /// Caractère inconnu => ignoré silencieusement.
    Permissive,
}

/// Unité des angles pour la trigonométrie.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Angles {
    #[default]
    Radians,
    Degres,
}

impl Angles {
    /// Angle utilisateur -> radians (entrée de sin/cos/tan).
    pub fn vers_radians(self, x: f64) -> f64 {
        match self {
            Angles::Radians => x,
            Angles::Degres => x.to_radians(),
        }
    }

    /// Radians -> angle utilisateur (sortie de asin/acos/atan).
    pub fn depuis_radians(self, x: f64) -> f64 {
        match self {
            Angles::Radians => x,
            Angles::Degres => x.to_degrees(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub lecture: Lecture,
    pub angles: Angles,
    pub digits: usize,
    pub rang_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lecture: Lecture::default(),
            angles: Angles::default(),
            digits: DIGITS_DEFAUT,
            rang_max: RANG_MAX_DEFAUT,
        }
    }
}

impl Config {
    pub fn avec_lecture(mut self, lecture: Lecture) -> Self {
        self.lecture = lecture;
        self
    }

    pub fn avec_angles(mut self, angles: Angles) -> Self {
        self.angles = angles;
        self
    }

    /// Garde-fou : limite digits.
    pub fn avec_digits(mut self, digits: usize) -> Self {
        self.digits = digits.min(DIGITS_MAX);
        self
    }

    pub fn avec_rang_max(mut self, rang_max: usize) -> Self {
        self.rang_max = rang_max.max(1);
        self
    }
}
