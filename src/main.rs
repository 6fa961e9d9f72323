// src/main.rs
//
// Calculatrice — point d’entrée ligne de commande
// ------------------------------------------------
// - une expression par argument, sinon une par ligne sur stdin
// - sortie texte (résultat puis démarche indentée) ou JSON (--json)
// - --plot BAS:HAUT:N : points (x, f(x)) pour la fonction de x donnée

use std::io::{self, BufRead};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;
use serde_json::json;

use calculatrice_moteur::{evaluate, generate_points, Angles, Config, Lecture, Variables};

#[derive(Parser, Debug)]
#[command(author, version, about = "Calculatrice : évaluation d’expressions avec démarche")]
struct Cli {
    /// Expressions à évaluer (stdin si absentes)
    expressions: Vec<String>,

    /// Trigonométrie en degrés
    #[arg(long, env = "CALC_DEGREES", value_parser = parse_bool_env)]
    degrees: bool,

    /// Ignorer les caractères inconnus au lieu d’échouer
    #[arg(long, env = "CALC_LENIENT", value_parser = parse_bool_env)]
    lenient: bool,

    /// Décimales affichées (max 15)
    #[arg(long, env = "CALC_DIGITS", default_value = "10")]
    digits: usize,

    /// Liaison NOM=VALEUR (répétable)
    #[arg(long = "var", value_name = "NOM=VALEUR", value_parser = parse_liaison)]
    vars: Vec<(String, f64)>,

    /// Une ligne JSON par expression
    #[arg(long, env = "CALC_JSON", value_parser = parse_bool_env)]
    json: bool,

    /// Échantillonne la fonction de x : BAS:HAUT:N
    #[arg(long, value_name = "BAS:HAUT:N", value_parser = parse_plage)]
    plot: Option<(f64, f64, usize)>,

    /// Journal détaillé (debug)
    #[arg(short, long, env = "CALC_VERBOSE", value_parser = parse_bool_env)]
    verbose: bool,
}

fn parse_bool_env(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(format!("valeur booléenne invalide '{s}'")),
    }
}

fn parse_liaison(s: &str) -> Result<(String, f64), String> {
    let (nom, valeur) = s
        .split_once('=')
        .ok_or_else(|| format!("attendu NOM=VALEUR, obtenu '{s}'"))?;
    let valeur: f64 = valeur
        .trim()
        .parse()
        .map_err(|_| format!("valeur non numérique pour {nom}: '{valeur}'"))?;
    Ok((nom.trim().to_string(), valeur))
}

fn parse_plage(s: &str) -> Result<(f64, f64, usize), String> {
    let parties: Vec<&str> = s.split(':').collect();
    let [bas, haut, n] = parties.as_slice() else {
        return Err(format!("attendu BAS:HAUT:N, obtenu '{s}'"));
    };
    let bas: f64 = bas.trim().parse().map_err(|_| format!("borne invalide '{bas}'"))?;
    let haut: f64 = haut.trim().parse().map_err(|_| format!("borne invalide '{haut}'"))?;
    let n: usize = n.trim().parse().map_err(|_| format!("nombre de points invalide '{n}'"))?;
    Ok((bas, haut, n))
}

fn config(cli: &Cli) -> Config {
    let angles = if cli.degrees {
        Angles::Degres
    } else {
        Angles::Radians
    };
    let lecture = if cli.lenient {
        Lecture::Permissive
    } else {
        Lecture::Stricte
    };
    Config::default()
        .avec_angles(angles)
        .avec_lecture(lecture)
        .avec_digits(cli.digits)
}

fn variables(cli: &Cli) -> Result<Variables> {
    let mut vars = Variables::new();
    for (nom, valeur) in &cli.vars {
        vars.define(nom, *valeur)
            .map_err(|e| anyhow!("--var {nom}: {e}"))?;
    }
    Ok(vars)
}

/// Expressions en argument, sinon lignes non vides de stdin.
fn expressions(cli: &Cli) -> Result<Vec<String>> {
    if !cli.expressions.is_empty() {
        return Ok(cli.expressions.clone());
    }
    let mut lignes = Vec::new();
    for ligne in io::stdin().lock().lines() {
        let ligne = ligne.context("lecture de stdin")?;
        if !ligne.trim().is_empty() {
            lignes.push(ligne);
        }
    }
    Ok(lignes)
}

/// Retourne false si l’évaluation a échoué.
fn afficher(expr: &str, vars: &Variables, cfg: &Config, json: bool) -> Result<bool> {
    let r = evaluate(expr, vars, cfg);

    if json {
        let objet = match &r {
            Ok(ev) => json!({
                "expression": expr,
                "ok": true,
                "result": ev.valeur.texte(cfg.digits),
                "steps": ev.etapes,
            }),
            Err(e) => json!({
                "expression": expr,
                "ok": false,
                "error": e.to_string(),
            }),
        };
        println!("{}", serde_json::to_string(&objet)?);
    } else {
        match &r {
            Ok(ev) => {
                println!("{}", ev.valeur.texte(cfg.digits));
                for etape in &ev.etapes {
                    println!("    {etape}");
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(r.is_ok())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filtre = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filtre)).init();
    debug!("{cli:?}");

    let cfg = config(&cli);
    let vars = variables(&cli)?;

    if let Some((bas, haut, n)) = cli.plot {
        let [fonction] = cli.expressions.as_slice() else {
            bail!("--plot attend exactement une fonction de x");
        };
        for (x, y) in generate_points(fonction, bas, haut, n, &vars, &cfg) {
            println!("{x}\t{y}");
        }
        return Ok(());
    }

    let mut echecs = 0;
    for expr in expressions(&cli)? {
        if !afficher(&expr, &vars, &cfg, cli.json)? {
            echecs += 1;
        }
    }

    if echecs > 0 {
        std::process::exit(1);
    }
    Ok(())
}
