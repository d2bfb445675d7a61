//! Minimal CLI: load JSON documents → (type | compare)
use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use dynval::{Value, json};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// inspect JSON documents as frozen dynamic values: their exact types, hashes and how they relate
#[derive(Parser, Debug)]
#[command(name = "dynval")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the exact type and hash of every document
    Type(TypeOut),
    /// compare every pair of documents
    Compare(CompareOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// emit a JSON report instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct TypeOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct CompareOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

struct Document {
    path: String,
    value: Value,
}

#[derive(Serialize)]
struct TypeReport {
    path: String,
    #[serde(rename = "type")]
    ty: String,
    hash: u64,
}

#[derive(Serialize)]
struct CompareReport {
    left: String,
    right: String,
    equal: bool,
    ordering: Option<&'static str>,
    /// the left document's type accepts the right document
    left_accepts_right: bool,
    right_accepts_left: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Reads and converts every input in parallel, keeping input order.
    fn load(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        tracing::debug!(count = source_paths.len(), "loading documents");
        source_paths
            .par_iter()
            .map(|source_path| -> Result<Document> {
                let path = source_path.to_string_lossy().to_string();
                let source = std::fs::read_to_string(source_path)
                    .with_context(|| format!("failed to read source file ({path})"))?;
                let document = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({path})"))?;
                Ok(Document { path, value: json::from_json(&document) })
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Type(target) => {
                let documents = target.input_settings.load()?;
                let reports = documents
                    .iter()
                    .map(|doc| TypeReport {
                        path: doc.path.clone(),
                        ty: doc.value.type_of().to_string(),
                        hash: doc.value.hash_code(),
                    })
                    .collect::<Vec<_>>();
                if target.input_settings.json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                    return Ok(());
                }
                for report in reports {
                    println!(
                        "{} {} {}",
                        report.path.bold(),
                        format!("{:016x}", report.hash).dimmed(),
                        report.ty.cyan(),
                    );
                }
                Ok(())
            }
            Command::Compare(target) => {
                let documents = target.input_settings.load()?;
                if documents.len() < 2 {
                    bail!("compare needs at least two documents, got {}", documents.len());
                }
                let reports = pairs(&documents)
                    .into_par_iter()
                    .map(|(left, right)| compare_documents(left, right))
                    .collect::<Vec<_>>();
                if target.input_settings.json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                    return Ok(());
                }
                for report in reports {
                    let verdict = match report.equal {
                        true => "equal".green(),
                        false => "different".red(),
                    };
                    let ordering = report.ordering.unwrap_or("incomparable");
                    println!(
                        "{} {} {}: {} ({ordering}; assignable {} / {})",
                        report.left.bold(),
                        "vs".dimmed(),
                        report.right.bold(),
                        verdict,
                        yes_no(report.left_accepts_right),
                        yes_no(report.right_accepts_left),
                    );
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn pairs(documents: &[Document]) -> Vec<(&Document, &Document)> {
    let mut out = Vec::new();
    for (i, left) in documents.iter().enumerate() {
        for right in &documents[i + 1..] {
            out.push((left, right));
        }
    }
    out
}

fn compare_documents(left: &Document, right: &Document) -> CompareReport {
    let ordering = left.value.compare_to(&right.value).map(|o| match o {
        Ordering::Less => "less",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    });
    let (lt, rt) = (left.value.type_of(), right.value.type_of());
    CompareReport {
        left: left.path.clone(),
        right: right.path.clone(),
        equal: left.value.equals(&right.value),
        ordering,
        left_accepts_right: lt.assignable(&rt),
        right_accepts_left: rt.assignable(&lt),
    }
}

fn yes_no(b: bool) -> colored::ColoredString {
    match b {
        true => "yes".green(),
        false => "no".yellow(),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
