// CLI commands for testsmith
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::atomic::Ordering;
use testsmith_common::config::{JudgeSettings, LanguageCatalog};
use testsmith_common::judge::JudgeClient;
use testsmith_common::types::{Language, ProblemRecord, RunStatus};
use testsmith_engine::{extract_verdicts, resolver, synthesize_judge_harness, synthesize_test_harness};
use testsmith_runner::{Executor, RunRequest, Simulation};
use tracing::warn;

fn parse_language(name: &str) -> Result<Language> {
    Language::from_str(name).ok_or_else(|| anyhow!("Unsupported language '{}' (expected typescript, python, java or cpp)", name))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read source {}", path.display()))
}

/// Load one problem record
fn load_problem(path: &Path) -> Result<ProblemRecord> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read problem {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse problem {}", path.display()))
}

/// Load problems from a file holding one record or an array, or from
/// every `.json` file in a directory (sorted by name)
pub fn load_problems(path: &Path) -> Result<Vec<ProblemRecord>> {
    if path.is_dir() {
        let mut files: Vec<_> = fs::read_dir(path)
            .with_context(|| format!("Failed to list {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();
        let mut problems = Vec::new();
        for file in files {
            problems.extend(load_problems(&file)?);
        }
        return Ok(problems);
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    let problems = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|p| vec![p])
    };
    problems.with_context(|| format!("{} is not a problem record", path.display()))
}

fn executor() -> Executor {
    let catalog = LanguageCatalog::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "Language catalog unavailable, using built-in judge ids");
        LanguageCatalog::builtin()
    });
    Executor::new(JudgeClient::new(&JudgeSettings::from_env()), catalog)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn resolve(lang: &str, source: &Path, problem: Option<&Path>) -> Result<()> {
    let language = parse_language(lang)?;
    let code = read_source(source)?;
    let problem = problem.map(load_problem).transpose()?;
    let schema = problem.as_ref().map(|p| p.input_schema.clone()).unwrap_or_default();
    let hint = problem.as_ref().and_then(|p| p.entry_name.as_deref());

    let entry = resolver::resolve(&code, language, &schema, hint);
    let candidates = resolver::find_candidates(&code, language);
    print_json(&serde_json::json!({ "entry": entry, "candidates": candidates }))
}

pub fn synth(lang: &str, source: &Path, problem: &Path, judge: bool, out: Option<&Path>) -> Result<()> {
    let language = parse_language(lang)?;
    let code = read_source(source)?;
    let problem = load_problem(problem)?;
    let hint = problem.entry_name.as_deref();

    let program = if judge {
        synthesize_judge_harness(&code, language, &problem.input_schema, hint, Some(&problem.options))
    } else {
        synthesize_test_harness(
            &code,
            language,
            &problem.test_cases,
            &problem.input_schema,
            hint,
            Some(&problem.options),
        )
    };

    match out {
        Some(path) => {
            fs::write(path, &program).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} harness to {}", language, path.display());
        }
        None => {
            io::stdout().write_all(program.as_bytes())?;
        }
    }
    Ok(())
}

pub fn extract(input: &str) -> Result<()> {
    let raw = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read stdin")?;
        buffer
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };
    let verdicts = extract_verdicts(&raw)?;
    print_json(&verdicts)
}

pub async fn run(lang: &str, source: &Path, problem: &Path) -> Result<()> {
    let language = parse_language(lang)?;
    let code = read_source(source)?;
    let problem = load_problem(problem)?;

    let request = RunRequest::for_problem(&problem, language, &code);
    let report = executor().run(&request).await?;
    print_json(&report)?;

    if report.status != RunStatus::Passed {
        bail!("{} of {} test cases passed", report.passed, report.total);
    }
    Ok(())
}

pub async fn simulate(problems: &Path, stop_on_failure: bool) -> Result<()> {
    let problems = load_problems(problems)?;
    if problems.is_empty() {
        bail!("No problems found");
    }

    let mut simulation = Simulation::new(stop_on_failure);
    let cancel = simulation.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, finishing the current run...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let executor = executor();
    let stats = simulation.run(&executor, &problems).await.clone();

    for line in simulation.log() {
        println!("{}", line);
    }
    println!();
    print_json(&stats)?;

    if stats.failed + stats.errored > 0 {
        bail!("{} runs did not pass", stats.failed + stats.errored);
    }
    Ok(())
}
