//! Report rendering over scenario results.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::scenarios::ScenarioResult;

pub fn print_console_report(results: &[ScenarioResult], total_duration: Duration) {
    println!();
    println!("{}", "Velvet Trail Logic Test Results".bright_cyan().bold());
    println!("{}", "===============================".cyan());

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    println!("Total scenarios: {total}");
    println!("Passed: {}", passed.to_string().green());
    println!("Failed: {}", failed.to_string().red());
    println!("Total time: {total_duration:?}");
    println!();

    for result in results {
        let status = if result.passed {
            "PASS".green()
        } else {
            "FAIL".red()
        };

        println!("{} {}", status, result.scenario_name.bold());
        println!(
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        );
        println!("   Duration: {}ms", result.duration_ms);

        if !result.failures.is_empty() {
            println!("   Failures:");
            for failure in &result.failures {
                println!("     - {}", failure.red());
            }
        }
        println!();
    }
}

/// Pretty-printed JSON document over all results.
pub fn render_json_report(results: &[ScenarioResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn render_markdown_report(results: &[ScenarioResult]) -> String {
    let mut out = String::from("# Velvet Trail Logic Test Results\n\n");

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "- **Total scenarios**: {total}");
    let _ = writeln!(out, "- **Passed**: {passed}");
    let _ = writeln!(out, "- **Failed**: {}", total - passed);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Scenarios\n");
    let _ = writeln!(out, "| Scenario | Status | Iterations | Duration |");
    let _ = writeln!(out, "|----------|--------|------------|----------|");
    for result in results {
        let status = if result.passed { "pass" } else { "fail" };
        let _ = writeln!(
            out,
            "| {} | {} | {}/{} | {}ms |",
            result.scenario_name,
            status,
            result.successful_iterations,
            result.iterations_run,
            result.duration_ms
        );
    }

    let failing: Vec<_> = results.iter().filter(|r| !r.failures.is_empty()).collect();
    if !failing.is_empty() {
        let _ = writeln!(out, "\n## Failures\n");
        for result in failing {
            let _ = writeln!(out, "### {}\n", result.scenario_name);
            for failure in &result.failures {
                let _ = writeln!(out, "- {failure}");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: String::from("smoke"),
            passed,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec![String::from("seed 7: game did not terminate")]
            },
            duration_ms: 12,
        }
    }

    #[test]
    fn json_report_is_valid_json() {
        let rendered = render_json_report(&[sample(true)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["scenario_name"], "smoke");
    }

    #[test]
    fn markdown_report_lists_failures() {
        let rendered = render_markdown_report(&[sample(false)]);
        assert!(rendered.contains("| smoke | fail | 1/3 |"));
        assert!(rendered.contains("seed 7: game did not terminate"));
    }
}
