use std::io::{self, Write};
use std::path::Path;

use cartopub::application::PassReport;
use cartopub::config::ConfigWarning;

pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        eprintln!("⚠ {}", w);
    }
}

/// Human summary of a pass
pub fn render_summary(command: &str, vault: &Path, report: &PassReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("cartopub {} ({})\n", command, vault.display()));
    out.push_str(&format!(
        "  created {}, updated {}, unchanged {}, deleted {}, skipped {}",
        report.created.len(),
        report.updated.len(),
        report.unchanged.len(),
        report.deleted.len(),
        report.skipped,
    ));
    if report.failed > 0 {
        out.push_str(&format!(", failed {}", report.failed));
    }
    out.push('\n');
    if report.manifest_entries > 0 {
        out.push_str(&format!("  manifest entries: {}\n", report.manifest_entries));
    }
    for path in &report.missing {
        out.push_str(&format!("  ⚠ missing: {}\n", path));
    }
    out
}

pub fn print_report(command: &str, vault: &Path, report: &PassReport, json: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let line = serde_json::to_string(&serde_json::json!({
            "command": command,
            "report": report,
        }))
        .unwrap_or_else(|_| "{}".to_string());
        writeln!(stdout, "{}", line)
    } else {
        write!(stdout, "{}", render_summary(command, vault, report))
    }
}
