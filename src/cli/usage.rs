// src/cli/usage.rs

use crate::{
    constants::EXECUTABLE_NAME,
    models::{Config, ScriptSpec},
};
use colored::*;
use std::fmt::Write;

/// The full script listing, shown for an empty or unknown invocation.
pub fn render_listing(config: &Config) -> String {
    let mut out = String::from("\n");

    if config.scripts.is_empty() {
        let _ = writeln!(out, "{}\n", t!("usage.no_scripts").red());
        return out;
    }

    let header = match &config.name {
        Some(name) => format!("{} {}", name, t!("usage.available_scripts")),
        None => t!("usage.available_scripts").to_string(),
    };
    let _ = writeln!(out, "{}\n", header.green());
    for (key, spec) in config.scripts.iter() {
        write_overview(&mut out, config, key, spec);
    }
    out
}

/// The usage block of a single script, shown when its arguments don't match.
pub fn render_script_usage(config: &Config, key: &str, spec: &ScriptSpec) -> String {
    let mut out = String::from("\n");
    let _ = writeln!(out, "{}\n", t!("usage.correct_usage").green());
    write_overview(&mut out, config, key, spec);
    out
}

fn write_overview(out: &mut String, config: &Config, key: &str, spec: &ScriptSpec) {
    let shown = spec.display_name(key);
    if shown != key {
        let _ = writeln!(out, "- {}", format!("{} / {}", key, shown).cyan());
    } else {
        let _ = writeln!(out, "- {}", key.cyan());
    }

    if let Some(desc) = &spec.desc {
        let _ = writeln!(out, "    {}", desc.blue());
    }

    if !spec.args.is_empty() {
        let placeholders: Vec<String> = spec.args.iter().map(|arg| format!("_{}_", arg)).collect();
        let examples: Vec<&str> = spec
            .args
            .iter()
            .map(|arg| {
                config
                    .arg_examples
                    .get(arg)
                    .map(String::as_str)
                    .unwrap_or(arg)
            })
            .collect();

        let usage_line = format!("{} {} {}", EXECUTABLE_NAME, shown, placeholders.join(" "));
        let example_line = format!("{} {} {}", EXECUTABLE_NAME, shown, examples.join(" "));
        let _ = writeln!(out, "      {:<9}{}", t!("usage.label.usage"), usage_line.bright_blue());
        let _ = writeln!(out, "      {:<9}{}", t!("usage.label.example"), example_line.red());
    }
    out.push('\n');
}
