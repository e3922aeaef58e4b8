//! Fallback README for projects whose generators did not render one

use crate::manifest::Manifest;
use crate::runtime::PackageManager;

fn describe_script(name: &str) -> Option<&'static str> {
    match name {
        "serve" => Some("Compiles and hot-reloads for development"),
        "build" => Some("Compiles and minifies for production"),
        "test:unit" => Some("Run your unit tests"),
        "test:e2e" => Some("Run your end-to-end tests"),
        "lint" => Some("Lints and fixes files"),
        _ => None,
    }
}

fn run_command(pm: PackageManager, script: &str) -> String {
    match pm {
        PackageManager::Yarn => format!("yarn {}", script),
        other => format!("{} run {}", other.bin(), script),
    }
}

/// Render the README from the final manifest and the chosen package manager
pub fn generate_readme(pkg: &Manifest, pm: PackageManager, config_docs_url: &str) -> String {
    let mut sections = vec![
        format!("# {}\n", pkg.name),
        "## Project setup".to_string(),
        "```".to_string(),
        format!("{} install", pm.bin()),
        "```".to_string(),
    ];

    let scripts: String = pkg
        .scripts()
        .iter()
        .filter_map(|(name, _)| {
            describe_script(name).map(|description| {
                format!(
                    "\n### {}\n```\n{}\n```\n",
                    description,
                    run_command(pm, name)
                )
            })
        })
        .collect();
    sections.push(scripts);

    sections.push("### Customize configuration".to_string());
    sections.push(format!("See [Configuration Reference]({}).", config_docs_url));
    sections.push(String::new());
    sections.join("\n")
}
