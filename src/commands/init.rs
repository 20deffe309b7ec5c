use std::io::{self, Write};

use crate::config::Config;
use crate::error::{GithubError, Result};
use crate::output;

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Render the config file contents; empty `owner` is left out.
fn render_config(token: &str, owner: &str) -> String {
    let mut config_content = format!("token = {}\n", toml::Value::from(token));
    if !owner.is_empty() {
        config_content.push_str(&format!("owner = {}\n", toml::Value::from(owner)));
    }
    config_content
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            output::print_message("Aborted.");
            return Ok(());
        }
    }

    println!("gh-team Configuration");
    println!("=====================\n");

    let token = prompt(
        "Enter a GitHub token with read:org scope (create one at https://github.com/settings/tokens): ",
    )?;
    if token.is_empty() {
        return Err(GithubError::MissingToken);
    }

    let owner = prompt("Enter default organization login [optional]: ")?;

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GithubError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, render_config(&token, &owner)).map_err(|e| {
        GithubError::ConfigRead {
            path: config_path.clone(),
            source: e,
        }
    })?;

    output::print_message(&format!("Config saved to {}", config_path.display()));
    Ok(())
}
