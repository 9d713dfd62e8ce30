use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use std::fs;
use std::path::Path;

use schemasketch_core::{BusinessProfile, ContactMessage};

use crate::client::ApiClient;

/// Run the five-step design wizard and write the generated design to disk.
pub async fn run_design(client: &ApiClient, out_dir: &Path) -> Result<()> {
    println!("╔═══════════════════════════════════════════════════╗");
    println!("║   SchemaSketch Design Wizard                      ║");
    println!("║   Describe your business, get a database design   ║");
    println!("╚═══════════════════════════════════════════════════╝\n");

    let theme = ColorfulTheme::default();

    // Step 1: business name
    let name: String = Input::with_theme(&theme)
        .with_prompt("What's the name of your business?")
        .interact_text()?;

    // Step 2: business type, then fetch suggestions for the next steps
    let business_type: String = Input::with_theme(&theme)
        .with_prompt("What type of business are you running?")
        .interact_text()?;

    println!("\nFetching suggestions for a {business_type} business...");
    let suggestions = client.entity_suggestions(&business_type).await?;

    // Steps 3-5: one category per step, suggested items plus custom entries
    let people = pick_category(&theme, "people (key roles)", suggestions.people)?;
    let resources = pick_category(&theme, "resources (main assets)", suggestions.resources)?;
    let activities = pick_category(&theme, "activities (core processes)", suggestions.activities)?;

    let profile = BusinessProfile {
        name,
        business_type,
        people,
        resources,
        activities,
        summary: None,
    };

    println!("\nGenerating your database design (this can take a minute)...");
    let schema = client.generate_schema(&profile).await?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let sql_path = out_dir.join("schema.sql");
    let mmd_path = out_dir.join("diagram.mmd");
    fs::write(&sql_path, &schema.sql_code)
        .with_context(|| format!("Failed to write {}", sql_path.display()))?;
    fs::write(&mmd_path, &schema.mermaid_code)
        .with_context(|| format!("Failed to write {}", mmd_path.display()))?;

    println!("\n✅ Design written:");
    println!("   {}", sql_path.display());
    println!("   {}", mmd_path.display());
    println!("\nMermaid diagram source:\n");
    println!("{}", schema.mermaid_code);

    Ok(())
}

/// Submit a contact message through the API.
pub async fn run_contact(client: &ApiClient) -> Result<()> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Your name")
        .interact_text()?;
    let email: String = Input::with_theme(&theme)
        .with_prompt("Your email")
        .validate_with(|input: &String| {
            if input.contains('@') {
                Ok(())
            } else {
                Err("enter a valid email address")
            }
        })
        .interact_text()?;
    let message: String = Input::with_theme(&theme)
        .with_prompt("Your message")
        .interact_text()?;

    client
        .submit_contact(&ContactMessage {
            name,
            email,
            message,
        })
        .await?;

    println!("\n✅ Your message has been sent successfully!");
    Ok(())
}

fn pick_category(
    theme: &ColorfulTheme,
    label: &str,
    suggested: Vec<String>,
) -> Result<Vec<String>> {
    println!();
    let mut chosen: Vec<String> = if suggested.is_empty() {
        Vec::new()
    } else {
        let picks = MultiSelect::with_theme(theme)
            .with_prompt(format!(
                "Select the {label} for your business (space to toggle)"
            ))
            .items(&suggested)
            .interact()?;
        picks.into_iter().map(|i| suggested[i].clone()).collect()
    };

    loop {
        let custom: String = Input::with_theme(theme)
            .with_prompt(format!("Add a custom entry for {label} (empty to continue)"))
            .allow_empty(true)
            .interact_text()?;
        let custom = custom.trim();
        if custom.is_empty() {
            break;
        }
        if push_unique(&mut chosen, custom) {
            println!("Added \"{custom}\"");
        } else {
            println!("\"{custom}\" is already selected");
        }
    }

    Ok(chosen)
}

/// Append `candidate` unless an identical entry is already present.
fn push_unique(items: &mut Vec<String>, candidate: &str) -> bool {
    if items.iter().any(|existing| existing == candidate) {
        return false;
    }
    items.push(candidate.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_unique_deduplicates() {
        let mut items = vec!["customer".to_string()];
        assert!(push_unique(&mut items, "clerk"));
        assert!(!push_unique(&mut items, "customer"));
        assert_eq!(items, vec!["customer", "clerk"]);
    }
}
