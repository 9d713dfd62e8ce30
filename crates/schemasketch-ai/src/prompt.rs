//! Prompt construction for the suggestion and generation operations.

use schemasketch_core::BusinessProfile;

use crate::validator::ValidationFailure;

pub const SYSTEM_PROMPT: &str = "You are an expert database architect. You design \
practical relational schemas for small businesses and express them as SQL DDL and \
Mermaid entity-relationship diagrams.";

/// Prompt asking for entity suggestions as strict JSON.
pub fn suggestion_request(business_type: &str) -> String {
    format!(
        "List the key people, resources and activities involved in running a \
{business_type} business. Reply with strict JSON only, in this exact shape: \
{{\"people\": [...], \"resources\": [...], \"activities\": [...]}} with 5 to 8 \
short lowercase items per array. No prose, no code fences."
    )
}

/// Corrective instruction appended after a suggestion reply fails to parse.
pub fn suggestion_correction() -> String {
    "\n\nYour previous reply was not valid JSON. Reply again with nothing but a \
single JSON object containing the keys \"people\", \"resources\" and \
\"activities\", each mapped to an array of strings."
        .to_string()
}

/// Prompt asking for the full schema: one fenced SQL section and one fenced
/// Mermaid erDiagram section.
pub fn schema_request(profile: &BusinessProfile) -> String {
    let mut prompt = format!(
        "Design a relational database for the following business.\n\n\
Business name: {}\nBusiness type: {}\n",
        profile.name, profile.business_type
    );

    push_category(&mut prompt, "Key people", &profile.people);
    push_category(&mut prompt, "Key resources", &profile.resources);
    push_category(&mut prompt, "Key activities", &profile.activities);

    if let Some(summary) = &profile.summary {
        if !summary.trim().is_empty() {
            prompt.push_str(&format!("Summary: {summary}\n"));
        }
    }

    prompt.push_str(
        "\nReply with exactly two fenced code blocks and nothing else:\n\
1. A ```sql block containing CREATE TABLE statements for every entity, with \
primary keys and foreign keys.\n\
2. A ```mermaid block containing an erDiagram: it must start with the word \
erDiagram, declare each entity as a brace-delimited block of typed attributes, \
and connect related entities with relationship lines such as \
CUSTOMERS ||--o{ ORDERS : places.",
    );

    prompt
}

/// Corrective instruction appended after a generated schema fails validation.
pub fn schema_correction(failure: &ValidationFailure) -> String {
    format!(
        "\n\nYour previous reply was rejected: {failure}. Reply again with one \
fenced ```sql block of CREATE TABLE statements and one fenced ```mermaid block \
whose diagram starts with erDiagram, declares each entity inside braces and \
links entities with connectors such as ||--o{{."
    )
}

fn push_category(prompt: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        prompt.push_str(&format!("{label}: {}\n", items.join(", ")));
    }
}
