// crates/patchplane-oracle/src/prompts.rs
// ============================================================================
// Module: Oracle Prompts
// Description: Prompt construction for classification and patch synthesis.
// Purpose: Constrain model output to the closed catalog and edit schema.
// Dependencies: patchplane-core, serde_json
// ============================================================================

//! ## Overview
//! Two prompts are issued per request. Classification must return exactly
//! one catalog token or the literal `none`. Synthesis must return a JSON
//! array of `{path, value}` objects, with memory normalized to whole MiB and
//! CPU to whole milli-CPU before the values appear in the array. The
//! pipeline still treats replies defensively; these constraints reduce, not
//! eliminate, malformed output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use patchplane_core::AppCatalog;
use serde_json::Value;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Builds the classification prompt for one request.
#[must_use]
pub fn classification_prompt(request_text: &str, catalog: &AppCatalog) -> String {
    let names: Vec<&str> = catalog.names().collect();
    let listed = names.join("', '");
    format!(
        "You are given a user message. Decide which application from the \
         allowed list the message is about.\n\
         \n\
         ALLOWED LIST: ['{listed}']\n\
         \n\
         User message: \"{request_text}\"\n\
         \n\
         RULES:\n\
         1. The answer must be exactly one word from the allowed list.\n\
         2. If the message names no application from the list, or names an \
         application outside the list, never guess.\n\
         3. For any unknown or unlisted application, answer 'none'.\n\
         4. Answer with a single word and nothing else.\n\
         \n\
         Examples:\n\
         - \"set tournament memory\" -> tournament\n\
         - \"update unicorn service\" -> none\n\
         - \"change memory of payment app\" -> none\n\
         \n\
         Answer:"
    )
}

// ============================================================================
// SECTION: Synthesis
// ============================================================================

/// Builds the patch-synthesis prompt for one request.
#[must_use]
pub fn synthesis_prompt(request_text: &str, current_values: &Value) -> String {
    format!(
        "You are an expert operations engineer and a strict JSON Schema \
         validator.\n\
         \n\
         TASK: List the changes required in the given JSON to satisfy the \
         user request.\n\
         \n\
         User request: \"{request_text}\"\n\
         \n\
         Target JSON:\n{current_values:#}\n\
         \n\
         STRICT RULES:\n\
         1. Reply with only a valid JSON array: [ {{\"path\": \"...\", \
         \"value\": ...}} ]\n\
         2. If a requested value is invalid (e.g. 'banana' for memory, \
         'high' for replicas), never guess. Return an empty array [].\n\
         3. Paths are keys separated by dots (.).\n\
         4. Memory (MiB) and CPU (milliCPU) values are always integers:\n\
         - \"1gb\" -> 1024\n\
         - \"500m\" -> 500\n\
         - \"banana\" -> invalid -> []\n\
         5. If the request is nonsensical, return an empty array [].\n\
         6. Never add keys at the root or under paths that do not exist.\n\
         7. Apply resource (cpu/memory) changes under \
         'containers.<app>.resources'.\n\
         \n\
         Example valid reply:\n\
         [\n  {{\"path\": \"workloads.statefulsets.tournament.replicas\", \
         \"value\": 3}}\n]\n\
         \n\
         Example invalid request (\"set memory to banana\"):\n\
         []\n\
         \n\
         Reply:"
    )
}
