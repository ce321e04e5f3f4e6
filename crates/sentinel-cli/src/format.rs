// SPDX-License-Identifier: MIT OR Apache-2.0
//! Human rendering of an analysis.
//!
//! The human sections stay within the address-display contract (labels
//! and generic nouns only); the technical section prints full addresses.
//! Long byte blobs are abbreviated here, at the formatting boundary.

use sentinel_types::Analysis;

pub fn render(analysis: &Analysis) -> String {
    let mut out = String::new();

    match (&analysis.function_name, &analysis.signature) {
        (Some(name), Some(sig)) => push(&mut out, format!("Function: {name}  [{sig}]")),
        (Some(name), None) => push(&mut out, format!("Function: {name}")),
        _ => push(&mut out, format!("Function: unknown  [{}]", analysis.selector)),
    }
    push(
        &mut out,
        format!(
            "Source: {}{}",
            serde_json::to_value(analysis.source)
                .ok()
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_default(),
            if analysis.verified { " (verified)" } else { "" }
        ),
    );

    let header = analysis
        .header_severity
        .map(|h| h.to_string())
        .unwrap_or_else(|| "none (no profile)".to_string());
    push(
        &mut out,
        format!(
            "Severity: impact {} / trust {header}",
            analysis.effect.severity
        ),
    );
    push(&mut out, format!("Effect: {}", analysis.effect.summary));

    if let Some(params) = &analysis.params {
        push(&mut out, "Parameters:".to_string());
        for p in params {
            push(
                &mut out,
                format!("  {} ({}): {}", p.name, p.kind, p.value.abbreviated()),
            );
        }
    }

    section(&mut out, "Consequences", &analysis.effect.consequences);
    let mut warnings = analysis.effect.warnings.clone();
    if let Some(ctx) = &analysis.trust_context {
        warnings.extend(ctx.warnings.iter().cloned());
    }
    section(&mut out, "Warnings", &warnings);
    section(&mut out, "Mitigations", &analysis.effect.mitigations);

    if let Some(batch) = &analysis.batch {
        push(
            &mut out,
            format!(
                "Batch: {} sub-call(s) — {} ok, {} warn, {} danger, {} unknown; overall {}",
                batch.calls.len(),
                batch.counts.ok,
                batch.counts.warn,
                batch.counts.danger,
                batch.counts.unknown,
                batch.overall_severity
            ),
        );
        if let Some(error) = &batch.error {
            push(&mut out, format!("Batch error: {error}"));
        }
        for call in &batch.calls {
            push(
                &mut out,
                format!(
                    "  #{} {} → {} ({}): {}",
                    call.index,
                    call.operation,
                    call.to,
                    call.analysis
                        .function_name
                        .as_deref()
                        .unwrap_or("unknown"),
                    call.analysis.effect.severity
                ),
            );
        }
    }

    if let Some(error) = &analysis.decode_error {
        push(&mut out, format!("Decode error: {error}"));
    }

    if !analysis.effect.technical_notes.is_empty() {
        push(&mut out, "Technical:".to_string());
        for note in &analysis.effect.technical_notes {
            push(&mut out, format!("  {note}"));
        }
    }

    out
}

fn push(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}

fn section(out: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    push(out, format!("{title}:"));
    for line in lines {
        push(out, format!("  - {line}"));
    }
}
