//! Markdown lint/fix pass, the last pipeline stage.
//!
//! Follows the report-then-apply contract of a markdownlint-style engine:
//! [`check`] scans the document once and *reports* fixes, [`apply_fixes`]
//! applies every reported fix in one shot. There is no re-lint to a fixed
//! point, and violations without an auto-fix are not surfaced: the output
//! is returned regardless of residual lint cleanliness.
//!
//! Rules carried (the default-rule-set subset this pipeline can actually
//! trigger):
//!
//! * trailing whitespace on a line
//! * hard tabs (replaced with a single space)
//! * more than one consecutive blank line
//! * missing space after heading hashes (`#Heading`)
//! * trailing punctuation on a heading
//!
//! Blank-line collapsing and the heading rules skip fenced code blocks;
//! whitespace rules apply everywhere, matching the reference rule set.

/// One auto-fix for one source line (0-indexed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFix {
    pub line: usize,
    pub action: FixAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAction {
    /// Replace the whole line with the given text.
    Replace(String),
    /// Remove the line.
    Delete,
}

/// Punctuation stripped from heading ends.
const HEADING_TRAILING_PUNCTUATION: [char; 5] = ['.', ',', ';', ':', '!'];

/// Run the rule set over `markdown` and report every available fix.
pub fn check(markdown: &str) -> Vec<LintFix> {
    let mut fixes = Vec::new();
    let mut in_fence = false;
    let mut blank_run = 0usize;

    for (idx, line) in markdown.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            blank_run = 0;
        }

        // Blank-line collapsing: keep the first blank of a run, delete the rest.
        if !in_fence && line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                fixes.push(LintFix {
                    line: idx,
                    action: FixAction::Delete,
                });
            }
            continue;
        }
        blank_run = 0;

        let fixed = fix_line(line, in_fence);
        if fixed != line {
            fixes.push(LintFix {
                line: idx,
                action: FixAction::Replace(fixed),
            });
        }
    }

    fixes
}

/// Apply rule chain to a single line, returning the fixed text.
fn fix_line(line: &str, in_fence: bool) -> String {
    // Hard tabs and trailing whitespace apply everywhere, fences included.
    let mut fixed = line.replace('\t', " ");
    fixed.truncate(fixed.trim_end().len());

    if !in_fence {
        fixed = fix_heading(&fixed);
    }
    fixed
}

/// Heading rules: space after hashes, no trailing punctuation.
fn fix_heading(line: &str) -> String {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return line.to_string();
    }
    let rest = &line[hashes..];
    if rest.is_empty() {
        return line.to_string();
    }

    // `#Heading` → `# Heading`. A hash followed by a non-space is only a
    // heading candidate when the rest looks like text, which is what the
    // pipeline emits.
    let body = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
    let body = body.trim_end_matches(HEADING_TRAILING_PUNCTUATION).trim_end();
    if body.is_empty() {
        return line.to_string();
    }
    format!("{} {}", "#".repeat(hashes), body)
}

/// Apply every reported fix in one shot.
pub fn apply_fixes(markdown: &str, fixes: &[LintFix]) -> String {
    let mut lines: Vec<Option<String>> = markdown.lines().map(|l| Some(l.to_string())).collect();

    for fix in fixes {
        let Some(slot) = lines.get_mut(fix.line) else {
            continue;
        };
        match &fix.action {
            FixAction::Replace(text) => *slot = Some(text.clone()),
            FixAction::Delete => *slot = None,
        }
    }

    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

/// Lint the in-memory Markdown, apply all fixes once, trim the result.
pub fn lint(markdown: &str) -> String {
    let fixes = check(markdown);
    apply_fixes(markdown, &fixes).trim().to_string()
}
