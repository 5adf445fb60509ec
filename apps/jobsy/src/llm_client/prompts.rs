// Shared prompt-building utilities.
// Each feature defines its own templates in features/prompts.rs.

/// Substitutes `{name}` placeholders in a single left-to-right pass.
///
/// Values are inserted verbatim and never re-scanned, so user text that happens to
/// contain `{resume}` or similar is not expanded. Unknown placeholders are kept as-is.
pub fn fill_template(template: &str, params: &[(&str, &str)]) -> String {
    let extra: usize = params.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];
        let replaced = candidate.find('}').and_then(|close| {
            let name = &candidate[..close];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}
