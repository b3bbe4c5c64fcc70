//! Reply cleanup before user delivery.

/// Fallback reply when the model returned no text but tools did run.
pub const PROCESSING_FALLBACK: &str = "Procesando tu solicitud...";

/// Fallback reply when the model returned no text at all.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "No recibí respuesta del modelo. Por favor intenta de nuevo.";

/// Strips tool-call markers the model leaked into its text output.
///
/// Weak models sometimes echo DeepSeek-style tool delimiters or narrate
/// their tool usage inside the reply instead of using the function calling
/// API. This removes those artifacts and collapses leftover blank runs.
pub fn clean_technical_markers(text: &str) -> String {
    use regex::Regex;

    // Lazy-init compiled regex patterns
    static PATTERNS: std::sync::OnceLock<Vec<Regex>> = std::sync::OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        vec![
            // DeepSeek fullwidth tool-call blocks
            Regex::new(r"(?s)<｜tool▁calls▁begin｜>.*?<｜tool▁calls▁end｜>").unwrap(),
            Regex::new(r"(?s)<\|tool_calls_begin\|>.*?<\|tool_calls_end\|>").unwrap(),
            // Single-call variants
            Regex::new(r"(?s)<｜tool▁call▁begin｜>.*?<｜tool▁call▁end｜>").unwrap(),
            Regex::new(r"(?s)<\|tool_call_begin\|>.*?<\|tool_call_end\|>").unwrap(),
            // Stray separators
            Regex::new(r"<｜tool▁sep｜>").unwrap(),
            Regex::new(r"<\|tool_sep\|>").unwrap(),
            // Bracketed tool invocations, e.g. [searchProducts(keywords: "...")]
            Regex::new(r"(?i)\[\s*(searchProducts|getProduct)\s*[^\]]*\]").unwrap(),
            // Narrated tool usage in Spanish
            Regex::new(
                r"(?i)\b(ejecutando|llamando a|usando|utilizando)\s+(función|tool|herramienta)\s+\w+",
            )
            .unwrap(),
        ]
    });

    static BLANK_RUN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let blank_run = BLANK_RUN.get_or_init(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

    let mut result = text.to_string();
    for pat in patterns {
        result = pat.replace_all(&result, "").to_string();
    }

    // Collapse triple blank runs left behind by the removals
    result = blank_run.replace_all(&result, "\n\n").to_string();

    result.trim().to_string()
}
