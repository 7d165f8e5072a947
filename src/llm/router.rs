//! C3 — pure deterministic routing decision, grounded on the original
//! Python's `app/routing/router.py::select_provider`. No hidden state: the
//! same four inputs always yield the same provider name.

pub fn select_provider(
    task: Option<&str>,
    budget: Option<&str>,
    latency_sensitive: bool,
    provider_override: Option<&str>,
) -> &'static str {
    if let Some(p) = provider_override {
        return normalize(p);
    }
    match task {
        Some("summarization") => return "deepseek",
        Some("reasoning") => return "huggingface",
        _ => {}
    }
    if latency_sensitive {
        return "openai";
    }
    match budget {
        Some("low") => return "deepseek",
        Some("high") => return "openai",
        _ => {}
    }
    "openai"
}

fn normalize(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => "openai",
        "deepseek" => "deepseek",
        "huggingface" | "hf" => "huggingface",
        _ => "openai",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_routing_table() {
        assert_eq!(select_provider(Some("summarization"), None, false, None), "deepseek");
        assert_eq!(select_provider(Some("reasoning"), None, false, None), "huggingface");
        assert_eq!(select_provider(None, None, true, None), "openai");
        assert_eq!(select_provider(None, Some("low"), false, None), "deepseek");
        assert_eq!(select_provider(None, Some("high"), false, None), "openai");
        assert_eq!(select_provider(None, None, false, None), "openai");
    }

    #[test]
    fn override_wins_over_everything() {
        assert_eq!(
            select_provider(Some("summarization"), Some("high"), true, Some("huggingface")),
            "huggingface"
        );
    }

    #[test]
    fn pure_function_identical_inputs_identical_outputs() {
        for _ in 0..5 {
            assert_eq!(select_provider(Some("reasoning"), None, false, None), "huggingface");
        }
    }
}
