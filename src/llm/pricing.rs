//! C2 — static pricing table and cost computation, grounded on the
//! original Python's `app/cost/tracker.py::PRICING`/`calculate_cost`.
//! Dollars are exact `Decimal` throughout; never `f64` (spec §9).

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy)]
pub struct PricingEntry {
    /// Dollars per 1,000 input tokens.
    pub input_per_1k: Decimal,
    /// Dollars per 1,000 output tokens.
    pub output_per_1k: Decimal,
}

/// Built fresh each time it's needed (small, static, no lazy_static —
/// construction cost is negligible next to one HTTP round trip).
pub fn pricing_table() -> HashMap<(&'static str, &'static str), PricingEntry> {
    let mut t = HashMap::new();
    t.insert(
        ("openai", "gpt-4"),
        PricingEntry {
            input_per_1k: dec!(0.03),
            output_per_1k: dec!(0.06),
        },
    );
    t.insert(
        ("openai", "gpt-4-turbo-preview"),
        PricingEntry {
            input_per_1k: dec!(0.01),
            output_per_1k: dec!(0.03),
        },
    );
    t.insert(
        ("openai", "gpt-3.5-turbo"),
        PricingEntry {
            input_per_1k: dec!(0.0015),
            output_per_1k: dec!(0.002),
        },
    );
    t.insert(
        ("openai", "gpt-3.5-turbo-16k"),
        PricingEntry {
            input_per_1k: dec!(0.003),
            output_per_1k: dec!(0.004),
        },
    );
    t.insert(
        ("deepseek", "deepseek-chat"),
        PricingEntry {
            input_per_1k: dec!(0.00014),
            output_per_1k: dec!(0.00028),
        },
    );
    t.insert(
        ("deepseek", "deepseek-coder"),
        PricingEntry {
            input_per_1k: dec!(0.00014),
            output_per_1k: dec!(0.00028),
        },
    );
    for model in ["llama-3", "mixtral", "qwen"] {
        t.insert(
            ("huggingface", model),
            PricingEntry {
                input_per_1k: dec!(0.0),
                output_per_1k: dec!(0.0),
            },
        );
    }
    t
}

/// Cost = floor(nᵢ/1000)·pᵢ + floor(nₒ/1000)·pₒ, computed in exact decimal
/// and rounded to 6 fractional digits. Lookup policy (spec §4.2): exact
/// `(provider, model)` match, else first entry under `provider`, else zero.
pub fn cost(table: &HashMap<(&'static str, &'static str), PricingEntry>, provider: &str, model: &str, tokens_in: u32, tokens_out: u32) -> Decimal {
    let entry = table
        .get(&(provider, model))
        .copied()
        .or_else(|| {
            table
                .iter()
                .find(|((p, _), _)| *p == provider)
                .map(|(_, e)| *e)
        });

    let Some(entry) = entry else {
        return Decimal::ZERO;
    };

    let input_cost = (Decimal::from(tokens_in) / Decimal::from(1000)) * entry.input_per_1k;
    let output_cost = (Decimal::from(tokens_out) / Decimal::from(1000)) * entry.output_per_1k;
    (input_cost + output_cost).round_dp(6)
}

/// Attribute a provider from an echoed model name, for responses whose
/// caller did not otherwise track which adapter served them (spec §4.2).
pub fn attribute_provider(model: &str) -> &'static str {
    let m = model.to_lowercase();
    if m.contains("gpt") {
        "openai"
    } else if m.contains("deepseek") {
        "deepseek"
    } else if m.contains("llama") || m.contains("mixtral") || m.contains("qwen") {
        "huggingface"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_values_s2() {
        let t = pricing_table();
        assert_eq!(cost(&t, "openai", "gpt-3.5-turbo", 1000, 500), dec!(0.002500));
        assert_eq!(cost(&t, "openai", "gpt-4", 1000, 500), dec!(0.060000));
        assert_eq!(cost(&t, "deepseek", "deepseek-chat", 1000, 500), dec!(0.000280));
        assert_eq!(cost(&t, "huggingface", "llama-3", 1000, 500), dec!(0.000000));
        assert_eq!(cost(&t, "unknown", "anything", 1000, 500), dec!(0.000000));
    }

    #[test]
    fn unknown_model_falls_back_to_first_entry_under_provider() {
        let t = pricing_table();
        // "gpt-5" isn't in the table; openai has entries, so it should
        // fall back to *some* entry under "openai" rather than zero.
        let c = cost(&t, "openai", "gpt-5", 1000, 500);
        assert!(c > Decimal::ZERO);
    }

    #[test]
    fn cost_is_monotone_in_tokens() {
        let t = pricing_table();
        let base = cost(&t, "openai", "gpt-3.5-turbo", 1000, 500);
        let more_in = cost(&t, "openai", "gpt-3.5-turbo", 2000, 500);
        let more_out = cost(&t, "openai", "gpt-3.5-turbo", 1000, 1000);
        assert!(more_in >= base);
        assert!(more_out >= base);
    }

    #[test]
    fn attribution_by_substring() {
        assert_eq!(attribute_provider("gpt-3.5-turbo"), "openai");
        assert_eq!(attribute_provider("deepseek-chat"), "deepseek");
        assert_eq!(attribute_provider("meta-llama/Meta-Llama-3-8B-Instruct"), "huggingface");
        assert_eq!(attribute_provider("claude-3"), "unknown");
    }
}
