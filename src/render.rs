//! Turns an [`AnalysisResponse`] into HTML fragments for the four result
//! regions of the page.
//!
//! Each region is rendered independently. Server-supplied text is escaped so
//! it is shown as-is and never parsed as markup.

use crate::api::{AnalysisResponse, ImageContext};
use crate::page::{ElementId, Page};

const TRUSTED_SOURCE_FALLBACK: &str = "trusted source";
const UNVERIFIED_CLAIM: &str = "Unverified claim";

static VERIFIED_BY_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"Verified by (?P<source>.+)").unwrap());

/// Scales a 0-1 similarity to a percentage with one decimal, rounding ties up.
fn similarity_percent(similarity: f64) -> String {
    format!("{:.1}", (similarity * 1000.0).round() / 10.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrustTier {
    High,
    Mid,
    Low,
}

impl TrustTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            TrustTier::High
        } else if score >= 50.0 {
            TrustTier::Mid
        } else {
            TrustTier::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TrustTier::High => "text-green-600 dark:text-green-400",
            TrustTier::Mid => "text-yellow-600 dark:text-yellow-400",
            TrustTier::Low => "text-red-600 dark:text-red-400",
        }
    }
}

/// Which message the source verification region leads with. First match wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification<'a> {
    Confirmed { source: &'a str },
    Unconfirmed,
    UnconfirmedWithImageMismatch,
    Note(&'a str),
    Reason(&'a str),
    Nothing,
}

impl<'a> Verification<'a> {
    pub fn classify(data: &'a AnalysisResponse) -> Self {
        let note = data.verification_note();
        match note {
            Some(note) if note.contains("Verified by") => Verification::Confirmed {
                source: VERIFIED_BY_REGEX
                    .captures(note)
                    .and_then(|c| c.name("source"))
                    .map_or(TRUSTED_SOURCE_FALLBACK, |m| m.as_str()),
            },
            Some(UNVERIFIED_CLAIM) if !data.image_mismatch() => Verification::Unconfirmed,
            Some(UNVERIFIED_CLAIM) => Verification::UnconfirmedWithImageMismatch,
            Some(note) => Verification::Note(note),
            None => match data.reason() {
                Some(reason) => Verification::Reason(reason),
                None => Verification::Nothing,
            },
        }
    }
}

pub fn text_analysis(data: &AnalysisResponse) -> String {
    let mut html = String::new();
    if let Some(label) = data.final_label() {
        html.push_str(&format!(r#"<p class="font-semibold">Classification: {}</p>"#, handlebars::html_escape(label)));
    }
    if let Some(score) = data.final_trust_score {
        html.push_str(&format!("<p>Trust Score: {}%</p>", score));
    }
    if let Some(hit) = data.cache_hit {
        html.push_str(&format!(
            r#"<p class="text-sm mt-2">Cache: {}</p>"#,
            if hit { "Hit" } else { "Miss" }
        ));
    }
    if html.is_empty() {
        html.push_str("<p>No text analysis data available.</p>");
    }
    html
}

pub fn image_context(data: &AnalysisResponse) -> String {
    let context = if let Some(context) = data.image_context() {
        context
    } else {
        return r#"<p class="text-sm text-subtext-light dark:text-subtext-dark">No image provided</p>"#.to_owned();
    };

    let mut html = String::from(r#"<p class="text-sm font-medium">Image analysis performed</p>"#);
    match context {
        ImageContext::Mismatch | ImageContext::SuspiciousMismatch => html.push_str(
            r#"<p class="text-sm mt-1 text-orange-600 dark:text-orange-400">Image–headline mismatch detected</p>"#,
        ),
        ImageContext::Consistent => html.push_str(
            r#"<p class="text-sm mt-1 text-green-600 dark:text-green-400">Image matches the headline</p>"#,
        ),
        ImageContext::Other(_) => {}
    }
    if let Some(similarity) = data.similarity_score {
        html.push_str(&format!(
            r#"<p class="text-xs mt-1 text-subtext-light dark:text-subtext-dark">Similarity: {}%</p>"#,
            similarity_percent(similarity)
        ));
    }
    html
}

pub fn source_verification(data: &AnalysisResponse) -> String {
    let mut html = String::new();
    match Verification::classify(data) {
        Verification::Confirmed { source } => html.push_str(&format!(
            r#"<p class="text-sm font-bold text-green-600 dark:text-green-400">✔ Claim verified by trusted source(s): {}</p>"#,
            handlebars::html_escape(source)
        )),
        Verification::Unconfirmed => {
            html.push_str(r#"<p class="text-sm text-text-light dark:text-text-dark">Text style appears neutral, but no confirmation was found from major trusted sources yet.</p>"#);
            html.push_str(r#"<p class="text-xs mt-1 text-subtext-light dark:text-subtext-dark italic">Breaking or regional news may take time to appear on global outlets.</p>"#);
        }
        Verification::UnconfirmedWithImageMismatch => html.push_str(
            r#"<p class="text-sm text-text-light dark:text-text-dark">Claim is not confirmed by trusted sources and the image does not align with the text.</p>"#,
        ),
        Verification::Note(text) | Verification::Reason(text) => {
            html.push_str(&format!(r#"<p class="text-sm">{}</p>"#, handlebars::html_escape(text)))
        }
        Verification::Nothing => {}
    }

    if data.served_from_cache() {
        html.push_str(r#"<p class="text-xs mt-2 text-subtext-light dark:text-subtext-dark italic">Previously analyzed result (cache hit).</p>"#);
    }
    if let Some(ms) = data.response_time_ms {
        html.push_str(&format!(
            r#"<p class="text-xs mt-2 text-gray-500 dark:text-gray-400">Response: {}ms</p>"#,
            ms
        ));
    }

    if html.is_empty() {
        html.push_str("<p>No verification data available.</p>");
    }
    html
}

pub fn final_verdict(data: &AnalysisResponse) -> String {
    let mut html = String::new();
    if let Some(label) = data.final_label() {
        html.push_str(&format!(r#"<p class="text-2xl font-bold mb-2">{}</p>"#, handlebars::html_escape(label)));
    }
    if let Some(score) = data.final_trust_score {
        html.push_str(&format!(
            r#"<p class="text-xl font-semibold {}">Trust Score: {}%</p>"#,
            TrustTier::from_score(score).css_class(),
            score
        ));
    }
    if let Some(reason) = data.reason() {
        html.push_str(&format!(r#"<p class="text-base mt-2">{}</p>"#, handlebars::html_escape(reason)));
    }
    if html.is_empty() {
        html.push_str("<p>No verdict data available.</p>");
    }
    html
}

/// Fills every result region present on the page. Missing regions are skipped.
pub fn display_results(page: &mut Page, data: &AnalysisResponse) {
    let regions: [(ElementId, fn(&AnalysisResponse) -> String); 4] = [
        (ElementId::TextAnalysisResult, text_analysis),
        (ElementId::ImageContextResult, image_context),
        (ElementId::SourceVerificationResult, source_verification),
        (ElementId::FinalVerdictResult, final_verdict),
    ];

    for (id, render) in regions {
        if page.element(id).is_none() {
            log::debug!("region {} not on page, skipping", id.as_str());
            continue;
        }
        page.set_inner_html(id, render(data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(v: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_server_text_is_escaped() {
        let html = final_verdict(&response(serde_json::json!({ "final_label": r#"<b>"Fake" & bold</b>"# })));
        assert_eq!(
            html,
            r#"<p class="text-2xl font-bold mb-2">&lt;b&gt;&quot;Fake&quot; &amp; bold&lt;/b&gt;</p>"#
        );
    }

    #[test]
    fn test_similarity_rounds_ties_up() {
        assert_eq!(similarity_percent(0.1825), "18.3");
        assert_eq!(similarity_percent(0.0025), "0.3");
        assert_eq!(similarity_percent(0.4625), "46.3");
        assert_eq!(similarity_percent(0.1834), "18.3");
        assert_eq!(similarity_percent(1.0), "100.0");

        let html = image_context(&response(serde_json::json!({
            "image_context": "Consistent",
            "similarity_score": 0.1825,
        })));
        assert!(html.contains("Similarity: 18.3%"));
    }

    #[test]
    fn test_trust_tier_boundaries() {
        assert_eq!(TrustTier::from_score(72.0), TrustTier::High);
        assert_eq!(TrustTier::from_score(70.0), TrustTier::High);
        assert_eq!(TrustTier::from_score(69.9), TrustTier::Mid);
        assert_eq!(TrustTier::from_score(55.0), TrustTier::Mid);
        assert_eq!(TrustTier::from_score(50.0), TrustTier::Mid);
        assert_eq!(TrustTier::from_score(49.0), TrustTier::Low);
        assert_eq!(TrustTier::from_score(0.0), TrustTier::Low);
    }

    #[test]
    fn test_final_verdict_tiers() {
        let html = final_verdict(&response(serde_json::json!({ "final_trust_score": 72 })));
        assert!(html.contains("text-green-600"));
        assert!(html.contains("Trust Score: 72%"));

        let html = final_verdict(&response(serde_json::json!({ "final_trust_score": 55 })));
        assert!(html.contains("text-yellow-600"));

        let html = final_verdict(&response(serde_json::json!({ "final_trust_score": 49 })));
        assert!(html.contains("text-red-600"));
    }

    #[test]
    fn test_final_verdict_full() {
        let html = final_verdict(&response(serde_json::json!({
            "final_label": "Real",
            "final_trust_score": 88.5,
            "reason": "Matches wire reports",
        })));
        assert!(html.starts_with(r#"<p class="text-2xl font-bold mb-2">Real</p>"#));
        assert!(html.contains("Trust Score: 88.5%"));
        assert!(html.ends_with(r#"<p class="text-base mt-2">Matches wire reports</p>"#));
    }

    #[test]
    fn test_placeholders_for_empty_response() {
        let data = AnalysisResponse::default();
        assert_eq!(text_analysis(&data), "<p>No text analysis data available.</p>");
        assert!(image_context(&data).contains("No image provided"));
        assert_eq!(source_verification(&data), "<p>No verification data available.</p>");
        assert_eq!(final_verdict(&data), "<p>No verdict data available.</p>");
    }

    #[test]
    fn test_text_analysis() {
        let html = text_analysis(&response(serde_json::json!({
            "final_label": "Fake",
            "final_trust_score": 12,
            "cache_hit": true,
        })));
        assert_eq!(
            html,
            concat!(
                r#"<p class="font-semibold">Classification: Fake</p>"#,
                "<p>Trust Score: 12%</p>",
                r#"<p class="text-sm mt-2">Cache: Hit</p>"#,
            )
        );

        let html = text_analysis(&response(serde_json::json!({ "cache_hit": false })));
        assert!(html.contains("Cache: Miss"));
        assert!(!html.contains("Classification"));
    }

    #[test]
    fn test_image_context_mismatch() {
        let html = image_context(&response(serde_json::json!({
            "image_context": "Suspicious Mismatch",
            "similarity_score": 0.1834,
        })));
        assert!(html.contains("Image analysis performed"));
        assert!(html.contains("mismatch detected"));
        assert!(html.contains("text-orange-600"));
        assert!(html.contains("Similarity: 18.3%"));
    }

    #[test]
    fn test_image_context_consistent_without_score() {
        let html = image_context(&response(serde_json::json!({ "image_context": "Consistent" })));
        assert!(html.contains("Image matches the headline"));
        assert!(!html.contains("Similarity"));
    }

    #[test]
    fn test_image_context_unknown_value() {
        let html = image_context(&response(serde_json::json!({ "image_context": "Unclear" })));
        assert_eq!(html, r#"<p class="text-sm font-medium">Image analysis performed</p>"#);
    }

    #[test]
    fn test_image_context_empty_string_is_absent() {
        let html = image_context(&response(serde_json::json!({ "image_context": "", "similarity_score": 0.5 })));
        assert!(html.contains("No image provided"));
    }

    #[test]
    fn test_verified_by_source() {
        let data = response(serde_json::json!({ "verification_note": "Verified by Reuters, BBC" }));
        assert_eq!(Verification::classify(&data), Verification::Confirmed { source: "Reuters, BBC" });

        let html = source_verification(&data);
        assert!(html.contains("Claim verified by trusted source(s): Reuters, BBC"));
        assert!(html.contains("font-bold text-green-600"));
    }

    #[test]
    fn test_verified_by_without_name() {
        let data = response(serde_json::json!({ "verification_note": "Verified by" }));
        assert_eq!(Verification::classify(&data), Verification::Confirmed { source: "trusted source" });
    }

    #[test]
    fn test_unverified_with_image_mismatch() {
        for context in ["Mismatch", "Suspicious Mismatch"] {
            let data = response(serde_json::json!({
                "verification_note": "Unverified claim",
                "image_context": context,
            }));
            assert_eq!(Verification::classify(&data), Verification::UnconfirmedWithImageMismatch);

            let html = source_verification(&data);
            assert!(html.contains("image does not align with the text"));
            assert!(!html.contains("Breaking or regional news"));
        }
    }

    #[test]
    fn test_unverified_without_mismatch() {
        for context in [None, Some("Consistent"), Some("Unclear")] {
            let data = response(serde_json::json!({
                "verification_note": "Unverified claim",
                "image_context": context,
            }));
            assert_eq!(Verification::classify(&data), Verification::Unconfirmed);

            let html = source_verification(&data);
            assert!(html.contains("no confirmation was found"));
            assert!(html.contains("Breaking or regional news"));
        }
    }

    #[test]
    fn test_other_note_then_reason() {
        let data = response(serde_json::json!({
            "verification_note": "Partially supported",
            "reason": "ignored here",
        }));
        assert_eq!(Verification::classify(&data), Verification::Note("Partially supported"));

        let data = response(serde_json::json!({ "reason": "Sensational <wording>" }));
        assert_eq!(Verification::classify(&data), Verification::Reason("Sensational <wording>"));
        assert_eq!(source_verification(&data), r#"<p class="text-sm">Sensational &lt;wording&gt;</p>"#);
    }

    #[test]
    fn test_cache_and_timing_notes() {
        let data = response(serde_json::json!({ "cached": true, "response_time_ms": 42 }));
        assert_eq!(Verification::classify(&data), Verification::Nothing);

        let html = source_verification(&data);
        assert!(html.contains("Previously analyzed result (cache hit)."));
        assert!(html.ends_with(r#"<p class="text-xs mt-2 text-gray-500 dark:text-gray-400">Response: 42ms</p>"#));
        assert!(!html.contains("No verification data"));
    }

    #[test]
    fn test_cache_miss_adds_no_note() {
        let data = response(serde_json::json!({ "cache_hit": false, "cached": false }));
        assert_eq!(source_verification(&data), "<p>No verification data available.</p>");
    }

    #[test]
    fn test_mistyped_field_leaves_other_regions_intact() {
        let mut page = Page::standard();
        let data = response(serde_json::json!({
            "final_label": "Real",
            "final_trust_score": "72",
            "verification_note": "Verified by Reuters",
        }));

        display_results(&mut page, &data);

        let verdict = page.inner_html(ElementId::FinalVerdictResult).unwrap();
        assert!(verdict.contains("Real"));
        assert!(!verdict.contains("Trust Score"));
        assert!(page.inner_html(ElementId::TextAnalysisResult).unwrap().contains("Classification: Real"));
        assert!(page.inner_html(ElementId::SourceVerificationResult).unwrap().contains("Reuters"));
    }

    #[test]
    fn test_display_results_skips_missing_regions() {
        let mut page = Page::new([ElementId::FinalVerdictResult, ElementId::ImageContextResult]);
        let data = response(serde_json::json!({ "final_label": "Fake", "final_trust_score": 20 }));

        display_results(&mut page, &data);

        assert!(page.inner_html(ElementId::FinalVerdictResult).unwrap().contains("Fake"));
        assert!(page.inner_html(ElementId::ImageContextResult).unwrap().contains("No image provided"));
        assert_eq!(page.inner_html(ElementId::TextAnalysisResult), None);
        assert_eq!(page.inner_html(ElementId::SourceVerificationResult), None);
    }
}
