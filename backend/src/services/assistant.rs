//! Assistant integration: tool definitions, tool dispatch and cargo conversation detection
//!
//! The conversational loop itself lives with the LLM client. This module only
//! describes the pricing tools, executes one tool call at a time and tells the
//! caller whether a message looks like a shipping enquiry.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::pricing::{normalize_name, Confidence};

use crate::error::{AppError, AppResult};
use crate::services::pricing::{MixedPricingRequest, PricingQuery, PricingResponse, PricingService};

// ============================================================================
// Tool definitions and dispatch
// ============================================================================

pub const TOOL_NAMES: [&str; 4] = [
    "cargo_pricing",
    "cargo_multi_pricing",
    "cargo_draft_pricing",
    "cargo_mixed_pricing",
];

fn package_properties() -> Value {
    json!({
        "weight": { "type": "number", "description": "The actual weight of a single package in kilograms" },
        "length": { "type": "number", "description": "Length of a single package in centimeters" },
        "width": { "type": "number", "description": "Width of a single package in centimeters" },
        "height": { "type": "number", "description": "Height of a single package in centimeters" },
        "quantity": { "type": "integer", "minimum": 1, "description": "Number of identical boxes/packages (default is 1)" }
    })
}

fn with_properties(base: Value, extra: Value) -> Value {
    let mut merged = base;
    if let (Some(target), Some(source)) = (merged.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// JSON-schema definitions of the pricing tools, in function-calling format
pub fn tool_definitions() -> Value {
    let content = json!({
        "content": {
            "type": "string",
            "description": "Description of what is being shipped (supports cargo terminology like \"FAK\", \"Freight All Kinds\", \"General Cargo\"). May name a carrier, e.g. \"send via DHL\""
        }
    });
    let carrier = json!({
        "carrier": { "type": "string", "enum": ["UPS", "DHL", "ARAMEX"], "description": "Optional carrier preference" }
    });

    json!([
        {
            "type": "function",
            "name": "cargo_pricing",
            "description": "Get a cargo shipping price for one carrier from destination, content and weight/dimensions. With only content given, checks whether the content can be shipped.",
            "parameters": {
                "type": "object",
                "properties": with_properties(
                    with_properties(content.clone(), json!({
                        "country": { "type": "string", "description": "Destination country or city - optional for content checking" }
                    })),
                    with_properties(package_properties(), carrier.clone()),
                ),
                "required": ["content"]
            }
        },
        {
            "type": "function",
            "name": "cargo_multi_pricing",
            "description": "Get cargo shipping prices from UPS, DHL and ARAMEX and mark the cheapest. City names are resolved to their countries (e.g. \"London\" to United Kingdom). A carrier named in the content limits the comparison to that carrier.",
            "parameters": {
                "type": "object",
                "properties": with_properties(
                    with_properties(content.clone(), json!({
                        "country": { "type": "string", "description": "Destination country or city name" }
                    })),
                    package_properties(),
                ),
                "required": ["content"]
            }
        },
        {
            "type": "function",
            "name": "cargo_draft_pricing",
            "description": "Get a DRAFT cargo price from actual weight only, before box dimensions are known. The final price may change once dimensions are provided.",
            "parameters": {
                "type": "object",
                "properties": with_properties(
                    with_properties(content.clone(), json!({
                        "country": { "type": "string", "description": "The destination country" },
                        "weight": { "type": "number", "description": "The actual weight of a single package in kilograms" },
                        "quantity": { "type": "integer", "minimum": 1, "description": "Number of identical boxes/packages (default is 1)" }
                    })),
                    carrier.clone(),
                ),
                "required": ["content", "country", "weight"]
            }
        },
        {
            "type": "function",
            "name": "cargo_mixed_pricing",
            "description": "Get a cargo price for boxes of different weights and sizes. The chargeable weight of every box is summed and rounded up once for the whole shipment. Available for UPS and DHL.",
            "parameters": {
                "type": "object",
                "properties": with_properties(
                    with_properties(content, json!({
                        "country": { "type": "string", "description": "Destination country or city name" },
                        "boxes": {
                            "type": "array",
                            "description": "Box groups; each group is `quantity` identical boxes",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "weight": { "type": "number", "description": "Weight of one box in kilograms" },
                                    "length": { "type": "number", "description": "Length in centimeters" },
                                    "width": { "type": "number", "description": "Width in centimeters" },
                                    "height": { "type": "number", "description": "Height in centimeters" },
                                    "quantity": { "type": "integer", "minimum": 1, "description": "Number of boxes like this one (default is 1)" }
                                },
                                "required": ["weight", "length", "width", "height"]
                            }
                        }
                    })),
                    carrier,
                ),
                "required": ["content", "country", "boxes"]
            }
        }
    ])
}

/// Executes pricing tool calls issued by the assistant
#[derive(Clone)]
pub struct AssistantService {
    pricing: PricingService,
}

fn parse_arguments<T: for<'de> Deserialize<'de>>(tool: &str, arguments: Value) -> AppResult<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| AppError::ValidationError(format!("Invalid arguments for {}: {}", tool, e)))
}

impl AssistantService {
    pub fn new(pricing: PricingService) -> Self {
        Self { pricing }
    }

    /// Run one tool call by name with its JSON arguments
    pub fn dispatch(&self, name: &str, arguments: Value) -> AppResult<PricingResponse> {
        tracing::debug!(tool = name, "Dispatching assistant tool call");

        match name {
            "cargo_pricing" => self.pricing.single(&parse_arguments::<PricingQuery>(name, arguments)?),
            "cargo_multi_pricing" => self.pricing.multi(&parse_arguments::<PricingQuery>(name, arguments)?),
            "cargo_draft_pricing" => self.pricing.draft(&parse_arguments::<PricingQuery>(name, arguments)?),
            "cargo_mixed_pricing" => self
                .pricing
                .mixed(&parse_arguments::<MixedPricingRequest>(name, arguments)?),
            _ => {
                tracing::warn!(tool = name, available = ?TOOL_NAMES, "Unknown assistant tool requested");
                Err(AppError::UnknownTool(name.to_string()))
            }
        }
    }
}

// ============================================================================
// Cargo conversation detection
// ============================================================================

/// Whether a message (or conversation) is about shipping something
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CargoDetection {
    pub is_cargo: bool,
    pub confidence: Confidence,
    pub detected_terms: Vec<String>,
}

impl CargoDetection {
    fn none() -> Self {
        Self {
            is_cargo: false,
            confidence: Confidence::Low,
            detected_terms: Vec::new(),
        }
    }
}

/// One turn of a chat transcript
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Keyword groups, in folded ASCII form (see `normalize_name`)
const KEYWORD_GROUPS: &[&[&str]] = &[
    // shipping
    &[
        "ship", "shipping", "shipment", "export", "import", "send", "delivery", "courier", "kargo", "gonderi",
        "gonderim", "sevkiyat", "teslimat", "kurye", "gonder", "gondermek", "yolla", "yollamak",
    ],
    // cargo
    &[
        "cargo", "freight", "fak", "general cargo", "package", "parcel", "box", "boxes", "yuk", "genel kargo",
        "paket", "kutu", "koli", "koliler", "ambalaj",
    ],
    // carriers
    &["ups", "dhl", "aramex", "fedex", "carrier", "tasiyici"],
    // destinations
    &[
        "destination", "country", "city", "germany", "usa", "uk", "turkey", "europe", "asia", "ulke", "sehir",
        "almanya", "amerika", "ingiltere", "turkiye", "avrupa", "asya", "varis", "hedef", "nereye", "hangi ulke",
    ],
    // measurements
    &[
        "kg", "kilogram", "weight", "heavy", "cm", "centimeter", "dimension", "dimensions", "agirlik", "agir",
        "hafif", "santimetre", "boyut", "ebat", "olcu", "buyukluk",
    ],
    // pricing
    &[
        "price", "cost", "quote", "rate", "calculate", "pricing", "cheap", "expensive", "fiyat", "maliyet",
        "teklif", "ucret", "hesapla", "fiyatlandirma", "ucuz", "pahali", "kac para",
    ],
    // intent
    &[
        "how much", "can i", "want to", "need to", "looking for", "price for", "ne kadar", "istiyorum",
        "ihtiyacim var", "ariyorum", "icin fiyat", "gondermek istiyorum", "yollamak istiyorum",
    ],
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static HIGH_CONFIDENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(ship|shipping|export|import)\b.*\b(to|destination)\b",
        r"\bgeneral cargo\b",
        r"\b(cargo|freight)\b.*\b(price|pricing|cost|quote)\b",
        r"\b(ups|dhl|aramex)\b.*\b(ship|shipping)\b",
        r"\bfak\b",
        r"\b(package|parcel|box)\b.*\b(to|destination)\b",
        r"\b(kargo|gonderi|gonderim)\b.*\b(fiyat|teklif|ucret)\w*",
        r"\bgenel kargo\b",
        r"\b(kargo|paket)\w*\b.*\b(gondermek|yollamak)\b",
        r"\b(ups|dhl|aramex)\b.*\b(kargo|gonderi)\w*",
        r"\b(paket|kutu|koli)\w*\b.*\b(nereye|hangi ulke)\b",
        r"\bkargo\w*\b.*\bistiyorum\b",
        r"\bgondermek istiyorum\b",
    ])
});

static MEDIUM_CONFIDENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(ship|send|export)\b",
        r"\b(cargo|freight|package|parcel)\b",
        r"\b(ups|dhl|aramex|fedex)\b",
        r"\bhow much\b.*\b(ship|send|delivery)\b",
        r"\bweight\b.*\bkg\b",
        r"\b(kargo|gonderi|paket)\w*",
        r"\b(gonder|gondermek|yolla|yollamak)\b",
        r"\bne kadar\b.*\b(kargo|gonderi|teslimat)\w*",
        r"\bagirlik\b.*\bkg\b",
        r"\bfiyat\w*\b.*\b(kargo|gonderi)\w*",
    ])
});

/// Digits glued to units ("5kg") are split so the unit is a word of its own
fn fold(message: &str) -> String {
    let folded = normalize_name(message);
    let mut out = String::with_capacity(folded.len() + 8);
    let mut prev_digit = false;
    for c in folded.chars() {
        if prev_digit && c.is_ascii_alphabetic() {
            out.push(' ');
        }
        prev_digit = c.is_ascii_digit();
        out.push(c);
    }
    out
}

fn contains_phrase(padded: &str, phrase: &str) -> bool {
    padded.contains(&format!(" {} ", phrase))
}

/// Classify a single message
pub fn detect_cargo_message(message: &str) -> CargoDetection {
    let text = fold(message);
    if text.is_empty() {
        return CargoDetection::none();
    }

    if HIGH_CONFIDENCE_PATTERNS.iter().any(|p| p.is_match(&text)) {
        return CargoDetection {
            is_cargo: true,
            confidence: Confidence::High,
            detected_terms: vec!["high confidence pattern match".to_string()],
        };
    }

    let padded = format!(" {} ", text);
    let mut detected_terms: Vec<String> = Vec::new();
    let mut categories = 0;
    for group in KEYWORD_GROUPS {
        let mut group_hit = false;
        for keyword in group.iter() {
            if contains_phrase(&padded, keyword) && !detected_terms.iter().any(|t| t == keyword) {
                detected_terms.push(keyword.to_string());
                group_hit = true;
            }
        }
        if group_hit {
            categories += 1;
        }
    }
    let total = detected_terms.len();

    let mut confidence = if categories >= 3 || total >= 4 {
        Some(Confidence::High)
    } else if categories >= 2 || total >= 2 {
        Some(Confidence::Medium)
    } else if total >= 1 {
        Some(Confidence::Low)
    } else {
        None
    };

    if MEDIUM_CONFIDENCE_PATTERNS.iter().any(|p| p.is_match(&text)) {
        confidence = confidence.max(Some(Confidence::Medium));
    }

    match confidence {
        Some(confidence) => CargoDetection {
            is_cargo: true,
            confidence,
            detected_terms,
        },
        None => CargoDetection::none(),
    }
}

/// Classify a transcript from its last five messages, user turns only
pub fn detect_cargo_conversation(messages: &[ChatMessage]) -> CargoDetection {
    let recent = &messages[messages.len().saturating_sub(5)..];
    let mut result = CargoDetection::none();

    for message in recent.iter().filter(|m| m.role == "user") {
        let detection = detect_cargo_message(&message.content);
        if !detection.is_cargo {
            continue;
        }
        if !result.is_cargo {
            result.is_cargo = true;
            result.confidence = detection.confidence;
        } else {
            result.confidence = result.confidence.max(detection.confidence);
        }
        for term in detection.detected_terms {
            if !result.detected_terms.contains(&term) {
                result.detected_terms.push(term);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::pricing::{InMemorySource, PricingEngine};
    use std::sync::Arc;

    fn assistant() -> AssistantService {
        let source = InMemorySource::new()
            .with_file("regions.csv", include_str!("../../../data/regions.csv"))
            .with_file("pricing.csv", include_str!("../../../data/pricing.csv"))
            .with_file("dhl-regions.csv", include_str!("../../../data/dhl-regions.csv"))
            .with_file("dhl-pricing.csv", include_str!("../../../data/dhl-pricing.csv"))
            .with_file("aramex-countries.csv", include_str!("../../../data/aramex-countries.csv"));
        AssistantService::new(PricingService::new(Arc::new(PricingEngine::new(Arc::new(source)))))
    }

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    mod tools {
        use super::*;

        #[test]
        fn test_definitions_cover_every_tool() {
            let defs = tool_definitions();
            let names: Vec<&str> = defs
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["name"].as_str().unwrap())
                .collect();
            assert_eq!(names, TOOL_NAMES.to_vec());
            assert_eq!(defs[2]["parameters"]["required"], json!(["content", "country", "weight"]));
            assert!(defs[0]["parameters"]["properties"]["carrier"].is_object());
            assert!(defs[3]["parameters"]["properties"]["boxes"]["items"].is_object());
        }

        #[test]
        fn test_quantity_is_declared_integer() {
            let defs = tool_definitions();
            for def in defs.as_array().unwrap().iter().take(3) {
                assert_eq!(def["parameters"]["properties"]["quantity"]["type"], "integer", "{}", def["name"]);
            }
            assert_eq!(
                defs[3]["parameters"]["properties"]["boxes"]["items"]["properties"]["quantity"]["type"],
                "integer"
            );
        }

        #[test]
        fn test_dispatch_multi_pricing() {
            let response = assistant()
                .dispatch(
                    "cargo_multi_pricing",
                    json!({ "content": "books", "country": "Germany", "weight": 5 }),
                )
                .unwrap();
            assert_eq!(response.success, Some(true));
            assert_eq!(response.data.unwrap()["cheapest"], "DHL");
        }

        #[test]
        fn test_dispatch_content_only() {
            let response = assistant().dispatch("cargo_pricing", json!({ "content": "FAK" })).unwrap();
            assert_eq!(response.content_approved, Some(true));
        }

        #[test]
        fn test_dispatch_unknown_tool() {
            let err = assistant().dispatch("book_flight", json!({})).unwrap_err();
            assert!(matches!(err, AppError::UnknownTool(name) if name == "book_flight"));
        }

        #[test]
        fn test_dispatch_bad_arguments() {
            let err = assistant()
                .dispatch("cargo_mixed_pricing", json!({ "boxes": "three" }))
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    mod detection {
        use super::*;

        #[test]
        fn test_high_confidence_patterns() {
            assert_eq!(detect_cargo_message("I want to ship a box to Germany").confidence, Confidence::High);
            assert_eq!(detect_cargo_message("FAK").confidence, Confidence::High);
            assert_eq!(detect_cargo_message("Almanya'ya kargo fiyatı nedir?").confidence, Confidence::High);
            assert!(detect_cargo_message("Paket göndermek istiyorum").is_cargo);
        }

        #[test]
        fn test_keyword_counting() {
            let result = detect_cargo_message("price for 5kg to Japan");
            assert!(result.is_cargo);
            assert!(result.detected_terms.contains(&"kg".to_string()));
            assert!(result.confidence >= Confidence::Medium);
        }

        #[test]
        fn test_unrelated_message() {
            let result = detect_cargo_message("What is the weather like today?");
            assert!(!result.is_cargo);
            assert!(result.detected_terms.is_empty());
            assert!(!detect_cargo_message("").is_cargo);
        }

        #[test]
        fn test_words_inside_other_words_do_not_count() {
            // "shipment" must not come from "relationship", nor "ups" from "groups"
            assert!(!detect_cargo_message("relationships between groups").is_cargo);
        }

        #[test]
        fn test_conversation_uses_last_five_user_messages() {
            let mut messages = vec![user("how do I ship cargo to Germany?")];
            for _ in 0..5 {
                messages.push(user("hello"));
            }
            assert!(!detect_cargo_conversation(&messages).is_cargo);

            messages.push(ChatMessage {
                role: "assistant".to_string(),
                content: "shipping freight price quote".to_string(),
            });
            assert!(!detect_cargo_conversation(&messages).is_cargo);

            messages.push(user("dhl please"));
            let result = detect_cargo_conversation(&messages);
            assert!(result.is_cargo);
            assert_eq!(result.confidence, Confidence::Medium);
        }
    }
}
