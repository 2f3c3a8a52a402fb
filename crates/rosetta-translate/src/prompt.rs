//! Prompt construction.

use crate::locales::display_name;
use crate::types::TranslationRequest;

const GUIDELINES: &str = "Important guidelines:
- This is for an App Store listing, so keep it engaging and professional
- Maintain the tone and style appropriate for mobile app marketing
- Keep character limits in mind (app names should be short, descriptions can be longer)
- Use natural, native-sounding language for the target locale
- Preserve any technical terms or brand names when appropriate
";

/// Style guidance for a listing field, if it has any.
pub fn field_guidance(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("- Keep it short and memorable\n- Consider cultural preferences for app naming\n"),
        "description" => Some("- Be compelling and informative\n- Highlight key features and benefits\n"),
        "keywords" => Some("- Translate concepts, not just words\n- Use terms people actually search for\n"),
        "whatsNew" => Some("- Keep it concise and clear\n- Focus on user benefits\n"),
        _ => None,
    }
}

/// Builds the single user message sent to the model.
pub fn build_translation_prompt(request: &TranslationRequest) -> String {
    let source = display_name(&request.source_locale);
    let target = display_name(&request.target_locale);

    let mut prompt = format!(
        "You are a professional app store translator. Translate the following {source} text to {target}.\n\n{GUIDELINES}\n"
    );

    if let Some(field) = request.field.as_deref() {
        if let Some(guidance) = field_guidance(field) {
            prompt.push_str(&format!(
                "Field-specific guidance for \"{field}\":\n{guidance}\n"
            ));
        }
    }

    if let Some(context) = request.context.as_deref() {
        prompt.push_str(&format!("Additional context: {context}\n\n"));
    }

    prompt.push_str(&format!(
        "Text to translate:\n\"{}\"\n\nRespond with ONLY the translated text, no explanations or additional commentary.",
        request.text
    ));

    prompt
}
