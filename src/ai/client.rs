use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    source_language: String,
    target_language: String,
}

impl OpenRouterClient {
    pub fn new(source_language: &str, target_language: &str) -> Result<Self, String> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| format!("Failed to create OpenRouter client: {}", e))?;

        Ok(Self {
            client,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        })
    }

    /// Asks for translation, part of speech and one example sentence
    /// for `word`, one JSON entry per plausible part of speech.
    pub async fn word_details(
        &self,
        word: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let prompt = format!(
            r#"For the {src} word "{word}", provide its {tgt} translation, its part of speech, a simple example sentence in {src}, and the {tgt} translation of that sentence.

IMPORTANT:

- Respond ONLY with a JSON array of objects with this exact structure (no markdown, no extra text):
[{{
    "display_form": "the word as it should be displayed",
    "part_of_speech": "one of: noun, verb, adjective, adverb, pronoun, preposition, conjunction, numeral",
    "translation": "the {tgt} translation for this part of speech",
    "example_source": "a simple example sentence in {src}",
    "example_translation": "the {tgt} translation of the example sentence"
}}]
- If the part of speech is a noun, display_form is the word with its article in parentheses, e.g. "bil (en)".
- If the part of speech is a verb in the infinitive, display_form is the word with the infinitive marker in parentheses, e.g. "dricka (att)".
- For every other part of speech, display_form is the word unchanged.
- If the word can be several parts of speech, return one array entry per part of speech.
"#,
            src = self.source_language,
            tgt = self.target_language,
            word = word,
        );

        self.complete(&prompt).await
    }

    /// Asks for one new example sentence, avoiding the listed existing
    /// ones.
    pub async fn new_example(
        &self,
        word: &str,
        existing: &[String],
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let prompt = format!(
            r#"Provide a NEW simple example sentence in {src} for the word "{word}" together with its {tgt} translation. Do not repeat any of these sentences: {existing}.

IMPORTANT:

- Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    "source": "the new example sentence in {src}",
    "translation": "its {tgt} translation"
}}
"#,
            src = self.source_language,
            tgt = self.target_language,
            word = word,
            existing = existing.join("; "),
        );

        self.complete(&prompt).await
    }

    async fn complete(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let messages = vec![
            Message::text(
                "system",
                "You are a precise bilingual dictionary assistant. Respond with JSON only.",
            ),
            Message::text("user", prompt),
        ];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()?
            .chat_completion(request)
            .await
            .map_err(|e| format!("OpenRouter API error: {}", e))?;

        if let Some(choice) = response.choices.first() {
            match &choice.message.content {
                openrouter_api::MessageContent::Text(text) => Ok(text.clone()),
                openrouter_api::MessageContent::Parts(parts) => {
                    let text_parts: Vec<String> = parts
                        .iter()
                        .filter_map(|p| {
                            if let openrouter_api::ContentPart::Text(tc) = p {
                                Some(tc.text.clone())
                            } else {
                                None
                            }
                        })
                        .collect();
                    Ok(text_parts.join("\n"))
                }
            }
        } else {
            Err("No response choices received".into())
        }
    }
}
