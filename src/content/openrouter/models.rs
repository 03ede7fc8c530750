use serde::{Deserialize, Serialize};

/// Body of a chat completion request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
}

/// One message of a chat completion request.
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Subset of a chat completion response the client reads.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: String,
}

/// Prompt asking for charades words of `category`.
pub fn words_prompt(category: &str) -> String {
    format!(
        "Generate a list of 30 words related to the genre: {category}. \
         The words should be commonly associated with this genre and suitable for a charades game. \
         For example, if you receive \"famous rappers\", return famous rappers like akon, 2pac, eminem. \
         Do not include explanations, just return a clean JSON array of words."
    )
}
